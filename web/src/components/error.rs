use leptos::prelude::*;
use thaw::{MessageBar, MessageBarIntent};

/// Inline error for a page section that failed to load.
#[component]
pub fn ErrorView(
    message: Option<String>,
    #[prop(optional, into)] title: Option<String>,
) -> impl IntoView {
    view! {
        <div class="error-container">
            <MessageBar intent=MessageBarIntent::Error>
                {title.map(|title| view! { <strong class="error-title">{title}</strong> " " })}
                {message.unwrap_or_else(|| "Something went wrong. Please refresh and try again.".to_string())}
            </MessageBar>
        </div>
    }
}
