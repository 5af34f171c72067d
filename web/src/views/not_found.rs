use leptos::prelude::*;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found-container">
            <div class="not-found-content">
                <div class="not-found-code">"404"</div>
                <h1 class="not-found-title">"Page Not Found"</h1>
                <p class="not-found-text">
                    "The page you're looking for doesn't exist or may have been moved."
                </p>
            </div>
        </div>
    }
}
