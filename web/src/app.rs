use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    ParamSegment, StaticSegment,
};
use thaw::ssr::SSRMountStyleProvider;
use thaw::*;

use crate::components::{NotificationHost, NotificationQueue};
use crate::views::{BookingConfirmation, NotFoundPage, ServiceBookingPage};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <SSRMountStyleProvider>
            <!DOCTYPE html>
            <html lang="en">
                <head>
                    <meta charset="utf-8"/>
                    <meta name="viewport" content="width=device-width, initial-scale=1"/>
                    <AutoReload options=options.clone() />
                    <HydrationScripts options/>
                    <MetaTags/>
                </head>
                <body>
                    <App/>
                </body>
            </html>
        </SSRMountStyleProvider>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();
    provide_context(NotificationQueue::new());

    view! {
        <Title text="bellavia"/>

        <ConfigProvider>
            <Router>
                <NotificationHost/>
                <main>
                    <Routes fallback=|| view! { <NotFoundPage/> }>
                        <Route
                            path=(StaticSegment("providers"), ParamSegment("provider_id"), StaticSegment("book"))
                            view=ServiceBookingPage
                        />
                        <Route
                            path=(StaticSegment("bookings"), ParamSegment("booking_id"))
                            view=BookingConfirmation
                        />
                    </Routes>
                </main>
            </Router>
        </ConfigProvider>
    }
}
