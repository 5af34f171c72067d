use leptos::prelude::*;
use leptos_router::hooks::{use_params_map, use_query_map};

use crate::components::error::ErrorView;
use crate::components::loading::LoadingView;
use crate::components::service_booking_form::ServiceBookingForm;
use crate::server::get_provider_services;

/// `/providers/:provider_id/book`, optionally preselecting `?service=<id>`.
#[component]
pub fn ServiceBookingPage() -> impl IntoView {
    let params = use_params_map();
    let query = use_query_map();

    let provider_id = Memo::new(move |_| params.read().get("provider_id").unwrap_or_default());
    let initial_service = move || query.read().get("service").filter(|id| !id.trim().is_empty());

    let services_resource = Resource::new(
        move || provider_id.get(),
        move |id| async move {
            if id.trim().is_empty() {
                Ok(Vec::new())
            } else {
                get_provider_services(id).await
            }
        },
    );

    view! {
        <div class="service-booking-container">
            <div class="service-booking-header">
                <h1 class="service-booking-title">"Book an appointment"</h1>
                <p class="service-booking-subtitle">
                    "Choose a service, then pick a day and time that works for you."
                </p>
            </div>

            <Suspense fallback=move || view! {
                <LoadingView message=Some("Loading services...".to_string()) />
            }>
                {move || {
                    services_resource.get().map(|result| match result {
                        Ok(services) => view! {
                            <ServiceBookingForm
                                provider_id=provider_id.get_untracked()
                                services=services
                                initial_service=initial_service()
                            />
                        }.into_any(),
                        Err(e) => view! {
                            <ErrorView title="Could not load services" message=Some(e.to_string()) />
                        }.into_any(),
                    })
                }}
            </Suspense>
        </div>
    }
}
