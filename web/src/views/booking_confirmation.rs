use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};
use thaw::*;

use crate::components::error::ErrorView;
use crate::components::loading::LoadingView;
use crate::server::get_booking;
use crate::utils::timezone::{convert_to_12_hour_format, format_date_for_booking};

/// Landing page after a booking is created: `/bookings/:booking_id`.
#[component]
pub fn BookingConfirmation() -> impl IntoView {
    let params = use_params_map();
    let navigate = use_navigate();

    let booking_id = Memo::new(move |_| params.read().get("booking_id").unwrap_or_default());
    let booking_resource = Resource::new(move || booking_id.get(), get_booking);

    view! {
        <div class="booking-confirmation-container">
            <div class="booking-confirmation-content">
                <Suspense fallback=move || view! {
                    <LoadingView message=Some("Loading your booking...".to_string()) />
                }>
                    {move || {
                        booking_resource.get().map(|result| match result {
                            Ok(booking) => {
                                let provider_page = format!("/providers/{}/book", urlencoding::encode(&booking.provider_id));
                                let navigate = navigate.clone();

                                view! {
                                    <div class="booking-confirmation-header">
                                        <div class="booking-confirmation-success-icon">"✓"</div>
                                        <h1 class="booking-confirmation-title">"Booking Confirmed!"</h1>
                                        <p class="booking-confirmation-subtitle">
                                            {format!("You're booked with {}", booking.provider_name)}
                                        </p>
                                    </div>

                                    <div class="booking-confirmation-details">
                                        <div class="booking-confirmation-reference">
                                            <h2 class="booking-confirmation-reference-title">"Booking Reference"</h2>
                                            <p class="booking-confirmation-reference-number">{booking.id.clone()}</p>
                                            <p class="booking-confirmation-reference-note">
                                                "Save this reference number for your records"
                                            </p>
                                        </div>

                                        <dl class="booking-confirmation-summary">
                                            <dt>"Services"</dt>
                                            <dd>{booking.services.join(", ")}</dd>
                                            <dt>"Date"</dt>
                                            <dd>{format_date_for_booking(booking.date)}</dd>
                                            <dt>"Time"</dt>
                                            <dd>{convert_to_12_hour_format(&booking.time)}</dd>
                                            <dt>"Status"</dt>
                                            <dd class="booking-confirmation-status">{booking.status.clone()}</dd>
                                        </dl>
                                    </div>

                                    <div class="booking-confirmation-actions">
                                        <Button
                                            appearance=ButtonAppearance::Secondary
                                            on_click=move |_| {
                                                navigate(&provider_page, Default::default());
                                            }
                                        >
                                            "Book Another Appointment"
                                        </Button>
                                    </div>
                                }.into_any()
                            }
                            Err(e) => view! {
                                <ErrorView title="We couldn't find that booking" message=Some(e.to_string()) />
                            }.into_any(),
                        })
                    }}
                </Suspense>
            </div>
        </div>
    }
}
