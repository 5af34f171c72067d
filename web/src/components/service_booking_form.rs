use chrono::{NaiveDate, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use shared_types::ServiceSummary;
use thaw::*;

use crate::api::ServerFnBackend;
use crate::booking::{BookingBackend, BookingPolicy, BookingSession, ScheduleTicket, SlotTicket};
use crate::components::available_date_picker::AvailableDatePicker;
use crate::components::notification_host::{LeptosShell, NotificationQueue};
use crate::components::time_slot_picker::TimeSlotPicker;
use crate::utils::timezone::{convert_to_12_hour_format, format_date_for_booking};

fn format_price(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

#[component]
pub fn ServiceBookingForm(
    provider_id: String,
    services: Vec<ServiceSummary>,
    initial_service: Option<String>,
) -> impl IntoView {
    let queue = expect_context::<NotificationQueue>();
    let navigate = use_navigate();
    let shell = LeptosShell::new(queue, move |path: &str| navigate(path, Default::default()));

    let mut booking = BookingSession::new(
        ServerFnBackend,
        shell,
        provider_id,
        Utc::now(),
        BookingPolicy::default(),
    );
    if let Some(service_id) = initial_service.filter(|id| services.iter().any(|s| &s.id == id)) {
        booking.select_service(&service_id);
    }

    // The session is not reactive itself; every mutation bumps `revision`.
    let session = StoredValue::new_local(booking);
    let revision = RwSignal::new(0u64);
    let bump = move || revision.update(|n| *n += 1);

    let run_schedule_fetch = move |ticket: Option<ScheduleTicket>| {
        bump();
        let Some(ticket) = ticket else {
            return;
        };
        spawn_local(async move {
            let backend = ServerFnBackend;
            let mut ticket = ticket;
            loop {
                let result = backend
                    .provider_schedule(
                        &ticket.provider_id,
                        ticket.month.first_day(),
                        ticket.month.last_day(),
                    )
                    .await;
                // The first load may move to the provider's current month.
                let refetch = session
                    .try_update_value(|s| s.apply_schedule(ticket, result).into_refetch())
                    .flatten();
                bump();
                match refetch {
                    Some(next) => ticket = next,
                    None => break,
                }
            }
        });
    };

    let run_slot_fetch = move |ticket: Option<SlotTicket>| {
        bump();
        let Some(ticket) = ticket else {
            return;
        };
        spawn_local(async move {
            let backend = ServerFnBackend;
            let result = backend
                .service_availability(&ticket.service_id, ticket.date)
                .await;
            session.update_value(|s| {
                s.apply_slots(ticket, result);
            });
            bump();
        });
    };

    Effect::new(move |_| {
        run_schedule_fetch(session.try_update_value(|s| s.begin_schedule_fetch()));
    });

    let calendar = Signal::derive(move || {
        revision.track();
        session.with_value(|s| s.calendar_view())
    });
    let schedule_loading = Signal::derive(move || {
        revision.track();
        session.with_value(|s| s.is_schedule_loading())
    });
    let can_go_back = Signal::derive(move || {
        revision.track();
        session.with_value(|s| s.can_go_back())
    });
    let can_go_forward = Signal::derive(move || {
        revision.track();
        session.with_value(|s| s.can_go_forward())
    });
    let selected_service = Signal::derive(move || {
        revision.track();
        session.with_value(|s| s.service_id().map(str::to_string))
    });
    let selected_date = Signal::derive(move || {
        revision.track();
        session.with_value(|s| s.selected_date())
    });
    let slots = Signal::derive(move || {
        revision.track();
        session.with_value(|s| s.slots().slots().to_vec())
    });
    let selected_time = Signal::derive(move || {
        revision.track();
        session.with_value(|s| s.slots().selected_time().map(str::to_string))
    });
    let slots_fetching = Signal::derive(move || {
        revision.track();
        session.with_value(|s| s.slots().is_fetching())
    });
    let is_submitting = Signal::derive(move || {
        revision.track();
        session.with_value(|s| s.is_submitting())
    });
    let can_submit = Signal::derive(move || {
        revision.track();
        session.with_value(|s| s.can_submit())
    });
    let has_service = Signal::derive(move || selected_service.with(Option::is_some));

    let on_month_change = move |offset: i32| {
        run_schedule_fetch(session.try_update_value(|s| s.navigate_month(offset)).flatten());
    };
    let on_date_selected = move |date: NaiveDate| {
        run_slot_fetch(session.try_update_value(|s| s.begin_select_date(date)).flatten());
    };
    let on_slot_selected = move |time: String| {
        session.update_value(|s| {
            s.select_time(&time);
        });
        bump();
    };

    let on_submit = move |_| {
        let Some(pending) = session.try_update_value(|s| s.begin_submit()).flatten() else {
            return;
        };
        bump();
        spawn_local(async move {
            let backend = ServerFnBackend;
            let result = backend.create_booking(pending.request().clone()).await;
            session.update_value(|s| {
                s.finish_submit(pending, result);
            });
            bump();
        });
    };

    let service_names = StoredValue::new(
        services
            .iter()
            .map(|s| (s.id.clone(), s.name.clone()))
            .collect::<Vec<_>>(),
    );

    view! {
        <div class="service-booking-form">
            <section class="booking-step">
                <h3 class="booking-step-title">"1. Choose a service"</h3>
                {if services.is_empty() {
                    view! {
                        <p class="booking-empty">"This provider has no bookable services yet."</p>
                    }.into_any()
                } else {
                    view! {
                        <div class="service-options">
                            {services.into_iter().map(|service| {
                                let id = service.id.clone();
                                let is_selected = {
                                    let id = id.clone();
                                    move || selected_service.with(|current| current.as_deref() == Some(id.as_str()))
                                };
                                let price = service.price_cents.map(format_price);

                                view! {
                                    <button
                                        class="service-option"
                                        class:selected=is_selected
                                        disabled=move || is_submitting.get()
                                        on:click=move |_| {
                                            run_slot_fetch(session.try_update_value(|s| s.select_service(&id)).flatten());
                                        }
                                    >
                                        <span class="service-name">{service.name}</span>
                                        <span class="service-meta">
                                            {format!("{} min", service.duration_minutes)}
                                            {price.map(|p| format!(" · {}", p))}
                                        </span>
                                    </button>
                                }
                            }).collect::<Vec<_>>()}
                        </div>
                    }.into_any()
                }}
            </section>

            <section class="booking-step">
                <h3 class="booking-step-title">"2. Pick a date"</h3>
                <AvailableDatePicker
                    calendar=calendar
                    is_loading=schedule_loading
                    can_go_back=can_go_back
                    can_go_forward=can_go_forward
                    on_month_change=on_month_change
                    on_date_selected=on_date_selected
                />
            </section>

            <section class="booking-step">
                <h3 class="booking-step-title">"3. Pick a time"</h3>
                <TimeSlotPicker
                    selected_date=selected_date
                    has_service=has_service
                    slots=slots
                    selected_time=selected_time
                    is_fetching=slots_fetching
                    on_slot_selected=on_slot_selected
                />
            </section>

            <section class="booking-summary">
                {move || {
                    let service = selected_service.get().and_then(|id| {
                        service_names.with_value(|names| {
                            names.iter().find(|(sid, _)| *sid == id).map(|(_, name)| name.clone())
                        })
                    });
                    let date = selected_date.get().map(format_date_for_booking);
                    let time = selected_time.get().map(|t| convert_to_12_hour_format(&t));
                    view! {
                        <dl class="booking-summary-list">
                            <dt>"Service"</dt>
                            <dd>{service.unwrap_or_else(|| "Not selected".to_string())}</dd>
                            <dt>"Date"</dt>
                            <dd>{date.unwrap_or_else(|| "Not selected".to_string())}</dd>
                            <dt>"Time"</dt>
                            <dd>{time.unwrap_or_else(|| "Not selected".to_string())}</dd>
                        </dl>
                    }
                }}

                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=on_submit
                    disabled=Signal::derive(move || !can_submit.get())
                >
                    {move || if is_submitting.get() { "Booking..." } else { "Book appointment" }}
                </Button>
            </section>
        </div>
    }
}
