use chrono::NaiveDate;
use leptos::prelude::*;
use thaw::*;

use crate::utils::timezone::{convert_to_12_hour_format, format_date_for_booking};

#[component]
pub fn TimeSlotPicker(
    selected_date: Signal<Option<NaiveDate>>,
    has_service: Signal<bool>,
    slots: Signal<Vec<String>>,
    selected_time: Signal<Option<String>>,
    is_fetching: Signal<bool>,
    on_slot_selected: impl Fn(String) + 'static + Copy + Send + Sync,
) -> impl IntoView {
    view! {
        <div class="time-slot-picker">
            <div class="time-slot-picker-header">
                <h4>"Available Time Slots"</h4>
                <p class="time-slot-picker-subtitle">
                    {move || match selected_date.get() {
                        Some(date) => format!("Available appointments for {}", format_date_for_booking(date)),
                        None => "Please select a date first".to_string(),
                    }}
                </p>
            </div>

            <div class="time-slot-picker-content">
                {move || {
                    if selected_date.get().is_none() {
                        return view! {}.into_any();
                    }
                    if !has_service.get() {
                        return view! {
                            <div class="time-slot-picker-empty">
                                <p>"Choose a service to see its open times."</p>
                            </div>
                        }.into_any();
                    }
                    if is_fetching.get() {
                        return view! {
                            <div class="time-slot-picker-loading">
                                <Spinner size=SpinnerSize::Small />
                                <p>"Loading available time slots..."</p>
                            </div>
                        }.into_any();
                    }

                    let slots = slots.get();
                    if slots.is_empty() {
                        return view! {
                            <div class="time-slot-picker-empty">
                                <p>"No available time slots for this date."</p>
                                <p class="time-slot-picker-suggestion">"Please try selecting a different date."</p>
                            </div>
                        }.into_any();
                    }

                    let selected = selected_time.get();
                    view! {
                        <div class="time-slot-picker-grid">
                            {slots.into_iter().map(|slot| {
                                let appearance = if selected.as_deref() == Some(slot.as_str()) {
                                    ButtonAppearance::Primary
                                } else {
                                    ButtonAppearance::Secondary
                                };
                                let label = convert_to_12_hour_format(&slot);

                                view! {
                                    <Button
                                        class="time-slot-button"
                                        appearance=appearance
                                        on_click=move |_| on_slot_selected(slot.clone())
                                    >
                                        <span class="time-slot-time">{label}</span>
                                    </Button>
                                }
                            }).collect::<Vec<_>>()}
                        </div>
                    }.into_any()
                }}
            </div>
        </div>
    }
}
