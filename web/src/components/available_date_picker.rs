use chrono::{Datelike, NaiveDate};
use leptos::prelude::*;
use thaw::*;

use crate::booking::CalendarView;
use crate::utils::timezone::format_date_for_booking;

#[component]
pub fn AvailableDatePicker(
    calendar: Signal<CalendarView>,
    is_loading: Signal<bool>,
    can_go_back: Signal<bool>,
    can_go_forward: Signal<bool>,
    on_month_change: impl Fn(i32) + 'static + Copy + Send + Sync,
    on_date_selected: impl Fn(NaiveDate) + 'static + Copy + Send + Sync,
) -> impl IntoView {
    let selected_date = move || {
        calendar.with(|view| view.days.iter().find(|day| day.selected).map(|day| day.date))
    };

    view! {
        <div class="available-date-picker">
            <div class="date-picker-header">
                <Button
                    appearance=ButtonAppearance::Secondary
                    size=ButtonSize::Small
                    on_click=move |_| on_month_change(-1)
                    disabled=Signal::derive(move || !can_go_back.get())
                >
                    "←"
                </Button>

                <div class="month-label">
                    {move || calendar.with(|view| view.month.label())}
                </div>

                <Button
                    appearance=ButtonAppearance::Secondary
                    size=ButtonSize::Small
                    on_click=move |_| on_month_change(1)
                    disabled=Signal::derive(move || !can_go_forward.get())
                >
                    "→"
                </Button>
            </div>

            {move || {
                if is_loading.get() {
                    view! {
                        <div class="date-picker-loading">
                            <div class="loading-spinner"></div>
                            <p>"Checking availability..."</p>
                        </div>
                    }.into_any()
                } else {
                    let view = calendar.get();
                    let blanks = (0..view.leading_blanks)
                        .map(|_| view! { <div class="calendar-day empty"></div> })
                        .collect::<Vec<_>>();
                    let days = view.days.into_iter().map(|day| {
                        let date = day.date;
                        let selectable = day.selectable();

                        view! {
                            <button
                                class="calendar-day"
                                class:available=day.available
                                class:unavailable=!day.available
                                class:past=day.past
                                class:selected=day.selected
                                disabled=!selectable
                                on:click=move |_| {
                                    if selectable {
                                        on_date_selected(date);
                                    }
                                }
                            >
                                {date.day()}
                            </button>
                        }
                    }).collect::<Vec<_>>();

                    view! {
                        <div class="date-picker-calendar">
                            <div class="weekday-headers">
                                <div class="weekday-header">"Sun"</div>
                                <div class="weekday-header">"Mon"</div>
                                <div class="weekday-header">"Tue"</div>
                                <div class="weekday-header">"Wed"</div>
                                <div class="weekday-header">"Thu"</div>
                                <div class="weekday-header">"Fri"</div>
                                <div class="weekday-header">"Sat"</div>
                            </div>

                            <div class="calendar-days">
                                {blanks}
                                {days}
                            </div>
                        </div>
                    }.into_any()
                }
            }}

            <div class="date-picker-footer">
                {move || match selected_date() {
                    Some(date) => view! {
                        <p class="selected-info">
                            "Selected: " {format_date_for_booking(date)}
                        </p>
                    }.into_any(),
                    None => view! {
                        <p class="no-selection">"Please select an available date"</p>
                    }.into_any(),
                }}
            </div>
        </div>
    }
}
