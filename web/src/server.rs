use leptos::prelude::*;
use leptos::server;
use shared_types::{BookingDetail, CreatedBooking, ProviderSchedule, ServiceAvailability, ServiceSummary};

#[cfg(feature = "ssr")]
use crate::booking::calendar::weekday_key;
#[cfg(feature = "ssr")]
use crate::booking::slot_generation::{generate_slots, BusyInterval, SlotRules};
#[cfg(feature = "ssr")]
use crate::db::booking_repository as repo;
#[cfg(feature = "ssr")]
use crate::db::entities::{Booking, Provider, Service, PENDING_STATUS};
#[cfg(feature = "ssr")]
use crate::utils::timezone::resolve_timezone;
#[cfg(feature = "ssr")]
use chrono::{NaiveDate, Utc};
#[cfg(feature = "ssr")]
use shared_types::{parse_iso_date, CreateBookingRequest, ScheduledBooking, UnavailableDate, WorkingHours};
#[cfg(feature = "ssr")]
use sqlx::PgConnection;

/// Message sent back when the requested time was taken in the meantime.
pub const SLOT_TAKEN: &str = "Slot no longer available";

#[cfg(feature = "ssr")]
fn parse_date_arg(name: &str, value: &str) -> Result<NaiveDate, ServerFnError> {
    parse_iso_date(value)
        .ok_or_else(|| ServerFnError::new(format!("{} must be formatted as yyyy-MM-dd", name)))
}

#[cfg(feature = "ssr")]
fn db_error(context: &str, e: sqlx::Error) -> ServerFnError {
    tracing::error!(error = %e, "{}", context);
    ServerFnError::new(format!("{}: {}", context, e))
}

#[cfg(feature = "ssr")]
fn minutes(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

#[cfg(feature = "ssr")]
fn to_summary(service: Service) -> ServiceSummary {
    ServiceSummary {
        duration_minutes: minutes(service.duration_minutes),
        id: service.id,
        provider_id: service.provider_id,
        name: service.name,
        price_cents: service.price_cents,
    }
}

/// Start times still open for a service of `duration_minutes` on `date`.
#[cfg(feature = "ssr")]
async fn open_slots(
    conn: &mut PgConnection,
    provider: &Provider,
    duration_minutes: u32,
    date: NaiveDate,
) -> Result<Vec<String>, sqlx::Error> {
    let tz = resolve_timezone(provider.timezone.as_deref());
    let now = Utc::now().with_timezone(&tz);
    let today = now.date_naive();
    if date < today {
        return Ok(Vec::new());
    }

    let blocked = repo::get_unavailable_dates(&mut *conn, &provider.id, date, date).await?;
    if !blocked.is_empty() {
        return Ok(Vec::new());
    }

    let weekday = weekday_key(date);
    let hours = repo::get_working_hours(&mut *conn, &provider.id)
        .await?
        .into_iter()
        .find(|row| row.weekday.eq_ignore_ascii_case(weekday))
        .map(|row| WorkingHours {
            start: row.start_time,
            end: row.end_time,
        });
    let Some(hours) = hours else {
        return Ok(Vec::new());
    };

    let busy: Vec<BusyInterval> = repo::get_active_bookings(&mut *conn, &provider.id, date, date)
        .await?
        .iter()
        .filter_map(|booking| {
            BusyInterval::from_booking(&booking.start_time, minutes(booking.duration_minutes))
        })
        .collect();

    let rules = SlotRules {
        duration_minutes,
        interval_minutes: crate::config::current().slot_interval_minutes,
        not_before: (date == today).then(|| now.time()),
    };
    Ok(generate_slots(&hours, &rules, &busy))
}

#[server]
pub async fn get_provider_schedule(
    provider_id: String,
    start_date: String,
    end_date: String,
) -> Result<ProviderSchedule, ServerFnError> {
    let start = parse_date_arg("start_date", &start_date)?;
    let end = parse_date_arg("end_date", &end_date)?;
    if end < start {
        return Err(ServerFnError::new("end_date must not be before start_date".to_string()));
    }

    let pool = crate::db::pool::get_pool();
    let provider = repo::get_provider(pool, &provider_id)
        .await
        .map_err(|e| db_error("Failed to fetch provider", e))?
        .ok_or_else(|| ServerFnError::new("Provider not found".to_string()))?;

    let working_hours = repo::get_working_hours(pool, &provider.id)
        .await
        .map_err(|e| db_error("Failed to fetch working hours", e))?
        .into_iter()
        .map(|row| {
            (
                row.weekday.to_lowercase(),
                WorkingHours {
                    start: row.start_time,
                    end: row.end_time,
                },
            )
        })
        .collect();

    let unavailable_dates = repo::get_unavailable_dates(pool, &provider.id, start, end)
        .await
        .map_err(|e| db_error("Failed to fetch unavailable dates", e))?
        .into_iter()
        .map(|row| UnavailableDate::Day(row.blocked_on))
        .collect();

    let bookings = repo::get_active_bookings(pool, &provider.id, start, end)
        .await
        .map_err(|e| db_error("Failed to fetch bookings", e))?
        .into_iter()
        .map(|booking| ScheduledBooking {
            duration_minutes: Some(minutes(booking.duration_minutes)),
            status: Some(booking.status),
            id: booking.id,
            date: booking.booking_date,
            time: booking.start_time,
        })
        .collect();

    Ok(ProviderSchedule {
        working_hours,
        unavailable_dates,
        bookings,
        timezone: provider.timezone,
    })
}

#[server]
pub async fn get_service_availability(
    service_id: String,
    date: String,
) -> Result<ServiceAvailability, ServerFnError> {
    let date = parse_date_arg("date", &date)?;
    let pool = crate::db::pool::get_pool();

    let service = repo::get_service(pool, &service_id)
        .await
        .map_err(|e| db_error("Failed to fetch service", e))?
        .ok_or_else(|| ServerFnError::new("Service not found".to_string()))?;
    let provider = repo::get_provider(pool, &service.provider_id)
        .await
        .map_err(|e| db_error("Failed to fetch provider", e))?
        .ok_or_else(|| ServerFnError::new("Provider not found".to_string()))?;

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| db_error("Failed to acquire connection", e))?;
    let available_slots = open_slots(&mut conn, &provider, minutes(service.duration_minutes), date)
        .await
        .map_err(|e| db_error("Failed to compute availability", e))?;

    Ok(ServiceAvailability { available_slots })
}

#[server]
pub async fn create_booking(
    services: Vec<String>,
    date: String,
    time: String,
) -> Result<CreatedBooking, ServerFnError> {
    use validator::Validate;

    let request = CreateBookingRequest {
        services,
        date,
        time,
    };
    request
        .validate()
        .map_err(|e| ServerFnError::new(format!("Invalid booking request: {}", e)))?;
    let date = request
        .booking_date()
        .ok_or_else(|| ServerFnError::new("date must be formatted as yyyy-MM-dd".to_string()))?;

    let pool = crate::db::pool::get_pool();
    let services = repo::get_services(pool, &request.services)
        .await
        .map_err(|e| db_error("Failed to fetch services", e))?;
    if services.len() != request.services.len() {
        return Err(ServerFnError::new("Unknown service".to_string()));
    }
    let provider_id = services[0].provider_id.clone();
    if services.iter().any(|service| service.provider_id != provider_id) {
        return Err(ServerFnError::new(
            "All services must be offered by the same provider".to_string(),
        ));
    }
    let duration: u32 = services
        .iter()
        .map(|service| minutes(service.duration_minutes))
        .sum();

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| db_error("Failed to start transaction", e))?;
    let provider = repo::lock_provider(&mut *tx, &provider_id)
        .await
        .map_err(|e| db_error("Failed to lock provider", e))?
        .ok_or_else(|| ServerFnError::new("Provider not found".to_string()))?;

    let open = open_slots(&mut *tx, &provider, duration, date)
        .await
        .map_err(|e| db_error("Failed to compute availability", e))?;
    if !open.contains(&request.time) {
        tracing::info!(provider_id = %provider.id, %date, time = %request.time, "rejected booking for taken slot");
        if let Some(response) = use_context::<leptos_axum::ResponseOptions>() {
            response.set_status(http::StatusCode::CONFLICT);
        }
        return Err(ServerFnError::new(SLOT_TAKEN.to_string()));
    }

    let booking = Booking {
        id: format!("bk_{}", uuid::Uuid::new_v4().simple()),
        provider_id: provider.id,
        booking_date: date,
        start_time: request.time.clone(),
        duration_minutes: i32::try_from(duration).unwrap_or(i32::MAX),
        status: PENDING_STATUS.to_string(),
    };
    repo::insert_booking(&mut tx, &booking, &request.services)
        .await
        .map_err(|e| db_error("Failed to save booking", e))?;
    tx.commit()
        .await
        .map_err(|e| db_error("Failed to commit booking", e))?;

    tracing::info!(booking_id = %booking.id, provider_id = %booking.provider_id, "booking created");

    let mut created = CreatedBooking::new(booking.id);
    created
        .extra
        .insert("status".to_string(), serde_json::Value::from(booking.status));
    Ok(created)
}

#[server]
pub async fn get_provider_services(provider_id: String) -> Result<Vec<ServiceSummary>, ServerFnError> {
    let pool = crate::db::pool::get_pool();
    let services = repo::get_services_for_provider(pool, &provider_id)
        .await
        .map_err(|e| db_error("Failed to fetch services", e))?;

    Ok(services.into_iter().map(to_summary).collect())
}

#[server]
pub async fn get_booking(booking_id: String) -> Result<BookingDetail, ServerFnError> {
    let pool = crate::db::pool::get_pool();
    let booking = repo::get_booking(pool, &booking_id)
        .await
        .map_err(|e| db_error("Failed to fetch booking", e))?
        .ok_or_else(|| ServerFnError::new("Booking not found".to_string()))?;
    let provider = repo::get_provider(pool, &booking.provider_id)
        .await
        .map_err(|e| db_error("Failed to fetch provider", e))?
        .ok_or_else(|| ServerFnError::new("Provider not found".to_string()))?;
    let services = repo::get_booking_service_names(pool, &booking.id)
        .await
        .map_err(|e| db_error("Failed to fetch booking services", e))?;

    Ok(BookingDetail {
        id: booking.id,
        provider_id: provider.id,
        provider_name: provider.name,
        services,
        date: booking.booking_date,
        time: booking.start_time,
        status: booking.status,
    })
}
