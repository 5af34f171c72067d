#[cfg(feature = "ssr")]
use super::entities::{Booking, Provider, Service, UnavailableDateRow, WorkingHoursRow, CANCELLED_STATUS};
#[cfg(feature = "ssr")]
use chrono::NaiveDate;
#[cfg(feature = "ssr")]
use sqlx::{PgConnection, PgExecutor, Row};

#[cfg(feature = "ssr")]
type DbResult<T> = Result<T, sqlx::Error>;

#[cfg(feature = "ssr")]
pub async fn get_provider<'c>(executor: impl PgExecutor<'c>, provider_id: &str) -> DbResult<Option<Provider>> {
    sqlx::query_as::<_, Provider>("SELECT id, name, timezone FROM providers WHERE id = $1")
        .bind(provider_id)
        .fetch_optional(executor)
        .await
}

/// Takes a row lock on the provider so concurrent booking attempts serialise.
#[cfg(feature = "ssr")]
pub async fn lock_provider(conn: &mut PgConnection, provider_id: &str) -> DbResult<Option<Provider>> {
    sqlx::query_as::<_, Provider>(
        "SELECT id, name, timezone FROM providers WHERE id = $1 FOR UPDATE",
    )
    .bind(provider_id)
    .fetch_optional(conn)
    .await
}

#[cfg(feature = "ssr")]
pub async fn get_working_hours<'c>(
    executor: impl PgExecutor<'c>,
    provider_id: &str,
) -> DbResult<Vec<WorkingHoursRow>> {
    sqlx::query_as::<_, WorkingHoursRow>(
        "SELECT weekday, start_time, end_time
         FROM provider_working_hours
         WHERE provider_id = $1",
    )
    .bind(provider_id)
    .fetch_all(executor)
    .await
}

#[cfg(feature = "ssr")]
pub async fn get_unavailable_dates<'c>(
    executor: impl PgExecutor<'c>,
    provider_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> DbResult<Vec<UnavailableDateRow>> {
    sqlx::query_as::<_, UnavailableDateRow>(
        "SELECT blocked_on
         FROM provider_unavailable_dates
         WHERE provider_id = $1 AND blocked_on BETWEEN $2 AND $3
         ORDER BY blocked_on",
    )
    .bind(provider_id)
    .bind(start)
    .bind(end)
    .fetch_all(executor)
    .await
}

/// Bookings that still occupy time (anything not cancelled) in a date range.
#[cfg(feature = "ssr")]
pub async fn get_active_bookings<'c>(
    executor: impl PgExecutor<'c>,
    provider_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> DbResult<Vec<Booking>> {
    sqlx::query_as::<_, Booking>(
        "SELECT id, provider_id, booking_date, start_time, duration_minutes, status
         FROM bookings
         WHERE provider_id = $1
           AND booking_date BETWEEN $2 AND $3
           AND status <> $4
         ORDER BY booking_date, start_time",
    )
    .bind(provider_id)
    .bind(start)
    .bind(end)
    .bind(CANCELLED_STATUS)
    .fetch_all(executor)
    .await
}

#[cfg(feature = "ssr")]
pub async fn get_service<'c>(executor: impl PgExecutor<'c>, service_id: &str) -> DbResult<Option<Service>> {
    sqlx::query_as::<_, Service>(
        "SELECT id, provider_id, name, duration_minutes, price_cents
         FROM services
         WHERE id = $1",
    )
    .bind(service_id)
    .fetch_optional(executor)
    .await
}

#[cfg(feature = "ssr")]
pub async fn get_services<'c>(executor: impl PgExecutor<'c>, service_ids: &[String]) -> DbResult<Vec<Service>> {
    sqlx::query_as::<_, Service>(
        "SELECT id, provider_id, name, duration_minutes, price_cents
         FROM services
         WHERE id = ANY($1)",
    )
    .bind(service_ids)
    .fetch_all(executor)
    .await
}

#[cfg(feature = "ssr")]
pub async fn get_services_for_provider<'c>(
    executor: impl PgExecutor<'c>,
    provider_id: &str,
) -> DbResult<Vec<Service>> {
    sqlx::query_as::<_, Service>(
        "SELECT id, provider_id, name, duration_minutes, price_cents
         FROM services
         WHERE provider_id = $1
         ORDER BY name",
    )
    .bind(provider_id)
    .fetch_all(executor)
    .await
}

#[cfg(feature = "ssr")]
pub async fn insert_booking(
    conn: &mut PgConnection,
    booking: &Booking,
    service_ids: &[String],
) -> DbResult<()> {
    sqlx::query(
        "INSERT INTO bookings (id, provider_id, booking_date, start_time, duration_minutes, status)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&booking.id)
    .bind(&booking.provider_id)
    .bind(booking.booking_date)
    .bind(&booking.start_time)
    .bind(booking.duration_minutes)
    .bind(&booking.status)
    .execute(&mut *conn)
    .await?;

    for (position, service_id) in service_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO booking_services (booking_id, service_id, position)
             VALUES ($1, $2, $3)",
        )
        .bind(&booking.id)
        .bind(service_id)
        .bind(position as i32)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

#[cfg(feature = "ssr")]
pub async fn get_booking<'c>(executor: impl PgExecutor<'c>, booking_id: &str) -> DbResult<Option<Booking>> {
    sqlx::query_as::<_, Booking>(
        "SELECT id, provider_id, booking_date, start_time, duration_minutes, status
         FROM bookings
         WHERE id = $1",
    )
    .bind(booking_id)
    .fetch_optional(executor)
    .await
}

/// Names of the services attached to a booking, in the order they were chosen.
#[cfg(feature = "ssr")]
pub async fn get_booking_service_names<'c>(
    executor: impl PgExecutor<'c>,
    booking_id: &str,
) -> DbResult<Vec<String>> {
    let rows = sqlx::query(
        "SELECT s.name
         FROM booking_services bs
         JOIN services s ON s.id = bs.service_id
         WHERE bs.booking_id = $1
         ORDER BY bs.position",
    )
    .bind(booking_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.iter().map(|row| row.get::<String, _>("name")).collect())
}
