#[cfg(feature = "ssr")]
use sqlx::postgres::PgPoolOptions;
#[cfg(feature = "ssr")]
use sqlx::{PgPool, Pool, Postgres};
#[cfg(feature = "ssr")]
use std::sync::OnceLock;

#[cfg(feature = "ssr")]
use crate::config::AppConfig;

#[cfg(feature = "ssr")]
static DB_POOL: OnceLock<PgPool> = OnceLock::new();

#[cfg(feature = "ssr")]
pub async fn init_pool(config: &AppConfig) -> Result<(), sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    DB_POOL.set(pool).map_err(|_| {
        sqlx::Error::Configuration(
            "Database pool already initialized".to_string().into(),
        )
    })?;

    Ok(())
}

#[cfg(feature = "ssr")]
pub fn get_pool() -> &'static Pool<Postgres> {
    DB_POOL.get().expect("Database pool not initialized. Call init_pool() first.")
}
