use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

/// Errors from the connection pool manager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Get the shared connection pool, creating it lazily on first use.
pub async fn pool() -> Result<PgPool, DatabaseError> {
    let pool = POOL
        .get_or_try_init(|| async {
            let url = std::env::var("DATABASE_URL")
                .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
            let pool = PgPoolOptions::new().max_connections(10).connect(&url).await?;
            info!("Created database pool");
            Ok::<_, DatabaseError>(pool)
        })
        .await?;
    Ok(pool.clone())
}

/// Pings the pool to ensure connectivity
pub async fn health_check() -> Result<(), DatabaseError> {
    let pool = pool().await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    Ok(())
}

/// Postgres-side health details: server version and uptime.
/// Returns `None` when the row comes back incomplete, which the handler
/// maps to a 503.
pub async fn server_status() -> Result<Option<(String, String)>, DatabaseError> {
    let pool = pool().await?;
    let row = sqlx::query(
        "SELECT version() AS postgres_version, \
         (current_timestamp - pg_postmaster_start_time())::text AS up_time",
    )
    .fetch_one(&pool)
    .await?;

    let version: Option<String> = row.try_get("postgres_version").ok();
    let up_time: Option<String> = row.try_get("up_time").ok();
    Ok(version.zip(up_time))
}
