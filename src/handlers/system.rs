use axum::extract::ConnectInfo;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use once_cell::sync::Lazy;
use serde_json::json;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

use crate::config::API_ADDRESS;
use crate::database;

static STARTED_AT: Lazy<Instant> = Lazy::new(Instant::now);

/// Record process start; called once from main so uptime is meaningful.
pub fn mark_started() {
    Lazy::force(&STARTED_AT);
}

/// GET / - basic information about the application
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "info": "This is a REST API.",
        "endpoint": format!("{}/", API_ADDRESS),
        "health": format!("{}/hc", API_ADDRESS),
        "whatismyip": format!("{}/ip", API_ADDRESS),
    }))
}

/// GET /api/fiscalia/hc - server health check
pub async fn health_check() -> Json<serde_json::Value> {
    info!("received GET to {}/hc", API_ADDRESS);
    let uptime_hours = STARTED_AT.elapsed().as_secs_f64() / 3600.0;
    let version =
        std::env::var("BACKEND_VERSION").unwrap_or_else(|_| "local-development".to_string());

    Json(json!({
        "status": "OK",
        "version": version,
        "uptime_hours": (uptime_hours * 100.0).round() / 100.0,
        "timestamp": chrono::Utc::now(),
    }))
}

/// GET /api/fiscalia/db_hc - database health check
pub async fn database_health_check() -> impl IntoResponse {
    info!("received GET to {}/db_hc", API_ADDRESS);
    match database::server_status().await {
        Ok(Some((postgres_version, up_time))) => (
            StatusCode::OK,
            Json(json!({
                "status": "OK",
                "postgres_version": postgres_version,
                "up_time": up_time,
            })),
        ),
        Ok(None) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "Service Unavailable" })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "Service Unavailable", "error": e.to_string() })),
        ),
    }
}

/// GET /api/fiscalia/ip - echo the caller address as seen by the server,
/// to debug reverse-proxy forwarding.
pub async fn ip_address(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: axum::http::HeaderMap,
) -> Json<serde_json::Value> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    Json(json!({
        "ip": addr.ip().to_string(),
        "x_forwarded_for": forwarded,
    }))
}
