use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use teloxide::Bot;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api;
use crate::bot::webhook;
use crate::config::Config;
use crate::database::connection::DatabaseManager;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseManager,
    pub bot: Bot,
    pub config: Config,
}

/// Handler failures become `500 {"error": ...}`, the contract both the
/// management API and the webhook expose to their callers.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// The whole surface: management API, Telegram webhook, health probes.
/// The CORS layer also answers the OPTIONS preflights.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api", post(api::handle_api))
        .route("/webhook", post(webhook::handle_update))
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .route("/health/live", get(liveness_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub database: DatabaseHealth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub response_time_ms: u64,
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let start = std::time::Instant::now();

    let db_healthy = test_database_connection(&state.db).await.is_ok();
    let response_time_ms = start.elapsed().as_millis() as u64;

    let status = if db_healthy { "healthy" } else { "unhealthy" };
    let health_response = HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            status: status.to_string(),
            response_time_ms,
        },
    };

    if db_healthy {
        Ok(Json(health_response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

async fn readiness_check(State(state): State<AppState>) -> Result<Json<&'static str>, StatusCode> {
    match test_database_connection(&state.db).await {
        Ok(_) => Ok(Json("ready")),
        Err(_) => Err(StatusCode::SERVICE_UNAVAILABLE),
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}

async fn test_database_connection(db: &DatabaseManager) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(&db.pool).await?;

    Ok(())
}
