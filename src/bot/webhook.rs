use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use teloxide::types::{Update, UpdateKind};

use crate::bot::{callback, message};
use crate::server::{AppError, AppState};

/// Entry point for Telegram webhook deliveries.
///
/// Message and callback updates are handled; every other kind is
/// acknowledged with `{"ok": true}` so Telegram does not redeliver it.
pub async fn handle_update(
    State(state): State<AppState>,
    Json(update): Json<Update>,
) -> Result<Json<Value>, AppError> {
    match update.kind {
        UpdateKind::Message(msg) => message::handle_message(&state, &msg).await?,
        UpdateKind::CallbackQuery(q) => callback::handle_callback(&state, &q).await?,
        _ => tracing::debug!("Ignoring update {}", update.id),
    }

    Ok(Json(json!({ "ok": true })))
}
