use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{EmailOrigin, TempEmail, User};
use crate::server::{AppError, AppState};
use crate::utils::validation::{validate_history_limit, validate_telegram_user_id};

fn default_true() -> bool {
    true
}

fn default_history_limit() -> i64 {
    10
}

/// Everything the management endpoint accepts, discriminated by the
/// `action` field of the JSON body.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ApiRequest {
    CreateUser {
        telegram_id: i64,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        first_name: Option<String>,
    },
    UpdateSubscription {
        telegram_id: i64,
        #[serde(default = "default_true")]
        is_subscribed: bool,
    },
    CreateEmail {
        telegram_id: i64,
        email: String,
        #[serde(default)]
        country_code: Option<String>,
        #[serde(default)]
        country_name: Option<String>,
        #[serde(default)]
        country_flag: Option<String>,
        #[serde(default)]
        service_name: Option<String>,
        #[serde(default)]
        service_emoji: Option<String>,
    },
    UpdateCode {
        email_id: i64,
        code: String,
    },
    GetHistory {
        telegram_id: i64,
        #[serde(default = "default_history_limit")]
        limit: i64,
    },
    GetStats {
        telegram_id: i64,
    },
    UpdateSettings {
        telegram_id: i64,
        #[serde(default)]
        favorite_service: Option<String>,
        #[serde(default = "default_true")]
        notifications_enabled: bool,
        #[serde(default = "default_true")]
        reminder_enabled: bool,
    },
}

type ApiResponse = Result<(StatusCode, Json<Value>), AppError>;

/// Management API entry point: one POST route, one action per request.
pub async fn handle_api(State(state): State<AppState>, body: String) -> ApiResponse {
    let raw: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => return Ok(bad_request("invalid JSON body")),
    };

    let request: ApiRequest = match serde_json::from_value(raw) {
        Ok(request) => request,
        Err(_) => return Ok(bad_request("unknown action")),
    };

    match request {
        ApiRequest::CreateUser {
            telegram_id,
            username,
            first_name,
        } => create_user(&state, telegram_id, username, first_name).await,
        ApiRequest::UpdateSubscription {
            telegram_id,
            is_subscribed,
        } => update_subscription(&state, telegram_id, is_subscribed).await,
        ApiRequest::CreateEmail {
            telegram_id,
            email,
            country_code,
            country_name,
            country_flag,
            service_name,
            service_emoji,
        } => {
            let origin = EmailOrigin {
                country_code,
                country_name,
                country_flag,
                service_name,
                service_emoji,
            };
            create_email(&state, telegram_id, &email, origin).await
        }
        ApiRequest::UpdateCode { email_id, code } => update_code(&state, email_id, &code).await,
        ApiRequest::GetHistory { telegram_id, limit } => {
            get_history(&state, telegram_id, limit).await
        }
        ApiRequest::GetStats { telegram_id } => get_stats(&state, telegram_id).await,
        ApiRequest::UpdateSettings {
            telegram_id,
            favorite_service,
            notifications_enabled,
            reminder_enabled,
        } => {
            update_settings(
                &state,
                telegram_id,
                favorite_service.as_deref(),
                notifications_enabled,
                reminder_enabled,
            )
            .await
        }
    }
}

async fn create_user(
    state: &AppState,
    telegram_id: i64,
    username: Option<String>,
    first_name: Option<String>,
) -> ApiResponse {
    if let Err(e) = validate_telegram_user_id(telegram_id) {
        return Ok(bad_request(&e.to_string()));
    }

    let user = User::upsert(
        &state.db.pool,
        telegram_id,
        username.as_deref(),
        first_name.as_deref(),
    )
    .await?;

    Ok(ok_json(json!({
        "success": true,
        "user": {
            "id": user.id,
            "telegram_id": user.telegram_id,
            "is_subscribed": user.is_subscribed,
        },
    })))
}

async fn update_subscription(
    state: &AppState,
    telegram_id: i64,
    is_subscribed: bool,
) -> ApiResponse {
    let updated = User::set_subscribed(&state.db.pool, telegram_id, is_subscribed).await?;

    Ok(ok_json(json!({ "success": true, "updated": updated })))
}

async fn create_email(
    state: &AppState,
    telegram_id: i64,
    email: &str,
    origin: EmailOrigin,
) -> ApiResponse {
    let Some(user) = User::find_by_telegram_id(&state.db.pool, telegram_id).await? else {
        return Ok(not_found("user not found"));
    };

    let created = TempEmail::create(&state.db.pool, user.id, email, origin).await?;

    Ok(ok_json(json!({
        "success": true,
        "email": {
            "id": created.id,
            "email": created.email,
            "created_at": created.created_at,
            "expires_at": created.expires_at,
        },
    })))
}

async fn update_code(state: &AppState, email_id: i64, code: &str) -> ApiResponse {
    let Some(email) = TempEmail::set_received_code(&state.db.pool, email_id, code).await? else {
        return Ok(not_found("email not found"));
    };

    Ok(ok_json(json!({
        "success": true,
        "email": {
            "id": email.id,
            "email": email.email,
            "code": email.received_code,
        },
    })))
}

async fn get_history(state: &AppState, telegram_id: i64, limit: i64) -> ApiResponse {
    if let Err(e) = validate_history_limit(limit) {
        return Ok(bad_request(&e.to_string()));
    }

    let Some(user) = User::find_by_telegram_id(&state.db.pool, telegram_id).await? else {
        return Ok(not_found("user not found"));
    };

    let emails = TempEmail::find_recent_by_user(&state.db.pool, user.id, limit).await?;

    Ok(ok_json(json!({ "success": true, "emails": emails })))
}

async fn get_stats(state: &AppState, telegram_id: i64) -> ApiResponse {
    let Some(user) = User::find_by_telegram_id(&state.db.pool, telegram_id).await? else {
        return Ok(not_found("user not found"));
    };

    let stats = TempEmail::usage_stats(&state.db.pool, user.id).await?;

    Ok(ok_json(json!({ "success": true, "stats": stats })))
}

async fn update_settings(
    state: &AppState,
    telegram_id: i64,
    favorite_service: Option<&str>,
    notifications_enabled: bool,
    reminder_enabled: bool,
) -> ApiResponse {
    let updated = User::update_settings(
        &state.db.pool,
        telegram_id,
        favorite_service,
        notifications_enabled,
        reminder_enabled,
    )
    .await?;

    Ok(ok_json(json!({ "success": true, "updated": updated })))
}

fn ok_json(body: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(body))
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_dispatch_parses_known_actions() {
        let request: ApiRequest = serde_json::from_value(json!({
            "action": "create_user",
            "telegram_id": 42,
            "username": "alice",
        }))
        .unwrap();
        assert!(matches!(request, ApiRequest::CreateUser { telegram_id: 42, .. }));

        let request: ApiRequest = serde_json::from_value(json!({
            "action": "get_history",
            "telegram_id": 42,
        }))
        .unwrap();
        match request {
            ApiRequest::GetHistory { limit, .. } => assert_eq!(limit, 10),
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_action_dispatch_defaults() {
        let request: ApiRequest = serde_json::from_value(json!({
            "action": "update_subscription",
            "telegram_id": 42,
        }))
        .unwrap();
        match request {
            ApiRequest::UpdateSubscription { is_subscribed, .. } => assert!(is_subscribed),
            other => panic!("unexpected request: {other:?}"),
        }

        let request: ApiRequest = serde_json::from_value(json!({
            "action": "update_settings",
            "telegram_id": 42,
        }))
        .unwrap();
        match request {
            ApiRequest::UpdateSettings {
                favorite_service,
                notifications_enabled,
                reminder_enabled,
                ..
            } => {
                assert!(favorite_service.is_none());
                assert!(notifications_enabled);
                assert!(reminder_enabled);
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_action_dispatch_rejects_unknown_action() {
        let result: Result<ApiRequest, _> = serde_json::from_value(json!({
            "action": "drop_tables",
            "telegram_id": 42,
        }));
        assert!(result.is_err());

        let result: Result<ApiRequest, _> = serde_json::from_value(json!({
            "telegram_id": 42,
        }));
        assert!(result.is_err());
    }
}
