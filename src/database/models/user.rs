use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub is_subscribed: bool,
    pub favorite_service: Option<String>,
    pub notifications_enabled: bool,
    pub reminder_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

const USER_COLUMNS: &str = "id, telegram_id, username, first_name, is_subscribed, \
     favorite_service, notifications_enabled, reminder_enabled, created_at, updated_at";

impl User {
    /// Insert-or-update keyed on `telegram_id`. Only the profile fields and
    /// `updated_at` change on conflict; subscription state and settings survive.
    pub async fn upsert(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
        username: Option<&str>,
        first_name: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO users (telegram_id, username, first_name, is_subscribed,
                               notifications_enabled, reminder_enabled, created_at, updated_at)
            VALUES (?, ?, ?, 0, 1, 1, ?, ?)
            ON CONFLICT(telegram_id)
            DO UPDATE SET username = excluded.username,
                          first_name = excluded.first_name,
                          updated_at = excluded.updated_at
            "#,
        )
        .bind(telegram_id)
        .bind(username)
        .bind(first_name)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::find_by_telegram_id(pool, telegram_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_telegram_id(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE telegram_id = ?"
        ))
        .bind(telegram_id)
        .fetch_optional(pool)
        .await
    }

    /// Returns false when no user with that telegram id exists.
    pub async fn set_subscribed(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
        is_subscribed: bool,
    ) -> Result<bool, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE users SET is_subscribed = ?, updated_at = ? WHERE telegram_id = ?",
        )
        .bind(is_subscribed)
        .bind(&now)
        .bind(telegram_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns false when no user with that telegram id exists.
    pub async fn update_settings(
        pool: &sqlx::SqlitePool,
        telegram_id: i64,
        favorite_service: Option<&str>,
        notifications_enabled: bool,
        reminder_enabled: bool,
    ) -> Result<bool, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET favorite_service = ?,
                notifications_enabled = ?,
                reminder_enabled = ?,
                updated_at = ?
            WHERE telegram_id = ?
            "#,
        )
        .bind(favorite_service)
        .bind(notifications_enabled)
        .bind(reminder_enabled)
        .bind(&now)
        .bind(telegram_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
