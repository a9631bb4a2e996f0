use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::datetime::is_past;

/// Issued addresses stop receiving codes this long after creation.
pub const EMAIL_TTL_MINUTES: i64 = 15;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TempEmail {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub country_flag: Option<String>,
    pub service_name: Option<String>,
    pub service_emoji: Option<String>,
    pub received_code: Option<String>,
    pub created_at: String,
    pub expires_at: String,
    pub is_archived: bool,
}

/// Country/service metadata recorded with an issued address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailOrigin {
    pub country_code: Option<String>,
    pub country_name: Option<String>,
    pub country_flag: Option<String>,
    pub service_name: Option<String>,
    pub service_emoji: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ServiceUsage {
    pub name: Option<String>,
    pub emoji: Option<String>,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_emails: i64,
    pub countries_used: i64,
    pub services_used: i64,
    pub popular_services: Vec<ServiceUsage>,
}

const EMAIL_COLUMNS: &str = "id, user_id, email, country_code, country_name, country_flag, \
     service_name, service_emoji, received_code, created_at, expires_at, is_archived";

impl TempEmail {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        email: &str,
        origin: EmailOrigin,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        let created_at = now.to_rfc3339();
        let expires_at = (now + Duration::minutes(EMAIL_TTL_MINUTES)).to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO temp_emails
            (user_id, email, country_code, country_name, country_flag,
             service_name, service_emoji, created_at, expires_at, is_archived)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(&origin.country_code)
        .bind(&origin.country_name)
        .bind(&origin.country_flag)
        .bind(&origin.service_name)
        .bind(&origin.service_emoji)
        .bind(&created_at)
        .bind(&expires_at)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, result.last_insert_rowid())
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TempEmail>(&format!(
            "SELECT {EMAIL_COLUMNS} FROM temp_emails WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Records the verification code that arrived for this address.
    /// Returns None when the id is unknown.
    pub async fn set_received_code(
        pool: &sqlx::SqlitePool,
        id: i64,
        code: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let result = sqlx::query("UPDATE temp_emails SET received_code = ? WHERE id = ?")
            .bind(code)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::find_by_id(pool, id).await
    }

    /// Newest first. The id tie-break keeps ordering stable for rows
    /// created within the same second.
    pub async fn find_recent_by_user(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TempEmail>(&format!(
            "SELECT {EMAIL_COLUMNS} FROM temp_emails \
             WHERE user_id = ? ORDER BY created_at DESC, id DESC LIMIT ?"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn usage_stats(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<UsageStats, sqlx::Error> {
        let (total_emails, countries_used, services_used) =
            sqlx::query_as::<_, (i64, i64, i64)>(
                r#"
                SELECT COUNT(*),
                       COUNT(DISTINCT country_code),
                       COUNT(DISTINCT service_name)
                FROM temp_emails
                WHERE user_id = ?
                "#,
            )
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        let popular_services = sqlx::query_as::<_, ServiceUsage>(
            r#"
            SELECT service_name AS name, service_emoji AS emoji, COUNT(*) AS count
            FROM temp_emails
            WHERE user_id = ?
            GROUP BY service_name, service_emoji
            ORDER BY count DESC
            LIMIT 3
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(UsageStats {
            total_emails,
            countries_used,
            services_used,
            popular_services,
        })
    }

    /// Expiry is advisory: rows stay in the table and this is checked at
    /// display time.
    pub fn is_active(&self) -> bool {
        !is_past(&self.expires_at)
    }
}
