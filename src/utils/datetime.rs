use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

pub fn parse_rfc3339(input: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("invalid RFC 3339 timestamp '{input}': {e}"))
}

/// Unparseable timestamps count as past so a corrupt row reads as expired
/// rather than live.
pub fn is_past(timestamp: &str) -> bool {
    match parse_rfc3339(timestamp) {
        Ok(dt) => dt <= Utc::now(),
        Err(_) => true,
    }
}
