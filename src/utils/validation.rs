use anyhow::{anyhow, Result};

pub fn validate_telegram_user_id(user_id: i64) -> Result<()> {
    if user_id <= 0 {
        return Err(anyhow!("Telegram user ID must be positive"));
    }

    Ok(())
}

pub fn validate_telegram_chat_id(chat_id: i64) -> Result<()> {
    // Telegram chat IDs should be non-zero
    if chat_id == 0 {
        return Err(anyhow!("Chat ID cannot be zero"));
    }

    // Negative IDs can be:
    // - Group chats: small negative numbers like -12345
    // - Supergroups: very large negative numbers starting around -1000000000000
    // Reject extremely large negative numbers beyond Telegram's known ranges
    if chat_id < -2000000000000 {
        return Err(anyhow!("Chat ID out of valid range"));
    }

    Ok(())
}

pub fn validate_history_limit(limit: i64) -> Result<()> {
    if limit < 1 {
        return Err(anyhow!("History limit must be at least 1"));
    }

    if limit > 100 {
        return Err(anyhow!("History limit cannot exceed 100"));
    }

    Ok(())
}

pub fn validate_country_code(code: &str) -> Result<()> {
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(anyhow!("Country code must be two uppercase letters"));
    }

    Ok(())
}

pub fn validate_service_code(code: &str) -> Result<()> {
    if code.is_empty() {
        return Err(anyhow!("Service code cannot be empty"));
    }

    if code.len() > 20 {
        return Err(anyhow!("Service code cannot be longer than 20 characters"));
    }

    if !code.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
        return Err(anyhow!("Service code can only contain lowercase letters and digits"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_telegram_user_id_valid() {
        assert!(validate_telegram_user_id(1).is_ok());
        assert!(validate_telegram_user_id(987654321).is_ok());
    }

    #[test]
    fn test_validate_telegram_user_id_invalid() {
        assert!(validate_telegram_user_id(0).is_err());
        assert!(validate_telegram_user_id(-42).is_err());
    }

    #[test]
    fn test_validate_telegram_chat_id_valid() {
        // Private chat (positive)
        assert!(validate_telegram_chat_id(12345).is_ok());

        // Group chat (negative)
        assert!(validate_telegram_chat_id(-12345).is_ok());

        // Super group (very negative)
        assert!(validate_telegram_chat_id(-1001234567890).is_ok());
    }

    #[test]
    fn test_validate_telegram_chat_id_invalid() {
        assert!(validate_telegram_chat_id(0).is_err());
        assert!(validate_telegram_chat_id(-3000000000000).is_err());
    }

    #[test]
    fn test_validate_history_limit() {
        assert!(validate_history_limit(1).is_ok());
        assert!(validate_history_limit(10).is_ok());
        assert!(validate_history_limit(100).is_ok());

        assert!(validate_history_limit(0).is_err());
        assert!(validate_history_limit(-5).is_err());
        assert!(validate_history_limit(101).is_err());
    }

    #[test]
    fn test_validate_country_code() {
        assert!(validate_country_code("RU").is_ok());
        assert!(validate_country_code("US").is_ok());

        assert!(validate_country_code("").is_err());
        assert!(validate_country_code("R").is_err());
        assert!(validate_country_code("RUS").is_err());
        assert!(validate_country_code("ru").is_err());
        assert!(validate_country_code("R1").is_err());
    }

    #[test]
    fn test_validate_service_code() {
        assert!(validate_service_code("yandex").is_ok());
        assert!(validate_service_code("mailru").is_ok());
        assert!(validate_service_code("proton").is_ok());

        assert!(validate_service_code("").is_err());
        assert!(validate_service_code("Yandex").is_err());
        assert!(validate_service_code("mail.ru").is_err());
        assert!(validate_service_code("mail_ru").is_err());
        assert!(validate_service_code(&"a".repeat(21)).is_err());
    }
}
