use chrono::{DateTime, Utc};

/// A country selectable from the country menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

/// A mail service selectable from the service menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MailService {
    pub code: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
}

pub const COUNTRIES: &[Country] = &[
    Country { code: "RU", name: "Russia", flag: "🇷🇺" },
    Country { code: "US", name: "United States", flag: "🇺🇸" },
    Country { code: "DE", name: "Germany", flag: "🇩🇪" },
    Country { code: "FR", name: "France", flag: "🇫🇷" },
    Country { code: "GB", name: "United Kingdom", flag: "🇬🇧" },
    Country { code: "JP", name: "Japan", flag: "🇯🇵" },
    Country { code: "CA", name: "Canada", flag: "🇨🇦" },
    Country { code: "AU", name: "Australia", flag: "🇦🇺" },
];

pub const SERVICES: &[MailService] = &[
    MailService { code: "yandex", name: "Yandex", emoji: "🟡" },
    MailService { code: "mailru", name: "Mail.ru", emoji: "🔵" },
    MailService { code: "yahoo", name: "Yahoo", emoji: "🟣" },
    MailService { code: "proton", name: "ProtonMail", emoji: "🟢" },
    MailService { code: "gmail", name: "Gmail", emoji: "🔴" },
    MailService { code: "tuta", name: "Tuta", emoji: "🟠" },
];

pub fn country_by_code(code: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|c| c.code == code)
}

pub fn service_by_code(code: &str) -> Option<&'static MailService> {
    SERVICES.iter().find(|s| s.code == code)
}

/// Disposable address issued to a user for a service, unique per second.
pub fn temp_address(telegram_id: i64, service: &MailService, at: DateTime<Utc>) -> String {
    format!("temp{}_{}@{}.com", telegram_id, at.timestamp(), service.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(COUNTRIES.len(), 8);
        assert_eq!(SERVICES.len(), 6);
    }

    #[test]
    fn test_country_by_code() {
        let ru = country_by_code("RU").unwrap();
        assert_eq!(ru.name, "Russia");
        assert_eq!(ru.flag, "🇷🇺");

        assert!(country_by_code("XX").is_none());
        assert!(country_by_code("ru").is_none());
    }

    #[test]
    fn test_service_by_code() {
        let yandex = service_by_code("yandex").unwrap();
        assert_eq!(yandex.name, "Yandex");

        assert!(service_by_code("hotmail").is_none());
    }

    #[test]
    fn test_temp_address_format() {
        let at = Utc::now();
        let service = service_by_code("proton").unwrap();
        let address = temp_address(42, service, at);
        assert_eq!(address, format!("temp42_{}@proton.com", at.timestamp()));
    }

    #[test]
    fn test_catalog_codes_are_wire_safe() {
        use crate::utils::validation::{validate_country_code, validate_service_code};

        // Codes travel inside callback_data; keep them within the charsets
        // the dispatcher validates against.
        for country in COUNTRIES {
            assert!(validate_country_code(country.code).is_ok());
        }
        for service in SERVICES {
            assert!(validate_service_code(service.code).is_ok());
        }
    }
}
