use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

use crate::bot::catalog::{COUNTRIES, SERVICES};
use crate::database::models::User;

/// Main menu shown on /start.
pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("📧 Create email", "create_email"),
            InlineKeyboardButton::callback("📜 History", "history"),
        ],
        vec![
            InlineKeyboardButton::callback("📊 Stats", "stats"),
            InlineKeyboardButton::callback("⚙️ Settings", "settings"),
        ],
        vec![
            InlineKeyboardButton::callback("📖 How it works", "help"),
            InlineKeyboardButton::callback("💬 Support", "support"),
        ],
    ])
}

/// Country picker, two per row.
pub fn countries() -> InlineKeyboardMarkup {
    let rows = COUNTRIES
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|c| {
                    InlineKeyboardButton::callback(
                        format!("{} {}", c.flag, c.name),
                        format!("country_{}", c.code),
                    )
                })
                .collect()
        })
        .collect::<Vec<Vec<_>>>();

    InlineKeyboardMarkup::new(rows)
}

/// Service picker for a chosen country, one per row, with a back button.
pub fn services(country_code: &str) -> InlineKeyboardMarkup {
    let mut rows = SERVICES
        .iter()
        .map(|s| {
            vec![InlineKeyboardButton::callback(
                format!("{} {}", s.emoji, s.name),
                format!("service_{}_{}", country_code, s.code),
            )]
        })
        .collect::<Vec<Vec<_>>>();

    rows.push(vec![InlineKeyboardButton::callback("🔙 Back", "create_email")]);

    InlineKeyboardMarkup::new(rows)
}

/// Prompt shown to unsubscribed users before they can create addresses.
pub fn subscribe_prompt(channel: &str) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();

    let link = format!("https://t.me/{}", channel.trim_start_matches('@'));
    if let Ok(link) = Url::parse(&link) {
        rows.push(vec![InlineKeyboardButton::url("✅ Subscribe to the channel", link)]);
    }
    rows.push(vec![InlineKeyboardButton::callback(
        "🔄 Check subscription",
        "check_subscription",
    )]);

    InlineKeyboardMarkup::new(rows)
}

/// Follow-up actions after an address was issued.
pub fn after_email_created() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("📜 History", "history"),
        InlineKeyboardButton::callback("🔄 Create another", "create_email"),
    ]])
}

/// Per-user settings panel with toggle buttons reflecting current state.
pub fn settings_panel(user: &User) -> InlineKeyboardMarkup {
    let notifications = if user.notifications_enabled {
        "🔔 Notifications: on"
    } else {
        "🔕 Notifications: off"
    };
    let reminder = if user.reminder_enabled {
        "⏰ Expiry reminder: on"
    } else {
        "💤 Expiry reminder: off"
    };

    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(notifications, "settings:notifications")],
        vec![InlineKeyboardButton::callback(reminder, "settings:reminder")],
        vec![InlineKeyboardButton::callback("❌ Close", "settings:close")],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn callback_data(button: &InlineKeyboardButton) -> &str {
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => data,
            other => panic!("expected callback button, got {other:?}"),
        }
    }

    #[test]
    fn test_main_menu_layout() {
        let menu = main_menu();
        assert_eq!(menu.inline_keyboard.len(), 3);
        assert_eq!(callback_data(&menu.inline_keyboard[0][0]), "create_email");
        assert_eq!(callback_data(&menu.inline_keyboard[1][1]), "settings");
    }

    #[test]
    fn test_countries_two_per_row() {
        let keyboard = countries();
        assert_eq!(keyboard.inline_keyboard.len(), 4);
        for row in &keyboard.inline_keyboard {
            assert_eq!(row.len(), 2);
        }
        assert_eq!(callback_data(&keyboard.inline_keyboard[0][0]), "country_RU");
    }

    #[test]
    fn test_services_rows_and_back_button() {
        let keyboard = services("DE");
        // One row per service plus the back row.
        assert_eq!(keyboard.inline_keyboard.len(), 7);
        assert_eq!(
            callback_data(&keyboard.inline_keyboard[0][0]),
            "service_DE_yandex"
        );
        let last = keyboard.inline_keyboard.last().unwrap();
        assert_eq!(callback_data(&last[0]), "create_email");
    }

    #[test]
    fn test_subscribe_prompt_has_url_and_check() {
        let keyboard = subscribe_prompt("@zidesing");
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        match &keyboard.inline_keyboard[0][0].kind {
            InlineKeyboardButtonKind::Url(link) => {
                assert_eq!(link.as_str(), "https://t.me/zidesing");
            }
            other => panic!("expected url button, got {other:?}"),
        }
        assert_eq!(
            callback_data(&keyboard.inline_keyboard[1][0]),
            "check_subscription"
        );
    }

    #[test]
    fn test_settings_panel_reflects_flags() {
        let user = User {
            id: 1,
            telegram_id: 42,
            username: None,
            first_name: None,
            is_subscribed: true,
            favorite_service: None,
            notifications_enabled: true,
            reminder_enabled: false,
            created_at: String::new(),
            updated_at: String::new(),
        };

        let keyboard = settings_panel(&user);
        assert!(keyboard.inline_keyboard[0][0].text.contains("on"));
        assert!(keyboard.inline_keyboard[1][0].text.contains("off"));
        assert_eq!(callback_data(&keyboard.inline_keyboard[2][0]), "settings:close");
    }
}
