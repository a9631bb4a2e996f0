use anyhow::Result;
use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode, UserId};

use crate::bot::{catalog, keyboards, message};
use crate::database::models::{EmailOrigin, TempEmail, User, EMAIL_TTL_MINUTES};
use crate::server::AppState;
use crate::services::subscription;
use crate::utils::html::escape_html;
use crate::utils::validation::validate_country_code;

const SUPPORT_TEXT: &str = "💬 <b>Support</b>\n\n\
     📧 Email: support@tempmail.com\n\
     💬 Telegram: @support_bot\n\
     ⏰ Around the clock";

/// Callback-query side of the webhook. Dispatches on `callback_data` and
/// always answers the query so the client stops showing the spinner.
pub async fn handle_callback(state: &AppState, q: &CallbackQuery) -> Result<()> {
    let telegram_id = q.from.id.0 as i64;
    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat.id)
        .unwrap_or(ChatId(telegram_id));
    let data = q.data.as_deref().unwrap_or_default();

    tracing::info!(
        "Callback '{}' from user {} in chat {}",
        data,
        telegram_id,
        chat_id
    );

    if let Some(setting) = data.strip_prefix("settings:") {
        handle_settings_callback(state, q, chat_id, telegram_id, setting).await?;
    } else if let Some(code) = data.strip_prefix("country_") {
        if validate_country_code(code).is_ok() {
            show_services(state, chat_id, code).await?;
        } else {
            tracing::warn!("Malformed country callback: {}", data);
        }
    } else if let Some(rest) = data.strip_prefix("service_") {
        match rest.split_once('_') {
            Some((country_code, service_code)) => {
                create_temp_email(state, chat_id, telegram_id, country_code, service_code)
                    .await?;
            }
            None => tracing::warn!("Malformed service callback: {}", data),
        }
    } else {
        match data {
            "create_email" => start_create_flow(state, chat_id, telegram_id).await?,
            "check_subscription" => check_subscription(state, chat_id, q.from.id).await?,
            "history" => show_history(state, chat_id, telegram_id).await?,
            "stats" => show_stats(state, chat_id, telegram_id).await?,
            "settings" => show_settings(state, chat_id, telegram_id).await?,
            "help" => {
                state
                    .bot
                    .send_message(chat_id, message::help_text())
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
            "support" => {
                state
                    .bot
                    .send_message(chat_id, SUPPORT_TEXT)
                    .parse_mode(ParseMode::Html)
                    .await?;
            }
            _ => tracing::debug!("Unhandled callback: {}", data),
        }
    }

    state.bot.answer_callback_query(q.id.clone()).await?;

    Ok(())
}

/// Entry into the create flow: subscribers get the country menu, everyone
/// else gets the subscribe prompt.
async fn start_create_flow(state: &AppState, chat_id: ChatId, telegram_id: i64) -> Result<()> {
    let user = User::find_by_telegram_id(&state.db.pool, telegram_id).await?;
    let is_subscribed = user.map(|u| u.is_subscribed).unwrap_or(false);

    if is_subscribed {
        show_countries(state, chat_id).await?;
    } else {
        state
            .bot
            .send_message(chat_id, "⚠️ Subscribe to our channel to use the bot:")
            .reply_markup(keyboards::subscribe_prompt(&state.config.required_channel))
            .await?;
    }

    Ok(())
}

async fn check_subscription(state: &AppState, chat_id: ChatId, user_id: UserId) -> Result<()> {
    let is_member =
        subscription::is_channel_member(&state.bot, &state.config.required_channel, user_id)
            .await;

    if is_member {
        User::set_subscribed(&state.db.pool, user_id.0 as i64, true).await?;
        state
            .bot
            .send_message(
                chat_id,
                "✅ Subscription confirmed! You can create addresses now.",
            )
            .await?;
        show_countries(state, chat_id).await?;
    } else {
        state
            .bot
            .send_message(
                chat_id,
                "❌ Subscription not found. Please join the channel first.",
            )
            .await?;
    }

    Ok(())
}

async fn show_countries(state: &AppState, chat_id: ChatId) -> Result<()> {
    state
        .bot
        .send_message(chat_id, "🌍 <b>Pick a country:</b>")
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::countries())
        .await?;

    Ok(())
}

async fn show_services(state: &AppState, chat_id: ChatId, country_code: &str) -> Result<()> {
    state
        .bot
        .send_message(chat_id, "📮 <b>Pick a mail service:</b>")
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::services(country_code))
        .await?;

    Ok(())
}

async fn create_temp_email(
    state: &AppState,
    chat_id: ChatId,
    telegram_id: i64,
    country_code: &str,
    service_code: &str,
) -> Result<()> {
    let Some(user) = User::find_by_telegram_id(&state.db.pool, telegram_id).await? else {
        state
            .bot
            .send_message(chat_id, "❌ User not found. Send /start first.")
            .await?;
        return Ok(());
    };

    let Some(service) = catalog::service_by_code(service_code) else {
        state
            .bot
            .send_message(chat_id, "❌ Unknown mail service.")
            .await?;
        return Ok(());
    };

    let country = catalog::country_by_code(country_code);
    let address = catalog::temp_address(telegram_id, service, Utc::now());
    let origin = EmailOrigin {
        country_code: Some(country_code.to_string()),
        country_name: country.map(|c| c.name.to_string()),
        country_flag: country.map(|c| c.flag.to_string()),
        service_name: Some(service.name.to_string()),
        service_emoji: Some(service.emoji.to_string()),
    };

    let email = TempEmail::create(&state.db.pool, user.id, &address, origin).await?;

    let text = format!(
        "✅ <b>Temporary address created!</b>\n\n\
         📧 <code>{}</code>\n\n\
         ⏰ Valid for {EMAIL_TTL_MINUTES} minutes\n\
         🔔 Verification codes will arrive here automatically",
        escape_html(&email.email)
    );

    state
        .bot
        .send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::after_email_created())
        .await?;

    Ok(())
}

async fn show_history(state: &AppState, chat_id: ChatId, telegram_id: i64) -> Result<()> {
    const EMPTY_TEXT: &str = "📭 <b>No history yet</b>\n\nCreate your first address!";

    let Some(user) = User::find_by_telegram_id(&state.db.pool, telegram_id).await? else {
        state
            .bot
            .send_message(chat_id, EMPTY_TEXT)
            .parse_mode(ParseMode::Html)
            .await?;
        return Ok(());
    };

    let emails = TempEmail::find_recent_by_user(&state.db.pool, user.id, 10).await?;
    if emails.is_empty() {
        state
            .bot
            .send_message(chat_id, EMPTY_TEXT)
            .parse_mode(ParseMode::Html)
            .await?;
        return Ok(());
    }

    let mut text = String::from("📜 <b>Recent addresses:</b>\n\n");
    for email in &emails {
        let status = if email.is_active() {
            "✅ Active"
        } else {
            "⏰ Expired"
        };
        let service = email.service_name.as_deref().unwrap_or("unknown");
        text.push_str(&format!(
            "📧 <code>{}</code>\n📮 {} | {}",
            escape_html(&email.email),
            escape_html(service),
            status
        ));
        if let Some(code) = &email.received_code {
            text.push_str(&format!("\n🔑 Code: <code>{}</code>", escape_html(code)));
        }
        text.push_str("\n\n");
    }

    state
        .bot
        .send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

pub async fn show_stats(state: &AppState, chat_id: ChatId, telegram_id: i64) -> Result<()> {
    let Some(user) = User::find_by_telegram_id(&state.db.pool, telegram_id).await? else {
        state
            .bot
            .send_message(chat_id, "📊 No stats yet. Send /start first.")
            .await?;
        return Ok(());
    };

    let stats = TempEmail::usage_stats(&state.db.pool, user.id).await?;
    let text = format!(
        "📊 <b>Your stats</b>\n\n\
         📧 Addresses created: {}\n\
         🌍 Countries used: {}\n\
         📮 Services used: {}",
        stats.total_emails, stats.countries_used, stats.services_used
    );

    state
        .bot
        .send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

async fn show_settings(state: &AppState, chat_id: ChatId, telegram_id: i64) -> Result<()> {
    let Some(user) = User::find_by_telegram_id(&state.db.pool, telegram_id).await? else {
        state
            .bot
            .send_message(chat_id, "⚙️ Settings unavailable. Send /start first.")
            .await?;
        return Ok(());
    };

    state
        .bot
        .send_message(chat_id, settings_text(&user))
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboards::settings_panel(&user))
        .await?;

    Ok(())
}

async fn handle_settings_callback(
    state: &AppState,
    q: &CallbackQuery,
    chat_id: ChatId,
    telegram_id: i64,
    setting: &str,
) -> Result<()> {
    match setting {
        "notifications" | "reminder" => {
            let Some(user) = User::find_by_telegram_id(&state.db.pool, telegram_id).await? else {
                return Ok(());
            };

            let (notifications_enabled, reminder_enabled) = if setting == "notifications" {
                (!user.notifications_enabled, user.reminder_enabled)
            } else {
                (user.notifications_enabled, !user.reminder_enabled)
            };

            User::update_settings(
                &state.db.pool,
                telegram_id,
                user.favorite_service.as_deref(),
                notifications_enabled,
                reminder_enabled,
            )
            .await?;

            // Re-render the panel in place so the toggle is visible immediately.
            if let Some(panel) = q.message.as_ref() {
                if let Some(updated) =
                    User::find_by_telegram_id(&state.db.pool, telegram_id).await?
                {
                    state
                        .bot
                        .edit_message_text(chat_id, panel.id, settings_text(&updated))
                        .parse_mode(ParseMode::Html)
                        .reply_markup(keyboards::settings_panel(&updated))
                        .await?;
                }
            }
        }
        "close" => {
            if let Some(panel) = q.message.as_ref() {
                state.bot.delete_message(chat_id, panel.id).await?;
            }
        }
        _ => tracing::debug!("Unhandled settings callback: {}", setting),
    }

    Ok(())
}

fn settings_text(user: &User) -> String {
    let on_off = |enabled: bool| if enabled { "on" } else { "off" };
    let favorite = user.favorite_service.as_deref().unwrap_or("not set");

    format!(
        "⚙️ <b>Your settings</b>\n\n\
         ⭐ Favorite service: {}\n\
         🔔 Notifications: {}\n\
         ⏰ Expiry reminder: {}\n\n\
         Tap a toggle to change it.",
        escape_html(favorite),
        on_off(user.notifications_enabled),
        on_off(user.reminder_enabled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_flags(notifications: bool, reminder: bool) -> User {
        User {
            id: 1,
            telegram_id: 42,
            username: None,
            first_name: None,
            is_subscribed: true,
            favorite_service: Some("ProtonMail".to_string()),
            notifications_enabled: notifications,
            reminder_enabled: reminder,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_settings_text_reflects_user() {
        let text = settings_text(&user_with_flags(true, false));
        assert!(text.contains("ProtonMail"));
        assert!(text.contains("🔔 Notifications: on"));
        assert!(text.contains("⏰ Expiry reminder: off"));
    }

    #[test]
    fn test_settings_text_without_favorite() {
        let mut user = user_with_flags(true, true);
        user.favorite_service = None;
        assert!(settings_text(&user).contains("not set"));
    }
}
