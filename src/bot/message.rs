use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::{callback, keyboards};
use crate::database::models::{User, EMAIL_TTL_MINUTES};
use crate::server::AppState;
use crate::utils::validation::validate_telegram_chat_id;

/// Text-message side of the webhook. The sender is upserted before any
/// command runs so every user who talks to the bot exists in the store.
pub async fn handle_message(state: &AppState, msg: &Message) -> Result<()> {
    let Some(from) = msg.from() else {
        return Ok(());
    };

    if let Err(e) = validate_telegram_chat_id(msg.chat.id.0) {
        tracing::warn!("Dropping message from chat {}: {}", msg.chat.id, e);
        return Ok(());
    }

    let telegram_id = from.id.0 as i64;
    User::upsert(
        &state.db.pool,
        telegram_id,
        from.username.as_deref(),
        Some(from.first_name.as_str()),
    )
    .await?;

    let text = msg.text().unwrap_or_default();
    tracing::info!(
        "Message '{}' from user {} in chat {}",
        text,
        telegram_id,
        msg.chat.id
    );

    match text {
        "/start" => {
            state
                .bot
                .send_message(msg.chat.id, welcome_text())
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboards::main_menu())
                .await?;
        }
        "/help" => {
            state
                .bot
                .send_message(msg.chat.id, help_text())
                .parse_mode(ParseMode::Html)
                .await?;
        }
        "/stats" => {
            callback::show_stats(state, msg.chat.id, telegram_id).await?;
        }
        // Anything else is just recorded by the upsert above.
        _ => {}
    }

    Ok(())
}

pub fn welcome_text() -> String {
    format!(
        "🚀 <b>Welcome to the disposable email bot!</b>\n\n\
         📧 Create temporary addresses for safe sign-ups\n\
         ⏰ Each address works for {EMAIL_TTL_MINUTES} minutes\n\
         🔒 Nothing ties back to your real inbox\n\n\
         Pick an action:"
    )
}

pub fn help_text() -> String {
    format!(
        "📖 <b>How it works</b>\n\n\
         1️⃣ Tap 'Create email'\n\
         2️⃣ Pick a country\n\
         3️⃣ Pick a mail service\n\
         4️⃣ Grab the temporary address\n\
         5️⃣ Verification codes arrive here automatically\n\n\
         ⚠️ The address expires {EMAIL_TTL_MINUTES} minutes after creation"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texts_mention_ttl() {
        assert!(welcome_text().contains("15 minutes"));
        assert!(help_text().contains("15 minutes"));
    }
}
