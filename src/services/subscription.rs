use teloxide::prelude::*;
use teloxide::types::{ChatMemberStatus, Recipient, UserId};

/// Asks the Bot API whether the user belongs to the required channel.
/// API failures (bot not admin, channel renamed) count as not subscribed.
pub async fn is_channel_member(bot: &Bot, channel: &str, user_id: UserId) -> bool {
    let recipient = Recipient::ChannelUsername(channel.to_string());
    match bot.get_chat_member(recipient, user_id).await {
        Ok(member) => counts_as_subscribed(member.status()),
        Err(e) => {
            tracing::warn!("getChatMember for {} failed: {}", channel, e);
            false
        }
    }
}

pub fn counts_as_subscribed(status: ChatMemberStatus) -> bool {
    matches!(
        status,
        ChatMemberStatus::Member | ChatMemberStatus::Administrator | ChatMemberStatus::Owner
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_as_subscribed() {
        assert!(counts_as_subscribed(ChatMemberStatus::Member));
        assert!(counts_as_subscribed(ChatMemberStatus::Administrator));
        assert!(counts_as_subscribed(ChatMemberStatus::Owner));

        assert!(!counts_as_subscribed(ChatMemberStatus::Left));
        assert!(!counts_as_subscribed(ChatMemberStatus::Banned));
        assert!(!counts_as_subscribed(ChatMemberStatus::Restricted));
    }
}
