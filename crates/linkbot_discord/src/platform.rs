//! serenity-backed implementation of the core platform boundary.

use async_trait::async_trait;
use linkbot_core::{ChatPlatform, MessageAuthor, PlatformError, UserRef};
use serenity::all::{ChannelId, CreateMessage, Http, MessageId, User, UserId};

/// [`ChatPlatform`] over serenity's HTTP client.
///
/// Built per event from the handler context; `bot_id` is the bot's own
/// user id, used to recognize its own messages.
pub struct SerenityPlatform<'a> {
    http: &'a Http,
    bot_id: UserId,
}

impl<'a> SerenityPlatform<'a> {
    pub fn new(http: &'a Http, bot_id: UserId) -> Self {
        Self { http, bot_id }
    }
}

#[async_trait]
impl ChatPlatform for SerenityPlatform<'_> {
    async fn send_direct_message(&self, user_id: u64, content: &str) -> Result<(), PlatformError> {
        let channel = UserId::new(user_id)
            .create_dm_channel(self.http)
            .await
            .map_err(|e| PlatformError::Deliver {
                recipient: user_id,
                cause: e.to_string(),
            })?;
        channel
            .id
            .say(self.http, content)
            .await
            .map_err(|e| PlatformError::Deliver {
                recipient: user_id,
                cause: e.to_string(),
            })?;
        Ok(())
    }

    async fn reply(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &str,
    ) -> Result<(), PlatformError> {
        let channel = ChannelId::new(channel_id);
        let reply = CreateMessage::new()
            .content(content)
            .reference_message((channel, MessageId::new(message_id)));
        channel
            .send_message(self.http, reply)
            .await
            .map_err(|e| PlatformError::Deliver {
                recipient: channel_id,
                cause: e.to_string(),
            })?;
        Ok(())
    }

    async fn message_author(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<MessageAuthor, PlatformError> {
        let message = self
            .http
            .get_message(ChannelId::new(channel_id), MessageId::new(message_id))
            .await
            .map_err(|e| PlatformError::Fetch {
                what: "message",
                id: message_id,
                cause: e.to_string(),
            })?;
        Ok(MessageAuthor {
            is_self: message.author.id == self.bot_id,
            user: user_ref(&message.author),
        })
    }

    async fn fetch_user(&self, user_id: u64) -> Result<UserRef, PlatformError> {
        let user = self
            .http
            .get_user(UserId::new(user_id))
            .await
            .map_err(|e| PlatformError::Fetch {
                what: "user",
                id: user_id,
                cause: e.to_string(),
            })?;
        Ok(user_ref(&user))
    }
}

/// Project a serenity user into the core's identity snapshot, using the
/// `name#discriminator` tag as the display identity.
pub(crate) fn user_ref(user: &User) -> UserRef {
    UserRef {
        id: user.id.get(),
        username: user.tag(),
    }
}
