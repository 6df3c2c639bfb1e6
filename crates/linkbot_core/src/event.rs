//! Typed platform events and the outbound platform boundary.
//!
//! The Discord adapter converts SDK payloads into [`BotEvent`]s at the
//! boundary, so the router dispatches over a closed set of variants
//! instead of dynamically-shaped objects. All outbound calls go through
//! [`ChatPlatform`] and return explicit errors; a failure aborts the
//! current event only, never the process.

use async_trait::async_trait;

use crate::error::PlatformError;

/// A user as the platform reports them at event time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    /// Stable platform-assigned id.
    pub id: u64,
    /// Display identity at this instant; owned by the platform, not
    /// guaranteed stable across events.
    pub username: String,
}

/// A guild the bot is joined to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRef {
    pub id: u64,
    pub name: String,
}

/// Where a message was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageScope {
    /// One-on-one DM channel.
    Direct,
    /// A guild text channel.
    Guild { guild_id: u64 },
}

/// Author lookup result for a fetched message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAuthor {
    pub user: UserRef,
    /// Whether the message was authored by the bot itself.
    pub is_self: bool,
}

/// Inbound events, one per gateway callback the bot cares about. Anything
/// else the platform delivers is dropped at the adapter.
#[derive(Debug, Clone)]
pub enum BotEvent {
    /// Gateway handshake completed.
    Connected { bot: UserRef, guilds: Vec<GuildRef> },
    /// A message arrived in a DM or guild channel.
    MessageReceived {
        author: UserRef,
        /// Authored by the bot itself (always ignored).
        from_self: bool,
        scope: MessageScope,
        channel_id: u64,
        message_id: u64,
        content: String,
    },
    /// A reaction was added to some message.
    ReactionAdded {
        channel_id: u64,
        message_id: u64,
        user_id: u64,
    },
}

/// Outbound calls the router makes back into the chat platform.
///
/// No retries and no timeouts at this boundary; calls are awaited
/// unconditionally and an error aborts the current event's handling.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Send `content` to a user's DM channel.
    async fn send_direct_message(&self, user_id: u64, content: &str) -> Result<(), PlatformError>;

    /// Reply in-place to an existing message.
    async fn reply(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &str,
    ) -> Result<(), PlatformError>;

    /// Fetch a message and report its author.
    async fn message_author(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<MessageAuthor, PlatformError>;

    /// Fetch a user by id.
    async fn fetch_user(&self, user_id: u64) -> Result<UserRef, PlatformError>;
}
