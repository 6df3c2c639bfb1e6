//! Event dispatch: platform triggers to token issuance, audit, and replies.

use crate::audit::{AuditLog, LogChannel};
use crate::config::BotConfig;
use crate::error::RouterError;
use crate::event::{BotEvent, ChatPlatform, GuildRef, MessageScope, UserRef};
use crate::link::LinkBuilder;
use crate::token::TokenGenerator;

/// Phrase that, posted in a guild by the privileged user, makes the bot
/// post the public invitation-to-react message.
pub const MAGIC_TRIGGER: &str = "Take it away, Link Bot!";

/// Stateless dispatcher over [`BotEvent`]s.
///
/// Holds the validated configuration and the issuing collaborators,
/// injected once at startup. Carries no per-event state; the only shared
/// resource is the audit log, which serializes its own appends.
#[derive(Debug)]
pub struct EventRouter {
    config: BotConfig,
    tokens: TokenGenerator,
    links: LinkBuilder,
    audit: AuditLog,
}

impl EventRouter {
    pub fn new(config: BotConfig, audit: AuditLog) -> Self {
        Self {
            config,
            tokens: TokenGenerator::new(),
            links: LinkBuilder::new(),
            audit,
        }
    }

    /// Handle one inbound event to completion.
    ///
    /// An error aborts this event only; the caller decides how to surface
    /// it (the Discord adapter logs it and moves on). Events that match
    /// no trigger are a silent no-op.
    pub async fn handle(
        &self,
        event: BotEvent,
        platform: &dyn ChatPlatform,
    ) -> Result<(), RouterError> {
        match event {
            BotEvent::Connected { bot, guilds } => self.on_connected(&bot, &guilds),
            // Never respond to the bot's own messages.
            BotEvent::MessageReceived { from_self: true, .. } => Ok(()),
            BotEvent::MessageReceived {
                author,
                scope: MessageScope::Direct,
                ..
            } => {
                self.audit.record(
                    LogChannel::Main,
                    &format!(
                        "received DM from {}, sending authenticated link",
                        author.username
                    ),
                )?;
                self.send_authenticated_link(&author, platform).await
            }
            BotEvent::MessageReceived {
                author,
                scope: MessageScope::Guild { .. },
                channel_id,
                message_id,
                content,
                ..
            } => {
                self.on_guild_message(&author, channel_id, message_id, &content, platform)
                    .await
            }
            BotEvent::ReactionAdded {
                channel_id,
                message_id,
                user_id,
            } => {
                self.on_reaction(channel_id, message_id, user_id, platform)
                    .await
            }
        }
    }

    /// Log the connection banner and every joined guild, flagging the
    /// configured test guild.
    fn on_connected(&self, bot: &UserRef, guilds: &[GuildRef]) -> Result<(), RouterError> {
        self.audit.record(
            LogChannel::Main,
            &format!("{} has connected to Discord!", bot.username),
        )?;

        for guild in guilds {
            let mut line = format!("Connected to {} (id: {})", guild.name, guild.id);
            if guild.id == self.config.test_guild_id {
                line.push_str(" (TEST SERVER)");
            }
            self.audit.record(LogChannel::Main, &line)?;
        }
        Ok(())
    }

    /// Guild messages only matter when the privileged user posts the
    /// magic trigger; the announcement invites reactions but issues no
    /// token itself.
    async fn on_guild_message(
        &self,
        author: &UserRef,
        channel_id: u64,
        message_id: u64,
        content: &str,
        platform: &dyn ChatPlatform,
    ) -> Result<(), RouterError> {
        if author.id != self.config.magic_user_id || !content.contains(MAGIC_TRIGGER) {
            return Ok(());
        }

        self.audit.record(
            LogChannel::Main,
            "detected the magic trigger from the magic user, sending special message",
        )?;

        let announcement = format!(
            "Thanks <@{}>, and hi @everyone! React to this message, and I'll DM you an authenticated link to fill out the consent form.",
            self.config.magic_user_id
        );
        platform.reply(channel_id, message_id, &announcement).await?;
        Ok(())
    }

    /// A reaction on one of the bot's own messages is treated exactly
    /// like a DM trigger; reactions on anything else are ignored.
    async fn on_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        user_id: u64,
        platform: &dyn ChatPlatform,
    ) -> Result<(), RouterError> {
        let author = platform.message_author(channel_id, message_id).await?;
        if !author.is_self {
            return Ok(());
        }

        let user = platform.fetch_user(user_id).await?;
        self.audit.record(
            LogChannel::Main,
            &format!(
                "observed reaction on own message from {}, sending authenticated link",
                user.username
            ),
        )?;
        self.send_authenticated_link(&user, platform).await
    }

    /// Issue a token, audit it, and DM the pre-filled link to `user`.
    async fn send_authenticated_link(
        &self,
        user: &UserRef,
        platform: &dyn ChatPlatform,
    ) -> Result<(), RouterError> {
        self.audit.record(
            LogChannel::Main,
            &format!(
                "starting authentication request for {} (id={})",
                user.username, user.id
            ),
        )?;

        let record = self.tokens.issue(&user.username, user.id);
        self.audit.record(LogChannel::Auth, &record.audit_line())?;

        let link = self
            .links
            .build(record.username(), record.userid(), record.digest());
        let message = format!(
            "Authenticated as <@{}>.\n\
             security stuff, if you're curious: ||userid={}, epoch timestamp={}, nonce={}, generated auth token={}\n\
             auth token = SHA256(\"{}\")||\n\
             Your authenticated URL: {}\n\
             To get a new URL, either send me a message, or react on any of my messages!",
            record.userid(),
            record.userid(),
            record.timestamp(),
            record.nonce(),
            record.digest(),
            record.hash_input(),
            link
        );

        platform.send_direct_message(user.id, &message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformError;
    use crate::event::MessageAuthor;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use sha2::{Digest, Sha256};
    use std::collections::HashMap;
    use std::path::Path;

    /// Recording stand-in for the Discord adapter.
    #[derive(Default)]
    struct RecordingPlatform {
        authors: HashMap<(u64, u64), MessageAuthor>,
        users: HashMap<u64, UserRef>,
        dms: Mutex<Vec<(u64, String)>>,
        replies: Mutex<Vec<(u64, u64, String)>>,
    }

    #[async_trait]
    impl ChatPlatform for RecordingPlatform {
        async fn send_direct_message(
            &self,
            user_id: u64,
            content: &str,
        ) -> Result<(), PlatformError> {
            self.dms.lock().push((user_id, content.to_string()));
            Ok(())
        }

        async fn reply(
            &self,
            channel_id: u64,
            message_id: u64,
            content: &str,
        ) -> Result<(), PlatformError> {
            self.replies
                .lock()
                .push((channel_id, message_id, content.to_string()));
            Ok(())
        }

        async fn message_author(
            &self,
            channel_id: u64,
            message_id: u64,
        ) -> Result<MessageAuthor, PlatformError> {
            self.authors
                .get(&(channel_id, message_id))
                .cloned()
                .ok_or(PlatformError::Fetch {
                    what: "message",
                    id: message_id,
                    cause: "not found".to_string(),
                })
        }

        async fn fetch_user(&self, user_id: u64) -> Result<UserRef, PlatformError> {
            self.users
                .get(&user_id)
                .cloned()
                .ok_or(PlatformError::Fetch {
                    what: "user",
                    id: user_id,
                    cause: "not found".to_string(),
                })
        }
    }

    const TEST_GUILD: u64 = 100;
    const MAGIC_USER: u64 = 7;

    fn test_router() -> (EventRouter, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let config = BotConfig {
            discord_token: "test-token".to_string(),
            test_guild_id: TEST_GUILD,
            magic_user_id: MAGIC_USER,
            logs_dir: tmp.path().to_path_buf(),
        };
        let audit = AuditLog::open(tmp.path()).unwrap();
        (EventRouter::new(config, audit), tmp)
    }

    fn log_lines(dir: &Path, file: &str) -> Vec<String> {
        match std::fs::read_to_string(dir.join(file)) {
            Ok(contents) => contents.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    fn dm_from(author: UserRef) -> BotEvent {
        BotEvent::MessageReceived {
            author,
            from_self: false,
            scope: MessageScope::Direct,
            channel_id: 1,
            message_id: 2,
            content: "hello".to_string(),
        }
    }

    fn guild_message(author_id: u64, content: &str) -> BotEvent {
        BotEvent::MessageReceived {
            author: UserRef {
                id: author_id,
                username: "someone#1234".to_string(),
            },
            from_self: false,
            scope: MessageScope::Guild {
                guild_id: TEST_GUILD,
            },
            channel_id: 10,
            message_id: 20,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn dm_issues_one_token_and_one_dm() {
        let (router, tmp) = test_router();
        let platform = RecordingPlatform::default();

        router
            .handle(
                dm_from(UserRef {
                    id: 42,
                    username: "alice#0001".to_string(),
                }),
                &platform,
            )
            .await
            .unwrap();

        let auth = log_lines(tmp.path(), "auth.log");
        assert_eq!(auth.len(), 1);

        // The audit line carries the full record, and its digest
        // recomputes from the first four comma-separated fields.
        let line = auth[0].split_once(": ").unwrap().1;
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0], "alice#0001");
        assert_eq!(fields[1], "42");

        let mut hasher = Sha256::new();
        hasher.update(fields[..4].join(",").as_bytes());
        assert_eq!(fields[4], format!("{:x}", hasher.finalize()));

        let dms = platform.dms.lock();
        assert_eq!(dms.len(), 1);
        assert_eq!(dms[0].0, 42);
        assert!(dms[0].1.contains(
            "https://docs.google.com/forms/d/e/1FAIpQLSc6_HtfblPc_hikKztWNh6SfEhKAEzFxTgUQqbFDXQ7qFq08A/viewform?usp=pp_url&entry.1426369734="
        ));
        assert!(dms[0].1.contains("Authenticated as <@42>."));
        assert!(platform.replies.lock().is_empty());
    }

    #[tokio::test]
    async fn own_messages_are_ignored() {
        let (router, tmp) = test_router();
        let platform = RecordingPlatform::default();

        let event = BotEvent::MessageReceived {
            author: UserRef {
                id: 999,
                username: "linkbot#0000".to_string(),
            },
            from_self: true,
            scope: MessageScope::Direct,
            channel_id: 1,
            message_id: 2,
            content: "Authenticated as ...".to_string(),
        };
        router.handle(event, &platform).await.unwrap();

        assert!(log_lines(tmp.path(), "auth.log").is_empty());
        assert!(log_lines(tmp.path(), "main.log").is_empty());
        assert!(platform.dms.lock().is_empty());
    }

    #[tokio::test]
    async fn reaction_on_own_message_sends_link() {
        let (router, tmp) = test_router();
        let mut platform = RecordingPlatform::default();
        platform.authors.insert(
            (5, 6),
            MessageAuthor {
                user: UserRef {
                    id: 999,
                    username: "linkbot#0000".to_string(),
                },
                is_self: true,
            },
        );
        platform.users.insert(
            9,
            UserRef {
                id: 9,
                username: "bob#0002".to_string(),
            },
        );

        router
            .handle(
                BotEvent::ReactionAdded {
                    channel_id: 5,
                    message_id: 6,
                    user_id: 9,
                },
                &platform,
            )
            .await
            .unwrap();

        assert_eq!(log_lines(tmp.path(), "auth.log").len(), 1);
        let dms = platform.dms.lock();
        assert_eq!(dms.len(), 1);
        assert_eq!(dms[0].0, 9);
    }

    #[tokio::test]
    async fn reaction_on_foreign_message_is_ignored() {
        let (router, tmp) = test_router();
        let mut platform = RecordingPlatform::default();
        platform.authors.insert(
            (5, 6),
            MessageAuthor {
                user: UserRef {
                    id: 9,
                    username: "bob#0002".to_string(),
                },
                is_self: false,
            },
        );

        router
            .handle(
                BotEvent::ReactionAdded {
                    channel_id: 5,
                    message_id: 6,
                    user_id: 9,
                },
                &platform,
            )
            .await
            .unwrap();

        assert!(log_lines(tmp.path(), "auth.log").is_empty());
        assert!(platform.dms.lock().is_empty());
        assert!(platform.replies.lock().is_empty());
    }

    #[tokio::test]
    async fn magic_trigger_announces_without_issuing() {
        let (router, tmp) = test_router();
        let platform = RecordingPlatform::default();

        let content = format!("Ladies and gentlemen... {}", MAGIC_TRIGGER);
        router
            .handle(guild_message(MAGIC_USER, &content), &platform)
            .await
            .unwrap();

        let replies = platform.replies.lock();
        assert_eq!(replies.len(), 1);
        assert_eq!((replies[0].0, replies[0].1), (10, 20));
        assert!(replies[0].2.contains("React to this message"));
        assert!(replies[0].2.contains(&format!("<@{}>", MAGIC_USER)));

        // The announcement alone issues no token.
        assert!(log_lines(tmp.path(), "auth.log").is_empty());
        assert!(platform.dms.lock().is_empty());
    }

    #[tokio::test]
    async fn magic_trigger_requires_the_privileged_author() {
        let (router, tmp) = test_router();
        let platform = RecordingPlatform::default();

        router
            .handle(guild_message(8, MAGIC_TRIGGER), &platform)
            .await
            .unwrap();

        assert!(platform.replies.lock().is_empty());
        assert!(log_lines(tmp.path(), "main.log").is_empty());
    }

    #[tokio::test]
    async fn guild_chatter_without_the_trigger_is_ignored() {
        let (router, tmp) = test_router();
        let platform = RecordingPlatform::default();

        router
            .handle(guild_message(MAGIC_USER, "morning all"), &platform)
            .await
            .unwrap();

        assert!(platform.replies.lock().is_empty());
        assert!(platform.dms.lock().is_empty());
        assert!(log_lines(tmp.path(), "main.log").is_empty());
    }

    #[tokio::test]
    async fn connected_banner_flags_the_test_guild() {
        let (router, tmp) = test_router();
        let platform = RecordingPlatform::default();

        router
            .handle(
                BotEvent::Connected {
                    bot: UserRef {
                        id: 999,
                        username: "linkbot#0000".to_string(),
                    },
                    guilds: vec![
                        GuildRef {
                            id: TEST_GUILD,
                            name: "Staging".to_string(),
                        },
                        GuildRef {
                            id: 200,
                            name: "Production".to_string(),
                        },
                    ],
                },
                &platform,
            )
            .await
            .unwrap();

        let main = log_lines(tmp.path(), "main.log");
        assert_eq!(main.len(), 3);
        assert!(main[0].contains("linkbot#0000 has connected to Discord!"));
        assert!(main[1].contains("Connected to Staging (id: 100) (TEST SERVER)"));
        assert!(main[2].contains("Connected to Production (id: 200)"));
        assert!(!main[2].contains("TEST SERVER"));
    }

    #[tokio::test]
    async fn platform_failure_aborts_the_event_before_issuance() {
        let (router, tmp) = test_router();
        let mut platform = RecordingPlatform::default();
        // Message is the bot's own, but the reacting user can't be fetched.
        platform.authors.insert(
            (5, 6),
            MessageAuthor {
                user: UserRef {
                    id: 999,
                    username: "linkbot#0000".to_string(),
                },
                is_self: true,
            },
        );

        let result = router
            .handle(
                BotEvent::ReactionAdded {
                    channel_id: 5,
                    message_id: 6,
                    user_id: 31337,
                },
                &platform,
            )
            .await;

        assert!(matches!(result, Err(RouterError::Platform(_))));
        // No token was issued for the aborted event.
        assert!(log_lines(tmp.path(), "auth.log").is_empty());
        assert!(platform.dms.lock().is_empty());
    }
}
