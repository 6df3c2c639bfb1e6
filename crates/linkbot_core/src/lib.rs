//! Linkbot Core - token issuance, audit logging, and event routing
//!
//! This crate holds everything about the bot that is not Discord-specific:
//! the auth-token generator, the append-only audit log, the pre-filled
//! form-link builder, and the router that dispatches typed platform events
//! to them.
//!
//! # Architecture
//!
//! Configuration is loaded once at startup ([`BotConfig::from_env`]) and
//! injected into the router along with an opened [`AuditLog`]; nothing in
//! this crate reads the environment or touches global state after that.
//! The platform adapter (the `linkbot-discord` crate) converts SDK payloads
//! into [`BotEvent`]s at the boundary and supplies a [`ChatPlatform`] for
//! the router's outbound calls, so the core stays testable without a
//! gateway connection.

pub mod audit;
pub mod config;
pub mod error;
pub mod event;
pub mod link;
pub mod router;
pub mod token;

pub use audit::{AuditLog, LogChannel};
pub use config::BotConfig;
pub use error::{AuditError, ConfigError, PlatformError, RouterError};
pub use event::{BotEvent, ChatPlatform, GuildRef, MessageAuthor, MessageScope, UserRef};
pub use link::{FORM_LINK_TEMPLATE, LinkBuilder};
pub use router::{EventRouter, MAGIC_TRIGGER};
pub use token::{AuthRecord, TokenGenerator};
