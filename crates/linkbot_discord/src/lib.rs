//! Linkbot Discord - serenity adapter
//!
//! Converts serenity gateway events into `linkbot-core`'s typed events and
//! implements the outbound [`linkbot_core::ChatPlatform`] boundary over
//! serenity's HTTP client.
//!
//! Configuration is loaded once at startup and injected through the
//! router; there are NO runtime environment variable reads in this crate.

pub mod bot;
pub mod error;
pub mod platform;

pub use bot::{LinkBot, run};
pub use error::{DiscordError, Result};
pub use platform::SerenityPlatform;

// Re-export serenity for convenience
pub use serenity;
