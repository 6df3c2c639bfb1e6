//! Error types for linkbot-discord.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, DiscordError>;

/// Errors from building or running the Discord client.
///
/// Per-event failures never reach this type; they are [`linkbot_core::PlatformError`]s
/// logged by the handler, so one bad event cannot take the process down.
#[derive(Debug, Error, Diagnostic)]
pub enum DiscordError {
    /// Client construction failed (bad token, gateway unreachable).
    #[error("failed to build Discord client: {0}")]
    #[diagnostic(
        code(linkbot_discord::client_build),
        help("check DISCORD_TOKEN and network access")
    )]
    ClientBuild(#[source] serenity::Error),

    /// The gateway connection ended with an error.
    #[error("Discord client error: {0}")]
    #[diagnostic(code(linkbot_discord::client_run))]
    ClientRun(#[source] serenity::Error),
}
