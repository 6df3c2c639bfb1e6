//! Error types for linkbot-core.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("missing required environment variable {var}")]
    #[diagnostic(
        code(linkbot_core::config::missing_var),
        help("set {var} in the environment or in a .env file")
    )]
    MissingVar { var: &'static str },

    /// An id variable is set but does not parse as a numeric snowflake.
    #[error("invalid value for {var}: {value:?} is not a numeric id")]
    #[diagnostic(
        code(linkbot_core::config::invalid_id),
        help("{var} must be a positive integer Discord snowflake")
    )]
    InvalidId { var: &'static str, value: String },
}

/// Errors raised by the audit log.
#[derive(Debug, Error, Diagnostic)]
pub enum AuditError {
    /// The log directory could not be created at startup.
    #[error("failed to create log directory {path}")]
    #[diagnostic(code(linkbot_core::audit::create_dir))]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A line could not be appended to its log file.
    #[error("failed to append to {path}")]
    #[diagnostic(
        code(linkbot_core::audit::append),
        help(
            "the audit trail is the only record of issuance; the current event is aborted rather than continuing without it"
        )
    )]
    Append {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by platform adapter calls.
///
/// Built at the adapter boundary with the SDK error rendered into `cause`,
/// so the core does not depend on any platform SDK types.
#[derive(Debug, Error, Diagnostic)]
pub enum PlatformError {
    /// Fetching a channel, message, or user by id failed.
    #[error("failed to fetch {what} {id}: {cause}")]
    #[diagnostic(code(linkbot_core::platform::fetch))]
    Fetch {
        what: &'static str,
        id: u64,
        cause: String,
    },

    /// Delivering a message failed (e.g. the user has DMs disabled).
    #[error("failed to deliver message to {recipient}: {cause}")]
    #[diagnostic(code(linkbot_core::platform::deliver))]
    Deliver { recipient: u64, cause: String },
}

/// Errors from routing a single event.
///
/// Aborts that event's handling only; the process keeps running.
#[derive(Debug, Error, Diagnostic)]
pub enum RouterError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Platform(#[from] PlatformError),
}
