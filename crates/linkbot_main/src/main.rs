//! linkbot entry point: configuration, logging, and the Discord client.

use linkbot_core::{AuditLog, BotConfig, EventRouter};
use miette::{IntoDiagnostic, Result};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .build(),
        )
    }))
    .into_diagnostic()?;

    init_tracing();

    let config = BotConfig::from_env()?;

    // Create the log directory before any event can try to write to it.
    let audit = AuditLog::open(&config.logs_dir)?;

    let token = config.discord_token.clone();
    let router = EventRouter::new(config, audit);

    info!("configuration loaded, connecting to Discord");
    linkbot_discord::run(&token, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{
        EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt,
    };

    // RUST_LOG wins; otherwise keep the linkbot crates chatty and the rest
    // quiet.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("linkbot_core=info,linkbot_discord=info,linkbot_main=info,warn")
    });

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_filter(env_filter))
        .init();
}
