//! The serenity event handler and client runner.

use linkbot_core::{BotEvent, EventRouter, GuildRef, MessageScope, UserRef};
use serenity::all::{Client, Context, EventHandler, GatewayIntents, Message, Reaction, Ready};
use serenity::async_trait;
use tracing::{error, info};

use crate::error::{DiscordError, Result};
use crate::platform::{SerenityPlatform, user_ref};

/// serenity event handler wrapping the core router.
///
/// Each callback converts the SDK payload into a typed [`BotEvent`] and
/// hands it to the router. A failed event is logged and dropped; serenity
/// runs handlers on their own tasks, so one failure never takes the
/// process down, and the triggering user simply gets no reply.
pub struct LinkBot {
    router: EventRouter,
}

impl LinkBot {
    pub fn new(router: EventRouter) -> Self {
        Self { router }
    }

    async fn dispatch(&self, ctx: &Context, event: BotEvent) {
        let platform = SerenityPlatform::new(&ctx.http, ctx.cache.current_user().id);
        if let Err(e) = self.router.handle(event, &platform).await {
            error!("event handling aborted: {}", e);
        }
    }
}

#[async_trait]
impl EventHandler for LinkBot {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("gateway handshake complete for {}", ready.user.name);

        let bot = UserRef {
            id: ready.user.id.get(),
            username: ready.user.tag(),
        };

        // Ready only carries guild ids; resolve names over HTTP, falling
        // back to the bare id so the banner never aborts the event.
        let mut guilds = Vec::with_capacity(ready.guilds.len());
        for unavailable in &ready.guilds {
            let name = match ctx.http.get_guild(unavailable.id).await {
                Ok(guild) => guild.name,
                Err(_) => unavailable.id.to_string(),
            };
            guilds.push(GuildRef {
                id: unavailable.id.get(),
                name,
            });
        }

        self.dispatch(&ctx, BotEvent::Connected { bot, guilds }).await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let scope = match msg.guild_id {
            Some(guild_id) => MessageScope::Guild {
                guild_id: guild_id.get(),
            },
            None => MessageScope::Direct,
        };
        let event = BotEvent::MessageReceived {
            from_self: msg.author.id == ctx.cache.current_user().id,
            author: user_ref(&msg.author),
            scope,
            channel_id: msg.channel_id.get(),
            message_id: msg.id.get(),
            content: msg.content,
        };
        self.dispatch(&ctx, event).await;
    }

    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        // Some gateway payloads omit the reactor; nobody to DM then.
        let Some(user_id) = reaction.user_id else {
            return;
        };
        let event = BotEvent::ReactionAdded {
            channel_id: reaction.channel_id.get(),
            message_id: reaction.message_id.get(),
            user_id: user_id.get(),
        };
        self.dispatch(&ctx, event).await;
    }
}

/// Gateway intents the bot needs: guild and DM messages with content, plus
/// reactions in both scopes.
fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::DIRECT_MESSAGE_REACTIONS
}

/// Build the Discord client around `router` and run it until the gateway
/// connection ends.
pub async fn run(token: &str, router: EventRouter) -> Result<()> {
    let mut client = Client::builder(token, intents())
        .event_handler(LinkBot::new(router))
        .await
        .map_err(DiscordError::ClientBuild)?;

    info!("starting Discord client");
    client.start().await.map_err(DiscordError::ClientRun)?;
    Ok(())
}
