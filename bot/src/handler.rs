use std::sync::Arc;
use std::time::Duration;

use reaper_common::log;
use serenity::all::{
    ComponentInteraction, ComponentInteractionDataKind, Context, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, EditMessage, EventHandler, Interaction,
    Message, Ready,
};
use serenity::async_trait;
use serenity::gateway::ShardManager;
use serenity::prelude::TypeMapKey;

use crate::commands::{
    Command, HI_REPLY, PING_PLACEHOLDER, mention_greeting, parse_command, pong_reply,
    snowflake_latency_ms, unknown_command_reply,
};
use crate::help::{self, HELP_SELECT_ID, HelpCategory, HelpMenus};
use crate::moderation::{BanDecision, ModerationService};
use crate::tictactoe::{GameButton, TicTacToeService};

/// Client data slot holding the shard manager, read for heartbeat latency.
pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}

async fn heartbeat_latency_ms(ctx: &Context) -> Option<u64> {
    let manager = ctx.data.read().await.get::<ShardManagerContainer>()?.clone();
    let runners = manager.runners.lock().await;
    let latency = runners.get(&ctx.shard_id)?.latency?;
    u64::try_from(latency.as_millis()).ok()
}

pub struct Handler {
    prefix: String,
    help_timeout: Duration,
    help_menus: HelpMenus,
    tictactoe: TicTacToeService,
    moderation: ModerationService,
}

impl Handler {
    pub fn new(
        prefix: String,
        help_timeout: Duration,
        tictactoe: TicTacToeService,
        moderation: ModerationService,
    ) -> Self {
        Self {
            prefix,
            help_timeout,
            help_menus: HelpMenus::new(),
            tictactoe,
            moderation,
        }
    }

    async fn run_command(
        &self,
        ctx: &Context,
        msg: &Message,
        command: Command,
        args: &[String],
    ) -> serenity::Result<()> {
        match command {
            Command::Help => self.open_help(ctx, msg).await,
            Command::Ping => {
                let sent = msg.reply(&ctx.http, PING_PLACEHOLDER).await?;
                let latency = snowflake_latency_ms(msg.id.get(), sent.id.get());
                let pong = pong_reply(latency, heartbeat_latency_ms(ctx).await);
                msg.channel_id
                    .edit_message(&ctx.http, sent.id, EditMessage::new().content(pong))
                    .await?;
                Ok(())
            }
            Command::Hi => {
                msg.reply(&ctx.http, HI_REPLY).await?;
                Ok(())
            }
            Command::TicTacToe => self.tictactoe.start_from_message(ctx, msg).await,
            Command::Moderation(action) => self.moderation.run(ctx, msg, action, args).await,
            Command::Unknown(_) => {
                msg.reply(&ctx.http, unknown_command_reply(&self.prefix)).await?;
                Ok(())
            }
        }
    }

    async fn open_help(&self, ctx: &Context, msg: &Message) -> serenity::Result<()> {
        let menu = CreateMessage::new()
            .embed(help::menu_embed())
            .components(help::menu_components());
        let sent = msg.channel_id.send_message(&ctx.http, menu).await?;
        self.help_menus.open(sent.id, msg.author.id).await;
        self.help_menus
            .expire_after(ctx.http.clone(), msg.channel_id, sent.id, self.help_timeout);
        Ok(())
    }

    async fn select_help(&self, ctx: &Context, component: &ComponentInteraction) -> serenity::Result<()> {
        let owner = self.help_menus.owner_of(component.message.id).await;
        let category = match &component.data.kind {
            ComponentInteractionDataKind::StringSelect { values } => {
                values.first().and_then(|value| HelpCategory::from_value(value))
            }
            _ => None,
        };

        let response = match (owner, category) {
            (Some(owner), Some(category)) if owner == component.user.id => {
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .embed(help::category_embed(category, &self.prefix))
                        .components(help::menu_components()),
                )
            }
            _ => CreateInteractionResponse::Acknowledge,
        };
        component.create_response(&ctx.http, response).await
    }

    async fn handle_component(&self, ctx: &Context, component: &ComponentInteraction) -> serenity::Result<()> {
        if component.data.custom_id == HELP_SELECT_ID {
            return self.select_help(ctx, component).await;
        }
        if let Some(decision) = BanDecision::parse(&component.data.custom_id) {
            return self.moderation.handle_ban_decision(ctx, component, decision).await;
        }
        match GameButton::parse(&component.data.custom_id) {
            Some(button) => self.tictactoe.handle_button(ctx, component, button).await,
            None => {
                log!("Unhandled component {:?}", component.data.custom_id);
                component
                    .create_response(&ctx.http, CreateInteractionResponse::Acknowledge)
                    .await
            }
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        log!("Logged in as {}", ready.user.tag());
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let Some(parsed) = parse_command(&msg.content, &self.prefix) else {
            let bot_id = ctx.cache.current_user().id;
            if msg.mentions_user_id(bot_id) {
                let greeting = CreateMessage::new().content(mention_greeting(&self.prefix));
                if let Err(e) = msg.channel_id.send_message(&ctx.http, greeting).await {
                    log!("Failed to answer mention: {}", e);
                }
            }
            return;
        };

        log!("Command {:?} {:?} from {}", parsed.name, parsed.args, msg.author.id);
        let command = Command::from_parsed(&parsed);
        if let Err(e) = self.run_command(&ctx, &msg, command, &parsed.args).await {
            log!("Command {:?} failed: {}", parsed.name, e);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Component(component) = interaction else {
            return;
        };
        if let Err(e) = self.handle_component(&ctx, &component).await {
            log!("Cannot respond to component {:?}: {}", component.data.custom_id, e);
        }
    }
}
