mod bot_config;
mod commands;
mod handler;
mod help;
mod moderation;
mod tictactoe;

use std::sync::Arc;

use clap::Parser;
use reaper_common::engine::session::{SessionEngine, SessionRegistry};
use reaper_common::{log, logger};
use serenity::all::{GatewayIntents, Http};
use serenity::Client;

use bot_config::{DEFAULT_CONFIG_FILE_NAME, get_config_manager};
use handler::{Handler, ShardManagerContainer};
use moderation::ModerationService;
use tictactoe::{DiscordBroadcaster, GameMessages, TicTacToeService};

#[derive(Parser)]
#[command(name = "reaper_bot")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE_NAME)]
    config: String,

    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Write the default config to --config and exit.
    #[arg(long)]
    write_default_config: bool,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Bot".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_manager = get_config_manager(&args.config);
    if args.write_default_config {
        config_manager.set_config(&bot_config::BotConfig::default())?;
        log!("Default config written to {}", args.config);
        return Ok(());
    }
    let config = config_manager.get_config()?;

    let Some(token) = args.token else {
        return Err("Discord token missing: pass --token or set DISCORD_TOKEN".into());
    };

    let messages = GameMessages::new();
    let broadcaster = DiscordBroadcaster::new(Arc::new(Http::new(&token)), messages.clone());
    let sessions = SessionEngine::spawn(
        SessionRegistry::default(),
        config.tictactoe_timeout(),
        broadcaster,
    );
    let handler = Handler::new(
        config.prefix.clone(),
        config.help_timeout(),
        TicTacToeService::new(sessions, messages),
        ModerationService::new(config.mod_log_channel()),
    );

    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&token, intents).event_handler(handler).await?;

    client
        .data
        .write()
        .await
        .insert::<ShardManagerContainer>(client.shard_manager.clone());

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log!("Shutdown signal received, disconnecting...");
        shard_manager.shutdown_all().await;
    });

    log!("Starting bot with prefix {:?}", config.prefix);
    client.start().await?;

    log!("Bot shut down gracefully");
    Ok(())
}
