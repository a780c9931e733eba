//! Binary entrypoint wiring configuration, the SQLite store, and the Discord
//! client together.

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crossword_scoreboard::commands;
use crossword_scoreboard::config::AppConfig;
use crossword_scoreboard::dao::Database;
use crossword_scoreboard::error::BotError;
use crossword_scoreboard::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let token = std::env::var("DISCORD_TOKEN").context("DISCORD_TOKEN must be set")?;
    let config = AppConfig::load();
    let db = Database::open(&config.db_path).context("opening score database")?;

    let options = poise::FrameworkOptions {
        commands: commands::all(),
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(config.command_prefix.clone()),
            ..Default::default()
        },
        on_error: |error| Box::pin(on_error(error)),
        ..Default::default()
    };

    let framework = poise::Framework::builder()
        .options(options)
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!(user = %ready.user.name, "logged in");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(AppState::new(config, db))
            })
        })
        .build();

    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("building discord client")?;

    client.start().await.context("running discord client")?;

    Ok(())
}

/// Top-level error hook: log everything, surface nothing diagnostic.
async fn on_error(error: poise::FrameworkError<'_, AppState, BotError>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                command = %ctx.command().qualified_name,
                error = %error,
                "command failed"
            );
        }
        poise::FrameworkError::CommandCheckFailed { ctx, .. } => {
            info!(
                command = %ctx.command().qualified_name,
                user = %ctx.author().name,
                "command check failed"
            );
        }
        other => {
            if let Err(err) = poise::builtins::on_error(other).await {
                error!(error = %err, "error while handling error");
            }
        }
    }
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,serenity=warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
