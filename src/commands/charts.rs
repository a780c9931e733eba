//! Histogram image commands.

use poise::serenity_prelude as serenity;

use super::{Context, NO_TIMES_MESSAGE};
use crate::error::BotError;
use crate::puzzle::Bucket;
use crate::services::histogram::render_histogram;

/// Display a histogram of scores for the normal crossword
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "crate::commands::has_crossword_role"
)]
pub async fn hist(ctx: Context<'_>) -> Result<(), BotError> {
    send_histogram(ctx, Bucket::Weekday).await
}

/// Display a histogram of scores for the Saturday crossword
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "crate::commands::has_crossword_role"
)]
pub async fn sathist(ctx: Context<'_>) -> Result<(), BotError> {
    send_histogram(ctx, Bucket::Saturday).await
}

async fn send_histogram(ctx: Context<'_>, bucket: Bucket) -> Result<(), BotError> {
    let author = ctx.author();
    let png = render_histogram(&ctx.data().db, bucket, author.id.get() as i64, &author.name)?;

    let Some(png) = png else {
        ctx.say(NO_TIMES_MESSAGE).await?;
        return Ok(());
    };

    ctx.send(
        poise::CreateReply::default()
            .attachment(serenity::CreateAttachment::bytes(png, "hist.png")),
    )
    .await?;

    Ok(())
}
