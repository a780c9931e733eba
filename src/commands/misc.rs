//! Commands open to everyone.

use super::Context;
use crate::error::BotError;

/// Link to the daily mini crossword
#[poise::command(prefix_command, slash_command)]
pub async fn link(ctx: Context<'_>) -> Result<(), BotError> {
    ctx.say(ctx.data().config.puzzle_link.clone()).await?;
    Ok(())
}
