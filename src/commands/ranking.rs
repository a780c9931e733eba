//! Average and leaderboard commands.

use super::{Context, code_block};
use crate::error::BotError;
use crate::puzzle::{self, Bucket};
use crate::services::leaderboard::{Leaderboard, build_leaderboard};

/// List your Saturday crossword avg and your regular avg
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "crate::commands::has_crossword_role"
)]
pub async fn useravg(ctx: Context<'_>) -> Result<(), BotError> {
    let author = ctx.author();
    let Some(record) = ctx.data().db.ranking_for_user(author.id.get() as i64)? else {
        ctx.say("```This user doesn't have any times yet.```").await?;
        return Ok(());
    };

    let mut body = String::new();
    for (bucket, avg) in [
        (Bucket::Weekday, record.weekday_avg),
        (Bucket::Saturday, record.saturday_avg),
    ] {
        if let Some(avg) = avg {
            body.push_str(&format!(
                "~ {}'s {} Crossword Avg: {} ~\n",
                author.name,
                bucket.label(),
                puzzle::format_time(avg)
            ));
        }
    }
    ctx.say(format!("```apache\n{body}```")).await?;

    Ok(())
}

/// Display the top 10 in the scoreboard
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "crate::commands::has_crossword_role"
)]
pub async fn rank(ctx: Context<'_>) -> Result<(), BotError> {
    send_leaderboard(ctx, Bucket::Weekday).await
}

/// Display the top 10 in the Saturday minicrossword scoreboard
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "crate::commands::has_crossword_role"
)]
pub async fn saturdayrank(ctx: Context<'_>) -> Result<(), BotError> {
    send_leaderboard(ctx, Bucket::Saturday).await
}

async fn send_leaderboard(ctx: Context<'_>, bucket: Bucket) -> Result<(), BotError> {
    let today = puzzle::now_in_puzzle_tz().date_naive();
    match build_leaderboard(&ctx.data().db, bucket, today)? {
        Leaderboard::NoScores => {
            let qualifier = match bucket {
                Bucket::Weekday => "non-",
                Bucket::Saturday => "",
            };
            ctx.say(code_block(format!(
                "No one has any {qualifier}Saturday crossword scores yet."
            )))
            .await?;
        }
        Leaderboard::AllStale => {
            ctx.say(code_block("No recent entries for this scoreboard."))
                .await?;
        }
        Leaderboard::Top(rows) => {
            let title = match bucket {
                Bucket::Weekday => "",
                Bucket::Saturday => "Saturday ",
            };
            ctx.say(format!("```css\n{title}Minicrossword Scoreboard:\n```"))
                .await?;

            let body: Vec<String> = rows
                .iter()
                .enumerate()
                .map(|(index, row)| {
                    format!(
                        "[{}] {}: {} (of {})",
                        index + 1,
                        row.name,
                        puzzle::format_time(row.average),
                        row.samples
                    )
                })
                .collect();
            ctx.say(code_block(body.join("\n"))).await?;
        }
    }

    Ok(())
}
