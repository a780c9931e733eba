//! Score submission, listing, and deletion commands.

use poise::serenity_prelude as serenity;
use tracing::info;

use super::{Context, NO_TIMES_MESSAGE, code_block};
use crate::error::BotError;
use crate::puzzle::{self, Bucket};
use crate::services::averages::{self, AvgDelta};
use crate::services::submission;
use crate::state::DeletionOutcome;

/// Add a time to the scoreboard (seconds or m:ss)
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "crate::commands::has_crossword_role"
)]
pub async fn addtime(
    ctx: Context<'_>,
    #[description = "Solve time, in seconds or m:ss"] time: Option<String>,
) -> Result<(), BotError> {
    let state = ctx.data();

    let Some(raw) = time else {
        ctx.say(format!(
            "`Use {}help to check the correct addtime usage`",
            state.config.command_prefix
        ))
        .await?;
        return Ok(());
    };

    let Ok(seconds) = puzzle::parse_score(&raw) else {
        ctx.say("`lmao nice try ( ͠° ͟ʖ ͠°)`").await?;
        return Ok(());
    };

    let author = ctx.author();
    let receipt = submission::record_score(
        &state.db,
        author.id.get() as i64,
        &author.name,
        seconds,
        puzzle::now_in_puzzle_tz(),
    )?;
    info!(user = %author.name, date = %receipt.date, seconds, "score recorded");
    ctx.say("```css\nScore added.\n```").await?;

    let weekday = avg_line(&author.name, Bucket::Weekday, receipt.averages.weekday, receipt.bucket);
    let saturday = avg_line(
        &author.name,
        Bucket::Saturday,
        receipt.averages.saturday,
        receipt.bucket,
    );
    ctx.say(code_block(format!("{weekday}\n{saturday}"))).await?;

    Ok(())
}

/// One `~ name's Regular Crossword Avg: 1:15 [+3] ~` line; empty when the
/// bucket has no average. The signed delta only shows for the bucket the
/// submission landed in.
fn avg_line(name: &str, bucket: Bucket, delta: AvgDelta, submitted: Bucket) -> String {
    let Some(current) = delta.current else {
        return String::new();
    };
    let suffix = match delta.change() {
        Some(change) if bucket == submitted => format!(" [{change:+}]"),
        _ => String::new(),
    };
    format!(
        "~ {name}'s {} Crossword Avg: {}{suffix} ~",
        bucket.label(),
        puzzle::format_time(current)
    )
}

/// List your 20 most recent scores
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "crate::commands::has_crossword_role"
)]
pub async fn ltimes(ctx: Context<'_>) -> Result<(), BotError> {
    let author = ctx.author();
    let scores = ctx.data().db.recent_scores(author.id.get() as i64, 20)?;
    if scores.is_empty() {
        ctx.say(NO_TIMES_MESSAGE).await?;
        return Ok(());
    }

    let lines: Vec<String> = scores
        .iter()
        .map(|score| format!("({}) {}", score.date, puzzle::format_time(score.seconds)))
        .collect();
    ctx.say(code_block(format!(
        "{}'s Scoreboard: \n{}\n",
        author.name,
        lines.join("\n")
    )))
    .await?;

    Ok(())
}

/// Delete one of your scores via a numbered menu (honour system)
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "crate::commands::has_crossword_role"
)]
pub async fn deltime(ctx: Context<'_>) -> Result<(), BotError> {
    let state = ctx.data();
    let author = ctx.author();
    let user_id = author.id.get() as i64;

    let choices = state.db.scores_for_user(user_id)?;
    if choices.is_empty() {
        ctx.say("```No scores found.```").await?;
        return Ok(());
    }

    let key = (author.id.get(), ctx.channel_id().get());
    if state.deletions.begin(key, choices.clone()).is_err() {
        ctx.say("```A deletion menu is already open here.```").await?;
        return Ok(());
    }

    // From here on the session must be cleaned up on every path.
    let reply = match present_menu(&ctx, &choices).await {
        Ok(reply) => reply,
        Err(err) => {
            state.deletions.expire(key);
            return Err(err);
        }
    };

    let outcome = match reply {
        Some(message) => state.deletions.resolve(key, &message.content),
        None => state.deletions.expire(key),
    };

    match outcome {
        DeletionOutcome::Resolved(score) => {
            state.db.delete_score(user_id, score.date)?;
            averages::refresh_averages(&state.db, user_id, &author.name)?;
            info!(user = %author.name, date = %score.date, "score deleted");
            ctx.say("```Score successfully deleted.```").await?;
        }
        DeletionOutcome::Cancelled => {
            ctx.say("```Exited score deletion menu.```").await?;
        }
        DeletionOutcome::Invalid => {
            ctx.say("```Invalid input.```").await?;
        }
        DeletionOutcome::TimedOut => {
            ctx.say("```Deletion menu timed out.```").await?;
        }
    }

    Ok(())
}

/// Send the numbered menu and wait for the author's next message in the same
/// channel, up to the configured timeout.
async fn present_menu(
    ctx: &Context<'_>,
    choices: &[crate::dao::ScoreRecord],
) -> Result<Option<serenity::Message>, BotError> {
    let mut menu = String::from("Please choose a score you would like to delete.\n\n");
    for (index, score) in choices.iter().enumerate() {
        menu.push_str(&format!(
            "[{}]  ({}) {} \n",
            index + 1,
            score.date,
            puzzle::format_time(score.seconds)
        ));
    }
    ctx.say(code_block(menu)).await?;
    ctx.say(code_block("\n[0] Exit without deleting scores"))
        .await?;

    let reply = serenity::collector::MessageCollector::new(ctx.serenity_context())
        .channel_id(ctx.channel_id())
        .author_id(ctx.author().id)
        .timeout(ctx.data().deletions.timeout())
        .next()
        .await;
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avg_line_shows_delta_only_for_the_submitted_bucket() {
        let delta = AvgDelta {
            previous: Some(70),
            current: Some(75),
        };

        assert_eq!(
            avg_line("solver", Bucket::Weekday, delta, Bucket::Weekday),
            "~ solver's Regular Crossword Avg: 1:15 [+5] ~"
        );
        assert_eq!(
            avg_line("solver", Bucket::Weekday, delta, Bucket::Saturday),
            "~ solver's Regular Crossword Avg: 1:15 ~"
        );
    }

    #[test]
    fn avg_line_is_empty_without_a_current_average() {
        let delta = AvgDelta {
            previous: None,
            current: None,
        };
        assert_eq!(avg_line("solver", Bucket::Weekday, delta, Bucket::Weekday), "");
    }

    #[test]
    fn avg_line_omits_delta_on_first_average() {
        let delta = AvgDelta {
            previous: None,
            current: Some(110),
        };
        assert_eq!(
            avg_line("solver", Bucket::Saturday, delta, Bucket::Saturday),
            "~ solver's Saturday Crossword Avg: 1:50 ~"
        );
    }
}
