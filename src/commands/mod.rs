//! Discord command surface.
//!
//! Handlers stay thin: parse and role-gate input, call a service, format the
//! reply. The message texts mirror what the community is used to.

mod charts;
mod misc;
mod ranking;
mod times;

use crate::error::BotError;
use crate::state::AppState;

/// Context alias carrying the shared [`AppState`].
pub type Context<'a> = poise::Context<'a, AppState, BotError>;

/// Reply shared by every command that found nothing to show.
pub(crate) const NO_TIMES_MESSAGE: &str = "```No times found.```";

/// Every command the bot registers.
pub fn all() -> Vec<poise::Command<AppState, BotError>> {
    vec![
        times::addtime(),
        times::ltimes(),
        times::deltime(),
        ranking::useravg(),
        ranking::rank(),
        ranking::saturdayrank(),
        charts::hist(),
        charts::sathist(),
        misc::link(),
    ]
}

/// Command check: the author must carry the configured crossword role.
pub async fn has_crossword_role(ctx: Context<'_>) -> Result<bool, BotError> {
    let Some(member) = ctx.author_member().await else {
        return Ok(false);
    };
    let role_name = &ctx.data().config.crossword_role;
    let Some(guild) = ctx.guild() else {
        return Ok(false);
    };
    Ok(member
        .roles
        .iter()
        .any(|id| guild.roles.get(id).is_some_and(|role| role.name == *role_name)))
}

/// Wrap a reply body in a plain code block.
pub(crate) fn code_block(body: impl AsRef<str>) -> String {
    format!("```{}```", body.as_ref())
}
