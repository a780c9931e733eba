//! Score submission: bucket the date, persist, refresh cached averages.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use super::averages::{self, RefreshedAverages};
use crate::dao::{Database, ScoreRecord};
use crate::error::ServiceError;
use crate::puzzle::{self, Bucket};

/// What a successful submission produced, for the confirmation message.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    /// Puzzle date the time was attributed to.
    pub date: NaiveDate,
    /// Bucket that puzzle date falls in.
    pub bucket: Bucket,
    /// Refreshed averages for the submitting user.
    pub averages: RefreshedAverages,
}

/// Record a validated time submitted at `now`, replacing any earlier
/// submission for the same puzzle date, and refresh the user's averages.
pub fn record_score(
    db: &Database,
    user_id: i64,
    name: &str,
    seconds: u32,
    now: DateTime<Tz>,
) -> Result<SubmissionReceipt, ServiceError> {
    let date = puzzle::puzzle_date(now);
    db.upsert_score(&ScoreRecord {
        user_id,
        name: name.to_owned(),
        date,
        seconds: i64::from(seconds),
    })?;

    let averages = averages::refresh_averages(db, user_id, name)?;

    Ok(SubmissionReceipt {
        date,
        bucket: Bucket::of(date),
        averages,
    })
}
