//! Leaderboard construction: null filtering, staleness cutoff, top 10.

use chrono::NaiveDate;

use crate::dao::Database;
use crate::error::ServiceError;
use crate::puzzle::Bucket;

/// Most entries a leaderboard shows.
pub const LEADERBOARD_SIZE: usize = 10;

/// One leaderboard line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    /// Display name.
    pub name: String,
    /// Cached bucket average in seconds.
    pub average: i64,
    /// Number of qualifying scores behind the average.
    pub samples: usize,
}

/// Leaderboard query outcome, so each empty case gets its own message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaderboard {
    /// Nobody has a cached average for this bucket.
    NoScores,
    /// Everyone with an average was filtered out as stale.
    AllStale,
    /// Up to [`LEADERBOARD_SIZE`] entries, best average first.
    Top(Vec<LeaderboardRow>),
}

/// Build the bucket's top list: ranking rows with a non-null average for the
/// bucket, sorted ascending, minus users whose most recent qualifying score
/// is older than the bucket's staleness threshold as of `today`.
pub fn build_leaderboard(
    db: &Database,
    bucket: Bucket,
    today: NaiveDate,
) -> Result<Leaderboard, ServiceError> {
    let mut candidates: Vec<(i64, String, i64)> = db
        .all_rankings()?
        .into_iter()
        .filter_map(|record| {
            let average = match bucket {
                Bucket::Weekday => record.weekday_avg,
                Bucket::Saturday => record.saturday_avg,
            }?;
            Some((record.user_id, record.name, average))
        })
        .collect();

    if candidates.is_empty() {
        return Ok(Leaderboard::NoScores);
    }

    // Stable sort: ties keep their ID retrieval order.
    candidates.sort_by_key(|(_, _, average)| *average);

    let mut rows = Vec::new();
    for (user_id, name, average) in candidates {
        if rows.len() == LEADERBOARD_SIZE {
            break;
        }

        let dates: Vec<NaiveDate> = db
            .scores_for_user(user_id)?
            .into_iter()
            .filter(|score| Bucket::of(score.date) == bucket)
            .map(|score| score.date)
            .collect();

        // Scores come back oldest-first, so the last date is the newest.
        let Some(latest) = dates.last().copied() else {
            continue;
        };
        if (today - latest).num_days() > bucket.staleness_days() {
            continue;
        }

        rows.push(LeaderboardRow {
            name,
            average,
            samples: dates.len(),
        });
    }

    if rows.is_empty() {
        Ok(Leaderboard::AllStale)
    } else {
        Ok(Leaderboard::Top(rows))
    }
}
