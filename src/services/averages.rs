//! Incremental maintenance of the cached per-bucket averages.
//!
//! The Ranking table is a materialized view over Scores: each column must
//! equal what a full recomputation would produce, so every score mutation is
//! followed by a refresh here.

use crate::dao::{Database, ScoreRecord};
use crate::error::ServiceError;
use crate::puzzle::Bucket;

/// Before/after view of one bucket's cached average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvgDelta {
    /// Cached value before the refresh; `None` when no ranking row existed
    /// or the bucket was previously empty.
    pub previous: Option<i64>,
    /// Value after the refresh; `None` when the bucket holds no scores.
    pub current: Option<i64>,
}

impl AvgDelta {
    /// Signed change, available when the bucket had a value both before and
    /// after the refresh.
    pub fn change(self) -> Option<i64> {
        Some(self.current? - self.previous?)
    }
}

/// Outcome of refreshing both cached averages for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshedAverages {
    /// Weekday-bucket average before and after.
    pub weekday: AvgDelta,
    /// Saturday-bucket average before and after.
    pub saturday: AvgDelta,
}

/// Recompute a user's bucket averages from their full score history and
/// reconcile the Ranking row: each column gets the truncated mean of its
/// bucket (NULL when the bucket is empty), and the row is deleted outright
/// when no scores remain at all.
pub fn refresh_averages(
    db: &Database,
    user_id: i64,
    name: &str,
) -> Result<RefreshedAverages, ServiceError> {
    let (weekday_vals, saturday_vals) = bucket_values(&db.scores_for_user(user_id)?);

    let (prev_weekday, prev_saturday) = match db.ranking_for_user(user_id)? {
        Some(record) => (record.weekday_avg, record.saturday_avg),
        None => (None, None),
    };

    let weekday_avg = truncated_mean(&weekday_vals);
    let saturday_avg = truncated_mean(&saturday_vals);

    if weekday_avg.is_none() && saturday_avg.is_none() {
        db.delete_ranking(user_id)?;
    } else {
        db.set_weekday_avg(user_id, name, weekday_avg)?;
        db.set_saturday_avg(user_id, name, saturday_avg)?;
    }

    Ok(RefreshedAverages {
        weekday: AvgDelta {
            previous: prev_weekday,
            current: weekday_avg,
        },
        saturday: AvgDelta {
            previous: prev_saturday,
            current: saturday_avg,
        },
    })
}

/// Partition scores into (weekday, Saturday) bucket values by stored date.
pub(crate) fn bucket_values(scores: &[ScoreRecord]) -> (Vec<i64>, Vec<i64>) {
    let mut weekday = Vec::new();
    let mut saturday = Vec::new();
    for score in scores {
        match Bucket::of(score.date) {
            Bucket::Weekday => weekday.push(score.seconds),
            Bucket::Saturday => saturday.push(score.seconds),
        }
    }
    (weekday, saturday)
}

fn truncated_mean(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<i64>() / values.len() as i64)
    }
}
