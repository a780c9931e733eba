use chrono::NaiveDate;

/// One recorded solve, keyed by (user, puzzle-date).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    /// Discord user id; stable across display-name changes.
    pub user_id: i64,
    /// Display name as of the last submission.
    pub name: String,
    /// Puzzle date the time is attributed to.
    pub date: NaiveDate,
    /// Elapsed solve time in seconds.
    pub seconds: i64,
}

/// Cached per-user bucket averages, materialized from the Scores table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRecord {
    /// Discord user id.
    pub user_id: i64,
    /// Last-known display name.
    pub name: String,
    /// Truncated mean over non-Saturday scores, if any exist.
    pub weekday_avg: Option<i64>,
    /// Truncated mean over Saturday scores, if any exist.
    pub saturday_avg: Option<i64>,
}
