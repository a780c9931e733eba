use chrono::NaiveDate;
use rusqlite::{Params, params};

use super::{Database, ScoreRecord, StoreError, StoreResult};

impl Database {
    /// Insert a score, replacing any earlier submission for the same
    /// (user, puzzle-date) pair.
    pub fn upsert_score(&self, record: &ScoreRecord) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO Scores (ID, Name, Date, Score) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (ID, Date) DO UPDATE SET Name = excluded.Name, Score = excluded.Score",
            params![
                record.user_id,
                record.name,
                record.date.to_string(),
                record.seconds
            ],
        )?;
        Ok(())
    }

    /// All of one user's scores, oldest puzzle-date first.
    pub fn scores_for_user(&self, user_id: i64) -> StoreResult<Vec<ScoreRecord>> {
        self.query_scores(
            "SELECT ID, Name, Date, Score FROM Scores WHERE ID = ?1 ORDER BY Date",
            params![user_id],
        )
    }

    /// One user's most recent scores, newest puzzle-date first.
    pub fn recent_scores(&self, user_id: i64, limit: u32) -> StoreResult<Vec<ScoreRecord>> {
        self.query_scores(
            "SELECT ID, Name, Date, Score FROM Scores WHERE ID = ?1 ORDER BY Date DESC LIMIT ?2",
            params![user_id, limit],
        )
    }

    /// Every recorded score, across all users.
    pub fn all_scores(&self) -> StoreResult<Vec<ScoreRecord>> {
        self.query_scores(
            "SELECT ID, Name, Date, Score FROM Scores ORDER BY ID, Date",
            params![],
        )
    }

    /// Delete one (user, puzzle-date) score. Returns whether a row existed.
    pub fn delete_score(&self, user_id: i64, date: NaiveDate) -> StoreResult<bool> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "DELETE FROM Scores WHERE ID = ?1 AND Date = ?2",
            params![user_id, date.to_string()],
        )?;
        Ok(affected > 0)
    }

    fn query_scores(&self, sql: &str, params: impl Params) -> StoreResult<Vec<ScoreRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (user_id, name, raw_date, seconds) = row?;
            let date = raw_date
                .parse()
                .map_err(|_| StoreError::MalformedDate(raw_date.clone()))?;
            records.push(ScoreRecord {
                user_id,
                name,
                date,
                seconds,
            });
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn score(user_id: i64, day: NaiveDate, seconds: i64) -> ScoreRecord {
        ScoreRecord {
            user_id,
            name: "solver".into(),
            date: day,
            seconds,
        }
    }

    #[test]
    fn resubmission_replaces_same_date_row() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_score(&score(1, date(2021, 3, 3), 80)).unwrap();
        db.upsert_score(&score(1, date(2021, 3, 3), 45)).unwrap();

        let scores = db.scores_for_user(1).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].seconds, 45);
    }

    #[test]
    fn recent_scores_are_newest_first_and_limited() {
        let db = Database::open_in_memory().unwrap();
        for day in 1u32..=5 {
            db.upsert_score(&score(1, date(2021, 3, day), 60 + i64::from(day)))
                .unwrap();
        }

        let recent = db.recent_scores(1, 3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].date, date(2021, 3, 5));
        assert_eq!(recent[2].date, date(2021, 3, 3));
    }

    #[test]
    fn scores_are_scoped_per_user() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_score(&score(1, date(2021, 3, 3), 80)).unwrap();
        db.upsert_score(&score(2, date(2021, 3, 3), 90)).unwrap();

        assert_eq!(db.scores_for_user(1).unwrap().len(), 1);
        assert_eq!(db.all_scores().unwrap().len(), 2);
    }

    #[test]
    fn delete_reports_whether_a_row_existed() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_score(&score(1, date(2021, 3, 3), 80)).unwrap();

        assert!(db.delete_score(1, date(2021, 3, 3)).unwrap());
        assert!(!db.delete_score(1, date(2021, 3, 3)).unwrap());
        assert!(db.scores_for_user(1).unwrap().is_empty());
    }
}
