use rusqlite::{OptionalExtension, Row, params};

use super::{Database, RankingRecord, StoreResult};

impl Database {
    /// Cached averages for one user, if a ranking row exists.
    pub fn ranking_for_user(&self, user_id: i64) -> StoreResult<Option<RankingRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                "SELECT ID, Name, RegAvg, SatAvg FROM Ranking WHERE ID = ?1",
                params![user_id],
                ranking_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Every ranking row, in stable ID order.
    pub fn all_rankings(&self) -> StoreResult<Vec<RankingRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT ID, Name, RegAvg, SatAvg FROM Ranking ORDER BY ID")?;
        let rows = stmt.query_map(params![], ranking_from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Write the weekday average column (NULL when the bucket is empty),
    /// preserving any existing Saturday average.
    pub fn set_weekday_avg(&self, user_id: i64, name: &str, avg: Option<i64>) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO Ranking (ID, Name, RegAvg, SatAvg) VALUES (?1, ?2, ?3, NULL)
             ON CONFLICT (ID) DO UPDATE SET Name = excluded.Name, RegAvg = excluded.RegAvg",
            params![user_id, name, avg],
        )?;
        Ok(())
    }

    /// Write the Saturday average column (NULL when the bucket is empty),
    /// preserving any existing weekday average.
    pub fn set_saturday_avg(&self, user_id: i64, name: &str, avg: Option<i64>) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO Ranking (ID, Name, RegAvg, SatAvg) VALUES (?1, ?2, NULL, ?3)
             ON CONFLICT (ID) DO UPDATE SET Name = excluded.Name, SatAvg = excluded.SatAvg",
            params![user_id, name, avg],
        )?;
        Ok(())
    }

    /// Remove a user's ranking row entirely.
    pub fn delete_ranking(&self, user_id: i64) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM Ranking WHERE ID = ?1", params![user_id])?;
        Ok(())
    }
}

fn ranking_from_row(row: &Row<'_>) -> rusqlite::Result<RankingRecord> {
    Ok(RankingRecord {
        user_id: row.get(0)?,
        name: row.get(1)?,
        weekday_avg: row.get(2)?,
        saturday_avg: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_preserve_the_other_column() {
        let db = Database::open_in_memory().unwrap();
        db.set_weekday_avg(1, "solver", Some(70)).unwrap();
        db.set_saturday_avg(1, "solver", Some(110)).unwrap();

        let record = db.ranking_for_user(1).unwrap().unwrap();
        assert_eq!(record.weekday_avg, Some(70));
        assert_eq!(record.saturday_avg, Some(110));
    }

    #[test]
    fn setting_null_clears_one_column_only() {
        let db = Database::open_in_memory().unwrap();
        db.set_weekday_avg(1, "solver", Some(70)).unwrap();
        db.set_saturday_avg(1, "solver", Some(110)).unwrap();
        db.set_weekday_avg(1, "solver", None).unwrap();

        let record = db.ranking_for_user(1).unwrap().unwrap();
        assert_eq!(record.weekday_avg, None);
        assert_eq!(record.saturday_avg, Some(110));
    }

    #[test]
    fn upsert_refreshes_display_name() {
        let db = Database::open_in_memory().unwrap();
        db.set_weekday_avg(1, "old-name", Some(70)).unwrap();
        db.set_weekday_avg(1, "new-name", Some(65)).unwrap();

        let record = db.ranking_for_user(1).unwrap().unwrap();
        assert_eq!(record.name, "new-name");
        assert_eq!(record.weekday_avg, Some(65));
    }

    #[test]
    fn delete_removes_the_row() {
        let db = Database::open_in_memory().unwrap();
        db.set_weekday_avg(1, "solver", Some(70)).unwrap();
        db.delete_ranking(1).unwrap();

        assert!(db.ranking_for_user(1).unwrap().is_none());
        assert!(db.all_rankings().unwrap().is_empty());
    }
}
