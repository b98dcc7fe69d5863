use crate::app_dirs::AppDirs;
use crate::session::GameMode;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// High-score table never holds more than this many entries.
pub const HIGH_SCORE_CAP: usize = 10;

/// One finished game good enough to keep around.
#[derive(Debug, Clone, PartialEq)]
pub struct HighScoreEntry {
    pub score: u32,
    pub words_found: u32,
    pub mode: GameMode,
    pub recorded_at: DateTime<Local>,
}

/// Aggregate lifetime statistics. `average_score` is always recomputed from
/// the totals, never tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsRecord {
    pub games_played: u32,
    pub total_score: u32,
    pub total_words_found: u32,
    pub best_score: u32,
    pub average_score: u32,
}

impl StatsRecord {
    pub fn apply_game(&mut self, score: u32, words_found: u32) {
        self.games_played += 1;
        self.total_score += score;
        self.total_words_found += words_found;
        self.best_score = self.best_score.max(score);
        self.average_score = (self.total_score as f64 / self.games_played as f64).round() as u32;
    }
}

/// Backend-neutral failure from the persistence layer. Never fatal to a
/// session; callers degrade to a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsError(String);

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stats store: {}", self.0)
    }
}

impl std::error::Error for StatsError {}

impl From<rusqlite::Error> for StatsError {
    fn from(e: rusqlite::Error) -> Self {
        Self(e.to_string())
    }
}

/// Storage port for high scores and lifetime statistics. The engine only ever
/// talks to this contract, so tests can run against the in-memory fake.
pub trait StatsStore {
    /// High scores, descending by score, at most [`HIGH_SCORE_CAP`].
    fn load_high_scores(&self) -> Result<Vec<HighScoreEntry>, StatsError>;

    /// Insert, re-sort descending (stable, so ties keep insertion order) and
    /// truncate to [`HIGH_SCORE_CAP`].
    fn record_high_score(&mut self, entry: HighScoreEntry) -> Result<(), StatsError>;

    /// Zeroed defaults when nothing has been recorded yet.
    fn load_stats(&self) -> Result<StatsRecord, StatsError>;

    /// Fold one finished game into the aggregates and return the result.
    fn record_game_result(
        &mut self,
        score: u32,
        words_found: u32,
    ) -> Result<StatsRecord, StatsError>;
}

impl<T: StatsStore + ?Sized> StatsStore for Box<T> {
    fn load_high_scores(&self) -> Result<Vec<HighScoreEntry>, StatsError> {
        (**self).load_high_scores()
    }

    fn record_high_score(&mut self, entry: HighScoreEntry) -> Result<(), StatsError> {
        (**self).record_high_score(entry)
    }

    fn load_stats(&self) -> Result<StatsRecord, StatsError> {
        (**self).load_stats()
    }

    fn record_game_result(
        &mut self,
        score: u32,
        words_found: u32,
    ) -> Result<StatsRecord, StatsError> {
        (**self).record_game_result(score, words_found)
    }
}

/// Sqlite-backed store under the local state directory.
#[derive(Debug)]
pub struct SqliteStatsStore {
    conn: Connection,
}

impl SqliteStatsStore {
    pub fn new() -> Result<Self, StatsError> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("gridspell_stats.db"));

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StatsError(e.to_string()))?;
        }

        let conn = Connection::open(&db_path)?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StatsError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS high_scores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                score INTEGER NOT NULL,
                words_found INTEGER NOT NULL,
                mode TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_high_scores_score ON high_scores(score)",
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS lifetime_stats (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                games_played INTEGER NOT NULL,
                total_score INTEGER NOT NULL,
                total_words_found INTEGER NOT NULL,
                best_score INTEGER NOT NULL,
                average_score INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        Ok(())
    }
}

impl StatsStore for SqliteStatsStore {
    fn load_high_scores(&self) -> Result<Vec<HighScoreEntry>, StatsError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT score, words_found, mode, recorded_at
            FROM high_scores
            ORDER BY score DESC, id ASC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([HIGH_SCORE_CAP as i64], |row| {
            let mode_str: String = row.get(2)?;
            let mode = GameMode::from_str(&mode_str).map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    2,
                    "mode".to_string(),
                    rusqlite::types::Type::Text,
                )
            })?;

            let recorded_str: String = row.get(3)?;
            let recorded_at = DateTime::parse_from_rfc3339(&recorded_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        3,
                        "recorded_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(HighScoreEntry {
                score: row.get(0)?,
                words_found: row.get(1)?,
                mode,
                recorded_at,
            })
        })?;

        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }

        Ok(entries)
    }

    fn record_high_score(&mut self, entry: HighScoreEntry) -> Result<(), StatsError> {
        self.conn.execute(
            r#"
            INSERT INTO high_scores (score, words_found, mode, recorded_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                entry.score,
                entry.words_found,
                entry.mode.to_string().to_lowercase(),
                entry.recorded_at.to_rfc3339(),
            ],
        )?;

        // Keep only the top entries; id order breaks score ties by insertion
        self.conn.execute(
            r#"
            DELETE FROM high_scores
            WHERE id NOT IN (
                SELECT id FROM high_scores ORDER BY score DESC, id ASC LIMIT ?1
            )
            "#,
            [HIGH_SCORE_CAP as i64],
        )?;

        Ok(())
    }

    fn load_stats(&self) -> Result<StatsRecord, StatsError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT games_played, total_score, total_words_found, best_score, average_score
            FROM lifetime_stats
            WHERE id = 1
            "#,
        )?;

        let record = stmt
            .query_row([], |row| {
                Ok(StatsRecord {
                    games_played: row.get(0)?,
                    total_score: row.get(1)?,
                    total_words_found: row.get(2)?,
                    best_score: row.get(3)?,
                    average_score: row.get(4)?,
                })
            })
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(StatsRecord::default()),
                other => Err(other),
            })?;

        Ok(record)
    }

    fn record_game_result(
        &mut self,
        score: u32,
        words_found: u32,
    ) -> Result<StatsRecord, StatsError> {
        let mut record = self.load_stats()?;
        record.apply_game(score, words_found);

        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO lifetime_stats
            (id, games_played, total_score, total_words_found, best_score, average_score)
            VALUES (1, ?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.games_played,
                record.total_score,
                record.total_words_found,
                record.best_score,
                record.average_score,
            ],
        )?;

        Ok(record)
    }
}

/// In-memory store for engine tests; same contract, no backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatsStore {
    high_scores: Vec<HighScoreEntry>,
    stats: StatsRecord,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsStore for MemoryStatsStore {
    fn load_high_scores(&self) -> Result<Vec<HighScoreEntry>, StatsError> {
        Ok(self.high_scores.clone())
    }

    fn record_high_score(&mut self, entry: HighScoreEntry) -> Result<(), StatsError> {
        self.high_scores.push(entry);
        // stable sort keeps insertion order for equal scores
        self.high_scores.sort_by(|a, b| b.score.cmp(&a.score));
        self.high_scores.truncate(HIGH_SCORE_CAP);
        Ok(())
    }

    fn load_stats(&self) -> Result<StatsRecord, StatsError> {
        Ok(self.stats)
    }

    fn record_game_result(
        &mut self,
        score: u32,
        words_found: u32,
    ) -> Result<StatsRecord, StatsError> {
        self.stats.apply_game(score, words_found);
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u32) -> HighScoreEntry {
        HighScoreEntry {
            score,
            words_found: score / 5,
            mode: GameMode::Classic,
            recorded_at: Local::now(),
        }
    }

    fn check_cap_and_order(store: &mut dyn StatsStore) {
        for score in [30, 10, 50, 20, 40, 60, 5, 70, 15, 25, 35, 45, 55] {
            store.record_high_score(entry(score)).unwrap();
        }

        let scores = store.load_high_scores().unwrap();
        assert_eq!(scores.len(), HIGH_SCORE_CAP);
        for pair in scores.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(scores[0].score, 70);
        // the three lowest fell off the bottom
        assert!(scores.iter().all(|e| e.score >= 20));
    }

    #[test]
    fn test_memory_store_cap_and_order() {
        let mut store = MemoryStatsStore::new();
        check_cap_and_order(&mut store);
    }

    #[test]
    fn test_sqlite_store_cap_and_order() {
        let mut store = SqliteStatsStore::open_in_memory().unwrap();
        check_cap_and_order(&mut store);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut store = MemoryStatsStore::new();
        let mut first = entry(20);
        first.words_found = 1;
        let mut second = entry(20);
        second.words_found = 2;

        store.record_high_score(first).unwrap();
        store.record_high_score(second).unwrap();

        let scores = store.load_high_scores().unwrap();
        assert_eq!(scores[0].words_found, 1);
        assert_eq!(scores[1].words_found, 2);
    }

    #[test]
    fn test_sqlite_ties_keep_insertion_order() {
        let mut store = SqliteStatsStore::open_in_memory().unwrap();
        let mut first = entry(20);
        first.words_found = 1;
        let mut second = entry(20);
        second.words_found = 2;

        store.record_high_score(first).unwrap();
        store.record_high_score(second).unwrap();

        let scores = store.load_high_scores().unwrap();
        assert_eq!(scores[0].words_found, 1);
        assert_eq!(scores[1].words_found, 2);
    }

    #[test]
    fn test_sqlite_round_trips_mode_and_timestamp() {
        let mut store = SqliteStatsStore::open_in_memory().unwrap();
        let recorded = entry(42);
        store.record_high_score(recorded.clone()).unwrap();

        let loaded = &store.load_high_scores().unwrap()[0];
        assert_eq!(loaded.score, 42);
        assert_eq!(loaded.mode, GameMode::Classic);
        assert_eq!(
            loaded.recorded_at.timestamp(),
            recorded.recorded_at.timestamp()
        );
    }

    #[test]
    fn test_stats_default_to_zero() {
        let store = SqliteStatsStore::open_in_memory().unwrap();
        assert_eq!(store.load_stats().unwrap(), StatsRecord::default());

        let memory = MemoryStatsStore::new();
        assert_eq!(memory.load_stats().unwrap(), StatsRecord::default());
    }

    #[test]
    fn test_record_game_result_accumulates() {
        let mut store = SqliteStatsStore::open_in_memory().unwrap();

        let first = store.record_game_result(10, 2).unwrap();
        assert_eq!(first.games_played, 1);
        assert_eq!(first.total_score, 10);
        assert_eq!(first.best_score, 10);
        assert_eq!(first.average_score, 10);

        let second = store.record_game_result(5, 1).unwrap();
        assert_eq!(second.games_played, 2);
        assert_eq!(second.total_score, 15);
        assert_eq!(second.total_words_found, 3);
        assert_eq!(second.best_score, 10);
        // round(15 / 2) = 8
        assert_eq!(second.average_score, 8);

        // persisted, not just computed
        assert_eq!(store.load_stats().unwrap(), second);
    }

    #[test]
    fn test_average_is_recomputed_not_stored_incrementally() {
        let mut record = StatsRecord::default();
        record.apply_game(10, 1);
        record.apply_game(11, 1);
        record.apply_game(12, 1);

        assert_eq!(record.average_score, 11);
        record.apply_game(0, 0);
        // round(33 / 4) = 8
        assert_eq!(record.average_score, 8);
    }
}
