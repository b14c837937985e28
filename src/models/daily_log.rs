//! Daily log model
//!
//! One row per date. The profile is copied into the log when the day is
//! started so later profile edits do not rewrite history.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::energy::WeatherCondition;

use super::{column_error, DogProfile, Quiz};

/// A tracked day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLog {
    pub id: i64,
    pub date: String, // ISO date: "2025-01-09"
    pub weather: WeatherCondition,
    pub profile_snapshot: DogProfile,
    pub ai_advice: Option<String>,
    pub quiz: Option<Quiz>,
    pub quiz_completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a daily log
#[derive(Debug, Clone)]
pub struct DailyLogCreate {
    pub date: String,
    pub weather: WeatherCondition,
    pub profile_snapshot: DogProfile,
}

impl DailyLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let weather_str: String = row.get("weather")?;
        let weather = weather_str.parse::<WeatherCondition>().map_err(column_error)?;
        let snapshot_json: String = row.get("profile_snapshot")?;
        let profile_snapshot = serde_json::from_str::<DogProfile>(&snapshot_json).map_err(column_error)?;
        let quiz = row
            .get::<_, Option<String>>("quiz")?
            .map(|json| serde_json::from_str::<Quiz>(&json))
            .transpose()
            .map_err(column_error)?;

        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            weather,
            profile_snapshot,
            ai_advice: row.get("ai_advice")?,
            quiz,
            quiz_completed: row.get::<_, i32>("quiz_completed")? != 0,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &DailyLogCreate) -> DbResult<Self> {
        let snapshot = serde_json::to_string(&data.profile_snapshot)?;

        conn.execute(
            r#"
            INSERT INTO daily_logs (date, weather, profile_snapshot)
            VALUES (?1, ?2, ?3)
            "#,
            params![data.date, data.weather.as_str(), snapshot],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM daily_logs WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_by_date(conn: &Connection, date: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM daily_logs WHERE date = ?1")?;

        let result = stmt.query_row([date], Self::from_row);
        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Return the log for the date, creating it if needed. The bool is true when created.
    pub fn get_or_create(conn: &Connection, data: &DailyLogCreate) -> DbResult<(Self, bool)> {
        if let Some(log) = Self::get_by_date(conn, &data.date)? {
            return Ok((log, false));
        }
        Ok((Self::create(conn, data)?, true))
    }

    /// Logs ordered newest first
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM daily_logs ORDER BY date DESC LIMIT ?1 OFFSET ?2",
        )?;
        let logs = stmt
            .query_map(params![limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// The most recent `n` logs in chronological order
    pub fn list_recent(conn: &Connection, n: i64) -> DbResult<Vec<Self>> {
        let mut logs = Self::list(conn, n, 0)?;
        logs.reverse();
        Ok(logs)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM daily_logs", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn set_ai_advice(conn: &Connection, id: i64, advice: &str) -> DbResult<()> {
        conn.execute(
            "UPDATE daily_logs SET ai_advice = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![advice, id],
        )?;
        Ok(())
    }

    pub fn set_quiz(conn: &Connection, id: i64, quiz: &Quiz) -> DbResult<()> {
        let json = serde_json::to_string(quiz)?;
        conn.execute(
            "UPDATE daily_logs SET quiz = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![json, id],
        )?;
        Ok(())
    }

    pub fn mark_quiz_completed(conn: &Connection, id: i64) -> DbResult<()> {
        conn.execute(
            "UPDATE daily_logs SET quiz_completed = 1, updated_at = datetime('now') WHERE id = ?1",
            [id],
        )?;
        Ok(())
    }

    /// Delete a log; its meals and activities go with it
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM daily_logs WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
