//! Activity entry model
//!
//! A logged activity. The burned calories are computed once when the entry is
//! logged and never recalculated.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Timelike, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::energy::ActivityCategory;

use super::column_error;

/// Hour at which an untagged activity counts as a night activity
const NIGHT_STARTS_AT_HOUR: u32 = 18;

/// Part of the day an activity happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Day => "day",
            TimeOfDay::Night => "night",
        }
    }

    /// Day before 18:00, night from 18:00
    pub fn from_hour(hour: u32) -> Self {
        if hour < NIGHT_STARTS_AT_HOUR {
            TimeOfDay::Day
        } else {
            TimeOfDay::Night
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(TimeOfDay::Day),
            "night" => Ok(TimeOfDay::Night),
            other => Err(format!("unknown time of day '{}'", other)),
        }
    }
}

/// A logged activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: i64,
    pub daily_log_id: i64,
    pub category: ActivityCategory,
    pub duration_minutes: f64,
    pub calories_burned: u32,
    pub time_of_day: Option<TimeOfDay>,
    pub timestamp: String,
    pub created_at: String,
}

/// Data for logging an activity
#[derive(Debug, Clone)]
pub struct ActivityEntryCreate {
    pub daily_log_id: i64,
    pub category: ActivityCategory,
    pub duration_minutes: f64,
    pub calories_burned: u32,
    pub time_of_day: Option<TimeOfDay>,
    pub timestamp: Option<String>,
}

impl ActivityEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let category_str: String = row.get("category")?;
        let category = category_str.parse::<ActivityCategory>().map_err(column_error)?;
        let time_of_day = row
            .get::<_, Option<String>>("time_of_day")?
            .map(|s| s.parse::<TimeOfDay>())
            .transpose()
            .map_err(column_error)?;

        Ok(Self {
            id: row.get("id")?,
            daily_log_id: row.get("daily_log_id")?,
            category,
            duration_minutes: row.get("duration_minutes")?,
            calories_burned: row.get("calories_burned")?,
            time_of_day,
            timestamp: row.get("timestamp")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &ActivityEntryCreate) -> DbResult<Self> {
        let timestamp = data.timestamp.clone().unwrap_or_else(|| {
            Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
        });

        conn.execute(
            r#"
            INSERT INTO activity_entries
            (daily_log_id, category, duration_minutes, calories_burned, time_of_day, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                data.daily_log_id,
                data.category.as_str(),
                data.duration_minutes,
                data.calories_burned,
                data.time_of_day.map(|t| t.as_str()),
                timestamp,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM activity_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_for_log(conn: &Connection, daily_log_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM activity_entries WHERE daily_log_id = ?1 ORDER BY timestamp, id",
        )?;
        let entries = stmt
            .query_map([daily_log_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM activity_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Explicit tag if present, otherwise derived from the timestamp hour
    pub fn effective_time_of_day(&self) -> TimeOfDay {
        if let Some(tag) = self.time_of_day {
            return tag;
        }
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|ts| TimeOfDay::from_hour(ts.with_timezone(&Utc).hour()))
            .unwrap_or(TimeOfDay::Day)
    }
}

/// Total kcal burned across activities; widened so many large burns cannot overflow
pub fn total_burned(activities: &[ActivityEntry]) -> u64 {
    activities.iter().map(|a| u64::from(a.calories_burned)).sum()
}

/// Total minutes of activity
pub fn total_minutes(activities: &[ActivityEntry]) -> f64 {
    activities.iter().map(|a| a.duration_minutes).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tag: Option<TimeOfDay>, timestamp: &str, burned: u32) -> ActivityEntry {
        ActivityEntry {
            id: 1,
            daily_log_id: 1,
            category: ActivityCategory::LightWalk,
            duration_minutes: 20.0,
            calories_burned: burned,
            time_of_day: tag,
            timestamp: timestamp.to_string(),
            created_at: "2025-03-01 08:00:00".to_string(),
        }
    }

    #[test]
    fn test_time_of_day_from_hour() {
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_hour(18), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Night);
    }

    #[test]
    fn test_effective_time_of_day() {
        assert_eq!(entry(None, "2025-03-01T19:30:00Z", 5).effective_time_of_day(), TimeOfDay::Night);
        assert_eq!(entry(None, "2025-03-01T07:30:00Z", 5).effective_time_of_day(), TimeOfDay::Day);
        assert_eq!(
            entry(Some(TimeOfDay::Day), "2025-03-01T21:00:00Z", 5).effective_time_of_day(),
            TimeOfDay::Day
        );
    }

    #[test]
    fn test_totals() {
        let activities = vec![
            entry(None, "2025-03-01T07:30:00Z", 42),
            entry(None, "2025-03-01T19:30:00Z", 11),
        ];
        assert_eq!(total_burned(&activities), 53);
        assert_eq!(total_minutes(&activities), 40.0);
    }

    #[test]
    fn test_total_burned_of_huge_burns_does_not_wrap() {
        let activities = vec![
            entry(None, "2025-03-01T07:30:00Z", 2_800_000_000),
            entry(None, "2025-03-01T09:30:00Z", 2_800_000_000),
            entry(None, "2025-03-01T19:30:00Z", u32::MAX),
        ];
        assert_eq!(total_burned(&activities), 5_600_000_000 + u64::from(u32::MAX));
    }
}
