//! Activity MCP Tools
//!
//! Burned calories are computed with the weight from the day's profile
//! snapshot, so later weight changes leave past days untouched.

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::energy::compute_burned_calories;
use crate::models::{ActivityEntry, ActivityEntryCreate, DailyLog, TimeOfDay};

use super::parse_category;

/// Response for log_activity
#[derive(Debug, Serialize)]
pub struct LogActivityResponse {
    pub date: String,
    pub weight_kg: f64,
    pub time_of_day: TimeOfDay,
    pub activity: ActivityEntry,
}

/// Log an activity for a started day
pub fn log_activity(
    db: &Database,
    date: &str,
    category: &str,
    duration_minutes: f64,
    time_of_day: Option<&str>,
    timestamp: Option<String>,
) -> Result<LogActivityResponse, String> {
    let category = parse_category(category)?;
    let time_of_day = time_of_day
        .map(|t| t.parse::<TimeOfDay>())
        .transpose()
        .map_err(|e| format!("Invalid time of day: {}", e))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let log = DailyLog::get_by_date(&conn, date)
        .map_err(|e| format!("Failed to get day: {}", e))?
        .ok_or_else(|| format!("Day not started: {}. Call start_day first.", date))?;

    let weight_kg = log.profile_snapshot.weight_kg;
    let calories_burned = compute_burned_calories(weight_kg, category, duration_minutes)
        .map_err(|e| format!("Invalid activity: {}", e))?;

    let data = ActivityEntryCreate {
        daily_log_id: log.id,
        category,
        duration_minutes,
        calories_burned,
        time_of_day,
        timestamp,
    };

    let activity = ActivityEntry::create(&conn, &data)
        .map_err(|e| format!("Failed to log activity: {}", e))?;

    info!(
        date = %log.date,
        category = %activity.category,
        calories_burned,
        "Logged activity"
    );

    Ok(LogActivityResponse {
        date: log.date,
        weight_kg,
        time_of_day: activity.effective_time_of_day(),
        activity,
    })
}

/// Delete an activity entry
pub fn delete_activity(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    ActivityEntry::delete(&conn, id).map_err(|e| format!("Failed to delete activity: {}", e))
}
