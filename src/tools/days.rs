//! Day MCP Tools
//!
//! Starting a day, the per-day summary against the dog's targets, and the
//! history listing.

use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

use crate::db::{Database, DbResult};
use crate::energy::{round_to, round_whole, WeatherCondition};
use crate::models::{
    total_burned, total_minutes, total_nutrients, ActivityEntry, DailyLog, DailyLogCreate,
    DogProfile, MealEntry, NutrientProfile, TimeOfDay,
};

use super::parse_weather;

/// Consumed share of target counted as on track, in percent
const ON_TRACK_MIN_PERCENT: f64 = 80.0;
const ON_TRACK_MAX_PERCENT: f64 = 120.0;

/// Response for start_day
#[derive(Debug, Serialize)]
pub struct StartDayResponse {
    pub id: i64,
    pub date: String,
    pub weather: WeatherCondition,
    pub created: bool, // false when the day had already been started
    pub targets: NutrientProfile,
}

/// One nutrient measured against its target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientProgress {
    pub nutrient: &'static str,
    pub unit: &'static str,
    pub actual: f64,
    pub target: f64,
    pub percent: f64, // capped at 100
    pub on_track: bool,
}

/// Totals for one day
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub consumed: NutrientProfile,
    pub burned_calories: u64,
    pub net_calories: f64,
    pub activity_minutes: f64,
    pub progress: Vec<NutrientProgress>,
}

/// Activities split by part of the day
#[derive(Debug, Default, Serialize)]
pub struct DayActivities {
    pub day: Vec<ActivityEntry>,
    pub night: Vec<ActivityEntry>,
}

/// Day with entries and summary for detailed view
#[derive(Debug, Serialize)]
pub struct DayDetail {
    pub id: i64,
    pub date: String,
    pub weather: WeatherCondition,
    pub profile: DogProfile,
    pub meals: Vec<MealEntry>,
    pub activities: DayActivities,
    pub summary: DaySummary,
    pub ai_advice: Option<String>,
    pub quiz_completed: bool,
}

/// Day row for the history listing
#[derive(Debug, Serialize)]
pub struct HistoryRow {
    pub date: String,
    pub weather: WeatherCondition,
    pub consumed_calories: f64,
    pub burned_calories: u64,
    pub net_calories: f64,
    pub sodium: f64,
    pub water: f64,
    pub protein: f64,
    pub meal_count: usize,
    pub activity_count: usize,
}

/// Response for list_days
#[derive(Debug, Serialize)]
pub struct ListDaysResponse {
    pub days: Vec<HistoryRow>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

// ============================================================================
// Summaries
// ============================================================================

/// Compare an actual amount with its target.
///
/// `percent` is capped at 100 for display, but `on_track` tests the uncapped
/// share against 80-120%, so eating well past the target (for example 160%
/// of the sodium target) reads as 100% and off track. A zero target is only
/// met by zero.
pub fn nutrient_progress(
    nutrient: &'static str,
    unit: &'static str,
    actual: f64,
    target: f64,
) -> NutrientProgress {
    let (percent, on_track) = if target > 0.0 {
        let share = actual / target * 100.0;
        (
            round_whole(share.clamp(0.0, 100.0)),
            (ON_TRACK_MIN_PERCENT..=ON_TRACK_MAX_PERCENT).contains(&share),
        )
    } else {
        (0.0, actual == 0.0)
    };

    NutrientProgress {
        nutrient,
        unit,
        actual: round_to(actual, 2),
        target,
        percent,
        on_track,
    }
}

pub fn summarize(
    targets: &NutrientProfile,
    meals: &[MealEntry],
    activities: &[ActivityEntry],
) -> DaySummary {
    let consumed = total_nutrients(meals);
    let burned_calories = total_burned(activities);

    let progress = consumed
        .fields()
        .iter()
        .zip(targets.fields().iter())
        .map(|(&(nutrient, unit, actual), &(_, _, target))| {
            nutrient_progress(nutrient, unit, actual, target)
        })
        .collect();

    DaySummary {
        net_calories: consumed.calories - burned_calories as f64,
        consumed,
        burned_calories,
        activity_minutes: total_minutes(activities),
        progress,
    }
}

pub fn group_by_time_of_day(activities: Vec<ActivityEntry>) -> DayActivities {
    let mut grouped = DayActivities::default();
    for activity in activities {
        match activity.effective_time_of_day() {
            TimeOfDay::Day => grouped.day.push(activity),
            TimeOfDay::Night => grouped.night.push(activity),
        }
    }
    grouped
}

fn load_entries(conn: &Connection, log: &DailyLog) -> DbResult<(Vec<MealEntry>, Vec<ActivityEntry>)> {
    let meals = MealEntry::list_for_log(conn, log.id)?;
    let activities = ActivityEntry::list_for_log(conn, log.id)?;
    Ok((meals, activities))
}

// ============================================================================
// Day Tools
// ============================================================================

/// Start a day, or return it if already started. Requires a profile.
pub fn start_day(db: &Database, date: &str, weather: &str) -> Result<StartDayResponse, String> {
    let weather = parse_weather(weather)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = DogProfile::get(&conn)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| "No dog profile yet. Call create_profile first.".to_string())?;

    let data = DailyLogCreate {
        date: date.to_string(),
        weather,
        profile_snapshot: profile,
    };

    let (log, created) = DailyLog::get_or_create(&conn, &data)
        .map_err(|e| format!("Failed to start day: {}", e))?;

    if created {
        info!(date = %log.date, weather = %log.weather, "Started day");
    }

    Ok(StartDayResponse {
        id: log.id,
        date: log.date,
        weather: log.weather,
        created,
        targets: log.profile_snapshot.target_nutrients,
    })
}

/// Get a day with entries and its summary
pub fn get_day(db: &Database, date: &str) -> Result<Option<DayDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let log = DailyLog::get_by_date(&conn, date)
        .map_err(|e| format!("Failed to get day: {}", e))?;

    match log {
        Some(log) => {
            let (meals, activities) = load_entries(&conn, &log)
                .map_err(|e| format!("Failed to get entries: {}", e))?;
            let summary = summarize(&log.profile_snapshot.target_nutrients, &meals, &activities);

            Ok(Some(DayDetail {
                id: log.id,
                date: log.date,
                weather: log.weather,
                profile: log.profile_snapshot,
                meals,
                activities: group_by_time_of_day(activities),
                summary,
                ai_advice: log.ai_advice,
                quiz_completed: log.quiz_completed,
            }))
        }
        None => Ok(None),
    }
}

/// List days, newest first
pub fn list_days(db: &Database, limit: i64, offset: i64) -> Result<ListDaysResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let logs = DailyLog::list(&conn, limit, offset)
        .map_err(|e| format!("Failed to list days: {}", e))?;
    let total = DailyLog::count(&conn).map_err(|e| format!("Failed to count days: {}", e))?;

    let mut days = Vec::with_capacity(logs.len());
    for log in logs {
        let (meals, activities) = load_entries(&conn, &log)
            .map_err(|e| format!("Failed to get entries: {}", e))?;
        let consumed = total_nutrients(&meals);
        let burned_calories = total_burned(&activities);

        days.push(HistoryRow {
            date: log.date,
            weather: log.weather,
            consumed_calories: consumed.calories,
            burned_calories,
            net_calories: consumed.calories - burned_calories as f64,
            sodium: consumed.sodium,
            water: consumed.water,
            protein: consumed.protein,
            meal_count: meals.len(),
            activity_count: activities.len(),
        });
    }

    Ok(ListDaysResponse { days, total, limit, offset })
}

/// Delete a day with all its meals and activities
pub fn delete_day(db: &Database, date: &str) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let log = DailyLog::get_by_date(&conn, date)
        .map_err(|e| format!("Failed to get day: {}", e))?;

    match log {
        Some(log) => {
            let deleted = DailyLog::delete(&conn, log.id)
                .map_err(|e| format!("Failed to delete day: {}", e))?;
            info!(date = %date, "Deleted day");
            Ok(deleted)
        }
        None => Ok(false),
    }
}
