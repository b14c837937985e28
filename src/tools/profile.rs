//! Profile and Calculator MCP Tools
//!
//! Creating the dog profile, plus the two pure calculators exposed directly:
//! daily targets and calories burned by an activity.

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::energy::{
    activity_factor, compute_burned_calories, compute_resting_energy, compute_target_nutrients,
    kcal_per_minute, met_value, round_to, ActivityCategory, WeatherCondition,
};
use crate::models::{DogProfile, DogProfileCreate, NutrientProfile};

use super::{parse_category, parse_habits, parse_weather};

/// Response for calculate_targets
#[derive(Debug, Serialize)]
pub struct TargetsResponse {
    pub weight_kg: f64,
    pub age_years: i32,
    pub weather: WeatherCondition,
    pub habits: Vec<ActivityCategory>,
    pub resting_energy: f64,   // kcal/day, one decimal
    pub activity_factor: f64,
    pub targets: NutrientProfile,
}

/// Response for calculate_burn
#[derive(Debug, Serialize)]
pub struct BurnResponse {
    pub weight_kg: f64,
    pub category: ActivityCategory,
    pub duration_minutes: f64,
    pub met: f64,
    pub kcal_per_minute: f64,
    pub calories_burned: u32,
}

// ============================================================================
// Profile Tools
// ============================================================================

/// Create (or replace) the dog profile and compute its targets
pub fn create_profile(
    db: &Database,
    name: &str,
    breed: Option<String>,
    age_years: i32,
    weight_kg: f64,
    habits: &[String],
    weather: &str,
) -> Result<DogProfile, String> {
    if name.trim().is_empty() {
        return Err("Name must not be empty".to_string());
    }

    let data = DogProfileCreate {
        name: name.to_string(),
        breed,
        age_years,
        weight_kg,
        habits: parse_habits(habits)?,
        weather: parse_weather(weather)?,
    };

    let profile = DogProfile::build(&data).map_err(|e| format!("Invalid profile: {}", e))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    profile
        .save(&conn)
        .map_err(|e| format!("Failed to save profile: {}", e))?;

    info!(
        name = %profile.name,
        calories = profile.target_nutrients.calories,
        "Saved dog profile"
    );
    Ok(profile)
}

/// Get the stored profile
pub fn get_profile(db: &Database) -> Result<Option<DogProfile>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    DogProfile::get(&conn).map_err(|e| format!("Failed to get profile: {}", e))
}

// ============================================================================
// Calculator Tools
// ============================================================================

/// Daily targets for arbitrary inputs, without touching the stored profile
pub fn calculate_targets(
    weight_kg: f64,
    age_years: i32,
    weather: &str,
    habits: &[String],
) -> Result<TargetsResponse, String> {
    let weather = parse_weather(weather)?;
    let habits = parse_habits(habits)?;

    let targets = compute_target_nutrients(weight_kg, age_years, weather, &habits)
        .map_err(|e| format!("Failed to calculate targets: {}", e))?;
    let resting_energy = compute_resting_energy(weight_kg)
        .map_err(|e| format!("Failed to calculate resting energy: {}", e))?;

    Ok(TargetsResponse {
        weight_kg,
        age_years,
        weather,
        activity_factor: activity_factor(age_years, &habits),
        habits,
        resting_energy: round_to(resting_energy, 1),
        targets,
    })
}

/// Calories burned by one activity
pub fn calculate_burn(
    weight_kg: f64,
    category: &str,
    duration_minutes: f64,
) -> Result<BurnResponse, String> {
    let category = parse_category(category)?;

    let calories_burned = compute_burned_calories(weight_kg, category, duration_minutes)
        .map_err(|e| format!("Failed to calculate burn: {}", e))?;
    let per_minute = kcal_per_minute(weight_kg, category)
        .map_err(|e| format!("Failed to calculate burn: {}", e))?;

    Ok(BurnResponse {
        weight_kg,
        category,
        duration_minutes,
        met: met_value(category),
        kcal_per_minute: round_to(per_minute, 2),
        calories_burned,
    })
}
