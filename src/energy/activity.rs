//! Calories burned by a logged activity
//!
//! kcal/min = (MET × 3.5 × weight_kg) / 200, multiplied by the duration and
//! rounded to a whole number.

use serde::{Deserialize, Serialize};

use super::categories::ActivityCategory;
use super::error::{ensure_positive_weight, EnergyError, EnergyResult};
use super::rounding::round_whole;

const OXYGEN_ML_PER_KG_MIN: f64 = 3.5;
const KCAL_DIVISOR: f64 = 200.0;

/// One activity occurrence to estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub category: ActivityCategory,
    pub duration_minutes: f64,
}

impl ActivityRecord {
    pub fn new(category: ActivityCategory, duration_minutes: f64) -> Self {
        Self { category, duration_minutes }
    }

    /// Burned kcal for a dog of the given weight
    pub fn burned_calories(&self, weight_kg: f64) -> EnergyResult<u32> {
        compute_burned_calories(weight_kg, self.category, self.duration_minutes)
    }
}

/// Metabolic equivalent for each activity category
pub fn met_value(category: ActivityCategory) -> f64 {
    match category {
        ActivityCategory::Rest => 1.0,
        ActivityCategory::LightWalk => 3.0,
        ActivityCategory::ModerateWalk => 4.0,
        ActivityCategory::Play => 5.0,
        ActivityCategory::IntenseRun => 8.0,
        ActivityCategory::Other => 3.0,
    }
}

/// Estimated kcal burned per minute
pub fn kcal_per_minute(weight_kg: f64, category: ActivityCategory) -> EnergyResult<f64> {
    ensure_positive_weight(weight_kg)?;
    Ok((met_value(category) * OXYGEN_ML_PER_KG_MIN * weight_kg) / KCAL_DIVISOR)
}

/// Estimated kcal burned over the whole activity
pub fn compute_burned_calories(
    weight_kg: f64,
    category: ActivityCategory,
    duration_minutes: f64,
) -> EnergyResult<u32> {
    if !duration_minutes.is_finite() || duration_minutes < 0.0 {
        return Err(EnergyError::invalid_input(format!(
            "duration must not be negative, got {} minutes",
            duration_minutes
        )));
    }

    let per_minute = kcal_per_minute(weight_kg, category)?;
    let burned = round_whole(per_minute * duration_minutes);

    if burned > u32::MAX as f64 {
        return Err(EnergyError::invalid_input(format!(
            "activity of {} minutes at {} kg is out of range",
            duration_minutes, weight_kg
        )));
    }

    Ok(burned as u32)
}
