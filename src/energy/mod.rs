//! Nutrient and energy calculation core
//!
//! Pure functions turning a dog's profile into daily nutrient targets and a
//! logged activity into calories burned.

pub mod activity;
pub mod categories;
pub mod error;
pub mod requirements;
pub mod rounding;

pub use activity::{compute_burned_calories, kcal_per_minute, met_value, ActivityRecord};
pub use categories::{ActivityCategory, WeatherCondition};
pub use error::{EnergyError, EnergyResult};
pub use requirements::{
    activity_factor, age_adjustment, compute_resting_energy, compute_target_nutrients,
    habit_factor,
};
pub use rounding::{round_to, round_whole};
