//! Data models
//!
//! Rust structs representing stored entities.

mod activity_entry;
mod daily_log;
mod meal_entry;
mod nutrients;
mod profile;
mod progress;
mod quiz;

pub use activity_entry::{
    total_burned, total_minutes, ActivityEntry, ActivityEntryCreate, TimeOfDay,
};
pub use daily_log::{DailyLog, DailyLogCreate};
pub use meal_entry::{total_nutrients, MealEntry, MealEntryCreate, MealType, IMAGE_ONLY_DESCRIPTION};
pub use nutrients::NutrientProfile;
pub use profile::{DogProfile, DogProfileCreate};
pub use progress::{level_for_xp, Badge, UserProgress, CORRECT_ANSWER_XP, WRONG_ANSWER_XP};
pub use quiz::{Quiz, QuizOption, QuizType};

/// Wrap a decoding failure of a stored column as a rusqlite error
pub(crate) fn column_error<E>(e: E) -> rusqlite::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, e.into())
}
