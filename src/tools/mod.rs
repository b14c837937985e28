//! PawPal Tools module
//!
//! MCP tool implementations. Each tool takes the database (and the advisor
//! where needed) and returns a serializable response or an error message.

pub mod activities;
pub mod advice;
pub mod days;
pub mod meals;
pub mod profile;
pub mod progress;
pub mod status;

use crate::energy::{ActivityCategory, WeatherCondition};

pub(crate) fn parse_weather(weather: &str) -> Result<WeatherCondition, String> {
    weather
        .parse::<WeatherCondition>()
        .map_err(|e| format!("Invalid weather: {}", e))
}

pub(crate) fn parse_category(category: &str) -> Result<ActivityCategory, String> {
    category
        .parse::<ActivityCategory>()
        .map_err(|e| format!("Invalid activity category: {}", e))
}

pub(crate) fn parse_habits(habits: &[String]) -> Result<Vec<ActivityCategory>, String> {
    habits.iter().map(|h| parse_category(h)).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::Database;
    use crate::energy::ActivityCategory;
    use crate::energy::WeatherCondition;
    use crate::models::{DogProfile, DogProfileCreate};

    /// In-memory database with a 10 kg adult dog profile saved
    pub fn database_with_profile() -> Database {
        let db = Database::in_memory().unwrap();
        let profile = DogProfile::build(&DogProfileCreate {
            name: "Mochi".to_string(),
            breed: Some("Shiba Inu".to_string()),
            age_years: 3,
            weight_kg: 10.0,
            habits: vec![ActivityCategory::ModerateWalk],
            weather: WeatherCondition::Sunny,
        })
        .unwrap();
        db.with_conn(|conn| profile.save(conn)).unwrap();
        db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_weather("Hot").unwrap(), WeatherCondition::Hot);
        assert!(parse_weather("foggy").unwrap_err().starts_with("Invalid weather"));
        assert_eq!(
            parse_habits(&["rest".to_string(), "intense_run".to_string()]).unwrap(),
            vec![ActivityCategory::Rest, ActivityCategory::IntenseRun]
        );
        assert!(parse_habits(&["swim".to_string()]).is_err());
    }
}
