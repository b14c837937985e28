//! Dog profile model
//!
//! Single-row table holding the tracked dog. Target nutrients are computed
//! once when the profile is built and stored as-is; changing weight or age
//! later does not touch them unless targets are recalculated explicitly.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::energy::{compute_target_nutrients, ActivityCategory, EnergyResult, WeatherCondition};

use super::{column_error, NutrientProfile};

const DEFAULT_BREED: &str = "Mixed";

/// The tracked dog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DogProfile {
    pub name: String,
    pub breed: String,
    pub age_years: i32,
    pub weight_kg: f64,
    pub habits: Vec<ActivityCategory>,
    pub target_nutrients: NutrientProfile,
}

/// Data for creating a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DogProfileCreate {
    pub name: String,
    pub breed: Option<String>,
    pub age_years: i32,
    pub weight_kg: f64,
    pub habits: Vec<ActivityCategory>,
    pub weather: WeatherCondition,
}

impl DogProfile {
    /// Build a profile and compute its target nutrients
    pub fn build(data: &DogProfileCreate) -> EnergyResult<Self> {
        let mut habits = data.habits.clone();
        habits.sort();
        habits.dedup();

        let target_nutrients =
            compute_target_nutrients(data.weight_kg, data.age_years, data.weather, &habits)?;

        let breed = data
            .breed
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BREED)
            .to_string();

        Ok(Self {
            name: data.name.trim().to_string(),
            breed,
            age_years: data.age_years,
            weight_kg: data.weight_kg,
            habits,
            target_nutrients,
        })
    }

    /// Recompute the target snapshot from the current attributes
    pub fn recalculate_targets(&self, weather: WeatherCondition) -> EnergyResult<Self> {
        let target_nutrients =
            compute_target_nutrients(self.weight_kg, self.age_years, weather, &self.habits)?;
        Ok(Self {
            target_nutrients,
            ..self.clone()
        })
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let habits_json: String = row.get("habits")?;
        let targets_json: String = row.get("target_nutrients")?;

        let habits = serde_json::from_str::<Vec<ActivityCategory>>(&habits_json).map_err(column_error)?;
        let target_nutrients = serde_json::from_str::<NutrientProfile>(&targets_json).map_err(column_error)?;

        Ok(Self {
            name: row.get("name")?,
            breed: row.get("breed")?,
            age_years: row.get("age_years")?,
            weight_kg: row.get("weight_kg")?,
            habits,
            target_nutrients,
        })
    }

    /// Get the stored profile, if any
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM dog_profile WHERE id = 1")?;

        let result = stmt.query_row([], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Store the profile, replacing any previous one
    pub fn save(&self, conn: &Connection) -> DbResult<()> {
        let habits = serde_json::to_string(&self.habits)?;
        let targets = serde_json::to_string(&self.target_nutrients)?;

        conn.execute(
            r#"
            INSERT INTO dog_profile (id, name, breed, age_years, weight_kg, habits, target_nutrients)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                breed = excluded.breed,
                age_years = excluded.age_years,
                weight_kg = excluded.weight_kg,
                habits = excluded.habits,
                target_nutrients = excluded.target_nutrients,
                updated_at = datetime('now')
            "#,
            params![self.name, self.breed, self.age_years, self.weight_kg, habits, targets],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn create_data() -> DogProfileCreate {
        DogProfileCreate {
            name: " Mochi ".to_string(),
            breed: Some("  ".to_string()),
            age_years: 3,
            weight_kg: 10.0,
            habits: vec![ActivityCategory::ModerateWalk, ActivityCategory::ModerateWalk],
            weather: WeatherCondition::Sunny,
        }
    }

    #[test]
    fn test_build_computes_targets_and_defaults() {
        let profile = DogProfile::build(&create_data()).unwrap();
        assert_eq!(profile.name, "Mochi");
        assert_eq!(profile.breed, "Mixed");
        assert_eq!(profile.habits, vec![ActivityCategory::ModerateWalk]);
        assert_eq!(profile.target_nutrients.calories, 630.0);
        assert_eq!(profile.target_nutrients.water, 660.0);
    }

    #[test]
    fn test_build_rejects_invalid_weight() {
        let data = DogProfileCreate { weight_kg: 0.0, ..create_data() };
        assert!(DogProfile::build(&data).is_err());
    }

    #[test]
    fn test_targets_are_a_snapshot() {
        let profile = DogProfile::build(&create_data()).unwrap();
        let heavier = DogProfile { weight_kg: 20.0, ..profile.clone() };
        assert_eq!(heavier.target_nutrients, profile.target_nutrients);

        let recalculated = heavier.recalculate_targets(WeatherCondition::Cloudy).unwrap();
        assert_eq!(recalculated.target_nutrients.calories, 1059.0);
    }

    #[test]
    fn test_save_and_get_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert!(DogProfile::get(&conn).unwrap().is_none());

        let profile = DogProfile::build(&create_data()).unwrap();
        profile.save(&conn).unwrap();
        assert_eq!(DogProfile::get(&conn).unwrap(), Some(profile.clone()));

        let renamed = DogProfile { name: "Bao".to_string(), ..profile };
        renamed.save(&conn).unwrap();
        assert_eq!(DogProfile::get(&conn).unwrap().unwrap().name, "Bao");
    }
}
