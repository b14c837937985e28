//! Meal entry model
//!
//! What the dog ate, with the nutrients estimated for that meal.

use std::fmt;
use std::str::FromStr;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

use super::{column_error, NutrientProfile};

/// Description stored when a meal was logged from a photo alone
pub const IMAGE_ONLY_DESCRIPTION: &str = "Food Image";

/// Meal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(format!("unknown meal type '{}'", other)),
        }
    }
}

/// A logged meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: i64,
    pub daily_log_id: i64,
    pub meal_type: MealType,
    pub description: String,
    pub image_url: Option<String>,
    pub nutrients: NutrientProfile,
    pub time_of_day: Option<String>,
    pub timestamp: String,
    pub created_at: String,
}

/// Data for logging a meal
#[derive(Debug, Clone)]
pub struct MealEntryCreate {
    pub daily_log_id: i64,
    pub meal_type: MealType,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub nutrients: NutrientProfile,
    pub time_of_day: Option<String>,
    pub timestamp: Option<String>,
}

impl MealEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type_str: String = row.get("meal_type")?;
        let meal_type = meal_type_str.parse::<MealType>().map_err(column_error)?;

        Ok(Self {
            id: row.get("id")?,
            daily_log_id: row.get("daily_log_id")?,
            meal_type,
            description: row.get("description")?,
            image_url: row.get("image_url")?,
            nutrients: NutrientProfile {
                protein: row.get("protein")?,
                fat: row.get("fat")?,
                omega3: row.get("omega3")?,
                carbs: row.get("carbs")?,
                fiber: row.get("fiber")?,
                calories: row.get("calories")?,
                sodium: row.get("sodium")?,
                calcium: row.get("calcium")?,
                phosphorus: row.get("phosphorus")?,
                vitamin_d: row.get("vitamin_d")?,
                water: row.get("water")?,
            },
            time_of_day: row.get("time_of_day")?,
            timestamp: row.get("timestamp")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &MealEntryCreate) -> DbResult<Self> {
        let description = data
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(IMAGE_ONLY_DESCRIPTION);
        let timestamp = data.timestamp.clone().unwrap_or_else(|| {
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
        });
        let n = &data.nutrients;

        conn.execute(
            r#"
            INSERT INTO meal_entries
            (daily_log_id, meal_type, description, image_url, time_of_day, timestamp,
             protein, fat, omega3, carbs, fiber, calories, sodium, calcium, phosphorus, vitamin_d, water)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
            "#,
            params![
                data.daily_log_id,
                data.meal_type.as_str(),
                description,
                data.image_url,
                data.time_of_day,
                timestamp,
                n.protein,
                n.fat,
                n.omega3,
                n.carbs,
                n.fiber,
                n.calories,
                n.sodium,
                n.calcium,
                n.phosphorus,
                n.vitamin_d,
                n.water,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_for_log(conn: &Connection, daily_log_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_entries WHERE daily_log_id = ?1 ORDER BY timestamp, id",
        )?;
        let entries = stmt
            .query_map([daily_log_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meal_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

/// Sum of the nutrients of every meal
pub fn total_nutrients(meals: &[MealEntry]) -> NutrientProfile {
    meals.iter().map(|m| m.nutrients).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meal_type() {
        assert_eq!("Breakfast".parse::<MealType>(), Ok(MealType::Breakfast));
        assert_eq!("SNACK".parse::<MealType>(), Ok(MealType::Snack));
        assert!("lunch".parse::<MealType>().is_err());
    }

    #[test]
    fn test_total_nutrients() {
        let meal = |calories: f64, water: f64| MealEntry {
            id: 0,
            daily_log_id: 1,
            meal_type: MealType::Snack,
            description: "treat".to_string(),
            image_url: None,
            nutrients: NutrientProfile { calories, water, ..NutrientProfile::zero() },
            time_of_day: None,
            timestamp: "2025-03-01T08:00:00Z".to_string(),
            created_at: "2025-03-01 08:00:00".to_string(),
        };
        let total = total_nutrients(&[meal(120.0, 0.0), meal(80.0, 150.0)]);
        assert_eq!(total.calories, 200.0);
        assert_eq!(total.water, 150.0);
        assert_eq!(total_nutrients(&[]), NutrientProfile::zero());
    }
}
