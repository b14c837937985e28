//! Meal MCP Tools
//!
//! Logging meals against a started day. Nutrients are either given by the
//! caller or estimated by the advisor from a description and/or photo.

use serde::Serialize;
use tracing::{debug, info};

use crate::advisor::{Advisor, FoodQuery};
use crate::db::Database;
use crate::models::{DailyLog, MealEntry, MealEntryCreate, MealType, NutrientProfile};

/// Input for log_meal
#[derive(Debug, Clone, Default)]
pub struct LogMealRequest {
    pub date: String,
    pub meal_type: String,
    pub description: Option<String>,
    pub image_base64: Option<String>,
    pub nutrients: Option<NutrientProfile>,
    pub time_of_day: Option<String>,
    pub timestamp: Option<String>,
}

/// Response for log_meal
#[derive(Debug, Serialize)]
pub struct LogMealResponse {
    pub date: String,
    pub analyzed_by: Option<&'static str>, // advisor name when nutrients were estimated
    pub meal: MealEntry,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Log a meal for a started day
pub async fn log_meal(
    db: &Database,
    advisor: &dyn Advisor,
    request: LogMealRequest,
) -> Result<LogMealResponse, String> {
    let meal_type = request
        .meal_type
        .parse::<MealType>()
        .map_err(|e| format!("Invalid meal type: {}", e))?;
    let description = non_blank(request.description);
    let image = non_blank(request.image_base64);

    if description.is_none() && image.is_none() && request.nutrients.is_none() {
        return Err("Provide a description, an image, or nutrients for the meal".to_string());
    }
    if let Some(nutrients) = &request.nutrients {
        if !nutrients.is_valid() {
            return Err("Nutrient values must be finite and not negative".to_string());
        }
    }

    // Look the day up before spending a model call on it
    let log = {
        let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
        DailyLog::get_by_date(&conn, &request.date)
            .map_err(|e| format!("Failed to get day: {}", e))?
            .ok_or_else(|| format!("Day not started: {}. Call start_day first.", request.date))?
    };

    let (nutrients, analyzed_by) = match request.nutrients {
        Some(nutrients) => (nutrients, None),
        None => {
            debug!(advisor = advisor.name(), "Analyzing meal");
            let query = FoodQuery {
                description: description.clone(),
                image_base64: image.clone(),
            };
            let analyzed = advisor.analyze_food(&query).await;
            (NutrientProfile { water: 0.0, ..analyzed }, Some(advisor.name()))
        }
    };

    let data = MealEntryCreate {
        daily_log_id: log.id,
        meal_type,
        description,
        image_url: image,
        nutrients,
        time_of_day: non_blank(request.time_of_day),
        timestamp: request.timestamp,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let meal = MealEntry::create(&conn, &data).map_err(|e| format!("Failed to log meal: {}", e))?;

    info!(
        date = %log.date,
        meal_type = meal.meal_type.as_str(),
        calories = meal.nutrients.calories,
        "Logged meal"
    );

    Ok(LogMealResponse {
        date: log.date,
        analyzed_by,
        meal,
    })
}

/// Delete a meal entry
pub fn delete_meal(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    MealEntry::delete(&conn, id).map_err(|e| format!("Failed to delete meal: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{fallback_nutrients, FallbackAdvisor};
    use crate::models::IMAGE_ONLY_DESCRIPTION;
    use crate::tools::days::start_day;
    use crate::tools::test_support::database_with_profile;

    fn request(meal_type: &str) -> LogMealRequest {
        LogMealRequest {
            date: "2025-03-01".to_string(),
            meal_type: meal_type.to_string(),
            ..LogMealRequest::default()
        }
    }

    #[tokio::test]
    async fn test_log_meal_with_given_nutrients() {
        let db = database_with_profile();
        start_day(&db, "2025-03-01", "sunny").unwrap();

        let nutrients = NutrientProfile { calories: 320.0, protein: 14.0, water: 50.0, ..NutrientProfile::zero() };
        let response = log_meal(
            &db,
            &FallbackAdvisor,
            LogMealRequest {
                description: Some("Chicken and rice".to_string()),
                nutrients: Some(nutrients),
                ..request("dinner")
            },
        )
        .await
        .unwrap();

        assert!(response.analyzed_by.is_none());
        assert_eq!(response.meal.meal_type, MealType::Dinner);
        assert_eq!(response.meal.description, "Chicken and rice");
        assert_eq!(response.meal.nutrients, nutrients);
    }

    #[tokio::test]
    async fn test_log_meal_uses_advisor_for_image_only() {
        let db = database_with_profile();
        start_day(&db, "2025-03-01", "sunny").unwrap();

        let response = log_meal(
            &db,
            &FallbackAdvisor,
            LogMealRequest {
                description: Some("   ".to_string()),
                image_base64: Some("data:image/jpeg;base64,AAAA".to_string()),
                ..request("breakfast")
            },
        )
        .await
        .unwrap();

        assert_eq!(response.analyzed_by, Some("fallback"));
        assert_eq!(response.meal.description, IMAGE_ONLY_DESCRIPTION);
        assert_eq!(response.meal.nutrients, fallback_nutrients());
        assert_eq!(response.meal.nutrients.water, 0.0);
    }

    #[tokio::test]
    async fn test_log_meal_rejections() {
        let db = database_with_profile();

        let err = log_meal(&db, &FallbackAdvisor, LogMealRequest {
            description: Some("Kibble".to_string()),
            ..request("snack")
        })
        .await
        .unwrap_err();
        assert!(err.contains("start_day"));

        start_day(&db, "2025-03-01", "sunny").unwrap();
        assert!(log_meal(&db, &FallbackAdvisor, request("snack")).await.is_err());
        assert!(log_meal(&db, &FallbackAdvisor, LogMealRequest {
            description: Some("Kibble".to_string()),
            ..request("lunch")
        })
        .await
        .is_err());

        let negative = NutrientProfile { calories: -5.0, ..NutrientProfile::zero() };
        assert!(log_meal(&db, &FallbackAdvisor, LogMealRequest {
            nutrients: Some(negative),
            ..request("snack")
        })
        .await
        .is_err());
    }

    #[tokio::test]
    async fn test_delete_meal() {
        let db = database_with_profile();
        start_day(&db, "2025-03-01", "sunny").unwrap();
        let response = log_meal(&db, &FallbackAdvisor, LogMealRequest {
            description: Some("Kibble".to_string()),
            ..request("snack")
        })
        .await
        .unwrap();

        assert!(delete_meal(&db, response.meal.id).unwrap());
        assert!(!delete_meal(&db, response.meal.id).unwrap());
    }
}
