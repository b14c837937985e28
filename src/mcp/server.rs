//! PawPal MCP Server Implementation
//!
//! Implements the MCP server with all PawPal tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::advisor::Advisor;
use crate::db::Database;
use crate::models::NutrientProfile;
use crate::tools::meals::LogMealRequest;
use crate::tools::status::StatusTracker;
use crate::tools::{activities, advice, days, meals, profile, progress};

/// PawPal MCP Service
#[derive(Clone)]
pub struct PawPalService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    advisor: Arc<dyn Advisor>,
    tool_router: ToolRouter<PawPalService>,
}

impl PawPalService {
    pub fn new(database_path: PathBuf, database: Database, advisor: Arc<dyn Advisor>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path, advisor.name()))),
            database,
            advisor,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Profile and Calculator Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateProfileParams {
    pub name: String,
    pub breed: Option<String>,
    pub age_years: i32,
    pub weight_kg: f64,
    /// Usual activities: rest, light_walk, moderate_walk, intense_run, play, other
    #[serde(default)]
    pub habits: Vec<String>,
    /// Typical weather: sunny, cloudy, rainy, cool, hot
    pub weather: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateTargetsParams {
    pub weight_kg: f64,
    pub age_years: i32,
    pub weather: String,
    #[serde(default)]
    pub habits: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateBurnParams {
    pub weight_kg: f64,
    pub category: String,
    pub duration_minutes: f64,
}

// ============================================================================
// Day Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StartDayParams {
    /// ISO date: YYYY-MM-DD
    pub date: String,
    pub weather: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// ISO date: YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDaysParams {
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 { 30 }

// ============================================================================
// Meal and Activity Parameter Structs
// ============================================================================

/// Nutrients for one meal; omitted fields count as 0
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct NutrientsParam {
    pub protein: f64,
    pub fat: f64,
    pub omega3: f64,
    pub carbs: f64,
    pub fiber: f64,
    pub calories: f64,
    pub sodium: f64,
    pub calcium: f64,
    pub phosphorus: f64,
    pub vitamin_d: f64,
    pub water: f64,
}

impl From<NutrientsParam> for NutrientProfile {
    fn from(p: NutrientsParam) -> Self {
        NutrientProfile {
            protein: p.protein,
            fat: p.fat,
            omega3: p.omega3,
            carbs: p.carbs,
            fiber: p.fiber,
            calories: p.calories,
            sodium: p.sodium,
            calcium: p.calcium,
            phosphorus: p.phosphorus,
            vitamin_d: p.vitamin_d,
            water: p.water,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    pub date: String,
    /// breakfast, dinner or snack
    pub meal_type: String,
    pub description: Option<String>,
    /// Base64 photo, raw or as a data URL
    pub image_base64: Option<String>,
    /// Known nutrients; estimated from description/image when omitted
    pub nutrients: Option<NutrientsParam>,
    pub time_of_day: Option<String>,
    /// RFC 3339 timestamp, defaults to now
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogActivityParams {
    pub date: String,
    /// rest, light_walk, moderate_walk, intense_run, play, other
    pub category: String,
    pub duration_minutes: f64,
    /// day or night; derived from the timestamp when omitted
    pub time_of_day: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdParams {
    pub id: i64,
}

// ============================================================================
// Advice and Quiz Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailyAdviceParams {
    pub date: String,
    /// Regenerate even if advice is already stored
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnswerQuizParams {
    pub date: String,
    pub option_id: String,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl PawPalService {
    // --- Status ---

    #[tool(description = "Get the current status of the PawPal service including build info, database status, advisor and process information")]
    async fn pawpal_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for tracking a dog's meals, activities and daily progress. Call this when starting a session or when unsure how to use the tools.")]
    fn pawpal_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PAWPAL_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PAWPAL_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "Create or replace the dog profile. Computes and stores daily nutrient targets from weight, age, habits and weather.")]
    fn create_profile(&self, Parameters(p): Parameters<CreateProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profile::create_profile(&self.database, &p.name, p.breed, p.age_years, p.weight_kg, &p.habits, &p.weather)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get the dog profile with its stored daily targets")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(profile) => serde_json::to_string_pretty(&profile),
            None => Ok(r#"{"error": "No profile yet"}"#.to_string()),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Calculate daily nutrient and water targets for any weight, age, weather and habits without saving anything")]
    fn calculate_targets(&self, Parameters(p): Parameters<CalculateTargetsParams>) -> Result<CallToolResult, McpError> {
        let result = profile::calculate_targets(p.weight_kg, p.age_years, &p.weather, &p.habits)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Calculate calories burned by an activity for a given weight and duration")]
    fn calculate_burn(&self, Parameters(p): Parameters<CalculateBurnParams>) -> Result<CallToolResult, McpError> {
        let result = profile::calculate_burn(p.weight_kg, &p.category, p.duration_minutes)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Days ---

    #[tool(description = "Start a day with today's weather, snapshotting the current profile. Returns the existing day if already started.")]
    fn start_day(&self, Parameters(p): Parameters<StartDayParams>) -> Result<CallToolResult, McpError> {
        let result = days::start_day(&self.database, &p.date, &p.weather)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get a day with meals, activities grouped by day/night, and consumed vs target for every nutrient")]
    fn get_day(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = days::get_day(&self.database, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(day) => serde_json::to_string_pretty(&day),
            None => Ok(format!(r#"{{"error": "Day not found", "date": "{}"}}"#, p.date)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List days newest first with consumed, burned and net calories, sodium, water and protein")]
    fn list_days(&self, Parameters(p): Parameters<ListDaysParams>) -> Result<CallToolResult, McpError> {
        let result = days::list_days(&self.database, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete a day with all its meals and activities")]
    fn delete_day(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let deleted = days::delete_day(&self.database, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::json!({ "date": p.date, "deleted": deleted }).to_string();
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Meals ---

    #[tool(description = "Log a meal on a started day. Give nutrients when known; otherwise they are estimated from the description and/or photo.")]
    async fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let request = LogMealRequest {
            date: p.date,
            meal_type: p.meal_type,
            description: p.description,
            image_base64: p.image_base64,
            nutrients: p.nutrients.map(NutrientProfile::from),
            time_of_day: p.time_of_day,
            timestamp: p.timestamp,
        };
        let result = meals::log_meal(&self.database, self.advisor.as_ref(), request)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete a meal entry")]
    fn delete_meal(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let deleted = meals::delete_meal(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::json!({ "id": p.id, "deleted": deleted }).to_string();
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Activities ---

    #[tool(description = "Log an activity on a started day. Burned calories use the weight recorded for that day.")]
    fn log_activity(&self, Parameters(p): Parameters<LogActivityParams>) -> Result<CallToolResult, McpError> {
        let result = activities::log_activity(&self.database, &p.date, &p.category, p.duration_minutes, p.time_of_day.as_deref(), p.timestamp)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete an activity entry")]
    fn delete_activity(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let deleted = activities::delete_activity(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::json!({ "id": p.id, "deleted": deleted }).to_string();
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Advice and Quiz ---

    #[tool(description = "Get one bilingual sentence of advice for a day. Generated once and stored; set refresh to regenerate.")]
    async fn get_daily_advice(&self, Parameters(p): Parameters<DailyAdviceParams>) -> Result<CallToolResult, McpError> {
        let result = advice::get_daily_advice(&self.database, self.advisor.as_ref(), &p.date, p.refresh)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get gentle advice based on the trend of the last 7 logged days")]
    async fn get_long_term_advice(&self) -> Result<CallToolResult, McpError> {
        let result = advice::get_long_term_advice(&self.database, self.advisor.as_ref())
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get the day's multiple-choice quiz. Answer it with answer_quiz.")]
    async fn get_daily_quiz(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = advice::get_daily_quiz(&self.database, self.advisor.as_ref(), &p.date)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Progress ---

    #[tool(description = "Answer the day's quiz. Correct answers earn 50 XP, wrong answers 10. Each day can be answered once.")]
    fn answer_quiz(&self, Parameters(p): Parameters<AnswerQuizParams>) -> Result<CallToolResult, McpError> {
        let result = progress::answer_quiz(&self.database, &p.date, &p.option_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get XP, level and earned streak badges")]
    fn get_progress(&self) -> Result<CallToolResult, McpError> {
        let result = progress::get_progress(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for PawPalService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pawpal".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("PawPal Health".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "PawPal Health - dog nutrition, activity and daily reflection tracking. \
                 IMPORTANT: Call pawpal_instructions first. \
                 Profile: create_profile/get_profile; calculators: calculate_targets, calculate_burn. \
                 Days: start_day (required before logging), get_day, list_days, delete_day. \
                 Meals: log_meal/delete_meal. Activities: log_activity/delete_activity. \
                 Reflection: get_daily_advice, get_long_term_advice, get_daily_quiz, answer_quiz, get_progress."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::FallbackAdvisor;

    fn service() -> PawPalService {
        let database = Database::in_memory().unwrap();
        PawPalService::new(PathBuf::from(":memory:"), database, Arc::new(FallbackAdvisor))
    }

    #[test]
    fn test_router_lists_every_tool() {
        let service = service();
        let names: Vec<String> = service
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();

        for expected in [
            "pawpal_status", "pawpal_instructions", "create_profile", "get_profile",
            "calculate_targets", "calculate_burn", "start_day", "get_day", "list_days",
            "delete_day", "log_meal", "delete_meal", "log_activity", "delete_activity",
            "get_daily_advice", "get_long_term_advice", "get_daily_quiz", "answer_quiz",
            "get_progress",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing tool {}", expected);
        }
        assert_eq!(names.len(), 19);
    }

    #[test]
    fn test_partial_nutrients_default_to_zero() {
        let param: NutrientsParam = serde_json::from_str(r#"{"calories": 120, "protein": 6.5}"#).unwrap();
        let nutrients = NutrientProfile::from(param);
        assert_eq!(nutrients.calories, 120.0);
        assert_eq!(nutrients.protein, 6.5);
        assert_eq!(nutrients.water, 0.0);
    }

    #[test]
    fn test_server_info() {
        let info = service().get_info();
        assert_eq!(info.server_info.name, "pawpal");
        assert!(info.instructions.unwrap().contains("pawpal_instructions"));
    }
}
