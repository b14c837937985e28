//! Advisor
//!
//! Language-model backed helpers: estimating nutrients from a meal
//! description or photo, writing short daily and weekly advice, and
//! generating the daily quiz. Callers never see a failure; every method
//! degrades to a fixed answer.

mod fallback;
mod gemini;
mod prompts;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::{NutrientProfile, Quiz};

pub use fallback::{
    fallback_nutrients, fallback_quiz, FallbackAdvisor, DAILY_ADVICE_EMPTY, DAILY_ADVICE_FALLBACK,
    LONG_TERM_ADVICE_EMPTY, LONG_TERM_ADVICE_FALLBACK, NOT_ENOUGH_DATA,
};
pub use gemini::GeminiAdvisor;

/// Number of most recent days summarized for long-term advice
pub const TREND_WINDOW_DAYS: usize = 7;

/// Internal advisor failures. Logged, then replaced by a fallback.
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("No content in model response")]
    EmptyResponse,

    #[error("Failed to parse model response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model returned invalid nutrients")]
    InvalidNutrients,

    #[error("Model returned an invalid quiz: {0}")]
    InvalidQuiz(String),
}

pub type AdvisorResult<T> = Result<T, AdvisorError>;

/// What is known about a meal to be analyzed
#[derive(Debug, Clone, Default)]
pub struct FoodQuery {
    pub description: Option<String>,
    /// Raw base64 or a `data:` URL
    pub image_base64: Option<String>,
}

/// Figures for one day, as fed to advice and quiz prompts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayStats {
    pub target: NutrientProfile,
    pub consumed: NutrientProfile,
    pub burned_calories: u64,
    pub activity_minutes: f64,
}

impl DayStats {
    /// Calories eaten minus calories burned
    pub fn net_calories(&self) -> f64 {
        self.consumed.calories - self.burned_calories as f64
    }
}

/// One day in the long-term trend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub net: f64,
    pub sodium: f64,
}

#[async_trait]
pub trait Advisor: Send + Sync {
    /// Short name for logs and status output
    fn name(&self) -> &'static str;

    /// Nutrient estimate for a meal. `water` is always 0.
    async fn analyze_food(&self, query: &FoodQuery) -> NutrientProfile;

    /// One bilingual sentence about the day
    async fn daily_advice(&self, stats: &DayStats) -> String;

    /// Gentle advice about the trend, oldest day first
    async fn long_term_advice(&self, trend: &[TrendPoint]) -> String;

    /// A single multiple-choice question about the day
    async fn daily_quiz(&self, stats: &DayStats) -> Quiz;
}

/// Keep only the last `TREND_WINDOW_DAYS` points
pub fn trend_window(trend: &[TrendPoint]) -> &[TrendPoint] {
    let start = trend.len().saturating_sub(TREND_WINDOW_DAYS);
    &trend[start..]
}
