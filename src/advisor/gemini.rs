//! Google Gemini advisor
//!
//! Calls `models/{model}:generateContent` on the Generative Language REST
//! API. Food analysis and quizzes use JSON response mode with a response
//! schema; advice is plain text.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::fallback::{
    fallback_nutrients, fallback_quiz, DAILY_ADVICE_EMPTY, DAILY_ADVICE_FALLBACK,
    LONG_TERM_ADVICE_EMPTY, LONG_TERM_ADVICE_FALLBACK, NOT_ENOUGH_DATA,
};
use super::{prompts, trend_window, Advisor, AdvisorError, AdvisorResult, DayStats, FoodQuery, TrendPoint};
use crate::config::{AdvisorConfig, DEFAULT_GEMINI_MODEL};
use crate::models::{NutrientProfile, Quiz};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

impl GenerationConfig {
    fn json(schema: Value) -> Self {
        Self {
            response_mime_type: "application/json".to_string(),
            response_schema: schema,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Nutrients as returned by the model, without water
#[derive(Debug, Deserialize)]
struct AnalyzedNutrients {
    protein: f64,
    fat: f64,
    omega3: f64,
    carbs: f64,
    fiber: f64,
    calories: f64,
    sodium: f64,
    calcium: f64,
    phosphorus: f64,
    vitamin_d: f64,
}

impl From<AnalyzedNutrients> for NutrientProfile {
    fn from(n: AnalyzedNutrients) -> Self {
        NutrientProfile {
            protein: n.protein,
            fat: n.fat,
            omega3: n.omega3,
            carbs: n.carbs,
            fiber: n.fiber,
            calories: n.calories,
            sodium: n.sodium,
            calcium: n.calcium,
            phosphorus: n.phosphorus,
            vitamin_d: n.vitamin_d,
            water: 0.0,
        }
    }
}

// ============================================================================
// Advisor Implementation
// ============================================================================

pub struct GeminiAdvisor {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    client: Client,
}

fn http_client(timeout: Duration) -> AdvisorResult<Client> {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(timeout)
        .build()?;
    Ok(client)
}

impl GeminiAdvisor {
    pub fn new(api_key: impl Into<String>) -> AdvisorResult<Self> {
        let timeout = Duration::from_secs(REQUEST_TIMEOUT_SECS);
        Ok(Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: API_BASE_URL.to_string(),
            timeout,
            client: http_client(timeout)?,
        })
    }

    pub fn from_config(config: &AdvisorConfig) -> AdvisorResult<Self> {
        Ok(Self::new(config.api_key.clone())?.with_model(config.model.clone()))
    }

    /// Total time allowed per request before falling back
    pub fn with_timeout(mut self, timeout: Duration) -> AdvisorResult<Self> {
        self.client = http_client(timeout)?;
        self.timeout = timeout;
        Ok(self)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Send one request and return the text of the first candidate part
    #[instrument(skip_all, fields(model = %self.model))]
    async fn generate(&self, request: &GenerateRequest) -> AdvisorResult<String> {
        debug!("Sending request to Gemini API");

        let response = self.client.post(self.build_url()).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(map_api_error(status.as_u16(), &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        if let Some(error) = parsed.error {
            return Err(AdvisorError::Api {
                status: status.as_u16(),
                message: error.message,
            });
        }

        debug!("Received Gemini response");
        extract_text(&parsed).ok_or(AdvisorError::EmptyResponse)
    }

    async fn try_analyze_food(&self, query: &FoodQuery) -> AdvisorResult<NutrientProfile> {
        let mut parts = vec![text_part(prompts::FOOD_INSTRUCTION)];
        if let Some(description) = query.description.as_deref().filter(|d| !d.trim().is_empty()) {
            parts.push(text_part(&prompts::food_description(description)));
        }
        if let Some(image) = query.image_base64.as_deref().filter(|i| !i.is_empty()) {
            parts.push(image_part(image));
        }

        let request = GenerateRequest {
            contents: vec![Content { role: Some("user".to_string()), parts }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![text_part(prompts::FOOD_SYSTEM_INSTRUCTION)],
            }),
            generation_config: Some(GenerationConfig::json(prompts::nutrient_schema())),
        };

        let text = self.generate(&request).await?;
        parse_nutrients(&text)
    }

    async fn try_daily_quiz(&self, stats: &DayStats) -> AdvisorResult<Quiz> {
        let request = GenerateRequest {
            contents: vec![user_text(&prompts::daily_quiz(stats))],
            system_instruction: None,
            generation_config: Some(GenerationConfig::json(prompts::quiz_schema())),
        };

        let text = self.generate(&request).await?;
        parse_quiz(&text)
    }

    async fn try_long_term_advice(&self, trend: &[TrendPoint]) -> AdvisorResult<Option<String>> {
        let request = plain_request(&prompts::long_term_advice(trend_window(trend))?);
        optional_text(self.generate(&request).await)
    }
}

impl fmt::Debug for GeminiAdvisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiAdvisor")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn analyze_food(&self, query: &FoodQuery) -> NutrientProfile {
        match self.try_analyze_food(query).await {
            Ok(nutrients) => nutrients,
            Err(e) => {
                warn!(error = %e, "Food analysis failed, using fallback nutrients");
                fallback_nutrients()
            }
        }
    }

    async fn daily_advice(&self, stats: &DayStats) -> String {
        let request = plain_request(&prompts::daily_advice(stats));
        match optional_text(self.generate(&request).await) {
            Ok(Some(text)) => text,
            Ok(None) => DAILY_ADVICE_EMPTY.to_string(),
            Err(e) => {
                warn!(error = %e, "Daily advice failed, using fallback");
                DAILY_ADVICE_FALLBACK.to_string()
            }
        }
    }

    async fn long_term_advice(&self, trend: &[TrendPoint]) -> String {
        if trend.is_empty() {
            return NOT_ENOUGH_DATA.to_string();
        }
        match self.try_long_term_advice(trend).await {
            Ok(Some(text)) => text,
            Ok(None) => LONG_TERM_ADVICE_EMPTY.to_string(),
            Err(e) => {
                warn!(error = %e, "Long-term advice failed, using fallback");
                LONG_TERM_ADVICE_FALLBACK.to_string()
            }
        }
    }

    async fn daily_quiz(&self, stats: &DayStats) -> Quiz {
        match self.try_daily_quiz(stats).await {
            Ok(quiz) => quiz,
            Err(e) => {
                warn!(error = %e, "Quiz generation failed, using fallback quiz");
                fallback_quiz()
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn text_part(text: &str) -> Part {
    Part::Text { text: text.to_string() }
}

fn user_text(text: &str) -> Content {
    Content {
        role: Some("user".to_string()),
        parts: vec![text_part(text)],
    }
}

fn plain_request(prompt: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![user_text(prompt)],
        system_instruction: None,
        generation_config: None,
    }
}

/// Inline image part from raw base64 or a `data:<mime>;base64,` URL
fn image_part(image: &str) -> Part {
    let (mime_type, data) = match image.split_once(',') {
        Some((header, data)) => {
            let mime = header
                .strip_prefix("data:")
                .and_then(|h| h.split(';').next())
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_IMAGE_MIME);
            (mime, data)
        }
        None => (DEFAULT_IMAGE_MIME, image),
    };

    Part::InlineData {
        inline_data: InlineData {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        },
    }
}

fn extract_text(response: &GenerateResponse) -> Option<String> {
    response
        .candidates
        .as_ref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .find_map(|part| match part {
            Part::Text { text } => Some(text.clone()),
            Part::InlineData { .. } => None,
        })
}

/// Treat an empty reply as "no text" rather than an error
fn optional_text(result: AdvisorResult<String>) -> AdvisorResult<Option<String>> {
    match result {
        Ok(text) if text.trim().is_empty() => Ok(None),
        Ok(text) => Ok(Some(text.trim().to_string())),
        Err(AdvisorError::EmptyResponse) => Ok(None),
        Err(e) => Err(e),
    }
}

fn parse_nutrients(text: &str) -> AdvisorResult<NutrientProfile> {
    let analyzed: AnalyzedNutrients = serde_json::from_str(text)?;
    let nutrients = NutrientProfile::from(analyzed);
    if !nutrients.is_valid() {
        return Err(AdvisorError::InvalidNutrients);
    }
    Ok(nutrients)
}

fn parse_quiz(text: &str) -> AdvisorResult<Quiz> {
    let quiz: Quiz = serde_json::from_str(text)?;
    quiz.validate().map_err(AdvisorError::InvalidQuiz)?;
    Ok(quiz)
}

fn map_api_error(status: u16, body: &str) -> AdvisorError {
    let message = serde_json::from_str::<GenerateResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map_or_else(|| body.to_string(), |e| e.message);
    AdvisorError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> DayStats {
        DayStats {
            target: NutrientProfile::zero(),
            consumed: NutrientProfile::zero(),
            burned_calories: 0,
            activity_minutes: 0.0,
        }
    }

    #[test]
    fn test_parse_nutrients_forces_water_to_zero() {
        let text = r#"{"protein": 12.5, "fat": 6, "omega3": 0.2, "carbs": 20, "fiber": 2,
            "calories": 210, "sodium": 80, "calcium": 120, "phosphorus": 100,
            "vitamin_d": 25, "water": 300}"#;
        let nutrients = parse_nutrients(text).unwrap();
        assert_eq!(nutrients.protein, 12.5);
        assert_eq!(nutrients.calories, 210.0);
        assert_eq!(nutrients.water, 0.0);
    }

    #[test]
    fn test_parse_nutrients_rejects_bad_output() {
        assert!(matches!(parse_nutrients("not json"), Err(AdvisorError::Parse(_))));
        assert!(matches!(parse_nutrients(r#"{"protein": 1}"#), Err(AdvisorError::Parse(_))));

        let negative = r#"{"protein": -1, "fat": 6, "omega3": 0.2, "carbs": 20, "fiber": 2,
            "calories": 210, "sodium": 80, "calcium": 120, "phosphorus": 100, "vitamin_d": 25}"#;
        assert!(matches!(parse_nutrients(negative), Err(AdvisorError::InvalidNutrients)));
    }

    #[test]
    fn test_parse_quiz_validates() {
        let valid = r#"{"type": "STATUS", "question": "Water today?",
            "options": [{"id": "1", "text": "High", "is_correct": false},
                        {"id": "2", "text": "Just right", "is_correct": true}],
            "correct_message": "Well done", "wrong_message": "Close"}"#;
        let quiz = parse_quiz(valid).unwrap();
        assert_eq!(quiz.check_answer("2"), Some(true));

        let two_correct = valid.replace(r#""is_correct": false"#, r#""is_correct": true"#);
        assert!(matches!(parse_quiz(&two_correct), Err(AdvisorError::InvalidQuiz(_))));
        assert!(matches!(parse_quiz(r#"{"type": "OTHER"}"#), Err(AdvisorError::Parse(_))));
    }

    #[test]
    fn test_image_part_strips_data_url() {
        match image_part("data:image/png;base64,AAAA") {
            Part::InlineData { inline_data } => {
                assert_eq!(inline_data.mime_type, "image/png");
                assert_eq!(inline_data.data, "AAAA");
            }
            Part::Text { .. } => panic!("expected inline data"),
        }
        match image_part("BBBB") {
            Part::InlineData { inline_data } => {
                assert_eq!(inline_data.mime_type, "image/jpeg");
                assert_eq!(inline_data.data, "BBBB");
            }
            Part::Text { .. } => panic!("expected inline data"),
        }
    }

    #[test]
    fn test_request_serializes_in_camel_case() {
        let request = GenerateRequest {
            contents: vec![user_text("hi")],
            system_instruction: None,
            generation_config: Some(GenerationConfig::json(prompts::quiz_schema())),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert!(json.get("systemInstruction").is_none());

        let image = serde_json::to_value(image_part("CCCC")).unwrap();
        assert_eq!(image["inlineData"]["mimeType"], "image/jpeg");
    }

    #[test]
    fn test_extract_text_and_api_errors() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "Eating well today!"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response).as_deref(), Some("Eating well today!"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(extract_text(&empty).is_none());

        match map_api_error(429, r#"{"error": {"message": "Quota exceeded"}}"#) {
            AdvisorError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Quota exceeded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Ok("  ".to_string())).unwrap(), None);
        assert_eq!(optional_text(Err(AdvisorError::EmptyResponse)).unwrap(), None);
        assert_eq!(optional_text(Ok(" Good day \n".to_string())).unwrap().as_deref(), Some("Good day"));
        assert!(optional_text(Err(AdvisorError::InvalidNutrients)).is_err());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let advisor = GeminiAdvisor::new("secret-key").unwrap().with_model("gemini-test");
        let debug = format!("{:?}", advisor);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("gemini-test"));
        assert!(advisor.build_url().ends_with("models/gemini-test:generateContent?key=secret-key"));
    }

    #[tokio::test]
    async fn test_unreachable_api_falls_back() {
        let advisor = GeminiAdvisor::new("key").unwrap().with_base_url("http://127.0.0.1:9");

        assert_eq!(advisor.daily_advice(&stats()).await, DAILY_ADVICE_FALLBACK);
        assert_eq!(advisor.daily_quiz(&stats()).await, fallback_quiz());
        assert_eq!(advisor.analyze_food(&FoodQuery::default()).await, fallback_nutrients());
        assert_eq!(advisor.long_term_advice(&[]).await, NOT_ENOUGH_DATA);
    }

    #[tokio::test]
    async fn test_stalled_api_times_out_to_fallback() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let advisor = GeminiAdvisor::new("key")
            .unwrap()
            .with_base_url(format!("http://{}", addr))
            .with_timeout(Duration::from_millis(200))
            .unwrap();
        assert_eq!(advisor.timeout(), Duration::from_millis(200));

        let advice = tokio::time::timeout(Duration::from_secs(10), advisor.daily_advice(&stats()))
            .await
            .expect("request should time out well before the guard");
        assert_eq!(advice, DAILY_ADVICE_FALLBACK);
    }

    #[test]
    fn test_default_request_timeout() {
        let advisor = GeminiAdvisor::new("key").unwrap();
        assert_eq!(advisor.timeout(), Duration::from_secs(REQUEST_TIMEOUT_SECS));
    }
}
