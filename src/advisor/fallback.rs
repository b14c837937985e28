//! Fixed answers used when no model is configured or a model call fails

use async_trait::async_trait;

use super::{Advisor, DayStats, FoodQuery, TrendPoint};
use crate::models::{NutrientProfile, Quiz, QuizOption, QuizType};

pub const DAILY_ADVICE_FALLBACK: &str = "Have a happy day! 今天也要開開心心喔！🐶";
pub const DAILY_ADVICE_EMPTY: &str = "Great job today! 今天過得很棒喔！";
pub const LONG_TERM_ADVICE_FALLBACK: &str =
    "Consistency is key to health! 長期保持均衡飲食，是健康的關鍵喔！";
pub const LONG_TERM_ADVICE_EMPTY: &str =
    "Keep watching the long-term trends! 持續觀察寶貝的長期趨勢！";
pub const NOT_ENOUGH_DATA: &str = "Not enough data yet! 還沒有足夠的資料來分析喔！";

pub(crate) const QUIZ_CORRECT_MESSAGE: &str =
    "Well done, clearly grasped today's status. 做得很好，清楚掌握今天的狀態。";
pub(crate) const QUIZ_WRONG_MESSAGE: &str =
    "Close, but good direction. 差一點點，但方向很好，明天一起調整。";

/// A small generic serving
pub fn fallback_nutrients() -> NutrientProfile {
    NutrientProfile {
        protein: 5.0,
        fat: 3.0,
        omega3: 0.1,
        carbs: 10.0,
        fiber: 1.0,
        calories: 100.0,
        sodium: 20.0,
        calcium: 50.0,
        phosphorus: 40.0,
        vitamin_d: 10.0,
        water: 0.0,
    }
}

pub fn fallback_quiz() -> Quiz {
    let option = |id: &str, text: &str, is_correct: bool| QuizOption {
        id: id.to_string(),
        text: text.to_string(),
        is_correct,
    };

    Quiz {
        quiz_type: QuizType::Highlight,
        question: "What is the best part of today? 今天最值得鼓勵的地方是哪一個？".to_string(),
        options: vec![
            option("1", "Logged carefully 用心記錄生活", true),
            option("2", "Balanced Diet 飲食均衡", false),
            option("3", "Good Activity 活動充足", false),
        ],
        correct_message: QUIZ_CORRECT_MESSAGE.to_string(),
        wrong_message: QUIZ_WRONG_MESSAGE.to_string(),
    }
}

/// Advisor that never calls out; used when no API key is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackAdvisor;

#[async_trait]
impl Advisor for FallbackAdvisor {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn analyze_food(&self, _query: &FoodQuery) -> NutrientProfile {
        fallback_nutrients()
    }

    async fn daily_advice(&self, _stats: &DayStats) -> String {
        DAILY_ADVICE_FALLBACK.to_string()
    }

    async fn long_term_advice(&self, trend: &[TrendPoint]) -> String {
        if trend.is_empty() {
            return NOT_ENOUGH_DATA.to_string();
        }
        LONG_TERM_ADVICE_FALLBACK.to_string()
    }

    async fn daily_quiz(&self, _stats: &DayStats) -> Quiz {
        fallback_quiz()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_quiz_is_valid() {
        let quiz = fallback_quiz();
        assert!(quiz.validate().is_ok());
        assert_eq!(quiz.check_answer("1"), Some(true));
        assert_eq!(quiz.check_answer("3"), Some(false));
    }

    #[test]
    fn test_fallback_nutrients_have_no_water() {
        let nutrients = fallback_nutrients();
        assert_eq!(nutrients.water, 0.0);
        assert_eq!(nutrients.calories, 100.0);
        assert!(nutrients.is_valid());
    }

    #[tokio::test]
    async fn test_fallback_advisor_answers() {
        let advisor = FallbackAdvisor;
        let stats = DayStats {
            target: NutrientProfile::zero(),
            consumed: NutrientProfile::zero(),
            burned_calories: 0,
            activity_minutes: 0.0,
        };

        assert_eq!(advisor.daily_advice(&stats).await, DAILY_ADVICE_FALLBACK);
        assert_eq!(advisor.long_term_advice(&[]).await, NOT_ENOUGH_DATA);

        let trend = vec![TrendPoint { date: "2025-03-01".to_string(), net: 400.0, sodium: 90.0 }];
        assert_eq!(advisor.long_term_advice(&trend).await, LONG_TERM_ADVICE_FALLBACK);
        assert_eq!(advisor.analyze_food(&FoodQuery::default()).await, fallback_nutrients());
        assert_eq!(advisor.daily_quiz(&stats).await, fallback_quiz());
    }
}
