//! Prompt text and response schemas sent to the model

use serde_json::{json, Value};

use super::fallback::{QUIZ_CORRECT_MESSAGE, QUIZ_WRONG_MESSAGE};
use super::{DayStats, TrendPoint};

pub const FOOD_SYSTEM_INSTRUCTION: &str = "You are a veterinary nutritionist AI. \
Analyze food images or text descriptions for dogs. Return estimated nutritional values \
based on standard dog food composition data. If specific amounts aren't given, estimate \
a reasonable single serving for a medium dog (e.g., 1 cup dry food or 1 can wet food).";

pub const FOOD_INSTRUCTION: &str = "Analyze this dog food. Provide estimated nutritional \
values for a typical serving size if not specified. Strict JSON output.";

pub fn food_description(description: &str) -> String {
    format!("Description: {}", description)
}

pub fn daily_advice(stats: &DayStats) -> String {
    format!(
        r#"Analyze today's dog stats:
Target Calories: {target_calories}
Net Calories (Eaten - Burned): {net}
Protein Eaten: {protein}g (Target: {target_protein}g)
Sodium Eaten: {sodium}mg (Target: {target_sodium}mg)
Water Calculated Need: {water}ml

Provide a cute, supportive, one-sentence health summary.
OUTPUT FORMAT: Bilingual - English first, followed by Traditional Chinese translation.
Tone: Mature, Relaxed, Comforting.
Examples:
- "Eating well today! Keep it up. (今天吃得很好！繼續保持。)"
- "Protein is a bit low, maybe some meat tomorrow? (蛋白質稍微低了點，明天加一點肉會更棒。)""#,
        target_calories = stats.target.calories,
        net = stats.net_calories(),
        protein = stats.consumed.protein,
        target_protein = stats.target.protein,
        sodium = stats.consumed.sodium,
        target_sodium = stats.target.sodium,
        water = stats.target.water,
    )
}

pub fn long_term_advice(trend: &[TrendPoint]) -> Result<String, serde_json::Error> {
    let summary = serde_json::to_string(trend)?;
    Ok(format!(
        r#"Analyze the last 7 days of dog health data: {summary}.
Provide a gentle, long-term health advice based on trends.
OUTPUT FORMAT: Bilingual - English first, followed by Traditional Chinese translation.
Tone: Mature, Relaxed.
Example: "Calorie intake is slightly high lately, maybe add a bit more walking. (最近熱量稍高，可以增加一點散步時間，體態會更棒。)""#
    ))
}

pub fn daily_quiz(stats: &DayStats) -> String {
    format!(
        r#"Based on this data:
Target Cals: {target_calories}, Net: {net}
Target Water: {target_water}, Actual: {water}
Target Sodium: {target_sodium}, Actual: {sodium}
Activity Minutes: {minutes}

Generate 1 Daily Quiz Question in JSON.
Select ONE of these 4 types that fits today best:

1. STATUS (Understanding Today): Ask about a metric (High/Low/Just Right).
   Tone: Neutral, straightforward.
   Ex: "Is today's water intake high, low, or just right? (今天的水分攝取，落在什麼狀態？)"

2. REMINDER (Gentle Hint): Identify what needs attention.
   Tone: Gentle coach, light reminder.
   Ex: "Which area needs a small adjustment? (今天的營養素裡，哪一項比較接近需要微調？)"

3. HIGHLIGHT (Encouragement): Identify what went well.
   Tone: Stable, encouraging.
   Ex: "What is the best part of today? (今天最值得鼓勵的地方是哪一個？)"

4. TOMORROW (Future Focus): Goal for tomorrow.
   Tone: Mature, life-oriented.
   Ex: "What should we focus on tomorrow? (根據今天的情況，明天最值得留意的是？)"

STRICT GUIDELINES:
- Language: Bilingual (English + Traditional Chinese).
- Tone: "Mature Cute", Relaxed, "Just right". NOT childish, NOT scolding.
- Exactly one option has is_correct set to true.
- Correct Message: "{correct}"
- Wrong Message: "{wrong}""#,
        target_calories = stats.target.calories,
        net = stats.net_calories(),
        target_water = stats.target.water,
        water = stats.consumed.water,
        target_sodium = stats.target.sodium,
        sodium = stats.consumed.sodium,
        minutes = stats.activity_minutes,
        correct = QUIZ_CORRECT_MESSAGE,
        wrong = QUIZ_WRONG_MESSAGE,
    )
}

/// Response schema for food analysis. Water is not asked for.
pub fn nutrient_schema() -> Value {
    let number = |description: &str| json!({ "type": "NUMBER", "description": description });
    json!({
        "type": "OBJECT",
        "properties": {
            "protein": number("Protein in grams"),
            "fat": number("Total fat in grams"),
            "omega3": number("Omega-3 fatty acids in grams"),
            "carbs": number("Carbohydrates in grams"),
            "fiber": number("Dietary fiber in grams"),
            "calories": number("Energy in kcal"),
            "sodium": number("Sodium in mg"),
            "calcium": number("Calcium in mg"),
            "phosphorus": number("Phosphorus in mg"),
            "vitamin_d": number("Vitamin D in IU"),
        },
        "required": [
            "protein", "fat", "omega3", "carbs", "fiber", "calories",
            "sodium", "calcium", "phosphorus", "vitamin_d"
        ],
    })
}

pub fn quiz_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "type": { "type": "STRING", "enum": ["STATUS", "REMINDER", "HIGHLIGHT", "TOMORROW"] },
            "question": { "type": "STRING" },
            "options": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "text": { "type": "STRING" },
                        "is_correct": { "type": "BOOLEAN" },
                    },
                    "required": ["id", "text", "is_correct"],
                },
            },
            "correct_message": { "type": "STRING" },
            "wrong_message": { "type": "STRING" },
        },
        "required": ["type", "question", "options", "correct_message", "wrong_message"],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutrientProfile;

    fn stats() -> DayStats {
        DayStats {
            target: NutrientProfile {
                calories: 630.0,
                protein: 28.0,
                sodium: 126.0,
                water: 660.0,
                ..NutrientProfile::zero()
            },
            consumed: NutrientProfile {
                calories: 500.0,
                protein: 20.5,
                sodium: 90.0,
                water: 120.0,
                ..NutrientProfile::zero()
            },
            burned_calories: 42,
            activity_minutes: 30.0,
        }
    }

    #[test]
    fn test_daily_advice_prompt_carries_figures() {
        let prompt = daily_advice(&stats());
        assert!(prompt.contains("Target Calories: 630"));
        assert!(prompt.contains("Net Calories (Eaten - Burned): 458"));
        assert!(prompt.contains("Protein Eaten: 20.5g (Target: 28g)"));
        assert!(prompt.contains("Sodium Eaten: 90mg (Target: 126mg)"));
        assert!(prompt.contains("Water Calculated Need: 660ml"));
    }

    #[test]
    fn test_quiz_prompt_lists_all_types() {
        let prompt = daily_quiz(&stats());
        for quiz_type in ["STATUS", "REMINDER", "HIGHLIGHT", "TOMORROW"] {
            assert!(prompt.contains(quiz_type));
        }
        assert!(prompt.contains("Target Water: 660, Actual: 120"));
        assert!(prompt.contains("Activity Minutes: 30"));
    }

    #[test]
    fn test_long_term_prompt_embeds_trend_json() {
        let trend = vec![TrendPoint { date: "2025-03-01".to_string(), net: 588.0, sodium: 90.0 }];
        let prompt = long_term_advice(&trend).unwrap();
        assert!(prompt.contains(r#"[{"date":"2025-03-01","net":588.0,"sodium":90.0}]"#));
    }

    #[test]
    fn test_schemas_require_every_field() {
        assert_eq!(nutrient_schema()["required"].as_array().unwrap().len(), 10);
        assert!(nutrient_schema()["properties"].get("water").is_none());
        assert_eq!(quiz_schema()["properties"]["type"]["enum"].as_array().unwrap().len(), 4);
    }
}
