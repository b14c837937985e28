//! Daily quiz
//!
//! A single multiple-choice question about the day, generated by the advisor.

use serde::{Deserialize, Serialize};

/// What the question is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizType {
    /// Is a metric high, low or just right
    Status,
    /// Which area needs a small adjustment
    Reminder,
    /// What went well today
    Highlight,
    /// What to focus on tomorrow
    Tomorrow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(rename = "type")]
    pub quiz_type: QuizType,
    pub question: String,
    pub options: Vec<QuizOption>,
    pub correct_message: String,
    pub wrong_message: String,
}

impl Quiz {
    /// At least two options and exactly one marked correct
    pub fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("quiz question is empty".to_string());
        }
        if self.options.len() < 2 {
            return Err(format!("quiz needs at least 2 options, got {}", self.options.len()));
        }
        let correct = self.options.iter().filter(|o| o.is_correct).count();
        if correct != 1 {
            return Err(format!("quiz needs exactly 1 correct option, got {}", correct));
        }
        Ok(())
    }

    /// Whether `option_id` is the correct answer; None when no option has that id
    pub fn check_answer(&self, option_id: &str) -> Option<bool> {
        self.options
            .iter()
            .find(|o| o.id == option_id)
            .map(|o| o.is_correct)
    }

    /// Feedback shown after answering
    pub fn feedback(&self, correct: bool) -> &str {
        if correct {
            &self.correct_message
        } else {
            &self.wrong_message
        }
    }
}
