//! Progress MCP Tools
//!
//! Answering the daily quiz earns XP; streak badges follow the number of
//! days logged.

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{Badge, DailyLog, UserProgress, CORRECT_ANSWER_XP, WRONG_ANSWER_XP};

/// Response for answer_quiz
#[derive(Debug, Serialize)]
pub struct AnswerQuizResponse {
    pub date: String,
    pub correct: bool,
    pub message: String,
    pub xp_earned: i64,
    pub new_badges: Vec<Badge>,
    pub progress: UserProgress,
}

/// Response for get_progress
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub xp: i64,
    pub level: i64,
    pub xp_into_level: i64,
    pub days_logged: i64,
    pub badges: Vec<Badge>,
}

/// Validated answer: the day, whether it was right, and the feedback text
fn check_answer(log: Option<DailyLog>, date: &str, option_id: &str) -> Result<(DailyLog, bool, String), String> {
    let log = log.ok_or_else(|| format!("Day not found: {}", date))?;
    if log.quiz_completed {
        return Err(format!("Quiz already completed for {}", date));
    }

    let quiz = log
        .quiz
        .as_ref()
        .ok_or_else(|| format!("No quiz generated for {}. Call get_daily_quiz first.", date))?;
    let correct = quiz
        .check_answer(option_id)
        .ok_or_else(|| format!("Unknown option id: {}", option_id))?;
    let message = quiz.feedback(correct).to_string();

    Ok((log, correct, message))
}

/// Answer the stored quiz for a day. Each day can be answered once.
///
/// The check, the XP award and the completion flag share one transaction.
pub fn answer_quiz(db: &Database, date: &str, option_id: &str) -> Result<AnswerQuizResponse, String> {
    let answered = db
        .with_transaction(|tx| {
            let (log, correct, message) = match check_answer(DailyLog::get_by_date(tx, date)?, date, option_id) {
                Ok(checked) => checked,
                Err(rejection) => return Ok(Err(rejection)),
            };

            let logged_days = DailyLog::count(tx)?;
            let mut progress = UserProgress::load(tx)?;

            let xp_earned = if correct { CORRECT_ANSWER_XP } else { WRONG_ANSWER_XP };
            let earned_at = chrono::Utc::now().format("%Y-%m-%d").to_string();
            let new_badges = progress.award(xp_earned, logged_days, &earned_at);

            progress.save(tx)?;
            DailyLog::mark_quiz_completed(tx, log.id)?;

            Ok(Ok(AnswerQuizResponse {
                date: log.date,
                correct,
                message,
                xp_earned,
                new_badges,
                progress,
            }))
        })
        .map_err(|e| format!("Failed to answer quiz: {}", e))?;

    let response = answered?;
    info!(
        date = %response.date,
        correct = response.correct,
        xp = response.progress.xp,
        level = response.progress.level,
        "Quiz answered"
    );
    Ok(response)
}

/// Current XP, level and badges
pub fn get_progress(db: &Database) -> Result<ProgressResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let progress = UserProgress::load(&conn).map_err(|e| format!("Failed to load progress: {}", e))?;
    let days_logged = DailyLog::count(&conn).map_err(|e| format!("Failed to count days: {}", e))?;

    Ok(ProgressResponse {
        xp: progress.xp,
        level: progress.level,
        xp_into_level: progress.xp_into_level(),
        days_logged,
        badges: progress.badges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::FallbackAdvisor;
    use crate::tools::advice::get_daily_quiz;
    use crate::tools::days::start_day;
    use crate::tools::test_support::database_with_profile;

    #[tokio::test]
    async fn test_answer_quiz_awards_xp_once() {
        let db = database_with_profile();
        start_day(&db, "2025-03-01", "sunny").unwrap();

        let err = answer_quiz(&db, "2025-03-01", "1").unwrap_err();
        assert!(err.contains("get_daily_quiz"));

        get_daily_quiz(&db, &FallbackAdvisor, "2025-03-01").await.unwrap();
        assert!(answer_quiz(&db, "2025-03-01", "9").is_err());

        let response = answer_quiz(&db, "2025-03-01", "1").unwrap();
        assert!(response.correct);
        assert_eq!(response.xp_earned, 50);
        assert!(response.message.starts_with("Well done"));
        assert!(response.new_badges.is_empty());

        assert!(answer_quiz(&db, "2025-03-01", "1").unwrap_err().contains("already completed"));

        let completed = get_daily_quiz(&db, &FallbackAdvisor, "2025-03-01").await.unwrap();
        assert!(completed.completed);
        assert!(completed.quiz.is_none());
    }

    #[tokio::test]
    async fn test_wrong_answers_and_streak_badge() {
        let db = database_with_profile();
        for date in ["2025-03-01", "2025-03-02", "2025-03-03"] {
            start_day(&db, date, "cloudy").unwrap();
        }
        get_daily_quiz(&db, &FallbackAdvisor, "2025-03-03").await.unwrap();

        let response = answer_quiz(&db, "2025-03-03", "2").unwrap();
        assert!(!response.correct);
        assert_eq!(response.xp_earned, 10);
        assert!(response.message.starts_with("Close"));
        assert_eq!(response.new_badges.len(), 1);
        assert_eq!(response.new_badges[0].id, "streak3");

        let progress = get_progress(&db).unwrap();
        assert_eq!(progress.xp, 10);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.days_logged, 3);
        assert_eq!(progress.badges.len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_answer_leaves_progress_untouched() {
        let db = database_with_profile();
        start_day(&db, "2025-03-01", "sunny").unwrap();
        get_daily_quiz(&db, &FallbackAdvisor, "2025-03-01").await.unwrap();

        assert!(answer_quiz(&db, "2025-03-01", "nope").unwrap_err().contains("Unknown option"));
        assert!(answer_quiz(&db, "2025-03-09", "1").unwrap_err().contains("Day not found"));
        assert_eq!(get_progress(&db).unwrap().xp, 0);

        // The day can still be answered after a rejected attempt
        assert_eq!(answer_quiz(&db, "2025-03-01", "2").unwrap().xp_earned, 10);
        assert_eq!(get_progress(&db).unwrap().xp, 10);
    }

    #[test]
    fn test_get_progress_defaults() {
        let db = Database::in_memory().unwrap();
        let progress = get_progress(&db).unwrap();
        assert_eq!(progress.xp, 0);
        assert_eq!(progress.level, 1);
        assert!(progress.badges.is_empty());
    }
}
