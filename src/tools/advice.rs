//! Advice and Quiz MCP Tools
//!
//! Daily advice and the daily quiz are generated once per day and stored on
//! the log; later calls return the stored copy.

use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

use crate::advisor::{Advisor, DayStats, TrendPoint, TREND_WINDOW_DAYS};
use crate::db::DbResult;
use crate::db::Database;
use crate::models::{
    total_burned, total_minutes, total_nutrients, ActivityEntry, DailyLog, MealEntry, Quiz,
};

/// Response for get_daily_advice
#[derive(Debug, Serialize)]
pub struct DailyAdviceResponse {
    pub date: String,
    pub advice: String,
    pub cached: bool,
}

/// Response for get_long_term_advice
#[derive(Debug, Serialize)]
pub struct LongTermAdviceResponse {
    pub days_analyzed: usize,
    pub trend: Vec<TrendPoint>,
    pub advice: String,
}

/// Response for get_daily_quiz. The quiz is omitted once answered.
#[derive(Debug, Serialize)]
pub struct DailyQuizResponse {
    pub date: String,
    pub completed: bool,
    pub quiz: Option<QuizView>,
}

/// Quiz as shown before answering, without the correct flag
#[derive(Debug, Serialize)]
pub struct QuizView {
    #[serde(rename = "type")]
    pub quiz_type: crate::models::QuizType,
    pub question: String,
    pub options: Vec<QuizOptionView>,
}

#[derive(Debug, Serialize)]
pub struct QuizOptionView {
    pub id: String,
    pub text: String,
}

impl From<&Quiz> for QuizView {
    fn from(quiz: &Quiz) -> Self {
        Self {
            quiz_type: quiz.quiz_type,
            question: quiz.question.clone(),
            options: quiz
                .options
                .iter()
                .map(|o| QuizOptionView { id: o.id.clone(), text: o.text.clone() })
                .collect(),
        }
    }
}

/// Figures for one logged day
pub(crate) fn day_stats(conn: &Connection, log: &DailyLog) -> DbResult<DayStats> {
    let meals = MealEntry::list_for_log(conn, log.id)?;
    let activities = ActivityEntry::list_for_log(conn, log.id)?;

    Ok(DayStats {
        target: log.profile_snapshot.target_nutrients,
        consumed: total_nutrients(&meals),
        burned_calories: total_burned(&activities),
        activity_minutes: total_minutes(&activities),
    })
}

fn load_day(db: &Database, date: &str) -> Result<(DailyLog, DayStats), String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let log = DailyLog::get_by_date(&conn, date)
        .map_err(|e| format!("Failed to get day: {}", e))?
        .ok_or_else(|| format!("Day not found: {}", date))?;
    let stats = day_stats(&conn, &log).map_err(|e| format!("Failed to summarize day: {}", e))?;

    Ok((log, stats))
}

/// Advice for one day; generated on first request, or again when `refresh` is set
pub async fn get_daily_advice(
    db: &Database,
    advisor: &dyn Advisor,
    date: &str,
    refresh: bool,
) -> Result<DailyAdviceResponse, String> {
    let (log, stats) = load_day(db, date)?;

    if let Some(advice) = log.ai_advice.filter(|_| !refresh) {
        return Ok(DailyAdviceResponse { date: log.date, advice, cached: true });
    }

    let advice = advisor.daily_advice(&stats).await;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    DailyLog::set_ai_advice(&conn, log.id, &advice)
        .map_err(|e| format!("Failed to save advice: {}", e))?;

    info!(date = %log.date, advisor = advisor.name(), "Generated daily advice");
    Ok(DailyAdviceResponse { date: log.date, advice, cached: false })
}

/// Advice on the trend over the most recent days
pub async fn get_long_term_advice(
    db: &Database,
    advisor: &dyn Advisor,
) -> Result<LongTermAdviceResponse, String> {
    let trend = {
        let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
        let logs = DailyLog::list_recent(&conn, TREND_WINDOW_DAYS as i64)
            .map_err(|e| format!("Failed to list days: {}", e))?;

        let mut trend = Vec::with_capacity(logs.len());
        for log in &logs {
            let stats = day_stats(&conn, log).map_err(|e| format!("Failed to summarize day: {}", e))?;
            trend.push(TrendPoint {
                date: log.date.clone(),
                net: stats.net_calories(),
                sodium: stats.consumed.sodium,
            });
        }
        trend
    };

    let advice = advisor.long_term_advice(&trend).await;

    Ok(LongTermAdviceResponse {
        days_analyzed: trend.len(),
        trend,
        advice,
    })
}

/// The day's quiz, generating and storing it on first request
pub async fn get_daily_quiz(
    db: &Database,
    advisor: &dyn Advisor,
    date: &str,
) -> Result<DailyQuizResponse, String> {
    let (log, stats) = load_day(db, date)?;

    if log.quiz_completed {
        return Ok(DailyQuizResponse { date: log.date, completed: true, quiz: None });
    }
    if let Some(quiz) = &log.quiz {
        return Ok(DailyQuizResponse {
            date: log.date.clone(),
            completed: false,
            quiz: Some(QuizView::from(quiz)),
        });
    }

    let quiz = advisor.daily_quiz(&stats).await;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    DailyLog::set_quiz(&conn, log.id, &quiz).map_err(|e| format!("Failed to save quiz: {}", e))?;

    info!(date = %log.date, advisor = advisor.name(), "Generated daily quiz");
    Ok(DailyQuizResponse {
        date: log.date,
        completed: false,
        quiz: Some(QuizView::from(&quiz)),
    })
}
