//! Gamification progress
//!
//! XP accumulates from quiz answers; every 100 XP is a level. Streak badges
//! are granted once the number of logged days crosses 3, 7 and 30.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

const XP_PER_LEVEL: i64 = 100;

/// XP for a correct quiz answer
pub const CORRECT_ANSWER_XP: i64 = 50;
/// XP for trying, even when wrong
pub const WRONG_ANSWER_XP: i64 = 10;

struct StreakBadge {
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    description: &'static str,
    days: i64,
}

const STREAK_BADGES: [StreakBadge; 3] = [
    StreakBadge { id: "streak3", name: "3 Days", icon: "🌱", description: "3 days consistency", days: 3 },
    StreakBadge { id: "streak7", name: "1 Week", icon: "🌿", description: "1 week consistency", days: 7 },
    StreakBadge { id: "streak30", name: "1 Month", icon: "🌳", description: "1 month consistency", days: 30 },
];

/// An earned badge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub date_earned: String,
}

impl Badge {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            icon: row.get("icon")?,
            description: row.get("description")?,
            date_earned: row.get("date_earned")?,
        })
    }
}

/// XP, level and badges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub xp: i64,
    pub level: i64,
    pub badges: Vec<Badge>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self { xp: 0, level: 1, badges: Vec::new() }
    }
}

/// Level for a given XP total
pub fn level_for_xp(xp: i64) -> i64 {
    xp / XP_PER_LEVEL + 1
}

impl UserProgress {
    /// Add XP and grant any streak badges reached with `logged_days` days logged.
    /// Returns the badges newly earned.
    pub fn award(&mut self, amount: i64, logged_days: i64, earned_at: &str) -> Vec<Badge> {
        self.xp += amount;
        self.level = level_for_xp(self.xp);

        let mut earned = Vec::new();
        for streak in STREAK_BADGES.iter().filter(|s| logged_days >= s.days) {
            if self.badges.iter().any(|b| b.id == streak.id) {
                continue;
            }
            let badge = Badge {
                id: streak.id.to_string(),
                name: streak.name.to_string(),
                icon: streak.icon.to_string(),
                description: streak.description.to_string(),
                date_earned: earned_at.to_string(),
            };
            self.badges.push(badge.clone());
            earned.push(badge);
        }
        earned
    }

    /// Progress within the current level, 0-99
    pub fn xp_into_level(&self) -> i64 {
        self.xp % XP_PER_LEVEL
    }

    pub fn load(conn: &Connection) -> DbResult<Self> {
        let (xp, level): (i64, i64) = conn.query_row(
            "SELECT xp, level FROM user_progress WHERE id = 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut stmt = conn.prepare("SELECT * FROM badges ORDER BY date_earned, id")?;
        let badges = stmt
            .query_map([], Badge::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { xp, level, badges })
    }

    /// Persist XP, level and any badges not yet stored
    pub fn save(&self, conn: &Connection) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO user_progress (id, xp, level) VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                xp = excluded.xp,
                level = excluded.level,
                updated_at = datetime('now')
            "#,
            params![self.xp, self.level],
        )?;

        for badge in &self.badges {
            conn.execute(
                r#"
                INSERT OR IGNORE INTO badges (id, name, icon, description, date_earned)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![badge.id, badge.name, badge.icon, badge.description, badge.date_earned],
            )?;
        }

        Ok(())
    }
}
