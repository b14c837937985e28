//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: profile, daily logs, meals, activities, progress
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- DOG PROFILE
        -- Single row; target nutrients are a snapshot taken at creation
        -- ============================================
        CREATE TABLE dog_profile (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            name TEXT NOT NULL,
            breed TEXT NOT NULL DEFAULT 'Mixed',
            age_years INTEGER NOT NULL CHECK (age_years >= 0),
            weight_kg REAL NOT NULL CHECK (weight_kg > 0),
            habits TEXT NOT NULL,                -- JSON array of activity categories
            target_nutrients TEXT NOT NULL,      -- JSON NutrientProfile
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- DAILY LOGS
        -- One per date; the profile is copied in as it was that day
        -- ============================================
        CREATE TABLE daily_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL UNIQUE,           -- ISO date: "2025-01-09"
            weather TEXT NOT NULL CHECK(weather IN ('sunny', 'cloudy', 'rainy', 'cool', 'hot')),
            profile_snapshot TEXT NOT NULL,      -- JSON DogProfile
            ai_advice TEXT,
            quiz TEXT,                           -- JSON Quiz, generated on first request
            quiz_completed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE UNIQUE INDEX idx_daily_logs_date ON daily_logs(date);

        -- ============================================
        -- MEAL ENTRIES
        -- ============================================
        CREATE TABLE meal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            daily_log_id INTEGER NOT NULL REFERENCES daily_logs(id) ON DELETE CASCADE,
            meal_type TEXT NOT NULL CHECK(meal_type IN ('breakfast', 'dinner', 'snack')),
            description TEXT NOT NULL,
            image_url TEXT,
            time_of_day TEXT,
            timestamp TEXT NOT NULL,

            protein REAL NOT NULL DEFAULT 0,     -- grams
            fat REAL NOT NULL DEFAULT 0,         -- grams
            omega3 REAL NOT NULL DEFAULT 0,      -- grams
            carbs REAL NOT NULL DEFAULT 0,       -- grams
            fiber REAL NOT NULL DEFAULT 0,       -- grams
            calories REAL NOT NULL DEFAULT 0,    -- kcal
            sodium REAL NOT NULL DEFAULT 0,      -- milligrams
            calcium REAL NOT NULL DEFAULT 0,     -- milligrams
            phosphorus REAL NOT NULL DEFAULT 0,  -- milligrams
            vitamin_d REAL NOT NULL DEFAULT 0,   -- IU
            water REAL NOT NULL DEFAULT 0,       -- milliliters

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meal_entries_log ON meal_entries(daily_log_id);

        -- ============================================
        -- ACTIVITY ENTRIES
        -- Burned calories are fixed when the entry is logged
        -- ============================================
        CREATE TABLE activity_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            daily_log_id INTEGER NOT NULL REFERENCES daily_logs(id) ON DELETE CASCADE,
            category TEXT NOT NULL CHECK(category IN ('rest', 'light_walk', 'moderate_walk', 'intense_run', 'play', 'other')),
            duration_minutes REAL NOT NULL CHECK (duration_minutes >= 0),
            calories_burned INTEGER NOT NULL CHECK (calories_burned >= 0),
            time_of_day TEXT CHECK(time_of_day IN ('day', 'night')),
            timestamp TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_activity_entries_log ON activity_entries(daily_log_id);

        -- ============================================
        -- PROGRESS
        -- XP and level (single row) plus earned badges
        -- ============================================
        CREATE TABLE user_progress (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            xp INTEGER NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 1,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT INTO user_progress (id, xp, level) VALUES (1, 0, 1);

        CREATE TABLE badges (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            icon TEXT NOT NULL,
            description TEXT NOT NULL,
            date_earned TEXT NOT NULL
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_progress_row_is_seeded() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let (xp, level): (i64, i64) = conn
            .query_row("SELECT xp, level FROM user_progress WHERE id = 1", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!((xp, level), (0, 1));
    }
}
