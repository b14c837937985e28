//! Runtime configuration
//!
//! Read from environment variables once at startup.

use std::path::PathBuf;

pub const DATABASE_PATH_ENV: &str = "PAWPAL_DATABASE_PATH";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL_ENV: &str = "PAWPAL_GEMINI_MODEL";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Settings for the Gemini advisor
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// None when no API key is configured; the fallback advisor is used then
    pub advisor: Option<AdvisorConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        let advisor = std::env::var(GEMINI_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| AdvisorConfig {
                api_key,
                model: std::env::var(GEMINI_MODEL_ENV)
                    .ok()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            });

        Self {
            database_path: database_path(),
            advisor,
        }
    }
}

/// Database path from `PAWPAL_DATABASE_PATH`, or `<project>/data/pawpal.db`
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_database_path())
}

fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Step out of target/release or target/debug to the project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(project_root) = path.parent().and_then(|p| p.parent()) {
            path = project_root.to_path_buf();
        }
    }

    path.push("data");
    path.push("pawpal.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_path_ends_in_data_dir() {
        let path = default_database_path();
        assert!(path.ends_with("data/pawpal.db"));
    }
}
