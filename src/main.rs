//! PawPal Health
//!
//! An MCP server for dog nutrition, activity and daily reflection tracking.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pawpal::advisor::{Advisor, FallbackAdvisor, GeminiAdvisor};
use pawpal::config::Config;
use pawpal::mcp::PawPalService;
use pawpal::{build_info, db};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the MCP stream
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pawpal=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env();
    let db_path = config.database_path.clone();
    eprintln!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let advisor: Arc<dyn Advisor> = match &config.advisor {
        Some(advisor_config) => match GeminiAdvisor::from_config(advisor_config) {
            Ok(gemini) => {
                info!(model = %gemini.model(), timeout = ?gemini.timeout(), "Using Gemini advisor");
                Arc::new(gemini)
            }
            Err(e) => {
                warn!(error = %e, "Failed to build Gemini client, using fallback advisor");
                Arc::new(FallbackAdvisor)
            }
        },
        None => {
            info!("No Gemini API key set, using fallback advisor");
            Arc::new(FallbackAdvisor)
        }
    };

    let service = PawPalService::new(db_path, database, advisor);

    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
