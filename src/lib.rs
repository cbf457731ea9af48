pub mod analysis;
pub mod blocks;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod db;
pub mod llm;
pub mod models;
pub mod program;
pub mod progression;
pub mod recommend;

#[cfg(test)]
mod test_utils;

use config::AppConfig;
use db::{AppState, SqliteStateStore};
use llm::NudgeClient;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(default_level: &str) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load config, open the store and return the state the host drives
pub async fn run() -> Result<AppState, Box<dyn std::error::Error>> {
  let config = AppConfig::from_env()?;
  init_tracing(&config.log_level);

  let pool = db::initialize_db(&config).await?;
  let state = AppState::open(SqliteStateStore::new(pool), NudgeClient::new(&config.nudge)).await?;

  if state.nudge.is_enabled() {
    tracing::info!("Adaptive nudge enabled");
  } else {
    tracing::info!("ALIGN_NUDGE_API_KEY not set, nudges use the fallback text");
  }

  Ok(state)
}
