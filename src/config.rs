//! Runtime configuration
//!
//! Everything is read from the environment (after loading `.env`), with
//! defaults for everything but the nudge API key.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// ---------------------------------------------------------------------------
/// Defaults
/// ---------------------------------------------------------------------------

const DEFAULT_DB_PATH: &str = "align.db";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_NUDGE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_NUDGE_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_NUDGE_TIMEOUT_SECS: u64 = 8;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid URL in {var}: {source}")]
  InvalidUrl {
    var: &'static str,
    #[source]
    source: url::ParseError,
  },

  #[error("Invalid number in {var}: {value}")]
  InvalidNumber { var: &'static str, value: String },

  #[error("{var} must be at least 1")]
  ZeroValue { var: &'static str },
}

/// ---------------------------------------------------------------------------
/// App Config
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NudgeConfig {
  /// No key means the nudge always uses its fallback sentence
  pub api_key: Option<String>,
  pub api_url: Url,
  pub model: String,
  pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub db_path: PathBuf,
  pub log_level: String,
  pub nudge: NudgeConfig,
}

impl AppConfig {
  /// Load `.env` if present, then read the process environment
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_vars()
  }

  /// Read the process environment only
  pub fn from_vars() -> Result<Self, ConfigError> {
    let api_url_raw = var_or("ALIGN_NUDGE_API_URL", DEFAULT_NUDGE_API_URL);
    let api_url = Url::parse(&api_url_raw).map_err(|source| ConfigError::InvalidUrl {
      var: "ALIGN_NUDGE_API_URL",
      source,
    })?;

    let timeout_secs = match env::var("ALIGN_NUDGE_TIMEOUT_SECS") {
      Ok(raw) => raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
          var: "ALIGN_NUDGE_TIMEOUT_SECS",
          value: raw.clone(),
        })?,
      Err(_) => DEFAULT_NUDGE_TIMEOUT_SECS,
    };
    if timeout_secs == 0 {
      return Err(ConfigError::ZeroValue {
        var: "ALIGN_NUDGE_TIMEOUT_SECS",
      });
    }

    Ok(Self {
      db_path: PathBuf::from(var_or("ALIGN_DB_PATH", DEFAULT_DB_PATH)),
      log_level: var_or("ALIGN_LOG_LEVEL", DEFAULT_LOG_LEVEL),
      nudge: NudgeConfig {
        api_key: env::var("ALIGN_NUDGE_API_KEY")
          .ok()
          .filter(|key| !key.trim().is_empty()),
        api_url,
        model: var_or("ALIGN_NUDGE_MODEL", DEFAULT_NUDGE_MODEL),
        timeout: Duration::from_secs(timeout_secs),
      },
    })
  }

  /// SQLite connection string for the configured path, creating the file if missing
  pub fn database_url(&self) -> String {
    format!("sqlite://{}?mode=rwc", self.db_path.display())
  }
}

fn var_or(name: &str, default: &str) -> String {
  env::var(name)
    .ok()
    .filter(|v| !v.trim().is_empty())
    .unwrap_or_else(|| default.to_string())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const VARS: [&str; 6] = [
    "ALIGN_DB_PATH",
    "ALIGN_LOG_LEVEL",
    "ALIGN_NUDGE_API_KEY",
    "ALIGN_NUDGE_API_URL",
    "ALIGN_NUDGE_MODEL",
    "ALIGN_NUDGE_TIMEOUT_SECS",
  ];

  fn vars_with(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
    VARS
      .iter()
      .map(|var| {
        let value = overrides.iter().find(|(name, _)| name == var).map(|(_, v)| *v);
        (*var, value)
      })
      .collect()
  }

  #[test]
  #[serial]
  fn test_defaults() {
    temp_env::with_vars(vars_with(&[]), || {
      let config = AppConfig::from_vars().unwrap();

      assert_eq!(config.db_path, PathBuf::from("align.db"));
      assert_eq!(config.log_level, "info");
      assert!(config.nudge.api_key.is_none());
      assert_eq!(config.nudge.api_url.as_str(), DEFAULT_NUDGE_API_URL);
      assert_eq!(config.nudge.timeout, Duration::from_secs(8));
      assert_eq!(config.database_url(), "sqlite://align.db?mode=rwc");
    });
  }

  #[test]
  #[serial]
  fn test_overrides() {
    let vars = vars_with(&[
      ("ALIGN_DB_PATH", "/tmp/align-test.db"),
      ("ALIGN_LOG_LEVEL", "debug"),
      ("ALIGN_NUDGE_API_KEY", "sk-test"),
      ("ALIGN_NUDGE_API_URL", "http://localhost:1234/v1/messages"),
      ("ALIGN_NUDGE_TIMEOUT_SECS", "3"),
    ]);

    temp_env::with_vars(vars, || {
      let config = AppConfig::from_vars().unwrap();

      assert_eq!(config.db_path, PathBuf::from("/tmp/align-test.db"));
      assert_eq!(config.log_level, "debug");
      assert_eq!(config.nudge.api_key.as_deref(), Some("sk-test"));
      assert_eq!(config.nudge.api_url.port(), Some(1234));
      assert_eq!(config.nudge.timeout, Duration::from_secs(3));
    });
  }

  #[test]
  #[serial]
  fn test_blank_key_is_missing() {
    let vars = vars_with(&[("ALIGN_NUDGE_API_KEY", "  ")]);
    temp_env::with_vars(vars, || {
      assert!(AppConfig::from_vars().unwrap().nudge.api_key.is_none());
    });
  }

  #[test]
  #[serial]
  fn test_invalid_values() {
    let bad_url = vars_with(&[("ALIGN_NUDGE_API_URL", "not a url")]);
    temp_env::with_vars(bad_url, || {
      let err = AppConfig::from_vars().unwrap_err();
      assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    });

    let bad_timeout = vars_with(&[("ALIGN_NUDGE_TIMEOUT_SECS", "soon")]);
    temp_env::with_vars(bad_timeout, || {
      let err = AppConfig::from_vars().unwrap_err();
      assert_eq!(err.to_string(), "Invalid number in ALIGN_NUDGE_TIMEOUT_SECS: soon");
    });

    let zero_timeout = vars_with(&[("ALIGN_NUDGE_TIMEOUT_SECS", "0")]);
    temp_env::with_vars(zero_timeout, || {
      let err = AppConfig::from_vars().unwrap_err();
      assert!(matches!(err, ConfigError::ZeroValue { var: "ALIGN_NUDGE_TIMEOUT_SECS" }));
      assert_eq!(err.to_string(), "ALIGN_NUDGE_TIMEOUT_SECS must be at least 1");
    });
  }
}
