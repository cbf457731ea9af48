//! Text-generation client for the adaptive nudge
//!
//! A single short completion from the messages API. The nudge never fails
//! from the caller's point of view: errors, timeouts and a missing key all
//! degrade to a fixed sentence.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::NudgeConfig;
use crate::models::AppSnapshot;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const API_VERSION: &str = "2023-06-01";
const NUDGE_MAX_TOKENS: u32 = 120;

/// Returned when the model answers with nothing
pub const EMPTY_REPLY_NUDGE: &str = "You're building something beautiful. One breath at a time.";
/// Returned on any failure
pub const FALLBACK_NUDGE: &str = "Let's take a deep breath and start small today.";

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Serialize)]
pub enum LlmError {
  #[error("API key not configured")]
  MissingApiKey,

  #[error("Request failed: {0}")]
  Request(String),

  #[error("Request timed out after {0}s")]
  Timeout(u64),

  #[error("API error: {0}")]
  Api(String),

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Messages API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct MessagesRequest {
  model: String,
  max_tokens: u32,
  system: String,
  messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
  role: String,
  content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
  content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
  #[serde(rename = "type")]
  content_type: String,
  text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
  error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
  message: String,
}

/// ---------------------------------------------------------------------------
/// Nudge Summary
/// ---------------------------------------------------------------------------

/// Stats the nudge is written from. Mood, hydration and cycle phase come
/// from trackers outside this crate and are supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeSummary {
  pub workouts_completed: usize,
  pub hydration_oz: f64,
  pub latest_mood: Option<String>,
  pub cycle_phase: Option<String>,
  pub top_goal: Option<GoalProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
  pub title: String,
  pub progress: u32,
}

impl NudgeSummary {
  /// Count completed workouts from the snapshot and take the rest as given
  pub fn from_snapshot(snapshot: &AppSnapshot, extras: NudgeSummary) -> Self {
    Self {
      workouts_completed: snapshot.workouts.iter().filter(|w| w.completed).count(),
      ..extras
    }
  }

  pub fn prompt(&self) -> String {
    let goal = match &self.top_goal {
      Some(goal) => format!("{} is at {}%", goal.title, goal.progress),
      None => "none set".to_string(),
    };

    format!(
      "- Workouts completed: {}\n- Hydration today: {}oz\n- Latest mood: {}\n- Estimated cycle phase: {}\n- Latest goal: {}",
      self.workouts_completed,
      self.hydration_oz,
      self.latest_mood.as_deref().unwrap_or("neutral"),
      self.cycle_phase.as_deref().unwrap_or("unknown"),
      goal
    )
  }
}

/// ---------------------------------------------------------------------------
/// Nudge Client
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NudgeClient {
  client: Client,
  api_key: Option<String>,
  api_url: String,
  model: String,
  timeout: Duration,
}

impl NudgeClient {
  pub fn new(config: &NudgeConfig) -> Self {
    Self {
      client: Client::new(),
      api_key: config.api_key.clone(),
      api_url: config.api_url.to_string(),
      model: config.model.clone(),
      timeout: config.timeout,
    }
  }

  /// Client with no key; every nudge is the fallback sentence
  pub fn disabled() -> Self {
    Self {
      client: Client::new(),
      api_key: None,
      api_url: String::new(),
      model: String::new(),
      timeout: Duration::from_secs(1),
    }
  }

  pub fn is_enabled(&self) -> bool {
    self.api_key.is_some()
  }

  /// One completion. The timeout covers the whole exchange, body included.
  pub async fn complete(&self, system_prompt: &str, user_message: &str, max_tokens: u32) -> Result<String, LlmError> {
    let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

    let request = MessagesRequest {
      model: self.model.clone(),
      max_tokens,
      system: system_prompt.to_string(),
      messages: vec![Message {
        role: "user".to_string(),
        content: user_message.to_string(),
      }],
    };

    let exchange = async {
      let response = self
        .client
        .post(&self.api_url)
        .header("x-api-key", api_key)
        .header("anthropic-version", API_VERSION)
        .header("content-type", "application/json")
        .json(&request)
        .send()
        .await?;
      let status = response.status();
      let body = response.text().await?;
      Ok::<_, reqwest::Error>((status, body))
    };

    let (status, body) = tokio::time::timeout(self.timeout, exchange)
      .await
      .map_err(|_| LlmError::Timeout(self.timeout.as_secs()))?
      .map_err(|e| LlmError::Request(e.to_string()))?;

    if !status.is_success() {
      if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(&body) {
        return Err(LlmError::Api(error_resp.error.message));
      }
      return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
    }

    let parsed: MessagesResponse = serde_json::from_str(&body).map_err(|e| LlmError::Parse(e.to_string()))?;

    Ok(
      parsed
        .content
        .iter()
        .filter(|c| c.content_type == "text")
        .filter_map(|c| c.text.as_deref())
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string(),
    )
  }

  /// Short motivational line for the dashboard. Never fails.
  pub async fn adaptive_nudge(&self, summary: &NudgeSummary) -> String {
    let system_prompt = include_str!("prompts/nudge_system.txt");

    match self.complete(system_prompt, &summary.prompt(), NUDGE_MAX_TOKENS).await {
      Ok(text) if text.is_empty() => EMPTY_REPLY_NUDGE.to_string(),
      Ok(text) => text,
      Err(LlmError::MissingApiKey) => {
        tracing::debug!("Nudge API key not configured, using fallback");
        FALLBACK_NUDGE.to_string()
      }
      Err(e) => {
        tracing::warn!("Adaptive nudge failed: {}", e);
        FALLBACK_NUDGE.to_string()
      }
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
