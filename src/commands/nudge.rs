//! Adaptive nudge command

use crate::db::{AppState, StateStore};
use crate::llm::NudgeSummary;

/// One or two sentences of encouragement. Tracker stats the planner doesn't
/// own (hydration, mood, cycle phase, goals) come in through `extras`.
pub async fn get_adaptive_nudge<S: StateStore>(
  state: &AppState<S>,
  extras: Option<NudgeSummary>,
) -> Result<String, String> {
  let summary = {
    let snapshot = state.snapshot.lock().await;
    NudgeSummary::from_snapshot(&snapshot, extras.unwrap_or_default())
  };

  tracing::debug!("Requesting nudge for {} completed workouts", summary.workouts_completed);

  Ok(state.nudge.adaptive_nudge(&summary).await)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::NudgeConfig;
  use crate::db::SqliteStateStore;
  use crate::llm::{NudgeClient, FALLBACK_NUDGE};
  use crate::test_utils::{mock_completed_workout, setup_test_db, setup_test_state, teardown_test_db};
  use std::time::Duration;

  #[tokio::test]
  async fn test_nudge_without_key_uses_fallback() {
    let (state, pool) = setup_test_state().await;
    assert_eq!(get_adaptive_nudge(&state, None).await.unwrap(), FALLBACK_NUDGE);
    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_nudge_sends_workout_count() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/v1/messages")
      .match_body(mockito::Matcher::Regex("Workouts completed: 2".to_string()))
      .with_status(200)
      .with_body(r#"{"content":[{"type":"text","text":"Pace yourself."}]}"#)
      .create_async()
      .await;

    let pool = setup_test_db().await;
    let nudge = NudgeClient::new(&NudgeConfig {
      api_key: Some("sk-test".to_string()),
      api_url: url::Url::parse(&format!("{}/v1/messages", server.url())).unwrap(),
      model: "test-model".to_string(),
      timeout: Duration::from_secs(5),
    });
    let state = AppState::open(SqliteStateStore::new(pool.clone()), nudge).await.unwrap();
    {
      let mut snapshot = state.snapshot.lock().await;
      snapshot.workouts.push(mock_completed_workout("a", "Upper A", 3));
      snapshot.workouts.push(mock_completed_workout("b", "Lower A", 1));
    }

    let text = get_adaptive_nudge(&state, None).await.unwrap();
    assert_eq!(text, "Pace yourself.");
    mock.assert_async().await;

    teardown_test_db(pool).await;
  }
}
