//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Helper assertions

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use crate::catalog::ExerciseCatalog;
use crate::db::AppState;
use crate::db::SqliteStateStore;
use crate::llm::NudgeClient;
use crate::models::{
  ConditioningPreference, Emphasis, Exercise, SetLog, TrainingGoal, TrainingProgram, Workout,
};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// App state over a fresh in-memory store with the nudge disabled
pub async fn setup_test_state() -> (AppState, SqlitePool) {
  let pool = setup_test_db().await;
  let state = AppState::open(SqliteStateStore::new(pool.clone()), NudgeClient::disabled())
    .await
    .expect("Failed to open app state");
  (state, pool)
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_program(goal: TrainingGoal, days_per_week: u8, emphasis: Emphasis) -> TrainingProgram {
  TrainingProgram {
    goal,
    days_per_week,
    emphasis,
    session_length_min: 60,
    conditioning_preference: ConditioningPreference::None,
  }
}

/// Built-in exercise with the given sets; panics on unknown names
pub fn mock_exercise(name: &str, sets: Vec<SetLog>) -> Exercise {
  Exercise {
    id: format!("{}-id", name.to_lowercase().replace(' ', "-")),
    definition: ExerciseCatalog::built_in()
      .find(name)
      .cloned()
      .unwrap_or_else(|| panic!("{} is not a built-in exercise", name)),
    sets,
    previous_stats: None,
    section_type: None,
  }
}

/// Completed workout with three completed bench sets of 10 x 135
pub fn mock_completed_workout(id: &str, name: &str, days_ago: i64) -> Workout {
  Workout {
    id: id.to_string(),
    name: name.to_string(),
    date: datetime_days_ago(days_ago),
    exercises: vec![mock_exercise("Bench Press", vec![SetLog::loaded(10, 135.0).completed(); 3])],
    completed: true,
    blocks: None,
  }
}

/// Same as `mock_completed_workout` but still open
pub fn mock_open_workout(id: &str, name: &str, days_ago: i64) -> Workout {
  Workout {
    completed: false,
    ..mock_completed_workout(id, name, days_ago)
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Create a DateTime N days ago from now
pub fn datetime_days_ago(days: i64) -> DateTime<Utc> {
  Utc::now() - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> =
      sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = 'app_state'")
        .fetch_all(&pool)
        .await
        .expect("Failed to query tables");

    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let program = mock_program(TrainingGoal::Strength, 3, Emphasis::Balanced);
    assert_eq!(program.days_per_week, 3);

    let workout = mock_completed_workout("w1", "Upper A", 1);
    assert!(workout.completed);
    assert_eq!(workout.exercises[0].completed_sets(), 3);
    assert_approx_eq!(workout.exercises[0].best_weight(), 135.0, 0.01);

    assert!(!mock_open_workout("w2", "Lower A", 0).completed);
  }
}
