pub mod nudge;
pub mod planning;
pub mod program;
pub mod session;

use chrono::{Datelike, Local, Weekday};

use crate::db::{AppState, StateStore};
use crate::models::{ExerciseDefinition, Workout};

/// Weekday of the host's local clock
pub(crate) fn today() -> Weekday {
  Local::now().weekday()
}

/// Completed workouts, newest first
pub async fn get_workouts<S: StateStore>(state: &AppState<S>) -> Result<Vec<Workout>, String> {
  let snapshot = state.snapshot.lock().await;
  Ok(snapshot.history().into_iter().cloned().collect())
}

pub async fn get_active_workout<S: StateStore>(state: &AppState<S>) -> Result<Option<Workout>, String> {
  let snapshot = state.snapshot.lock().await;
  Ok(snapshot.active_workout().cloned())
}

/// Catalog autocomplete; an empty query lists the whole catalog
pub async fn search_exercises<S: StateStore>(
  state: &AppState<S>,
  query: String,
  limit: Option<usize>,
) -> Result<Vec<ExerciseDefinition>, String> {
  let snapshot = state.snapshot.lock().await;
  let catalog = &snapshot.available_exercises;

  if query.trim().is_empty() {
    return Ok(catalog.iter().cloned().collect());
  }
  Ok(
    catalog
      .search(&query, limit.unwrap_or(8))
      .into_iter()
      .cloned()
      .collect(),
  )
}
