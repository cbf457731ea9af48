//! Commands for the workout in progress

use chrono::{DateTime, Datelike, Local, Utc};

use crate::blocks::build_session_blocks;
use crate::db::{AppState, StateStore};
use crate::models::{Exercise, ExerciseDefinition, SetField, Workout, WorkoutSectionType};
use crate::recommend::{planned_exercises, DayPlan, PlannerSelections};

/// Start today's session. Manual planner picks win over the program-driven plan.
pub async fn start_workout<S: StateStore>(
  state: &AppState<S>,
  selections: Option<PlannerSelections>,
) -> Result<Workout, String> {
  start_workout_at(state, selections.unwrap_or_default(), Utc::now()).await
}

pub(crate) async fn start_workout_at<S: StateStore>(
  state: &AppState<S>,
  selections: PlannerSelections,
  now: DateTime<Utc>,
) -> Result<Workout, String> {
  let weekday = now.with_timezone(&Local).weekday();

  state
    .mutate(|snapshot| {
      let program = snapshot.training_program.clone();
      let plan = DayPlan::for_day(&program, weekday);
      let planned = planned_exercises(&selections, &snapshot.available_exercises, &program, &plan);
      let blocks = build_session_blocks(program.goal, program.session_length_min);

      tracing::info!("Starting {} with {} planned exercises", plan.label, planned.len());
      snapshot
        .start_workout(&plan.label, blocks, &planned, now)
        .cloned()
        .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Failed to save workout: {}", e))?
}

/// Add an exercise to the active workout, creating it in the catalog if new
pub async fn add_exercise_to_workout<S: StateStore>(
  state: &AppState<S>,
  exercise: ExerciseDefinition,
) -> Result<Exercise, String> {
  let weekday = Local::now().weekday();

  state
    .mutate(|snapshot| {
      let day_type = DayPlan::for_day(&snapshot.training_program, weekday).day_type;
      snapshot
        .add_exercise(exercise, day_type, Utc::now())
        .cloned()
        .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Failed to save workout: {}", e))?
}

pub async fn finish_workout<S: StateStore>(state: &AppState<S>) -> Result<Workout, String> {
  state
    .mutate(|snapshot| snapshot.finish_workout().cloned().map_err(|e| e.to_string()))
    .await
    .map_err(|e| format!("Failed to save workout: {}", e))?
}

pub async fn update_workout_set<S: StateStore>(
  state: &AppState<S>,
  exercise_id: String,
  set_index: usize,
  field: SetField,
  value: Option<f64>,
) -> Result<(), String> {
  state
    .mutate(|snapshot| {
      snapshot
        .update_set(&exercise_id, set_index, field, value)
        .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Failed to save set: {}", e))?
}

pub async fn toggle_workout_set<S: StateStore>(
  state: &AppState<S>,
  exercise_id: String,
  set_index: usize,
) -> Result<(), String> {
  state
    .mutate(|snapshot| snapshot.toggle_set(&exercise_id, set_index).map_err(|e| e.to_string()))
    .await
    .map_err(|e| format!("Failed to save set: {}", e))?
}

/// Shift an exercise one slot earlier (-1) or later (+1) in the session
pub async fn move_workout_exercise<S: StateStore>(
  state: &AppState<S>,
  exercise_id: String,
  direction: isize,
) -> Result<(), String> {
  state
    .mutate(|snapshot| {
      snapshot
        .move_exercise(&exercise_id, direction.signum())
        .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Failed to save workout: {}", e))?
}

pub async fn add_workout_set<S: StateStore>(state: &AppState<S>, exercise_id: String) -> Result<(), String> {
  state
    .mutate(|snapshot| snapshot.add_set(&exercise_id).map_err(|e| e.to_string()))
    .await
    .map_err(|e| format!("Failed to save set: {}", e))?
}

/// Drop one set; the last remaining set is kept
pub async fn remove_workout_set<S: StateStore>(
  state: &AppState<S>,
  exercise_id: String,
  set_index: usize,
) -> Result<(), String> {
  state
    .mutate(|snapshot| {
      snapshot
        .remove_set(&exercise_id, set_index)
        .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Failed to save set: {}", e))?
}

/// Move an exercise to another planner section
pub async fn set_exercise_section<S: StateStore>(
  state: &AppState<S>,
  exercise_id: String,
  section: WorkoutSectionType,
) -> Result<(), String> {
  state
    .mutate(|snapshot| {
      snapshot
        .set_section_override(&exercise_id, section)
        .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Failed to save workout: {}", e))?
}
