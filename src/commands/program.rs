//! Commands for the weekly program and session phase plan

use chrono::Weekday;

use crate::blocks::{blocks_for_workout, build_session_blocks};
use crate::commands::today;
use crate::db::{AppState, StateStore};
use crate::models::{GeneratedWeek, TrainingProgram, TrainingProgramUpdate, WeekDay, WorkoutBlock};
use crate::program::{full_week_structure, generate_weekly_structure, today_structure};

pub async fn get_training_program<S: StateStore>(state: &AppState<S>) -> Result<TrainingProgram, String> {
  let snapshot = state.snapshot.lock().await;
  Ok(snapshot.training_program.clone())
}

/// Training days for the stored program, Monday first
pub async fn get_weekly_structure<S: StateStore>(state: &AppState<S>) -> Result<Vec<GeneratedWeek>, String> {
  let snapshot = state.snapshot.lock().await;
  Ok(generate_weekly_structure(&snapshot.training_program))
}

/// Today's training day, or the week's first one on an off day
pub async fn get_today_structure<S: StateStore>(state: &AppState<S>) -> Result<Option<GeneratedWeek>, String> {
  get_today_structure_at(state, today()).await
}

pub(crate) async fn get_today_structure_at<S: StateStore>(
  state: &AppState<S>,
  weekday: Weekday,
) -> Result<Option<GeneratedWeek>, String> {
  let snapshot = state.snapshot.lock().await;
  Ok(today_structure(&snapshot.training_program, weekday))
}

/// All seven days including rest
pub async fn get_full_week<S: StateStore>(state: &AppState<S>) -> Result<Vec<WeekDay>, String> {
  let snapshot = state.snapshot.lock().await;
  Ok(full_week_structure(&snapshot.training_program).to_vec())
}

/// Frozen blocks of the active workout, or the plan the program would start today
pub async fn get_session_blocks<S: StateStore>(state: &AppState<S>) -> Result<Vec<WorkoutBlock>, String> {
  let snapshot = state.snapshot.lock().await;
  let program = &snapshot.training_program;
  let planned = build_session_blocks(program.goal, program.session_length_min);

  Ok(match snapshot.active_workout() {
    Some(workout) => blocks_for_workout(workout, &planned),
    None => planned,
  })
}

pub async fn update_training_program<S: StateStore>(
  state: &AppState<S>,
  update: TrainingProgramUpdate,
) -> Result<TrainingProgram, String> {
  tracing::info!("Updating training program: {:?}", update);

  state
    .mutate(|snapshot| Ok::<_, String>(snapshot.update_program(update).clone()))
    .await
    .map_err(|e| format!("Failed to save training program: {}", e))?
}
