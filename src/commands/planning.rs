//! Commands for recommendations, progression and coaching

use serde::Serialize;

use crate::analysis::{coaching_prompts, progress_notes, ProgressNotes};
use crate::blocks::{goal_exercise_plan, goal_prescription, group_by_section, GoalExercisePlan, GoalPrescription};
use crate::commands::today;
use crate::db::{AppState, StateStore};
use crate::models::{ExerciseDefinition, WorkoutBlockType};
use crate::progression::{
  build_exercise_progress, get_progression_suggestion as suggest_progression, ProgressionSuggestion,
};
use crate::recommend::{planner_suggestions, recommendations, DayPlan, PlannerSuggestions};

/// Today's plan with the goal hints the planner shows alongside it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOverview {
  pub plan: DayPlan,
  pub prescription: GoalPrescription,
  pub exercise_plan: GoalExercisePlan,
}

pub async fn get_day_overview<S: StateStore>(state: &AppState<S>) -> Result<DayOverview, String> {
  let snapshot = state.snapshot.lock().await;
  let goal = snapshot.training_program.goal;
  let plan = DayPlan::for_day(&snapshot.training_program, today());

  Ok(DayOverview {
    prescription: goal_prescription(goal, plan.is_recovery_day),
    exercise_plan: goal_exercise_plan(goal),
    plan,
  })
}

/// Suggestions for the active session, optionally narrowed to one phase
pub async fn get_recommendations<S: StateStore>(
  state: &AppState<S>,
  block: Option<WorkoutBlockType>,
) -> Result<Vec<ExerciseDefinition>, String> {
  let snapshot = state.snapshot.lock().await;
  let plan = DayPlan::for_day(&snapshot.training_program, today());

  tracing::debug!("Recommending for {} ({:?})", plan.label, block);

  Ok(recommendations(
    &snapshot.available_exercises,
    &plan,
    block,
    snapshot.active_workout(),
    &snapshot.workouts,
  ))
}

/// Compound, isolate and finisher candidates for today's split
pub async fn get_planner_suggestions<S: StateStore>(state: &AppState<S>) -> Result<PlannerSuggestions, String> {
  let snapshot = state.snapshot.lock().await;
  let plan = DayPlan::for_day(&snapshot.training_program, today());
  Ok(planner_suggestions(&snapshot.available_exercises, &plan.split_focus))
}

/// Load advice for one exercise of the active workout
pub async fn get_progression_suggestion<S: StateStore>(
  state: &AppState<S>,
  exercise_id: String,
) -> Result<ProgressionSuggestion, String> {
  let snapshot = state.snapshot.lock().await;
  let workout = snapshot
    .active_workout()
    .ok_or_else(|| "No workout in progress".to_string())?;
  let exercise = workout
    .exercises
    .iter()
    .find(|e| e.id == exercise_id)
    .ok_or_else(|| format!("Exercise {} not found in the active workout", exercise_id))?;

  let progress = build_exercise_progress(exercise.name(), &snapshot.workouts);
  Ok(suggest_progression(
    &exercise.definition,
    &exercise.sets,
    progress.as_ref(),
  ))
}

pub async fn get_coaching_prompts<S: StateStore>(state: &AppState<S>) -> Result<Vec<String>, String> {
  let snapshot = state.snapshot.lock().await;
  Ok(coaching_prompts(
    snapshot.active_workout(),
    &snapshot.workouts,
    snapshot.training_program.emphasis,
  ))
}

pub async fn get_progress_notes<S: StateStore>(state: &AppState<S>) -> Result<Vec<ProgressNotes>, String> {
  let snapshot = state.snapshot.lock().await;
  Ok(progress_notes(&snapshot.workouts))
}

/// Active workout grouped under today's sections
pub async fn get_workout_sections<S: StateStore>(
  state: &AppState<S>,
  show_conditioning: bool,
) -> Result<serde_json::Value, String> {
  let snapshot = state.snapshot.lock().await;
  let workout = snapshot
    .active_workout()
    .ok_or_else(|| "No workout in progress".to_string())?;
  let day_type = DayPlan::for_day(&snapshot.training_program, today()).day_type;

  serde_json::to_value(group_by_section(workout, day_type, show_conditioning))
    .map_err(|e| format!("Failed to serialize sections: {}", e))
}
