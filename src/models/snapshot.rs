use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::exercise::{Exercise, ExerciseDefinition, SetField, SetLog, WorkoutSectionType};
use super::program::{DayType, TrainingProgram, TrainingProgramUpdate};
use super::workout::{completed_newest_first, Workout, WorkoutBlock};
use crate::analysis::find_previous_stats;
use crate::catalog::ExerciseCatalog;
use crate::recommend::infer_section_type;

/// Minutes prefilled on a fresh timed set
const DEFAULT_TIMED_MINUTES: u32 = 10;
/// Reps prefilled when a previous set recorded none
const DEFAULT_REPS: u32 = 10;

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
  #[error("A workout is already in progress")]
  WorkoutInProgress,

  #[error("No workout in progress")]
  NoActiveWorkout,

  #[error("{0} is already in this workout")]
  DuplicateExercise(String),

  #[error("Exercise {0} not found in the active workout")]
  ExerciseNotFound(String),
}

// ---------------------------------------------------------------------------
/// App Snapshot: everything persisted between launches
// ---------------------------------------------------------------------------

/// The whole client state as one serializable value. Loaded from and
/// saved to the state store in a single blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSnapshot {
  pub workouts: Vec<Workout>,
  pub available_exercises: ExerciseCatalog,
  pub training_program: TrainingProgram,
}

impl Default for AppSnapshot {
  fn default() -> Self {
    Self {
      workouts: Vec::new(),
      available_exercises: ExerciseCatalog::built_in(),
      training_program: TrainingProgram::default(),
    }
  }
}

impl AppSnapshot {
  /// Completed workouts, newest first
  pub fn history(&self) -> Vec<&Workout> {
    completed_newest_first(&self.workouts)
  }

  pub fn active_workout(&self) -> Option<&Workout> {
    self.workouts.iter().rev().find(|w| !w.completed)
  }

  pub fn active_workout_mut(&mut self) -> Option<&mut Workout> {
    self.workouts.iter_mut().rev().find(|w| !w.completed)
  }

  pub fn update_program(&mut self, update: TrainingProgramUpdate) -> &TrainingProgram {
    self.training_program.apply(update);
    &self.training_program
  }

  /// Rebuild the catalog as built-ins followed by whatever the user added
  pub fn merge_catalog(&mut self) {
    let stored = std::mem::take(&mut self.available_exercises).into_definitions();
    self.available_exercises = ExerciseCatalog::with_user_exercises(stored);
  }

  /// Close every open workout from an earlier local day. Returns how many were closed.
  pub fn auto_complete_stale(&mut self, today: NaiveDate) -> usize {
    let mut closed = 0;
    for workout in self.workouts.iter_mut().filter(|w| !w.completed) {
      if workout.local_day() != today {
        workout.completed = true;
        closed += 1;
      }
    }
    if closed > 0 {
      tracing::info!("Auto-completed {} workout(s) left open from a previous day", closed);
    }
    closed
  }

  /// Open a new session with its phase plan frozen and the planned
  /// exercises prefilled from their catalog targets.
  pub fn start_workout(
    &mut self,
    name: &str,
    blocks: Vec<WorkoutBlock>,
    planned: &[ExerciseDefinition],
    now: DateTime<Utc>,
  ) -> Result<&Workout, SessionError> {
    if self.active_workout().is_some() {
      return Err(SessionError::WorkoutInProgress);
    }

    let stamp = now.timestamp_millis();
    let exercises = planned
      .iter()
      .enumerate()
      .map(|(idx, def)| self.planned_exercise(def, format!("{}-{}", stamp, idx)))
      .collect();

    self.workouts.push(Workout {
      id: stamp.to_string(),
      name: name.to_string(),
      date: now,
      exercises,
      completed: false,
      blocks: (!blocks.is_empty()).then_some(blocks),
    });

    tracing::debug!("Started workout {} with {} planned exercises", name, planned.len());
    self.active_workout().ok_or(SessionError::NoActiveWorkout)
  }

  fn planned_exercise(&self, definition: &ExerciseDefinition, id: String) -> Exercise {
    let count = definition.recommended_sets.max(1) as usize;
    let template = if definition.category.is_timed() {
      SetLog::timed(DEFAULT_TIMED_MINUTES)
    } else {
      SetLog::loaded(definition.default_rep_range.1, 0.0)
    };
    Exercise {
      id,
      definition: definition.clone(),
      sets: vec![template; count],
      previous_stats: find_previous_stats(&self.workouts, &definition.name),
      section_type: None,
    }
  }

  /// Add an exercise to the active workout. Unknown names join the
  /// catalog; known names use the catalog's definition.
  pub fn add_exercise(
    &mut self,
    candidate: ExerciseDefinition,
    day_type: DayType,
    now: DateTime<Utc>,
  ) -> Result<&Exercise, SessionError> {
    let active = self.active_workout().ok_or(SessionError::NoActiveWorkout)?;
    if active.has_exercise(&candidate.name) {
      return Err(SessionError::DuplicateExercise(candidate.name));
    }
    let id = format!("{}-{}", now.timestamp_millis(), active.exercises.len());

    let definition = match self.available_exercises.find(&candidate.name) {
      Some(existing) => existing.clone(),
      None => {
        tracing::info!("Adding {} to the exercise catalog", candidate.name);
        self.available_exercises.add(candidate.clone());
        candidate
      }
    };

    let previous = find_previous_stats(&self.workouts, &definition.name);
    let sets = match &previous {
      Some(stats) if !stats.is_empty() => prefill_from_previous(&definition, stats),
      _ => {
        let count = if definition.recommended_sets > 0 {
          definition.recommended_sets
        } else if definition.category.is_timed() {
          1
        } else {
          3
        };
        let template = if definition.category.is_timed() {
          SetLog::timed(DEFAULT_TIMED_MINUTES)
        } else {
          SetLog::loaded(definition.default_rep_range.1, 0.0)
        };
        vec![template; count as usize]
      }
    };

    let exercise = Exercise {
      id,
      section_type: Some(infer_section_type(&definition, day_type)),
      definition,
      sets,
      previous_stats: previous,
    };

    let workout = self
      .active_workout_mut()
      .ok_or(SessionError::NoActiveWorkout)?;
    workout.exercises.push(exercise);
    workout.exercises.last().ok_or(SessionError::NoActiveWorkout)
  }

  /// Mark the active workout as completed
  pub fn finish_workout(&mut self) -> Result<&Workout, SessionError> {
    let workout = self
      .active_workout_mut()
      .ok_or(SessionError::NoActiveWorkout)?;
    workout.completed = true;
    tracing::info!("Finished workout {} ({} exercises)", workout.name, workout.exercises.len());
    Ok(&*workout)
  }

  pub fn set_section_override(
    &mut self,
    exercise_id: &str,
    section: WorkoutSectionType,
  ) -> Result<(), SessionError> {
    let workout = self
      .active_workout_mut()
      .ok_or(SessionError::NoActiveWorkout)?;
    if workout.set_section_override(exercise_id, section) {
      Ok(())
    } else {
      Err(SessionError::ExerciseNotFound(exercise_id.to_string()))
    }
  }

  pub fn update_set(
    &mut self,
    exercise_id: &str,
    set_index: usize,
    field: SetField,
    value: Option<f64>,
  ) -> Result<(), SessionError> {
    let workout = self
      .active_workout_mut()
      .ok_or(SessionError::NoActiveWorkout)?;
    let exercise = workout
      .exercise_mut(exercise_id)
      .ok_or_else(|| SessionError::ExerciseNotFound(exercise_id.to_string()))?;
    exercise.set_value(set_index, field, value);
    Ok(())
  }

  pub fn toggle_set(&mut self, exercise_id: &str, set_index: usize) -> Result<(), SessionError> {
    let workout = self
      .active_workout_mut()
      .ok_or(SessionError::NoActiveWorkout)?;
    let exercise = workout
      .exercise_mut(exercise_id)
      .ok_or_else(|| SessionError::ExerciseNotFound(exercise_id.to_string()))?;
    exercise.toggle_set(set_index);
    Ok(())
  }

  pub fn move_exercise(&mut self, exercise_id: &str, direction: isize) -> Result<(), SessionError> {
    let workout = self
      .active_workout_mut()
      .ok_or(SessionError::NoActiveWorkout)?;
    if workout.move_exercise(exercise_id, direction) {
      Ok(())
    } else {
      Err(SessionError::ExerciseNotFound(exercise_id.to_string()))
    }
  }

  pub fn add_set(&mut self, exercise_id: &str) -> Result<(), SessionError> {
    let workout = self
      .active_workout_mut()
      .ok_or(SessionError::NoActiveWorkout)?;
    let exercise = workout
      .exercise_mut(exercise_id)
      .ok_or_else(|| SessionError::ExerciseNotFound(exercise_id.to_string()))?;
    exercise.add_set();
    Ok(())
  }

  pub fn remove_set(&mut self, exercise_id: &str, set_index: usize) -> Result<(), SessionError> {
    let workout = self
      .active_workout_mut()
      .ok_or(SessionError::NoActiveWorkout)?;
    let exercise = workout
      .exercise_mut(exercise_id)
      .ok_or_else(|| SessionError::ExerciseNotFound(exercise_id.to_string()))?;
    exercise.remove_set(set_index);
    Ok(())
  }
}

/// Timed work copies each previous duration; loaded work repeats the
/// previous reps at the heaviest weight used last time.
fn prefill_from_previous(
  definition: &ExerciseDefinition,
  stats: &[super::exercise::PreviousSet],
) -> Vec<SetLog> {
  if definition.category.is_timed() {
    return stats
      .iter()
      .map(|s| SetLog::timed(s.duration_minutes.unwrap_or(DEFAULT_TIMED_MINUTES)))
      .collect();
  }

  let top_weight = stats
    .iter()
    .map(|s| s.weight.unwrap_or(0.0))
    .fold(0.0, f64::max);
  stats
    .iter()
    .map(|s| SetLog::loaded(s.reps.unwrap_or(DEFAULT_REPS), top_weight))
    .collect()
}
