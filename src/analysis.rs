//! History analysis layer
//!
//! Deterministic reads over logged workouts: recent-usage signals for the
//! recommender, previous performance for prefilling sets, per-workout
//! progress notes and the short coaching prompts shown during a session.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::exercise::PreviousSet;
use crate::models::program::Emphasis;
use crate::models::workout::{completed_newest_first, Workout};
use crate::progression::{
  build_exercise_progress, estimate_weekly_glute_sets, get_progression_suggestion, GLUTE_SET_TARGET,
};

/// Completed workouts considered when scoring novelty and frequency
pub const RECENT_WINDOW: usize = 10;

/// Most prompts shown at once
const MAX_COACHING_PROMPTS: usize = 2;
/// Most notes kept per workout
const MAX_NOTES_PER_WORKOUT: usize = 2;

/// ---------------------------------------------------------------------------
/// Recent History
/// ---------------------------------------------------------------------------

/// Usage of each exercise across the last few completed workouts, keyed by
/// lowercased name.
#[derive(Debug, Clone, Default)]
pub struct RecentHistory {
  frequency: HashMap<String, usize>,
  latest_index: HashMap<String, usize>,
}

impl RecentHistory {
  pub fn from_workouts(workouts: &[Workout]) -> Self {
    let mut history = Self::default();
    let recent = completed_newest_first(workouts);

    for (index, workout) in recent.into_iter().take(RECENT_WINDOW).enumerate() {
      for exercise in &workout.exercises {
        let key = exercise.definition.key();
        *history.frequency.entry(key.clone()).or_insert(0) += 1;
        history.latest_index.entry(key).or_insert(index);
      }
    }
    history
  }

  /// Appearances in the window
  pub fn frequency(&self, name: &str) -> usize {
    self.frequency.get(&name.to_lowercase()).copied().unwrap_or(0)
  }

  /// 0 for the newest workout in the window, None if unused
  pub fn latest_index(&self, name: &str) -> Option<usize> {
    self.latest_index.get(&name.to_lowercase()).copied()
  }
}

/// ---------------------------------------------------------------------------
/// Previous Performance
/// ---------------------------------------------------------------------------

/// Sets logged for an exercise the last time it appeared in a completed workout
pub fn find_previous_stats(workouts: &[Workout], exercise_name: &str) -> Option<Vec<PreviousSet>> {
  completed_newest_first(workouts)
    .into_iter()
    .find_map(|w| w.find_exercise(exercise_name))
    .map(|ex| ex.sets.iter().map(PreviousSet::from).collect())
}

/// ---------------------------------------------------------------------------
/// Progress Notes
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressNotes {
  pub workout_id: String,
  pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct ExerciseMetrics {
  best_weight: f64,
  best_reps: u32,
  total_duration: u32,
}

/// Compare every exercise against its previous appearance and note the
/// first improvement found: load, then reps, then duration. Workouts are
/// returned oldest first; those with no completed set are skipped.
pub fn progress_notes(workouts: &[Workout]) -> Vec<ProgressNotes> {
  let mut completed: Vec<&Workout> = workouts
    .iter()
    .filter(|w| w.completed && w.has_any_completed_set())
    .collect();
  completed.sort_by(|a, b| a.date.cmp(&b.date));

  let mut latest: HashMap<String, ExerciseMetrics> = HashMap::new();

  completed
    .into_iter()
    .map(|workout| {
      let mut notes = Vec::new();

      for exercise in &workout.exercises {
        let current = ExerciseMetrics {
          best_weight: exercise.best_weight(),
          best_reps: exercise.best_reps(),
          total_duration: exercise.total_duration(),
        };

        if let Some(previous) = latest.get(&exercise.definition.key()) {
          if current.best_weight > previous.best_weight {
            notes.push(format!(
              "{} +{:.1} lb",
              exercise.name(),
              current.best_weight - previous.best_weight
            ));
          } else if current.best_reps > previous.best_reps {
            notes.push(format!("{} +{} reps", exercise.name(), current.best_reps - previous.best_reps));
          } else if current.total_duration > previous.total_duration {
            notes.push(format!(
              "{} +{} min",
              exercise.name(),
              current.total_duration - previous.total_duration
            ));
          }
        }

        latest.insert(exercise.definition.key(), current);
      }

      notes.truncate(MAX_NOTES_PER_WORKOUT);
      ProgressNotes {
        workout_id: workout.id.clone(),
        notes,
      }
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Coaching Prompts
/// ---------------------------------------------------------------------------

/// Short nudges for the session in progress; empty without one
pub fn coaching_prompts(active: Option<&Workout>, workouts: &[Workout], emphasis: Emphasis) -> Vec<String> {
  let Some(active) = active else {
    return Vec::new();
  };
  let mut prompts = Vec::new();

  let lower_sessions = workouts
    .iter()
    .filter(|w| w.completed && is_lower_label(&w.name))
    .count();
  if lower_sessions >= 2 {
    prompts.push("You've trained legs twice this week. Next session: recovery focus.".to_string());
  }

  if emphasis == Emphasis::GlutesLegs {
    prompts.push(format!(
      "Glute volume this week: {} sets (target {}–{})",
      estimate_weekly_glute_sets(workouts),
      GLUTE_SET_TARGET.0,
      GLUTE_SET_TARGET.1
    ));
  }

  if let Some(first) = active.exercises.first() {
    let progress = build_exercise_progress(first.name(), workouts);
    let suggestion = get_progression_suggestion(&first.definition, &first.sets, progress.as_ref());
    if let Some(message) = suggestion.message {
      prompts.push(message);
    }
    if suggestion.deload {
      prompts.push("Deload recommended next week.".to_string());
    }
  }

  prompts.truncate(MAX_COACHING_PROMPTS);
  prompts
}

/// Labels and workout names that mark lower-body sessions
pub fn is_lower_label(label: &str) -> bool {
  let label = label.to_lowercase();
  label.contains("lower") || label.contains("legs")
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
