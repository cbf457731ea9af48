use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::exercise::{Category, Exercise, WorkoutSectionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutBlockType {
  Warmup,
  SkillPower,
  Compound,
  Accessory,
  Cooldown,
}

/// Timed phase of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutBlock {
  #[serde(rename = "type")]
  pub block_type: WorkoutBlockType,
  pub title: String,
  pub duration_min: u32,
  pub target_categories: Vec<Category>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub recommended_rest_seconds: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
  pub id: String,
  pub name: String,
  pub date: DateTime<Utc>,
  #[serde(default)]
  pub exercises: Vec<Exercise>,
  #[serde(default)]
  pub completed: bool,
  /// Plan the session was started under, kept even if the program changes later
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub blocks: Option<Vec<WorkoutBlock>>,
}

impl Workout {
  /// Calendar day of the session in the user's timezone
  pub fn local_day(&self) -> NaiveDate {
    self.date.with_timezone(&Local).date_naive()
  }

  pub fn has_exercise(&self, name: &str) -> bool {
    self.find_exercise(name).is_some()
  }

  /// Case-insensitive lookup by exercise name
  pub fn find_exercise(&self, name: &str) -> Option<&Exercise> {
    self
      .exercises
      .iter()
      .find(|e| e.definition.name_matches(name))
  }

  pub fn exercise_mut(&mut self, exercise_id: &str) -> Option<&mut Exercise> {
    self.exercises.iter_mut().find(|e| e.id == exercise_id)
  }

  pub fn has_any_completed_set(&self) -> bool {
    self
      .exercises
      .iter()
      .any(|ex| ex.sets.iter().any(|s| s.is_completed))
  }

  /// Pin an exercise to a planner section regardless of what would be inferred
  pub fn set_section_override(&mut self, exercise_id: &str, section: WorkoutSectionType) -> bool {
    match self.exercise_mut(exercise_id) {
      Some(exercise) => {
        exercise.section_type = Some(section);
        true
      }
      None => false,
    }
  }

  /// Shift an exercise one slot up (-1) or down (+1). Moves past either end
  /// are ignored; returns false when the exercise isn't in this workout.
  pub fn move_exercise(&mut self, exercise_id: &str, direction: isize) -> bool {
    let Some(idx) = self.exercises.iter().position(|e| e.id == exercise_id) else {
      return false;
    };
    let target = idx as isize + direction;
    if target >= 0 && (target as usize) < self.exercises.len() {
      let item = self.exercises.remove(idx);
      self.exercises.insert(target as usize, item);
    }
    true
  }
}

/// Completed workouts, newest first
pub fn completed_newest_first(workouts: &[Workout]) -> Vec<&Workout> {
  let mut history: Vec<&Workout> = workouts.iter().filter(|w| w.completed).collect();
  history.sort_by(|a, b| b.date.cmp(&a.date));
  history
}
