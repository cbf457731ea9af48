//! Built-in exercise catalog
//!
//! Static reference data for every exercise the planner knows about. User-created
//! exercises merge into the same list; names are unique ignoring case.

use serde::{Deserialize, Serialize};

use crate::models::exercise::{
  Category, Difficulty, Equipment, ExerciseDefinition, MovementPattern, PrimaryMuscle,
};

use Category as C;
use Difficulty as D;
use Equipment as E;
use MovementPattern as M;
use PrimaryMuscle as P;

/// ---------------------------------------------------------------------------
/// Reference Data
/// ---------------------------------------------------------------------------

struct CatalogEntry {
  name: &'static str,
  category: Category,
  equipment: Equipment,
  sets: u32,
  muscles: &'static [PrimaryMuscle],
  pattern: MovementPattern,
  compound: bool,
  reps: (u32, u32),
  rest: u32,
  difficulty: Difficulty,
}

#[allow(clippy::too_many_arguments)]
const fn entry(
  name: &'static str,
  category: Category,
  equipment: Equipment,
  sets: u32,
  muscles: &'static [PrimaryMuscle],
  pattern: MovementPattern,
  compound: bool,
  reps: (u32, u32),
  rest: u32,
  difficulty: Difficulty,
) -> CatalogEntry {
  CatalogEntry {
    name,
    category,
    equipment,
    sets,
    muscles,
    pattern,
    compound,
    reps,
    rest,
    difficulty,
  }
}

#[rustfmt::skip]
const BUILT_IN: &[CatalogEntry] = &[
  // Chest
  entry("Bench Press", C::Chest, E::Barbell, 4, &[P::Chest, P::Triceps], M::HorizontalPush, true, (6, 10), 120, D::Intermediate),
  entry("Incline Dumbbell Press", C::Chest, E::Dumbbell, 3, &[P::Chest, P::Shoulders], M::HorizontalPush, true, (8, 12), 90, D::Beginner),
  entry("Chest Fly", C::Chest, E::Dumbbell, 3, &[P::Chest], M::Isolation, false, (10, 15), 60, D::Beginner),
  entry("Push Ups", C::Chest, E::Bodyweight, 3, &[P::Chest, P::Triceps], M::HorizontalPush, true, (10, 20), 60, D::Beginner),
  entry("Dips", C::Chest, E::Bodyweight, 3, &[P::Chest, P::Triceps], M::VerticalPush, true, (8, 12), 90, D::Intermediate),
  entry("Cable Crossover", C::Chest, E::Cable, 3, &[P::Chest], M::Isolation, false, (12, 15), 60, D::Beginner),
  entry("Pec Deck", C::Chest, E::Machine, 3, &[P::Chest], M::Isolation, false, (10, 15), 60, D::Beginner),
  entry("Decline Press", C::Chest, E::Barbell, 3, &[P::Chest, P::Triceps], M::HorizontalPush, true, (8, 12), 90, D::Intermediate),

  // Back
  entry("Pull Ups", C::Back, E::Bodyweight, 3, &[P::Back, P::Biceps], M::VerticalPull, true, (5, 10), 120, D::Intermediate),
  entry("Chin Ups", C::Back, E::Bodyweight, 3, &[P::Back, P::Biceps], M::VerticalPull, true, (5, 10), 120, D::Intermediate),
  entry("Lat Pulldown", C::Back, E::Machine, 3, &[P::Back, P::Biceps], M::VerticalPull, true, (8, 12), 90, D::Beginner),
  entry("Bent Over Row", C::Back, E::Barbell, 4, &[P::Back, P::Biceps], M::HorizontalPull, true, (6, 10), 120, D::Intermediate),
  entry("Seated Cable Row", C::Back, E::Cable, 3, &[P::Back], M::HorizontalPull, true, (8, 12), 90, D::Beginner),
  entry("Single Arm Dumbbell Row", C::Back, E::Dumbbell, 3, &[P::Back, P::Biceps], M::HorizontalPull, true, (8, 12), 75, D::Beginner),
  entry("T-Bar Row", C::Back, E::Barbell, 3, &[P::Back, P::Biceps], M::HorizontalPull, true, (8, 12), 90, D::Intermediate),
  entry("Deadlift", C::Back, E::Barbell, 3, &[P::Hamstrings, P::Glutes, P::Back], M::Hinge, true, (3, 6), 180, D::Advanced),
  entry("Back Extension", C::Back, E::Bodyweight, 3, &[P::Hamstrings, P::Glutes], M::Hinge, false, (12, 15), 60, D::Beginner),
  entry("Face Pulls", C::Back, E::Cable, 3, &[P::Shoulders, P::Back], M::Isolation, false, (12, 15), 60, D::Beginner),

  // Shoulders
  entry("Overhead Press", C::Shoulders, E::Barbell, 4, &[P::Shoulders, P::Triceps], M::VerticalPush, true, (5, 8), 120, D::Intermediate),
  entry("Arnold Press", C::Shoulders, E::Dumbbell, 3, &[P::Shoulders], M::VerticalPush, true, (8, 12), 90, D::Intermediate),
  entry("Lateral Raise", C::Shoulders, E::Dumbbell, 3, &[P::Shoulders], M::Isolation, false, (12, 20), 45, D::Beginner),
  entry("Front Raise", C::Shoulders, E::Dumbbell, 3, &[P::Shoulders], M::Isolation, false, (10, 15), 45, D::Beginner),
  entry("Rear Delt Fly", C::Shoulders, E::Dumbbell, 3, &[P::Shoulders, P::Back], M::Isolation, false, (12, 20), 45, D::Beginner),
  entry("Upright Row", C::Shoulders, E::Barbell, 3, &[P::Shoulders, P::Back], M::Isolation, false, (10, 15), 60, D::Intermediate),
  entry("Shrugs", C::Shoulders, E::Dumbbell, 3, &[P::Back], M::Isolation, false, (10, 15), 60, D::Beginner),

  // Legs
  entry("Squat", C::Legs, E::Barbell, 4, &[P::Quads, P::Glutes], M::Squat, true, (5, 8), 180, D::Intermediate),
  entry("Leg Press", C::Legs, E::Machine, 3, &[P::Quads, P::Glutes], M::Squat, true, (8, 12), 120, D::Beginner),
  entry("Hack Squat", C::Legs, E::Machine, 3, &[P::Quads, P::Glutes], M::Squat, true, (8, 12), 120, D::Intermediate),
  entry("Goblet Squat", C::Legs, E::Kettlebell, 3, &[P::Quads, P::Glutes], M::Squat, true, (8, 12), 90, D::Beginner),
  entry("Romanian Deadlift", C::Legs, E::Barbell, 3, &[P::Hamstrings, P::Glutes], M::Hinge, true, (6, 10), 120, D::Intermediate),
  entry("Kettlebell Swing", C::Legs, E::Kettlebell, 3, &[P::Glutes, P::Hamstrings], M::Hinge, true, (12, 20), 60, D::Intermediate),
  entry("Lunge", C::Legs, E::Dumbbell, 3, &[P::Quads, P::Glutes], M::Lunge, true, (8, 12), 90, D::Beginner),
  entry("Bulgarian Split Squat", C::Legs, E::Dumbbell, 3, &[P::Quads, P::Glutes], M::Lunge, true, (8, 12), 90, D::Intermediate),
  entry("Hip Thrust", C::Legs, E::Barbell, 4, &[P::Glutes, P::Hamstrings], M::GluteBridge, true, (8, 12), 90, D::Intermediate),
  entry("Glute Bridge", C::Legs, E::Bodyweight, 3, &[P::Glutes], M::GluteBridge, false, (12, 20), 60, D::Beginner),
  entry("Cable Kickback", C::Legs, E::Cable, 3, &[P::Glutes], M::Isolation, false, (12, 15), 45, D::Beginner),
  entry("Leg Curl", C::Legs, E::Machine, 3, &[P::Hamstrings], M::Isolation, false, (10, 15), 60, D::Beginner),
  entry("Leg Extension", C::Legs, E::Machine, 3, &[P::Quads], M::Isolation, false, (10, 15), 60, D::Beginner),
  entry("Calf Raise", C::Legs, E::Machine, 4, &[P::Calves], M::Isolation, false, (12, 20), 45, D::Beginner),

  // Arms
  entry("Bicep Curl", C::Arms, E::Dumbbell, 3, &[P::Biceps], M::Isolation, false, (10, 15), 60, D::Beginner),
  entry("Hammer Curl", C::Arms, E::Dumbbell, 3, &[P::Biceps], M::Isolation, false, (10, 15), 60, D::Beginner),
  entry("Preacher Curl", C::Arms, E::Barbell, 3, &[P::Biceps], M::Isolation, false, (8, 12), 60, D::Beginner),
  entry("Concentration Curl", C::Arms, E::Dumbbell, 3, &[P::Biceps], M::Isolation, false, (10, 15), 45, D::Beginner),
  entry("Tricep Extension", C::Arms, E::Dumbbell, 3, &[P::Triceps], M::Isolation, false, (10, 15), 60, D::Beginner),
  entry("Tricep Pushdown", C::Arms, E::Cable, 3, &[P::Triceps], M::Isolation, false, (12, 15), 60, D::Beginner),
  entry("Skull Crushers", C::Arms, E::Barbell, 3, &[P::Triceps], M::Isolation, false, (8, 12), 75, D::Intermediate),
  entry("Close Grip Bench Press", C::Arms, E::Barbell, 3, &[P::Triceps, P::Chest], M::HorizontalPush, true, (6, 10), 90, D::Intermediate),

  // Core
  entry("Plank", C::Core, E::Bodyweight, 3, &[P::Core], M::Core, false, (1, 2), 45, D::Beginner),
  entry("Hanging Leg Raise", C::Core, E::Bodyweight, 3, &[P::Core], M::Core, false, (8, 15), 60, D::Intermediate),
  entry("Crunch", C::Core, E::Bodyweight, 3, &[P::Core], M::Core, false, (15, 25), 45, D::Beginner),
  entry("Russian Twist", C::Core, E::Bodyweight, 3, &[P::Core], M::Core, false, (15, 25), 45, D::Beginner),
  entry("Dead Bug", C::Core, E::Bodyweight, 3, &[P::Core], M::Core, false, (10, 15), 45, D::Beginner),
  entry("Mountain Climbers", C::Core, E::Bodyweight, 3, &[P::Core], M::Core, false, (20, 40), 45, D::Beginner),
  entry("Ab Wheel Rollout", C::Core, E::Bodyweight, 3, &[P::Core], M::Core, false, (8, 12), 60, D::Intermediate),
  entry("Woodchopper", C::Core, E::Cable, 3, &[P::Core], M::Core, false, (12, 15), 45, D::Beginner),
  entry("Farmer Carry", C::Core, E::Dumbbell, 3, &[P::Core, P::Back], M::Carry, true, (1, 2), 90, D::Beginner),
  entry("Suitcase Carry", C::Core, E::Kettlebell, 3, &[P::Core], M::Carry, false, (1, 2), 60, D::Beginner),

  // Cardio
  entry("Running", C::Cardio, E::Bodyweight, 1, &[P::Quads, P::Calves], M::Isolation, false, (1, 1), 0, D::Beginner),
  entry("Cycling", C::Cardio, E::Machine, 1, &[P::Quads], M::Isolation, false, (1, 1), 0, D::Beginner),
  entry("Swimming", C::Cardio, E::Bodyweight, 1, &[P::Back, P::Shoulders], M::Isolation, false, (1, 1), 0, D::Beginner),
  entry("Walking", C::Cardio, E::Bodyweight, 1, &[P::Calves], M::Isolation, false, (1, 1), 0, D::Beginner),
  entry("Elliptical", C::Cardio, E::Machine, 1, &[P::Quads], M::Isolation, false, (1, 1), 0, D::Beginner),
  entry("Rowing Machine", C::Cardio, E::Machine, 1, &[P::Back], M::Isolation, false, (1, 1), 0, D::Beginner),
  entry("Jump Rope", C::Cardio, E::Bodyweight, 1, &[P::Calves], M::Isolation, false, (1, 1), 0, D::Beginner),
  entry("Stair Climber", C::Cardio, E::Machine, 1, &[P::Quads, P::Calves], M::Isolation, false, (1, 1), 0, D::Beginner),
  entry("Assault Bike", C::Cardio, E::Machine, 1, &[P::Quads], M::Isolation, false, (1, 1), 0, D::Intermediate),

  // Active Recovery
  entry("Yoga", C::ActiveRecovery, E::Bodyweight, 1, &[P::Core], M::Isolation, false, (1, 1), 0, D::Beginner),
  entry("Stretching", C::ActiveRecovery, E::Bodyweight, 1, &[P::Core], M::Isolation, false, (1, 1), 0, D::Beginner),
  entry("Foam Rolling", C::ActiveRecovery, E::Bodyweight, 1, &[P::Core], M::Isolation, false, (1, 1), 0, D::Beginner),
  entry("Pilates", C::ActiveRecovery, E::Bodyweight, 1, &[P::Core], M::Core, false, (1, 1), 0, D::Beginner),
  entry("Mobility Flow", C::ActiveRecovery, E::Bodyweight, 1, &[P::Core], M::Isolation, false, (1, 1), 0, D::Beginner),
];

/// Alphabetical ordering used wherever exercise names tie-break a sort
pub fn compare_names(a: &str, b: &str) -> std::cmp::Ordering {
  a.to_lowercase()
    .cmp(&b.to_lowercase())
    .then_with(|| a.cmp(b))
}

impl From<&CatalogEntry> for ExerciseDefinition {
  fn from(e: &CatalogEntry) -> Self {
    Self {
      name: e.name.to_string(),
      category: e.category,
      equipment: e.equipment,
      recommended_sets: e.sets,
      primary_muscles: e.muscles.to_vec(),
      movement_pattern: e.pattern,
      is_compound: e.compound,
      default_rep_range: e.reps,
      default_rest_sec: e.rest,
      difficulty: e.difficulty,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Exercise Catalog
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseCatalog {
  exercises: Vec<ExerciseDefinition>,
}

impl ExerciseCatalog {
  /// Catalog holding only the built-in exercises
  pub fn built_in() -> Self {
    Self {
      exercises: BUILT_IN.iter().map(ExerciseDefinition::from).collect(),
    }
  }

  /// Build from arbitrary definitions, keeping the first of any case-insensitive duplicate
  pub fn from_definitions(definitions: impl IntoIterator<Item = ExerciseDefinition>) -> Self {
    let mut catalog = Self::default();
    catalog.merge(definitions);
    catalog
  }

  /// Built-ins first, then user exercises whose names are not already taken
  pub fn with_user_exercises(user: impl IntoIterator<Item = ExerciseDefinition>) -> Self {
    let mut catalog = Self::built_in();
    catalog.merge(user);
    catalog
  }

  /// Add every definition whose name is new; returns how many were added
  pub fn merge(&mut self, definitions: impl IntoIterator<Item = ExerciseDefinition>) -> usize {
    definitions
      .into_iter()
      .filter(|def| self.add(def.clone()))
      .count()
  }

  /// Add a single definition unless the name already exists
  pub fn add(&mut self, definition: ExerciseDefinition) -> bool {
    if definition.name.trim().is_empty() || self.contains(&definition.name) {
      return false;
    }
    self.exercises.push(definition);
    true
  }

  pub fn contains(&self, name: &str) -> bool {
    self.find(name).is_some()
  }

  pub fn find(&self, name: &str) -> Option<&ExerciseDefinition> {
    self.exercises.iter().find(|e| e.name_matches(name))
  }

  pub fn into_definitions(self) -> Vec<ExerciseDefinition> {
    self.exercises
  }

  pub fn as_slice(&self) -> &[ExerciseDefinition] {
    &self.exercises
  }

  pub fn iter(&self) -> std::slice::Iter<'_, ExerciseDefinition> {
    self.exercises.iter()
  }

  pub fn len(&self) -> usize {
    self.exercises.len()
  }

  pub fn is_empty(&self) -> bool {
    self.exercises.is_empty()
  }

  /// Exercises for one movement pattern, alphabetical
  pub fn by_pattern(&self, pattern: MovementPattern) -> Vec<&ExerciseDefinition> {
    let mut matches: Vec<&ExerciseDefinition> = self
      .exercises
      .iter()
      .filter(|e| e.movement_pattern == pattern)
      .collect();
    matches.sort_by(|a, b| compare_names(&a.name, &b.name));
    matches
  }

  /// Definitions not part of the built-in set, i.e. what the user created
  pub fn user_exercises(&self) -> Vec<ExerciseDefinition> {
    self
      .exercises
      .iter()
      .filter(|e| !BUILT_IN.iter().any(|b| e.name_matches(b.name)))
      .cloned()
      .collect()
  }

  /// Autocomplete: names or categories containing the typed text
  pub fn search(&self, text: &str, limit: usize) -> Vec<&ExerciseDefinition> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
      return Vec::new();
    }
    self
      .exercises
      .iter()
      .filter(|e| e.key().contains(&needle) || e.category.as_str().to_lowercase().contains(&needle))
      .take(limit)
      .collect()
  }
}

impl<'a> IntoIterator for &'a ExerciseCatalog {
  type Item = &'a ExerciseDefinition;
  type IntoIter = std::slice::Iter<'a, ExerciseDefinition>;

  fn into_iter(self) -> Self::IntoIter {
    self.exercises.iter()
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
