use serde::{Deserialize, Serialize};

/// Muscle-group category an exercise is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
  Chest,
  Back,
  Shoulders,
  Legs,
  Arms,
  Core,
  Cardio,
  #[serde(rename = "Active Recovery")]
  ActiveRecovery,
}

impl Category {
  /// Timed categories log duration instead of reps and weight
  pub fn is_timed(&self) -> bool {
    matches!(self, Category::Cardio | Category::ActiveRecovery)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Chest => "Chest",
      Category::Back => "Back",
      Category::Shoulders => "Shoulders",
      Category::Legs => "Legs",
      Category::Arms => "Arms",
      Category::Core => "Core",
      Category::Cardio => "Cardio",
      Category::ActiveRecovery => "Active Recovery",
    }
  }
}

impl std::fmt::Display for Category {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
  Bodyweight,
  Dumbbell,
  Barbell,
  Cable,
  Kettlebell,
  Machine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
  Squat,
  Hinge,
  Lunge,
  HorizontalPush,
  HorizontalPull,
  VerticalPush,
  VerticalPull,
  GluteBridge,
  Isolation,
  Carry,
  Core,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryMuscle {
  Quads,
  Glutes,
  Hamstrings,
  Chest,
  Back,
  Shoulders,
  Triceps,
  Biceps,
  Core,
  Calves,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}

/// Planner section an exercise is filed under while a session is logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutSectionType {
  Activation,
  Primary,
  Secondary,
  Accessory,
  Core,
  ConditioningOptional,
  RecoveryNote,
}

// ---------------------------------------------------------------------------
/// Exercise Definition: one catalog entry
// ---------------------------------------------------------------------------

/// Missing fields fall back to the same defaults a freshly created
/// user exercise gets, so partially-populated saved records still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExerciseDefinition {
  pub name: String,
  pub category: Category,
  pub equipment: Equipment,
  pub recommended_sets: u32,
  pub primary_muscles: Vec<PrimaryMuscle>,
  pub movement_pattern: MovementPattern,
  pub is_compound: bool,
  pub default_rep_range: (u32, u32),
  pub default_rest_sec: u32,
  pub difficulty: Difficulty,
}

impl Default for ExerciseDefinition {
  fn default() -> Self {
    Self {
      name: "Exercise".to_string(),
      category: Category::Core,
      equipment: Equipment::Bodyweight,
      recommended_sets: 3,
      primary_muscles: vec![PrimaryMuscle::Core],
      movement_pattern: MovementPattern::Isolation,
      is_compound: false,
      default_rep_range: (8, 12),
      default_rest_sec: 60,
      difficulty: Difficulty::Beginner,
    }
  }
}

impl ExerciseDefinition {
  /// Lowercased name used for every catalog and history lookup
  pub fn key(&self) -> String {
    self.name.to_lowercase()
  }

  pub fn name_matches(&self, name: &str) -> bool {
    self.key() == name.to_lowercase()
  }

  pub fn targets(&self, muscle: PrimaryMuscle) -> bool {
    self.primary_muscles.contains(&muscle)
  }
}

// ---------------------------------------------------------------------------
/// Logged sets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLog {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reps: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub weight: Option<f64>,
  /// Reps in reserve, 0 (failure) to 4
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rir: Option<u8>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration_minutes: Option<u32>,
  #[serde(default)]
  pub is_completed: bool,
}

impl SetLog {
  pub fn loaded(reps: u32, weight: f64) -> Self {
    Self {
      reps: Some(reps),
      weight: Some(weight),
      ..Self::default()
    }
  }

  pub fn timed(duration_minutes: u32) -> Self {
    Self {
      duration_minutes: Some(duration_minutes),
      ..Self::default()
    }
  }

  pub fn completed(mut self) -> Self {
    self.is_completed = true;
    self
  }
}

/// Snapshot of a set from the last time an exercise was logged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousSet {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reps: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub weight: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub duration_minutes: Option<u32>,
}

impl From<&SetLog> for PreviousSet {
  fn from(set: &SetLog) -> Self {
    Self {
      reps: set.reps,
      weight: set.weight,
      duration_minutes: set.duration_minutes,
    }
  }
}

/// Field of a set the user is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SetField {
  Reps,
  Weight,
  Rir,
  DurationMinutes,
}

// ---------------------------------------------------------------------------
/// Exercise: a catalog entry placed into a workout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
  pub id: String,
  #[serde(flatten)]
  pub definition: ExerciseDefinition,
  #[serde(default)]
  pub sets: Vec<SetLog>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub previous_stats: Option<Vec<PreviousSet>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub section_type: Option<WorkoutSectionType>,
}

impl Exercise {
  pub fn name(&self) -> &str {
    &self.definition.name
  }

  pub fn is_timed(&self) -> bool {
    self.definition.category.is_timed()
  }

  /// Best weight across every logged set, 0 when nothing was loaded
  pub fn best_weight(&self) -> f64 {
    self
      .sets
      .iter()
      .map(|s| s.weight.unwrap_or(0.0))
      .fold(0.0, f64::max)
  }

  pub fn best_reps(&self) -> u32 {
    self.sets.iter().filter_map(|s| s.reps).max().unwrap_or(0)
  }

  pub fn total_duration(&self) -> u32 {
    self.sets.iter().filter_map(|s| s.duration_minutes).sum()
  }

  pub fn completed_sets(&self) -> usize {
    self.sets.iter().filter(|s| s.is_completed).count()
  }

  /// Non-zero rep counts in logging order
  pub fn logged_reps(&self) -> Vec<u32> {
    logged_reps(&self.sets)
  }

  /// Update one field of one set, clamping the raw value the way the
  /// logging form does. Out-of-range indices are ignored.
  pub fn set_value(&mut self, set_index: usize, field: SetField, value: Option<f64>) {
    let Some(set) = self.sets.get_mut(set_index) else {
      return;
    };
    let value = value.filter(|v| v.is_finite());
    match field {
      SetField::Reps => set.reps = value.map(|v| v.round().max(0.0) as u32),
      SetField::DurationMinutes => set.duration_minutes = value.map(|v| v.round().max(0.0) as u32),
      SetField::Rir => set.rir = value.map(|v| v.round().clamp(0.0, 4.0) as u8),
      SetField::Weight => set.weight = value.map(|v| (v.max(0.0) * 10.0).round() / 10.0),
    }
  }

  pub fn toggle_set(&mut self, set_index: usize) {
    if let Some(set) = self.sets.get_mut(set_index) {
      set.is_completed = !set.is_completed;
    }
  }

  /// Append a set copying the last one's targets
  pub fn add_set(&mut self) {
    let last = self.sets.last().cloned().unwrap_or_default();
    let next = if self.is_timed() {
      SetLog::timed(last.duration_minutes.unwrap_or(0))
    } else {
      SetLog::loaded(last.reps.unwrap_or(0), last.weight.unwrap_or(0.0))
    };
    self.sets.push(next);
  }

  /// Remove a set, always leaving at least one
  pub fn remove_set(&mut self, set_index: usize) {
    if self.sets.len() > 1 && set_index < self.sets.len() {
      self.sets.remove(set_index);
    }
  }
}

pub fn logged_reps(sets: &[SetLog]) -> Vec<u32> {
  sets
    .iter()
    .map(|s| s.reps.unwrap_or(0))
    .filter(|r| *r > 0)
    .collect()
}
