use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::exercise::{MovementPattern, PrimaryMuscle};

/// Calendar order used by every weekly view, Monday first
pub const WEEK_DAYS: [Weekday; 7] = [
  Weekday::Mon,
  Weekday::Tue,
  Weekday::Wed,
  Weekday::Thu,
  Weekday::Fri,
  Weekday::Sat,
  Weekday::Sun,
];

pub const DAY_LABELS: [&str; 7] = [
  "Monday",
  "Tuesday",
  "Wednesday",
  "Thursday",
  "Friday",
  "Saturday",
  "Sunday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingGoal {
  Hypertrophy,
  Strength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
  Balanced,
  #[serde(alias = "glutes_legs_3x")]
  GlutesLegs,
  UpperBody,
  PushBias,
  PullBias,
  /// Anything the settings screen no longer offers; planned as balanced
  #[serde(other)]
  Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditioningPreference {
  #[serde(rename = "none")]
  None,
  #[serde(rename = "1_day")]
  OneDay,
  #[serde(rename = "2_days")]
  TwoDays,
}

impl ConditioningPreference {
  /// Number of conditioning days to splice into the week
  pub fn days(&self) -> usize {
    match self {
      ConditioningPreference::None => 0,
      ConditioningPreference::OneDay => 1,
      ConditioningPreference::TwoDays => 2,
    }
  }
}

// ---------------------------------------------------------------------------
/// Training Program: the single active set of planning preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingProgram {
  pub goal: TrainingGoal,
  /// Expected to be 3-6; other values plan the generic five-day split
  pub days_per_week: u8,
  pub emphasis: Emphasis,
  pub session_length_min: u32,
  pub conditioning_preference: ConditioningPreference,
}

impl Default for TrainingProgram {
  fn default() -> Self {
    Self {
      goal: TrainingGoal::Hypertrophy,
      days_per_week: 4,
      emphasis: Emphasis::Balanced,
      session_length_min: 60,
      conditioning_preference: ConditioningPreference::None,
    }
  }
}

/// Partial settings update, applied field by field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingProgramUpdate {
  pub goal: Option<TrainingGoal>,
  pub days_per_week: Option<u8>,
  pub emphasis: Option<Emphasis>,
  pub session_length_min: Option<u32>,
  pub conditioning_preference: Option<ConditioningPreference>,
}

impl TrainingProgram {
  pub fn apply(&mut self, update: TrainingProgramUpdate) {
    if let Some(goal) = update.goal {
      self.goal = goal;
    }
    if let Some(days) = update.days_per_week {
      self.days_per_week = days;
    }
    if let Some(emphasis) = update.emphasis {
      self.emphasis = emphasis;
    }
    if let Some(length) = update.session_length_min {
      self.session_length_min = length;
    }
    if let Some(pref) = update.conditioning_preference {
      self.conditioning_preference = pref;
    }
  }
}

// ---------------------------------------------------------------------------
/// Generated Week: one scheduled training day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWeek {
  pub day: Weekday,
  pub label: String,
  pub focus_muscles: Vec<PrimaryMuscle>,
  /// Index 0 is planned first
  pub movement_priority: Vec<MovementPattern>,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub is_conditioning: bool,
}

impl GeneratedWeek {
  /// Position in the Monday-first week
  pub fn day_index(&self) -> usize {
    self.day.num_days_from_monday() as usize
  }

  /// Lift day whose label marks it as a heavy lower-body session
  pub fn is_heavy_lower(&self) -> bool {
    if self.is_conditioning {
      return false;
    }
    let label = self.label.to_lowercase();
    label.contains("lower") || label.contains("legs")
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
  Lift,
  Conditioning,
  Rest,
}

/// One calendar day of the full seven-day view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDay {
  pub day_index: usize,
  pub label: String,
  #[serde(rename = "type")]
  pub day_type: DayType,
  pub focus: String,
}
