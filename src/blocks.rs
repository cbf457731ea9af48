//! Session layout
//!
//! Timed phases for a session, the planner sections exercises are grouped
//! under while logging, and the goal-based prescription hints.

use serde::Serialize;

use crate::models::exercise::{Category, Exercise, WorkoutSectionType};
use crate::models::program::{DayType, TrainingGoal};
use crate::models::workout::{Workout, WorkoutBlock, WorkoutBlockType};
use crate::recommend::resolve_section_type;

/// Session length every base duration is written against
const BASE_SESSION_MIN: f64 = 60.0;
const MIN_BLOCK_MIN: u32 = 5;

/// ---------------------------------------------------------------------------
/// Session Blocks
/// ---------------------------------------------------------------------------

/// Warm-up, compound, accessory and cool-down phases, scaled to the session length
pub fn build_session_blocks(goal: TrainingGoal, session_length_min: u32) -> Vec<WorkoutBlock> {
  let compound_rest = match goal {
    TrainingGoal::Strength => 150,
    TrainingGoal::Hypertrophy => 90,
  };

  let base = [
    WorkoutBlock {
      block_type: WorkoutBlockType::Warmup,
      title: "Warm".to_string(),
      duration_min: 8,
      target_categories: vec![Category::Cardio, Category::ActiveRecovery],
      recommended_rest_seconds: None,
      notes: Some("Light cardio + dynamic mobility".to_string()),
    },
    WorkoutBlock {
      block_type: WorkoutBlockType::Compound,
      title: "Compound".to_string(),
      duration_min: 25,
      target_categories: vec![Category::Chest, Category::Back, Category::Legs, Category::Shoulders],
      recommended_rest_seconds: Some(compound_rest),
      notes: None,
    },
    WorkoutBlock {
      block_type: WorkoutBlockType::Accessory,
      title: "Isolate".to_string(),
      duration_min: 17,
      target_categories: vec![Category::Arms, Category::Core, Category::Shoulders, Category::Legs],
      recommended_rest_seconds: Some(75),
      notes: None,
    },
    WorkoutBlock {
      block_type: WorkoutBlockType::Cooldown,
      title: "Cool".to_string(),
      duration_min: 8,
      target_categories: vec![Category::ActiveRecovery, Category::Core],
      recommended_rest_seconds: None,
      notes: Some("Static stretching + down regulation".to_string()),
    },
  ];

  let scaling = session_length_min as f64 / BASE_SESSION_MIN;
  base
    .into_iter()
    .map(|block| WorkoutBlock {
      duration_min: scale_duration(block.duration_min, scaling),
      ..block
    })
    .collect()
}

fn scale_duration(base_min: u32, scaling: f64) -> u32 {
  let scaled = (base_min as f64 * scaling).round() as u32;
  scaled.max(MIN_BLOCK_MIN)
}

/// Blocks to display for a workout: the frozen plan if it has one
pub fn blocks_for_workout(workout: &Workout, fallback: &[WorkoutBlock]) -> Vec<WorkoutBlock> {
  match &workout.blocks {
    Some(blocks) if !blocks.is_empty() => blocks.clone(),
    _ => fallback.to_vec(),
  }
}

/// ---------------------------------------------------------------------------
/// Workout Sections
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSection {
  #[serde(rename = "type")]
  pub section_type: WorkoutSectionType,
  pub title: &'static str,
  pub collapsible: bool,
}

const fn section(section_type: WorkoutSectionType, title: &'static str, collapsible: bool) -> WorkoutSection {
  WorkoutSection {
    section_type,
    title,
    collapsible,
  }
}

const CONDITIONING_SECTIONS: [WorkoutSection; 4] = [
  section(WorkoutSectionType::Activation, "Activation", true),
  section(WorkoutSectionType::ConditioningOptional, "Conditioning Prescription", true),
  section(WorkoutSectionType::Core, "Core", true),
  section(WorkoutSectionType::RecoveryNote, "Recovery Recommendation", false),
];

const REST_SECTIONS: [WorkoutSection; 1] = [section(
  WorkoutSectionType::RecoveryNote,
  "Recovery Recommendation",
  false,
)];

const LIFT_SECTIONS: [WorkoutSection; 7] = [
  section(WorkoutSectionType::Activation, "Activation", true),
  section(WorkoutSectionType::Primary, "Primary Lift", true),
  section(WorkoutSectionType::Secondary, "Secondary Lift", true),
  section(WorkoutSectionType::Accessory, "Accessory Block", true),
  section(WorkoutSectionType::Core, "Core (Mandatory)", true),
  section(WorkoutSectionType::ConditioningOptional, "Optional Conditioning", true),
  section(WorkoutSectionType::RecoveryNote, "Recovery Recommendation", false),
];

/// Ordered sections shown for a kind of day
pub fn workout_sections(day_type: DayType) -> &'static [WorkoutSection] {
  match day_type {
    DayType::Conditioning => &CONDITIONING_SECTIONS,
    DayType::Rest => &REST_SECTIONS,
    DayType::Lift => &LIFT_SECTIONS,
  }
}

/// Whether a section starts collapsed
pub fn default_collapsed(section_type: WorkoutSectionType) -> bool {
  match section_type {
    WorkoutSectionType::Activation => true,
    WorkoutSectionType::Primary => false,
    WorkoutSectionType::Secondary => false,
    WorkoutSectionType::Accessory => true,
    WorkoutSectionType::Core => false,
    WorkoutSectionType::ConditioningOptional => true,
    WorkoutSectionType::RecoveryNote => false,
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionGroup<'a> {
  #[serde(rename = "type")]
  pub section_type: WorkoutSectionType,
  pub title: &'static str,
  pub collapsible: bool,
  pub collapsed: bool,
  pub exercises: Vec<&'a Exercise>,
}

/// Group a workout's exercises under the day's sections.
///
/// Empty sections are dropped, except activation and the recovery note,
/// which always show, and optional conditioning when `show_conditioning`
/// is set. Exercises whose section the day doesn't list are not shown.
pub fn group_by_section(
  workout: &Workout,
  day_type: DayType,
  show_conditioning: bool,
) -> Vec<SectionGroup<'_>> {
  workout_sections(day_type)
    .iter()
    .map(|s| SectionGroup {
      section_type: s.section_type,
      title: s.title,
      collapsible: s.collapsible,
      collapsed: default_collapsed(s.section_type),
      exercises: workout
        .exercises
        .iter()
        .filter(|ex| resolve_section_type(ex, day_type) == s.section_type)
        .collect(),
    })
    .filter(|group| {
      !group.exercises.is_empty()
        || matches!(
          group.section_type,
          WorkoutSectionType::Activation | WorkoutSectionType::RecoveryNote
        )
        || (group.section_type == WorkoutSectionType::ConditioningOptional && show_conditioning)
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Goal Prescription
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalPrescription {
  pub sets: &'static str,
  pub reps: &'static str,
  pub rest: &'static str,
}

/// Sets, reps and rest hints shown above the planner
pub fn goal_prescription(goal: TrainingGoal, is_recovery_day: bool) -> GoalPrescription {
  if is_recovery_day {
    return GoalPrescription {
      sets: "2-3",
      reps: "8-15 or timed",
      rest: "45-75 sec",
    };
  }
  match goal {
    TrainingGoal::Strength => GoalPrescription {
      sets: "3-5",
      reps: "3-6",
      rest: "2-3 min",
    },
    TrainingGoal::Hypertrophy => GoalPrescription {
      sets: "3-4",
      reps: "8-12",
      rest: "60-90 sec",
    },
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalExercisePlan {
  pub compound: &'static str,
  pub isolate: &'static str,
  pub finisher: &'static str,
}

/// How many exercises each planner phase should hold
pub fn goal_exercise_plan(goal: TrainingGoal) -> GoalExercisePlan {
  match goal {
    TrainingGoal::Strength => GoalExercisePlan {
      compound: "2-4 exercises",
      isolate: "1-2 exercises",
      finisher: "0 finishers (prefer core/mobility)",
    },
    TrainingGoal::Hypertrophy => GoalExercisePlan {
      compound: "2-4 exercises",
      isolate: "3-5 exercises",
      finisher: "1-2 finishers",
    },
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::ExerciseCatalog;
  use chrono::Utc;

  fn durations(blocks: &[WorkoutBlock]) -> Vec<u32> {
    blocks.iter().map(|b| b.duration_min).collect()
  }

  fn make_workout(names: &[&str]) -> Workout {
    let catalog = ExerciseCatalog::built_in();
    Workout {
      id: "w1".to_string(),
      name: "Upper A".to_string(),
      date: Utc::now(),
      exercises: names
        .iter()
        .enumerate()
        .map(|(idx, name)| Exercise {
          id: format!("e{}", idx),
          definition: catalog.find(name).cloned().unwrap(),
          sets: vec![],
          previous_stats: None,
          section_type: None,
        })
        .collect(),
      completed: false,
      blocks: None,
    }
  }

  #[test]
  fn test_sixty_minute_blocks() {
    let blocks = build_session_blocks(TrainingGoal::Hypertrophy, 60);
    let types: Vec<WorkoutBlockType> = blocks.iter().map(|b| b.block_type).collect();

    assert_eq!(
      types,
      vec![
        WorkoutBlockType::Warmup,
        WorkoutBlockType::Compound,
        WorkoutBlockType::Accessory,
        WorkoutBlockType::Cooldown,
      ]
    );
    assert_eq!(durations(&blocks), vec![8, 25, 17, 8]);
    assert_eq!(durations(&blocks).iter().sum::<u32>(), 58);
    assert_eq!(blocks[1].recommended_rest_seconds, Some(90));
    assert_eq!(blocks[2].recommended_rest_seconds, Some(75));
  }

  #[test]
  fn test_strength_rests_longer() {
    let blocks = build_session_blocks(TrainingGoal::Strength, 60);
    assert_eq!(blocks[1].recommended_rest_seconds, Some(150));
    assert_eq!(blocks[0].recommended_rest_seconds, None);
  }

  #[test]
  fn test_durations_scale_with_length() {
    assert_eq!(durations(&build_session_blocks(TrainingGoal::Hypertrophy, 45)), vec![6, 19, 13, 6]);
    assert_eq!(durations(&build_session_blocks(TrainingGoal::Hypertrophy, 90)), vec![12, 38, 26, 12]);
    assert_eq!(durations(&build_session_blocks(TrainingGoal::Hypertrophy, 0)), vec![5, 5, 5, 5]);
  }

  #[test]
  fn test_durations_monotone_and_floored() {
    let mut previous = build_session_blocks(TrainingGoal::Hypertrophy, 0);
    for length in (5..=180).step_by(5) {
      let blocks = build_session_blocks(TrainingGoal::Hypertrophy, length);
      for (now, before) in blocks.iter().zip(previous.iter()) {
        assert!(now.duration_min >= before.duration_min);
        assert!(now.duration_min >= 5);
      }
      previous = blocks;
    }
  }

  #[test]
  fn test_sections_per_day_type() {
    let titles = |day: DayType| workout_sections(day).iter().map(|s| s.title).collect::<Vec<_>>();

    assert_eq!(titles(DayType::Rest), vec!["Recovery Recommendation"]);
    assert_eq!(
      titles(DayType::Conditioning),
      vec!["Activation", "Conditioning Prescription", "Core", "Recovery Recommendation"]
    );
    assert_eq!(titles(DayType::Lift).len(), 7);
    assert_eq!(titles(DayType::Lift)[4], "Core (Mandatory)");
    assert!(!workout_sections(DayType::Lift)[6].collapsible);
  }

  #[test]
  fn test_default_collapsed_states() {
    assert!(default_collapsed(WorkoutSectionType::Activation));
    assert!(default_collapsed(WorkoutSectionType::Accessory));
    assert!(!default_collapsed(WorkoutSectionType::Primary));
    assert!(!default_collapsed(WorkoutSectionType::RecoveryNote));
  }

  #[test]
  fn test_group_by_section_uses_overrides() {
    let mut workout = make_workout(&["Bench Press", "Lateral Raise", "Plank", "Lunge"]);
    workout.set_section_override("e3", WorkoutSectionType::Accessory);

    let groups = group_by_section(&workout, DayType::Lift, false);
    let summary: Vec<(WorkoutSectionType, usize)> =
      groups.iter().map(|g| (g.section_type, g.exercises.len())).collect();

    assert_eq!(
      summary,
      vec![
        (WorkoutSectionType::Activation, 0),
        (WorkoutSectionType::Primary, 1),
        (WorkoutSectionType::Accessory, 2),
        (WorkoutSectionType::Core, 1),
        (WorkoutSectionType::RecoveryNote, 0),
      ]
    );
    assert_eq!(groups[2].exercises[1].name(), "Lunge");
  }

  #[test]
  fn test_group_by_section_conditioning_toggle() {
    let workout = make_workout(&["Bench Press"]);
    let hidden = group_by_section(&workout, DayType::Lift, false);
    let shown = group_by_section(&workout, DayType::Lift, true);
    assert_eq!(shown.len(), hidden.len() + 1);
  }

  #[test]
  fn test_frozen_blocks_win() {
    let fallback = build_session_blocks(TrainingGoal::Hypertrophy, 60);
    let mut workout = make_workout(&[]);
    assert_eq!(blocks_for_workout(&workout, &fallback), fallback);

    workout.blocks = Some(build_session_blocks(TrainingGoal::Strength, 90));
    assert_eq!(blocks_for_workout(&workout, &fallback)[0].duration_min, 12);
  }

  #[test]
  fn test_goal_hints() {
    assert_eq!(goal_prescription(TrainingGoal::Strength, false).reps, "3-6");
    assert_eq!(goal_prescription(TrainingGoal::Strength, true).sets, "2-3");
    assert_eq!(goal_prescription(TrainingGoal::Hypertrophy, false).rest, "60-90 sec");
    assert_eq!(goal_exercise_plan(TrainingGoal::Strength).isolate, "1-2 exercises");
    assert_eq!(goal_exercise_plan(TrainingGoal::Hypertrophy).finisher, "1-2 finishers");
  }
}
