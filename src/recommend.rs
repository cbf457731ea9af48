//! Exercise recommendation engine
//!
//! Resolves what today is for (label, split focus, movement priority), scores
//! catalog exercises for the planner phases and for in-session suggestions,
//! and files exercises under planner sections.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::analysis::{is_lower_label, RecentHistory};
use crate::catalog::{compare_names, ExerciseCatalog};
use crate::models::exercise::{
  Category, Exercise, ExerciseDefinition, MovementPattern, PrimaryMuscle, WorkoutSectionType,
};
use crate::models::program::{DayType, Emphasis, TrainingProgram};
use crate::models::workout::{Workout, WorkoutBlockType};
use crate::program::{full_week_structure, generate_weekly_structure};
use crate::progression::get_session_exercise_cap;

use Category as C;

/// Ordered keyword table. The first keyword found in the day label decides its categories.
#[rustfmt::skip]
const SPLIT_CATEGORY_MAP: &[(&str, &[Category])] = &[
  ("push", &[C::Chest, C::Shoulders, C::Arms]),
  ("pull", &[C::Back, C::Arms]),
  ("legs", &[C::Legs]),
  ("upper", &[C::Chest, C::Back, C::Shoulders, C::Arms]),
  ("lower", &[C::Legs, C::Core]),
  ("full body", &[C::Chest, C::Back, C::Legs, C::Shoulders, C::Arms, C::Core]),
  ("strength", &[C::Chest, C::Back, C::Legs, C::Shoulders]),
  ("condition", &[C::Cardio]),
  ("endurance", &[C::Cardio]),
  ("mobility", &[C::ActiveRecovery]),
  ("recovery", &[C::ActiveRecovery]),
  ("rest", &[C::ActiveRecovery]),
];

const RECOVERY_FOCUS: &[Category] = &[C::Cardio, C::ActiveRecovery, C::Core];
const RECOVERY_PRIORITY: &[MovementPattern] =
  &[MovementPattern::Carry, MovementPattern::Core, MovementPattern::Isolation];

const PLANNER_LIMIT: usize = 8;
const RECOMMENDATION_LIMIT: usize = 6;
/// Phase-filtered recommendations must score above this
const RECOMMENDATION_FLOOR: i32 = 6;

/// Categories a day's label points at; recovery days always get cardio, recovery and core
pub fn split_focus_categories(label: &str, is_recovery_day: bool) -> Vec<Category> {
  if is_recovery_day {
    return RECOVERY_FOCUS.to_vec();
  }
  let label = label.to_lowercase();
  SPLIT_CATEGORY_MAP
    .iter()
    .find(|(keyword, _)| label.contains(keyword))
    .map(|(_, categories)| categories.to_vec())
    .unwrap_or_default()
}

/// ---------------------------------------------------------------------------
/// Day Plan
/// ---------------------------------------------------------------------------

/// Everything the planner needs to know about one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
  pub label: String,
  pub day_type: DayType,
  pub is_recovery_day: bool,
  pub movement_priority: Vec<MovementPattern>,
  pub split_focus: Vec<Category>,
}

impl DayPlan {
  pub fn for_day(program: &TrainingProgram, weekday: Weekday) -> Self {
    let full_week = full_week_structure(program);
    let week_day = &full_week[weekday.num_days_from_monday() as usize];
    let structure = generate_weekly_structure(program)
      .into_iter()
      .find(|d| d.day == weekday);
    let is_recovery_day = week_day.day_type == DayType::Rest || structure.is_none();

    let (label, movement_priority) = match structure {
      Some(entry) => (entry.label, entry.movement_priority),
      None if is_recovery_day => ("Active Recovery".to_string(), RECOVERY_PRIORITY.to_vec()),
      None => ("Workout Session".to_string(), Vec::new()),
    };

    Self {
      split_focus: split_focus_categories(&label, is_recovery_day),
      label,
      day_type: week_day.day_type,
      is_recovery_day,
      movement_priority,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Section Classification
/// ---------------------------------------------------------------------------

/// Planner section for an exercise, first matching rule wins. Rest days
/// classify like lift days.
pub fn infer_section_type(exercise: &ExerciseDefinition, day_type: DayType) -> WorkoutSectionType {
  use MovementPattern as M;

  if exercise.movement_pattern == M::Core || exercise.category == C::Core {
    return WorkoutSectionType::Core;
  }
  if day_type == DayType::Conditioning {
    return WorkoutSectionType::ConditioningOptional;
  }
  match exercise.movement_pattern {
    M::Squat | M::Hinge | M::HorizontalPush | M::VerticalPull => WorkoutSectionType::Primary,
    M::Lunge | M::HorizontalPull | M::VerticalPush | M::GluteBridge => WorkoutSectionType::Secondary,
    _ if exercise.category.is_timed() => WorkoutSectionType::ConditioningOptional,
    _ => WorkoutSectionType::Accessory,
  }
}

/// The user's override if set, otherwise the inferred section
pub fn resolve_section_type(exercise: &Exercise, day_type: DayType) -> WorkoutSectionType {
  exercise
    .section_type
    .unwrap_or_else(|| infer_section_type(&exercise.definition, day_type))
}

/// ---------------------------------------------------------------------------
/// Keyword Rules
/// ---------------------------------------------------------------------------

struct PhaseRule {
  categories: &'static [Category],
  include: &'static [&'static str],
  exclude: &'static [&'static str],
}

impl PhaseRule {
  fn in_category(&self, exercise: &ExerciseDefinition) -> bool {
    self.categories.contains(&exercise.category)
  }

  fn include_hit(&self, lower_name: &str) -> bool {
    self.include.iter().any(|k| lower_name.contains(k))
  }

  fn exclude_hit(&self, lower_name: &str) -> bool {
    self.exclude.iter().any(|k| lower_name.contains(k))
  }
}

/// ---------------------------------------------------------------------------
/// Planner Suggestions
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannerPhase {
  Compound,
  Isolate,
  Finisher,
}

impl PlannerPhase {
  pub const ALL: [PlannerPhase; 3] = [PlannerPhase::Compound, PlannerPhase::Isolate, PlannerPhase::Finisher];

  fn rule(&self) -> PhaseRule {
    match self {
      PlannerPhase::Compound => PhaseRule {
        categories: &[C::Chest, C::Back, C::Legs, C::Shoulders],
        include: &[],
        exclude: &["curl", "extension", "raise", "pushdown", "plank", "twist", "crunch"],
      },
      PlannerPhase::Isolate => PhaseRule {
        categories: &[C::Arms, C::Core, C::Shoulders, C::Legs],
        include: &["curl", "extension", "raise", "pushdown", "fly", "plank", "crunch", "twist"],
        exclude: &[],
      },
      PlannerPhase::Finisher => PhaseRule {
        categories: &[C::Cardio, C::Core, C::ActiveRecovery],
        include: &["assault bike", "jump rope", "rowing machine", "mountain", "carry", "swing", "stair"],
        exclude: &[],
      },
    }
  }

  /// Whether the day's split focus narrows this phase's candidates
  fn enforces_split_focus(&self) -> bool {
    matches!(self, PlannerPhase::Compound | PlannerPhase::Isolate)
  }

  /// Categories always allowed even when they sit outside the split focus
  fn split_optional_categories(&self) -> &'static [Category] {
    match self {
      PlannerPhase::Finisher => &[C::Cardio, C::Core, C::ActiveRecovery],
      _ => &[],
    }
  }

  fn allows_category(&self, split_focus: &[Category], category: Category) -> bool {
    if split_focus.is_empty() || !self.enforces_split_focus() {
      return true;
    }
    split_focus.contains(&category) || self.split_optional_categories().contains(&category)
  }

  fn score(&self, exercise: &ExerciseDefinition) -> i32 {
    let rule = self.rule();
    let lower = exercise.key();
    let mut score = 0;
    if rule.in_category(exercise) {
      score += 20;
    }
    if rule.include_hit(&lower) {
      score += 14;
    }
    if rule.exclude_hit(&lower) {
      score -= 14;
    }
    score
  }
}

/// Top candidates per planner phase for the day's split focus
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerSuggestions {
  pub compound: Vec<ExerciseDefinition>,
  pub isolate: Vec<ExerciseDefinition>,
  pub finisher: Vec<ExerciseDefinition>,
}

impl PlannerSuggestions {
  pub fn phase(&self, phase: PlannerPhase) -> &[ExerciseDefinition] {
    match phase {
      PlannerPhase::Compound => &self.compound,
      PlannerPhase::Isolate => &self.isolate,
      PlannerPhase::Finisher => &self.finisher,
    }
  }

  fn phase_mut(&mut self, phase: PlannerPhase) -> &mut Vec<ExerciseDefinition> {
    match phase {
      PlannerPhase::Compound => &mut self.compound,
      PlannerPhase::Isolate => &mut self.isolate,
      PlannerPhase::Finisher => &mut self.finisher,
    }
  }
}

pub fn planner_suggestions(catalog: &ExerciseCatalog, split_focus: &[Category]) -> PlannerSuggestions {
  let mut suggestions = PlannerSuggestions::default();

  for phase in PlannerPhase::ALL {
    let mut scored: Vec<(i32, &ExerciseDefinition)> = catalog
      .iter()
      .filter(|ex| phase.allows_category(split_focus, ex.category))
      .map(|ex| (phase.score(ex), ex))
      .filter(|(score, _)| *score > 0)
      .collect();
    scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| compare_names(&a.name, &b.name)));

    *suggestions.phase_mut(phase) = scored
      .into_iter()
      .take(PLANNER_LIMIT)
      .map(|(_, ex)| ex.clone())
      .collect();
  }

  suggestions
}

/// Exercises the user picked by hand for each planner phase
pub type PlannerSelections = PlannerSuggestions;

impl PlannerSuggestions {
  /// Add the exercise to a phase, or remove it if already there
  pub fn toggle(&mut self, phase: PlannerPhase, exercise: ExerciseDefinition) {
    let list = self.phase_mut(phase);
    match list.iter().position(|e| e.name_matches(&exercise.name)) {
      Some(idx) => {
        list.remove(idx);
      }
      None => list.push(exercise),
    }
  }

  /// Compound, isolate, then finisher picks in one list
  pub fn flatten(&self) -> Vec<ExerciseDefinition> {
    self
      .compound
      .iter()
      .chain(self.isolate.iter())
      .chain(self.finisher.iter())
      .cloned()
      .collect()
  }

  pub fn is_empty(&self) -> bool {
    self.compound.is_empty() && self.isolate.is_empty() && self.finisher.is_empty()
  }
}

/// ---------------------------------------------------------------------------
/// In-Session Recommendations
/// ---------------------------------------------------------------------------

fn block_rule(block: WorkoutBlockType) -> PhaseRule {
  match block {
    WorkoutBlockType::Warmup => PhaseRule {
      categories: &[C::Cardio, C::ActiveRecovery],
      include: &["walking", "cycling", "elliptical", "mobility", "stretch", "foam", "yoga"],
      exclude: &[],
    },
    WorkoutBlockType::SkillPower => PhaseRule {
      categories: &[C::Legs, C::Shoulders, C::Cardio],
      include: &["jump", "sprint", "swing", "clean", "press"],
      exclude: &[],
    },
    WorkoutBlockType::Compound => PhaseRule {
      categories: &[C::Chest, C::Back, C::Legs, C::Shoulders],
      include: &[],
      exclude: &["curl", "extension", "raise", "pushdown", "plank", "crunch", "carry", "twist"],
    },
    WorkoutBlockType::Accessory => PhaseRule {
      categories: &[C::Arms, C::Core, C::Shoulders, C::Legs],
      include: &["curl", "extension", "raise", "pushdown", "plank", "crunch", "carry", "twist", "fly"],
      exclude: &[],
    },
    WorkoutBlockType::Cooldown => PhaseRule {
      categories: &[C::ActiveRecovery, C::Core],
      include: &["stretch", "mobility", "foam", "yoga", "pilates", "cool"],
      exclude: &[],
    },
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredExercise {
  pub exercise: ExerciseDefinition,
  pub score: i32,
}

/// Every candidate for the session with its score, best first. `block` of
/// None means all phases.
pub fn score_recommendations(
  catalog: &ExerciseCatalog,
  plan: &DayPlan,
  block: Option<WorkoutBlockType>,
  active: Option<&Workout>,
  workouts: &[Workout],
) -> Vec<ScoredExercise> {
  let history = RecentHistory::from_workouts(workouts);
  let rule = block.map(block_rule);

  let mut scored: Vec<ScoredExercise> = catalog
    .iter()
    .filter(|ex| !active.is_some_and(|w| w.has_exercise(&ex.name)))
    .filter(|ex| {
      plan.movement_priority.is_empty()
        || block.is_none()
        || plan.movement_priority.contains(&ex.movement_pattern)
    })
    .map(|ex| {
      let lower = ex.key();
      let frequency = history.frequency(&ex.name) as i32;
      let recency = history
        .latest_index(&ex.name)
        .map(|idx| 10 - idx as i32)
        .unwrap_or(0);

      let mut score = 0;
      if plan.split_focus.contains(&ex.category) {
        score += 20;
      }
      if let Some(rule) = &rule {
        if rule.in_category(ex) {
          score += 24;
        }
        if rule.include_hit(&lower) {
          score += 18;
        }
        if rule.exclude_hit(&lower) {
          score -= 16;
        }
      }
      if frequency == 0 {
        score += 10;
      }
      score -= frequency * 6 + recency;

      ScoredExercise {
        exercise: ex.clone(),
        score,
      }
    })
    .collect();

  scored.sort_by(|a, b| {
    b.score
      .cmp(&a.score)
      .then_with(|| compare_names(&a.exercise.name, &b.exercise.name))
  });
  scored
}

/// Up to six suggestions for the selected phase. A phase keeps only
/// strong matches, falling back to the best six when none qualify.
pub fn recommendations(
  catalog: &ExerciseCatalog,
  plan: &DayPlan,
  block: Option<WorkoutBlockType>,
  active: Option<&Workout>,
  workouts: &[Workout],
) -> Vec<ExerciseDefinition> {
  let scored = score_recommendations(catalog, plan, block, active, workouts);

  let trimmed: Vec<&ScoredExercise> = scored
    .iter()
    .filter(|s| block.is_none() || s.score > RECOMMENDATION_FLOOR)
    .take(RECOMMENDATION_LIMIT)
    .collect();

  if trimmed.is_empty() && block.is_some() {
    tracing::debug!("No strong matches for {:?}, using top {}", block, RECOMMENDATION_LIMIT);
    return scored
      .into_iter()
      .take(RECOMMENDATION_LIMIT)
      .map(|s| s.exercise)
      .collect();
  }

  trimmed.into_iter().map(|s| s.exercise.clone()).collect()
}

/// ---------------------------------------------------------------------------
/// Program-Driven Plan
/// ---------------------------------------------------------------------------

/// One exercise per movement priority, then glute work on lower days for
/// the glute emphasis, capped by session length.
pub fn build_program_driven_plan(
  catalog: &ExerciseCatalog,
  program: &TrainingProgram,
  plan: &DayPlan,
) -> Vec<ExerciseDefinition> {
  let cap = get_session_exercise_cap(program.session_length_min);
  let mut chosen: Vec<ExerciseDefinition> = Vec::new();

  for pattern in &plan.movement_priority {
    if chosen.len() >= cap {
      break;
    }
    let candidate = catalog
      .by_pattern(*pattern)
      .into_iter()
      .find(|ex| !chosen.iter().any(|c| c.name == ex.name));
    if let Some(ex) = candidate {
      chosen.push(ex.clone());
    }
  }

  if program.emphasis == Emphasis::GlutesLegs && is_lower_label(&plan.label) {
    let mut glute_work: Vec<&ExerciseDefinition> = catalog
      .iter()
      .filter(|ex| ex.targets(PrimaryMuscle::Glutes))
      .collect();
    glute_work.sort_by_key(|ex| !ex.is_compound);

    for ex in glute_work {
      if chosen.len() >= cap {
        break;
      }
      if !chosen.iter().any(|c| c.name == ex.name) {
        chosen.push(ex.clone());
      }
    }
  }

  chosen
}

/// Exercises a new session starts with: manual picks when there are any
pub fn planned_exercises(
  selections: &PlannerSelections,
  catalog: &ExerciseCatalog,
  program: &TrainingProgram,
  plan: &DayPlan,
) -> Vec<ExerciseDefinition> {
  if selections.is_empty() {
    build_program_driven_plan(catalog, program, plan)
  } else {
    selections.flatten()
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
