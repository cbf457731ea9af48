//! Load Progression Advisor
//!
//! Rep-range driven progression for individual exercises:
//! - all sets at the top of the rep range → add load
//! - any set below the bottom of the range → back off
//! - anything in between → hold, with a deload flag after a long stall
//!
//! Also owns the weekly volume estimates and the per-session exercise cap.

use serde::{Deserialize, Serialize};

use crate::models::exercise::{logged_reps, ExerciseDefinition, PrimaryMuscle, SetLog};
use crate::models::workout::{completed_newest_first, Workout};

/// Smallest plate jump suggested weights are rounded to
pub const WEIGHT_INCREMENT: f64 = 2.5;

/// Stalled weeks before a deload is recommended
pub const DELOAD_AFTER_WEEKS: u32 = 6;

/// Weekly glute set range the coaching prompt reports against
pub const GLUTE_SET_TARGET: (usize, usize) = (12, 18);

const COMPOUND_INCREASE: f64 = 1.05;
const ISOLATION_INCREASE: f64 = 1.025;
const DECREASE: f64 = 0.97;

// ---------------------------------------------------------------------------
/// Exercise Progress: derived from the most recent completed appearance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProgress {
    /// Heaviest set last time, 0 for unloaded work
    pub last_weight: f64,
    /// Non-zero reps in set order
    pub last_reps: Vec<u32>,
    /// Nothing advances this yet, so it stays 0
    pub weeks_stalled: u32,
}

/// Find the latest completed workout containing `exercise_name` (case-insensitive).
/// Returns None when the exercise has never been completed.
pub fn build_exercise_progress(exercise_name: &str, workouts: &[Workout]) -> Option<ExerciseProgress> {
    completed_newest_first(workouts)
        .into_iter()
        .find_map(|w| w.find_exercise(exercise_name))
        .map(|ex| ExerciseProgress {
            last_weight: ex.best_weight(),
            last_reps: ex.logged_reps(),
            weeks_stalled: 0,
        })
}

// ---------------------------------------------------------------------------
/// Progression Action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionAction {
    Increase,
    Decrease,
    #[default]
    Hold,
}

impl std::fmt::Display for ProgressionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Increase => write!(f, "increase"),
            Self::Decrease => write!(f, "decrease"),
            Self::Hold => write!(f, "hold"),
        }
    }
}

// ---------------------------------------------------------------------------
/// Progression Suggestion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionSuggestion {
    pub action: ProgressionAction,
    pub message: Option<String>,
    pub next_weight: Option<f64>,
    pub deload: bool,
}

pub fn round_to_increment(value: f64, increment: f64) -> f64 {
    (value / increment).round() * increment
}

/// Suggest the next load for an exercise from the reps just logged.
///
/// The suggested weight always moves at least one increment in the
/// suggested direction, and never below zero.
pub fn get_progression_suggestion(
    exercise: &ExerciseDefinition,
    current_sets: &[SetLog],
    progress: Option<&ExerciseProgress>,
) -> ProgressionSuggestion {
    let Some(progress) = progress else {
        return ProgressionSuggestion::default();
    };

    let (min_rep, max_rep) = exercise.default_rep_range;
    let reps = logged_reps(current_sets);
    let all_at_top = !reps.is_empty() && reps.iter().all(|r| *r >= max_rep);
    let below_bottom = !reps.is_empty() && reps.iter().any(|r| *r < min_rep);

    if all_at_top {
        let multiplier = if exercise.is_compound {
            COMPOUND_INCREASE
        } else {
            ISOLATION_INCREASE
        };
        let mut next = round_to_increment(progress.last_weight * multiplier, WEIGHT_INCREMENT);
        if next <= progress.last_weight {
            next = round_to_increment(progress.last_weight, WEIGHT_INCREMENT) + WEIGHT_INCREMENT;
        }
        return ProgressionSuggestion {
            action: ProgressionAction::Increase,
            message: Some(format!(
                "You hit {} reps on all sets last week. Increase weight today?",
                max_rep
            )),
            next_weight: Some(next),
            deload: false,
        };
    }

    if below_bottom {
        let mut next = round_to_increment(progress.last_weight * DECREASE, WEIGHT_INCREMENT);
        if next >= progress.last_weight {
            next = round_to_increment(progress.last_weight, WEIGHT_INCREMENT) - WEIGHT_INCREMENT;
        }
        return ProgressionSuggestion {
            action: ProgressionAction::Decrease,
            message: Some(format!(
                "Last session was below {} reps in spots. Consider reducing load slightly.",
                min_rep
            )),
            next_weight: Some(next.max(0.0)),
            deload: false,
        };
    }

    ProgressionSuggestion {
        action: ProgressionAction::Hold,
        message: None,
        next_weight: None,
        deload: progress.weeks_stalled >= DELOAD_AFTER_WEEKS,
    }
}

// ---------------------------------------------------------------------------
/// Volume Estimates
// ---------------------------------------------------------------------------

/// Completed sets on exercises tagged with `muscle`, across completed workouts
pub fn estimate_weekly_sets(workouts: &[Workout], muscle: PrimaryMuscle) -> usize {
    workouts
        .iter()
        .filter(|w| w.completed)
        .flat_map(|w| w.exercises.iter())
        .filter(|ex| ex.definition.targets(muscle))
        .map(|ex| ex.completed_sets())
        .sum()
}

pub fn estimate_weekly_glute_sets(workouts: &[Workout]) -> usize {
    estimate_weekly_sets(workouts, PrimaryMuscle::Glutes)
}

/// Maximum exercises an auto-planned session holds
pub fn get_session_exercise_cap(session_length_min: u32) -> usize {
    match session_length_min {
        0..=45 => 5,
        46..=75 => 6,
        _ => 7,
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exercise::{Category, Exercise};
    use chrono::{Duration, Utc};

    fn make_definition(is_compound: bool) -> ExerciseDefinition {
        ExerciseDefinition {
            name: "Hip Thrust".to_string(),
            category: Category::Legs,
            primary_muscles: vec![PrimaryMuscle::Glutes, PrimaryMuscle::Hamstrings],
            is_compound,
            default_rep_range: (8, 12),
            ..ExerciseDefinition::default()
        }
    }

    fn make_sets(reps: &[u32], weight: f64) -> Vec<SetLog> {
        reps.iter().map(|r| SetLog::loaded(*r, weight).completed()).collect()
    }

    fn make_workout(days_ago: i64, completed: bool, sets: Vec<SetLog>) -> Workout {
        Workout {
            id: format!("w{}", days_ago),
            name: "Lower (Glute/Quad)".to_string(),
            date: Utc::now() - Duration::days(days_ago),
            exercises: vec![Exercise {
                id: format!("e{}", days_ago),
                definition: make_definition(true),
                sets,
                previous_stats: None,
                section_type: None,
            }],
            completed,
            blocks: None,
        }
    }

    fn make_progress(last_weight: f64) -> ExerciseProgress {
        ExerciseProgress {
            last_weight,
            last_reps: vec![10, 10, 10],
            weeks_stalled: 0,
        }
    }

    #[test]
    fn test_progress_uses_latest_completed() {
        let workouts = vec![
            make_workout(7, true, make_sets(&[10, 10], 135.0)),
            make_workout(2, true, make_sets(&[12, 0, 9], 155.0)),
            make_workout(0, false, make_sets(&[12, 12], 185.0)),
        ];

        let progress = build_exercise_progress("hip thrust", &workouts).unwrap();
        assert_eq!(progress.last_weight, 155.0);
        assert_eq!(progress.last_reps, vec![12, 9]);
        assert_eq!(progress.weeks_stalled, 0);
    }

    #[test]
    fn test_progress_missing_history() {
        let workouts = vec![make_workout(0, false, make_sets(&[10], 100.0))];
        assert!(build_exercise_progress("Hip Thrust", &workouts).is_none());
        assert!(build_exercise_progress("Squat", &[]).is_none());
    }

    #[test]
    fn test_increase_when_all_sets_at_top() {
        let progress = make_progress(100.0);
        let sets = make_sets(&[12, 12, 12], 100.0);

        let compound = get_progression_suggestion(&make_definition(true), &sets, Some(&progress));
        assert_eq!(compound.action, ProgressionAction::Increase);
        assert_eq!(compound.next_weight, Some(105.0));
        assert_eq!(
            compound.message.as_deref(),
            Some("You hit 12 reps on all sets last week. Increase weight today?")
        );

        let isolation = get_progression_suggestion(&make_definition(false), &sets, Some(&progress));
        assert_eq!(isolation.next_weight, Some(102.5));
    }

    #[test]
    fn test_increase_is_strict_for_light_loads() {
        let progress = make_progress(20.0);
        let sets = make_sets(&[12, 12, 12], 20.0);
        let suggestion = get_progression_suggestion(&make_definition(false), &sets, Some(&progress));
        assert_eq!(suggestion.next_weight, Some(22.5));

        let bodyweight = get_progression_suggestion(&make_definition(true), &sets, Some(&make_progress(0.0)));
        assert_eq!(bodyweight.next_weight, Some(2.5));
    }

    #[test]
    fn test_decrease_when_any_set_below_range() {
        let progress = make_progress(100.0);
        let suggestion = get_progression_suggestion(
            &make_definition(true),
            &make_sets(&[6, 10, 10], 100.0),
            Some(&progress),
        );

        assert_eq!(suggestion.action, ProgressionAction::Decrease);
        assert_eq!(suggestion.next_weight, Some(97.5));
        assert!(suggestion.message.unwrap().contains("below 8 reps"));

        let light = get_progression_suggestion(
            &make_definition(true),
            &make_sets(&[6], 20.0),
            Some(&make_progress(20.0)),
        );
        assert_eq!(light.next_weight, Some(17.5));

        let empty_bar = get_progression_suggestion(
            &make_definition(true),
            &make_sets(&[6], 0.0),
            Some(&make_progress(0.0)),
        );
        assert_eq!(empty_bar.next_weight, Some(0.0));
    }

    #[test]
    fn test_hold_inside_range() {
        let mut progress = make_progress(100.0);
        let sets = make_sets(&[9, 10, 11], 100.0);

        let hold = get_progression_suggestion(&make_definition(true), &sets, Some(&progress));
        assert_eq!(hold.action, ProgressionAction::Hold);
        assert!(hold.message.is_none());
        assert!(hold.next_weight.is_none());
        assert!(!hold.deload);

        progress.weeks_stalled = 6;
        let stalled = get_progression_suggestion(&make_definition(true), &sets, Some(&progress));
        assert!(stalled.deload);
    }

    #[test]
    fn test_no_progress_means_no_suggestion() {
        let suggestion =
            get_progression_suggestion(&make_definition(true), &make_sets(&[12, 12], 100.0), None);
        assert_eq!(suggestion, ProgressionSuggestion::default());
    }

    #[test]
    fn test_unlogged_reps_hold() {
        let sets = vec![SetLog::default(), SetLog::loaded(0, 100.0)];
        let suggestion = get_progression_suggestion(&make_definition(true), &sets, Some(&make_progress(100.0)));
        assert_eq!(suggestion.action, ProgressionAction::Hold);
    }

    #[test]
    fn test_weekly_glute_sets() {
        let mut partial = make_sets(&[10, 10, 10, 10], 100.0);
        partial[3].is_completed = false;
        let workouts = vec![
            make_workout(1, true, make_sets(&[10, 10, 10], 100.0)),
            make_workout(2, true, make_sets(&[10, 10, 10], 100.0)),
            make_workout(3, true, partial),
            make_workout(0, false, make_sets(&[10, 10, 10], 100.0)),
        ];

        assert_eq!(estimate_weekly_glute_sets(&workouts), 9);
        assert_eq!(estimate_weekly_sets(&workouts, PrimaryMuscle::Chest), 0);
    }

    #[test]
    fn test_session_exercise_cap() {
        assert_eq!(get_session_exercise_cap(30), 5);
        assert_eq!(get_session_exercise_cap(45), 5);
        assert_eq!(get_session_exercise_cap(60), 6);
        assert_eq!(get_session_exercise_cap(75), 6);
        assert_eq!(get_session_exercise_cap(90), 7);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(ProgressionAction::Increase.to_string(), "increase");
        assert_eq!(ProgressionAction::default(), ProgressionAction::Hold);
    }
}
