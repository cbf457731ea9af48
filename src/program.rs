//! Weekly structure generation
//!
//! Turns the active training program into the days of the week that carry a
//! session, plus the seven-day calendar view built on top of them.

use chrono::Weekday;

use crate::models::exercise::{MovementPattern, PrimaryMuscle};
use crate::models::program::{
  DayType, Emphasis, GeneratedWeek, TrainingProgram, WeekDay, DAY_LABELS, WEEK_DAYS,
};

use MovementPattern as M;
use PrimaryMuscle as P;
use Weekday::{Fri, Mon, Sat, Thu, Tue, Wed};

/// ---------------------------------------------------------------------------
/// Base Templates
/// ---------------------------------------------------------------------------

struct TemplateDay {
  day: Weekday,
  label: &'static str,
  focus: &'static [PrimaryMuscle],
  priority: &'static [MovementPattern],
}

const fn day(
  day: Weekday,
  label: &'static str,
  focus: &'static [PrimaryMuscle],
  priority: &'static [MovementPattern],
) -> TemplateDay {
  TemplateDay {
    day,
    label,
    focus,
    priority,
  }
}

#[rustfmt::skip]
const FULL_BODY: &[TemplateDay] = &[
  day(Mon, "Full Body A", &[P::Quads, P::Glutes, P::Chest, P::Back, P::Core], &[M::Squat, M::HorizontalPush, M::HorizontalPull, M::Core]),
  day(Wed, "Full Body B", &[P::Hamstrings, P::Glutes, P::Shoulders, P::Back, P::Core], &[M::Hinge, M::VerticalPush, M::VerticalPull, M::Core]),
  day(Fri, "Full Body C", &[P::Quads, P::Glutes, P::Back, P::Core], &[M::Lunge, M::HorizontalPull, M::HorizontalPush, M::Core]),
];

#[rustfmt::skip]
const UPPER_LOWER: &[TemplateDay] = &[
  day(Mon, "Upper A", &[P::Chest, P::Back, P::Shoulders, P::Triceps], &[M::HorizontalPush, M::HorizontalPull, M::VerticalPush, M::Isolation]),
  day(Tue, "Lower A", &[P::Quads, P::Glutes, P::Calves], &[M::Squat, M::Lunge, M::Isolation, M::Core]),
  day(Thu, "Upper B", &[P::Back, P::Chest, P::Biceps, P::Shoulders], &[M::VerticalPull, M::HorizontalPush, M::HorizontalPull, M::Isolation]),
  day(Fri, "Lower B", &[P::Hamstrings, P::Glutes, P::Calves], &[M::Hinge, M::GluteBridge, M::Isolation, M::Core]),
];

#[rustfmt::skip]
const GLUTE_FOCUS: &[TemplateDay] = &[
  day(Mon, "Lower (Glute/Quad)", &[P::Glutes, P::Quads, P::Calves], &[M::Squat, M::GluteBridge, M::Lunge, M::Isolation]),
  day(Tue, "Upper A", &[P::Chest, P::Back, P::Shoulders, P::Triceps], &[M::HorizontalPush, M::HorizontalPull, M::VerticalPush, M::Isolation]),
  day(Wed, "Lower (Ham/Glute)", &[P::Hamstrings, P::Glutes, P::Core], &[M::Hinge, M::Isolation, M::GluteBridge, M::Core]),
  day(Fri, "Upper B", &[P::Back, P::Chest, P::Biceps, P::Shoulders], &[M::VerticalPull, M::HorizontalPush, M::HorizontalPull, M::Isolation]),
  day(Sat, "Lower (Pump)", &[P::Glutes, P::Quads, P::Calves], &[M::Lunge, M::Isolation, M::GluteBridge, M::Core]),
];

#[rustfmt::skip]
const PUSH_PULL_LEGS: &[TemplateDay] = &[
  day(Mon, "Push", &[P::Chest, P::Shoulders, P::Triceps], &[M::HorizontalPush, M::VerticalPush, M::Isolation]),
  day(Tue, "Pull", &[P::Back, P::Biceps], &[M::HorizontalPull, M::VerticalPull, M::Isolation]),
  day(Wed, "Legs", &[P::Quads, P::Glutes, P::Hamstrings], &[M::Squat, M::Hinge, M::Lunge, M::Isolation]),
  day(Thu, "Push", &[P::Chest, P::Shoulders, P::Triceps], &[M::HorizontalPush, M::VerticalPush, M::Isolation]),
  day(Fri, "Pull", &[P::Back, P::Biceps], &[M::HorizontalPull, M::VerticalPull, M::Isolation]),
  day(Sat, "Legs", &[P::Quads, P::Glutes, P::Hamstrings], &[M::Squat, M::Hinge, M::Lunge, M::Isolation]),
];

#[rustfmt::skip]
const BALANCED_FIVE: &[TemplateDay] = &[
  day(Mon, "Upper A", &[P::Chest, P::Back, P::Shoulders], &[M::HorizontalPush, M::HorizontalPull, M::VerticalPush]),
  day(Tue, "Lower A", &[P::Quads, P::Glutes, P::Calves], &[M::Squat, M::Lunge, M::Isolation]),
  day(Wed, "Upper B", &[P::Back, P::Chest, P::Biceps], &[M::VerticalPull, M::HorizontalPush, M::HorizontalPull]),
  day(Fri, "Lower B", &[P::Hamstrings, P::Glutes, P::Core], &[M::Hinge, M::GluteBridge, M::Core]),
  day(Sat, "Upper/Conditioning", &[P::Shoulders, P::Core], &[M::Carry, M::Core, M::Isolation]),
];

/// Order in which open days are tried for conditioning
const CONDITIONING_SLOTS: [Weekday; 5] = [Wed, Thu, Fri, Tue, Sat];

fn base_template(program: &TrainingProgram) -> &'static [TemplateDay] {
  match (program.days_per_week, program.emphasis) {
    (3, _) => FULL_BODY,
    (4, _) => UPPER_LOWER,
    (5, Emphasis::GlutesLegs) => GLUTE_FOCUS,
    (6, _) => PUSH_PULL_LEGS,
    _ => BALANCED_FIVE,
  }
}

impl From<&TemplateDay> for GeneratedWeek {
  fn from(t: &TemplateDay) -> Self {
    Self {
      day: t.day,
      label: t.label.to_string(),
      focus_muscles: t.focus.to_vec(),
      movement_priority: t.priority.to_vec(),
      is_conditioning: false,
    }
  }
}

fn conditioning_day(day: Weekday) -> GeneratedWeek {
  GeneratedWeek {
    day,
    label: "Conditioning".to_string(),
    focus_muscles: vec![PrimaryMuscle::Core, PrimaryMuscle::Calves],
    movement_priority: vec![MovementPattern::Carry, MovementPattern::Core, MovementPattern::Isolation],
    is_conditioning: true,
  }
}

/// ---------------------------------------------------------------------------
/// Weekly Structure
/// ---------------------------------------------------------------------------

/// Training days for the program in calendar order, conditioning included
pub fn generate_weekly_structure(program: &TrainingProgram) -> Vec<GeneratedWeek> {
  let week: Vec<GeneratedWeek> = base_template(program)
    .iter()
    .map(GeneratedWeek::from)
    .collect();

  match program.conditioning_preference.days() {
    0 => week,
    count => insert_conditioning_days(week, count),
  }
}

/// Splice up to `count` conditioning days into a calendar-ordered week.
/// A slot sitting between two heavy lower-body days is never used, so
/// fewer days than requested may be placed.
pub(crate) fn insert_conditioning_days(
  mut week: Vec<GeneratedWeek>,
  count: usize,
) -> Vec<GeneratedWeek> {
  let mut inserted = 0;

  for slot in CONDITIONING_SLOTS {
    if inserted >= count {
      break;
    }
    if week.iter().any(|d| d.day == slot) {
      continue;
    }

    let slot_idx = slot.num_days_from_monday() as usize;
    let at = week
      .iter()
      .position(|d| d.day_index() > slot_idx)
      .unwrap_or(week.len());
    let prev = at.checked_sub(1).and_then(|i| week.get(i));
    let next = week.get(at);

    if let (Some(p), Some(n)) = (prev, next) {
      if p.is_heavy_lower() && n.is_heavy_lower() {
        tracing::debug!("Skipping conditioning on {}: between {} and {}", slot, p.label, n.label);
        continue;
      }
    }

    week.insert(at, conditioning_day(slot));
    inserted += 1;
  }

  if inserted < count {
    tracing::debug!("Placed {} of {} requested conditioning days", inserted, count);
  }

  week.sort_by_key(|d| d.day_index());
  week
}

/// Entry for the given weekday, or the first training day when it is not a training day
pub fn today_structure(program: &TrainingProgram, weekday: Weekday) -> Option<GeneratedWeek> {
  let mut week = generate_weekly_structure(program);
  match week.iter().position(|d| d.day == weekday) {
    Some(idx) => Some(week.swap_remove(idx)),
    None => week.into_iter().next(),
  }
}

/// Seven-day calendar with rest days filled in
pub fn full_week_structure(program: &TrainingProgram) -> [WeekDay; 7] {
  let week = generate_weekly_structure(program);

  std::array::from_fn(|idx| {
    let label = DAY_LABELS[idx].to_string();
    match week.iter().find(|d| d.day == WEEK_DAYS[idx]) {
      Some(entry) => WeekDay {
        day_index: idx,
        label,
        day_type: if entry.is_conditioning {
          DayType::Conditioning
        } else {
          DayType::Lift
        },
        focus: entry.label.clone(),
      },
      None => WeekDay {
        day_index: idx,
        label,
        day_type: DayType::Rest,
        focus: "Rest & Recovery".to_string(),
      },
    }
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::program::{ConditioningPreference, TrainingGoal};
  use std::collections::HashSet;

  fn make_program(days: u8, emphasis: Emphasis, conditioning: ConditioningPreference) -> TrainingProgram {
    TrainingProgram {
      goal: TrainingGoal::Hypertrophy,
      days_per_week: days,
      emphasis,
      session_length_min: 60,
      conditioning_preference: conditioning,
    }
  }

  fn make_lift(day: Weekday, label: &str) -> GeneratedWeek {
    GeneratedWeek {
      day,
      label: label.to_string(),
      focus_muscles: vec![],
      movement_priority: vec![],
      is_conditioning: false,
    }
  }

  fn labels(week: &[GeneratedWeek]) -> Vec<(Weekday, &str)> {
    week.iter().map(|d| (d.day, d.label.as_str())).collect()
  }

  fn assert_placement_rule(week: &[GeneratedWeek]) {
    for (idx, entry) in week.iter().enumerate() {
      if !entry.is_conditioning || idx == 0 || idx + 1 >= week.len() {
        continue;
      }
      assert!(
        !(week[idx - 1].is_heavy_lower() && week[idx + 1].is_heavy_lower()),
        "conditioning on {} sits between two lower days",
        entry.day
      );
    }
  }

  #[test]
  fn test_four_day_balanced() {
    let week = generate_weekly_structure(&TrainingProgram::default());
    assert_eq!(
      labels(&week),
      vec![(Mon, "Upper A"), (Tue, "Lower A"), (Thu, "Upper B"), (Fri, "Lower B")]
    );
    assert_eq!(week[1].movement_priority, vec![M::Squat, M::Lunge, M::Isolation, M::Core]);
  }

  #[test]
  fn test_template_lookup_by_days_and_emphasis() {
    let none = ConditioningPreference::None;
    let full_body = generate_weekly_structure(&make_program(3, Emphasis::UpperBody, none));
    assert_eq!(full_body.len(), 3);
    assert_eq!(full_body[2].label, "Full Body C");

    let glutes = generate_weekly_structure(&make_program(5, Emphasis::GlutesLegs, none));
    assert_eq!(glutes[0].label, "Lower (Glute/Quad)");
    assert_eq!(glutes[4].day, Sat);

    let ppl = generate_weekly_structure(&make_program(6, Emphasis::PushBias, none));
    assert_eq!(ppl.len(), 6);
    assert_eq!(ppl[5].label, "Legs");

    let balanced_five = generate_weekly_structure(&make_program(5, Emphasis::Balanced, none));
    assert_eq!(balanced_five[4].label, "Upper/Conditioning");
  }

  #[test]
  fn test_invalid_days_fall_back_to_balanced_five() {
    for days in [0, 1, 2, 7, 200] {
      let week = generate_weekly_structure(&make_program(days, Emphasis::Unrecognized, ConditioningPreference::None));
      assert_eq!(week.len(), 5);
      assert_eq!(week[0].label, "Upper A");
      assert_eq!(week[4].label, "Upper/Conditioning");
    }
  }

  #[test]
  fn test_templates_have_unique_weekdays() {
    for template in [FULL_BODY, UPPER_LOWER, GLUTE_FOCUS, PUSH_PULL_LEGS, BALANCED_FIVE] {
      let days: HashSet<Weekday> = template.iter().map(|d| d.day).collect();
      assert_eq!(days.len(), template.len());
      assert!(days.iter().all(|d| *d != Weekday::Sun));
    }
  }

  #[test]
  fn test_conditioning_one_day() {
    let program = make_program(4, Emphasis::Balanced, ConditioningPreference::OneDay);
    let week = generate_weekly_structure(&program);

    assert_eq!(week.len(), 5);
    assert_eq!(week[2].day, Wed);
    assert!(week[2].is_conditioning);
    assert_eq!(week[2].focus_muscles, vec![P::Core, P::Calves]);
    assert_eq!(week[2].movement_priority, vec![M::Carry, M::Core, M::Isolation]);
  }

  #[test]
  fn test_conditioning_two_days_uses_slot_order() {
    let program = make_program(4, Emphasis::Balanced, ConditioningPreference::TwoDays);
    let week = generate_weekly_structure(&program);

    let conditioning: Vec<Weekday> = week.iter().filter(|d| d.is_conditioning).map(|d| d.day).collect();
    assert_eq!(conditioning, vec![Wed, Sat]);
    assert_placement_rule(&week);
  }

  #[test]
  fn test_conditioning_may_place_fewer_days() {
    let glutes = make_program(5, Emphasis::GlutesLegs, ConditioningPreference::TwoDays);
    let week = generate_weekly_structure(&glutes);
    let conditioning: Vec<Weekday> = week.iter().filter(|d| d.is_conditioning).map(|d| d.day).collect();
    assert_eq!(conditioning, vec![Thu]);

    let ppl = make_program(6, Emphasis::Balanced, ConditioningPreference::TwoDays);
    assert!(generate_weekly_structure(&ppl).iter().all(|d| !d.is_conditioning));
  }

  #[test]
  fn test_conditioning_never_between_lower_days() {
    let week = vec![
      make_lift(Mon, "Upper"),
      make_lift(Tue, "Lower A"),
      make_lift(Thu, "Legs"),
      make_lift(Sat, "Upper"),
    ];
    let result = insert_conditioning_days(week, 2);

    let conditioning: Vec<Weekday> = result.iter().filter(|d| d.is_conditioning).map(|d| d.day).collect();
    assert_eq!(conditioning, vec![Fri]);
    assert_placement_rule(&result);

    let days: HashSet<Weekday> = result.iter().map(|d| d.day).collect();
    assert_eq!(days.len(), result.len());
  }

  #[test]
  fn test_generation_is_deterministic() {
    let program = make_program(5, Emphasis::GlutesLegs, ConditioningPreference::OneDay);
    assert_eq!(generate_weekly_structure(&program), generate_weekly_structure(&program));
  }

  #[test]
  fn test_full_week_fills_rest_days() {
    let program = make_program(4, Emphasis::Balanced, ConditioningPreference::OneDay);
    let week = full_week_structure(&program);

    let types: Vec<DayType> = week.iter().map(|d| d.day_type).collect();
    assert_eq!(
      types,
      vec![
        DayType::Lift,
        DayType::Lift,
        DayType::Conditioning,
        DayType::Lift,
        DayType::Lift,
        DayType::Rest,
        DayType::Rest,
      ]
    );
    assert_eq!(week[6].label, "Sunday");
    assert_eq!(week[6].focus, "Rest & Recovery");
    assert_eq!(week[0].focus, "Upper A");
    assert!(week.iter().enumerate().all(|(i, d)| d.day_index == i));
  }

  #[test]
  fn test_today_structure_falls_back_to_first_day() {
    let program = TrainingProgram::default();
    assert_eq!(today_structure(&program, Thu).unwrap().label, "Upper B");
    assert_eq!(today_structure(&program, Weekday::Sun).unwrap().label, "Upper A");
  }
}
