pub mod exercise;
pub mod program;
pub mod snapshot;
pub mod workout;

pub use exercise::{
  Category, Difficulty, Equipment, Exercise, ExerciseDefinition, MovementPattern, PreviousSet,
  PrimaryMuscle, SetField, SetLog, WorkoutSectionType,
};
pub use program::{
  ConditioningPreference, DayType, Emphasis, GeneratedWeek, TrainingGoal, TrainingProgram,
  TrainingProgramUpdate, WeekDay, WEEK_DAYS,
};
pub use snapshot::AppSnapshot;
pub use workout::{Workout, WorkoutBlock, WorkoutBlockType};
