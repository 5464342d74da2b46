//! Program definitions - repeating multi-day training cycles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::SplitType;

/// How a program exercise is measured
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ExerciseKind {
    #[default]
    WeightReps, // Sets x reps
    Hold,       // Timed hold (false grip hang, L-sit)
}

/// One prescribed exercise inside a workout day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgramExercise {
    pub name: String,
    pub sets: u32,
    /// Free text target, e.g. "6-8", "3-5", "15 each"
    pub reps: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub kind: ExerciseKind,
    pub target_hold_secs: Option<u32>,
}

impl ProgramExercise {
    pub fn new(name: &str, sets: u32, reps: &str) -> Self {
        Self {
            name: name.to_string(),
            sets,
            reps: reps.to_string(),
            notes: None,
            kind: ExerciseKind::WeightReps,
            target_hold_secs: None,
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    pub fn hold(mut self, secs: u32) -> Self {
        self.kind = ExerciseKind::Hold;
        self.target_hold_secs = Some(secs);
        self
    }
}

/// One slot of the training cycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDay {
    pub day_number: u32,
    pub name: String,
    pub description: String,
    pub exercises: Vec<ProgramExercise>,
    pub estimated_duration_mins: u32,
    pub template_id: Option<String>,
    pub is_rest_day: bool,
}

impl WorkoutDay {
    pub fn training(day_number: u32, name: &str, description: &str, exercises: Vec<ProgramExercise>) -> Self {
        Self {
            day_number,
            name: name.to_string(),
            description: description.to_string(),
            exercises,
            estimated_duration_mins: 0,
            template_id: None,
            is_rest_day: false,
        }
    }

    /// Rest day - never carries exercises
    pub fn rest(day_number: u32, name: &str) -> Self {
        Self {
            day_number,
            name: name.to_string(),
            description: "Rest day".to_string(),
            exercises: Vec::new(),
            estimated_duration_mins: 0,
            template_id: None,
            is_rest_day: true,
        }
    }

    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProgramCategory {
    Calisthenics,
    Strength,
    Hypertrophy,
    Skill,
    Split,
}

impl ProgramCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ProgramCategory::Calisthenics => "Calisthenics",
            ProgramCategory::Strength => "Strength",
            ProgramCategory::Hypertrophy => "Hypertrophy",
            ProgramCategory::Skill => "Skill Progression",
            ProgramCategory::Split => "Split",
        }
    }
}

/// Ordered, cyclic list of workout days
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutProgram {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ProgramCategory,
    /// e.g. "2-3 cycles per week"
    pub frequency: String,
    pub split: Option<SplitType>,
    pub days: Vec<WorkoutDay>,
}

impl WorkoutProgram {
    /// Length of one cycle
    pub fn cycle_len(&self) -> usize {
        self.days.len()
    }

    /// Only programs with at least one day can be activated
    pub fn is_activatable(&self) -> bool {
        !self.days.is_empty()
    }

    pub fn training_days(&self) -> usize {
        self.days.iter().filter(|d| !d.is_rest_day).count()
    }
}

/// Binding of the user to one program, anchored at the day the cycle began
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveProgram {
    pub program_id: String,
    pub start_date: DateTime<Utc>,
    pub last_workout_date: Option<DateTime<Utc>>,
}

impl ActiveProgram {
    pub fn new(program_id: &str, start_date: DateTime<Utc>) -> Self {
        Self {
            program_id: program_id.to_string(),
            start_date,
            last_workout_date: None,
        }
    }

    pub fn is_for(&self, program: &WorkoutProgram) -> bool {
        self.program_id == program.id
    }
}
