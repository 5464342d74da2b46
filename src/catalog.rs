//! Program catalog - built-in programs and split generators

use serde::{Deserialize, Serialize};

use crate::program::{ProgramCategory, ProgramExercise, WorkoutDay, WorkoutProgram};

/// Weekly split layouts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SplitType {
    PushPullLegs,
    ChestBackLegsShouldersArms,
    BackBicepsChestTricepsLegsShoulders,
    ChestBackLegsShouldersArms4Day,
    Custom,
}

impl SplitType {
    pub fn all() -> &'static [SplitType] {
        &[
            SplitType::PushPullLegs,
            SplitType::ChestBackLegsShouldersArms,
            SplitType::BackBicepsChestTricepsLegsShoulders,
            SplitType::ChestBackLegsShouldersArms4Day,
            SplitType::Custom,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SplitType::PushPullLegs => "Push/Pull/Legs",
            SplitType::ChestBackLegsShouldersArms => "Chest & Back/Legs/Shoulders & Arms",
            SplitType::BackBicepsChestTricepsLegsShoulders => "Back & Biceps/Chest & Triceps/Legs/Shoulders",
            SplitType::ChestBackLegsShouldersArms4Day => "Chest/Back/Legs/Shoulders & Arms",
            SplitType::Custom => "Custom",
        }
    }

    /// Day names of one 7-day cycle; custom splits define their own
    pub fn day_names(&self) -> &'static [&'static str] {
        match self {
            SplitType::PushPullLegs => &["Push", "Pull", "Legs", "Push", "Pull", "Legs", "Rest"],
            SplitType::ChestBackLegsShouldersArms => &[
                "Chest & Back",
                "Legs",
                "Shoulders & Arms",
                "Chest & Back",
                "Legs",
                "Shoulders & Arms",
                "Rest",
            ],
            SplitType::BackBicepsChestTricepsLegsShoulders => {
                &["Back & Biceps", "Chest & Triceps", "Legs", "Shoulders", "Rest", "Rest", "Rest"]
            }
            SplitType::ChestBackLegsShouldersArms4Day => {
                &["Chest", "Back", "Legs", "Shoulders & Arms", "Rest", "Rest", "Rest"]
            }
            SplitType::Custom => &[],
        }
    }

    pub fn workout_days(&self) -> usize {
        self.day_names().iter().filter(|n| **n != "Rest").count()
    }

    pub fn description(&self) -> &'static str {
        match self {
            SplitType::PushPullLegs => "6-day split: Push, Pull, Legs, Push, Pull, Legs, Rest",
            SplitType::ChestBackLegsShouldersArms => {
                "3-1-3 split: Chest & Back, Legs, Shoulders & Arms (repeated)"
            }
            SplitType::BackBicepsChestTricepsLegsShoulders => {
                "4-day split: Back & Biceps, Chest & Triceps, Legs, Shoulders"
            }
            SplitType::ChestBackLegsShouldersArms4Day => {
                "4-day split: Chest, Back, Legs, Shoulders & Arms"
            }
            SplitType::Custom => "Custom split with your own day structure",
        }
    }

    /// Parse from a CLI-friendly key ("ppl", "4day", ...)
    pub fn from_key(key: &str) -> Option<SplitType> {
        match key.to_lowercase().as_str() {
            "ppl" | "push-pull-legs" => Some(SplitType::PushPullLegs),
            "cb-l-sa" | "chest-back" => Some(SplitType::ChestBackLegsShouldersArms),
            "bb-ct-l-s" | "back-biceps" => Some(SplitType::BackBicepsChestTricepsLegsShoulders),
            "4day" | "c-b-l-sa" => Some(SplitType::ChestBackLegsShouldersArms4Day),
            "custom" => Some(SplitType::Custom),
            _ => None,
        }
    }
}

/// Stable id derived from a program name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Build a program from one of the predefined splits
pub fn program_from_split(name: &str, description: &str, split: SplitType, frequency: &str) -> WorkoutProgram {
    let days = split
        .day_names()
        .iter()
        .enumerate()
        .map(|(i, day_name)| {
            let n = i as u32 + 1;
            if *day_name == "Rest" {
                WorkoutDay::rest(n, day_name)
            } else {
                WorkoutDay::training(n, day_name, &format!("{} workout day", day_name), vec![])
            }
        })
        .collect();

    WorkoutProgram {
        id: slugify(name),
        name: name.to_string(),
        description: if description.is_empty() {
            split.description().to_string()
        } else {
            description.to_string()
        },
        category: ProgramCategory::Split,
        frequency: if frequency.is_empty() {
            "Follow the split schedule".to_string()
        } else {
            frequency.to_string()
        },
        split: Some(split),
        days,
    }
}

/// Build a program from user-supplied day names; names containing "rest" are rest days
pub fn custom_program(name: &str, description: &str, day_names: &[String]) -> WorkoutProgram {
    let days = day_names
        .iter()
        .enumerate()
        .map(|(i, day_name)| {
            let n = i as u32 + 1;
            if day_name.to_lowercase().contains("rest") {
                WorkoutDay::rest(n, day_name)
            } else {
                WorkoutDay::training(n, day_name, &format!("{} workout day", day_name), vec![])
            }
        })
        .collect();

    WorkoutProgram {
        id: slugify(name),
        name: name.to_string(),
        description: if description.is_empty() {
            "Custom split program".to_string()
        } else {
            description.to_string()
        },
        category: ProgramCategory::Split,
        frequency: "Follow the custom split schedule".to_string(),
        split: Some(SplitType::Custom),
        days,
    }
}

/// Programs shipped with the app
pub fn builtin_programs() -> Vec<WorkoutProgram> {
    let mut day1 = WorkoutDay::training(
        1,
        "Strength + Explosive Power",
        "Build pulling strength and explosive power for the muscle-up",
        vec![
            // Warm-up
            ProgramExercise::new("Scapular Pull-Ups", 2, "10").with_notes("Warm-up"),
            ProgramExercise::new("Band Shoulder Rotations", 2, "15 each").with_notes("Warm-up"),
            ProgramExercise::new("Light Explosive Dead Hang Pulls", 2, "5").with_notes("Warm-up"),
            // Pull strength
            ProgramExercise::new("Strict Pull-Ups", 4, "6-8")
                .with_notes("Full range, chest lifted, clean tempo. Progress when 8 reps feel easy."),
            ProgramExercise::new("High Pull-Ups (Chest-To-Bar)", 4, "3-5")
                .with_notes("Pull as high as possible."),
            // Explosiveness
            ProgramExercise::new("Explosive Pull-Ups", 3, "3-5").with_notes("Use bands if needed."),
            // Transition
            ProgramExercise::new("Jump-Assisted Muscle-Ups", 4, "3-5")
                .with_notes("Use low bar, jump lightly, focus on smooth transition."),
            ProgramExercise::new("Muscle-Up Negatives", 3, "2-3")
                .with_notes("Slowly lower through transition (3-5 seconds)."),
            // Accessory
            ProgramExercise::new("Straight Bar Dips", 4, "5-8").with_notes("Build the press-out portion."),
            ProgramExercise::new("Hanging Knee or L-Raises", 3, "10-12").with_notes("Core work"),
        ],
    );
    day1.estimated_duration_mins = 60;

    let mut day2 = WorkoutDay::training(
        2,
        "Technique + Strength Volume",
        "Focus on technique refinement and building strength volume",
        vec![
            ProgramExercise::new("False Grip Hangs", 2, "20s")
                .with_notes("Warm-up (optional)")
                .hold(20),
            ProgramExercise::new("Shoulder Band Warm-up", 2, "15").with_notes("Warm-up"),
            ProgramExercise::new("Slow Pull-Up Negatives", 3, "3").with_notes("8-10 second descent."),
            ProgramExercise::new("Transition Rows (Bar at Chest Height)", 3, "6-8")
                .with_notes("Feet in front, row into transition."),
            ProgramExercise::new("Pull-Ups (Volume Work)", 5, "5").with_notes("Controlled reps."),
            ProgramExercise::new("Bar Dips", 4, "8-10").with_notes("More volume, better lockout strength."),
            ProgramExercise::new("Band-Assisted Muscle-Ups", 3, "3-5")
                .with_notes("Level 1: focus on clean technique."),
            ProgramExercise::new("Explosive Chest-to-Bar Pull-Ups", 4, "3")
                .with_notes("Level 2: pull higher than Day 1."),
            ProgramExercise::new("Single Rep Muscle-Up Attempts", 6, "1")
                .with_notes("Level 3: rest 60-90s between attempts."),
            ProgramExercise::new("Front Lever Tuck Raises", 3, "5-8"),
            ProgramExercise::new("Toes-to-Bar or Knee Raises", 3, "8-12").with_notes("Core work"),
        ],
    );
    day2.estimated_duration_mins = 60;

    let muscle_up = WorkoutProgram {
        id: "muscle-up-split".to_string(),
        name: "2-Day Muscle-Up Progression Split".to_string(),
        description: "Alternate strength and technique days to build a clean bar muscle-up".to_string(),
        category: ProgramCategory::Skill,
        frequency: "2-3 cycles per week (e.g., Mon = Day 1, Thu = Day 2)".to_string(),
        split: None,
        days: vec![day1, day2],
    };

    vec![muscle_up, program_from_split("Push Pull Legs", "", SplitType::PushPullLegs, "")]
}
