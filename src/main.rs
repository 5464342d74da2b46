//! ascend - Workout program scheduler

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ascend::calendar::{Calendar, Clock, LocalCalendar, SystemClock, UtcCalendar};
use ascend::catalog::{SplitType, custom_program, program_from_split};
use ascend::db::{ActivityKind, Database};
use ascend::program::{ActiveProgram, ExerciseKind, WorkoutProgram};
use ascend::progress::{Streaks, weekly_frequency};
use ascend::schedule::{DEFAULT_HORIZON_DAYS, ScheduleResolver};
use ascend::tui::App;

#[derive(Parser)]
#[command(name = "ascend")]
#[command(author, version, about = "Workout program scheduler")]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "ASCEND_DB", default_value = "ascend.db")]
    db: String,

    /// Use UTC calendar days instead of the local time zone
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open weekly calendar dashboard
    Tui,

    /// List available programs
    Programs,

    /// List predefined splits
    Splits,

    /// Show a program's days and exercises
    Show {
        /// Program id
        id: String,
    },

    /// Create a program from a predefined split
    CreateSplit {
        name: String,

        /// ppl, cb-l-sa, bb-ct-l-s or 4day
        #[arg(short, long)]
        split: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(short, long, default_value = "")]
        frequency: String,
    },

    /// Create a program from your own day names (days containing "rest" are rest days)
    CreateCustom {
        name: String,

        /// Comma-separated day names, e.g. "Upper,Lower,Rest"
        #[arg(long, value_delimiter = ',')]
        days: Vec<String>,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Attach a workout template to a training day
    AssignTemplate {
        /// Program id
        id: String,

        /// Day number (1-based)
        #[arg(long)]
        day: usize,

        #[arg(short, long)]
        template: String,

        /// Estimated duration in minutes
        #[arg(long)]
        duration: Option<u32>,
    },

    /// Detach the template from a day
    ClearTemplate {
        id: String,

        #[arg(long)]
        day: usize,
    },

    /// Delete a program
    Delete { id: String },

    /// Start a program today
    Activate { id: String },

    /// Stop following the active program
    Deactivate,

    /// Show today's and the next workout
    Today,

    /// Show a week of the active program
    Week {
        /// Weeks relative to the current one
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        offset: i64,
    },

    /// Mark a date of the active program as done
    Done {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Remove the done mark from a date
    Undo {
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Log a workout
    Log {
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Log a rest day
    Rest {
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show streaks and training frequency
    Streak,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db = Database::open(&cli.db)?;

    if cli.utc {
        run(cli.command, db, UtcCalendar::utc())
    } else {
        run(cli.command, db, LocalCalendar::local())
    }
}

fn run<C: Calendar>(command: Option<Commands>, db: Database, calendar: C) -> Result<()> {
    match command {
        None | Some(Commands::Tui) => {
            let mut app = App::new(db, calendar)?;
            app.run()?;
        }

        Some(Commands::Programs) => {
            let active = db.active_program()?;
            println!("Programs:");
            println!("{:-<70}", "");
            for p in db.get_programs()? {
                let marker = if active.as_ref().is_some_and(|a| a.is_for(&p)) { "*" } else { " " };
                println!(
                    "{} {:24} | {:18} | {} days | {}",
                    marker,
                    p.id,
                    p.category.label(),
                    p.days.len(),
                    p.name
                );
            }
        }

        Some(Commands::Splits) => {
            for split in SplitType::all() {
                println!("{:40} | {}", split.label(), split.description());
            }
        }

        Some(Commands::Show { id }) => {
            let program = require_program(&db, &id)?;
            match program.split {
                Some(split) => println!("{} ({}, {})", program.name, program.category.label(), split.label()),
                None => println!("{} ({})", program.name, program.category.label()),
            }
            println!("{}", program.description);
            println!("Frequency: {}", program.frequency);
            println!("Training days: {}/{}", program.training_days(), program.cycle_len());
            println!("{:-<60}", "");
            for day in &program.days {
                if day.is_rest_day {
                    println!("Day {}: {} (rest)", day.day_number, day.name);
                    continue;
                }
                let mut line = format!("Day {}: {} - {} sets", day.day_number, day.name, day.total_sets());
                if day.estimated_duration_mins > 0 {
                    line.push_str(&format!(", ~{} min", day.estimated_duration_mins));
                }
                if let Some(template) = &day.template_id {
                    line.push_str(&format!(" [template: {}]", template));
                }
                println!("{}", line);
                for ex in &day.exercises {
                    let target = match (ex.kind, ex.target_hold_secs) {
                        (ExerciseKind::Hold, Some(secs)) => format!("{}x{}s hold", ex.sets, secs),
                        _ => format!("{}x{}", ex.sets, ex.reps),
                    };
                    println!("    {:40} {:12} {}", ex.name, target, ex.notes.as_deref().unwrap_or(""));
                }
            }
        }

        Some(Commands::CreateSplit { name, split, description, frequency }) => {
            let split = SplitType::from_key(&split).with_context(|| format!("unknown split '{}'", split))?;
            if split == SplitType::Custom {
                bail!("use create-custom for custom splits");
            }
            let program = program_from_split(&name, &description, split, &frequency);
            db.create_program(&program)?;
            println!("Created: {} (id: {})", program.name, program.id);
        }

        Some(Commands::CreateCustom { name, days, description }) => {
            let program = custom_program(&name, &description, &days);
            if !program.is_activatable() {
                bail!("a program needs at least one day");
            }
            db.create_program(&program)?;
            println!("Created: {} (id: {}, {} days)", program.name, program.id, program.days.len());
        }

        Some(Commands::AssignTemplate { id, day, template, duration }) => {
            let index = day.checked_sub(1).context("days are numbered from 1")?;
            db.assign_template(&id, index, &template, duration)?;
            println!("Day {} of {} now uses template {}", day, id, template);
        }

        Some(Commands::ClearTemplate { id, day }) => {
            let index = day.checked_sub(1).context("days are numbered from 1")?;
            if db.remove_template(&id, index)? {
                println!("Template removed from day {} of {}", day, id);
            } else {
                println!("Day {} of {} has no template", day, id);
            }
        }

        Some(Commands::Delete { id }) => {
            if db.delete_program(&id)? {
                println!("Deleted: {}", id);
            } else {
                println!("No program with id {}", id);
            }
        }

        Some(Commands::Activate { id }) => {
            let program = require_program(&db, &id)?;
            let start = calendar.start_of_day(SystemClock.now());
            db.set_active_program(&program, start, &calendar)?;
            println!("Active: {} from {}", program.name, calendar.day_of(start));
        }

        Some(Commands::Deactivate) => {
            db.clear_active_program()?;
            println!("No active program");
        }

        Some(Commands::Today) => {
            let resolver = ScheduleResolver::new(calendar, SystemClock);
            let (program, active) = require_active(&db)?;

            match resolver.current_day(&program, &active) {
                Some(day) if day.is_rest_day => println!("Today: rest day"),
                Some(day) => {
                    println!("Today: {} - {}", day.name, day.description);
                    for ex in &day.exercises {
                        println!("    {} {}x{}", ex.name, ex.sets, ex.reps);
                    }
                }
                None => println!("Today: nothing scheduled"),
            }
            if resolver.is_completed(SystemClock.now(), &program, &db) {
                println!("Done ✓");
            }
            match resolver.next_workout(&program, &active, DEFAULT_HORIZON_DAYS) {
                Some((date, day)) => println!("Next: {} on {}", day.name, date.format("%a %Y-%m-%d")),
                None => println!("Next: no workout in the next {} days", DEFAULT_HORIZON_DAYS),
            }
        }

        Some(Commands::Week { offset }) => {
            let resolver = ScheduleResolver::new(calendar, SystemClock);
            let (program, active) = require_active(&db)?;

            let week = resolver
                .week(&program, &active, &db, offset)
                .with_context(|| format!("week offset {} is out of range", offset))?;

            println!("{}", program.name);
            println!("{:-<50}", "");
            for d in week {
                let name = d.day.map(|day| day.name.as_str()).unwrap_or("-");
                println!(
                    "{} {} | {:24} | {}{}",
                    if d.is_today { ">" } else { " " },
                    d.date.format("%a %Y-%m-%d"),
                    name,
                    if d.is_rest_day() { "rest " } else { "" },
                    if d.completed { "✓" } else { "" }
                );
            }
        }

        Some(Commands::Done { date }) => {
            let (program, _) = require_active(&db)?;
            let day = date.unwrap_or_else(|| calendar.day_of(SystemClock.now()));
            db.mark_completed(&program.id, day)?;
            println!("Marked {} done", day);
        }

        Some(Commands::Undo { date }) => {
            let (program, _) = require_active(&db)?;
            let day = date.unwrap_or_else(|| calendar.day_of(SystemClock.now()));
            if db.unmark_completed(&program.id, day)? {
                println!("Unmarked {}", day);
            } else {
                println!("{} was not marked", day);
            }
        }

        Some(Commands::Log { date }) => {
            let now = SystemClock.now();
            let day = date.unwrap_or_else(|| calendar.day_of(now));
            db.record_workout(day, now)?;
            println!("Logged workout on {}", day);
        }

        Some(Commands::Rest { date }) => {
            let day = date.unwrap_or_else(|| calendar.day_of(SystemClock.now()));
            if db.record_rest_day(day)? {
                println!("Logged rest day on {}", day);
            } else {
                println!("{} already logged", day);
            }
        }

        Some(Commands::Streak) => {
            let today = calendar.day_of(SystemClock.now());
            let workouts = db.activity_dates(ActivityKind::Workout)?;
            let rest = db.activity_dates(ActivityKind::Rest)?;
            let streaks = Streaks::from_dates(&workouts, &rest, today);

            println!("Current streak: {} days", streaks.current);
            println!("Longest streak: {} days", streaks.longest);
            println!("Weekly frequency: {:.1} sessions/week", weekly_frequency(&workouts));
        }
    }

    Ok(())
}

fn require_program(db: &Database, id: &str) -> Result<WorkoutProgram> {
    db.get_program(id)?.with_context(|| format!("no program with id '{}'", id))
}

fn require_active(db: &Database) -> Result<(WorkoutProgram, ActiveProgram)> {
    let Some(active) = db.active_program()? else {
        bail!("no active program, run `ascend activate <id>`");
    };
    let program = require_program(db, &active.program_id)?;
    Ok((program, active))
}
