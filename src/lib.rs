//! ascend - Workout program scheduler
//!
//! Maps calendar dates onto the days of a repeating training program and
//! tracks which dates were done.

pub mod calendar;
pub mod catalog;
pub mod db;
pub mod program;
pub mod progress;
pub mod schedule;
pub mod tui;

pub use db::Database;
pub use schedule::{CompletionOracle, ScheduleResolver};
