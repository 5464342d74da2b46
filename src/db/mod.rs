//! Database module - SQLite storage for programs, activation and completion

use anyhow::{Context, Result, bail, ensure};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, warn};

use crate::calendar::Calendar;
use crate::catalog::builtin_programs;
use crate::program::{ActiveProgram, WorkoutProgram};
use crate::schedule::CompletionOracle;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// What a logged day was spent on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Workout,
    Rest,
}

impl ActivityKind {
    fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Workout => "workout",
            ActivityKind::Rest => "rest",
        }
    }
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database; a fresh database gets the built-in programs
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("failed to open database {}", path))?;
        let db = Self { conn };
        db.init_schema()?;
        db.seed_programs()?;
        info!(path, "database ready");
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS programs (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                data TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS active_program (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                program_id TEXT NOT NULL,
                start_date TEXT NOT NULL,
                last_workout_date TEXT
            );
            CREATE TABLE IF NOT EXISTS completions (
                program_id TEXT NOT NULL,
                date TEXT NOT NULL,
                PRIMARY KEY (program_id, date)
            );
            CREATE TABLE IF NOT EXISTS activity (
                date TEXT PRIMARY KEY,
                kind TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn seed_programs(&self) -> Result<()> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM programs", [], |row| row.get(0))?;
        if count == 0 {
            for program in builtin_programs() {
                self.create_program(&program)?;
            }
        }
        Ok(())
    }

    /// Insert a new program; an existing id is never overwritten
    pub fn create_program(&self, program: &WorkoutProgram) -> Result<()> {
        ensure!(!program.id.is_empty(), "program name '{}' has no usable characters", program.name);
        ensure!(
            self.get_program(&program.id)?.is_none(),
            "a program with id '{}' already exists",
            program.id
        );

        let data = serde_json::to_string(program)?;
        self.conn.execute(
            "INSERT INTO programs (id, name, data) VALUES (?1, ?2, ?3)",
            params![program.id, program.name, data],
        )?;
        info!(program = %program.id, days = program.days.len(), "program created");
        Ok(())
    }

    /// Replace a stored program's contents.
    ///
    /// The cycle length of the active program is fixed; changing it
    /// needs a new program.
    pub fn update_program(&self, program: &WorkoutProgram) -> Result<()> {
        let Some(stored) = self.get_program(&program.id)? else {
            bail!("no program with id '{}'", program.id);
        };
        let is_active = self.active_program()?.is_some_and(|a| a.is_for(program));
        ensure!(
            !is_active || stored.cycle_len() == program.cycle_len(),
            "cannot change the number of days of active program '{}'",
            program.id
        );

        let data = serde_json::to_string(program)?;
        self.conn.execute(
            "UPDATE programs SET name = ?2, data = ?3 WHERE id = ?1",
            params![program.id, program.name, data],
        )?;
        info!(program = %program.id, "program updated");
        Ok(())
    }

    /// Attach a reusable workout template to one day of a program
    pub fn assign_template(
        &self,
        program_id: &str,
        day_index: usize,
        template_id: &str,
        duration_mins: Option<u32>,
    ) -> Result<()> {
        ensure!(!template_id.trim().is_empty(), "template id must not be empty");
        let mut program = self.get_program(program_id)?.with_context(|| format!("no program with id '{}'", program_id))?;
        let len = program.cycle_len();
        let Some(day) = program.days.get_mut(day_index) else {
            bail!("day {} is out of range, '{}' has {} days", day_index + 1, program_id, len);
        };
        ensure!(!day.is_rest_day, "day {} is a rest day", day_index + 1);

        day.template_id = Some(template_id.trim().to_string());
        if let Some(mins) = duration_mins {
            day.estimated_duration_mins = mins;
        }
        self.update_program(&program)?;
        info!(program = program_id, day = day_index, template = template_id, "template assigned");
        Ok(())
    }

    /// Detach the template from a day; returns whether one was set
    pub fn remove_template(&self, program_id: &str, day_index: usize) -> Result<bool> {
        let mut program = self.get_program(program_id)?.with_context(|| format!("no program with id '{}'", program_id))?;
        let len = program.cycle_len();
        let Some(day) = program.days.get_mut(day_index) else {
            bail!("day {} is out of range, '{}' has {} days", day_index + 1, program_id, len);
        };

        let had_template = day.template_id.take().is_some();
        if had_template {
            self.update_program(&program)?;
            info!(program = program_id, day = day_index, "template removed");
        }
        Ok(had_template)
    }

    pub fn get_program(&self, id: &str) -> Result<Option<WorkoutProgram>> {
        let data: Option<String> = self
            .conn
            .query_row("SELECT data FROM programs WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?;

        data.map(|d| decode_program(&d)).transpose()
    }

    /// All programs ordered by name
    pub fn get_programs(&self) -> Result<Vec<WorkoutProgram>> {
        let mut stmt = self.conn.prepare("SELECT data FROM programs ORDER BY name")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter().map(|d| decode_program(d)).collect()
    }

    /// Delete a program; an activation pointing at it goes too
    pub fn delete_program(&self, id: &str) -> Result<bool> {
        let deleted = self.conn.execute("DELETE FROM programs WHERE id = ?1", params![id])? > 0;
        if deleted {
            self.conn
                .execute("DELETE FROM active_program WHERE program_id = ?1", params![id])?;
            info!(program = id, "program deleted");
        }
        Ok(deleted)
    }

    /// Bind the user to `program`, anchoring the cycle at `start_date`.
    ///
    /// Replaces any previous activation. Completions the program had on or
    /// after the first day of the new cycle are dropped, so a fresh cycle
    /// starts with nothing done.
    pub fn set_active_program(
        &self,
        program: &WorkoutProgram,
        start_date: DateTime<Utc>,
        calendar: &impl Calendar,
    ) -> Result<ActiveProgram> {
        ensure!(program.is_activatable(), "program '{}' has no days", program.name);

        let first_day = calendar.day_of(start_date);
        let cleared = self.conn.execute(
            "DELETE FROM completions WHERE program_id = ?1 AND date >= ?2",
            params![program.id, format_date(first_day)],
        )?;
        if cleared > 0 {
            debug!(program = %program.id, cleared, "dropped completions of the previous cycle");
        }

        self.conn.execute(
            "INSERT INTO active_program (id, program_id, start_date, last_workout_date) VALUES (1, ?1, ?2, NULL)
             ON CONFLICT(id) DO UPDATE SET program_id = excluded.program_id,
                start_date = excluded.start_date, last_workout_date = NULL",
            params![program.id, start_date.to_rfc3339()],
        )?;
        info!(program = %program.id, start = %start_date, "program activated");
        Ok(ActiveProgram::new(&program.id, start_date))
    }

    pub fn clear_active_program(&self) -> Result<()> {
        self.conn.execute("DELETE FROM active_program", [])?;
        info!("active program cleared");
        Ok(())
    }

    /// Current activation, dropped if its program no longer exists
    pub fn active_program(&self) -> Result<Option<ActiveProgram>> {
        let row: Option<(String, String, Option<String>)> = self
            .conn
            .query_row(
                "SELECT program_id, start_date, last_workout_date FROM active_program WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((program_id, start, last)) = row else {
            return Ok(None);
        };

        if self.get_program(&program_id)?.is_none() {
            warn!(program = %program_id, "active program no longer exists, clearing");
            self.clear_active_program()?;
            return Ok(None);
        }

        Ok(Some(ActiveProgram {
            program_id,
            start_date: parse_instant(&start)?,
            last_workout_date: last.as_deref().map(parse_instant).transpose()?,
        }))
    }

    pub fn mark_completed(&self, program_id: &str, day: NaiveDate) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO completions (program_id, date) VALUES (?1, ?2)",
            params![program_id, format_date(day)],
        )?;
        info!(program = program_id, %day, "day marked completed");
        Ok(())
    }

    pub fn unmark_completed(&self, program_id: &str, day: NaiveDate) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM completions WHERE program_id = ?1 AND date = ?2",
            params![program_id, format_date(day)],
        )? > 0;
        info!(program = program_id, %day, removed, "day unmarked");
        Ok(removed)
    }

    pub fn is_completed(&self, program_id: &str, day: NaiveDate) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM completions WHERE program_id = ?1 AND date = ?2",
                params![program_id, format_date(day)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Completed dates of a program, oldest first
    pub fn completed_dates(&self, program_id: &str) -> Result<Vec<NaiveDate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT date FROM completions WHERE program_id = ?1 ORDER BY date")?;
        let rows = stmt
            .query_map(params![program_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter().map(|d| parse_date(d)).collect()
    }

    /// Log a workout on `day`; also completes that date of the active program
    pub fn record_workout(&self, day: NaiveDate, at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "INSERT INTO activity (date, kind) VALUES (?1, ?2)
             ON CONFLICT(date) DO UPDATE SET kind = excluded.kind",
            params![format_date(day), ActivityKind::Workout.as_str()],
        )?;
        info!(%day, "workout recorded");

        if let Some(active) = self.active_program()? {
            self.mark_completed(&active.program_id, day)?;
            self.conn.execute(
                "UPDATE active_program SET last_workout_date = ?1 WHERE id = 1",
                params![at.to_rfc3339()],
            )?;
        }
        Ok(())
    }

    /// Log a rest day; a day that already has activity is left alone
    pub fn record_rest_day(&self, day: NaiveDate) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO activity (date, kind) VALUES (?1, ?2)",
            params![format_date(day), ActivityKind::Rest.as_str()],
        )? > 0;
        if inserted {
            info!(%day, "rest day recorded");
        } else {
            debug!(%day, "rest day ignored, date already logged");
        }
        Ok(inserted)
    }

    /// Logged dates of one kind, oldest first
    pub fn activity_dates(&self, kind: ActivityKind) -> Result<Vec<NaiveDate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT date FROM activity WHERE kind = ?1 ORDER BY date")?;
        let rows = stmt
            .query_map(params![kind.as_str()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter().map(|d| parse_date(d)).collect()
    }
}

impl CompletionOracle for Database {
    fn is_date_completed(&self, program_id: &str, day: NaiveDate) -> bool {
        self.is_completed(program_id, day).unwrap_or_else(|e| {
            warn!(error = %e, program = program_id, %day, "completion lookup failed");
            false
        })
    }
}

fn decode_program(data: &str) -> Result<WorkoutProgram> {
    serde_json::from_str(data).context("failed to decode stored program")
}

fn format_date(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).with_context(|| format!("bad stored date {}", s))
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("bad stored timestamp {}", s))?
        .with_timezone(&Utc))
}
