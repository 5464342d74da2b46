//! TUI module - weekly program calendar with ratatui

use anyhow::Result;
use chrono::Datelike;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use std::io::{Stdout, stdout};

use crate::calendar::{Calendar, SystemClock};
use crate::db::{ActivityKind, Database};
use crate::program::{ActiveProgram, WorkoutProgram};
use crate::progress::Streaks;
use crate::schedule::{DEFAULT_HORIZON_DAYS, ScheduleResolver, ScheduledDate};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Weeks ahead the calendar may scroll before wrapping back to the current week
const MAX_WEEK_OFFSET: i64 = 4;

/// App state for TUI
pub struct App<C: Calendar> {
    db: Database,
    resolver: ScheduleResolver<C, SystemClock>,
    program: Option<WorkoutProgram>,
    active: Option<ActiveProgram>,
    streaks: Streaks,
    week_offset: i64,
    selected: usize,
    status: String,
    should_quit: bool,
}

impl<C: Calendar> App<C> {
    pub fn new(db: Database, calendar: C) -> Result<Self> {
        let resolver = ScheduleResolver::new(calendar, SystemClock);
        let selected = resolver.today().weekday().num_days_from_monday() as usize;
        let mut app = Self {
            db,
            resolver,
            program: None,
            active: None,
            streaks: Streaks::default(),
            week_offset: 0,
            selected,
            status: String::new(),
            should_quit: false,
        };
        app.refresh()?;
        Ok(app)
    }

    /// Reload activation, program and streaks from the database
    fn refresh(&mut self) -> Result<()> {
        self.active = self.db.active_program()?;
        self.program = match &self.active {
            Some(active) => self.db.get_program(&active.program_id)?,
            None => None,
        };

        let workouts = self.db.activity_dates(ActivityKind::Workout)?;
        let rest = self.db.activity_dates(ActivityKind::Rest)?;
        self.streaks = Streaks::from_dates(&workouts, &rest, self.resolver.today());
        Ok(())
    }

    /// Run the TUI application; the terminal is restored even when the loop fails
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        restoring(|| self.event_loop(&mut terminal), restore_terminal)
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(11),
                Constraint::Length(4),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let title = match &self.program {
            Some(p) => format!("Ascend - {}", p.name),
            None => "Ascend - no active program".to_string(),
        };
        let header = Paragraph::new(title)
            .style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        match (&self.program, &self.active) {
            (Some(program), Some(active)) => {
                let week = self
                    .resolver
                    .week(program, active, &self.db, self.week_offset)
                    .unwrap_or_default();
                frame.render_widget(self.week_table(&week), chunks[1]);
                frame.render_widget(self.summary(program, active), chunks[2]);
            }
            _ => {
                let hint = Paragraph::new("Activate a program with `ascend activate <id>`")
                    .block(Block::default().borders(Borders::ALL).title("Week"));
                frame.render_widget(hint, chunks[1]);
            }
        }

        // Footer
        let footer_text = if self.status.is_empty() {
            "q: quit | ←/→: week | ↑/↓: day | space: done | r: refresh".to_string()
        } else {
            self.status.clone()
        };
        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[3]);
    }

    fn week_table(&self, week: &[ScheduledDate<'_>]) -> Table<'static> {
        let rows: Vec<Row> = week
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let name = d.day.map(|day| day.name.clone()).unwrap_or_else(|| "-".to_string());
                let kind = if d.is_rest_day() { "rest" } else { "train" };
                let done = if d.completed { "✓" } else { "" };
                let marker = if d.is_today { "today" } else { "" };

                let mut style = Style::default();
                if d.is_today {
                    style = style.fg(Color::Yellow);
                }
                if i == self.selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }

                Row::new(vec![
                    Cell::from(d.date.format("%a %Y-%m-%d").to_string()),
                    Cell::from(d.index.map(|idx| format!("Day {}", idx + 1)).unwrap_or_default()),
                    Cell::from(name),
                    Cell::from(kind),
                    Cell::from(done),
                    Cell::from(marker),
                ])
                .style(style)
            })
            .collect();

        let title = match self.week_offset {
            0 => "This week".to_string(),
            n => format!("Week {:+}", n),
        };

        Table::new(
            rows,
            [
                Constraint::Length(16),
                Constraint::Length(8),
                Constraint::Min(20),
                Constraint::Length(6),
                Constraint::Length(5),
                Constraint::Length(6),
            ],
        )
        .header(Row::new(vec!["Date", "Slot", "Workout", "Type", "Done", ""]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title(title))
    }

    fn summary(&self, program: &WorkoutProgram, active: &ActiveProgram) -> Paragraph<'static> {
        let today = match self.resolver.current_day(program, active) {
            Some(day) if day.is_rest_day => "Today: rest".to_string(),
            Some(day) => format!("Today: {} ({} exercises)", day.name, day.exercises.len()),
            None => "Today: -".to_string(),
        };
        let next = match self.resolver.next_workout(program, active, DEFAULT_HORIZON_DAYS) {
            Some((date, day)) => format!("Next: {} on {}", day.name, date.format("%a %d %b")),
            None => "Next: none this week".to_string(),
        };

        let lines = vec![
            Line::from(format!("{} | {}", today, next)),
            Line::from(format!(
                "Streak: {} days (best {})",
                self.streaks.current, self.streaks.longest
            )),
        ];
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Progress"))
    }

    fn toggle_selected(&mut self) -> Result<()> {
        let (Some(program), Some(active)) = (&self.program, &self.active) else {
            return Ok(());
        };
        let week = self
            .resolver
            .week(program, active, &self.db, self.week_offset)
            .unwrap_or_default();
        let Some(cell) = week.get(self.selected) else {
            return Ok(());
        };

        let (date, completed) = (cell.date, cell.completed);
        let program_id = program.id.clone();
        if completed {
            self.db.unmark_completed(&program_id, date)?;
            self.status = format!("{} unmarked", date);
        } else {
            self.db.mark_completed(&program_id, date)?;
            self.status = format!("{} marked done", date);
        }
        Ok(())
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.status.clear();
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('r') => self.refresh()?,
                KeyCode::Char(' ') => self.toggle_selected()?,
                KeyCode::Right => {
                    self.week_offset += 1;
                    if self.week_offset > MAX_WEEK_OFFSET {
                        self.week_offset = 0;
                    }
                }
                KeyCode::Left => self.week_offset -= 1,
                KeyCode::Down => self.selected = (self.selected + 1) % 7,
                KeyCode::Up => self.selected = (self.selected + 6) % 7,
                _ => {}
            }
        }
        Ok(())
    }
}

/// Run `body`, then always `restore`; an error from `body` wins over one from `restore`
fn restoring<T>(body: impl FnOnce() -> Result<T>, restore: impl FnOnce() -> Result<()>) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
