//! Command implementations for the CLI interface.
//!
//! Each handler works on a loaded [`Session`], so the CLI goes through the
//! same transitions and persistence as the terminal UI.

use std::io::{self, Write};
use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::error::PomoError;
use crate::session::Session;
use crate::settings::{Settings, SettingsPatch, Theme};
use crate::stats::{format_clock, Stats};
use crate::store::KeyValueStore;
use crate::task::{Task, TaskPatch};
use crate::task_list::TaskList;
use crate::timer::TimerMode;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive terminal interface.
    Ui,

    /// Add a new task at the top of the list.
    Add {
        /// Task text.
        text: String,
    },

    /// List tasks. Active tasks are numbered by position.
    List {
        /// Include completed tasks.
        #[arg(long)]
        all: bool,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Replace the text of a task.
    Edit {
        /// Task id, active position, or exact text.
        id: String,
        /// New text.
        text: String,
    },

    /// Mark a task as completed.
    Done {
        /// Task id, active position, or exact text.
        id: String,
    },

    /// Delete a task.
    Delete {
        /// Task id, active position, or exact text.
        id: String,
    },

    /// Move an active task from one position to another (1-based).
    Move { from: usize, to: usize },

    /// Show or change preferences.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Show dashboard figures.
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Run the timer in the foreground until the cycle goes idle.
    Timer {
        /// Credit finished pomodoros to this task (id, position or text).
        #[arg(long)]
        task: Option<String>,
        /// Interval to start with.
        #[arg(long, value_enum, default_value_t = TimerMode::Work)]
        mode: TimerMode,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print current settings.
    Show,
    /// Change one or more settings.
    Set {
        /// Work interval in minutes.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=60))]
        work: Option<u32>,
        /// Break interval in minutes.
        #[arg(long = "break", value_parser = clap::value_parser!(u32).range(1..=30))]
        break_minutes: Option<u32>,
        /// Start the break automatically after a work interval.
        #[arg(long)]
        auto_start_break: Option<bool>,
        /// Colour theme.
        #[arg(long, value_enum)]
        theme: Option<Theme>,
    },
}

/// Resolve a task by id, 1-based active position, or case-insensitive text.
pub fn resolve_task(tasks: &TaskList, identifier: &str) -> Result<String, PomoError> {
    if let Some(task) = tasks.get(identifier) {
        return Ok(task.id.clone());
    }

    if let Ok(position) = identifier.parse::<usize>() {
        if let Some(task) = position.checked_sub(1).and_then(|i| tasks.active().nth(i)) {
            return Ok(task.id.clone());
        }
    }

    let needle = identifier.trim().to_lowercase();
    let matches: Vec<&Task> = tasks
        .tasks()
        .iter()
        .filter(|t| t.text.to_lowercase() == needle)
        .collect();
    match matches.len() {
        0 => Err(PomoError::TaskNotFound(identifier.to_string())),
        1 => Ok(matches[0].id.clone()),
        _ => {
            let mut msg = format!("multiple tasks named '{identifier}':");
            for task in matches {
                msg.push_str(&format!("\n  {} {}", task.id, task.text));
            }
            Err(PomoError::InvalidInput(msg))
        }
    }
}

/// One row of `pomo list`.
pub fn format_task_line(position: Option<usize>, task: &Task) -> String {
    let marker = if task.completed { "[x]" } else { "[ ]" };
    let position = position.map(|p| format!("{p:>3}.")).unwrap_or_else(|| "    ".to_string());
    let pomodoros = if task.pomodoros_completed > 0 {
        format!("  ({} pomodoro{})", task.pomodoros_completed, if task.pomodoros_completed == 1 { "" } else { "s" })
    } else {
        String::new()
    };
    format!("{position} {marker} {}{pomodoros}  #{}", task.text, task.id)
}

/// Human-readable settings block.
pub fn format_settings(settings: &Settings) -> String {
    format!(
        "Work duration:    {} min\nBreak duration:   {} min\nAuto-start break: {}\nTheme:            {}",
        settings.work_duration,
        settings.break_duration,
        if settings.auto_start_break { "on" } else { "off" },
        settings.theme.label()
    )
}

pub fn cmd_add<S: KeyValueStore>(session: &mut Session<S>, text: String) -> Result<(), PomoError> {
    match session.add_task(&text) {
        Some(id) => {
            println!("Added #{id}");
            Ok(())
        }
        None => Err(PomoError::InvalidInput("task text is empty".to_string())),
    }
}

pub fn cmd_list<S: KeyValueStore>(session: &Session<S>, all: bool, json: bool) -> Result<(), PomoError> {
    let tasks = session.tasks();
    if json {
        let selected: Vec<&Task> = tasks.tasks().iter().filter(|t| all || !t.completed).collect();
        let out = serde_json::to_string_pretty(&selected).map_err(crate::error::StoreError::from)?;
        println!("{out}");
        return Ok(());
    }

    let mut printed = 0;
    for (i, task) in tasks.active().enumerate() {
        println!("{}", format_task_line(Some(i + 1), task));
        printed += 1;
    }
    if all {
        for task in tasks.completed() {
            println!("{}", format_task_line(None, task));
            printed += 1;
        }
    }
    if printed == 0 {
        println!("No active tasks. Add one with `pomo add <text>`.");
    }
    Ok(())
}

pub fn cmd_edit<S: KeyValueStore>(session: &mut Session<S>, id: String, text: String) -> Result<(), PomoError> {
    let task_id = resolve_task(session.tasks(), &id)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(PomoError::InvalidInput("task text is empty".to_string()));
    }
    session.update_task(&task_id, TaskPatch::text(text));
    println!("Updated #{task_id}");
    Ok(())
}

pub fn cmd_done<S: KeyValueStore>(session: &mut Session<S>, id: String) -> Result<(), PomoError> {
    let task_id = resolve_task(session.tasks(), &id)?;
    if session.complete_task(&task_id) {
        println!("Marked done.");
    } else {
        println!("Task #{task_id} was already done.");
    }
    Ok(())
}

pub fn cmd_delete<S: KeyValueStore>(session: &mut Session<S>, id: String) -> Result<(), PomoError> {
    let task_id = resolve_task(session.tasks(), &id)?;
    session.delete_task(&task_id);
    println!("Deleted #{task_id}");
    Ok(())
}

pub fn cmd_move<S: KeyValueStore>(session: &mut Session<S>, from: usize, to: usize) -> Result<(), PomoError> {
    let active = session.tasks().active().count();
    let in_range = |p: usize| (1..=active).contains(&p);
    if !in_range(from) || !in_range(to) {
        return Err(PomoError::InvalidInput(format!(
            "positions must be between 1 and {active}"
        )));
    }
    session.reorder_tasks(from - 1, to - 1);
    println!("Moved {from} -> {to}");
    Ok(())
}

pub fn cmd_settings<S: KeyValueStore>(session: &mut Session<S>, action: SettingsAction) -> Result<(), PomoError> {
    match action {
        SettingsAction::Show => {}
        SettingsAction::Set {
            work,
            break_minutes,
            auto_start_break,
            theme,
        } => {
            let patch = SettingsPatch {
                work_duration: work,
                break_duration: break_minutes,
                auto_start_break,
                theme,
            };
            if patch.is_empty() {
                return Err(PomoError::InvalidInput("nothing to change".to_string()));
            }
            session.update_settings(&patch);
        }
    }
    println!("{}", format_settings(session.settings()));
    Ok(())
}

pub fn cmd_stats<S: KeyValueStore>(session: &Session<S>, json: bool) -> Result<(), PomoError> {
    let stats = Stats::collect(session.tasks(), session.timer(), Utc::now().date_naive());
    if json {
        let out = serde_json::to_string_pretty(&stats).map_err(crate::error::StoreError::from)?;
        println!("{out}");
    } else {
        println!("Active tasks:        {}", stats.active);
        println!("Completed today:     {}", stats.completed_today);
        println!("Pomodoros on tasks:  {}", stats.task_pomodoros);
        println!("Progress:            {}% ({}/{})", stats.completion_percent, stats.completed, stats.total);
    }
    Ok(())
}

/// Foreground countdown. Returns once a full cycle has finished and the
/// timer is idle again.
pub fn cmd_timer<S: KeyValueStore>(
    session: &mut Session<S>,
    task: Option<String>,
    mode: TimerMode,
) -> Result<(), PomoError> {
    let task_id = task.map(|t| resolve_task(session.tasks(), &t)).transpose()?;
    if let Some(id) = &task_id {
        if let Some(task) = session.tasks().get(id) {
            println!("Working on: {}", task.text);
        }
    }

    if mode != session.timer().mode {
        session.switch_mode(mode);
    }
    session.start_timer(task_id);

    let mut out = io::stdout();
    loop {
        let timer = session.timer();
        write!(out, "\r{:<5} {}  ", timer.mode.label(), format_clock(timer.time_remaining))?;
        out.flush()?;

        session.wait(Duration::from_millis(250));
        if !session.timer().is_running && !session.break_pending() {
            break;
        }
    }
    writeln!(out)?;

    let timer = session.timer();
    println!(
        "Timer idle in {} mode at {}. Pomodoros this run: {}",
        timer.mode.label(),
        format_clock(timer.time_remaining),
        timer.pomodoros_completed
    );
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
