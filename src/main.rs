//! # pomo - Pomodoro Todo for the terminal
//!
//! A task list paired with a work/break countdown timer, with a full CLI
//! and an interactive terminal user interface (TUI).
//!
//! ## Key Features
//!
//! - **Task List**: Add, edit, complete, delete and reorder tasks; newest on top
//! - **Pomodoro Timer**: Work and break intervals with an optional automatic break
//! - **Task Credit**: Finished work intervals are credited to the task being timed
//! - **Dashboard**: Active tasks, tasks completed today, pomodoros and progress
//! - **Local File Storage**: Tasks and settings persist as JSON in `~/.pomo/`
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI
//! pomo
//!
//! # Add a task via CLI
//! pomo add "Write the quarterly report"
//!
//! # Time the first active task
//! pomo timer --task 1
//!
//! # Shorter intervals, no automatic break
//! pomo settings set --work 20 --break 5 --auto-start-break false
//! ```
//!
//! ## Key Commands
//!
//! - `pomo ui` - Launch TUI (the default)
//! - `pomo add <text>` - Add a task
//! - `pomo list` - View active tasks, `--all` for completed ones too
//! - `pomo done <task>` - Mark a task complete
//! - `pomo move <from> <to>` - Reorder active tasks
//! - `pomo timer` - Run the countdown in the foreground
//! - `pomo stats` - Dashboard figures
//!
//! Tasks can be named by id, by position in `pomo list`, or by their text.
//! Set `POMO_DIR` or `--data-dir` to keep data somewhere other than `~/.pomo/`.

use clap::Parser;

pub mod chime;
pub mod cli;
pub mod clock;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod settings;
pub mod stats;
pub mod store;
pub mod task;
pub mod task_list;
pub mod timer;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use chime::{Chime, Silent, TerminalBell};
use cli::Cli;
use clock::ClockConfig;
use cmd::*;
use config::Config;
use error::PomoError;
use session::Session;
use store::JsonFileStore;

fn main() {
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir, &cli.log_level, cli.quiet);
    logging::init(&config);

    // Completions need no data directory.
    if let Some(Commands::Completions { shell }) = cli.command {
        cmd_completions(shell);
        return;
    }

    let store = match JsonFileStore::open(&config.data_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open data directory {}: {}", config.data_dir.display(), e);
            std::process::exit(1);
        }
    };
    tracing::debug!(dir = %config.data_dir.display(), "data directory opened");

    let chime: Box<dyn Chime> = if config.quiet {
        Box::new(Silent)
    } else {
        Box::new(TerminalBell)
    };
    let mut session = Session::load(store, chime, ClockConfig::default());

    let result = match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => tui::run::run_tui(session).map_err(PomoError::from),
        Commands::Add { text } => cmd_add(&mut session, text),
        Commands::List { all, json } => cmd_list(&session, all, json),
        Commands::Edit { id, text } => cmd_edit(&mut session, id, text),
        Commands::Done { id } => cmd_done(&mut session, id),
        Commands::Delete { id } => cmd_delete(&mut session, id),
        Commands::Move { from, to } => cmd_move(&mut session, from, to),
        Commands::Settings { action } => cmd_settings(&mut session, action),
        Commands::Stats { json } => cmd_stats(&session, json),
        Commands::Timer { task, mode } => cmd_timer(&mut session, task, mode),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
