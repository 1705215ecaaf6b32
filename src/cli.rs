use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Task list with a Pomodoro work/break timer.
/// Data lives in ~/.pomo unless --data-dir or POMO_DIR says otherwise.
#[derive(Parser)]
#[command(name = "pomo", version, about = "Pomodoro timer and task list for the terminal")]
pub struct Cli {
    /// Directory holding tasks, settings and the log file.
    #[arg(long, global = true, env = "POMO_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log level written to the log file (RUST_LOG overrides).
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Do not ring the terminal bell when an interval finishes.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Defaults to `ui`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
