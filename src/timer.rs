//! Work/break countdown state machine.
//!
//! [`TimerState::apply`] is a pure transition: it mutates the in-memory state
//! and returns the side effects the owner must carry out (ring the chime,
//! credit a task, schedule the delayed break). It never sleeps, spawns or
//! persists anything itself.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Phase of the timer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[default]
    Work,
    Break,
}

impl TimerMode {
    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Work => "Work",
            TimerMode::Break => "Break",
        }
    }
}

/// Intents accepted by the timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerAction {
    /// Begin counting down, optionally attaching a task.
    Start { task_id: Option<String> },
    Pause,
    /// Stop and rewind to the full length of the current mode.
    Reset,
    /// One second elapsed. Ignored unless running.
    Tick,
    SwitchMode(TimerMode),
    /// Force the remaining time, whether running or not.
    SetTime { minutes: u32 },
    /// Settings were updated; `previous` holds the values before the change.
    SettingsChanged { previous: Settings },
    /// The delay after a completed work interval elapsed with auto-start on.
    AutoBreakDue,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEffect {
    /// Ring the completion cue.
    PlayChime,
    /// Add one pomodoro to the task with this id.
    CreditTask(String),
    /// Dispatch [`TimerAction::AutoBreakDue`] after the auto-break delay.
    ScheduleAutoBreak,
}

/// Transient timer state. Not persisted across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub mode: TimerMode,
    /// Seconds left in the current interval.
    pub time_remaining: u32,
    pub is_running: bool,
    pub is_complete: bool,
    pub current_task_id: Option<String>,
    pub pomodoros_completed: u32,
    pub daily_streak: u32,
}

impl TimerState {
    /// Idle work timer at the configured work length.
    pub fn new(settings: &Settings) -> Self {
        TimerState {
            mode: TimerMode::Work,
            time_remaining: settings.duration_secs(TimerMode::Work),
            is_running: false,
            is_complete: false,
            current_task_id: None,
            pomodoros_completed: 0,
            daily_streak: 0,
        }
    }

    /// Whether the tick source should be live.
    pub fn is_ticking(&self) -> bool {
        self.is_running && !self.is_complete
    }

    /// Whether a completed work interval is waiting for the delayed break.
    pub fn awaiting_break(&self) -> bool {
        self.is_complete && self.mode == TimerMode::Work
    }

    /// Apply `action` under `settings` and return the effects to execute.
    pub fn apply(&mut self, action: TimerAction, settings: &Settings) -> Vec<TimerEffect> {
        match action {
            TimerAction::Start { task_id } => {
                if task_id.is_some() {
                    self.current_task_id = task_id;
                }
                // A finished work interval starts its break right away.
                if self.awaiting_break() {
                    self.switch_mode(TimerMode::Break, settings);
                }
                self.is_running = true;
                Vec::new()
            }
            TimerAction::Pause => {
                if self.awaiting_break() {
                    self.switch_mode(TimerMode::Break, settings);
                }
                self.is_running = false;
                Vec::new()
            }
            TimerAction::Reset => {
                self.is_running = false;
                self.is_complete = false;
                self.time_remaining = settings.duration_secs(self.mode);
                Vec::new()
            }
            TimerAction::Tick => self.tick(settings),
            TimerAction::SwitchMode(mode) => {
                self.switch_mode(mode, settings);
                Vec::new()
            }
            TimerAction::SetTime { minutes } => {
                self.time_remaining = minutes.saturating_mul(60);
                if self.time_remaining > 0 {
                    self.is_complete = false;
                }
                Vec::new()
            }
            TimerAction::SettingsChanged { previous } => {
                // A completed interval keeps 00:00 until its break takes over.
                let changed = previous.minutes(self.mode) != settings.minutes(self.mode);
                if changed && !self.is_running && !self.is_complete {
                    self.time_remaining = settings.duration_secs(self.mode);
                }
                Vec::new()
            }
            TimerAction::AutoBreakDue => {
                if self.awaiting_break() {
                    self.switch_mode(TimerMode::Break, settings);
                    self.is_running = true;
                }
                Vec::new()
            }
        }
    }

    fn tick(&mut self, settings: &Settings) -> Vec<TimerEffect> {
        if !self.is_ticking() {
            return Vec::new();
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.complete(settings)
        } else {
            Vec::new()
        }
    }

    fn switch_mode(&mut self, mode: TimerMode, settings: &Settings) {
        self.mode = mode;
        self.is_running = false;
        self.is_complete = false;
        self.time_remaining = settings.duration_secs(mode);
    }

    fn complete(&mut self, settings: &Settings) -> Vec<TimerEffect> {
        self.is_running = false;
        self.is_complete = true;

        let mut effects = vec![TimerEffect::PlayChime];
        match self.mode {
            TimerMode::Work => {
                if let Some(id) = &self.current_task_id {
                    effects.push(TimerEffect::CreditTask(id.clone()));
                }
                self.pomodoros_completed = self.pomodoros_completed.saturating_add(1);
                self.daily_streak = self.daily_streak.saturating_add(1);
                if settings.auto_start_break {
                    effects.push(TimerEffect::ScheduleAutoBreak);
                } else {
                    self.switch_mode(TimerMode::Break, settings);
                }
            }
            TimerMode::Break => self.switch_mode(TimerMode::Work, settings),
        }
        effects
    }
}
