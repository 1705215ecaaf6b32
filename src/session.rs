//! Application root: owns every piece of state and the clock.
//!
//! Each intent runs in two explicit steps. First the pure transition on
//! [`TaskList`], [`Settings`] or [`TimerState`]; then the side effects and a
//! best-effort snapshot to the store. The tick source is reconciled after
//! every timer transition so that exactly one [`Ticker`] exists while the
//! timer is running and none otherwise.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::chime::Chime;
use crate::clock::{ClockConfig, ClockEvent, Ticker};
use crate::settings::{Settings, SettingsPatch};
use crate::store::{self, KeyValueStore, SETTINGS_KEY, TASKS_KEY};
use crate::task::{Task, TaskPatch};
use crate::task_list::{TaskAction, TaskList};
use crate::timer::{TimerAction, TimerEffect, TimerMode, TimerState};

pub struct Session<S: KeyValueStore> {
    store: S,
    chime: Box<dyn Chime>,
    clock: ClockConfig,
    settings: Settings,
    tasks: TaskList,
    timer: TimerState,
    events_tx: Sender<ClockEvent>,
    events_rx: Receiver<ClockEvent>,
    ticker: Option<Ticker>,
    break_delay: Option<Ticker>,
    next_generation: u64,
}

impl<S: KeyValueStore> Session<S> {
    /// Read settings and tasks from `store` and start with an idle work timer.
    pub fn load(store: S, chime: Box<dyn Chime>, clock: ClockConfig) -> Self {
        let settings: Settings = store::load_or(&store, SETTINGS_KEY, Settings::default());
        let stored: Vec<Task> = store::load_or(&store, TASKS_KEY, Vec::new());
        let mut tasks = TaskList::default();
        tasks.apply(TaskAction::Set(stored));
        let timer = TimerState::new(&settings);
        let (events_tx, events_rx) = mpsc::channel();
        debug!(tasks = tasks.len(), ?settings, "session loaded");

        Session {
            store,
            chime,
            clock,
            settings,
            tasks,
            timer,
            events_tx,
            events_rx,
            ticker: None,
            break_delay: None,
            next_generation: 1,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a tick source is currently alive.
    pub fn has_ticker(&self) -> bool {
        self.ticker.is_some()
    }

    /// Whether the delayed auto-break is armed.
    pub fn break_pending(&self) -> bool {
        self.break_delay.is_some()
    }

    // Tasks

    /// Add a task and return its id, or `None` if the text was blank.
    pub fn add_task(&mut self, text: &str) -> Option<String> {
        let changed = self.dispatch_tasks(TaskAction::Add {
            text: text.to_string(),
            now: Utc::now(),
        });
        if changed {
            self.tasks.tasks().first().map(|t| t.id.clone())
        } else {
            None
        }
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> bool {
        self.dispatch_tasks(TaskAction::Update {
            id: id.to_string(),
            patch,
        })
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        self.dispatch_tasks(TaskAction::Delete { id: id.to_string() })
    }

    pub fn complete_task(&mut self, id: &str) -> bool {
        self.dispatch_tasks(TaskAction::Complete {
            id: id.to_string(),
            now: Utc::now(),
        })
    }

    /// Move an active task; indices are positions among incomplete tasks.
    pub fn reorder_tasks(&mut self, source: usize, destination: usize) -> bool {
        self.dispatch_tasks(TaskAction::Reorder {
            source,
            destination,
        })
    }

    pub fn increment_pomodoro(&mut self, id: &str) -> bool {
        self.dispatch_tasks(TaskAction::IncrementPomodoro { id: id.to_string() })
    }

    fn dispatch_tasks(&mut self, action: TaskAction) -> bool {
        debug!(?action, "task action");
        let changed = self.tasks.apply(action);
        if changed {
            self.persist_tasks();
        }
        changed
    }

    // Settings

    /// Merge `patch` into the settings. Durations are not range checked here.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> bool {
        let previous = self.settings.clone();
        if !self.settings.apply(patch) {
            return false;
        }
        self.persist_settings();
        self.dispatch_timer(TimerAction::SettingsChanged { previous });
        true
    }

    // Timer

    pub fn start_timer(&mut self, task_id: Option<String>) {
        self.user_timer_action(TimerAction::Start { task_id });
    }

    pub fn pause_timer(&mut self) {
        self.user_timer_action(TimerAction::Pause);
    }

    /// Start if paused, pause if running.
    pub fn toggle_timer(&mut self) {
        if self.timer.is_running {
            self.pause_timer();
        } else {
            self.start_timer(None);
        }
    }

    pub fn reset_timer(&mut self) {
        self.user_timer_action(TimerAction::Reset);
    }

    pub fn switch_mode(&mut self, mode: TimerMode) {
        self.user_timer_action(TimerAction::SwitchMode(mode));
    }

    pub fn set_time(&mut self, minutes: u32) {
        self.user_timer_action(TimerAction::SetTime { minutes });
    }

    /// Explicit user transitions override a pending auto-break.
    fn user_timer_action(&mut self, action: TimerAction) {
        if self.break_delay.take().is_some() {
            debug!("pending auto-break cancelled");
        }
        self.dispatch_timer(action);
    }

    fn dispatch_timer(&mut self, action: TimerAction) {
        let effects = self.timer.apply(action, &self.settings);
        for effect in effects {
            self.run_effect(effect);
        }
        self.reconcile_ticker();
    }

    fn run_effect(&mut self, effect: TimerEffect) {
        match effect {
            TimerEffect::PlayChime => {
                info!(mode = ?self.timer.mode, "interval finished");
                if let Err(e) = self.chime.ring() {
                    warn!(error = %e, "failed to play completion sound");
                }
            }
            TimerEffect::CreditTask(id) => {
                if !self.increment_pomodoro(&id) {
                    debug!(task = %id, "finished pomodoro for a task that no longer exists");
                }
            }
            TimerEffect::ScheduleAutoBreak => {
                let generation = self.take_generation();
                match Ticker::after(self.clock.auto_break_delay, generation, self.events_tx.clone()) {
                    Ok(delay) => self.break_delay = Some(delay),
                    Err(e) => {
                        warn!(error = %e, "failed to schedule break, starting it now");
                        self.timer.apply(TimerAction::AutoBreakDue, &self.settings);
                    }
                }
            }
        }
    }

    /// Keep exactly one ticker alive while the timer is counting down.
    fn reconcile_ticker(&mut self) {
        match (self.timer.is_ticking(), self.ticker.is_some()) {
            (true, false) => {
                let generation = self.take_generation();
                match Ticker::every(self.clock.tick, generation, self.events_tx.clone()) {
                    Ok(ticker) => self.ticker = Some(ticker),
                    Err(e) => {
                        warn!(error = %e, "failed to start tick source, pausing timer");
                        self.timer.apply(TimerAction::Pause, &self.settings);
                    }
                }
            }
            (false, true) => self.ticker = None,
            _ => {}
        }
    }

    fn take_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    // Clock events

    /// Apply a clock event if it belongs to a live handle. Returns true when applied.
    pub fn handle_clock_event(&mut self, event: ClockEvent) -> bool {
        match event {
            ClockEvent::Tick { generation } => {
                let live = self.ticker.as_ref().map(Ticker::generation) == Some(generation);
                if live {
                    self.dispatch_timer(TimerAction::Tick);
                }
                live
            }
            ClockEvent::BreakDue { generation } => {
                let live = self.break_delay.as_ref().map(Ticker::generation) == Some(generation);
                if live {
                    self.break_delay = None;
                    self.dispatch_timer(TimerAction::AutoBreakDue);
                }
                live
            }
        }
    }

    /// Apply every queued clock event without blocking.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.events_rx.try_recv() {
                Ok(event) => {
                    if self.handle_clock_event(event) {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return applied,
            }
        }
    }

    /// Block up to `timeout` for one clock event, then drain the rest.
    pub fn wait(&mut self, timeout: Duration) -> usize {
        match self.events_rx.recv_timeout(timeout) {
            Ok(event) => usize::from(self.handle_clock_event(event)) + self.pump(),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    /// Stop the clock. Also happens on drop.
    pub fn shutdown(&mut self) {
        self.ticker = None;
        self.break_delay = None;
    }

    // Persistence

    fn persist_tasks(&self) {
        if let Err(e) = store::save(&self.store, TASKS_KEY, &self.tasks) {
            warn!(error = %e, "failed to save tasks");
        }
    }

    fn persist_settings(&self) {
        if let Err(e) = store::save(&self.store, SETTINGS_KEY, &self.settings) {
            warn!(error = %e, "failed to save settings");
        }
    }
}
