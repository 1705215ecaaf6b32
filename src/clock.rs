//! Cancellable tick source and one-shot delay.
//!
//! A [`Ticker`] owns a background thread that sends [`ClockEvent`]s over a
//! channel. Dropping the handle cancels the thread and joins it. Each handle
//! is stamped with a generation so the receiver can discard events that were
//! already queued when the handle was dropped.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::trace;

/// Event emitted by a [`Ticker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// One timer period elapsed.
    Tick { generation: u64 },
    /// The auto-break delay elapsed.
    BreakDue { generation: u64 },
}

impl ClockEvent {
    pub fn generation(&self) -> u64 {
        match *self {
            ClockEvent::Tick { generation } | ClockEvent::BreakDue { generation } => generation,
        }
    }
}

/// Periods used by the session clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    /// Interval between ticks while the timer runs.
    pub tick: Duration,
    /// Pause between a finished work interval and the auto-started break.
    pub auto_break_delay: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            tick: Duration::from_secs(1),
            auto_break_delay: Duration::from_secs(1),
        }
    }
}

/// Handle to a running clock thread. Cancelled on drop.
#[derive(Debug)]
pub struct Ticker {
    generation: u64,
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Emit `ClockEvent::Tick` every `period` until dropped.
    pub fn every(period: Duration, generation: u64, events: Sender<ClockEvent>) -> io::Result<Self> {
        Self::spawn("pomo-tick", period, true, ClockEvent::Tick { generation }, events)
    }

    /// Emit `ClockEvent::BreakDue` once after `delay` unless dropped first.
    pub fn after(delay: Duration, generation: u64, events: Sender<ClockEvent>) -> io::Result<Self> {
        Self::spawn("pomo-break", delay, false, ClockEvent::BreakDue { generation }, events)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn spawn(
        name: &str,
        period: Duration,
        repeat: bool,
        event: ClockEvent,
        events: Sender<ClockEvent>,
    ) -> io::Result<Self> {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new().name(name.to_string()).spawn(move || {
            let mut deadline = Instant::now() + period;
            loop {
                let wait = deadline.saturating_duration_since(Instant::now());
                match cancel_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {
                        if events.send(event).is_err() || !repeat {
                            break;
                        }
                        deadline += period;
                    }
                    // Explicit cancel or the handle was dropped.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            trace!(?event, "clock thread finished");
        })?;

        Ok(Ticker {
            generation: event.generation(),
            cancel: Some(cancel_tx),
            handle: Some(handle),
        })
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        drop(self.cancel.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
