//! User preferences: interval lengths, auto-start behaviour and theme.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Accepted work duration in minutes. Enforced by callers, not by [`Settings`].
pub const WORK_MINUTES: std::ops::RangeInclusive<u32> = 1..=60;
/// Accepted break duration in minutes. Enforced by callers, not by [`Settings`].
pub const BREAK_MINUTES: std::ops::RangeInclusive<u32> = 1..=30;

/// Colour scheme applied to the terminal interface.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    #[default]
    TomatoRed,
    MintGreen,
    MidnightDark,
}

impl Theme {
    /// The theme after this one, wrapping around.
    pub fn next(self) -> Theme {
        match self {
            Theme::TomatoRed => Theme::MintGreen,
            Theme::MintGreen => Theme::MidnightDark,
            Theme::MidnightDark => Theme::TomatoRed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::TomatoRed => "Tomato Red",
            Theme::MintGreen => "Mint Green",
            Theme::MidnightDark => "Midnight Dark",
        }
    }
}

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Work interval in minutes.
    pub work_duration: u32,
    /// Break interval in minutes.
    pub break_duration: u32,
    pub auto_start_break: bool,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            work_duration: 25,
            break_duration: 5,
            auto_start_break: true,
            theme: Theme::TomatoRed,
        }
    }
}

/// A partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub work_duration: Option<u32>,
    pub break_duration: Option<u32>,
    pub auto_start_break: Option<bool>,
    pub theme: Option<Theme>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}

impl Settings {
    /// Shallow-merge `patch` over the current values.
    ///
    /// Returns true if any field actually changed.
    pub fn apply(&mut self, patch: &SettingsPatch) -> bool {
        let before = self.clone();
        if let Some(minutes) = patch.work_duration {
            self.work_duration = minutes;
        }
        if let Some(minutes) = patch.break_duration {
            self.break_duration = minutes;
        }
        if let Some(auto) = patch.auto_start_break {
            self.auto_start_break = auto;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        *self != before
    }

    /// Configured length of `mode` in minutes.
    pub fn minutes(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_duration,
            TimerMode::Break => self.break_duration,
        }
    }

    /// Configured length of `mode` in seconds.
    pub fn duration_secs(&self, mode: TimerMode) -> u32 {
        self.minutes(mode).saturating_mul(60)
    }
}

/// Whether `minutes` is an acceptable duration for `mode`.
pub fn duration_in_range(mode: TimerMode, minutes: u32) -> bool {
    match mode {
        TimerMode::Work => WORK_MINUTES.contains(&minutes),
        TimerMode::Break => BREAK_MINUTES.contains(&minutes),
    }
}
