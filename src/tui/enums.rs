//! Enumerations for TUI state management.

/// What keystrokes are currently feeding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Shortcuts are live.
    None,
    /// Typing the text of a new task.
    AddTask,
    /// Typing replacement text for the task with this id.
    EditTask(String),
}

impl InputMode {
    /// Whether a text field has focus, which suppresses shortcuts.
    pub fn is_text(&self) -> bool {
        !matches!(self, InputMode::None)
    }
}

/// Rows of the settings panel, top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsField {
    WorkDuration,
    BreakDuration,
    AutoStartBreak,
    Theme,
}

impl SettingsField {
    pub const ALL: [SettingsField; 4] = [
        SettingsField::WorkDuration,
        SettingsField::BreakDuration,
        SettingsField::AutoStartBreak,
        SettingsField::Theme,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::WorkDuration => "Work Duration (minutes)",
            SettingsField::BreakDuration => "Break Duration (minutes)",
            SettingsField::AutoStartBreak => "Auto-start Breaks",
            SettingsField::Theme => "Theme",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
