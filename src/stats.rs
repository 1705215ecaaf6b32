//! Derived dashboard figures.

use chrono::NaiveDate;
use serde::Serialize;

use crate::settings::Settings;
use crate::task_list::TaskList;
use crate::timer::TimerState;

/// Summary shown above the task list and by `pomo stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub active: usize,
    pub completed: usize,
    pub completed_today: usize,
    pub total: usize,
    /// Pomodoros finished in this session.
    pub pomodoros: u32,
    pub daily_streak: u32,
    /// Pomodoros recorded across all stored tasks.
    pub task_pomodoros: u32,
    /// Completed share of all tasks, rounded to a whole percent.
    pub completion_percent: u8,
}

impl Stats {
    /// Collect figures for `today` (a UTC calendar date).
    pub fn collect(tasks: &TaskList, timer: &TimerState, today: NaiveDate) -> Self {
        let total = tasks.len();
        let completed = tasks.completed().count();
        let completed_today = tasks
            .completed()
            .filter(|t| t.completed_at.is_some_and(|at| at.date_naive() == today))
            .count();
        let task_pomodoros = tasks.tasks().iter().map(|t| t.pomodoros_completed).sum();

        Stats {
            active: total - completed,
            completed,
            completed_today,
            total,
            pomodoros: timer.pomodoros_completed,
            daily_streak: timer.daily_streak,
            task_pomodoros,
            completion_percent: completion_percent(completed, total),
        }
    }
}

/// `completed / total` as a rounded percentage; 0 for an empty list.
pub fn completion_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

/// Fraction of the current interval still remaining, in `0.0..=1.0`.
pub fn dial_progress(timer: &TimerState, settings: &Settings) -> f64 {
    let total = settings.duration_secs(timer.mode);
    if total == 0 {
        return 0.0;
    }
    (timer.time_remaining as f64 / total as f64).clamp(0.0, 1.0)
}

/// Render seconds as `MM:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_list::TaskAction;
    use crate::timer::{TimerAction, TimerMode};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn counts_active_completed_and_today() {
        let morning = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let mut tasks = TaskList::default();
        for (i, text) in ["a", "b", "c"].iter().enumerate() {
            tasks.apply(TaskAction::Add {
                text: text.to_string(),
                now: morning + Duration::seconds(i as i64),
            });
        }
        let ids: Vec<String> = tasks.tasks().iter().map(|t| t.id.clone()).collect();
        tasks.apply(TaskAction::Complete { id: ids[0].clone(), now: morning });
        tasks.apply(TaskAction::Complete {
            id: ids[1].clone(),
            now: morning - Duration::days(1),
        });
        tasks.apply(TaskAction::IncrementPomodoro { id: ids[2].clone() });

        let settings = Settings::default();
        let timer = TimerState::new(&settings);
        let stats = Stats::collect(&tasks, &timer, morning.date_naive());

        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.completed_today, 1);
        assert_eq!(stats.task_pomodoros, 1);
        assert_eq!(stats.completion_percent, 67);
    }

    #[test]
    fn empty_list_is_zero_percent() {
        assert_eq!(completion_percent(0, 0), 0);
        assert_eq!(completion_percent(1, 2), 50);
        assert_eq!(completion_percent(2, 2), 100);
    }

    #[test]
    fn dial_tracks_remaining_share() {
        let settings = Settings::default();
        let mut timer = TimerState::new(&settings);
        assert_eq!(dial_progress(&timer, &settings), 1.0);
        timer.apply(TimerAction::SwitchMode(TimerMode::Break), &settings);
        timer.apply(TimerAction::SetTime { minutes: 1 }, &settings);
        assert!((dial_progress(&timer, &settings) - 0.2).abs() < 1e-9);
        // A forced time above the configured length still fills the dial.
        timer.apply(TimerAction::SetTime { minutes: 60 }, &settings);
        assert_eq!(dial_progress(&timer, &settings), 1.0);
    }

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(0), "00:00");
    }
}
