//! Main application logic for the terminal user interface.
//!
//! `App` wraps a [`Session`], turns key presses into session intents and
//! renders the dashboard, the task list and the timer and settings panels.
//! The event loop also drains clock events so ticks land between key presses.

use std::io;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Tabs},
    Frame, Terminal,
};

use crate::session::Session;
use crate::settings::{duration_in_range, SettingsPatch};
use crate::stats::{dial_progress, format_clock, Stats};
use crate::store::KeyValueStore;
use crate::task::{Task, TaskPatch};
use crate::timer::TimerMode;
use crate::tui::{
    colors::{mode_color, palette},
    enums::{InputMode, SettingsField},
    input::InputField,
    utils::centered_rect,
};

/// Main application state for the terminal user interface.
pub struct App<S: KeyValueStore> {
    session: Session<S>,
    task_list_state: TableState,
    show_completed: bool,
    timer_open: bool,
    settings_open: bool,
    settings_field: SettingsField,
    input_mode: InputMode,
    input: InputField,
    status_message: String,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(session: Session<S>) -> Self {
        let mut app = App {
            session,
            task_list_state: TableState::default(),
            show_completed: false,
            timer_open: false,
            settings_open: false,
            settings_field: SettingsField::WorkDuration,
            input_mode: InputMode::None,
            input: InputField::new(),
            status_message: String::new(),
        };
        app.clamp_selection();
        app
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Stop the clock before the terminal is handed back.
    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }

    /// Tasks in display order: active first, then completed when shown.
    fn visible_tasks(&self) -> Vec<&Task> {
        let tasks = self.session.tasks();
        let mut rows: Vec<&Task> = tasks.active().collect();
        if self.show_completed {
            rows.extend(tasks.completed());
        }
        rows
    }

    fn selected_task(&self) -> Option<&Task> {
        let index = self.task_list_state.selected()?;
        self.visible_tasks().get(index).copied()
    }

    fn selected_id(&self) -> Option<String> {
        self.selected_task().map(|t| t.id.clone())
    }

    fn select_id(&mut self, id: &str) {
        let index = self.visible_tasks().iter().position(|t| t.id == id);
        self.task_list_state.select(index);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        let selected = match (self.task_list_state.selected(), len) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(i), len) => Some(i.min(len - 1)),
        };
        self.task_list_state.select(selected);
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Handle a single key press. Returns true if the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        self.status_message.clear();

        if self.input_mode.is_text() {
            self.handle_text_input(key.code);
            return false;
        }
        if self.settings_open && self.handle_settings_input(key.code) {
            return false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.settings_open || self.timer_open {
                    self.settings_open = false;
                    self.timer_open = false;
                } else {
                    return true;
                }
            }
            KeyCode::Char(' ') => self.timer_open = !self.timer_open,
            KeyCode::Char('s') => self.settings_open = !self.settings_open,
            KeyCode::Char('c') => {
                self.show_completed = !self.show_completed;
                self.clamp_selection();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(i) = self.task_list_state.selected() {
                    self.task_list_state.select(Some(i.saturating_sub(1)));
                }
                self.clamp_selection();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let next = self.task_list_state.selected().map_or(0, |i| i + 1);
                self.task_list_state.select(Some(next));
                self.clamp_selection();
            }
            KeyCode::Char('K') => self.move_selected(-1),
            KeyCode::Char('J') => self.move_selected(1),
            KeyCode::Char('a') => {
                self.input = InputField::new();
                self.input_mode = InputMode::AddTask;
            }
            KeyCode::Char('e') => match self.selected_task() {
                Some(task) if !task.completed => {
                    let (id, text) = (task.id.clone(), task.text.clone());
                    self.input = InputField::with_value(&text);
                    self.input_mode = InputMode::EditTask(id);
                }
                Some(_) => self.set_status_message("Completed tasks cannot be edited"),
                None => {}
            },
            KeyCode::Char('x') => {
                if let Some(id) = self.selected_id() {
                    if self.session.complete_task(&id) {
                        self.set_status_message("Task completed");
                    }
                    self.clamp_selection();
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.session.delete_task(&id);
                    self.set_status_message("Task deleted");
                    self.clamp_selection();
                }
            }
            KeyCode::Char('t') => match self.selected_task() {
                Some(task) if !task.completed => {
                    let id = task.id.clone();
                    self.session.start_timer(Some(id));
                    self.timer_open = true;
                }
                _ => self.set_status_message("Select an active task to time"),
            },
            KeyCode::Char('p') => self.session.toggle_timer(),
            KeyCode::Char('r') => self.session.reset_timer(),
            KeyCode::Char('w') => self.session.switch_mode(TimerMode::Work),
            KeyCode::Char('b') => self.session.switch_mode(TimerMode::Break),
            _ => {}
        }
        false
    }

    fn handle_text_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.input_mode = InputMode::None;
                self.input = InputField::new();
            }
            KeyCode::Enter => {
                let text = self.input.value.trim().to_string();
                // Blank text keeps the field open, like an empty submit.
                if text.is_empty() {
                    return;
                }
                match std::mem::replace(&mut self.input_mode, InputMode::None) {
                    InputMode::AddTask => {
                        if let Some(id) = self.session.add_task(&text) {
                            self.select_id(&id);
                        }
                    }
                    InputMode::EditTask(id) => {
                        self.session.update_task(&id, TaskPatch::text(text));
                    }
                    InputMode::None => {}
                }
                self.input.take();
            }
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.home(),
            KeyCode::End => self.input.end(),
            KeyCode::Char(c) => self.input.handle_char(c),
            _ => {}
        }
    }

    /// Keys owned by the settings panel. Returns true if consumed.
    fn handle_settings_input(&mut self, key: KeyCode) -> bool {
        let step: i64 = match key {
            KeyCode::Up => {
                self.settings_field = self.settings_field.prev();
                return true;
            }
            KeyCode::Down | KeyCode::Tab => {
                self.settings_field = self.settings_field.next();
                return true;
            }
            KeyCode::Left | KeyCode::Char('-') => -1,
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Enter => 1,
            _ => return false,
        };

        let settings = self.session.settings().clone();
        let patch = match self.settings_field {
            SettingsField::WorkDuration => {
                match step_minutes(TimerMode::Work, settings.work_duration, step) {
                    Some(minutes) => SettingsPatch {
                        work_duration: Some(minutes),
                        ..Default::default()
                    },
                    None => return true,
                }
            }
            SettingsField::BreakDuration => {
                match step_minutes(TimerMode::Break, settings.break_duration, step) {
                    Some(minutes) => SettingsPatch {
                        break_duration: Some(minutes),
                        ..Default::default()
                    },
                    None => return true,
                }
            }
            SettingsField::AutoStartBreak => SettingsPatch {
                auto_start_break: Some(!settings.auto_start_break),
                ..Default::default()
            },
            SettingsField::Theme => SettingsPatch {
                theme: Some(settings.theme.next()),
                ..Default::default()
            },
        };
        self.session.update_settings(&patch);
        true
    }

    /// Move the selected active task up (-1) or down (+1) in the active order.
    fn move_selected(&mut self, delta: isize) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(source) = self.session.tasks().active_index_of(&id) else {
            self.set_status_message("Only active tasks can be moved");
            return;
        };
        let Some(destination) = source.checked_add_signed(delta) else {
            return;
        };
        if self.session.reorder_tasks(source, destination) {
            self.select_id(&id);
        }
    }

    /// Render the dashboard header: stats and today's progress.
    fn render_dashboard(&self, f: &mut Frame, area: Rect) {
        let colors = palette(self.session.settings().theme);
        let stats = Stats::collect(self.session.tasks(), self.session.timer(), Utc::now().date_naive());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3)])
            .split(area);

        let line = Line::from(vec![
            Span::styled("POMODORO TODO", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("   "),
            Span::styled(format!("Tasks {} active", stats.active), Style::default().fg(colors.accent)),
            Span::raw("   "),
            Span::styled(
                format!("Completed {} today", stats.completed_today),
                Style::default().fg(colors.accent),
            ),
            Span::raw("   "),
            Span::styled(
                format!("Pomodoros {} completed", stats.pomodoros),
                Style::default().fg(colors.accent),
            ),
        ]);
        let header = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Today's Progress"))
            .gauge_style(Style::default().fg(colors.primary).bg(colors.secondary))
            .percent(u16::from(stats.completion_percent.min(100)))
            .label(format!("{}%", stats.completion_percent));
        f.render_widget(gauge, chunks[1]);
    }

    /// Render the task table.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let colors = palette(self.session.settings().theme);
        let current = self.session.timer().current_task_id.clone();

        let header = Row::new(["", "Task", "Pomodoros"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().bg(colors.primary).fg(Color::White))
        .height(1);

        let rows: Vec<Row> = self
            .visible_tasks()
            .into_iter()
            .map(|task| {
                let marker = if task.completed { "[x]" } else { "[ ]" };
                let pomodoros = if task.pomodoros_completed > 0 {
                    task.pomodoros_completed.to_string()
                } else {
                    String::new()
                };
                let mut style = Style::default();
                if task.completed {
                    style = style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
                } else if current.as_deref() == Some(task.id.as_str()) {
                    style = style.fg(colors.accent).add_modifier(Modifier::BOLD);
                }
                Row::new(vec![
                    Cell::from(marker),
                    Cell::from(task.text.clone()),
                    Cell::from(pomodoros),
                ])
                .style(style)
            })
            .collect();

        let completed = self.session.tasks().completed().count();
        let title = if completed == 0 {
            "Active Tasks".to_string()
        } else if self.show_completed {
            format!("Tasks (c: hide completed {completed})")
        } else {
            format!("Active Tasks (c: show completed {completed})")
        };

        let table = Table::new(
            rows,
            [Constraint::Length(3), Constraint::Min(10), Constraint::Length(10)],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

        f.render_stateful_widget(table, area, &mut self.task_list_state);

        // Below the border and header row, if the table has room for it.
        if self.session.tasks().active().next().is_none() && !self.show_completed && area.height >= 4 {
            let inner = Rect {
                x: area.x.saturating_add(2),
                y: area.y + 2,
                width: area.width.saturating_sub(4),
                height: 1,
            }
            .intersection(area);
            f.render_widget(Paragraph::new("No active tasks. Press 'a' to add one!"), inner);
        }
    }

    /// Render the input line when adding or editing.
    fn render_input(&self, f: &mut Frame, area: Rect) {
        let title = match self.input_mode {
            InputMode::AddTask => "Add Task (Enter to save, Esc to cancel)",
            InputMode::EditTask(_) => "Edit Task (Enter to save, Esc to cancel)",
            InputMode::None => return,
        };
        let popup = Rect {
            x: area.x + 2,
            y: area.y + area.height.saturating_sub(3) / 2,
            width: area.width.saturating_sub(4),
            height: 3.min(area.height),
        }
        .intersection(area);
        f.render_widget(Clear, popup);
        f.render_widget(
            Paragraph::new(self.input.value.as_str())
                .block(Block::default().borders(Borders::ALL).title(title)),
            popup,
        );
        let prefix: String = self.input.value.chars().take(self.input.cursor).collect();
        let offset = Line::from(prefix).width() as u16;
        f.set_cursor_position((popup.x + 1 + offset.min(popup.width.saturating_sub(3)), popup.y + 1));
    }

    /// Render the timer panel: mode tabs, countdown, dial and controls.
    fn render_timer(&self, f: &mut Frame, area: Rect) {
        let timer = self.session.timer();
        let settings = self.session.settings();
        let dial = mode_color(timer.mode);

        let popup = centered_rect(60, 60, area);
        f.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Timer (space to close)")
            .border_style(Style::default().fg(dial));
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let selected = match timer.mode {
            TimerMode::Work => 0,
            TimerMode::Break => 1,
        };
        let tabs = Tabs::new(vec!["Work (w)", "Break (b)"])
            .select(selected)
            .highlight_style(Style::default().fg(dial).add_modifier(Modifier::BOLD));
        f.render_widget(tabs, chunks[0]);

        let task_line = timer
            .current_task_id
            .as_deref()
            .and_then(|id| self.session.tasks().get(id))
            .map(|t| format!("Task: {}", t.text))
            .unwrap_or_default();
        f.render_widget(Paragraph::new(task_line).alignment(Alignment::Center), chunks[1]);

        let clock = Paragraph::new(Line::from(Span::styled(
            format_clock(timer.time_remaining),
            Style::default().fg(dial).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE));
        f.render_widget(clock, chunks[2]);

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(dial))
            .ratio(dial_progress(timer, settings))
            .label("");
        f.render_widget(gauge, chunks[3]);

        let controls = if timer.is_running {
            "p Pause   r Reset"
        } else {
            "p Start   r Reset"
        };
        f.render_widget(Paragraph::new(controls).alignment(Alignment::Center), chunks[4]);

        let status = match timer.mode {
            TimerMode::Work => "Focus on your task!",
            TimerMode::Break => "Take a short break.",
        };
        f.render_widget(
            Paragraph::new(status)
                .alignment(Alignment::Center)
                .style(Style::default().add_modifier(Modifier::ITALIC)),
            chunks[5],
        );
    }

    /// Render the settings panel.
    fn render_settings(&self, f: &mut Frame, area: Rect) {
        let settings = self.session.settings();
        let colors = palette(settings.theme);
        let popup = centered_rect(50, 50, area);
        f.render_widget(Clear, popup);

        let mut lines = Vec::new();
        for field in SettingsField::ALL {
            let value = match field {
                SettingsField::WorkDuration => format!("< {} >", settings.work_duration),
                SettingsField::BreakDuration => format!("< {} >", settings.break_duration),
                SettingsField::AutoStartBreak => {
                    let flag = if settings.auto_start_break { "[on]" } else { "[off]" };
                    flag.to_string()
                }
                SettingsField::Theme => format!("< {} >", settings.theme.label()),
            };
            let style = if field == self.settings_field {
                Style::default().fg(colors.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{:<26}", field.label()), style),
                Span::styled(value, style),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from("↑/↓ select   ←/→ change   s close"));

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Settings")
                .border_style(Style::default().fg(colors.primary)),
        );
        f.render_widget(paragraph, popup);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let colors = palette(self.session.settings().theme);
        let timer = self.session.timer();
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            let state = if timer.is_running {
                "running"
            } else if self.session.break_pending() {
                "break starting"
            } else {
                "paused"
            };
            format!(
                "{} {} ({}) | a add  e edit  x done  d delete  J/K move  t time task  space timer  s settings  q quit",
                timer.mode.label(),
                format_clock(timer.time_remaining),
                state
            )
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(colors.primary).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let colors = palette(self.session.settings().theme);
        f.render_widget(
            Block::default().style(Style::default().bg(colors.background).fg(colors.text)),
            f.area(),
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        self.render_dashboard(f, chunks[0]);
        self.render_task_list(f, chunks[1]);
        if self.timer_open {
            self.render_timer(f, chunks[1]);
        }
        if self.settings_open {
            self.render_settings(f, chunks[1]);
        }
        self.render_input(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);
    }

    /// Poll for one key event, then apply any pending clock events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if self.handle_key(key) {
                    return Ok(true);
                }
            }
        }
        self.session.pump();
        Ok(false)
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// Step a duration by `delta`, or `None` if the result leaves the allowed range.
fn step_minutes(mode: TimerMode, current: u32, delta: i64) -> Option<u32> {
    let next = u32::try_from(i64::from(current) + delta).ok()?;
    duration_in_range(mode, next).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chime::Silent;
    use crate::clock::ClockConfig;
    use crate::settings::Theme;
    use crate::store::MemoryStore;
    use ratatui::backend::TestBackend;

    fn app() -> App<MemoryStore> {
        App::new(Session::load(MemoryStore::new(), Box::new(Silent), ClockConfig::default()))
    }

    fn press(app: &mut App<MemoryStore>, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App<MemoryStore>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add(app: &mut App<MemoryStore>, text: &str) {
        press(app, KeyCode::Char('a'));
        type_text(app, text);
        press(app, KeyCode::Enter);
    }

    fn texts(app: &App<MemoryStore>) -> Vec<String> {
        app.session().tasks().active().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn shortcuts_toggle_panels() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.timer_open);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.timer_open);
        press(&mut app, KeyCode::Char('s'));
        assert!(app.settings_open);
        press(&mut app, KeyCode::Char('s'));
        assert!(!app.settings_open);
    }

    #[test]
    fn shortcuts_are_suppressed_while_typing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "sort papers");
        assert!(!app.timer_open);
        assert!(!app.settings_open);
        press(&mut app, KeyCode::Enter);
        assert_eq!(texts(&app), vec!["sort papers"]);
        assert_eq!(app.input_mode, InputMode::None);
    }

    #[test]
    fn blank_submission_keeps_input_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::AddTask);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::None);
        assert!(app.session().tasks().is_empty());
    }

    #[test]
    fn edit_replaces_text() {
        let mut app = app();
        add(&mut app, "draft");
        press(&mut app, KeyCode::Char('e'));
        for _ in 0.."draft".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "final");
        press(&mut app, KeyCode::Enter);
        assert_eq!(texts(&app), vec!["final"]);
    }

    #[test]
    fn shift_keys_reorder_active_tasks() {
        let mut app = app();
        add(&mut app, "c");
        add(&mut app, "b");
        add(&mut app, "a");
        assert_eq!(texts(&app), vec!["a", "b", "c"]);
        assert_eq!(app.selected_task().unwrap().text, "a");

        press(&mut app, KeyCode::Char('J'));
        assert_eq!(texts(&app), vec!["b", "a", "c"]);
        assert_eq!(app.selected_task().unwrap().text, "a");

        press(&mut app, KeyCode::Char('K'));
        press(&mut app, KeyCode::Char('K'));
        assert_eq!(texts(&app), vec!["a", "b", "c"]);
    }

    #[test]
    fn complete_and_delete_selected() {
        let mut app = app();
        add(&mut app, "second");
        add(&mut app, "first");
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(texts(&app), vec!["second"]);
        assert_eq!(app.session().tasks().completed().count(), 1);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.session().tasks().active().next().is_none());
        assert_eq!(app.session().tasks().len(), 1);
    }

    #[test]
    fn t_starts_timer_for_selected_task() {
        let mut app = app();
        add(&mut app, "focus");
        let id = app.selected_id().unwrap();
        press(&mut app, KeyCode::Char('t'));
        assert!(app.timer_open);
        assert!(app.session().timer().is_running);
        assert_eq!(app.session().timer().current_task_id.as_deref(), Some(id.as_str()));
        press(&mut app, KeyCode::Char('p'));
        assert!(!app.session().timer().is_running);
        app.shutdown();
    }

    #[test]
    fn settings_panel_steps_within_range() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        for _ in 0..40 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.session().settings().work_duration, 60);
        assert_eq!(app.session().timer().time_remaining, 3600);

        press(&mut app, KeyCode::Down);
        for _ in 0..10 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.session().settings().break_duration, 1);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(!app.session().settings().auto_start_break);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.session().settings().theme, Theme::MintGreen);
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert!(!press(&mut app, KeyCode::Esc));
        assert!(!app.timer_open);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn renders_without_panicking() {
        let mut app = app();
        add(&mut app, "render me");
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('s'));
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("POMODORO TODO"));
        assert!(content.contains("25:00"));
    }

    #[test]
    fn short_terminals_render() {
        let mut app = app();
        for height in 1..=12 {
            let mut terminal = Terminal::new(TestBackend::new(40, height)).unwrap();
            terminal.draw(|f| app.render(f)).unwrap();
        }
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('a'));
        for height in 1..=12 {
            let mut terminal = Terminal::new(TestBackend::new(40, height)).unwrap();
            terminal.draw(|f| app.render(f)).unwrap();
        }
    }

    #[test]
    fn step_minutes_respects_bounds() {
        assert_eq!(step_minutes(TimerMode::Work, 60, 1), None);
        assert_eq!(step_minutes(TimerMode::Work, 1, -1), None);
        assert_eq!(step_minutes(TimerMode::Break, 29, 1), Some(30));
        assert_eq!(step_minutes(TimerMode::Break, 30, 1), None);
    }
}
