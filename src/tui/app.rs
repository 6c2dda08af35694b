//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the task pane and the
//! comment pane, routes key presses to whichever pane or dialog is active,
//! and applies API outcomes as they arrive from the network layer.
//!
//! `App` never performs I/O itself. Key handling returns the request to send,
//! and [`App::apply_event`] folds the outcome back into state.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tracing::{info, warn};

use crate::display::truncate;
use crate::net::{ApiEvent, ApiRequest};
use crate::tui::{
    colors::{badge_style, DARK_RED, GOLD},
    comment_list::CommentList,
    enums::{AppState, DeleteTarget, Focus},
    task_list::TaskList,
    utils::centered_rect,
};

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    focus: Focus,
    task_list: TaskList,
    comment_list: CommentList,
    status_message: String,
    should_quit: bool,
    timestamp_format: String,
}

impl App {
    pub fn new(timestamp_format: &str) -> Self {
        Self {
            state: AppState::Browse,
            focus: Focus::Tasks,
            task_list: TaskList::new(),
            comment_list: CommentList::new(),
            status_message: String::new(),
            should_quit: false,
            timestamp_format: timestamp_format.to_string(),
        }
    }

    /// The initial fetch issued when the interface opens.
    pub fn start(&mut self) -> ApiRequest {
        self.task_list.reload()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Handle one key press. Returns the request it triggers, if any.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Option<ApiRequest> {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }
        self.clear_status_message();

        match self.state.clone() {
            AppState::Browse => self.handle_browse_input(key, modifiers),
            AppState::Help | AppState::Alert(_) => {
                self.state = AppState::Browse;
                None
            }
            AppState::Confirm(target) => self.handle_confirm_input(key, target),
        }
    }

    fn form_open(&self) -> bool {
        match self.focus {
            Focus::Tasks => !self.task_list.edit.is_idle(),
            Focus::Comments => !self.comment_list.edit.is_idle(),
        }
    }

    fn handle_browse_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Option<ApiRequest> {
        if self.form_open() {
            return match self.focus {
                Focus::Tasks => self.handle_task_form_input(key, modifiers),
                Focus::Comments => self.handle_comment_form_input(key, modifiers),
            };
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Tasks => Focus::Comments,
                    Focus::Comments => Focus::Tasks,
                };
            }
            KeyCode::Up | KeyCode::Char('k') => match self.focus {
                Focus::Tasks => self.task_list.move_up(),
                Focus::Comments => self.comment_list.move_up(),
            },
            KeyCode::Down | KeyCode::Char('j') => match self.focus {
                Focus::Tasks => self.task_list.move_down(),
                Focus::Comments => self.comment_list.move_down(),
            },
            KeyCode::Enter | KeyCode::Char(' ') if self.focus == Focus::Tasks => {
                let id = self.task_list.select_highlighted()?;
                return self.comment_list.activate(Some(id));
            }
            KeyCode::Char('n') => match self.focus {
                Focus::Tasks => {
                    self.task_list.start_create();
                }
                Focus::Comments => {
                    if !self.comment_list.start_create() {
                        self.set_status_message("Select a task first".to_string());
                    }
                }
            },
            KeyCode::Char('e') => match self.focus {
                Focus::Tasks => {
                    self.task_list.start_edit();
                }
                Focus::Comments => {
                    self.comment_list.start_edit();
                }
            },
            KeyCode::Char('d') => {
                let target = match self.focus {
                    Focus::Tasks => self.task_list.delete_target(),
                    Focus::Comments => self.comment_list.delete_target(),
                };
                if let Some(target) = target {
                    self.state = AppState::Confirm(target);
                }
            }
            KeyCode::Char('r') => {
                return match self.focus {
                    Focus::Tasks => Some(self.task_list.reload()),
                    Focus::Comments => self.comment_list.reload(),
                };
            }
            _ => {}
        }
        None
    }

    fn handle_task_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Option<ApiRequest> {
        if key == KeyCode::Enter {
            return self.task_list.submit();
        }
        if key == KeyCode::Esc {
            self.task_list.cancel_edit();
            return None;
        }
        let form = self.task_list.edit.form_mut()?;
        match key {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => form.handle_left_right(false),
            KeyCode::Right => form.handle_left_right(true),
            KeyCode::Backspace => form.handle_backspace(),
            KeyCode::Delete => form.handle_delete(),
            KeyCode::Home => form.handle_home(),
            KeyCode::End => form.handle_end(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => form.handle_char(c),
            _ => {}
        }
        None
    }

    fn handle_comment_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Option<ApiRequest> {
        if key == KeyCode::Enter {
            return self.comment_list.submit();
        }
        if key == KeyCode::Esc {
            self.comment_list.cancel_edit();
            return None;
        }
        let field = &mut self.comment_list.edit.form_mut()?.content;
        match key {
            KeyCode::Left => field.move_cursor_left(),
            KeyCode::Right => field.move_cursor_right(),
            KeyCode::Backspace => field.handle_backspace(),
            KeyCode::Delete => field.handle_delete(),
            KeyCode::Home => field.move_home(),
            KeyCode::End => field.move_end(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => field.handle_char(c),
            _ => {}
        }
        None
    }

    fn handle_confirm_input(&mut self, key: KeyCode, target: DeleteTarget) -> Option<ApiRequest> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.state = AppState::Browse;
                match target {
                    DeleteTarget::Task { id, .. } => self.task_list.begin_delete(id),
                    DeleteTarget::Comment { id, task_id } => self.comment_list.begin_delete(id, task_id),
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::Browse;
                None
            }
            _ => None,
        }
    }

    /// Clear the comment pane when the selected task went away.
    fn sync_selection(&mut self) {
        if self.task_list.selected.is_none() && self.comment_list.task_id.is_some() {
            self.comment_list.activate(None);
        }
    }

    /// Fold the outcome of a request into the interface state. Returns a
    /// follow-up request when the outcome needs confirming.
    pub fn apply_event(&mut self, event: ApiEvent) -> Option<ApiRequest> {
        match event {
            ApiEvent::TasksLoaded(result) => {
                self.task_list.apply_loaded(result);
                self.sync_selection();
            }
            ApiEvent::TaskCreated(result) => {
                if let Ok(task) = &result {
                    self.set_status_message(format!("Created task #{}", task.id));
                }
                self.task_list.apply_created(result);
            }
            ApiEvent::TaskUpdated { id, result } => {
                if result.is_ok() {
                    self.set_status_message(format!("Updated task #{id}"));
                }
                self.task_list.apply_updated(id, result);
            }
            ApiEvent::TaskDeleted { id, result } => match self.task_list.apply_deleted(id, result) {
                Ok(()) => {
                    self.set_status_message(format!("Deleted task #{id}"));
                    self.sync_selection();
                }
                Err(e) => {
                    warn!(id, error = %e, "failed to delete task");
                    self.state = AppState::Alert(e.to_string());
                }
            },
            ApiEvent::TaskLoaded { id, result } => match result {
                Ok(task) => self.task_list.refresh(task),
                Err(e) if e.is_not_found() => {
                    info!(id, "task no longer exists");
                    self.task_list.remove(id);
                    self.sync_selection();
                    self.set_status_message(format!("Task #{id} no longer exists"));
                }
                Err(e) => warn!(id, error = %e, "failed to re-read task"),
            },
            ApiEvent::CommentsLoaded { task_id, result } => {
                // The service reports comments of a deleted task as a generic
                // failure, so any failure for the selected task is checked
                // against the task itself.
                let check = result.is_err() && self.task_list.selected == Some(task_id);
                self.comment_list.apply_loaded(task_id, result);
                if check {
                    return Some(ApiRequest::LoadTask(task_id));
                }
            }
            ApiEvent::CommentCreated { task_id, result } => {
                if result.is_ok() {
                    self.task_list.adjust_comment_count(task_id, 1);
                }
                self.comment_list.apply_created(task_id, result);
            }
            ApiEvent::CommentUpdated { id, result } => {
                self.comment_list.apply_updated(id, result);
            }
            ApiEvent::CommentDeleted { id, task_id, result } => match self.comment_list.apply_deleted(id, result) {
                Ok(()) => {
                    self.task_list.adjust_comment_count(task_id, -1);
                    self.set_status_message(format!("Deleted comment #{id}"));
                }
                Err(e) => {
                    warn!(id, error = %e, "failed to delete comment");
                    self.state = AppState::Alert(e.to_string());
                }
            },
        }
        None
    }

    /// Render the help overlay with keyboard shortcuts.
    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let heading = |text: &'static str| {
            Line::from(Span::styled(text, Style::default().add_modifier(Modifier::BOLD)))
        };
        let help_text = vec![
            heading("Panes:"),
            Line::from("  ↑/↓, k/j     Move the highlight"),
            Line::from("  Enter/Space  Select task (shows its comments)"),
            Line::from("  Tab          Switch between tasks and comments"),
            Line::from("  n            New task / comment"),
            Line::from("  e            Edit highlighted item"),
            Line::from("  d            Delete highlighted item"),
            Line::from("  r            Reload"),
            Line::from("  h/F1         Show this help"),
            Line::from("  q/Ctrl+C     Quit"),
            Line::from(""),
            heading("Forms:"),
            Line::from("  Tab/↓        Next field"),
            Line::from("  Shift+Tab/↑  Previous field"),
            Line::from("  ←/→          Move cursor / change status or priority"),
            Line::from("  Enter        Save"),
            Line::from("  Esc          Cancel"),
        ];

        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    /// Render a confirmation dialog for destructive actions.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect, target: &DeleteTarget) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(target.describe()),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_alert(&mut self, f: &mut Frame, area: Rect, message: &str) {
        let block = Block::default()
            .title("Error")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 25, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(message.to_string()),
            Line::from(""),
            Line::from("Press any key to dismiss"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match &self.state {
                AppState::Browse if self.form_open() => {
                    "Editing - Enter to save, Esc to cancel".to_string()
                }
                AppState::Browse => {
                    let pane = match self.focus {
                        Focus::Tasks => "Tasks",
                        Focus::Comments => "Comments",
                    };
                    let selected = self
                        .task_list
                        .selected_task()
                        .map(|t| format!(" - #{} {}", t.id, truncate(&t.title, 30)))
                        .unwrap_or_default();
                    format!("{pane}{selected} | n: new  e: edit  d: delete  r: reload  Tab: switch  h: help  q: quit")
                }
                AppState::Help => "Help".to_string(),
                AppState::Confirm(_) => "Confirm Action".to_string(),
                AppState::Alert(_) => "Error".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(badge_style(GOLD).remove_modifier(Modifier::BOLD))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Draw both panes, the status bar and any open dialog.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[0]);

        let ts_format = self.timestamp_format.clone();
        self.task_list
            .render(f, panes[0], self.focus == Focus::Tasks, &ts_format);
        self.comment_list
            .render(f, panes[1], self.focus == Focus::Comments, &ts_format);

        match self.state.clone() {
            AppState::Browse => {}
            AppState::Help => self.render_help(f, chunks[0]),
            AppState::Confirm(target) => self.render_confirm(f, chunks[0], &target),
            AppState::Alert(message) => self.render_alert(f, chunks[0], &message),
        }

        self.render_status_bar(f, chunks[1]);
    }
}
