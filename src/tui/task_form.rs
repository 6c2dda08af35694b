//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure used both for creating a
//! task and for editing one in place, including field ordering, client-side
//! validation, and the in-flight submission flag.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::display::{format_priority, format_status};
use crate::fields::{Priority, Status};
use crate::task::{Task, TaskDraft};
use crate::tui::colors::{priority_color, status_color, badge_style, GOLD, RED};
use crate::tui::input::InputField;

/// Field order for keyboard navigation.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const STATUS_FIELD: usize = 2;
pub const PRIORITY_FIELD: usize = 3;
const FIELD_COUNT: usize = 4;

/// Controlled form for a task's editable fields.
#[derive(Clone, Debug)]
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub status: usize,
    pub priority: usize,
    pub current_field: usize,
    /// Inline message shown under the form (validation or server error).
    pub error: Option<String>,
    /// A request from this form is in flight.
    pub submitting: bool,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    /// Create an empty form with the backend's default status and priority.
    pub fn new() -> Self {
        Self {
            title: InputField::new(),
            description: InputField::new(),
            status: position_of(&Status::ALL, Status::default()),
            priority: position_of(&Priority::ALL, Priority::default()),
            current_field: TITLE_FIELD,
            error: None,
            submitting: false,
        }
    }

    /// Create a form populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: InputField::with_value(&task.title),
            description: InputField::with_value(task.description.as_deref().unwrap_or_default()),
            status: position_of(&Status::ALL, task.status),
            priority: position_of(&Priority::ALL, task.priority),
            ..Self::new()
        }
    }

    pub fn selected_status(&self) -> Status {
        Status::ALL[self.status % Status::ALL.len()]
    }

    pub fn selected_priority(&self) -> Priority {
        Priority::ALL[self.priority % Priority::ALL.len()]
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            DESCRIPTION_FIELD => Some(&mut self.description),
            _ => None,
        }
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    pub fn handle_home(&mut self) {
        if let Some(field) = self.active_input() {
            field.move_home();
        }
    }

    pub fn handle_end(&mut self) {
        if let Some(field) = self.active_input() {
            field.move_end();
        }
    }

    /// Handle left/right arrow keys for cursor movement or selector changes.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            STATUS_FIELD => self.status = cycle(self.status, Status::ALL.len(), right),
            PRIORITY_FIELD => self.priority = cycle(self.priority, Priority::ALL.len(), right),
            _ => {
                if let Some(field) = self.active_input() {
                    if right {
                        field.move_cursor_right();
                    } else {
                        field.move_cursor_left();
                    }
                }
            }
        }
    }

    /// Validate the form and build the request body.
    ///
    /// Returns `None` without touching the network when a submission is
    /// already in flight or the title is blank; the latter sets the inline
    /// error. On success the form is marked as submitting.
    pub fn submit(&mut self) -> Option<TaskDraft> {
        if self.submitting {
            return None;
        }
        match TaskDraft::new(
            &self.title.value,
            &self.description.value,
            self.selected_status(),
            self.selected_priority(),
        ) {
            Ok(draft) => {
                self.error = None;
                self.submitting = true;
                Some(draft)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.current_field = TITLE_FIELD;
                None
            }
        }
    }

    /// Record a failed submission so the user can retry.
    pub fn fail(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }

    /// Render the form as lines, for embedding in a list or a panel.
    pub fn lines(&self, heading: &str, submit_label: &str) -> Vec<Line<'static>> {
        let label = |field: usize, text: &'static str| {
            let style = if self.current_field == field {
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Span::styled(text, style)
        };

        let status = self.selected_status();
        let priority = self.selected_priority();

        let mut title_line = vec![label(TITLE_FIELD, "Title *      ")];
        title_line.extend(self.title.spans(self.current_field == TITLE_FIELD));
        let mut desc_line = vec![label(DESCRIPTION_FIELD, "Description  ")];
        desc_line.extend(self.description.spans(self.current_field == DESCRIPTION_FIELD));

        let mut lines = vec![
            Line::from(Span::styled(heading.to_string(), Style::default().fg(GOLD).add_modifier(Modifier::BOLD))),
            Line::from(title_line),
            Line::from(desc_line),
            Line::from(vec![
                label(STATUS_FIELD, "Status       "),
                Span::raw("< "),
                Span::styled(format!(" {} ", format_status(status)), badge_style(status_color(status))),
                Span::raw(" >"),
            ]),
            Line::from(vec![
                label(PRIORITY_FIELD, "Priority     "),
                Span::raw("< "),
                Span::styled(format!(" {} ", format_priority(priority)), badge_style(priority_color(priority))),
                Span::raw(" >"),
            ]),
        ];

        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(RED))));
        }
        let hint = if self.submitting {
            "Saving...".to_string()
        } else {
            format!("Enter: {submit_label}  Esc: Cancel  Tab: Next field  ←/→: Change")
        };
        lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));
        lines
    }
}

fn position_of<T: PartialEq + Copy>(all: &[T], value: T) -> usize {
    all.iter().position(|&v| v == value).unwrap_or(0)
}

fn cycle(index: usize, len: usize, forward: bool) -> usize {
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}
