//! Task pane: the fetched tasks, the highlighted row, the selected task and
//! the create/edit form.

use std::collections::HashSet;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use tracing::{debug, info, warn};

use crate::display::{comment_count_label, format_priority, format_status, format_timestamp};
use crate::error::ApiError;
use crate::net::ApiRequest;
use crate::task::Task;
use crate::tui::colors::{badge_style, priority_color, status_color, GOLD, RED};
use crate::tui::enums::{DeleteTarget, EditState, LoadState};
use crate::tui::task_form::TaskForm;

pub struct TaskList {
    pub tasks: Vec<Task>,
    pub load: LoadState,
    pub edit: EditState<TaskForm>,
    /// Task whose comments are shown in the comment pane.
    pub selected: Option<u64>,
    /// Tasks with a DELETE in flight.
    pub deleting: HashSet<u64>,
    list_state: ListState,
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskList {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            load: LoadState::Loading,
            edit: EditState::Idle,
            selected: None,
            deleting: HashSet::new(),
            list_state: ListState::default(),
        }
    }

    /// Mark the list as loading and return the fetch request.
    pub fn reload(&mut self) -> ApiRequest {
        self.load = LoadState::Loading;
        ApiRequest::LoadTasks
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn highlighted(&self) -> Option<&Task> {
        self.highlighted_index().and_then(|i| self.tasks.get(i))
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|id| self.tasks.iter().find(|t| t.id == id))
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn clamp_cursor(&mut self) {
        if self.tasks.is_empty() {
            self.list_state.select(None);
        } else {
            let i = self.list_state.selected().unwrap_or(0).min(self.tasks.len() - 1);
            self.list_state.select(Some(i));
        }
    }

    pub fn move_down(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.tasks.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn move_up(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(i));
    }

    /// Make the highlighted task the selected one. Returns the id when the
    /// selection changed.
    pub fn select_highlighted(&mut self) -> Option<u64> {
        let id = self.highlighted()?.id;
        if self.selected == Some(id) {
            return None;
        }
        self.selected = Some(id);
        Some(id)
    }

    pub fn apply_loaded(&mut self, result: Result<Vec<Task>, ApiError>) {
        match result {
            Ok(tasks) => {
                info!(count = tasks.len(), "tasks loaded");
                self.tasks = tasks;
                self.load = LoadState::Loaded;
                if let Some(id) = self.selected {
                    if self.position(id).is_none() {
                        debug!(id, "selected task no longer exists");
                        self.selected = None;
                    }
                }
                if let Some(id) = self.edit.editing_id() {
                    if self.position(id).is_none() {
                        self.edit = EditState::Idle;
                    }
                }
                self.deleting.retain(|id| self.tasks.iter().any(|t| t.id == *id));
                self.clamp_cursor();
            }
            Err(e) => {
                warn!(error = %e, "failed to load tasks");
                self.load = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Open the create form. Ignored while another form is open.
    pub fn start_create(&mut self) -> bool {
        if !self.edit.is_idle() {
            return false;
        }
        self.edit = EditState::Creating(TaskForm::new());
        true
    }

    /// Swap the highlighted task for a form bound to it.
    pub fn start_edit(&mut self) -> bool {
        if !self.edit.is_idle() {
            return false;
        }
        let Some(task) = self.highlighted() else {
            return false;
        };
        self.edit = EditState::Editing {
            id: task.id,
            form: TaskForm::from_task(task),
        };
        true
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Idle;
    }

    /// Validate the open form and build its request.
    pub fn submit(&mut self) -> Option<ApiRequest> {
        match &mut self.edit {
            EditState::Idle => None,
            EditState::Creating(form) => form.submit().map(ApiRequest::CreateTask),
            EditState::Editing { id, form } => {
                let id = *id;
                form.submit().map(|draft| ApiRequest::UpdateTask { id, draft })
            }
        }
    }

    pub fn apply_created(&mut self, result: Result<Task, ApiError>) {
        match result {
            Ok(task) => {
                info!(id = task.id, "task created");
                self.tasks.insert(0, task);
                if self.load != LoadState::Loaded {
                    self.load = LoadState::Loaded;
                }
                self.list_state.select(Some(0));
                if self.edit.is_creating() {
                    self.edit = EditState::Idle;
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to create task");
                if let EditState::Creating(form) = &mut self.edit {
                    form.fail(e.to_string());
                }
            }
        }
    }

    pub fn apply_updated(&mut self, id: u64, result: Result<Task, ApiError>) {
        match result {
            Ok(task) => {
                info!(id, "task updated");
                if let Some(i) = self.position(id) {
                    self.tasks[i] = task;
                }
                if self.edit.editing_id() == Some(id) {
                    self.edit = EditState::Idle;
                }
            }
            Err(e) => {
                warn!(id, error = %e, "failed to update task");
                if let EditState::Editing { id: editing, form } = &mut self.edit {
                    if *editing == id {
                        form.fail(e.to_string());
                    }
                }
            }
        }
    }

    /// Replace a task with a fresh copy from the backend, leaving any open form alone.
    pub fn refresh(&mut self, task: Task) {
        if let Some(i) = self.position(task.id) {
            self.tasks[i] = task;
        }
    }

    /// The highlighted task as a delete target, unless its delete is already in flight.
    pub fn delete_target(&self) -> Option<DeleteTarget> {
        let task = self.highlighted()?;
        if self.deleting.contains(&task.id) {
            return None;
        }
        Some(DeleteTarget::Task {
            id: task.id,
            title: task.title.clone(),
        })
    }

    pub fn begin_delete(&mut self, id: u64) -> Option<ApiRequest> {
        self.deleting.insert(id).then_some(ApiRequest::DeleteTask(id))
    }

    /// Apply a delete outcome. A failure is handed back for the alert dialog.
    pub fn apply_deleted(&mut self, id: u64, result: Result<(), ApiError>) -> Result<(), ApiError> {
        self.deleting.remove(&id);
        result?;
        info!(id, "task deleted");
        self.remove(id);
        Ok(())
    }

    /// Drop a task locally, clearing any selection or form bound to it.
    pub fn remove(&mut self, id: u64) {
        self.tasks.retain(|t| t.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.edit.editing_id() == Some(id) {
            self.edit = EditState::Idle;
        }
        self.clamp_cursor();
    }

    /// Shift a task's comment count after a local comment create or delete.
    pub fn adjust_comment_count(&mut self, task_id: u64, delta: i64) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
            task.comments_count = task.comments_count.saturating_add_signed(delta);
        }
    }

    fn item_lines(&self, task: &Task, ts_format: &str) -> Vec<Line<'static>> {
        let marker = if self.selected == Some(task.id) { "● " } else { "  " };
        let mut lines = vec![Line::from(vec![
            Span::styled(marker, Style::default().fg(GOLD)),
            Span::styled(task.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(format!(" {} ", format_status(task.status)), badge_style(status_color(task.status))),
            Span::raw(" "),
            Span::styled(
                format!(" {} ", format_priority(task.priority)),
                badge_style(priority_color(task.priority)),
            ),
        ])];
        if let Some(desc) = task.description_text() {
            lines.push(Line::from(Span::styled(
                format!("  {desc}"),
                Style::default().fg(Color::Gray),
            )));
        }
        let mut meta = vec![Span::styled(
            format!(
                "  Created {} · {}",
                format_timestamp(task.created_at, ts_format),
                comment_count_label(task.comments_count)
            ),
            Style::default().fg(Color::DarkGray),
        )];
        if self.deleting.contains(&task.id) {
            meta.push(Span::styled("  deleting…", Style::default().fg(RED)));
        }
        lines.push(Line::from(meta));
        lines
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, ts_format: &str) {
        let border = if focused {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!("Tasks ({})", self.tasks.len()));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut body = inner;
        if let EditState::Creating(form) = &self.edit {
            let lines = form.lines("New task", "Create");
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(lines.len() as u16 + 1), Constraint::Min(0)])
                .split(inner);
            f.render_widget(Paragraph::new(lines), chunks[0]);
            body = chunks[1];
        }

        let placeholder = match &self.load {
            LoadState::Loading => Some(Paragraph::new("Loading tasks...")),
            LoadState::Failed(message) => {
                Some(Paragraph::new(message.clone()).style(Style::default().fg(RED)))
            }
            LoadState::Loaded if self.tasks.is_empty() => {
                Some(Paragraph::new("No tasks yet. Create your first task!"))
            }
            LoadState::Loaded => None,
        };
        if let Some(paragraph) = placeholder {
            f.render_widget(paragraph.wrap(Wrap { trim: true }), body);
            return;
        }

        let editing = self.edit.editing_id();
        let items: Vec<ListItem> = self
            .tasks
            .iter()
            .map(|task| {
                let mut lines = match (editing, self.edit.form()) {
                    (Some(id), Some(form)) if id == task.id => {
                        form.lines(&format!("Edit task #{id}"), "Save")
                    }
                    _ => self.item_lines(task, ts_format),
                };
                lines.push(Line::default());
                ListItem::new(Text::from(lines))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol(if focused { "> " } else { "  " });
        f.render_stateful_widget(list, body, &mut self.list_state);
    }
}
