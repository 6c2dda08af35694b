//! Comment pane, scoped to the selected task.
//!
//! The pane is keyed by task id: selecting a different task resets it and
//! fetches that task's comments. Responses for any other task id are
//! ignored so a slow fetch cannot overwrite a newer selection.

use std::collections::HashSet;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use tracing::{debug, info, warn};

use crate::comment::Comment;
use crate::display::comment_stamps;
use crate::error::ApiError;
use crate::net::ApiRequest;
use crate::tui::colors::{GOLD, RED};
use crate::tui::comment_form::CommentForm;
use crate::tui::enums::{DeleteTarget, EditState, LoadState};

pub struct CommentList {
    pub task_id: Option<u64>,
    pub comments: Vec<Comment>,
    pub load: LoadState,
    pub edit: EditState<CommentForm>,
    pub deleting: HashSet<u64>,
    list_state: ListState,
}

impl Default for CommentList {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentList {
    pub fn new() -> Self {
        Self {
            task_id: None,
            comments: Vec::new(),
            load: LoadState::Loaded,
            edit: EditState::Idle,
            deleting: HashSet::new(),
            list_state: ListState::default(),
        }
    }

    /// Point the pane at `task_id`. Returns the fetch request when the id changed.
    pub fn activate(&mut self, task_id: Option<u64>) -> Option<ApiRequest> {
        if self.task_id == task_id {
            return None;
        }
        *self = Self {
            task_id,
            ..Self::new()
        };
        self.reload()
    }

    pub fn reload(&mut self) -> Option<ApiRequest> {
        let task_id = self.task_id?;
        self.load = LoadState::Loading;
        Some(ApiRequest::LoadComments(task_id))
    }

    fn is_current(&self, task_id: u64) -> bool {
        self.task_id == Some(task_id)
    }

    pub fn highlighted(&self) -> Option<&Comment> {
        self.list_state.selected().and_then(|i| self.comments.get(i))
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.comments.iter().position(|c| c.id == id)
    }

    fn clamp_cursor(&mut self) {
        if self.comments.is_empty() {
            self.list_state.select(None);
        } else {
            let i = self.list_state.selected().unwrap_or(0).min(self.comments.len() - 1);
            self.list_state.select(Some(i));
        }
    }

    pub fn move_down(&mut self) {
        if let Some(i) = self.list_state.selected() {
            if i + 1 < self.comments.len() {
                self.list_state.select(Some(i + 1));
            }
        } else {
            self.clamp_cursor();
        }
    }

    pub fn move_up(&mut self) {
        if let Some(i) = self.list_state.selected() {
            self.list_state.select(Some(i.saturating_sub(1)));
        } else {
            self.clamp_cursor();
        }
    }

    pub fn apply_loaded(&mut self, task_id: u64, result: Result<Vec<Comment>, ApiError>) {
        if !self.is_current(task_id) {
            debug!(task_id, "dropping comments for a task that is no longer selected");
            return;
        }
        match result {
            Ok(comments) => {
                info!(task_id, count = comments.len(), "comments loaded");
                self.comments = comments;
                self.load = LoadState::Loaded;
                if let Some(id) = self.edit.editing_id() {
                    if self.position(id).is_none() {
                        self.edit = EditState::Idle;
                    }
                }
                self.clamp_cursor();
            }
            Err(e) => {
                warn!(task_id, error = %e, "failed to load comments");
                self.load = LoadState::Failed(e.to_string());
            }
        }
    }

    pub fn start_create(&mut self) -> bool {
        if self.task_id.is_none() || !self.edit.is_idle() {
            return false;
        }
        self.edit = EditState::Creating(CommentForm::new());
        true
    }

    pub fn start_edit(&mut self) -> bool {
        if !self.edit.is_idle() {
            return false;
        }
        let Some(comment) = self.highlighted() else {
            return false;
        };
        self.edit = EditState::Editing {
            id: comment.id,
            form: CommentForm::from_comment(comment),
        };
        true
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Idle;
    }

    pub fn submit(&mut self) -> Option<ApiRequest> {
        let task_id = self.task_id?;
        match &mut self.edit {
            EditState::Idle => None,
            EditState::Creating(form) => form
                .submit()
                .map(|draft| ApiRequest::CreateComment { task_id, draft }),
            EditState::Editing { id, form } => {
                let id = *id;
                form.submit().map(|draft| ApiRequest::UpdateComment { id, draft })
            }
        }
    }

    /// Newest comments come first, matching the order the backend lists them in.
    pub fn apply_created(&mut self, task_id: u64, result: Result<Comment, ApiError>) {
        if !self.is_current(task_id) {
            return;
        }
        match result {
            Ok(comment) => {
                info!(id = comment.id, task_id, "comment created");
                self.comments.insert(0, comment);
                self.list_state.select(Some(0));
                if self.edit.is_creating() {
                    self.edit = EditState::Idle;
                }
            }
            Err(e) => {
                warn!(task_id, error = %e, "failed to create comment");
                if let EditState::Creating(form) = &mut self.edit {
                    form.fail(e.to_string());
                }
            }
        }
    }

    pub fn apply_updated(&mut self, id: u64, result: Result<Comment, ApiError>) {
        match result {
            Ok(comment) => {
                info!(id, "comment updated");
                if let Some(i) = self.position(id) {
                    self.comments[i] = comment;
                }
                if self.edit.editing_id() == Some(id) {
                    self.edit = EditState::Idle;
                }
            }
            Err(e) => {
                warn!(id, error = %e, "failed to update comment");
                if let EditState::Editing { id: editing, form } = &mut self.edit {
                    if *editing == id {
                        form.fail(e.to_string());
                    }
                }
            }
        }
    }

    pub fn delete_target(&self) -> Option<DeleteTarget> {
        let comment = self.highlighted()?;
        if self.deleting.contains(&comment.id) {
            return None;
        }
        Some(DeleteTarget::Comment {
            id: comment.id,
            task_id: comment.task_id,
        })
    }

    pub fn begin_delete(&mut self, id: u64, task_id: u64) -> Option<ApiRequest> {
        self.deleting
            .insert(id)
            .then_some(ApiRequest::DeleteComment { id, task_id })
    }

    /// Apply a delete outcome. A failure is handed back for the alert dialog.
    /// The comment may already be gone from the pane if another task was
    /// selected meanwhile.
    pub fn apply_deleted(&mut self, id: u64, result: Result<(), ApiError>) -> Result<(), ApiError> {
        self.deleting.remove(&id);
        result?;
        info!(id, "comment deleted");
        if let Some(i) = self.position(id) {
            self.comments.remove(i);
            if self.edit.editing_id() == Some(id) {
                self.edit = EditState::Idle;
            }
            self.clamp_cursor();
        }
        Ok(())
    }

    fn item_lines(&self, comment: &Comment, ts_format: &str) -> Vec<Line<'static>> {
        let (created, updated) = comment_stamps(comment, ts_format);
        let mut stamp = vec![Span::styled(created, Style::default().fg(Color::DarkGray))];
        if let Some(updated) = updated {
            stamp.push(Span::styled(
                format!(" (updated {updated})"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if self.deleting.contains(&comment.id) {
            stamp.push(Span::styled("  deleting…", Style::default().fg(RED)));
        }
        vec![Line::from(comment.content.clone()), Line::from(stamp)]
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
            .title(format!("Comments ({})", self.comments.len()));
        let inner = block.inner(area);
        f.render_widget(block, area);

        if self.task_id.is_none() {
            f.render_widget(Paragraph::new("Select a task to view its comments"), inner);
            return;
        }

        let mut body = inner;
        if let EditState::Creating(form) = &self.edit {
            let lines = form.lines("New comment", "Post");
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(lines.len() as u16 + 1), Constraint::Min(0)])
                .split(inner);
            f.render_widget(Paragraph::new(lines), chunks[0]);
            body = chunks[1];
        }

        let placeholder = match &self.load {
            LoadState::Loading => Some(Paragraph::new("Loading comments...")),
            LoadState::Failed(message) => {
                Some(Paragraph::new(message.clone()).style(Style::default().fg(RED)))
            }
            LoadState::Loaded if self.comments.is_empty() => {
                Some(Paragraph::new("No comments yet. Be the first to comment!"))
            }
            LoadState::Loaded => None,
        };
        if let Some(paragraph) = placeholder {
            f.render_widget(paragraph.wrap(Wrap { trim: true }), body);
            return;
        }

        let editing = self.edit.editing_id();
        let items: Vec<ListItem> = self
            .comments
            .iter()
            .map(|comment| {
                let mut lines = match (editing, self.edit.form()) {
                    (Some(id), Some(form)) if id == comment.id => form.lines("Edit comment", "Save"),
                    _ => self.item_lines(comment, ts_format),
                };
                lines.push(Line::default());
                ListItem::new(Text::from(lines))
            })
            .collect();

        let list = List::new(items).highlight_symbol(if focused { "> " } else { "  " });
        f.render_stateful_widget(list, body, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::comment;

    #[test]
    fn test_activate_fetches_only_on_change() {
        let mut list = CommentList::new();
        assert_eq!(list.activate(Some(1)), Some(ApiRequest::LoadComments(1)));
        assert_eq!(list.load, LoadState::Loading);
        assert_eq!(list.activate(Some(1)), None);
        assert_eq!(list.activate(None), None);
        assert_eq!(list.task_id, None);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut list = CommentList::new();
        list.activate(Some(1));
        list.activate(Some(2));
        list.apply_loaded(1, Ok(vec![comment(9, 1, "old")]));
        assert!(list.comments.is_empty());
        assert_eq!(list.load, LoadState::Loading);

        list.apply_loaded(2, Ok(vec![comment(10, 2, "new")]));
        assert_eq!(list.comments.len(), 1);
        assert_eq!(list.load, LoadState::Loaded);
    }

    #[test]
    fn test_create_and_delete() {
        let mut list = CommentList::new();
        list.activate(Some(1));
        list.apply_loaded(1, Ok(vec![comment(1, 1, "first")]));

        assert!(list.start_create());
        list.edit.form_mut().unwrap().content.value = "second".into();
        let request = list.submit().unwrap();
        assert!(matches!(request, ApiRequest::CreateComment { task_id: 1, ref draft } if draft.content == "second"));

        list.apply_created(1, Ok(comment(2, 1, "second")));
        assert_eq!(list.comments[0].id, 2);
        assert!(list.edit.is_idle());

        assert_eq!(list.delete_target(), Some(DeleteTarget::Comment { id: 2, task_id: 1 }));
        assert_eq!(list.begin_delete(2, 1), Some(ApiRequest::DeleteComment { id: 2, task_id: 1 }));
        assert!(list.delete_target().is_none());
        list.apply_deleted(2, Ok(())).unwrap();
        assert_eq!(list.comments.len(), 1);
    }

    fn loaded(task_id: u64, comments: Vec<Comment>) -> CommentList {
        let mut list = CommentList::new();
        list.activate(Some(task_id));
        list.apply_loaded(task_id, Ok(comments));
        list
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut list = loaded(1, vec![comment(1, 1, "a"), comment(2, 1, "b"), comment(3, 1, "c")]);
        list.move_down();
        assert!(list.start_edit());
        assert_eq!(list.edit.editing_id(), Some(2));
        assert_eq!(list.edit.form().map(|f| f.content.value.as_str()), Some("b"));

        list.edit.form_mut().unwrap().content.handle_char('!');
        let request = list.submit().unwrap();
        assert!(matches!(request, ApiRequest::UpdateComment { id: 2, ref draft } if draft.content == "b!"));

        list.apply_updated(2, Ok(comment(2, 1, "b!")));
        let contents: Vec<&str> = list.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b!", "c"]);
        assert!(list.edit.is_idle());
    }

    #[test]
    fn test_failed_update_keeps_form_open() {
        let mut list = loaded(1, vec![comment(1, 1, "a")]);
        list.start_edit();
        list.submit().unwrap();
        list.apply_updated(
            1,
            Err(ApiError::Server {
                status: 500,
                message: "Failed to update comment".into(),
            }),
        );
        let form = list.edit.form().unwrap();
        assert_eq!(form.error.as_deref(), Some("Failed to update comment"));
        assert!(!form.submitting);
        assert_eq!(list.comments[0].content, "a");
    }

    #[test]
    fn test_delete_after_switching_tasks() {
        let mut list = loaded(1, vec![comment(7, 1, "bye")]);
        list.begin_delete(7, 1);
        list.activate(Some(2));
        assert!(list.apply_deleted(7, Ok(())).is_ok());
        assert!(list.comments.is_empty());
    }

    #[test]
    fn test_blank_comment_rejected() {
        let mut list = CommentList::new();
        list.activate(Some(1));
        list.apply_loaded(1, Ok(vec![]));
        list.start_create();
        assert!(list.submit().is_none());
        assert_eq!(
            list.edit.form().and_then(|f| f.error.as_deref()),
            Some("Comment content is required")
        );
    }

    #[test]
    fn test_no_create_without_selection() {
        let mut list = CommentList::new();
        assert!(!list.start_create());
    }
}
