//! Single-field form for writing or editing a comment.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::comment::{Comment, CommentDraft};
use crate::tui::colors::{GOLD, RED};
use crate::tui::input::InputField;

#[derive(Clone, Debug, Default)]
pub struct CommentForm {
    pub content: InputField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl CommentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            content: InputField::with_value(&comment.content),
            ..Self::default()
        }
    }

    /// Validate and mark as submitting. Blank content sets the inline error.
    pub fn submit(&mut self) -> Option<CommentDraft> {
        if self.submitting {
            return None;
        }
        match CommentDraft::new(&self.content.value) {
            Ok(draft) => {
                self.error = None;
                self.submitting = true;
                Some(draft)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn fail(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }

    pub fn lines(&self, heading: &str, submit_label: &str) -> Vec<Line<'static>> {
        let mut input = vec![Span::styled("> ", Style::default().fg(GOLD).add_modifier(Modifier::BOLD))];
        input.extend(self.content.spans(!self.submitting));

        let mut lines = vec![
            Line::from(Span::styled(heading.to_string(), Style::default().fg(GOLD).add_modifier(Modifier::BOLD))),
            Line::from(input),
        ];
        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(RED))));
        }
        let hint = if self.submitting {
            "Saving...".to_string()
        } else {
            format!("Enter: {submit_label}  Esc: Cancel")
        };
        lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::comment;

    #[test]
    fn test_blank_content_rejected() {
        let mut form = CommentForm::new();
        form.content = InputField::with_value("   ");
        assert!(form.submit().is_none());
        assert_eq!(form.error.as_deref(), Some("Comment content is required"));
        assert!(!form.submitting);
    }

    #[test]
    fn test_edit_prefills_and_submits_once() {
        let mut form = CommentForm::from_comment(&comment(2, 1, "first take"));
        assert_eq!(form.content.value, "first take");
        form.content.handle_char('!');
        let draft = form.submit().unwrap();
        assert_eq!(draft.content, "first take!");
        assert!(form.submit().is_none());
        form.fail("Failed to update comment".into());
        assert_eq!(form.error.as_deref(), Some("Failed to update comment"));
        assert!(!form.submitting);
    }
}
