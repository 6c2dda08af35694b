//! Enumerations for TUI state management.

/// Top-level screen state. Dialogs render over the panes.
#[derive(Clone, PartialEq, Debug)]
pub enum AppState {
    Browse,
    Help,
    Confirm(DeleteTarget),
    /// Blocking message; any key dismisses it.
    Alert(String),
}

/// Entity awaiting delete confirmation.
#[derive(Clone, PartialEq, Debug)]
pub enum DeleteTarget {
    Task { id: u64, title: String },
    Comment { id: u64, task_id: u64 },
}

impl DeleteTarget {
    /// Human-readable description of the pending action.
    pub fn describe(&self) -> String {
        match self {
            DeleteTarget::Task { id, title } => format!("Delete task #{id} \"{title}\" and all its comments"),
            DeleteTarget::Comment { id, task_id } => format!("Delete comment #{id} on task #{task_id}"),
        }
    }
}

/// Which pane receives list keys.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Focus {
    Tasks,
    Comments,
}

/// Fetch state of a list.
#[derive(Clone, PartialEq, Debug)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

/// Form state of a list. Creating and editing exclude each other, and
/// editing always names the one entity being edited.
#[derive(Clone, Debug, Default)]
pub enum EditState<F> {
    #[default]
    Idle,
    Creating(F),
    Editing { id: u64, form: F },
}

impl<F> EditState<F> {
    pub fn is_idle(&self) -> bool {
        matches!(self, EditState::Idle)
    }

    pub fn is_creating(&self) -> bool {
        matches!(self, EditState::Creating(_))
    }

    /// Id of the entity under edit, if any.
    pub fn editing_id(&self) -> Option<u64> {
        match self {
            EditState::Editing { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&F> {
        match self {
            EditState::Idle => None,
            EditState::Creating(form) | EditState::Editing { form, .. } => Some(form),
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut F> {
        match self {
            EditState::Idle => None,
            EditState::Creating(form) | EditState::Editing { form, .. } => Some(form),
        }
    }
}
