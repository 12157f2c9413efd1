//! Create/edit workflow for a single client record at a time.

use shared::{
    domain::{ClientId, ClientRecord},
    error::StoreError,
    form::{ClientFields, ClientForm, FormField},
};
use thiserror::Error;

use crate::backend_bridge::commands::{BackendCommand, RequestId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorState {
    #[default]
    Idle,
    Creating,
    Editing(ClientId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveIntent {
    Create(ClientFields),
    Update(ClientId, ClientFields),
}

impl SaveIntent {
    pub fn into_command(self, request: RequestId) -> BackendCommand {
        match self {
            Self::Create(fields) => BackendCommand::Create { request, fields },
            Self::Update(id, fields) => BackendCommand::Update {
                request,
                id,
                fields,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("no client form is open")]
    NotOpen,
    #[error("a save is already in flight ({0})")]
    SaveInFlight(RequestId),
    #[error(transparent)]
    Invalid(#[from] StoreError),
}

/// Outcome of feeding a store completion into the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The save succeeded and the form closed.
    Settled,
    /// The save failed; state and form contents were kept.
    Rejected,
    /// The completion belongs to a cancelled or superseded save.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct Editor {
    state: EditorState,
    form: ClientForm,
    pending: Option<RequestId>,
    last_error: Option<StoreError>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn form(&self) -> &ClientForm {
        &self.form
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.state != EditorState::Idle
    }

    pub fn editing_id(&self) -> Option<ClientId> {
        match self.state {
            EditorState::Editing(id) => Some(id),
            _ => None,
        }
    }

    pub fn begin_create(&mut self) {
        self.reset_to(EditorState::Creating);
    }

    /// Pre-fills the form from `record`. Returns the id of an edit that was
    /// implicitly cancelled, if any.
    pub fn begin_edit(&mut self, record: &ClientRecord) -> Option<ClientId> {
        let replaced = self.editing_id().filter(|id| *id != record.id);
        self.reset_to(EditorState::Editing(record.id));
        self.form = ClientForm::from_record(record);
        replaced
    }

    pub fn cancel(&mut self) {
        self.reset_to(EditorState::Idle);
    }

    pub fn set_field(
        &mut self,
        field: FormField,
        value: impl Into<String>,
    ) -> Result<(), EditorError> {
        if !self.is_open() {
            return Err(EditorError::NotOpen);
        }
        self.form.set(field, value);
        Ok(())
    }

    /// Validates the form and turns it into a save intent tagged with `request`.
    /// On failure the state and form stay untouched.
    pub fn submit(&mut self, request: RequestId) -> Result<SaveIntent, EditorError> {
        if let Some(pending) = self.pending {
            return Err(EditorError::SaveInFlight(pending));
        }

        let intent = match self.state {
            EditorState::Idle => return Err(EditorError::NotOpen),
            EditorState::Creating => self.form.to_fields().map(SaveIntent::Create),
            EditorState::Editing(id) => self
                .form
                .to_fields()
                .map(|fields| SaveIntent::Update(id, fields)),
        };

        match intent {
            Ok(intent) => {
                self.pending = Some(request);
                self.last_error = None;
                Ok(intent)
            }
            Err(err) => {
                self.last_error = Some(err.clone());
                Err(err.into())
            }
        }
    }

    pub fn complete(&mut self, request: RequestId, result: Result<(), StoreError>) -> Completion {
        if self.pending != Some(request) {
            return Completion::Stale;
        }
        self.pending = None;

        match result {
            Ok(()) => {
                self.reset_to(EditorState::Idle);
                Completion::Settled
            }
            Err(err) => {
                self.last_error = Some(err);
                Completion::Rejected
            }
        }
    }

    fn reset_to(&mut self, state: EditorState) {
        self.state = state;
        self.form.clear();
        self.pending = None;
        self.last_error = None;
    }
}

#[cfg(test)]
#[path = "tests/editor_tests.rs"]
mod tests;
