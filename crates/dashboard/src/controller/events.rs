//! UI/backend events and error modeling for the dashboard controller.

use shared::{
    domain::{ClientId, ClientRecord},
    error::{ErrorCode, StoreError, StoreResult},
    form::FormField,
};
use storage::Mutation;

use crate::{
    backend_bridge::commands::RequestId,
    interaction::{InteractionKind, Surface},
};

pub enum UiEvent {
    Interaction {
        kind: InteractionKind,
        surface: Surface,
    },
    FieldEdited {
        field: FormField,
        value: String,
    },
    SearchChanged(String),
    Store(StoreEvent),
    BackendFailed(String),
}

/// Completion of a backend command, delivered back on the UI thread.
#[derive(Debug)]
pub enum StoreEvent {
    Loaded {
        request: RequestId,
        result: StoreResult<Vec<ClientRecord>>,
    },
    Saved {
        request: RequestId,
        result: StoreResult<Mutation<ClientRecord>>,
    },
    Deleted {
        request: RequestId,
        id: ClientId,
        result: StoreResult<Mutation<ClientRecord>>,
    },
}

impl StoreEvent {
    pub fn request(&self) -> RequestId {
        match self {
            Self::Loaded { request, .. }
            | Self::Saved { request, .. }
            | Self::Deleted { request, .. } => *request,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    NotFound,
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Load,
    Save,
    Delete,
    Dispatch,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_store(context: UiErrorContext, err: &StoreError) -> Self {
        let category = match err.code() {
            ErrorCode::Validation => UiErrorCategory::Validation,
            ErrorCode::NotFound => UiErrorCategory::NotFound,
            ErrorCode::Transport => UiErrorCategory::Transport,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn transport(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Transport,
            context,
            message: message.into(),
        }
    }

    /// Transport failures are surfaced once; the user has to submit again.
    pub fn requires_resubmit(&self) -> bool {
        self.category == UiErrorCategory::Transport
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn summary(&self) -> String {
        let action = match self.context {
            UiErrorContext::BackendStartup => "Backend startup failed",
            UiErrorContext::Load => "Load failed",
            UiErrorContext::Save => "Save failed",
            UiErrorContext::Delete => "Delete failed",
            UiErrorContext::Dispatch => "Command not queued",
        };
        if self.requires_resubmit() {
            format!("{action}: {}; please retry", self.message)
        } else {
            format!("{action}: {}", self.message)
        }
    }
}
