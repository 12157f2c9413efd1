//! Backend commands queued from the controller to the backend worker.

use std::fmt;

use shared::{domain::ClientId, form::ClientFields};

/// Correlates a queued command with its completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    LoadAll {
        request: RequestId,
    },
    Create {
        request: RequestId,
        fields: ClientFields,
    },
    Update {
        request: RequestId,
        id: ClientId,
        fields: ClientFields,
    },
    Delete {
        request: RequestId,
        id: ClientId,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadAll { .. } => "load_all",
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    pub fn request(&self) -> RequestId {
        match self {
            Self::LoadAll { request }
            | Self::Create { request, .. }
            | Self::Update { request, .. }
            | Self::Delete { request, .. } => *request,
        }
    }
}
