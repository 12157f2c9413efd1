use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ClientId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    NotFound,
    Transport,
}

/// Serialisable failure handed to the presentation surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{field} is required")]
    Validation { field: &'static str },
    #[error("client {0} not found")]
    NotFound(ClientId),
    #[error("record store unreachable: {0}")]
    Transport(String),
}

impl StoreError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::Validation,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Transport(_) => ErrorCode::Transport,
        }
    }

    /// Validation and not-found failures leave the form open for correction.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Transport(_))
    }
}

impl From<&StoreError> for ApiError {
    fn from(value: &StoreError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        Self::from(&value)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
