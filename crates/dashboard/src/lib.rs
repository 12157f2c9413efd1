//! Headless core of the client dashboard: the activity log, the editor
//! workflow, and the controller that ties them to the record store through a
//! backend worker.

pub mod activity_log;
pub mod backend_bridge;
pub mod controller;
pub mod editor;
pub mod interaction;

pub use activity_log::{ActivityLog, DisplayOrder, LogEntry, LogEntryId, UnknownDisplayOrder};
pub use backend_bridge::commands::{BackendCommand, RequestId};
pub use controller::{
    events::{StoreEvent, UiError, UiEvent},
    reducer::{Dashboard, DashboardConfig},
};
pub use editor::{Editor, EditorError, EditorState, SaveIntent};
pub use interaction::{InteractionKind, Surface};
