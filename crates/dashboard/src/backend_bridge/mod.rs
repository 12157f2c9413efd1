//! Bridge between the UI thread and the worker that talks to the record store.

pub mod commands;
pub mod runtime;
