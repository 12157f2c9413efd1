//! Domain types shared by the record store, the dashboard controller and the tools binary.

pub mod domain;
pub mod error;
pub mod form;
