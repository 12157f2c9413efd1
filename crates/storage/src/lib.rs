//! Client record persistence: the store contract plus its in-memory and SQLite
//! deployments.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{ClientId, ClientRecord},
    error::StoreResult,
    form::ClientFields,
};

pub mod audit;
mod memory;
mod sqlite;

pub use audit::{AuditAction, AuditDescription, AuditRecord};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Value produced by a committed mutation together with its audit description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation<T> {
    pub value: T,
    pub audit: AuditDescription,
}

impl<T> Mutation<T> {
    pub fn new(value: T, audit: AuditDescription) -> Self {
        Self { value, audit }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records ordered by id ascending.
    async fn list(&self) -> StoreResult<Vec<ClientRecord>>;

    async fn get(&self, id: ClientId) -> StoreResult<ClientRecord>;

    async fn create(&self, fields: ClientFields) -> StoreResult<Mutation<ClientRecord>>;

    /// Replaces every mutable field; `id` and `created_at` are preserved.
    async fn update(
        &self,
        id: ClientId,
        fields: ClientFields,
    ) -> StoreResult<Mutation<ClientRecord>>;

    /// Removes the record and returns it. Deleting twice fails the second time.
    async fn delete(&self, id: ClientId) -> StoreResult<Mutation<ClientRecord>>;
}

/// Which deployment of the record store to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    Sqlite { database_url: String },
}

impl StoreConfig {
    pub fn describe(&self) -> String {
        match self {
            Self::Memory => "memory".to_string(),
            Self::Sqlite { database_url } => format!("sqlite ({database_url})"),
        }
    }
}

pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    Ok(match config {
        StoreConfig::Memory => Arc::new(MemoryStore::new()),
        StoreConfig::Sqlite { database_url } => Arc::new(SqliteStore::new(database_url).await?),
    })
}

/// Normalises and validates fields before they reach either backend.
fn prepare_fields(fields: ClientFields) -> StoreResult<ClientFields> {
    let fields = fields.normalized();
    fields.validate()?;
    Ok(fields)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
