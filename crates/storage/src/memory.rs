use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::{ClientId, ClientRecord},
    error::{StoreError, StoreResult},
    form::ClientFields,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{audit::AuditDescription, prepare_fields, Mutation, RecordStore};

/// Local record store. Ids come from a high-water mark so a deleted id is
/// never handed out again.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: BTreeMap<ClientId, ClientRecord>,
    high_water: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing snapshot, e.g. an initial data load.
    pub fn with_records(records: impl IntoIterator<Item = ClientRecord>) -> Self {
        let records: BTreeMap<_, _> = records.into_iter().map(|r| (r.id, r)).collect();
        let high_water = records.keys().map(|id| id.0).max().unwrap_or(0);
        Self {
            inner: RwLock::new(MemoryState {
                records,
                high_water,
            }),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<ClientRecord>> {
        let state = self.inner.read().await;
        Ok(state.records.values().cloned().collect())
    }

    async fn get(&self, id: ClientId) -> StoreResult<ClientRecord> {
        let state = self.inner.read().await;
        state.records.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, fields: ClientFields) -> StoreResult<Mutation<ClientRecord>> {
        let fields = prepare_fields(fields)?;
        let mut state = self.inner.write().await;

        let highest_live = state.records.keys().next_back().map_or(0, |id| id.0);
        let id = state
            .high_water
            .max(highest_live)
            .checked_add(1)
            .map(ClientId)
            .ok_or_else(|| StoreError::transport("client id space exhausted"))?;
        state.high_water = id.0;

        let record = ClientRecord {
            id,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            address: fields.address,
            created_at: Utc::now(),
        };
        state.records.insert(id, record.clone());
        debug!(client_id = id.0, "memory store created client");

        let audit = AuditDescription::created(&record);
        Ok(Mutation::new(record, audit))
    }

    async fn update(
        &self,
        id: ClientId,
        fields: ClientFields,
    ) -> StoreResult<Mutation<ClientRecord>> {
        let fields = prepare_fields(fields)?;
        let mut state = self.inner.write().await;
        let slot = state.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        let previous = slot.clone();
        slot.name = fields.name;
        slot.email = fields.email;
        slot.phone = fields.phone;
        slot.address = fields.address;
        let current = slot.clone();
        debug!(client_id = id.0, "memory store updated client");

        let audit = AuditDescription::updated(&previous, &current);
        Ok(Mutation::new(current, audit))
    }

    async fn delete(&self, id: ClientId) -> StoreResult<Mutation<ClientRecord>> {
        let mut state = self.inner.write().await;
        let removed = state.records.remove(&id).ok_or(StoreError::NotFound(id))?;
        debug!(client_id = id.0, "memory store deleted client");

        let audit = AuditDescription::deleted(&removed);
        Ok(Mutation::new(removed, audit))
    }
}
