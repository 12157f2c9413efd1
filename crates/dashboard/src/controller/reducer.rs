//! Single owner of dashboard state. Every mutation happens inside
//! [`Dashboard::handle`] on the UI thread; store calls leave through the
//! command queue and come back as [`StoreEvent`]s.

use std::collections::BTreeSet;

use crossbeam_channel::{Receiver, Sender};
use shared::{
    domain::{ClientId, ClientRecord},
    error::StoreError,
};
use tracing::{debug, info, warn};

use crate::{
    activity_log::{ActivityLog, DisplayOrder, LogEntry, DEFAULT_CAPACITY},
    backend_bridge::commands::{BackendCommand, RequestId},
    controller::{
        events::{StoreEvent, UiError, UiErrorContext, UiEvent},
        orchestration::dispatch_backend_command,
    },
    editor::{Completion, Editor},
    interaction::{describe, InteractionKind, Surface},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    pub log_capacity: usize,
    pub log_order: DisplayOrder,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_CAPACITY,
            log_order: DisplayOrder::NewestFirst,
        }
    }
}

pub struct Dashboard {
    config: DashboardConfig,
    records: Vec<ClientRecord>,
    search: String,
    editor: Editor,
    log: ActivityLog,
    cmd_tx: Sender<BackendCommand>,
    next_request: u64,
    in_flight: BTreeSet<RequestId>,
    status: String,
    last_error: Option<UiError>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, cmd_tx: Sender<BackendCommand>) -> Self {
        Self {
            config,
            records: Vec::new(),
            search: String::new(),
            editor: Editor::new(),
            log: ActivityLog::new(config.log_capacity),
            cmd_tx,
            next_request: 0,
            in_flight: BTreeSet::new(),
            status: String::new(),
            last_error: None,
        }
    }

    /// Requests the initial data load. Call once when the dashboard is first shown.
    pub fn start(&mut self) {
        let request = self.next_request_id();
        if self.dispatch(BackendCommand::LoadAll { request }).is_ok() {
            self.status = "Loading clients...".to_string();
        }
    }

    pub fn records(&self) -> &[ClientRecord] {
        &self.records
    }

    /// Records whose name contains the search query, ignoring case.
    pub fn visible_records(&self) -> Vec<&ClientRecord> {
        self.records
            .iter()
            .filter(|r| r.name_matches(&self.search))
            .collect()
    }

    pub fn search_query(&self) -> &str {
        &self.search
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn activity_log(&self) -> &ActivityLog {
        &self.log
    }

    /// Log entries in the configured display order.
    pub fn log_entries(&self) -> Vec<&LogEntry> {
        self.log.entries(self.config.log_order)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn last_error(&self) -> Option<&UiError> {
        self.last_error.as_ref()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Applies every event currently waiting on `ui_rx` without blocking.
    pub fn pump(&mut self, ui_rx: &Receiver<UiEvent>) -> usize {
        let mut applied = 0;
        while let Ok(event) = ui_rx.try_recv() {
            self.handle(event);
            applied += 1;
        }
        applied
    }

    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::Interaction { kind, surface } => self.on_interaction(kind, surface),
            UiEvent::FieldEdited { field, value } => {
                self.log
                    .push(describe(InteractionKind::Input, Surface::FormField(field)));
                if let Err(err) = self.editor.set_field(field, value) {
                    debug!(%field, "ignored field edit: {err}");
                }
            }
            UiEvent::SearchChanged(query) => {
                self.log
                    .push(describe(InteractionKind::Change, Surface::SearchBox));
                self.search = query;
            }
            UiEvent::Store(event) => self.on_store(event),
            UiEvent::BackendFailed(message) => {
                // Nothing queued before the failure will ever complete.
                self.in_flight.clear();
                if let Some(request) = self.editor.pending() {
                    self.editor
                        .complete(request, Err(StoreError::transport(message.clone())));
                }
                self.fail(UiError::transport(UiErrorContext::BackendStartup, message));
            }
        }
    }

    fn on_interaction(&mut self, kind: InteractionKind, surface: Surface) {
        self.log.push(describe(kind, surface));

        match (kind, surface) {
            (InteractionKind::Click, Surface::AddButton) => self.editor.begin_create(),
            (InteractionKind::DoubleClick, Surface::ClientRow(id))
            | (InteractionKind::Click, Surface::EditControl(id)) => self.begin_edit(id),
            (InteractionKind::Click, Surface::DeleteControl(id)) => self.request_delete(id),
            (InteractionKind::Submit, Surface::Form) => self.save(),
            (InteractionKind::Reset, Surface::Form)
            | (InteractionKind::Click, Surface::CancelButton) => self.editor.cancel(),
            _ => {}
        }
    }

    fn begin_edit(&mut self, id: ClientId) {
        let Some(record) = self.records.iter().find(|r| r.id == id).cloned() else {
            self.log.push(format!("Client {id} is no longer listed"));
            return;
        };
        if self.editor.editing_id() == Some(id) && self.editor.pending().is_some() {
            self.log
                .push(format!("Save of client {id} still in progress; form kept"));
            return;
        }
        if let Some(replaced) = self.editor.begin_edit(&record) {
            self.log
                .push(format!("Discarded unsaved edit of client {replaced}"));
        }
    }

    fn save(&mut self) {
        let request = self.next_request_id();
        match self.editor.submit(request) {
            Ok(intent) => {
                if let Err(reason) = self.dispatch(intent.into_command(request)) {
                    self.editor
                        .complete(request, Err(StoreError::transport(reason)));
                }
            }
            Err(err) => {
                let message = format!("Save rejected: {err}");
                self.log.push(message.clone());
                self.status = message;
            }
        }
    }

    fn request_delete(&mut self, id: ClientId) {
        let request = self.next_request_id();
        if self.dispatch(BackendCommand::Delete { request, id }).is_ok() {
            self.status = format!("Deleting client {id}...");
        }
    }

    fn on_store(&mut self, event: StoreEvent) {
        self.in_flight.remove(&event.request());

        match event {
            StoreEvent::Loaded { result, .. } => match result {
                Ok(mut records) => {
                    records.sort_by_key(|r| r.id);
                    info!(count = records.len(), "client snapshot loaded");
                    self.log.push(format!("Loaded {} clients", records.len()));
                    self.status = format!("{} clients", records.len());
                    self.records = records;
                }
                Err(err) => self.fail(UiError::from_store(UiErrorContext::Load, &err)),
            },
            StoreEvent::Saved { request, result } => {
                let settled = result.map(|mutation| {
                    self.log.push(format!("Audit: {}", mutation.audit.detail));
                    self.upsert_record(mutation.value);
                });
                let failure = settled.as_ref().err().cloned();

                match self.editor.complete(request, settled) {
                    Completion::Settled => self.status = "Client saved".to_string(),
                    Completion::Rejected => {}
                    Completion::Stale => {
                        debug!(%request, "save completed after the editor moved on")
                    }
                }
                if let Some(err) = failure {
                    self.fail(UiError::from_store(UiErrorContext::Save, &err));
                }
            }
            StoreEvent::Deleted { id, result, .. } => match result {
                Ok(mutation) => {
                    self.log.push(format!("Audit: {}", mutation.audit.detail));
                    self.records.retain(|r| r.id != id);
                    self.status = format!("Client {id} deleted");
                    if self.editor.editing_id() == Some(id) {
                        self.editor.cancel();
                        self.log.push(format!("Closed editor for deleted client {id}"));
                    }
                }
                Err(err) => self.fail(UiError::from_store(UiErrorContext::Delete, &err)),
            },
        }
    }

    fn upsert_record(&mut self, record: ClientRecord) {
        match self.records.binary_search_by_key(&record.id, |r| r.id) {
            Ok(index) => self.records[index] = record,
            Err(index) => self.records.insert(index, record),
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) -> Result<(), String> {
        let request = cmd.request();
        match dispatch_backend_command(&self.cmd_tx, cmd) {
            Ok(()) => {
                self.in_flight.insert(request);
                Ok(())
            }
            Err(reason) => {
                self.fail(UiError::transport(UiErrorContext::Dispatch, reason.clone()));
                Err(reason)
            }
        }
    }

    fn fail(&mut self, err: UiError) {
        let summary = err.summary();
        warn!(context = ?err.context(), category = ?err.category(), "{}", err.message());
        self.log.push(summary.clone());
        self.status = summary;
        self.last_error = Some(err);
    }

    fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
