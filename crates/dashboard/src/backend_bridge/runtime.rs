//! Runtime bridge between UI command queue and backend event intake.

use std::{
    io,
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam_channel::{Receiver, Sender};
use storage::{open_store, RecordStore, StoreConfig};
use tokio::runtime::{Builder, Runtime};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{StoreEvent, UiEvent},
};

const WORKER_THREAD_NAME: &str = "dashboard-backend";

/// Starts the backend worker: it builds its own runtime, opens the configured
/// store and then serves commands until either channel closes.
pub fn launch(
    config: StoreConfig,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            let Some(runtime) = build_runtime(&ui_tx) else {
                return;
            };

            let store = match runtime.block_on(open_store(&config)) {
                Ok(store) => store,
                Err(err) => {
                    tracing::error!(
                        store = %config.describe(),
                        "failed to open record store: {err:#}"
                    );
                    let _ = ui_tx.send(UiEvent::BackendFailed(format!(
                        "failed to open {} record store: {err:#}",
                        config.describe()
                    )));
                    return;
                }
            };
            tracing::info!(store = %config.describe(), "backend worker ready");
            serve(&runtime, store.as_ref(), &cmd_rx, &ui_tx);
        })
}

/// Same as [`launch`] for a store that is already open.
pub fn launch_with_store(
    store: Arc<dyn RecordStore>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            let Some(runtime) = build_runtime(&ui_tx) else {
                return;
            };
            serve(&runtime, store.as_ref(), &cmd_rx, &ui_tx);
        })
}

fn build_runtime(ui_tx: &Sender<UiEvent>) -> Option<Runtime> {
    match Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
    {
        Ok(runtime) => Some(runtime),
        Err(err) => {
            tracing::error!("failed to build backend runtime: {err}");
            let _ = ui_tx.send(UiEvent::BackendFailed(format!(
                "failed to build backend runtime: {err}"
            )));
            None
        }
    }
}

fn serve(
    runtime: &Runtime,
    store: &dyn RecordStore,
    cmd_rx: &Receiver<BackendCommand>,
    ui_tx: &Sender<UiEvent>,
) {
    // Commands run one at a time in arrival order.
    while let Ok(cmd) = cmd_rx.recv() {
        let name = cmd.name();
        let event = runtime.block_on(execute(store, cmd));
        tracing::debug!(command = name, request = %event.request(), "backend command finished");
        if ui_tx.send(UiEvent::Store(event)).is_err() {
            tracing::info!("ui event receiver dropped; stopping backend worker");
            break;
        }
    }
}

pub async fn execute(store: &dyn RecordStore, cmd: BackendCommand) -> StoreEvent {
    match cmd {
        BackendCommand::LoadAll { request } => StoreEvent::Loaded {
            request,
            result: store.list().await,
        },
        BackendCommand::Create { request, fields } => StoreEvent::Saved {
            request,
            result: store.create(fields).await,
        },
        BackendCommand::Update {
            request,
            id,
            fields,
        } => StoreEvent::Saved {
            request,
            result: store.update(id, fields).await,
        },
        BackendCommand::Delete { request, id } => StoreEvent::Deleted {
            request,
            id,
            result: store.delete(id).await,
        },
    }
}
