//! Drives the dashboard through the real backend worker thread.

use std::{sync::Arc, time::Duration};

use crossbeam_channel::{bounded, Receiver};
use dashboard::{
    backend_bridge::runtime::{launch, launch_with_store},
    Dashboard, DashboardConfig, EditorState, InteractionKind, Surface, UiEvent,
};
use shared::{domain::ClientId, form::FormField};
use storage::{MemoryStore, StoreConfig};

const WAIT: Duration = Duration::from_secs(10);

fn wait_for_idle(dashboard: &mut Dashboard, ui_rx: &Receiver<UiEvent>) {
    while dashboard.in_flight() > 0 {
        let event = ui_rx.recv_timeout(WAIT).expect("backend answered in time");
        dashboard.handle(event);
    }
}

fn fill_and_submit(dashboard: &mut Dashboard, name: &str, email: &str) {
    dashboard.handle(UiEvent::Interaction {
        kind: InteractionKind::Click,
        surface: Surface::AddButton,
    });
    for (field, value) in [(FormField::Name, name), (FormField::Email, email)] {
        dashboard.handle(UiEvent::FieldEdited {
            field,
            value: value.to_string(),
        });
    }
    dashboard.handle(UiEvent::Interaction {
        kind: InteractionKind::Submit,
        surface: Surface::Form,
    });
}

#[test]
fn memory_backend_round_trip() {
    let (cmd_tx, cmd_rx) = bounded(64);
    let (ui_tx, ui_rx) = bounded(256);
    let worker = launch_with_store(Arc::new(MemoryStore::new()), cmd_rx, ui_tx).expect("spawn");

    let mut dashboard = Dashboard::new(DashboardConfig::default(), cmd_tx);
    dashboard.start();
    wait_for_idle(&mut dashboard, &ui_rx);
    assert!(dashboard.records().is_empty());

    fill_and_submit(&mut dashboard, "Fry", "fry@pe.com");
    wait_for_idle(&mut dashboard, &ui_rx);
    fill_and_submit(&mut dashboard, "Leela", "leela@pe.com");
    wait_for_idle(&mut dashboard, &ui_rx);

    dashboard.handle(UiEvent::Interaction {
        kind: InteractionKind::Click,
        surface: Surface::DeleteControl(ClientId(1)),
    });
    wait_for_idle(&mut dashboard, &ui_rx);
    fill_and_submit(&mut dashboard, "Zoidberg", "z@pe.com");
    wait_for_idle(&mut dashboard, &ui_rx);

    let ids: Vec<_> = dashboard.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![ClientId(2), ClientId(3)]);
    assert_eq!(dashboard.editor().state(), EditorState::Idle);

    drop(dashboard);
    worker.join().expect("worker exits once the queue closes");
}

#[test]
fn sqlite_backend_round_trip() {
    let (cmd_tx, cmd_rx) = bounded(64);
    let (ui_tx, ui_rx) = bounded(256);
    let config = StoreConfig::Sqlite {
        database_url: "sqlite::memory:".to_string(),
    };
    let worker = launch(config, cmd_rx, ui_tx).expect("spawn");

    let mut dashboard = Dashboard::new(DashboardConfig::default(), cmd_tx);
    dashboard.start();
    wait_for_idle(&mut dashboard, &ui_rx);

    fill_and_submit(&mut dashboard, "Hermes Conrad", "hermes@pe.com");
    wait_for_idle(&mut dashboard, &ui_rx);

    assert_eq!(dashboard.records().len(), 1);
    assert_eq!(dashboard.records()[0].name, "Hermes Conrad");
    let newest = dashboard.log_entries()[0].message.clone();
    assert_eq!(newest, "Audit: New client Hermes Conrad registered as #1");

    drop(dashboard);
    worker.join().expect("worker exits");
}

#[test]
fn unreachable_store_reports_backend_failure() {
    let (cmd_tx, cmd_rx) = bounded(64);
    let (ui_tx, ui_rx) = bounded(256);
    let config = StoreConfig::Sqlite {
        database_url: "postgres://not-sqlite".to_string(),
    };
    let worker = launch(config, cmd_rx, ui_tx).expect("spawn");

    let mut dashboard = Dashboard::new(DashboardConfig::default(), cmd_tx);
    let event = ui_rx.recv_timeout(WAIT).expect("startup failure reported");
    dashboard.handle(event);
    worker.join().expect("worker stops after startup failure");

    assert!(dashboard.status().starts_with("Backend startup failed"));
    dashboard.start();
    assert!(dashboard
        .last_error()
        .expect("dispatch error")
        .message()
        .contains("disconnected"));
}
