//! Scripted walk through the dashboard controller against a live backend
//! worker. Prints the resulting client list and activity log.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use crossbeam_channel::{bounded, Receiver};
use dashboard::{
    backend_bridge::runtime::launch, Dashboard, DashboardConfig, InteractionKind, Surface, UiEvent,
};
use shared::{domain::ClientId, form::FormField};
use storage::StoreConfig;

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

pub fn run(store: StoreConfig, config: DashboardConfig) -> Result<()> {
    let (cmd_tx, cmd_rx) = bounded(256);
    let (ui_tx, ui_rx) = bounded(2048);
    let worker = launch(store, cmd_rx, ui_tx).context("failed to spawn backend worker")?;

    let mut dashboard = Dashboard::new(config, cmd_tx);
    dashboard.start();
    settle(&mut dashboard, &ui_rx)?;

    interact(&mut dashboard, InteractionKind::MouseEnter, Surface::AddButton);
    add_client(&mut dashboard, &ui_rx, "Philip J. Fry", "fry@planetexpress.com")?;
    add_client(&mut dashboard, &ui_rx, "Turanga Leela", "leela@planetexpress.com")?;

    dashboard.handle(UiEvent::SearchChanged("le".to_string()));
    interact(&mut dashboard, InteractionKind::Blur, Surface::SearchBox);
    let leela = find_visible(&dashboard, "Turanga Leela")?;
    interact(&mut dashboard, InteractionKind::DoubleClick, Surface::ClientRow(leela));
    type_field(&mut dashboard, FormField::Phone, "3000-0102");
    type_field(&mut dashboard, FormField::Address, "Orphanarium, NNY");
    interact(&mut dashboard, InteractionKind::Submit, Surface::Form);
    settle(&mut dashboard, &ui_rx)?;

    dashboard.handle(UiEvent::SearchChanged(String::new()));
    interact(&mut dashboard, InteractionKind::Paste, Surface::TestPad);
    interact(&mut dashboard, InteractionKind::Copy, Surface::TestPad);
    interact(&mut dashboard, InteractionKind::Scroll, Surface::LogPanel);
    let fry = find_visible(&dashboard, "Philip J. Fry")?;
    interact(&mut dashboard, InteractionKind::Click, Surface::DeleteControl(fry));
    settle(&mut dashboard, &ui_rx)?;

    println!("clients:");
    for record in dashboard.visible_records() {
        println!(
            "  {:>4}  {:<24} {:<28} {}",
            record.id.to_string(),
            record.name,
            record.email,
            record.phone.as_deref().unwrap_or("-")
        );
    }
    println!("activity log ({} entries):", dashboard.activity_log().len());
    for entry in dashboard.log_entries() {
        println!("  [{}] > {}", entry.timestamp, entry.message);
    }
    if !dashboard.status().is_empty() {
        println!("status: {}", dashboard.status());
    }

    drop(dashboard);
    worker
        .join()
        .map_err(|_| anyhow!("backend worker panicked"))?;
    Ok(())
}

fn add_client(
    dashboard: &mut Dashboard,
    ui_rx: &Receiver<UiEvent>,
    name: &str,
    email: &str,
) -> Result<()> {
    interact(dashboard, InteractionKind::Click, Surface::AddButton);
    type_field(dashboard, FormField::Name, name);
    type_field(dashboard, FormField::Email, email);
    interact(dashboard, InteractionKind::Submit, Surface::Form);
    settle(dashboard, ui_rx)
}

fn interact(dashboard: &mut Dashboard, kind: InteractionKind, surface: Surface) {
    dashboard.handle(UiEvent::Interaction { kind, surface });
}

fn type_field(dashboard: &mut Dashboard, field: FormField, value: &str) {
    dashboard.handle(UiEvent::FieldEdited {
        field,
        value: value.to_string(),
    });
}

fn find_visible(dashboard: &Dashboard, name: &str) -> Result<ClientId> {
    dashboard
        .visible_records()
        .into_iter()
        .find(|r| r.name == name)
        .map(|r| r.id)
        .ok_or_else(|| anyhow!("client '{name}' is not listed"))
}

/// Waits until every queued command has completed.
fn settle(dashboard: &mut Dashboard, ui_rx: &Receiver<UiEvent>) -> Result<()> {
    while dashboard.in_flight() > 0 {
        let event = ui_rx
            .recv_timeout(COMPLETION_TIMEOUT)
            .context("backend worker did not answer")?;
        let failed = matches!(event, UiEvent::BackendFailed(_));
        dashboard.handle(event);
        if failed {
            bail!("{}", dashboard.status());
        }
    }
    Ok(())
}
