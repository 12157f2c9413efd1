//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` without blocking the UI thread. On failure the returned text
/// explains why and nothing was queued.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), String> {
    let cmd_name = cmd.name();
    let request = cmd.request();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, %request, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, %request, "backend command queue is full");
            Err("UI command queue is full".to_string())
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::warn!(command = cmd_name, %request, "backend command processor disconnected");
            Err("backend command processor disconnected".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;
    use crate::backend_bridge::commands::RequestId;

    #[test]
    fn queues_command_when_there_is_room() {
        let (tx, rx) = bounded(1);
        dispatch_backend_command(&tx, BackendCommand::LoadAll { request: RequestId(1) })
            .expect("queued");
        assert_eq!(
            rx.try_recv().ok(),
            Some(BackendCommand::LoadAll { request: RequestId(1) })
        );
    }

    #[test]
    fn reports_full_and_disconnected_queues() {
        let (tx, rx) = bounded(1);
        dispatch_backend_command(&tx, BackendCommand::LoadAll { request: RequestId(1) })
            .expect("queued");
        let err = dispatch_backend_command(&tx, BackendCommand::LoadAll { request: RequestId(2) })
            .expect_err("full");
        assert!(err.contains("full"));

        drop(rx);
        let err = dispatch_backend_command(&tx, BackendCommand::LoadAll { request: RequestId(3) })
            .expect_err("disconnected");
        assert!(err.contains("disconnected"));
    }
}
