//! Command orchestration helpers from reducer output to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub const QUEUE_FULL: &str = "UI command queue is full; please retry";
pub const BACKEND_DISCONNECTED: &str = "Backend worker disconnected; restart the application";

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut Option<String>,
) {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "backend command queue full");
            *status = Some(QUEUE_FULL.to_string());
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            *status = Some(BACKEND_DISCONNECTED.to_string());
        }
    }
}

pub fn dispatch_all(
    cmd_tx: &Sender<BackendCommand>,
    commands: Vec<BackendCommand>,
    status: &mut Option<String>,
) {
    for cmd in commands {
        dispatch_backend_command(cmd_tx, cmd, status);
    }
}
