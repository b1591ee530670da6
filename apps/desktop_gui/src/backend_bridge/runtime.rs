//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::LateShowApi;
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Starts the backend worker thread. Each command becomes its own task, so
/// requests run concurrently and complete in any order.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    api: Arc<dyn LateShowApi>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };
        tracing::info!("backend worker started");

        while let Ok(cmd) = cmd_rx.recv() {
            let api = Arc::clone(&api);
            let ui_tx = ui_tx.clone();
            runtime.spawn(async move {
                let cmd_name = cmd.name();
                let event = execute(api.as_ref(), cmd).await;
                if ui_tx.try_send(event).is_err() {
                    tracing::warn!(command = cmd_name, "dropping backend result; ui queue unavailable");
                }
            });
        }

        tracing::info!("backend command channel closed; worker exiting");
    })
}

pub async fn execute(api: &dyn LateShowApi, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::LoadEpisodes => UiEvent::EpisodesLoaded(api.list_episodes().await),
        BackendCommand::LoadGuests => UiEvent::GuestsLoaded(api.list_guests().await),
        BackendCommand::LoadEpisodeDetail { episode_id } => UiEvent::EpisodeDetailLoaded {
            episode_id,
            result: api.episode_detail(episode_id).await,
        },
        BackendCommand::DeleteEpisode { episode_id } => UiEvent::EpisodeDeleted {
            episode_id,
            result: api.delete_episode(episode_id).await,
        },
        BackendCommand::CreateAppearance { request } => {
            UiEvent::AppearanceCreated(api.create_appearance(&request).await)
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
