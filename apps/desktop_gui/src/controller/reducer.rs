//! Pure state transitions for the view controller.
//!
//! Every user intent and backend result goes through [`reduce`], which returns
//! the next state together with the backend commands to queue. Nothing here
//! touches egui or the network.

use shared::domain::{EpisodeId, GuestId};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    appearance_failure_message, UiEvent, APPEARANCE_CREATED, EPISODE_DELETED,
    EPISODE_DELETE_FAILED,
};
use crate::controller::state::{AppState, AppearanceDraft, ViewState};

/// Intents raised by the rendered views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Startup,
    Navigate(ViewState),
    BackToEpisodes,
    OpenEpisode(EpisodeId),
    DeleteEpisode(EpisodeId),
    SetDraftRating(i64),
    SelectDraftEpisode(Option<EpisodeId>),
    SelectDraftGuest(Option<GuestId>),
    SubmitAppearance,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Action(UiAction),
    Backend(UiEvent),
}

impl From<UiAction> for Message {
    fn from(action: UiAction) -> Self {
        Message::Action(action)
    }
}

impl From<UiEvent> for Message {
    fn from(event: UiEvent) -> Self {
        Message::Backend(event)
    }
}

pub fn reduce(mut state: AppState, message: Message) -> (AppState, Vec<BackendCommand>) {
    let mut commands = Vec::new();
    match message {
        Message::Action(action) => apply_action(&mut state, action, &mut commands),
        Message::Backend(event) => apply_event(&mut state, event, &mut commands),
    }
    (state, commands)
}

fn apply_action(state: &mut AppState, action: UiAction, commands: &mut Vec<BackendCommand>) {
    match action {
        UiAction::Startup => {
            commands.push(BackendCommand::LoadEpisodes);
            commands.push(BackendCommand::LoadGuests);
        }
        UiAction::Navigate(ViewState::EpisodeDetail) => {
            if state.selected_episode.is_some() {
                state.view = ViewState::EpisodeDetail;
            }
        }
        UiAction::Navigate(view) => state.view = view,
        UiAction::BackToEpisodes => state.view = ViewState::EpisodeList,
        UiAction::OpenEpisode(episode_id) => {
            commands.push(BackendCommand::LoadEpisodeDetail { episode_id });
        }
        UiAction::DeleteEpisode(episode_id) => {
            commands.push(BackendCommand::DeleteEpisode { episode_id });
        }
        UiAction::SetDraftRating(rating) => state.draft.rating = rating,
        UiAction::SelectDraftEpisode(episode_id) => state.draft.episode_id = episode_id,
        UiAction::SelectDraftGuest(guest_id) => state.draft.guest_id = guest_id,
        UiAction::SubmitAppearance => {
            commands.push(BackendCommand::CreateAppearance {
                request: state.draft.to_request(),
            });
        }
    }
}

fn apply_event(state: &mut AppState, event: UiEvent, commands: &mut Vec<BackendCommand>) {
    match event {
        UiEvent::EpisodesLoaded(Ok(episodes)) => state.episodes = episodes,
        UiEvent::EpisodesLoaded(Err(err)) => {
            tracing::warn!(error = %err, "failed to load episodes");
        }
        UiEvent::GuestsLoaded(Ok(guests)) => state.guests = guests,
        UiEvent::GuestsLoaded(Err(err)) => {
            tracing::warn!(error = %err, "failed to load guests");
        }
        UiEvent::EpisodeDetailLoaded {
            result: Ok(detail), ..
        } => {
            state.selected_episode = Some(detail);
            state.view = ViewState::EpisodeDetail;
        }
        UiEvent::EpisodeDetailLoaded {
            episode_id,
            result: Err(err),
        } => {
            if err.status().is_some() {
                tracing::debug!(episode_id = episode_id.0, error = %err, "episode detail unavailable");
            } else {
                tracing::warn!(episode_id = episode_id.0, error = %err, "failed to load episode detail");
            }
        }
        UiEvent::EpisodeDeleted {
            episode_id,
            result: Ok(()),
        } => {
            state.status = Some(EPISODE_DELETED.to_string());
            commands.push(BackendCommand::LoadEpisodes);
            if state.is_selected(episode_id) {
                state.selected_episode = None;
                state.view = ViewState::EpisodeList;
            }
        }
        UiEvent::EpisodeDeleted {
            episode_id,
            result: Err(err),
        } => {
            tracing::warn!(episode_id = episode_id.0, error = %err, "failed to delete episode");
            state.status = Some(EPISODE_DELETE_FAILED.to_string());
        }
        UiEvent::AppearanceCreated(Ok(record)) => {
            tracing::info!(appearance_id = record.id.0, "appearance created");
            state.status = Some(APPEARANCE_CREATED.to_string());
            state.draft = AppearanceDraft::default();
            commands.push(BackendCommand::LoadEpisodes);
            commands.push(BackendCommand::LoadGuests);
        }
        UiEvent::AppearanceCreated(Err(err)) => {
            tracing::warn!(error = %err, "failed to create appearance");
            state.status = Some(appearance_failure_message(&err));
        }
    }
}

/// Resolves a click on an episode card. The nested delete button wins over
/// the card body so one click never both opens and deletes.
pub fn card_click_action(
    episode_id: EpisodeId,
    card_clicked: bool,
    delete_clicked: bool,
) -> Option<UiAction> {
    if delete_clicked {
        Some(UiAction::DeleteEpisode(episode_id))
    } else if card_clicked {
        Some(UiAction::OpenEpisode(episode_id))
    } else {
        None
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
