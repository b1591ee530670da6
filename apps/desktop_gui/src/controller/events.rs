//! Results delivered from the backend worker to the UI thread.

use client_core::ClientError;
use shared::{
    domain::EpisodeId,
    protocol::{AppearanceRecord, EpisodeDetail, EpisodeSummary, GuestSummary},
};

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    EpisodesLoaded(Result<Vec<EpisodeSummary>, ClientError>),
    GuestsLoaded(Result<Vec<GuestSummary>, ClientError>),
    EpisodeDetailLoaded {
        episode_id: EpisodeId,
        result: Result<EpisodeDetail, ClientError>,
    },
    EpisodeDeleted {
        episode_id: EpisodeId,
        result: Result<(), ClientError>,
    },
    AppearanceCreated(Result<AppearanceRecord, ClientError>),
}

pub const EPISODE_DELETED: &str = "Episode deleted successfully!";
pub const EPISODE_DELETE_FAILED: &str = "Error deleting episode";
pub const APPEARANCE_CREATED: &str = "Appearance created successfully!";
pub const APPEARANCE_CREATE_FAILED: &str = "Error creating appearance";

/// Status line for a failed appearance submission. Server-supplied error
/// payloads are shown verbatim as JSON; anything without a body falls back to
/// the generic message.
pub fn appearance_failure_message(err: &ClientError) -> String {
    match err {
        ClientError::Validation { errors, .. } => format!("Error: {errors}"),
        ClientError::Status {
            body: Some(body), ..
        } => format!("Error: {body}"),
        ClientError::Status { body: None, .. }
        | ClientError::Transport(_)
        | ClientError::Decode(_)
        | ClientError::InvalidUrl { .. } => APPEARANCE_CREATE_FAILED.to_string(),
    }
}
