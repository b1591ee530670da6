//! Backend commands queued from UI to backend worker.

use shared::{domain::EpisodeId, protocol::CreateAppearanceRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    LoadEpisodes,
    LoadGuests,
    LoadEpisodeDetail { episode_id: EpisodeId },
    DeleteEpisode { episode_id: EpisodeId },
    CreateAppearance { request: CreateAppearanceRequest },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadEpisodes => "load_episodes",
            BackendCommand::LoadGuests => "load_guests",
            BackendCommand::LoadEpisodeDetail { .. } => "load_episode_detail",
            BackendCommand::DeleteEpisode { .. } => "delete_episode",
            BackendCommand::CreateAppearance { .. } => "create_appearance",
        }
    }
}
