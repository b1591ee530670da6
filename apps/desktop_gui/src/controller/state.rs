//! Application state held by the view controller.

use shared::{
    domain::{EpisodeId, GuestId, DEFAULT_RATING},
    protocol::{CreateAppearanceRequest, EpisodeDetail, EpisodeSummary, GuestSummary},
};

/// The screen currently shown. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    EpisodeList,
    EpisodeDetail,
    GuestList,
    AppearanceForm,
}

impl ViewState {
    pub fn label(self) -> &'static str {
        match self {
            ViewState::EpisodeList => "Episodes",
            ViewState::EpisodeDetail => "Episode",
            ViewState::GuestList => "Guests",
            ViewState::AppearanceForm => "New Appearance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppearanceDraft {
    pub rating: i64,
    pub episode_id: Option<EpisodeId>,
    pub guest_id: Option<GuestId>,
}

impl Default for AppearanceDraft {
    fn default() -> Self {
        Self {
            rating: DEFAULT_RATING,
            episode_id: None,
            guest_id: None,
        }
    }
}

impl AppearanceDraft {
    pub fn to_request(&self) -> CreateAppearanceRequest {
        CreateAppearanceRequest {
            rating: self.rating,
            episode_id: self.episode_id,
            guest_id: self.guest_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub view: ViewState,
    pub episodes: Vec<EpisodeSummary>,
    pub guests: Vec<GuestSummary>,
    pub selected_episode: Option<EpisodeDetail>,
    pub draft: AppearanceDraft,
    pub status: Option<String>,
}

impl AppState {
    pub fn is_selected(&self, episode_id: EpisodeId) -> bool {
        self.selected_episode
            .as_ref()
            .is_some_and(|episode| episode.id == episode_id)
    }
}
