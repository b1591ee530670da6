use serde::{Deserialize, Serialize};

use crate::domain::{AppearanceId, EpisodeId, GuestId, DEFAULT_RATING};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub id: EpisodeId,
    pub number: i64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestSummary {
    pub id: GuestId,
    pub name: String,
    pub occupation: String,
}

/// Guest as embedded in an appearance read. Only `name` and `occupation` are
/// guaranteed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<GuestId>,
    pub name: String,
    pub occupation: String,
}

impl From<GuestSummary> for GuestProfile {
    fn from(value: GuestSummary) -> Self {
        Self {
            id: Some(value.id),
            name: value.name,
            occupation: value.occupation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceDetail {
    pub id: AppearanceId,
    pub rating: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<EpisodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<GuestId>,
    pub guest: GuestProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeDetail {
    pub id: EpisodeId,
    pub number: i64,
    pub date: String,
    pub appearances: Vec<AppearanceDetail>,
}

/// Body of `POST /appearances`. Unselected ids are sent as `null`; the server
/// is the only validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAppearanceRequest {
    pub rating: i64,
    pub episode_id: Option<EpisodeId>,
    pub guest_id: Option<GuestId>,
}

impl Default for CreateAppearanceRequest {
    fn default() -> Self {
        Self {
            rating: DEFAULT_RATING,
            episode_id: None,
            guest_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceRecord {
    pub id: AppearanceId,
    pub rating: i64,
    pub episode_id: EpisodeId,
    pub guest_id: GuestId,
    pub episode: EpisodeSummary,
    pub guest: GuestSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
