use shared::{
    domain::EpisodeId,
    error::{ApiException, EPISODE_NOT_FOUND},
    protocol::{
        AppearanceDetail, AppearanceRecord, CreateAppearanceRequest, EpisodeDetail,
        EpisodeSummary, GuestProfile, GuestSummary,
    },
};
use storage::{AppearanceInsert, Storage, StoredEpisode, StoredGuest};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_episodes(ctx: &ApiContext) -> Result<Vec<EpisodeSummary>, ApiException> {
    let episodes = ctx.storage.list_episodes().await.map_err(internal)?;
    Ok(episodes.into_iter().map(episode_summary).collect())
}

pub async fn list_guests(ctx: &ApiContext) -> Result<Vec<GuestSummary>, ApiException> {
    let guests = ctx.storage.list_guests().await.map_err(internal)?;
    Ok(guests.into_iter().map(guest_summary).collect())
}

pub async fn episode_detail(
    ctx: &ApiContext,
    episode_id: EpisodeId,
) -> Result<EpisodeDetail, ApiException> {
    let detail = ctx
        .storage
        .load_episode_detail(episode_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiException::not_found(EPISODE_NOT_FOUND))?;

    let appearances = detail
        .appearances
        .into_iter()
        .map(|(appearance, guest)| AppearanceDetail {
            id: appearance.id,
            rating: appearance.rating,
            episode_id: Some(appearance.episode_id),
            guest_id: Some(appearance.guest_id),
            guest: GuestProfile::from(guest_summary(guest)),
        })
        .collect();

    Ok(EpisodeDetail {
        id: detail.episode.id,
        number: detail.episode.number,
        date: detail.episode.date,
        appearances,
    })
}

pub async fn delete_episode(ctx: &ApiContext, episode_id: EpisodeId) -> Result<(), ApiException> {
    let deleted = ctx
        .storage
        .delete_episode(episode_id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(ApiException::not_found(EPISODE_NOT_FOUND));
    }
    tracing::info!(episode_id = episode_id.0, "episode deleted");
    Ok(())
}

pub async fn create_appearance(
    ctx: &ApiContext,
    req: CreateAppearanceRequest,
) -> Result<AppearanceRecord, ApiException> {
    match ctx
        .storage
        .create_appearance(req.rating, req.episode_id, req.guest_id)
        .await
        .map_err(internal)?
    {
        AppearanceInsert::Created(record) => Ok(AppearanceRecord {
            id: record.appearance.id,
            rating: record.appearance.rating,
            episode_id: record.appearance.episode_id,
            guest_id: record.appearance.guest_id,
            episode: episode_summary(record.episode),
            guest: guest_summary(record.guest),
        }),
        AppearanceInsert::Rejected(reason) => {
            tracing::debug!(?reason, "appearance rejected");
            Err(ApiException::validation())
        }
    }
}

fn episode_summary(episode: StoredEpisode) -> EpisodeSummary {
    EpisodeSummary {
        id: episode.id,
        number: episode.number,
        date: episode.date,
    }
}

fn guest_summary(guest: StoredGuest) -> GuestSummary {
    GuestSummary {
        id: guest.id,
        name: guest.name,
        occupation: guest.occupation,
    }
}

fn internal(err: anyhow::Error) -> ApiException {
    tracing::error!(error = %err, "storage failure");
    ApiException::internal(err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
