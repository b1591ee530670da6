//! End-to-end checks against a running API, run through the same client the
//! desktop app uses. They expect the sample data from `seed`.

use client_core::{ClientError, LateShowApi};
use shared::{
    domain::{EpisodeId, GuestId},
    error::EPISODE_NOT_FOUND,
    protocol::CreateAppearanceRequest,
};

pub struct CheckOutcome {
    pub name: &'static str,
    pub result: Result<(), String>,
}

pub async fn run_checks(api: &dyn LateShowApi) -> Vec<CheckOutcome> {
    vec![
        outcome("GET /episodes", list_episodes(api).await),
        outcome("GET /episodes/1", episode_detail(api).await),
        outcome("GET /episodes/999", missing_episode(api).await),
        outcome("GET /guests", list_guests(api).await),
        outcome("POST /appearances", create_appearance(api).await),
        outcome(
            "POST /appearances (invalid rating)",
            invalid_rating(api).await,
        ),
    ]
}

fn outcome(name: &'static str, result: Result<(), String>) -> CheckOutcome {
    match &result {
        Ok(()) => tracing::debug!(check = name, "passed"),
        Err(reason) => tracing::warn!(check = name, %reason, "failed"),
    }
    CheckOutcome { name, result }
}

async fn list_episodes(api: &dyn LateShowApi) -> Result<(), String> {
    api.list_episodes().await.map_err(|err| err.to_string())?;
    Ok(())
}

async fn episode_detail(api: &dyn LateShowApi) -> Result<(), String> {
    let detail = api
        .episode_detail(EpisodeId(1))
        .await
        .map_err(|err| err.to_string())?;
    if detail.id != EpisodeId(1) {
        return Err(format!("expected episode 1, got {}", detail.id));
    }
    if let Some(first) = detail.appearances.first() {
        if first.guest.name.is_empty() {
            return Err("appearance guest has no name".to_string());
        }
    }
    Ok(())
}

async fn missing_episode(api: &dyn LateShowApi) -> Result<(), String> {
    match api.episode_detail(EpisodeId(999)).await {
        Err(ClientError::Status {
            status: 404,
            body: Some(body),
        }) if body.get("error").and_then(|v| v.as_str()) == Some(EPISODE_NOT_FOUND) => Ok(()),
        Err(err) => Err(format!("unexpected failure: {err}")),
        Ok(_) => Err("episode 999 unexpectedly exists".to_string()),
    }
}

async fn list_guests(api: &dyn LateShowApi) -> Result<(), String> {
    api.list_guests().await.map_err(|err| err.to_string())?;
    Ok(())
}

async fn create_appearance(api: &dyn LateShowApi) -> Result<(), String> {
    let record = api
        .create_appearance(&CreateAppearanceRequest {
            rating: 5,
            episode_id: Some(EpisodeId(2)),
            guest_id: Some(GuestId(3)),
        })
        .await
        .map_err(|err| err.to_string())?;
    if record.rating != 5 || record.episode_id != EpisodeId(2) || record.guest_id != GuestId(3) {
        return Err(format!("created record does not echo the request: {record:?}"));
    }
    Ok(())
}

async fn invalid_rating(api: &dyn LateShowApi) -> Result<(), String> {
    match api
        .create_appearance(&CreateAppearanceRequest {
            rating: 6,
            episode_id: Some(EpisodeId(1)),
            guest_id: Some(GuestId(1)),
        })
        .await
    {
        Err(ClientError::Validation { status: 400, .. }) => Ok(()),
        Err(err) => Err(format!("expected a 400 validation error, got {err}")),
        Ok(record) => Err(format!("invalid rating was accepted: {record:?}")),
    }
}
