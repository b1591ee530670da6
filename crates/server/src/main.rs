use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::EpisodeId,
    error::{ApiException, ErrorBody, ErrorCode, ValidationErrors, EPISODE_NOT_FOUND},
    protocol::{
        AppearanceRecord, CreateAppearanceRequest, EpisodeDetail, EpisodeSummary, GuestSummary,
        MessageResponse,
    },
};
use storage::Storage;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::ApiContext;
use app_state::AppState;
use config::{load_settings, prepare_database_url};

const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    if settings.seed_if_empty && storage.is_empty().await? {
        let summary = storage.seed_sample_data().await?;
        info!(?summary, "database was empty; seeded sample data");
    }

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/episodes", get(http_list_episodes))
        .route(
            "/episodes/:episode_id",
            get(http_episode_detail).delete(http_delete_episode),
        )
        .route("/guests", get(http_list_guests))
        .route("/appearances", post(http_create_appearance))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Maps an API failure onto the status and body shape each error kind uses on
/// the wire.
fn error_response(err: ApiException) -> Response {
    match err.code {
        ErrorCode::NotFound => {
            (StatusCode::NOT_FOUND, Json(ErrorBody::new(err.message))).into_response()
        }
        ErrorCode::Validation => (
            StatusCode::BAD_REQUEST,
            Json(ValidationErrors::single(err.message)),
        )
            .into_response(),
        ErrorCode::Internal => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new(err.message)),
        )
            .into_response(),
    }
}

async fn healthz(State(state): State<Arc<AppState>>) -> Response {
    match state.api.storage.health_check().await {
        Ok(()) => "ok".into_response(),
        Err(error) => {
            warn!(%error, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "storage unavailable").into_response()
        }
    }
}

async fn http_list_episodes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EpisodeSummary>>, Response> {
    api::list_episodes(&state.api)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_list_guests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GuestSummary>>, Response> {
    api::list_guests(&state.api)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Ids that are not integers never match an episode, so they answer 404 like
/// any other unknown id.
fn episode_path(path: Result<Path<i64>, PathRejection>) -> Result<EpisodeId, Response> {
    match path {
        Ok(Path(episode_id)) => Ok(EpisodeId(episode_id)),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "unparseable episode id");
            Err(error_response(ApiException::not_found(EPISODE_NOT_FOUND)))
        }
    }
}

async fn http_episode_detail(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<EpisodeDetail>, Response> {
    let episode_id = episode_path(path)?;
    api::episode_detail(&state.api, episode_id)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_delete_episode(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, Response> {
    let episode_id = episode_path(path)?;
    api::delete_episode(&state.api, episode_id)
        .await
        .map_err(error_response)?;
    Ok(Json(MessageResponse {
        message: "Episode deleted successfully".to_string(),
    }))
}

async fn http_create_appearance(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateAppearanceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AppearanceRecord>), Response> {
    let Json(req) = body.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "malformed appearance body");
        error_response(ApiException::validation())
    })?;

    let record = api::create_appearance(&state.api, req)
        .await
        .map_err(error_response)?;
    info!(
        appearance_id = record.id.0,
        episode_id = record.episode_id.0,
        guest_id = record.guest_id.0,
        "appearance created"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
