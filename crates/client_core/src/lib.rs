use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::EpisodeId,
    protocol::{
        AppearanceRecord, CreateAppearanceRequest, EpisodeDetail, EpisodeSummary, GuestSummary,
    },
};
use tracing::{debug, warn};
use url::Url;

pub mod error;

pub use error::ClientError;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5005";

pub type ClientResult<T> = Result<T, ClientError>;

/// The REST surface the desktop controller talks to.
#[async_trait]
pub trait LateShowApi: Send + Sync {
    async fn list_episodes(&self) -> ClientResult<Vec<EpisodeSummary>>;
    async fn list_guests(&self) -> ClientResult<Vec<GuestSummary>>;
    async fn episode_detail(&self, episode_id: EpisodeId) -> ClientResult<EpisodeDetail>;
    async fn delete_episode(&self, episode_id: EpisodeId) -> ClientResult<()>;
    async fn create_appearance(
        &self,
        req: &CreateAppearanceRequest,
    ) -> ClientResult<AppearanceRecord>;
}

#[derive(Clone)]
pub struct LateShowClient {
    http: Client,
    base_url: Url,
}

impl LateShowClient {
    pub fn new(server_url: &str) -> ClientResult<Self> {
        Self::with_http_client(server_url, Client::new())
    }

    pub fn with_http_client(server_url: &str, http: Client) -> ClientResult<Self> {
        Ok(Self {
            http,
            base_url: parse_base_url(server_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: err.to_string(),
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        let response = ensure_success(response).await?;
        decode_json(response).await
    }
}

#[async_trait]
impl LateShowApi for LateShowClient {
    async fn list_episodes(&self) -> ClientResult<Vec<EpisodeSummary>> {
        self.get_json("episodes").await
    }

    async fn list_guests(&self) -> ClientResult<Vec<GuestSummary>> {
        self.get_json("guests").await
    }

    async fn episode_detail(&self, episode_id: EpisodeId) -> ClientResult<EpisodeDetail> {
        self.get_json(&format!("episodes/{}", episode_id.0)).await
    }

    async fn delete_episode(&self, episode_id: EpisodeId) -> ClientResult<()> {
        let url = self.endpoint(&format!("episodes/{}", episode_id.0))?;
        debug!(%url, "DELETE");
        let response = self.http.delete(url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn create_appearance(
        &self,
        req: &CreateAppearanceRequest,
    ) -> ClientResult<AppearanceRecord> {
        let url = self.endpoint("appearances")?;
        debug!(%url, rating = req.rating, "POST");
        let response = self.http.post(url).json(req).send().await?;
        let response = ensure_success(response).await?;
        decode_json(response).await
    }
}

fn parse_base_url(server_url: &str) -> ClientResult<Url> {
    let trimmed = server_url.trim();
    // A trailing slash keeps any path prefix when joining endpoint paths.
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|err| ClientError::InvalidUrl {
        url: server_url.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl {
            url: server_url.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// Passes 2xx responses through and turns anything else into a typed error,
/// recognising any body with a non-null `errors` member as a validation
/// failure.
async fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let bytes = response.bytes().await?;
    Err(classify_failure(status, &bytes))
}

fn classify_failure(status: StatusCode, bytes: &[u8]) -> ClientError {
    let body = serde_json::from_slice::<serde_json::Value>(bytes).ok();
    if let Some(errors) = body
        .as_ref()
        .and_then(|body| body.get("errors"))
        .filter(|errors| !errors.is_null())
    {
        warn!(status = status.as_u16(), %errors, "request rejected");
        return ClientError::Validation {
            status: status.as_u16(),
            errors: errors.clone(),
        };
    }

    debug!(status = status.as_u16(), ?body, "non-success response");
    ClientError::Status {
        status: status.as_u16(),
        body,
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
