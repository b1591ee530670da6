use thiserror::Error;

/// Failure of a single API call.
///
/// Transport and decode failures carry the rendered error text rather than
/// the `reqwest` error so outcomes can be cloned across the UI channel and
/// built by hand in tests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to decode response body: {0}")]
    Decode(String),
    /// The body carried an `errors` member; its value is kept as sent.
    #[error("server rejected the request with {errors}")]
    Validation {
        status: u16,
        errors: serde_json::Value,
    },
    #[error("unexpected status {status}")]
    Status {
        status: u16,
        body: Option<serde_json::Value>,
    },
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { status, .. } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Transport(value.to_string())
        }
    }
}
