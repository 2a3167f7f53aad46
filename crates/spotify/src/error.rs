use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("token request rejected ({status}): {body}")]
    Auth { status: StatusCode, body: String },

    #[error("token response carried an empty access_token")]
    EmptyToken,

    #[error("non-success response ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

impl SpotifyError {
    /// Upstream status code, when the failure came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SpotifyError::Auth { status, .. } | SpotifyError::Status { status, .. } => {
                Some(*status)
            }
            SpotifyError::Request(e) => e.status(),
            _ => None,
        }
    }
}
