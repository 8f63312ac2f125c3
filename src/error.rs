//! Error types shared by the client, the table and the report renderers.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching or rendering articles.
#[derive(Debug, Error)]
pub enum NewsError {
    /// The API key could not be read from its declared source.
    #[error("credential source {} is unavailable: {source}", .path.display())]
    CredentialSourceUnavailable {
        /// Path of the key file that was requested
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Network-level failure (DNS, connect, timeout, body read).
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The API answered with a non-success status.
    ///
    /// The public fetch operations absorb this into an empty result.
    #[error("remote rejected request (status {status})")]
    RemoteRejection {
        /// HTTP status code
        status: u16,
    },

    /// A success response whose body is not the expected `{ "articles": [...] }` shape.
    #[error("malformed response body: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// An endpoint URL could not be assembled from the base URL.
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A figure could not be rendered.
    #[error("render error: {0}")]
    Render(String),

    /// Writing rendered output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for NewsError {
    fn from(err: reqwest::Error) -> Self {
        NewsError::TransportFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NewsError>;
