use brewer_core::BrewError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    #[error("malformed response from {url}: {message}")]
    Malformed { url: String, message: String },

    #[error(transparent)]
    Core(#[from] BrewError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
