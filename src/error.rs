use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("Invalid URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }
}

/// Item-scoped failure of a single sub-fetch. Absorbed by the aggregator, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("no data from {url}: {reason}")]
    NoData { url: String, reason: String },
    #[error("failed to decode payload from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl FetchError {
    pub fn no_data(url: impl ToString, reason: impl ToString) -> Self {
        FetchError::NoData {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(url: impl ToString, reason: impl ToString) -> Self {
        FetchError::Decode {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
