use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourceError>;

/// Failure of a single upstream request. Never leaves the crate's fetchers:
/// every public fetch degrades it into a [`crate::FetchDebug`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("timeout")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("Malformed JSON body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_decode() {
            SourceError::Decode(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}
