use thiserror::Error;

#[derive(Debug, Error)]
pub enum LetterboxdError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("film lookup failed: {0}")]
    Resolution(String),
    #[error("diary request failed: {0}")]
    Diary(String),
    #[error("network request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("invalid header value: {0}")]
    InvalidHeader(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl LetterboxdError {
    pub(crate) fn status(kind: fn(String) -> Self, status: reqwest::StatusCode) -> Self {
        kind(format!("Letterboxd returned {}", status.as_u16()))
    }
}

pub type Result<T> = std::result::Result<T, LetterboxdError>;
