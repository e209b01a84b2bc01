use thiserror::Error;

/// Failures of a single client call. None of these are fatal to the
/// retrieval pipeline; the controller turns them into the error flag.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Page out of range, max page {max_page}")]
    PageOutOfRange { max_page: u32 },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }
}
