use thiserror::Error;

/// The standard result type used throughout the application.
pub type StdResult<T> = Result<T, anyhow::Error>;

/// Transport error
#[derive(Error, Debug)]
pub enum TransportError {
    /// Parse error
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Remote error
    #[error("Remote error (status {status}): {message}")]
    Remote {
        /// The HTTP status code returned by the API.
        status: u16,
        /// The response body returned alongside the status.
        message: String,
    },
}

impl TransportError {
    /// Whether the error is a client-side rejection that a retry cannot fix.
    pub fn is_unretryable(&self) -> bool {
        match self {
            TransportError::Remote { status, .. } => (400..500).contains(status),
            TransportError::Parse(_) => false,
        }
    }
}
