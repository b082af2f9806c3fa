use thiserror::Error;

/// Failure taxonomy for the sync engine. Every remote exchange resolves to
/// one of these; none of them is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// A required field was missing or malformed, caught before any
    /// network call.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The server answered with a non-success status.
    #[error("server rejected request (status {status}): {message}")]
    Server { status: u16, message: String },
    /// The request was sent but no response came back.
    #[error("no response received from server: {0}")]
    Transport(String),
    /// A response arrived but did not match the expected shape.
    #[error("malformed server response: {0}")]
    MalformedResponse(String),
}
