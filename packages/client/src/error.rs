//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the participant ID
    #[error("Participant ID '{0}' was rejected by the server")]
    InvalidParticipantId(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
