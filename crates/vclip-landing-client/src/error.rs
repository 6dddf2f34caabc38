//! Client error types.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Server { status: u16, message: Option<String> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    pub fn server(status: u16, message: Option<String>) -> Self {
        Self::Server { status, message }
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Whether the failure happened before any response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    /// Message the backend attached to an error response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
