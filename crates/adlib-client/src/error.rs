//! Client error types.

use std::io;

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// One or more command-line arguments are missing or invalid.
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Message could not be framed.
    #[error("protocol error: {0}")]
    Protocol(#[from] adlib_protocol::ProtocolError),

    /// Opening or configuring the link failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// Link operation timed out.
    #[error("timeout: {0}")]
    Timeout(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ClientError {
    /// Creates a validation error with a single problem.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_lists_every_problem() {
        let err = ClientError::Validation(vec![
            "Device ID (--device) is required.".into(),
            "Data type (--type) is required.".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "Device ID (--device) is required.\nData type (--type) is required."
        );
    }

    #[test]
    fn protocol_error_converts() {
        let err: ClientError = adlib_protocol::ProtocolError::UnknownKind(9).into();
        assert!(err.to_string().contains("unknown message kind: 9"));
    }
}
