//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while building or writing a frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Payload would corrupt the framing (embedded delimiter/terminator,
    /// non-finite number).
    #[error("invalid payload: {reason}")]
    InvalidPayload { reason: String },

    /// Device id outside the range the display accepts.
    #[error("device id {device} out of range (max: {max})")]
    DeviceOutOfRange { device: u8, max: u8 },

    /// Text body exceeds the display's text buffer.
    #[error("text too long: {len} bytes (max: {max})")]
    TextTooLong { len: usize, max: usize },

    /// Encoded frame exceeds the display's read buffer.
    #[error("frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// Kind tag not defined by the protocol.
    #[error("unknown message kind: {0}")]
    UnknownKind(u8),

    /// IO error during write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// Creates an invalid payload error.
    pub fn invalid_payload(reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            reason: reason.into(),
        }
    }
}
