//! Message and envelope types for the ambient display protocol.

use std::fmt;

use crate::error::ProtocolError;

/// The four message kinds understood by the display.
///
/// The discriminants are the on-wire kind tags and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    /// Error message, rendered as an alert.
    Error = 0,
    /// Free-form text.
    Text = 1,
    /// A reading within a range, with its last change.
    Numeric = 2,
    /// A single integer, conventionally a percentage.
    Normalized = 3,
}

impl MessageKind {
    /// All kinds, in tag order.
    pub const ALL: [MessageKind; 4] = [
        MessageKind::Error,
        MessageKind::Text,
        MessageKind::Numeric,
        MessageKind::Normalized,
    ];

    /// Returns the wire tag for this kind.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Returns a lowercase name, used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Text => "text",
            Self::Numeric => "numeric",
            Self::Normalized => "normalized",
        }
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = ProtocolError;

    fn try_from(tag: u8) -> Result<Self, ProtocolError> {
        match tag {
            0 => Ok(MessageKind::Error),
            1 => Ok(MessageKind::Text),
            2 => Ok(MessageKind::Numeric),
            3 => Ok(MessageKind::Normalized),
            other => Err(ProtocolError::UnknownKind(other)),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.tag())
    }
}

/// A typed message payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Error text.
    Error { text: String },

    /// Plain text.
    Text { text: String },

    /// Numeric reading.
    Numeric {
        minimum: f64,
        maximum: f64,
        current: f64,
        delta: f64,
    },

    /// Normalized value.
    Normalized { value: i64 },
}

impl Message {
    /// Creates an error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self::Error { text: text.into() }
    }

    /// Creates a text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates a numeric message.
    pub fn numeric(minimum: f64, maximum: f64, current: f64, delta: f64) -> Self {
        Self::Numeric {
            minimum,
            maximum,
            current,
            delta,
        }
    }

    /// Creates a normalized message.
    pub fn normalized(value: i64) -> Self {
        Self::Normalized { value }
    }

    /// Returns the kind of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Error { .. } => MessageKind::Error,
            Self::Text { .. } => MessageKind::Text,
            Self::Numeric { .. } => MessageKind::Numeric,
            Self::Normalized { .. } => MessageKind::Normalized,
        }
    }
}

/// A message addressed to one display on the peripheral.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Target display.
    pub device_id: u8,
    /// The message itself.
    pub payload: Message,
}

impl Envelope {
    /// Creates a new envelope.
    pub fn new(device_id: u8, payload: Message) -> Self {
        Self { device_id, payload }
    }

    /// Creates an error envelope.
    pub fn error(device_id: u8, text: impl Into<String>) -> Self {
        Self::new(device_id, Message::error(text))
    }

    /// Creates a text envelope.
    pub fn text(device_id: u8, text: impl Into<String>) -> Self {
        Self::new(device_id, Message::text(text))
    }

    /// Creates a numeric envelope.
    pub fn numeric(device_id: u8, minimum: f64, maximum: f64, current: f64, delta: f64) -> Self {
        Self::new(device_id, Message::numeric(minimum, maximum, current, delta))
    }

    /// Creates a normalized envelope.
    pub fn normalized(device_id: u8, value: i64) -> Self {
        Self::new(device_id, Message::normalized(value))
    }

    /// Returns the kind of the payload.
    pub fn kind(&self) -> MessageKind {
        self.payload.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_are_stable() {
        assert_eq!(MessageKind::Error.tag(), 0);
        assert_eq!(MessageKind::Text.tag(), 1);
        assert_eq!(MessageKind::Numeric.tag(), 2);
        assert_eq!(MessageKind::Normalized.tag(), 3);
    }

    #[test]
    fn kind_from_tag() {
        for kind in MessageKind::ALL {
            assert_eq!(MessageKind::try_from(kind.tag()).unwrap(), kind);
        }
        assert!(matches!(
            MessageKind::try_from(4),
            Err(ProtocolError::UnknownKind(4))
        ));
    }

    #[test]
    fn message_kind_matches_constructor() {
        assert_eq!(Message::error("x").kind(), MessageKind::Error);
        assert_eq!(Message::text("x").kind(), MessageKind::Text);
        assert_eq!(
            Message::numeric(0.0, 1.0, 0.5, 0.1).kind(),
            MessageKind::Numeric
        );
        assert_eq!(Message::normalized(50).kind(), MessageKind::Normalized);
    }

    #[test]
    fn envelope_constructors() {
        let envelope = Envelope::numeric(2, 0.0, 100.0, 42.0, -3.0);
        assert_eq!(envelope.device_id, 2);
        assert_eq!(envelope.kind(), MessageKind::Numeric);
        assert_eq!(
            envelope.payload,
            Message::Numeric {
                minimum: 0.0,
                maximum: 100.0,
                current: 42.0,
                delta: -3.0,
            }
        );

        let envelope = Envelope::text(7, "hello");
        assert_eq!(envelope.payload, Message::text("hello"));
    }

    #[test]
    fn kind_display() {
        assert_eq!(MessageKind::Numeric.to_string(), "numeric (2)");
    }
}
