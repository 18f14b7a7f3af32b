//! Message types and wire framing for the ambient display protocol.
//!
//! A sender encodes one of four typed messages into a delimited,
//! null-terminated frame and writes it to a serial (or TCP) link. The
//! display on the other end splits the frame on the delimiter and renders
//! the payload.
//!
//! # Frame Layout
//!
//! ```text
//! <device id> 0x0B <kind tag> 0x0B <body> 0x00
//! ```
//!
//! | Kind         | Tag | Body                                        |
//! |--------------|-----|---------------------------------------------|
//! | `Error`      | 0   | text                                        |
//! | `Text`       | 1   | text                                        |
//! | `Numeric`    | 2   | min 0x0B max 0x0B current 0x0B delta        |
//! | `Normalized` | 3   | integer value                               |
//!
//! All numbers are written as decimal text.
//!
//! # Example
//!
//! ```rust
//! use adlib_protocol::{Envelope, encode};
//!
//! let envelope = Envelope::normalized(1, 45);
//! let bytes = encode(&envelope).unwrap();
//! assert_eq!(bytes, b"1\x0b3\x0b45\x00");
//! ```

mod error;
mod framing;
mod types;

pub use error::{ProtocolError, ProtocolResult};
pub use framing::{FrameWriter, display_frame, encode};
pub use types::{Envelope, Message, MessageKind};

/// Field delimiter (vertical tab).
pub const DELIMITER: u8 = 0x0B;

/// End-of-frame marker.
pub const TERMINATOR: u8 = 0x00;

/// Highest device id the display accepts. Ids of 255 and above are dropped.
pub const MAX_DEVICE_ID: u8 = 254;

/// Maximum length of an error or text body, in bytes.
pub const MAX_TEXT_LENGTH: usize = 255;

/// Maximum encoded frame size, terminator included.
///
/// The display reads into a 300-byte buffer and gives up once 299 bytes
/// have arrived.
pub const MAX_FRAME_SIZE: usize = 299;
