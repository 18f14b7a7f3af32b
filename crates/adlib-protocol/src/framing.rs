//! Delimited, null-terminated message framing.
//!
//! Every field is written as text and separated by a vertical tab; the frame
//! ends with a single NUL byte:
//!
//! ```text
//! +-----------+----+----------+----+--------+----+
//! | device id | VT | kind tag | VT |  body  | \0 |
//! +-----------+----+----------+----+--------+----+
//! ```
//!
//! The display has no way to escape either byte, so payloads containing
//! them are rejected before anything is written.

use std::fmt::Write as _;
use std::io::Write;

use crate::error::{ProtocolError, ProtocolResult};
use crate::types::{Envelope, Message};
use crate::{DELIMITER, MAX_DEVICE_ID, MAX_FRAME_SIZE, MAX_TEXT_LENGTH, TERMINATOR};

/// Encodes an envelope into a complete frame, terminator included.
///
/// Numbers are written with `Display`, so floats come out as the shortest
/// decimal that parses back to the same value and never in exponent form.
///
/// # Errors
///
/// Fails without producing a frame when the device id is out of range, a
/// text body contains the delimiter or terminator or is too long, a numeric
/// field is not finite, or the frame would not fit the display's buffer.
///
/// # Example
///
/// ```rust
/// use adlib_protocol::{Envelope, encode};
///
/// let bytes = encode(&Envelope::text(0, "hello")).unwrap();
/// assert_eq!(bytes, b"0\x0b1\x0bhello\x00");
/// ```
pub fn encode(envelope: &Envelope) -> ProtocolResult<Vec<u8>> {
    if envelope.device_id > MAX_DEVICE_ID {
        return Err(ProtocolError::DeviceOutOfRange {
            device: envelope.device_id,
            max: MAX_DEVICE_ID,
        });
    }

    let delim = char::from(DELIMITER);
    let mut frame = String::with_capacity(32);

    // Writing into a String cannot fail.
    let _ = write!(
        frame,
        "{}{delim}{}{delim}",
        envelope.device_id,
        envelope.kind().tag()
    );

    match &envelope.payload {
        Message::Error { text } | Message::Text { text } => {
            check_text(text)?;
            frame.push_str(text);
        }
        Message::Numeric {
            minimum,
            maximum,
            current,
            delta,
        } => {
            let fields = [
                ("minimum", *minimum),
                ("maximum", *maximum),
                ("current", *current),
                ("delta", *delta),
            ];
            for (i, (name, value)) in fields.into_iter().enumerate() {
                if !value.is_finite() {
                    return Err(ProtocolError::invalid_payload(format!(
                        "{name} value is not finite: {value}"
                    )));
                }
                if i > 0 {
                    frame.push(delim);
                }
                let _ = write!(frame, "{value}");
            }
        }
        Message::Normalized { value } => {
            let _ = write!(frame, "{value}");
        }
    }

    frame.push(char::from(TERMINATOR));

    if frame.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size: frame.len(),
            max: MAX_FRAME_SIZE,
        });
    }

    Ok(frame.into_bytes())
}

fn check_text(text: &str) -> ProtocolResult<()> {
    if text.len() > MAX_TEXT_LENGTH {
        return Err(ProtocolError::TextTooLong {
            len: text.len(),
            max: MAX_TEXT_LENGTH,
        });
    }
    if let Some(byte) = text
        .bytes()
        .find(|b| *b == DELIMITER || *b == TERMINATOR)
    {
        return Err(ProtocolError::invalid_payload(format!(
            "text contains reserved byte 0x{byte:02X}"
        )));
    }
    Ok(())
}

/// Renders a frame as printable text, escaping the delimiter and terminator.
///
/// Used for logging and dry runs; not a decoder.
pub fn display_frame(frame: &[u8]) -> String {
    let mut out = String::with_capacity(frame.len() + 8);
    for chunk in frame.utf8_chunks() {
        for c in chunk.valid().chars() {
            match c as u32 {
                0x0B => out.push_str("\\v"),
                0x00 => out.push_str("\\0"),
                _ => out.push(c),
            }
        }
        for byte in chunk.invalid() {
            let _ = write!(out, "\\x{byte:02x}");
        }
    }
    out
}

/// Writes frames to a byte stream.
///
/// This struct wraps a blocking writer; each call writes exactly one
/// complete frame.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: Write> FrameWriter<W> {
    /// Creates a new FrameWriter wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Encodes and writes a single frame. Returns the number of bytes written.
    pub fn write_envelope(&mut self, envelope: &Envelope) -> ProtocolResult<usize> {
        let data = encode(envelope)?;
        self.writer.write_all(&data)?;
        Ok(data.len())
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> ProtocolResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Returns a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Unwraps this FrameWriter, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
