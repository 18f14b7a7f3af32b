//! Command-line interface definition and validation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use adlib_protocol::{
    DELIMITER, Envelope, MAX_DEVICE_ID, MAX_TEXT_LENGTH, Message, MessageKind, TERMINATOR,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::Target;

/// Smallest device id accepted on the command line. The display reserves 0.
pub const MIN_DEVICE_ID: i64 = 1;

/// Allowed range for normalized values.
pub const NORMALIZED_RANGE: std::ops::RangeInclusive<i64> = 0..=100;

/// adlib - send a message to an ambient display
#[derive(Debug, Parser)]
#[command(name = "adlib")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "ADLIB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(flatten)]
    pub send: SendArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Flags describing the message to send.
///
/// Everything is optional at parse time so that every missing or invalid
/// value can be reported together by [`SendArgs::validate`].
#[derive(Debug, Default, Args)]
pub struct SendArgs {
    // --- Link flags ---
    /// Serial device connected to the display
    #[arg(long, value_name = "PATH", conflicts_with = "address")]
    pub serial: Option<PathBuf>,

    /// Host name or IP address of a network-attached display
    #[arg(long, value_name = "HOST")]
    pub address: Option<String>,

    /// TCP port of the display (with --address)
    #[arg(long, requires = "address")]
    pub port: Option<u16>,

    // --- Message flags ---
    /// Device id of the target display
    #[arg(long, allow_negative_numbers = true)]
    pub device: Option<i64>,

    /// Message type [0=error, 1=text, 2=numeric, 3=normalized]
    #[arg(long = "type", value_name = "TYPE", allow_negative_numbers = true)]
    pub kind: Option<i64>,

    /// Minimum value for the numeric type
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,

    /// Maximum value for the numeric type
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f64>,

    /// Current value for the numeric type
    #[arg(long, allow_negative_numbers = true)]
    pub current: Option<f64>,

    /// Delta value for the numeric type
    #[arg(long, allow_negative_numbers = true)]
    pub delta: Option<f64>,

    /// Message for the error and text types
    #[arg(long, allow_hyphen_values = true)]
    pub text: Option<String>,

    /// Value for the normalized type (0-100)
    #[arg(long, allow_negative_numbers = true)]
    pub value: Option<i64>,

    /// Print the encoded frame instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

/// A fully validated send: where to, and what.
#[derive(Debug, Clone, PartialEq)]
pub struct SendRequest {
    /// Link to use; `None` only for dry runs without a configured link.
    pub target: Option<Target>,
    pub envelope: Envelope,
    pub dry_run: bool,
}

impl SendArgs {
    /// Checks the flags against the chosen message type and builds the request.
    ///
    /// The serial device falls back to `serial.path` and the TCP port to
    /// `network.port` from the configuration. All problems are collected and
    /// returned together as [`ClientError::Validation`].
    pub fn validate(&self, config: &ClientConfig) -> ClientResult<SendRequest> {
        let mut problems = Vec::new();

        let target = self.target(config);
        if target.is_none() && !self.dry_run {
            problems.push(
                "Serial device (--serial) or network address (--address) is required.".to_string(),
            );
        }

        let device = match self.device {
            None => {
                problems.push("Device ID (--device) is required.".to_string());
                None
            }
            Some(id) if !(MIN_DEVICE_ID..=i64::from(MAX_DEVICE_ID)).contains(&id) => {
                problems.push(format!(
                    "Device ID must be between {} and {}.",
                    MIN_DEVICE_ID, MAX_DEVICE_ID
                ));
                None
            }
            Some(id) => u8::try_from(id).ok(),
        };

        let kind = match self.kind {
            None => {
                problems.push("Data type (--type) is required.".to_string());
                None
            }
            Some(tag) => {
                let kind = u8::try_from(tag)
                    .ok()
                    .and_then(|tag| MessageKind::try_from(tag).ok());
                if kind.is_none() {
                    problems.push(
                        "Data type must be one of 0=error, 1=text, 2=numeric, 3=normalized."
                            .to_string(),
                    );
                }
                kind
            }
        };

        let payload = kind.and_then(|kind| self.payload(kind, &mut problems));

        if !problems.is_empty() {
            return Err(ClientError::Validation(problems));
        }

        match (device, payload) {
            (Some(device), Some(payload)) => Ok(SendRequest {
                target,
                envelope: Envelope::new(device, payload),
                dry_run: self.dry_run,
            }),
            _ => Err(ClientError::validation("Invalid message arguments.")),
        }
    }

    fn target(&self, config: &ClientConfig) -> Option<Target> {
        if let Some(ref host) = self.address {
            return Some(Target::Tcp {
                host: host.clone(),
                port: self.port.unwrap_or(config.network.port),
            });
        }
        self.serial
            .clone()
            .or_else(|| config.serial.path.clone())
            .map(Target::Serial)
    }

    fn payload(&self, kind: MessageKind, problems: &mut Vec<String>) -> Option<Message> {
        match kind {
            MessageKind::Error | MessageKind::Text => {
                let Some(ref text) = self.text else {
                    problems.push("Text and Error data types require a message (--text).".into());
                    return None;
                };
                if text.bytes().any(|b| b == DELIMITER || b == TERMINATOR) {
                    problems.push(
                        "Message text must not contain vertical tab or NUL characters.".into(),
                    );
                    return None;
                }
                if text.len() > MAX_TEXT_LENGTH {
                    problems.push(format!(
                        "Message text must be at most {} bytes.",
                        MAX_TEXT_LENGTH
                    ));
                    return None;
                }
                Some(match kind {
                    MessageKind::Error => Message::error(text.clone()),
                    _ => Message::text(text.clone()),
                })
            }
            MessageKind::Numeric => {
                let (Some(min), Some(max), Some(current), Some(delta)) =
                    (self.min, self.max, self.current, self.delta)
                else {
                    problems.push(
                        "Numeric data type requires minimum, maximum, current, and delta values (--min, --max, --current, --delta)."
                            .into(),
                    );
                    return None;
                };
                let mut finite = true;
                for (flag, value) in [
                    ("--min", min),
                    ("--max", max),
                    ("--current", current),
                    ("--delta", delta),
                ] {
                    if !value.is_finite() {
                        problems.push(format!("{} must be a finite number.", flag));
                        finite = false;
                    }
                }
                finite.then(|| Message::numeric(min, max, current, delta))
            }
            MessageKind::Normalized => {
                let Some(value) = self.value else {
                    problems.push("Normalized data type requires a normalized value (--value).".into());
                    return None;
                };
                if !NORMALIZED_RANGE.contains(&value) {
                    problems.push(format!(
                        "Normalized value must be between {} and {}.",
                        NORMALIZED_RANGE.start(),
                        NORMALIZED_RANGE.end()
                    ));
                    return None;
                }
                Some(Message::normalized(value))
            }
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
