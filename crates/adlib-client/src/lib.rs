//! CLI, configuration and transports for ambient display messages.
//!
//! This crate provides the `adlib` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod transport;

pub use cli::{Cli, SendArgs, SendRequest};
pub use error::{ClientError, ClientResult};
pub use transport::{Link, SerialTransport, Target, TcpTransport};
