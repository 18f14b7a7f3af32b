//! Shared setup for the adlib crates: tracing initialization.

pub mod tracing;

pub use self::tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
