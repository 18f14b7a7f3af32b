//! Send command — encode one message and write it to the display.

use tracing::{debug, info, instrument};

use adlib_protocol::{display_frame, encode};

use crate::cli::SendRequest;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::Link;

/// Encodes the request and delivers it over its link.
///
/// With `dry_run` set the frame is printed to stdout and no link is opened.
#[instrument(skip_all, fields(device = request.envelope.device_id, kind = %request.envelope.kind()))]
pub async fn run(request: &SendRequest, config: &ClientConfig) -> ClientResult<()> {
    let frame = encode(&request.envelope)?;
    debug!(frame = %display_frame(&frame), bytes = frame.len(), "encoded frame");

    if request.dry_run {
        println!("{}", display_frame(&frame));
        return Ok(());
    }

    let target = request
        .target
        .as_ref()
        .ok_or_else(|| ClientError::validation("No link to send on."))?;

    Link::new(target, config).send(&frame).await?;

    info!(link = %target, bytes = frame.len(), "message sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Target;
    use adlib_protocol::Envelope;

    fn quick_config() -> ClientConfig {
        let mut config = ClientConfig::default();
        config.serial.settle_delay_ms = 0;
        config
    }

    #[tokio::test]
    async fn sends_encoded_frame_to_serial_device() {
        let device = tempfile::NamedTempFile::new().unwrap();
        let request = SendRequest {
            target: Some(Target::Serial(device.path().to_path_buf())),
            envelope: Envelope::numeric(2, 0.0, 100.0, 42.0, -3.0),
            dry_run: false,
        };

        run(&request, &quick_config()).await.unwrap();

        let written = std::fs::read(device.path()).unwrap();
        assert_eq!(written, b"2\x0b2\x0b0\x0b100\x0b42\x0b-3\x00");
    }

    #[tokio::test]
    async fn dry_run_opens_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let request = SendRequest {
            target: Some(Target::Serial(dir.path().join("never-created"))),
            envelope: Envelope::text(1, "hello"),
            dry_run: true,
        };

        run(&request, &quick_config()).await.unwrap();
        assert!(!dir.path().join("never-created").exists());
    }

    #[tokio::test]
    async fn encoding_failure_stops_before_link() {
        let device = tempfile::NamedTempFile::new().unwrap();
        let request = SendRequest {
            target: Some(Target::Serial(device.path().to_path_buf())),
            envelope: Envelope::text(1, "bad\x0bframe"),
            dry_run: false,
        };

        let result = run(&request, &quick_config()).await;
        assert!(matches!(result, Err(ClientError::Protocol(_))));
        assert!(std::fs::read(device.path()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_link_is_rejected() {
        let request = SendRequest {
            target: None,
            envelope: Envelope::normalized(1, 10),
            dry_run: false,
        };

        let result = run(&request, &quick_config()).await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }
}
