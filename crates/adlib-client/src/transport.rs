//! Links to the display: a serial port or a TCP connection.
//!
//! Each send opens the link, writes one frame and closes it again. There is
//! no acknowledgement; a successful write is all the sender ever learns.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Serial line speed. Fixed by the display firmware.
pub const BAUD_RATE: u32 = 9600;

/// Time the board needs to come back up after the port is opened.
///
/// Opening the port toggles DTR, which resets most Arduino boards.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// TCP port the display listens on.
pub const DEFAULT_TCP_PORT: u16 = 2000;

/// Where a frame should be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Serial device path.
    Serial(PathBuf),
    /// Host and port of a network-attached display.
    Tcp { host: String, port: u16 },
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serial(path) => write!(f, "serial:{}", path.display()),
            Self::Tcp { host, port } => write!(f, "tcp:{}:{}", host, port),
        }
    }
}

/// A configured link, ready to send one frame.
#[derive(Debug, Clone)]
pub enum Link {
    Serial(SerialTransport),
    Tcp(TcpTransport),
}

impl Link {
    /// Builds the link for a target using the timing settings from `config`.
    pub fn new(target: &Target, config: &ClientConfig) -> Self {
        match target {
            Target::Serial(path) => Self::Serial(
                SerialTransport::new(path, config.settle_delay()).with_timeout(config.timeout()),
            ),
            Target::Tcp { host, port } => {
                Self::Tcp(TcpTransport::new(host.clone(), *port, config.timeout()))
            }
        }
    }

    /// Opens the link, writes `frame` in full, and closes it.
    pub async fn send(&self, frame: &[u8]) -> ClientResult<()> {
        match self {
            Self::Serial(serial) => serial.send(frame).await,
            Self::Tcp(tcp) => tcp.send(frame).await,
        }
    }
}

/// Writes frames to a serial device.
#[derive(Debug, Clone)]
pub struct SerialTransport {
    path: PathBuf,
    settle_delay: Duration,
    timeout: Duration,
}

impl SerialTransport {
    /// Creates a transport for the given device.
    pub fn new(path: impl Into<PathBuf>, settle_delay: Duration) -> Self {
        Self {
            path: path.into(),
            settle_delay,
            timeout: Duration::from_secs(5),
        }
    }

    /// Sets the write timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the device path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the port at 9600 8N1, waits for the board to settle, and
    /// writes the frame.
    pub async fn send(&self, frame: &[u8]) -> ClientResult<()> {
        debug!(device = %self.path.display(), baud = BAUD_RATE, "opening serial port");

        let mut file = open_port(&self.path).await.map_err(|e| {
            ClientError::Connection(format!("failed to open {}: {}", self.path.display(), e))
        })?;

        #[cfg(unix)]
        {
            use std::os::fd::AsRawFd;
            configure_port(file.as_raw_fd()).map_err(|e| {
                ClientError::Connection(format!(
                    "failed to configure {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        }

        if !self.settle_delay.is_zero() {
            debug!(delay_ms = self.settle_delay.as_millis() as u64, "waiting for device to settle");
            tokio::time::sleep(self.settle_delay).await;
        }

        tokio::time::timeout(self.timeout, async {
            file.write_all(frame).await?;
            file.flush().await?;
            Ok::<(), std::io::Error>(())
        })
        .await
        .map_err(|_| ClientError::Timeout("writing to serial port".into()))??;

        debug!(bytes = frame.len(), "frame written to serial port");
        Ok(())
    }
}

async fn open_port(path: &Path) -> std::io::Result<tokio::fs::File> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true);
    #[cfg(unix)]
    options.custom_flags(libc::O_NOCTTY);
    options.open(path).await
}

/// Puts a terminal device into raw 9600 8N1 mode without flow control.
///
/// Anything that is not a terminal (a pipe, a pty stand-in, a plain file)
/// is left untouched.
#[cfg(unix)]
fn configure_port(fd: std::os::fd::RawFd) -> std::io::Result<()> {
    use std::io::Error;
    use std::mem::MaybeUninit;

    if unsafe { libc::isatty(fd) } != 1 {
        debug!("not a terminal, skipping line settings");
        return Ok(());
    }

    let mut tty = MaybeUninit::<libc::termios>::uninit();
    if unsafe { libc::tcgetattr(fd, tty.as_mut_ptr()) } != 0 {
        return Err(Error::last_os_error());
    }
    // SAFETY: tcgetattr succeeded and filled the struct.
    let mut tty = unsafe { tty.assume_init() };

    unsafe { libc::cfmakeraw(&mut tty) };
    tty.c_cflag &= !(libc::PARENB | libc::CSTOPB | libc::CSIZE | libc::CRTSCTS);
    tty.c_cflag |= libc::CS8 | libc::CLOCAL | libc::CREAD;

    // B9600 matches BAUD_RATE.
    if unsafe { libc::cfsetispeed(&mut tty, libc::B9600) } != 0
        || unsafe { libc::cfsetospeed(&mut tty, libc::B9600) } != 0
    {
        return Err(Error::last_os_error());
    }

    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &tty) } != 0 {
        return Err(Error::last_os_error());
    }
    Ok(())
}

/// Writes frames to a network-attached display.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpTransport {
    /// Creates a TCP transport.
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Returns the `host:port` address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connects, writes the frame, and shuts the connection down.
    ///
    /// The display treats the end of the connection as end of input, so the
    /// write side is always closed after the frame.
    pub async fn send(&self, frame: &[u8]) -> ClientResult<()> {
        let addr = self.addr();
        debug!(addr = %addr, "connecting to display");

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(addr.as_str()))
            .await
            .map_err(|_| {
                ClientError::Connection(format!(
                    "connection timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| ClientError::Connection(format!("failed to connect to {}: {}", addr, e)))?;

        tokio::time::timeout(self.timeout, async {
            stream.write_all(frame).await?;
            stream.flush().await?;
            stream.shutdown().await?;
            Ok::<(), std::io::Error>(())
        })
        .await
        .map_err(|_| ClientError::Timeout("sending frame".into()))??;

        debug!(bytes = frame.len(), "frame sent");
        Ok(())
    }
}
