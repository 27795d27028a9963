//! Transport layer — framed, fire-and-forget delivery to the consumer.
//!
//! The reporter never waits for delivery confirmation and never retries: a
//! send either reaches the OS buffer or surfaces as an I/O error to the
//! caller. Consumers multiplex on the channel identifier carried by every
//! frame.

use std::fmt;
use std::net::{TcpStream, ToSocketAddrs};

use uuid::Uuid;

use crate::types::TransportConfig;

pub mod codec;

/// A reserved frame-routing identifier.
///
/// The three constants below are registered protocol-wide; consumers key on
/// them, so the values are wire contract and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel(Uuid);

impl Channel {
    /// Serialized protocol messages.
    pub const PROTOCOL_MESSAGE: Channel =
        Channel(Uuid::from_u128(0x28e419da_b96b_4e57_8a27_17330f0e0b6f));

    /// One-byte run-complete signal, sent after the final message of a run.
    pub const RUN_FINISHED: Channel =
        Channel(Uuid::from_u128(0x8eb67a7f_8faf_4990_8e3d_9a3ea8fab600));

    /// Application-quit signal. Reserved for hosts; not sent by this crate.
    pub const APPLICATION_QUIT: Channel =
        Channel(Uuid::from_u128(0x38a5d246_5065_46df_aedb_6653f6e22b33));

    pub const fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Channel(Uuid::from_bytes(bytes))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Byte delivery to the listening consumer.
///
/// One call per frame, in emission order. Order preservation is the
/// reporter's single most important external guarantee.
pub trait Transport {
    fn send(&mut self, channel: Channel, payload: &[u8]) -> std::io::Result<()>;
}

/// TCP transport writing one frame per send.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connect to the configured consumer.
    pub fn connect(config: &TransportConfig) -> std::io::Result<Self> {
        let addr = config
            .connect_addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("Unresolvable consumer address: {}", config.connect_addr),
                )
            })?;

        let stream = TcpStream::connect_timeout(&addr, config.connect_timeout)?;
        stream.set_write_timeout(Some(config.write_timeout))?;
        stream.set_nodelay(true)?;
        tracing::info!("Reporting to consumer at {}", addr);
        Ok(Self { stream })
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, channel: Channel, payload: &[u8]) -> std::io::Result<()> {
        tracing::trace!("Sending {} bytes on channel {}", payload.len(), channel);
        codec::write_frame(&mut self.stream, channel, payload)
    }
}
