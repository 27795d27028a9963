//! Frame codec for the reporting wire protocol.
//!
//! Frame format:
//! ```text
//! ┌──────────┬──────────────┬────────────────────────┐
//! │ len (4B) │ channel(16B) │      payload           │
//! │ u32 BE   │ uuid bytes   │                        │
//! └──────────┴──────────────┴────────────────────────┘
//! ```
//! Length = sizeof(channel id) + sizeof(payload), NOT including the 4-byte
//! prefix. Blocking I/O throughout: sends happen on the host runner's
//! notification thread, one frame at a time.

use std::io::{Read, Write};

use crate::transport::Channel;

/// Size of the channel identifier in every frame.
pub const CHANNEL_ID_LEN: usize = 16;

/// Write one frame to the stream.
pub fn write_frame<W: Write>(writer: &mut W, channel: Channel, payload: &[u8]) -> std::io::Result<()> {
    let frame_len = (CHANNEL_ID_LEN + payload.len()) as u32;
    writer.write_all(&frame_len.to_be_bytes())?;
    writer.write_all(channel.as_bytes())?;
    writer.write_all(payload)?;
    writer.flush()
}

/// Read one frame from the stream.
///
/// Returns `(channel, payload_bytes)`. Returns `None` on clean EOF.
/// `max_frame_bytes` caps the maximum accepted frame size.
pub fn read_frame<R: Read>(
    reader: &mut R,
    max_frame_bytes: u32,
) -> std::io::Result<Option<(Channel, Vec<u8>)>> {
    // Read 4-byte length prefix
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }

    let frame_len = u32::from_be_bytes(len_buf);
    if frame_len > max_frame_bytes {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Frame too large: {} bytes", frame_len),
        ));
    }
    if (frame_len as usize) < CHANNEL_ID_LEN {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Frame too short: missing channel id",
        ));
    }

    // Read channel id + payload
    let mut frame_data = vec![0u8; frame_len as usize];
    reader.read_exact(&mut frame_data)?;

    let mut channel_bytes = [0u8; CHANNEL_ID_LEN];
    channel_bytes.copy_from_slice(&frame_data[..CHANNEL_ID_LEN]);
    let payload = frame_data[CHANNEL_ID_LEN..].to_vec();

    Ok(Some((Channel::from_bytes(channel_bytes), payload)))
}
