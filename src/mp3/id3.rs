//! ID3v2 tag length detection
//!
//! ID3v2 header: "ID3" (3) + version (2) + flags (1) + size (4) = 10 bytes.
//! The size is a synchsafe integer (7 bits per byte, MSB first) counting the
//! tag body only, so the header's own 10 bytes are added back on.

use crate::source::{ByteSource, Session};
use std::io;
use tracing::debug;

pub const ID3_HEADER_LEN: usize = 10;
const ID3_MAGIC: &[u8] = b"ID3";

/// Byte length of a leading ID3v2 tag, or 0 when the file has none
pub fn id3_size<S: ByteSource>(session: &mut Session<S>) -> io::Result<u64> {
    let buf = session.read_at(0, ID3_HEADER_LEN)?;

    if buf.len() < ID3_HEADER_LEN || &buf[..3] != ID3_MAGIC {
        return Ok(0);
    }

    let size = synchsafe_to_u32(&buf[6..10]) as u64 + ID3_HEADER_LEN as u64;
    debug!(size, "found ID3v2 tag");
    Ok(size)
}

/// Decode a 4-byte synchsafe integer
pub fn synchsafe_to_u32(raw: &[u8]) -> u32 {
    raw.iter()
        .take(4)
        .fold(0u32, |sum, &b| (sum << 7) | (b as u32 & 0x7F))
}
