//! Xing/Info header extraction
//!
//! VBR encoders put a "Xing" header in the data area of the first frame,
//! recording the true frame count so duration can be computed exactly.
//! LAME writes the same structure under the identifier "Info" for CBR
//! streams.
//!
//! Layout, all integers big-endian:
//!
//! | Offset | Size | Field                               |
//! |--------|------|-------------------------------------|
//! | 0      | 4    | "Xing" or "Info"                    |
//! | 4      | 4    | flags                               |
//! | 8      | 4    | frame count (flags bit 0)           |
//! | ..     | 4    | byte count (flags bit 1)            |
//! | ..     | 100  | seek TOC (flags bit 2)              |
//! | ..     | 4    | VBR quality (flags bit 3)           |
//!
//! Only the frame count is decoded; the remaining fields are kept as raw
//! bytes.

use crate::source::{ByteSource, Session};
use std::io;
use tracing::{debug, warn};

/// Bytes between the end of the frame header and the start of the search
pub const SIDE_INFO_SKIP: u64 = 10;

/// Positions searched for the identifier
pub const SEARCH_WINDOW: usize = 40;

/// Identifier + flags + every optional field
pub const MAX_XING_LEN: usize = 8 + 4 + 4 + 100 + 4;

pub const FLAG_FRAMES: u32 = 0x01;
pub const FLAG_BYTES: u32 = 0x02;
pub const FLAG_TOC: u32 = 0x04;
pub const FLAG_QUALITY: u32 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XingKind {
    /// "Xing": variable bitrate stream
    Xing,
    /// "Info": constant bitrate stream with a LAME info tag
    Info,
}

/// Captured Xing/Info header, starting at the identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XingHeader {
    kind: XingKind,
    data: Vec<u8>,
}

impl XingHeader {
    /// Search `buf` for a Xing/Info identifier within the first
    /// [`SEARCH_WINDOW`] bytes and capture the header it introduces.
    ///
    /// Bytes past the search window are used for the capture, so callers
    /// should pass up to `SEARCH_WINDOW + MAX_XING_LEN` bytes.
    pub fn extract(buf: &[u8]) -> Option<Self> {
        let window = &buf[..buf.len().min(SEARCH_WINDOW)];
        let (pos, kind) = find_identifier(window)?;

        if pos + 8 > buf.len() {
            warn!(pos, "Xing/Info identifier without flags, ignoring");
            return None;
        }

        let flags = read_u32(&buf[pos + 4..pos + 8]);
        let end = (pos + xing_len(flags)).min(buf.len());

        Some(XingHeader {
            kind,
            data: buf[pos..end].to_vec(),
        })
    }

    pub fn kind(&self) -> XingKind {
        self.kind
    }

    pub fn flags(&self) -> u32 {
        read_u32(&self.data[4..8])
    }

    /// Total frames in the stream, if the header carries them
    pub fn frame_count(&self) -> Option<u32> {
        if self.flags() & FLAG_FRAMES == 0 {
            return None;
        }
        self.data.get(8..12).map(read_u32)
    }

    /// Length the flags say the header has
    pub fn declared_len(&self) -> usize {
        xing_len(self.flags())
    }

    /// Bytes actually captured; shorter than `declared_len` only when the
    /// file ends inside the header
    pub fn captured_len(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Size of a Xing/Info header with the given flags
pub fn xing_len(flags: u32) -> usize {
    let mut len = 8;
    if flags & FLAG_FRAMES != 0 {
        len += 4;
    }
    if flags & FLAG_BYTES != 0 {
        len += 4;
    }
    if flags & FLAG_TOC != 0 {
        len += 100;
    }
    if flags & FLAG_QUALITY != 0 {
        len += 4;
    }
    len
}

/// Look for a Xing/Info header starting at `offset`, normally the frame
/// header offset + 4 + [`SIDE_INFO_SKIP`]. `None` means a plain CBR file.
pub fn locate_xing_header<S: ByteSource>(
    session: &mut Session<S>,
    offset: u64,
) -> io::Result<Option<XingHeader>> {
    let buf = session.read_at(offset, SEARCH_WINDOW + MAX_XING_LEN)?;
    let header = XingHeader::extract(&buf);

    match &header {
        Some(h) => debug!(
            offset,
            kind = ?h.kind(),
            flags = h.flags(),
            frames = ?h.frame_count(),
            "found Xing/Info header"
        ),
        None => debug!(offset, "no Xing/Info header"),
    }

    Ok(header)
}

fn find_identifier(window: &[u8]) -> Option<(usize, XingKind)> {
    window.windows(4).enumerate().find_map(|(i, id)| match id {
        b"Xing" => Some((i, XingKind::Xing)),
        b"Info" => Some((i, XingKind::Info)),
        _ => None,
    })
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
