//! Metadata loading pipeline
//!
//! A load runs the parsers in file order against one [`Session`]:
//!
//! 1. skip the ID3v2 tag, if any
//! 2. read the frame header right after it (no sync there = not an MP3)
//! 3. look for a Xing/Info header inside the first frame
//! 4. decode the header fields and compute the duration
//!
//! Either every field decodes and a [`Metadata`] comes back, or the load
//! fails as a whole.

use crate::duration::duration;
use crate::error::{Error, Result};
use crate::mp3::frame::{self, Bitrate, FRAME_HEADER_LEN};
use crate::mp3::{id3, xing};
use crate::source::{ByteSource, Session};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Stream information read from the first frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    /// Seconds
    pub duration: f64,
    pub bitrate: Bitrate,
    /// Sample rate in Hz
    pub frequency: u32,
    pub layer: String,
    pub version: String,
}

/// Outcome of loading one file, for batch runs
#[derive(Debug, Clone, Serialize)]
pub struct LoadResult {
    pub file_path: String,
    pub file_name: String,
    pub metadata: Option<Metadata>,
    pub error: Option<String>,
}

impl LoadResult {
    pub fn is_ok(&self) -> bool {
        self.metadata.is_some()
    }
}

/// Configurable metadata loader
#[derive(Debug, Clone)]
pub struct Loader {
    /// Use the Xing/Info frame count when present
    pub use_xing: bool,
}

impl Default for Loader {
    fn default() -> Self {
        Self { use_xing: true }
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignoring the Xing header forces the constant-bitrate estimate
    pub fn with_xing(mut self, use_xing: bool) -> Self {
        self.use_xing = use_xing;
        self
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Metadata> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading");
        let mut session = Session::open(path)?;
        self.read(&mut session)
    }

    pub fn read<S: ByteSource>(&self, session: &mut Session<S>) -> Result<Metadata> {
        let pos = id3::id3_size(session)?;

        let raw = frame::locate_frame_header(session, pos)?
            .ok_or(Error::InvalidFile { offset: pos })?;
        let header = raw.decode();
        debug!(
            offset = pos,
            version = %header.version,
            layer = %header.layer,
            "found frame header"
        );

        let xing = if self.use_xing {
            let xing_offset = pos + FRAME_HEADER_LEN as u64 + xing::SIDE_INFO_SKIP;
            xing::locate_xing_header(session, xing_offset)?
        } else {
            None
        };

        let bitrate = header.bitrate()?;
        let frequency = header.frequency()?;
        let duration = duration(&header, xing.as_ref(), session.size())?;

        Ok(Metadata {
            duration,
            bitrate,
            frequency,
            layer: header.layer.to_string(),
            version: header.version.to_string(),
        })
    }

    /// Load `path`, folding any error into the result
    pub fn analyze<P: AsRef<Path>>(&self, path: P) -> LoadResult {
        let path = path.as_ref();
        let file_path = path.display().to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.clone());

        match self.load(path) {
            Ok(metadata) => LoadResult {
                file_path,
                file_name,
                metadata: Some(metadata),
                error: None,
            },
            Err(e) => LoadResult {
                file_path,
                file_name,
                metadata: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Load metadata from the MP3 file at `path`
pub fn load<P: AsRef<Path>>(path: P) -> Result<Metadata> {
    Loader::new().load(path)
}

/// Load metadata from an already open source
pub fn read_metadata<S: ByteSource>(session: &mut Session<S>) -> Result<Metadata> {
    Loader::new().read(session)
}
