//! mp3meta - Read MP3 stream metadata without decoding audio
//!
//! mp3meta reports an MP3 file's duration, bitrate, sample rate, MPEG version
//! and layer by reading a handful of bytes from the start of the file.
//!
//! # How It Works
//!
//! 1. **ID3v2 skip**: a leading ID3v2 tag declares its own length, so the
//!    first audio frame starts right after it.
//!
//! 2. **Frame header**: the 4-byte header of the first frame is decoded
//!    through the standard MPEG audio lookup tables.
//!
//! 3. **Xing/Info header**: VBR files carry a header inside the first frame
//!    recording the exact frame count. When present, duration is
//!    `frames * samples_per_frame / sample_rate`; otherwise the file is
//!    treated as constant bitrate and duration is `size * 8 / bitrate`.
//!
//! # Quick Start
//!
//! ```no_run
//! let meta = mp3meta::load("track.mp3")?;
//!
//! println!("{} {} @ {} Hz", meta.version, meta.layer, meta.frequency);
//! println!("{} kbps, {:.1}s", meta.bitrate, meta.duration);
//! # Ok::<(), mp3meta::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`mp3`]: ID3v2, frame header and Xing/Info parsing
//! - [`duration`]: CBR and VBR duration formulas
//! - [`loader`]: the load pipeline and batch results
//! - [`source`]: random-access byte sources
//! - [`report`]: Output formatters (JSON, CSV)

pub mod duration;
pub mod error;
pub mod loader;
pub mod mp3;
pub mod report;
pub mod source;

pub use error::{Error, Field, Result};
pub use loader::{load, read_metadata, LoadResult, Loader, Metadata};
pub use mp3::Bitrate;
pub use source::{ByteSource, Session};
