//! Duration from the first frame header
//!
//! Two regimes:
//!
//! - **VBR**: a Xing/Info header records the real frame count, and every
//!   frame holds the same number of samples, so
//!   `frames * samples_per_frame / sample_rate` is exact.
//! - **CBR**: without a frame count the file is assumed to be one bitrate
//!   end to end, so `file_size * 8 / (kbps * 1000)`. The whole file size is
//!   used, ID3 tag included, which overestimates slightly for tagged files.

use crate::error::{Error, Field, Result};
use crate::mp3::frame::{Bitrate, FrameHeader};
use crate::mp3::xing::XingHeader;
use tracing::debug;

/// Duration in seconds
pub fn duration(header: &FrameHeader, xing: Option<&XingHeader>, file_size: u64) -> Result<f64> {
    if let Some(frames) = xing.and_then(XingHeader::frame_count) {
        let samples = header.samples_per_frame()? as f64;
        let rate = header.frequency()? as f64;
        debug!(frames, "duration from Xing frame count");
        return Ok(frames as f64 * samples / rate);
    }

    match header.bitrate()? {
        Bitrate::Kbps(kbps) => {
            debug!(kbps, file_size, "duration from constant bitrate");
            Ok(file_size as f64 * 8.0 / (kbps as f64 * 1000.0))
        }
        // No table bitrate and no frame count: nothing to divide by
        Bitrate::Free => Err(Error::field(Field::BitrateIndex, header.bitrate_index)),
    }
}
