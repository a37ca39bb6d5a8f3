//! MP3 container parsing: ID3v2 skip, frame header, Xing/Info header

pub mod frame;
pub mod id3;
pub mod xing;

pub use frame::{locate_frame_header, Bitrate, FrameHeader, Layer, MpegVersion, RawFrameHeader};
pub use id3::id3_size;
pub use xing::{locate_xing_header, XingHeader, XingKind};
