//! MP3 frame header parsing
//!
//! MP3 frames start with a sync word followed by header info.
//! Frame header structure (4 bytes):
//! AAAAAAAA AAABBCCD EEEEFFGH IIJJKLMM
//!
//! A = sync (11 bits)
//! B = MPEG version (2 bits): 00=2.5, 01=reserved, 10=2, 11=1
//! C = Layer (2 bits): 00=reserved, 01=III, 10=II, 11=I
//! D = Protection bit (CRC)
//! E = Bitrate index (4 bits)
//! F = Sample rate index (2 bits)
//! G = Padding bit
//! H = Private bit
//! I..M = Channel mode, mode extension, copyright, original, emphasis (unused here)
//!
//! Only the first frame is read. Its header is located, kept verbatim as a
//! [`RawFrameHeader`], and decoded into a [`FrameHeader`] whose numeric
//! accessors fail on reserved values instead of returning placeholders.

use crate::error::{Error, Field, Result};
use crate::source::{ByteSource, Session};
use serde::{Serialize, Serializer};
use std::fmt;
use std::io;
use tracing::trace;

pub const FRAME_HEADER_LEN: usize = 4;

/// The four header bytes exactly as they appear in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrameHeader([u8; FRAME_HEADER_LEN]);

impl RawFrameHeader {
    /// Accept `bytes` if they start with a frame sync
    pub fn new(bytes: [u8; FRAME_HEADER_LEN]) -> Option<Self> {
        if bytes[0] != 0xFF || (bytes[1] & 0xC0) != 0xC0 {
            return None;
        }
        Some(Self(bytes))
    }

    pub fn bytes(&self) -> [u8; FRAME_HEADER_LEN] {
        self.0
    }

    pub fn decode(&self) -> FrameHeader {
        let [_, b1, b2, _] = self.0;
        FrameHeader {
            version: MpegVersion::from_bits((b1 >> 3) & 0x03),
            layer: Layer::from_bits((b1 >> 1) & 0x03),
            protected: (b1 & 0x01) == 0,
            bitrate_index: (b2 >> 4) & 0x0F,
            frequency_index: (b2 >> 2) & 0x03,
            padding: (b2 & 0x02) != 0,
        }
    }
}

/// Read the 4 bytes at `offset` and return them if they carry a frame sync.
///
/// No resync is attempted: a file whose first frame is not exactly at
/// `offset` is reported as `None`.
pub fn locate_frame_header<S: ByteSource>(
    session: &mut Session<S>,
    offset: u64,
) -> io::Result<Option<RawFrameHeader>> {
    let buf = session.read_at(offset, FRAME_HEADER_LEN)?;
    let bytes: [u8; FRAME_HEADER_LEN] = match buf.as_slice().try_into() {
        Ok(bytes) => bytes,
        Err(_) => return Ok(None),
    };

    let header = RawFrameHeader::new(bytes);
    trace!(offset, ?bytes, valid = header.is_some(), "checked frame sync");
    Ok(header)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    Mpeg25,
    Reserved,
    Mpeg2,
    Mpeg1,
}

impl MpegVersion {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => MpegVersion::Mpeg25,
            1 => MpegVersion::Reserved,
            2 => MpegVersion::Mpeg2,
            _ => MpegVersion::Mpeg1,
        }
    }

    pub fn bits(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MpegVersion::Mpeg25 => "MPEG 2.5",
            MpegVersion::Reserved => "reserved",
            MpegVersion::Mpeg2 => "MPEG 2",
            MpegVersion::Mpeg1 => "MPEG 1",
        }
    }
}

impl fmt::Display for MpegVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Reserved,
    Layer3,
    Layer2,
    Layer1,
}

impl Layer {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Layer::Reserved,
            1 => Layer::Layer3,
            2 => Layer::Layer2,
            _ => Layer::Layer1,
        }
    }

    pub fn bits(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Reserved => "reserved",
            Layer::Layer3 => "Layer III",
            Layer::Layer2 => "Layer II",
            Layer::Layer1 => "Layer I",
        }
    }

    /// Row in the bitrate tables (Layer I first)
    fn table_row(&self) -> Result<usize> {
        match self {
            Layer::Reserved => Err(Error::field(Field::Layer, self.bits())),
            Layer::Layer1 => Ok(0),
            Layer::Layer2 => Ok(1),
            Layer::Layer3 => Ok(2),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Bitrate declared by a frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bitrate {
    /// Index 0: the encoder used a bitrate outside the table
    Free,
    Kbps(u32),
}

impl Bitrate {
    pub fn kbps(&self) -> Option<u32> {
        match self {
            Bitrate::Free => None,
            Bitrate::Kbps(kbps) => Some(*kbps),
        }
    }
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bitrate::Free => f.pad("free"),
            Bitrate::Kbps(kbps) => f.pad(&kbps.to_string()),
        }
    }
}

// Serialized as a bare number, or the string "free"
impl Serialize for Bitrate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Bitrate::Free => serializer.serialize_str("free"),
            Bitrate::Kbps(kbps) => serializer.serialize_u32(*kbps),
        }
    }
}

// Bitrate lookup tables (kbps), [version group][layer row][index]
// Version group 0 = MPEG 1, 1 = MPEG 2 / 2.5. Rows are Layer I, II, III.
// Index 0 = free, 15 = bad
const BITRATES: [[[u32; 16]; 3]; 2] = [
    [
        [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 0],
        [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384, 0],
        [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0],
    ],
    [
        [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256, 0],
        [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0],
        [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0],
    ],
];

const FREE_BITRATE_INDEX: u8 = 0;
const BAD_BITRATE_INDEX: u8 = 15;

// Sample rate lookup tables (Hz), [MPEG 1, MPEG 2, MPEG 2.5][index]
// Index 3 = reserved
const SAMPLE_RATES: [[u32; 3]; 3] = [
    [44100, 48000, 32000],
    [22050, 24000, 16000],
    [11025, 12000, 8000],
];

/// Decoded fields of a frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: MpegVersion,
    pub layer: Layer,
    /// Protection bit clear: a 16-bit CRC follows the header
    pub protected: bool,
    pub bitrate_index: u8,
    pub frequency_index: u8,
    pub padding: bool,
}

impl FrameHeader {
    /// Bitrate in kbps. The table group is picked by the low version bit,
    /// so MPEG 2 and 2.5 share one.
    pub fn bitrate(&self) -> Result<Bitrate> {
        let row = self.layer.table_row()?;

        match self.bitrate_index {
            FREE_BITRATE_INDEX => Ok(Bitrate::Free),
            idx if idx >= BAD_BITRATE_INDEX => Err(Error::field(Field::BitrateIndex, idx)),
            idx => {
                let group = if self.version.bits() & 0x01 == 1 { 0 } else { 1 };
                Ok(Bitrate::Kbps(BITRATES[group][row][idx as usize]))
            }
        }
    }

    /// Sample rate in Hz
    pub fn frequency(&self) -> Result<u32> {
        let rates = match self.version {
            MpegVersion::Mpeg1 => &SAMPLE_RATES[0],
            MpegVersion::Mpeg2 => &SAMPLE_RATES[1],
            MpegVersion::Mpeg25 => &SAMPLE_RATES[2],
            MpegVersion::Reserved => {
                return Err(Error::field(Field::Version, self.version.bits()))
            }
        };

        rates
            .get(self.frequency_index as usize)
            .copied()
            .ok_or_else(|| Error::field(Field::FrequencyIndex, self.frequency_index))
    }

    pub fn samples_per_frame(&self) -> Result<u32> {
        match (self.layer, self.version) {
            (Layer::Reserved, _) => Err(Error::field(Field::Layer, self.layer.bits())),
            (Layer::Layer1, _) => Ok(384),
            (Layer::Layer2, _) => Ok(1152),
            (Layer::Layer3, MpegVersion::Mpeg1) => Ok(1152),
            (Layer::Layer3, _) => Ok(576),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    // ==========================================================================
    // FRAME SYNC TESTS
    // ==========================================================================

    fn session(data: Vec<u8>) -> Session<Cursor<Vec<u8>>> {
        Session::new(Cursor::new(data)).unwrap()
    }

    #[test]
    fn test_valid_headers_returned_verbatim() {
        for b1 in [0xC0u8, 0xE0, 0xFB, 0xF3, 0xFF] {
            for b2 in [0x00u8, 0x90, 0xFF] {
                let bytes = [0xFF, b1, b2, 0x44];
                let mut s = session(bytes.to_vec());
                let raw = locate_frame_header(&mut s, 0).unwrap();
                assert_eq!(raw.map(|r| r.bytes()), Some(bytes));
            }
        }
    }

    #[test]
    fn test_invalid_sync_not_found() {
        for bytes in [
            [0xFE, 0xFB, 0x90, 0x00],
            [0xFF, 0xBF, 0x90, 0x00],
            [0xFF, 0x7F, 0x90, 0x00],
            [0x00, 0x00, 0x00, 0x00],
            *b"ID3\x04",
        ] {
            let mut s = session(bytes.to_vec());
            assert!(locate_frame_header(&mut s, 0).unwrap().is_none(), "{:02X?}", bytes);
        }
    }

    #[test]
    fn test_locate_at_offset() {
        let mut data = vec![0u8; 32];
        data.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        let mut s = session(data);
        assert!(locate_frame_header(&mut s, 0).unwrap().is_none());
        assert!(locate_frame_header(&mut s, 32).unwrap().is_some());
    }

    #[test]
    fn test_truncated_header_not_found() {
        let mut s = session(vec![0xFF, 0xFB]);
        assert!(locate_frame_header(&mut s, 0).unwrap().is_none());
    }

    // ==========================================================================
    // FIELD DECODING TESTS
    // ==========================================================================

    fn decode(bytes: [u8; 4]) -> FrameHeader {
        RawFrameHeader::new(bytes).expect("valid sync").decode()
    }

    #[test]
    fn test_decode_mpeg1_layer3() {
        let h = decode([0xFF, 0xFB, 0x92, 0x00]);
        assert_eq!(h.version, MpegVersion::Mpeg1);
        assert_eq!(h.layer, Layer::Layer3);
        assert!(!h.protected);
        assert_eq!(h.bitrate_index, 9);
        assert_eq!(h.frequency_index, 0);
        assert!(h.padding);
    }

    #[test]
    fn test_version_and_layer_strings() {
        assert_eq!(MpegVersion::from_bits(0).as_str(), "MPEG 2.5");
        assert_eq!(MpegVersion::from_bits(1).as_str(), "reserved");
        assert_eq!(MpegVersion::from_bits(2).as_str(), "MPEG 2");
        assert_eq!(MpegVersion::from_bits(3).as_str(), "MPEG 1");

        assert_eq!(Layer::from_bits(0).as_str(), "reserved");
        assert_eq!(Layer::from_bits(1).as_str(), "Layer III");
        assert_eq!(Layer::from_bits(2).as_str(), "Layer II");
        assert_eq!(Layer::from_bits(3).as_str(), "Layer I");
    }

    #[test]
    fn test_protection_bit() {
        assert!(decode([0xFF, 0xFA, 0x90, 0x00]).protected);
        assert!(!decode([0xFF, 0xFB, 0x90, 0x00]).protected);
    }

    // ==========================================================================
    // LOOKUP TABLE TESTS
    // ==========================================================================

    #[test]
    fn test_bitrate_mpeg1_layer3() {
        let h = decode([0xFF, 0xFB, 0x90, 0x00]);
        assert_eq!(h.bitrate().unwrap(), Bitrate::Kbps(128));
    }

    #[test]
    fn test_bitrate_mpeg2_layer3() {
        let h = decode([0xFF, 0xF3, 0x90, 0x00]);
        assert_eq!(h.version, MpegVersion::Mpeg2);
        assert_eq!(h.bitrate().unwrap(), Bitrate::Kbps(80));
    }

    #[test]
    fn test_bitrate_mpeg25_shares_mpeg2_table() {
        let h = decode([0xFF, 0xE3, 0x90, 0x00]);
        assert_eq!(h.version, MpegVersion::Mpeg25);
        assert_eq!(h.bitrate().unwrap(), Bitrate::Kbps(80));
    }

    #[test]
    fn test_bitrate_layer1_and_layer2() {
        // MPEG 1, Layer I, index 14
        assert_eq!(decode([0xFF, 0xFF, 0xE0, 0x00]).bitrate().unwrap(), Bitrate::Kbps(448));
        // MPEG 1, Layer II, index 14
        assert_eq!(decode([0xFF, 0xFD, 0xE0, 0x00]).bitrate().unwrap(), Bitrate::Kbps(384));
        // MPEG 2, Layer I, index 14
        assert_eq!(decode([0xFF, 0xF7, 0xE0, 0x00]).bitrate().unwrap(), Bitrate::Kbps(256));
    }

    #[test]
    fn test_bitrate_index_zero_is_free() {
        let h = decode([0xFF, 0xFB, 0x00, 0x00]);
        assert_eq!(h.bitrate().unwrap(), Bitrate::Free);
        assert_eq!(Bitrate::Free.kbps(), None);
    }

    #[test]
    fn test_bitrate_index_15_is_error() {
        let h = decode([0xFF, 0xFB, 0xF0, 0x00]);
        assert!(matches!(
            h.bitrate(),
            Err(Error::InvalidField { field: Field::BitrateIndex, value: 15 })
        ));
    }

    #[test]
    fn test_bitrate_reserved_layer_is_error() {
        let h = decode([0xFF, 0xF9, 0x90, 0x00]);
        assert_eq!(h.layer, Layer::Reserved);
        assert!(matches!(
            h.bitrate(),
            Err(Error::InvalidField { field: Field::Layer, .. })
        ));
    }

    #[test]
    fn test_frequency_tables() {
        assert_eq!(decode([0xFF, 0xFB, 0x90, 0x00]).frequency().unwrap(), 44100);
        assert_eq!(decode([0xFF, 0xFB, 0x94, 0x00]).frequency().unwrap(), 48000);
        assert_eq!(decode([0xFF, 0xFB, 0x98, 0x00]).frequency().unwrap(), 32000);
        assert_eq!(decode([0xFF, 0xF3, 0x90, 0x00]).frequency().unwrap(), 22050);
        assert_eq!(decode([0xFF, 0xE3, 0x90, 0x00]).frequency().unwrap(), 11025);
        assert_eq!(decode([0xFF, 0xE3, 0x98, 0x00]).frequency().unwrap(), 8000);
    }

    #[test]
    fn test_frequency_index_3_is_error() {
        let h = decode([0xFF, 0xFB, 0x9C, 0x00]);
        assert!(matches!(
            h.frequency(),
            Err(Error::InvalidField { field: Field::FrequencyIndex, value: 3 })
        ));
    }

    #[test]
    fn test_frequency_reserved_version_is_error() {
        let h = decode([0xFF, 0xEB, 0x90, 0x00]);
        assert_eq!(h.version, MpegVersion::Reserved);
        assert!(matches!(
            h.frequency(),
            Err(Error::InvalidField { field: Field::Version, value: 1 })
        ));
    }

    #[test]
    fn test_samples_per_frame() {
        assert_eq!(decode([0xFF, 0xFB, 0x90, 0x00]).samples_per_frame().unwrap(), 1152);
        assert_eq!(decode([0xFF, 0xF3, 0x90, 0x00]).samples_per_frame().unwrap(), 576);
        assert_eq!(decode([0xFF, 0xE3, 0x90, 0x00]).samples_per_frame().unwrap(), 576);
        assert_eq!(decode([0xFF, 0xFD, 0x90, 0x00]).samples_per_frame().unwrap(), 1152);
        for layer1 in [0xFFu8, 0xF7, 0xE7] {
            assert_eq!(decode([0xFF, layer1, 0x90, 0x00]).samples_per_frame().unwrap(), 384);
        }
        assert!(decode([0xFF, 0xF9, 0x90, 0x00]).samples_per_frame().is_err());
    }

    #[test]
    fn test_bitrate_serializes_as_number_or_free() {
        assert_eq!(serde_json::to_string(&Bitrate::Kbps(128)).unwrap(), "128");
        assert_eq!(serde_json::to_string(&Bitrate::Free).unwrap(), "\"free\"");
    }
}
