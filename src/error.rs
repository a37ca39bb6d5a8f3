//! Error types for metadata loading

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No frame sync at the offset following the ID3 tag
    #[error("invalid file: no MPEG frame sync at offset {offset}")]
    InvalidFile { offset: u64 },

    /// A header field holds a reserved or unusable value
    #[error("invalid {field}: {value}")]
    InvalidField { field: Field, value: u8 },
}

/// Header field named by an [`Error::InvalidField`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Version,
    Layer,
    BitrateIndex,
    FrequencyIndex,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Version => write!(f, "MPEG version"),
            Field::Layer => write!(f, "layer"),
            Field::BitrateIndex => write!(f, "bitrate index"),
            Field::FrequencyIndex => write!(f, "frequency index"),
        }
    }
}

impl Error {
    pub(crate) fn field(field: Field, value: u8) -> Self {
        Error::InvalidField { field, value }
    }
}
