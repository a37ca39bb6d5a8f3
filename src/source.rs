//! Random-access byte sources and the per-load session
//!
//! Every reader in [`crate::mp3`] pulls bytes through [`ByteSource`], so the
//! same parsing code runs against an open file or an in-memory buffer.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Random-access reader over a file-like object
pub trait ByteSource {
    /// Total length in bytes
    fn size(&mut self) -> io::Result<u64>;

    /// Read up to `len` bytes starting at `offset`.
    ///
    /// Returns fewer bytes only when the source ends first.
    fn read_at(&mut self, offset: u64, len: usize) -> io::Result<Vec<u8>>;
}

impl<R: Read + Seek> ByteSource for R {
    fn size(&mut self) -> io::Result<u64> {
        let current = self.stream_position()?;
        let end = self.seek(SeekFrom::End(0))?;
        self.seek(SeekFrom::Start(current))?;
        Ok(end)
    }

    fn read_at(&mut self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        self.seek(SeekFrom::Start(offset))?;
        let mut buf = Vec::with_capacity(len);
        self.by_ref().take(len as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// One open source plus its size, owned by a single load
///
/// The source is dropped (and a file handle closed) when the session goes
/// out of scope, whichever way the load ends.
pub struct Session<S: ByteSource> {
    source: S,
    size: u64,
}

impl Session<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::new(File::open(path)?)
    }
}

impl<S: ByteSource> Session<S> {
    pub fn new(mut source: S) -> io::Result<Self> {
        let size = source.size()?;
        Ok(Self { source, size })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn read_at(&mut self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        self.source.read_at(offset, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_session_captures_size() {
        let session = Session::new(Cursor::new(vec![0u8; 1234])).unwrap();
        assert_eq!(session.size(), 1234);
    }

    #[test]
    fn test_read_at_offset() {
        let mut session = Session::new(Cursor::new((0u8..10).collect::<Vec<_>>())).unwrap();
        assert_eq!(session.read_at(3, 4).unwrap(), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_read_at_short_near_end() {
        let mut session = Session::new(Cursor::new(vec![1u8, 2, 3])).unwrap();
        assert_eq!(session.read_at(1, 10).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_read_at_past_end_is_empty() {
        let mut session = Session::new(Cursor::new(vec![1u8, 2, 3])).unwrap();
        assert!(session.read_at(50, 4).unwrap().is_empty());
    }

    #[test]
    fn test_open_missing_file_fails() {
        assert!(Session::open("/definitely/not/here.mp3").is_err());
    }
}
