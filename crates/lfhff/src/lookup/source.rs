//! Byte-seekable text sources the lookup reads from

use std::io::{self, BufRead, Seek, SeekFrom};

/// A readable, seekable hosts file.
///
/// Offsets are absolute byte positions. Implemented for every
/// `BufRead + Seek` type, so `BufReader<File>` and `Cursor<Vec<u8>>` both
/// work directly.
pub trait HostsSource {
    /// Current byte offset
    fn current_offset(&mut self) -> io::Result<u64>;

    /// Move to an absolute byte offset
    fn seek_to(&mut self, offset: u64) -> io::Result<()>;

    /// Fill `buf` completely from the current position
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Append one line, including its `\n` if present, to `buf`.
    ///
    /// Returns the number of bytes read; 0 means end of stream.
    fn read_line_into(&mut self, buf: &mut Vec<u8>) -> io::Result<usize>;

    /// Total length in bytes. The current position is preserved.
    fn total_len(&mut self) -> io::Result<u64>;
}

impl<T: BufRead + Seek> HostsSource for T {
    fn current_offset(&mut self) -> io::Result<u64> {
        self.stream_position()
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.seek(SeekFrom::Start(offset)).map(|_| ())
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<()> {
        io::Read::read_exact(self, buf)
    }

    fn read_line_into(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        self.read_until(b'\n', buf)
    }

    fn total_len(&mut self) -> io::Result<u64> {
        let current = self.stream_position()?;
        let end = self.seek(SeekFrom::End(0))?;
        if current != end {
            self.seek(SeekFrom::Start(current))?;
        }
        Ok(end)
    }
}
