//! Forward-only reader over a decompressed archive stream
//!
//! Compressed archives cannot seek, so members are reached by decoding and
//! discarding everything in front of them.

use std::io::{self, Read};

/// Reads byte ranges from a stream in increasing offset order
pub struct SequentialReader<'a> {
    inner: Box<dyn Read + 'a>,
    position: u64,
}

impl<'a> SequentialReader<'a> {
    /// Wrap a stream positioned at offset zero
    pub fn new(inner: Box<dyn Read + 'a>) -> Self {
        SequentialReader { inner, position: 0 }
    }

    /// Current offset in the stream
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Discard bytes up to `offset`
    pub fn skip_to(&mut self, offset: u64) -> io::Result<()> {
        if offset < self.position {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot rewind from offset {} to {}", self.position, offset),
            ));
        }

        let wanted = offset - self.position;
        let skipped = io::copy(&mut (&mut self.inner).take(wanted), &mut io::sink())?;
        self.position += skipped;
        if skipped < wanted {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("stream ended at offset {} before {}", self.position, offset),
            ));
        }
        Ok(())
    }

    /// Read `size` bytes starting at `offset`
    pub fn read_at(&mut self, offset: u64, size: u64) -> io::Result<Vec<u8>> {
        self.skip_to(offset)?;

        let mut buffer = Vec::with_capacity(size as usize);
        let read = (&mut self.inner).take(size).read_to_end(&mut buffer)?;
        self.position += read as u64;
        if (read as u64) < size {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("member at offset {} truncated: {} of {} bytes", offset, read, size),
            ));
        }
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn counting_reader(len: u8) -> SequentialReader<'static> {
        SequentialReader::new(Box::new(Cursor::new((0..len).collect::<Vec<u8>>())))
    }

    #[test]
    fn reads_ranges_in_order() {
        let mut reader = counting_reader(32);
        assert_eq!(reader.read_at(2, 3).unwrap(), vec![2, 3, 4]);
        assert_eq!(reader.read_at(5, 2).unwrap(), vec![5, 6]);
        assert_eq!(reader.read_at(30, 2).unwrap(), vec![30, 31]);
        assert_eq!(reader.position(), 32);
    }

    #[test]
    fn refuses_to_rewind() {
        let mut reader = counting_reader(16);
        reader.read_at(8, 4).unwrap();
        let err = reader.read_at(0, 1).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn reports_truncation() {
        let mut reader = counting_reader(8);
        assert_eq!(reader.read_at(6, 4).unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
        let mut reader = counting_reader(8);
        assert_eq!(reader.skip_to(20).unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }
}
