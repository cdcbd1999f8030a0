#![doc = r#"
Forward-only byte cursor over a MIDI byte stream.

The [`Reader`] never moves backwards. Bytes can be inspected with [`Reader::peek`]
before committing to them, which is how running status is detected: a data byte where
a status byte was expected is left in place for the next read.

Every failing read returns a [`ReaderError`]. Once a read has run past the last byte,
[`Reader::is_at_end`] reports `true` for the rest of the reader's life.
"#]

mod error;
pub use error::*;

mod varlen;
pub use varlen::*;

use alloc::borrow::Cow;

/// A forward-only cursor over a buffer of bytes.
#[derive(Debug, Clone)]
pub struct Reader<'slc> {
    buffer: Cow<'slc, [u8]>,
    position: usize,
    /// Absolute offset of `buffer[0]` in the outermost stream
    offset: usize,
    at_end: bool,
}

impl<'slc> Reader<'slc> {
    /// Create a reader from owned or borrowed bytes
    pub fn from_bytes<B>(bytes: B) -> Self
    where
        B: Into<Cow<'slc, [u8]>>,
    {
        Self {
            buffer: bytes.into(),
            position: 0,
            offset: 0,
            at_end: false,
        }
    }

    /// Create a reader over a borrowed slice
    pub const fn from_byte_slice(bytes: &'slc [u8]) -> Self {
        Self {
            buffer: Cow::Borrowed(bytes),
            position: 0,
            offset: 0,
            at_end: false,
        }
    }

    /// The absolute position of the next byte to be read
    pub const fn buffer_position(&self) -> usize {
        self.offset + self.position
    }

    /// Number of bytes left to read
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// True once a read has tried to go past the final byte
    pub const fn is_at_end(&self) -> bool {
        self.at_end
    }

    /// True if there are no more bytes to read
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn eof<T>(&mut self) -> ReadResult<T> {
        self.at_end = true;
        Err(ReaderError::oob(self.buffer_position()))
    }

    /// Returns the next `n` bytes without advancing.
    pub fn peek(&mut self, n: usize) -> ReadResult<&[u8]> {
        if self.remaining() < n {
            return self.eof();
        }
        Ok(&self.buffer[self.position..self.position + n])
    }

    /// Advances `n` bytes.
    ///
    /// If fewer than `n` bytes remain, the reader moves to the end and reports it.
    pub fn discard(&mut self, n: usize) -> ReadResult<()> {
        if self.remaining() < n {
            self.position = self.buffer.len();
            return self.eof();
        }
        self.position += n;
        Ok(())
    }

    /// Reads one byte.
    pub fn read_byte(&mut self) -> ReadResult<u8> {
        match self.buffer.get(self.position) {
            Some(&byte) => {
                self.position += 1;
                Ok(byte)
            }
            None => self.eof(),
        }
    }

    /// Reads the next `n` bytes.
    ///
    /// On a short read the reader is left at the end.
    pub fn read_slice(&mut self, n: usize) -> ReadResult<&[u8]> {
        if self.remaining() < n {
            self.position = self.buffer.len();
            return self.eof();
        }
        let start = self.position;
        self.position += n;
        Ok(&self.buffer[start..self.position])
    }

    /// Reads exactly `SIZE` bytes into an array.
    pub fn read_exact_size<const SIZE: usize>(&mut self) -> ReadResult<[u8; SIZE]> {
        let mut out = [0; SIZE];
        out.copy_from_slice(self.read_slice(SIZE)?);
        Ok(out)
    }

    /// Reads a big-endian u16
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Reads a big-endian u32
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Splits off a reader over the next `len` bytes and moves past them.
    ///
    /// If fewer than `len` bytes remain, the returned reader covers what is left and the
    /// second value is `true`.
    pub fn split_off(&mut self, len: usize) -> (Reader<'_>, bool) {
        let start = self.position;
        let end = start.saturating_add(len).min(self.buffer.len());
        self.position = end;
        let reader = Reader {
            buffer: Cow::Borrowed(&self.buffer[start..end]),
            position: 0,
            offset: self.offset + start,
            at_end: false,
        };
        (reader, end - start < len)
    }
}

#[test]
fn peek_does_not_advance() {
    let mut reader = Reader::from_byte_slice(&[1, 2, 3]);
    assert_eq!(reader.peek(2).unwrap(), &[1, 2]);
    assert_eq!(reader.peek(2).unwrap(), &[1, 2]);
    assert_eq!(reader.read_byte().unwrap(), 1);
    assert_eq!(reader.buffer_position(), 1);
}

#[test]
fn peek_past_end_sets_flag() {
    let mut reader = Reader::from_byte_slice(&[1, 2]);
    assert!(reader.peek(3).unwrap_err().is_out_of_bounds());
    assert!(reader.is_at_end());
    assert_eq!(reader.buffer_position(), 0);
}

#[test]
fn read_byte_until_exhausted() {
    let mut reader = Reader::from_bytes(alloc::vec![7u8]);
    assert_eq!(reader.read_byte().unwrap(), 7);
    assert!(!reader.is_at_end());
    assert!(reader.read_byte().is_err());
    assert!(reader.is_at_end());
}

#[test]
fn discard_short_moves_to_end() {
    let mut reader = Reader::from_byte_slice(&[0, 0, 0]);
    reader.discard(1).unwrap();
    assert!(reader.discard(5).is_err());
    assert!(reader.is_empty());
    assert!(reader.is_at_end());
}

#[test]
fn big_endian_reads() {
    let mut reader = Reader::from_byte_slice(&[0x00, 0x00, 0x00, 0x06, 0x01, 0xE0]);
    assert_eq!(reader.read_u32().unwrap(), 6);
    assert_eq!(reader.read_u16().unwrap(), 480);
}

#[test]
fn split_off_clamps_and_keeps_absolute_positions() {
    let mut reader = Reader::from_byte_slice(&[9, 1, 2, 3]);
    reader.read_byte().unwrap();

    let (mut body, clamped) = reader.split_off(10);
    assert!(clamped);
    assert_eq!(body.remaining(), 3);
    assert_eq!(body.buffer_position(), 1);
    body.read_byte().unwrap();
    assert_eq!(body.buffer_position(), 2);
}
