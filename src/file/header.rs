use num_enum::TryFromPrimitive;

use crate::prelude::*;

/// Chunk id of the header chunk
pub const HEADER_ID: &[u8; 4] = b"MThd";

/// The only header length the format defines
pub const HEADER_LENGTH: u32 = 6;

/// How a file's tracks relate to each other.
///
/// This is informational only. Tracks are decoded the same way for every format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

#[doc = r#"
The 14 byte header at the start of every MIDI file.

```text
"MThd" | length: u32 = 6 | format: u16 | tracks: u16 | division: u16
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFileHeader {
    format: u16,
    track_count: u16,
    timing: Timing,
}

impl MidiFileHeader {
    /// Create a header from its fields
    pub const fn new(format: u16, track_count: u16, timing: Timing) -> Self {
        Self {
            format,
            track_count,
            timing,
        }
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let magic: [u8; 4] = reader.read_exact_size()?;
        if &magic != HEADER_ID {
            return Err(ReaderError::parse_error(
                reader.buffer_position() - 4,
                FormatError::InvalidMagic(magic),
            ));
        }
        let length = reader.read_u32()?;
        if length != HEADER_LENGTH {
            return Err(ReaderError::parse_error(
                reader.buffer_position() - 4,
                FormatError::InvalidHeaderLength(length),
            ));
        }
        let format = reader.read_u16()?;
        let track_count = reader.read_u16()?;
        let timing = Timing::from_division(reader.read_u16()?);

        Ok(Self {
            format,
            track_count,
            timing,
        })
    }

    /// The format field as written. Values other than 0, 1 and 2 are kept as-is.
    pub const fn format(&self) -> u16 {
        self.format
    }

    /// The format, if it is one of the three the standard defines
    pub fn format_type(&self) -> Option<FormatType> {
        FormatType::try_from(self.format).ok()
    }

    /// Number of track chunks the header declares
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }

    /// Get the timing props
    pub const fn timing(&self) -> &Timing {
        &self.timing
    }
}

#[cfg(test)]
fn header_bytes(magic: &[u8; 4], length: u32, format: u16, tracks: u16, division: u16) -> alloc::vec::Vec<u8> {
    let mut bytes = alloc::vec::Vec::new();
    bytes.extend_from_slice(magic);
    bytes.extend_from_slice(&length.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&tracks.to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    bytes
}

#[test]
fn read_valid_header() {
    use pretty_assertions::assert_eq;

    let bytes = header_bytes(b"MThd", 6, 1, 3, 480);
    let mut reader = Reader::from_byte_slice(&bytes);
    let header = MidiFileHeader::read(&mut reader).unwrap();

    assert_eq!(header, MidiFileHeader::new(1, 3, Timing::TicksPerQuarterNote(480)));
    assert_eq!(header.format_type(), Some(FormatType::Simultaneous));
    assert_eq!(reader.buffer_position(), 14);
}

#[test]
fn unknown_format_is_kept() {
    let bytes = header_bytes(b"MThd", 6, 7, 1, 96);
    let header = MidiFileHeader::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    assert_eq!(header.format(), 7);
    assert_eq!(header.format_type(), None);
}

#[test]
fn reject_bad_magic() {
    let bytes = header_bytes(b"MThx", 6, 0, 1, 96);
    let err = MidiFileHeader::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::format(FormatError::InvalidMagic(*b"MThx"))
    );
    assert_eq!(err.position(), 0);
}

#[test]
fn reject_bad_length() {
    let bytes = header_bytes(b"MThd", 8, 0, 1, 96);
    let err = MidiFileHeader::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::format(FormatError::InvalidHeaderLength(8))
    );
}

#[test]
fn short_header_is_out_of_bounds() {
    let bytes = header_bytes(b"MThd", 6, 0, 1, 96);
    let err = MidiFileHeader::read(&mut Reader::from_byte_slice(&bytes[..11])).unwrap_err();
    assert!(err.is_out_of_bounds());
}
