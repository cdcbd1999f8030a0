use crate::prelude::*;

/// Chunk id of a track chunk
pub const TRACK_ID: &[u8; 4] = b"MTrk";

/// The eight bytes that open a track chunk: `"MTrk"` and the body length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackChunkHeader {
    length: u32,
}

impl TrackChunkHeader {
    /// Reads the chunk header of the track at `index`.
    pub(crate) fn read(reader: &mut Reader<'_>, index: usize) -> ReadResult<Self> {
        let id: [u8; 4] = reader.read_exact_size()?;
        if &id != TRACK_ID {
            return Err(ReaderError::parse_error(
                reader.buffer_position() - 4,
                FormatError::InvalidChunkId { index, found: id },
            ));
        }
        let length = reader.read_u32()?;
        Ok(Self { length })
    }

    /// Length in bytes of the track data, as declared
    pub const fn len(&self) -> u32 {
        self.length
    }

    /// True if the chunk declares no track data
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }
}

#[test]
fn read_track_chunk_header() {
    let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0x01, 0x02, 0xAA];
    let mut reader = Reader::from_byte_slice(&bytes);
    let chunk = TrackChunkHeader::read(&mut reader, 0).unwrap();
    assert_eq!(chunk.len(), 0x0102);
    assert_eq!(reader.buffer_position(), 8);
}

#[test]
fn reject_foreign_chunk() {
    let bytes = [b'X', b'F', b'I', b'H', 0, 0, 0, 0];
    let err = TrackChunkHeader::read(&mut Reader::from_byte_slice(&bytes), 2).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::format(FormatError::InvalidChunkId {
            index: 2,
            found: *b"XFIH"
        })
    );
}
