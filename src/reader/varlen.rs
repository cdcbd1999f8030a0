use alloc::vec::Vec;

use super::{ReadResult, Reader, ReaderError, ReaderErrorKind};

/// The largest value a four byte variable length quantity can hold.
pub const MAX_VARLEN: u32 = 0x0FFF_FFFF;

const MAX_VARLEN_BYTES: usize = 4;

impl Reader<'_> {
    /// Reads a variable length quantity.
    ///
    /// Each byte contributes its low seven bits, most significant group first. The
    /// first byte with a clear top bit ends the quantity. At most four bytes are read;
    /// a fourth byte with its top bit set still ends the quantity.
    ///
    /// If the stream ends first, the error carries the value folded so far.
    pub fn read_varlen(&mut self) -> ReadResult<u32> {
        let mut value: u32 = 0;
        for _ in 0..MAX_VARLEN_BYTES {
            let byte = match self.read_byte() {
                Ok(byte) => byte,
                Err(e) => {
                    return Err(ReaderError::new(
                        e.position(),
                        ReaderErrorKind::TruncatedVarLen { partial: value },
                    ));
                }
            };
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Ok(value)
    }
}

/// Encodes a value as a variable length quantity.
///
/// Values above [`MAX_VARLEN`] are truncated to their low 28 bits.
pub fn encode_varlen(value: u32) -> Vec<u8> {
    let value = value & MAX_VARLEN;
    let mut out = Vec::with_capacity(MAX_VARLEN_BYTES);
    let mut shift = 21;
    while shift > 0 && value >> shift == 0 {
        shift -= 7;
    }
    while shift > 0 {
        out.push(((value >> shift) & 0x7F) as u8 | 0x80);
        shift -= 7;
    }
    out.push((value & 0x7F) as u8);
    out
}

#[cfg(test)]
fn decode(bytes: &[u8]) -> ReadResult<u32> {
    Reader::from_byte_slice(bytes).read_varlen()
}

#[test]
fn single_byte_quantities() {
    assert_eq!(decode(&[0x00]).unwrap(), 0);
    assert_eq!(decode(&[0x40]).unwrap(), 64);
    assert_eq!(decode(&[0x7F]).unwrap(), 127);
}

#[test]
fn multi_byte_quantities_fold_every_byte() {
    assert_eq!(decode(&[0x81, 0x00]).unwrap(), 128);
    assert_eq!(decode(&[0x81, 0x48]).unwrap(), 200);
    assert_eq!(decode(&[0x83, 0x60]).unwrap(), 480);
    assert_eq!(decode(&[0xC0, 0x80, 0x00]).unwrap(), 0x10_0000);
    assert_eq!(decode(&[0xFF, 0xFF, 0xFF, 0x7F]).unwrap(), MAX_VARLEN);
}

#[test]
fn stops_after_the_terminating_byte() {
    let mut reader = Reader::from_byte_slice(&[0x81, 0x48, 0x90]);
    assert_eq!(reader.read_varlen().unwrap(), 200);
    assert_eq!(reader.read_byte().unwrap(), 0x90);
}

#[test]
fn reads_at_most_four_bytes() {
    let mut reader = Reader::from_byte_slice(&[0x81, 0x80, 0x80, 0x80, 0x05]);
    assert_eq!(reader.read_varlen().unwrap(), 0x0020_0000);
    assert_eq!(reader.read_byte().unwrap(), 0x05);
}

#[test]
fn truncated_quantity_keeps_partial_value() {
    let mut reader = Reader::from_byte_slice(&[0x81, 0x81]);
    let err = reader.read_varlen().unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::TruncatedVarLen { partial: 129 }
    );
    assert!(err.is_out_of_bounds());
    assert!(reader.is_at_end());
}

#[test]
fn encoding_agrees_with_decoding() {
    use pretty_assertions::assert_eq;

    assert_eq!(encode_varlen(0), alloc::vec![0x00]);
    assert_eq!(encode_varlen(200), alloc::vec![0x81, 0x48]);
    assert_eq!(encode_varlen(MAX_VARLEN), alloc::vec![0xFF, 0xFF, 0xFF, 0x7F]);

    for value in [1, 127, 128, 16_383, 16_384, 2_097_151, 2_097_152, MAX_VARLEN] {
        assert_eq!(decode(&encode_varlen(value)).unwrap(), value);
    }
}
