use core::fmt;

use crate::ParseError;

#[doc = r#"
A byte with its leading bit cleared.

Every byte following a status byte in a channel message is a data byte.

# Example
```rust
# use midisheet::prelude::*;
assert_eq!(DataByte::new(64).unwrap().value(), 64);
assert!(DataByte::new(0x80).is_err());

// masking keeps the low seven bits
assert_eq!(DataByte::from_byte_lossy(0xBC).value(), 0x3C);
```
"#]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataByte(pub(crate) u8);

impl DataByte {
    /// Create a data byte, checking the leading bit
    pub const fn new(byte: u8) -> Result<Self, ParseError> {
        if byte & 0x80 != 0 {
            return Err(ParseError::DataByte(byte));
        }
        Ok(Self(byte))
    }

    /// Create a data byte by dropping the leading bit
    pub const fn from_byte_lossy(byte: u8) -> Self {
        Self(byte & 0x7F)
    }

    /// The underlying value, 0-127
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DataByte {
    type Error = ParseError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for DataByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[doc = r#"
How hard a key was struck, 0-127.

A Note-On with a velocity of zero is read as a Note-Off.
"#]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity(DataByte);

impl Velocity {
    /// Create a velocity, checking the leading bit
    pub fn new<B>(rep: B) -> Result<Self, ParseError>
    where
        B: TryInto<DataByte, Error = ParseError>,
    {
        rep.try_into().map(Self)
    }

    pub(crate) const fn from_data_byte(byte: DataByte) -> Self {
        Self(byte)
    }

    /// The raw velocity
    pub const fn byte(&self) -> u8 {
        self.0.0
    }

    /// True for a velocity of zero
    pub const fn is_silent(&self) -> bool {
        self.0.0 == 0
    }
}

impl fmt::Display for Velocity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[test]
fn data_byte_rejects_status_bytes() {
    for byte in 0x80..=0xFF {
        assert_eq!(DataByte::new(byte), Err(ParseError::DataByte(byte)));
    }
    for byte in 0..0x80 {
        assert_eq!(DataByte::new(byte).unwrap().value(), byte);
    }
}

#[test]
fn silent_velocity() {
    assert!(Velocity::new(0).unwrap().is_silent());
    assert!(!Velocity::new(1).unwrap().is_silent());
    assert!(Velocity::new(200).is_err());
}
