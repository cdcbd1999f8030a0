use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The seven channel voice messages, identified by the high nibble of their status byte.

# Example
```rust
# use midisheet::prelude::*;
let kind = VoiceKind::from_status(0x93).unwrap();
assert_eq!(kind, VoiceKind::NoteOn);
assert_eq!(kind.data_len(), 2);

assert!(VoiceKind::from_status(0xF0).is_none());
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum VoiceKind {
    /// A key was released
    NoteOff = 0x8,
    /// A key was pressed
    NoteOn = 0x9,
    /// Pressure on a single held key
    PolyAftertouch = 0xA,
    /// A controller moved
    ControlChange = 0xB,
    /// The channel's instrument changed
    ProgramChange = 0xC,
    /// Pressure across the whole channel
    ChannelPressure = 0xD,
    /// The pitch wheel moved
    PitchBend = 0xE,
}

impl VoiceKind {
    /// Identify the message from a full status byte
    pub fn from_status(status: u8) -> Option<Self> {
        Self::try_from(status >> 4).ok()
    }

    /// Number of data bytes that follow the status
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }
}

#[test]
fn all_channel_statuses_are_voice_messages() {
    for status in 0x80..=0xEFu8 {
        let kind = VoiceKind::from_status(status).unwrap();
        assert_eq!(u8::from(kind), status >> 4);
    }
    for status in 0xF0..=0xFFu8 {
        assert!(VoiceKind::from_status(status).is_none());
    }
}

#[test]
fn data_lengths() {
    assert_eq!(VoiceKind::NoteOff.data_len(), 2);
    assert_eq!(VoiceKind::PolyAftertouch.data_len(), 2);
    assert_eq!(VoiceKind::ControlChange.data_len(), 2);
    assert_eq!(VoiceKind::PitchBend.data_len(), 2);
    assert_eq!(VoiceKind::ProgramChange.data_len(), 1);
    assert_eq!(VoiceKind::ChannelPressure.data_len(), 1);
}
