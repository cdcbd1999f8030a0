/// The header timing type.
///
/// The top bit of the header's division field selects between ticks per quarter note
/// and SMPTE time code. Only ticks per quarter note is interpreted; a time code
/// division is kept as the raw field so it is never mistaken for a tick rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Delta times count ticks, with this many ticks in a quarter note
    TicksPerQuarterNote(u16),
    /// SMPTE frames and ticks per frame, kept undecoded
    Timecode(u16),
}

impl Timing {
    /// Interpret the division field of a file header
    pub const fn from_division(division: u16) -> Self {
        if division & 0x8000 == 0 {
            Self::TicksPerQuarterNote(division)
        } else {
            Self::Timecode(division)
        }
    }

    /// The division field exactly as it appeared in the header
    pub const fn division(&self) -> u16 {
        match self {
            Self::TicksPerQuarterNote(v) | Self::Timecode(v) => *v,
        }
    }

    /// Returns Some if the midi timing is defined
    /// as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(*t),
            Self::Timecode(_) => None,
        }
    }
}

#[test]
fn division_top_bit_selects_timecode() {
    assert_eq!(Timing::from_division(480), Timing::TicksPerQuarterNote(480));
    assert_eq!(Timing::from_division(480).ticks_per_quarter_note(), Some(480));

    // -25 fps, 40 ticks per frame
    let timecode = Timing::from_division(0xE728);
    assert_eq!(timecode, Timing::Timecode(0xE728));
    assert_eq!(timecode.ticks_per_quarter_note(), None);
    assert_eq!(timecode.division(), 0xE728);
}
