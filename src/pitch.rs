use core::fmt;

use crate::{DataByte, ParseError};

#[doc = r#"
The key of a note, interpreted as a 7-bit number.

Each value corresponds to some [`PitchClass`] and [`Octave`].

[`Pitch`] `0` is `C(-1)`, [`Pitch`] `60` is middle C (`C4`) and [`Pitch`] `127` is `G9`.

# Example
```rust
# use midisheet::prelude::*;

let pitch = Pitch::new(63).unwrap(); // 63 is between 0-127

assert_eq!(pitch.pitch_class(), PitchClass::DSharp);
assert_eq!(pitch.octave(), Octave::new(4));
assert_eq!(pitch.name(), "D#4/Eb4");
assert_eq!(pitch.piano_key(), Some(43));
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pitch(DataByte);

impl Pitch {
    /// Lowest key on an 88-key piano (`A0`)
    pub const PIANO_LOW: Pitch = Pitch(DataByte(21));
    /// Highest key on an 88-key piano (`C8`)
    pub const PIANO_HIGH: Pitch = Pitch(DataByte(108));

    /// Create a new pitch.
    ///
    /// Checks for correctness (leading 0 bit).
    pub fn new<B>(rep: B) -> Result<Self, ParseError>
    where
        B: TryInto<DataByte, Error = ParseError>,
    {
        rep.try_into().map(Self)
    }

    pub(crate) const fn from_data_byte(byte: DataByte) -> Self {
        Self(byte)
    }

    /// Create a pitch from a class and octave.
    ///
    /// Returns `None` for `G#9` through `B9`, which MIDI cannot represent.
    pub const fn from_parts(class: PitchClass, octave: Octave) -> Option<Self> {
        let value = (octave.value() as i16 + 1) * 12 + class as i16;
        if value > 127 {
            return None;
        }
        Some(Self(DataByte(value as u8)))
    }

    /// The underlying key byte
    #[inline]
    pub const fn byte(&self) -> u8 {
        self.0.0
    }

    /// Identifies the pitch class of the key
    #[inline]
    pub const fn pitch_class(&self) -> PitchClass {
        PitchClass::ALL[(self.0.0 % 12) as usize]
    }

    /// Identifies the octave of the key
    #[inline]
    pub const fn octave(&self) -> Octave {
        Octave((self.0.0 / 12) as i8 - 1)
    }

    /// The display name of the key, such as `C4` or `A#0/Bb0`.
    pub const fn name(&self) -> &'static str {
        PITCH_NAMES[self.0.0 as usize]
    }

    /// Position of the key on an 88-key piano, counting `A0` as 1.
    ///
    /// `None` if the key lies outside the piano's range.
    pub const fn piano_key(&self) -> Option<u8> {
        if self.0.0 < Self::PIANO_LOW.byte() || self.0.0 > Self::PIANO_HIGH.byte() {
            return None;
        }
        Some(self.0.0 - Self::PIANO_LOW.byte() + 1)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[doc = r#"
One of the twelve pitch classes of the chromatic scale.

Sharps and flats are the same pitch class; `CSharp` is also `Db`.
"#]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    /// All classes from [`PitchClass::C`] to [`PitchClass::B`]
    pub const ALL: [PitchClass; 12] = {
        use PitchClass::*;
        [C, CSharp, D, DSharp, E, F, FSharp, G, GSharp, A, ASharp, B]
    };

    /// Returns true for the five accidentals
    #[inline]
    pub const fn is_sharp(&self) -> bool {
        use PitchClass::*;
        matches!(self, CSharp | DSharp | FSharp | GSharp | ASharp)
    }

    /// Create a [`Pitch`] given this class and a provided [`Octave`]
    pub const fn with_octave(self, octave: Octave) -> Option<Pitch> {
        Pitch::from_parts(self, octave)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PitchClass::*;
        let name = match self {
            C => "C",
            CSharp => "C#/Db",
            D => "D",
            DSharp => "D#/Eb",
            E => "E",
            F => "F",
            FSharp => "F#/Gb",
            G => "G",
            GSharp => "G#/Ab",
            A => "A",
            ASharp => "A#/Bb",
            B => "B",
        };
        f.write_str(name)
    }
}

#[doc = r#"
The octave of a [`Pitch`]. Values range from -1 to 9.

# Example

```rust
# use midisheet::prelude::*;

let octave = Octave::new(12); // clamps to 9

assert_eq!(octave.value(), 9);
```
"#]
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Octave(i8);

impl Octave {
    /// Should be a value between [-1, 9]. Clamps between these two values.
    pub const fn new(octave: i8) -> Self {
        if octave < -1 {
            Self(-1)
        } else if octave > 9 {
            Self(9)
        } else {
            Self(octave)
        }
    }

    /// The octave, from `[-1,9]`
    pub const fn value(&self) -> i8 {
        self.0
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

macro_rules! octave_names {
    ($($oct:literal),*) => {
        [$(
            concat!("C", $oct),
            concat!("C#", $oct, "/Db", $oct),
            concat!("D", $oct),
            concat!("D#", $oct, "/Eb", $oct),
            concat!("E", $oct),
            concat!("F", $oct),
            concat!("F#", $oct, "/Gb", $oct),
            concat!("G", $oct),
            concat!("G#", $oct, "/Ab", $oct),
            concat!("A", $oct),
            concat!("A#", $oct, "/Bb", $oct),
            concat!("B", $oct),
        )*]
    };
}

/// Names for octaves -1 through 9; the last four entries are past key 127.
const ALL_NAMES: [&str; 132] = octave_names!("-1", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9");

const PITCH_NAMES: [&str; 128] = {
    let mut names = [""; 128];
    let mut i = 0;
    while i < 128 {
        names[i] = ALL_NAMES[i];
        i += 1;
    }
    names
};

#[test]
fn pitch_class_and_octave() {
    let c = Pitch::new(12).unwrap();
    assert_eq!(PitchClass::C, c.pitch_class());
    assert_eq!(0, c.octave().value());

    let a_sharp = Pitch::new(94).unwrap();
    assert_eq!(PitchClass::ASharp, a_sharp.pitch_class());
    assert_eq!(6, a_sharp.octave().value());
}

#[test]
fn pitch_names() {
    assert_eq!(Pitch::new(0).unwrap().name(), "C-1");
    assert_eq!(Pitch::new(21).unwrap().name(), "A0");
    assert_eq!(Pitch::new(22).unwrap().name(), "A#0/Bb0");
    assert_eq!(Pitch::new(60).unwrap().name(), "C4");
    assert_eq!(Pitch::new(108).unwrap().name(), "C8");
    assert_eq!(Pitch::new(127).unwrap().name(), "G9");
}

#[test]
fn piano_keys() {
    assert_eq!(Pitch::new(20).unwrap().piano_key(), None);
    assert_eq!(Pitch::new(21).unwrap().piano_key(), Some(1));
    assert_eq!(Pitch::new(60).unwrap().piano_key(), Some(40));
    assert_eq!(Pitch::new(108).unwrap().piano_key(), Some(88));
    assert_eq!(Pitch::new(109).unwrap().piano_key(), None);
}

#[test]
fn pitch_from_class_octave_pairs() {
    for byte in 0..128u8 {
        let pitch = Pitch::new(byte).unwrap();
        let made = Pitch::from_parts(pitch.pitch_class(), pitch.octave()).unwrap();
        assert_eq!(pitch, made);
    }
    assert_eq!(PitchClass::GSharp.with_octave(Octave::new(9)), None);
}
