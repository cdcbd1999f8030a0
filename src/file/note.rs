use crate::prelude::*;

/// A note reconstructed from a Note-On and the Note-Off that closed it.
///
/// Positions are in ticks from the start of the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    key: Pitch,
    velocity: Velocity,
    start: u64,
    duration: u64,
}

impl Note {
    /// Create a new note
    pub const fn new(key: Pitch, velocity: Velocity, start: u64, duration: u64) -> Self {
        Self {
            key,
            velocity,
            start,
            duration,
        }
    }

    /// The key played
    pub const fn key(&self) -> Pitch {
        self.key
    }

    /// Velocity of the Note-On that started the note
    pub const fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Absolute tick of the Note-On
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// Ticks between the Note-On and the Note-Off
    pub const fn duration(&self) -> u64 {
        self.duration
    }

    /// Absolute tick of the Note-Off
    pub const fn end(&self) -> u64 {
        self.start + self.duration
    }
}
