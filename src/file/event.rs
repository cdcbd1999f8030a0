use crate::prelude::*;

/// What a decoded track event means for note reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// A key was pressed with a non-zero velocity
    NoteOn {
        /// The key pressed
        key: Pitch,
        /// How hard it was pressed
        velocity: Velocity,
    },
    /// A key was released. A Note-On with zero velocity decodes to this.
    NoteOff {
        /// The key released
        key: Pitch,
        /// The release velocity
        velocity: Velocity,
    },
    /// Any other channel voice message. Its data is not kept.
    Other(VoiceKind),
}

#[doc = r#"
A channel voice message decoded from a track, with the ticks since the previous event.

Meta events and system exclusive messages do not produce events. Their delta-times
are folded into the next event's, so summing `delta_ticks` always gives the absolute
position of an event in its track.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    delta_ticks: u64,
    kind: EventKind,
}

impl TrackEvent {
    /// Create a new track event
    pub const fn new(delta_ticks: u64, kind: EventKind) -> Self {
        Self { delta_ticks, kind }
    }

    /// Decode the data bytes of a channel voice message.
    ///
    /// Messages with a single data byte leave the second one unused.
    pub(crate) fn from_voice(delta_ticks: u64, kind: VoiceKind, data: [u8; 2]) -> Self {
        let kind = match kind {
            VoiceKind::NoteOn | VoiceKind::NoteOff => {
                let key = Pitch::from_data_byte(DataByte::from_byte_lossy(data[0]));
                let velocity = Velocity::from_data_byte(DataByte::from_byte_lossy(data[1]));
                if kind == VoiceKind::NoteOn && !velocity.is_silent() {
                    EventKind::NoteOn { key, velocity }
                } else {
                    EventKind::NoteOff { key, velocity }
                }
            }
            other => EventKind::Other(other),
        };
        Self { delta_ticks, kind }
    }

    /// Ticks elapsed since the previous event in the same track
    pub const fn delta_ticks(&self) -> u64 {
        self.delta_ticks
    }

    /// What the event is
    pub const fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// The key, for Note-On and Note-Off events
    pub const fn key(&self) -> Option<Pitch> {
        match self.kind {
            EventKind::NoteOn { key, .. } | EventKind::NoteOff { key, .. } => Some(key),
            EventKind::Other(_) => None,
        }
    }
}

#[test]
fn zero_velocity_note_on_is_note_off() {
    let event = TrackEvent::from_voice(480, VoiceKind::NoteOn, [60, 0]);
    assert_eq!(
        event.kind(),
        &EventKind::NoteOff {
            key: Pitch::new(60).unwrap(),
            velocity: Velocity::new(0).unwrap()
        }
    );
    assert_eq!(event.delta_ticks(), 480);
}

#[test]
fn other_messages_drop_their_data() {
    let event = TrackEvent::from_voice(0, VoiceKind::ControlChange, [64, 127]);
    assert_eq!(event.kind(), &EventKind::Other(VoiceKind::ControlChange));
    assert_eq!(event.key(), None);

    let event = TrackEvent::from_voice(0, VoiceKind::ProgramChange, [5, 0]);
    assert_eq!(event.kind(), &EventKind::Other(VoiceKind::ProgramChange));
}
