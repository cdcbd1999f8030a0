#![doc = r#"
Decodes the body of one track chunk into [`TrackEvent`]s.

```text
            delta read                 message read
AwaitEvent ------------> InTrack ----------------------> AwaitEvent
                            |
                            | end-of-track meta
                            v
                        EndOfTrack
```

Running out of bytes, or meeting a status that cannot be decoded, leaves the loop
early and is reported as a [`TrackInterruption`].
"#]

use crate::{
    file::meta::{self, MetaOutcome, MetaTarget},
    message::{RunningStatus, StatusKind},
    prelude::*,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    /// Expecting the delta-time of the next record
    AwaitEvent,
    /// A delta-time has been read; the message follows
    InTrack { delta: u32 },
    /// The end-of-track meta event was read
    EndOfTrack,
}

/// Decodes one track chunk body.
pub(crate) struct TrackDecoder<'r, 'slc> {
    reader: &'r mut Reader<'slc>,
    running: RunningStatus,
    state: DecoderState,
    /// Delta-times of records that produced no event, owed to the next event
    carried: u64,
    /// Absolute tick of the last record read
    tick: u64,
}

fn truncated(_err: ReaderError) -> TrackInterruption {
    #[cfg(feature = "tracing")]
    tracing::debug!("{_err}");
    TrackInterruption::Truncated
}

impl<'r, 'slc> TrackDecoder<'r, 'slc> {
    pub(crate) fn new(reader: &'r mut Reader<'slc>) -> Self {
        Self {
            reader,
            running: RunningStatus::default(),
            state: DecoderState::AwaitEvent,
            carried: 0,
            tick: 0,
        }
    }

    /// Decode events into `track` until its end, recording the first tempo in `tempo`.
    ///
    /// Returns why the track stopped, if it was not its end-of-track event.
    pub(crate) fn run(
        mut self,
        track: &mut Track,
        tempo: &mut Option<Tempo>,
    ) -> Option<TrackInterruption> {
        let interruption = self.decode_events(track, tempo);
        track.set_end_tick(self.tick);
        interruption
    }

    fn decode_events(
        &mut self,
        track: &mut Track,
        tempo: &mut Option<Tempo>,
    ) -> Option<TrackInterruption> {
        loop {
            let next = match self.state {
                DecoderState::AwaitEvent => self.read_delta(),
                DecoderState::InTrack { delta } => self.read_message(delta, track, tempo),
                DecoderState::EndOfTrack => return None,
            };
            match next {
                Ok(state) => self.state = state,
                Err(interruption) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "Track stopped at byte {}: {interruption}",
                        self.reader.buffer_position()
                    );
                    return Some(interruption);
                }
            }
        }
    }

    fn read_delta(&mut self) -> Result<DecoderState, TrackInterruption> {
        if self.reader.is_empty() {
            return Err(TrackInterruption::MissingEndOfTrack);
        }
        let delta = self.reader.read_varlen().map_err(truncated)?;
        self.tick += delta as u64;
        Ok(DecoderState::InTrack { delta })
    }

    fn read_message(
        &mut self,
        delta: u32,
        track: &mut Track,
        tempo: &mut Option<Tempo>,
    ) -> Result<DecoderState, TrackInterruption> {
        let peeked = self.reader.peek(1).map_err(truncated)?[0];
        let resolved = self.running.resolve(peeked)?;
        if resolved.consumes_byte {
            self.reader.discard(1).map_err(truncated)?;
        }
        self.running = resolved.next;

        match StatusKind::classify(resolved.status) {
            StatusKind::Voice { kind, .. } => {
                let mut data = [0; 2];
                for byte in data.iter_mut().take(kind.data_len()) {
                    *byte = self.reader.read_byte().map_err(truncated)?;
                }
                let delta = self.take_carried(delta);
                track.push_event(TrackEvent::from_voice(delta, kind, data));
            }
            StatusKind::SystemExclusive(_) => {
                let len = self.reader.read_varlen().map_err(truncated)?;
                self.reader.discard(len as usize).map_err(truncated)?;
                self.carry(delta);
            }
            StatusKind::Meta => {
                let meta_type = MetaType::from(self.reader.read_byte().map_err(truncated)?);
                let len = self.reader.read_varlen().map_err(truncated)?;
                let payload = self.reader.read_slice(len as usize).map_err(truncated)?;
                let target = MetaTarget {
                    track,
                    tempo,
                    tick: self.tick,
                };
                let outcome = meta::dispatch(meta_type, payload, target);
                self.carry(delta);
                if outcome == MetaOutcome::EndOfTrack {
                    return Ok(DecoderState::EndOfTrack);
                }
            }
            StatusKind::Unrecognized(status) => {
                return Err(DecodeError::UnrecognizedStatus(status).into());
            }
        }
        Ok(DecoderState::AwaitEvent)
    }

    fn carry(&mut self, delta: u32) {
        self.carried += delta as u64;
    }

    fn take_carried(&mut self, delta: u32) -> u64 {
        let delta = self.carried + delta as u64;
        self.carried = 0;
        delta
    }
}

#[cfg(test)]
fn decode(body: &[u8]) -> (Track, Option<Tempo>, Option<TrackInterruption>) {
    let mut reader = Reader::from_byte_slice(body);
    let mut track = Track::default();
    let mut tempo = None;
    let interruption = TrackDecoder::new(&mut reader).run(&mut track, &mut tempo);
    (track, tempo, interruption)
}

#[cfg(test)]
fn note_on(delta: u64, key: u8, velocity: u8) -> TrackEvent {
    TrackEvent::new(
        delta,
        EventKind::NoteOn {
            key: Pitch::new(key).unwrap(),
            velocity: Velocity::new(velocity).unwrap(),
        },
    )
}

#[cfg(test)]
fn note_off(delta: u64, key: u8, velocity: u8) -> TrackEvent {
    TrackEvent::new(
        delta,
        EventKind::NoteOff {
            key: Pitch::new(key).unwrap(),
            velocity: Velocity::new(velocity).unwrap(),
        },
    )
}

#[test]
fn running_status_reuses_note_on() {
    use pretty_assertions::assert_eq;

    let (track, _, interruption) = decode(&[
        0x00, 0x90, 60, 100, // note on
        0x00, 62, 90, // running status
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert_eq!(interruption, None);
    assert_eq!(track.events(), &[note_on(0, 60, 100), note_on(0, 62, 90)]);
}

#[test]
fn zero_velocity_note_on_decodes_as_note_off() {
    use pretty_assertions::assert_eq;

    let (track, _, _) = decode(&[
        0x00, 0x90, 60, 100, //
        0x83, 0x60, 60, 0, // running status, velocity 0
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert_eq!(track.events(), &[note_on(0, 60, 100), note_off(480, 60, 0)]);
}

#[test]
fn every_voice_message_consumes_its_data() {
    let (track, _, interruption) = decode(&[
        0x00, 0xA0, 60, 10, // poly aftertouch
        0x00, 0xB0, 64, 127, // control change
        0x00, 0xC0, 5, // program change
        0x00, 0xD0, 40, // channel pressure
        0x00, 0xE0, 0x00, 0x40, // pitch bend
        0x00, 0x80, 60, 64, // note off
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert_eq!(interruption, None);
    let kinds: alloc::vec::Vec<_> = track.events().iter().map(|e| *e.kind()).collect();
    assert_eq!(
        kinds,
        alloc::vec![
            EventKind::Other(VoiceKind::PolyAftertouch),
            EventKind::Other(VoiceKind::ControlChange),
            EventKind::Other(VoiceKind::ProgramChange),
            EventKind::Other(VoiceKind::ChannelPressure),
            EventKind::Other(VoiceKind::PitchBend),
            EventKind::NoteOff {
                key: Pitch::new(60).unwrap(),
                velocity: Velocity::new(64).unwrap()
            },
        ]
    );
}

#[test]
fn meta_and_sysex_deltas_carry_forward() {
    use pretty_assertions::assert_eq;

    let (track, tempo, _) = decode(&[
        0x10, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo at 16
        0x20, 0xF0, 0x03, 0x43, 0x12, 0xF7, // sysex at 48
        0x01, 0x90, 60, 100, // note on at 49
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert_eq!(tempo, Some(Tempo::new(500_000)));
    assert_eq!(track.events(), &[note_on(49, 60, 100)]);
}

#[test]
fn meta_clears_running_status() {
    let (track, _, interruption) = decode(&[
        0x00, 0x90, 60, 100, //
        0x00, 0xFF, 0x01, 0x01, b'x', // text
        0x00, 60, 0, // data byte with no running status
    ]);
    assert_eq!(track.events().len(), 1);
    assert_eq!(
        interruption,
        Some(TrackInterruption::Corrupt(DecodeError::MissingRunningStatus(60)))
    );
}

#[test]
fn unknown_meta_is_skipped_by_length() {
    let (track, _, interruption) = decode(&[
        0x00, 0xFF, 0x60, 0x03, 0x90, 0x3C, 0x64, // unknown meta holding note-like bytes
        0x00, 0xFF, 0x03, 0x04, b'L', b'e', b'f', b't', //
        0x00, 0x90, 60, 100, //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert_eq!(interruption, None);
    assert_eq!(track.name(), Some("Left"));
    assert_eq!(track.events(), &[note_on(0, 60, 100)]);
}

#[test]
fn unrecognized_status_stops_the_track() {
    let (track, _, interruption) = decode(&[
        0x00, 0x90, 60, 100, //
        0x00, 0xF4, 0x00, // undefined system common status
        0x00, 0x80, 60, 0,
    ]);
    assert_eq!(track.events(), &[note_on(0, 60, 100)]);
    assert_eq!(
        interruption,
        Some(TrackInterruption::Corrupt(DecodeError::UnrecognizedStatus(0xF4)))
    );
}

#[test]
fn end_of_stream_keeps_decoded_events() {
    let (track, _, interruption) = decode(&[0x00, 0x90, 60, 100, 0x60, 0x80, 60]);
    assert_eq!(track.events(), &[note_on(0, 60, 100)]);
    assert_eq!(interruption, Some(TrackInterruption::Truncated));

    let (track, _, interruption) = decode(&[0x00, 0x90, 60, 100]);
    assert_eq!(track.events().len(), 1);
    assert_eq!(interruption, Some(TrackInterruption::MissingEndOfTrack));
}

#[test]
fn truncated_meta_payload() {
    let (track, _, interruption) = decode(&[0x00, 0xFF, 0x03, 0x10, b'a', b'b']);
    assert_eq!(track.name(), None);
    assert_eq!(interruption, Some(TrackInterruption::Truncated));
}

#[test]
fn text_events_carry_absolute_ticks() {
    let (track, _, _) = decode(&[
        0x60, 0xFF, 0x06, 0x01, b'A', //
        0x60, 0xFF, 0x06, 0x01, b'B', //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert_eq!(track.texts()[0].tick, 96);
    assert_eq!(track.texts()[1].tick, 192);
}

#[test]
fn carried_deltas_beyond_u32_keep_absolute_time() {
    let mut body = alloc::vec![0x00, 0x90, 60, 100];
    for _ in 0..17 {
        // empty text meta at the largest delta a quantity can hold
        body.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0x7F, 0xFF, 0x01, 0x00]);
    }
    body.extend_from_slice(&[0x00, 0x80, 60, 0, 0x00, 0xFF, 0x2F, 0x00]);

    let (track, _, interruption) = decode(&body);
    let expected = 17 * crate::reader::MAX_VARLEN as u64;
    assert!(expected > u32::MAX as u64);
    assert_eq!(interruption, None);
    assert_eq!(track.events()[1].delta_ticks(), expected);
    assert_eq!(track.notes()[0].duration(), expected);
    assert_eq!(track.length_ticks(), expected);
}

#[test]
fn length_counts_trailing_meta_deltas() {
    let (track, _, _) = decode(&[
        0x00, 0x90, 60, 100, //
        0x10, 0x80, 60, 0, //
        0x20, 0xFF, 0x2F, 0x00,
    ]);
    assert_eq!(track.length_ticks(), 48);
}

#[test]
fn sysex_escape_is_skipped_by_length() {
    let (track, _, interruption) = decode(&[
        0x00, 0x90, 60, 100, //
        0x10, 0xF7, 0x02, 0xAA, 0xBB, // escape record
        0x10, 0x80, 60, 0, //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
    assert_eq!(interruption, None);
    assert_eq!(track.events(), &[note_on(0, 60, 100), note_off(32, 60, 0)]);
}

#[test]
fn sysex_longer_than_chunk_is_truncated() {
    let (track, _, interruption) = decode(&[
        0x00, 0x90, 60, 100, //
        0x00, 0xF0, 0x10, 0x43, 0x12,
    ]);
    assert_eq!(track.events(), &[note_on(0, 60, 100)]);
    assert_eq!(interruption, Some(TrackInterruption::Truncated));
}
