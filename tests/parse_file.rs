use midisheet::prelude::*;
use pretty_assertions::assert_eq;

/// Helper function to create a MIDI file from track bodies.
/// Each body gets a chunk header declaring its real length.
fn create_midi(division: u16, tracks: &[&[u8]]) -> Vec<u8> {
    let mut bytes = Vec::new();

    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&1u16.to_be_bytes()); // Format 1
    bytes.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());

    for body in tracks {
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(body);
    }
    bytes
}

const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

fn track(events: &[&[u8]]) -> Vec<u8> {
    let mut body: Vec<u8> = events.concat();
    body.extend_from_slice(&END_OF_TRACK);
    body
}

fn keys(track: &Track) -> Vec<(u8, u64, u64)> {
    track
        .notes()
        .iter()
        .map(|n| (n.key().byte(), n.start(), n.duration()))
        .collect()
}

#[test]
fn single_note_end_to_end() {
    let body = track(&[&[0x00, 0x90, 0x3C, 0x64], &[0x83, 0x60, 0x80, 0x3C, 0x00]]);
    let file = MidiFile::parse(create_midi(480, &[&body]));

    assert!(file.status().is_success());
    assert_eq!(file.time_division(), Some(480));
    assert_eq!(file.tempo(), None);

    let track = &file.tracks()[0];
    assert_eq!(keys(track), vec![(60, 0, 480)]);
    assert_eq!(track.notes()[0].velocity().byte(), 100);
    assert_eq!(track.min_key().byte(), 60);
    assert_eq!(track.max_key(), NEUTRAL_PITCH);
}

#[test]
fn names_and_instrument() {
    let body = track(&[
        &[0x00, 0xFF, 0x03, 0x05, b'P', b'i', b'a', b'n', b'o'],
        &[0x00, 0xFF, 0x04, 0x03, b'K', b'e', b'y'],
        &[0x00, 0xFF, 0x03, 0x02, b'R', b'H'],
    ]);
    let file = MidiFile::parse(create_midi(96, &[&body]));
    let track = &file.tracks()[0];
    assert_eq!(track.name(), Some("RH"));
    assert_eq!(track.instrument(), Some("Key"));
    assert!(track.events().is_empty());
}

#[test]
fn first_tempo_wins_across_tracks() {
    let conductor = track(&[&[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]]);
    let second = track(&[
        &[0x00, 0xFF, 0x51, 0x03, 0x0F, 0x42, 0x40],
        &[0x00, 0x90, 0x40, 0x50],
        &[0x60, 0x40, 0x00],
    ]);
    let file = MidiFile::parse(create_midi(96, &[&conductor, &second]));

    assert_eq!(file.tracks().len(), 2);
    assert_eq!(file.tempo(), Some(Tempo::new(500_000)));
    assert_eq!(file.bpm(), Some(120));
    assert_eq!(keys(&file.tracks()[1]), vec![(64, 0, 96)]);

    let timed: Vec<_> = file.timed_notes(1).unwrap().collect();
    assert_eq!(timed[0].duration, UMicros::new(500_000));
}

#[test]
fn corrupt_track_does_not_stop_the_next() {
    let corrupt: [u8; 8] = [0x00, 0x90, 0x3C, 0x64, 0x00, 0xF4, 0x00, 0x00];
    let healthy = track(&[&[0x00, 0x90, 0x48, 0x64], &[0x10, 0x80, 0x48, 0x00]]);
    let file = MidiFile::parse(create_midi(96, &[&corrupt, &healthy]));

    assert!(file.status().is_success());
    assert_eq!(
        file.tracks()[0].interruption(),
        Some(TrackInterruption::Corrupt(DecodeError::UnrecognizedStatus(0xF4)))
    );
    assert_eq!(file.tracks()[0].events().len(), 1);
    assert!(file.tracks()[0].notes().is_empty());

    assert_eq!(file.tracks()[1].interruption(), None);
    assert_eq!(keys(&file.tracks()[1]), vec![(72, 0, 16)]);
}

#[test]
fn track_without_end_of_track() {
    let body: [u8; 8] = [0x00, 0x90, 0x3C, 0x64, 0x10, 0x80, 0x3C, 0x00];
    let file = MidiFile::parse(create_midi(96, &[&body]));

    assert!(file.status().is_success());
    let track = &file.tracks()[0];
    assert_eq!(track.interruption(), Some(TrackInterruption::MissingEndOfTrack));
    assert_eq!(keys(track), vec![(60, 0, 16)]);
}

#[test]
fn stream_ends_inside_track() {
    let body = track(&[&[0x00, 0x90, 0x3C, 0x64], &[0x10, 0x80, 0x3C, 0x00]]);
    let mut bytes = create_midi(96, &[&body]);
    bytes.truncate(bytes.len() - 6);
    let file = MidiFile::parse(bytes);

    assert!(file.status().is_success());
    let track = &file.tracks()[0];
    assert_eq!(track.interruption(), Some(TrackInterruption::Truncated));
    assert_eq!(track.events().len(), 1);
    assert!(track.notes().is_empty());
}

#[test]
fn missing_tracks() {
    let body = track(&[&[0x00, 0x90, 0x3C, 0x64], &[0x10, 0x80, 0x3C, 0x00]]);
    let mut bytes = create_midi(96, &[&body]);
    // Declare three tracks
    bytes[11] = 3;
    let file = MidiFile::parse(bytes);

    assert_eq!(
        file.status(),
        &ParseStatus::Failed(FormatError::MissingTracks {
            declared: 3,
            found: 1
        })
    );
    assert_eq!(file.tracks().len(), 1);
    assert_eq!(keys(&file.tracks()[0]), vec![(60, 0, 16)]);
}

#[test]
fn foreign_chunk_stops_the_parse() {
    let body = track(&[]);
    let mut bytes = create_midi(96, &[&body, &body]);
    let second = 14 + 8 + body.len();
    bytes[second..second + 4].copy_from_slice(b"XFIH");
    let file = MidiFile::parse(bytes);

    assert_eq!(
        file.status().error(),
        Some(&FormatError::InvalidChunkId {
            index: 1,
            found: *b"XFIH"
        })
    );
    assert_eq!(file.tracks().len(), 1);
}

#[test]
fn malformed_header() {
    let mut bytes = create_midi(96, &[&track(&[])]);
    bytes[3] = b'x';
    let file = MidiFile::parse(bytes.as_slice());
    assert_eq!(
        file.status().error(),
        Some(&FormatError::InvalidMagic(*b"MThx"))
    );
    assert!(file.tracks().is_empty());
    assert_eq!(file.header(), None);

    let mut bytes = create_midi(96, &[&track(&[])]);
    bytes[7] = 8;
    let err = MidiFile::parse(bytes).into_result().unwrap_err();
    assert_eq!(err, FormatError::InvalidHeaderLength(8));

    let bytes = create_midi(96, &[]);
    let err = MidiFile::parse(&bytes[..10]).into_result().unwrap_err();
    assert_eq!(err, FormatError::TruncatedHeader(10));
}

#[test]
fn trailing_bytes_are_ignored() {
    let mut bytes = create_midi(96, &[&track(&[&[0x00, 0x90, 0x3C, 0x64], &[0x10, 0x3C, 0x00]])]);
    bytes.extend_from_slice(b"garbage");
    let file = MidiFile::parse(bytes);
    assert!(file.status().is_success());
    assert_eq!(keys(&file.tracks()[0]), vec![(60, 0, 16)]);
}

#[test]
fn text_events_are_collected() {
    let body = track(&[
        &[0x00, 0xFF, 0x02, 0x04, b'(', b'c', b')', b'1'],
        &[0x60, 0xFF, 0x05, 0x02, b'l', b'a'],
        &[0x60, 0xFF, 0x06, 0x05, b'V', b'e', b'r', b's', b'e'],
    ]);
    let file = MidiFile::parse(create_midi(96, &[&body]));
    let texts = file.tracks()[0].texts();

    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0].kind, TextKind::Copyright);
    assert_eq!(texts[1].kind, TextKind::Lyric);
    assert_eq!(texts[1].tick, 96);
    assert_eq!(texts[2].text, "Verse");
    assert_eq!(texts[2].tick, 192);
}
