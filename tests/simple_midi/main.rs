use midisheet::prelude::*;

const SIMPLE: &[u8] = include_bytes!("./simple.mid");

#[test]
fn test_parse() {
    let parsed = MidiFile::parse(SIMPLE).into_result().unwrap();

    assert_eq!(parsed.tracks().len(), 1);
    assert_eq!(parsed.header().unwrap().format_type(), Some(FormatType::SingleMultiChannel));
    assert_eq!(parsed.time_division(), Some(96));
    assert_eq!(parsed.tempo(), Some(Tempo::new(500_000)));
    assert_eq!(parsed.bpm(), Some(120));

    let track = &parsed.tracks()[0];
    assert_eq!(track.interruption(), None);
    assert_eq!(track.name(), None);
    assert_eq!(track.events().len(), 11);

    let mut events = track.events().iter().skip(3);
    note_on(events.next().unwrap(), 0, "C3", 96);
    note_on(events.next().unwrap(), 0, "C4", 96);
    note_on(events.next().unwrap(), 96, "G4", 64);
    note_on(events.next().unwrap(), 96, "E5", 32);
    note_off(events.next().unwrap(), 192, "C3");
    note_off(events.next().unwrap(), 0, "C4");
    note_off(events.next().unwrap(), 0, "G4");
    note_off(events.next().unwrap(), 0, "E5");
    assert!(events.next().is_none());
}

#[test]
fn test_notes() {
    let parsed = MidiFile::parse(SIMPLE);
    let track = &parsed.tracks()[0];

    let notes: Vec<(u8, u64, u64)> = track
        .notes()
        .iter()
        .map(|n| (n.key().byte(), n.start(), n.duration()))
        .collect();
    assert_eq!(
        notes,
        vec![(48, 0, 384), (60, 0, 384), (67, 96, 288), (76, 192, 192)]
    );
    assert_eq!(track.min_key().byte(), 48);
    assert_eq!(track.max_key().byte(), 76);
    assert_eq!(track.length_ticks(), 384);
}

#[test]
fn test_timed_notes() {
    let parsed = MidiFile::parse(SIMPLE);
    let timed: Vec<_> = parsed.timed_notes(0).unwrap().collect();

    assert_eq!(timed.len(), 4);
    assert_eq!(timed[0].start, UMicros::ZERO);
    assert_eq!(timed[0].duration, UMicros::from_ms(2_000));
    assert_eq!(timed[3].start, UMicros::from_ms(1_000));
    assert_eq!(timed[3].end(), UMicros::from_ms(2_000));

    assert!(parsed.timed_notes(1).is_none());
}

#[cfg(feature = "std")]
#[test]
fn test_from_read() {
    let from_read = MidiFile::from_read(std::io::Cursor::new(SIMPLE)).unwrap();
    assert_eq!(from_read, MidiFile::parse(SIMPLE));
}

fn note_on(e: &TrackEvent, delta_ticks: u64, name: &str, velocity: u8) {
    assert_eq!(e.delta_ticks(), delta_ticks);
    let EventKind::NoteOn { key, velocity: v } = e.kind() else {
        panic!("expected a note on, found {e:?}");
    };
    assert_eq!(key.name(), name);
    assert_eq!(v.byte(), velocity);
}

fn note_off(e: &TrackEvent, delta_ticks: u64, name: &str) {
    assert_eq!(e.delta_ticks(), delta_ticks);
    let EventKind::NoteOff { key, .. } = e.kind() else {
        panic!("expected a note off, found {e:?}");
    };
    assert_eq!(key.name(), name);
}
