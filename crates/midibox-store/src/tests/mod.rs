mod proptest_tests;

use crate::*;

pub(crate) fn listener(input: &str, channels: impl IntoIterator<Item = u8>) -> MidiListener {
    let mut listener = MidiListener::new();
    listener.register(Registration::source(input, input, SourceKind::Hardware, channels));
    listener
}

#[test]
fn test_two_notes_make_a_major_third() {
    let mut listener = listener("A", [1]);
    let channel = ChannelId::new("A", 1);
    let events = [MidiEvent::note_on("A", 1, 60, 100), MidiEvent::note_on("A", 1, 64, 100)];
    assert_eq!(2, listener.dispatch_all(&events));

    let state = listener.channel(&channel).unwrap();
    assert_eq!(&[60, 64], state.notes_on());
    assert_eq!(2, state.total_note_count());
    let chords = listener.chord_estimate(&channel);
    assert!(chords.iter().any(|c| c == "CM3"), "{chords:?}");
}

#[test]
fn test_double_note_on() {
    let mut listener = listener("A", [1]);
    let channel = ChannelId::new("A", 1);
    let on = MidiEvent::note_on("A", 1, 60, 100);
    listener.dispatch_all([&on, &on]);

    assert_eq!(&[60], listener.channel(&channel).unwrap().notes_on());
    assert_eq!(2, listener.note(&channel.note(60)).unwrap().count());
}

#[test]
fn test_pedal_scenario() {
    let mut listener = listener("A", [1]);
    let channel = ChannelId::new("A", 1);
    listener.dispatch_all(&[
        MidiEvent::pedal("A", 1, true, NoteSet::new()),
        MidiEvent::note_on("A", 1, 60, 100),
        MidiEvent::note_off("A", 1, 60, 64),
    ]);
    assert!(listener.is_note_on(&channel, 60));
    assert!(listener.note(&channel.note(60)).unwrap().note_on());

    listener.dispatch(&MidiEvent::pedal("A", 1, false, NoteSet::new()));
    assert!(!listener.is_note_on(&channel, 60));
    assert!(!listener.note(&channel.note(60)).unwrap().note_on());
}

#[test]
fn test_channels_and_inputs_are_independent() {
    let mut listener = listener("A", 1..=2);
    listener.register(Registration::source("B", "B", SourceKind::Hardware, [1]));
    listener.dispatch_all(&[
        MidiEvent::note_on("A", 1, 60, 100),
        MidiEvent::note_on("A", 2, 62, 100),
        MidiEvent::note_on("B", 1, 64, 100),
        MidiEvent::pedal("B", 1, true, NoteSet::new()),
        MidiEvent::note_off("A", 1, 60, 0),
    ]);
    assert_eq!("[]", &*listener.notes_on_snapshot(&ChannelId::new("A", 1)));
    assert_eq!("[62]", &*listener.notes_on_snapshot(&ChannelId::new("A", 2)));
    assert_eq!("[64]", &*listener.notes_on_snapshot(&ChannelId::new("B", 1)));
}

#[test]
fn test_reset_key_data_twice() {
    let mut listener = listener("A", [1]);
    let channel = ChannelId::new("A", 1);
    listener.dispatch_all(&[MidiEvent::note_on("A", 1, 60, 100), MidiEvent::note_on("A", 1, 66, 100)]);

    assert!(listener.reset_key_data(&channel).is_applied());
    let once = listener.channel(&channel).cloned();
    assert!(listener.reset_key_data(&channel).is_applied());
    assert_eq!(once, listener.channel(&channel).cloned());
    assert!(listener.key_prevalence(&channel).values().all(|&v| v == 1.0));
}

#[test]
fn test_unregister_drops_later_events() {
    let mut listener = listener("A", [1]);
    let channel = ChannelId::new("A", 1);
    listener.dispatch(&MidiEvent::note_on("A", 1, 60, 100));
    assert_eq!("[60]", &*listener.notes_on_snapshot(&channel));

    assert_eq!(1, listener.unregister([&InputId::new("A")]));
    assert_eq!("[]", &*listener.notes_on_snapshot(&channel));
    assert_eq!(
        Dispatch::Dropped(DropReason::UnknownInput),
        listener.dispatch(&MidiEvent::note_on("A", 1, 62, 100))
    );
    assert!(listener.store().notes().is_empty());
}
