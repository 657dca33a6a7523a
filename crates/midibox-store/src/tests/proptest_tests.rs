use super::listener;
use crate::*;
use midibox_theory::MAX_NOTE;
use proptest::prelude::*;

const CHANNELS: [u8; 2] = [1, 2];

#[derive(Debug, Clone)]
enum Op {
    On(u8, u8),
    Off(u8),
    Pedal(bool, Vec<u8>),
    Reset,
    AllOff,
}

fn op() -> impl Strategy<Value = Op> {
    let note = 55u8..67;
    prop_oneof![
        4 => (note.clone(), 1u8..=127).prop_map(|(n, v)| Op::On(n, v)),
        3 => note.clone().prop_map(Op::Off),
        1 => (any::<bool>(), prop::collection::vec(note, 0..4)).prop_map(|(p, held)| Op::Pedal(p, held)),
        1 => Just(Op::Reset),
        1 => Just(Op::AllOff),
    ]
}

fn ops() -> impl Strategy<Value = Vec<(u8, Op)>> {
    prop::collection::vec((prop::sample::select(CHANNELS.to_vec()), op()), 1..64)
}

fn event(channel: u8, op: &Op) -> MidiEvent {
    match op {
        Op::On(note, velocity) => MidiEvent::note_on("A", channel, *note, *velocity),
        Op::Off(note) => MidiEvent::note_off("A", channel, *note, 0),
        Op::Pedal(pressed, held) => MidiEvent::pedal("A", channel, *pressed, held.iter().copied().collect()),
        Op::Reset => MidiEvent::reset(&ChannelId::new("A", channel)),
        Op::AllOff => MidiEvent::all_notes_off("A", channel),
    }
}

fn check_channel(listener: &MidiListener, id: &ChannelId) -> Result<(), TestCaseError> {
    let channel = listener.channel(id).unwrap();
    let notes_on = channel.notes_on();
    prop_assert!(notes_on.windows(2).all(|w| w[0] < w[1]), "{notes_on:?}");

    for note in 0..=MAX_NOTE {
        let entity = listener.note(&id.note(note)).unwrap();
        prop_assert_eq!(notes_on.contains(&note), entity.note_on(), "note {}", note);
    }

    let sum: u32 = channel.key_data().values().sum();
    prop_assert_eq!(7 * channel.total_note_count(), sum);

    let snapshot = listener.notes_on_snapshot(id);
    prop_assert_eq!(serde_json::to_string(notes_on).unwrap(), snapshot.to_string());
    let fresh = Selectors::new().key_prevalence(listener.store(), id);
    prop_assert_eq!(fresh, listener.key_prevalence(id));
    Ok(())
}

proptest! {
    #[test]
    fn test_invariants_hold_after_every_event(ops in ops()) {
        let mut listener = listener("A", CHANNELS);
        for (channel, op) in &ops {
            let id = ChannelId::new("A", *channel);
            let before = *listener.channel(&id).unwrap().key_data();
            // Warm the caches so a stale read would show up below.
            listener.key_prevalence(&id);
            listener.notes_on_snapshot(&id);

            prop_assert!(listener.dispatch(&event(*channel, op)).is_applied());

            let after = listener.channel(&id).unwrap().key_data();
            if !matches!(op, Op::Reset) {
                prop_assert!(before.iter().all(|(key, &count)| after[key] >= count));
            }
            for channel in CHANNELS {
                check_channel(&listener, &ChannelId::new("A", channel))?;
            }
        }
    }

    #[test]
    fn test_note_on_is_idempotent(note in 0u8..=127, velocities in prop::collection::vec(1u8..=127, 1..10)) {
        let mut listener = listener("A", [1]);
        let id = ChannelId::new("A", 1);
        for velocity in &velocities {
            listener.dispatch(&MidiEvent::note_on("A", 1, note, *velocity));
        }
        prop_assert_eq!(vec![note], listener.channel(&id).unwrap().notes_on().to_vec());
        prop_assert_eq!(velocities.len() as u32, listener.note(&id.note(note)).unwrap().count());
    }

    #[test]
    fn test_pedal_holds_every_note(notes in prop::collection::vec(0u8..=127, 1..16)) {
        let mut listener = listener("A", [1]);
        let id = ChannelId::new("A", 1);
        listener.dispatch(&MidiEvent::pedal("A", 1, true, NoteSet::new()));
        for note in &notes {
            listener.dispatch(&MidiEvent::note_on("A", 1, *note, 100));
        }
        let held = listener.channel(&id).unwrap().notes_on().to_vec();
        for note in &notes {
            listener.dispatch(&MidiEvent::note_off("A", 1, *note, 100));
        }
        prop_assert_eq!(held, listener.channel(&id).unwrap().notes_on().to_vec());

        listener.dispatch(&MidiEvent::pedal("A", 1, false, NoteSet::new()));
        prop_assert!(listener.channel(&id).unwrap().notes_on().is_empty());
    }

    #[test]
    fn test_reset_is_idempotent(ops in ops()) {
        let mut listener = listener("A", CHANNELS);
        for (channel, op) in &ops {
            listener.dispatch(&event(*channel, op));
        }
        let id = ChannelId::new("A", 1);
        listener.reset_key_data(&id);
        let once = listener.channel(&id).cloned();
        listener.reset_key_data(&id);
        prop_assert_eq!(once.clone(), listener.channel(&id).cloned());
        prop_assert_eq!(Some(0), once.map(|c| c.total_note_count()));
        prop_assert!(listener.key_prevalence(&id).values().all(|&v| v == 1.0));
    }
}
