//! The state machine applying canonical events to a [`MidiStore`].
//!
//! Events that reference an unregistered input or channel are dropped with a
//! debug log line and leave the store untouched. Every other event is
//! applied; there is no failure path.

use crate::event::{EventKind, MidiEvent, PedalChange};
use crate::ids::ChannelId;
use crate::store::MidiStore;
use derive_more::Display;

/// Why an event was not applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum DropReason {
    #[display("unknown input")]
    UnknownInput,
    #[display("unknown channel")]
    UnknownChannel,
}

/// Outcome of [`apply`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Applied,
    Dropped(DropReason),
}

impl Dispatch {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Applies `event` to `store`.
pub fn apply(store: &mut MidiStore, event: &MidiEvent) -> Dispatch {
    let channel_id = event.channel_id();

    // Reset only needs the channel.
    if event.kind != EventKind::Reset && !store.inputs.contains(&event.input_id) {
        return dropped(event, &channel_id, DropReason::UnknownInput);
    }
    if !store.channels.contains(&channel_id) {
        return dropped(event, &channel_id, DropReason::UnknownChannel);
    }

    log::trace!("Applying {} to {channel_id}", event.type_name());
    match event.kind {
        EventKind::NoteOn => note_on(store, &channel_id, event),
        EventKind::NoteOff => note_off(store, &channel_id, event),
        EventKind::Pedal(change) => pedal(store, &channel_id, event, change),
        EventKind::Reset => {
            store.channels.update(&channel_id, |c| c.reset_key_data());
        }
        EventKind::AllNotesOff => all_notes_off(store, &channel_id),
    }
    Dispatch::Applied
}

fn dropped(event: &MidiEvent, channel_id: &ChannelId, reason: DropReason) -> Dispatch {
    log::debug!("Dropping {} event for {channel_id}: {reason}", event.type_name());
    Dispatch::Dropped(reason)
}

fn note_on(store: &mut MidiStore, channel_id: &ChannelId, event: &MidiEvent) {
    let note = event.note();
    store.channels.update(channel_id, |c| c.record_note_on(note));
    store.notes.update(&channel_id.note(note), |n| n.strike(event));
}

fn note_off(store: &mut MidiStore, channel_id: &ChannelId, event: &MidiEvent) {
    let note = event.note();
    let held = store.inputs.get(&event.input_id).is_some_and(|i| i.pedal_on());
    if !held {
        store.channels.update(channel_id, |c| {
            c.release_note(note);
        });
    }
    // Release data is recorded even while the pedal holds the note.
    store.notes.update(&channel_id.note(note), |n| {
        if !held {
            n.set_on(false);
        }
        n.touch(event);
    });
}

fn pedal(store: &mut MidiStore, channel_id: &ChannelId, event: &MidiEvent, change: PedalChange) {
    let mut holding = false;
    store.inputs.update(&event.input_id, |i| holding = i.set_pedal(change.pressed));
    if holding {
        return;
    }

    // Pedal released: only keys still physically down keep sounding.
    let Some(channel) = store.channels.get_mut(channel_id) else {
        return;
    };
    let sounding = channel.notes_on().to_vec();
    channel.retain_notes(|&n| change.physical.contains(n));
    for note in sounding {
        store
            .notes
            .update(&channel_id.note(note), |n| n.set_on(change.physical.contains(note)));
    }
}

fn all_notes_off(store: &mut MidiStore, channel_id: &ChannelId) {
    let Some(channel) = store.channels.get_mut(channel_id) else {
        return;
    };
    for note in channel.take_notes() {
        store.notes.update(&channel_id.note(note), |n| n.set_on(false));
    }
}
