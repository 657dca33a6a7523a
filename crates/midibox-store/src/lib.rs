//! # MIDI listener state
//!
//! Normalized stores of inputs, channels and notes, the reducer that applies
//! canonical [`MidiEvent`]s to them, and memoized per-channel queries (key
//! prevalence, chord estimate, sounding notes).
//!
//! [`MidiListener`] bundles a [`MidiStore`] with its [`Selectors`] and is the
//! usual entry point:
//!
//! ```
//! use midibox_store::{ChannelId, MidiEvent, MidiListener, Registration, SourceKind};
//!
//! let mut listener = MidiListener::new();
//! listener.register(Registration::source("kb", "Keyboard", SourceKind::Hardware, 1..=16));
//! for note in [60, 64, 67] {
//!     listener.dispatch(&MidiEvent::note_on("kb", 1, note, 100));
//! }
//! let channel = ChannelId::new("kb", 1);
//! assert_eq!(&["CM".to_string()][..], &*listener.chord_estimate(&channel));
//! ```

pub mod collection;
pub mod entities;
pub mod event;
pub mod ids;
pub mod note_set;
pub mod query;
pub mod reducer;
pub mod store;

#[cfg(test)]
mod tests;

pub use collection::{Entity, EntityCollection, Version};
pub use entities::{Channel, ConnectionState, Input, Note, SourceKind};
pub use event::{EventKind, MidiEvent, PedalChange};
pub use ids::{ChannelId, IdParseError, InputId, NoteKey};
pub use note_set::NoteSet;
pub use query::Selectors;
pub use reducer::{apply, Dispatch, DropReason};
pub use store::{MidiStore, Registration};

use midibox_theory::{KeySignature, PitchClassMap};
use std::sync::Arc;

/// A [`MidiStore`] together with its memoized queries.
#[derive(Debug, Default)]
pub struct MidiListener {
    store: MidiStore,
    selectors: Selectors,
}

impl MidiListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &MidiStore {
        &self.store
    }

    /// Adds inputs, channels and notes.
    pub fn register(&mut self, registration: Registration) {
        self.store.register(registration);
    }

    /// Removes inputs with their channels and notes, and drops cached query results.
    pub fn unregister<'a>(&mut self, ids: impl IntoIterator<Item = &'a InputId>) -> usize {
        let removed = self.store.unregister(ids);
        if removed > 0 {
            self.selectors.clear();
        }
        removed
    }

    pub fn update_input(&mut self, id: &InputId, f: impl FnOnce(&mut Input)) -> bool {
        self.store.update_input(id, f)
    }

    pub fn update_channel(&mut self, id: &ChannelId, f: impl FnOnce(&mut Channel)) -> bool {
        self.store.update_channel(id, f)
    }

    /// Applies one canonical event.
    pub fn dispatch(&mut self, event: &MidiEvent) -> Dispatch {
        apply(&mut self.store, event)
    }

    /// Applies events in order. Returns how many were applied.
    pub fn dispatch_all<'a>(&mut self, events: impl IntoIterator<Item = &'a MidiEvent>) -> usize {
        events
            .into_iter()
            .filter(|event| self.dispatch(event).is_applied())
            .count()
    }

    /// Clears the key statistics of a channel.
    pub fn reset_key_data(&mut self, channel: &ChannelId) -> Dispatch {
        self.dispatch(&MidiEvent::reset(channel))
    }

    pub fn input(&self, id: &InputId) -> Option<&Input> {
        self.store.input(id)
    }

    pub fn channel(&self, id: &ChannelId) -> Option<&Channel> {
        self.store.channel(id)
    }

    pub fn note(&self, key: &NoteKey) -> Option<&Note> {
        self.store.note(key)
    }

    /// See [`Selectors::key_prevalence`].
    pub fn key_prevalence(&self, channel: &ChannelId) -> PitchClassMap<f32> {
        self.selectors.key_prevalence(&self.store, channel)
    }

    /// See [`Selectors::chord_estimate`].
    pub fn chord_estimate(&self, channel: &ChannelId) -> Arc<[String]> {
        self.selectors.chord_estimate(&self.store, channel)
    }

    /// See [`Selectors::notes_on_snapshot`].
    pub fn notes_on_snapshot(&self, channel: &ChannelId) -> Arc<str> {
        self.selectors.notes_on_snapshot(&self.store, channel)
    }

    pub fn is_note_on(&self, channel: &ChannelId, note: u8) -> bool {
        Selectors::is_note_on(&self.store, channel, note)
    }

    pub fn channel_key(&self, channel: &ChannelId) -> KeySignature {
        Selectors::channel_key(&self.store, channel)
    }
}
