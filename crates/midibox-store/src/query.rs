//! Derived per-channel queries with memoization.
//!
//! Cached values are keyed by channel id and tagged with the version of the
//! channel collection they were computed from, so a read after any channel
//! mutation recomputes instead of returning stale data. Versions are unique
//! across stores, so one [`Selectors`] may serve several stores.

use crate::collection::Version;
use crate::entities::Note;
use crate::ids::ChannelId;
use crate::store::MidiStore;
use midibox_theory::{detect, Accidental, KeySignature, PitchClassMap};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

struct Memo<V> {
    entries: RefCell<HashMap<ChannelId, (Version, V)>>,
}

impl<V> Default for Memo<V> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }
}

impl<V: Clone> Memo<V> {
    fn get_or_compute(&self, id: &ChannelId, version: Version, compute: impl FnOnce() -> V) -> V {
        if let Some((cached, value)) = self.entries.borrow().get(id) {
            if *cached == version {
                return value.clone();
            }
        }
        let value = compute();
        self.entries
            .borrow_mut()
            .insert(id.clone(), (version, value.clone()));
        value
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    fn clear(&mut self) {
        self.entries.get_mut().clear();
    }
}

/// Memoized read-only views over a [`MidiStore`].
#[derive(Default)]
pub struct Selectors {
    key_prevalence: Memo<PitchClassMap<f32>>,
    chords: Memo<Arc<[String]>>,
    notes_on: Memo<Arc<str>>,
}

impl std::fmt::Debug for Selectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selectors")
            .field("key_prevalence", &self.key_prevalence.len())
            .field("chords", &self.chords.len())
            .field("notes_on", &self.notes_on.len())
            .finish()
    }
}

impl Selectors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of the channel's note-ons that were diatonic in each major key.
    ///
    /// Every key reads 1 for a channel with no note-ons yet, and for unknown channels.
    pub fn key_prevalence(&self, store: &MidiStore, id: &ChannelId) -> PitchClassMap<f32> {
        self.key_prevalence
            .get_or_compute(id, store.channels().version(), || {
                match store.channel(id) {
                    Some(channel) if channel.total_note_count() > 0 => {
                        let total = channel.total_note_count() as f32;
                        channel.key_data().map(|_, count| count as f32 / total)
                    }
                    _ => PitchClassMap::new(|_| 1.0),
                }
            })
    }

    /// Chord names formed by the channel's sounding notes, spelled for its selected key.
    pub fn chord_estimate(&self, store: &MidiStore, id: &ChannelId) -> Arc<[String]> {
        self.chords.get_or_compute(id, store.channels().version(), || {
            let Some(channel) = store.channel(id) else {
                return Arc::from([]);
            };
            let accidental = Accidental::from_sharps(channel.selected_key_uses_sharps());
            detect(channel.notes_on(), accidental)
                .iter()
                .map(ToString::to_string)
                .collect()
        })
    }

    /// JSON text of the channel's sounding notes, e.g. `[60,64,67]`.
    pub fn notes_on_snapshot(&self, store: &MidiStore, id: &ChannelId) -> Arc<str> {
        self.notes_on.get_or_compute(id, store.channels().version(), || {
            let notes = store.channel(id).map_or(&[][..], |c| c.notes_on());
            serde_json::to_string(notes)
                .unwrap_or_else(|_| String::from("[]"))
                .into()
        })
    }

    /// Whether `note` is sounding on the channel. False for unknown channels.
    pub fn is_note_on(store: &MidiStore, id: &ChannelId, note: u8) -> bool {
        store.note(&id.note(note)).is_some_and(Note::note_on)
    }

    /// Key selected for the channel, C when the channel is unknown.
    pub fn channel_key(store: &MidiStore, id: &ChannelId) -> KeySignature {
        store
            .channel(id)
            .map(|c| c.selected_key)
            .unwrap_or_default()
    }

    /// Drops every cached value.
    pub fn clear(&mut self) {
        self.key_prevalence.clear();
        self.chords.clear();
        self.notes_on.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::SourceKind;
    use crate::event::MidiEvent;
    use crate::reducer::apply;
    use crate::store::Registration;
    use midibox_theory::PitchClass;

    fn store() -> MidiStore {
        let mut store = MidiStore::new();
        store.register(Registration::source("kb", "Keyboard", SourceKind::Hardware, 1..=2));
        store
    }

    #[test]
    fn test_empty_prevalence_is_uniform() {
        let store = store();
        let selectors = Selectors::new();
        let prevalence = selectors.key_prevalence(&store, &ChannelId::new("kb", 1));
        assert!(prevalence.values().all(|&p| p == 1.0));
        let unknown = selectors.key_prevalence(&store, &ChannelId::new("kb", 9));
        assert!(unknown.values().all(|&p| p == 1.0));
    }

    #[test]
    fn test_prevalence_after_notes() {
        let mut store = store();
        let selectors = Selectors::new();
        let id = ChannelId::new("kb", 1);
        for note in [60, 62, 64] {
            apply(&mut store, &MidiEvent::note_on("kb", 1, note, 100));
        }
        let prevalence = selectors.key_prevalence(&store, &id);
        assert_eq!(1.0, prevalence[PitchClass::C]);
        assert_eq!(1.0, prevalence[PitchClass::G]);
        assert_eq!(prevalence[PitchClass::C], prevalence.values().copied().fold(0.0, f32::max));
        assert!((prevalence[PitchClass::E] - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_memo_is_invalidated_by_mutation() {
        let mut store = store();
        let selectors = Selectors::new();
        let id = ChannelId::new("kb", 1);

        let first = selectors.chord_estimate(&store, &id);
        assert!(first.is_empty());
        let again = selectors.chord_estimate(&store, &id);
        assert!(Arc::ptr_eq(&first, &again));

        apply(&mut store, &MidiEvent::note_on("kb", 1, 60, 100));
        apply(&mut store, &MidiEvent::note_on("kb", 1, 64, 100));
        assert_eq!(&["CM3".to_string()][..], &*selectors.chord_estimate(&store, &id));

        apply(&mut store, &MidiEvent::note_on("kb", 1, 67, 100));
        assert_eq!(&["CM".to_string()][..], &*selectors.chord_estimate(&store, &id));
    }

    #[test]
    fn test_chords_follow_selected_key() {
        let mut store = store();
        let selectors = Selectors::new();
        let id = ChannelId::new("kb", 1);
        for note in [58, 62, 65] {
            apply(&mut store, &MidiEvent::note_on("kb", 1, note, 100));
        }
        assert_eq!("A#M", selectors.chord_estimate(&store, &id).join(","));
        store.update_channel(&id, |c| c.selected_key = KeySignature::F);
        assert_eq!("BbM", selectors.chord_estimate(&store, &id).join(","));
    }

    #[test]
    fn test_notes_on_snapshot() {
        let mut store = store();
        let selectors = Selectors::new();
        let id = ChannelId::new("kb", 2);
        assert_eq!("[]", &*selectors.notes_on_snapshot(&store, &ChannelId::new("x", 1)));
        for note in [67, 60, 64] {
            apply(&mut store, &MidiEvent::note_on("kb", 2, note, 100));
        }
        insta::assert_snapshot!(selectors.notes_on_snapshot(&store, &id), @"[60,64,67]");
        assert!(Selectors::is_note_on(&store, &id, 64));
        assert!(!Selectors::is_note_on(&store, &id, 65));
        assert!(!Selectors::is_note_on(&store, &ChannelId::new("x", 1), 64));
    }

    #[test]
    fn test_shared_selectors_across_cloned_stores() {
        let mut a = store();
        let mut b = a.clone();
        let selectors = Selectors::new();
        let id = ChannelId::new("kb", 1);

        apply(&mut a, &MidiEvent::note_on("kb", 1, 60, 100));
        apply(&mut b, &MidiEvent::note_on("kb", 1, 64, 100));
        assert_eq!("[60]", &*selectors.notes_on_snapshot(&a, &id));
        assert_eq!("[64]", &*selectors.notes_on_snapshot(&b, &id));
        assert_eq!("[60]", &*selectors.notes_on_snapshot(&a, &id));

        assert!(Selectors::is_note_on(&b, &id, 64));
        assert!(!Selectors::is_note_on(&b, &id, 60));
    }

    #[test]
    fn test_channel_key_default() {
        let mut store = store();
        let id = ChannelId::new("kb", 1);
        assert_eq!(KeySignature::C, Selectors::channel_key(&store, &ChannelId::new("x", 1)));
        store.update_channel(&id, |c| c.selected_key = KeySignature::EFlat);
        assert_eq!(KeySignature::EFlat, Selectors::channel_key(&store, &id));
    }
}
