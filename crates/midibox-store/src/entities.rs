//! The three entity types held by [`MidiStore`](crate::MidiStore).
//!
//! Fields the reducer maintains (held notes, counters, pedal state) are
//! private and only exposed through getters, so edits made through
//! [`EntityCollection::update`](crate::EntityCollection::update) cannot break
//! the reducer's invariants.

use crate::collection::Entity;
use crate::event::MidiEvent;
use crate::ids::{ChannelId, InputId, NoteKey};
use midibox_theory::{
    keys_containing, note_name, octave, Accidental, KeySignature, PitchClass, PitchClassMap,
};

/// Where the events of an input come from.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceKind {
    /// A live device.
    #[default]
    Hardware,
    /// A MIDI file being played back.
    File,
}

/// Connection state reported by the host.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionState {
    #[default]
    Connected,
    Disconnected,
}

/// A MIDI source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Input {
    id: InputId,
    /// Display name.
    pub name: String,
    pub kind: SourceKind,
    pub state: ConnectionState,
    /// Inverts the meaning of the sustain pedal, for pedals wired with opposite polarity.
    pub reverse_pedal: bool,
    pedal_on: bool,
}

impl Entity for Input {
    type Id = InputId;

    fn id(&self) -> &InputId {
        &self.id
    }
}

impl Input {
    /// Creates a connected input with the pedal up.
    pub fn new(id: impl Into<InputId>, name: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            state: ConnectionState::Connected,
            reverse_pedal: false,
            pedal_on: false,
        }
    }

    pub fn with_reverse_pedal(mut self, reverse_pedal: bool) -> Self {
        self.reverse_pedal = reverse_pedal;
        self
    }

    pub fn id(&self) -> &InputId {
        &self.id
    }

    /// Whether the sustain pedal is currently holding notes.
    pub fn pedal_on(&self) -> bool {
        self.pedal_on
    }

    /// Records a pedal change, applying `reverse_pedal`. Returns the new hold state.
    pub(crate) fn set_pedal(&mut self, pressed: bool) -> bool {
        self.pedal_on = pressed != self.reverse_pedal;
        self.pedal_on
    }
}

/// One channel of an input, tracking which notes sound and how often each key's notes were played.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel {
    id: ChannelId,
    notes_on: Vec<u8>,
    key_data: PitchClassMap<u32>,
    total_note_count: u32,
    /// Key chosen by the user, used for spelling.
    pub selected_key: KeySignature,
}

impl Entity for Channel {
    type Id = ChannelId;

    fn id(&self) -> &ChannelId {
        &self.id
    }
}

impl Channel {
    /// Creates a silent channel with zeroed counters, in C.
    pub fn new(id: ChannelId) -> Self {
        Self {
            id,
            notes_on: Vec::new(),
            key_data: PitchClassMap::default(),
            total_note_count: 0,
            selected_key: KeySignature::default(),
        }
    }

    pub fn id(&self) -> &ChannelId {
        &self.id
    }

    pub fn input_id(&self) -> &InputId {
        &self.id.input
    }

    pub fn number(&self) -> u8 {
        self.id.channel
    }

    /// Sounding note numbers, ascending and without duplicates.
    pub fn notes_on(&self) -> &[u8] {
        &self.notes_on
    }

    /// Per-key counts: each note-on adds one to all seven major keys containing its class.
    pub fn key_data(&self) -> &PitchClassMap<u32> {
        &self.key_data
    }

    /// Note-ons since registration or the last reset.
    pub fn total_note_count(&self) -> u32 {
        self.total_note_count
    }

    pub fn selected_key_uses_sharps(&self) -> bool {
        self.selected_key.uses_sharps()
    }

    pub(crate) fn record_note_on(&mut self, note: u8) {
        if let Err(pos) = self.notes_on.binary_search(&note) {
            self.notes_on.insert(pos, note);
        }
        self.total_note_count = self.total_note_count.saturating_add(1);
        for key in keys_containing(PitchClass::of(note)) {
            self.key_data[key] = self.key_data[key].saturating_add(1);
        }
    }

    pub(crate) fn release_note(&mut self, note: u8) -> bool {
        match self.notes_on.binary_search(&note) {
            Ok(pos) => {
                self.notes_on.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub(crate) fn retain_notes(&mut self, keep: impl FnMut(&u8) -> bool) {
        self.notes_on.retain(keep);
    }

    pub(crate) fn take_notes(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.notes_on)
    }

    pub(crate) fn reset_key_data(&mut self) {
        self.key_data = PitchClassMap::default();
        self.total_note_count = 0;
    }
}

/// A single note number of a channel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    key: NoteKey,
    note_on: bool,
    count: u32,
    velocity: u8,
    attack: f32,
    release: f32,
    timestamp: f64,
}

impl Entity for Note {
    type Id = NoteKey;

    fn id(&self) -> &NoteKey {
        &self.key
    }
}

impl Note {
    pub fn new(key: NoteKey) -> Self {
        Self {
            key,
            note_on: false,
            count: 0,
            velocity: 0,
            attack: 0.0,
            release: 0.0,
            timestamp: 0.0,
        }
    }

    pub fn key(&self) -> &NoteKey {
        &self.key
    }

    /// MIDI note number.
    pub fn number(&self) -> u8 {
        self.key.note
    }

    pub fn note_on(&self) -> bool {
        self.note_on
    }

    /// Times this note was struck.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Velocity of the last event that touched this note.
    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn attack(&self) -> f32 {
        self.attack
    }

    pub fn release(&self) -> f32 {
        self.release
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn pitch_class(&self) -> PitchClass {
        PitchClass::of(self.number())
    }

    pub fn octave(&self) -> i8 {
        octave(self.number())
    }

    /// Scientific pitch name, e.g. `"Db4"`.
    pub fn name(&self, accidental: Accidental) -> String {
        note_name(self.number(), accidental)
    }

    pub(crate) fn strike(&mut self, event: &MidiEvent) {
        self.note_on = true;
        self.count = self.count.saturating_add(1);
        self.touch(event);
    }

    pub(crate) fn set_on(&mut self, on: bool) {
        self.note_on = on;
    }

    pub(crate) fn touch(&mut self, event: &MidiEvent) {
        self.velocity = event.velocity;
        self.attack = event.attack;
        self.release = event.release;
        self.timestamp = event.timestamp;
    }
}
