#![warn(missing_docs)]
//! # Music theory tables
//!
//! Pure lookup tables and functions for working with MIDI note numbers as
//! music: chromatic [`PitchClass`]es, major keys and [`KeySignature`]s, note
//! spelling, and chord estimation. Nothing in this crate holds state.

pub mod chord;
pub mod key;
pub mod pitch;
pub mod pitch_map;

pub use chord::{detect, Chord, ChordType, CHORD_TYPES};
pub use key::{
    diatonic_classes, key_contains, keys_containing, notes_in_key, KeySignature, UnknownKeySignature,
    MAJOR_SCALE_STEPS,
};
pub use pitch::{note_name, octave, Accidental, PitchClass, MAX_NOTE, NOTE_COUNT};
pub use pitch_map::PitchClassMap;
