//! Pitch classes and note naming.
//!
//! MIDI note numbers are plain `u8` values in `0..=127`. This module folds them
//! into the twelve chromatic [`PitchClass`]es and spells them as readable names
//! such as `C4` or `Db3`.

use std::fmt;

/// Number of MIDI note numbers (`0..=127`).
pub const NOTE_COUNT: usize = 128;

/// Highest valid MIDI note number.
pub const MAX_NOTE: u8 = 127;

/// One of the twelve chromatic classes, where `C = 0` and `B = 11`.
///
/// The variants are named with sharps; use [`PitchClass::name`] to spell them
/// with flats instead.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum PitchClass {
    /// C
    C,
    /// C#/Db
    CSharp,
    /// D
    D,
    /// D#/Eb
    DSharp,
    /// E
    E,
    /// F
    F,
    /// F#/Gb
    FSharp,
    /// G
    G,
    /// G#/Ab
    GSharp,
    /// A
    A,
    /// A#/Bb
    ASharp,
    /// B
    B,
}

/// Accidental used when spelling a black key.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Accidental {
    /// Spell black keys with sharps (`C#`).
    #[default]
    Sharp,
    /// Spell black keys with flats (`Db`).
    Flat,
}

impl Accidental {
    /// Picks sharps when `sharps` is true, flats otherwise.
    pub fn from_sharps(sharps: bool) -> Self {
        if sharps {
            Self::Sharp
        } else {
            Self::Flat
        }
    }
}

const SHARP_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
const FLAT_NAMES: [&str; 12] = ["C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B"];

impl PitchClass {
    /// All pitch classes in chromatic order.
    pub const ALL: [PitchClass; 12] = [
        Self::C,
        Self::CSharp,
        Self::D,
        Self::DSharp,
        Self::E,
        Self::F,
        Self::FSharp,
        Self::G,
        Self::GSharp,
        Self::A,
        Self::ASharp,
        Self::B,
    ];

    /// Returns the pitch class at `index`, wrapping modulo 12.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    /// Chromatic index of this class, in `0..12`.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Chromatic class of a MIDI note number (`note % 12`).
    ///
    /// # Examples
    ///
    /// ```
    /// # use midibox_theory::PitchClass;
    /// assert_eq!(PitchClass::of(60), PitchClass::C);
    /// assert_eq!(PitchClass::of(61), PitchClass::CSharp);
    /// ```
    pub const fn of(note: u8) -> Self {
        Self::from_index(note as usize)
    }

    /// Moves this class up by `semitones` (negative values move down), wrapping around the octave.
    pub const fn transpose(self, semitones: i32) -> Self {
        Self::from_index((self as i32 + semitones).rem_euclid(12) as usize)
    }

    /// Distance in semitones going up from `root` to `self`, in `0..12`.
    pub const fn interval_from(self, root: PitchClass) -> u8 {
        ((self as i32 - root as i32).rem_euclid(12)) as u8
    }

    /// Returns true for the five classes that fall on black piano keys.
    pub const fn is_black_key(self) -> bool {
        matches!(self, Self::CSharp | Self::DSharp | Self::FSharp | Self::GSharp | Self::ASharp)
    }

    /// Name of this class with the given accidental.
    pub fn name(self, accidental: Accidental) -> &'static str {
        match accidental {
            Accidental::Sharp => SHARP_NAMES[self.index()],
            Accidental::Flat => FLAT_NAMES[self.index()],
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name(Accidental::Sharp))
    }
}

/// Octave of a MIDI note in scientific pitch notation, where note 60 is in octave 4.
pub const fn octave(note: u8) -> i8 {
    (note / 12) as i8 - 1
}

/// Spells a MIDI note number as a scientific pitch name.
///
/// # Examples
///
/// ```
/// # use midibox_theory::{note_name, Accidental};
/// assert_eq!(note_name(60, Accidental::Sharp), "C4");
/// assert_eq!(note_name(61, Accidental::Flat), "Db4");
/// assert_eq!(note_name(21, Accidental::Sharp), "A0");
/// ```
pub fn note_name(note: u8, accidental: Accidental) -> String {
    format!("{}{}", PitchClass::of(note).name(accidental), octave(note))
}
