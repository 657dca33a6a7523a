//! Major-key lookup tables and key signatures.
//!
//! Keys are identified by their tonic [`PitchClass`]. Each major key holds
//! seven diatonic classes, and each class belongs to seven major keys. Both
//! directions are precomputed so the reducer can fan a note out to its keys
//! without any arithmetic beyond a table read.

use crate::{Accidental, PitchClass, MAX_NOTE};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Semitone offsets of the major scale degrees from the tonic.
pub const MAJOR_SCALE_STEPS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

// Offsets from a class to the tonics of the major keys containing it.
const CONTAINING_KEY_OFFSETS: [u8; 7] = [0, 1, 3, 5, 7, 8, 10];

const fn build_table(offsets: [u8; 7]) -> [[PitchClass; 7]; 12] {
    let mut table = [[PitchClass::C; 7]; 12];
    let mut root = 0;
    while root < 12 {
        let mut i = 0;
        while i < 7 {
            table[root][i] = PitchClass::from_index(root + offsets[i] as usize);
            i += 1;
        }
        root += 1;
    }
    table
}

static KEY_TO_CLASSES: [[PitchClass; 7]; 12] = build_table(MAJOR_SCALE_STEPS);
static CLASS_TO_KEYS: [[PitchClass; 7]; 12] = build_table(CONTAINING_KEY_OFFSETS);

/// The seven diatonic classes of the major key on `tonic`, in scale order.
///
/// # Examples
///
/// ```
/// # use midibox_theory::{diatonic_classes, PitchClass::*};
/// assert_eq!([G, A, B, C, D, E, FSharp], diatonic_classes(G));
/// ```
pub fn diatonic_classes(tonic: PitchClass) -> [PitchClass; 7] {
    KEY_TO_CLASSES[tonic.index()]
}

/// The tonics of the seven major keys in which `class` is diatonic.
pub fn keys_containing(class: PitchClass) -> [PitchClass; 7] {
    CLASS_TO_KEYS[class.index()]
}

/// Returns true when `class` is diatonic in the major key on `tonic`.
pub fn key_contains(tonic: PitchClass, class: PitchClass) -> bool {
    MAJOR_SCALE_STEPS.contains(&class.interval_from(tonic))
}

/// Every MIDI note number whose class is diatonic in the major key on `tonic`.
pub fn notes_in_key(tonic: PitchClass) -> Vec<u8> {
    (0..=MAX_NOTE)
        .filter(|&n| key_contains(tonic, PitchClass::of(n)))
        .collect()
}

/// Error returned when parsing an unrecognized key signature name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown key signature {0:?}")]
pub struct UnknownKeySignature(pub String);

/// A major key signature a user can select for a channel.
///
/// Enharmonic pairs (`F#`/`Gb`, `C#`/`Db`, `B`/`Cb`) are kept distinct because
/// they spell notes differently.
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum KeySignature {
    #[default]
    C,
    G,
    D,
    A,
    E,
    B,
    FSharp,
    CSharp,
    F,
    BFlat,
    EFlat,
    AFlat,
    DFlat,
    GFlat,
    CFlat,
}

impl KeySignature {
    /// All key signatures, sharps first and then flats, each ordered around the circle of fifths.
    pub const ALL: [KeySignature; 15] = [
        Self::C,
        Self::G,
        Self::D,
        Self::A,
        Self::E,
        Self::B,
        Self::FSharp,
        Self::CSharp,
        Self::F,
        Self::BFlat,
        Self::EFlat,
        Self::AFlat,
        Self::DFlat,
        Self::GFlat,
        Self::CFlat,
    ];

    /// Conventional name, e.g. `"F#"` or `"Bb"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::G => "G",
            Self::D => "D",
            Self::A => "A",
            Self::E => "E",
            Self::B => "B",
            Self::FSharp => "F#",
            Self::CSharp => "C#",
            Self::F => "F",
            Self::BFlat => "Bb",
            Self::EFlat => "Eb",
            Self::AFlat => "Ab",
            Self::DFlat => "Db",
            Self::GFlat => "Gb",
            Self::CFlat => "Cb",
        }
    }

    /// The tonic pitch class.
    pub fn tonic(self) -> PitchClass {
        use PitchClass as P;
        match self {
            Self::C => P::C,
            Self::G => P::G,
            Self::D => P::D,
            Self::A => P::A,
            Self::E => P::E,
            Self::B | Self::CFlat => P::B,
            Self::FSharp | Self::GFlat => P::FSharp,
            Self::CSharp | Self::DFlat => P::CSharp,
            Self::F => P::F,
            Self::BFlat => P::ASharp,
            Self::EFlat => P::DSharp,
            Self::AFlat => P::GSharp,
        }
    }

    /// Whether the signature is written with sharps. C counts as a sharp key.
    pub fn uses_sharps(self) -> bool {
        matches!(
            self,
            Self::C | Self::G | Self::D | Self::A | Self::E | Self::B | Self::FSharp | Self::CSharp
        )
    }

    /// Accidental preference matching [`Self::uses_sharps`].
    pub fn accidental(self) -> Accidental {
        Accidental::from_sharps(self.uses_sharps())
    }

    /// Returns true when `class` is diatonic in this key.
    pub fn contains(self, class: PitchClass) -> bool {
        key_contains(self.tonic(), class)
    }

    /// Spells `class` the way it is written under this key signature.
    ///
    /// # Examples
    ///
    /// ```
    /// # use midibox_theory::{KeySignature, PitchClass};
    /// assert_eq!("E#", KeySignature::FSharp.spell(PitchClass::F));
    /// assert_eq!("Bb", KeySignature::F.spell(PitchClass::ASharp));
    /// assert_eq!("A#", KeySignature::B.spell(PitchClass::ASharp));
    /// ```
    pub fn spell(self, class: PitchClass) -> &'static str {
        match (self, class) {
            (Self::CSharp, PitchClass::C) => "B#",
            (Self::FSharp | Self::CSharp, PitchClass::F) => "E#",
            (Self::CFlat, PitchClass::E) => "Fb",
            (Self::GFlat | Self::CFlat, PitchClass::B) => "Cb",
            _ => class.name(self.accidental()),
        }
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for KeySignature {
    type Err = UnknownKeySignature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownKeySignature(s.to_string()))
    }
}
