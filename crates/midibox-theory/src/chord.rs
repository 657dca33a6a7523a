//! Chord estimation from a set of sounding notes.
//!
//! Detection works on pitch-class sets: octaves and doublings are ignored, and
//! each class present is tried as a root against a dictionary of chord
//! templates. Only exact matches count, so adding or removing a single note
//! changes the result.

use crate::{Accidental, PitchClass};
use std::fmt;

/// A chord template: a symbol and the set of intervals above its root.
#[derive(Debug, PartialEq, Eq)]
pub struct ChordType {
    /// Suffix appended to the root name, e.g. `"m7"`.
    pub symbol: &'static str,
    /// Human-readable quality name.
    pub name: &'static str,
    mask: u16,
}

impl ChordType {
    const fn new(symbol: &'static str, name: &'static str, intervals: &[u8]) -> Self {
        let mut mask = 0u16;
        let mut i = 0;
        while i < intervals.len() {
            mask |= 1 << intervals[i];
            i += 1;
        }
        Self { symbol, name, mask }
    }

    /// Intervals above the root, in semitones, ascending.
    pub fn intervals(&self) -> impl Iterator<Item = u8> + '_ {
        (0..12u8).filter(|i| self.mask & (1 << i) != 0)
    }

    /// Number of distinct pitch classes in the chord.
    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Returns true for a template with no intervals at all.
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }
}

/// The chord dictionary used by [`detect`].
pub static CHORD_TYPES: &[ChordType] = &[
    ChordType::new("5", "fifth", &[0, 7]),
    ChordType::new("M3", "major third", &[0, 4]),
    ChordType::new("m3", "minor third", &[0, 3]),
    ChordType::new("M", "major", &[0, 4, 7]),
    ChordType::new("m", "minor", &[0, 3, 7]),
    ChordType::new("dim", "diminished", &[0, 3, 6]),
    ChordType::new("aug", "augmented", &[0, 4, 8]),
    ChordType::new("sus2", "suspended second", &[0, 2, 7]),
    ChordType::new("sus4", "suspended fourth", &[0, 5, 7]),
    ChordType::new("6", "sixth", &[0, 4, 7, 9]),
    ChordType::new("m6", "minor sixth", &[0, 3, 7, 9]),
    ChordType::new("7", "dominant seventh", &[0, 4, 7, 10]),
    ChordType::new("maj7", "major seventh", &[0, 4, 7, 11]),
    ChordType::new("m7", "minor seventh", &[0, 3, 7, 10]),
    ChordType::new("m7b5", "half-diminished", &[0, 3, 6, 10]),
    ChordType::new("dim7", "diminished seventh", &[0, 3, 6, 9]),
    ChordType::new("mMaj7", "minor major seventh", &[0, 3, 7, 11]),
    ChordType::new("7sus4", "suspended fourth seventh", &[0, 5, 7, 10]),
    ChordType::new("add9", "added ninth", &[0, 2, 4, 7]),
    ChordType::new("9", "dominant ninth", &[0, 2, 4, 7, 10]),
    ChordType::new("maj9", "major ninth", &[0, 2, 4, 7, 11]),
    ChordType::new("m9", "minor ninth", &[0, 2, 3, 7, 10]),
];

/// A chord candidate found by [`detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    /// Root of the chord.
    pub tonic: PitchClass,
    /// Matched template.
    pub kind: &'static ChordType,
    /// Class of the lowest sounding note.
    pub bass: PitchClass,
    /// Spelling used by the [`Display`](fmt::Display) implementation.
    pub accidental: Accidental,
}

impl Chord {
    /// Returns true when the lowest note is not the root (a slash chord).
    pub fn is_inversion(&self) -> bool {
        self.tonic != self.bass
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tonic.name(self.accidental), self.kind.symbol)?;
        if self.is_inversion() {
            write!(f, "/{}", self.bass.name(self.accidental))?;
        }
        Ok(())
    }
}

fn class_mask(notes: &[u8]) -> u16 {
    notes.iter().fold(0, |mask, &n| mask | 1 << PitchClass::of(n).index())
}

// Re-expresses a class set relative to `root`, so bit 0 is the root itself.
fn rotate_to(mask: u16, root: PitchClass) -> u16 {
    let r = root.index() as u32;
    ((mask >> r) | (mask << (12 - r))) & 0x0FFF
}

/// Estimates the chords formed by `notes` (MIDI note numbers, any order).
///
/// Root-position candidates come first, followed by inversions ordered by
/// root. An empty slice, a single pitch class, or a set that matches no
/// template all yield an empty list.
///
/// # Examples
///
/// ```
/// # use midibox_theory::{detect, Accidental};
/// let names: Vec<_> = detect(&[52, 55, 60], Accidental::Sharp)
///     .iter()
///     .map(|c| c.to_string())
///     .collect();
/// assert_eq!(vec!["CM/E"], names);
/// ```
pub fn detect(notes: &[u8], accidental: Accidental) -> Vec<Chord> {
    let Some(&lowest) = notes.iter().min() else {
        return Vec::new();
    };
    let bass = PitchClass::of(lowest);
    let present = class_mask(notes);

    let others = PitchClass::ALL
        .into_iter()
        .filter(|&pc| pc != bass && present & (1 << pc.index()) != 0);

    std::iter::once(bass)
        .chain(others)
        .flat_map(move |tonic| {
            let relative = rotate_to(present, tonic);
            CHORD_TYPES
                .iter()
                .filter(move |kind| kind.mask == relative)
                .map(move |kind| Chord {
                    tonic,
                    kind,
                    bass,
                    accidental,
                })
        })
        .collect()
}
