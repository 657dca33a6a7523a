use midibox_theory::MAX_NOTE;
use std::fmt;
use std::fmt::Write;

/// Set of MIDI note numbers stored as a 128-bit mask.
///
/// Used to carry the physically held keys alongside a pedal change, where a
/// copyable value is more convenient than an allocated list.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteSet(u128);

impl fmt::Debug for NoteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NoteSet(")?;
        for (i, note) in self.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write!(f, "{note}")?;
        }
        f.write_char(')')
    }
}

impl NoteSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Creates an empty set.
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Adds `note`, returning true if it was not already present. Values above 127 are ignored.
    pub fn insert(&mut self, note: u8) -> bool {
        if note > MAX_NOTE {
            return false;
        }
        let had = self.contains(note);
        self.0 |= 1 << note;
        !had
    }

    /// Removes `note`, returning true if it was present.
    pub fn remove(&mut self, note: u8) -> bool {
        let had = self.contains(note);
        if had {
            self.0 &= !(1 << note);
        }
        had
    }

    /// Returns true if `note` is in the set.
    pub const fn contains(&self, note: u8) -> bool {
        note <= MAX_NOTE && self.0 & (1 << note) != 0
    }

    /// Number of notes in the set.
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Iterates over the notes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> {
        let bits = self.0;
        (0..=MAX_NOTE).filter(move |&n| bits & (1 << n) != 0)
    }
}

impl FromIterator<u8> for NoteSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<u8> for NoteSet {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for note in iter {
            self.insert(note);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove() {
        let mut set = NoteSet::new();
        assert!(set.insert(60));
        assert!(!set.insert(60));
        assert!(set.insert(127));
        assert!(!set.insert(128));
        assert_eq!(2, set.len());
        assert!(set.remove(60));
        assert!(!set.remove(60));
        assert!(!set.contains(200));
        assert_eq!(vec![127], set.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_iter_is_sorted() {
        let set: NoteSet = [72, 0, 64, 60, 64].into_iter().collect();
        assert_eq!(vec![0, 60, 64, 72], set.iter().collect::<Vec<_>>());
        assert_eq!("NoteSet(0,60,64,72)", format!("{set:?}"));
    }
}
