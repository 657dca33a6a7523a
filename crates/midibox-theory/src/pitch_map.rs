//! A map with exactly one slot per [`PitchClass`].
//!
//! Keys are pitch classes rather than arbitrary integers, so indexing can
//! never go out of bounds and every class always has a value.

use crate::PitchClass;
use std::ops;

/// Fixed-size map storing one `T` for each of the twelve pitch classes.
///
/// # Example
/// ```rust
/// use midibox_theory::{PitchClass, PitchClassMap};
///
/// let mut counts = PitchClassMap::<u32>::default();
/// counts[PitchClass::G] += 2;
/// assert_eq!(2, counts[PitchClass::G]);
/// assert_eq!(0, counts[PitchClass::C]);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchClassMap<T> {
    data: [T; 12],
}

impl<T: Default> Default for PitchClassMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> PitchClassMap<T> {
    /// Creates a map by calling `fill` once per pitch class, in chromatic order.
    pub fn new(mut fill: impl FnMut(PitchClass) -> T) -> Self {
        Self {
            data: std::array::from_fn(|i| fill(PitchClass::from_index(i))),
        }
    }

    /// Wraps an array whose index `i` holds the value for pitch class `i`.
    pub const fn from_array(data: [T; 12]) -> Self {
        Self { data }
    }

    /// Borrows the values as an array in chromatic order.
    pub fn as_array(&self) -> &[T; 12] {
        &self.data
    }

    /// Consumes the map, returning its values in chromatic order.
    pub fn into_array(self) -> [T; 12] {
        self.data
    }

    /// Iterates over `(class, value)` pairs in chromatic order.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (PitchClass, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (PitchClass::from_index(i), v))
    }

    /// Iterates mutably over `(class, value)` pairs in chromatic order.
    pub fn iter_mut(&mut self) -> impl '_ + Iterator<Item = (PitchClass, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PitchClass::from_index(i), v))
    }

    /// Iterates over the values in chromatic order.
    pub fn values(&self) -> impl '_ + Iterator<Item = &T> {
        self.data.iter()
    }

    /// Maps every value through `f`, keeping the class association.
    pub fn map<U>(self, mut f: impl FnMut(PitchClass, T) -> U) -> PitchClassMap<U> {
        let mut i = 0;
        PitchClassMap {
            data: self.data.map(|v| {
                let out = f(PitchClass::from_index(i), v);
                i += 1;
                out
            }),
        }
    }
}

impl<T: PartialOrd> PitchClassMap<T> {
    /// Class with the largest value. Ties resolve to the lowest class.
    pub fn argmax(&self) -> PitchClass {
        let mut best = 0;
        for i in 1..12 {
            if self.data[i] > self.data[best] {
                best = i;
            }
        }
        PitchClass::from_index(best)
    }
}

impl<T> ops::Index<PitchClass> for PitchClassMap<T> {
    type Output = T;

    fn index(&self, index: PitchClass) -> &Self::Output {
        &self.data[index.index()]
    }
}

impl<T> ops::IndexMut<PitchClass> for PitchClassMap<T> {
    fn index_mut(&mut self, index: PitchClass) -> &mut Self::Output {
        &mut self.data[index.index()]
    }
}

impl<T> From<[T; 12]> for PitchClassMap<T> {
    fn from(data: [T; 12]) -> Self {
        Self::from_array(data)
    }
}
