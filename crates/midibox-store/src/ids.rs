//! Composite identifiers for inputs, channels and notes.
//!
//! Entities never point at each other; they are linked through these keys.
//! Their string forms join the parts with `__`, e.g. `keyboard__1__60` for
//! note 60 on channel 1 of input `keyboard`.

use derive_more::{Deref, Display, From};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SEPARATOR: &str = "__";

/// Error returned when parsing a channel or note identifier from a string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdParseError {
    /// The string has no `__` separator.
    #[error("Missing `__` separator in {0:?}")]
    MissingSeparator(String),
    /// A channel or note component is not a valid number.
    #[error("Invalid number {0:?} in identifier")]
    InvalidNumber(String),
    /// The input component is empty.
    #[error("Empty input identifier")]
    EmptyInput,
}

/// Stable identifier of a MIDI source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, Display, From)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct InputId(String);

impl InputId {
    /// Creates an input identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier of channel `number` within this input.
    pub fn channel(&self, number: u8) -> ChannelId {
        ChannelId::new(self.clone(), number)
    }

    /// Borrows the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InputId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier of one channel within an input, displayed as `input__channel`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelId {
    /// Owning input.
    pub input: InputId,
    /// Channel number (1-16 for hardware, 1 for file playback).
    pub channel: u8,
}

impl ChannelId {
    /// Creates a channel identifier.
    pub fn new(input: impl Into<InputId>, channel: u8) -> Self {
        Self {
            input: input.into(),
            channel,
        }
    }

    /// Identifier of note `number` within this channel.
    pub fn note(&self, number: u8) -> NoteKey {
        NoteKey::new(self.clone(), number)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.input, self.channel)
    }
}

fn parse_number(s: &str) -> Result<u8, IdParseError> {
    s.parse().map_err(|_| IdParseError::InvalidNumber(s.to_string()))
}

impl FromStr for ChannelId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (input, channel) = s
            .rsplit_once(SEPARATOR)
            .ok_or_else(|| IdParseError::MissingSeparator(s.to_string()))?;
        if input.is_empty() {
            return Err(IdParseError::EmptyInput);
        }
        Ok(Self::new(input, parse_number(channel)?))
    }
}

/// Identifier of one note number within a channel, displayed as `input__channel__note`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteKey {
    /// Owning channel.
    pub channel: ChannelId,
    /// MIDI note number, 0-127.
    pub note: u8,
}

impl NoteKey {
    /// Creates a note identifier.
    pub fn new(channel: ChannelId, note: u8) -> Self {
        Self { channel, note }
    }

    /// Owning input.
    pub fn input(&self) -> &InputId {
        &self.channel.input
    }
}

impl fmt::Display for NoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.channel, self.note)
    }
}

impl FromStr for NoteKey {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (channel, note) = s
            .rsplit_once(SEPARATOR)
            .ok_or_else(|| IdParseError::MissingSeparator(s.to_string()))?;
        let note = parse_number(note)?;
        if note > midibox_theory::MAX_NOTE {
            return Err(IdParseError::InvalidNumber(note.to_string()));
        }
        Ok(Self::new(channel.parse()?, note))
    }
}
