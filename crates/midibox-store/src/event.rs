use crate::ids::{ChannelId, InputId};
use crate::note_set::NoteSet;

const NOTE_OFF_STATUS: u8 = 0x80;
const NOTE_ON_STATUS: u8 = 0x90;
const CONTROL_CHANGE_STATUS: u8 = 0xB0;
const SUSTAIN_CONTROLLER: u8 = 64;
const ALL_NOTES_OFF_CONTROLLER: u8 = 123;
const MAX_VELOCITY: u8 = 127;

/// A sustain pedal change together with the keys physically held at that moment.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PedalChange {
    /// Whether the pedal is down, before any `reverse_pedal` inversion.
    pub pressed: bool,
    /// Keys held down on the device, regardless of the pedal.
    pub physical: NoteSet,
}

/// What a [`MidiEvent`] does.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    NoteOn,
    NoteOff,
    Pedal(PedalChange),
    /// Clears the key statistics of a channel.
    Reset,
    /// Silences every sounding note of a channel, ignoring the pedal.
    AllNotesOff,
}

/// A normalized MIDI event, independent of where it came from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiEvent {
    pub input_id: InputId,
    pub channel: u8,
    pub kind: EventKind,
    /// Raw message bytes. `data[1]` is the note number for note events.
    pub data: [u8; 3],
    pub velocity: u8,
    /// `velocity / 127` on note-on, 0 otherwise.
    pub attack: f32,
    /// `velocity / 127` on note-off, 0 otherwise.
    pub release: f32,
    pub timestamp: f64,
}

fn status(kind: u8, channel: u8) -> u8 {
    kind | (channel.wrapping_sub(1) & 0x0F)
}

fn unit(velocity: u8) -> f32 {
    f32::from(velocity.min(MAX_VELOCITY)) / f32::from(MAX_VELOCITY)
}

impl MidiEvent {
    fn new(input_id: impl Into<InputId>, channel: u8, kind: EventKind, data: [u8; 3]) -> Self {
        Self {
            input_id: input_id.into(),
            channel,
            kind,
            data,
            velocity: 0,
            attack: 0.0,
            release: 0.0,
            timestamp: 0.0,
        }
    }

    /// A note-on for `note` with `velocity`.
    pub fn note_on(input_id: impl Into<InputId>, channel: u8, note: u8, velocity: u8) -> Self {
        let data = [status(NOTE_ON_STATUS, channel), note, velocity];
        Self {
            velocity,
            attack: unit(velocity),
            ..Self::new(input_id, channel, EventKind::NoteOn, data)
        }
    }

    /// A note-off for `note` with release `velocity`.
    pub fn note_off(input_id: impl Into<InputId>, channel: u8, note: u8, velocity: u8) -> Self {
        let data = [status(NOTE_OFF_STATUS, channel), note, velocity];
        Self {
            velocity,
            release: unit(velocity),
            ..Self::new(input_id, channel, EventKind::NoteOff, data)
        }
    }

    /// A sustain pedal change.
    pub fn pedal(input_id: impl Into<InputId>, channel: u8, pressed: bool, physical: NoteSet) -> Self {
        let value = if pressed { 127 } else { 0 };
        let data = [status(CONTROL_CHANGE_STATUS, channel), SUSTAIN_CONTROLLER, value];
        let kind = EventKind::Pedal(PedalChange { pressed, physical });
        Self::new(input_id, channel, kind, data)
    }

    /// Clears the key statistics of `channel`.
    pub fn reset(channel: &ChannelId) -> Self {
        Self::new(channel.input.clone(), channel.channel, EventKind::Reset, [0; 3])
    }

    /// Releases all sounding notes.
    pub fn all_notes_off(input_id: impl Into<InputId>, channel: u8) -> Self {
        let data = [status(CONTROL_CHANGE_STATUS, channel), ALL_NOTES_OFF_CONTROLLER, 0];
        Self::new(input_id, channel, EventKind::AllNotesOff, data)
    }

    /// Sets the timestamp.
    pub fn at(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Note number for note events.
    pub fn note(&self) -> u8 {
        self.data[1]
    }

    pub fn channel_id(&self) -> ChannelId {
        ChannelId::new(self.input_id.clone(), self.channel)
    }

    /// Short lowercase name of the event kind, as used in log output.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            EventKind::NoteOn => "noteon",
            EventKind::NoteOff => "noteoff",
            EventKind::Pedal(_) => "pedal",
            EventKind::Reset => "reset",
            EventKind::AllNotesOff => "allnotesoff",
        }
    }
}
