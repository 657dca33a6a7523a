//! Normalization of live MIDI messages from hardware or virtual ports.

use crate::config::NormalizerConfig;
use crate::errors::NormalizeError;
use midibox_store::{InputId, MidiEvent, NoteSet};
use midly::live::LiveEvent;
use midly::MidiMessage;

const SUSTAIN_CONTROLLER: u8 = 64;

/// Turns the raw byte stream of one input into canonical events.
///
/// Besides mapping messages, the normalizer tracks which keys are physically
/// down on each channel from the note-on/note-off stream alone. That snapshot
/// travels with every pedal event so the reducer can release exactly the
/// notes whose keys were lifted while the pedal was held.
#[derive(Debug, Clone)]
pub struct LiveNormalizer {
    input_id: InputId,
    config: NormalizerConfig,
    held: [NoteSet; 16],
}

impl LiveNormalizer {
    pub fn new(input_id: impl Into<InputId>, config: NormalizerConfig) -> Self {
        Self {
            input_id: input_id.into(),
            config,
            held: [NoteSet::EMPTY; 16],
        }
    }

    pub fn input_id(&self) -> &InputId {
        &self.input_id
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Keys physically down on `channel` (1-16).
    pub fn physical(&self, channel: u8) -> NoteSet {
        self.held[usize::from(channel.wrapping_sub(1) & 0x0F)]
    }

    /// Parses one complete MIDI message.
    ///
    /// Returns `Ok(None)` for valid messages that carry nothing the listener tracks
    /// (system messages, pitch bend, other controllers).
    pub fn normalize(
        &mut self,
        bytes: &[u8],
        timestamp: f64,
    ) -> Result<Option<MidiEvent>, NormalizeError> {
        match LiveEvent::parse(bytes)? {
            LiveEvent::Midi { channel, message } => {
                Ok(self.message(channel.as_int() + 1, message, timestamp))
            }
            other => {
                log::trace!("Skipping non-channel message {other:?}");
                Ok(None)
            }
        }
    }

    /// Maps an already parsed channel message. `channel` is 1-based.
    pub fn message(&mut self, channel: u8, message: MidiMessage, timestamp: f64) -> Option<MidiEvent> {
        let input_id = self.input_id.clone();
        let held = &mut self.held[usize::from(channel.wrapping_sub(1) & 0x0F)];
        let event = match message {
            MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                held.insert(key.as_int());
                MidiEvent::note_on(input_id, channel, key.as_int(), vel.as_int())
            }
            MidiMessage::NoteOn { key, vel } | MidiMessage::NoteOff { key, vel } => {
                held.remove(key.as_int());
                MidiEvent::note_off(input_id, channel, key.as_int(), vel.as_int())
            }
            MidiMessage::Controller { controller, value } if controller.as_int() == SUSTAIN_CONTROLLER => {
                let pressed = self.config.is_pedal_down(value.as_int());
                MidiEvent::pedal(input_id, channel, pressed, *held)
            }
            MidiMessage::Controller { controller, .. }
                if self.config.is_all_notes_off(controller.as_int()) =>
            {
                held.clear();
                MidiEvent::all_notes_off(input_id, channel)
            }
            other => {
                log::trace!("Skipping {other:?} on channel {channel}");
                return None;
            }
        };
        Some(event.at(timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midibox_store::{EventKind, PedalChange};
    use rstest::rstest;

    fn normalizer() -> LiveNormalizer {
        LiveNormalizer::new("kb", NormalizerConfig::default())
    }

    #[rstest]
    #[case(&[0x90, 60, 100], EventKind::NoteOn)]
    #[case(&[0x90, 60, 0], EventKind::NoteOff)]
    #[case(&[0x80, 60, 64], EventKind::NoteOff)]
    #[case(&[0xB0, 123, 0], EventKind::AllNotesOff)]
    #[case(&[0xB0, 120, 0], EventKind::AllNotesOff)]
    fn test_kinds(#[case] bytes: &[u8], #[case] expected: EventKind) {
        let event = normalizer().normalize(bytes, 0.0).unwrap().unwrap();
        assert_eq!(expected, event.kind);
        assert_eq!(1, event.channel);
    }

    #[rstest]
    #[case(&[0xE0, 0, 64])]
    #[case(&[0xB0, 7, 100])]
    #[case(&[0xC0, 5])]
    #[case(&[0xF8])]
    fn test_untracked_messages(#[case] bytes: &[u8]) {
        assert_eq!(None, normalizer().normalize(bytes, 0.0).unwrap());
    }

    #[test]
    fn test_unparsable() {
        assert!(normalizer().normalize(&[], 0.0).is_err());
        assert!(normalizer().normalize(&[60, 100], 0.0).is_err());
    }

    #[test]
    fn test_note_on_fields() {
        let event = normalizer().normalize(&[0x93, 64, 127], 12.5).unwrap().unwrap();
        assert_eq!(4, event.channel);
        assert_eq!(64, event.note());
        assert_eq!(127, event.velocity);
        assert_eq!(1.0, event.attack);
        assert_eq!(12.5, event.timestamp);
        assert_eq!("kb", event.input_id.as_str());
    }

    #[test]
    fn test_pedal_carries_physical_keys() {
        let mut normalizer = normalizer();
        for bytes in [[0x90, 60, 90], [0x90, 64, 90], [0x91, 67, 90], [0x80, 60, 0]] {
            normalizer.normalize(&bytes, 0.0).unwrap();
        }
        let event = normalizer.normalize(&[0xB0, 64, 127], 0.0).unwrap().unwrap();
        let expected = PedalChange {
            pressed: true,
            physical: NoteSet::from_iter([64]),
        };
        assert_eq!(EventKind::Pedal(expected), event.kind);

        let event = normalizer.normalize(&[0xB0, 64, 10], 0.0).unwrap().unwrap();
        assert!(matches!(event.kind, EventKind::Pedal(PedalChange { pressed: false, .. })));
        assert_eq!(NoteSet::from_iter([67]), normalizer.physical(2));
    }
}
