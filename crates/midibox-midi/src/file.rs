//! Standard MIDI File playback as a stream of canonical events.

use crate::config::NormalizerConfig;
use crate::errors::NormalizeError;
use crate::source::SourceDescriptor;
use midibox_store::{InputId, MidiEvent, Registration};
use midly::{MidiMessage, Smf, Timing, TrackEventKind};

/// Maps one track event of a file onto `channel`.
///
/// Only note messages produce events; a note-on with velocity 0 is a note-off.
/// The timestamp is the absolute tick.
pub fn file_event(
    input_id: &InputId,
    channel: u8,
    kind: &TrackEventKind<'_>,
    tick: u64,
) -> Option<MidiEvent> {
    let TrackEventKind::Midi { message, .. } = *kind else {
        return None;
    };
    let event = match message {
        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
            MidiEvent::note_on(input_id.clone(), channel, key.as_int(), vel.as_int())
        }
        MidiMessage::NoteOn { key, vel } | MidiMessage::NoteOff { key, vel } => {
            MidiEvent::note_off(input_id.clone(), channel, key.as_int(), vel.as_int())
        }
        _ => return None,
    };
    Some(event.at(tick as f64))
}

/// A parsed file, ready to be registered and dispatched.
#[derive(Debug, Clone)]
pub struct FilePlayback {
    source: SourceDescriptor,
    channel: u8,
    ticks_per_beat: Option<u16>,
    events: Vec<MidiEvent>,
}

impl FilePlayback {
    /// Parses `bytes` and merges the note events of all tracks in tick order.
    ///
    /// Events sharing a tick keep their track order, then their order within the track.
    pub fn parse(
        source: SourceDescriptor,
        bytes: &[u8],
        config: &NormalizerConfig,
    ) -> Result<Self, NormalizeError> {
        let smf = Smf::parse(bytes)?;
        let channel = config.file_channel;
        let mut events = Vec::new();
        for track in &smf.tracks {
            let mut tick = 0u64;
            for event in track {
                tick += u64::from(event.delta.as_int());
                events.extend(file_event(&source.id, channel, &event.kind, tick));
            }
        }
        events.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        let ticks_per_beat = match smf.header.timing {
            Timing::Metrical(ticks) => Some(ticks.as_int()),
            Timing::Timecode(..) => None,
        };
        log::debug!(
            "Parsed {} with {} tracks into {} note events",
            source.name,
            smf.tracks.len(),
            events.len()
        );
        Ok(Self {
            source,
            channel,
            ticks_per_beat,
            events,
        })
    }

    pub fn source(&self) -> &SourceDescriptor {
        &self.source
    }

    /// Channel the file's notes are mapped onto.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Pulses per quarter note, for files with metrical timing.
    pub fn ticks_per_beat(&self) -> Option<u16> {
        self.ticks_per_beat
    }

    pub fn events(&self) -> &[MidiEvent] {
        &self.events
    }

    pub fn registration(&self, config: &NormalizerConfig) -> Registration {
        self.source.registration(config)
    }

    /// Event silencing everything the file left sounding, e.g. before replaying it.
    pub fn stop_event(&self) -> MidiEvent {
        MidiEvent::all_notes_off(self.source.id.clone(), self.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midibox_store::EventKind;
    use midly::num::{u4, u7};

    fn midi(message: MidiMessage) -> TrackEventKind<'static> {
        TrackEventKind::Midi {
            channel: u4::new(9),
            message,
        }
    }

    #[test]
    fn test_file_event_maps_to_file_channel() {
        let id = InputId::new("song");
        let on = midi(MidiMessage::NoteOn {
            key: u7::new(60),
            vel: u7::new(80),
        });
        let event = file_event(&id, 1, &on, 960).unwrap();
        assert_eq!(EventKind::NoteOn, event.kind);
        assert_eq!(1, event.channel);
        assert_eq!(960.0, event.timestamp);

        let off = midi(MidiMessage::NoteOn {
            key: u7::new(60),
            vel: u7::new(0),
        });
        assert_eq!(EventKind::NoteOff, file_event(&id, 1, &off, 0).unwrap().kind);

        let program = midi(MidiMessage::ProgramChange { program: u7::new(3) });
        assert!(file_event(&id, 1, &program, 0).is_none());
    }
}
