use crate::config::NormalizerConfig;
use midibox_store::{InputId, Registration, SourceKind};

/// A MIDI source discovered by the host, before registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub id: InputId,
    pub name: String,
    pub kind: SourceKind,
}

impl SourceDescriptor {
    pub fn hardware(id: impl Into<InputId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: SourceKind::Hardware,
        }
    }

    pub fn file(id: impl Into<InputId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: SourceKind::File,
        }
    }

    /// Input, channels and notes to register for this source.
    ///
    /// Hardware sources get every configured channel, files get the single file channel.
    pub fn registration(&self, config: &NormalizerConfig) -> Registration {
        let channels = match self.kind {
            SourceKind::Hardware => config.hardware_channel_range(),
            SourceKind::File => config.file_channel..=config.file_channel,
        };
        Registration::source(self.id.clone(), self.name.clone(), self.kind, channels)
            .map_inputs(|input| input.reverse_pedal = config.reverse_pedal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardware_registration() {
        let config = NormalizerConfig {
            hardware_channels: 4,
            reverse_pedal: true,
            ..Default::default()
        };
        let registration = SourceDescriptor::hardware("kb", "Keyboard").registration(&config);
        let channels: Vec<_> = registration.channels.iter().map(|c| c.number()).collect();
        assert_eq!(vec![1, 2, 3, 4], channels);
        assert_eq!(4 * 128, registration.notes.len());
        assert!(registration.inputs[0].reverse_pedal);
    }

    #[test]
    fn test_file_registration() {
        let config = NormalizerConfig {
            file_channel: 10,
            ..Default::default()
        };
        let registration = SourceDescriptor::file("song.mid", "Song").registration(&config);
        assert_eq!(1, registration.channels.len());
        assert_eq!(10, registration.channels[0].number());
        assert_eq!(SourceKind::File, registration.inputs[0].kind);
    }
}
