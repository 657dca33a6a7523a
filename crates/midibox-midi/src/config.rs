use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Settings of the event normalizer and source registration.
///
/// Every field has a default, so a JSON document only needs the fields it changes:
///
/// ```
/// # use midibox_midi::NormalizerConfig;
/// let config = NormalizerConfig::from_json(r#"{ "pedal_threshold": 1 }"#).unwrap();
/// assert_eq!(1, config.pedal_threshold);
/// assert_eq!(16, config.hardware_channels);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerConfig {
    /// Sustain controller values at or above this count as pedal down.
    pub pedal_threshold: u8,
    /// Hardware sources register channels `1..=hardware_channels`.
    pub hardware_channels: u8,
    /// The single channel file playback is mapped onto.
    pub file_channel: u8,
    /// Initial pedal polarity of registered inputs.
    pub reverse_pedal: bool,
    /// Controllers that silence every note of a channel.
    pub all_notes_off_controllers: Vec<u8>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            pedal_threshold: 64,
            hardware_channels: 16,
            file_channel: 1,
            reverse_pedal: false,
            all_notes_off_controllers: vec![120, 123],
        }
    }
}

const MIDI_CHANNELS: RangeInclusive<u8> = 1..=16;

impl NormalizerConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("hardware_channels", self.hardware_channels),
            ("file_channel", self.file_channel),
        ] {
            if !MIDI_CHANNELS.contains(&value) {
                return Err(ConfigError::Channel { field, value });
            }
        }
        Ok(())
    }

    /// Channel numbers registered for a hardware source.
    pub fn hardware_channel_range(&self) -> RangeInclusive<u8> {
        1..=self.hardware_channels
    }

    pub fn is_pedal_down(&self, value: u8) -> bool {
        value >= self.pedal_threshold
    }

    pub fn is_all_notes_off(&self, controller: u8) -> bool {
        self.all_notes_off_controllers.contains(&controller)
    }
}
