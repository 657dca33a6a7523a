//! # MIDI event normalization
//!
//! Maps live device messages and Standard MIDI File tracks onto the canonical
//! [`MidiEvent`](midibox_store::MidiEvent) consumed by
//! [`MidiListener`](midibox_store::MidiListener), and describes the entities a
//! new source registers.

pub mod config;
pub mod errors;
pub mod file;
pub mod live;
pub mod source;

pub use config::NormalizerConfig;
pub use errors::{ConfigError, NormalizeError};
pub use file::{file_event, FilePlayback};
pub use live::LiveNormalizer;
pub use source::SourceDescriptor;
