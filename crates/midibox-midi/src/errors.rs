use thiserror::Error;

/// Error raised when raw MIDI data cannot be turned into canonical events.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Cannot parse MIDI data: {0}")]
    Parse(#[from] midly::Error),
}

/// Error raised when loading a [`NormalizerConfig`](crate::NormalizerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be a MIDI channel in 1..=16, got {value}")]
    Channel { field: &'static str, value: u8 },
}
