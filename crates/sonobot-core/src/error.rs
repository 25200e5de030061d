use thiserror::Error;

/// Top-level error type for sonobot.
#[derive(Debug, Error)]
pub enum SonobotError {
    /// Error from the playback device.
    #[error("device error: {0}")]
    Device(String),

    /// Error from the music catalog.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
