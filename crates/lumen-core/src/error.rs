use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Color configuration errors
    #[error("Invalid color configuration: {0}")]
    InvalidColorConfig(String),

    // Sensor decoding errors
    #[error("Unknown detection code: {code}")]
    UnknownDetectionCode { code: u8 },

    #[error("Invalid detection state: {0}")]
    InvalidDetectionState(String),

    // Lifecycle errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Hardware errors
    #[error("Hardware operation failed: {0}")]
    Hardware(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing configuration key: {0}")]
    MissingConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
