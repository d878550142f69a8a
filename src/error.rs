//! Error types for Synheart Focus

use thiserror::Error;

/// Reasons a landmark frame cannot be analyzed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("Frame has {actual} landmarks, at least {required} required")]
    TooFewLandmarks { required: usize, actual: usize },

    #[error("Landmark {index} has a non-finite coordinate")]
    NonFiniteLandmark { index: usize },
}

/// Errors that can occur during computation
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Invalid landmark frame: {0}")]
    InvalidFrame(#[from] FrameError),

    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
