//! Synheart Focus - On-device cognitive metrics from face-mesh landmarks
//!
//! Focus turns each frame of a refined 478-point face mesh into attention,
//! fatigue and stability signals through a deterministic pipeline:
//! validation → ocular / iris / gaze / symmetry analysis → composite scoring
//! → rolling history smoothing.
//!
//! ## Modules
//!
//! - **Pipeline**: [`TrackingSession`] for per-stream processing, [`compute_frame_metrics`] for one-shot use
//! - **Summary / Encoder**: Session aggregates and speech feedback request payloads
//! - **FFI**: C bindings for host applications

pub mod analyzers;
pub mod config;
pub mod encoder;
pub mod error;
pub mod history;
pub mod pipeline;
pub mod schema;
pub mod scoring;
pub mod summary;
pub mod topology;
pub mod types;
pub mod validator;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

#[cfg(test)]
mod test_support;

pub use config::EngineConfig;
pub use error::{ComputeError, FrameError};
pub use pipeline::{compute_frame_metrics, SharedSession, TrackingSession};
pub use summary::SessionSummary;
pub use types::{FrameMetrics, GazeDirection, Landmark};

/// Focus version embedded in feedback payloads
pub const FOCUS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for feedback payloads
pub const PRODUCER_NAME: &str = "synheart-focus";
