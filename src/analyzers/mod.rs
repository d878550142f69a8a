//! Per-frame analyzers
//!
//! Each analyzer reads a handful of fixed landmarks from a validated frame and
//! reduces them to one small metric. They hold no state.

pub mod gaze;
pub mod iris;
pub mod ocular;
pub mod symmetry;

use crate::config::EngineConfig;
use crate::types::FrameSignals;
use crate::validator::ValidatedFrame;

/// Runs every analyzer over one frame
pub struct FrameAnalyzer;

impl FrameAnalyzer {
    /// Analyze a validated frame
    pub fn analyze(frame: &ValidatedFrame<'_>, config: &EngineConfig) -> FrameSignals {
        FrameSignals {
            ocular: ocular::analyze(frame, &config.ocular),
            iris: iris::analyze(frame, &config.iris),
            gaze: gaze::analyze(frame, &config.gaze),
            symmetry: symmetry::analyze(frame, &config.symmetry),
        }
    }
}
