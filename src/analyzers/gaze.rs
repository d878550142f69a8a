//! Horizontal gaze offset, direction and stability

use crate::config::GazeConfig;
use crate::topology::{LEFT_EYE_CORNER, RIGHT_EYE_CORNER};
use crate::types::{clamp01, GazeDirection, GazeMetric};
use crate::validator::ValidatedFrame;

/// Compute gaze offset between the eye-corner references
pub fn analyze(frame: &ValidatedFrame<'_>, config: &GazeConfig) -> GazeMetric {
    let dx = frame.point(RIGHT_EYE_CORNER).x - frame.point(LEFT_EYE_CORNER).x;

    GazeMetric {
        dx,
        direction: classify(dx, config.direction_threshold),
        stability: stability(dx, config.stability_gain),
    }
}

/// Strict threshold comparison; values exactly at the threshold are center
pub fn classify(dx: f64, threshold: f64) -> GazeDirection {
    if dx > threshold {
        GazeDirection::Right
    } else if dx < -threshold {
        GazeDirection::Left
    } else {
        GazeDirection::Center
    }
}

/// Formula: `clamp01(1 - |dx| * gain)`
pub fn stability(dx: f64, gain: f64) -> f64 {
    clamp01(1.0 - dx.abs() * gain)
}
