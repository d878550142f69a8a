//! Facial symmetry proxy from mirrored cheek points

use crate::config::SymmetryConfig;
use crate::topology::{LEFT_CHEEK, RIGHT_CHEEK};
use crate::types::{clamp01, SymmetryMetric};
use crate::validator::ValidatedFrame;

/// Formula: `clamp01(1 - |left.y - right.y| * gain)`
pub fn analyze(frame: &ValidatedFrame<'_>, config: &SymmetryConfig) -> SymmetryMetric {
    let vertical_diff = (frame.point(LEFT_CHEEK).y - frame.point(RIGHT_CHEEK).y).abs();

    SymmetryMetric {
        vertical_diff,
        symmetry_index: clamp01(1.0 - vertical_diff * config.asymmetry_gain),
    }
}
