//! Iris size and pupil dilation proxy

use crate::config::IrisConfig;
use crate::topology::{LEFT_IRIS_START, RIGHT_IRIS_START};
use crate::types::{clamp01, IrisMetric, Landmark};
use crate::validator::ValidatedFrame;

/// Measure both iris spans and derive the dilation proxy from the left one
pub fn analyze(frame: &ValidatedFrame<'_>, config: &IrisConfig) -> IrisMetric {
    let left_diameter = boundary_span(frame.iris(LEFT_IRIS_START));
    let right_diameter = boundary_span(frame.iris(RIGHT_IRIS_START));
    let iris_size = left_diameter;

    IrisMetric {
        left_diameter,
        right_diameter,
        iris_size,
        pupil_dilation: pupil_dilation(iris_size, config),
    }
}

/// Distance between the first and third point of an iris block
fn boundary_span(block: &[Landmark]) -> f64 {
    block[0].planar_distance(&block[2])
}

/// Formula: `clamp01((iris_size - baseline) * scale)`
///
/// Degenerate spans at or below the baseline map to 0.
pub fn pupil_dilation(iris_size: f64, config: &IrisConfig) -> f64 {
    clamp01((iris_size - config.dilation_baseline) * config.dilation_scale)
}
