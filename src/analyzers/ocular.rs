//! Eyelid gap and blink detection

use crate::config::{BlinkRule, OcularConfig};
use crate::topology::{
    LEFT_EYE_LOWER_LID, LEFT_EYE_UPPER_LID, RIGHT_EYE_LOWER_LID, RIGHT_EYE_UPPER_LID,
};
use crate::types::{EyeState, Landmark, OcularMetric};
use crate::validator::ValidatedFrame;

/// Compute per-eye lid gaps and the frame-level blink decision
pub fn analyze(frame: &ValidatedFrame<'_>, config: &OcularConfig) -> OcularMetric {
    let threshold = config.blink_gap_threshold;

    let left = eye_state(
        frame.point(LEFT_EYE_UPPER_LID),
        frame.point(LEFT_EYE_LOWER_LID),
        threshold,
    );
    let right = eye_state(
        frame.point(RIGHT_EYE_UPPER_LID),
        frame.point(RIGHT_EYE_LOWER_LID),
        threshold,
    );

    let blink_detected = match config.blink_rule {
        BlinkRule::AnyEye => left.closed || right.closed,
        BlinkRule::Average => (left.lid_gap + right.lid_gap) / 2.0 < threshold,
    };

    OcularMetric {
        left,
        right,
        blink_detected,
    }
}

/// Vertical lid gap: `|upper.y - lower.y|`
fn eye_state(upper: &Landmark, lower: &Landmark, threshold: f64) -> EyeState {
    let lid_gap = (upper.y - lower.y).abs();
    EyeState {
        lid_gap,
        closed: lid_gap < threshold,
    }
}
