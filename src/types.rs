//! Core types for the Synheart Focus pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: landmark frames, per-analyzer metrics, composite scores, and the
//! frame metrics record handed back to the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single face landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position (0-1, left to right)
    pub x: f64,
    /// Vertical position (0-1, top to bottom)
    pub y: f64,
    /// Relative depth; may be small or negative
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// True when every coordinate is a finite number
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Euclidean distance to `other` in the image plane
    pub fn planar_distance(&self, other: &Landmark) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One detector output: an ordered, fixed-topology set of landmarks
pub type LandmarkFrame = Vec<Landmark>;

/// Categorical horizontal gaze direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GazeDirection {
    Left,
    Center,
    Right,
}

impl GazeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            GazeDirection::Left => "left",
            GazeDirection::Center => "center",
            GazeDirection::Right => "right",
        }
    }
}

impl fmt::Display for GazeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Eyelid state for one eye
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeState {
    /// Vertical distance between upper and lower lid
    pub lid_gap: f64,
    /// Gap is below the blink threshold
    pub closed: bool,
}

/// Ocular analyzer output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OcularMetric {
    pub left: EyeState,
    pub right: EyeState,
    /// Frame-level blink decision
    pub blink_detected: bool,
}

/// Iris analyzer output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrisMetric {
    /// Left iris boundary span
    pub left_diameter: f64,
    /// Right iris boundary span
    pub right_diameter: f64,
    /// Raw iris size used downstream (left iris span)
    pub iris_size: f64,
    /// Normalized pupil dilation proxy (0-1)
    pub pupil_dilation: f64,
}

/// Gaze analyzer output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeMetric {
    /// Horizontal displacement between the eye-corner references
    pub dx: f64,
    pub direction: GazeDirection,
    /// Inverse horizontal deviation (0-1, higher = steadier)
    pub stability: f64,
}

/// Symmetry analyzer output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymmetryMetric {
    /// Absolute vertical difference between mirrored points
    pub vertical_diff: f64,
    /// Symmetry index (0-1, lower = more asymmetric)
    pub symmetry_index: f64,
}

/// All per-frame analyzer outputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSignals {
    pub ocular: OcularMetric,
    pub iris: IrisMetric,
    pub gaze: GazeMetric,
    pub symmetry: SymmetryMetric,
}

/// Composite scorer output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeScores {
    pub attention_score: f64,
    pub fatigue_score: f64,
    pub stability_index: f64,
    pub composite_cognitive_index: f64,
}

/// Rolling statistics from the temporal smoother
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Share of recent frames with a blink (0-1)
    pub blink_frequency: f64,
    /// Mean attention over recent frames (0-1)
    pub focus_consistency: f64,
    /// Number of frames currently in the window
    pub frames_in_window: u32,
}

/// Metrics record produced for each valid frame
///
/// Serialized with camelCase names, the field set rendering and feedback
/// consumers read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMetrics {
    pub gaze_direction: GazeDirection,
    pub blink_detected: bool,
    /// Raw iris span in normalized image units
    pub iris_size: f64,
    pub pupil_dilation: f64,
    pub gaze_stability: f64,
    pub stability_index: f64,
    pub symmetry_index: f64,
    pub attention_score: f64,
    pub fatigue_score: f64,
    pub blink_frequency: f64,
    pub focus_consistency: f64,
    pub composite_cognitive_index: f64,
}

impl FrameMetrics {
    /// Assemble the output record from the stage outputs
    pub fn assemble(signals: &FrameSignals, scores: &CompositeScores, stats: &HistoryStats) -> Self {
        Self {
            gaze_direction: signals.gaze.direction,
            blink_detected: signals.ocular.blink_detected,
            iris_size: signals.iris.iris_size,
            pupil_dilation: signals.iris.pupil_dilation,
            gaze_stability: signals.gaze.stability,
            stability_index: scores.stability_index,
            symmetry_index: signals.symmetry.symmetry_index,
            attention_score: scores.attention_score,
            fatigue_score: scores.fatigue_score,
            blink_frequency: stats.blink_frequency,
            focus_consistency: stats.focus_consistency,
            composite_cognitive_index: scores.composite_cognitive_index,
        }
    }

    /// Every bounded score field, for range checks
    pub fn unit_scores(&self) -> [f64; 9] {
        [
            self.pupil_dilation,
            self.gaze_stability,
            self.stability_index,
            self.symmetry_index,
            self.attention_score,
            self.fatigue_score,
            self.blink_frequency,
            self.focus_consistency,
            self.composite_cognitive_index,
        ]
    }
}

/// Clamp to [0, 1], mapping NaN to 0
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
