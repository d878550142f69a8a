//! Engine configuration
//!
//! Every threshold, gain and weight the analyzers and scorer use lives here
//! with its default. Sections are `#[serde(default)]` so a partial JSON file
//! only overrides the values it names.

use crate::error::ComputeError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default rolling history capacity in frames
pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

/// Largest accepted rolling history capacity in frames
pub const MAX_HISTORY_CAPACITY: usize = 10_000;

/// How the two per-eye lid gaps combine into one blink decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkRule {
    /// Blink when either eye's gap is below threshold
    AnyEye,
    /// Blink when the mean of both gaps is below threshold
    Average,
}

/// Which formula set the composite scorer applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringModel {
    /// Gaze + pupil + blink weighted attention, blink + constriction fatigue
    Weighted,
    /// Gaze deviation attention and blink / small-iris fatigue, no pupil term
    Legacy,
}

/// Ocular analyzer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcularConfig {
    /// Lid gap below which an eye counts as closed
    pub blink_gap_threshold: f64,
    pub blink_rule: BlinkRule,
}

impl Default for OcularConfig {
    fn default() -> Self {
        Self {
            blink_gap_threshold: 0.005,
            blink_rule: BlinkRule::AnyEye,
        }
    }
}

/// Iris analyzer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrisConfig {
    /// Iris size mapped to zero dilation
    pub dilation_baseline: f64,
    /// Scale from iris size above baseline to dilation
    pub dilation_scale: f64,
    /// Iris size below which the legacy fatigue term fires
    pub small_iris_threshold: f64,
}

impl Default for IrisConfig {
    fn default() -> Self {
        Self {
            dilation_baseline: 0.0035,
            dilation_scale: 400.0,
            small_iris_threshold: 0.004,
        }
    }
}

/// Gaze analyzer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    /// |dx| beyond which gaze is classified left/right (strict)
    pub direction_threshold: f64,
    /// Stability falls by this much per unit of |dx|
    pub stability_gain: f64,
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            direction_threshold: 0.02,
            stability_gain: 4.0,
        }
    }
}

/// Symmetry analyzer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymmetryConfig {
    /// Symmetry falls by this much per unit of vertical difference
    pub asymmetry_gain: f64,
}

impl Default for SymmetryConfig {
    fn default() -> Self {
        Self {
            asymmetry_gain: 20.0,
        }
    }
}

/// Fixed linear weights of the composite scorer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub attention_gaze: f64,
    pub attention_pupil: f64,
    pub attention_blink_penalty: f64,
    pub fatigue_blink: f64,
    pub fatigue_constriction: f64,
    pub composite_attention: f64,
    pub composite_stability: f64,
    pub composite_rest: f64,
    pub legacy_deviation_gain: f64,
    pub legacy_blink_penalty: f64,
    pub legacy_fatigue_blink: f64,
    pub legacy_fatigue_small_iris: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            attention_gaze: 0.6,
            attention_pupil: 0.4,
            attention_blink_penalty: 0.2,
            fatigue_blink: 0.5,
            fatigue_constriction: 0.4,
            composite_attention: 0.6,
            composite_stability: 0.3,
            composite_rest: 0.1,
            legacy_deviation_gain: 5.0,
            legacy_blink_penalty: 0.3,
            legacy_fatigue_blink: 0.6,
            legacy_fatigue_small_iris: 0.4,
        }
    }
}

impl ScoringWeights {
    fn named(&self) -> [(&'static str, f64); 12] {
        [
            ("attention_gaze", self.attention_gaze),
            ("attention_pupil", self.attention_pupil),
            ("attention_blink_penalty", self.attention_blink_penalty),
            ("fatigue_blink", self.fatigue_blink),
            ("fatigue_constriction", self.fatigue_constriction),
            ("composite_attention", self.composite_attention),
            ("composite_stability", self.composite_stability),
            ("composite_rest", self.composite_rest),
            ("legacy_deviation_gain", self.legacy_deviation_gain),
            ("legacy_blink_penalty", self.legacy_blink_penalty),
            ("legacy_fatigue_blink", self.legacy_fatigue_blink),
            ("legacy_fatigue_small_iris", self.legacy_fatigue_small_iris),
        ]
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ocular: OcularConfig,
    pub iris: IrisConfig,
    pub gaze: GazeConfig,
    pub symmetry: SymmetryConfig,
    pub weights: ScoringWeights,
    pub scoring_model: ScoringModel,
    /// Frames kept by the rolling history
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ocular: OcularConfig::default(),
            iris: IrisConfig::default(),
            gaze: GazeConfig::default(),
            symmetry: SymmetryConfig::default(),
            weights: ScoringWeights::default(),
            scoring_model: ScoringModel::Weighted,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ComputeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize configuration to pretty JSON
    pub fn to_json(&self) -> Result<String, ComputeError> {
        serde_json::to_string_pretty(self).map_err(ComputeError::JsonError)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), ComputeError> {
        let positive = [
            ("ocular.blink_gap_threshold", self.ocular.blink_gap_threshold),
            ("iris.dilation_scale", self.iris.dilation_scale),
            ("iris.small_iris_threshold", self.iris.small_iris_threshold),
            ("gaze.direction_threshold", self.gaze.direction_threshold),
            ("gaze.stability_gain", self.gaze.stability_gain),
            ("symmetry.asymmetry_gain", self.symmetry.asymmetry_gain),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ComputeError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if !(self.iris.dilation_baseline.is_finite() && self.iris.dilation_baseline >= 0.0) {
            return Err(ComputeError::InvalidConfig(format!(
                "iris.dilation_baseline must be non-negative, got {}",
                self.iris.dilation_baseline
            )));
        }

        for (name, value) in self.weights.named() {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ComputeError::InvalidConfig(format!(
                    "weights.{name} must be non-negative, got {value}"
                )));
            }
        }

        if !(1..=MAX_HISTORY_CAPACITY).contains(&self.history_capacity) {
            return Err(ComputeError::InvalidConfig(format!(
                "history_capacity must be between 1 and {MAX_HISTORY_CAPACITY}, got {}",
                self.history_capacity
            )));
        }

        Ok(())
    }
}
