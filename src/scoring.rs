//! Composite scoring
//!
//! Combines per-analyzer outputs into attention, fatigue and the composite
//! cognitive index using fixed linear weights. Every output is clamped to
//! [0, 1]; out-of-range inputs never raise.
//!
//! Weighted model (default):
//! - `attention = clamp01(stability * 0.6 + dilation * 0.4 - blink * 0.2)`
//! - `fatigue = clamp01(blink * 0.5 + (1 - dilation) * 0.4)`
//!
//! Legacy model:
//! - `attention = clamp01(1 - |dx| * 5 - blink * 0.3)`
//! - `fatigue = clamp01(blink * 0.6 + small_iris * 0.4)`
//!
//! Both models share
//! `composite = attention * 0.6 + stability * 0.3 + (1 - fatigue) * 0.1`.

use crate::config::{EngineConfig, ScoringModel, ScoringWeights};
use crate::types::{clamp01, CompositeScores, FrameSignals};

/// Composite scorer for one frame's signals
pub struct CompositeScorer;

impl CompositeScorer {
    /// Score analyzer outputs under the configured model
    pub fn score(signals: &FrameSignals, config: &EngineConfig) -> CompositeScores {
        let weights = &config.weights;
        let stability_index = signals.gaze.stability;

        let (attention_score, fatigue_score) = match config.scoring_model {
            ScoringModel::Weighted => (
                weighted_attention(signals, weights),
                weighted_fatigue(signals, weights),
            ),
            ScoringModel::Legacy => (
                legacy_attention(signals, weights),
                legacy_fatigue(signals, weights, config.iris.small_iris_threshold),
            ),
        };

        let composite_cognitive_index = composite_index(
            attention_score,
            stability_index,
            fatigue_score,
            weights,
        );

        CompositeScores {
            attention_score,
            fatigue_score,
            stability_index,
            composite_cognitive_index,
        }
    }
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

fn weighted_attention(signals: &FrameSignals, w: &ScoringWeights) -> f64 {
    clamp01(
        signals.gaze.stability * w.attention_gaze + signals.iris.pupil_dilation * w.attention_pupil
            - indicator(signals.ocular.blink_detected) * w.attention_blink_penalty,
    )
}

fn weighted_fatigue(signals: &FrameSignals, w: &ScoringWeights) -> f64 {
    clamp01(
        indicator(signals.ocular.blink_detected) * w.fatigue_blink
            + (1.0 - signals.iris.pupil_dilation) * w.fatigue_constriction,
    )
}

fn legacy_attention(signals: &FrameSignals, w: &ScoringWeights) -> f64 {
    clamp01(
        1.0 - signals.gaze.dx.abs() * w.legacy_deviation_gain
            - indicator(signals.ocular.blink_detected) * w.legacy_blink_penalty,
    )
}

fn legacy_fatigue(signals: &FrameSignals, w: &ScoringWeights, small_iris_threshold: f64) -> f64 {
    clamp01(
        indicator(signals.ocular.blink_detected) * w.legacy_fatigue_blink
            + indicator(signals.iris.iris_size < small_iris_threshold) * w.legacy_fatigue_small_iris,
    )
}

/// Blend of attention, stability and inverse fatigue
pub fn composite_index(attention: f64, stability: f64, fatigue: f64, w: &ScoringWeights) -> f64 {
    clamp01(
        attention * w.composite_attention
            + stability * w.composite_stability
            + (1.0 - fatigue) * w.composite_rest,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        EyeState, GazeDirection, GazeMetric, IrisMetric, OcularMetric, SymmetryMetric,
    };

    fn signals(blink: bool, dx: f64, stability: f64, iris_size: f64, dilation: f64) -> FrameSignals {
        let eye = EyeState {
            lid_gap: if blink { 0.003 } else { 0.01 },
            closed: blink,
        };
        FrameSignals {
            ocular: OcularMetric {
                left: eye,
                right: eye,
                blink_detected: blink,
            },
            iris: IrisMetric {
                left_diameter: iris_size,
                right_diameter: iris_size,
                iris_size,
                pupil_dilation: dilation,
            },
            gaze: GazeMetric {
                dx,
                direction: GazeDirection::Center,
                stability,
            },
            symmetry: SymmetryMetric {
                vertical_diff: 0.0,
                symmetry_index: 1.0,
            },
        }
    }

    fn legacy_config() -> EngineConfig {
        EngineConfig {
            scoring_model: ScoringModel::Legacy,
            ..Default::default()
        }
    }

    #[test]
    fn test_weighted_attention_no_blink() {
        let scores = CompositeScorer::score(
            &signals(false, 0.02, 0.92, 0.006, 1.0),
            &EngineConfig::default(),
        );
        // 0.92 * 0.6 + 1.0 * 0.4 = 0.952
        assert!((scores.attention_score - 0.952).abs() < 1e-9);
        // (1 - 1.0) * 0.4 = 0
        assert!(scores.fatigue_score.abs() < 1e-9);
        assert_eq!(scores.stability_index, 0.92);
        // 0.952 * 0.6 + 0.92 * 0.3 + 1.0 * 0.1 = 0.9472
        assert!((scores.composite_cognitive_index - 0.9472).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_blink_penalty() {
        let config = EngineConfig::default();
        let open = CompositeScorer::score(&signals(false, 0.02, 0.92, 0.006, 1.0), &config);
        let blink = CompositeScorer::score(&signals(true, 0.02, 0.92, 0.006, 1.0), &config);

        assert!((open.attention_score - blink.attention_score - 0.2).abs() < 1e-9);
        assert!((blink.fatigue_score - 0.5).abs() < 1e-9);
        assert!(blink.composite_cognitive_index < open.composite_cognitive_index);
    }

    #[test]
    fn test_weighted_constricted_pupil_raises_fatigue() {
        let scores = CompositeScorer::score(
            &signals(true, 0.0, 1.0, 0.003, 0.0),
            &EngineConfig::default(),
        );
        // 0.5 + 0.4 = 0.9
        assert!((scores.fatigue_score - 0.9).abs() < 1e-9);
        // 0.6 - 0.2 = 0.4
        assert!((scores.attention_score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_attention_never_negative() {
        let scores = CompositeScorer::score(
            &signals(true, 0.5, 0.0, 0.0, 0.0),
            &EngineConfig::default(),
        );
        assert_eq!(scores.attention_score, 0.0);
        assert!(scores.composite_cognitive_index >= 0.0);
    }

    #[test]
    fn test_legacy_model() {
        let config = legacy_config();

        let open = CompositeScorer::score(&signals(false, 0.02, 0.92, 0.006, 1.0), &config);
        // 1 - 0.02 * 5 = 0.9
        assert!((open.attention_score - 0.9).abs() < 1e-9);
        assert_eq!(open.fatigue_score, 0.0);

        let tired = CompositeScorer::score(&signals(true, 0.02, 0.92, 0.003, 0.0), &config);
        // 0.9 - 0.3 = 0.6, fatigue 0.6 + 0.4 = 1.0
        assert!((tired.attention_score - 0.6).abs() < 1e-9);
        assert!((tired.fatigue_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_composite_index_weights() {
        let w = ScoringWeights::default();
        assert!((composite_index(1.0, 1.0, 0.0, &w) - 1.0).abs() < 1e-9);
        assert_eq!(composite_index(0.0, 0.0, 1.0, &w), 0.0);
        assert!((composite_index(0.5, 0.5, 0.5, &w) - 0.5).abs() < 1e-9);
    }
}
