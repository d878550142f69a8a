//! Session summaries
//!
//! Aggregates every processed frame of a tracking session into averages and
//! coarse trend labels, and renders the short feedback text sent to speech
//! services.

use crate::types::FrameMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mean fatigue above which the trend is reported as increasing
const FATIGUE_INCREASING: f64 = 0.5;
/// Mean fatigue above which the trend is reported as stable
const FATIGUE_STABLE: f64 = 0.3;
const STRESS_HIGH: f64 = 0.5;
const STRESS_MODERATE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatigueTrend {
    Increasing,
    Stable,
    Decreasing,
}

impl FatigueTrend {
    pub fn from_mean(mean_fatigue: f64) -> Self {
        if mean_fatigue > FATIGUE_INCREASING {
            FatigueTrend::Increasing
        } else if mean_fatigue > FATIGUE_STABLE {
            FatigueTrend::Stable
        } else {
            FatigueTrend::Decreasing
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    High,
    Moderate,
    Low,
}

impl StressLevel {
    pub fn from_mean(mean_stress: f64) -> Self {
        if mean_stress > STRESS_HIGH {
            StressLevel::High
        } else if mean_stress > STRESS_MODERATE {
            StressLevel::Moderate
        } else {
            StressLevel::Low
        }
    }
}

/// Aggregate view of one tracking session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Number of valid frames aggregated
    pub frames: u32,
    pub mean_attention: f64,
    pub attention_peak: f64,
    pub mean_fatigue: f64,
    pub mean_stability: f64,
    pub mean_composite_index: f64,
    /// Fraction of frames with a blink
    pub blink_rate: f64,
    /// Mean facial asymmetry (1 - symmetry index)
    pub mean_stress: f64,
    pub fatigue_trend: FatigueTrend,
    pub stress_level: StressLevel,
}

/// Running sums for a session summary
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAggregator {
    session_id: String,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    frames: u32,
    blinks: u32,
    attention_sum: f64,
    attention_peak: f64,
    fatigue_sum: f64,
    stability_sum: f64,
    composite_sum: f64,
    stress_sum: f64,
}

impl SessionAggregator {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            started_at: None,
            ended_at: None,
            frames: 0,
            blinks: 0,
            attention_sum: 0.0,
            attention_peak: 0.0,
            fatigue_sum: 0.0,
            stability_sum: 0.0,
            composite_sum: 0.0,
            stress_sum: 0.0,
        }
    }

    /// Add one frame's metrics observed at `at`
    pub fn add(&mut self, metrics: &FrameMetrics, at: DateTime<Utc>) {
        self.started_at = Some(self.started_at.map_or(at, |s| s.min(at)));
        self.ended_at = Some(self.ended_at.map_or(at, |e| e.max(at)));

        self.frames = self.frames.saturating_add(1);
        if metrics.blink_detected {
            self.blinks = self.blinks.saturating_add(1);
        }
        self.attention_sum += metrics.attention_score;
        self.attention_peak = self.attention_peak.max(metrics.attention_score);
        self.fatigue_sum += metrics.fatigue_score;
        self.stability_sum += metrics.stability_index;
        self.composite_sum += metrics.composite_cognitive_index;
        self.stress_sum += 1.0 - metrics.symmetry_index;
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Build the summary; `None` when no frames were added
    pub fn finish(&self) -> Option<SessionSummary> {
        let (started_at, ended_at) = (self.started_at?, self.ended_at?);
        if self.frames == 0 {
            return None;
        }
        let n = self.frames as f64;
        let mean_fatigue = self.fatigue_sum / n;
        let mean_stress = self.stress_sum / n;

        Some(SessionSummary {
            session_id: self.session_id.clone(),
            started_at,
            ended_at,
            frames: self.frames,
            mean_attention: self.attention_sum / n,
            attention_peak: self.attention_peak,
            mean_fatigue,
            mean_stability: self.stability_sum / n,
            mean_composite_index: self.composite_sum / n,
            blink_rate: self.blinks as f64 / n,
            mean_stress,
            fatigue_trend: FatigueTrend::from_mean(mean_fatigue),
            stress_level: StressLevel::from_mean(mean_stress),
        })
    }
}

fn percent(value: f64) -> f64 {
    (value * 100.0).round()
}

/// One-line spoken summary of a frame's metrics
///
/// e.g. `Attention: 95%, Fatigue: 0%, Stability: 92%, Direction: CENTER, CCI: 95%`
pub fn feedback_text(metrics: &FrameMetrics) -> String {
    format!(
        "Attention: {}%, Fatigue: {}%, Stability: {}%, Direction: {}, CCI: {}%",
        percent(metrics.attention_score),
        percent(metrics.fatigue_score),
        percent(metrics.stability_index),
        metrics.gaze_direction.as_str().to_uppercase(),
        percent(metrics.composite_cognitive_index),
    )
}
