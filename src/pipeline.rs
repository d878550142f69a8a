//! Pipeline orchestration
//!
//! This module provides the public API for Synheart Focus.
//! It runs one landmark frame through every stage and returns the metrics record.

use crate::analyzers::FrameAnalyzer;
use crate::config::EngineConfig;
use crate::error::ComputeError;
use crate::history::RollingHistory;
use crate::schema::parse_frame_json;
use crate::scoring::CompositeScorer;
use crate::summary::{SessionAggregator, SessionSummary};
use crate::types::{FrameMetrics, Landmark};
use crate::validator::validate_frame;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Compute metrics for a single frame with no prior history (stateless, one-shot).
///
/// Blink frequency and focus consistency reflect this frame alone.
/// Returns `None` when the frame is invalid.
///
/// # Example
/// ```ignore
/// let metrics = compute_frame_metrics(&landmarks, &EngineConfig::default());
/// ```
pub fn compute_frame_metrics(landmarks: &[Landmark], config: &EngineConfig) -> Option<FrameMetrics> {
    let mut history = RollingHistory::new(1);
    run_stages(landmarks, config, &mut history).ok()
}

/// Run the pipeline stages against a caller-owned history.
///
/// Pipeline stages:
/// 1. Validator - Reject short or non-finite frames
/// 2. FrameAnalyzer - Ocular, iris, gaze and symmetry metrics
/// 3. CompositeScorer - Attention, fatigue and composite index
/// 4. RollingHistory - Blink frequency and focus consistency
///
/// History is only touched after validation succeeds.
fn run_stages(
    landmarks: &[Landmark],
    config: &EngineConfig,
    history: &mut RollingHistory,
) -> Result<FrameMetrics, ComputeError> {
    let frame = validate_frame(landmarks)?;
    let signals = FrameAnalyzer::analyze(&frame, config);
    let scores = CompositeScorer::score(&signals, config);
    let stats = history.record(signals.ocular.blink_detected, scores.attention_score);

    trace!(
        attention = scores.attention_score,
        fatigue = scores.fatigue_score,
        composite = scores.composite_cognitive_index,
        blink = signals.ocular.blink_detected,
        gaze = %signals.gaze.direction,
        "frame scored"
    );

    Ok(FrameMetrics::assemble(&signals, &scores, &stats))
}

/// Stateful tracking session owning the rolling history.
///
/// One session corresponds to one camera/tracking stream. Frames must be fed
/// in order; wrap in [`SharedSession`] when several threads produce frames.
#[derive(Debug, Clone)]
pub struct TrackingSession {
    session_id: String,
    config: EngineConfig,
    history: RollingHistory,
    aggregator: SessionAggregator,
}

impl Default for TrackingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingSession {
    /// Create a new session with default settings
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    /// Create a session with a validated configuration
    pub fn with_config(config: EngineConfig) -> Result<Self, ComputeError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let session_id = Uuid::new_v4().to_string();
        Self {
            aggregator: SessionAggregator::new(session_id.clone()),
            history: RollingHistory::new(config.history_capacity),
            session_id,
            config,
        }
    }

    /// Process one frame; `None` when the frame is invalid.
    ///
    /// Safe to call on every camera tick: invalid frames never raise and
    /// never touch the history.
    pub fn process(&mut self, landmarks: &[Landmark]) -> Option<FrameMetrics> {
        match self.try_process(landmarks) {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                debug!(session_id = %self.session_id, error = %e, "frame rejected");
                None
            }
        }
    }

    /// Process one frame, surfacing why an invalid frame was rejected
    pub fn try_process(&mut self, landmarks: &[Landmark]) -> Result<FrameMetrics, ComputeError> {
        self.try_process_at(landmarks, Utc::now())
    }

    /// Process one frame observed at `observed_at`
    pub fn try_process_at(
        &mut self,
        landmarks: &[Landmark],
        observed_at: DateTime<Utc>,
    ) -> Result<FrameMetrics, ComputeError> {
        let metrics = run_stages(landmarks, &self.config, &mut self.history)?;
        self.aggregator.add(&metrics, observed_at);
        Ok(metrics)
    }

    /// Process a frame given as JSON (bare landmark array or frame record).
    ///
    /// Malformed JSON is an error; a well-formed but invalid frame is `Ok(None)`.
    pub fn process_json(&mut self, frame_json: &str) -> Result<Option<FrameMetrics>, ComputeError> {
        let record = parse_frame_json(frame_json)?;
        let observed_at = record.timestamp.unwrap_or_else(Utc::now);
        match self.try_process_at(&record.landmarks, observed_at) {
            Ok(metrics) => Ok(Some(metrics)),
            Err(ComputeError::InvalidFrame(e)) => {
                debug!(session_id = %self.session_id, error = %e, "frame rejected");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn history(&self) -> &RollingHistory {
        &self.history
    }

    /// Summary of every frame processed so far; `None` before the first frame
    pub fn summary(&self) -> Option<SessionSummary> {
        self.aggregator.finish()
    }

    /// Clear the rolling history and session aggregates
    pub fn reset(&mut self) {
        self.history.clear();
        self.aggregator = SessionAggregator::new(self.session_id.clone());
    }

    /// Save rolling history to JSON for persistence
    pub fn save_history(&self) -> Result<String, ComputeError> {
        self.history
            .to_json()
            .map_err(|e| ComputeError::EncodingError(e.to_string()))
    }

    /// Load rolling history from JSON
    ///
    /// The session's configured capacity wins over the stored one; only the
    /// newest frames that fit are kept.
    pub fn load_history(&mut self, json: &str) -> Result<(), ComputeError> {
        let loaded = match RollingHistory::from_json(json) {
            Ok(history) => history,
            Err(ComputeError::JsonError(e)) => return Err(ComputeError::ParseError(e.to_string())),
            Err(e) => return Err(e),
        };
        self.history = loaded.with_capacity(self.config.history_capacity);
        Ok(())
    }
}

/// Thread-safe handle to a [`TrackingSession`].
///
/// The history read-modify-write happens under one lock, so concurrent
/// producers never interleave updates.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<TrackingSession>>,
}

impl SharedSession {
    pub fn new(session: TrackingSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Process one frame under the session lock
    pub fn process(&self, landmarks: &[Landmark]) -> Option<FrameMetrics> {
        self.lock().process(landmarks)
    }

    /// Run `f` with exclusive access to the session
    pub fn with_session<R>(&self, f: impl FnOnce(&mut TrackingSession) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, TrackingSession> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("tracking session lock was poisoned; continuing with last state");
                poisoned.into_inner()
            }
        }
    }
}
