//! Rolling history
//!
//! This module keeps bounded per-frame history of blink flags and attention
//! scores. The short-window averages it produces (blink frequency, focus
//! consistency) smooth the per-frame scores over time.

use crate::config::{DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY};
use crate::error::ComputeError;
use crate::types::HistoryStats;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Fixed-capacity FIFO history of blink flags and attention scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingHistory {
    /// Blink flags as 0.0 / 1.0
    blink_values: VecDeque<f64>,
    /// Attention scores (0-1)
    attention_values: VecDeque<f64>,
    /// Maximum number of frames kept
    capacity: usize,
}

impl Default for RollingHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl RollingHistory {
    /// Create an empty history holding at most `capacity` frames
    ///
    /// `capacity` is clamped to `1..=MAX_HISTORY_CAPACITY`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_HISTORY_CAPACITY);
        let prealloc = capacity.min(DEFAULT_HISTORY_CAPACITY);
        Self {
            blink_values: VecDeque::with_capacity(prealloc),
            attention_values: VecDeque::with_capacity(prealloc),
            capacity,
        }
    }

    /// Re-bound this history to `capacity`, keeping the newest frames
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.clamp(1, MAX_HISTORY_CAPACITY);
        self.trim();
        self
    }

    fn trim(&mut self) {
        while self.blink_values.len() > self.capacity {
            self.blink_values.pop_front();
        }
        while self.attention_values.len() > self.capacity {
            self.attention_values.pop_front();
        }
    }

    /// Append the current frame's values and return the updated statistics
    pub fn record(&mut self, blink_detected: bool, attention_score: f64) -> HistoryStats {
        self.blink_values
            .push_back(if blink_detected { 1.0 } else { 0.0 });
        self.attention_values.push_back(attention_score);

        let evicted = self.blink_values.len().saturating_sub(self.capacity);
        self.trim();
        if evicted > 0 {
            debug!(evicted, capacity = self.capacity, "rolling history evicted oldest frames");
        }

        self.stats()
    }

    /// Current statistics without modifying the history
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            blink_frequency: Self::mean(&self.blink_values),
            focus_consistency: Self::mean(&self.attention_values),
            frames_in_window: u32::try_from(self.blink_values.len()).unwrap_or(u32::MAX),
        }
    }

    /// Number of frames currently held
    pub fn len(&self) -> usize {
        self.blink_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blink_values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Blink flags, oldest first
    pub fn blink_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.blink_values.iter().copied()
    }

    /// Attention scores, oldest first
    pub fn attention_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.attention_values.iter().copied()
    }

    /// Drop all recorded frames
    pub fn clear(&mut self) {
        self.blink_values.clear();
        self.attention_values.clear();
    }

    /// Mean of a queue; 0 when empty
    fn mean(queue: &VecDeque<f64>) -> f64 {
        if queue.is_empty() {
            return 0.0;
        }
        let sum: f64 = queue.iter().sum();
        sum / queue.len() as f64
    }

    /// Load history from JSON
    ///
    /// Both queues must have the same length, blink flags must be 0 or 1 and
    /// attention scores must lie in [0, 1]. Queues longer than the stored
    /// capacity keep their newest frames.
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let mut history: Self = serde_json::from_str(json)?;
        history.check_values()?;
        history.capacity = history.capacity.clamp(1, MAX_HISTORY_CAPACITY);
        history.trim();
        Ok(history)
    }

    fn check_values(&self) -> Result<(), ComputeError> {
        if self.blink_values.len() != self.attention_values.len() {
            return Err(ComputeError::ParseError(format!(
                "history queues differ in length: {} blink values, {} attention values",
                self.blink_values.len(),
                self.attention_values.len()
            )));
        }
        if let Some(v) = self.blink_values.iter().find(|&&v| v != 0.0 && v != 1.0) {
            return Err(ComputeError::ParseError(format!(
                "blink value must be 0 or 1, got {v}"
            )));
        }
        if let Some(v) = self
            .attention_values
            .iter()
            .find(|&&v| !(0.0..=1.0).contains(&v))
        {
            return Err(ComputeError::ParseError(format!(
                "attention value must lie in [0, 1], got {v}"
            )));
        }
        Ok(())
    }

    /// Serialize history to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
