//! Feedback encoding
//!
//! This module packages frame metrics into the JSON request body a
//! text-to-speech feedback service consumes, and paces how often such
//! requests are due. Sending the request is left to the host.

use crate::error::ComputeError;
use crate::summary::feedback_text;
use crate::types::FrameMetrics;
use crate::{FOCUS_VERSION, PRODUCER_NAME};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Language used when no locale is available
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default spacing between feedback requests
pub const DEFAULT_FEEDBACK_INTERVAL_SECS: i64 = 10;

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Request body for the speech feedback service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    /// Human-readable metrics line to be spoken
    pub summary: String,
    /// Primary language subtag, e.g. `en`
    pub language: String,
    pub metrics: FrameMetrics,
    pub producer: FeedbackProducer,
    pub computed_at_utc: String,
}

/// Primary language subtag of a BCP 47 locale, lowercased
///
/// `en-US` and `pt_BR` map to `en` and `pt`; an empty locale maps to `en`.
pub fn language_code(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_lowercase()
}

/// Encoder for feedback request payloads
pub struct FeedbackEncoder {
    instance_id: String,
}

impl Default for FeedbackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Build the feedback request for `metrics` in the caller's locale
    pub fn encode(&self, metrics: &FrameMetrics, locale: &str) -> FeedbackRequest {
        FeedbackRequest {
            summary: feedback_text(metrics),
            language: language_code(locale),
            metrics: *metrics,
            producer: FeedbackProducer {
                name: PRODUCER_NAME.to_string(),
                version: FOCUS_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(&self, metrics: &FrameMetrics, locale: &str) -> Result<String, ComputeError> {
        let request = self.encode(metrics, locale);
        serde_json::to_string(&request).map_err(ComputeError::JsonError)
    }
}

/// Tracks when the next feedback request is due
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackCadence {
    interval: Duration,
    last_sent: Option<DateTime<Utc>>,
}

impl Default for FeedbackCadence {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_FEEDBACK_INTERVAL_SECS))
    }
}

impl FeedbackCadence {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sent: None,
        }
    }

    /// True when nothing was sent yet or the interval has elapsed
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.last_sent
            .map_or(true, |sent| now - sent >= self.interval)
    }

    pub fn mark_sent(&mut self, now: DateTime<Utc>) {
        self.last_sent = Some(now);
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
