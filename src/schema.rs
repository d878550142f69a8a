//! Frame input records
//!
//! Landmark frames reach the engine either as a bare landmark array or as a
//! record carrying the capture timestamp and an optional session tag. Streams
//! of frames are read as NDJSON (one frame per line) or as a JSON array.

use crate::error::ComputeError;
use crate::types::Landmark;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One captured landmark frame with optional metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Capture time of the camera frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Caller-side session tag, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub landmarks: Vec<Landmark>,
}

impl FrameRecord {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp: None,
            session_id: None,
            landmarks,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FrameInput {
    Bare(Vec<Landmark>),
    Record(FrameRecord),
}

impl From<FrameInput> for FrameRecord {
    fn from(input: FrameInput) -> Self {
        match input {
            FrameInput::Bare(landmarks) => FrameRecord::new(landmarks),
            FrameInput::Record(record) => record,
        }
    }
}

/// Parse one frame from JSON, either a landmark array or a frame record
pub fn parse_frame_json(json: &str) -> Result<FrameRecord, ComputeError> {
    let input: FrameInput = serde_json::from_str(json).map_err(|e| {
        ComputeError::ParseError(format!("expected a landmark array or frame record: {e}"))
    })?;
    Ok(input.into())
}

/// Parse a JSON array of frames
pub fn parse_array(json: &str) -> Result<Vec<FrameRecord>, ComputeError> {
    let inputs: Vec<FrameInput> = serde_json::from_str(json)?;
    Ok(inputs.into_iter().map(FrameRecord::from).collect())
}

/// Parse NDJSON (newline-delimited JSON), one frame per line
///
/// Blank lines are skipped. Errors name the 1-based line number.
pub fn parse_ndjson(ndjson: &str) -> Result<Vec<FrameRecord>, ComputeError> {
    let mut frames = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<FrameInput>(trimmed) {
            Ok(input) => frames.push(input.into()),
            Err(e) => {
                return Err(ComputeError::ParseError(format!(
                    "Failed to parse line {}: {}",
                    line_num + 1,
                    e
                )));
            }
        }
    }
    Ok(frames)
}
