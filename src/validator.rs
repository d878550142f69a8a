//! Landmark validation
//!
//! Guards every indexed access downstream. A frame is analyzed all-or-nothing:
//! it must carry the full refined topology, and every landmark an analyzer
//! reads must have finite coordinates.

use crate::error::FrameError;
use crate::topology::{referenced_indices, IRIS_POINTS, REQUIRED_LANDMARKS};
use crate::types::Landmark;

/// A landmark frame that passed [`validate_frame`]
///
/// Analyzers only accept this type, so indexed reads at topology indices
/// cannot go out of bounds.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedFrame<'a> {
    landmarks: &'a [Landmark],
}

impl<'a> ValidatedFrame<'a> {
    /// Landmark at a topology index
    pub fn point(&self, index: usize) -> &'a Landmark {
        &self.landmarks[index]
    }

    /// Iris block starting at `start`
    pub fn iris(&self, start: usize) -> &'a [Landmark] {
        &self.landmarks[start..start + IRIS_POINTS]
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

/// Check that `landmarks` can be analyzed
pub fn validate_frame(landmarks: &[Landmark]) -> Result<ValidatedFrame<'_>, FrameError> {
    if landmarks.len() < REQUIRED_LANDMARKS {
        return Err(FrameError::TooFewLandmarks {
            required: REQUIRED_LANDMARKS,
            actual: landmarks.len(),
        });
    }

    if let Some(index) = referenced_indices().find(|&i| !landmarks[i].is_finite()) {
        return Err(FrameError::NonFiniteLandmark { index });
    }

    Ok(ValidatedFrame { landmarks })
}
