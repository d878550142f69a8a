//! Synthetic landmark frames for unit tests

use crate::topology::*;
use crate::types::Landmark;

/// Builds a full-topology frame with controllable eye, gaze, iris and cheek geometry
pub struct FrameBuilder {
    landmarks: Vec<Landmark>,
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuilder {
    /// Open eyes (gap 0.01), eye corners at x 0.40 / 0.42, iris span 0.006, level cheeks
    pub fn new() -> Self {
        let mut builder = Self {
            landmarks: vec![Landmark::new(0.5, 0.5, 0.0); REQUIRED_LANDMARKS + 2],
        };
        builder.lid_gaps(0.01, 0.01);
        builder.gaze_corners(0.40, 0.42);
        builder.iris_span(0.006);
        builder.cheek_diff(0.0);
        builder
    }

    pub fn lid_gaps(&mut self, left: f64, right: f64) -> &mut Self {
        self.landmarks[LEFT_EYE_UPPER_LID] = Landmark::new(0.40, 0.40, 0.0);
        self.landmarks[LEFT_EYE_LOWER_LID] = Landmark::new(0.40, 0.40 + left, 0.0);
        self.landmarks[RIGHT_EYE_UPPER_LID] = Landmark::new(0.60, 0.40, 0.0);
        self.landmarks[RIGHT_EYE_LOWER_LID] = Landmark::new(0.60, 0.40 + right, 0.0);
        self
    }

    pub fn gaze_corners(&mut self, left_x: f64, right_x: f64) -> &mut Self {
        self.landmarks[LEFT_EYE_CORNER] = Landmark::new(left_x, 0.42, 0.0);
        self.landmarks[RIGHT_EYE_CORNER] = Landmark::new(right_x, 0.42, 0.0);
        self
    }

    /// Span between the first and third point of each iris block
    pub fn iris_span(&mut self, span: f64) -> &mut Self {
        for start in [LEFT_IRIS_START, RIGHT_IRIS_START] {
            let cx = if start == LEFT_IRIS_START { 0.40 } else { 0.60 };
            self.landmarks[start] = Landmark::new(cx, 0.405, 0.0);
            self.landmarks[start + 1] = Landmark::new(cx - span / 2.0, 0.405, 0.0);
            self.landmarks[start + 2] = Landmark::new(cx + span, 0.405, 0.0);
            self.landmarks[start + 3] = Landmark::new(cx + span / 2.0, 0.405, 0.0);
            self.landmarks[start + 4] = Landmark::new(cx, 0.405 + span / 2.0, 0.0);
        }
        self
    }

    pub fn cheek_diff(&mut self, diff: f64) -> &mut Self {
        self.landmarks[LEFT_CHEEK] = Landmark::new(0.25, 0.55, 0.0);
        self.landmarks[RIGHT_CHEEK] = Landmark::new(0.75, 0.55 + diff, 0.0);
        self
    }

    pub fn build(&self) -> Vec<Landmark> {
        self.landmarks.clone()
    }
}
