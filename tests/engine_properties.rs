//! End-to-end behavior of the landmark engine through the public API

use pretty_assertions::assert_eq;
use synheart_focus::config::{EngineConfig, ScoringModel};
use synheart_focus::topology::*;
use synheart_focus::{compute_frame_metrics, GazeDirection, Landmark, TrackingSession};

#[derive(Clone, Copy)]
struct Face {
    left_gap: f64,
    right_gap: f64,
    left_corner_x: f64,
    right_corner_x: f64,
    iris_span: f64,
    cheek_diff: f64,
}

impl Default for Face {
    fn default() -> Self {
        Self {
            left_gap: 0.01,
            right_gap: 0.01,
            left_corner_x: 0.40,
            right_corner_x: 0.42,
            iris_span: 0.006,
            cheek_diff: 0.0,
        }
    }
}

impl Face {
    fn landmarks(&self) -> Vec<Landmark> {
        self.landmarks_with_len(480)
    }

    fn landmarks_with_len(&self, len: usize) -> Vec<Landmark> {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); len.max(REQUIRED_LANDMARKS)];

        points[LEFT_EYE_UPPER_LID] = Landmark::new(0.40, 0.40, 0.0);
        points[LEFT_EYE_LOWER_LID] = Landmark::new(0.40, 0.40 + self.left_gap, 0.0);
        points[RIGHT_EYE_UPPER_LID] = Landmark::new(0.60, 0.40, 0.0);
        points[RIGHT_EYE_LOWER_LID] = Landmark::new(0.60, 0.40 + self.right_gap, 0.0);

        points[LEFT_EYE_CORNER] = Landmark::new(self.left_corner_x, 0.42, 0.0);
        points[RIGHT_EYE_CORNER] = Landmark::new(self.right_corner_x, 0.42, 0.0);

        for (start, cx) in [(LEFT_IRIS_START, 0.40), (RIGHT_IRIS_START, 0.60)] {
            for offset in 0..IRIS_POINTS {
                points[start + offset] = Landmark::new(cx, 0.405, -0.01);
            }
            points[start + 2] = Landmark::new(cx + self.iris_span, 0.405, -0.01);
        }

        points[LEFT_CHEEK] = Landmark::new(0.25, 0.55, 0.0);
        points[RIGHT_CHEEK] = Landmark::new(0.75, 0.55 + self.cheek_diff, 0.0);

        points.truncate(len);
        points
    }

    fn blinking(self) -> Self {
        Self {
            left_gap: 0.003,
            right_gap: 0.003,
            ..self
        }
    }
}

#[test]
fn resting_face_is_centered_and_open() {
    let mut session = TrackingSession::new();
    let metrics = session.process(&Face::default().landmarks()).unwrap();

    assert!(!metrics.blink_detected);
    assert_eq!(metrics.gaze_direction, GazeDirection::Center);
    assert!((metrics.iris_size - 0.006).abs() < 1e-9);
    // stability 0.92, dilation 1.0 -> 0.92 * 0.6 + 0.4
    assert!((metrics.attention_score - 0.952).abs() < 1e-6);
    assert!(metrics.fatigue_score.abs() < 1e-9);
    assert_eq!(metrics.symmetry_index, 1.0);
}

#[test]
fn closed_eyes_register_a_blink_and_lower_attention() {
    let open = compute_frame_metrics(&Face::default().landmarks(), &EngineConfig::default()).unwrap();
    let closed =
        compute_frame_metrics(&Face::default().blinking().landmarks(), &EngineConfig::default())
            .unwrap();

    assert!(closed.blink_detected);
    assert!(closed.attention_score < open.attention_score);
    assert!(closed.fatigue_score > open.fatigue_score);
}

#[test]
fn short_frame_yields_nothing_and_keeps_history() {
    let mut session = TrackingSession::new();
    session.process(&Face::default().landmarks()).unwrap();
    let before = session.history().clone();

    for len in [0, 1, 400, REQUIRED_LANDMARKS - 1] {
        assert!(session.process(&Face::default().landmarks_with_len(len)).is_none());
    }

    assert_eq!(session.history(), &before);
}

#[test]
fn exact_topology_length_is_accepted() {
    let landmarks = Face::default().landmarks_with_len(REQUIRED_LANDMARKS);
    assert_eq!(landmarks.len(), 478);
    assert!(compute_frame_metrics(&landmarks, &EngineConfig::default()).is_some());
}

#[test]
fn every_score_stays_in_unit_range() {
    let gaps = [0.0, 0.003, 0.01, 0.2];
    let corners = [(0.40, 0.42), (0.40, 0.90), (0.90, 0.10), (-0.5, 1.5)];
    let spans = [0.0, 0.001, 0.006, 0.3];
    let cheeks = [0.0, 0.04, -0.5];

    for configured in [
        EngineConfig::default(),
        EngineConfig {
            scoring_model: ScoringModel::Legacy,
            ..Default::default()
        },
    ] {
        let mut session = TrackingSession::with_config(configured).unwrap();
        for &gap in &gaps {
            for &(left_corner_x, right_corner_x) in &corners {
                for &iris_span in &spans {
                    for &cheek_diff in &cheeks {
                        let face = Face {
                            left_gap: gap,
                            right_gap: gap,
                            left_corner_x,
                            right_corner_x,
                            iris_span,
                            cheek_diff,
                        };
                        let metrics = session.process(&face.landmarks()).unwrap();
                        for value in metrics.unit_scores() {
                            assert!((0.0..=1.0).contains(&value), "{value} out of range");
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn blink_flips_once_gap_drops_below_threshold() {
    let config = EngineConfig::default();
    let mut last_blink = false;
    let mut flipped_at = None;

    for gap in [0.02, 0.01, 0.006, 0.0045, 0.003, 0.001] {
        let face = Face {
            left_gap: gap,
            ..Default::default()
        };
        let blink = compute_frame_metrics(&face.landmarks(), &config)
            .unwrap()
            .blink_detected;
        if blink && !last_blink {
            flipped_at = Some(gap);
        }
        assert!(blink >= last_blink, "blink must not turn off as the gap shrinks");
        last_blink = blink;
    }

    assert_eq!(flipped_at, Some(0.0045));
}

#[test]
fn gaze_direction_follows_threshold_band() {
    let config = EngineConfig::default();
    let direction = |left_corner_x: f64, right_corner_x: f64| {
        let face = Face {
            left_corner_x,
            right_corner_x,
            ..Default::default()
        };
        compute_frame_metrics(&face.landmarks(), &config)
            .unwrap()
            .gaze_direction
    };

    assert_eq!(direction(0.40, 0.425), GazeDirection::Right);
    assert_eq!(direction(0.425, 0.40), GazeDirection::Left);
    assert_eq!(direction(0.40, 0.41), GazeDirection::Center);
    assert_eq!(direction(0.41, 0.40), GazeDirection::Center);
}

#[test]
fn far_right_gaze_has_reduced_clamped_stability() {
    let config = EngineConfig::default();
    let centered = compute_frame_metrics(&Face::default().landmarks(), &config).unwrap();
    let far_right = Face {
        left_corner_x: 0.40,
        right_corner_x: 0.50,
        ..Default::default()
    };
    let metrics = compute_frame_metrics(&far_right.landmarks(), &config).unwrap();

    assert_eq!(metrics.gaze_direction, GazeDirection::Right);
    assert!(metrics.gaze_stability < centered.gaze_stability);
    assert!((0.0..=1.0).contains(&metrics.gaze_stability));

    let extreme = Face {
        left_corner_x: 0.10,
        right_corner_x: 0.90,
        ..Default::default()
    };
    let metrics = compute_frame_metrics(&extreme.landmarks(), &config).unwrap();
    assert_eq!(metrics.gaze_direction, GazeDirection::Right);
    assert_eq!(metrics.gaze_stability, 0.0);
}

#[test]
fn history_keeps_the_latest_thirty_frames() {
    let mut session = TrackingSession::new();

    session.process(&Face::default().blinking().landmarks()).unwrap();
    for _ in 0..30 {
        session.process(&Face::default().landmarks()).unwrap();
    }

    let history = session.history();
    assert_eq!(history.len(), 30);
    assert_eq!(history.blink_values().count(), 30);
    assert_eq!(history.attention_values().count(), 30);
    // The blinking first frame was evicted
    assert!(history.blink_values().all(|b| b == 0.0));
    assert_eq!(history.stats().blink_frequency, 0.0);
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let frames = [
        Face::default().landmarks(),
        Face::default().blinking().landmarks(),
        Face {
            right_corner_x: 0.47,
            cheek_diff: 0.01,
            ..Default::default()
        }
        .landmarks(),
    ];

    let mut a = TrackingSession::new();
    let mut b = TrackingSession::new();
    for frame in &frames {
        assert_eq!(a.process(frame), b.process(frame));
    }
    assert_eq!(a.history(), b.history());

    let config = EngineConfig::default();
    assert_eq!(
        compute_frame_metrics(&frames[2], &config),
        compute_frame_metrics(&frames[2], &config)
    );
}

#[test]
fn repeated_invalid_frame_is_idempotent() {
    let mut session = TrackingSession::new();
    session.process(&Face::default().landmarks()).unwrap();
    let before = session.history().clone();

    let mut invalid = Face::default().landmarks();
    invalid[LEFT_EYE_UPPER_LID].y = f64::NAN;

    assert!(session.process(&invalid).is_none());
    assert!(session.process(&invalid).is_none());
    assert_eq!(session.history(), &before);
}

#[test]
fn session_summary_reflects_processed_frames() {
    let mut session = TrackingSession::new();
    session.process(&Face::default().landmarks()).unwrap();
    session.process(&Face::default().blinking().landmarks()).unwrap();
    session.process(&Face::default().landmarks_with_len(10));

    let summary = session.summary().unwrap();
    assert_eq!(summary.frames, 2);
    assert!((summary.blink_rate - 0.5).abs() < 1e-9);
    assert!(summary.attention_peak >= summary.mean_attention);
}
