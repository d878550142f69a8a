//! Landmark topology
//!
//! Fixed indices into the MediaPipe Face Mesh output with iris refinement
//! enabled (`refineLandmarks: true`), which yields 468 face points followed by
//! two 5-point iris blocks. Every analyzer reads landmarks through these names
//! so a detector swap only has to touch this file.

/// Identifier of the landmark topology these indices belong to
pub const TOPOLOGY_ID: &str = "mediapipe-face-mesh-478-refined";

/// Minimum number of landmarks a frame must carry
pub const REQUIRED_LANDMARKS: usize = 478;

/// Left eye, upper lid midpoint
pub const LEFT_EYE_UPPER_LID: usize = 159;
/// Left eye, lower lid midpoint
pub const LEFT_EYE_LOWER_LID: usize = 145;
/// Right eye, upper lid midpoint
pub const RIGHT_EYE_UPPER_LID: usize = 386;
/// Right eye, lower lid midpoint
pub const RIGHT_EYE_LOWER_LID: usize = 374;

/// Left eye outer corner (gaze reference)
pub const LEFT_EYE_CORNER: usize = 33;
/// Right eye outer corner (gaze reference)
pub const RIGHT_EYE_CORNER: usize = 263;

/// Left cheek contour point (symmetry reference)
pub const LEFT_CHEEK: usize = 234;
/// Right cheek contour point (symmetry reference)
pub const RIGHT_CHEEK: usize = 454;

/// Number of points in each iris block
pub const IRIS_POINTS: usize = 5;
/// Left iris block start (center, then four boundary points)
pub const LEFT_IRIS_START: usize = 468;
/// Right iris block start
pub const RIGHT_IRIS_START: usize = LEFT_IRIS_START + IRIS_POINTS;

/// Every single-point index read by the analyzers, excluding iris blocks
pub const POINT_INDICES: [usize; 8] = [
    LEFT_EYE_UPPER_LID,
    LEFT_EYE_LOWER_LID,
    RIGHT_EYE_UPPER_LID,
    RIGHT_EYE_LOWER_LID,
    LEFT_EYE_CORNER,
    RIGHT_EYE_CORNER,
    LEFT_CHEEK,
    RIGHT_CHEEK,
];

/// Iterate over every landmark index the engine reads
pub fn referenced_indices() -> impl Iterator<Item = usize> {
    POINT_INDICES
        .into_iter()
        .chain(LEFT_IRIS_START..RIGHT_IRIS_START + IRIS_POINTS)
}
