//! Constants used throughout the library

/// Guard added to norms and denominators to keep degenerate geometry finite
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// Number of landmarks produced by Face Mesh with iris refinement enabled
pub const FACE_MESH_LANDMARK_COUNT: usize = 478;

/// Face Mesh contour of the left eye: outer corner, upper lid x2, inner corner, lower lid x2
pub const FACE_MESH_LEFT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];

/// Face Mesh contour of the right eye, same point order as the left
pub const FACE_MESH_RIGHT_EYE: [usize; 6] = [263, 387, 385, 362, 380, 373];

/// Face Mesh nose landmark used as the origin of the pitch vector
pub const FACE_MESH_NOSE_BRIDGE: usize = 1;

/// Face Mesh chin landmark
pub const FACE_MESH_CHIN: usize = 152;

/// Reference up-vector for the pitch angle (image y axis)
pub const DEFAULT_UP_VECTOR: [f64; 3] = [0.0, 1.0, 0.0];

/// Default eye aspect ratio below which the eye counts as closed
pub const DEFAULT_EYELID_THRESHOLD: f64 = 0.21;

/// Default EMA weight for new pitch samples
pub const DEFAULT_PITCH_ALPHA: f64 = 0.2;

/// Default closed-frame count needed to confirm a blink
pub const DEFAULT_BLINK_CONFIRM_FRAMES: usize = 2;

/// Default blink rate window
pub const DEFAULT_WINDOW_SECONDS: f64 = 60.0;

/// Default frames per second assumption
pub const DEFAULT_FPS: f64 = 30.0;

/// Fraction of the frame rate used to size the blink confirmation run
pub const CONFIRM_FRAMES_FPS_FRACTION: f64 = 0.1;

/// Smoothed pitch above which the head is reported as nodding
pub const DEFAULT_PITCH_NOD_THRESHOLD: f64 = 0.025;

/// Default frame size used for pixel-space landmark copies
pub const DEFAULT_FRAME_WIDTH: u32 = 640;
pub const DEFAULT_FRAME_HEIGHT: u32 = 480;

pub const SECONDS_PER_MINUTE: f64 = 60.0;
