//! Landmark containers and the index layout of the detector model.

use crate::{
    constants::{
        DEFAULT_UP_VECTOR, FACE_MESH_CHIN, FACE_MESH_LANDMARK_COUNT, FACE_MESH_LEFT_EYE, FACE_MESH_NOSE_BRIDGE,
        FACE_MESH_RIGHT_EYE,
    },
    Error, Result,
};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One frame of detector output: normalized x/y and relative depth z
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Vector3<f64>>,
}

impl LandmarkSet {
    #[must_use]
    pub fn new(points: Vec<Vector3<f64>>) -> Self {
        Self { points }
    }

    /// Build a set from raw `[x, y, z]` triples
    #[must_use]
    pub fn from_triples(triples: &[[f64; 3]]) -> Self {
        Self {
            points: triples.iter().map(|&[x, y, z]| Vector3::new(x, y, z)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    /// Point at `index`, if present
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Vector3<f64>> {
        self.points.get(index)
    }

    /// Scale normalized coordinates to pixel space for overlays
    #[must_use]
    pub fn to_pixel_space(&self, width: u32, height: u32) -> Vec<(f64, f64)> {
        let (w, h) = (f64::from(width), f64::from(height));
        self.points.iter().map(|p| (p.x * w, p.y * h)).collect()
    }
}

/// Index layout of a landmark model.
///
/// Each eye contour is ordered outer corner, two upper-lid points, inner
/// corner, two lower-lid points, so that points 1/5 and 2/4 face each other
/// across the lid opening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkLayout {
    /// Number of points every frame must carry
    pub landmark_count: usize,

    /// Left and right eye contours
    pub eyes: [[usize; 6]; 2],

    /// Origin of the pitch vector
    pub nose_bridge: usize,

    /// End of the pitch vector
    pub chin: usize,

    /// Reference direction the pitch vector is measured against
    pub up_vector: [f64; 3],
}

impl Default for LandmarkLayout {
    fn default() -> Self {
        Self::face_mesh()
    }
}

impl LandmarkLayout {
    /// Layout of MediaPipe Face Mesh with refined iris landmarks
    #[must_use]
    pub fn face_mesh() -> Self {
        Self {
            landmark_count: FACE_MESH_LANDMARK_COUNT,
            eyes: [FACE_MESH_LEFT_EYE, FACE_MESH_RIGHT_EYE],
            nose_bridge: FACE_MESH_NOSE_BRIDGE,
            chin: FACE_MESH_CHIN,
            up_vector: DEFAULT_UP_VECTOR,
        }
    }

    /// Check that every index addresses a point inside the model
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the count is zero, an index is out of range,
    /// or the up-vector is not finite.
    pub fn validate(&self) -> Result<()> {
        if self.landmark_count == 0 {
            return Err(Error::ConfigError("Landmark count must be greater than 0".to_string()));
        }

        let indices = self
            .eyes
            .iter()
            .flatten()
            .copied()
            .chain([self.nose_bridge, self.chin]);
        for index in indices {
            if index >= self.landmark_count {
                return Err(Error::ConfigError(format!(
                    "Landmark index {index} out of range for a {}-point model",
                    self.landmark_count
                )));
            }
        }

        if self.up_vector.iter().any(|c| !c.is_finite()) {
            return Err(Error::ConfigError("Up-vector components must be finite".to_string()));
        }

        Ok(())
    }

    /// Reject frames whose length does not match the model
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the point count differs from `landmark_count`.
    pub fn check(&self, landmarks: &LandmarkSet) -> Result<()> {
        if landmarks.len() == self.landmark_count {
            Ok(())
        } else {
            Err(Error::InvalidInput(format!(
                "Expected {} landmarks, got {}",
                self.landmark_count,
                landmarks.len()
            )))
        }
    }

    #[must_use]
    pub fn up(&self) -> Vector3<f64> {
        Vector3::from(self.up_vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_mesh_layout_is_valid() {
        let layout = LandmarkLayout::face_mesh();
        assert!(layout.validate().is_ok());
        assert_eq!(layout, LandmarkLayout::default());
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut layout = LandmarkLayout::face_mesh();
        layout.chin = FACE_MESH_LANDMARK_COUNT;
        assert!(matches!(layout.validate(), Err(Error::ConfigError(_))));

        let mut layout = LandmarkLayout::face_mesh();
        layout.eyes[1][3] = 10_000;
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_zero_count_rejected() {
        let layout = LandmarkLayout {
            landmark_count: 0,
            eyes: [[0; 6]; 2],
            nose_bridge: 0,
            chin: 0,
            up_vector: DEFAULT_UP_VECTOR,
        };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_check_length() {
        let layout = LandmarkLayout::face_mesh();
        let short = LandmarkSet::from_triples(&[[0.0; 3]; 10]);
        let err = layout.check(&short).unwrap_err();
        assert!(err.to_string().contains("Expected 478 landmarks, got 10"));

        let full = LandmarkSet::new(vec![Vector3::zeros(); FACE_MESH_LANDMARK_COUNT]);
        assert!(layout.check(&full).is_ok());
    }

    #[test]
    fn test_pixel_space() {
        let set = LandmarkSet::from_triples(&[[0.5, 0.25, -0.1], [1.0, 1.0, 0.0]]);
        let px = set.to_pixel_space(640, 480);
        assert_eq!(px, vec![(320.0, 120.0), (640.0, 480.0)]);
    }
}
