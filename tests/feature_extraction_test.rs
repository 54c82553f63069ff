//! Tests for eye aspect ratio and pitch extraction on synthetic faces


use eyelid_monitor::{
    constants::DEFAULT_EYELID_THRESHOLD, features::FeatureExtractor, landmarks::LandmarkLayout, Error,
};
use proptest::prelude::*;
use test_helpers::{face, ibug_layout, synthetic_frame, truncated_frame, EYE_WIDTH};

#[test]
fn test_open_and_closed_eyes() {
    let extractor = FeatureExtractor::default();

    let open = extractor.extract(&face(0.30, 0.0)).unwrap();
    assert!((open.eye.eye_aspect_ratio - 0.30).abs() < 1e-4);
    assert!(!open.eye.is_closed);

    let closed = extractor.extract(&face(0.10, 0.0)).unwrap();
    assert!((closed.eye.eye_aspect_ratio - 0.10).abs() < 1e-4);
    assert!(closed.eye.is_closed);
}

#[test]
fn test_eyelid_distance_is_mean_vertical_sum() {
    let extractor = FeatureExtractor::default();
    let features = extractor.extract(&face(0.25, 0.0)).unwrap();
    // Two vertical spans of ear * width each
    assert!((features.eye.eyelid_distance - 2.0 * 0.25 * EYE_WIDTH).abs() < 1e-9);
}

#[test]
fn test_threshold_boundary_counts_as_open() {
    let frame = face(0.21, 0.0);
    let ear = FeatureExtractor::default().extract(&frame).unwrap().eye.eye_aspect_ratio;

    let at_threshold = FeatureExtractor::new(LandmarkLayout::face_mesh(), ear).unwrap();
    assert!(!at_threshold.extract(&frame).unwrap().eye.is_closed);

    let just_above = FeatureExtractor::new(LandmarkLayout::face_mesh(), ear + 1e-9).unwrap();
    assert!(just_above.extract(&frame).unwrap().eye.is_closed);
}

#[test]
fn test_closing_crosses_threshold_once() {
    let extractor = FeatureExtractor::default();
    let mut flips = 0;
    let mut was_closed = false;
    for step in 0..=40 {
        let ear = 0.4 - f64::from(step) * 0.01;
        let features = extractor.extract(&face(ear, 0.0)).unwrap();
        assert_eq!(features.eye.is_closed, features.eye.eye_aspect_ratio < DEFAULT_EYELID_THRESHOLD);
        if features.eye.is_closed != was_closed {
            flips += 1;
            was_closed = features.eye.is_closed;
        }
    }
    assert_eq!(flips, 1);
    assert!(was_closed);
}

#[test]
fn test_pitch_angle() {
    let extractor = FeatureExtractor::default();
    for pitch in [0.0, 15.0, 30.0, 60.0, 120.0] {
        let features = extractor.extract(&face(0.3, pitch)).unwrap();
        // Epsilon in the normalization skews angles near 0 slightly
        let tolerance = if pitch == 0.0 { 0.5 } else { 0.01 };
        assert!(
            (features.raw_pitch_deg - pitch).abs() < tolerance,
            "expected {pitch}, got {}",
            features.raw_pitch_deg
        );
    }
}

#[test]
fn test_pitch_uses_configured_up_vector() {
    let mut layout = LandmarkLayout::face_mesh();
    layout.up_vector = [1.0, 0.0, 0.0];
    let extractor = FeatureExtractor::new(layout.clone(), DEFAULT_EYELID_THRESHOLD).unwrap();
    // Chin straight below the nose is perpendicular to the x axis
    let features = extractor.extract(&synthetic_frame(&layout, 0.3, 0.0)).unwrap();
    assert!((features.raw_pitch_deg - 90.0).abs() < 1e-6);
}

#[test]
fn test_alternate_layout() {
    let layout = ibug_layout();
    let extractor = FeatureExtractor::new(layout.clone(), DEFAULT_EYELID_THRESHOLD).unwrap();

    let features = extractor.extract(&synthetic_frame(&layout, 0.15, 45.0)).unwrap();
    assert!(features.eye.is_closed);
    assert!((features.raw_pitch_deg - 45.0).abs() < 0.01);

    // Face Mesh frames violate the 68-point contract
    assert!(matches!(extractor.extract(&face(0.3, 0.0)), Err(Error::InvalidInput(_))));
}

#[test]
fn test_truncated_frame_is_rejected() {
    let err = FeatureExtractor::default().extract(&truncated_frame()).unwrap_err();
    assert!(err.to_string().contains("Expected 478 landmarks"));
}

proptest! {
    #[test]
    fn prop_ear_non_increasing_as_aperture_shrinks(
        start in 0.05f64..0.6,
        steps in proptest::collection::vec(0.0f64..0.05, 1..20)
    ) {
        let extractor = FeatureExtractor::default();
        let mut ear = start;
        let mut previous = extractor.extract(&face(ear, 0.0)).unwrap().eye.eye_aspect_ratio;
        for step in steps {
            ear = (ear - step).max(0.0);
            let current = extractor.extract(&face(ear, 0.0)).unwrap().eye.eye_aspect_ratio;
            prop_assert!(current <= previous + 1e-12);
            previous = current;
        }
    }

    #[test]
    fn prop_is_closed_matches_strict_comparison(ear in 0.0f64..0.6, threshold in 0.0f64..0.6) {
        let extractor = FeatureExtractor::new(LandmarkLayout::face_mesh(), threshold).unwrap();
        let eye = extractor.extract(&face(ear, 0.0)).unwrap().eye;
        prop_assert_eq!(eye.is_closed, eye.eye_aspect_ratio < threshold);
        prop_assert!(eye.eye_aspect_ratio.is_finite());
    }

    #[test]
    fn prop_pitch_in_range(pitch in -180.0f64..180.0) {
        let raw = FeatureExtractor::default().extract(&face(0.3, pitch)).unwrap().raw_pitch_deg;
        prop_assert!((0.0..=180.0).contains(&raw));
    }
}
