/// Rotation-tolerant hand gesture classification
///
/// A finger counts as folded when its tip is closer to the wrist than its PIP
/// joint, or not much farther than its MCP joint. Only distances to the wrist
/// are compared, so the result does not depend on how the hand is rotated in
/// the image plane.
use serde::{Deserialize, Serialize};

use crate::landmarks::{
    LandmarkSample, INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP, PINKY_MCP,
    PINKY_PIP, PINKY_TIP, RING_MCP, RING_PIP, RING_TIP, WRIST,
};

/// Tip-to-wrist distance below this multiple of MCP-to-wrist means "curled".
const FOLD_MCP_RATIO: f32 = 1.3;

/// (tip, pip, mcp) for index, middle, ring, pinky
const FINGERS: [(usize, usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP, INDEX_MCP),
    (MIDDLE_TIP, MIDDLE_PIP, MIDDLE_MCP),
    (RING_TIP, RING_PIP, RING_MCP),
    (PINKY_TIP, PINKY_PIP, PINKY_MCP),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GestureCategory {
    #[default]
    Unknown,
    OpenPalm,
    Fist,
    One,
}

impl GestureCategory {
    /// Status-line label
    pub fn label(self) -> &'static str {
        match self {
            GestureCategory::Unknown => "UNKNOWN",
            GestureCategory::OpenPalm => "OPEN_PALM",
            GestureCategory::Fist => "FIST",
            GestureCategory::One => "ONE",
        }
    }
}

/// Classify a landmark sample. Incomplete samples are `Unknown`.
pub fn classify(sample: &LandmarkSample) -> GestureCategory {
    if !sample.is_complete() {
        return GestureCategory::Unknown;
    }

    let mut folded = [false; 4];
    for (slot, &(tip, pip, mcp)) in folded.iter_mut().zip(FINGERS.iter()) {
        match finger_folded(sample, tip, pip, mcp) {
            Some(is_folded) => *slot = is_folded,
            None => return GestureCategory::Unknown,
        }
    }
    let [index, middle, ring, pinky] = folded;

    // A raised index also has three curled fingers, so this must run before
    // the fold count.
    if !index && middle && ring && pinky {
        return GestureCategory::One;
    }

    match folded.iter().filter(|&&f| f).count() {
        n if n >= 3 => GestureCategory::Fist,
        n if n <= 1 => GestureCategory::OpenPalm,
        _ => GestureCategory::Unknown,
    }
}

fn finger_folded(sample: &LandmarkSample, tip: usize, pip: usize, mcp: usize) -> Option<bool> {
    let dist_tip = sample.distance(tip, WRIST)?;
    let dist_pip = sample.distance(pip, WRIST)?;
    let dist_mcp = sample.distance(mcp, WRIST)?;
    Some(dist_tip < dist_pip || dist_tip < dist_mcp * FOLD_MCP_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::HandPose;
    use nalgebra::{Point2, Rotation2};

    fn palm() -> Point2<f32> {
        Point2::new(0.5, 0.5)
    }

    #[test]
    fn test_short_sample_is_unknown() {
        for len in [0usize, 1, 5, 20] {
            let sample = LandmarkSample::from_flat(&vec![0.5; len * 2]);
            assert_eq!(classify(&sample), GestureCategory::Unknown);
        }
    }

    #[test]
    fn test_open_palm() {
        let sample = HandPose::OpenPalm.sample(palm(), 0.2);
        assert_eq!(classify(&sample), GestureCategory::OpenPalm);
    }

    #[test]
    fn test_fist() {
        let sample = HandPose::Fist.sample(palm(), 0.2);
        assert_eq!(classify(&sample), GestureCategory::Fist);
    }

    #[test]
    fn test_raised_index_is_one_not_fist() {
        let sample = HandPose::One.sample(palm(), 0.2);
        assert_eq!(classify(&sample), GestureCategory::One);
    }

    #[test]
    fn test_two_folded_is_unknown() {
        // Open palm with ring and pinky curled onto their MCPs
        let mut points = HandPose::OpenPalm.sample(palm(), 0.2).points().to_vec();
        for (tip, mcp) in [(RING_TIP, RING_MCP), (PINKY_TIP, PINKY_MCP)] {
            points[tip] = points[mcp];
        }
        let sample = LandmarkSample::new(points);
        assert_eq!(classify(&sample), GestureCategory::Unknown);
    }

    #[test]
    fn test_classification_survives_rotation() {
        let rotation = Rotation2::new(1.2);
        for (pose, expected) in [
            (HandPose::OpenPalm, GestureCategory::OpenPalm),
            (HandPose::Fist, GestureCategory::Fist),
            (HandPose::One, GestureCategory::One),
        ] {
            let sample = pose.sample(palm(), 0.2);
            let wrist = sample.points()[WRIST];
            let rotated = sample
                .points()
                .iter()
                .map(|p| wrist + rotation * (p - wrist))
                .collect();
            assert_eq!(classify(&LandmarkSample::new(rotated)), expected);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(GestureCategory::OpenPalm.label(), "OPEN_PALM");
        assert_eq!(GestureCategory::default(), GestureCategory::Unknown);
    }
}
