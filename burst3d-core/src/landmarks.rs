/// Hand landmark samples and the continuous control targets derived from them
use nalgebra::{Point2, Vector2};

use crate::config::ControlConfig;

// ============================================================================
// HAND LANDMARK INDICES (MediaPipe Hands - 21 total)
// ============================================================================

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// One detection's worth of normalized image-space points (0-1, y down).
///
/// Short samples are legal and mean "no usable hand".
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSample {
    points: Vec<Point2<f32>>,
}

impl LandmarkSample {
    pub fn new(points: Vec<Point2<f32>>) -> Self {
        Self { points }
    }

    /// Build from interleaved `x, y` pairs. A trailing odd value is ignored.
    pub fn from_flat(coords: &[f32]) -> Self {
        let points = coords
            .chunks_exact(2)
            .map(|pair| Point2::new(pair[0], pair[1]))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when every landmark of the hand model is present and finite.
    pub fn is_complete(&self) -> bool {
        self.points.len() >= LANDMARK_COUNT
            && self.points[..LANDMARK_COUNT]
                .iter()
                .all(|p| p.x.is_finite() && p.y.is_finite())
    }

    pub fn point(&self, index: usize) -> Option<&Point2<f32>> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[Point2<f32>] {
        &self.points
    }

    /// Distance between two landmarks, `None` if either is missing.
    pub fn distance(&self, a: usize, b: usize) -> Option<f32> {
        Some((self.point(a)? - self.point(b)?).norm())
    }
}

/// Continuous targets the state machine smooths toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlTargets {
    pub yaw: f32,
    pub pitch: f32,
    /// Already clamped to the camera range
    pub camera_distance: f32,
    pub hand_span: f32,
}

impl ControlTargets {
    /// Map palm position to rotation and palm size to camera distance.
    ///
    /// Horizontal position drives yaw, vertical position drives pitch at
    /// `pitch_factor` of the yaw sensitivity, and a larger (closer) hand pulls
    /// the camera in.
    pub fn from_sample(sample: &LandmarkSample, controls: &ControlConfig) -> Option<Self> {
        if !sample.is_complete() {
            return None;
        }
        let palm = sample.point(MIDDLE_MCP)?;
        let sensitivity = controls.rotation_sensitivity * std::f32::consts::PI;

        let yaw = (0.5 - palm.x) * sensitivity;
        let pitch = (palm.y - 0.5) * sensitivity * controls.pitch_factor;

        let hand_span = sample.distance(WRIST, MIDDLE_MCP)?;
        let size_factor = ((hand_span - controls.hand_size_min)
            / (controls.hand_size_max - controls.hand_size_min))
            .clamp(0.0, 1.0);
        let camera_distance = (controls.camera_max_distance
            - size_factor * (controls.camera_max_distance - controls.camera_min_distance))
            .clamp(controls.camera_min_distance, controls.camera_max_distance);

        Some(Self {
            yaw,
            pitch,
            camera_distance,
            hand_span,
        })
    }
}

// ============================================================================
// SYNTHETIC POSES
// ============================================================================

/// Canonical hand shapes for simulation and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandPose {
    OpenPalm,
    Fist,
    /// Index finger raised, the rest curled
    One,
}

/// Finger MCP offsets from the wrist in units of hand span (index..pinky).
/// The middle MCP sits exactly one span above the wrist.
const MCP_OFFSETS: [(f32, f32); 4] = [(-0.3, -0.95), (0.0, -1.0), (0.25, -0.93), (0.45, -0.8)];

impl HandPose {
    /// Build a 21-point sample whose middle MCP sits at `palm` and whose
    /// wrist-to-middle-MCP span is `span`.
    pub fn sample(self, palm: Point2<f32>, span: f32) -> LandmarkSample {
        let wrist = palm + Vector2::new(0.0, span);
        let mut points = Vec::with_capacity(LANDMARK_COUNT);
        points.push(wrist);

        // Thumb: tucked across the palm unless the hand is open
        let thumb: [(f32, f32); 4] = match self {
            HandPose::OpenPalm => [(-0.3, -0.2), (-0.5, -0.4), (-0.65, -0.55), (-0.75, -0.7)],
            HandPose::Fist | HandPose::One => [(-0.3, -0.2), (-0.4, -0.4), (-0.3, -0.6), (-0.1, -0.65)],
        };
        points.extend(thumb.iter().map(|&(x, y)| wrist + Vector2::new(x, y) * span));

        for (finger, &(x, y)) in MCP_OFFSETS.iter().enumerate() {
            let offset = Vector2::new(x, y) * span;
            let mcp = wrist + offset;
            let dir = offset.normalize();
            let extended = match self {
                HandPose::OpenPalm => true,
                HandPose::Fist => false,
                HandPose::One => finger == 0,
            };
            let reach: [f32; 3] = if extended {
                [0.45, 0.75, 1.0]
            } else {
                [0.35, 0.15, -0.1]
            };
            points.push(mcp);
            points.extend(reach.iter().map(|&r| mcp + dir * (r * span)));
        }

        LandmarkSample::new(points)
    }
}
