/// Keyboard-driven stand-in for a webcam hand tracker
use burst3d_core::{HandPose, LandmarkSample};
use nalgebra::{Point2, Vector2};

const MIN_SPAN: f32 = 0.02;
const MAX_SPAN: f32 = 0.5;

/// Headless session script: pose, palm x, seconds held.
///
/// Fist, sweep with an open palm to explode, close to reassemble, then point
/// the index finger so the redirect arms while the model is assembled.
pub const DEMO_SCRIPT: [(HandPose, f32, f32); 4] = [
    (HandPose::Fist, 0.5, 1.0),
    (HandPose::OpenPalm, 0.25, 3.0),
    (HandPose::Fist, 0.5, 4.0),
    (HandPose::One, 0.5, 3.0),
];

#[derive(Debug, Clone)]
pub struct SimulatedHand {
    pose: HandPose,
    palm: Point2<f32>,
    span: f32,
    present: bool,
}

impl SimulatedHand {
    pub fn new() -> Self {
        Self {
            pose: HandPose::Fist,
            palm: Point2::new(0.5, 0.5),
            span: 0.2,
            present: true,
        }
    }

    pub fn pose(&self) -> HandPose {
        self.pose
    }

    pub fn palm(&self) -> Point2<f32> {
        self.palm
    }

    pub fn span(&self) -> f32 {
        self.span
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn set_pose(&mut self, pose: HandPose) {
        self.pose = pose;
        self.present = true;
    }

    pub fn toggle_presence(&mut self) {
        self.present = !self.present;
    }

    /// Move the palm in normalized image space, kept inside the frame.
    pub fn nudge(&mut self, dx: f32, dy: f32) {
        let moved = self.palm + Vector2::new(dx, dy);
        self.palm = Point2::new(moved.x.clamp(0.0, 1.0), moved.y.clamp(0.0, 1.0));
    }

    /// Grow (positive) or shrink the hand, as if it moved toward the camera.
    pub fn resize(&mut self, delta: f32) {
        self.span = (self.span + delta).clamp(MIN_SPAN, MAX_SPAN);
    }

    /// What the tracker would report this frame
    pub fn sample(&self) -> Option<LandmarkSample> {
        self.present.then(|| self.pose.sample(self.palm, self.span))
    }

    pub fn label(&self) -> &'static str {
        if !self.present {
            return "no hand";
        }
        match self.pose {
            HandPose::OpenPalm => "open palm",
            HandPose::Fist => "fist",
            HandPose::One => "one",
        }
    }
}

impl Default for SimulatedHand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burst3d_core::{classify, GestureCategory};

    #[test]
    fn test_sample_matches_pose() {
        let mut hand = SimulatedHand::new();
        hand.set_pose(HandPose::OpenPalm);
        let sample = hand.sample().unwrap();
        assert_eq!(classify(&sample), GestureCategory::OpenPalm);
    }

    #[test]
    fn test_absent_hand_has_no_sample() {
        let mut hand = SimulatedHand::new();
        hand.toggle_presence();
        assert!(hand.sample().is_none());
        assert_eq!(hand.label(), "no hand");
        hand.set_pose(HandPose::One);
        assert!(hand.sample().is_some());
    }

    #[test]
    fn test_nudge_stays_in_frame() {
        let mut hand = SimulatedHand::new();
        hand.nudge(-2.0, 3.0);
        assert_eq!(hand.palm(), Point2::new(0.0, 1.0));
    }

    #[test]
    fn test_demo_script_ends_in_redirect() {
        use crate::TerminalNavigator;
        use burst3d_core::{Engine, SceneConfig};

        const DT: f32 = 1.0 / 60.0;
        let mut config = SceneConfig::default();
        config.ambient.count = 16;
        config.photo.count = 4;
        let mut engine = Engine::new(config);
        let mut hand = SimulatedHand::new();
        let mut navigator = TerminalNavigator::default();

        for (pose, x, seconds) in DEMO_SCRIPT {
            hand.set_pose(pose);
            let palm = hand.palm();
            hand.nudge(x - palm.x, 0.0);
            for _ in 0..(seconds / DT).round() as usize {
                engine.submit(hand.sample().as_ref());
                engine.tick(DT, &mut navigator);
            }
        }

        assert!(!engine.state().is_exploded);
        assert!(engine.state().is_redirecting);
        assert_eq!(navigator.destination(), Some(engine.config().redirect.destination.as_str()));
    }

    #[test]
    fn test_resize_is_clamped() {
        let mut hand = SimulatedHand::new();
        hand.resize(10.0);
        assert!((hand.span() - MAX_SPAN).abs() < 1e-6);
        hand.resize(-10.0);
        assert!((hand.span() - MIN_SPAN).abs() < 1e-6);
    }
}
