/// Per-tick pipeline: stabilizer, state machine, choreography, redirect
///
/// Detections may arrive at any rate through [`Engine::submit`] or
/// [`Engine::submit_observation`]; they are debounced as they arrive and the
/// latest one is applied on the next [`Engine::tick`], so the interaction
/// state changes at most once per rendered frame.
use tracing::{debug, info};

use crate::choreography::{ChoreographyState, Choreographer, LayerFrame, RigPose};
use crate::config::SceneConfig;
use crate::detection::Observation;
use crate::landmarks::LandmarkSample;
use crate::redirect::{Navigator, RedirectPhase, RedirectSequencer};
use crate::stabilizer::StabilizerCursor;
use crate::state::{HandInput, InteractionState, StateEvent};
use crate::transform::RotationState;

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub state: InteractionState,
    pub rig: RigPose,
    pub layers: LayerFrame,
    pub redirect: RedirectPhase,
    pub redirect_progress: f32,
    pub events: Vec<StateEvent>,
}

pub struct Engine {
    config: SceneConfig,
    cursor: StabilizerCursor,
    state: InteractionState,
    choreographer: Choreographer,
    layers: ChoreographyState,
    redirect: RedirectSequencer,
    pending: Option<HandInput>,
}

impl Engine {
    pub fn new(config: SceneConfig) -> Self {
        let choreographer = Choreographer::new(&config);
        let layers = choreographer.initial_state();
        Self {
            cursor: StabilizerCursor::new(),
            state: InteractionState::new(&config.controls),
            choreographer,
            layers,
            redirect: RedirectSequencer::new(config.redirect.delay_ms, config.redirect.destination.clone()),
            pending: None,
            config,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn redirect_phase(&self) -> &RedirectPhase {
        self.redirect.phase()
    }

    /// Classify and debounce a tracker sample (`None` when no hand was found).
    pub fn submit(&mut self, sample: Option<&LandmarkSample>) {
        let observation = Observation::from_sample(sample, &self.config.controls);
        self.submit_observation(observation);
    }

    /// Debounce an already classified detection.
    pub fn submit_observation(&mut self, observation: Observation) {
        let input = match observation {
            Observation::NoHand => HandInput::Absent,
            Observation::Hand { raw, targets } => {
                let mut confirmed = self.cursor.observe(raw, self.config.stability_threshold);
                // A confirmation not yet applied survives later "no change" samples
                if confirmed.is_none() {
                    if let Some(HandInput::Present { confirmed: earlier, .. }) = self.pending {
                        confirmed = earlier;
                    }
                }
                HandInput::Present { confirmed, targets }
            }
        };
        self.pending = Some(input);
    }

    /// Advance one rendered frame by `dt` seconds.
    pub fn tick<N: Navigator + ?Sized>(&mut self, dt: f32, navigator: &mut N) -> FrameSnapshot {
        let mut events = Vec::new();

        if let Some(input) = self.pending.take() {
            let (next, fired) = self.state.advance(&input, &self.config.controls);
            for event in &fired {
                match event {
                    StateEvent::Exploded => info!("fist opened, exploding"),
                    StateEvent::Reassembled => info!("palm closed, reassembling"),
                    StateEvent::RedirectArmed => {
                        self.redirect.arm();
                    }
                }
            }
            if next.gesture != self.state.gesture {
                debug!(from = self.state.gesture.label(), to = next.gesture.label(), "gesture changed");
            }
            self.state = next;
            events = fired;
        }

        let target = RotationState::new(self.state.rotation_x, self.state.rotation_y, 0.0);
        self.choreographer
            .advance(&mut self.layers, self.state.is_exploded, &target, dt);
        self.redirect.advance(dt, navigator);

        FrameSnapshot {
            state: self.state.clone(),
            rig: RigPose {
                rotation: self.layers.rig,
                camera_distance: self.state.camera_distance,
            },
            layers: self.choreographer.frame(&self.layers),
            redirect: self.redirect.phase().clone(),
            redirect_progress: self.redirect.progress(),
            events,
        }
    }

    /// Tear down the interaction; a pending redirect will never fire.
    pub fn dispose(&mut self) {
        self.redirect.cancel();
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureCategory;
    use crate::landmarks::HandPose;
    use nalgebra::Point2;

    const DT: f32 = 1.0 / 60.0;

    #[derive(Default)]
    struct Recorder {
        visits: Vec<String>,
    }

    impl Navigator for Recorder {
        fn navigate(&mut self, destination: &str) {
            self.visits.push(destination.to_string());
        }
    }

    fn engine() -> Engine {
        let mut config = SceneConfig::default();
        config.ambient.count = 32;
        config.photo.count = 4;
        Engine::new(config)
    }

    /// Submit a pose and tick once, `times` times.
    fn hold(engine: &mut Engine, nav: &mut Recorder, pose: HandPose, times: usize) -> FrameSnapshot {
        let sample = pose.sample(Point2::new(0.5, 0.5), 0.2);
        let mut last = None;
        for _ in 0..times {
            engine.submit(Some(&sample));
            last = Some(engine.tick(DT, nav));
        }
        last.unwrap()
    }

    #[test]
    fn test_gesture_needs_three_samples() {
        let mut engine = engine();
        let mut nav = Recorder::default();
        let snap = hold(&mut engine, &mut nav, HandPose::Fist, 2);
        assert_eq!(snap.state.gesture, GestureCategory::Unknown);
        let snap = hold(&mut engine, &mut nav, HandPose::Fist, 1);
        assert_eq!(snap.state.gesture, GestureCategory::Fist);
    }

    #[test]
    fn test_fist_then_palm_explodes_and_back() {
        let mut engine = engine();
        let mut nav = Recorder::default();
        hold(&mut engine, &mut nav, HandPose::Fist, 3);
        let snap = hold(&mut engine, &mut nav, HandPose::OpenPalm, 3);
        assert!(snap.state.is_exploded);
        assert_eq!(snap.events, vec![StateEvent::Exploded]);

        let snap = hold(&mut engine, &mut nav, HandPose::OpenPalm, 120);
        assert!(!snap.layers.solid.visible);

        let snap = hold(&mut engine, &mut nav, HandPose::Fist, 3);
        assert!(!snap.state.is_exploded);
        assert!(snap.state.has_reassembled);
        assert_eq!(snap.layers.solid.opacity, 0.0);
    }

    #[test]
    fn test_ticks_without_detections_hold_state() {
        let mut engine = engine();
        let mut nav = Recorder::default();
        hold(&mut engine, &mut nav, HandPose::OpenPalm, 10);
        let before = engine.state().clone();
        for _ in 0..30 {
            let snap = engine.tick(DT, &mut nav);
            assert_eq!(snap.state, before);
        }
    }

    #[test]
    fn test_non_finite_landmarks_leave_state_intact() {
        let mut engine = engine();
        let mut nav = Recorder::default();
        hold(&mut engine, &mut nav, HandPose::Fist, 3);

        let nan = LandmarkSample::from_flat(&[f32::NAN; 42]);
        for _ in 0..3 {
            engine.submit(Some(&nan));
            let snap = engine.tick(DT, &mut nav);
            assert_eq!(snap.state.gesture, GestureCategory::Unknown);
            assert!(!snap.state.is_exploded);
            assert!(snap.state.camera_distance.is_finite());
        }

        let controls = engine.config().controls.clone();
        let snap = hold(&mut engine, &mut nav, HandPose::Fist, 100);
        assert_eq!(snap.state.gesture, GestureCategory::Fist);
        assert!(snap.state.camera_distance.is_finite());
        assert!(snap.state.camera_distance >= controls.camera_min_distance);
        assert!(snap.state.camera_distance <= controls.camera_max_distance);
    }

    #[test]
    fn test_open_palm_to_fist_while_assembled_fires_nothing() {
        let mut engine = engine();
        let mut nav = Recorder::default();
        hold(&mut engine, &mut nav, HandPose::OpenPalm, 3);
        let snap = hold(&mut engine, &mut nav, HandPose::Fist, 3);
        assert_eq!(snap.state.gesture, GestureCategory::Fist);
        assert!(snap.events.is_empty());
        assert!(!snap.state.has_reassembled);
    }

    #[test]
    fn test_no_hand_resets_gesture_only() {
        let mut engine = engine();
        let mut nav = Recorder::default();
        hold(&mut engine, &mut nav, HandPose::OpenPalm, 10);
        let before = engine.state().clone();
        engine.submit(None);
        let snap = engine.tick(DT, &mut nav);
        assert_eq!(snap.state.gesture, GestureCategory::Unknown);
        assert_eq!(snap.state.camera_distance, before.camera_distance);
        assert_eq!(snap.state.rotation_y, before.rotation_y);
    }

    #[test]
    fn test_confirmation_between_ticks_is_not_lost() {
        let mut engine = engine();
        let mut nav = Recorder::default();
        let fist = HandPose::Fist.sample(Point2::new(0.5, 0.5), 0.2);
        let palm = HandPose::OpenPalm.sample(Point2::new(0.5, 0.5), 0.2);
        // Third fist confirms, then a stray palm arrives before the tick
        for sample in [&fist, &fist, &fist, &palm] {
            engine.submit(Some(sample));
        }
        let snap = engine.tick(DT, &mut nav);
        assert_eq!(snap.state.gesture, GestureCategory::Fist);
    }

    #[test]
    fn test_one_redirects_after_delay() {
        let mut engine = engine();
        let mut nav = Recorder::default();
        let snap = hold(&mut engine, &mut nav, HandPose::One, 3);
        assert!(snap.state.is_redirecting);
        assert!(matches!(snap.redirect, RedirectPhase::Armed { .. }));

        // Frozen: later gestures change nothing
        let frozen = snap.state.clone();
        let snap = hold(&mut engine, &mut nav, HandPose::Fist, 30);
        assert_eq!(snap.state, frozen);
        assert!(nav.visits.is_empty());

        hold(&mut engine, &mut nav, HandPose::OpenPalm, 120);
        assert_eq!(nav.visits.len(), 1);
        assert_eq!(nav.visits[0], engine.config().redirect.destination);

        hold(&mut engine, &mut nav, HandPose::One, 300);
        assert_eq!(nav.visits.len(), 1);
    }

    #[test]
    fn test_dispose_before_deadline_prevents_redirect() {
        let mut engine = engine();
        let mut nav = Recorder::default();
        hold(&mut engine, &mut nav, HandPose::One, 3);
        for _ in 0..60 {
            engine.tick(DT, &mut nav);
        }
        engine.dispose();
        for _ in 0..600 {
            engine.tick(DT, &mut nav);
        }
        assert!(nav.visits.is_empty());
        assert!(matches!(engine.redirect_phase(), RedirectPhase::Cancelled));
    }

    #[test]
    fn test_rig_follows_open_palm() {
        let mut engine = engine();
        let mut nav = Recorder::default();
        let sample = HandPose::OpenPalm.sample(Point2::new(0.2, 0.5), 0.2);
        let mut snap = None;
        for _ in 0..200 {
            engine.submit(Some(&sample));
            snap = Some(engine.tick(DT, &mut nav));
        }
        let snap = snap.unwrap();
        assert!(snap.state.rotation_y > 2.7);
        assert!((snap.rig.rotation.y - snap.state.rotation_y).abs() < 0.05);
    }
}
