/// Interaction state machine
///
/// [`InteractionState::advance`] is the single per-tick transition. It never
/// mutates in place: the caller threads the returned value into the next tick.
use serde::{Deserialize, Serialize};

use crate::config::ControlConfig;
use crate::gesture::GestureCategory;
use crate::landmarks::ControlTargets;
use crate::smoothing::approach_per_tick;

/// What the detector reported for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandInput {
    /// No hand in frame (or an unusable sample)
    Absent,
    Present {
        /// Stabilizer output; `None` keeps the previous confirmed gesture
        confirmed: Option<GestureCategory>,
        targets: ControlTargets,
    },
}

/// Edge fired by a transition, for logging and for the redirect sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    Exploded,
    Reassembled,
    RedirectArmed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionState {
    pub gesture: GestureCategory,
    pub rotation_y: f32,
    pub rotation_x: f32,
    pub camera_distance: f32,
    pub is_exploded: bool,
    pub has_reassembled: bool,
    pub is_redirecting: bool,
}

impl InteractionState {
    pub fn new(controls: &ControlConfig) -> Self {
        Self {
            gesture: GestureCategory::Unknown,
            rotation_y: 0.0,
            rotation_x: 0.0,
            camera_distance: controls
                .camera_default_distance
                .clamp(controls.camera_min_distance, controls.camera_max_distance),
            is_exploded: false,
            has_reassembled: false,
            is_redirecting: false,
        }
    }

    /// Compute the next state and the edges crossed on the way.
    pub fn advance(&self, input: &HandInput, controls: &ControlConfig) -> (Self, Vec<StateEvent>) {
        let mut events = Vec::new();

        // Frozen once a redirect is under way
        if self.is_redirecting {
            return (self.clone(), events);
        }

        let (confirmed, targets) = match input {
            HandInput::Absent => {
                let next = Self {
                    gesture: GestureCategory::Unknown,
                    ..self.clone()
                };
                return (next, events);
            }
            HandInput::Present { confirmed, targets } => (confirmed.unwrap_or(self.gesture), targets),
        };

        let mut next = self.clone();
        next.gesture = confirmed;

        match (self.gesture, confirmed) {
            (GestureCategory::Fist, GestureCategory::OpenPalm) => {
                next.is_exploded = true;
                next.has_reassembled = false;
                events.push(StateEvent::Exploded);
            }
            (GestureCategory::OpenPalm, GestureCategory::Fist) => {
                next.is_exploded = false;
                if self.is_exploded {
                    next.has_reassembled = true;
                    events.push(StateEvent::Reassembled);
                }
            }
            _ => {}
        }

        if !next.is_exploded && confirmed == GestureCategory::One && !next.is_redirecting {
            next.is_redirecting = true;
            events.push(StateEvent::RedirectArmed);
        }

        // Rotation only follows an open hand; otherwise it holds still
        if confirmed == GestureCategory::OpenPalm {
            next.rotation_y = approach_per_tick(self.rotation_y, targets.yaw, controls.smoothing);
            next.rotation_x = approach_per_tick(self.rotation_x, targets.pitch, controls.smoothing);
        }

        let target_distance = targets
            .camera_distance
            .clamp(controls.camera_min_distance, controls.camera_max_distance);
        next.camera_distance = approach_per_tick(self.camera_distance, target_distance, controls.smoothing)
            .clamp(controls.camera_min_distance, controls.camera_max_distance);

        (next, events)
    }

    /// Status-line description of the visual layer in front
    pub fn visual_mode(&self) -> &'static str {
        if self.is_exploded {
            "PARTICLE CLOUD"
        } else {
            "SOLID MODEL"
        }
    }
}
