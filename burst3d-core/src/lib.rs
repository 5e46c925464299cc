/// Burst3D Core Library - gesture interaction and explode/reassemble choreography
///
/// Everything here is deterministic and host-agnostic: hand landmark samples
/// go in, a per-frame snapshot of the interaction state and every visual
/// layer comes out. Shells own capture, rendering, and navigation.

pub mod choreography;
pub mod config;
pub mod detection;
pub mod engine;
pub mod geometry;
pub mod gesture;
pub mod landmarks;
pub mod projection;
pub mod redirect;
pub mod smoothing;
pub mod stabilizer;
pub mod state;
pub mod transform;

// Re-export commonly used types
pub use choreography::{Choreographer, LayerFrame, RigPose};
pub use config::SceneConfig;
pub use detection::{DetectionGate, DetectionPermit, FrameStamp, Observation, ResultInbox};
pub use engine::{Engine, FrameSnapshot};
pub use geometry::{Mesh, Triangle, Vertex};
pub use gesture::{classify, GestureCategory};
pub use landmarks::{ControlTargets, HandPose, LandmarkSample};
pub use projection::{Camera, ProjectionMode};
pub use redirect::{Navigator, RedirectPhase};
pub use state::{InteractionState, StateEvent};
pub use transform::{RotationState, Transform};
