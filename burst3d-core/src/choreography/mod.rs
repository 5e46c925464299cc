/// Explode / reassemble choreography across the three visual layers
///
/// The [`Choreographer`] owns the immutable particle layouts; everything that
/// animates lives in a [`ChoreographyState`] the caller threads through
/// [`Choreographer::advance`].
pub mod ambient;
pub mod particles;
pub mod photo;
pub mod solid;
pub mod timer;

use crate::config::SceneConfig;
use crate::transform::RotationState;

pub use ambient::AmbientInstance;
pub use particles::{AmbientParticle, PhotoParticle, PhotoPose};
pub use photo::{PhotoState, Rgb};
pub use solid::{SolidFrame, SolidState};
pub use timer::LayerTimer;

/// Scene-graph pose the renderer applies to the whole model group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigPose {
    pub rotation: RotationState,
    pub camera_distance: f32,
}

/// Everything that changes tick to tick
#[derive(Debug, Clone, PartialEq)]
pub struct ChoreographyState {
    pub exploded: bool,
    /// Seconds since the choreography started, drives particle spin
    pub clock: f32,
    pub solid: SolidState,
    pub ambient_progress: f32,
    pub photos: Vec<PhotoState>,
    pub rig: RotationState,
}

/// Render-ready description of every layer for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct LayerFrame {
    pub solid: SolidFrame,
    pub ambient_progress: f32,
    pub ambient: Vec<AmbientInstance>,
    pub photos: Vec<PhotoState>,
}

pub struct Choreographer {
    config: SceneConfig,
    ambient: Vec<AmbientParticle>,
    photos: Vec<PhotoParticle>,
}

impl Choreographer {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            config: config.clone(),
            ambient: particles::build_ambient(&config.ambient, config.seed),
            photos: particles::build_photos(&config.photo, config.seed),
        }
    }

    pub fn ambient_particles(&self) -> &[AmbientParticle] {
        &self.ambient
    }

    pub fn photo_particles(&self) -> &[PhotoParticle] {
        &self.photos
    }

    /// Resting, fully assembled state
    pub fn initial_state(&self) -> ChoreographyState {
        ChoreographyState {
            exploded: false,
            clock: 0.0,
            solid: SolidState::new(false),
            ambient_progress: 0.0,
            photos: self
                .photos
                .iter()
                .map(|p| PhotoState::new(p, &self.config.photo))
                .collect(),
            rig: RotationState::zero(),
        }
    }

    /// Advance every layer by `dt` seconds toward `exploded`, with the rig
    /// easing toward the interaction rotation.
    pub fn advance(&self, state: &mut ChoreographyState, exploded: bool, target: &RotationState, dt: f32) {
        let dt = dt.max(0.0);
        state.exploded = exploded;
        state.clock += dt;

        state.solid.advance(exploded, dt, &self.config.solid);
        state.ambient_progress =
            ambient::advance_progress(state.ambient_progress, exploded, dt, &self.config.ambient);
        for (photo, particle) in state.photos.iter_mut().zip(&self.photos) {
            photo.advance(particle, exploded, dt, &self.config.photo);
        }

        state.rig.follow(target.x, target.y, self.config.controls.smoothing);
    }

    /// Instantaneous poses for the current state
    pub fn frame(&self, state: &ChoreographyState) -> LayerFrame {
        let (move_factor, scale) =
            ambient::phase_mapping(state.ambient_progress, state.exploded, &self.config.ambient);
        let ambient = self
            .ambient
            .iter()
            .map(|p| ambient::instance(p, move_factor, scale, state.clock))
            .collect();

        LayerFrame {
            solid: state.solid.frame(&self.config.solid),
            ambient_progress: state.ambient_progress,
            ambient,
            photos: state.photos.clone(),
        }
    }
}
