/// Photo swarm: per-particle flight with distance-driven material morphing
///
/// Each photo chases its own target pose. While exploding, a photo glows like
/// any other particle until it has covered most of the back half of its
/// flight, then its material settles into a plain textured card. Returning
/// photos always glow.
use nalgebra::{Point3, Vector3};

use crate::config::PhotoConfig;
use crate::smoothing::{approach, approach_point, approach_vector};

use super::particles::PhotoParticle;

pub type Rgb = Vector3<f32>;

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

/// Animated pose and material of one photo particle
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoState {
    pub position: Point3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: f32,
    pub color: Rgb,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub texture_visible: bool,
    /// 0 until the back half of the outbound flight, 1 at the exploded pose
    pub arrival: f32,
}

impl PhotoState {
    pub fn new(particle: &PhotoParticle, config: &PhotoConfig) -> Self {
        Self {
            position: particle.assembled.position,
            rotation: particle.assembled.rotation,
            scale: config.initial_scale,
            color: Rgb::from(WHITE),
            emissive: Rgb::from(BLACK),
            emissive_intensity: 0.0,
            roughness: config.glow_roughness,
            texture_visible: false,
            arrival: 0.0,
        }
    }

    pub fn advance(&mut self, particle: &PhotoParticle, exploded: bool, dt: f32, config: &PhotoConfig) {
        let (target, rate) = if exploded {
            (&particle.exploded, config.explode_rate)
        } else {
            (&particle.assembled, config.assemble_rate)
        };

        self.position = approach_point(&self.position, &target.position, rate, dt);
        self.rotation = approach_vector(&self.rotation, &target.rotation, rate, dt);
        self.scale = approach(self.scale, target.scale, rate, dt);

        self.arrival = arrival_progress(&self.position, particle);
        let glow = Rgb::from(config.glow_color);

        if exploded {
            let arriving = self.arrival >= config.arrival_threshold;
            let (color, emissive) = if arriving {
                (Rgb::from(WHITE), Rgb::from(BLACK))
            } else {
                (glow, glow)
            };
            self.color = approach_vector(&self.color, &color, config.color_rate, 1.0);
            self.emissive = approach_vector(&self.emissive, &emissive, config.color_rate, 1.0);
            self.emissive_intensity = if arriving { 0.0 } else { config.glow_intensity };
            self.roughness = if arriving {
                config.arrived_roughness
            } else {
                config.glow_roughness
            };
            self.texture_visible = arriving;
        } else {
            self.color = glow;
            self.emissive = glow;
            self.emissive_intensity = config.glow_intensity;
            self.roughness = config.glow_roughness;
            self.texture_visible = false;
        }
    }
}

/// `1 - clamp(dist_to_exploded / (travel * 0.5), 0, 1)`
pub fn arrival_progress(position: &Point3<f32>, particle: &PhotoParticle) -> f32 {
    let half_travel = particle.travel_distance() * 0.5;
    if half_travel <= f32::EPSILON {
        return 1.0;
    }
    let remaining = (particle.exploded.position - position).norm();
    1.0 - (remaining / half_travel).clamp(0.0, 1.0)
}
