/// Ambient swarm: one shared progress scalar, two asymmetric phase mappings
///
/// Exploding particles start moving at once (ease-out) while they grow in.
/// Reassembling particles ease in toward the disc and only shrink away once
/// they are home, so nothing pops at either end of the flight.
use nalgebra::{Point3, Vector3};

use crate::config::AmbientConfig;
use crate::smoothing::{approach, lerp_point};

use super::particles::AmbientParticle;

/// Instantaneous pose of one ambient particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientInstance {
    pub position: Point3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: f32,
}

/// Step the shared progress toward 1 (exploded) or 0 (assembled).
pub fn advance_progress(progress: f32, exploded: bool, dt: f32, config: &AmbientConfig) -> f32 {
    let (target, rate) = if exploded {
        (1.0, config.explode_rate)
    } else {
        (0.0, config.assemble_rate)
    };
    approach(progress, target, rate, dt).clamp(0.0, 1.0)
}

/// Map progress to `(move_factor, scale)` for the current direction.
pub fn phase_mapping(progress: f32, exploded: bool, config: &AmbientConfig) -> (f32, f32) {
    let p = progress.clamp(0.0, 1.0);
    let size = config.particle_size;

    if exploded {
        let move_factor = p * (2.0 - p);
        let scale = if p < config.appear_start {
            0.0
        } else if p < config.scale_ramp_end {
            p / config.scale_ramp_end * size
        } else {
            size
        };
        (move_factor, scale)
    } else if p <= config.absorb_end {
        // Home already: stay put and shrink away
        let scale = if p < config.vanish_end {
            0.0
        } else {
            (p - config.vanish_end) / (config.absorb_end - config.vanish_end) * size
        };
        (0.0, scale)
    } else {
        let t = (p - config.absorb_end) / (1.0 - config.absorb_end);
        (t * t, size)
    }
}

pub fn instance(
    particle: &AmbientParticle,
    move_factor: f32,
    scale: f32,
    clock: f32,
) -> AmbientInstance {
    let spin = clock * particle.spin_speed + particle.phase;
    AmbientInstance {
        position: lerp_point(&particle.assembled, &particle.exploded, move_factor),
        rotation: Vector3::new(spin, spin, 0.0),
        scale,
    }
}
