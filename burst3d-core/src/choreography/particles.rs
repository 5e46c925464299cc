/// Seeded particle layouts
///
/// Each particle draws from its own RNG seeded by `(seed, layer, index)`, so a
/// particle's poses do not depend on how many particles are built around it.
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

use crate::config::{AmbientConfig, PhotoConfig};

const AMBIENT_SALT: u64 = 0xa3b1_0c5e_d00d_0001;
const PHOTO_SALT: u64 = 0x9407_0c5e_d00d_0002;

/// Immutable layout of one ambient swarm particle
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientParticle {
    pub assembled: Point3<f32>,
    pub exploded: Point3<f32>,
    /// Radians per second around X and Y
    pub spin_speed: f32,
    pub phase: f32,
}

/// A photo pose: where it sits, how it is tilted, and how big it is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoPose {
    pub position: Point3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: f32,
}

/// Immutable layout of one photo particle
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoParticle {
    pub assembled: PhotoPose,
    pub exploded: PhotoPose,
    pub phase: f32,
}

impl PhotoParticle {
    /// Straight-line distance between the two poses
    pub fn travel_distance(&self) -> f32 {
        (self.exploded.position - self.assembled.position).norm()
    }
}

fn particle_rng(seed: u64, salt: u64, index: usize) -> StdRng {
    let mixed = seed
        .wrapping_mul(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(salt)
        ^ (index as u64).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    StdRng::seed_from_u64(mixed)
}

/// Area-uniform radius in the annulus [inner, outer]
fn annulus_radius(rng: &mut StdRng, inner: f32, outer: f32) -> f32 {
    (rng.gen::<f32>() * (outer * outer - inner * inner) + inner * inner).sqrt()
}

/// Ambient particle `index`: a point of the disc (ring face or inner hub wall)
/// that flies to a spherical shell between half and full explosion radius.
pub fn ambient_particle(config: &AmbientConfig, seed: u64, index: usize) -> AmbientParticle {
    let mut rng = particle_rng(seed, AMBIENT_SALT, index);

    let assembled = if rng.gen::<f32>() < config.hub_fraction {
        let angle = rng.gen::<f32>() * TAU;
        let z = (rng.gen::<f32>() - 0.5) * config.ring_thickness;
        Point3::new(angle.cos() * config.ring_inner, angle.sin() * config.ring_inner, z)
    } else {
        let angle = rng.gen::<f32>() * TAU;
        let r = annulus_radius(&mut rng, config.ring_inner, config.ring_outer);
        let z = (rng.gen::<f32>() - 0.5) * config.ring_thickness;
        Point3::new(angle.cos() * r, angle.sin() * r, z)
    };

    // Uniform direction on the sphere
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let dist = config.explosion_radius * (0.5 + rng.gen::<f32>() * 0.5);
    let exploded = Point3::new(
        dist * phi.sin() * theta.cos(),
        dist * phi.sin() * theta.sin(),
        dist * phi.cos(),
    );

    AmbientParticle {
        assembled,
        exploded,
        spin_speed: rng.gen::<f32>() * config.max_spin_speed,
        phase: rng.gen::<f32>() * PI,
    }
}

/// Photo particle `index`: hidden inside the disc when assembled, scattered in
/// a cube and tilted toward the viewer when exploded.
pub fn photo_particle(config: &PhotoConfig, seed: u64, index: usize) -> PhotoParticle {
    let mut rng = particle_rng(seed, PHOTO_SALT, index);

    let r = annulus_radius(&mut rng, config.ring_inner, config.ring_outer);
    let theta = rng.gen::<f32>() * TAU;
    let z = (rng.gen::<f32>() - 0.5) * config.ring_thickness;
    let assembled = PhotoPose {
        position: Point3::new(r * theta.cos(), r * theta.sin(), z),
        rotation: Vector3::zeros(),
        scale: config.assembled_scale,
    };

    let range = config.scatter_range;
    let position = Point3::new(
        (rng.gen::<f32>() - 0.5) * range,
        (rng.gen::<f32>() - 0.5) * range,
        (rng.gen::<f32>() - 0.5) * range,
    );
    let rotation = Vector3::new(
        rng.gen::<f32>() * config.max_tilt,
        rng.gen::<f32>() * config.max_tilt,
        0.0,
    );
    let exploded = PhotoPose {
        position,
        rotation,
        scale: config.exploded_scale,
    };

    PhotoParticle {
        assembled,
        exploded,
        phase: rng.gen::<f32>() * TAU,
    }
}

pub fn build_ambient(config: &AmbientConfig, seed: u64) -> Vec<AmbientParticle> {
    (0..config.count)
        .map(|i| ambient_particle(config, seed, i))
        .collect()
}

pub fn build_photos(config: &PhotoConfig, seed: u64) -> Vec<PhotoParticle> {
    (0..config.count)
        .map(|i| photo_particle(config, seed, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_layout() {
        let config = AmbientConfig::default();
        assert_eq!(ambient_particle(&config, 42, 7), ambient_particle(&config, 42, 7));
        let photos = PhotoConfig::default();
        assert_eq!(photo_particle(&photos, 42, 3), photo_particle(&photos, 42, 3));
    }

    #[test]
    fn test_particle_independent_of_population_size() {
        let mut small = AmbientConfig::default();
        small.count = 10;
        let mut large = small.clone();
        large.count = 200;
        let a = build_ambient(&small, 9);
        let b = build_ambient(&large, 9);
        assert_eq!(a[..], b[..10]);
    }

    #[test]
    fn test_different_seeds_differ() {
        let config = AmbientConfig::default();
        assert_ne!(ambient_particle(&config, 1, 0), ambient_particle(&config, 2, 0));
    }

    #[test]
    fn test_ambient_layout_bounds() {
        let mut config = AmbientConfig::default();
        config.count = 500;
        for p in build_ambient(&config, 1234) {
            let r = p.assembled.xy().coords.norm();
            assert!(r >= config.ring_inner - 1e-4 && r <= config.ring_outer + 1e-4);
            assert!(p.assembled.z.abs() <= config.ring_thickness / 2.0 + 1e-6);

            let dist = p.exploded.coords.norm();
            assert!(dist >= config.explosion_radius * 0.5 - 1e-3);
            assert!(dist <= config.explosion_radius + 1e-3);

            assert!(p.spin_speed >= 0.0 && p.spin_speed <= config.max_spin_speed);
            assert!(p.phase >= 0.0 && p.phase <= PI);
        }
    }

    #[test]
    fn test_photo_layout_bounds() {
        let config = PhotoConfig::default();
        let photos = build_photos(&config, 77);
        assert_eq!(photos.len(), config.count);
        for p in &photos {
            let r = p.assembled.position.xy().coords.norm();
            assert!(r >= config.ring_inner - 1e-4 && r <= config.ring_outer + 1e-4);
            assert_eq!(p.assembled.scale, config.assembled_scale);
            assert_eq!(p.exploded.scale, config.exploded_scale);
            let half = config.scatter_range / 2.0;
            assert!(p.exploded.position.coords.amax() <= half + 1e-4);
            assert!(p.exploded.rotation.x >= 0.0 && p.exploded.rotation.x <= config.max_tilt);
            assert_eq!(p.exploded.rotation.z, 0.0);
            assert!(p.travel_distance() > 0.0);
        }
    }
}
