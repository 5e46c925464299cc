/// Exponential approach toward a target
///
/// Every smoothed quantity in the scene (rotation, camera distance, opacity,
/// swarm progress, particle poses, material colors) is a parameterization of
/// [`approach`]. Per-tick rates are expressed by passing `dt = 1.0`.
use nalgebra::{Point3, Vector3};

/// Move `current` toward `target` by the fraction `min(1, rate * dt)`.
///
/// A fraction of 1 lands exactly on the target, so large time steps never
/// overshoot.
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * step_fraction(rate, dt)
}

/// Per-tick form of [`approach`].
pub fn approach_per_tick(current: f32, target: f32, rate: f32) -> f32 {
    approach(current, target, rate, 1.0)
}

pub fn approach_point(current: &Point3<f32>, target: &Point3<f32>, rate: f32, dt: f32) -> Point3<f32> {
    current + (target - current) * step_fraction(rate, dt)
}

pub fn approach_vector(current: &Vector3<f32>, target: &Vector3<f32>, rate: f32, dt: f32) -> Vector3<f32> {
    current + (target - current) * step_fraction(rate, dt)
}

/// Linear interpolation between two points, `t` unclamped.
pub fn lerp_point(from: &Point3<f32>, to: &Point3<f32>, t: f32) -> Point3<f32> {
    from + (to - from) * t
}

fn step_fraction(rate: f32, dt: f32) -> f32 {
    (rate * dt).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_moves_by_fraction() {
        let next = approach(0.0, 10.0, 2.0, 0.1);
        assert!((next - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_approach_never_overshoots() {
        let next = approach(0.0, 10.0, 20.0, 1.0);
        assert_eq!(next, 10.0);
        let next = approach(5.0, -3.0, 100.0, 0.5);
        assert_eq!(next, -3.0);
    }

    #[test]
    fn test_approach_zero_dt_holds() {
        assert_eq!(approach(4.0, 9.0, 3.0, 0.0), 4.0);
    }

    #[test]
    fn test_per_tick_rate() {
        let next = approach_per_tick(0.0, 1.0, 0.1);
        assert!((next - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_approach_point_is_componentwise() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, -4.0, 8.0);
        let p = approach_point(&a, &b, 0.5, 1.0);
        assert!((p - Point3::new(1.0, -2.0, 4.0)).norm() < 1e-6);
    }

    #[test]
    fn test_lerp_point_endpoints() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(-1.0, 0.0, 5.0);
        assert!((lerp_point(&a, &b, 0.0) - a).norm() < 1e-6);
        assert!((lerp_point(&a, &b, 1.0) - b).norm() < 1e-6);
    }
}
