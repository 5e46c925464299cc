/// Scene rotation state and instance transforms
use nalgebra::{Matrix4, Point3, Vector3};

use crate::smoothing::approach_per_tick;

/// Euler rotation around three axes (in radians), applied X then Y then Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Ease pitch and yaw toward a target at a per-tick rate
    pub fn follow(&mut self, pitch: f32, yaw: f32, rate: f32) {
        self.x = approach_per_tick(self.x, pitch, rate);
        self.y = approach_per_tick(self.y, yaw, rate);
    }

    pub fn as_vector(&self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Vector3<f32>> for RotationState {
    fn from(v: Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation matrix for an XYZ Euler rotation (Rx * Ry * Rz)
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        rx * ry * rz
    }

    /// Translate, rotate, and uniformly scale one instanced particle
    pub fn instance_matrix(position: &Point3<f32>, rotation: &RotationState, scale: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&position.coords)
            * Self::rotation_matrix(rotation)
            * Matrix4::new_scaling(scale)
    }
}
