/// Geometry primitives for the solid body
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding order
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        (v1 - v0).cross(&(v2 - v0)).normalize()
    }

    pub fn centroid(&self) -> Point3<f32> {
        let sum = self.vertices[0].position.coords + self.vertices[1].position.coords + self.vertices[2].position.coords;
        Point3::from(sum / 3.0)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Add a flat quad `a b c d` (counter-clockwise seen from `normal`).
    fn add_quad(&mut self, corners: [Point3<f32>; 4], normal: Vector3<f32>) {
        let [a, b, c, d] = corners.map(|p| Vertex::new(p, normal));
        self.add_triangle(Triangle::new(a, b, c));
        self.add_triangle(Triangle::new(a, c, d));
    }

    /// Flat ring (annulus) in the XY plane, extruded `thickness` along Z.
    ///
    /// This is the stand-in for the solid body: the swarms assemble onto the
    /// same ring radii.
    pub fn ring(inner_radius: f32, outer_radius: f32, thickness: f32, segments: usize) -> Self {
        let segments = segments.max(3);
        let half = thickness / 2.0;
        let mut mesh = Self::with_capacity(segments * 8);

        let front = Vector3::new(0.0, 0.0, 1.0);
        let back = Vector3::new(0.0, 0.0, -1.0);

        for i in 0..segments {
            let a0 = i as f32 / segments as f32 * std::f32::consts::TAU;
            let a1 = (i + 1) as f32 / segments as f32 * std::f32::consts::TAU;
            let (s0, c0) = a0.sin_cos();
            let (s1, c1) = a1.sin_cos();

            let at = |radius: f32, c: f32, s: f32, z: f32| Point3::new(radius * c, radius * s, z);

            mesh.add_quad(
                [
                    at(inner_radius, c0, s0, half),
                    at(outer_radius, c0, s0, half),
                    at(outer_radius, c1, s1, half),
                    at(inner_radius, c1, s1, half),
                ],
                front,
            );
            mesh.add_quad(
                [
                    at(inner_radius, c0, s0, -half),
                    at(inner_radius, c1, s1, -half),
                    at(outer_radius, c1, s1, -half),
                    at(outer_radius, c0, s0, -half),
                ],
                back,
            );

            let mid = (a0 + a1) / 2.0;
            let outward = Vector3::new(mid.cos(), mid.sin(), 0.0);
            mesh.add_quad(
                [
                    at(outer_radius, c0, s0, -half),
                    at(outer_radius, c1, s1, -half),
                    at(outer_radius, c1, s1, half),
                    at(outer_radius, c0, s0, half),
                ],
                outward,
            );
            mesh.add_quad(
                [
                    at(inner_radius, c0, s0, -half),
                    at(inner_radius, c0, s0, half),
                    at(inner_radius, c1, s1, half),
                    at(inner_radius, c1, s1, -half),
                ],
                -outward,
            );
        }

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_triangle_count() {
        let mesh = Mesh::ring(2.2, 3.5, 1.0, 24);
        assert_eq!(mesh.triangles.len(), 24 * 8);
    }

    #[test]
    fn test_ring_stays_within_radii() {
        let mesh = Mesh::ring(2.2, 3.5, 1.0, 16);
        for tri in &mesh.triangles {
            for v in &tri.vertices {
                let r = (v.position.x * v.position.x + v.position.y * v.position.y).sqrt();
                assert!(r >= 2.2 - 1e-4 && r <= 3.5 + 1e-4);
                assert!(v.position.z.abs() <= 0.5 + 1e-6);
            }
        }
    }

    #[test]
    fn test_ring_winding_matches_normals() {
        let mesh = Mesh::ring(1.0, 2.0, 0.5, 12);
        for tri in &mesh.triangles {
            let face = tri.calculate_normal();
            assert!(face.dot(&tri.vertices[0].normal) > 0.9);
        }
    }

    #[test]
    fn test_centroid() {
        let tri = Triangle::new(
            Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(3.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(0.0, 3.0, 0.0), Vector3::z()),
        );
        assert!((tri.centroid() - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-6);
    }
}
