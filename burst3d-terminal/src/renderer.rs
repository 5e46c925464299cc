/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use std::io::Write;
use burst3d_core::{Camera, Mesh, Triangle};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Glyph for a glowing particle
pub const GLOW_GLYPH: char = '*';
/// Glyph for a photo card once it has landed
pub const PHOTO_GLYPH: char = '▣';
/// Glyph for ambient swarm particles
pub const DUST_GLYPH: char = '·';

/// ASCII renderer that converts meshes and particles to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Rasterize a mesh with brightness scaled by `opacity`.
    pub fn render_mesh(&mut self, mesh: &Mesh, model_matrix: &Matrix4<f32>, camera: &Camera, opacity: f32) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_matrix, camera, opacity);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, model_matrix: &Matrix4<f32>, camera: &Camera, opacity: f32) {
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(&vertex.position, model_matrix, self.width as u32, self.height as u32) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Shade by the world-space normal against a light behind the camera
        let normal = model_matrix.transform_vector(&triangle.calculate_normal());
        let light_dir = (camera.position - camera.target).normalize();
        let brightness = normal.dot(&light_dir).abs() * opacity.clamp(0.0, 1.0);

        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
        let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];
        if character == ' ' {
            return;
        }

        self.rasterize_triangle(&screen_coords, character);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box, clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py)) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.write(x as usize, y as usize, depth, character);
                    }
                }
            }
        }
    }

    /// Plot a single world-space point as `glyph`, depth tested.
    pub fn plot_point(&mut self, point: &Point3<f32>, model_matrix: &Matrix4<f32>, camera: &Camera, glyph: char) {
        if let Some((x, y, depth)) =
            camera.project_to_screen(point, model_matrix, self.width as u32, self.height as u32)
        {
            let (x, y) = (x.floor() as usize, y.floor() as usize);
            if x < self.width && y < self.height {
                self.write(x, y, depth, glyph);
            }
        }
    }

    fn write(&mut self, x: usize, y: usize, depth: f32, character: char) {
        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    GLOW_GLYPH | DUST_GLYPH => Color::Blue,
                    PHOTO_GLYPH => Color::White,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(v0: (f32, f32), v1: (f32, f32), v2: (f32, f32), p: (f32, f32)) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(width: usize, height: usize) -> Camera {
        let mut camera = Camera::new(width as u32, height as u32);
        camera.set_distance(12.0);
        camera
    }

    fn count(renderer: &AsciiRenderer, pred: impl Fn(char) -> bool) -> usize {
        let (w, h) = renderer.size();
        (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.char_at(x, y).map_or(false, &pred))
            .count()
    }

    #[test]
    fn test_barycentric_inside() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (1.0, 1.0)).unwrap();
        assert!((w0 + w1 + w2 - 1.0).abs() < 1e-6);
        assert!(w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0);
    }

    #[test]
    fn test_opaque_ring_draws_pixels() {
        let mut renderer = AsciiRenderer::new(80, 40);
        let mesh = Mesh::ring(2.2, 3.5, 1.0, 24);
        renderer.render_mesh(&mesh, &Matrix4::identity(), &camera(80, 40), 1.0);
        assert!(count(&renderer, |c| c != ' ') > 50);
    }

    #[test]
    fn test_transparent_ring_draws_nothing() {
        let mut renderer = AsciiRenderer::new(80, 40);
        let mesh = Mesh::ring(2.2, 3.5, 1.0, 24);
        renderer.render_mesh(&mesh, &Matrix4::identity(), &camera(80, 40), 0.0);
        assert_eq!(count(&renderer, |c| c != ' '), 0);
    }

    #[test]
    fn test_plot_point_respects_depth() {
        let mut renderer = AsciiRenderer::new(80, 40);
        let camera = camera(80, 40);
        let model = Matrix4::identity();
        renderer.plot_point(&Point3::new(0.0, 0.0, 0.0), &model, &camera, DUST_GLYPH);
        // A point behind the first one on the same ray stays hidden
        let behind = camera.target - (camera.position - camera.target) * 0.2;
        renderer.plot_point(&behind, &model, &camera, GLOW_GLYPH);
        assert_eq!(count(&renderer, |c| c == DUST_GLYPH), 1);
        assert_eq!(count(&renderer, |c| c == GLOW_GLYPH), 0);
    }

    #[test]
    fn test_clear_resets_buffers() {
        let mut renderer = AsciiRenderer::new(10, 10);
        renderer.plot_point(&Point3::origin(), &Matrix4::identity(), &camera(10, 10), GLOW_GLYPH);
        renderer.clear();
        assert_eq!(count(&renderer, |c| c != ' '), 0);
    }
}
