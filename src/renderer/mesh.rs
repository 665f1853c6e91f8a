//! Tessellating surface for GPU hosts
//!
//! Turns surface calls into a flat triangle list (`Vertex`, three per
//! triangle) plus text labels for the host to rasterize. Gradients are
//! approximated with per-vertex colours over subdivided geometry.

use glam::{Affine2, Vec2};
use std::f32::consts::PI;

use super::surface::{Color, Paint, Surface, TextStyle};
use super::vertex::Vertex;
use crate::sim::Rect;

/// Segments for a full circle
const CIRCLE_SEGMENTS: u32 = 24;
/// Subdivisions per axis (rects) or rings (circles) for gradient paints
const GRADIENT_STEPS: u32 = 6;

/// Text to draw at a surface position
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    /// Anchor after the current transform
    pub position: Vec2,
    pub style: TextStyle,
    /// Global alpha at the time of the call
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct MeshSurface {
    vertices: Vec<Vertex>,
    labels: Vec<TextLabel>,
    transform: Affine2,
    alpha: f32,
    stack: Vec<(Affine2, f32)>,
}

impl Default for MeshSurface {
    fn default() -> Self {
        Self::new()
    }
}

fn steps_for(paint: &Paint) -> u32 {
    match paint {
        Paint::Solid(_) => 1,
        _ => GRADIENT_STEPS,
    }
}

fn unit_circle(i: u32) -> Vec2 {
    let theta = (i as f32 / CIRCLE_SEGMENTS as f32) * 2.0 * PI;
    Vec2::new(theta.cos(), theta.sin())
}

impl MeshSurface {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            labels: Vec::new(),
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            stack: Vec::new(),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    /// Vertex data ready for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Drop geometry and reset state for the next frame
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.labels.clear();
        self.transform = Affine2::IDENTITY;
        self.alpha = 1.0;
        self.stack.clear();
    }

    fn emit(&mut self, local: Vec2, color: Color) {
        let p = self.transform.transform_point2(local);
        let c = color.with_alpha(color.a * self.alpha);
        self.vertices.push(Vertex::new(p.x, p.y, c.to_array()));
    }

    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, paint: &Paint) {
        self.emit(a, paint.sample(a));
        self.emit(b, paint.sample(b));
        self.emit(c, paint.sample(c));
    }

    /// Quad from corners in winding order
    fn quad(&mut self, corners: [Vec2; 4], paint: &Paint) {
        let [a, b, c, d] = corners;
        self.triangle(a, b, c, paint);
        self.triangle(c, d, a, paint);
    }
}

impl Surface for MeshSurface {
    fn save(&mut self) {
        self.stack.push((self.transform, self.alpha));
    }

    fn restore(&mut self) {
        if let Some((transform, alpha)) = self.stack.pop() {
            self.transform = transform;
            self.alpha = alpha;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.transform = self.transform * Affine2::from_translation(offset);
    }

    fn rotate(&mut self, radians: f32) {
        self.transform = self.transform * Affine2::from_angle(radians);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        if rect.is_empty() {
            return;
        }
        let steps = steps_for(paint);
        let cell = rect.size / steps as f32;
        for j in 0..steps {
            for i in 0..steps {
                let min = rect.min + cell * Vec2::new(i as f32, j as f32);
                let max = min + cell;
                self.quad(
                    [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
                    paint,
                );
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        let min = rect.min;
        let max = rect.max();
        let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
        self.stroke_polygon(&corners, color, width);
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        let dir = (to - from).normalize_or_zero();
        if dir == Vec2::ZERO || width <= 0.0 {
            return;
        }
        let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
        self.quad(
            [from + perp, to + perp, to - perp, from - perp],
            &Paint::Solid(color),
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        if radius <= 0.0 {
            return;
        }
        let rings = steps_for(paint);
        for k in 0..rings {
            let r_in = radius * k as f32 / rings as f32;
            let r_out = radius * (k + 1) as f32 / rings as f32;
            for i in 0..CIRCLE_SEGMENTS {
                let (u1, u2) = (unit_circle(i), unit_circle(i + 1));
                let outer1 = center + u1 * r_out;
                let outer2 = center + u2 * r_out;
                if k == 0 {
                    self.triangle(center, outer1, outer2, paint);
                } else {
                    let inner1 = center + u1 * r_in;
                    let inner2 = center + u2 * r_in;
                    self.quad([inner1, outer1, outer2, inner2], paint);
                }
            }
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32) {
        if width <= 0.0 {
            return;
        }
        let r_in = (radius - width / 2.0).max(0.0);
        let r_out = radius + width / 2.0;
        let paint = Paint::Solid(color);
        for i in 0..CIRCLE_SEGMENTS {
            let (u1, u2) = (unit_circle(i), unit_circle(i + 1));
            self.quad(
                [center + u1 * r_in, center + u1 * r_out, center + u2 * r_out, center + u2 * r_in],
                &paint,
            );
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        for pair in rest.windows(2) {
            self.triangle(first, pair[0], pair[1], paint);
        }
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, width: f32) {
        if points.len() < 2 {
            return;
        }
        for i in 0..points.len() {
            let next = points[(i + 1) % points.len()];
            self.line(points[i], next, color, width);
        }
    }

    fn text(&mut self, text: &str, anchor: Vec2, style: &TextStyle) {
        self.labels.push(TextLabel {
            text: text.to_string(),
            position: self.transform.transform_point2(anchor),
            style: *style,
            alpha: self.alpha,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid() -> Paint {
        Paint::Solid(Color::WHITE)
    }

    #[test]
    fn test_solid_rect_is_two_triangles() {
        let mut mesh = MeshSurface::new();
        mesh.fill_rect(Rect::new(0.0, 0.0, 10.0, 5.0), &solid());
        assert_eq!(mesh.vertices().len(), 6);
        assert_eq!(mesh.vertex_bytes().len(), 6 * Vertex::STRIDE);
    }

    #[test]
    fn test_gradient_rect_is_subdivided() {
        let mut mesh = MeshSurface::new();
        let paint = Paint::linear(
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            &[(0.0, Color::TRANSPARENT), (1.0, Color::WHITE)],
        );
        mesh.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), &paint);
        let n = (GRADIENT_STEPS * GRADIENT_STEPS * 6) as usize;
        assert_eq!(mesh.vertices().len(), n);
        // Leftmost vertices carry the first stop, rightmost the last
        for v in mesh.vertices() {
            if v.position[0] == 0.0 {
                assert_eq!(v.color[3], 0.0);
            }
            if v.position[0] == 10.0 {
                assert_eq!(v.color[3], 1.0);
            }
        }
    }

    #[test]
    fn test_empty_shapes_emit_nothing() {
        let mut mesh = MeshSurface::new();
        mesh.fill_rect(Rect::new(0.0, 0.0, 0.0, 5.0), &solid());
        mesh.line(Vec2::ONE, Vec2::ONE, Color::WHITE, 1.0);
        mesh.fill_circle(Vec2::ZERO, 0.0, &solid());
        mesh.fill_polygon(&[Vec2::ZERO, Vec2::ONE], &solid());
        assert!(mesh.vertices().is_empty());
    }

    #[test]
    fn test_transform_and_alpha() {
        let mut mesh = MeshSurface::new();
        mesh.save();
        mesh.translate(Vec2::new(100.0, 50.0));
        mesh.set_alpha(0.5);
        mesh.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), &solid());
        mesh.restore();
        mesh.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), &solid());

        let v = mesh.vertices();
        assert_eq!(v[0].position, [100.0, 50.0]);
        assert_eq!(v[0].color[3], 0.5);
        assert_eq!(v[6].position, [0.0, 0.0]);
        assert_eq!(v[6].color[3], 1.0);
    }

    #[test]
    fn test_rotation() {
        let mut mesh = MeshSurface::new();
        mesh.translate(Vec2::new(10.0, 0.0));
        mesh.rotate(PI / 2.0);
        mesh.text("a", Vec2::new(1.0, 0.0), &TextStyle {
            size: 10.0,
            weight: 400,
            color: Color::WHITE,
            glow: None,
        });
        let p = mesh.labels()[0].position;
        assert!((p - Vec2::new(10.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_circle_and_polygon_counts() {
        let mut mesh = MeshSurface::new();
        mesh.fill_circle(Vec2::ZERO, 5.0, &solid());
        assert_eq!(mesh.vertices().len(), (CIRCLE_SEGMENTS * 3) as usize);

        mesh.clear();
        let diamond = [
            Vec2::new(0.0, -1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
        ];
        mesh.fill_polygon(&diamond, &solid());
        assert_eq!(mesh.vertices().len(), 6);

        mesh.clear();
        mesh.stroke_polygon(&diamond, Color::WHITE, 2.0);
        assert_eq!(mesh.vertices().len(), 4 * 6);
    }

    #[test]
    fn test_unbalanced_restore_is_ignored() {
        let mut mesh = MeshSurface::new();
        mesh.translate(Vec2::new(5.0, 5.0));
        mesh.restore();
        mesh.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), &solid());
        assert_eq!(mesh.vertices()[0].position, [5.0, 5.0]);
    }
}
