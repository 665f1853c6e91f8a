//! Collision detection for the bird
//!
//! The bird is a circle; pipe segments are axis-aligned rectangles.

use glam::Vec2;

use super::state::Pipe;
use crate::consts::PIPE_WIDTH;

/// Axis-aligned rectangle (min corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}

/// Which boundary the bird touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsHit {
    Ceiling,
    Floor,
}

/// True if the circle overlaps the rectangle
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    if rect.is_empty() {
        return false;
    }
    let closest = center.clamp(rect.min, rect.max());
    center.distance_squared(closest) < radius * radius
}

/// Solid regions of a pipe: top segment from the ceiling, bottom segment to `floor_y`
pub fn pipe_solids(pipe: &Pipe, floor_y: f32) -> [Rect; 2] {
    let bottom = pipe.gap_bottom();
    [
        Rect::new(pipe.x, 0.0, PIPE_WIDTH, pipe.top_height),
        Rect::new(pipe.x, bottom, PIPE_WIDTH, (floor_y - bottom).max(0.0)),
    ]
}

/// True if the circle touches either solid segment of the pipe
pub fn hits_pipe(center: Vec2, radius: f32, pipe: &Pipe, floor_y: f32) -> bool {
    pipe_solids(pipe, floor_y)
        .iter()
        .any(|r| circle_rect_overlap(center, radius, r))
}

/// Check the circle against the playfield's top and bottom edges
pub fn check_bounds(y: f32, radius: f32, height: f32) -> Option<BoundsHit> {
    if y - radius < 0.0 {
        Some(BoundsHit::Ceiling)
    } else if y + radius > height {
        Some(BoundsHit::Floor)
    } else {
        None
    }
}

/// Square tolerance test used for pickups
pub fn within_tolerance(a: Vec2, b: Vec2, tolerance: f32) -> bool {
    let d = (a - b).abs();
    d.x < tolerance && d.y < tolerance
}
