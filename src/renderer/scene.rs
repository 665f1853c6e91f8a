//! Background scenery generated once per playfield size
//!
//! Positions are stored normalized so a resize only needs a regenerate, never
//! a remap. Generation is a pure function of `(width, height, seed)`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::surface::{Color, DisplayList, Paint, Surface};
use super::vertex::colors;
use crate::sim::Rect;

/// Area (px²) per star
const STAR_DENSITY: f32 = 4000.0;
/// Width (px) per building
const BUILDING_SPACING: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Normalized 0..1
    pub x: f32,
    /// Normalized 0..1
    pub y: f32,
    pub size: f32,
    pub brightness: f32,
    pub twinkle_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Building {
    /// Normalized slot position 0..1
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub brightness: f32,
}

/// Generated scenery plus the pre-recorded static background
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub stars: Vec<Star>,
    pub buildings: Vec<Building>,
    /// Sky gradient and city glow, replayed at the start of every frame
    pub background: DisplayList,
}

impl Scene {
    pub fn generate(width: f32, height: f32, seed: u64) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let mut rng = Pcg32::seed_from_u64(seed);

        let star_count = (width * height / STAR_DENSITY).floor() as usize;
        let stars = (0..star_count)
            .map(|_| Star {
                x: rng.random(),
                y: rng.random(),
                size: rng.random::<f32>() * 1.5 + 0.5,
                brightness: 0.3 + rng.random::<f32>() * 0.7,
                twinkle_speed: 0.02 + rng.random::<f32>() * 0.04,
            })
            .collect();

        let building_count = (width / BUILDING_SPACING).floor() as usize;
        let buildings = (0..building_count)
            .map(|i| Building {
                x: i as f32 / building_count as f32,
                width: 12.0 + rng.random::<f32>() * 20.0,
                height: 20.0 + rng.random::<f32>() * 80.0,
                brightness: 0.4 + rng.random::<f32>() * 0.6,
            })
            .collect();

        let mut background = DisplayList::new();
        if width > 0.0 && height > 0.0 {
            draw_static_background(&mut background, width, height);
        }

        Self {
            width,
            height,
            stars,
            buildings,
            background,
        }
    }

    /// True if this scene was generated for the given size
    pub fn matches(&self, width: f32, height: f32) -> bool {
        self.width == width && self.height == height && !self.background.is_empty()
    }
}

fn draw_static_background(surface: &mut dyn Surface, w: f32, h: f32) {
    let full = Rect::new(0.0, 0.0, w, h);

    let sky = Paint::linear(
        Vec2::ZERO,
        Vec2::new(0.0, h),
        &[
            (0.0, colors::SKY_TOP),
            (0.5, colors::BACKGROUND),
            (1.0, colors::SKY_BOTTOM),
        ],
    );
    surface.fill_rect(full, &sky);

    let bottom = Vec2::new(w / 2.0, h);
    let glow = Paint::radial(
        bottom,
        0.0,
        bottom,
        h * 0.6,
        &[(0.0, colors::CITY_GLOW), (1.0, Color::TRANSPARENT)],
    );
    surface.fill_rect(full, &glow);
}
