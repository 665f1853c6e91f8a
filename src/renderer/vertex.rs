//! Vertex type for tessellated 2D output, plus the colour palette

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position and straight (non-premultiplied) colour
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Byte stride for a tightly packed vertex buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
    /// Byte offset of `color` within a vertex
    pub const COLOR_OFFSET: usize = std::mem::size_of::<[f32; 2]>();

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Colours for game elements
pub mod colors {
    use crate::renderer::surface::Color;

    pub const BACKGROUND: Color = Color::hex(0x060a14);
    pub const SKY_TOP: Color = Color::hex(0x030610);
    pub const SKY_BOTTOM: Color = Color::hex(0x0a1020);

    pub const BIRD_HIGHLIGHT: Color = Color::hex(0x99ffff);
    pub const BIRD_CORE: Color = Color::hex(0x00e5ff);
    pub const BIRD_DARK: Color = Color::hex(0x004455);
    pub const BIRD_RING: Color = Color::rgba8(0, 255, 255, 0.35);
    pub const BIRD_GLOW: Color = Color::rgba8(0, 255, 255, 0.12);
    pub const THRUST_START: Color = Color::rgba8(0, 229, 255, 0.7);
    pub const THRUST_MID: Color = Color::rgba8(255, 0, 255, 0.3);

    pub const PIPE_HIGHLIGHT: Color = Color::rgba8(0, 240, 255, 0.22);
    pub const PIPE_MID: Color = Color::rgba8(0, 180, 210, 0.10);
    pub const PIPE_SHADOW: Color = Color::rgba8(0, 60, 80, 0.18);
    pub const PIPE_EDGE: Color = Color::rgba8(0, 255, 255, 0.35);
    pub const PIPE_CAP_HIGHLIGHT: Color = Color::rgba8(0, 255, 255, 0.30);
    pub const PIPE_CAP_MID: Color = Color::rgba8(0, 255, 255, 0.18);
    pub const PIPE_CAP_SHADOW: Color = Color::rgba8(0, 120, 140, 0.22);
    pub const PIPE_CAP_EDGE: Color = Color::rgba8(0, 255, 255, 0.50);
    pub const PIPE_GLOW_LINE: Color = Color::rgba8(0, 255, 255, 0.12);

    pub const GRID_LINE: Color = Color::rgba8(0, 255, 255, 0.03);
    pub const GROUND_GLOW: Color = Color::rgba8(0, 255, 255, 0.12);
    pub const GROUND_LINE: Color = Color::rgba8(0, 255, 255, 0.25);

    pub const STAR: Color = Color::hex(0xaaeeff);
    pub const CITY_GLOW: Color = Color::rgba8(0, 255, 255, 0.06);
    pub const CITY_FILL: Color = Color::rgba8(0, 180, 210, 0.08);
    pub const CITY_FILL_FAR: Color = Color::rgba8(0, 80, 100, 0.04);
    pub const CITY_EDGE: Color = Color::rgba8(0, 255, 255, 0.12);

    pub const LETTER_GLOW: Color = Color::rgba8(0, 255, 255, 0.6);
    pub const LETTER_FILL: Color = Color::hex(0x0a1525);
    pub const LETTER_EDGE: Color = Color::hex(0x00ffff);
    pub const LETTER_RIM: Color = Color::rgba8(0, 255, 255, 0.3);

    pub const POP: Color = Color::hex(0xff00ff);

    pub const PARTICLE_JUMP: Color = Color::hex(0x00ffff);
    pub const PARTICLE_TRAIL: Color = Color::hex(0x00ccdd);
    pub const PARTICLE_SCORE: Color = Color::hex(0xff00ff);
}
