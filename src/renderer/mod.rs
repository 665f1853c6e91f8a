//! Rendering module
//!
//! Reads `&GameState` and issues drawing calls on a `Surface`. Nothing here
//! feeds back into the simulation.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod mesh;
pub mod scene;
pub mod surface;
pub mod vertex;

use glam::Vec2;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use mesh::{MeshSurface, TextLabel};
pub use scene::{Building, Scene, Star};
pub use surface::{Color, ColorStop, DisplayList, DrawCommand, Paint, Surface, TextStyle};
pub use vertex::{Vertex, colors};

use crate::consts::*;
use crate::sim::collectibles::Collectible;
use crate::sim::{Bird, GameState, Particle, ParticleKind, Pipe, Rect, ScorePop, ScorePopKind};

/// Grid cell size (px)
const GRID_SPACING: f32 = 45.0;
/// Height of the glow band above the ground line
const GROUND_GLOW_HEIGHT: f32 = 30.0;
/// Half-diagonal of the letter diamond and its inner rim
const LETTER_RADIUS: f32 = 22.0;
const LETTER_RIM_RADIUS: f32 = 16.0;
/// Rise (px) of a score pop over its lifetime
const POP_RISE: f32 = 25.0;

/// Draws frames; owns the generated background scenery
#[derive(Debug, Clone)]
pub struct Renderer {
    seed: u64,
    scene: Scene,
}

impl Renderer {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            scene: Scene::default(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Rebuild stars, skyline and background for a new playfield size
    pub fn regenerate_scene(&mut self, width: f32, height: f32) {
        self.scene = Scene::generate(width, height, self.seed);
        log::debug!(
            "Scene regenerated for {}x{}: {} stars, {} buildings",
            width,
            height,
            self.scene.stars.len(),
            self.scene.buildings.len()
        );
    }

    /// Draw one frame, back to front
    pub fn draw_frame(&self, surface: &mut dyn Surface, state: &GameState) {
        if state.is_degenerate() {
            return;
        }
        let (w, h) = (state.width, state.height);
        let frame = state.frame as f32;

        surface.save();

        if self.scene.matches(w, h) {
            self.scene.background.replay(surface);
        } else {
            surface.fill_rect(Rect::new(0.0, 0.0, w, h), &Paint::Solid(colors::BACKGROUND));
        }

        draw_stars(surface, &self.scene.stars, w, h, frame);
        draw_city(surface, &self.scene.buildings, w, h, frame);
        draw_grid(surface, w, h, frame);
        draw_ground(surface, w, h);

        for pipe in &state.pipes {
            draw_pipe(surface, pipe, h);
        }

        draw_collectibles(surface, &state.collectibles.active_collectibles, frame);
        draw_particles(surface, &state.particles);
        draw_bird(surface, &state.bird, frame);
        draw_score_pops(surface, &state.score_pops);

        surface.restore();
    }
}

/// Bird tilt in radians for a vertical velocity
pub fn bird_tilt(vel: f32) -> f32 {
    (vel * 3.0).clamp(-22.0, 55.0).to_radians()
}

/// Text shown by a score pop
pub fn pop_label(kind: ScorePopKind) -> String {
    match kind {
        ScorePopKind::Point => "+1".to_string(),
        ScorePopKind::Letter(ch) => ch.to_string(),
        ScorePopKind::Word => "+KEY".to_string(),
    }
}

fn particle_color(kind: ParticleKind) -> Color {
    match kind {
        ParticleKind::Jump => colors::PARTICLE_JUMP,
        ParticleKind::Trail => colors::PARTICLE_TRAIL,
        ParticleKind::Score => colors::PARTICLE_SCORE,
    }
}

fn draw_stars(surface: &mut dyn Surface, stars: &[Star], w: f32, h: f32, frame: f32) {
    let paint = Paint::Solid(colors::STAR);
    for star in stars {
        let sx = (star.x * w + frame * STAR_SPEED) % (w + 10.0) - 5.0;
        let sy = star.y * h;
        let twinkle = star.brightness * (0.6 + 0.4 * (frame * star.twinkle_speed).sin());
        surface.set_alpha(twinkle);
        surface.fill_rect(Rect::new(sx, sy, star.size, star.size), &paint);
    }
    surface.set_alpha(1.0);
}

fn draw_city(surface: &mut dyn Surface, buildings: &[Building], w: f32, h: f32, frame: f32) {
    let base_y = h - 4.0;
    for b in buildings {
        let bx = (b.x * w * 1.5 + frame * CITY_SPEED) % (w * 1.5 + 40.0) - 20.0;
        let by = base_y - b.height;
        let rect = Rect::new(bx, by, b.width, b.height);

        let body = Paint::linear(
            Vec2::new(bx, by),
            Vec2::new(bx + b.width, by),
            &[(0.0, colors::CITY_FILL), (1.0, colors::CITY_FILL_FAR)],
        );
        surface.fill_rect(rect, &body);

        surface.set_alpha(b.brightness * 0.15);
        surface.stroke_rect(rect, colors::CITY_EDGE, 0.5);
        surface.set_alpha(1.0);
    }
}

fn draw_grid(surface: &mut dyn Surface, w: f32, h: f32, frame: f32) {
    let offset = (frame * GRID_SPEED) % GRID_SPACING;

    let mut x = -offset;
    while x < w {
        surface.line(Vec2::new(x, 0.0), Vec2::new(x, h), colors::GRID_LINE, 1.0);
        x += GRID_SPACING;
    }

    // Horizontal lines fade out toward the top
    let mut y = -offset;
    while y < h {
        surface.set_alpha((y / h * 2.0).min(1.0));
        surface.line(Vec2::new(0.0, y), Vec2::new(w, y), colors::GRID_LINE, 1.0);
        y += GRID_SPACING;
    }
    surface.set_alpha(1.0);
}

fn draw_ground(surface: &mut dyn Surface, w: f32, h: f32) {
    let gy = h - 2.0;
    let glow = Paint::linear(
        Vec2::new(0.0, gy - GROUND_GLOW_HEIGHT),
        Vec2::new(0.0, gy),
        &[(0.0, Color::TRANSPARENT), (1.0, colors::GROUND_GLOW)],
    );
    surface.fill_rect(
        Rect::new(0.0, gy - GROUND_GLOW_HEIGHT, w, GROUND_GLOW_HEIGHT),
        &glow,
    );
    surface.line(Vec2::new(0.0, gy), Vec2::new(w, gy), colors::GROUND_LINE, 1.5);
}

/// Pipe body section with edge and center lines, from `top` to `bottom`
fn draw_pipe_body(surface: &mut dyn Surface, x: f32, top: f32, bottom: f32, body: &Paint) {
    if bottom <= top {
        return;
    }
    surface.fill_rect(Rect::new(x, top, PIPE_WIDTH, bottom - top), body);
    surface.line(Vec2::new(x, top), Vec2::new(x, bottom), colors::PIPE_EDGE, 1.0);
    surface.line(
        Vec2::new(x + PIPE_WIDTH, top),
        Vec2::new(x + PIPE_WIDTH, bottom),
        colors::PIPE_EDGE,
        1.0,
    );
    let mid = x + PIPE_WIDTH / 2.0;
    surface.line(Vec2::new(mid, top), Vec2::new(mid, bottom), colors::PIPE_GLOW_LINE, 1.0);
}

fn draw_pipe(surface: &mut dyn Surface, pipe: &Pipe, h: f32) {
    let x = pipe.x;
    let cap_x = x - PIPE_CAP_OVERHANG;
    let cap_w = PIPE_WIDTH + PIPE_CAP_OVERHANG * 2.0;

    // Left-to-right shading reads as a cylinder
    let body = Paint::linear(
        Vec2::new(x, 0.0),
        Vec2::new(x + PIPE_WIDTH, 0.0),
        &[
            (0.0, colors::PIPE_SHADOW),
            (0.2, colors::PIPE_HIGHLIGHT),
            (0.5, colors::PIPE_MID),
            (0.8, colors::PIPE_HIGHLIGHT),
            (1.0, colors::PIPE_SHADOW),
        ],
    );
    let cap = Paint::linear(
        Vec2::new(cap_x, 0.0),
        Vec2::new(cap_x + cap_w, 0.0),
        &[
            (0.0, colors::PIPE_CAP_SHADOW),
            (0.3, colors::PIPE_CAP_HIGHLIGHT),
            (0.5, colors::PIPE_CAP_MID),
            (0.7, colors::PIPE_CAP_HIGHLIGHT),
            (1.0, colors::PIPE_CAP_SHADOW),
        ],
    );

    // Top segment, cap at its lower end
    let top_cap_y = pipe.top_height - PIPE_CAP_HEIGHT;
    draw_pipe_body(surface, x, 0.0, top_cap_y, &body);
    let top_cap = Rect::new(cap_x, top_cap_y, cap_w, PIPE_CAP_HEIGHT);
    surface.fill_rect(top_cap, &cap);
    surface.stroke_rect(top_cap, colors::PIPE_CAP_EDGE, 1.0);

    // Bottom segment, cap at its upper end
    let bottom_y = pipe.gap_bottom();
    draw_pipe_body(surface, x, bottom_y + PIPE_CAP_HEIGHT, h, &body);
    let bottom_cap = Rect::new(cap_x, bottom_y, cap_w, PIPE_CAP_HEIGHT);
    surface.fill_rect(bottom_cap, &cap);
    surface.stroke_rect(bottom_cap, colors::PIPE_CAP_EDGE, 1.0);
}

fn diamond(r: f32) -> [Vec2; 4] {
    [
        Vec2::new(0.0, -r),
        Vec2::new(r, 0.0),
        Vec2::new(0.0, r),
        Vec2::new(-r, 0.0),
    ]
}

fn draw_collectibles(surface: &mut dyn Surface, items: &[Collectible], frame: f32) {
    let bob = (frame * 0.1).sin() * 3.0;
    let glow_radius = 35.0 + (frame * 0.15).sin() * 5.0;
    let glow = Paint::radial(
        Vec2::ZERO,
        0.0,
        Vec2::ZERO,
        glow_radius,
        &[
            (0.0, colors::LETTER_GLOW),
            (1.0, colors::LETTER_GLOW.with_alpha(0.0)),
        ],
    );
    let style = TextStyle {
        size: 24.0,
        weight: 900,
        color: Color::WHITE,
        glow: Some((colors::LETTER_EDGE, 10.0)),
    };

    for item in items.iter().filter(|c| !c.collected) {
        surface.save();
        surface.translate(Vec2::new(item.pos.x, item.pos.y + bob));

        surface.fill_circle(Vec2::ZERO, glow_radius, &glow);

        let outer = diamond(LETTER_RADIUS);
        surface.fill_polygon(&outer, &Paint::Solid(colors::LETTER_FILL));
        surface.stroke_polygon(&outer, colors::LETTER_EDGE, 3.0);
        surface.stroke_polygon(&diamond(LETTER_RIM_RADIUS), colors::LETTER_RIM, 1.0);

        let mut buf = [0u8; 4];
        surface.text(item.ch.encode_utf8(&mut buf), Vec2::new(0.0, 2.0), &style);

        surface.restore();
    }
}

fn draw_particles(surface: &mut dyn Surface, particles: &[Particle]) {
    for p in particles {
        surface.set_alpha(p.alpha);
        let half = p.size / 2.0;
        surface.fill_rect(
            Rect::new(p.pos.x - half, p.pos.y - half, p.size, p.size),
            &Paint::Solid(particle_color(p.kind)),
        );
    }
    surface.set_alpha(1.0);
}

fn draw_bird(surface: &mut dyn Surface, bird: &Bird, frame: f32) {
    let s = BIRD_SIZE;
    surface.save();
    surface.translate(bird.pos);
    surface.rotate(bird_tilt(bird.vel));

    // Thruster flame
    let thrust_len = 12.0 + (frame * 0.4).sin() * 4.0;
    let thrust = Paint::linear(
        Vec2::new(-s, 0.0),
        Vec2::new(-s - thrust_len, 0.0),
        &[
            (0.0, colors::THRUST_START),
            (0.5, colors::THRUST_MID),
            (1.0, Color::TRANSPARENT),
        ],
    );
    surface.fill_polygon(
        &[
            Vec2::new(-s * 0.6, -s * 0.25),
            Vec2::new(-s - thrust_len, 0.0),
            Vec2::new(-s * 0.6, s * 0.25),
        ],
        &thrust,
    );

    // Outer glow
    let glow_r = s + 4.0 + (frame * 0.12).sin() * 1.5;
    let glow = Paint::radial(
        Vec2::splat(-s * 0.15),
        0.0,
        Vec2::ZERO,
        glow_r,
        &[(0.0, colors::BIRD_GLOW), (1.0, colors::BIRD_GLOW.with_alpha(0.0))],
    );
    surface.fill_circle(Vec2::ZERO, glow_r, &glow);

    // Body
    let body = Paint::radial(
        Vec2::splat(-s * 0.25),
        s * 0.1,
        Vec2::ZERO,
        s,
        &[
            (0.0, colors::BIRD_HIGHLIGHT),
            (0.45, colors::BIRD_CORE),
            (1.0, colors::BIRD_DARK),
        ],
    );
    surface.fill_circle(Vec2::ZERO, s, &body);
    surface.stroke_circle(Vec2::ZERO, s, colors::BIRD_RING, 1.0);

    // Core and eye
    surface.fill_circle(Vec2::ZERO, s * 0.35, &Paint::Solid(colors::BACKGROUND));
    let eye = Paint::radial(
        Vec2::ZERO,
        0.0,
        Vec2::ZERO,
        s * 0.22,
        &[
            (0.0, Color::WHITE),
            (0.5, colors::BIRD_CORE),
            (1.0, colors::BIRD_CORE.with_alpha(0.0)),
        ],
    );
    surface.fill_circle(Vec2::ZERO, s * 0.22, &eye);

    surface.restore();
}

fn draw_score_pops(surface: &mut dyn Surface, pops: &[ScorePop]) {
    for pop in pops {
        let progress = pop.progress();
        let scale = 1.0 + progress * 0.3;
        let style = TextStyle {
            size: (14.0 * scale).round(),
            weight: 700,
            color: colors::POP,
            glow: None,
        };
        surface.save();
        surface.set_alpha(1.0 - progress);
        surface.text(
            &pop_label(pop.kind),
            pop.pos - Vec2::new(0.0, progress * POP_RISE),
            &style,
        );
        surface.restore();
    }
}
