//! Cyber Flap - a neon side-scroller with a word-collecting unlock puzzle
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (physics, collisions, spawning, word puzzle)
//! - `renderer`: Pure drawing of game state onto a 2D surface
//! - `persistence`: Key-value storage for best score and word progress
//! - `platform`: Wall clock and frame-rate sampling
//! - `session`: Host-facing wrapper wiring engine, renderer and storage

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod reward;
pub mod session;
pub mod settings;
pub mod sim;

pub use persistence::{MemoryStorage, Storage, StorageError};
pub use renderer::Renderer;
pub use session::{Session, Snapshot};
pub use settings::Overrides;

/// Game configuration constants
///
/// Physics values are per frame; the host ticks once per display refresh.
pub mod consts {
    /// Downward acceleration added to the bird velocity every tick
    pub const GRAVITY: f32 = 0.16;
    /// Velocity set by a flap (negative is up)
    pub const JUMP_FORCE: f32 = -5.0;
    /// Maximum falling speed
    pub const TERMINAL_VELOCITY: f32 = 8.0;

    /// Pipe geometry
    pub const PIPE_WIDTH: f32 = 52.0;
    pub const PIPE_CAP_HEIGHT: f32 = 16.0;
    pub const PIPE_CAP_OVERHANG: f32 = 7.0;
    /// Pipes are dropped once their right edge passes this x
    pub const PIPE_DESPAWN_X: f32 = -20.0;

    /// Scroll speed ramps with score
    pub const BASE_PIPE_SPEED: f32 = 1.6;
    pub const MAX_PIPE_SPEED: f32 = 4.0;
    pub const SPEED_INCREMENT: f32 = 0.06;

    /// Gap shrinks with score down to a floor
    pub const BASE_PIPE_GAP: f32 = 145.0;
    pub const MIN_PIPE_GAP: f32 = 110.0;
    pub const GAP_SHRINK_PER_POINT: f32 = 0.8;

    /// Wall-clock interval between pipe spawns
    pub const PIPE_FREQUENCY_MS: f64 = 2000.0;
    /// Minimum height of either pipe segment
    pub const MIN_PIPE_TOP: f32 = 55.0;

    /// Bird sprite size; collision radius is a fraction of it
    pub const BIRD_SIZE: f32 = 14.0;
    pub const BIRD_RADIUS: f32 = BIRD_SIZE * 0.6;
    /// Bird x as a fraction of playfield width
    pub const BIRD_X_FRACTION: f32 = 0.22;
    /// Resting bird y as a fraction of playfield height
    pub const BIRD_REST_FRACTION: f32 = 0.42;

    /// Particle cap
    pub const MAX_PARTICLES: usize = 40;
    /// Alpha lost per tick
    pub const PARTICLE_FADE: f32 = 0.018;
    /// Frames between trail particles
    pub const TRAIL_INTERVAL: u64 = 4;

    /// Parallax speeds (px/frame)
    pub const STAR_SPEED: f32 = 0.15;
    pub const CITY_SPEED: f32 = 0.4;
    pub const GRID_SPEED: f32 = 0.0;

    /// Score pop lifetime in frames
    pub const SCORE_POP_FRAMES: u32 = 20;

    /// Letter pickup half-extent (square tolerance around the bird center)
    pub const COLLECT_TOLERANCE: f32 = 30.0;
    /// Collectibles are dropped once they pass this x
    pub const COLLECTIBLE_DESPAWN_X: f32 = -50.0;
    /// Pipes that must spawn in a run before the first letter appears
    pub const FIRST_LETTER_PIPES: u32 = 2;
    /// Pipes between consecutive letter spawns
    pub const LETTER_SPACING_PIPES: u32 = 2;
}

/// Pipe scroll speed for a score (px/frame), before any debug multiplier
#[inline]
pub fn effective_speed(score: u32) -> f32 {
    use consts::*;
    (BASE_PIPE_SPEED + score as f32 * SPEED_INCREMENT).min(MAX_PIPE_SPEED)
}

/// Pipe gap for a score
#[inline]
pub fn effective_gap(score: u32) -> f32 {
    use consts::*;
    (BASE_PIPE_GAP - score as f32 * GAP_SHRINK_PER_POINT).max(MIN_PIPE_GAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_ramps_and_caps() {
        assert_eq!(effective_speed(0), consts::BASE_PIPE_SPEED);
        assert!(effective_speed(10) > effective_speed(5));
        assert_eq!(effective_speed(1000), consts::MAX_PIPE_SPEED);
    }

    #[test]
    fn test_gap_shrinks_to_floor() {
        assert_eq!(effective_gap(0), consts::BASE_PIPE_GAP);
        assert!(effective_gap(10) < effective_gap(5));
        assert_eq!(effective_gap(1000), consts::MIN_PIPE_GAP);
    }
}
