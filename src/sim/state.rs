//! Game state and core simulation types
//!
//! One `GameState` is live per session. Engine functions take it by `&mut`
//! and mutate in place; the renderer only ever sees `&GameState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collectibles::CollectiblesState;
use crate::consts::*;
use crate::highscores::load_high_score;
use crate::persistence::Storage;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu; bird bobs in place
    #[default]
    Idle,
    /// Active run
    Playing,
    /// Run ended by collision
    Dead,
}

/// The player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    /// Center; x is fixed for the session, only y moves
    pub pos: Vec2,
    /// Vertical velocity (px/frame, positive is down)
    pub vel: f32,
    /// Collision radius
    pub radius: f32,
}

impl Default for Bird {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: 0.0,
            radius: BIRD_RADIUS,
        }
    }
}

/// A top/bottom obstacle pair around a gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    /// Height of the top segment (gap starts here)
    pub top_height: f32,
    /// Gap size at spawn time
    pub gap: f32,
    /// Set once when the bird passes; never cleared
    pub scored: bool,
}

impl Pipe {
    pub fn right(&self) -> f32 {
        self.x + PIPE_WIDTH
    }

    /// Top of the bottom segment
    pub fn gap_bottom(&self) -> f32 {
        self.top_height + self.gap
    }

    /// Center of the gap
    pub fn gap_center(&self) -> Vec2 {
        Vec2::new(self.x + PIPE_WIDTH / 2.0, self.top_height + self.gap / 2.0)
    }
}

/// Which effect emitted a particle (renderer picks the colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Jump,
    Trail,
    Score,
}

/// A particle for visual effects (never collides)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1 = opaque; removed at 0
    pub alpha: f32,
    pub size: f32,
    pub kind: ParticleKind,
}

/// What a floating label announces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorePopKind {
    /// Pipe passed
    Point,
    /// Letter picked up
    Letter(char),
    /// Word completed
    Word,
}

/// Floating label that rises and fades
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorePop {
    pub pos: Vec2,
    /// Frames since spawn
    pub frame: u32,
    pub kind: ScorePopKind,
}

impl ScorePop {
    pub fn new(pos: Vec2, kind: ScorePopKind) -> Self {
        Self { pos, frame: 0, kind }
    }

    /// 0 at spawn, 1 at expiry
    pub fn progress(&self) -> f32 {
        self.frame as f32 / SCORE_POP_FRAMES as f32
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub bird: Bird,
    pub phase: GamePhase,
    /// Ordered by spawn time
    pub pipes: Vec<Pipe>,
    pub particles: Vec<Particle>,
    pub score_pops: Vec<ScorePop>,
    pub score: u32,
    pub high_score: u32,
    /// Tick counter, drives periodic effects
    pub frame: u64,
    /// Host timestamp (ms) of the last pipe spawn
    pub last_pipe_time: f64,
    /// Playfield size in CSS pixels
    pub width: f32,
    pub height: f32,
    pub god_mode: bool,
    pub collectibles: CollectiblesState,
    /// Randomness for pipe heights and particles
    pub rng: Pcg32,
}

impl GameState {
    /// Create an idle state; word progress and best score come from storage
    pub fn new(skills: &[String], storage: &dyn Storage, seed: u64) -> Self {
        Self::with_collectibles(CollectiblesState::load(skills, storage), storage, seed)
    }

    /// Create an idle state around an already-built collectibles state
    pub fn with_collectibles(
        collectibles: CollectiblesState,
        storage: &dyn Storage,
        seed: u64,
    ) -> Self {
        Self {
            bird: Bird::default(),
            phase: GamePhase::Idle,
            pipes: Vec::new(),
            particles: Vec::new(),
            score_pops: Vec::new(),
            score: 0,
            high_score: load_high_score(storage),
            frame: 0,
            last_pipe_time: 0.0,
            width: 0.0,
            height: 0.0,
            god_mode: false,
            collectibles,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Adopt a new playfield size; the bird keeps its relative position
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.bird.pos.x = self.width * BIRD_X_FRACTION;
        if self.phase == GamePhase::Idle {
            self.bird.pos.y = self.rest_y();
        }
    }

    /// True when there is nothing to simulate or draw
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Bird y at rest (menu and run start)
    pub fn rest_y(&self) -> f32 {
        self.height * BIRD_REST_FRACTION
    }

    /// Push a particle unless the cap is reached; returns false when full
    pub fn push_particle(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= MAX_PARTICLES {
            return false;
        }
        self.particles.push(particle);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::save_high_score;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_new_state_is_idle() {
        let storage = MemoryStorage::new();
        let state = GameState::new(&[], &storage, 1);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.pipes.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.frame, 0);
        assert_eq!(state.bird.radius, BIRD_RADIUS);
    }

    #[test]
    fn test_new_state_loads_high_score() {
        let mut storage = MemoryStorage::new();
        save_high_score(&mut storage, 12);
        let state = GameState::new(&[], &storage, 1);
        assert_eq!(state.high_score, 12);
    }

    #[test]
    fn test_resize_places_bird() {
        let storage = MemoryStorage::new();
        let mut state = GameState::new(&[], &storage, 1);
        state.resize(1000.0, 500.0);
        assert_eq!(state.bird.pos.x, 220.0);
        assert_eq!(state.bird.pos.y, 210.0);

        // Outside the menu, only x follows the new width
        state.phase = GamePhase::Playing;
        state.bird.pos.y = 100.0;
        state.resize(500.0, 400.0);
        assert_eq!(state.bird.pos.x, 110.0);
        assert_eq!(state.bird.pos.y, 100.0);
    }

    #[test]
    fn test_particle_cap() {
        let storage = MemoryStorage::new();
        let mut state = GameState::new(&[], &storage, 1);
        let p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            alpha: 1.0,
            size: 1.0,
            kind: ParticleKind::Trail,
        };
        for _ in 0..MAX_PARTICLES {
            assert!(state.push_particle(p));
        }
        assert!(!state.push_particle(p));
        assert_eq!(state.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_pipe_geometry() {
        let pipe = Pipe {
            x: 100.0,
            top_height: 80.0,
            gap: 120.0,
            scored: false,
        };
        assert_eq!(pipe.right(), 100.0 + PIPE_WIDTH);
        assert_eq!(pipe.gap_bottom(), 200.0);
        assert_eq!(pipe.gap_center(), Vec2::new(100.0 + PIPE_WIDTH / 2.0, 140.0));
    }
}
