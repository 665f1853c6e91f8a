//! Simulation module
//!
//! All gameplay logic lives here. Rules for code in this module:
//! - One `update` call advances exactly one frame
//! - Seeded RNG only
//! - Storage is reached through the `Storage` trait, never directly
//! - No rendering or platform dependencies

pub mod collectibles;
pub mod collision;
pub mod state;
pub mod tick;

pub use collectibles::{BONUS_WORDS, Collectible, CollectiblesState, build_target_words};
pub use collision::{BoundsHit, Rect, check_bounds, circle_rect_overlap, hits_pipe};
pub use state::{
    Bird, GamePhase, GameState, Particle, ParticleKind, Pipe, ScorePop, ScorePopKind,
};
pub use tick::{
    adjust_time, current_speed, debug_complete_word, debug_unlock_all, jump, reset_progress,
    return_to_menu, spawn_pipe, start_game, update,
};
