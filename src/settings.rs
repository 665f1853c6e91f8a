//! Debug overrides for tuning
//!
//! Each field either overrides a named default or leaves it alone. Values are
//! resolved against `consts` on every tick; the defaults themselves never change.

use serde::{Deserialize, Serialize};

use crate::consts::{GRAVITY, JUMP_FORCE};
use crate::effective_gap;

/// Allowed gravity override range
pub const GRAVITY_RANGE: (f32, f32) = (0.05, 0.5);
/// Allowed jump force override range
pub const JUMP_FORCE_RANGE: (f32, f32) = (-10.0, -2.0);
/// Allowed speed multiplier range (0 pauses)
pub const SPEED_MULTIPLIER_RANGE: (f32, f32) = (0.0, 3.0);
/// Allowed pipe gap override range
pub const PIPE_GAP_RANGE: (f32, f32) = (80.0, 250.0);

/// Per-field overrides merged against defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Overrides {
    pub gravity: Option<f32>,
    pub jump_force: Option<f32>,
    /// Scales pipe speed; zero freezes physics (pause)
    pub speed_multiplier: f32,
    pub pipe_gap: Option<f32>,
    pub god_mode: bool,
}

impl Default for Overrides {
    fn default() -> Self {
        Self {
            gravity: None,
            jump_force: None,
            speed_multiplier: 1.0,
            pipe_gap: None,
            god_mode: false,
        }
    }
}

impl Overrides {
    pub fn gravity(&self) -> f32 {
        self.gravity.unwrap_or(GRAVITY)
    }

    pub fn jump_force(&self) -> f32 {
        self.jump_force.unwrap_or(JUMP_FORCE)
    }

    /// Gap for the next pipe at the given score
    pub fn pipe_gap(&self, score: u32) -> f32 {
        self.pipe_gap.unwrap_or_else(|| effective_gap(score))
    }

    /// True when time is frozen
    pub fn is_paused(&self) -> bool {
        self.speed_multiplier == 0.0
    }

    /// Copy with every value pulled into its debug range
    pub fn clamped(&self) -> Self {
        let clamp = |v: f32, (lo, hi): (f32, f32)| if v.is_finite() { v.clamp(lo, hi) } else { lo };
        Self {
            gravity: self.gravity.map(|g| clamp(g, GRAVITY_RANGE)),
            jump_force: self.jump_force.map(|j| clamp(j, JUMP_FORCE_RANGE)),
            speed_multiplier: clamp(self.speed_multiplier, SPEED_MULTIPLIER_RANGE),
            pipe_gap: self.pipe_gap.map(|g| clamp(g, PIPE_GAP_RANGE)),
            god_mode: self.god_mode,
        }
    }
}
