//! Host-facing game session
//!
//! A `Session` owns the one live `GameState`, the debug overrides, the
//! storage backend and the renderer. Hosts forward input as method calls and
//! call `frame` once per animation frame.

use serde::Serialize;

use crate::persistence::Storage;
use crate::platform::FpsCounter;
use crate::renderer::{Renderer, Surface};
use crate::settings::Overrides;
use crate::sim::{self, GamePhase, GameState};

/// Read-only view of everything the UI shell displays
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub high_score: u32,
    pub fps: u32,
    pub current_speed: f32,
    pub target_words: Vec<String>,
    pub collected_words: Vec<String>,
    pub current_word_index: usize,
    pub current_char_index: usize,
    pub key_fragments: usize,
    pub words_collected_in_run: u32,
    pub score_multiplier: u32,
    /// Run score with the word multiplier applied
    pub final_score: u32,
    pub is_reward_unlocked: bool,
    pub reward_link: String,
    pub paused: bool,
}

/// An active freeze
#[derive(Debug, Clone, Copy)]
struct Pause {
    /// Multiplier restored on resume
    held_multiplier: f32,
    since_ms: f64,
    /// Set when a zero multiplier override caused the freeze
    from_overrides: bool,
}

pub struct Session<S: Storage> {
    state: GameState,
    overrides: Overrides,
    storage: S,
    renderer: Renderer,
    fps: FpsCounter,
    paused: Option<Pause>,
}

impl<S: Storage> Session<S> {
    /// New idle session; progress and best score load from `storage`
    pub fn new(skills: &[String], storage: S, seed: u64) -> Self {
        let state = GameState::new(skills, &storage, seed);
        log::info!(
            "Session ready: {} target words, best score {}",
            state.collectibles.target_words.len(),
            state.high_score
        );
        Self {
            state,
            overrides: Overrides::default(),
            storage,
            renderer: Renderer::new(seed),
            fps: FpsCounter::new(),
            paused: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn is_paused(&self) -> bool {
        self.paused.is_some()
    }

    /// Adopt a new playfield size and regenerate the scenery
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
        self.renderer.regenerate_scene(width, height);
    }

    /// Replace the debug overrides (clamped to their ranges)
    ///
    /// A zero speed multiplier pauses the session at `now_ms`, and a later
    /// non-zero one resumes it. During an explicit `pause` the new multiplier
    /// is held back until `resume`.
    pub fn set_overrides(&mut self, overrides: Overrides, now_ms: f64) {
        let clamped = overrides.clamped();
        let speed = clamped.speed_multiplier;
        let previous = self.overrides.speed_multiplier;
        self.state.god_mode = clamped.god_mode;
        self.overrides = Overrides {
            speed_multiplier: 0.0,
            ..clamped
        };

        match self.paused.as_mut() {
            Some(pause) if speed == 0.0 => pause.from_overrides = true,
            Some(pause) => {
                pause.held_multiplier = speed;
                if pause.from_overrides {
                    self.resume(now_ms);
                }
            }
            None if speed == 0.0 => {
                self.paused = Some(Pause {
                    held_multiplier: previous,
                    since_ms: now_ms,
                    from_overrides: true,
                });
                log::info!("Paused (speed multiplier 0)");
            }
            None => self.overrides.speed_multiplier = speed,
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        if self.paused.is_some() {
            self.resume(now_ms);
        }
        sim::start_game(&mut self.state, &self.overrides, &mut self.storage, now_ms);
    }

    /// Click or Space: resume if paused, then flap or start a run
    pub fn primary(&mut self, now_ms: f64) {
        self.resume(now_ms);
        match self.state.phase {
            GamePhase::Playing => self.jump(),
            GamePhase::Idle | GamePhase::Dead => self.start(now_ms),
        }
    }

    pub fn jump(&mut self) {
        if self.paused.is_some() {
            log::debug!("Jump ignored while paused");
            return;
        }
        sim::jump(&mut self.state, &self.overrides);
    }

    /// Freeze the run; no-op when already paused
    pub fn pause(&mut self, now_ms: f64) {
        if self.paused.is_some() {
            return;
        }
        self.paused = Some(Pause {
            held_multiplier: self.overrides.speed_multiplier,
            since_ms: now_ms,
            from_overrides: false,
        });
        self.overrides.speed_multiplier = 0.0;
        log::info!("Paused");
    }

    /// Restore the speed multiplier and shift the spawn timer by the paused time
    pub fn resume(&mut self, now_ms: f64) {
        let Some(pause) = self.paused.take() else {
            return;
        };
        self.overrides.speed_multiplier = pause.held_multiplier;
        sim::adjust_time(&mut self.state, now_ms - pause.since_ms);
        log::info!("Resumed after {:.0} ms", now_ms - pause.since_ms);
    }

    pub fn toggle_pause(&mut self, now_ms: f64) {
        if self.paused.is_some() {
            self.resume(now_ms);
        } else {
            self.pause(now_ms);
        }
    }

    pub fn return_to_menu(&mut self, now_ms: f64) {
        self.resume(now_ms);
        sim::return_to_menu(&mut self.state);
    }

    pub fn reset_progress(&mut self) {
        sim::reset_progress(&mut self.state, &mut self.storage);
    }

    pub fn debug_complete_word(&mut self) {
        sim::debug_complete_word(&mut self.state, &mut self.storage);
    }

    pub fn debug_unlock_all(&mut self) {
        sim::debug_unlock_all(&mut self.state, &mut self.storage);
    }

    /// Advance one frame without drawing
    pub fn tick(&mut self, now_ms: f64) {
        sim::update(&mut self.state, &self.overrides, &mut self.storage, now_ms);
        self.fps.sample(now_ms);
    }

    /// Advance one frame and draw it
    pub fn frame(&mut self, surface: &mut dyn Surface, now_ms: f64) {
        self.tick(now_ms);
        self.renderer.draw_frame(surface, &self.state);
    }

    pub fn snapshot(&self) -> Snapshot {
        let c = &self.state.collectibles;
        let multiplier = c.score_multiplier();
        Snapshot {
            phase: self.state.phase,
            score: self.state.score,
            high_score: self.state.high_score,
            fps: self.fps.fps(),
            current_speed: sim::current_speed(&self.state, &self.overrides),
            target_words: c.target_words.clone(),
            collected_words: c.collected_words.clone(),
            current_word_index: c.current_word_index,
            current_char_index: c.current_char_index,
            key_fragments: c.key_fragments,
            words_collected_in_run: c.words_collected_in_run,
            score_multiplier: multiplier,
            final_score: self.state.score.saturating_mul(multiplier),
            is_reward_unlocked: c.is_reward_unlocked,
            reward_link: c.reward_link.clone(),
            paused: self.is_paused(),
        }
    }
}
