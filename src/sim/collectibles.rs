//! Word-collection puzzle
//!
//! Letters of the current target word spawn one at a time inside pipe gaps.
//! Spelling a whole word earns a key fragment; collecting every word unlocks
//! the reward link. Word/char progress persists across runs and reloads.
//!
//! Spawn pacing uses a single counter: `pipes_since_word` counts pipes spawned
//! since the last letter spawn (or since the run started) and a letter may
//! appear once it reaches `spawn_cooldown`.

use std::collections::HashSet;

use glam::Vec2;

use super::collision::within_tolerance;
use super::state::{GameState, ScorePop, ScorePopKind};
use crate::consts::{COLLECT_TOLERANCE, FIRST_LETTER_PIPES, LETTER_SPACING_PIPES};
use crate::persistence::{SavedProgress, Storage, load_progress, save_progress};
use crate::reward::reward_link;

/// Words appended to every skill list
pub const BONUS_WORDS: [&str; 3] = ["Hire Me", "TNBB", "Mikhial"];

/// A letter pickup on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collectible {
    pub pos: Vec2,
    /// Center line of the bobbing motion
    pub base_y: f32,
    pub ch: char,
    pub collected: bool,
}

/// Word-unlock puzzle state
#[derive(Debug, Clone, PartialEq)]
pub struct CollectiblesState {
    /// Full unlock sequence, shortest first
    pub target_words: Vec<String>,
    pub current_word_index: usize,
    pub current_char_index: usize,
    /// History of completed words
    pub collected_words: Vec<String>,
    /// One per completed word
    pub key_fragments: usize,
    pub active_collectibles: Vec<Collectible>,
    /// Pipes spawned since the last letter spawn (or run start)
    pub pipes_since_word: u32,
    /// Pipes required before the next letter may spawn
    pub spawn_cooldown: u32,
    /// Words completed during the current run
    pub words_collected_in_run: u32,
    pub is_reward_unlocked: bool,
    pub reward_link: String,
}

/// Merge skills with bonus words: trimmed, non-empty, first occurrence wins,
/// stable-sorted by character count
pub fn build_target_words(skills: &[String], bonus: &[&str]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut words: Vec<String> = skills
        .iter()
        .map(String::as_str)
        .chain(bonus.iter().copied())
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .filter(|w| seen.insert(w.to_string()))
        .map(str::to_string)
        .collect();
    words.sort_by_key(|w| w.chars().count());
    words
}

impl CollectiblesState {
    /// Build from an explicit word list and saved progress
    ///
    /// Saved indices are validated against `target_words`, which may have
    /// changed since the progress was written.
    pub fn new(target_words: Vec<String>, saved: SavedProgress) -> Self {
        let current_word_index = saved.word_index.min(target_words.len());
        let current_char_index = match target_words.get(current_word_index) {
            Some(word) if saved.char_index < word.chars().count() => saved.char_index,
            _ => 0,
        };
        let mut state = Self {
            target_words,
            current_word_index,
            current_char_index,
            collected_words: saved.collected_words,
            key_fragments: saved.key_fragments,
            active_collectibles: Vec::new(),
            pipes_since_word: 0,
            spawn_cooldown: FIRST_LETTER_PIPES,
            words_collected_in_run: 0,
            is_reward_unlocked: false,
            reward_link: String::new(),
        };
        state.refresh_reward();
        state
    }

    /// Build from skills plus bonus words, resuming stored progress
    pub fn load(skills: &[String], storage: &dyn Storage) -> Self {
        Self::new(build_target_words(skills, &BONUS_WORDS), load_progress(storage))
    }

    /// The persisted slice
    pub fn saved(&self) -> SavedProgress {
        SavedProgress {
            word_index: self.current_word_index,
            char_index: self.current_char_index,
            collected_words: self.collected_words.clone(),
            key_fragments: self.key_fragments,
        }
    }

    pub fn current_word(&self) -> Option<&str> {
        self.target_words
            .get(self.current_word_index)
            .map(String::as_str)
    }

    /// Next letter to collect
    pub fn current_char(&self) -> Option<char> {
        self.current_word()?.chars().nth(self.current_char_index)
    }

    /// True once every target word is collected
    pub fn all_collected(&self) -> bool {
        self.current_word_index >= self.target_words.len()
    }

    /// Advance past spaces; true if that reaches the end of the word
    fn skip_spaces(&mut self) -> bool {
        let Some(word) = self.target_words.get(self.current_word_index) else {
            return false;
        };
        let chars: Vec<char> = word.chars().collect();
        while chars.get(self.current_char_index) == Some(&' ') {
            self.current_char_index += 1;
        }
        self.current_char_index >= chars.len()
    }

    /// Recompute the unlock flag and payload from the fragment count
    fn refresh_reward(&mut self) {
        let total = self.target_words.len();
        self.is_reward_unlocked = total > 0 && self.key_fragments >= total;
        self.reward_link = if self.is_reward_unlocked {
            reward_link().to_string()
        } else {
            String::new()
        };
    }

    /// Clear per-run counters; word/char progress is kept
    pub fn reset_run(&mut self) {
        self.active_collectibles.clear();
        self.words_collected_in_run = 0;
        self.pipes_since_word = 0;
        self.spawn_cooldown = FIRST_LETTER_PIPES;
    }

    /// Forget all progress (in memory only)
    pub fn clear_progress(&mut self) {
        self.collected_words.clear();
        self.current_word_index = 0;
        self.current_char_index = 0;
        self.key_fragments = 0;
        self.reset_run();
        self.refresh_reward();
    }

    /// Mark every word collected (in memory only)
    pub fn unlock_all(&mut self) {
        self.key_fragments = self.target_words.len();
        self.collected_words = self.target_words.clone();
        self.current_word_index = self.target_words.len();
        self.current_char_index = 0;
        self.active_collectibles.clear();
        self.refresh_reward();
    }

    /// Run-scoped score multiplier
    pub fn score_multiplier(&self) -> u32 {
        1 + self.words_collected_in_run
    }
}

/// Try to place the next letter at the newest pipe's gap
///
/// Called right after a pipe spawns. At most one letter is on screen at a time.
pub fn spawn_collectible(state: &mut GameState, storage: &mut dyn Storage) {
    let c = &mut state.collectibles;
    if c.all_collected() || !c.active_collectibles.is_empty() {
        return;
    }
    if c.pipes_since_word < c.spawn_cooldown {
        return;
    }
    if c.skip_spaces() {
        complete_word(state, storage);
        return;
    }
    let Some(ch) = c.current_char() else {
        return;
    };
    let Some(anchor) = state.pipes.last().map(|p| p.gap_center()) else {
        return;
    };

    c.active_collectibles.push(Collectible {
        pos: anchor,
        base_y: anchor.y,
        ch,
        collected: false,
    });
    c.pipes_since_word = 0;
    c.spawn_cooldown = LETTER_SPACING_PIPES;
    log::debug!("Spawned letter '{}' at ({:.0}, {:.0})", ch, anchor.x, anchor.y);
}

/// Finish the current word: record it, award a fragment, persist
///
/// No-op when every word is already collected.
pub fn complete_word(state: &mut GameState, storage: &mut dyn Storage) {
    let c = &mut state.collectibles;
    let Some(word) = c.current_word().map(str::to_string) else {
        log::debug!("No word left to complete");
        return;
    };

    c.collected_words.push(word.clone());
    // Letters still on screen belong to the finished word
    c.active_collectibles.clear();
    c.current_word_index += 1;
    c.current_char_index = 0;
    c.words_collected_in_run += 1;
    c.key_fragments += 1;

    let was_unlocked = c.is_reward_unlocked;
    c.refresh_reward();
    log::info!(
        "Word \"{}\" complete ({}/{})",
        word,
        c.key_fragments,
        c.target_words.len()
    );
    if c.is_reward_unlocked && !was_unlocked {
        log::info!("All words collected, reward unlocked");
    }

    save_progress(storage, &c.saved());

    let pop_pos = state.bird.pos - Vec2::new(0.0, 50.0);
    state.score_pops.push(ScorePop::new(pop_pos, ScorePopKind::Word));
}

/// Pick up every letter touching the bird
pub fn collect_touching(state: &mut GameState, storage: &mut dyn Storage) {
    let bird = state.bird.pos;
    let mut i = 0;
    while i < state.collectibles.active_collectibles.len() {
        let item = state.collectibles.active_collectibles[i];
        i += 1;
        if item.collected || !within_tolerance(bird, item.pos, COLLECT_TOLERANCE) {
            continue;
        }
        if state.collectibles.all_collected() {
            state.collectibles.active_collectibles.clear();
            break;
        }
        state.collectibles.active_collectibles[i - 1].collected = true;

        let c = &mut state.collectibles;
        c.current_char_index += 1;
        if c.skip_spaces() {
            complete_word(state, storage);
        }

        state
            .score_pops
            .push(ScorePop::new(item.pos, ScorePopKind::Letter(item.ch)));
    }
}
