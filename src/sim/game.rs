/// Game: phase state machine around the level being played.
///
///   Idle ──confirm──► Started ◄──pause──► Paused
///     │                  │                  │
///     └──────quit────────┴───────quit───────┴──► GameOver
///
/// Only `Started` advances the simulation. Every layout is validated when
/// the game is created, so a broken level aborts startup instead of
/// surfacing mid-game.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::GameConfig;
use crate::domain::entity::FrameInput;
use super::event::GameEvent;
use super::level::{build_level, LevelDef, LevelError};
use super::step;
use super::world::Level;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Started,
    Paused,
    GameOver,
}

pub struct Game {
    pub phase: Phase,
    pub levels: Vec<LevelDef>,
    pub level_index: usize,
    pub level: Level,
    config: GameConfig,
    rng: StdRng,
}

impl Game {
    pub fn new(levels: Vec<LevelDef>, config: &GameConfig) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::NoLevels);
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // Fail fast on any broken layout.
        for def in &levels {
            build_level(def, config, StdRng::seed_from_u64(0))?;
        }

        let level_index = config.start_level.min(levels.len() - 1);
        let level = build_level(&levels[level_index], config, StdRng::seed_from_u64(rng.gen()))?;
        info!(level = %level.name, index = level_index, total = levels.len(), "level loaded");

        Ok(Game {
            phase: Phase::Idle,
            levels,
            level_index,
            level,
            config: config.clone(),
            rng,
        })
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn start(&mut self) {
        if self.phase == Phase::Idle {
            self.set_phase(Phase::Started);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Started => self.set_phase(Phase::Paused),
            Phase::Paused => self.set_phase(Phase::Started),
            _ => {}
        }
    }

    pub fn quit(&mut self) {
        self.set_phase(Phase::GameOver);
    }

    /// Advance the level one tick if the game is running.
    pub fn tick(&mut self, input: FrameInput) -> Vec<GameEvent> {
        if self.phase != Phase::Started {
            return vec![];
        }
        step::step(&mut self.level, input)
    }

    /// Rebuild the current level from its layout.
    pub fn restart_level(&mut self) -> Result<(), LevelError> {
        self.load(self.level_index)
    }

    /// Move on to the next layout, wrapping after the last one.
    pub fn next_level(&mut self) -> Result<(), LevelError> {
        let next = (self.level_index + 1) % self.levels.len();
        self.load(next)
    }

    fn load(&mut self, index: usize) -> Result<(), LevelError> {
        let seed = self.rng.gen();
        self.level = build_level(&self.levels[index], &self.config, StdRng::seed_from_u64(seed))?;
        self.level_index = index;
        info!(level = %self.level.name, index, width = self.level.width, height = self.level.height, "level loaded");
        Ok(())
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            info!(from = ?self.phase, to = ?phase, "phase change");
            self.phase = phase;
        }
    }
}
