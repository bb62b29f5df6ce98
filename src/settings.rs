//! Game settings
//!
//! Board, timing and rule-variant configuration. Stored as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::EdgeMode;

/// Rule variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Wrap-around edges, SuperFood enabled
    #[default]
    Classic,
    /// Leaving the board ends the game
    Walls,
    /// Wrap-around edges with static obstacles
    Obstacles,
    /// Every food shortens the move interval
    Speed,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Walls => "Walls",
            GameMode::Obstacles => "Obstacles",
            GameMode::Speed => "Speed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "walls" | "wall" => Some(GameMode::Walls),
            "obstacles" | "obstacle" => Some(GameMode::Obstacles),
            "speed" => Some(GameMode::Speed),
            _ => None,
        }
    }

    pub fn edge(&self) -> EdgeMode {
        match self {
            GameMode::Walls => EdgeMode::Wall,
            _ => EdgeMode::Wrap,
        }
    }

    pub fn has_obstacles(&self) -> bool {
        *self == GameMode::Obstacles
    }

    pub fn allows_super_food(&self) -> bool {
        matches!(self, GameMode::Classic | GameMode::Obstacles)
    }

    pub fn speeds_up(&self) -> bool {
        *self == GameMode::Speed
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: GameMode,

    // === Board ===
    /// Board edge length in cells
    pub board_size: i32,
    /// Obstacles placed in the obstacle variant
    pub obstacle_count: usize,

    // === Timing ===
    /// Starting time between grid steps
    pub initial_interval_ms: u64,
    /// Fastest allowed interval
    pub min_interval_ms: u64,
    /// Speed variant: interval reduction per food
    pub speed_step_ms: u64,

    // === SuperFood ===
    /// Normal foods between SuperFood spawns
    pub super_food_every: u32,
    pub super_food_lifetime_ms: u64,

    // === Scoring ===
    pub food_points: u64,
    pub super_food_points: u64,

    // === Placement ===
    /// RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Random tries before accepting an occupied cell
    pub placement_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,

            board_size: DEFAULT_BOARD_SIZE,
            obstacle_count: DEFAULT_OBSTACLE_COUNT,

            initial_interval_ms: DEFAULT_MOVE_INTERVAL_MS,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            speed_step_ms: DEFAULT_SPEED_STEP_MS,

            super_food_every: DEFAULT_SUPER_FOOD_EVERY,
            super_food_lifetime_ms: DEFAULT_SUPER_FOOD_LIFETIME_MS,

            food_points: FOOD_POINTS,
            super_food_points: SUPER_FOOD_POINTS,

            seed: None,
            placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
        }
    }
}

impl Settings {
    /// Defaults for the given mode
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse and validate JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(SettingsError::Invalid(format!(
                "board_size must be within {}..={}, got {}",
                MIN_BOARD_SIZE, MAX_BOARD_SIZE, self.board_size
            )));
        }
        if self.initial_interval_ms == 0 || self.min_interval_ms == 0 {
            return Err(SettingsError::Invalid("move intervals must be non-zero".into()));
        }
        if self.min_interval_ms > self.initial_interval_ms {
            return Err(SettingsError::Invalid(format!(
                "min_interval_ms ({}) exceeds initial_interval_ms ({})",
                self.min_interval_ms, self.initial_interval_ms
            )));
        }
        if self.super_food_every == 0 {
            return Err(SettingsError::Invalid("super_food_every must be non-zero".into()));
        }
        let cells = self.board_size.unsigned_abs() as usize;
        let cells = cells * cells;
        if self.obstacle_count >= cells / 2 {
            return Err(SettingsError::Invalid(format!(
                "obstacle_count ({}) leaves no room on a {}x{} board",
                self.obstacle_count, self.board_size, self.board_size
            )));
        }
        Ok(())
    }
}
