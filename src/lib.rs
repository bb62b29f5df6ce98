//! Grid Snake - simulation core for a grid-based snake arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, movement, collisions, engine)
//! - `settings`: Board, timing and mode configuration
//! - `score`: Score tracking driven by outcome events
//! - `highscores`: In-memory leaderboard

pub mod highscores;
pub mod score;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use score::ScoreKeeper;
pub use settings::{GameMode, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Default board edge length (cells)
    pub const DEFAULT_BOARD_SIZE: i32 = 20;
    /// Smallest board a session can be played on
    pub const MIN_BOARD_SIZE: i32 = 4;
    /// Largest accepted board edge
    pub const MAX_BOARD_SIZE: i32 = 1_024;

    /// Default time between grid steps
    pub const DEFAULT_MOVE_INTERVAL_MS: u64 = 150;
    /// Fastest cadence the speed variant may reach
    pub const DEFAULT_MIN_INTERVAL_MS: u64 = 50;
    /// Interval reduction per food in the speed variant
    pub const DEFAULT_SPEED_STEP_MS: u64 = 5;
    /// Absolute floor for any move interval (a zero interval would tick every frame)
    pub const INTERVAL_FLOOR_MS: u64 = 1;

    /// Largest frame delta fed to the simulation (tab switches, debugger pauses)
    pub const MAX_FRAME_DT_MS: u64 = 250;

    /// Minimum dominant-axis displacement for a swipe to register
    pub const SWIPE_THRESHOLD: f32 = 30.0;

    /// SuperFood footprint edge length (cells)
    pub const SUPER_FOOD_SIZE: i32 = 2;
    /// Normal foods between SuperFood spawns
    pub const DEFAULT_SUPER_FOOD_EVERY: u32 = 5;
    /// How long a SuperFood stays on the board
    pub const DEFAULT_SUPER_FOOD_LIFETIME_MS: u64 = 5_000;

    /// Obstacles placed in the obstacle variant
    pub const DEFAULT_OBSTACLE_COUNT: usize = 8;

    /// Random placement attempts before accepting a possibly-occupied cell
    pub const DEFAULT_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Points per normal food
    pub const FOOD_POINTS: u64 = 10;
    /// Points per SuperFood
    pub const SUPER_FOOD_POINTS: u64 = 50;
}
