//! Canopy Run - an endless lane-climbing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, lanes, day/night cycle)
//! - `engine`: Session lifecycle, frame clock and output events
//! - `view`: Read-only per-frame snapshot for an external renderer
//! - `platform`: Browser facade for the host application shell
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod engine;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod view;

pub use engine::{Engine, GameEvent, Intent, Lifecycle};
pub use highscores::{HighScores, ScoreError, ScoreRecord, ScoreSink};
pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};
pub use view::RenderView;

/// Default balance constants (mirrored by `Tuning::default`)
pub mod consts {
    /// Largest simulated step per frame (seconds). Longer stalls are truncated.
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Scroll speed at session start (px/s)
    pub const INITIAL_SPEED: f32 = 180.0;
    /// Scroll acceleration (px/s²)
    pub const SPEED_INCREASE: f32 = 5.0;
    /// Distance at which the speed ramp would top out
    pub const MAX_SPEED_DISTANCE: f32 = 1000.0;
    /// Distance gained per second while running
    pub const SCORE_RATE: f32 = 6.0;
    /// Scroll speed cap (px/s)
    pub const MAX_SPEED: f32 = INITIAL_SPEED + SPEED_INCREASE * (MAX_SPEED_DISTANCE / SCORE_RATE);

    /// Central pillar
    pub const PILLAR_WIDTH: f32 = 50.0;
    pub const MAX_CANVAS_WIDTH: f32 = 400.0;

    /// Player sprite
    pub const PLAYER_WIDTH: f32 = 90.0;
    pub const PLAYER_HEIGHT: f32 = 120.0;
    /// Starting height above the bottom edge
    pub const PLAYER_START_LIFT: f32 = 250.0;
    /// How far the player drops during the first-move transition
    pub const PLAYER_CLIMB_DROP: f32 = 100.0;
    /// First-move transition duration (s)
    pub const TRANSITION_DURATION: f32 = 1.0;
    /// Horizontal drag needed to change lanes (px)
    pub const LANE_SWIPE_THRESHOLD: f32 = 20.0;

    /// Obstacle ("branch") sprite and hazard band
    pub const OBSTACLE_WIDTH: f32 = 183.0;
    pub const OBSTACLE_HEIGHT: f32 = 61.0;
    pub const OBSTACLE_BAND_HEIGHT: f32 = 20.0;
    /// How far an obstacle overlaps the pillar edge
    pub const OBSTACLE_PILLAR_OVERLAP: f32 = 20.0;
    /// Scroll distance between obstacles
    pub const OBSTACLE_MIN_SPACING: f32 = 221.0;
    pub const OBSTACLE_MAX_SPACING: f32 = 700.0;

    /// Collectible ("token") sprite and fall speed on top of the scroll
    pub const COLLECTIBLE_SIZE: f32 = 40.0;
    pub const COLLECTIBLE_BASE_SPEED: f32 = 100.0;
    /// Collectible spawn interval bounds (s), shrinking with distance
    pub const MIN_SPAWN_INTERVAL_INITIAL: f32 = 1.0;
    pub const MAX_SPAWN_INTERVAL_INITIAL: f32 = 1.6;
    pub const MIN_SPAWN_INTERVAL_FLOOR: f32 = 0.2;
    pub const MAX_SPAWN_INTERVAL_FLOOR: f32 = 0.4;
    pub const SPAWN_DISTANCE_THRESHOLD: f32 = 180.0;

    /// Sprite frame toggles every N sixtieths of a second
    pub const SPRITE_FRAME_TICKS: f32 = 10.0;

    /// Day/night cycle length in distance units
    pub const CYCLE_DURATION: f32 = 1000.0;
    /// Flare fade-out duration (s)
    pub const FLARE_DURATION: f32 = 1.5;

    /// Star shine scheduling (s)
    pub const MIN_SHINE_INTERVAL: f32 = 2.0;
    pub const MAX_SHINE_INTERVAL: f32 = 5.0;
    pub const SHINE_DURATION: f32 = 0.5;

    /// Cloud drift
    pub const CLOUD_SPEED: f32 = 20.0;
    pub const CLOUD_SCALE_MIN: f32 = 0.7;
    pub const CLOUD_SCALE_MAX: f32 = 1.2;
    /// Unscaled cloud sprite width (px)
    pub const CLOUD_SPRITE_WIDTH: f32 = 120.0;
    /// Number of distinct cloud sprites
    pub const CLOUD_VARIANTS: u8 = 3;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
