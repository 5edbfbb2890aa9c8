//! Data-driven game balance
//!
//! Every number the simulation consumes lives here so a host can ship a JSON
//! override without rebuilding. Missing fields fall back to `consts`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{name}: minimum {min} exceeds maximum {max}")]
    InvertedRange { name: &'static str, min: f32, max: f32 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("obstacle collision band ({band}) is taller than the sprite ({height})")]
    BandTooTall { band: f32, height: f32 },
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Clock ===
    pub max_frame_dt: f32,

    // === Speed and score ===
    pub initial_speed: f32,
    pub max_speed: f32,
    pub speed_increase: f32,
    pub score_rate: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub player_start_lift: f32,
    pub player_climb_drop: f32,
    pub transition_duration: f32,
    pub lane_swipe_threshold: f32,
    pub sprite_frame_ticks: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub obstacle_band_height: f32,
    pub obstacle_pillar_overlap: f32,
    pub obstacle_min_spacing: f32,
    pub obstacle_max_spacing: f32,

    // === Collectibles ===
    pub collectible_size: f32,
    pub collectible_base_speed: f32,
    pub min_spawn_interval_initial: f32,
    pub max_spawn_interval_initial: f32,
    pub min_spawn_interval_floor: f32,
    pub max_spawn_interval_floor: f32,
    pub spawn_distance_threshold: f32,
    /// Notification text shown when a collectible is picked up
    pub collect_toast: String,

    // === Environment ===
    pub pillar_width: f32,
    pub max_canvas_width: f32,
    pub cycle_duration: f32,
    pub flare_duration: f32,
    pub min_shine_interval: f32,
    pub max_shine_interval: f32,
    pub shine_duration: f32,
    pub cloud_speed: f32,
    pub cloud_scale_min: f32,
    pub cloud_scale_max: f32,
    pub cloud_sprite_width: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_frame_dt: MAX_FRAME_DT,

            initial_speed: INITIAL_SPEED,
            max_speed: MAX_SPEED,
            speed_increase: SPEED_INCREASE,
            score_rate: SCORE_RATE,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_start_lift: PLAYER_START_LIFT,
            player_climb_drop: PLAYER_CLIMB_DROP,
            transition_duration: TRANSITION_DURATION,
            lane_swipe_threshold: LANE_SWIPE_THRESHOLD,
            sprite_frame_ticks: SPRITE_FRAME_TICKS,

            obstacle_width: OBSTACLE_WIDTH,
            obstacle_height: OBSTACLE_HEIGHT,
            obstacle_band_height: OBSTACLE_BAND_HEIGHT,
            obstacle_pillar_overlap: OBSTACLE_PILLAR_OVERLAP,
            obstacle_min_spacing: OBSTACLE_MIN_SPACING,
            obstacle_max_spacing: OBSTACLE_MAX_SPACING,

            collectible_size: COLLECTIBLE_SIZE,
            collectible_base_speed: COLLECTIBLE_BASE_SPEED,
            min_spawn_interval_initial: MIN_SPAWN_INTERVAL_INITIAL,
            max_spawn_interval_initial: MAX_SPAWN_INTERVAL_INITIAL,
            min_spawn_interval_floor: MIN_SPAWN_INTERVAL_FLOOR,
            max_spawn_interval_floor: MAX_SPAWN_INTERVAL_FLOOR,
            spawn_distance_threshold: SPAWN_DISTANCE_THRESHOLD,
            collect_toast: "Token grabbed!".to_string(),

            pillar_width: PILLAR_WIDTH,
            max_canvas_width: MAX_CANVAS_WIDTH,
            cycle_duration: CYCLE_DURATION,
            flare_duration: FLARE_DURATION,
            min_shine_interval: MIN_SHINE_INTERVAL,
            max_shine_interval: MAX_SHINE_INTERVAL,
            shine_duration: SHINE_DURATION,
            cloud_speed: CLOUD_SPEED,
            cloud_scale_min: CLOUD_SCALE_MIN,
            cloud_scale_max: CLOUD_SCALE_MAX,
            cloud_sprite_width: CLOUD_SPRITE_WIDTH,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject configurations the simulation can't run sensibly
    pub fn validate(&self) -> Result<(), TuningError> {
        let positives = [
            ("max_frame_dt", self.max_frame_dt),
            ("initial_speed", self.initial_speed),
            ("score_rate", self.score_rate),
            ("transition_duration", self.transition_duration),
            ("sprite_frame_ticks", self.sprite_frame_ticks),
            ("obstacle_height", self.obstacle_height),
            ("obstacle_min_spacing", self.obstacle_min_spacing),
            ("collectible_size", self.collectible_size),
            ("spawn_distance_threshold", self.spawn_distance_threshold),
            ("cycle_duration", self.cycle_duration),
            ("flare_duration", self.flare_duration),
            ("shine_duration", self.shine_duration),
        ];
        for (name, value) in positives {
            if value <= 0.0 {
                return Err(TuningError::NonPositive { name, value });
            }
        }

        // Speed never decreases and collectibles never rise
        let non_negatives = [
            ("speed_increase", self.speed_increase),
            ("collectible_base_speed", self.collectible_base_speed),
        ];
        for (name, value) in non_negatives {
            if value < 0.0 {
                return Err(TuningError::Negative { name, value });
            }
        }

        let ranges = [
            ("speed", self.initial_speed, self.max_speed),
            (
                "obstacle_spacing",
                self.obstacle_min_spacing,
                self.obstacle_max_spacing,
            ),
            (
                "spawn_interval_initial",
                self.min_spawn_interval_initial,
                self.max_spawn_interval_initial,
            ),
            (
                "spawn_interval_floor",
                self.min_spawn_interval_floor,
                self.max_spawn_interval_floor,
            ),
            ("shine_interval", self.min_shine_interval, self.max_shine_interval),
            ("cloud_scale", self.cloud_scale_min, self.cloud_scale_max),
        ];
        for (name, min, max) in ranges {
            if min > max {
                return Err(TuningError::InvertedRange { name, min, max });
            }
        }

        if self.obstacle_band_height > self.obstacle_height {
            return Err(TuningError::BandTooTall {
                band: self.obstacle_band_height,
                height: self.obstacle_height,
            });
        }

        Ok(())
    }
}
