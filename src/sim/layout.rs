//! Screen-space layout derived from the viewport
//!
//! The playfield is a column at most `max_canvas_width` wide with the pillar
//! centred in it. Lanes hug the pillar edges.

use serde::{Deserialize, Serialize};

use super::state::{Lane, Side};
use crate::tuning::Tuning;

/// Fixed geometry for one viewport size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub pillar_x: f32,
    pub pillar_width: f32,
}

impl Layout {
    pub fn new(viewport_width: f32, viewport_height: f32, tuning: &Tuning) -> Self {
        let width = viewport_width.min(tuning.max_canvas_width).max(tuning.pillar_width);
        Self {
            width,
            height: viewport_height.max(0.0),
            pillar_x: (width - tuning.pillar_width) / 2.0,
            pillar_width: tuning.pillar_width,
        }
    }

    /// Left edge of the player sprite in `lane`
    pub fn player_x(&self, lane: Lane, player_width: f32) -> f32 {
        match lane {
            Lane::Left => self.pillar_x - 75.0,
            Lane::Right => self.pillar_x + self.pillar_width - 15.0,
            Lane::Middle => self.pillar_x + (self.pillar_width - player_width) / 2.0,
        }
    }

    /// Left edge of an obstacle growing out of the pillar on `side`
    pub fn obstacle_x(&self, side: Side, tuning: &Tuning) -> f32 {
        match side {
            Side::Left => self.pillar_x - tuning.obstacle_width + tuning.obstacle_pillar_overlap,
            Side::Right => self.pillar_x + self.pillar_width - tuning.obstacle_pillar_overlap,
        }
    }

    /// Horizontal range `[min, max]` for a collectible's left edge: the
    /// reachable lane band, shrunk so the whole sprite stays inside it
    pub fn collectible_x_range(&self, tuning: &Tuning) -> (f32, f32) {
        let min = self.player_x(Lane::Left, tuning.player_width);
        let band_right = self.player_x(Lane::Right, tuning.player_width) + tuning.player_width;
        let max = (band_right - tuning.collectible_size).max(min);
        (min, max)
    }

    /// Player's resting y before the first move
    pub fn player_start_y(&self, tuning: &Tuning) -> f32 {
        self.height - tuning.player_start_lift
    }

    /// Player's y once climbing
    pub fn player_climb_y(&self, tuning: &Tuning) -> f32 {
        self.player_start_y(tuning) + tuning.player_climb_drop
    }
}
