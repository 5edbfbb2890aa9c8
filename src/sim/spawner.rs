//! Procedural spawning of obstacles and collectibles
//!
//! Obstacles are placed by scroll distance with a fixed spacing range and a
//! fairness rule: never three on the same side in a row. Collectibles are
//! placed on a timer whose bounds shrink as the session's distance grows.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layout::Layout;
use super::rng::RandomSource;
use super::state::{Collectible, DepthLayer, Obstacle, SessionState, Side};
use crate::tuning::Tuning;

/// Spawn schedule bookkeeping for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Scroll distance at which the next obstacle appears
    pub next_obstacle_at: f32,
    /// Sides of the two most recent obstacles (oldest first)
    pub last_sides: Vec<Side>,
    /// Seconds since the last collectible spawned
    pub since_collectible: f32,
    /// Seconds to wait before the next collectible
    pub next_collectible_in: f32,
}

impl Spawner {
    pub fn new(tuning: &Tuning, rng: &mut dyn RandomSource) -> Self {
        Self {
            next_obstacle_at: obstacle_spacing(tuning, rng),
            last_sides: Vec::with_capacity(2),
            since_collectible: 0.0,
            next_collectible_in: spawn_interval(0.0, tuning, rng),
        }
    }

    /// Pick a side, forcing a switch after two in a row
    pub fn choose_side(&self, rng: &mut dyn RandomSource) -> Side {
        match self.last_sides.as_slice() {
            [a, b] if a == b => a.opposite(),
            _ => {
                if rng.chance(0.5) {
                    Side::Left
                } else {
                    Side::Right
                }
            }
        }
    }

    fn record_side(&mut self, side: Side) {
        self.last_sides.push(side);
        if self.last_sides.len() > 2 {
            self.last_sides.remove(0);
        }
    }
}

/// Random gap to the next obstacle, in scroll distance
pub fn obstacle_spacing(tuning: &Tuning, rng: &mut dyn RandomSource) -> f32 {
    let min = tuning.obstacle_min_spacing;
    let max = tuning.obstacle_max_spacing.max(min);
    rng.range(min, max)
}

/// Current `(min, max)` collectible interval bounds for a distance
///
/// Both bounds shrink linearly from their initial values toward their floors
/// once `distance` passes the threshold, and never cross each other.
pub fn spawn_interval_bounds(distance: f32, tuning: &Tuning) -> (f32, f32) {
    let threshold = tuning.spawn_distance_threshold;
    let factor = (distance - threshold).max(0.0) / threshold;

    let shrink = |initial: f32, floor: f32| (initial - (initial - floor) * factor).max(floor);
    let min = shrink(
        tuning.min_spawn_interval_initial,
        tuning.min_spawn_interval_floor,
    );
    let max = shrink(
        tuning.max_spawn_interval_initial,
        tuning.max_spawn_interval_floor,
    );
    (min, max.max(min))
}

/// Random wait until the next collectible
pub fn spawn_interval(distance: f32, tuning: &Tuning, rng: &mut dyn RandomSource) -> f32 {
    let (min, max) = spawn_interval_bounds(distance, tuning);
    rng.range(min, max)
}

/// Spawn an obstacle if the scroll has reached the threshold
///
/// Returns the new obstacle's side.
pub fn spawn_obstacle(
    state: &mut SessionState,
    layout: &Layout,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
) -> Option<Side> {
    if state.scroll_distance < state.spawner.next_obstacle_at {
        return None;
    }

    let side = state.spawner.choose_side(rng);
    let depth = if rng.chance(0.5) {
        DepthLayer::InFront
    } else {
        DepthLayer::Behind
    };
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        pos: Vec2::new(layout.obstacle_x(side, tuning), -tuning.obstacle_height),
        width: tuning.obstacle_width,
        height: tuning.obstacle_height,
        band_height: tuning.obstacle_band_height,
        side,
        depth,
    });
    state.spawner.record_side(side);
    state.spawner.next_obstacle_at = state.scroll_distance + obstacle_spacing(tuning, rng);

    log::debug!(
        "obstacle {} on {:?} at scroll {:.0}, next at {:.0}",
        id,
        side,
        state.scroll_distance,
        state.spawner.next_obstacle_at
    );
    Some(side)
}

/// Spawn a collectible if its timer has elapsed
pub fn spawn_collectible(
    state: &mut SessionState,
    layout: &Layout,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
    dt: f32,
) -> bool {
    state.spawner.since_collectible += dt;
    if state.spawner.since_collectible < state.spawner.next_collectible_in {
        return false;
    }

    let (min_x, max_x) = layout.collectible_x_range(tuning);
    let x = rng.range(min_x, max_x);
    let id = state.next_entity_id();
    state.collectibles.push(Collectible {
        id,
        pos: Vec2::new(x, -tuning.collectible_size),
        width: tuning.collectible_size,
        height: tuning.collectible_size,
    });
    state.spawner.since_collectible = 0.0;
    state.spawner.next_collectible_in = spawn_interval(state.distance, tuning, rng);

    log::debug!(
        "collectible {} at x={:.0}, next in {:.2}s",
        id,
        x,
        state.spawner.next_collectible_in
    );
    true
}
