//! Collision detection for the lane playfield
//!
//! Everything here is a pure predicate over axis-aligned rectangles. Obstacles
//! only hurt inside their collision band, which is shorter than the sprite so
//! the player gets a little forgiveness against the art.

use serde::{Deserialize, Serialize};

use super::state::{Collectible, Lane, Obstacle};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap test (touching edges don't count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Check whether an obstacle hurts the player
///
/// In the middle lane the player is on the pillar itself, so an obstacle on
/// either side is a threat. In a side lane only same-side obstacles are.
pub fn obstacle_hits_player(player: &Rect, lane: Lane, obstacle: &Obstacle) -> bool {
    let threatens = lane == Lane::Middle || obstacle.side.lane() == lane;
    threatens && player.overlaps(&obstacle.band())
}

/// Full-rectangle check for a collectible
pub fn collectible_hits_player(player: &Rect, collectible: &Collectible) -> bool {
    player.overlaps(&collectible.rect())
}

/// Index of the collectible the player grabs this tick, if any
///
/// Scans from the most recently spawned one and stops at the first match.
pub fn find_collected(player: &Rect, collectibles: &[Collectible]) -> Option<usize> {
    collectibles
        .iter()
        .rposition(|c| collectible_hits_player(player, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{DepthLayer, Side};
    use glam::Vec2;

    fn obstacle(x: f32, y: f32, side: Side) -> Obstacle {
        Obstacle {
            id: 1,
            pos: Vec2::new(x, y),
            width: 183.0,
            height: 61.0,
            band_height: 20.0,
            side,
            depth: DepthLayer::InFront,
        }
    }

    fn collectible(x: f32, y: f32) -> Collectible {
        Collectible {
            id: 1,
            pos: Vec2::new(x, y),
            width: 40.0,
            height: 40.0,
        }
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Rect::new(9.9, 9.9, 5.0, 5.0)));
    }

    #[test]
    fn test_middle_lane_threatened_by_either_side() {
        let player = Rect::new(155.0, 550.0, 90.0, 120.0);
        assert!(obstacle_hits_player(&player, Lane::Middle, &obstacle(12.0, 560.0, Side::Left)));
        assert!(obstacle_hits_player(&player, Lane::Middle, &obstacle(205.0, 560.0, Side::Right)));
    }

    #[test]
    fn test_side_lane_ignores_opposite_side() {
        let player = Rect::new(100.0, 650.0, 90.0, 120.0);
        // Geometric overlap exists, but the obstacle is on the other side
        let right = obstacle(100.0, 660.0, Side::Right);
        assert!(!obstacle_hits_player(&player, Lane::Left, &right));
        let left = obstacle(12.0, 660.0, Side::Left);
        assert!(obstacle_hits_player(&player, Lane::Left, &left));
    }

    #[test]
    fn test_band_forgives_sprite_edges() {
        let player = Rect::new(100.0, 650.0, 90.0, 120.0);
        // Sprite bottom (y + 61) pokes 15px into the player, band bottom does not
        let grazing = obstacle(12.0, 650.0 - 61.0 + 15.0, Side::Left);
        assert!(!obstacle_hits_player(&player, Lane::Left, &grazing));
    }

    #[test]
    fn test_collectible_contained_in_player() {
        let player = Rect::new(90.0, 600.0, 90.0, 120.0);
        assert!(collectible_hits_player(&player, &collectible(100.0, 640.0)));
        assert!(!collectible_hits_player(&player, &collectible(300.0, 640.0)));
    }

    #[test]
    fn test_find_collected_prefers_newest() {
        let player = Rect::new(90.0, 600.0, 90.0, 120.0);
        let items = vec![
            collectible(100.0, 610.0),
            collectible(400.0, 610.0),
            collectible(120.0, 650.0),
        ];
        assert_eq!(find_collected(&player, &items), Some(2));
        assert_eq!(find_collected(&player, &items[1..2]), None);
    }
}
