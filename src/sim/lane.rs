//! Player lane state machine
//!
//! Lanes change on a horizontal drag that crosses a dead-zone threshold, or on
//! a left/right key. The first change of a session also kicks off the drop
//! from the perch to the climbing position.

use serde::{Deserialize, Serialize};

use super::state::{Lane, Player, SpriteSet};

/// Discrete horizontal direction from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn lane(self) -> Lane {
        match self {
            Direction::Left => Lane::Left,
            Direction::Right => Lane::Right,
        }
    }
}

/// Raw input the lane machine consumes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LaneInput {
    PointerDown { x: f32 },
    PointerMove { x: f32 },
    PointerUp,
    Key(Direction),
}

/// A lane change that actually happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneChange {
    pub from: Lane,
    pub to: Lane,
    /// This was the first change of the session
    pub first_move: bool,
}

/// Gesture tracking between pointer events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaneMachine {
    /// x where the current drag started
    gesture_start: Option<f32>,
}

impl LaneMachine {
    pub fn gesture_start(&self) -> Option<f32> {
        self.gesture_start
    }

    /// Drop any half-finished gesture
    pub fn reset(&mut self) {
        self.gesture_start = None;
    }

    /// Feed one input event; returns the lane change it caused, if any
    pub fn handle(
        &mut self,
        input: LaneInput,
        player: &mut Player,
        threshold: f32,
    ) -> Option<LaneChange> {
        match input {
            LaneInput::PointerDown { x } => {
                self.gesture_start = Some(x);
                None
            }
            LaneInput::PointerMove { x } => {
                // Moves without a recorded start are ignored
                let start = self.gesture_start?;
                let delta = x - start;
                if delta.abs() <= threshold {
                    return None;
                }
                // One lane change per gesture
                self.gesture_start = None;
                let target = if delta > 0.0 { Lane::Right } else { Lane::Left };
                shift_lane(player, target)
            }
            LaneInput::PointerUp => {
                self.gesture_start = None;
                None
            }
            LaneInput::Key(direction) => shift_lane(player, direction.lane()),
        }
    }
}

/// Move the player to `target`, starting the transition on the first move
fn shift_lane(player: &mut Player, target: Lane) -> Option<LaneChange> {
    if player.lane == target {
        return None;
    }
    let from = player.lane;
    player.lane = target;

    let first_move = !player.first_move_done;
    if first_move {
        player.first_move_done = true;
        player.transition = Some(0.0);
        player.sprite.set = SpriteSet::Climbing;
    }

    Some(LaneChange {
        from,
        to: target,
        first_move,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::layout::Layout;
    use crate::tuning::Tuning;

    fn player() -> Player {
        let tuning = Tuning::default();
        Player::new(&Layout::new(400.0, 800.0, &tuning), &tuning)
    }

    #[test]
    fn test_drag_left_from_middle() {
        let mut machine = LaneMachine::default();
        let mut player = player();

        assert_eq!(machine.handle(LaneInput::PointerDown { x: 100.0 }, &mut player, 20.0), None);
        let change = machine
            .handle(LaneInput::PointerMove { x: 70.0 }, &mut player, 20.0)
            .unwrap();

        assert_eq!(change.from, Lane::Middle);
        assert_eq!(change.to, Lane::Left);
        assert!(change.first_move);
        assert_eq!(player.lane, Lane::Left);
        assert!(player.in_transition());
        assert_eq!(player.sprite.set, SpriteSet::Climbing);
        assert_eq!(machine.gesture_start(), None);
    }

    #[test]
    fn test_small_drag_stays_put() {
        let mut machine = LaneMachine::default();
        let mut player = player();
        machine.handle(LaneInput::PointerDown { x: 100.0 }, &mut player, 20.0);
        assert_eq!(machine.handle(LaneInput::PointerMove { x: 115.0 }, &mut player, 20.0), None);
        assert_eq!(player.lane, Lane::Middle);
        // Gesture is still live, so a longer drag later counts
        assert!(machine.handle(LaneInput::PointerMove { x: 130.0 }, &mut player, 20.0).is_some());
        assert_eq!(player.lane, Lane::Right);
    }

    #[test]
    fn test_move_without_start_is_ignored() {
        let mut machine = LaneMachine::default();
        let mut player = player();
        assert_eq!(machine.handle(LaneInput::PointerMove { x: 500.0 }, &mut player, 20.0), None);
        machine.handle(LaneInput::PointerDown { x: 100.0 }, &mut player, 20.0);
        machine.handle(LaneInput::PointerUp, &mut player, 20.0);
        assert_eq!(machine.handle(LaneInput::PointerMove { x: 0.0 }, &mut player, 20.0), None);
        assert_eq!(player.lane, Lane::Middle);
    }

    #[test]
    fn test_second_move_does_not_retrigger_transition() {
        let mut machine = LaneMachine::default();
        let mut player = player();
        machine.handle(LaneInput::Key(Direction::Right), &mut player, 20.0);
        player.transition = None;

        let change = machine
            .handle(LaneInput::Key(Direction::Left), &mut player, 20.0)
            .unwrap();
        assert!(!change.first_move);
        assert!(!player.in_transition());
    }

    #[test]
    fn test_same_lane_is_not_a_change() {
        let mut machine = LaneMachine::default();
        let mut player = player();
        machine.handle(LaneInput::Key(Direction::Left), &mut player, 20.0);
        assert_eq!(machine.handle(LaneInput::Key(Direction::Left), &mut player, 20.0), None);

        // A drag toward the current lane still consumes the gesture
        machine.handle(LaneInput::PointerDown { x: 200.0 }, &mut player, 20.0);
        assert_eq!(machine.handle(LaneInput::PointerMove { x: 100.0 }, &mut player, 20.0), None);
        assert_eq!(machine.gesture_start(), None);
    }
}
