//! Platform glue
//!
//! Host-independent input mapping lives here; the browser facade is in `web`.

use crate::engine::Intent;
use crate::sim::lane::{Direction, LaneInput};

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Map a DOM `KeyboardEvent.key` value to an intent
pub fn key_intent(key: &str) -> Option<Intent> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Intent::Lane(LaneInput::Key(Direction::Left))),
        "ArrowRight" | "d" | "D" => Some(Intent::Lane(LaneInput::Key(Direction::Right))),
        " " | "Enter" => Some(Intent::Confirm),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            key_intent("ArrowLeft"),
            Some(Intent::Lane(LaneInput::Key(Direction::Left)))
        );
        assert_eq!(
            key_intent("D"),
            Some(Intent::Lane(LaneInput::Key(Direction::Right)))
        );
        assert_eq!(key_intent("Enter"), Some(Intent::Confirm));
        assert_eq!(key_intent("Escape"), None);
    }
}
