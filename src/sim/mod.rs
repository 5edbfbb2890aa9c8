//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Variable but capped timestep, supplied by the caller
//! - Randomness only through `RandomSource`
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod ambient;
pub mod collision;
pub mod cycle;
pub mod lane;
pub mod layout;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;

pub use ambient::{Ambient, Cloud, CloudField, Star, StarField};
pub use collision::{Rect, find_collected, obstacle_hits_player};
pub use cycle::{Flare, Phase, Rgb, SkyGradient, cycle_progress};
pub use lane::{Direction, LaneInput, LaneMachine};
pub use layout::Layout;
pub use rng::{RandomSource, ScriptedRng, seeded};
pub use spawner::Spawner;
pub use state::{
    Collectible, DepthLayer, Lane, Obstacle, Player, SessionState, Side, SpriteSet, SpriteState,
};
pub use tick::{TickContext, TickEvent, TickInput, advance_flare, tick};
