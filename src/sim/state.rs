//! Session state and core simulation types
//!
//! Everything one play session mutates lives in `SessionState`. Entities are
//! plain fixed-shape records; all interaction between them happens in `tick`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::cycle::Flare;
use super::lane::LaneMachine;
use super::layout::Layout;
use super::rng::RandomSource;
use super::spawner::Spawner;
use crate::tuning::Tuning;

/// Discrete horizontal position of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lane {
    Left,
    #[default]
    Middle,
    Right,
}

/// Pillar side an obstacle grows from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Lane that sits on this side of the pillar
    pub fn lane(self) -> Lane {
        match self {
            Side::Left => Lane::Left,
            Side::Right => Lane::Right,
        }
    }
}

/// Draw order relative to the pillar (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthLayer {
    Behind,
    InFront,
}

/// Which two-frame sprite pair the renderer should cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpriteSet {
    /// Sitting on top of the pillar, before the first move
    #[default]
    Perched,
    /// Clinging to a pillar side
    Climbing,
}

/// Sprite cycling state (not gameplay-affecting)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpriteState {
    pub set: SpriteSet,
    /// 0 or 1
    pub frame: u8,
    /// Sixtieths of a second since the last toggle
    counter: f32,
}

impl SpriteState {
    /// Advance the frame counter and toggle every `ticks_per_frame`
    pub fn advance(&mut self, dt: f32, ticks_per_frame: f32) {
        self.counter += dt * 60.0;
        if self.counter >= ticks_per_frame {
            self.frame ^= 1;
            self.counter = 0.0;
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub lane: Lane,
    pub width: f32,
    pub height: f32,
    /// Top edge; only changes during the first-move transition
    pub y: f32,
    pub first_move_done: bool,
    /// Seconds into the first-move transition, if one is running
    pub transition: Option<f32>,
    pub sprite: SpriteState,
}

impl Player {
    pub fn new(layout: &Layout, tuning: &Tuning) -> Self {
        Self {
            lane: Lane::Middle,
            width: tuning.player_width,
            height: tuning.player_height,
            y: layout.player_start_y(tuning),
            first_move_done: false,
            transition: None,
            sprite: SpriteState::default(),
        }
    }

    /// Bounding box in screen space
    pub fn rect(&self, layout: &Layout) -> Rect {
        Rect::new(
            layout.player_x(self.lane, self.width),
            self.y,
            self.width,
            self.height,
        )
    }

    pub fn in_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// Move the player down toward the climbing position
    pub fn advance_transition(&mut self, dt: f32, layout: &Layout, tuning: &Tuning) {
        let Some(elapsed) = self.transition else {
            return;
        };
        let elapsed = elapsed + dt;
        let progress = (elapsed / tuning.transition_duration).min(1.0);
        let start = layout.player_start_y(tuning);
        self.y = start + (layout.player_climb_y(tuning) - start) * progress;
        self.transition = if progress >= 1.0 { None } else { Some(elapsed) };
    }
}

/// A falling hazard attached to one side of the pillar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Top-left corner of the sprite
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Height of the hazardous band centred in the sprite
    pub band_height: f32,
    pub side: Side,
    pub depth: DepthLayer,
}

impl Obstacle {
    /// The hazardous sub-rectangle
    pub fn band(&self) -> Rect {
        let band = self.band_height.min(self.height);
        Rect::new(
            self.pos.x,
            self.pos.y + (self.height - band) / 2.0,
            self.width,
            band,
        )
    }
}

/// A falling token the player can grab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    /// Top-left corner of the sprite
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Collectible {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

/// Complete state of one play session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub running: bool,
    pub over: bool,
    /// Time-accumulated score proxy
    pub distance: f32,
    /// Collectibles grabbed
    pub collected: u32,
    pub scroll_speed: f32,
    /// Total vertical scroll, drives obstacle spacing
    pub scroll_distance: f32,
    /// Seconds simulated while running
    pub time: f32,
    /// Cached `cycle_progress(distance)` from the last tick
    pub cycle_progress: f32,
    pub player: Player,
    /// Active obstacles (oldest first)
    pub obstacles: Vec<Obstacle>,
    /// Active collectibles (oldest first)
    pub collectibles: Vec<Collectible>,
    pub spawner: Spawner,
    pub lane_input: LaneMachine,
    /// Light burst currently fading, if any
    pub flare: Option<Flare>,
    next_id: u32,
}

impl SessionState {
    /// Fresh, not-yet-running session
    pub fn new(layout: &Layout, tuning: &Tuning, rng: &mut dyn RandomSource) -> Self {
        Self {
            running: false,
            over: false,
            distance: 0.0,
            collected: 0,
            scroll_speed: tuning.initial_speed,
            scroll_distance: 0.0,
            time: 0.0,
            cycle_progress: 0.0,
            player: Player::new(layout, tuning),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            spawner: Spawner::new(tuning, rng),
            lane_input: LaneMachine::default(),
            flare: None,
            next_id: 1,
        }
    }

    /// Let the clock run
    pub fn begin(&mut self) {
        if !self.over {
            self.running = true;
        }
    }

    /// Freeze the session for good
    pub fn end(&mut self) {
        self.over = true;
        self.running = false;
        self.lane_input.reset();
    }

    /// True while ticks advance the simulation
    pub fn is_live(&self) -> bool {
        self.running && !self.over
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
