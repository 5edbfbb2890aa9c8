//! Read-only render snapshot
//!
//! Everything an external renderer needs for one frame, already resolved to
//! screen space and cycle colors. Serializable so the web shell can take it
//! as JSON.

use serde::Serialize;

use crate::engine::{Engine, Lifecycle};
use crate::sim::ambient::Cloud;
use crate::sim::collision::Rect;
use crate::sim::cycle::{
    Phase, Rgb, SkyGradient, TINT_ALPHA, asset_tint, cloud_opacity, sky_gradient, star_opacity,
};
use crate::sim::state::{Collectible, Lane, Obstacle, SpriteSet};

/// Player as drawn
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub lane: Lane,
    pub rect: Rect,
    pub sprite: SpriteSet,
    pub frame: u8,
    pub in_transition: bool,
}

/// Star as drawn: position, radius and alpha with shine applied
#[derive(Debug, Clone, Serialize)]
pub struct StarView {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: f32,
}

/// One frame's worth of drawable state
#[derive(Debug, Clone, Serialize)]
pub struct RenderView {
    pub lifecycle: Lifecycle,
    pub over: bool,

    // === HUD ===
    pub distance: f32,
    pub collected: u32,
    pub muted: bool,

    // === Playfield ===
    pub width: f32,
    pub height: f32,
    pub pillar_x: f32,
    pub pillar_width: f32,
    /// Vertical texture offset for the scrolling pillar
    pub scroll_offset: f32,
    pub player: PlayerView,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,

    // === Environment ===
    pub cycle_progress: f32,
    pub phase: Phase,
    pub sky: SkyGradient,
    pub tint: Rgb,
    pub tint_alpha: f32,
    /// 0.0 when no flare is active
    pub flare: f32,
    pub clouds: Vec<Cloud>,
    pub stars: Vec<StarView>,
}

impl RenderView {
    pub fn capture(engine: &Engine) -> Self {
        let session = engine.session();
        let layout = engine.layout();
        let tuning = engine.tuning();
        let settings = engine.settings();
        let progress = session.cycle_progress;
        let player = &session.player;

        // Cycle envelope applied on top of each cloud's own opacity
        let cloud_alpha = cloud_opacity(progress);
        let clouds = engine
            .ambient()
            .clouds
            .clouds
            .iter()
            .map(|c| Cloud {
                opacity: c.opacity * cloud_alpha,
                ..c.clone()
            })
            .collect();

        let star_alpha = star_opacity(progress);
        let stars = if star_alpha > 0.0 {
            engine
                .ambient()
                .stars
                .stars
                .iter()
                .map(|s| {
                    let boost = s.boost(tuning.shine_duration);
                    StarView {
                        x: s.pos.x,
                        y: s.pos.y,
                        radius: s.radius * boost,
                        alpha: (star_alpha * boost).min(1.0),
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            lifecycle: engine.lifecycle(),
            over: session.over,

            distance: session.distance,
            collected: session.collected,
            muted: settings.muted,

            width: layout.width,
            height: layout.height,
            pillar_x: layout.pillar_x,
            pillar_width: layout.pillar_width,
            scroll_offset: session.scroll_distance.rem_euclid(layout.height.max(1.0)),
            player: PlayerView {
                lane: player.lane,
                rect: player.rect(layout),
                sprite: player.sprite.set,
                frame: player.sprite.frame,
                in_transition: player.in_transition(),
            },
            obstacles: session.obstacles.clone(),
            collectibles: session.collectibles.clone(),

            cycle_progress: progress,
            phase: Phase::from_progress(progress),
            sky: sky_gradient(progress),
            tint: asset_tint(progress),
            tint_alpha: TINT_ALPHA,
            flare: settings.effective_flare(session.flare.map_or(0.0, |f| f.intensity())),
            clouds,
            stars,
        }
    }

    /// Serialize for the web shell
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
