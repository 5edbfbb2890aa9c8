//! Decorative clouds and stars
//!
//! Purely cosmetic populations with their own spawn/expire lifecycles. They
//! never touch gameplay state and keep animating between sessions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cycle::star_opacity;
use super::layout::Layout;
use super::rng::RandomSource;
use crate::consts::CLOUD_VARIANTS;
use crate::tuning::Tuning;

/// A drifting cloud
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    /// Sprite centre
    pub pos: Vec2,
    pub scale: f32,
    /// Per-cloud opacity, multiplied by the cycle's cloud envelope
    pub opacity: f32,
    /// Which cloud sprite to draw
    pub variant: u8,
}

/// Fixed-size population of clouds drifting right to left
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudField {
    pub clouds: Vec<Cloud>,
    pub max: usize,
}

impl CloudField {
    pub fn new(max: usize) -> Self {
        Self {
            clouds: Vec::with_capacity(max),
            max,
        }
    }

    fn spawn(&mut self, layout: &Layout, tuning: &Tuning, rng: &mut dyn RandomSource) {
        self.clouds.push(Cloud {
            pos: Vec2::new(
                layout.width + rng.range(0.0, 100.0),
                rng.range(0.0, layout.height * 0.4),
            ),
            scale: rng.range(tuning.cloud_scale_min, tuning.cloud_scale_max),
            opacity: rng.range(0.3, 0.6),
            variant: rng.index(CLOUD_VARIANTS as usize) as u8,
        });
    }

    /// Top the population back up to `max`
    pub fn fill(&mut self, layout: &Layout, tuning: &Tuning, rng: &mut dyn RandomSource) {
        while self.clouds.len() < self.max {
            self.spawn(layout, tuning, rng);
        }
    }

    /// Replace every cloud with a fresh one off the right edge
    pub fn reset(&mut self, layout: &Layout, tuning: &Tuning, rng: &mut dyn RandomSource) {
        self.clouds.clear();
        self.fill(layout, tuning, rng);
    }

    pub fn advance(
        &mut self,
        dt: f32,
        layout: &Layout,
        tuning: &Tuning,
        rng: &mut dyn RandomSource,
    ) {
        let width = tuning.cloud_sprite_width;
        for cloud in &mut self.clouds {
            cloud.pos.x -= tuning.cloud_speed * dt;
        }
        self.clouds.retain(|c| c.pos.x + width * c.scale >= 0.0);
        self.fill(layout, tuning, rng);
    }
}

/// A fixed background star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    /// Seconds into the current shine, if shining
    pub shine: Option<f32>,
}

impl Star {
    /// Size/brightness multiplier: 1.5 at the start of a shine, back to 1.0
    pub fn boost(&self, shine_duration: f32) -> f32 {
        match self.shine {
            Some(elapsed) => 1.0 + 0.5 * (1.0 - (elapsed / shine_duration).min(1.0)),
            None => 1.0,
        }
    }
}

/// Star population with one shared shine timer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StarField {
    pub stars: Vec<Star>,
    since_shine: f32,
    next_shine_in: f32,
}

impl StarField {
    pub fn new(count: usize, layout: &Layout, tuning: &Tuning, rng: &mut dyn RandomSource) -> Self {
        let stars = (0..count)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.range(0.0, layout.width),
                    rng.range(0.0, layout.height * 0.7),
                ),
                radius: rng.range(1.0, 3.0),
                shine: None,
            })
            .collect();
        Self {
            stars,
            since_shine: 0.0,
            next_shine_in: rng.range(tuning.min_shine_interval, tuning.max_shine_interval),
        }
    }

    /// Stop all shines and restart the timer
    pub fn reset(&mut self, tuning: &Tuning, rng: &mut dyn RandomSource) {
        for star in &mut self.stars {
            star.shine = None;
        }
        self.since_shine = 0.0;
        self.next_shine_in = rng.range(tuning.min_shine_interval, tuning.max_shine_interval);
    }

    /// Index of the star currently shining
    pub fn shining(&self) -> Option<usize> {
        self.stars.iter().position(|s| s.shine.is_some())
    }

    pub fn advance(&mut self, dt: f32, progress: f32, tuning: &Tuning, rng: &mut dyn RandomSource) {
        for star in &mut self.stars {
            if let Some(elapsed) = star.shine.as_mut() {
                *elapsed += dt;
                if *elapsed >= tuning.shine_duration {
                    star.shine = None;
                }
            }
        }

        self.since_shine += dt;
        // Shines are only scheduled while stars are visible
        if star_opacity(progress) <= 0.0 || self.stars.is_empty() {
            return;
        }
        if self.since_shine >= self.next_shine_in {
            let pick = rng.index(self.stars.len());
            for (i, star) in self.stars.iter_mut().enumerate() {
                star.shine = (i == pick).then_some(0.0);
            }
            self.since_shine = 0.0;
            self.next_shine_in = rng.range(tuning.min_shine_interval, tuning.max_shine_interval);
        }
    }
}

/// All decorative populations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ambient {
    pub clouds: CloudField,
    pub stars: StarField,
}

impl Ambient {
    pub fn new(
        max_clouds: usize,
        star_count: usize,
        layout: &Layout,
        tuning: &Tuning,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let mut clouds = CloudField::new(max_clouds);
        clouds.fill(layout, tuning, rng);
        Self {
            clouds,
            stars: StarField::new(star_count, layout, tuning, rng),
        }
    }

    /// Session-start refresh: new clouds, no shining stars
    pub fn reset(&mut self, layout: &Layout, tuning: &Tuning, rng: &mut dyn RandomSource) {
        self.clouds.reset(layout, tuning, rng);
        self.stars.reset(tuning, rng);
    }

    pub fn advance(
        &mut self,
        dt: f32,
        progress: f32,
        layout: &Layout,
        tuning: &Tuning,
        rng: &mut dyn RandomSource,
    ) {
        self.clouds.advance(dt, layout, tuning, rng);
        self.stars.advance(dt, progress, tuning, rng);
    }
}
