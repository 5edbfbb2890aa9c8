//! Day/night environment cycle
//!
//! The cycle is a pure function of distance: `progress = (distance mod D) / D`.
//! Progress is split into five equal bands that blend sky colors through fixed
//! keyframes. Cloud and star visibility, and the two flare triggers per cycle,
//! all derive from the same value.

use serde::{Deserialize, Serialize};

use crate::lerp;

/// Width of one phase band
pub const BAND_WIDTH: f32 = 0.2;

/// Progress values where a flare fires (start of dusk, start of sunrise)
pub const FLARE_BOUNDARIES: [f32; 2] = [0.4, 0.8];

/// Opacity of the asset tint overlay
pub const TINT_ALPHA: f32 = 0.25;

/// Phase band of the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Dawn,
    Day,
    Dusk,
    Night,
    Sunrise,
}

impl Phase {
    pub fn from_progress(progress: f32) -> Self {
        match band_index(progress) {
            0 => Phase::Dawn,
            1 => Phase::Day,
            2 => Phase::Dusk,
            3 => Phase::Night,
            _ => Phase::Sunrise,
        }
    }
}

/// RGB color with 0-255 channels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb::new(
            lerp(self.r, other.r, t),
            lerp(self.g, other.g, t),
            lerp(self.b, other.b, t),
        )
    }
}

/// Vertical sky gradient endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyGradient {
    pub top: Rgb,
    pub bottom: Rgb,
}

/// Sky keyframes at progress 0.0, 0.2, ... 1.0
const SKY_TOP: [Rgb; 6] = [
    Rgb::new(173.0, 216.0, 230.0),
    Rgb::new(216.0, 230.0, 245.0),
    Rgb::new(255.0, 204.0, 153.0),
    Rgb::new(204.0, 101.0, 67.0),
    Rgb::new(12.0, 20.0, 35.0),
    Rgb::new(173.0, 216.0, 230.0),
];

const SKY_BOTTOM: [Rgb; 6] = [
    Rgb::new(255.0, 245.0, 179.0),
    Rgb::new(255.0, 223.0, 153.0),
    Rgb::new(255.0, 183.0, 102.0),
    Rgb::new(153.0, 77.0, 89.0),
    Rgb::new(10.0, 15.0, 25.0),
    Rgb::new(255.0, 245.0, 179.0),
];

const TINT: [Rgb; 6] = [
    Rgb::new(0.0, 82.0, 255.0),
    Rgb::new(30.0, 120.0, 255.0),
    Rgb::new(80.0, 160.0, 255.0),
    Rgb::new(15.0, 40.0, 100.0),
    Rgb::new(40.0, 110.0, 220.0),
    Rgb::new(0.0, 82.0, 255.0),
];

/// Cycle progress in `[0, 1)` for a distance
pub fn cycle_progress(distance: f32, cycle_duration: f32) -> f32 {
    let p = distance.rem_euclid(cycle_duration) / cycle_duration;
    // rem_euclid can round up to the divisor itself
    if p >= 1.0 { 0.0 } else { p }
}

fn band_index(progress: f32) -> usize {
    ((progress / BAND_WIDTH).max(0.0) as usize).min(4)
}

fn sample(frames: &[Rgb; 6], progress: f32) -> Rgb {
    let band = band_index(progress);
    let t = ((progress - band as f32 * BAND_WIDTH) / BAND_WIDTH).clamp(0.0, 1.0);
    frames[band].lerp(frames[band + 1], t)
}

/// Sky gradient for a cycle position
pub fn sky_gradient(progress: f32) -> SkyGradient {
    SkyGradient {
        top: sample(&SKY_TOP, progress),
        bottom: sample(&SKY_BOTTOM, progress),
    }
}

/// Tint laid over sprites so they match the sky (alpha is `TINT_ALPHA`)
pub fn asset_tint(progress: f32) -> Rgb {
    sample(&TINT, progress)
}

/// Cloud opacity multiplier: ramps in over dawn, fades out by nightfall
pub fn cloud_opacity(progress: f32) -> f32 {
    let c = progress.min(0.6);
    if c < BAND_WIDTH {
        c / BAND_WIDTH
    } else {
        1.0 - (c - BAND_WIDTH) / 0.4
    }
}

/// Star opacity: trapezoid over the night band, zero elsewhere
pub fn star_opacity(progress: f32) -> f32 {
    if !(0.6..0.8).contains(&progress) {
        return 0.0;
    }
    let night = (progress - 0.6) / BAND_WIDTH;
    if night < 0.25 {
        night / 0.25
    } else if night < 0.75 {
        1.0
    } else {
        1.0 - (night - 0.75) / 0.25
    }
}

/// True if moving from `prev` to `cur` passed a flare boundary
///
/// Handles the wrap from the end of one cycle into the next.
pub fn crossed_flare_boundary(prev: f32, cur: f32) -> bool {
    FLARE_BOUNDARIES.iter().any(|&b| {
        if cur >= prev {
            prev < b && cur >= b
        } else {
            prev < b || cur >= b
        }
    })
}

/// A light burst fading out linearly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flare {
    pub elapsed: f32,
    pub duration: f32,
}

impl Flare {
    pub fn new(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
        }
    }

    /// 1.0 at trigger, 0.0 when spent
    pub fn intensity(&self) -> f32 {
        (1.0 - self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Advance; returns false once the flare is spent
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.elapsed <= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_wraps() {
        assert_eq!(cycle_progress(0.0, 1000.0), 0.0);
        assert_eq!(cycle_progress(2250.0, 1000.0), 0.25);
        assert_eq!(cycle_progress(1000.0, 1000.0), 0.0);
    }

    #[test]
    fn test_quarter_cycle_is_second_band() {
        let p = cycle_progress(2.0 * 1000.0 + 0.25 * 1000.0, 1000.0);
        assert_eq!(Phase::from_progress(p), Phase::Day);
    }

    #[test]
    fn test_sky_keyframes() {
        assert_eq!(sky_gradient(0.0).top, Rgb::new(173.0, 216.0, 230.0));
        assert_eq!(sky_gradient(0.2).top, Rgb::new(216.0, 230.0, 245.0));
        let mid = sky_gradient(0.1).bottom;
        assert!((mid.g - 234.0).abs() < 1e-3);
        // Sky is continuous across the wrap
        let end = sky_gradient(0.999_99).top;
        assert!((end.r - 173.0).abs() < 0.1);
    }

    #[test]
    fn test_cloud_envelope() {
        assert_eq!(cloud_opacity(0.0), 0.0);
        assert!((cloud_opacity(0.2) - 1.0).abs() < 1e-6);
        assert!((cloud_opacity(0.4) - 0.5).abs() < 1e-5);
        assert!(cloud_opacity(0.6).abs() < 1e-5);
        assert!(cloud_opacity(0.9).abs() < 1e-5);
    }

    #[test]
    fn test_stars_only_at_night() {
        assert_eq!(star_opacity(0.5), 0.0);
        assert_eq!(star_opacity(0.85), 0.0);
        assert_eq!(star_opacity(0.7), 1.0);
        assert!((star_opacity(0.625) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_flare_boundaries() {
        assert!(crossed_flare_boundary(0.39, 0.41));
        assert!(crossed_flare_boundary(0.79, 0.8));
        assert!(!crossed_flare_boundary(0.41, 0.5));
        assert!(!crossed_flare_boundary(0.95, 0.05));
        assert!(crossed_flare_boundary(0.7, 0.9));
    }

    #[test]
    fn test_flare_decays() {
        let mut flare = Flare::new(1.5);
        assert_eq!(flare.intensity(), 1.0);
        assert!(flare.advance(0.75));
        assert!((flare.intensity() - 0.5).abs() < 1e-6);
        assert!(!flare.advance(1.0));
        assert_eq!(flare.intensity(), 0.0);
    }
}
