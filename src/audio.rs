//! Sound cues and Web Audio playback
//!
//! The engine only emits `SoundCue`s. On the web, `AudioPlayer` plays the
//! decoded buffer the host registered for each cue, falling back to a short
//! synthesized blip while a buffer is missing.

use serde::{Deserialize, Serialize};

/// Sounds the game can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player changed lanes
    Swipe,
    /// Player grabbed a collectible
    Collect,
}

impl SoundCue {
    pub const ALL: [SoundCue; 2] = [SoundCue::Swipe, SoundCue::Collect];

    /// Name used for the matching asset slot
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Swipe => "swipe",
            SoundCue::Collect => "collect",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "swipe" => Some(SoundCue::Swipe),
            "collect" => Some(SoundCue::Collect),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioPlayer;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioBuffer, AudioContext, OscillatorType};

    use super::SoundCue;

    /// Plays cues through one shared `AudioContext`
    pub struct AudioPlayer {
        ctx: Option<AudioContext>,
        swipe: Option<AudioBuffer>,
        collect: Option<AudioBuffer>,
        volume: f32,
        muted: bool,
    }

    impl Default for AudioPlayer {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioPlayer {
        pub fn new() -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                swipe: None,
                collect: None,
                volume: 0.8,
                muted: false,
            }
        }

        /// The context the host should decode buffers with
        pub fn context(&self) -> Option<&AudioContext> {
            self.ctx.as_ref()
        }

        /// Register the decoded buffer for a cue
        pub fn set_buffer(&mut self, cue: SoundCue, buffer: AudioBuffer) {
            log::info!("Audio buffer ready: {}", cue.as_str());
            match cue {
                SoundCue::Swipe => self.swipe = Some(buffer),
                SoundCue::Collect => self.collect = Some(buffer),
            }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        /// Resume the context (browsers require a user gesture first)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn play(&self, cue: SoundCue) {
            if self.muted || self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let buffer = match cue {
                SoundCue::Swipe => self.swipe.as_ref(),
                SoundCue::Collect => self.collect.as_ref(),
            };
            let played = match buffer {
                Some(buffer) => self.play_buffer(ctx, buffer).is_some(),
                None => false,
            };
            if !played {
                self.play_blip(ctx, cue);
            }
        }

        fn play_buffer(&self, ctx: &AudioContext, buffer: &AudioBuffer) -> Option<()> {
            let source = ctx.create_buffer_source().ok()?;
            let gain = ctx.create_gain().ok()?;
            source.set_buffer(Some(buffer));
            gain.gain().set_value(self.volume);
            source.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            source.start().ok()
        }

        /// Synthesized stand-in: a quick falling whoosh or a rising chime
        fn play_blip(&self, ctx: &AudioContext, cue: SoundCue) -> Option<()> {
            let (osc_type, from, to, length, level) = match cue {
                SoundCue::Swipe => (OscillatorType::Triangle, 500.0, 200.0, 0.08, 0.25),
                SoundCue::Collect => (OscillatorType::Sine, 600.0, 1200.0, 0.15, 0.4),
            };

            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(osc_type);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let t = ctx.current_time();
            gain.gain().set_value_at_time(self.volume * level, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok()?;
            osc.frequency().set_value_at_time(from, t).ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + length)
                .ok()?;

            osc.start().ok()?;
            osc.stop_with_when(t + length + 0.02).ok()
        }
    }
}
