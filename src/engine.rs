//! Session lifecycle and the per-frame driver
//!
//! `Engine` owns the one `SessionState` and is its only writer. Host input
//! handlers enqueue `Intent`s; each `frame` drains the queue, ticks the
//! simulation under a capped clock, advances the ambient layer and returns the
//! events the shell should act on. Lifecycle commands (`start`, `restart`,
//! `set_muted`) apply immediately.
//!
//! ```text
//! Idle --start--> AwaitingAssets --assets ready--> Running --hit--> Over
//!   ^                                                                 |
//!   +------------------------------restart----------------------------+
//! ```

use std::collections::VecDeque;

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::assets::AssetManifest;
use crate::highscores::{ScoreRecord, ScoreSink};
use crate::settings::Settings;
use crate::sim::ambient::Ambient;
use crate::sim::lane::{Direction, LaneInput};
use crate::sim::layout::Layout;
use crate::sim::rng::{RandomSource, seeded};
use crate::sim::state::SessionState;
use crate::sim::tick::{TickContext, TickEvent, TickInput, advance_flare, tick};
use crate::tuning::{Tuning, TuningError};
use crate::view::RenderView;

/// Events surfaced to the host shell
pub type GameEvent = TickEvent;

/// Where the engine is in a session's life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Constructed, `start` not yet called
    Idle,
    /// `start` called; waiting for every asset slot
    AwaitingAssets,
    Running,
    /// Frozen until `restart`
    Over,
}

/// Queued host input, applied at the next frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    Lane(LaneInput),
    /// Enter/space on the game-over screen
    Confirm,
}

/// Converts host timestamps into capped simulation steps
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
    generation: u64,
}

impl FrameClock {
    /// Seconds since the previous frame, capped at `max_dt`
    ///
    /// The first frame after construction or `cancel` is a zero step.
    pub fn advance(&mut self, now_ms: f64, max_dt: f32) -> f32 {
        let dt = match self.last {
            Some(last) => ((now_ms - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last = Some(now_ms);
        dt.min(max_dt)
    }

    /// Forget the previous timestamp and invalidate pending frame callbacks
    pub fn cancel(&mut self) {
        self.last = None;
        self.generation += 1;
    }

    /// Bumped on every `cancel`; frame callbacks from an older generation are stale
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// The game engine: one session, its ambient layer and the frame driver
pub struct Engine {
    tuning: Tuning,
    layout: Layout,
    settings: Settings,
    rng: Box<dyn RandomSource>,
    /// Cosmetic draws stay off the gameplay stream
    ambient_rng: Pcg32,
    session: SessionState,
    ambient: Ambient,
    assets: AssetManifest,
    lifecycle: Lifecycle,
    intents: VecDeque<Intent>,
    clock: FrameClock,
    score_sink: Option<Box<dyn ScoreSink>>,
}

impl Engine {
    /// Build an engine for a viewport, seeding all randomness from `seed`
    pub fn new(
        tuning: Tuning,
        settings: Settings,
        viewport: (f32, f32),
        seed: u64,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        let layout = Layout::new(viewport.0, viewport.1, &tuning);
        let mut rng: Box<dyn RandomSource> = Box::new(seeded(seed));
        let mut ambient_rng = seeded(seed.wrapping_add(0x9E37_79B9_7F4A_7C15));
        let session = SessionState::new(&layout, &tuning, rng.as_mut());
        let ambient = Ambient::new(
            settings.quality.max_clouds(),
            settings.quality.star_count(),
            &layout,
            &tuning,
            &mut ambient_rng,
        );

        log::info!(
            "Engine ready: {}x{} playfield, seed {}",
            layout.width,
            layout.height,
            seed
        );

        Ok(Self {
            tuning,
            layout,
            settings,
            rng,
            ambient_rng,
            session,
            ambient,
            assets: AssetManifest::new(),
            lifecycle: Lifecycle::Idle,
            intents: VecDeque::new(),
            clock: FrameClock::default(),
            score_sink: None,
        })
    }

    /// Replace the gameplay random source (the current session is rebuilt)
    pub fn with_rng(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self.session = SessionState::new(&self.layout, &self.tuning, self.rng.as_mut());
        self
    }

    /// Require these assets before a session may start
    pub fn with_assets(mut self, assets: AssetManifest) -> Self {
        self.assets = assets;
        self
    }

    /// Receive every finished session
    pub fn with_score_sink(mut self, sink: Box<dyn ScoreSink>) -> Self {
        self.score_sink = Some(sink);
        self
    }

    // === Lifecycle commands ===

    /// Start the session, or wait for assets first
    ///
    /// Calling it again while waiting or running does nothing. After a game
    /// over it behaves like `restart`.
    pub fn start(&mut self) {
        match self.lifecycle {
            Lifecycle::Idle => {
                if self.assets.all_ready() {
                    self.begin_session();
                } else {
                    log::info!("Waiting for assets: {:?}", self.assets.missing());
                    self.lifecycle = Lifecycle::AwaitingAssets;
                }
            }
            Lifecycle::AwaitingAssets | Lifecycle::Running => {
                log::debug!("start() ignored while {:?}", self.lifecycle);
            }
            Lifecycle::Over => self.restart(),
        }
    }

    /// Throw the session away and start a fresh one
    pub fn restart(&mut self) {
        // Any frame callback already scheduled belongs to the old session
        self.clock.cancel();
        self.intents.clear();
        self.session = SessionState::new(&self.layout, &self.tuning, self.rng.as_mut());
        self.ambient
            .reset(&self.layout, &self.tuning, &mut self.ambient_rng);
        self.lifecycle = Lifecycle::Idle;
        log::info!("Session reset");
        self.start();
    }

    /// Stop driving frames (host teardown, hidden tab)
    ///
    /// Session state is kept; the next frame resumes with a zero step.
    pub fn stop(&mut self) {
        self.clock.cancel();
        self.intents.clear();
        log::info!("Frame loop stopped");
    }

    pub fn set_muted(&mut self, muted: bool) {
        if self.settings.muted != muted {
            log::info!("Sound {}", if muted { "muted" } else { "unmuted" });
        }
        self.settings.muted = muted;
    }

    /// Flag an asset slot as loaded
    pub fn mark_asset_ready(&mut self, name: &str) -> bool {
        self.assets.mark_ready(name)
    }

    fn begin_session(&mut self) {
        self.session.begin();
        self.lifecycle = Lifecycle::Running;
        log::info!("Session started");
    }

    // === Input ===

    pub fn push_intent(&mut self, intent: Intent) {
        self.intents.push_back(intent);
    }

    pub fn pointer_down(&mut self, x: f32) {
        self.push_intent(Intent::Lane(LaneInput::PointerDown { x }));
    }

    pub fn pointer_move(&mut self, x: f32) {
        self.push_intent(Intent::Lane(LaneInput::PointerMove { x }));
    }

    pub fn pointer_up(&mut self) {
        self.push_intent(Intent::Lane(LaneInput::PointerUp));
    }

    pub fn key_down(&mut self, direction: Direction) {
        self.push_intent(Intent::Lane(LaneInput::Key(direction)));
    }

    pub fn confirm(&mut self) {
        self.push_intent(Intent::Confirm);
    }

    // === Frame driver ===

    /// Advance one display frame at host time `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let dt = self.clock.advance(now_ms, self.tuning.max_frame_dt);
        let mut events = Vec::new();

        if self.lifecycle == Lifecycle::AwaitingAssets && self.assets.all_ready() {
            self.begin_session();
        }

        let (input, wants_restart) = self.drain_intents();
        if wants_restart {
            self.restart();
        } else {
            let ctx = TickContext {
                layout: &self.layout,
                tuning: &self.tuning,
            };
            tick(
                &mut self.session,
                &input,
                ctx,
                self.rng.as_mut(),
                dt,
                &mut events,
            );
            if self.session.over && self.lifecycle == Lifecycle::Running {
                self.lifecycle = Lifecycle::Over;
                self.submit_score(&events, now_ms);
            }
        }

        // Decoration keeps moving between sessions
        self.ambient.advance(
            dt,
            self.session.cycle_progress,
            &self.layout,
            &self.tuning,
            &mut self.ambient_rng,
        );
        advance_flare(&mut self.session, dt);

        events.retain(|event| match event {
            GameEvent::Sound(_) => !self.settings.muted,
            GameEvent::HapticPulse => self.settings.haptics,
            GameEvent::Toast(_) => self.settings.show_toasts,
            GameEvent::GameOver { .. } => true,
        });
        events
    }

    /// Split queued intents into lane input for this tick and a restart request
    fn drain_intents(&mut self) -> (TickInput, bool) {
        let mut input = TickInput::default();
        let mut wants_restart = false;
        while let Some(intent) = self.intents.pop_front() {
            match (self.lifecycle, intent) {
                (Lifecycle::Running, Intent::Lane(lane)) => input.lane.push(lane),
                (Lifecycle::Over, Intent::Lane(LaneInput::PointerDown { .. }) | Intent::Confirm)
                    if self.settings.tap_to_restart =>
                {
                    wants_restart = true;
                }
                // Nothing else is meaningful outside a running session
                _ => {}
            }
        }
        (input, wants_restart)
    }

    fn submit_score(&mut self, events: &[GameEvent], now_ms: f64) {
        let Some((score, distance)) = events.iter().find_map(|e| match e {
            GameEvent::GameOver { score, distance } => Some((*score, *distance)),
            _ => None,
        }) else {
            return;
        };
        let Some(sink) = self.score_sink.as_mut() else {
            return;
        };
        let record = ScoreRecord {
            score,
            distance,
            timestamp: now_ms,
        };
        match sink.submit(&record) {
            Ok(Some(rank)) => log::info!("Score {} ranked #{}", score, rank),
            Ok(None) => {}
            Err(e) => log::warn!("Score submission rejected: {}", e),
        }
    }

    // === Read-only access ===

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn ambient(&self) -> &Ambient {
        &self.ambient
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn assets(&self) -> &AssetManifest {
        &self.assets
    }

    /// Frame-callback generation (see `FrameClock::generation`)
    pub fn generation(&self) -> u64 {
        self.clock.generation()
    }

    /// Snapshot for the renderer
    pub fn view(&self) -> RenderView {
        RenderView::capture(self)
    }
}
