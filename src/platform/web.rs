//! Browser facade
//!
//! `WebGame` is what the JS shell constructs. It owns the engine, drives it
//! from `requestAnimationFrame`, plays sound cues and forwards every other
//! event to a JS listener as JSON.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{AudioBuffer, AudioContext};

use super::key_intent;
use crate::assets::AssetManifest;
use crate::audio::{AudioPlayer, SoundCue};
use crate::engine::{Engine, GameEvent};
use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

struct Shell {
    engine: Engine,
    audio: AudioPlayer,
    listener: Option<js_sys::Function>,
    /// Generation the live frame loop belongs to, if one is scheduled
    loop_generation: Option<u64>,
}

/// Forward events to the JS listener
///
/// Called with no borrow held so the listener may call back into `WebGame`.
fn notify(listener: Option<js_sys::Function>, events: Vec<GameEvent>) {
    let Some(listener) = listener else {
        return;
    };
    for event in events {
        match serde_json::to_string(&event) {
            Ok(json) => {
                if let Err(e) = listener.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    log::warn!("Event listener threw: {:?}", e);
                }
            }
            Err(e) => log::warn!("Failed to encode event: {}", e),
        }
    }
}

/// The game as seen from JavaScript
#[wasm_bindgen]
pub struct WebGame {
    shell: Rc<RefCell<Shell>>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game for a viewport; `tuning_json` may override balance
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, tuning_json: Option<String>) -> Result<WebGame, JsValue> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Tuning::default(),
        };
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;

        let mut audio = AudioPlayer::new();
        audio.set_muted(settings.muted);
        audio.set_volume(settings.volume);

        let engine = Engine::new(tuning, settings, (width, height), seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))?
            .with_assets(AssetManifest::standard())
            .with_score_sink(Box::new(HighScores::load()));

        log::info!("Canopy Run created with seed: {}", seed);

        let game = WebGame {
            shell: Rc::new(RefCell::new(Shell {
                engine,
                audio,
                listener: None,
                loop_generation: None,
            })),
        };
        game.watch_visibility();
        Ok(game)
    }

    /// Receive game events (`{"type": ..., "data": ...}` JSON strings)
    pub fn set_listener(&self, listener: js_sys::Function) {
        self.shell.borrow_mut().listener = Some(listener);
    }

    /// The context audio buffers must be decoded with
    pub fn audio_context(&self) -> Option<AudioContext> {
        self.shell.borrow().audio.context().cloned()
    }

    /// Hand over a decoded sound; also marks its asset slot ready
    pub fn set_audio_buffer(&self, name: &str, buffer: AudioBuffer) -> bool {
        let Some(cue) = SoundCue::from_str(name) else {
            log::warn!("Unknown sound: {}", name);
            return false;
        };
        let mut shell = self.shell.borrow_mut();
        shell.audio.set_buffer(cue, buffer);
        shell.engine.mark_asset_ready(cue.as_str())
    }

    /// Report a loaded image
    pub fn image_ready(&self, name: &str) -> bool {
        self.shell.borrow_mut().engine.mark_asset_ready(name)
    }

    /// Start the session and the frame loop
    pub fn start(&self) {
        {
            let mut shell = self.shell.borrow_mut();
            shell.audio.resume();
            shell.engine.start();
        }
        self.run();
    }

    pub fn restart(&self) {
        self.shell.borrow_mut().engine.restart();
        self.run();
    }

    /// Cancel the frame loop (teardown or navigation)
    pub fn stop(&self) {
        self.shell.borrow_mut().engine.stop();
    }

    pub fn set_muted(&self, muted: bool) {
        let mut shell = self.shell.borrow_mut();
        shell.engine.set_muted(muted);
        shell.audio.set_muted(muted);
        shell.engine.settings().save();
    }

    /// Master volume, clamped to 0..=1 and persisted
    pub fn set_volume(&self, volume: f32) {
        let mut shell = self.shell.borrow_mut();
        shell.audio.set_volume(volume);
        let volume = volume.clamp(0.0, 1.0);
        let settings = shell.engine.settings_mut();
        settings.volume = volume;
        settings.save();
    }

    pub fn pointer_down(&self, x: f32) {
        self.shell.borrow_mut().engine.pointer_down(x);
    }

    pub fn pointer_move(&self, x: f32) {
        self.shell.borrow_mut().engine.pointer_move(x);
    }

    pub fn pointer_up(&self) {
        self.shell.borrow_mut().engine.pointer_up();
    }

    /// Feed a `KeyboardEvent.key`; returns true if the game used it
    pub fn key_down(&self, key: &str) -> bool {
        match key_intent(key) {
            Some(intent) => {
                self.shell.borrow_mut().engine.push_intent(intent);
                true
            }
            None => false,
        }
    }

    /// Current render snapshot as JSON
    pub fn view_json(&self) -> Result<String, JsValue> {
        self.shell
            .borrow()
            .engine
            .view()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Stored leaderboard as JSON
    pub fn high_scores_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&HighScores::load()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl WebGame {
    fn run(&self) {
        ensure_loop(&self.shell);
    }

    /// Stop the loop while the tab is hidden, resume when it's back
    fn watch_visibility(&self) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let shell = self.shell.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                shell.borrow_mut().engine.stop();
                log::info!("Paused (tab hidden)");
            } else {
                ensure_loop(&shell);
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Schedule frames for the engine's current generation unless already looping
fn ensure_loop(shell: &Rc<RefCell<Shell>>) {
    let generation = {
        let mut s = shell.borrow_mut();
        let generation = s.engine.generation();
        if s.loop_generation == Some(generation) {
            return;
        }
        s.loop_generation = Some(generation);
        generation
    };
    request_animation_frame(shell.clone(), generation);
}

fn request_animation_frame(shell: Rc<RefCell<Shell>>, generation: u64) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        game_loop(shell, generation, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(shell: Rc<RefCell<Shell>>, generation: u64, time: f64) {
    let (events, listener, next) = {
        let mut s = shell.borrow_mut();
        // A stop or restart since this frame was scheduled retires it
        if s.engine.generation() != generation {
            return;
        }
        let mut events = s.engine.frame(time);
        events.retain(|event| match event {
            GameEvent::Sound(cue) => {
                s.audio.play(*cue);
                false
            }
            _ => true,
        });
        // A tap-to-restart inside the frame moves the loop to the new generation
        let next = s.engine.generation();
        s.loop_generation = Some(next);
        (events, s.listener.clone(), next)
    };

    notify(listener, events);

    // The listener may have stopped or restarted the game
    if shell.borrow().engine.generation() == next {
        request_animation_frame(shell, next);
    }
}
