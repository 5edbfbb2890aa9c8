//! Canopy Run entry point
//!
//! The web build is driven from JavaScript through `platform::web::WebGame`.
//! Natively this runs a headless session with an autopilot, which is handy
//! for smoke-testing balance changes:
//!
//! ```text
//! RUST_LOG=info canopy-run [seed] [seconds] [tuning.json]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    headless::run(std::env::args().skip(1).collect())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use canopy_run::sim::{Direction, Lane, Obstacle, SessionState, Side};
    use canopy_run::{Engine, GameEvent, HighScores, Lifecycle, Settings, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// How far above the player the autopilot looks for obstacles (px)
    const LOOKAHEAD: f32 = 140.0;

    pub fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
        let seed: u64 = match args.first() {
            Some(s) => s.parse()?,
            None => 42,
        };
        let seconds: f64 = match args.get(1) {
            Some(s) => s.parse()?,
            None => 120.0,
        };
        let tuning = match args.get(2) {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };

        log::info!("Canopy Run (headless) seed {} for up to {}s", seed, seconds);

        let mut engine = Engine::new(tuning, Settings::default(), (400.0, 800.0), seed)?
            .with_score_sink(Box::new(HighScores::new()));
        engine.start();

        let frames = (seconds * 1000.0 / FRAME_MS) as u64;
        let mut now = 0.0;
        let mut sounds = 0;
        for _ in 0..frames {
            if let Some(direction) = autopilot(engine.session(), &engine) {
                engine.key_down(direction);
            }
            for event in engine.frame(now) {
                match event {
                    GameEvent::GameOver { score, distance } => {
                        log::info!("Game over: {} collected, distance {:.1}", score, distance)
                    }
                    GameEvent::Sound(_) => sounds += 1,
                    _ => {}
                }
            }
            if engine.lifecycle() == Lifecycle::Over {
                break;
            }
            now += FRAME_MS;
        }

        let session = engine.session();
        println!(
            "seed={} time={:.1}s distance={:.1} collected={} speed={:.0} over={} sounds={}",
            seed, session.time, session.distance, session.collected, session.scroll_speed,
            session.over, sounds
        );
        Ok(())
    }

    /// Pick a lane change that dodges the closest threatening obstacle
    fn autopilot(session: &SessionState, engine: &Engine) -> Option<Direction> {
        if !session.is_live() {
            return None;
        }
        let player = session.player.rect(engine.layout());
        let lane = session.player.lane;

        // Leave the pillar top straight away; the middle lane is hit by everything
        if lane == Lane::Middle {
            return Some(Direction::Left);
        }

        let threatened = |o: &&Obstacle| {
            let band = o.band();
            o.side.lane() == lane
                && band.bottom() > player.y - LOOKAHEAD
                && band.y < player.bottom()
        };
        let danger = session.obstacles.iter().find(threatened)?;
        Some(match danger.side {
            Side::Left => Direction::Right,
            Side::Right => Direction::Left,
        })
    }
}
