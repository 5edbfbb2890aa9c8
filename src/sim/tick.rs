//! Per-frame simulation tick
//!
//! Advances one session by a (capped) delta time. Ordering inside a tick is
//! fixed: lane input, speed/distance, obstacles (move + hit test), collectibles
//! (move), spawning, collectible pickup, then the environment cycle.

use serde::{Deserialize, Serialize};

use super::collision::{find_collected, obstacle_hits_player};
use super::cycle::{Flare, crossed_flare_boundary, cycle_progress};
use super::lane::LaneInput;
use super::layout::Layout;
use super::rng::RandomSource;
use super::spawner::{spawn_collectible, spawn_obstacle};
use super::state::SessionState;
use crate::audio::SoundCue;
use crate::tuning::Tuning;

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/key events in arrival order
    pub lane: Vec<LaneInput>,
}

/// Something the host application should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum TickEvent {
    /// The session ended; carries the frozen collectible count
    GameOver { score: u32, distance: f32 },
    /// Vibrate the device
    HapticPulse,
    /// Play a sound
    Sound(SoundCue),
    /// Short on-screen notification
    Toast(String),
}

/// Read-only context a tick needs
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub layout: &'a Layout,
    pub tuning: &'a Tuning,
}

/// Advance the session by `dt` seconds, appending output events
pub fn tick(
    state: &mut SessionState,
    input: &TickInput,
    ctx: TickContext<'_>,
    rng: &mut dyn RandomSource,
    dt: f32,
    events: &mut Vec<TickEvent>,
) {
    // Frozen sessions ignore everything, input included
    if !state.is_live() {
        return;
    }
    let TickContext { layout, tuning } = ctx;
    let dt = dt.max(0.0).min(tuning.max_frame_dt);

    apply_lane_input(state, input, tuning, events);

    // Speed, score and scroll
    state.scroll_speed = (state.scroll_speed + tuning.speed_increase * dt)
        .min(tuning.max_speed)
        .max(tuning.initial_speed);
    state.distance += tuning.score_rate * dt;
    state.scroll_distance += state.scroll_speed * dt;
    state.time += dt;

    state.player.advance_transition(dt, layout, tuning);
    state.player.sprite.advance(dt, tuning.sprite_frame_ticks);

    // Obstacles: move, test, cull
    let player_rect = state.player.rect(layout);
    let lane = state.player.lane;
    let fall = state.scroll_speed * dt;
    let mut hit = None;
    for obstacle in state.obstacles.iter_mut() {
        obstacle.pos.y += fall;
        if obstacle_hits_player(&player_rect, lane, obstacle) {
            hit = Some(obstacle.id);
            break;
        }
    }
    if let Some(id) = hit {
        state.end();
        log::info!(
            "Obstacle {} hit the player in {:?} lane: score {}, distance {:.1}",
            id,
            lane,
            state.collected,
            state.distance
        );
        events.push(TickEvent::GameOver {
            score: state.collected,
            distance: state.distance,
        });
        events.push(TickEvent::HapticPulse);
        return;
    }
    state.obstacles.retain(|o| o.pos.y <= layout.height);

    // Collectibles fall faster than the scroll
    let fall = (tuning.collectible_base_speed + state.scroll_speed) * dt;
    for collectible in state.collectibles.iter_mut() {
        collectible.pos.y += fall;
    }
    state.collectibles.retain(|c| c.pos.y <= layout.height);

    spawn_obstacle(state, layout, tuning, rng);
    spawn_collectible(state, layout, tuning, rng, dt);

    // Pickup: at most one per tick, newest first
    if let Some(index) = find_collected(&state.player.rect(layout), &state.collectibles) {
        state.collectibles.remove(index);
        state.collected += 1;
        events.push(TickEvent::HapticPulse);
        events.push(TickEvent::Sound(SoundCue::Collect));
        events.push(TickEvent::Toast(tuning.collect_toast.clone()));
    }

    // Environment cycle
    let prev = state.cycle_progress;
    state.cycle_progress = cycle_progress(state.distance, tuning.cycle_duration);
    if state.flare.is_none() && crossed_flare_boundary(prev, state.cycle_progress) {
        log::debug!("Flare at cycle progress {:.3}", state.cycle_progress);
        state.flare = Some(Flare::new(tuning.flare_duration));
    }
}

/// Run queued pointer/key events through the lane machine
fn apply_lane_input(
    state: &mut SessionState,
    input: &TickInput,
    tuning: &Tuning,
    events: &mut Vec<TickEvent>,
) {
    for &event in &input.lane {
        let Some(change) =
            state
                .lane_input
                .handle(event, &mut state.player, tuning.lane_swipe_threshold)
        else {
            continue;
        };
        log::debug!("Lane {:?} -> {:?}", change.from, change.to);
        if change.first_move {
            events.push(TickEvent::HapticPulse);
        }
        events.push(TickEvent::Sound(SoundCue::Swipe));
    }
}

/// Fade the active flare; runs every frame, even between sessions
pub fn advance_flare(state: &mut SessionState, dt: f32) {
    if let Some(flare) = state.flare.as_mut() {
        if !flare.advance(dt) {
            state.flare = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lane::Direction;
    use crate::sim::rng::{ScriptedRng, seeded};
    use crate::sim::state::{Collectible, DepthLayer, Lane, Obstacle, Side};
    use glam::Vec2;
    use proptest::prelude::*;

    fn setup() -> (Layout, Tuning) {
        let tuning = Tuning::default();
        (Layout::new(400.0, 800.0, &tuning), tuning)
    }

    fn running(layout: &Layout, tuning: &Tuning, rng: &mut dyn RandomSource) -> SessionState {
        let mut state = SessionState::new(layout, tuning, rng);
        state.begin();
        state
    }

    fn obstacle_over_player(
        state: &mut SessionState,
        side: Side,
        layout: &Layout,
        tuning: &Tuning,
    ) {
        let id = state.next_entity_id();
        let player = state.player.rect(layout);
        // Band centred on the player's vertical middle
        let y = player.y + player.h / 2.0 - tuning.obstacle_height / 2.0;
        state.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(layout.obstacle_x(side, tuning), y),
            width: tuning.obstacle_width,
            height: tuning.obstacle_height,
            band_height: tuning.obstacle_band_height,
            side,
            depth: DepthLayer::Behind,
        });
    }

    #[test]
    fn test_idle_start_is_safe() {
        let (layout, tuning) = setup();
        let mut rng = seeded(1);
        let mut state = running(&layout, &tuning, &mut rng);
        let mut events = Vec::new();
        let ctx = TickContext { layout: &layout, tuning: &tuning };

        tick(&mut state, &TickInput::default(), ctx, &mut rng, 1.0 / 60.0, &mut events);
        assert!(state.obstacles.is_empty());
        assert!(!state.over);
        assert!(events.is_empty());
        assert!(state.distance > 0.0);
    }

    #[test]
    fn test_not_running_is_frozen() {
        let (layout, tuning) = setup();
        let mut rng = seeded(1);
        let mut state = SessionState::new(&layout, &tuning, &mut rng);
        let mut events = Vec::new();
        let ctx = TickContext { layout: &layout, tuning: &tuning };
        tick(&mut state, &TickInput::default(), ctx, &mut rng, 0.05, &mut events);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.scroll_distance, 0.0);
    }

    #[test]
    fn test_middle_lane_hit_by_left_obstacle() {
        let (layout, tuning) = setup();
        let mut rng = seeded(2);
        let mut state = running(&layout, &tuning, &mut rng);
        state.collected = 4;
        obstacle_over_player(&mut state, Side::Left, &layout, &tuning);

        let mut events = Vec::new();
        let ctx = TickContext { layout: &layout, tuning: &tuning };
        tick(&mut state, &TickInput::default(), ctx, &mut rng, 0.001, &mut events);

        assert!(state.over);
        assert!(!state.running);
        assert_eq!(
            events[0],
            TickEvent::GameOver {
                score: 4,
                distance: state.distance
            }
        );
        assert_eq!(events[1], TickEvent::HapticPulse);
    }

    #[test]
    fn test_game_over_fires_once_for_stacked_hits() {
        let (layout, tuning) = setup();
        let mut rng = seeded(3);
        let mut state = running(&layout, &tuning, &mut rng);
        obstacle_over_player(&mut state, Side::Left, &layout, &tuning);
        obstacle_over_player(&mut state, Side::Right, &layout, &tuning);
        obstacle_over_player(&mut state, Side::Left, &layout, &tuning);

        let mut events = Vec::new();
        let ctx = TickContext { layout: &layout, tuning: &tuning };
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), ctx, &mut rng, 0.001, &mut events);
        }
        let overs = events
            .iter()
            .filter(|e| matches!(e, TickEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_side_lane_dodges_other_side() {
        let (layout, tuning) = setup();
        let mut rng = seeded(4);
        let mut state = running(&layout, &tuning, &mut rng);
        state.player.lane = Lane::Left;
        state.player.first_move_done = true;
        obstacle_over_player(&mut state, Side::Right, &layout, &tuning);

        let mut events = Vec::new();
        let ctx = TickContext { layout: &layout, tuning: &tuning };
        tick(&mut state, &TickInput::default(), ctx, &mut rng, 0.001, &mut events);
        assert!(!state.over);
    }

    #[test]
    fn test_collectible_pickup() {
        let (layout, tuning) = setup();
        let mut rng = seeded(5);
        let mut state = running(&layout, &tuning, &mut rng);
        state.player.lane = Lane::Left;
        let player = state.player.rect(&layout);
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            pos: Vec2::new(player.x + 10.0, player.y + 40.0),
            width: 40.0,
            height: 40.0,
        });

        let mut events = Vec::new();
        let ctx = TickContext { layout: &layout, tuning: &tuning };
        tick(&mut state, &TickInput::default(), ctx, &mut rng, 0.001, &mut events);

        assert_eq!(state.collected, 1);
        assert!(state.collectibles.iter().all(|c| c.id != id));
        assert!(events.contains(&TickEvent::HapticPulse));
        assert!(events.contains(&TickEvent::Sound(SoundCue::Collect)));
        assert!(events.contains(&TickEvent::Toast(tuning.collect_toast.clone())));
    }

    #[test]
    fn test_first_key_move_starts_transition() {
        let (layout, tuning) = setup();
        let mut rng = seeded(6);
        let mut state = running(&layout, &tuning, &mut rng);
        let input = TickInput {
            lane: vec![LaneInput::Key(Direction::Right)],
        };
        let mut events = Vec::new();
        let ctx = TickContext { layout: &layout, tuning: &tuning };
        tick(&mut state, &input, ctx, &mut rng, 0.1, &mut events);

        assert_eq!(state.player.lane, Lane::Right);
        assert!(state.player.first_move_done);
        // Transition already advanced by this tick's dt
        assert!((state.player.y - 560.0).abs() < 1e-3);
        assert_eq!(
            events[..2],
            [TickEvent::HapticPulse, TickEvent::Sound(SoundCue::Swipe)]
        );
    }

    #[test]
    fn test_obstacles_culled_below_screen() {
        let (layout, tuning) = setup();
        let mut rng = seeded(7);
        let mut state = running(&layout, &tuning, &mut rng);
        state.player.lane = Lane::Right;
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(12.0, layout.height - 1.0),
            width: 183.0,
            height: 61.0,
            band_height: 20.0,
            side: Side::Left,
            depth: DepthLayer::InFront,
        });
        let mut events = Vec::new();
        let ctx = TickContext { layout: &layout, tuning: &tuning };
        tick(&mut state, &TickInput::default(), ctx, &mut rng, 0.05, &mut events);
        assert!(state.obstacles.iter().all(|o| o.id != id));
    }

    #[test]
    fn test_flare_on_dusk_boundary() {
        let (layout, tuning) = setup();
        let mut rng = ScriptedRng::new(vec![0.99]);
        let mut state = running(&layout, &tuning, &mut rng);
        state.distance = 399.9;
        state.cycle_progress = 0.3999;
        let mut events = Vec::new();
        let ctx = TickContext { layout: &layout, tuning: &tuning };
        tick(&mut state, &TickInput::default(), ctx, &mut rng, 0.05, &mut events);
        assert!(state.flare.is_some());

        advance_flare(&mut state, 2.0);
        assert!(state.flare.is_none());
    }

    #[test]
    fn test_speed_never_drops_below_initial() {
        let (layout, _) = setup();
        // Unvalidated tuning with a braking acceleration
        let tuning = Tuning {
            speed_increase: -500.0,
            ..Tuning::default()
        };
        let mut rng = seeded(3);
        let mut state = running(&layout, &tuning, &mut rng);
        state.player.lane = Lane::Left;
        let ctx = TickContext { layout: &layout, tuning: &tuning };
        let mut events = Vec::new();

        let mut scrolled = state.scroll_distance;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), ctx, &mut rng, 0.1, &mut events);
            assert!(state.scroll_speed >= tuning.initial_speed);
            assert!(state.scroll_distance >= scrolled);
            scrolled = state.scroll_distance;
        }
        assert_eq!(state.scroll_speed, tuning.initial_speed);
    }

    proptest! {
        #[test]
        fn prop_speed_and_distance_monotonic(
            seed in any::<u64>(),
            dts in proptest::collection::vec(0.0f32..0.5, 1..200),
        ) {
            let (layout, tuning) = setup();
            let mut rng = seeded(seed);
            let mut state = running(&layout, &tuning, &mut rng);
            // Park the player out of harm's way in the left lane
            state.player.lane = Lane::Left;
            let ctx = TickContext { layout: &layout, tuning: &tuning };
            let mut events = Vec::new();

            for dt in dts {
                let (speed, distance, collected) =
                    (state.scroll_speed, state.distance, state.collected);
                let live = state.is_live();
                tick(&mut state, &TickInput::default(), ctx, &mut rng, dt, &mut events);

                prop_assert!(state.scroll_speed <= tuning.max_speed);
                prop_assert!(state.scroll_speed >= speed);
                prop_assert!(state.distance >= distance);
                prop_assert!(state.collected >= collected);
                if !live {
                    prop_assert_eq!(state.distance, distance);
                }
            }
        }
    }
}
