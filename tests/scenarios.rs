//! End-to-end race scenarios through the public API.

use std::time::Duration;

use slipstream::core::rng::DeterministicRng;
use slipstream::game::clock::FrameClock;
use slipstream::game::config::{RaceConfig, TrackConfig};
use slipstream::game::events::RaceEventData;
use slipstream::game::input::{InputFrame, InputRecording};
use slipstream::game::referee::{check_finish, rank};
use slipstream::game::state::{RacePhase, RaceState};
use slipstream::game::tick::{replay_race, tick};
use slipstream::game::track::Track;
use slipstream::game::vehicle::VehicleId;
use slipstream::game::view::{hud_snapshot, render_frame};

const DT: f32 = 1.0 / 60.0;

fn gas() -> InputFrame {
    InputFrame::new().with(InputFrame::FLAG_ACCELERATE, true)
}

#[test]
fn kilometer_track_has_hundred_samples() {
    let mut rng = DeterministicRng::new(1);
    let track = Track::generate(1000.0, &TrackConfig::default(), &mut rng);

    assert_eq!(track.len(), 100);
    let arc: Vec<f32> = track.samples().iter().map(|s| s.s).collect();
    assert_eq!(arc[0], 0.0);
    assert_eq!(arc[1], 10.0);
    assert_eq!(arc[99], 990.0);
}

#[test]
fn world_position_is_idempotent() {
    let config = RaceConfig::default();
    let state = RaceState::new(&config, 8).unwrap();

    for car in state.vehicles() {
        let a = car.world_pose(&state.track, config.render_scale);
        let b = car.world_pose(&state.track, config.render_scale);
        assert_eq!(a, b);
    }
}

#[test]
fn frame_clock_caps_long_gap() {
    let mut clock = FrameClock::new(RaceConfig::default().max_frame_dt);
    clock.advance(Duration::from_secs(1));
    assert_eq!(clock.advance(Duration::from_secs(3)), 0.05);
}

#[test]
fn leader_at_distance_finishes_first() {
    let mut config = RaceConfig::default();
    config.race_distance = 5000.0;
    let mut state = RaceState::new(&config, 3).unwrap();

    state.vehicles_mut()[2].progress = 5000.0;
    assert!(check_finish(state.vehicles(), config.race_distance));
    assert_eq!(rank(state.vehicles())[0].id, VehicleId(2));

    let result = tick(&mut state, InputFrame::new(), &config, 0.0);
    assert!(result.finished);
    assert_eq!(result.winner, Some(VehicleId(2)));
    assert_eq!(state.phase, RacePhase::Finished);

    let hud = hud_snapshot(&state);
    let results = hud.results.unwrap();
    assert_eq!(results.len(), 6);
    assert_eq!(results[0].vehicle, VehicleId(2));
}

#[test]
fn contacts_never_end_the_race() {
    let mut config = RaceConfig::default();
    config.race_distance = 3000.0;
    let mut state = RaceState::new(&config, 21).unwrap();

    // Drop the player into the middle of the opponent column.
    state.vehicles_mut()[0].progress = state.vehicles()[1].progress;
    state.vehicles_mut()[0].lateral_offset = state.vehicles()[1].lateral_offset;

    let result = tick(&mut state, gas(), &config, DT);

    assert!(result
        .events
        .iter()
        .any(|e| matches!(e.data, RaceEventData::Collision { .. })));
    assert_eq!(state.vehicles().len(), config.field_size());
    assert_eq!(state.phase, RacePhase::Running);

    let player = state.player().world_pose(&state.track, config.render_scale).position;
    let bot = state.vehicles()[1].world_pose(&state.track, config.render_scale).position;
    assert!(player.distance(bot) > 0.0);
}

#[test]
fn opponents_finish_a_short_race() {
    let mut config = RaceConfig::default();
    config.race_distance = 2500.0;
    let mut state = RaceState::new(&config, 1234).unwrap();

    // Player idles; an opponent must win.
    let mut outcome = None;
    for _ in 0..20_000 {
        let result = tick(&mut state, InputFrame::new(), &config, 0.05);
        if result.finished {
            outcome = result.winner;
            break;
        }
    }

    let winner = outcome.expect("race should finish");
    assert_ne!(winner, VehicleId::PLAYER);
    assert_eq!(hud_snapshot(&state).position, 6);
}

#[test]
fn recorded_race_replays_bit_identically() {
    let mut config = RaceConfig::default();
    config.race_distance = 2000.0;
    let seed = 0xC0FFEE;

    let mut live = RaceState::new(&config, seed).unwrap();
    let mut recording = InputRecording::new(seed);

    for frame in 0..900u32 {
        let input = gas()
            .with(InputFrame::FLAG_STEER_RIGHT, frame % 120 < 40)
            .with(InputFrame::FLAG_BOOST, frame % 400 == 10)
            .with(InputFrame::FLAG_PAUSE, frame == 200 || frame == 260);
        recording.record(frame, input);
        if tick(&mut live, input, &config, DT).finished {
            break;
        }
    }

    let (replayed, events) = replay_race(&config, &recording, DT).unwrap();
    assert_eq!(live.compute_hash(), replayed.compute_hash());
    assert!(events
        .iter()
        .any(|e| matches!(e.data, RaceEventData::PhaseChanged { .. })));
}

#[test]
fn render_frame_follows_player() {
    let config = RaceConfig::default();
    let mut state = RaceState::new(&config, 5).unwrap();
    for _ in 0..120 {
        tick(&mut state, gas(), &config, DT);
    }

    let frame = render_frame(&state, &config);
    let player = state.player();
    let expected = state.track.sample_at(player.progress).position * config.render_scale
        + state.track.sample_at(player.progress).perpendicular() * player.lateral_offset;

    assert!((frame.camera - expected).length() < 1e-3);
    assert!(!frame.road.is_empty());
    assert!(frame.road.iter().all(|p| p.position.is_finite()));
}

#[test]
fn config_file_overrides_defaults() {
    let config = RaceConfig::from_json(
        r#"{
            "race_distance": 1200.0,
            "opponents": { "count": 2 },
            "boost": { "cooldown": 3.0 }
        }"#,
    )
    .unwrap();

    let state = RaceState::new(&config, 1).unwrap();
    assert_eq!(state.vehicles().len(), 3);
    assert_eq!(config.boost.cooldown, 3.0);
    assert_eq!(state.track.len(), 120);
}
