//! Property tests for the race invariants.

use proptest::prelude::*;

use slipstream::core::rng::DeterministicRng;
use slipstream::game::config::{RaceConfig, TrackConfig};
use slipstream::game::input::InputFrame;
use slipstream::game::state::RaceState;
use slipstream::game::tick::tick;
use slipstream::game::track::Track;

fn short_race() -> RaceConfig {
    let mut config = RaceConfig::default();
    config.race_distance = 2000.0;
    config
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn speed_stays_in_bounds(
        seed in any::<u64>(),
        inputs in prop::collection::vec(0u8..0x20, 1..400),
        dt in 0.0f32..0.2,
    ) {
        let config = short_race();
        let mut state = RaceState::new(&config, seed).unwrap();

        for flags in inputs {
            tick(&mut state, InputFrame { flags }, &config, dt);
            for car in state.vehicles() {
                prop_assert!(car.speed >= 0.0);
                prop_assert!(car.speed <= car.max_speed);
                prop_assert!(car.boost.cooldown >= 0.0);
                prop_assert!(car.progress.is_finite());
                prop_assert!(car.lateral_offset.is_finite());
            }
        }
    }

    #[test]
    fn generated_track_is_well_formed(
        seed in any::<u64>(),
        distance in 10.0f32..20_000.0,
        resolution in 1.0f32..25.0,
    ) {
        let params = TrackConfig { sampling_resolution: resolution, ..TrackConfig::default() };
        let mut rng = DeterministicRng::new(seed);
        let track = Track::generate(distance, &params, &mut rng);

        prop_assert_eq!(track.len(), (distance / resolution).ceil() as usize);
        prop_assert_eq!(track.samples()[0].s, 0.0);
        prop_assert!(track.max_arc_length() + resolution >= distance - 1e-2);

        for pair in track.samples().windows(2) {
            prop_assert!(pair[1].s > pair[0].s);
        }
        for sample in track.samples() {
            prop_assert!(sample.curvature.abs() <= params.max_curvature);
        }
    }

    #[test]
    fn sampler_clamps_out_of_range(seed in any::<u64>(), beyond in 0.0f32..1.0e6) {
        let params = TrackConfig::default();
        let mut rng = DeterministicRng::new(seed);
        let track = Track::generate(1000.0, &params, &mut rng);
        let samples = track.samples();

        prop_assert_eq!(track.sample_at(-beyond - 0.001), samples[0]);
        prop_assert_eq!(track.sample_at(track.max_arc_length() + beyond), samples[samples.len() - 1]);
    }

    #[test]
    fn same_seed_same_hash(seed in any::<u64>(), ticks in 1usize..200) {
        let config = short_race();
        let mut a = RaceState::new(&config, seed).unwrap();
        let mut b = RaceState::new(&config, seed).unwrap();
        let gas = InputFrame::new().with(InputFrame::FLAG_ACCELERATE, true);

        for _ in 0..ticks {
            tick(&mut a, gas, &config, 1.0 / 60.0);
            tick(&mut b, gas, &config, 1.0 / 60.0);
        }
        prop_assert_eq!(a.compute_hash(), b.compute_hash());
    }
}
