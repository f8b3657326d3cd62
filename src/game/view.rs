//! View Snapshots
//!
//! Read-only projections of a [`RaceState`] for a renderer and a HUD.
//! Nothing here mutates the race; everything is already in render units.

use glam::Vec2;
use serde::{Serialize, Deserialize};

use crate::game::config::RaceConfig;
use crate::game::referee::Standing;
use crate::game::state::{RacePhase, RaceState};
use crate::game::vehicle::VehicleId;

/// One car as the renderer needs it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleView {
    /// Car
    pub id: VehicleId,
    /// Display name
    pub name: String,
    /// Display color
    pub color: String,
    /// Input-driven car (highlighted)
    pub is_player: bool,
    /// World position (render units)
    pub position: Vec2,
    /// Heading (radians)
    pub heading: f32,
    /// Body width (render units)
    pub width: f32,
    /// Body length (render units)
    pub length: f32,
}

/// A centerline point of the visible road.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadPoint {
    /// Centerline position (render units)
    pub position: Vec2,
    /// Heading (radians)
    pub heading: f32,
    /// Drawn width, wider in bends (render units)
    pub width: f32,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Camera target: the player's world position
    pub camera: Vec2,
    /// Visible centerline around the player
    pub road: Vec<RoadPoint>,
    /// Every car in grid order
    pub vehicles: Vec<VehicleView>,
}

/// Build the render frame.
pub fn render_frame(state: &RaceState, config: &RaceConfig) -> RenderFrame {
    let scale = config.render_scale;
    let player = state.player();

    let road = state
        .track
        .window(
            player.progress - config.view.look_back,
            player.progress + config.view.look_ahead,
        )
        .into_iter()
        .map(|sample| RoadPoint {
            position: sample.position * scale,
            heading: sample.angle,
            width: config.view.road_width + sample.curvature.abs() * config.view.curve_widening,
        })
        .collect();

    let vehicles = state
        .vehicles()
        .iter()
        .map(|v| {
            let pose = v.world_pose(&state.track, scale);
            VehicleView {
                id: v.id,
                name: v.name.clone(),
                color: v.color.clone(),
                is_player: v.is_player(),
                position: pose.position,
                heading: pose.heading,
                width: v.width,
                length: v.length,
            }
        })
        .collect();

    RenderFrame {
        camera: player.world_pose(&state.track, scale).position,
        road,
        vehicles,
    }
}

/// HUD and results panel contents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Player speed (km/h)
    pub speed: f32,
    /// Player progress (meters)
    pub progress: f32,
    /// Finish distance (meters)
    pub race_distance: f32,
    /// Player's 1-based position
    pub position: u32,
    /// Cars on the grid
    pub field_size: u32,
    /// Boost can fire
    pub boost_ready: bool,
    /// Seconds until boost is back
    pub boost_cooldown: f32,
    /// Race phase
    pub phase: RacePhase,
    /// Final standings, once finished
    pub results: Option<Vec<Standing>>,
}

/// Build the HUD snapshot.
pub fn hud_snapshot(state: &RaceState) -> HudSnapshot {
    let player = state.player();
    HudSnapshot {
        speed: player.speed,
        progress: player.progress,
        race_distance: state.race_distance,
        position: state.player_position(),
        field_size: state.vehicles().len() as u32,
        boost_ready: player.boost.available,
        boost_cooldown: player.boost.cooldown,
        phase: state.phase,
        results: state.final_standings.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::input::InputFrame;
    use crate::game::tick::tick;

    fn config() -> RaceConfig {
        let mut config = RaceConfig::default();
        config.race_distance = 4000.0;
        config
    }

    #[test]
    fn test_render_frame_covers_field() {
        let config = config();
        let state = RaceState::new(&config, 5).unwrap();
        let frame = render_frame(&state, &config);

        assert_eq!(frame.vehicles.len(), config.field_size());
        assert!(frame.vehicles[0].is_player);
        assert_eq!(frame.camera, frame.vehicles[0].position);
        assert!(frame.road.iter().all(|p| p.width >= 240.0));
        assert!(frame.road.iter().all(|p| p.width <= 240.0 + 0.025 * 800.0 + 1e-3));
    }

    #[test]
    fn test_road_window_around_player() {
        let config = config();
        let mut state = RaceState::new(&config, 5).unwrap();
        state.vehicles_mut()[0].progress = 2000.0;

        let frame = render_frame(&state, &config);

        // 1500..=3200 m at 10 m steps.
        assert_eq!(frame.road.len(), 171);
        let first = state.track.sample_at(1500.0);
        assert!((frame.road[0].position - first.position * config.render_scale).length() < 1e-3);
    }

    #[test]
    fn test_hud_at_start() {
        let config = config();
        let state = RaceState::new(&config, 5).unwrap();
        let hud = hud_snapshot(&state);

        assert_eq!(hud.speed, 0.0);
        assert_eq!(hud.race_distance, 4000.0);
        assert_eq!(hud.field_size, 6);
        assert_eq!(hud.position, 6);
        assert!(hud.boost_ready);
        assert_eq!(hud.phase, RacePhase::Running);
        assert!(hud.results.is_none());
    }

    #[test]
    fn test_hud_after_boost() {
        let config = config();
        let mut state = RaceState::new(&config, 5).unwrap();
        let boost = InputFrame::new()
            .with(InputFrame::FLAG_ACCELERATE, true)
            .with(InputFrame::FLAG_BOOST, true);

        tick(&mut state, boost, &config, 0.05);
        let hud = hud_snapshot(&state);

        assert!(!hud.boost_ready);
        assert!(hud.boost_cooldown > 5.9);
        assert!(hud.speed > 80.0);
    }

    #[test]
    fn test_snapshots_serialize() {
        let config = config();
        let state = RaceState::new(&config, 5).unwrap();

        let json = serde_json::to_string(&hud_snapshot(&state)).unwrap();
        assert!(json.contains("\"phase\":\"Running\""));
        assert!(serde_json::to_string(&render_frame(&state, &config)).is_ok());
    }
}
