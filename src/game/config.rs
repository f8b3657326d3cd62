//! Race Configuration
//!
//! Every tunable constant of the simulation, fixed at race start.
//! Defaults reproduce the classic arcade feel; a JSON file can
//! override any subset of fields.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config text is not valid JSON for [`RaceConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value that must be strictly positive is not.
    #[error("{field} must be positive, got {value}")]
    NotPositive {
        /// Offending field path.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A probability lies outside [0, 1].
    #[error("{field} must be within [0, 1], got {value}")]
    InvalidProbability {
        /// Offending field path.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A `[min, max]` pair is inverted.
    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        /// Offending field path.
        field: &'static str,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// More opponents than vehicle ids.
    #[error("opponents.count must be at most {max}, got {count}")]
    TooManyOpponents {
        /// Requested count.
        count: u32,
        /// Largest supported count.
        max: u32,
    },
}

/// Largest opponent field; vehicle ids are a single byte and 0 is the player.
pub const MAX_OPPONENTS: u32 = u8::MAX as u32;

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { field, value })
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { field, min, max })
    }
}

/// Procedural track parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Distance between centerline samples (meters)
    pub sampling_resolution: f32,
    /// Chance that a sample draws from the sharp-turn range
    pub sharp_turn_probability: f32,
    /// Half-width of the sharp-turn curvature range (rad/m)
    pub sharp_turn_curvature: f32,
    /// Half-width of the gentle curvature range (rad/m)
    pub gentle_curvature: f32,
    /// Number of 3-point moving-average passes
    pub smoothing_passes: u32,
    /// Symmetric clamp applied after smoothing (rad/m)
    pub max_curvature: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            sampling_resolution: 10.0,
            sharp_turn_probability: 0.03,
            sharp_turn_curvature: 0.01,
            gentle_curvature: 0.0035,
            smoothing_passes: 6,
            max_curvature: 0.025,
        }
    }
}

/// Physical constants shared by every car body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Body width (render units)
    pub width: f32,
    /// Body length (render units)
    pub length: f32,
    /// Acceleration (km/h per second)
    pub acceleration: f32,
    /// Braking deceleration (km/h per second)
    pub brake_deceleration: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            width: 18.0,
            length: 34.0,
            acceleration: 220.0,
            brake_deceleration: 600.0,
        }
    }
}

/// Player car and handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Display name
    pub name: String,
    /// Display color (CSS hex)
    pub color: String,
    /// Top speed (km/h)
    pub max_speed: f32,
    /// Maximum grid slot distance behind the line (meters)
    pub start_spread: f32,
    /// Friction deceleration with no throttle input (km/h per second)
    pub coast_deceleration: f32,
    /// Lateral steering rate at standstill (render units per second)
    pub steer_rate: f32,
    /// Steering authority never drops below this fraction
    pub min_stability: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: "YOU".to_string(),
            color: "#ffdd57".to_string(),
            max_speed: 350.0,
            start_spread: 30.0,
            coast_deceleration: 40.0,
            steer_rate: 220.0,
            min_stability: 0.12,
        }
    }
}

/// Opponent field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    /// Number of autonomous opponents
    pub count: u32,
    /// Palette cycled over opponents
    pub colors: Vec<String>,
    /// Top speed range (km/h)
    pub max_speed_min: f32,
    /// Top speed range (km/h)
    pub max_speed_max: f32,
    /// Starting speed range (km/h)
    pub start_speed_min: f32,
    /// Starting speed range (km/h)
    pub start_speed_max: f32,
    /// Progress of the first opponent's grid slot (meters)
    pub grid_start: f32,
    /// Gap between consecutive opponent grid slots (meters)
    pub grid_gap: f32,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            count: 5,
            colors: ["#ff5c8a", "#6fffb0", "#b692ff", "#4cc6ff", "#ffd36f"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            max_speed_min: 330.0,
            max_speed_max: 370.0,
            start_speed_min: 160.0,
            start_speed_max: 260.0,
            grid_start: 30.0,
            grid_gap: 8.0,
        }
    }
}

/// Opponent driving heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// How far ahead the speed planner reads curvature (meters)
    pub speed_lookahead: f32,
    /// How far ahead the line planner reads curvature (meters)
    pub line_lookahead: f32,
    /// km/h shed per rad/m of upcoming curvature
    pub curvature_speed_penalty: f32,
    /// Lowest target speed the planner will choose (km/h)
    pub min_target_speed: f32,
    /// Acceleration jitter range, as a multiple of `acceleration`
    pub accel_jitter_min: f32,
    /// Acceleration jitter range, as a multiple of `acceleration`
    pub accel_jitter_max: f32,
    /// Fraction of `brake_deceleration` used when over target
    pub brake_factor: f32,
    /// Amplitude of the weaving racing line (render units)
    pub line_amplitude: f32,
    /// Spatial frequency of the weaving line (rad per meter of progress)
    pub line_frequency: f32,
    /// Phase offset between opponents (meters per grid index)
    pub line_phase_step: f32,
    /// Full width of the random line jitter (render units)
    pub line_jitter: f32,
    /// Lateral easing rate (per second)
    pub line_easing: f32,
    /// Easing reduction per rad/m of curvature
    pub curvature_easing_penalty: f32,
    /// Per-tick chance of a speed surge while under target
    pub surge_probability: f32,
    /// Surge size (km/h), never past the target speed
    pub surge_amount: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            speed_lookahead: 40.0,
            line_lookahead: 6.0,
            curvature_speed_penalty: 6000.0,
            min_target_speed: 80.0,
            accel_jitter_min: 0.6,
            accel_jitter_max: 1.2,
            brake_factor: 0.6,
            line_amplitude: 20.0,
            line_frequency: 0.004,
            line_phase_step: 10.0,
            line_jitter: 6.0,
            line_easing: 0.8,
            curvature_easing_penalty: 5.0,
            surge_probability: 0.001,
            surge_amount: 30.0,
        }
    }
}

/// Player boost.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    /// Instant speed gain (km/h)
    pub impulse: f32,
    /// Boost never lifts speed past `max_speed * cap_multiplier`
    pub cap_multiplier: f32,
    /// Seconds before boost is available again
    pub cooldown: f32,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            impulse: 80.0,
            cap_multiplier: 1.12,
            cooldown: 6.0,
        }
    }
}

/// Contact detection and response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Minimum separation as a fraction of the combined widths
    pub separation_factor: f32,
    /// Distances at or below this are treated as coincident
    pub epsilon: f32,
    /// Damping on the lateral push
    pub lateral_push: f32,
    /// Damping on the along-track progress nudge
    pub progress_push: f32,
    /// Random speed penalty range (km/h)
    pub speed_penalty_min: f32,
    /// Random speed penalty range (km/h)
    pub speed_penalty_max: f32,
    /// Collisions never slow a car below this (km/h)
    pub min_speed: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            separation_factor: 0.55,
            epsilon: 0.001,
            lateral_push: 0.6,
            progress_push: 0.4,
            speed_penalty_min: 8.0,
            speed_penalty_max: 20.0,
            min_speed: 10.0,
        }
    }
}

/// Renderer window around the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Road drawn behind the player (meters)
    pub look_back: f32,
    /// Road drawn ahead of the player (meters)
    pub look_ahead: f32,
    /// Nominal road width (render units)
    pub road_width: f32,
    /// Extra drawn width per unit of |curvature| (render units per rad/m)
    pub curve_widening: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            look_back: 500.0,
            look_ahead: 1200.0,
            road_width: 240.0,
            curve_widening: 800.0,
        }
    }
}

/// Complete race configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Finish distance (meters)
    pub race_distance: f32,
    /// Render units per meter
    pub render_scale: f32,
    /// Longest simulated step (seconds)
    pub max_frame_dt: f32,
    /// Per-tick multiplicative lateral damping, shared by every car
    pub lateral_damping: f32,
    /// Track generation
    pub track: TrackConfig,
    /// Shared body constants
    pub body: BodyConfig,
    /// Player car
    pub player: PlayerConfig,
    /// Opponent field
    pub opponents: OpponentConfig,
    /// Opponent heuristic
    pub ai: AiConfig,
    /// Player boost
    pub boost: BoostConfig,
    /// Contact handling
    pub collision: CollisionConfig,
    /// Renderer window
    pub view: ViewConfig,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            race_distance: 100_000.0,
            render_scale: 0.06,
            max_frame_dt: 0.05,
            lateral_damping: 0.995,
            track: TrackConfig::default(),
            body: BodyConfig::default(),
            player: PlayerConfig::default(),
            opponents: OpponentConfig::default(),
            ai: AiConfig::default(),
            boost: BoostConfig::default(),
            collision: CollisionConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

impl RaceConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every constraint the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("race_distance", self.race_distance)?;
        positive("render_scale", self.render_scale)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        probability("lateral_damping", self.lateral_damping)?;

        positive("track.sampling_resolution", self.track.sampling_resolution)?;
        probability("track.sharp_turn_probability", self.track.sharp_turn_probability)?;
        positive("track.max_curvature", self.track.max_curvature)?;

        positive("body.width", self.body.width)?;
        positive("body.acceleration", self.body.acceleration)?;
        positive("body.brake_deceleration", self.body.brake_deceleration)?;

        positive("player.max_speed", self.player.max_speed)?;
        probability("player.min_stability", self.player.min_stability)?;

        if self.opponents.count > MAX_OPPONENTS {
            return Err(ConfigError::TooManyOpponents {
                count: self.opponents.count,
                max: MAX_OPPONENTS,
            });
        }
        ordered(
            "opponents.max_speed",
            self.opponents.max_speed_min,
            self.opponents.max_speed_max,
        )?;
        positive("opponents.max_speed_min", self.opponents.max_speed_min)?;
        ordered(
            "opponents.start_speed",
            self.opponents.start_speed_min,
            self.opponents.start_speed_max,
        )?;

        ordered("ai.accel_jitter", self.ai.accel_jitter_min, self.ai.accel_jitter_max)?;
        probability("ai.surge_probability", self.ai.surge_probability)?;

        positive("boost.cap_multiplier", self.boost.cap_multiplier)?;

        positive("collision.separation_factor", self.collision.separation_factor)?;
        ordered(
            "collision.speed_penalty",
            self.collision.speed_penalty_min,
            self.collision.speed_penalty_max,
        )?;

        Ok(())
    }

    /// Number of cars on the grid, player included.
    pub fn field_size(&self) -> usize {
        1 + self.opponents.count as usize
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        RaceConfig::default().validate().unwrap();
        assert_eq!(RaceConfig::default().field_size(), 6);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = RaceConfig::from_json(
            r#"{ "race_distance": 2500.0, "opponents": { "count": 3 } }"#,
        )
        .unwrap();

        assert_eq!(config.race_distance, 2500.0);
        assert_eq!(config.opponents.count, 3);
        assert_eq!(config.opponents.grid_gap, 8.0);
        assert_eq!(config.track.sampling_resolution, 10.0);
    }

    #[test]
    fn test_rejects_non_positive_resolution() {
        let err = RaceConfig::from_json(r#"{ "track": { "sampling_resolution": 0.0 } }"#)
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::NotPositive { field: "track.sampling_resolution", .. }
        ));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut config = RaceConfig::default();
        config.ai.surge_probability = 1.5;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability { field: "ai.surge_probability", .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let mut config = RaceConfig::default();
        config.collision.speed_penalty_min = 30.0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { field: "collision.speed_penalty", .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_field() {
        let mut config = RaceConfig::default();
        config.opponents.count = 300;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooManyOpponents { count: 300, .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            RaceConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
