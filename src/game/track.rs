//! Procedural Track
//!
//! The centerline is produced by integrating a smoothed random
//! curvature field, then queried by arc-length. A [`Track`] never
//! changes after generation.

use glam::Vec2;
use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::game::config::TrackConfig;

/// One centerline point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    /// Arc-length from the start (meters)
    pub s: f32,
    /// Planar position (meters)
    pub position: Vec2,
    /// Accumulated heading (radians)
    pub angle: f32,
    /// Signed heading change per meter (rad/m)
    pub curvature: f32,
}

impl TrackSample {
    /// Unit vector along the direction of travel.
    #[inline]
    pub fn forward(&self) -> Vec2 {
        let (sin, cos) = self.angle.sin_cos();
        Vec2::new(sin, cos)
    }

    /// Unit vector perpendicular to the direction of travel.
    ///
    /// Positive lateral offsets point this way.
    #[inline]
    pub fn perpendicular(&self) -> Vec2 {
        let (sin, cos) = self.angle.sin_cos();
        Vec2::new(cos, -sin)
    }

    fn lerp(&self, other: &Self, s: f32, t: f32) -> Self {
        Self {
            s,
            position: self.position + (other.position - self.position) * t,
            angle: self.angle + (other.angle - self.angle) * t,
            curvature: self.curvature + (other.curvature - self.curvature) * t,
        }
    }
}

/// Immutable sampled centerline.
///
/// Deserialization goes through [`Track::from_samples`], so a loaded
/// track is never empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "TrackData")]
pub struct Track {
    samples: Vec<TrackSample>,
    resolution: f32,
}

/// Unchecked wire form of a [`Track`].
#[derive(Deserialize)]
struct TrackData {
    samples: Vec<TrackSample>,
    resolution: f32,
}

impl TryFrom<TrackData> for Track {
    type Error = &'static str;

    fn try_from(data: TrackData) -> Result<Self, Self::Error> {
        Track::from_samples(data.samples, data.resolution)
            .ok_or("track needs at least one sample and a positive resolution")
    }
}

impl Track {
    /// Build a track from pre-computed samples.
    ///
    /// Samples must be spaced `resolution` meters apart starting at 0.
    /// Returns `None` for an empty sample list or a non-positive resolution.
    pub fn from_samples(samples: Vec<TrackSample>, resolution: f32) -> Option<Self> {
        if samples.is_empty() || !resolution.is_finite() || resolution <= 0.0 {
            return None;
        }
        Some(Self { samples, resolution })
    }

    /// Generate a winding track covering `total_distance` meters.
    ///
    /// Yields `ceil(total_distance / resolution)` samples (at least one)
    /// with arc-lengths `0, resolution, 2 * resolution, ...`.
    pub fn generate(
        total_distance: f32,
        params: &TrackConfig,
        rng: &mut DeterministicRng,
    ) -> Self {
        let ds = params.sampling_resolution;
        let steps = ((total_distance / ds).ceil() as usize).max(1);

        let mut curvatures: Vec<f32> = (0..steps)
            .map(|_| {
                if rng.chance(params.sharp_turn_probability) {
                    rng.next_symmetric(params.sharp_turn_curvature)
                } else {
                    rng.next_symmetric(params.gentle_curvature)
                }
            })
            .collect();

        smooth(&mut curvatures, params.smoothing_passes);

        let bound = params.max_curvature;
        for k in &mut curvatures {
            *k = k.clamp(-bound, bound);
        }

        let mut angle = 0.0f32;
        let mut position = Vec2::ZERO;
        let samples = curvatures
            .iter()
            .enumerate()
            .map(|(i, &curvature)| {
                angle += curvature * ds;
                let (sin, cos) = angle.sin_cos();
                position += Vec2::new(sin, cos) * ds;
                TrackSample {
                    s: i as f32 * ds,
                    position,
                    angle,
                    curvature,
                }
            })
            .collect();

        Self {
            samples,
            resolution: ds,
        }
    }

    /// Interpolated centerline at arc-length `s`.
    ///
    /// Queries outside `[0, max_arc_length]` return the boundary sample.
    pub fn sample_at(&self, s: f32) -> TrackSample {
        let first = &self.samples[0];
        let last = &self.samples[self.samples.len() - 1];

        if s.is_nan() || s <= first.s {
            return *first;
        }
        if s >= last.s {
            return *last;
        }

        let mut idx = ((s / self.resolution).floor() as usize).min(self.samples.len() - 1);
        // Division can land one knot low when s sits exactly on a knot.
        if idx + 1 < self.samples.len() && self.samples[idx + 1].s <= s {
            idx += 1;
        }

        let a = &self.samples[idx];
        let b = &self.samples[(idx + 1).min(self.samples.len() - 1)];
        let t = (s - a.s) / self.resolution;
        a.lerp(b, s, t)
    }

    /// Samples every `resolution` meters over `[start, end]`, clipped to the track.
    pub fn window(&self, start: f32, end: f32) -> Vec<TrackSample> {
        let start = start.max(0.0);
        let end = end.min(self.max_arc_length());
        if end < start {
            return Vec::new();
        }

        let count = ((end - start) / self.resolution).floor() as usize + 1;
        (0..count)
            .map(|i| self.sample_at(start + i as f32 * self.resolution))
            .collect()
    }

    /// Arc-length of the last sample.
    pub fn max_arc_length(&self) -> f32 {
        self.samples[self.samples.len() - 1].s
    }

    /// Spacing between samples (meters).
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Raw samples in arc-length order.
    pub fn samples(&self) -> &[TrackSample] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; a track holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// In-place 3-point moving average, endpoints untouched.
fn smooth(values: &mut [f32], passes: u32) {
    if values.len() < 3 {
        return;
    }
    for _ in 0..passes {
        for i in 1..values.len() - 1 {
            values[i] = (values[i - 1] + values[i] + values[i + 1]) / 3.0;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(len: usize, resolution: f32) -> Track {
        let samples = (0..len)
            .map(|i| TrackSample {
                s: i as f32 * resolution,
                position: Vec2::new(0.0, (i + 1) as f32 * resolution),
                angle: 0.0,
                curvature: 0.0,
            })
            .collect();
        Track::from_samples(samples, resolution).unwrap()
    }

    #[test]
    fn test_deserialize_rejects_empty_track() {
        let empty = r#"{"samples":[],"resolution":10.0}"#;
        assert!(serde_json::from_str::<Track>(empty).is_err());

        let flat = r#"{"samples":[{"s":0.0,"position":[0.0,0.0],"angle":0.0,"curvature":0.0}],"resolution":0.0}"#;
        assert!(serde_json::from_str::<Track>(flat).is_err());

        let json = serde_json::to_string(&straight(3, 10.0)).unwrap();
        let loaded: Track = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.sample_at(15.0).s, 15.0);
    }

    #[test]
    fn test_generate_sample_count_and_spacing() {
        let mut rng = DeterministicRng::new(1);
        let track = Track::generate(1000.0, &TrackConfig::default(), &mut rng);

        assert_eq!(track.len(), 100);
        for (i, sample) in track.samples().iter().enumerate() {
            assert_eq!(sample.s, i as f32 * 10.0);
        }
        assert_eq!(track.max_arc_length(), 990.0);
    }

    #[test]
    fn test_generate_rounds_partial_step_up() {
        let mut rng = DeterministicRng::new(1);
        let track = Track::generate(1005.0, &TrackConfig::default(), &mut rng);
        assert_eq!(track.len(), 101);

        let tiny = Track::generate(3.0, &TrackConfig::default(), &mut rng);
        assert_eq!(tiny.len(), 1);
    }

    #[test]
    fn test_curvature_clamped() {
        let params = TrackConfig {
            sharp_turn_probability: 1.0,
            sharp_turn_curvature: 1.0,
            smoothing_passes: 0,
            ..TrackConfig::default()
        };
        let mut rng = DeterministicRng::new(99);
        let track = Track::generate(5000.0, &params, &mut rng);

        assert!(track
            .samples()
            .iter()
            .all(|s| s.curvature.abs() <= params.max_curvature));
        assert!(track
            .samples()
            .iter()
            .any(|s| s.curvature.abs() == params.max_curvature));
    }

    #[test]
    fn test_generation_is_seeded() {
        let params = TrackConfig::default();
        let a = Track::generate(2000.0, &params, &mut DeterministicRng::new(7));
        let b = Track::generate(2000.0, &params, &mut DeterministicRng::new(7));
        let c = Track::generate(2000.0, &params, &mut DeterministicRng::new(8));

        assert_eq!(a.samples(), b.samples());
        assert_ne!(a.samples(), c.samples());
    }

    #[test]
    fn test_integration_steps_resolution_along_heading() {
        let mut rng = DeterministicRng::new(3);
        let track = Track::generate(3000.0, &TrackConfig::default(), &mut rng);

        let mut previous = Vec2::ZERO;
        for sample in track.samples() {
            let step = sample.position - previous;
            assert!((step.length() - 10.0).abs() < 1e-3);
            assert!((step.normalize() - sample.forward()).length() < 1e-4);
            previous = sample.position;
        }
    }

    #[test]
    fn test_smoothing_keeps_endpoints() {
        let mut values = [1.0, 0.0, 0.0, 0.0, -1.0];
        smooth(&mut values, 1);

        assert_eq!(values[0], 1.0);
        assert_eq!(values[4], -1.0);
        assert!((values[1] - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_sample_at_knots_is_identity() {
        let mut rng = DeterministicRng::new(11);
        let track = Track::generate(1000.0, &TrackConfig::default(), &mut rng);

        for knot in track.samples() {
            assert_eq!(track.sample_at(knot.s), *knot);
        }
    }

    #[test]
    fn test_sample_at_clamps_out_of_range() {
        let mut rng = DeterministicRng::new(11);
        let track = Track::generate(1000.0, &TrackConfig::default(), &mut rng);
        let first = track.samples()[0];
        let last = track.samples()[track.len() - 1];

        assert_eq!(track.sample_at(-25.0), first);
        assert_eq!(track.sample_at(5000.0), last);
        assert_eq!(track.sample_at(f32::NAN), first);
    }

    #[test]
    fn test_sample_at_interpolates_midpoint() {
        let track = straight(5, 10.0);
        let mid = track.sample_at(15.0);

        assert_eq!(mid.s, 15.0);
        assert!((mid.position.y - 25.0).abs() < 1e-5);
        assert_eq!(mid.angle, 0.0);
    }

    #[test]
    fn test_window_clips_to_track() {
        let track = straight(10, 10.0);

        let window = track.window(-50.0, 35.0);
        let arc: Vec<f32> = window.iter().map(|s| s.s).collect();
        assert_eq!(arc, vec![0.0, 10.0, 20.0, 30.0]);

        let tail = track.window(80.0, 500.0);
        assert_eq!(tail.last().map(|s| s.s), Some(90.0));

        assert!(track.window(200.0, 300.0).is_empty());
    }

    #[test]
    fn test_from_samples_rejects_empty() {
        assert!(Track::from_samples(Vec::new(), 10.0).is_none());
        assert!(Track::from_samples(straight(2, 10.0).samples().to_vec(), 0.0).is_none());
    }

    #[test]
    fn test_frames_are_orthonormal() {
        let sample = TrackSample {
            s: 0.0,
            position: Vec2::ZERO,
            angle: 0.7,
            curvature: 0.0,
        };

        assert!(sample.forward().dot(sample.perpendicular()).abs() < 1e-6);
        assert!((sample.perpendicular().length() - 1.0).abs() < 1e-6);
    }
}
