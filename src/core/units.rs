//! Unit conversions.
//!
//! Speeds are carried in km/h, distances along the track in meters and
//! lateral offsets / world positions in render units.

/// km/h per m/s.
pub const KPH_PER_MPS: f32 = 3.6;

/// Convert km/h to m/s.
#[inline]
pub fn kph_to_mps(kph: f32) -> f32 {
    kph / KPH_PER_MPS
}

/// Convert a render-unit distance back to meters of arc-length.
#[inline]
pub fn render_to_meters(units: f32, render_scale: f32) -> f32 {
    units / render_scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_conversions() {
        assert!((kph_to_mps(36.0) - 10.0).abs() < 1e-5);
        assert!((kph_to_mps(350.0) - 97.222).abs() < 1e-3);
    }

    #[test]
    fn test_render_scale_conversions() {
        let scale = 0.06;
        assert!((render_to_meters(30.0, scale) - 500.0).abs() < 1e-2);
        assert_eq!(render_to_meters(0.0, scale), 0.0);
    }
}
