//! Collision Resolution
//!
//! Pairwise contact between cars. Contacts never eliminate anyone:
//! both cars are pushed apart (sideways and along the track) and lose
//! a little speed.

use glam::Vec2;
use tracing::debug;

use crate::core::rng::DeterministicRng;
use crate::core::units::render_to_meters;
use crate::game::config::RaceConfig;
use crate::game::events::RaceEvent;
use crate::game::track::Track;
use crate::game::vehicle::Vehicle;

/// Geometry of one contact, before any state is touched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Unit normal from the first car toward the second
    pub normal: Vec2,
    /// How far inside the separation threshold the pair sits (render units)
    pub overlap: f32,
}

/// Detect contact between two cars.
///
/// Returns `None` when the pair is at least the separation distance apart.
/// Coincident cars fall back to the track perpendicular under `a`.
pub fn detect_contact(a: &Vehicle, b: &Vehicle, track: &Track, config: &RaceConfig) -> Option<Contact> {
    let pos_a = a.world_pose(track, config.render_scale).position;
    let pos_b = b.world_pose(track, config.render_scale).position;

    let min_separation = (a.width + b.width) * config.collision.separation_factor;
    let delta = pos_b - pos_a;
    let distance = delta.length();
    if distance >= min_separation {
        return None;
    }

    let normal = if distance > config.collision.epsilon {
        delta / distance
    } else {
        track.sample_at(a.progress).perpendicular()
    };

    Some(Contact {
        normal,
        overlap: min_separation - distance,
    })
}

/// Push a touching pair apart and bleed their speed.
pub fn apply_contact(
    a: &mut Vehicle,
    b: &mut Vehicle,
    contact: Contact,
    track: &Track,
    config: &RaceConfig,
    rng: &mut DeterministicRng,
) {
    let params = &config.collision;
    let push = contact.overlap * 0.5;

    // Decompose the normal in the track frame under `a`.
    let frame = track.sample_at(a.progress);
    let lateral = contact.normal.dot(frame.perpendicular());
    let along = contact.normal.dot(frame.forward());

    let side = lateral * push * params.lateral_push;
    a.lateral_offset -= side;
    b.lateral_offset += side;

    for car in [&mut *a, &mut *b] {
        let drop = rng.next_f32_range(params.speed_penalty_min, params.speed_penalty_max);
        let floor = params.min_speed.min(car.speed);
        car.speed = (car.speed - drop).max(floor);
        car.clamp_speed();
    }

    let nudge = render_to_meters(along * push, config.render_scale) * params.progress_push;
    a.progress -= nudge;
    b.progress += nudge;
}

/// Resolve every touching pair in grid order.
///
/// Poses are recomputed per pair, so a car moved by an earlier pair
/// is seen at its new position by later ones.
pub fn resolve(
    vehicles: &mut [Vehicle],
    track: &Track,
    config: &RaceConfig,
    rng: &mut DeterministicRng,
    tick: u32,
) -> Vec<RaceEvent> {
    let mut events = Vec::new();

    for j in 1..vehicles.len() {
        for i in 0..j {
            let (head, tail) = vehicles.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];

            let Some(contact) = detect_contact(a, b, track, config) else {
                continue;
            };

            apply_contact(a, b, contact, track, config, rng);
            debug!(
                tick,
                a = a.id.0,
                b = b.id.0,
                overlap = contact.overlap,
                "contact resolved"
            );
            events.push(RaceEvent::collision(tick, a.id, b.id, contact.overlap));
        }
    }

    events
}
