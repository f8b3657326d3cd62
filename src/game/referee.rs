//! Ranking and finish detection.

use serde::{Serialize, Deserialize};

use crate::game::vehicle::{Vehicle, VehicleId};

/// One row of the standings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based race position
    pub position: u32,
    /// Car
    pub vehicle: VehicleId,
    /// Display name
    pub name: String,
    /// Display color
    pub color: String,
    /// Arc-length reached (meters)
    pub progress: f32,
    /// Input-driven car
    pub is_player: bool,
}

/// Cars ordered by descending progress.
///
/// Stable: cars with equal progress keep grid order.
pub fn rank(vehicles: &[Vehicle]) -> Vec<&Vehicle> {
    let mut order: Vec<&Vehicle> = vehicles.iter().collect();
    order.sort_by(|a, b| b.progress.total_cmp(&a.progress));
    order
}

/// Numbered standings.
pub fn standings(vehicles: &[Vehicle]) -> Vec<Standing> {
    rank(vehicles)
        .into_iter()
        .enumerate()
        .map(|(i, v)| Standing {
            position: i as u32 + 1,
            vehicle: v.id,
            name: v.name.clone(),
            color: v.color.clone(),
            progress: v.progress,
            is_player: v.is_player(),
        })
        .collect()
}

/// 1-based position of a car, if it is on the grid.
pub fn position_of(vehicles: &[Vehicle], id: VehicleId) -> Option<u32> {
    rank(vehicles)
        .iter()
        .position(|v| v.id == id)
        .map(|i| i as u32 + 1)
}

/// True once the leader has covered the race distance.
pub fn check_finish(vehicles: &[Vehicle], race_distance: f32) -> bool {
    vehicles
        .iter()
        .map(|v| v.progress)
        .max_by(|a, b| a.total_cmp(b))
        .is_some_and(|lead| lead >= race_distance)
}
