//! In-memory vehicle occupancy.

use std::collections::HashMap;

use crate::policy::OccupancyReader;
use crate::types::{Occupancy, VehicleId};

/// Occupancy of every tracked vehicle.
///
/// Vehicles missing from the map are not tracked and report no occupancy
/// information at all, which the evaluator treats as "not a vehicle".
#[derive(Debug, Clone, Default)]
pub struct OccupancyMap {
    vehicles: HashMap<VehicleId, Occupancy>,
}

impl OccupancyMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `vehicle`, or update its state.
    pub fn set(&mut self, vehicle: VehicleId, occupancy: Occupancy) {
        self.vehicles.insert(vehicle, occupancy);
    }

    /// Stop tracking `vehicle`.
    pub fn remove(&mut self, vehicle: VehicleId) -> Option<Occupancy> {
        self.vehicles.remove(&vehicle)
    }
}

impl OccupancyReader for OccupancyMap {
    fn occupancy(&self, vehicle: VehicleId) -> Option<Occupancy> {
        self.vehicles.get(&vehicle).cloned()
    }
}
