//! Core value types shared by the gate, the evaluator and the host adapters.
//!
//! These are views of host state, not host state itself: the host builds them
//! per mount attempt and drops them afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of an actor (player) that can mount things.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a vehicle entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vehicle as seen by the policy: its id and its type identifier.
///
/// `type_name` is the host's short prefab name, e.g.
/// `"minicopter.entity.deployed"`. Rules match it by substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleInfo {
    /// Entity id of the vehicle.
    pub id: VehicleId,
    /// Type identifier rules are matched against.
    pub type_name: String,
}

impl VehicleInfo {
    /// Build a vehicle view from an id and a type identifier.
    pub fn new(id: VehicleId, type_name: impl Into<String>) -> Self {
        Self {
            id,
            type_name: type_name.into(),
        }
    }
}

/// A point an actor can attach to.
///
/// Only mountables whose parent is a vehicle are governed by the gate;
/// turrets and standalone seats carry `parent_vehicle: None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Mountable {
    /// Vehicle this mount point belongs to, if any.
    pub parent_vehicle: Option<VehicleInfo>,
}

impl Mountable {
    /// A seat belonging to the given vehicle.
    pub fn seat_of(vehicle: VehicleInfo) -> Self {
        Self {
            parent_vehicle: Some(vehicle),
        }
    }

    /// A mount point that is not part of any vehicle.
    pub fn standalone() -> Self {
        Self::default()
    }
}

/// Current mount state of a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Occupancy {
    /// Someone is in the driver seat.
    #[serde(default)]
    pub has_driver: bool,
    /// Someone is in at least one passenger seat.
    #[serde(default)]
    pub has_passenger: bool,
    /// Every actor currently mounted, driver included.
    #[serde(default)]
    pub occupants: Vec<ActorId>,
}

impl Occupancy {
    /// An unoccupied vehicle.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A vehicle with only a driver.
    pub fn driver(actor: ActorId) -> Self {
        Self {
            has_driver: true,
            has_passenger: false,
            occupants: vec![actor],
        }
    }

    /// A vehicle with passengers and no driver.
    pub fn passengers(actors: Vec<ActorId>) -> Self {
        Self {
            has_driver: false,
            has_passenger: !actors.is_empty(),
            occupants: actors,
        }
    }

    /// Number of mounted actors.
    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }
}
