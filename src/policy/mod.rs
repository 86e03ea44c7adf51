//! Mount policy evaluation.
//!
//! [`evaluate`] decides whether an actor may mount an already-occupied
//! vehicle. It is a pure function of its inputs: the rule table, and
//! capability objects for team membership, occupancy and exemption. It never
//! blocks on malformed input; anything it cannot judge is an implicit allow.

use tracing::{debug, trace};

use crate::types::{ActorId, Occupancy, VehicleId, VehicleInfo};

pub mod rules;

pub use rules::{RuleTable, VehicleRule};

/// Denial reason for a vehicle that already has someone in it.
pub const OCCUPIED: &str = "occupied";

// ---------------------------------------------------------------------------
// Decision and collaborators
// ---------------------------------------------------------------------------

/// Outcome of a mount check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountDecision {
    /// No objection; the host proceeds with its own checks.
    Allow,
    /// Mount is refused with a reason.
    Deny(String),
}

impl MountDecision {
    /// True for [`MountDecision::Deny`].
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny(_))
    }
}

/// Answers whether two actors are on the same team.
pub trait TeammateOracle {
    /// True when `a` and `b` share a team.
    fn are_teammates(&self, a: ActorId, b: ActorId) -> bool;
}

/// Reports the current mount state of vehicles.
pub trait OccupancyReader {
    /// Occupancy of `vehicle`, or `None` if the host does not track it as a
    /// vehicle.
    fn occupancy(&self, vehicle: VehicleId) -> Option<Occupancy>;
}

impl<F> TeammateOracle for F
where
    F: Fn(ActorId, ActorId) -> bool,
{
    fn are_teammates(&self, a: ActorId, b: ActorId) -> bool {
        self(a, b)
    }
}

impl<F> OccupancyReader for F
where
    F: Fn(VehicleId) -> Option<Occupancy>,
{
    fn occupancy(&self, vehicle: VehicleId) -> Option<Occupancy> {
        self(vehicle)
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate whether `actor` may mount `vehicle`.
///
/// Returns [`MountDecision::Deny`] only when a rule matches the vehicle type,
/// the vehicle is occupied, no occupant is a teammate (when the rule admits
/// teammates), and the rule forbids the occupied seat kind. Every other path
/// is [`MountDecision::Allow`], including a missing actor or vehicle.
pub fn evaluate(
    actor: Option<ActorId>,
    vehicle: Option<&VehicleInfo>,
    rules: &RuleTable,
    teams: &dyn TeammateOracle,
    occupancy: &dyn OccupancyReader,
    is_exempt: &dyn Fn(ActorId) -> bool,
) -> MountDecision {
    let (Some(actor), Some(vehicle)) = (actor, vehicle) else {
        trace!("mount check skipped: missing actor or vehicle");
        return MountDecision::Allow;
    };

    let Some(state) = occupancy.occupancy(vehicle.id) else {
        trace!(vehicle = %vehicle.id, "mount check skipped: not a tracked vehicle");
        return MountDecision::Allow;
    };

    if is_exempt(actor) {
        debug!(%actor, vehicle = %vehicle.id, "actor exempt from mount restrictions");
        return MountDecision::Allow;
    }

    let Some(rule) = rules.find(&vehicle.type_name) else {
        trace!(type_name = %vehicle.type_name, "no rule for vehicle type");
        return MountDecision::Allow;
    };

    if state.occupant_count() == 0 {
        return MountDecision::Allow;
    }

    if rule.allow_teammates
        && state
            .occupants
            .iter()
            .any(|occupant| teams.are_teammates(*occupant, actor))
    {
        debug!(%actor, vehicle = %vehicle.id, "teammate already mounted");
        return MountDecision::Allow;
    }

    if state.has_driver && rule.prevent_if_driver_present {
        return MountDecision::Deny(OCCUPIED.to_owned());
    }

    if state.has_passenger && rule.prevent_if_passenger_present {
        return MountDecision::Deny(OCCUPIED.to_owned());
    }

    MountDecision::Allow
}
