//! Mount scenarios: a TOML description of one mount attempt and the world
//! around it, used by `oneseat check`.
//!
//! ```toml
//! actor = 2
//!
//! [vehicle]
//! id = 10
//! type_name = "minicopter.entity.deployed"
//!
//! [occupancy]
//! has_driver = true
//! occupants = [1]
//!
//! [[teams]]
//! members = [1, 3]
//! ```
//!
//! Leaving out `[vehicle]` models a mount point with no parent vehicle;
//! leaving out `[occupancy]` models a vehicle the host does not track.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;

use crate::gate::MountGate;
use crate::messages::NotificationSink;
use crate::permissions::{GrantTable, IGNORE_PERMISSION};
use crate::store::RuleStore;
use crate::teams::{Team, TeamRegistry};
use crate::types::{ActorId, Mountable, Occupancy, VehicleInfo};
use crate::vehicles::OccupancyMap;

/// One mount attempt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scenario {
    /// Actor trying to mount.
    #[serde(default)]
    pub actor: Option<ActorId>,

    /// Whether the actor holds the override grant.
    #[serde(default)]
    pub exempt: bool,

    /// Vehicle owning the mount point.
    #[serde(default)]
    pub vehicle: Option<VehicleInfo>,

    /// Current occupancy of the vehicle.
    #[serde(default)]
    pub occupancy: Option<Occupancy>,

    /// Teams in the world.
    #[serde(default)]
    pub teams: Vec<Team>,
}

impl Scenario {
    /// The mount point being targeted.
    pub fn mountable(&self) -> Mountable {
        Mountable {
            parent_vehicle: self.vehicle.clone(),
        }
    }

    /// A gate over this scenario's world, reading rules from `rules`.
    pub fn gate(&self, rules: Arc<RuleStore>, notifier: Arc<dyn NotificationSink>) -> MountGate {
        let mut occupancy = OccupancyMap::new();
        if let (Some(vehicle), Some(state)) = (&self.vehicle, &self.occupancy) {
            occupancy.set(vehicle.id, state.clone());
        }

        let mut grants = GrantTable::new();
        if let Some(actor) = self.actor.filter(|_| self.exempt) {
            grants.grant(actor, IGNORE_PERMISSION);
        }

        MountGate::new(
            rules,
            Arc::new(TeamRegistry::new(self.teams.clone())),
            Arc::new(occupancy),
            Arc::new(grants),
            notifier,
        )
    }
}

/// Parse a scenario from TOML text.
///
/// # Errors
///
/// Returns an error if the text is not a valid scenario.
pub fn parse_scenario(contents: &str) -> anyhow::Result<Scenario> {
    toml::from_str(contents).context("failed to parse scenario")
}

/// Load a scenario file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_scenario(path: &Path) -> anyhow::Result<Scenario> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario at {}", path.display()))?;
    parse_scenario(&contents).with_context(|| format!("in {}", path.display()))
}
