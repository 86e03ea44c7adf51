//! Host-facing mount hook.
//!
//! The host calls [`MountGate::can_mount`] synchronously before a mount
//! completes. The gate resolves the mount point to its vehicle, runs the
//! policy against the current rule snapshot and, on denial, tells the actor
//! why. The host supplies its own generic refusal; the gate only returns the
//! decision.

use std::sync::Arc;

use tracing::{info, warn};

use crate::messages::{MessageKey, NotificationSink};
use crate::permissions::{exemption_check, PermissionQuery};
use crate::policy::{evaluate, MountDecision, OccupancyReader, TeammateOracle};
use crate::store::RuleStore;
use crate::types::{ActorId, Mountable};

/// Everything the gate needs from the host.
pub struct MountGate {
    rules: Arc<RuleStore>,
    teams: Arc<dyn TeammateOracle + Send + Sync>,
    occupancy: Arc<dyn OccupancyReader + Send + Sync>,
    permissions: Arc<dyn PermissionQuery>,
    notifier: Arc<dyn NotificationSink>,
}

impl std::fmt::Debug for MountGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountGate")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl MountGate {
    /// Assemble a gate from its collaborators.
    pub fn new(
        rules: Arc<RuleStore>,
        teams: Arc<dyn TeammateOracle + Send + Sync>,
        occupancy: Arc<dyn OccupancyReader + Send + Sync>,
        permissions: Arc<dyn PermissionQuery>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            rules,
            teams,
            occupancy,
            permissions,
            notifier,
        }
    }

    /// Decide whether `actor` may mount `mountable`.
    ///
    /// Mount points that do not belong to a vehicle are never restricted.
    pub fn can_mount(&self, actor: Option<ActorId>, mountable: Option<&Mountable>) -> MountDecision {
        let Some(vehicle) = mountable.and_then(|m| m.parent_vehicle.as_ref()) else {
            return MountDecision::Allow;
        };

        let rules = self.rules.snapshot();
        let is_exempt = exemption_check(self.permissions.as_ref());
        let decision = evaluate(
            actor,
            Some(vehicle),
            &rules,
            self.teams.as_ref(),
            self.occupancy.as_ref(),
            &is_exempt,
        );

        if let (MountDecision::Deny(reason), Some(actor)) = (&decision, actor) {
            info!(
                %actor,
                vehicle = %vehicle.id,
                type_name = %vehicle.type_name,
                reason = %reason,
                "mount denied"
            );
            if let Err(e) = self
                .notifier
                .send(actor, MessageKey::CannotMountVehicle, &[])
            {
                warn!(%actor, error = %e, "failed to notify actor of denied mount");
            }
        }

        decision
    }

    /// Rule store this gate reads from.
    pub fn rules(&self) -> &Arc<RuleStore> {
        &self.rules
    }
}
