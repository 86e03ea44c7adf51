//! Override grants.
//!
//! The gate never talks to a permission registry directly. It asks a
//! [`PermissionQuery`] whether the actor holds [`IGNORE_PERMISSION`]; hosts
//! adapt their own registry to that trait.

use std::collections::{HashMap, HashSet};

use crate::types::ActorId;

/// Grant that exempts an actor from every mount restriction.
pub const IGNORE_PERMISSION: &str = "oneseatvehicle.ignore";

/// Every permission this crate defines, for host registration.
pub const PERMISSIONS: &[&str] = &[IGNORE_PERMISSION];

/// Answers whether an actor holds a named permission.
pub trait PermissionQuery: Send + Sync {
    /// True when `actor` holds `permission`.
    fn has_permission(&self, actor: ActorId, permission: &str) -> bool;
}

/// In-memory permission grants.
#[derive(Debug, Clone, Default)]
pub struct GrantTable {
    grants: HashMap<ActorId, HashSet<String>>,
}

impl GrantTable {
    /// Empty table; nobody holds anything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `permission` to `actor`.
    pub fn grant(&mut self, actor: ActorId, permission: impl Into<String>) {
        self.grants
            .entry(actor)
            .or_default()
            .insert(permission.into());
    }

    /// Take `permission` from `actor`. Returns whether it was held.
    pub fn revoke(&mut self, actor: ActorId, permission: &str) -> bool {
        let Some(held) = self.grants.get_mut(&actor) else {
            return false;
        };
        let removed = held.remove(permission);
        if held.is_empty() {
            self.grants.remove(&actor);
        }
        removed
    }
}

impl PermissionQuery for GrantTable {
    fn has_permission(&self, actor: ActorId, permission: &str) -> bool {
        self.grants
            .get(&actor)
            .is_some_and(|held| held.contains(permission))
    }
}

/// Exemption capability backed by [`IGNORE_PERMISSION`].
pub fn exemption_check(permissions: &dyn PermissionQuery) -> impl Fn(ActorId) -> bool + '_ {
    move |actor| permissions.has_permission(actor, IGNORE_PERMISSION)
}
