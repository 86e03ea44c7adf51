//! Per-vehicle-type rule table.
//!
//! Rules are matched by substring containment against a vehicle's type
//! identifier, in table order. The first matching rule wins; later rules
//! that would also match are never consulted.

use serde::{Deserialize, Serialize};

/// Mount restrictions for one family of vehicle types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRule {
    /// Substring matched against the vehicle's type identifier.
    pub vehicle_type_match: String,

    /// Deny mounting while a driver is seated.
    #[serde(default)]
    pub prevent_if_driver_present: bool,

    /// Deny mounting while any passenger is seated.
    #[serde(default)]
    pub prevent_if_passenger_present: bool,

    /// Let teammates of any current occupant mount regardless of the flags above.
    #[serde(default)]
    pub allow_teammates: bool,
}

impl VehicleRule {
    /// A rule that blocks strangers from joining an occupied vehicle but lets
    /// teammates in.
    pub fn crew_only(vehicle_type_match: impl Into<String>) -> Self {
        Self {
            vehicle_type_match: vehicle_type_match.into(),
            prevent_if_driver_present: true,
            prevent_if_passenger_present: true,
            allow_teammates: true,
        }
    }

    /// Whether this rule applies to the given vehicle type identifier.
    pub fn matches(&self, type_name: &str) -> bool {
        type_name.contains(self.vehicle_type_match.as_str())
    }
}

/// Ordered, immutable set of vehicle rules.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<VehicleRule>,
}

/// Vehicle types restricted out of the box.
const DEFAULT_VEHICLE_TYPES: &[&str] = &["minicopter.entity", "attackhelicopter.entity", "rowboat"];

impl RuleTable {
    /// Build a table from rules in match order.
    pub fn new(rules: Vec<VehicleRule>) -> Self {
        Self { rules }
    }

    /// The built-in table: minicopters, attack helicopters and rowboats are
    /// crew-only.
    pub fn defaults() -> Self {
        Self::new(
            DEFAULT_VEHICLE_TYPES
                .iter()
                .map(|name| VehicleRule::crew_only(*name))
                .collect(),
        )
    }

    /// First rule matching `type_name`, if any.
    pub fn find(&self, type_name: &str) -> Option<&VehicleRule> {
        self.rules.iter().find(|rule| rule.matches(type_name))
    }

    /// Rules in match order.
    pub fn rules(&self) -> &[VehicleRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no vehicle type is regulated.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<VehicleRule>> for RuleTable {
    fn from(rules: Vec<VehicleRule>) -> Self {
        Self::new(rules)
    }
}
