//! Scenario fixture tests.

use std::sync::Arc;

use oneseat::messages::LogSink;
use oneseat::policy::{MountDecision, RuleTable};
use oneseat::scenario::{load_scenario, parse_scenario};
use oneseat::store::RuleStore;

const MINICOPTER_WITH_DRIVER: &str = r#"
actor = 2

[vehicle]
id = 10
type_name = "minicopter.entity.deployed"

[occupancy]
has_driver = true
occupants = [1]
"#;

fn decide(text: &str) -> MountDecision {
    let scenario = parse_scenario(text).expect("scenario should parse");
    let store = Arc::new(RuleStore::in_memory(RuleTable::defaults()));
    let gate = scenario.gate(store, Arc::new(LogSink));
    gate.can_mount(scenario.actor, Some(&scenario.mountable()))
}

#[test]
fn stranger_is_denied() {
    assert!(decide(MINICOPTER_WITH_DRIVER).is_deny());
}

#[test]
fn teammate_is_allowed() {
    let text = format!("{MINICOPTER_WITH_DRIVER}\n[[teams]]\nmembers = [1, 2]\n");
    assert_eq!(decide(&text), MountDecision::Allow);
}

#[test]
fn exempt_actor_is_allowed() {
    let text = MINICOPTER_WITH_DRIVER.replace("actor = 2", "actor = 2\nexempt = true");
    assert_eq!(decide(&text), MountDecision::Allow);
}

#[test]
fn missing_vehicle_section_is_a_plain_seat() {
    assert_eq!(decide("actor = 2\n"), MountDecision::Allow);
}

#[test]
fn untracked_vehicle_is_allowed() {
    let text = r#"
actor = 2

[vehicle]
id = 10
type_name = "rowboat"
"#;
    assert_eq!(decide(text), MountDecision::Allow);
}

#[test]
fn load_from_file() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("scenario.toml");
    std::fs::write(&path, MINICOPTER_WITH_DRIVER).expect("should write");

    let scenario = load_scenario(&path).expect("should load");
    assert_eq!(scenario.actor.map(|a| a.0), Some(2));
    assert!(scenario.vehicle.is_some());
}

#[test]
fn bad_scenario_reports_path() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("broken.toml");
    std::fs::write(&path, "actor = \"two\"").expect("should write");

    let err = load_scenario(&path).expect_err("should fail");
    assert!(format!("{err:#}").contains("broken.toml"));
}
