//! Coverage for config parsing, migration and fallback.

use oneseat::config::{
    config_path_with, load_config, load_or_init, migrate, save_config, Config, ConfigError,
    CONFIG_FILE_NAME, CONFIG_PATH_ENV, CURRENT_SCHEMA_VERSION,
};
use oneseat::policy::VehicleRule;

const CUSTOM_CONFIG: &str = r#"
version = 1

[[vehicles]]
vehicle_type_match = "rhib"
prevent_if_driver_present = true
prevent_if_passenger_present = false
allow_teammates = false
"#;

#[test]
fn parse_current_config() {
    let config_parse = toml::from_str::<Config>(CUSTOM_CONFIG);
    assert!(config_parse.is_ok());
    let config = match config_parse {
        Ok(config) => config,
        Err(err) => panic!("config should parse: {err}"),
    };
    assert_eq!(config.version, 1);
    assert_eq!(
        config.vehicles,
        vec![VehicleRule {
            vehicle_type_match: "rhib".to_owned(),
            prevent_if_driver_present: true,
            prevent_if_passenger_present: false,
            allow_teammates: false,
        }]
    );
}

#[test]
fn missing_flags_default_to_false() {
    let config: Config = toml::from_str(
        r#"
version = 1
[[vehicles]]
vehicle_type_match = "tugboat"
"#,
    )
    .expect("should parse");
    let rule = &config.vehicles[0];
    assert!(!rule.prevent_if_driver_present);
    assert!(!rule.prevent_if_passenger_present);
    assert!(!rule.allow_teammates);
}

#[test]
fn unversioned_config_migrates_to_defaults() {
    let legacy: Config = toml::from_str(
        r#"
[[vehicles]]
vehicle_type_match = "rhib"
"#,
    )
    .expect("should parse");
    assert_eq!(legacy.version, 0);

    let (migrated, migration) = migrate(legacy);
    let migration = migration.expect("legacy config should migrate");
    assert_eq!(migration.from, 0);
    assert_eq!(migration.to, CURRENT_SCHEMA_VERSION);
    assert!(migration.reset_to_defaults);
    assert_eq!(migrated, Config::default());
}

#[test]
fn newer_version_left_alone() {
    let future = Config {
        version: CURRENT_SCHEMA_VERSION.saturating_add(1),
        vehicles: vec![VehicleRule::crew_only("rhib")],
    };
    let (config, migration) = migrate(future.clone());
    assert!(migration.is_none());
    assert_eq!(config, future);
}

#[test]
fn empty_match_is_invalid() {
    let config = Config {
        version: CURRENT_SCHEMA_VERSION,
        vehicles: vec![VehicleRule::crew_only("rowboat"), VehicleRule::crew_only("  ")],
    };
    let err = config.validate().expect_err("blank match should be rejected");
    assert!(err.contains("vehicles[1]"));
}

#[test]
fn missing_file_is_initialised_with_defaults() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("nested").join(CONFIG_FILE_NAME);

    let config = load_or_init(&path).expect("should fall back");
    assert_eq!(config, Config::default());
    assert!(path.exists(), "defaults should be persisted");

    let reread = load_config(&path).expect("persisted defaults should load");
    assert_eq!(reread, Config::default());
}

#[test]
fn malformed_file_is_replaced_with_defaults() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "vehicles = \"not a list\"").expect("should write");

    let config = load_or_init(&path).expect("should fall back");
    assert_eq!(config, Config::default());

    let persisted = std::fs::read_to_string(&path).expect("should read");
    assert!(persisted.contains("minicopter.entity"));
}

#[test]
fn strict_load_reports_parse_errors() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[[vehicles]\n").expect("should write");

    let result = load_config(&path);
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
    let untouched = std::fs::read_to_string(&path).expect("should read");
    assert_eq!(untouched, "[[vehicles]\n");
}

#[test]
fn strict_load_reports_invalid_rules() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "version = 1\n[[vehicles]]\nvehicle_type_match = \"\"\n",
    )
    .expect("should write");

    assert!(matches!(load_config(&path), Err(ConfigError::Invalid { .. })));
}

#[test]
fn unversioned_file_is_migrated_and_persisted() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[[vehicles]]\nvehicle_type_match = \"rhib\"\n").expect("should write");

    let config = load_or_init(&path).expect("should load");
    assert_eq!(config, Config::default());

    let rewritten = std::fs::read_to_string(&path).expect("should read");
    assert!(rewritten.contains("version = 1"), "got: {rewritten}");
    assert!(!rewritten.contains("\"rhib\""));
    let reloaded = load_config(&path).expect("should load strictly");
    assert_eq!(reloaded, Config::default());
}

#[test]
fn custom_config_survives_load_or_init() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, CUSTOM_CONFIG).expect("should write");

    let config = load_or_init(&path).expect("should load");
    assert_eq!(config.vehicles.len(), 1);
    assert_eq!(config.vehicles[0].vehicle_type_match, "rhib");

    let untouched = std::fs::read_to_string(&path).expect("should read");
    assert_eq!(untouched, CUSTOM_CONFIG, "current config should not be rewritten");
}

#[test]
fn saved_config_loads_back() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join(CONFIG_FILE_NAME);
    let config = Config {
        version: CURRENT_SCHEMA_VERSION,
        vehicles: vec![
            VehicleRule::crew_only("tugboat"),
            VehicleRule::crew_only("rhib"),
        ],
    };
    save_config(&path, &config).expect("should save");
    assert_eq!(load_config(&path).expect("should load"), config);
}

#[test]
fn config_path_falls_back_to_home() {
    let path = config_path_with(|_| None);
    if let Ok(path) = path {
        assert!(path.ends_with(format!(".oneseat/{CONFIG_FILE_NAME}")));
    }
}

#[test]
fn empty_env_override_is_ignored() {
    let path = config_path_with(|key| (key == CONFIG_PATH_ENV).then(String::new));
    if let Ok(path) = path {
        assert!(path.ends_with(CONFIG_FILE_NAME));
        assert!(path.to_string_lossy().contains(".oneseat"));
    }
}
