use std::fs;

use oledsense::core::Settings;
use tempfile::TempDir;

#[test]
fn test_load_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    let settings = Settings::load(Some(&path)).unwrap();
    assert_eq!(settings.pages.len(), 3);
    assert_eq!(settings.update_interval_ms(), 1000);
}

#[test]
fn test_load_invalid_json_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(Settings::load(Some(&path)).is_err());
}

#[test]
fn test_load_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{
            "update_interval_ms": 2000,
            "pages": [
                {
                    "duration_ms": 4000,
                    "icon_id": 15,
                    "sensors": [
                        {
                            "name": "CPU Total",
                            "hardware": "Cpu",
                            "type": "Load",
                            "prefix": "CPU ",
                            "suffix": "%",
                            "decimal_places": 0
                        }
                    ]
                }
            ]
        }"#,
    )
    .unwrap();

    let settings = Settings::load(Some(&path)).unwrap();
    assert_eq!(settings.update_interval_ms(), 2000);
    assert_eq!(settings.retry_interval_ms(), 5000);
    assert_eq!(settings.heartbeat_interval_ms(), 10000);
    assert_eq!(settings.pages.len(), 1);
    assert_eq!(settings.pages[0].icon_id, 15);
    assert_eq!(settings.pages[0].sensors[0].sensor_type, "Load");
    assert!(settings.page_set().is_ok());
}

#[test]
fn test_zero_duration_page_rejected_at_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{"pages": [{"duration_ms": 0, "icon_id": 0, "sensors": []}]}"#,
    )
    .unwrap();

    let settings = Settings::load(Some(&path)).unwrap();
    assert!(settings.page_set().is_err());
}
