use plankit_core::{Color, EventBus, EventFilter, LengthUnit, PlanEvent, WallPattern};
use plankit_settings::{PreferencesManager, Preferences, SettingsError};
use std::sync::Arc;
use tempfile::tempdir;

fn customized() -> Preferences {
    let mut preferences = Preferences::default();
    preferences.units.length_unit = LengthUnit::Millimeter;
    preferences.plan.grid_visible = false;
    preferences.plan.wall_pattern = WallPattern::ReversedHatchDown;
    preferences.plan.selection_color = Color::rgb(255, 128, 0);
    preferences.text.default_font_name = Some("Serif".to_string());
    preferences
}

#[test]
fn test_toml_file_round_trip() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("preferences.toml");

    let preferences = customized();
    preferences.save_to_file(&path).expect("save");
    let loaded = Preferences::load_from_file(&path).expect("load");

    assert_eq!(loaded, preferences);
}

#[test]
fn test_json_file_round_trip() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("preferences.json");

    let preferences = customized();
    preferences.save_to_file(&path).expect("save");
    let content = std::fs::read_to_string(&path).expect("read");
    assert!(content.contains("\"#ff8000\""));

    let loaded = Preferences::load_from_file(&path).expect("load");
    assert_eq!(loaded, preferences);
}

#[test]
fn test_unknown_extension_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("preferences.yaml");

    let err = Preferences::default()
        .save_to_file(&path)
        .expect_err("yaml unsupported");
    assert!(matches!(err, SettingsError::Config(_)));
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("preferences.toml");
    std::fs::write(
        &path,
        "[plan]\ngrid_visible = true\nfurniture_viewed_from_top = true\nfurniture_model_icon_size = 0\n\
         room_floor_colored_or_textured = true\nwall_pattern = \"hatch_up\"\n\
         selection_color = \"#6ca0dc\"\nbackground_color = \"#ffffff\"\nforeground_color = \"#000000\"\n",
    )
    .expect("write");

    assert!(matches!(
        Preferences::load_from_file(&path),
        Err(SettingsError::InvalidSetting { .. })
    ));
}

#[test]
fn test_manager_load_publishes_loaded_event() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("preferences.toml");
    customized().save_to_file(&path).expect("save");

    let bus = Arc::new(EventBus::new());
    let published = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = published.clone();
    bus.subscribe(EventFilter::All, move |event| sink.lock().push(event));
    let manager = PreferencesManager::new(Preferences::default(), bus.clone());
    manager.load(&path).expect("load");

    assert_eq!(manager.snapshot().length_unit(), LengthUnit::Millimeter);
    let published = published.lock();
    assert!(matches!(published.last(), Some(PlanEvent::Preferences(_))));
    assert!(published.len() > 1);
}
