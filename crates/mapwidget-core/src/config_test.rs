use std::collections::HashMap;
use std::env::VarError;
use std::io::Write;

use super::*;
use crate::widget::DataSource;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_settings_defaults() {
    let map: HashMap<&str, &str> = HashMap::new();
    let settings = build_app_settings(lookup_from_map(&map)).unwrap();
    assert_eq!(settings, AppSettings::default());
}

#[test]
fn build_app_settings_overrides() {
    let mut map = HashMap::new();
    map.insert("MAPWIDGET_LOG_LEVEL", "debug");
    map.insert("MAPWIDGET_APP_URL", "https://app.example.com");
    map.insert("MAPWIDGET_DEFAULT_MARKER_ICON", "img/marker.png");
    let settings = build_app_settings(lookup_from_map(&map)).unwrap();
    assert_eq!(settings.log_level, "debug");
    assert_eq!(settings.app_url, "https://app.example.com");
    assert_eq!(settings.default_marker_icon.as_deref(), Some("img/marker.png"));
}

#[test]
fn build_app_settings_blank_marker_icon_is_none() {
    let mut map = HashMap::new();
    map.insert("MAPWIDGET_DEFAULT_MARKER_ICON", "  ");
    let settings = build_app_settings(lookup_from_map(&map)).unwrap();
    assert!(settings.default_marker_icon.is_none());
}

#[test]
fn build_app_settings_rejects_empty_log_level() {
    let mut map = HashMap::new();
    map.insert("MAPWIDGET_LOG_LEVEL", "");
    let result = build_app_settings(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MAPWIDGET_LOG_LEVEL"),
        "expected InvalidEnvVar(MAPWIDGET_LOG_LEVEL), got: {result:?}"
    );
}

fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("mapwidget-{}-{name}", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn load_widget_config_reads_yaml() {
    let path = write_temp(
        "widget.yaml",
        r"
widgetName: store map
zoomLevel: 4
dataSource:
  type: microflow
  workflow: Geo.DS_Stores
  attributes:
    address: Address
",
    );
    let config = load_widget_config(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.widget_name, "store map");
    assert_eq!(config.zoom_level, 4);
    assert!(matches!(config.data_source, DataSource::Workflow(ref w) if w.workflow == "Geo.DS_Stores"));
}

#[test]
fn load_widget_config_reads_json() {
    let path = write_temp(
        "widget.json",
        r#"{"dataSource": {"type": "static", "locations": [{"address": "Delft"}]}}"#,
    );
    let config = load_widget_config(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(matches!(config.data_source, DataSource::Static(ref s) if s.locations.len() == 1));
}

#[test]
fn load_widget_config_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("mapwidget-does-not-exist.yaml");
    let err = load_widget_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::WidgetFileIo { .. }));
}

#[test]
fn load_widget_config_unknown_data_source_is_parse_error() {
    let path = write_temp("bad.yaml", "dataSource:\n  type: satellite\n");
    let err = load_widget_config(&path).unwrap_err();
    std::fs::remove_file(&path).ok();

    assert!(matches!(err, ConfigError::WidgetFileParse(_)));
}
