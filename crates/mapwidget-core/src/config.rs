use std::path::Path;

use crate::app_config::AppSettings;
use crate::widget::WidgetConfiguration;
use crate::ConfigError;

/// Load process settings from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_settings() -> Result<AppSettings, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_settings_from_env()
}

/// Load process settings from environment variables already in the process.
///
/// Unlike [`load_app_settings`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_settings_from_env() -> Result<AppSettings, ConfigError> {
    build_app_settings(|key| std::env::var(key))
}

/// Build process settings using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_settings<F>(lookup: F) -> Result<AppSettings, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let log_level = or_default("MAPWIDGET_LOG_LEVEL", "info");
    if log_level.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "MAPWIDGET_LOG_LEVEL".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let app_url = or_default("MAPWIDGET_APP_URL", "");
    let default_marker_icon = lookup("MAPWIDGET_DEFAULT_MARKER_ICON")
        .ok()
        .filter(|icon| !icon.trim().is_empty());

    Ok(AppSettings {
        log_level,
        app_url,
        default_marker_icon,
    })
}

/// Load a widget configuration from a YAML or JSON file.
///
/// The file is only parsed here; call [`crate::validate_widget`] to check
/// the mode-dependent requirements.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or does not match the
/// configuration shape.
pub fn load_widget_config(path: &Path) -> Result<WidgetConfiguration, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::WidgetFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let config: WidgetConfiguration = serde_yaml::from_str(&content)?;
    tracing::debug!(
        path = %path.display(),
        data_source = %config.data_source.kind(),
        "loaded widget configuration"
    );

    Ok(config)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
