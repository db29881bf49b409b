/// Process-level settings for hosting the widget core.
///
/// Widget behaviour lives in [`crate::WidgetConfiguration`]; these settings
/// only describe where the widget runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub log_level: String,
    /// Base URL that relative marker image references are joined onto.
    pub app_url: String,
    /// Marker icon used when a widget configuration does not name one.
    pub default_marker_icon: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            app_url: String::new(),
            default_marker_icon: None,
        }
    }
}
