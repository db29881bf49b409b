pub mod app_config;
pub mod config;
pub mod validate;
pub mod widget;

pub use app_config::AppSettings;
pub use config::{load_app_settings, load_app_settings_from_env, load_widget_config};
pub use validate::{
    is_valid_enum_key, validate_click_action, validate_widget, validation_message,
};
pub use widget::{
    ContextSource, DataSource, LocationAttributes, MapProvider, MarkerChoice, MarkerImage,
    MarkerImages, Nanoflow, OnClickAction, PageLocation, QuerySource, StaticLocation,
    StaticSource, WidgetConfiguration, WorkflowSource,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read widget configuration {path}: {source}")]
    WidgetFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse widget configuration: {0}")]
    WidgetFileParse(#[from] serde_yaml::Error),
}
