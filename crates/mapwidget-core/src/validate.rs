//! Configuration validation.
//!
//! Every rule is checked independently and every violation is reported, so
//! a reviewer sees the whole list at once. Messages are the user-facing
//! contract and are returned in rule order.

use std::sync::LazyLock;

use regex::Regex;

use crate::widget::{
    non_blank, DataSource, MarkerChoice, OnClickAction, StaticSource, WidgetConfiguration,
};

static ENUM_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?-u:\w)+$").expect("valid enumeration key regex"));

/// Separator used when errors are shown as a single message.
pub const MESSAGE_SEPARATOR: &str = ", ";

/// Returns true when `key` only contains ASCII letters, digits and underscores.
#[must_use]
pub fn is_valid_enum_key(key: &str) -> bool {
    ENUM_KEY_RE.is_match(key)
}

/// Validates a widget configuration.
///
/// Returns the violated constraints in evaluation order; an empty list means
/// the configuration can be rendered.
#[must_use]
pub fn validate_widget(config: &WidgetConfiguration) -> Vec<String> {
    let mut errors = Vec::new();

    if !config.auto_zoom && config.zoom_level < 2 {
        errors.push("Zoom level must be greater than 1".to_string());
    }

    if config.map_provider.requires_token() && non_blank(config.api_token.as_ref()).is_none() {
        errors.push(format!("An api token for {} is required", config.map_provider));
    }

    if let DataSource::Static(source) = &config.data_source {
        check_static_locations(source, &mut errors);
    }

    if let Some(attributes) = config.data_source.attributes() {
        if !attributes.locates_records() {
            errors.push(format!(
                "The 'Address attribute' or 'Latitude attribute' and 'Longitude attribute' \
                 is required for data source '{}'",
                config.data_source.kind()
            ));
        }
    }

    if let DataSource::Query(source) = &config.data_source {
        if source.entity.trim().is_empty() {
            errors.push("The 'Locations entity' is required for 'Data source' 'Query'".to_string());
        }
    }

    if let DataSource::Workflow(source) = &config.data_source {
        if source.workflow.trim().is_empty() {
            errors.push("A 'Microflow' is required for 'Data source' 'Workflow'".to_string());
        }
    }

    let invalid_keys: Vec<String> = config
        .marker_images
        .iter()
        .filter(|image| !is_valid_enum_key(&image.enum_key))
        .map(|image| format!("'{}'", image.enum_key))
        .collect();
    if !invalid_keys.is_empty() {
        errors.push(format!(
            "Invalid enumeration keys on custom markers ({}). \
             Enumeration keys can only contain letters, digits and underscores",
            invalid_keys.join(", ")
        ));
    }

    if config.marker_images.is_empty() {
        if let DataSource::Static(source) = &config.data_source {
            for (index, location) in source.locations.iter().enumerate() {
                if matches!(location.marker, MarkerChoice::Enumeration { .. }) {
                    errors.push(format!(
                        "Marker images are required for the enumeration marker at static location {}",
                        index + 1
                    ));
                }
            }
        }

        let marker_attribute = config
            .data_source
            .attributes()
            .and_then(|attributes| attributes.marker_image());
        if marker_attribute.is_some() {
            errors.push(format!(
                "Marker images are required for the 'Marker image attribute' of data source '{}'",
                config.data_source.kind()
            ));
        }
    }

    if !config.map_styles.trim().is_empty() {
        if let Err(error) = serde_json::from_str::<serde_json::Value>(&config.map_styles) {
            errors.push(format!("Error parsing Maps style: {error}"));
        }
    }

    if let Some(error) = validate_click_action(&config.on_click, &config.widget_name) {
        errors.push(error);
    }

    errors
}

fn check_static_locations(source: &StaticSource, errors: &mut Vec<String>) {
    if source.locations.is_empty() {
        errors.push(
            "At least one static location is required for 'Data source' 'Static'".to_string(),
        );
        return;
    }

    for (index, location) in source.locations.iter().enumerate() {
        let has_coordinates = location.latitude.is_some() && location.longitude.is_some();
        if location.address().is_some() || has_coordinates {
            continue;
        }

        let mut missing = vec!["address"];
        if location.latitude.is_none() {
            missing.push("latitude");
        }
        if location.longitude.is_none() {
            missing.push("longitude");
        }
        errors.push(format!(
            "Invalid static location {}: missing {}; an address or both latitude and longitude are required",
            index + 1,
            missing.join(", ")
        ));
    }
}

/// Validates the on-click configuration.
///
/// Returns at most one message: the first required field that is missing for
/// the selected event.
#[must_use]
pub fn validate_click_action(action: &OnClickAction, widget_name: &str) -> Option<String> {
    let error = match action {
        OnClickAction::DoNothing => None,
        OnClickAction::ShowPage { page, .. } if page.trim().is_empty() => {
            Some("A 'Page' is required for on click 'Marker' event 'Show a page'")
        }
        OnClickAction::CallMicroflow { microflow } if microflow.trim().is_empty() => {
            Some("A 'Microflow' is required for on click 'Marker' event 'Call a microflow'")
        }
        OnClickAction::CallNanoflow { nanoflow } if !nanoflow.is_defined() => {
            Some("A 'Nanoflow' is required for on click 'Marker' event 'Call a nanoflow'")
        }
        _ => None,
    }?;

    Some(format!("Error in {widget_name} configuration: {error}"))
}

/// Joins validation errors into the single message shown in the error panel.
#[must_use]
pub fn validation_message(errors: &[String]) -> String {
    errors.join(MESSAGE_SEPARATOR)
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
