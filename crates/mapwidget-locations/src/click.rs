//! Map click handling: store the clicked point and run the on-click action.

use std::str::FromStr;

use mapwidget_core::{DataSource, OnClickAction, PageLocation, WidgetConfiguration};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ActionError;
use crate::platform::{PageOpener, PlatformRecord, RecordFactory, WorkflowRunner};
use crate::types::ClickedCoordinates;

/// Fractional digits the record store keeps for decimals.
pub const COORDINATE_SCALE: u32 = 8;

/// Rounds a coordinate to [`COORDINATE_SCALE`] digits, halves toward
/// positive infinity (`-0.000000005` rounds to `0`).
///
/// The value is taken from its shortest decimal representation, so
/// `1.123456789` rounds to `1.12345679` rather than being skewed by binary
/// floating-point error. Non-finite input yields zero.
#[must_use]
pub fn round_coordinate(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    Decimal::from_str(&value.to_string())
        .unwrap_or_default()
        .round_dp_with_strategy(COORDINATE_SCALE, strategy)
        .normalize()
}

#[must_use]
pub fn round_click_coordinates(latitude: f64, longitude: f64) -> ClickedCoordinates {
    ClickedCoordinates {
        latitude: round_coordinate(latitude),
        longitude: round_coordinate(longitude),
    }
}

/// The on-click action that ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExecutedAction {
    Microflow { name: String },
    Nanoflow,
    Page { page: String, location: PageLocation },
}

/// The record stored for a click, and the action that ran with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickOutcome {
    pub coordinates: ClickedCoordinates,
    pub record_guid: String,
    /// `None` when the widget has no on-click action or its target is blank.
    pub action: Option<ExecutedAction>,
}

/// Handles a click on the map surface.
///
/// Every click creates a record of the query entity holding the rounded
/// coordinates, then runs the configured on-click action with that record.
///
/// # Errors
///
/// Returns [`ActionError`] when the configuration cannot store a click, or
/// when record creation or the action itself fails.
pub async fn handle_map_click<P>(
    config: &WidgetConfiguration,
    latitude: f64,
    longitude: f64,
    platform: &P,
) -> Result<ClickOutcome, ActionError>
where
    P: RecordFactory + WorkflowRunner + PageOpener + ?Sized,
{
    let DataSource::Query(source) = &config.data_source else {
        return Err(ActionError::NoLocationEntity {
            data_source: config.data_source.kind(),
        });
    };
    let (Some(lat_attr), Some(lng_attr)) =
        (source.attributes.latitude(), source.attributes.longitude())
    else {
        return Err(ActionError::MissingCoordinateAttributes);
    };

    let coordinates = round_click_coordinates(latitude, longitude);
    let mut attributes = Map::new();
    attributes.insert(
        lat_attr.to_string(),
        Value::String(coordinates.latitude.to_string()),
    );
    attributes.insert(
        lng_attr.to_string(),
        Value::String(coordinates.longitude.to_string()),
    );

    let record = platform
        .create(&source.entity, attributes)
        .await
        .map_err(|error| ActionError::CreateRecord {
            entity: source.entity.clone(),
            source: error,
        })?;
    tracing::debug!(
        entity = %source.entity,
        guid = %record.guid,
        latitude = %coordinates.latitude,
        longitude = %coordinates.longitude,
        "created location from map click"
    );

    let action = execute_action(&config.on_click, &record, platform).await?;
    if action.is_none() {
        tracing::debug!(guid = %record.guid, "no on-click action to run");
    }
    Ok(ClickOutcome {
        coordinates,
        record_guid: record.guid,
        action,
    })
}

/// Runs the on-click action with `record` as its context.
///
/// Actions with a blank target are skipped, returning `Ok(None)`.
///
/// # Errors
///
/// Returns [`ActionError`] when the platform call fails.
pub async fn execute_action<P>(
    action: &OnClickAction,
    record: &PlatformRecord,
    platform: &P,
) -> Result<Option<ExecutedAction>, ActionError>
where
    P: WorkflowRunner + PageOpener + ?Sized,
{
    match action {
        OnClickAction::CallMicroflow { microflow } if !microflow.trim().is_empty() => {
            platform
                .call_microflow(microflow, std::slice::from_ref(&record.guid))
                .await
                .map_err(|error| ActionError::Microflow {
                    name: microflow.clone(),
                    source: error,
                })?;
            Ok(Some(ExecutedAction::Microflow {
                name: microflow.clone(),
            }))
        }
        OnClickAction::CallNanoflow { nanoflow } if nanoflow.is_defined() => {
            platform
                .call_nanoflow(nanoflow, record)
                .await
                .map_err(|error| ActionError::Nanoflow { source: error })?;
            Ok(Some(ExecutedAction::Nanoflow))
        }
        OnClickAction::ShowPage { page, open_page_as } if !page.trim().is_empty() => {
            platform
                .open_page(page, *open_page_as, record)
                .await
                .map_err(|error| ActionError::OpenPage {
                    page: page.clone(),
                    source: error,
                })?;
            Ok(Some(ExecutedAction::Page {
                page: page.clone(),
                location: *open_page_as,
            }))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
#[path = "click_test.rs"]
mod tests;
