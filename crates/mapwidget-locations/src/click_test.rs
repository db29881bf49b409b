use mapwidget_core::{
    ContextSource, LocationAttributes, MarkerImages, MapProvider, Nanoflow, QuerySource,
};

use super::*;
use crate::error::PlatformError;
use crate::memory::{InMemoryPlatform, PlatformCall, PlatformFixture, NANOFLOW_FAILURE_KEY};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn query_config(on_click: OnClickAction) -> WidgetConfiguration {
    WidgetConfiguration {
        widget_name: "maps".to_string(),
        auto_zoom: true,
        zoom_level: 10,
        map_provider: MapProvider::OpenStreet,
        api_token: None,
        data_source: DataSource::Query(QuerySource {
            entity: "Geo.Location".to_string(),
            constraint: None,
            attributes: LocationAttributes {
                address: None,
                latitude: Some("Lat".to_string()),
                longitude: Some("Lng".to_string()),
                marker_image: None,
            },
        }),
        marker_images: MarkerImages::default(),
        default_marker_icon: None,
        map_styles: String::new(),
        on_click,
    }
}

fn platform() -> InMemoryPlatform {
    let mut fixture = PlatformFixture::default();
    fixture
        .microflows
        .insert("Geo.ACT_OnClick".to_string(), Vec::new());
    InMemoryPlatform::from_fixture(fixture)
}

// -----------------------------------------------------------------------
// rounding
// -----------------------------------------------------------------------

#[test]
fn rounds_click_to_eight_decimals() {
    let coordinates = round_click_coordinates(1.123_456_789, -2.987_654_321);
    assert_eq!(coordinates.latitude, dec("1.12345679"));
    assert_eq!(coordinates.longitude, dec("-2.98765432"));
}

#[test]
fn rounds_halves_toward_positive_infinity() {
    assert_eq!(round_coordinate(0.000_000_005), dec("0.00000001"));
    assert_eq!(round_coordinate(1.000_000_005), dec("1.00000001"));
    assert_eq!(round_coordinate(0.000_000_004_9), dec("0"));
}

#[test]
fn negative_halves_round_up() {
    assert_eq!(round_coordinate(-0.000_000_005), Decimal::ZERO);
    assert_eq!(round_coordinate(-1.000_000_005), dec("-1"));
    assert_eq!(round_coordinate(-0.000_000_005_1), dec("-0.00000001"));
}

#[test]
fn short_values_are_unchanged() {
    assert_eq!(round_coordinate(51.5), dec("51.5"));
    assert_eq!(round_coordinate(-180.0), dec("-180"));
    assert_eq!(round_coordinate(0.0), Decimal::ZERO);
}

#[test]
fn non_finite_rounds_to_zero() {
    assert_eq!(round_coordinate(f64::NAN), Decimal::ZERO);
    assert_eq!(round_coordinate(f64::NEG_INFINITY), Decimal::ZERO);
}

// -----------------------------------------------------------------------
// handle_map_click
// -----------------------------------------------------------------------

#[tokio::test]
async fn do_nothing_still_stores_the_click() {
    let platform = platform();
    let outcome = handle_map_click(&query_config(OnClickAction::DoNothing), 1.0, 2.0, &platform)
        .await
        .unwrap();
    assert_eq!(outcome.action, None);

    let stored = platform.record(&outcome.record_guid).unwrap();
    assert_eq!(stored.get("Lat"), Some(&Value::from("1")));
    assert_eq!(stored.get("Lng"), Some(&Value::from("2")));

    let calls = platform.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], PlatformCall::Create { ref entity, .. } if entity == "Geo.Location"));
}

#[tokio::test]
async fn blank_page_keeps_stored_record_in_outcome() {
    let platform = platform();
    let config = query_config(OnClickAction::ShowPage {
        page: " ".to_string(),
        open_page_as: PageLocation::Content,
    });
    let outcome = handle_map_click(&config, 51.123_456_789, 4.5, &platform)
        .await
        .unwrap();

    assert_eq!(outcome.action, None);
    assert_eq!(outcome.coordinates.latitude, dec("51.12345679"));
    assert!(platform.record(&outcome.record_guid).is_some());
    assert_eq!(
        platform.calls(),
        vec![PlatformCall::Create {
            entity: "Geo.Location".to_string(),
            guid: outcome.record_guid.clone(),
        }]
    );
}

#[tokio::test]
async fn microflow_click_stores_rounded_coordinates() {
    let platform = platform();
    let config = query_config(OnClickAction::CallMicroflow {
        microflow: "Geo.ACT_OnClick".to_string(),
    });

    let outcome = handle_map_click(&config, 1.123_456_789, -2.987_654_321, &platform)
        .await
        .unwrap();
    let ClickOutcome {
        coordinates,
        record_guid,
        action,
    } = outcome;

    assert_eq!(coordinates.latitude, dec("1.12345679"));
    assert_eq!(
        action,
        Some(ExecutedAction::Microflow {
            name: "Geo.ACT_OnClick".to_string()
        })
    );

    let stored = platform.record(&record_guid).unwrap();
    assert_eq!(stored.entity, "Geo.Location");
    assert_eq!(stored.get("Lat"), Some(&Value::from("1.12345679")));
    assert_eq!(stored.get("Lng"), Some(&Value::from("-2.98765432")));

    let calls = platform.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], PlatformCall::Create { ref entity, .. } if entity == "Geo.Location"));
    assert_eq!(
        calls[1],
        PlatformCall::Microflow {
            name: "Geo.ACT_OnClick".to_string(),
            guids: vec![record_guid],
        }
    );
}

#[tokio::test]
async fn show_page_opens_page_with_new_record() {
    let platform = platform();
    let config = query_config(OnClickAction::ShowPage {
        page: "Geo/Location_New.page.xml".to_string(),
        open_page_as: PageLocation::Modal,
    });
    let outcome = handle_map_click(&config, 52.0, 4.0, &platform).await.unwrap();
    assert!(matches!(
        outcome.action,
        Some(ExecutedAction::Page {
            location: PageLocation::Modal,
            ..
        })
    ));
    assert!(matches!(
        platform.calls().last(),
        Some(PlatformCall::OpenPage { page, .. }) if page == "Geo/Location_New.page.xml"
    ));
}

#[tokio::test]
async fn nanoflow_failure_is_reported() {
    let mut platform = platform();
    platform.fail(NANOFLOW_FAILURE_KEY, "validation failed");
    let config = query_config(OnClickAction::CallNanoflow {
        nanoflow: Nanoflow {
            nanoflow: vec![serde_json::json!({"type": "start"})],
            params_spec: Value::Null,
        },
    });
    let err = handle_map_click(&config, 52.0, 4.0, &platform)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error while executing the on click nanoflow: validation failed"
    );
}

#[tokio::test]
async fn create_failure_names_entity() {
    let mut platform = platform();
    platform.fail("Geo.Location", "access denied");
    let config = query_config(OnClickAction::CallMicroflow {
        microflow: "Geo.ACT_OnClick".to_string(),
    });
    let err = handle_map_click(&config, 52.0, 4.0, &platform)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error creating event entity Geo.Location : access denied"
    );
    assert!(matches!(
        err,
        ActionError::CreateRecord {
            source: PlatformError::Failed(_),
            ..
        }
    ));
}

#[tokio::test]
async fn microflow_failure_names_microflow() {
    let platform = InMemoryPlatform::new();
    let config = query_config(OnClickAction::CallMicroflow {
        microflow: "Geo.ACT_Missing".to_string(),
    });
    let err = handle_map_click(&config, 52.0, 4.0, &platform)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error executing on click microflow Geo.ACT_Missing : microflow Geo.ACT_Missing does not exist"
    );
}

#[tokio::test]
async fn click_needs_query_source() {
    let mut config = query_config(OnClickAction::CallMicroflow {
        microflow: "Geo.ACT_OnClick".to_string(),
    });
    config.data_source = DataSource::Context(ContextSource::default());
    let err = handle_map_click(&config, 52.0, 4.0, &platform())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ActionError::NoLocationEntity {
            data_source: "Context"
        }
    ));
}

#[tokio::test]
async fn click_needs_coordinate_attributes() {
    let mut config = query_config(OnClickAction::CallMicroflow {
        microflow: "Geo.ACT_OnClick".to_string(),
    });
    if let DataSource::Query(source) = &mut config.data_source {
        source.attributes.longitude = None;
    }
    let err = handle_map_click(&config, 52.0, 4.0, &platform())
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::MissingCoordinateAttributes));
}

// -----------------------------------------------------------------------
// execute_action
// -----------------------------------------------------------------------

#[tokio::test]
async fn blank_targets_are_skipped() {
    let platform = platform();
    let record = PlatformRecord::new("1", "Geo.Location");
    let action = OnClickAction::ShowPage {
        page: "  ".to_string(),
        open_page_as: PageLocation::Content,
    };
    assert_eq!(
        execute_action(&action, &record, &platform).await.unwrap(),
        None
    );
    assert!(platform.calls().is_empty());
}
