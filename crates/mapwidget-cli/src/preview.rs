//! `locations` and `click` command handlers.
//!
//! Both run against an [`InMemoryPlatform`] seeded from a fixture file, so
//! a configuration can be exercised without a running platform.

use std::path::Path;

use anyhow::Context;
use mapwidget_core::{
    load_widget_config, validate_widget, validation_message, AppSettings, WidgetConfiguration,
};
use mapwidget_locations::{
    fetch_locations, handle_map_click, subscription_plan, InMemoryPlatform, LocationNormalizer,
    PlatformFixture,
};

/// Load a widget configuration and refuse to continue when it is invalid,
/// the same way the widget shows an error panel instead of a map.
fn load_valid_config(path: &Path) -> anyhow::Result<WidgetConfiguration> {
    let config = load_widget_config(path)
        .with_context(|| format!("loading widget configuration {}", path.display()))?;
    let errors = validate_widget(&config);
    if !errors.is_empty() {
        anyhow::bail!("{}", validation_message(&errors));
    }
    Ok(config)
}

pub(crate) fn load_fixture(path: Option<&Path>) -> anyhow::Result<PlatformFixture> {
    let Some(path) = path else {
        return Ok(PlatformFixture::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading platform fixture {}", path.display()))?;
    let fixture: PlatformFixture = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing platform fixture {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        records = fixture.records.len(),
        microflows = fixture.microflows.len(),
        "loaded platform fixture"
    );
    Ok(fixture)
}

/// Print the locations the widget would render, plus the subscriptions it
/// would hold for the context record.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the fixture cannot be
/// loaded, the context guid is unknown, or retrieval fails.
pub(crate) async fn run_locations(
    settings: &AppSettings,
    config_path: &Path,
    fixture_path: Option<&Path>,
    context_guid: Option<&str>,
) -> anyhow::Result<()> {
    let config = load_valid_config(config_path)?;
    let platform = InMemoryPlatform::from_fixture(load_fixture(fixture_path)?);

    let context = match context_guid {
        Some(guid) => Some(
            platform
                .record(guid)
                .ok_or_else(|| anyhow::anyhow!("context record '{guid}' not found in fixture"))?,
        ),
        None => None,
    };

    let normalizer = LocationNormalizer::for_widget(&config, settings);
    let locations =
        fetch_locations(&config.data_source, &normalizer, context.as_ref(), &platform).await?;
    let subscriptions = context
        .as_ref()
        .map(|record| subscription_plan(&record.guid, &config.data_source))
        .unwrap_or_default();

    tracing::info!(
        data_source = config.data_source.kind(),
        count = locations.len(),
        "resolved locations"
    );

    let report = serde_json::json!({
        "locations": locations,
        "subscriptions": subscriptions,
        "calls": platform.calls(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Simulate a map click and print what the widget stored and ran.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the fixture cannot be
/// loaded, or the click cannot be handled.
pub(crate) async fn run_click(
    config_path: &Path,
    latitude: f64,
    longitude: f64,
    fixture_path: Option<&Path>,
) -> anyhow::Result<()> {
    let config = load_valid_config(config_path)?;
    let platform = InMemoryPlatform::from_fixture(load_fixture(fixture_path)?);

    let outcome = handle_map_click(&config, latitude, longitude, &platform).await?;
    tracing::info!(?outcome, "handled map click");

    let report = serde_json::json!({
        "outcome": outcome,
        "calls": platform.calls(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
