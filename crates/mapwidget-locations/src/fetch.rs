//! Data-source dispatch: retrieves the records for the configured mode and
//! normalizes them into renderable locations.

use mapwidget_core::{DataSource, QuerySource};

use crate::error::FetchError;
use crate::normalize::LocationNormalizer;
use crate::platform::{PlatformRecord, RecordSource, WorkflowRunner};
use crate::types::Location;
use crate::validity::valid_location;

/// Placeholder in a query constraint that stands for the context record.
pub const CURRENT_OBJECT_TOKEN: &str = "[%CurrentObject%]";

/// Builds the XPath for a query data source.
///
/// Every [`CURRENT_OBJECT_TOKEN`] in the constraint is replaced with the
/// context guid. Returns `None` when the constraint refers to the context
/// record but there is none, in which case nothing should be queried.
#[must_use]
pub fn build_xpath(source: &QuerySource, context_guid: Option<&str>) -> Option<String> {
    let constraint = source.constraint.as_deref().unwrap_or("").trim();
    let needs_context = constraint.contains(CURRENT_OBJECT_TOKEN);

    let constraint = match context_guid {
        Some(guid) => constraint.replace(CURRENT_OBJECT_TOKEN, guid),
        None if needs_context => return None,
        None => constraint.to_string(),
    };

    Some(format!("//{}{constraint}", source.entity.trim()))
}

/// Fetches and normalizes the locations for `data_source`.
///
/// Static entries never touch the platform. Record-backed modes retrieve
/// records through `platform`. Locations with neither valid coordinates nor
/// an address are dropped in every mode, static entries included.
///
/// # Errors
///
/// Returns [`FetchError`] when the query or workflow call fails.
pub async fn fetch_locations<P>(
    data_source: &DataSource,
    normalizer: &LocationNormalizer,
    context: Option<&PlatformRecord>,
    platform: &P,
) -> Result<Vec<Location>, FetchError>
where
    P: RecordSource + WorkflowRunner + ?Sized,
{
    let context_guid = context.map(|record| record.guid.as_str());

    let locations = match data_source {
        DataSource::Static(source) => normalizer.static_locations(source),
        DataSource::Context(source) => match context {
            Some(record) => vec![normalizer.from_record(record, &source.attributes)],
            None => {
                tracing::debug!("no context record; nothing to show");
                Vec::new()
            }
        },
        DataSource::Query(source) => {
            let Some(xpath) = build_xpath(source, context_guid) else {
                tracing::debug!(
                    entity = %source.entity,
                    "constraint needs a context record; skipping query"
                );
                return Ok(Vec::new());
            };
            let records = platform
                .retrieve(&xpath)
                .await
                .map_err(|error| FetchError::Query {
                    xpath: xpath.clone(),
                    source: error,
                })?;
            tracing::debug!(%xpath, count = records.len(), "retrieved location records");
            normalizer.from_records(&records, &source.attributes)
        }
        DataSource::Workflow(source) => {
            let guids: Vec<String> = context_guid.map(str::to_string).into_iter().collect();
            let records = platform
                .call_microflow(&source.workflow, &guids)
                .await
                .map_err(|error| FetchError::Workflow {
                    workflow: source.workflow.clone(),
                    source: error,
                })?;
            tracing::debug!(
                workflow = %source.workflow,
                count = records.len(),
                "workflow returned location records"
            );
            normalizer.from_records(&records, &source.attributes)
        }
    };

    Ok(retain_renderable(locations))
}

fn retain_renderable(locations: Vec<Location>) -> Vec<Location> {
    locations
        .into_iter()
        .filter(|location| {
            let keep = valid_location(location) || location.has_address();
            if !keep {
                tracing::debug!(
                    latitude = ?location.latitude,
                    longitude = ?location.longitude,
                    "skipping location without valid coordinates or address"
                );
            }
            keep
        })
        .collect()
}
