//! Normalization of static entries and platform records into [`Location`]s.

use mapwidget_core::{
    AppSettings, LocationAttributes, MarkerImages, StaticSource, WidgetConfiguration,
};
use serde_json::Value;

use crate::markers::MarkerUrls;
use crate::platform::PlatformRecord;
use crate::types::Location;

/// Converts a raw attribute value into a coordinate.
///
/// Numbers are taken as-is; strings are parsed after trimming. Blank,
/// unparseable, non-finite and non-numeric values yield `None`, never `0`.
#[must_use]
pub fn coerce_coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn attribute_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Builds locations for one widget configuration.
#[derive(Debug, Clone)]
pub struct LocationNormalizer {
    images: MarkerImages,
    markers: MarkerUrls,
}

impl LocationNormalizer {
    #[must_use]
    pub fn new(images: MarkerImages, markers: MarkerUrls) -> Self {
        Self { images, markers }
    }

    #[must_use]
    pub fn for_widget(config: &WidgetConfiguration, settings: &AppSettings) -> Self {
        Self::new(
            config.marker_images.clone(),
            MarkerUrls::from_settings(config, settings),
        )
    }

    /// Maps each static entry verbatim; only the marker URL is derived.
    #[must_use]
    pub fn static_locations(&self, source: &StaticSource) -> Vec<Location> {
        source
            .locations
            .iter()
            .map(|entry| Location {
                latitude: entry.latitude,
                longitude: entry.longitude,
                address: entry.address.clone(),
                url: self.markers.for_choice(&self.images, &entry.marker),
            })
            .collect()
    }

    /// Reads one record through the configured attribute names.
    #[must_use]
    pub fn from_record(&self, record: &PlatformRecord, attributes: &LocationAttributes) -> Location {
        let read = |name: Option<&str>| name.and_then(|attr| record.get(attr));

        let latitude = read(attributes.latitude()).and_then(coerce_coordinate);
        let longitude = read(attributes.longitude()).and_then(coerce_coordinate);
        let address = read(attributes.address()).and_then(attribute_text);
        let url = read(attributes.marker_image())
            .and_then(Value::as_str)
            .map(|key| self.markers.for_key(&self.images, key))
            .filter(|url| !url.is_empty());

        Location {
            latitude,
            longitude,
            address,
            url,
        }
    }

    #[must_use]
    pub fn from_records(
        &self,
        records: &[PlatformRecord],
        attributes: &LocationAttributes,
    ) -> Vec<Location> {
        records
            .iter()
            .map(|record| self.from_record(record, attributes))
            .collect()
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
