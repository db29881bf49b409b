//! Widget configuration model.
//!
//! The data source and the on-click behaviour are sum types: each variant
//! carries only the fields that mode needs. Text fields are still plain
//! strings because they come from a configuration file, so blank values are
//! checked by [`crate::validate_widget`].

use serde::{Deserialize, Serialize};

fn default_widget_name() -> String {
    "maps".to_string()
}

fn default_zoom_level() -> u8 {
    10
}

/// Returns the trimmed value when it is present and not blank.
pub(crate) fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfiguration {
    /// Name used in click-action error messages ("Error in maps configuration").
    #[serde(default = "default_widget_name")]
    pub widget_name: String,
    #[serde(default)]
    pub auto_zoom: bool,
    #[serde(default = "default_zoom_level")]
    pub zoom_level: u8,
    #[serde(default)]
    pub map_provider: MapProvider,
    #[serde(default)]
    pub api_token: Option<String>,
    pub data_source: DataSource,
    #[serde(default)]
    pub marker_images: MarkerImages,
    #[serde(default)]
    pub default_marker_icon: Option<String>,
    /// Free-text JSON style payload handed to the map provider.
    #[serde(default)]
    pub map_styles: String,
    #[serde(default)]
    pub on_click: OnClickAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MapProvider {
    #[default]
    OpenStreet,
    GoogleMaps,
    MapBox,
    HereMaps,
}

impl MapProvider {
    /// Only OpenStreetMap tiles can be loaded without an API token.
    #[must_use]
    pub fn requires_token(self) -> bool {
        !matches!(self, MapProvider::OpenStreet)
    }
}

impl std::fmt::Display for MapProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapProvider::OpenStreet => write!(f, "OpenStreetMap"),
            MapProvider::GoogleMaps => write!(f, "Google Maps"),
            MapProvider::MapBox => write!(f, "Mapbox"),
            MapProvider::HereMaps => write!(f, "HERE Maps"),
        }
    }
}

/// Where the widget's locations come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DataSource {
    Static(StaticSource),
    Context(ContextSource),
    #[serde(alias = "XPath", alias = "xpath")]
    Query(QuerySource),
    #[serde(alias = "microflow")]
    Workflow(WorkflowSource),
}

impl DataSource {
    /// Human-readable mode name used in validation messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            DataSource::Static(_) => "Static",
            DataSource::Context(_) => "Context",
            DataSource::Query(_) => "Query",
            DataSource::Workflow(_) => "Workflow",
        }
    }

    /// Attribute names for record-backed modes; `None` for static locations.
    #[must_use]
    pub fn attributes(&self) -> Option<&LocationAttributes> {
        match self {
            DataSource::Static(_) => None,
            DataSource::Context(source) => Some(&source.attributes),
            DataSource::Query(source) => Some(&source.attributes),
            DataSource::Workflow(source) => Some(&source.attributes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StaticSource {
    #[serde(default)]
    pub locations: Vec<StaticLocation>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContextSource {
    #[serde(default)]
    pub attributes: LocationAttributes,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuerySource {
    /// Entity the locations are retrieved from, e.g. `Geo.Location`.
    #[serde(default)]
    pub entity: String,
    /// Optional XPath constraint; `[%CurrentObject%]` is replaced with the
    /// context record's guid.
    #[serde(default)]
    pub constraint: Option<String>,
    #[serde(default)]
    pub attributes: LocationAttributes,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowSource {
    #[serde(default)]
    pub workflow: String,
    #[serde(default)]
    pub attributes: LocationAttributes,
}

/// Attribute names read from each record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAttributes {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    /// Enumeration attribute whose key selects a marker image.
    #[serde(default)]
    pub marker_image: Option<String>,
}

impl LocationAttributes {
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        non_blank(self.address.as_ref())
    }

    #[must_use]
    pub fn latitude(&self) -> Option<&str> {
        non_blank(self.latitude.as_ref())
    }

    #[must_use]
    pub fn longitude(&self) -> Option<&str> {
        non_blank(self.longitude.as_ref())
    }

    #[must_use]
    pub fn marker_image(&self) -> Option<&str> {
        non_blank(self.marker_image.as_ref())
    }

    /// True when an address attribute, or both coordinate attributes, are set.
    #[must_use]
    pub fn locates_records(&self) -> bool {
        self.address().is_some() || (self.latitude().is_some() && self.longitude().is_some())
    }

    /// All configured attribute names, in address/latitude/longitude/marker order.
    pub fn configured(&self) -> impl Iterator<Item = &str> {
        [
            self.address(),
            self.latitude(),
            self.longitude(),
            self.marker_image(),
        ]
        .into_iter()
        .flatten()
    }
}

/// A location entered directly in the widget configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticLocation {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub marker: MarkerChoice,
}

impl StaticLocation {
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        non_blank(self.address.as_ref())
    }
}

/// Marker icon requested by a static location.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MarkerChoice {
    #[default]
    Default,
    Custom {
        image: String,
    },
    Enumeration {
        key: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerImage {
    pub enum_key: String,
    pub enum_image: String,
}

/// Enumeration key to marker image table, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerImages(pub Vec<MarkerImage>);

impl MarkerImages {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MarkerImage> {
        self.0.iter()
    }

    /// Looks up an entry by exact key equality.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&MarkerImage> {
        self.0.iter().find(|image| image.enum_key == key)
    }
}

impl From<Vec<MarkerImage>> for MarkerImages {
    fn from(images: Vec<MarkerImage>) -> Self {
        Self(images)
    }
}

/// What happens after the user clicks the map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    tag = "event",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum OnClickAction {
    #[default]
    DoNothing,
    ShowPage {
        #[serde(default)]
        page: String,
        #[serde(default)]
        open_page_as: PageLocation,
    },
    CallMicroflow {
        #[serde(default)]
        microflow: String,
    },
    CallNanoflow {
        #[serde(default)]
        nanoflow: Nanoflow,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageLocation {
    #[default]
    Content,
    Popup,
    Modal,
}

impl std::fmt::Display for PageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageLocation::Content => write!(f, "content"),
            PageLocation::Popup => write!(f, "popup"),
            PageLocation::Modal => write!(f, "modal"),
        }
    }
}

/// Compiled client-side flow definition as supplied by the platform.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nanoflow {
    #[serde(default)]
    pub nanoflow: Vec<serde_json::Value>,
    #[serde(default)]
    pub params_spec: serde_json::Value,
}

impl Nanoflow {
    #[must_use]
    pub fn is_defined(&self) -> bool {
        !self.nanoflow.is_empty()
    }
}
