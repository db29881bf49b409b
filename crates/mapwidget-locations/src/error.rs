use thiserror::Error;

fn fmt_coordinate(value: &Option<f64>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}

/// A location that cannot be placed on the map.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error(
        "invalid location: latitude {}, longitude {}",
        fmt_coordinate(.latitude),
        fmt_coordinate(.longitude)
    )]
    Invalid {
        latitude: Option<f64>,
        longitude: Option<f64>,
    },
}

/// Failure reported by a platform collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("{0}")]
    Failed(String),

    #[error("object {guid} not found")]
    NotFound { guid: String },

    #[error("unsupported query {xpath}")]
    UnsupportedQuery { xpath: String },
}

/// Errors raised while retrieving records for a record-backed data source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("An error occurred while retrieving locations: {source} constraint {xpath}")]
    Query {
        xpath: String,
        #[source]
        source: PlatformError,
    },

    #[error("An error occurred while retrieving locations: {source} in {workflow}")]
    Workflow {
        workflow: String,
        #[source]
        source: PlatformError,
    },
}

/// Errors raised while handling a click on the map surface.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("a map click needs the 'Locations entity' of a Query data source, not '{data_source}'")]
    NoLocationEntity { data_source: &'static str },

    #[error("the 'Latitude attribute' and 'Longitude attribute' are required to store a map click")]
    MissingCoordinateAttributes,

    #[error("Error creating event entity {entity} : {source}")]
    CreateRecord {
        entity: String,
        #[source]
        source: PlatformError,
    },

    #[error("Error executing on click microflow {name} : {source}")]
    Microflow {
        name: String,
        #[source]
        source: PlatformError,
    },

    #[error("Error while executing the on click nanoflow: {source}")]
    Nanoflow {
        #[source]
        source: PlatformError,
    },

    #[error("Error while opening page {page}: {source}")]
    OpenPage {
        page: String,
        #[source]
        source: PlatformError,
    },
}
