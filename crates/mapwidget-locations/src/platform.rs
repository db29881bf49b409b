//! Narrow contracts for the host platform the widget runs in.
//!
//! The widget only needs to fetch records, run named flows, create a record,
//! open a page and watch records for changes. Each capability is its own
//! trait so callers can ask for exactly what they use.

use std::sync::Arc;

use async_trait::async_trait;
use mapwidget_core::{Nanoflow, PageLocation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PlatformError;

/// A platform object: identity plus named attribute values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRecord {
    pub guid: String,
    pub entity: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl PlatformRecord {
    #[must_use]
    pub fn new(guid: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            entity: entity.into(),
            attributes: Map::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with(mut self, attribute: &str, value: impl Into<Value>) -> Self {
        self.set(attribute, value);
        self
    }

    pub fn set(&mut self, attribute: &str, value: impl Into<Value>) {
        self.attributes.insert(attribute.to_string(), value.into());
    }

    /// Attribute value; JSON `null` is treated as absent.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute).filter(|v| !v.is_null())
    }
}

/// Retrieves records matching an XPath expression.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn retrieve(&self, xpath: &str) -> Result<Vec<PlatformRecord>, PlatformError>;
}

/// Invokes server-side (microflow) and client-side (nanoflow) platform logic.
#[async_trait]
pub trait WorkflowRunner: Send + Sync {
    /// Runs a microflow on the given selection and returns the records it produced.
    async fn call_microflow(
        &self,
        name: &str,
        guids: &[String],
    ) -> Result<Vec<PlatformRecord>, PlatformError>;

    async fn call_nanoflow(
        &self,
        nanoflow: &Nanoflow,
        context: &PlatformRecord,
    ) -> Result<(), PlatformError>;
}

/// Creates new records.
#[async_trait]
pub trait RecordFactory: Send + Sync {
    async fn create(
        &self,
        entity: &str,
        attributes: Map<String, Value>,
    ) -> Result<PlatformRecord, PlatformError>;
}

/// Navigates to a page with a record as context.
#[async_trait]
pub trait PageOpener: Send + Sync {
    async fn open_page(
        &self,
        page: &str,
        location: PageLocation,
        context: &PlatformRecord,
    ) -> Result<(), PlatformError>;
}

/// What to watch: a whole record, or one attribute of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionRequest {
    pub guid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionHandle(pub u64);

/// Invoked by the platform whenever a watched record or attribute changes.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Record change notifications.
pub trait SubscriptionHub: Send + Sync {
    fn subscribe(&self, request: SubscriptionRequest, callback: ChangeCallback)
        -> SubscriptionHandle;

    fn unsubscribe(&self, handle: SubscriptionHandle);
}
