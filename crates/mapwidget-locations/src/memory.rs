//! In-memory implementation of every platform contract.
//!
//! Backs the CLI and the tests. Records, microflow results and forced
//! failures come from a [`PlatformFixture`]; every data or action call is
//! recorded so callers can inspect what the widget asked for.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mapwidget_core::{Nanoflow, PageLocation};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PlatformError;
use crate::platform::{
    ChangeCallback, PageOpener, PlatformRecord, RecordFactory, RecordSource, SubscriptionHandle,
    SubscriptionHub, SubscriptionRequest, WorkflowRunner,
};

static XPATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^//([\w.]+)(.*)$").expect("valid xpath regex"));

static EQUALS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*([\w.]+)\s*=\s*'([^']*)'\s*\]").expect("valid constraint regex")
});

/// Failure key used for nanoflow calls.
pub const NANOFLOW_FAILURE_KEY: &str = "nanoflow";

/// Seed data for an [`InMemoryPlatform`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformFixture {
    #[serde(default)]
    pub records: Vec<PlatformRecord>,
    /// Microflow name to the guids of the records it returns.
    #[serde(default)]
    pub microflows: HashMap<String, Vec<String>>,
    /// Forced failures keyed by entity, microflow, page or `"nanoflow"`.
    #[serde(default)]
    pub failures: HashMap<String, String>,
}

/// A call the widget made into the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlatformCall {
    Retrieve {
        xpath: String,
    },
    Microflow {
        name: String,
        guids: Vec<String>,
    },
    Nanoflow {
        context_guid: String,
    },
    OpenPage {
        page: String,
        location: PageLocation,
        context_guid: String,
    },
    Create {
        entity: String,
        guid: String,
    },
}

#[derive(Default)]
pub struct InMemoryPlatform {
    records: Mutex<Vec<PlatformRecord>>,
    microflows: HashMap<String, Vec<String>>,
    failures: HashMap<String, String>,
    calls: Mutex<Vec<PlatformCall>>,
    subscriptions: Mutex<HashMap<u64, (SubscriptionRequest, ChangeCallback)>>,
    next_handle: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryPlatform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_fixture(fixture: PlatformFixture) -> Self {
        Self {
            records: Mutex::new(fixture.records),
            microflows: fixture.microflows,
            failures: fixture.failures,
            ..Self::default()
        }
    }

    /// Makes every call keyed by `key` fail with `message`.
    pub fn fail(&mut self, key: &str, message: &str) {
        self.failures.insert(key.to_string(), message.to_string());
    }

    #[must_use]
    pub fn record(&self, guid: &str) -> Option<PlatformRecord> {
        lock(&self.records).iter().find(|r| r.guid == guid).cloned()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<PlatformCall> {
        lock(&self.calls).clone()
    }

    #[must_use]
    pub fn active_subscriptions(&self) -> Vec<SubscriptionRequest> {
        let subscriptions = lock(&self.subscriptions);
        let mut handles: Vec<_> = subscriptions.keys().copied().collect();
        handles.sort_unstable();
        handles
            .into_iter()
            .filter_map(|handle| subscriptions.get(&handle).map(|(req, _)| req.clone()))
            .collect()
    }

    /// Simulates a change to a record (or one of its attributes) and runs
    /// the matching callbacks. Returns how many callbacks ran.
    pub fn notify(&self, guid: &str, attribute: Option<&str>) -> usize {
        let callbacks: Vec<ChangeCallback> = lock(&self.subscriptions)
            .values()
            .filter(|(req, _)| {
                req.guid == guid
                    && (req.attribute.is_none() || req.attribute.as_deref() == attribute)
            })
            .map(|(_, callback)| callback.clone())
            .collect();

        for callback in &callbacks {
            callback();
        }
        callbacks.len()
    }

    fn check_failure(&self, key: &str) -> Result<(), PlatformError> {
        match self.failures.get(key) {
            Some(message) => Err(PlatformError::Failed(message.clone())),
            None => Ok(()),
        }
    }

    fn log(&self, call: PlatformCall) {
        lock(&self.calls).push(call);
    }
}

fn attribute_matches(record: &PlatformRecord, attribute: &str, expected: &str) -> bool {
    if attribute == "id" {
        return record.guid == expected;
    }
    match record.get(attribute) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == expected,
        None => false,
    }
}

#[async_trait]
impl RecordSource for InMemoryPlatform {
    /// Supports `//Entity` optionally followed by `[attribute = 'value']`
    /// equality constraints.
    async fn retrieve(&self, xpath: &str) -> Result<Vec<PlatformRecord>, PlatformError> {
        self.log(PlatformCall::Retrieve {
            xpath: xpath.to_string(),
        });

        let unsupported = || PlatformError::UnsupportedQuery {
            xpath: xpath.to_string(),
        };
        let captures = XPATH_RE.captures(xpath).ok_or_else(unsupported)?;
        let entity = captures.get(1).map_or("", |m| m.as_str());
        let constraint = captures.get(2).map_or("", |m| m.as_str());

        self.check_failure(entity)?;

        if !EQUALS_RE.replace_all(constraint, "").trim().is_empty() {
            return Err(unsupported());
        }
        let conditions: Vec<(String, String)> = EQUALS_RE
            .captures_iter(constraint)
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .collect();

        let records = lock(&self.records)
            .iter()
            .filter(|record| record.entity == entity)
            .filter(|record| {
                conditions
                    .iter()
                    .all(|(attr, value)| attribute_matches(record, attr, value))
            })
            .cloned()
            .collect();
        Ok(records)
    }
}

#[async_trait]
impl WorkflowRunner for InMemoryPlatform {
    async fn call_microflow(
        &self,
        name: &str,
        guids: &[String],
    ) -> Result<Vec<PlatformRecord>, PlatformError> {
        self.log(PlatformCall::Microflow {
            name: name.to_string(),
            guids: guids.to_vec(),
        });
        self.check_failure(name)?;

        let result_guids = self
            .microflows
            .get(name)
            .ok_or_else(|| PlatformError::Failed(format!("microflow {name} does not exist")))?;

        let records = lock(&self.records);
        result_guids
            .iter()
            .map(|guid| {
                records
                    .iter()
                    .find(|r| &r.guid == guid)
                    .cloned()
                    .ok_or_else(|| PlatformError::NotFound { guid: guid.clone() })
            })
            .collect()
    }

    async fn call_nanoflow(
        &self,
        _nanoflow: &Nanoflow,
        context: &PlatformRecord,
    ) -> Result<(), PlatformError> {
        self.log(PlatformCall::Nanoflow {
            context_guid: context.guid.clone(),
        });
        self.check_failure(NANOFLOW_FAILURE_KEY)
    }
}

#[async_trait]
impl RecordFactory for InMemoryPlatform {
    async fn create(
        &self,
        entity: &str,
        attributes: Map<String, Value>,
    ) -> Result<PlatformRecord, PlatformError> {
        self.check_failure(entity)?;

        let record = PlatformRecord {
            guid: uuid::Uuid::new_v4().to_string(),
            entity: entity.to_string(),
            attributes,
        };
        self.log(PlatformCall::Create {
            entity: entity.to_string(),
            guid: record.guid.clone(),
        });
        lock(&self.records).push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl PageOpener for InMemoryPlatform {
    async fn open_page(
        &self,
        page: &str,
        location: PageLocation,
        context: &PlatformRecord,
    ) -> Result<(), PlatformError> {
        self.log(PlatformCall::OpenPage {
            page: page.to_string(),
            location,
            context_guid: context.guid.clone(),
        });
        self.check_failure(page)
    }
}

impl SubscriptionHub for InMemoryPlatform {
    fn subscribe(
        &self,
        request: SubscriptionRequest,
        callback: ChangeCallback,
    ) -> SubscriptionHandle {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed) + 1;
        lock(&self.subscriptions).insert(handle, (request, callback));
        SubscriptionHandle(handle)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        lock(&self.subscriptions).remove(&handle.0);
    }
}
