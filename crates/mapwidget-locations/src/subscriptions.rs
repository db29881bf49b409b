//! Change subscriptions held for the context record.

use mapwidget_core::DataSource;

use crate::platform::{
    ChangeCallback, PlatformRecord, SubscriptionHandle, SubscriptionHub, SubscriptionRequest,
};

/// Subscriptions needed to refresh the map when the context record changes:
/// the record itself plus every attribute the data source reads.
#[must_use]
pub fn subscription_plan(context_guid: &str, data_source: &DataSource) -> Vec<SubscriptionRequest> {
    let record = SubscriptionRequest {
        guid: context_guid.to_string(),
        attribute: None,
    };
    let attributes = data_source
        .attributes()
        .into_iter()
        .flat_map(|attributes| attributes.configured())
        .map(|attribute| SubscriptionRequest {
            guid: context_guid.to_string(),
            attribute: Some(attribute.to_string()),
        });

    std::iter::once(record).chain(attributes).collect()
}

/// Handles of the subscriptions currently held by one widget instance.
#[derive(Debug, Default)]
pub struct Subscriptions {
    handles: Vec<SubscriptionHandle>,
}

impl Subscriptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Drops the current subscriptions and, when a context record is given,
    /// subscribes to it according to [`subscription_plan`].
    pub fn replace<H>(
        &mut self,
        hub: &H,
        context: Option<&PlatformRecord>,
        data_source: &DataSource,
        on_change: &ChangeCallback,
    ) where
        H: SubscriptionHub + ?Sized,
    {
        self.release_all(hub);

        let Some(record) = context else {
            return;
        };
        for request in subscription_plan(&record.guid, data_source) {
            self.handles.push(hub.subscribe(request, on_change.clone()));
        }
        tracing::debug!(
            guid = %record.guid,
            count = self.handles.len(),
            "subscribed to context record"
        );
    }

    /// Unsubscribes every held handle; call on teardown.
    pub fn release_all<H>(&mut self, hub: &H)
    where
        H: SubscriptionHub + ?Sized,
    {
        if self.handles.is_empty() {
            return;
        }
        tracing::debug!(count = self.handles.len(), "releasing subscriptions");
        for handle in self.handles.drain(..) {
            hub.unsubscribe(handle);
        }
    }
}
