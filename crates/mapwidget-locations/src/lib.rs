//! Turns widget configuration and platform records into map locations, and
//! drives the platform collaborators the widget depends on.

pub mod click;
pub mod error;
pub mod fetch;
pub mod markers;
pub mod memory;
pub mod normalize;
pub mod platform;
pub mod subscriptions;
pub mod types;
pub mod validity;

pub use click::{
    execute_action, handle_map_click, round_click_coordinates, round_coordinate, ClickOutcome,
    ExecutedAction,
};
pub use error::{ActionError, FetchError, LocationError, PlatformError};
pub use fetch::{build_xpath, fetch_locations};
pub use markers::MarkerUrls;
pub use memory::{InMemoryPlatform, PlatformCall, PlatformFixture};
pub use normalize::{coerce_coordinate, LocationNormalizer};
pub use platform::{
    ChangeCallback, PageOpener, PlatformRecord, RecordFactory, RecordSource, SubscriptionHandle,
    SubscriptionHub, SubscriptionRequest, WorkflowRunner,
};
pub use subscriptions::{subscription_plan, Subscriptions};
pub use types::{ClickedCoordinates, Location};
pub use validity::{valid_location, validate_location};
