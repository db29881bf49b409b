//! Coordinate checks applied before a location reaches the renderer.

use crate::error::LocationError;
use crate::types::Location;

/// Returns true when both coordinates are present and in range.
///
/// `(0, 0)` counts as unset: the platform stores missing decimals as zero.
#[must_use]
pub fn valid_location(location: &Location) -> bool {
    let (Some(lat), Some(lng)) = (location.latitude, location.longitude) else {
        return false;
    };

    #[allow(clippy::float_cmp)]
    let is_unset = lat == 0.0 && lng == 0.0;

    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) && !is_unset
}

/// Checks a single location, handing it back when it can be placed.
///
/// # Errors
///
/// Returns [`LocationError::Invalid`] carrying both coordinates when
/// [`valid_location`] rejects the location.
pub fn validate_location(location: Location) -> Result<Location, LocationError> {
    if valid_location(&location) {
        Ok(location)
    } else {
        Err(LocationError::Invalid {
            latitude: location.latitude,
            longitude: location.longitude,
        })
    }
}
