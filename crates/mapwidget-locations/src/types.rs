//! Canonical shapes handed to the map renderer and the record store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A marker position. Either coordinate may be missing when the source did
/// not provide it; the renderer geocodes `address` in that case.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Marker icon URL; `None` means the renderer's default icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Location {
    #[must_use]
    pub fn has_address(&self) -> bool {
        self.address.as_deref().is_some_and(|a| !a.trim().is_empty())
    }
}

/// Coordinates of a map click, rounded to the 8 fractional digits the
/// record store keeps (20 integer digits, 8 fractional).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickedCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}
