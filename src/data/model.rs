use std::collections::BTreeSet;

use super::geo::GeoPoint;

// ---------------------------------------------------------------------------
// Restaurant – one row of the source table
// ---------------------------------------------------------------------------

/// A single restaurant location. Every field is guaranteed present:
/// incomplete rows never make it past the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    /// Normalized brand name (uppercase, punctuation stripped).
    pub name: String,
    pub address: String,
    pub city: String,
    /// Province / state short code, e.g. `CA`.
    pub province: String,
    /// Decimal degrees.
    pub latitude: f64,
    /// Decimal degrees.
    pub longitude: f64,
}

impl Restaurant {
    /// Location in radians, ready for distance calculations.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::from_degrees(self.longitude, self.latitude)
    }
}

// ---------------------------------------------------------------------------
// Query results
// ---------------------------------------------------------------------------

/// One `(group key, count)` pair of an aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountEntry {
    pub key: String,
    pub count: usize,
}

/// One row of a distance table: a restaurant and how far it is from the
/// reference restaurant.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceRow {
    pub name: String,
    pub address: String,
    pub miles: f64,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All restaurants in source order.
    pub restaurants: Vec<Restaurant>,
    /// Sorted set of distinct provinces.
    pub provinces: BTreeSet<String>,
    /// Number of source rows discarded because a field was missing.
    pub dropped_rows: usize,
}

impl Dataset {
    /// Build the province index from the loaded restaurants.
    pub fn from_restaurants(restaurants: Vec<Restaurant>, dropped_rows: usize) -> Self {
        let provinces = restaurants.iter().map(|r| r.province.clone()).collect();
        Dataset {
            restaurants,
            provinces,
            dropped_rows,
        }
    }

    /// Number of restaurants.
    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }
}
