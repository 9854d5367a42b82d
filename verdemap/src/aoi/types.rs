//! Area-of-interest value types.

use serde::{Deserialize, Serialize};

/// Kilometers spanned by one degree of latitude.
pub const KM_PER_DEG_LAT: f64 = 110.574;

/// Kilometers spanned by one degree of longitude at the equator.
///
/// The effective east-west scale shrinks with latitude; callers multiply
/// by the cosine of the latitude to correct for meridian convergence.
pub const KM_PER_DEG_LON_EQUATOR: f64 = 111.32;

/// Minimum number of vertices for a usable polygon ring.
pub const MIN_RING_VERTICES: usize = 3;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    /// Longitude in degrees (-180.0 to 180.0).
    pub lon: f64,
    /// Latitude in degrees (-90.0 to 90.0).
    pub lat: f64,
}

impl LonLat {
    /// Creates a new point from longitude and latitude in degrees.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for LonLat {
    fn from(pair: [f64; 2]) -> Self {
        Self {
            lon: pair[0],
            lat: pair[1],
        }
    }
}

impl From<LonLat> for [f64; 2] {
    fn from(p: LonLat) -> Self {
        [p.lon, p.lat]
    }
}

/// A geographic rectangle consumable as an image-overlay extent.
///
/// Edges are in degrees; `south <= north` and `west <= east` for any
/// bounds produced by [`crate::aoi::Polygon::bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Southern edge latitude.
    pub south: f64,
    /// Western edge longitude.
    pub west: f64,
    /// Northern edge latitude.
    pub north: f64,
    /// Eastern edge longitude.
    pub east: f64,
}

impl GeoBounds {
    /// Creates bounds from explicit edges.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Returns the corner pair `[[south, west], [north, east]]` used by
    /// map toolkits for image-overlay placement.
    pub fn to_corner_pairs(self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }

    /// Builds bounds from the `[[south, west], [north, east]]` corner pair.
    pub fn from_corner_pairs(corners: [[f64; 2]; 2]) -> Self {
        Self {
            south: corners[0][0],
            west: corners[0][1],
            north: corners[1][0],
            east: corners[1][1],
        }
    }
}
