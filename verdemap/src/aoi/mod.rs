//! Area-of-interest geometry
//!
//! Provides the polygon ring drawn by the user and the approximate area
//! estimate used for client-side admission control. The estimate projects
//! vertices onto a local equirectangular plane and is deliberately cheap:
//! it gates requests before they reach the processing backend, it is not
//! a geodesic measurement.

mod types;

pub use types::{GeoBounds, LonLat, KM_PER_DEG_LAT, KM_PER_DEG_LON_EQUATOR, MIN_RING_VERTICES};

/// An area-of-interest boundary ring.
///
/// Vertices are ordered and the ring closes implicitly (the first vertex is
/// not repeated at the end). A drawing session owns exactly one polygon;
/// each new draw replaces the previous ring wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<LonLat>,
}

impl Polygon {
    /// Creates a polygon from ordered ring vertices.
    ///
    /// No validity requirement is enforced here; rings with fewer than
    /// [`MIN_RING_VERTICES`] vertices simply estimate to zero area and are
    /// rejected at admission time.
    pub fn new(vertices: Vec<LonLat>) -> Self {
        Self { vertices }
    }

    /// The ring vertices in drawing order.
    pub fn vertices(&self) -> &[LonLat] {
        &self.vertices
    }

    /// Whether the ring has enough vertices to enclose an area.
    pub fn is_ring(&self) -> bool {
        self.vertices.len() >= MIN_RING_VERTICES
    }

    /// Approximate enclosed area in square kilometers.
    ///
    /// Each vertex is projected with fixed per-degree scales
    /// ([`KM_PER_DEG_LAT`] north-south, [`KM_PER_DEG_LON_EQUATOR`] scaled by
    /// the cosine of the centroid latitude east-west), then the shoelace
    /// formula is applied over consecutive vertex pairs, wrapping last to
    /// first. Returns the absolute value, or 0.0 for fewer than three
    /// vertices.
    pub fn area_sq_km(&self) -> f64 {
        if !self.is_ring() {
            return 0.0;
        }

        // Longitude scale at the ring centroid corrects for meridian
        // convergence across the whole ring at once.
        let centroid_lat =
            self.vertices.iter().map(|v| v.lat).sum::<f64>() / self.vertices.len() as f64;
        let km_per_deg_lon = KM_PER_DEG_LON_EQUATOR * centroid_lat.to_radians().cos();

        let projected: Vec<(f64, f64)> = self
            .vertices
            .iter()
            .map(|v| (v.lon * km_per_deg_lon, v.lat * KM_PER_DEG_LAT))
            .collect();

        let mut signed_twice = 0.0;
        for i in 0..projected.len() {
            let (x_i, y_i) = projected[i];
            let (x_j, y_j) = projected[(i + 1) % projected.len()];
            signed_twice += x_i * y_j - x_j * y_i;
        }

        (signed_twice / 2.0).abs()
    }

    /// The axis-aligned bounding rectangle of the ring, or `None` for an
    /// empty vertex list.
    pub fn bounds(&self) -> Option<GeoBounds> {
        let first = self.vertices.first()?;
        let mut bounds = GeoBounds::new(first.lat, first.lon, first.lat, first.lon);
        for v in &self.vertices[1..] {
            bounds.south = bounds.south.min(v.lat);
            bounds.north = bounds.north.max(v.lat);
            bounds.west = bounds.west.min(v.lon);
            bounds.east = bounds.east.max(v.lon);
        }
        Some(bounds)
    }

    /// The ring as `[lon, lat]` pairs for the wire format (not
    /// closed-duplicated).
    pub fn to_pairs(&self) -> Vec<[f64; 2]> {
        self.vertices.iter().map(|v| [v.lon, v.lat]).collect()
    }
}
