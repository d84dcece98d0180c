//! Great-circle distances on the WGS-84 ellipsoid.

use geo::{GeodesicDistance, Point};
use ndarray::{Array2, Zip};

/// A `(latitude, longitude)` pair in degrees.
pub type LatLon = (f64, f64);

/// Geodesic distance in metres between two points (Karney's algorithm).
///
/// Non-finite coordinates yield NaN instead of reaching the geodesic solver.
pub fn geodesic_distance(from: LatLon, to: LatLon) -> f64 {
    if !(from.0.is_finite() && from.1.is_finite() && to.0.is_finite() && to.1.is_finite()) {
        return f64::NAN;
    }
    Point::new(from.1, from.0).geodesic_distance(&Point::new(to.1, to.0))
}

/// Distances in metres from every query point to `center`.
pub fn distances(query_points: &[LatLon], center: LatLon) -> Vec<f64> {
    query_points
        .iter()
        .map(|&point| geodesic_distance(point, center))
        .collect()
}

/// Grid form of [`distances`]: writes into `out`, which must share the shape
/// of the coordinate arrays.
pub fn distances_into(
    grid_lat: &Array2<f64>,
    grid_lon: &Array2<f64>,
    center: LatLon,
    out: &mut Array2<f64>,
) {
    Zip::from(out)
        .and(grid_lat)
        .and(grid_lon)
        .for_each(|distance, &lat, &lon| *distance = geodesic_distance((lat, lon), center));
}
