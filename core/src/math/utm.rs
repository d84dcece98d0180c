//! Forward transverse Mercator (UTM) on the WGS-84 ellipsoid.
//!
//! Series expansion after Snyder, *Map Projections: A Working Manual*
//! (USGS PP 1395), eqs. 8-9 to 8-10. Accurate to well under a metre within a
//! few degrees of the central meridian, which covers regional track tables.

const SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;
const FLATTENING: f64 = 1.0 / 298.257_223_563;
const SCALE_FACTOR: f64 = 0.9996;
const FALSE_EASTING_M: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH_M: f64 = 10_000_000.0;

/// Central meridian of a UTM zone, degrees.
pub fn central_meridian(zone: u8) -> f64 {
    f64::from(zone) * 6.0 - 183.0
}

/// Distance along the meridian from the equator to `phi` (radians), metres.
fn meridian_arc(phi: f64, e2: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    SEMI_MAJOR_AXIS_M
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

/// Projects `(latitude, longitude)` degrees to UTM `(easting, northing)` metres
/// in the given zone. Southern latitudes get the 10 000 km false northing.
pub fn latlon_to_utm(latitude: f64, longitude: f64, zone: u8) -> (f64, f64) {
    let e2 = FLATTENING * (2.0 - FLATTENING);
    let ep2 = e2 / (1.0 - e2);

    let phi = latitude.to_radians();
    let lambda = longitude.to_radians();
    let lambda0 = central_meridian(zone).to_radians();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();
    let n = SEMI_MAJOR_AXIS_M / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = cos_phi * (lambda - lambda0);

    let easting = SCALE_FACTOR
        * n
        * (a + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + FALSE_EASTING_M;

    let mut northing = SCALE_FACTOR
        * (meridian_arc(phi, e2)
            + n * tan_phi
                * (a * a / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));
    if latitude < 0.0 {
        northing += FALSE_NORTHING_SOUTH_M;
    }

    (easting, northing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_twenty_is_centered_on_63_west() {
        assert_eq!(central_meridian(20), -63.0);
    }

    #[test]
    fn central_meridian_maps_to_false_easting() {
        let (x, y) = latlon_to_utm(18.0, -63.0, 20);
        assert!((x - 500_000.0).abs() < 1e-6);
        assert!((y - 1_990_185.5).abs() < 1.0, "northing {}", y);
    }

    #[test]
    fn san_juan_in_zone_19() {
        let (x, y) = latlon_to_utm(18.4655, -66.1057, 19);
        assert!((x - 805_688.8).abs() < 1.0, "easting {}", x);
        assert!((y - 2_044_134.9).abs() < 1.0, "northing {}", y);
    }

    #[test]
    fn easting_is_symmetric_about_central_meridian() {
        let (west, _) = latlon_to_utm(18.0, -64.0, 20);
        let (east, _) = latlon_to_utm(18.0, -62.0, 20);
        assert!(((west - 500_000.0) + (east - 500_000.0)).abs() < 1e-6);
    }
}
