use geo::{ChamberlainDuquetteArea, Contains, Coord, LineString, Point, Polygon};

use crate::models::{LatLng, Ring};

/// Convert a ring to a `geo` polygon with x = longitude, y = latitude.
pub fn to_geo_polygon(ring: &Ring) -> Polygon<f64> {
    let exterior: LineString<f64> = ring
        .points()
        .iter()
        .map(|p| Coord { x: p.lng, y: p.lat })
        .collect();
    Polygon::new(exterior, vec![])
}

/// Area of a closed ring on the sphere, in square meters.
///
/// Chamberlain-Duquette on the WGS84 equatorial radius, always non-negative
/// regardless of winding order.
pub fn ring_area_sqm(ring: &Ring) -> f64 {
    to_geo_polygon(ring).chamberlain_duquette_unsigned_area()
}

/// Whether `point` falls strictly inside `ring`.
pub fn ring_contains(ring: &Ring, point: LatLng) -> bool {
    to_geo_polygon(ring).contains(&Point::new(point.lng, point.lat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc;

    #[test]
    fn test_one_degree_triangle_at_equator() {
        let ring = Ring::close(&[
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
        ])
        .unwrap();
        let area = ring_area_sqm(&ring);
        // Half of a ~111 km x ~111 km cell
        assert!(area > 6.1e9 && area < 6.3e9, "area = {area}");
    }

    #[test]
    fn test_area_ignores_winding_order() {
        let pts = [
            LatLng::new(43.0, 76.0),
            LatLng::new(43.0, 76.001),
            LatLng::new(43.001, 76.001),
            LatLng::new(43.001, 76.0),
        ];
        let mut reversed = pts;
        reversed.reverse();
        let a = ring_area_sqm(&Ring::close(&pts).unwrap());
        let b = ring_area_sqm(&Ring::close(&reversed).unwrap());
        assert!((a - b).abs() < 1e-6);
        assert!(a > 0.0);
    }

    #[test]
    fn test_synthetic_square_area_is_rooftop_sized() {
        // 0.0002 deg square near Almaty: roughly 22 m x 16 m
        let ring = calc::synthetic_square(LatLng::new(43.238949, 76.889709));
        let area = ring_area_sqm(&ring);
        assert!(area > 300.0 && area < 450.0, "area = {area}");
    }

    #[test]
    fn test_degenerate_ring_has_zero_area() {
        let ring = Ring::close(&[
            LatLng::new(10.0, 10.0),
            LatLng::new(10.0, 10.0),
            LatLng::new(10.0, 10.0),
        ])
        .unwrap();
        assert_eq!(ring_area_sqm(&ring), 0.0);
    }

    #[test]
    fn test_ring_contains() {
        let ring = calc::synthetic_square(LatLng::new(1.0, 2.0));
        assert!(ring_contains(&ring, LatLng::new(1.0, 2.0)));
        assert!(!ring_contains(&ring, LatLng::new(1.001, 2.0)));
    }
}
