//! Perimeter and area of geodesic polygons.
//!
//! Vertices are fed in one at a time; edge lengths and the area
//! integrals are folded into compensated sums, so polygons with millions
//! of vertices stay accurate.  The accumulated area is the sum of the
//! per-edge integrals plus a multiple of the ellipsoid area fixed by the
//! number of prime-meridian crossings, reduced at the end to the chosen
//! canonical range.

use std::f64::consts::PI;

use crate::accumulator::Accumulator;
use crate::angles::{ang_diff, ang_normalize, remainder};
use crate::caps::Caps;
use crate::ellipsoid::Ellipsoid;

/// The perimeter and area of the polygon so far.
#[derive(Clone, Copy, Debug)]
pub struct PolygonResult {
    /// Number of vertices.
    pub num: usize,
    /// Perimeter (polyline: total length).
    pub perimeter: f64,
    /// Enclosed area; `None` in polyline mode.
    pub area: Option<f64>,
}

/// Accumulates the perimeter and area of a polygon whose edges are
/// shortest geodesics between consecutive vertices.
///
/// In polyline mode only lengths are accumulated and no closing edge is
/// assumed.
#[derive(Clone, Copy, Debug)]
pub struct PolygonArea<'a> {
    g: &'a Ellipsoid,
    polyline: bool,
    /// Full area of the ellipsoid.
    area0: f64,
    perimeter: Accumulator,
    area: Accumulator,
    /// Signed count of prime-meridian crossings.
    crossings: i32,
    num: usize,
    lat0: f64,
    lon0: f64,
    lat: f64,
    lon: f64,
}

/// Crossing of the prime meridian by the shortest-path edge from `lon1`
/// to `lon2`: +1 eastwards, -1 westwards, 0 otherwise.
fn transit(lon1: f64, lon2: f64) -> i32 {
    // compute lon12 the same way as the inverse problem does
    let (lon12, _) = ang_diff(lon1, lon2);
    let lon1 = ang_normalize(lon1);
    let lon2 = ang_normalize(lon2);
    // Treat 0 as negative in these tests; this balances +/-180 being
    // treated as positive.
    if lon12 > 0.0 && ((lon1 < 0.0 && lon2 >= 0.0) || (lon1 > 0.0 && lon2 == 0.0)) {
        1
    } else if lon12 < 0.0 && lon1 >= 0.0 && lon2 < 0.0 {
        -1
    } else {
        0
    }
}

/// Like [`transit`] for unrolled longitudes: the exact parity of
/// floor(lon2 / 360) - floor(lon1 / 360).  Only the parity of the
/// crossing count matters for the area reduction.
fn transit_direct(lon1: f64, lon2: f64) -> i32 {
    let lon1 = remainder(lon1, 720.0);
    let lon2 = remainder(lon2, 720.0);
    (if (0.0..360.0).contains(&lon2) { 0 } else { 1 })
        - (if (0.0..360.0).contains(&lon1) { 0 } else { 1 })
}

impl<'a> PolygonArea<'a> {
    /// A new, empty polygon (or polyline) on the given ellipsoid.
    pub fn new(g: &'a Ellipsoid, polyline: bool) -> Self {
        PolygonArea {
            g,
            polyline,
            area0: 4.0 * PI * g.c2,
            perimeter: Accumulator::new(),
            area: Accumulator::new(),
            crossings: 0,
            num: 0,
            lat0: f64::NAN,
            lon0: f64::NAN,
            lat: f64::NAN,
            lon: f64::NAN,
        }
    }

    /// Discard all vertices, keeping the ellipsoid and mode.
    pub fn clear(&mut self) {
        self.perimeter = Accumulator::new();
        self.area = Accumulator::new();
        self.crossings = 0;
        self.num = 0;
        self.lat0 = f64::NAN;
        self.lon0 = f64::NAN;
        self.lat = f64::NAN;
        self.lon = f64::NAN;
    }

    /// Number of vertices added so far.
    pub fn num(&self) -> usize {
        self.num
    }

    /// Append a vertex.
    pub fn add_point(&mut self, lat: f64, lon: f64) {
        if self.num == 0 {
            self.lat0 = lat;
            self.lat = lat;
            self.lon0 = lon;
            self.lon = lon;
        } else {
            let mask = Caps::DISTANCE
                | if self.polyline {
                    Caps::NONE
                } else {
                    Caps::AREA
                };
            let r = self.g.gen_inverse(self.lat, self.lon, lat, lon, mask);
            self.perimeter = self.perimeter.add(r.s12.unwrap_or(f64::NAN));
            if !self.polyline {
                self.area = self.area.add(r.area12.unwrap_or(f64::NAN));
                self.crossings += transit(self.lon, lon);
            }
            self.lat = lat;
            self.lon = lon;
        }
        self.num += 1;
    }

    /// Append a vertex by azimuth and distance from the previous one.
    /// Ignored until a first vertex has been added with
    /// [`PolygonArea::add_point`].
    pub fn add_edge(&mut self, azi: f64, s: f64) {
        if self.num == 0 {
            return;
        }
        let mask = Caps::LATITUDE
            | Caps::LONGITUDE
            | Caps::LONG_UNROLL
            | if self.polyline {
                Caps::NONE
            } else {
                Caps::AREA
            };
        // unrolled longitude to count the meridian crossings exactly
        let p = self.g.gen_direct(self.lat, self.lon, azi, false, s, mask);
        self.perimeter = self.perimeter.add(s);
        if !self.polyline {
            self.area = self.area.add(p.area12.unwrap_or(f64::NAN));
            self.crossings += transit_direct(self.lon, p.lon2);
        }
        self.lat = p.lat2;
        self.lon = p.lon2;
        self.num += 1;
    }

    /// Close the polygon with an edge back to the first vertex and
    /// return the totals.  The accumulated state is untouched; more
    /// vertices may be added afterwards.
    ///
    /// With `reverse` a clockwise traversal counts as positive.  With
    /// `sign` the area is returned in (-area0/2, area0/2], picking the
    /// smaller of the two interpretations of the boundary; otherwise it
    /// lands in [0, area0).
    pub fn compute(&self, reverse: bool, sign: bool) -> PolygonResult {
        if self.num < 2 {
            return PolygonResult {
                num: self.num,
                perimeter: 0.0,
                area: if self.polyline { None } else { Some(0.0) },
            };
        }
        if self.polyline {
            return PolygonResult {
                num: self.num,
                perimeter: self.perimeter.value(),
                area: None,
            };
        }
        let r = self.g.gen_inverse(
            self.lat,
            self.lon,
            self.lat0,
            self.lon0,
            Caps::DISTANCE | Caps::AREA,
        );
        let perimeter = self.perimeter.sum(r.s12.unwrap_or(f64::NAN));
        let area = self.area.add(r.area12.unwrap_or(f64::NAN));
        let crossings = self.crossings + transit(self.lon, self.lon0);
        PolygonResult {
            num: self.num,
            perimeter,
            area: Some(self.reduce_area(area, crossings, reverse, sign)),
        }
    }

    /// The totals as if the vertex `(lat, lon)` were added and the
    /// polygon closed, without changing any state.
    pub fn test_point(&self, lat: f64, lon: f64, reverse: bool, sign: bool) -> PolygonResult {
        let num = self.num + 1;
        if num == 1 {
            return PolygonResult {
                num,
                perimeter: 0.0,
                area: if self.polyline { None } else { Some(0.0) },
            };
        }
        let mut perimeter = self.perimeter;
        let mut area = self.area;
        let mut crossings = self.crossings;
        let legs: usize = if self.polyline { 1 } else { 2 };
        for i in 0..legs {
            let (lat1, lon1, lat2, lon2) = if i == 0 {
                (self.lat, self.lon, lat, lon)
            } else {
                (lat, lon, self.lat0, self.lon0)
            };
            let mask = Caps::DISTANCE
                | if self.polyline {
                    Caps::NONE
                } else {
                    Caps::AREA
                };
            let r = self.g.gen_inverse(lat1, lon1, lat2, lon2, mask);
            perimeter = perimeter.add(r.s12.unwrap_or(f64::NAN));
            if !self.polyline {
                area = area.add(r.area12.unwrap_or(f64::NAN));
                crossings += transit(lon1, lon2);
            }
        }
        if self.polyline {
            return PolygonResult {
                num,
                perimeter: perimeter.value(),
                area: None,
            };
        }
        PolygonResult {
            num,
            perimeter: perimeter.value(),
            area: Some(self.reduce_area(area, crossings, reverse, sign)),
        }
    }

    /// The totals as if an edge `(azi, s)` were added and the polygon
    /// closed, without changing any state.  Returns `None` when no
    /// starting vertex has been set.
    pub fn test_edge(&self, azi: f64, s: f64, reverse: bool, sign: bool) -> Option<PolygonResult> {
        if self.num == 0 {
            return None;
        }
        let num = self.num + 1;
        let mut perimeter = self.perimeter.add(s);
        if self.polyline {
            return Some(PolygonResult {
                num,
                perimeter: perimeter.value(),
                area: None,
            });
        }
        let mut area = self.area;
        let mut crossings = self.crossings;

        let p = self.g.gen_direct(
            self.lat,
            self.lon,
            azi,
            false,
            s,
            Caps::LATITUDE | Caps::LONGITUDE | Caps::LONG_UNROLL | Caps::AREA,
        );
        area = area.add(p.area12.unwrap_or(f64::NAN));
        crossings += transit_direct(self.lon, p.lon2);
        let lon2 = ang_normalize(p.lon2);

        let r = self.g.gen_inverse(
            p.lat2,
            lon2,
            self.lat0,
            self.lon0,
            Caps::DISTANCE | Caps::AREA,
        );
        perimeter = perimeter.add(r.s12.unwrap_or(f64::NAN));
        area = area.add(r.area12.unwrap_or(f64::NAN));
        crossings += transit(lon2, self.lon0);

        Some(PolygonResult {
            num,
            perimeter: perimeter.value(),
            area: Some(self.reduce_area(area, crossings, reverse, sign)),
        })
    }

    /// Fold the crossing count into the accumulated area and reduce it
    /// to the canonical range.
    fn reduce_area(&self, area: Accumulator, crossings: i32, reverse: bool, sign: bool) -> f64 {
        let area0 = self.area0;
        let mut area = area.remainder(area0);
        if crossings & 1 != 0 {
            // an odd number of crossings encloses a pole
            area = area.add((if area.value() < 0.0 { 1.0 } else { -1.0 }) * area0 / 2.0);
        }
        // the integrals accumulate clockwise-positive; the default
        // convention is counter-clockwise-positive
        if !reverse {
            area = area.negate();
        }
        if sign {
            // put the area in (-area0/2, area0/2]
            if area.value() > area0 / 2.0 {
                area = area.add(-area0);
            } else if area.value() <= -area0 / 2.0 {
                area = area.add(area0);
            }
        } else {
            // put the area in [0, area0)
            if area.value() >= area0 {
                area = area.add(-area0);
            } else if area.value() < 0.0 {
                area = area.add(area0);
            }
        }
        0.0 + area.value()
    }
}

/// One-shot perimeter and area of a closed polygon given as
/// `(lat, lon)` vertices.
pub fn polygon_area(g: &Ellipsoid, vertices: &[(f64, f64)]) -> PolygonResult {
    let mut p = PolygonArea::new(g, false);
    for &(lat, lon) in vertices {
        p.add_point(lat, lon);
    }
    p.compute(false, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wgs84() -> Ellipsoid {
        Ellipsoid::wgs84()
    }

    #[test]
    fn test_octant_is_eighth_of_ellipsoid() {
        let g = wgs84();
        let r = polygon_area(&g, &[(0.0, 0.0), (0.0, 90.0), (90.0, 0.0)]);
        assert_eq!(r.num, 3);
        assert_relative_eq!(r.area.unwrap(), g.area() / 8.0, max_relative = 1e-12);
    }

    #[test]
    fn test_reversed_order_negates_area() {
        let g = wgs84();
        let ccw = polygon_area(&g, &[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        let cw = polygon_area(&g, &[(10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]);
        assert_relative_eq!(
            ccw.area.unwrap(),
            -cw.area.unwrap(),
            max_relative = 1e-12
        );
        assert_relative_eq!(ccw.perimeter, cw.perimeter, max_relative = 1e-14);
    }

    #[test]
    fn test_small_square_matches_planar_estimate() {
        // a 1-degree square near the equator; the trapezoid estimate
        // with the meridian arc and two parallels is good to ~1e-4
        let g = wgs84();
        let r = polygon_area(&g, &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let (s_meridian, _, _) = g.inverse(0.0, 0.0, 1.0, 0.0);
        let (s_bottom, _, _) = g.inverse(0.0, 0.0, 0.0, 1.0);
        let (s_top, _, _) = g.inverse(1.0, 0.0, 1.0, 1.0);
        let planar = s_meridian * (s_bottom + s_top) / 2.0;
        assert_relative_eq!(r.area.unwrap(), planar, max_relative = 1e-4);
    }

    #[test]
    fn test_sign_convention_ranges() {
        let g = wgs84();
        let mut p = PolygonArea::new(&g, false);
        // clockwise when viewed from outside: negative with sign=true
        for &(lat, lon) in &[(10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)] {
            p.add_point(lat, lon);
        }
        let signed = p.compute(false, true);
        let unsigned = p.compute(false, false);
        assert!(signed.area.unwrap() < 0.0);
        assert_relative_eq!(
            unsigned.area.unwrap(),
            signed.area.unwrap() + g.area(),
            max_relative = 1e-12
        );
        // reverse flips the convention
        let reversed = p.compute(true, true);
        assert_relative_eq!(
            reversed.area.unwrap(),
            -signed.area.unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_polyline_length_only() {
        let g = wgs84();
        let mut p = PolygonArea::new(&g, true);
        p.add_point(0.0, 0.0);
        p.add_point(0.0, 1.0);
        p.add_point(1.0, 1.0);
        let r = p.compute(false, true);
        assert!(r.area.is_none());
        let (s1, _, _) = g.inverse(0.0, 0.0, 0.0, 1.0);
        let (s2, _, _) = g.inverse(0.0, 1.0, 1.0, 1.0);
        assert_relative_eq!(r.perimeter, s1 + s2, max_relative = 1e-14);
    }

    #[test]
    fn test_test_point_matches_add_point() {
        let g = wgs84();
        let mut p = PolygonArea::new(&g, false);
        p.add_point(0.0, 0.0);
        p.add_point(0.0, 10.0);
        p.add_point(10.0, 10.0);
        let probe = p.test_point(10.0, 0.0, false, true);
        p.add_point(10.0, 0.0);
        let actual = p.compute(false, true);
        assert_eq!(probe.num, actual.num);
        assert_relative_eq!(probe.perimeter, actual.perimeter, max_relative = 1e-14);
        assert_relative_eq!(
            probe.area.unwrap(),
            actual.area.unwrap(),
            max_relative = 1e-14
        );
    }

    #[test]
    fn test_test_edge_matches_add_edge() {
        let g = wgs84();
        let mut p = PolygonArea::new(&g, false);
        p.add_point(0.0, 0.0);
        p.add_point(0.0, 10.0);
        p.add_point(10.0, 10.0);
        // edge heading west along the parallel-ish direction
        let r = g.gen_inverse(10.0, 10.0, 10.0, 0.0, Caps::DISTANCE | Caps::AZIMUTH);
        let probe = p
            .test_edge(r.azi1, r.s12.unwrap(), false, true)
            .unwrap();
        p.add_edge(r.azi1, r.s12.unwrap());
        let actual = p.compute(false, true);
        assert_eq!(probe.num, actual.num);
        assert_relative_eq!(probe.perimeter, actual.perimeter, max_relative = 1e-9);
        assert_relative_eq!(
            probe.area.unwrap(),
            actual.area.unwrap(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_add_edge_matches_add_point() {
        let g = wgs84();
        let mut by_point = PolygonArea::new(&g, false);
        for &(lat, lon) in &[(5.0, 5.0), (5.0, 15.0), (15.0, 15.0)] {
            by_point.add_point(lat, lon);
        }
        let mut by_edge = PolygonArea::new(&g, false);
        by_edge.add_point(5.0, 5.0);
        for &(lat, lon) in &[(5.0, 15.0), (15.0, 15.0)] {
            let r = g.gen_inverse(
                by_edge.lat,
                by_edge.lon,
                lat,
                lon,
                Caps::DISTANCE | Caps::AZIMUTH,
            );
            by_edge.add_edge(r.azi1, r.s12.unwrap());
        }
        let a = by_point.compute(false, true);
        let b = by_edge.compute(false, true);
        assert_relative_eq!(a.perimeter, b.perimeter, max_relative = 1e-9);
        assert_relative_eq!(a.area.unwrap(), b.area.unwrap(), max_relative = 1e-9);
    }

    #[test]
    fn test_pole_enclosing_polygon() {
        // a triangle of meridian-ish edges around the north pole; an odd
        // crossing count kicks in the hemisphere correction
        let g = wgs84();
        let r = polygon_area(&g, &[(80.0, 0.0), (80.0, 120.0), (80.0, -120.0)]);
        assert!(r.area.unwrap() > 0.0);
        // smaller than the polar cap above 80N
        let cap_estimate = 0.02 * g.area();
        assert!(r.area.unwrap() < cap_estimate);
    }

    #[test]
    fn test_clear_resets() {
        let g = wgs84();
        let mut p = PolygonArea::new(&g, false);
        p.add_point(0.0, 0.0);
        p.add_point(0.0, 10.0);
        p.clear();
        assert_eq!(p.num(), 0);
        let r = p.compute(false, true);
        assert_eq!(r.num, 0);
        assert_eq!(r.perimeter, 0.0);
        assert_eq!(r.area.unwrap(), 0.0);
    }

    #[test]
    fn test_transit_counts() {
        assert_eq!(transit(-10.0, 10.0), 1);
        assert_eq!(transit(10.0, -10.0), -1);
        assert_eq!(transit(10.0, 20.0), 0);
        // antimeridian crossing is not a prime-meridian transit
        assert_eq!(transit(170.0, -170.0), 0);
        // parity of the floor(lon / 360) difference
        assert_eq!(transit_direct(-10.0, 10.0), -1);
        assert_eq!(transit_direct(350.0, 370.0), 1);
        assert_eq!(transit_direct(10.0, 370.0), 1);
        assert_eq!(transit_direct(0.0, 720.0), 0);
    }
}
