//! Geodesics on an ellipsoid of revolution.
//!
//! Solves the direct problem (start point, azimuth and distance to end
//! point) and the inverse problem (two points to distance and
//! azimuths), and accumulates the perimeter and area of polygons whose
//! edges are shortest geodesics.  The algorithms are Karney's: series
//! expansions on an auxiliary sphere, exact to round-off for
//! |flattening| < 1/50 and usable well beyond.
//!
//! ```
//! use geodesic::Ellipsoid;
//!
//! let g = Ellipsoid::wgs84();
//! // JFK to LHR
//! let (s12, azi1, _azi2) = g.inverse(40.64, -73.78, 51.47, -0.46);
//! assert!(s12 > 5.5e6 && s12 < 5.6e6);
//!
//! let (lat2, lon2, _) = g.direct(40.64, -73.78, azi1, s12);
//! assert!((lat2 - 51.47).abs() < 1e-9);
//! assert!((lon2 + 0.46).abs() < 1e-9);
//! ```

pub mod accumulator;
pub mod angles;
pub mod caps;
pub mod ellipsoid;
pub mod error;
pub mod geodesic;
pub mod line;
pub mod polygon;
mod series;

pub use caps::Caps;
pub use ellipsoid::Ellipsoid;
pub use error::GeodesicError;
pub use geodesic::InverseSolution;
pub use line::{GeodesicLine, Position};
pub use polygon::{polygon_area, PolygonArea, PolygonResult};
