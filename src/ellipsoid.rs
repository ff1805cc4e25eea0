//! Reference ellipsoid parameters and the per-ellipsoid series tables.

use crate::error::GeodesicError;
use crate::series::{a3_coeff, a3f, c3_coeff, c3f, c4_coeff, c4f, GEODESIC_ORDER, N_C3X, N_C4X};

/// sqrt(f64::EPSILON), the tight convergence threshold of the inverse
/// solver; also seeds the short-line tolerance below.
pub(crate) const TOL2: f64 = 1.4901161193847656e-8;

/// Reference ellipsoid of revolution, with the derived constants and
/// precomputed series-coefficient tables the geodesic solvers need.
///
/// Immutable once built; safe to share read-only between any number of
/// lines and polygon accumulators.
#[derive(Clone, Copy, Debug)]
pub struct Ellipsoid {
    /// Semi-major (equatorial) axis, in a linear unit (metres by
    /// convention); all distances are returned in the same unit.
    pub a: f64,
    /// Flattening (dimensionless); zero for a sphere, negative for a
    /// prolate ellipsoid.
    pub f: f64,
    /// Semi-minor axis: a * (1 - f)
    pub b: f64,
    /// First eccentricity squared: f * (2 - f)
    pub e2: f64,
    /// Third flattening: f / (2 - f)
    pub n: f64,
    /// 1 - f
    pub(crate) f1: f64,
    /// Second eccentricity squared: e2 / (1 - e2)
    pub(crate) ep2: f64,
    /// Authalic radius squared.
    pub(crate) c2: f64,
    /// Arc-length threshold below which the auxiliary-sphere short-line
    /// estimate is accepted without iteration.
    pub(crate) etol2: f64,
    pub(crate) a3x: [f64; GEODESIC_ORDER],
    pub(crate) c3x: [f64; N_C3X],
    pub(crate) c4x: [f64; N_C4X],
}

impl Ellipsoid {
    /// Build an ellipsoid from the equatorial radius `a` and flattening
    /// `f`.
    ///
    /// Preconditions `a > 0` and `f < 1` are not checked here; violating
    /// them yields non-finite results downstream, never a panic.  Use
    /// [`Ellipsoid::try_new`] for a validating constructor.
    pub fn new(a: f64, f: f64) -> Self {
        let f1 = 1.0 - f;
        let e2 = f * (2.0 - f);
        let ep2 = e2 / (f1 * f1);
        let n = f / (2.0 - f);
        let b = a * f1;
        // Authalic radius squared, in closed form.  The atanh/atan split
        // covers oblate vs prolate; e2 = 0 is the spherical limit.
        let c2 = (a * a
            + b * b
                * (if e2 == 0.0 {
                    1.0
                } else {
                    (if e2 > 0.0 {
                        e2.sqrt().atanh()
                    } else {
                        (-e2).sqrt().atan()
                    }) / e2.abs().sqrt()
                }))
            / 2.0;
        // The sig12 threshold for "really short" lines.  The relative
        // error of the auxiliary-sphere estimate is about
        // sig12^2 * |f| / 2; setting that to epsilon and folding in a
        // safety factor of 0.1 gives this tolerance.  max(0.001, |f|)
        // stops it growing without bound in the nearly spherical case.
        let etol2 =
            0.1 * TOL2 / (f.abs().max(0.001) * (1.0 - f / 2.0).min(1.0) / 2.0).sqrt();
        Self {
            a,
            f,
            b,
            e2,
            n,
            f1,
            ep2,
            c2,
            etol2,
            a3x: a3_coeff(n),
            c3x: c3_coeff(n),
            c4x: c4_coeff(n),
        }
    }

    /// Validating constructor: rejects non-finite or non-positive `a`
    /// and `f >= 1`.
    pub fn try_new(a: f64, f: f64) -> Result<Self, GeodesicError> {
        if !(a.is_finite() && a > 0.0) {
            return Err(GeodesicError::InvalidEllipsoid(format!(
                "equatorial radius {a} is not positive"
            )));
        }
        if !(f.is_finite() && f < 1.0) {
            return Err(GeodesicError::InvalidEllipsoid(format!(
                "flattening {f} is not less than 1"
            )));
        }
        Ok(Self::new(a, f))
    }

    /// The WGS84 ellipsoid.
    pub fn wgs84() -> Self {
        Self::new(6_378_137.0, 1.0 / 298.257_223_563)
    }

    /// The GRS80 ellipsoid.
    pub fn grs80() -> Self {
        Self::new(6_378_137.0, 1.0 / 298.257_222_101)
    }

    /// First eccentricity.
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }

    /// Radius of the sphere with the same surface area.
    pub fn authalic_radius(&self) -> f64 {
        self.c2.sqrt()
    }

    /// Total surface area of the ellipsoid, in units of a².
    pub fn area(&self) -> f64 {
        4.0 * std::f64::consts::PI * self.c2
    }

    /// A3 evaluated at the series parameter `eps`.
    pub(crate) fn a3f(&self, eps: f64) -> f64 {
        a3f(&self.a3x, eps)
    }

    /// C3 coefficients at `eps`; fills c[1..=5].
    pub(crate) fn c3f(&self, eps: f64, c: &mut [f64; GEODESIC_ORDER + 1]) {
        c3f(&self.c3x, eps, c)
    }

    /// C4 coefficients at `eps`; fills c[0..=5].
    pub(crate) fn c4f(&self, eps: f64, c: &mut [f64; GEODESIC_ORDER]) {
        c4f(&self.c4x, eps, c)
    }

    /// The series parameter eps for a given k² = calp0² * ep2.
    pub(crate) fn eps_from_k2(k2: f64) -> f64 {
        k2 / (2.0 * (1.0 + (1.0 + k2).sqrt()) + k2)
    }
}
