//! A geodesic line: a starting point and azimuth with all series state
//! evaluated once, supporting cheap repeated position queries at
//! arbitrary distance or arc length.

use crate::angles::{ang_normalize, ang_round, atan2d, lat_fix, norm2, sincosd, TINY};
use crate::caps::Caps;
use crate::ellipsoid::Ellipsoid;
use crate::series::{a1m1, a2m1, c1, c1p, c2, sin_cos_series, GEODESIC_ORDER};

const NC: usize = GEODESIC_ORDER + 1;

/// The result of a position query along a geodesic.
///
/// `lat2`, `lon2`, `azi2` are NaN unless the corresponding output was
/// requested (and permitted by the line's capabilities); the optional
/// extras are `Some` exactly when requested.
#[derive(Clone, Copy, Debug)]
pub struct Position {
    /// Latitude of the end point (degrees).
    pub lat2: f64,
    /// Longitude of the end point (degrees).
    pub lon2: f64,
    /// Forward azimuth at the end point (degrees).
    pub azi2: f64,
    /// Arc length on the auxiliary sphere (degrees).
    pub a12: f64,
    /// Distance between the points.
    pub s12: Option<f64>,
    /// Reduced length of the geodesic.
    pub m12: Option<f64>,
    /// Geodesic scale M12 (end-point displacement per unit displacement
    /// at the start).
    pub scale12: Option<f64>,
    /// Geodesic scale M21.
    pub scale21: Option<f64>,
    /// Area under the geodesic segment, S12.
    pub area12: Option<f64>,
}

impl Position {
    pub(crate) fn nan() -> Self {
        Position {
            lat2: f64::NAN,
            lon2: f64::NAN,
            azi2: f64::NAN,
            a12: f64::NAN,
            s12: None,
            m12: None,
            scale12: None,
            scale21: None,
            area12: None,
        }
    }
}

/// A geodesic on a reference ellipsoid, pinned at a starting point and
/// azimuth.
///
/// Construction evaluates only the coefficient series implied by the
/// requested capabilities; asking a position query for an output the
/// line was not built for yields NaN / `None`, never a panic.
#[derive(Clone, Copy, Debug)]
pub struct GeodesicLine {
    // scalar constants copied from the ellipsoid
    a: f64,
    f: f64,
    b: f64,
    c2: f64,
    f1: f64,
    caps: Caps,
    /// Starting latitude (degrees).
    pub lat1: f64,
    /// Starting longitude (degrees).
    pub lon1: f64,
    /// Azimuth at the starting point (degrees).
    pub azi1: f64,
    salp1: f64,
    calp1: f64,
    // Clairaut constants: azimuth at the northward equator crossing
    salp0: f64,
    calp0: f64,
    // auxiliary arc and longitude positions of point 1
    ssig1: f64,
    csig1: f64,
    dn1: f64,
    stau1: f64,
    ctau1: f64,
    somg1: f64,
    comg1: f64,
    k2: f64,
    a1m1: f64,
    a2m1: f64,
    a3c: f64,
    b11: f64,
    b21: f64,
    b31: f64,
    a4: f64,
    b41: f64,
    c1a: [f64; NC],
    c1pa: [f64; NC],
    c2a: [f64; NC],
    c3a: [f64; NC],
    c4a: [f64; GEODESIC_ORDER],
    s13: f64,
    a13: f64,
}

impl GeodesicLine {
    /// A line from a point and azimuth.  An empty `caps` defaults to
    /// distance-in plus longitude; latitude, azimuth and longitude
    /// unrolling are always enabled.
    pub fn new(g: &Ellipsoid, lat1: f64, lon1: f64, azi1: f64, caps: Caps) -> Self {
        let azi1 = ang_normalize(azi1);
        // AngRound stops a horizontal azimuth picking up a spurious
        // nonzero Clairaut constant.
        let (salp1, calp1) = sincosd(ang_round(azi1));
        Self::new_int(g, lat1, lon1, azi1, salp1, calp1, caps)
    }

    /// Internal constructor taking a precomputed azimuth sine/cosine
    /// pair (used by the inverse solver, which already has them).
    pub(crate) fn new_int(
        g: &Ellipsoid,
        lat1: f64,
        lon1: f64,
        azi1: f64,
        salp1: f64,
        calp1: f64,
        caps: Caps,
    ) -> Self {
        let caps = (if caps.is_empty() {
            Caps::DISTANCE_IN | Caps::LONGITUDE
        } else {
            caps
        }) | Caps::LATITUDE
            | Caps::AZIMUTH
            | Caps::LONG_UNROLL;

        let lat1 = lat_fix(lat1);

        let (mut sbet1, cbet1) = sincosd(ang_round(lat1));
        sbet1 *= g.f1;
        let (sbet1, cbet1) = norm2(sbet1, cbet1);
        // cbet1 = +tiny at the poles
        let cbet1 = cbet1.max(TINY);
        let dn1 = (1.0 + g.ep2 * sbet1 * sbet1).sqrt();

        // Clairaut: sin(alp1) * cos(bet1) = sin(alp0); the hypot form
        // for calp0 behaves better when salp1 = 0.
        let salp0 = salp1 * cbet1;
        let calp0 = calp1.hypot(salp1 * sbet1);

        // tan(bet1) = tan(sig1) * cos(alp1); sig = 0 is the nearest
        // northward equator crossing.  tan(omg1) = sin(alp0) * tan(sig1);
        // quadrants of sig and omg coincide, and cbet1 = +tiny removes
        // the atan2(0,0) ambiguity at the poles.
        let ssig1 = sbet1;
        let somg1 = salp0 * sbet1;
        let csig1 = if sbet1 != 0.0 || calp1 != 0.0 {
            cbet1 * calp1
        } else {
            1.0
        };
        let comg1 = csig1;
        // (somg1, comg1) deliberately left unnormalized
        let (ssig1, csig1) = norm2(ssig1, csig1);

        let k2 = calp0 * calp0 * g.ep2;
        let eps = Ellipsoid::eps_from_k2(k2);

        let mut line = GeodesicLine {
            a: g.a,
            f: g.f,
            b: g.b,
            c2: g.c2,
            f1: g.f1,
            caps,
            lat1,
            lon1,
            azi1,
            salp1,
            calp1,
            salp0,
            calp0,
            ssig1,
            csig1,
            dn1,
            stau1: 0.0,
            ctau1: 0.0,
            somg1,
            comg1,
            k2,
            a1m1: 0.0,
            a2m1: 0.0,
            a3c: 0.0,
            b11: 0.0,
            b21: 0.0,
            b31: 0.0,
            a4: 0.0,
            b41: 0.0,
            c1a: [0.0; NC],
            c1pa: [0.0; NC],
            c2a: [0.0; NC],
            c3a: [0.0; NC],
            c4a: [0.0; GEODESIC_ORDER],
            s13: f64::NAN,
            a13: f64::NAN,
        };

        if caps.intersects(Caps::C1) {
            line.a1m1 = a1m1(eps);
            c1(eps, &mut line.c1a);
            line.b11 = sin_cos_series(true, ssig1, csig1, &line.c1a[1..]);
            let (s, c) = line.b11.sin_cos();
            // tau1 = sig1 + B11
            line.stau1 = ssig1 * c + csig1 * s;
            line.ctau1 = csig1 * c - ssig1 * s;
        }

        if caps.intersects(Caps::C1P) {
            c1p(eps, &mut line.c1pa);
        }

        if caps.intersects(Caps::C2) {
            line.a2m1 = a2m1(eps);
            c2(eps, &mut line.c2a);
            line.b21 = sin_cos_series(true, ssig1, csig1, &line.c2a[1..]);
        }

        if caps.intersects(Caps::C3) {
            g.c3f(eps, &mut line.c3a);
            line.a3c = -g.f * salp0 * g.a3f(eps);
            line.b31 = sin_cos_series(true, ssig1, csig1, &line.c3a[1..GEODESIC_ORDER]);
        }

        if caps.intersects(Caps::C4) {
            g.c4f(eps, &mut line.c4a);
            // multiplier = a^2 * e^2 * cos(alpha0) * sin(alpha0)
            line.a4 = g.a * g.a * calp0 * salp0 * g.e2;
            line.b41 = sin_cos_series(false, ssig1, csig1, &line.c4a);
        }

        line
    }

    /// The capabilities this line was built with.
    pub fn caps(&self) -> Caps {
        self.caps
    }

    /// The cached target distance, if one has been set.
    pub fn s13(&self) -> f64 {
        self.s13
    }

    /// The cached target arc length, if one has been set.
    pub fn a13(&self) -> f64 {
        self.a13
    }

    /// Fix the target point by distance from point 1.
    pub fn set_distance(&mut self, s13: f64) {
        self.s13 = s13;
        self.a13 = self.gen_position(false, s13, Caps::NONE).a12;
    }

    /// Fix the target point by arc length from point 1.
    pub fn set_arc(&mut self, a13: f64) {
        self.a13 = a13;
        self.s13 = self
            .gen_position(true, a13, Caps::DISTANCE)
            .s12
            .unwrap_or(f64::NAN);
    }

    /// End point and azimuth at distance `s12` from point 1.
    pub fn position(&self, s12: f64) -> (f64, f64, f64) {
        let p = self.gen_position(
            false,
            s12,
            Caps::LATITUDE | Caps::LONGITUDE | Caps::AZIMUTH,
        );
        (p.lat2, p.lon2, p.azi2)
    }

    /// End point and azimuth at arc length `a12` (degrees) from point 1.
    pub fn arc_position(&self, a12: f64) -> (f64, f64, f64) {
        let p = self.gen_position(
            true,
            a12,
            Caps::LATITUDE | Caps::LONGITUDE | Caps::AZIMUTH,
        );
        (p.lat2, p.lon2, p.azi2)
    }

    /// General position query.
    ///
    /// With `arcmode` the input is the arc length in degrees; otherwise
    /// it is the distance, which requires the line to have been built
    /// with [`Caps::DISTANCE_IN`] (if it was not, every output is NaN).
    /// `outmask` selects the outputs; include [`Caps::LONG_UNROLL`] to
    /// keep the revolution count in `lon2`.
    pub fn gen_position(&self, arcmode: bool, s12_a12: f64, outmask: Caps) -> Position {
        let outmask = outmask & self.caps & (Caps::OUT_ALL | Caps::LONG_UNROLL);
        let mut pos = Position::nan();
        if !(arcmode || self.caps.intersects(Caps::DISTANCE_IN.out_bits())) {
            // distance input on a line without distance-in capability
            return pos;
        }

        let mut b12 = 0.0;
        let mut ab1 = 0.0;
        let mut sig12;
        let mut ssig12;
        let mut csig12;
        if arcmode {
            sig12 = s12_a12.to_radians();
            let (s, c) = sincosd(s12_a12);
            ssig12 = s;
            csig12 = c;
        } else {
            // Invert the distance series: tau12 is the first guess for
            // the arc, refined through the reverted C1' series.
            let tau12 = s12_a12 / (self.b * (1.0 + self.a1m1));
            let (s, c) = tau12.sin_cos();
            // tau2 = tau1 + tau12
            b12 = -sin_cos_series(
                true,
                self.stau1 * c + self.ctau1 * s,
                self.ctau1 * c - self.stau1 * s,
                &self.c1pa[1..],
            );
            sig12 = tau12 - (b12 - self.b11);
            ssig12 = sig12.sin();
            csig12 = sig12.cos();
            if self.f.abs() > 0.01 {
                // The reverted series alone is not accurate enough for
                // strongly flattened ellipsoids; one Newton step on the
                // forward series fixes that.
                let ssig2 = self.ssig1 * csig12 + self.csig1 * ssig12;
                let csig2 = self.csig1 * csig12 - self.ssig1 * ssig12;
                b12 = sin_cos_series(true, ssig2, csig2, &self.c1a[1..]);
                let serr =
                    (1.0 + self.a1m1) * (sig12 + (b12 - self.b11)) - s12_a12 / self.b;
                sig12 -= serr / (1.0 + self.k2 * ssig2 * ssig2).sqrt();
                ssig12 = sig12.sin();
                csig12 = sig12.cos();
                // b12 is refreshed below
            }
        }

        // sig2 = sig1 + sig12
        let ssig2 = self.ssig1 * csig12 + self.csig1 * ssig12;
        let mut csig2 = self.csig1 * csig12 - self.ssig1 * ssig12;
        let dn2 = (1.0 + self.k2 * ssig2 * ssig2).sqrt();
        if outmask.intersects(Caps::DISTANCE | Caps::REDUCED_LENGTH | Caps::GEODESIC_SCALE)
        {
            if arcmode || self.f.abs() > 0.01 {
                b12 = sin_cos_series(true, ssig2, csig2, &self.c1a[1..]);
            }
            ab1 = (1.0 + self.a1m1) * (b12 - self.b11);
        }
        // sin(bet2) = cos(alp0) * sin(sig2)
        let sbet2 = self.calp0 * ssig2;
        let mut cbet2 = self.salp0.hypot(self.calp0 * csig2);
        if cbet2 == 0.0 {
            // salp0 = 0 and csig2 = 0: break the degeneracy
            cbet2 = TINY;
            csig2 = TINY;
        }
        // tan(alp0) = cos(sig2) * tan(alp2); no need to normalize
        let salp2 = self.salp0;
        let calp2 = self.calp0 * csig2;

        if outmask.intersects(Caps::DISTANCE) {
            pos.s12 = Some(if arcmode {
                self.b * ((1.0 + self.a1m1) * sig12 + ab1)
            } else {
                s12_a12
            });
        }

        if outmask.intersects(Caps::LONGITUDE) {
            let somg2 = self.salp0 * ssig2;
            let comg2 = csig2; // no need to normalize
            // east-going or west-going?
            let e = (1.0_f64).copysign(self.salp0);
            // omg12 = omg2 - omg1
            let omg12 = if outmask.intersects(Caps::LONG_UNROLL) {
                e * (sig12 - (ssig2.atan2(csig2) - self.ssig1.atan2(self.csig1))
                    + ((e * somg2).atan2(comg2) - (e * self.somg1).atan2(self.comg1)))
            } else {
                (somg2 * self.comg1 - comg2 * self.somg1)
                    .atan2(comg2 * self.comg1 + somg2 * self.somg1)
            };
            let lam12 = omg12
                + self.a3c
                    * (sig12
                        + (sin_cos_series(true, ssig2, csig2, &self.c3a[1..GEODESIC_ORDER])
                            - self.b31));
            let lon12 = lam12.to_degrees();
            pos.lon2 = if outmask.intersects(Caps::LONG_UNROLL) {
                self.lon1 + lon12
            } else {
                ang_normalize(ang_normalize(self.lon1) + ang_normalize(lon12))
            };
        }

        if outmask.intersects(Caps::LATITUDE) {
            pos.lat2 = atan2d(sbet2, self.f1 * cbet2);
        }

        if outmask.intersects(Caps::AZIMUTH) {
            pos.azi2 = atan2d(salp2, calp2);
        }

        if outmask.intersects(Caps::REDUCED_LENGTH | Caps::GEODESIC_SCALE) {
            let b22 = sin_cos_series(true, ssig2, csig2, &self.c2a[1..]);
            let ab2 = (1.0 + self.a2m1) * (b22 - self.b21);
            let j12 = (self.a1m1 - self.a2m1) * sig12 + (ab1 - ab2);
            if outmask.intersects(Caps::REDUCED_LENGTH) {
                // The parenthesization groups (csig1 * ssig2) and
                // (ssig1 * csig2) for accurate cancellation when the
                // points are coincident.
                pos.m12 = Some(
                    self.b
                        * ((dn2 * (self.csig1 * ssig2) - self.dn1 * (self.ssig1 * csig2))
                            - self.csig1 * csig2 * j12),
                );
            }
            if outmask.intersects(Caps::GEODESIC_SCALE) {
                let t = self.k2 * (ssig2 - self.ssig1) * (ssig2 + self.ssig1)
                    / (self.dn1 + dn2);
                pos.scale12 =
                    Some(csig12 + (t * ssig2 - csig2 * j12) * self.ssig1 / self.dn1);
                pos.scale21 =
                    Some(csig12 - (t * self.ssig1 - self.csig1 * j12) * ssig2 / dn2);
            }
        }

        if outmask.intersects(Caps::AREA) {
            let b42 = sin_cos_series(false, ssig2, csig2, &self.c4a);
            let (salp12, calp12);
            if self.calp0 == 0.0 || self.salp0 == 0.0 {
                // alp12 = alp2 - alp1, used in atan2 so no need to
                // normalize
                salp12 = salp2 * self.calp1 - calp2 * self.salp1;
                calp12 = calp2 * self.calp1 + salp2 * self.salp1;
            } else {
                // tan(alp) = tan(alp0) * sec(sig); the identity for
                // csig1 - csig2 avoids cancellation near the equator
                // where csig12 is close to 1.
                salp12 = self.calp0
                    * self.salp0
                    * (if csig12 <= 0.0 {
                        self.csig1 * (1.0 - csig12) + ssig12 * self.ssig1
                    } else {
                        ssig12 * (self.csig1 * ssig12 / (1.0 + csig12) + self.ssig1)
                    });
                calp12 =
                    self.salp0 * self.salp0 + self.calp0 * self.calp0 * self.csig1 * csig2;
            }
            pos.area12 =
                Some(self.c2 * salp12.atan2(calp12) + self.a4 * (b42 - self.b41));
        }

        pos.a12 = if arcmode {
            s12_a12
        } else {
            sig12.to_degrees()
        };
        pos
    }
}
