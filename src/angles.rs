//! Low-level angle and floating-point helpers (degrees in, degrees out).
//!
//! Everything here is written so that exact inputs give exact answers:
//! sines and cosines are computed after an exact range reduction to
//! [-45, 45] so that multiples of 90 degrees come out as exact 0/±1, and
//! angle differences carry their rounding error alongside the rounded
//! value.  The geodesic solvers rely on these guarantees near the poles,
//! the equator, and the antimeridian.

/// sqrt(f64::MIN_POSITIVE); floor for cosines of reduced latitude at the
/// poles and the smallest representable azimuth sine.
pub(crate) const TINY: f64 = 1.4916681462400413e-154;

/// Error-free transformation of a sum: returns (round(u + v), t) with
/// u + v = round(u + v) + t exactly.
pub fn sum_err(u: f64, v: f64) -> (f64, f64) {
    let s = u + v;
    let mut up = s - v;
    let mut vpp = s - up;
    up -= u;
    vpp -= v;
    let t = if s != 0.0 { 0.0 - (up + vpp) } else { s };
    (s, t)
}

/// IEEE-style remainder: x reduced to [-y/2, y/2].
///
/// `%` on f64 is the exact truncated remainder; folding the result into
/// the symmetric interval adds or subtracts y, which is exact by
/// Sterbenz's lemma.  std provides no IEEE remainder, and this one must
/// stay exact because sub-ulp longitude differences are reconstructed
/// from it.
pub fn remainder(x: f64, y: f64) -> f64 {
    let z = x % y;
    if z < -y / 2.0 {
        z + y
    } else if z <= y / 2.0 {
        z
    } else {
        z - y
    }
}

/// Normalize an angle to (-180, 180]; the ±180 boundary takes the sign
/// of the input.
pub fn ang_normalize(x: f64) -> f64 {
    let y = remainder(x, 360.0);
    if y.abs() == 180.0 {
        (180.0_f64).copysign(x)
    } else {
        y
    }
}

/// Map latitudes with |lat| > 90 to NaN; valid latitudes pass through.
pub fn lat_fix(x: f64) -> f64 {
    if x.abs() > 90.0 {
        f64::NAN
    } else {
        x
    }
}

/// Exact difference of two angles: returns (d, e) where d = round(y - x)
/// reduced to [-180, 180] and e is the rounding error, so y - x = d + e.
///
/// The sign at d = 0 or ±180 is fixed up so that east-going and
/// meridional differences come out as +180 and west-going as -180.
pub fn ang_diff(x: f64, y: f64) -> (f64, f64) {
    let (d, t) = sum_err(remainder(-x, 360.0), remainder(y, 360.0));
    // The second fold cannot push |d| past 360, so one more remainder
    // suffices.
    let (d, t) = sum_err(remainder(d, 360.0), t);
    if d == 0.0 || d.abs() == 180.0 {
        // If t == 0 take the sign from y - x; otherwise d = ±180 and d
        // and t must have opposite signs.
        (d.copysign(if t == 0.0 { y - x } else { -t }), t)
    } else {
        (d, t)
    }
}

/// Snap angles with |x| < 1/16 onto the floating-point grid at 1/16,
/// wiping out anything below that quantum.  This keeps sin(x) exactly zero
/// for inputs that are meant to be zero but picked up rounding noise,
/// e.g. latitudes computed as 90 - (90 - lat).
pub fn ang_round(x: f64) -> f64 {
    const Z: f64 = 1.0 / 16.0;
    let mut y = x.abs();
    let w = Z - y;
    // w > 0 requires y < z; the two-step form forces the rounding.
    if w > 0.0 {
        y = Z - w;
    }
    y.copysign(x)
}

/// Exact range reduction of x (degrees) to [-45, 45] plus a quadrant
/// count.  Both outputs are exact.
fn reduce90(x: f64) -> (f64, i32) {
    let z = remainder(x, 360.0);
    let q = (z / 90.0).round();
    (z - q * 90.0, q as i32)
}

/// Sine and cosine of an angle in degrees, exact at multiples of 90.
pub fn sincosd(x: f64) -> (f64, f64) {
    let (r, q) = reduce90(x);
    let (s, c) = r.to_radians().sin_cos();
    let (mut sinx, cosx) = match q & 3 {
        0 => (s, c),
        1 => (c, -s),
        2 => (-s, -c),
        _ => (-c, s),
    };
    // IEEE 754 special values: cosx = +0 never -0, sinx keeps the sign
    // of the argument at zero.
    let cosx = cosx + 0.0;
    if sinx == 0.0 {
        sinx = sinx.copysign(x);
    }
    (sinx, cosx)
}

/// Like [`sincosd`] but folds a small correction `t` (typically the
/// rounding error from [`ang_diff`]) into the reduced angle before
/// taking the trig functions.
pub fn sincosde(x: f64, t: f64) -> (f64, f64) {
    let (r, q) = reduce90(x);
    let r = ang_round(r + t);
    let (s, c) = r.to_radians().sin_cos();
    let (mut sinx, cosx) = match q & 3 {
        0 => (s, c),
        1 => (c, -s),
        2 => (-s, -c),
        _ => (-c, s),
    };
    let cosx = cosx + 0.0;
    if sinx == 0.0 {
        sinx = sinx.copysign(x);
    }
    (sinx, cosx)
}

/// atan2 in degrees with uniform accuracy across quadrants: the
/// arguments are rearranged so the native atan2 runs in [-pi/4, pi/4]
/// and the quadrant is restored afterwards.
pub fn atan2d(y: f64, x: f64) -> f64 {
    let (mut x, mut y) = (x, y);
    let mut q = 0;
    if y.abs() > x.abs() {
        std::mem::swap(&mut x, &mut y);
        q = 2;
    }
    if x.is_sign_negative() {
        x = -x;
        q += 1;
    }
    let ang = y.atan2(x).to_degrees();
    match q {
        1 => (180.0_f64).copysign(y) - ang,
        2 => 90.0 - ang,
        3 => -90.0 + ang,
        _ => ang,
    }
}

/// Renormalize a sine/cosine pair onto the unit circle.
pub fn norm2(sinx: f64, cosx: f64) -> (f64, f64) {
    let r = sinx.hypot(cosx);
    (sinx / r, cosx / r)
}

/// Horner evaluation of a polynomial with coefficients in order of
/// decreasing degree.  An empty slice evaluates to zero.
pub fn polyval(p: &[f64], x: f64) -> f64 {
    p.iter().fold(0.0, |y, &c| y * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sum_err_exact() {
        let (s, t) = sum_err(1e100, 1.0);
        assert_eq!(s, 1e100);
        assert_eq!(t, 1.0);
        let (s, t) = sum_err(0.1, 0.2);
        // s + t reconstructs the exact sum to double-double precision
        assert_relative_eq!(s, 0.3, epsilon = 1e-15);
        assert!(t.abs() < f64::EPSILON);
    }

    #[test]
    fn test_remainder_symmetric() {
        assert_eq!(remainder(10.0, 360.0), 10.0);
        assert_eq!(remainder(190.0, 360.0), -170.0);
        assert_eq!(remainder(-190.0, 360.0), 170.0);
        assert_eq!(remainder(720.0, 360.0), 0.0);
    }

    #[test]
    fn test_ang_normalize_boundary() {
        assert_eq!(ang_normalize(180.0), 180.0);
        assert_eq!(ang_normalize(-180.0), -180.0);
        assert_eq!(ang_normalize(540.0), 180.0);
        assert_eq!(ang_normalize(-540.0), -180.0);
        assert_eq!(ang_normalize(361.0), 1.0);
    }

    #[test]
    fn test_sincosd_exact_cardinals() {
        for (x, s, c) in [
            (0.0, 0.0, 1.0),
            (90.0, 1.0, 0.0),
            (180.0, 0.0, -1.0),
            (270.0, -1.0, 0.0),
            (-90.0, -1.0, 0.0),
            (-180.0, 0.0, -1.0),
            (720.0, 0.0, 1.0),
        ] {
            let (sx, cx) = sincosd(x);
            assert_eq!(sx, s, "sin({x})");
            assert_eq!(cx, c, "cos({x})");
        }
        // sign of zero sine follows the argument
        assert!(sincosd(-0.0).0.is_sign_negative());
        assert!(sincosd(0.0).0.is_sign_positive());
        // cosine of a cardinal is never -0
        assert!(sincosd(90.0).1.is_sign_positive());
    }

    #[test]
    fn test_sincosd_value() {
        let (s, c) = sincosd(30.0);
        assert_relative_eq!(s, 0.5, epsilon = 1e-15);
        assert_relative_eq!(c, 3f64.sqrt() / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_atan2d_quadrants() {
        assert_eq!(atan2d(0.0, 1.0), 0.0);
        assert_eq!(atan2d(1.0, 0.0), 90.0);
        assert_eq!(atan2d(0.0, -1.0), 180.0);
        assert_eq!(atan2d(-0.0, -1.0), -180.0);
        assert_eq!(atan2d(-1.0, 0.0), -90.0);
        assert_relative_eq!(atan2d(1.0, 1.0), 45.0, epsilon = 1e-13);
        assert_relative_eq!(atan2d(-1.0, -1.0), -135.0, epsilon = 1e-13);
    }

    #[test]
    fn test_ang_diff_small() {
        let (d, e) = ang_diff(10.0, 30.0);
        assert_eq!(d, 20.0);
        assert_eq!(e, 0.0);
        // wraps the short way round
        let (d, _) = ang_diff(170.0, -170.0);
        assert_eq!(d, 20.0);
        let (d, _) = ang_diff(-170.0, 170.0);
        assert_eq!(d, -20.0);
    }

    #[test]
    fn test_ang_diff_boundary_sign() {
        // meridional / east-going differences give +180
        let (d, _) = ang_diff(0.0, 180.0);
        assert_eq!(d, 180.0);
        let (d, _) = ang_diff(180.0, 0.0);
        assert_eq!(d, -180.0);
    }

    #[test]
    fn test_ang_round() {
        assert_eq!(ang_round(0.0), 0.0);
        assert_eq!(ang_round(1.0 / 32.0), 1.0 / 32.0);
        // values below the quantum snap to zero
        assert_eq!(ang_round(1e-20), 0.0);
        assert_eq!(ang_round(-1e-20), -0.0);
        assert!(ang_round(-1e-20).is_sign_negative());
        // values at or above 1/16 pass through
        assert_eq!(ang_round(0.25), 0.25);
    }

    #[test]
    fn test_polyval() {
        assert_eq!(polyval(&[], 2.0), 0.0);
        assert_eq!(polyval(&[3.0], 2.0), 3.0);
        assert_eq!(polyval(&[1.0, -2.0, 1.0], 3.0), 4.0); // (x-1)^2 at 3
    }

    #[test]
    fn test_norm2() {
        let (s, c) = norm2(3.0, 4.0);
        assert_relative_eq!(s, 0.6, epsilon = 1e-15);
        assert_relative_eq!(c, 0.8, epsilon = 1e-15);
    }
}
