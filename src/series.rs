//! Truncated series for the geodesic integrals, order 6.
//!
//! The integrals of the geodesic differential equations are expanded in
//! a small parameter eps derived from the ellipsoid's third flattening
//! (Karney 2013).  The A-series are secular scale factors, the C-series
//! Fourier coefficients; A3/C3/C4 additionally depend on the third
//! flattening n and are tabulated once per ellipsoid as polynomials in
//! eps with n-dependent coefficients.

use crate::angles::polyval;

/// Order of the truncated series.
pub const GEODESIC_ORDER: usize = 6;

/// Number of tabulated C3 polynomial coefficients.
pub(crate) const N_C3X: usize = 15;
/// Number of tabulated C4 polynomial coefficients.
pub(crate) const N_C4X: usize = 21;

/// Clenshaw evaluation of a trigonometric series from sin(x), cos(x).
///
/// With `sinp` the coefficients multiply sin(2x), sin(4x), ...; without
/// it they multiply cos(x), cos(3x), ....  The angle 2x is never formed:
/// 2cos(2x) is derived algebraically from the input pair.
pub fn sin_cos_series(sinp: bool, sinx: f64, cosx: f64, c: &[f64]) -> f64 {
    let mut k = c.len();
    let ar = 2.0 * (cosx - sinx) * (cosx + sinx); // 2 * cos(2x)
    let mut y1 = 0.0;
    let mut y0 = if k & 1 != 0 {
        k -= 1;
        c[k]
    } else {
        0.0
    };
    // Unrolled by two so the accumulators keep their roles.
    while k > 0 {
        k -= 1;
        y1 = ar * y0 - y1 + c[k];
        k -= 1;
        y0 = ar * y1 - y0 + c[k];
    }
    if sinp {
        2.0 * sinx * cosx * y0 // sin(2x) * y0
    } else {
        cosx * (y0 - y1) // cos(x) * (y0 - y1)
    }
}

/// The scale factor A1 - 1: mean of dI1/dsigma, minus one.
pub fn a1m1(eps: f64) -> f64 {
    // (1-eps)*A1 - 1, polynomial in eps^2 of order 3
    const COEFF: [f64; 5] = [1.0, 4.0, 64.0, 0.0, 256.0];
    let m = GEODESIC_ORDER / 2;
    let t = polyval(&COEFF[..=m], eps * eps) / COEFF[m + 1];
    (t + eps) / (1.0 - eps)
}

/// The scale factor A2 - 1: mean of dI2/dsigma, minus one.
pub fn a2m1(eps: f64) -> f64 {
    // (eps+1)*A2 - 1, polynomial in eps^2 of order 3
    const COEFF: [f64; 5] = [-11.0, -28.0, -192.0, 0.0, 256.0];
    let m = GEODESIC_ORDER / 2;
    let t = polyval(&COEFF[..=m], eps * eps) / COEFF[m + 1];
    (t - eps) / (1.0 + eps)
}

/// Fill the C1 Fourier coefficients (distance integral); slot 0 unused.
pub fn c1(eps: f64, c: &mut [f64; GEODESIC_ORDER + 1]) {
    const COEFF: [f64; 18] = [
        // C1[1]/eps^1, polynomial in eps2 of order 2
        -1.0, 6.0, -16.0, 32.0,
        // C1[2]/eps^2, polynomial in eps2 of order 2
        -9.0, 64.0, -128.0, 2048.0,
        // C1[3]/eps^3, polynomial in eps2 of order 1
        9.0, -16.0, 768.0,
        // C1[4]/eps^4, polynomial in eps2 of order 1
        3.0, -5.0, 512.0,
        // C1[5]/eps^5, polynomial in eps2 of order 0
        -7.0, 1280.0,
        // C1[6]/eps^6, polynomial in eps2 of order 0
        -7.0, 2048.0,
    ];
    let eps2 = eps * eps;
    let mut d = eps;
    let mut o = 0;
    for (l, ck) in c.iter_mut().enumerate().take(GEODESIC_ORDER + 1).skip(1) {
        let m = (GEODESIC_ORDER - l) / 2;
        *ck = d * polyval(&COEFF[o..=o + m], eps2) / COEFF[o + m + 1];
        o += m + 2;
        d *= eps;
    }
}

/// Fill the C1' coefficients (reversion of the distance series); slot 0
/// unused.
pub fn c1p(eps: f64, c: &mut [f64; GEODESIC_ORDER + 1]) {
    const COEFF: [f64; 18] = [
        // C1p[1]/eps^1, polynomial in eps2 of order 2
        205.0, -432.0, 768.0, 1536.0,
        // C1p[2]/eps^2, polynomial in eps2 of order 2
        4005.0, -4736.0, 3840.0, 12288.0,
        // C1p[3]/eps^3, polynomial in eps2 of order 1
        -225.0, 116.0, 384.0,
        // C1p[4]/eps^4, polynomial in eps2 of order 1
        -7173.0, 2695.0, 7680.0,
        // C1p[5]/eps^5, polynomial in eps2 of order 0
        3467.0, 7680.0,
        // C1p[6]/eps^6, polynomial in eps2 of order 0
        38081.0, 61440.0,
    ];
    let eps2 = eps * eps;
    let mut d = eps;
    let mut o = 0;
    for (l, ck) in c.iter_mut().enumerate().take(GEODESIC_ORDER + 1).skip(1) {
        let m = (GEODESIC_ORDER - l) / 2;
        *ck = d * polyval(&COEFF[o..=o + m], eps2) / COEFF[o + m + 1];
        o += m + 2;
        d *= eps;
    }
}

/// Fill the C2 Fourier coefficients (reduced-length integral); slot 0
/// unused.
pub fn c2(eps: f64, c: &mut [f64; GEODESIC_ORDER + 1]) {
    const COEFF: [f64; 18] = [
        // C2[1]/eps^1, polynomial in eps2 of order 2
        1.0, 2.0, 16.0, 32.0,
        // C2[2]/eps^2, polynomial in eps2 of order 2
        35.0, 64.0, 384.0, 2048.0,
        // C2[3]/eps^3, polynomial in eps2 of order 1
        15.0, 80.0, 768.0,
        // C2[4]/eps^4, polynomial in eps2 of order 1
        7.0, 35.0, 512.0,
        // C2[5]/eps^5, polynomial in eps2 of order 0
        63.0, 1280.0,
        // C2[6]/eps^6, polynomial in eps2 of order 0
        77.0, 2048.0,
    ];
    let eps2 = eps * eps;
    let mut d = eps;
    let mut o = 0;
    for (l, ck) in c.iter_mut().enumerate().take(GEODESIC_ORDER + 1).skip(1) {
        let m = (GEODESIC_ORDER - l) / 2;
        *ck = d * polyval(&COEFF[o..=o + m], eps2) / COEFF[o + m + 1];
        o += m + 2;
        d *= eps;
    }
}

/// Tabulate the A3 series (longitude integral scale) as a polynomial in
/// eps whose coefficients are polynomials in n.
pub fn a3_coeff(n: f64) -> [f64; GEODESIC_ORDER] {
    const COEFF: [f64; 18] = [
        // A3, coeff of eps^5, polynomial in n of order 0
        -3.0, 128.0,
        // A3, coeff of eps^4, polynomial in n of order 1
        -2.0, -3.0, 64.0,
        // A3, coeff of eps^3, polynomial in n of order 2
        -1.0, -3.0, -1.0, 16.0,
        // A3, coeff of eps^2, polynomial in n of order 2
        3.0, -1.0, -2.0, 8.0,
        // A3, coeff of eps^1, polynomial in n of order 1
        1.0, -1.0, 2.0,
        // A3, coeff of eps^0, polynomial in n of order 0
        1.0, 1.0,
    ];
    let mut a3x = [0.0; GEODESIC_ORDER];
    let mut o = 0;
    let mut k = 0;
    for j in (0..GEODESIC_ORDER).rev() {
        let m = j.min(GEODESIC_ORDER - j - 1);
        a3x[k] = polyval(&COEFF[o..=o + m], n) / COEFF[o + m + 1];
        k += 1;
        o += m + 2;
    }
    a3x
}

/// Tabulate the C3 Fourier coefficients (longitude integral).
pub fn c3_coeff(n: f64) -> [f64; N_C3X] {
    const COEFF: [f64; 45] = [
        // C3[1], coeff of eps^5, polynomial in n of order 0
        3.0, 128.0,
        // C3[1], coeff of eps^4, polynomial in n of order 1
        2.0, 5.0, 128.0,
        // C3[1], coeff of eps^3, polynomial in n of order 2
        -1.0, 3.0, 3.0, 64.0,
        // C3[1], coeff of eps^2, polynomial in n of order 2
        -1.0, 0.0, 1.0, 8.0,
        // C3[1], coeff of eps^1, polynomial in n of order 1
        -1.0, 1.0, 4.0,
        // C3[2], coeff of eps^5, polynomial in n of order 0
        5.0, 256.0,
        // C3[2], coeff of eps^4, polynomial in n of order 1
        1.0, 3.0, 128.0,
        // C3[2], coeff of eps^3, polynomial in n of order 2
        -3.0, -2.0, 3.0, 64.0,
        // C3[2], coeff of eps^2, polynomial in n of order 2
        1.0, -3.0, 2.0, 32.0,
        // C3[3], coeff of eps^5, polynomial in n of order 0
        7.0, 512.0,
        // C3[3], coeff of eps^4, polynomial in n of order 1
        -10.0, 9.0, 384.0,
        // C3[3], coeff of eps^3, polynomial in n of order 2
        5.0, -9.0, 5.0, 192.0,
        // C3[4], coeff of eps^5, polynomial in n of order 0
        7.0, 512.0,
        // C3[4], coeff of eps^4, polynomial in n of order 1
        -14.0, 7.0, 512.0,
        // C3[5], coeff of eps^5, polynomial in n of order 0
        21.0, 2560.0,
    ];
    let mut c3x = [0.0; N_C3X];
    let mut o = 0;
    let mut k = 0;
    for l in 1..GEODESIC_ORDER {
        for j in (l..GEODESIC_ORDER).rev() {
            let m = j.min(GEODESIC_ORDER - j - 1);
            c3x[k] = polyval(&COEFF[o..=o + m], n) / COEFF[o + m + 1];
            k += 1;
            o += m + 2;
        }
    }
    c3x
}

/// Tabulate the C4 Fourier coefficients (area integral).
pub fn c4_coeff(n: f64) -> [f64; N_C4X] {
    const COEFF: [f64; 77] = [
        // C4[0], coeff of eps^5, polynomial in n of order 0
        97.0, 15015.0,
        // C4[0], coeff of eps^4, polynomial in n of order 1
        1088.0, 156.0, 45045.0,
        // C4[0], coeff of eps^3, polynomial in n of order 2
        -224.0, -4784.0, 1573.0, 45045.0,
        // C4[0], coeff of eps^2, polynomial in n of order 3
        -10656.0, 14144.0, -4576.0, -858.0, 45045.0,
        // C4[0], coeff of eps^1, polynomial in n of order 4
        64.0, 624.0, -4576.0, 6864.0, -3003.0, 15015.0,
        // C4[0], coeff of eps^0, polynomial in n of order 5
        100.0, 208.0, 572.0, 3432.0, -12012.0, 30030.0, 45045.0,
        // C4[1], coeff of eps^5, polynomial in n of order 0
        1.0, 9009.0,
        // C4[1], coeff of eps^4, polynomial in n of order 1
        -2944.0, 468.0, 135135.0,
        // C4[1], coeff of eps^3, polynomial in n of order 2
        5792.0, 1040.0, -1287.0, 135135.0,
        // C4[1], coeff of eps^2, polynomial in n of order 3
        5952.0, -11648.0, 9152.0, -2574.0, 135135.0,
        // C4[1], coeff of eps^1, polynomial in n of order 4
        -64.0, -624.0, 4576.0, -6864.0, 3003.0, 135135.0,
        // C4[2], coeff of eps^5, polynomial in n of order 0
        8.0, 10725.0,
        // C4[2], coeff of eps^4, polynomial in n of order 1
        1856.0, -936.0, 225225.0,
        // C4[2], coeff of eps^3, polynomial in n of order 2
        -8448.0, 4992.0, -1144.0, 225225.0,
        // C4[2], coeff of eps^2, polynomial in n of order 3
        -1440.0, 4160.0, -4576.0, 1716.0, 225225.0,
        // C4[3], coeff of eps^5, polynomial in n of order 0
        -136.0, 63063.0,
        // C4[3], coeff of eps^4, polynomial in n of order 1
        1024.0, -208.0, 105105.0,
        // C4[3], coeff of eps^3, polynomial in n of order 2
        3584.0, -3328.0, 1144.0, 315315.0,
        // C4[4], coeff of eps^5, polynomial in n of order 0
        -128.0, 135135.0,
        // C4[4], coeff of eps^4, polynomial in n of order 1
        -2560.0, 832.0, 405405.0,
        // C4[5], coeff of eps^5, polynomial in n of order 0
        128.0, 99099.0,
    ];
    let mut c4x = [0.0; N_C4X];
    let mut o = 0;
    let mut k = 0;
    for l in 0..GEODESIC_ORDER {
        for j in (l..GEODESIC_ORDER).rev() {
            let m = GEODESIC_ORDER - j - 1;
            c4x[k] = polyval(&COEFF[o..=o + m], n) / COEFF[o + m + 1];
            k += 1;
            o += m + 2;
        }
    }
    c4x
}

/// Evaluate A3 at a series parameter from the precomputed table.
pub fn a3f(a3x: &[f64; GEODESIC_ORDER], eps: f64) -> f64 {
    polyval(&a3x[..], eps)
}

/// Evaluate the C3 coefficients at a series parameter; sets c[1..=5].
pub fn c3f(c3x: &[f64; N_C3X], eps: f64, c: &mut [f64; GEODESIC_ORDER + 1]) {
    let mut mult = 1.0;
    let mut o = 0;
    for l in 1..GEODESIC_ORDER {
        let m = GEODESIC_ORDER - l - 1;
        mult *= eps;
        c[l] = mult * polyval(&c3x[o..=o + m], eps);
        o += m + 1;
    }
}

/// Evaluate the C4 coefficients at a series parameter; sets c[0..=5].
pub fn c4f(c4x: &[f64; N_C4X], eps: f64, c: &mut [f64; GEODESIC_ORDER]) {
    let mut mult = 1.0;
    let mut o = 0;
    for l in 0..GEODESIC_ORDER {
        let m = GEODESIC_ORDER - l - 1;
        c[l] = mult * polyval(&c4x[o..=o + m], eps);
        o += m + 1;
        mult *= eps;
    }
}
