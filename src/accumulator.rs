//! Compensated summation as an immutable value type.
//!
//! An [`Accumulator`] holds a running sum split into a rounded part and
//! a residual, so that adding many small terms (polygon edge lengths,
//! per-edge area contributions) loses essentially nothing to rounding.
//! All operations return new values; the polygon test queries rely on
//! this to replay the running sums on a local copy.

use crate::angles::{remainder, sum_err};

/// A two-double compensated sum: `s` is the rounded total, `t` the
/// residual, with the invariant total = s + t and |t| <= ulp(s)/2.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Accumulator {
    s: f64,
    t: f64,
}

impl Accumulator {
    /// A zeroed accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `y`, returning the new accumulator.
    #[must_use]
    pub fn add(self, y: f64) -> Self {
        // Reduce y + t exactly, then fold into s; u is below the
        // round-off of the main sum and goes into the new residual.
        let (z, u) = sum_err(y, self.t);
        let (s, t) = sum_err(z, self.s);
        if s == 0.0 {
            // The sum cancelled exactly; start fresh from the
            // sub-residual so its sign survives.
            Accumulator { s: u, t }
        } else {
            Accumulator { s, t: t + u }
        }
    }

    /// The rounded total plus `y`, without changing the accumulator.
    pub fn sum(&self, y: f64) -> f64 {
        self.add(y).value()
    }

    /// The rounded total.
    pub fn value(&self) -> f64 {
        self.s
    }

    /// The negated accumulator.
    #[must_use]
    pub fn negate(self) -> Self {
        Accumulator {
            s: -self.s,
            t: -self.t,
        }
    }

    /// Reduce the total to [-y/2, y/2].
    #[must_use]
    pub fn remainder(self, y: f64) -> Self {
        Accumulator {
            s: remainder(self.s, y),
            t: self.t,
        }
        .add(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compensation_survives_cancellation() {
        // naive summation would lose the 1.0 entirely
        let acc = Accumulator::new().add(1e100).add(1.0).add(-1e100);
        assert_eq!(acc.value(), 1.0);
    }

    #[test]
    fn test_many_small_terms() {
        let mut acc = Accumulator::new();
        for _ in 0..10_000 {
            acc = acc.add(0.1);
        }
        assert_relative_eq!(acc.value(), 1000.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sum_does_not_mutate() {
        let acc = Accumulator::new().add(2.0);
        assert_eq!(acc.sum(3.0), 5.0);
        assert_eq!(acc.value(), 2.0);
    }

    #[test]
    fn test_negate_and_remainder() {
        let acc = Accumulator::new().add(350.0);
        assert_eq!(acc.negate().value(), -350.0);
        assert_eq!(acc.remainder(360.0).value(), -10.0);
    }
}
