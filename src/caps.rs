//! Output capability mask for geodesic computations.
//!
//! Each optional output carries the internal series bits it needs, so a
//! [`crate::line::GeodesicLine`] built with a given mask evaluates only
//! the coefficient arrays its outputs will touch.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// A set of requested outputs (and the series capabilities they imply).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Caps(pub(crate) u32);

impl Caps {
    // Internal series capabilities.
    pub(crate) const C1: Caps = Caps(1 << 0);
    pub(crate) const C1P: Caps = Caps(1 << 1);
    pub(crate) const C2: Caps = Caps(1 << 2);
    pub(crate) const C3: Caps = Caps(1 << 3);
    pub(crate) const C4: Caps = Caps(1 << 4);
    pub(crate) const CAP_ALL: Caps = Caps(0x1F);
    /// The output bits, without the series bits.
    pub(crate) const OUT_ALL: Caps = Caps(0x7F80);

    /// No output.
    pub const NONE: Caps = Caps(0);
    /// End-point latitude.
    pub const LATITUDE: Caps = Caps(1 << 7);
    /// End-point longitude.
    pub const LONGITUDE: Caps = Caps(1 << 8 | Self::C3.0);
    /// Azimuths at both end points.
    pub const AZIMUTH: Caps = Caps(1 << 9);
    /// Distance s12.
    pub const DISTANCE: Caps = Caps(1 << 10 | Self::C1.0);
    /// Accept distance (rather than arc) as the position input.
    pub const DISTANCE_IN: Caps = Caps(1 << 11 | Self::C1.0 | Self::C1P.0);
    /// Reduced length m12.
    pub const REDUCED_LENGTH: Caps = Caps(1 << 12 | Self::C1.0 | Self::C2.0);
    /// Geodesic scales M12, M21.
    pub const GEODESIC_SCALE: Caps = Caps(1 << 13 | Self::C1.0 | Self::C2.0);
    /// Area S12 under the geodesic segment.
    pub const AREA: Caps = Caps(1 << 14 | Self::C4.0);
    /// Do not reduce the end longitude modulo 360 (keeps the revolution
    /// count for line-following applications).
    pub const LONG_UNROLL: Caps = Caps(1 << 15);
    /// Latitude, longitude, azimuth and distance.
    pub const STANDARD: Caps = Caps(
        Self::LATITUDE.0 | Self::LONGITUDE.0 | Self::AZIMUTH.0 | Self::DISTANCE.0,
    );
    /// Every output (LONG_UNROLL excluded; request it separately).
    pub const ALL: Caps = Caps(Self::OUT_ALL.0 | Self::CAP_ALL.0);

    /// True if none of the bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if `self` and `other` share any bit.
    pub fn intersects(self, other: Caps) -> bool {
        self.0 & other.0 != 0
    }

    /// The output bits of `self`, stripped of internal series bits.
    pub(crate) fn out_bits(self) -> Caps {
        self & Self::OUT_ALL
    }
}

impl BitOr for Caps {
    type Output = Caps;
    fn bitor(self, rhs: Caps) -> Caps {
        Caps(self.0 | rhs.0)
    }
}

impl BitOrAssign for Caps {
    fn bitor_assign(&mut self, rhs: Caps) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Caps {
    type Output = Caps;
    fn bitand(self, rhs: Caps) -> Caps {
        Caps(self.0 & rhs.0)
    }
}

impl BitAndAssign for Caps {
    fn bitand_assign(&mut self, rhs: Caps) {
        self.0 &= rhs.0;
    }
}

impl Not for Caps {
    type Output = Caps;
    fn not(self) -> Caps {
        Caps(!self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_imply_series() {
        assert!(Caps::DISTANCE.intersects(Caps::C1));
        assert!(Caps::LONGITUDE.intersects(Caps::C3));
        assert!(Caps::REDUCED_LENGTH.intersects(Caps::C2));
        assert!(Caps::AREA.intersects(Caps::C4));
        assert!(Caps::DISTANCE_IN.intersects(Caps::C1P));
        assert!(!Caps::LATITUDE.intersects(Caps::CAP_ALL));
    }

    #[test]
    fn test_out_bits_strip_series() {
        let m = (Caps::DISTANCE | Caps::AREA).out_bits();
        assert!(!m.intersects(Caps::CAP_ALL));
        assert!(m.intersects(Caps::DISTANCE));
        assert!(m.intersects(Caps::AREA));
        assert!(!m.intersects(Caps::LATITUDE));
    }

    #[test]
    fn test_standard_contents() {
        for c in [Caps::LATITUDE, Caps::LONGITUDE, Caps::AZIMUTH, Caps::DISTANCE] {
            assert!(Caps::STANDARD.intersects(c.out_bits()));
        }
    }
}
