//! Fixed-precision attribute rounding
//!
//! Attributes are compared after rounding to [`DECIMALS`] digits. The rounded
//! value is kept as a fixed-point integer so it can be hashed.

/// Number of decimal digits kept when comparing attributes
pub const DECIMALS: i32 = 6;

const SCALE: f64 = 1_000_000.0;

/// Fixed-point representation of a rounded float (`round(v * 10^6)`)
pub(crate) fn fixed(v: f32) -> i64 {
    (f64::from(v) * SCALE).round() as i64
}

/// Float value of a fixed-point rounded attribute
pub(crate) fn unfixed(v: i64) -> f32 {
    (v as f64 / SCALE) as f32
}

pub(crate) fn fixed3(v: [f32; 3]) -> [i64; 3] {
    v.map(fixed)
}

pub(crate) fn fixed2(v: [f32; 2]) -> [i64; 2] {
    v.map(fixed)
}

/// Round a 3D attribute to [`DECIMALS`] digits
pub fn round3(v: [f32; 3]) -> [f32; 3] {
    fixed3(v).map(unfixed)
}

/// Round a 2D attribute to [`DECIMALS`] digits
pub fn round2(v: [f32; 2]) -> [f32; 2] {
    fixed2(v).map(unfixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_drops_seventh_digit() {
        assert_eq!(round3([0.1234564, 1.0, -2.0]), [0.123456, 1.0, -2.0]);
        assert_eq!(round2([0.1234566, 0.0]), [0.123457, 0.0]);
    }

    #[test]
    fn test_fixed_equality_tolerance() {
        assert_eq!(fixed(1.0), fixed(1.0000001));
        assert_ne!(fixed(1.0), fixed(1.00001));
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        assert_eq!(fixed(-0.0), fixed(0.0));
        assert_eq!(fixed(-0.0000001), 0);
    }
}
