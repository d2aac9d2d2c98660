//! Fixed-point math utilities for deterministic simulation.
//!
//! Positions, speeds and footprint sizes are all fixed-point so that a
//! replayed command stream produces bit-identical worlds on any CPU.
//! Floats only appear at the edges (protocol input, snapshot output).

use fixed::types::{I32F32, I64F64};
use serde::{Deserialize, Serialize};

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Double-width fixed-point type for squared distances.
///
/// Squaring an `I32F32` difference needs up to 128 bits, so distance math
/// widens before multiplying.
pub type WideFixed = I64F64;

/// Largest accepted absolute coordinate on either axis.
///
/// Squared distances between any two points inside these bounds fit in
/// [`WideFixed`] exactly.
pub const COORDINATE_LIMIT: Fixed = Fixed::const_from_int(1_000_000);

/// Fixed-point 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2Fixed {
    /// X coordinate.
    #[serde(with = "fixed_serde")]
    pub x: Fixed,
    /// Y coordinate.
    #[serde(with = "fixed_serde")]
    pub y: Fixed,
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

impl Vec2Fixed {
    /// Create a new fixed-point vector.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    /// Build a vector from whole-number coordinates.
    #[must_use]
    pub fn from_int(x: i32, y: i32) -> Self {
        Self::new(Fixed::from_num(x), Fixed::from_num(y))
    }

    /// Build a vector from float coordinates.
    ///
    /// Returns `None` if either coordinate is not finite or lies beyond
    /// [`COORDINATE_LIMIT`].
    #[must_use]
    pub fn from_f64(x: f64, y: f64) -> Option<Self> {
        let position = Self::new(Fixed::checked_from_num(x)?, Fixed::checked_from_num(y)?);
        position.in_bounds().then_some(position)
    }

    /// Whether both coordinates lie within [`COORDINATE_LIMIT`].
    #[must_use]
    pub fn in_bounds(self) -> bool {
        let axis_ok = |v: Fixed| (-COORDINATE_LIMIT..=COORDINATE_LIMIT).contains(&v);
        axis_ok(self.x) && axis_ok(self.y)
    }

    /// Convert to float coordinates for presentation.
    #[must_use]
    pub fn to_f64(self) -> (f64, f64) {
        (self.x.to_num(), self.y.to_num())
    }

    /// Calculate squared distance (avoids sqrt for comparisons).
    ///
    /// Exact for any two in-bounds points. Saturates far outside them.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> WideFixed {
        let dx = WideFixed::from_num(self.x) - WideFixed::from_num(other.x);
        let dy = WideFixed::from_num(self.y) - WideFixed::from_num(other.y);
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> Fixed {
        wide_sqrt(self.distance_squared(other))
    }

    /// Squared length of the vector.
    #[must_use]
    pub fn length_squared(self) -> WideFixed {
        Self::ZERO.distance_squared(self)
    }

    /// Scale both components by `factor`.
    #[must_use]
    pub fn scale(self, factor: Fixed) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Normalize vector using fixed-point math.
    #[must_use]
    pub fn normalize(self) -> Self {
        let len = wide_sqrt(self.length_squared());
        if len == Fixed::ZERO {
            return Self::ZERO;
        }

        Self::new(self.x / len, self.y / len)
    }
}

/// Square root of a wide value, narrowed back to [`Fixed`].
///
/// Works on the raw bits: for `v = bits / 2^64`, `sqrt(v) = isqrt(bits) / 2^32`,
/// so perfect squares come out exact. Negative input yields zero and the
/// result saturates at [`Fixed::MAX`].
#[must_use]
pub fn wide_sqrt(value: WideFixed) -> Fixed {
    if value <= WideFixed::ZERO {
        return Fixed::ZERO;
    }

    let root = isqrt_u128(value.to_bits().unsigned_abs());
    Fixed::from_bits(i64::try_from(root).unwrap_or(i64::MAX))
}

/// Integer square root (floor) via Newton's method.
fn isqrt_u128(n: u128) -> u128 {
    if n < 2 {
        return n;
    }

    // Start above the root so the iteration decreases monotonically.
    let bits = 128 - n.leading_zeros();
    let mut x = 1u128 << ((bits + 1) / 2);
    loop {
        let y = (x + n / x) / 2;
        if y >= x {
            return x;
        }
        x = y;
    }
}

impl std::ops::Add for Vec2Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl std::fmt::Display for Vec2Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_distance_squared() {
        let a = Vec2Fixed::from_int(3, 0);
        let b = Vec2Fixed::from_int(0, 4);
        // 3² + 4² = 25
        assert_eq!(a.distance_squared(b), WideFixed::from_num(25));
    }

    #[test]
    fn test_sqrt_exact_for_perfect_squares() {
        for n in [0, 1, 4, 9, 1600, 10_000, 250_000] {
            let root = wide_sqrt(WideFixed::from_num(n));
            assert_eq!(root * root, Fixed::from_num(n), "sqrt({n}) = {root}");
        }
        assert_eq!(wide_sqrt(WideFixed::from_num(-4)), Fixed::ZERO);
    }

    #[test]
    fn test_sqrt_of_fraction() {
        let root = wide_sqrt(WideFixed::from_num(2.25));
        assert_eq!(root, Fixed::from_num(1.5));
    }

    #[test]
    fn test_distance_345_triangle() {
        let a = Vec2Fixed::ZERO;
        let b = Vec2Fixed::from_int(30, 40);
        assert_eq!(a.distance(b), Fixed::from_num(50));
    }

    #[test]
    fn test_distance_exact_across_the_world() {
        let a = Vec2Fixed::new(-COORDINATE_LIMIT, -COORDINATE_LIMIT);
        let b = Vec2Fixed::new(COORDINATE_LIMIT, COORDINATE_LIMIT);
        // (2e6)² * 2
        assert_eq!(a.distance_squared(b), WideFixed::from_num(8_000_000_000_000_i64));

        let far = Vec2Fixed::from_int(300_000, 400_000);
        assert_eq!(Vec2Fixed::ZERO.distance(far), Fixed::from_num(500_000));
    }

    #[test]
    fn test_distance_squared_saturates_outside_bounds() {
        let a = Vec2Fixed::new(Fixed::MIN, Fixed::MIN);
        let b = Vec2Fixed::new(Fixed::MAX, Fixed::MAX);
        assert_eq!(a.distance_squared(b), WideFixed::MAX);
    }

    #[test]
    fn test_normalize_long_vector() {
        let v = Vec2Fixed::from_int(-50_000, 0).normalize();
        assert_eq!(v, Vec2Fixed::from_int(-1, 0));

        let diagonal = Vec2Fixed::from_int(600_000, 800_000).normalize();
        let err = (diagonal.x - Fixed::from_num(0.6)).abs() + (diagonal.y - Fixed::from_num(0.8)).abs();
        assert!(err < Fixed::from_num(0.0001));
    }

    #[test]
    fn test_vec2_normalize_axis_is_exact() {
        let v = Vec2Fixed::from_int(100, 0).normalize();
        assert_eq!(v, Vec2Fixed::from_int(1, 0));
        assert_eq!(Vec2Fixed::ZERO.normalize(), Vec2Fixed::ZERO);
    }

    #[test]
    fn test_vec2_normalize() {
        let norm = Vec2Fixed::from_int(3, 4).normalize();

        let one = WideFixed::from_num(1);
        let epsilon = one / WideFixed::from_num(10000);
        assert!(
            (norm.length_squared() - one).abs() < epsilon,
            "normalized vector length² should be ~1, got {:?}",
            norm.length_squared()
        );

        // Direction preserved: norm.x * 4 == norm.y * 3
        let ratio_diff = (norm.x * Fixed::from_num(4)) - (norm.y * Fixed::from_num(3));
        assert!(ratio_diff.abs() < Fixed::from_num(0.0001));
    }

    #[test]
    fn test_from_f64_rejects_out_of_range() {
        assert!(Vec2Fixed::from_f64(1.5, -2.0).is_some());
        assert!(Vec2Fixed::from_f64(f64::NAN, 0.0).is_none());
        assert!(Vec2Fixed::from_f64(1e12, 0.0).is_none());
        assert!(Vec2Fixed::from_f64(0.0, -1_000_000.0).is_some());
        assert!(Vec2Fixed::from_f64(1_000_000.5, 0.0).is_none());
        assert!(!Vec2Fixed::new(Fixed::MIN, Fixed::ZERO).in_bounds());
        assert_eq!(Vec2Fixed::from_int(5, 7).to_f64(), (5.0, 7.0));
    }
}
