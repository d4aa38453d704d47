//! Element types which can be stored in a distance map. The choice of element type replaces the
//! array factories of a class-based design: the caller picks `u16`, `f32`, etc. as a type
//! parameter and the transform allocates its output accordingly.

use num_traits::{Bounded, NumCast, ToPrimitive, Zero};
use std::fmt::Debug;

/// A numeric element type for distance maps. Integer types propagate integer chamfer weights
/// with saturating arithmetic, floating point types propagate floating point weights.
pub trait DistanceValue:
    Copy + PartialOrd + Debug + Default + Send + Sync + Bounded + NumCast + Zero + 'static
{
    /// True for integer element types, which use the integer representation of chamfer weights
    /// and round-divide during normalization.
    const INTEGRAL: bool;

    /// The type chamfer distances accumulate in before they are normalized and narrowed to this
    /// type, wide enough that raw weighted path lengths do not saturate.
    type Wide: DistanceValue;

    /// The "infinite" distance assigned to foreground elements before propagation. This is the
    /// largest finite value of the type.
    fn far() -> Self {
        Self::max_value()
    }

    /// Select the representation of a chamfer weight appropriate for this type.
    fn from_weight(weight: f64, int_weight: u32) -> Self;

    /// Add a propagation weight to a distance, saturating at `far()` instead of wrapping.
    fn add_weight(self, weight: Self) -> Self;

    /// Divide an accumulated chamfer distance by the normalization weight of its mask.
    fn normalized(self, weight: f64, int_weight: u32) -> Self;

    /// Convert a floating point distance into this type, rounding integers to the nearest value
    /// and saturating at the limits of the type.
    fn from_f64_saturating(value: f64) -> Self;

    /// Narrow a reached accumulated distance into this type, saturating at `far()`.
    fn from_wide(value: Self::Wide) -> Self;

    fn as_f64(self) -> f64 {
        ToPrimitive::to_f64(&self).unwrap_or(f64::NAN)
    }
}

macro_rules! impl_integral_distance_value {
    ($($t:ty),*) => {
        $(
            impl DistanceValue for $t {
                const INTEGRAL: bool = true;
                type Wide = u64;

                fn from_weight(_weight: f64, int_weight: u32) -> Self {
                    <$t as NumCast>::from(int_weight).unwrap_or(<$t>::MAX)
                }

                fn add_weight(self, weight: Self) -> Self {
                    self.saturating_add(weight)
                }

                fn normalized(self, _weight: f64, int_weight: u32) -> Self {
                    let w = int_weight.max(1) as i128;
                    let v = self as i128;
                    ((v + w / 2) / w) as $t
                }

                fn from_f64_saturating(value: f64) -> Self {
                    // Float to int casts saturate, and NaN becomes zero
                    value.round() as $t
                }

                fn from_wide(value: u64) -> Self {
                    <$t as NumCast>::from(value).unwrap_or(<$t>::MAX)
                }
            }
        )*
    };
}

macro_rules! impl_float_distance_value {
    ($($t:ty),*) => {
        $(
            impl DistanceValue for $t {
                const INTEGRAL: bool = false;
                type Wide = f64;

                fn from_weight(weight: f64, _int_weight: u32) -> Self {
                    weight as $t
                }

                fn add_weight(self, weight: Self) -> Self {
                    let sum = self + weight;
                    if sum > <$t>::MAX { <$t>::MAX } else { sum }
                }

                fn normalized(self, weight: f64, _int_weight: u32) -> Self {
                    (self as f64 / weight) as $t
                }

                fn from_f64_saturating(value: f64) -> Self {
                    value as $t
                }

                fn from_wide(value: f64) -> Self {
                    if value > <$t>::MAX as f64 { <$t>::MAX } else { value as $t }
                }
            }
        )*
    };
}

impl_integral_distance_value!(u8, u16, i16, i32, u32, u64);
impl_float_distance_value!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn integer_addition_saturates() {
        assert_eq!(u16::far().add_weight(7), u16::MAX);
        assert_eq!(i16::far().add_weight(3), i16::MAX);
        assert_eq!(250u8.add_weight(10), u8::MAX);
    }

    #[test]
    fn float_addition_stays_finite() {
        assert_eq!(f32::far().add_weight(f32::MAX), f32::MAX);
        assert!(f64::far().add_weight(1.0).is_finite());
    }

    #[test_case(0, 3, 0)]
    #[test_case(3, 3, 1)]
    #[test_case(4, 3, 1)]
    #[test_case(5, 3, 2)]
    #[test_case(14, 10, 1)]
    #[test_case(15, 10, 2)]
    fn integer_normalization_rounds(raw: u16, weight: u32, expected: u16) {
        assert_eq!(raw.normalized(weight as f64, weight), expected);
    }

    #[test]
    fn weights_pick_representation() {
        assert_eq!(u16::from_weight(1.414, 14), 14);
        assert_eq!(f32::from_weight(1.5, 2), 1.5);
        assert_eq!(u8::from_weight(1.0, 300), u8::MAX);
    }

    #[test]
    fn wide_values_narrow_with_saturation() {
        assert_eq!(u8::from_wide(254), 254);
        assert_eq!(u8::from_wide(300), u8::MAX);
        assert_eq!(i16::from_wide(u64::MAX), i16::MAX);
        assert_eq!(u64::from_wide(70_000), 70_000);
        assert_eq!(f32::from_wide(f64::MAX), f32::MAX);
        assert_eq!(f32::from_wide(2.5), 2.5);
    }

    #[test]
    fn saturating_conversion() {
        assert_eq!(u16::from_f64_saturating(f64::INFINITY), u16::MAX);
        assert_eq!(u8::from_f64_saturating(2.6), 3);
        assert_eq!(i16::from_f64_saturating(-1.0e9), i16::MIN);
        assert!(f32::from_f64_saturating(f64::INFINITY).is_infinite());
    }
}
