use crate::{Float, PI};

pub mod arena;
pub mod geometry;
pub mod interaction;
pub mod primitive;
pub mod rng;
pub mod transform;

use num::Bounded;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

pub trait RealNum<T>:
    Add<Output = T>
    + Sub<Output = T>
    + Mul<Output = T>
    + Div<Output = T>
    + Neg<Output = T>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + PartialOrd
    + PartialEq
    + Bounded
    + Copy
    + Clone
{
    fn zero() -> Self;
    fn one() -> Self;
    fn two() -> Self;
    fn min(self, t: Self) -> Self;
    fn max(self, t: Self) -> Self;
    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
    fn floor(self) -> Self;
    fn is_nan(self) -> bool;
    fn machine_epsilon() -> Self;
}

macro_rules! implement_real_num {
    ($t:ident; $zero:expr, $one:expr, $two:expr) => {
        impl RealNum<$t> for $t {
            fn zero() -> Self {
                $zero
            }

            fn one() -> Self {
                $one
            }

            fn two() -> Self {
                $two
            }

            fn min(self, t: Self) -> Self {
                $t::min(self, t)
            }

            fn max(self, t: Self) -> Self {
                $t::max(self, t)
            }

            fn sqrt(self) -> Self {
                $t::sqrt(self)
            }

            fn abs(self) -> Self {
                $t::abs(self)
            }

            fn floor(self) -> Self {
                $t::floor(self)
            }

            fn is_nan(self) -> bool {
                self.is_nan()
            }

            fn machine_epsilon() -> Self {
                $t::EPSILON * 0.5
            }
        }
    };
}

implement_real_num!(f32; 0.0, 1.0, 2.0);
implement_real_num!(f64; 0.0, 1.0, 2.0);

pub fn lerp<T: RealNum<T>>(t: T, v1: T, v2: T) -> T {
    (T::one() - t) * v1 + t * v2
}

pub fn clamp<T: RealNum<T>>(val: T, low: T, high: T) -> T {
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

pub fn radians(deg: Float) -> Float {
    PI / 180.0 * deg
}

pub fn degrees(rad: Float) -> Float {
    180.0 / PI * rad
}

/// Stable quadratic solver; roots are returned in increasing order.
pub fn quadratic(a: Float, b: Float, c: Float, t0: &mut Float, t1: &mut Float) -> bool {
    let discrim = b as f64 * b as f64 - 4.0 * a as f64 * c as f64;
    if discrim < 0.0 {
        return false;
    }
    let root_discrim = discrim.sqrt() as Float;

    let q = if b < 0.0 {
        -0.5 * (b - root_discrim)
    } else {
        -0.5 * (b + root_discrim)
    };
    *t0 = q / a;
    *t1 = c / q;

    if *t0 > *t1 {
        std::mem::swap(t0, t1)
    }
    true
}
