// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use num_traits::{
    CheckedAdd, CheckedMul, CheckedNeg, CheckedSub, SaturatingAdd, SaturatingSub, Zero,
};
use std::{
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

pub trait MarkerName {
    const NAME_POINT: &'static str;
    const NAME_DELTA: &'static str;
}

/// An absolute position on an axis tagged by the marker `U`.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point<T, U>(T, core::marker::PhantomData<U>);

impl<T, U> Point<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Point(value, core::marker::PhantomData)
    }

    #[inline]
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Point::new(T::zero())
    }

    #[inline]
    pub const fn value(&self) -> T
    where
        T: Copy,
    {
        self.0
    }

    #[inline]
    pub fn checked_add(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedAdd,
    {
        self.0.checked_add(&d.0).map(Point::new)
    }

    #[inline]
    pub fn checked_sub(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedSub,
    {
        self.0.checked_sub(&d.0).map(Point::new)
    }

    #[inline]
    pub fn saturating_add(self, d: Delta<T, U>) -> Self
    where
        T: SaturatingAdd,
    {
        Point::new(self.0.saturating_add(&d.0))
    }

    #[inline]
    pub fn saturating_sub(self, d: Delta<T, U>) -> Self
    where
        T: SaturatingSub,
    {
        Point::new(self.0.saturating_sub(&d.0))
    }

    /// Signed distance from `earlier` to `self`.
    #[inline]
    pub fn checked_since(self, earlier: Self) -> Option<Delta<T, U>>
    where
        T: CheckedSub,
    {
        self.0.checked_sub(&earlier.0).map(Delta::new)
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Point<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_POINT, self.0)
    }
}

impl<T: Zero, U> Default for Point<T, U> {
    #[inline]
    fn default() -> Self {
        Point::new(T::zero())
    }
}

impl<T: CheckedAdd, U> Add<Delta<T, U>> for Point<T, U> {
    type Output = Point<T, U>;

    #[inline]
    fn add(self, rhs: Delta<T, U>) -> Self::Output {
        Point::new(self.0.checked_add(&rhs.0).expect("overflow in Point + Delta"))
    }
}

impl<T: CheckedAdd, U> AddAssign<Delta<T, U>> for Point<T, U> {
    #[inline]
    fn add_assign(&mut self, rhs: Delta<T, U>) {
        self.0 = self.0.checked_add(&rhs.0).expect("overflow in Point += Delta");
    }
}

impl<T: CheckedSub, U> Sub<Delta<T, U>> for Point<T, U> {
    type Output = Point<T, U>;

    #[inline]
    fn sub(self, rhs: Delta<T, U>) -> Self::Output {
        Point::new(self.0.checked_sub(&rhs.0).expect("overflow in Point - Delta"))
    }
}

impl<T: CheckedSub, U> SubAssign<Delta<T, U>> for Point<T, U> {
    #[inline]
    fn sub_assign(&mut self, rhs: Delta<T, U>) {
        self.0 = self.0.checked_sub(&rhs.0).expect("overflow in Point -= Delta");
    }
}

impl<T: CheckedSub, U> Sub<Point<T, U>> for Point<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn sub(self, rhs: Point<T, U>) -> Self::Output {
        Delta::new(self.0.checked_sub(&rhs.0).expect("overflow in Point - Point"))
    }
}

/// A signed displacement between two [`Point`]s on the same axis.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Delta<T, U>(T, core::marker::PhantomData<U>);

impl<T, U> Delta<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Delta(value, core::marker::PhantomData)
    }

    #[inline]
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Delta::new(T::zero())
    }

    #[inline]
    pub const fn value(self) -> T
    where
        T: Copy,
    {
        self.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool
    where
        T: Zero + PartialOrd,
    {
        self.0 > T::zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool
    where
        T: Zero + PartialOrd,
    {
        self.0 < T::zero()
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Delta<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_DELTA, self.0)
    }
}

impl<T: Zero, U> Default for Delta<T, U> {
    #[inline]
    fn default() -> Self {
        Delta::new(T::zero())
    }
}

impl<T, U> From<T> for Delta<T, U> {
    #[inline]
    fn from(v: T) -> Self {
        Delta::new(v)
    }
}

impl<T: CheckedAdd, U> Add for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Delta::new(self.0.checked_add(&rhs.0).expect("overflow in Delta + Delta"))
    }
}

impl<T: CheckedSub, U> Sub for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Delta::new(self.0.checked_sub(&rhs.0).expect("overflow in Delta - Delta"))
    }
}

impl<T: CheckedNeg, U> Neg for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn neg(self) -> Self::Output {
        Delta::new(self.0.checked_neg().expect("overflow in -Delta"))
    }
}

impl<T: CheckedMul, U> Mul<T> for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn mul(self, rhs: T) -> Self::Output {
        Delta::new(self.0.checked_mul(&rhs).expect("overflow in Delta * scalar"))
    }
}

impl<T: Zero + CheckedAdd, U> Sum for Delta<T, U> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Delta::new(T::zero()), |acc, x| acc + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Axis;
    impl MarkerName for Axis {
        const NAME_POINT: &'static str = "AxisPoint";
        const NAME_DELTA: &'static str = "AxisDelta";
    }

    fn tp(v: i64) -> Point<i64, Axis> {
        Point::new(v)
    }
    fn dt(v: i64) -> Delta<i64, Axis> {
        Delta::new(v)
    }

    #[test]
    fn test_repr_is_transparent() {
        assert_eq!(
            std::mem::size_of::<Point<i64, Axis>>(),
            std::mem::size_of::<i64>()
        );
        assert_eq!(
            std::mem::size_of::<Delta<i64, Axis>>(),
            std::mem::size_of::<i64>()
        );
    }

    #[test]
    fn test_display_uses_marker_names() {
        assert_eq!(tp(42).to_string(), "AxisPoint(42)");
        assert_eq!(dt(-7).to_string(), "AxisDelta(-7)");
    }

    #[test]
    fn test_point_delta_arithmetic() {
        let mut p = tp(10) + dt(5);
        assert_eq!(p.value(), 15);
        p -= dt(3);
        assert_eq!(p.value(), 12);
        p += dt(8);
        assert_eq!((p - tp(0)).value(), 20);
        assert_eq!(tp(3).checked_since(tp(10)).map(|d| d.value()), Some(-7));
    }

    #[test]
    fn test_checked_and_saturating_edges() {
        assert!(tp(i64::MAX).checked_add(dt(1)).is_none());
        assert!(tp(i64::MIN).checked_sub(dt(1)).is_none());
        assert_eq!(tp(i64::MAX).saturating_add(dt(5)).value(), i64::MAX);
        assert_eq!(tp(i64::MIN).saturating_sub(dt(5)).value(), i64::MIN);
    }

    #[test]
    fn test_delta_ops_and_sum() {
        assert_eq!((dt(7) + dt(3)).value(), 10);
        assert_eq!((dt(7) - dt(10)).value(), -3);
        assert_eq!((-dt(4)).value(), -4);
        assert_eq!((dt(4) * 3).value(), 12);
        let total: Delta<i64, Axis> = vec![dt(1), dt(2), dt(3)].into_iter().sum();
        assert_eq!(total.value(), 6);
        assert!(dt(1).is_positive());
        assert!(dt(-1).is_negative());
        assert!(!Delta::<i64, Axis>::zero().is_positive());
    }

    #[test]
    #[should_panic(expected = "overflow in Point + Delta")]
    fn test_operator_overflow_panics() {
        let _ = tp(i64::MAX) + dt(1);
    }
}
