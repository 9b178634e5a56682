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

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvertedIntervalError;

impl fmt::Display for InvertedIntervalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interval end lies before its start")
    }
}

impl std::error::Error for InvertedIntervalError {}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval<P> {
    start: P,
    end: P,
}

impl<P: Ord + Copy> Interval<P> {
    #[inline]
    pub fn new(start: P, end: P) -> Result<Self, InvertedIntervalError> {
        if end < start {
            return Err(InvertedIntervalError);
        }
        Ok(Self { start, end })
    }

    /// Interval covering both points regardless of their order.
    #[inline]
    pub fn spanning(a: P, b: P) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    #[inline]
    pub fn start(&self) -> P {
        self.start
    }

    #[inline]
    pub fn end(&self) -> P {
        self.end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn contains(&self, p: P) -> bool {
        self.start <= p && p < self.end
    }

    /// Like [`Interval::contains`] but also accepts the end point.
    #[inline]
    pub fn contains_closed(&self, p: P) -> bool {
        self.start <= p && p <= self.end
    }

    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    #[inline]
    pub fn length<D>(&self) -> D
    where
        P: std::ops::Sub<P, Output = D>,
    {
        self.end - self.start
    }
}

impl<P: fmt::Display> fmt::Display for Interval<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{TimeDelta, TimeInterval, TimePoint};

    fn iv(a: i64, b: i64) -> TimeInterval<i64> {
        TimeInterval::new(TimePoint::new(a), TimePoint::new(b)).unwrap()
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        assert!(TimeInterval::new(TimePoint::new(5i64), TimePoint::new(4)).is_err());
        assert!(iv(4, 4).is_empty());
        let s = TimeInterval::spanning(TimePoint::new(9i64), TimePoint::new(2));
        assert_eq!(s.start(), TimePoint::new(2));
        assert_eq!(s.end(), TimePoint::new(9));
    }

    #[test]
    fn test_contains_is_half_open() {
        let w = iv(10, 20);
        assert!(w.contains(TimePoint::new(10)));
        assert!(w.contains(TimePoint::new(19)));
        assert!(!w.contains(TimePoint::new(20)));
        assert!(w.contains_closed(TimePoint::new(20)));
        assert!(!w.contains(TimePoint::new(9)));
    }

    #[test]
    fn test_intersects_and_length() {
        assert!(iv(0, 10).intersects(&iv(9, 12)));
        assert!(!iv(0, 10).intersects(&iv(10, 12)));
        assert_eq!(iv(3, 10).length(), TimeDelta::new(7));
    }
}
