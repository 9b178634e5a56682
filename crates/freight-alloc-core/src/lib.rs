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

//! Primitive building blocks shared by the freight allocation crates.
//!
//! Time is modelled as minutes on an affine axis: [`primitives::TimePoint`]
//! for instants, [`primitives::TimeDelta`] for durations. Search statistics
//! live in [`math`].

pub mod math;
pub mod primitives;

pub mod prelude {
    pub use crate::math::{Ewma, InvalidAlphaError, RunningMean};
    pub use crate::primitives::{
        Delta, Interval, InvertedIntervalError, MINUTES_PER_HOUR, Point, TimeDelta,
        TimeInterval, TimePoint,
    };

    /// Objective values are non-negative penalty sums.
    pub type Cost = f64;

    /// Package counts.
    pub type Quantity = u32;
}
