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

use num_traits::Float;
use std::fmt::Debug;

/// Exponentially weighted moving average over a float type.
#[derive(Debug, Clone, PartialEq)]
pub struct Ewma<F> {
    alpha: F,
    value: Option<F>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidAlphaError<F> {
    value: F,
}

impl<F: Float + Debug> InvalidAlphaError<F> {
    pub fn new(value: F) -> Self {
        Self { value }
    }

    pub fn value(&self) -> F {
        self.value
    }
}

impl<F: Float + Debug> std::fmt::Display for InvalidAlphaError<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid alpha value {:?}. Allowed range is (0.0, 1.0].",
            self.value
        )
    }
}

impl<F: Float + Debug> std::error::Error for InvalidAlphaError<F> {}

impl<F: Float + Debug> Ewma<F> {
    #[inline]
    pub fn new(alpha: F) -> Result<Self, InvalidAlphaError<F>> {
        if !alpha.is_finite() || alpha <= F::zero() || alpha > F::one() {
            return Err(InvalidAlphaError::new(alpha));
        }
        Ok(Self { alpha, value: None })
    }

    /// Alpha chosen so that an observation loses half its weight after `window` steps.
    #[inline]
    pub fn with_half_life(window: F) -> Result<Self, InvalidAlphaError<F>> {
        if !window.is_finite() || window <= F::zero() {
            return Err(InvalidAlphaError::new(window));
        }
        let two = F::one() + F::one();
        let alpha = F::one() - (F::one() / two).powf(F::one() / window);
        Self::new(alpha)
    }

    #[inline]
    pub fn alpha(&self) -> F {
        self.alpha
    }

    #[inline]
    pub fn value(&self) -> Option<F> {
        self.value
    }

    #[inline]
    pub fn value_or_zero(&self) -> F {
        self.value.unwrap_or_else(F::zero)
    }

    #[inline]
    pub fn reset(&mut self) {
        self.value = None;
    }

    pub fn observe(&mut self, x: F) -> F {
        let next = match self.value {
            None => x,
            Some(current) => x * self.alpha + current * (F::one() - self.alpha),
        };
        self.value = Some(next);
        next
    }
}

/// Incremental arithmetic mean that never stores its samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunningMean {
    count: u64,
    mean: f64,
}

impl RunningMean {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[inline]
    pub fn observe(&mut self, x: f64) -> f64 {
        self.count += 1;
        self.mean += (x - self.mean) / self.count as f64;
        self.mean
    }
}
