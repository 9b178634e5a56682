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

use freight_alloc_model::prelude::{ShipmentIdentifier, Solution};

/// Hands out shipment ids for one planning run.
///
/// Every allocator and engine instance draws from the sequence it is given,
/// so concurrent runs never share a counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentSequence {
    next: u64,
}

impl Default for ShipmentSequence {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ShipmentSequence {
    #[inline]
    pub fn new(first: u64) -> Self {
        Self { next: first }
    }

    /// Continues after the highest id already present in `solution`.
    #[inline]
    pub fn after(solution: &Solution) -> Self {
        let first = solution
            .max_shipment_id()
            .map(|id| id.into_inner().saturating_add(1))
            .unwrap_or(1);
        Self::new(first)
    }

    #[inline]
    pub fn peek(&self) -> ShipmentIdentifier {
        ShipmentIdentifier::new(self.next)
    }

    #[inline]
    pub fn next_id(&mut self) -> ShipmentIdentifier {
        let id = ShipmentIdentifier::new(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}
