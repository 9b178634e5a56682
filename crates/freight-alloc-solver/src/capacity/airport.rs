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

use crate::capacity::err::InsufficientStorageError;
use freight_alloc_core::prelude::Quantity;
use freight_alloc_model::prelude::{Airport, AirportCode, Problem, Shipment, Solution};
use fxhash::FxHashMap;

/// Airports a shipment waits at between legs.
///
/// Origin and final destination are not transit storage and are skipped.
pub fn intermediate_stops<'a>(
    problem: &'a Problem,
    shipment: &'a Shipment,
) -> impl Iterator<Item = &'a AirportCode> + 'a {
    let legs = shipment.route();
    let inner = legs.len().saturating_sub(1);
    legs[..inner]
        .iter()
        .filter_map(move |leg| problem.flight(*leg).map(|f| f.destination()))
}

/// Per-airport transit storage bookkeeping.
///
/// Quantities move through two stages: a tentative reservation that can be
/// rolled back, and a commitment. Cloning gives an independent what-if copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirportCapacityTracker {
    capacity: FxHashMap<AirportCode, Quantity>,
    committed: FxHashMap<AirportCode, Quantity>,
    reserved: FxHashMap<AirportCode, Quantity>,
}

impl AirportCapacityTracker {
    pub fn new<'a>(airports: impl IntoIterator<Item = &'a Airport>) -> Self {
        Self {
            capacity: airports
                .into_iter()
                .map(|a| (a.code().clone(), a.storage_capacity()))
                .collect(),
            committed: FxHashMap::default(),
            reserved: FxHashMap::default(),
        }
    }

    /// Storage limits of `problem` with its committed baseline already loaded.
    pub fn from_problem(problem: &Problem) -> Self {
        let mut tracker = Self::new(problem.airports());
        for (code, load) in problem.baseline().iter_airports() {
            tracker.commit(code, load);
        }
        tracker
    }

    /// Baseline plus every intermediate stop used by `solution`.
    pub fn for_solution(problem: &Problem, solution: &Solution) -> Self {
        let mut tracker = Self::from_problem(problem);
        for s in solution.shipments() {
            for code in intermediate_stops(problem, s) {
                tracker.commit(code, s.quantity());
            }
        }
        tracker
    }

    #[inline]
    pub fn capacity(&self, code: &AirportCode) -> Quantity {
        self.capacity.get(code).copied().unwrap_or(0)
    }

    #[inline]
    pub fn committed(&self, code: &AirportCode) -> Quantity {
        self.committed.get(code).copied().unwrap_or(0)
    }

    #[inline]
    pub fn reserved(&self, code: &AirportCode) -> Quantity {
        self.reserved.get(code).copied().unwrap_or(0)
    }

    #[inline]
    fn load(&self, code: &AirportCode) -> Quantity {
        self.committed(code).saturating_add(self.reserved(code))
    }

    #[inline]
    pub fn available(&self, code: &AirportCode) -> Quantity {
        self.capacity(code).saturating_sub(self.load(code))
    }

    /// Unknown airports have no storage.
    #[inline]
    pub fn has_capacity(&self, code: &AirportCode, quantity: Quantity) -> bool {
        self.available(code) >= quantity
    }

    pub fn reserve(
        &mut self,
        code: &AirportCode,
        quantity: Quantity,
    ) -> Result<(), InsufficientStorageError> {
        let available = self.available(code);
        if available < quantity {
            return Err(InsufficientStorageError::new(
                code.clone(),
                quantity,
                available,
            ));
        }
        let slot = self.reserved.entry(code.clone()).or_insert(0);
        *slot = slot.saturating_add(quantity);
        Ok(())
    }

    /// Commits `quantity`, consuming a matching reservation first.
    ///
    /// Commitment is not capacity checked; overloads show up in
    /// [`Self::overloaded`].
    pub fn commit(&mut self, code: &AirportCode, quantity: Quantity) {
        if let Some(r) = self.reserved.get_mut(code) {
            *r = r.saturating_sub(quantity);
            if *r == 0 {
                self.reserved.remove(code);
            }
        }
        let slot = self.committed.entry(code.clone()).or_insert(0);
        *slot = slot.saturating_add(quantity);
    }

    pub fn release(&mut self, code: &AirportCode, quantity: Quantity) {
        if let Some(c) = self.committed.get_mut(code) {
            *c = c.saturating_sub(quantity);
        }
    }

    /// Drops every outstanding reservation.
    #[inline]
    pub fn rollback(&mut self) {
        self.reserved.clear();
    }

    #[inline]
    pub fn utilization(&self, code: &AirportCode) -> f64 {
        match self.capacity(code) {
            0 => 0.0,
            cap => self.load(code) as f64 / cap as f64,
        }
    }

    /// Airports whose load exceeds storage, with the excess, sorted by code.
    pub fn overloaded(&self) -> Vec<(AirportCode, Quantity)> {
        let mut out: Vec<_> = self
            .committed
            .keys()
            .chain(self.reserved.keys())
            .filter_map(|code| {
                let load = self.load(code);
                let cap = self.capacity(code);
                (load > cap).then(|| (code.clone(), load - cap))
            })
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Committed load per airport.
    #[inline]
    pub fn snapshot(&self) -> FxHashMap<AirportCode, Quantity> {
        self.committed.clone()
    }
}
