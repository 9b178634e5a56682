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

use crate::capacity::err::UnknownFlightError;
use freight_alloc_core::prelude::Quantity;
use freight_alloc_model::prelude::{FlightIdentifier, Problem, Solution};
use fxhash::FxHashMap;

/// Remaining seats per usable flight.
///
/// Cancelled flights are not part of the ledger. Balances may go negative
/// when a plan overbooks; [`FlightLedger::remaining`] reports those as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightLedger {
    remaining: FxHashMap<FlightIdentifier, i64>,
}

impl FlightLedger {
    /// Capacity minus the committed baseline.
    pub fn new(problem: &Problem) -> Self {
        let remaining = problem
            .flights()
            .iter()
            .filter(|f| !f.is_cancelled())
            .map(|f| {
                let free = f.capacity() as i64 - problem.baseline().flight_load(f.id()) as i64;
                (f.id(), free)
            })
            .collect();
        Self { remaining }
    }

    pub fn for_solution(problem: &Problem, solution: &Solution) -> Self {
        let mut ledger = Self::new(problem);
        for s in solution.shipments() {
            for leg in s.route() {
                ledger.debit(*leg, s.quantity());
            }
        }
        ledger
    }

    #[inline]
    fn debit(&mut self, id: FlightIdentifier, quantity: Quantity) {
        if let Some(r) = self.remaining.get_mut(&id) {
            *r -= quantity as i64;
        }
    }

    #[inline]
    pub fn contains(&self, id: FlightIdentifier) -> bool {
        self.remaining.contains_key(&id)
    }

    #[inline]
    pub fn remaining(&self, id: FlightIdentifier) -> Quantity {
        self.remaining
            .get(&id)
            .map(|r| (*r).clamp(0, Quantity::MAX as i64) as Quantity)
            .unwrap_or(0)
    }

    /// Signed balance; negative means overbooked.
    #[inline]
    pub fn balance(&self, id: FlightIdentifier) -> Option<i64> {
        self.remaining.get(&id).copied()
    }

    pub fn consume(
        &mut self,
        id: FlightIdentifier,
        quantity: Quantity,
    ) -> Result<(), UnknownFlightError> {
        let r = self.remaining.get_mut(&id).ok_or(UnknownFlightError(id))?;
        *r -= quantity as i64;
        Ok(())
    }

    pub fn restore(
        &mut self,
        id: FlightIdentifier,
        quantity: Quantity,
    ) -> Result<(), UnknownFlightError> {
        let r = self.remaining.get_mut(&id).ok_or(UnknownFlightError(id))?;
        *r += quantity as i64;
        Ok(())
    }

    /// Bottleneck of a route; zero for empty routes or unknown legs.
    pub fn route_capacity(&self, legs: &[FlightIdentifier]) -> Quantity {
        legs.iter()
            .map(|leg| self.remaining(*leg))
            .min()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freight_alloc_core::prelude::TimePoint;
    use freight_alloc_model::prelude::{
        Airport, AirportCode, CommittedLoad, Continent, Flight, FlightStatus, OrderIdentifier,
        ProblemBuilder, Shipment, ShipmentIdentifier,
    };

    fn fid(n: u32) -> FlightIdentifier {
        FlightIdentifier::new(n)
    }

    fn problem() -> Problem {
        let airports = vec![
            Airport::new("SPIM", 500, -5, Continent::America).unwrap(),
            Airport::new("EBCI", 500, 1, Continent::Europe).unwrap(),
        ];
        let f = |id, cap| {
            Flight::new(
                fid(id),
                AirportCode::from("SPIM"),
                AirportCode::from("EBCI"),
                TimePoint::new(0),
                TimePoint::new(600),
                cap,
            )
            .unwrap()
        };
        let mut baseline = CommittedLoad::new();
        baseline.add_flight(fid(1), 30);
        ProblemBuilder::new()
            .with_airports(airports)
            .with_flights([
                f(1, 100),
                f(2, 80),
                f(3, 90).with_status(FlightStatus::Cancelled),
            ])
            .with_baseline(baseline)
            .build()
            .unwrap()
    }

    #[test]
    fn test_baseline_and_cancellations() {
        let ledger = FlightLedger::new(&problem());
        assert_eq!(ledger.remaining(fid(1)), 70);
        assert_eq!(ledger.remaining(fid(2)), 80);
        assert!(!ledger.contains(fid(3)));
        assert_eq!(ledger.route_capacity(&[fid(1), fid(2)]), 70);
        assert_eq!(ledger.route_capacity(&[fid(1), fid(3)]), 0);
        assert_eq!(ledger.route_capacity(&[]), 0);
    }

    #[test]
    fn test_overbooking_clamps_to_zero() {
        let p = problem();
        let sol = Solution::new(vec![Shipment::new(
            ShipmentIdentifier::new(1),
            OrderIdentifier::new(1),
            100,
            [fid(1)],
        )]);
        let mut ledger = FlightLedger::for_solution(&p, &sol);
        assert_eq!(ledger.balance(fid(1)), Some(-30));
        assert_eq!(ledger.remaining(fid(1)), 0);
        ledger.restore(fid(1), 50).unwrap();
        assert_eq!(ledger.remaining(fid(1)), 20);
        assert_eq!(ledger.consume(fid(9), 1), Err(UnknownFlightError(fid(9))));
    }
}
