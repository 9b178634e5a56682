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

use crate::{
    common::{FlightIdentifier, OrderIdentifier, ShipmentIdentifier},
    problem::Problem,
    solution::{err::SolutionValidationError, shipment::Shipment},
};
use freight_alloc_core::prelude::{Cost, Quantity, TimeDelta};
use fxhash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Bookkeeping attached to a solution by the search that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub iterations: u64,
    pub best_iteration: u64,
    pub termination: Option<String>,
    pub elapsed_ms: u64,
    pub initial_cost: Cost,
    pub final_cost: Cost,
}

/// All shipments of a plan together with search statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    shipments: Vec<Shipment>,
    stats: SearchStats,
}

impl Solution {
    #[inline]
    pub fn new(shipments: Vec<Shipment>) -> Self {
        Self {
            shipments,
            stats: SearchStats::default(),
        }
    }

    #[inline]
    pub fn with_stats(mut self, stats: SearchStats) -> Self {
        self.stats = stats;
        self
    }

    #[inline]
    pub fn shipments(&self) -> &[Shipment] {
        &self.shipments
    }

    #[inline]
    pub fn into_shipments(self) -> Vec<Shipment> {
        self.shipments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shipments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shipments.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[inline]
    pub fn stats_mut(&mut self) -> &mut SearchStats {
        &mut self.stats
    }

    #[inline]
    pub fn position(&self, id: ShipmentIdentifier) -> Option<usize> {
        self.shipments.iter().position(|s| s.id() == id)
    }

    #[inline]
    pub fn shipment(&self, id: ShipmentIdentifier) -> Option<&Shipment> {
        self.shipments.iter().find(|s| s.id() == id)
    }

    #[inline]
    pub fn shipment_mut(&mut self, id: ShipmentIdentifier) -> Option<&mut Shipment> {
        self.shipments.iter_mut().find(|s| s.id() == id)
    }

    #[inline]
    pub fn push(&mut self, shipment: Shipment) {
        self.shipments.push(shipment);
    }

    #[inline]
    pub fn extend(&mut self, shipments: impl IntoIterator<Item = Shipment>) {
        self.shipments.extend(shipments);
    }

    /// Inserts at `index`, clamped to the end.
    #[inline]
    pub fn insert(&mut self, index: usize, shipment: Shipment) {
        let index = index.min(self.shipments.len());
        self.shipments.insert(index, shipment);
    }

    /// Removes a shipment, keeping the relative order of the rest.
    pub fn remove(&mut self, id: ShipmentIdentifier) -> Option<Shipment> {
        let pos = self.position(id)?;
        Some(self.shipments.remove(pos))
    }

    #[inline]
    pub fn retain(&mut self, keep: impl FnMut(&Shipment) -> bool) {
        self.shipments.retain(keep);
    }

    pub fn shipments_using(&self, flight: FlightIdentifier) -> impl Iterator<Item = &Shipment> {
        self.shipments.iter().filter(move |s| s.uses_flight(flight))
    }

    pub fn shipments_of(&self, order: OrderIdentifier) -> impl Iterator<Item = &Shipment> {
        self.shipments.iter().filter(move |s| s.order() == order)
    }

    #[inline]
    pub fn max_shipment_id(&self) -> Option<ShipmentIdentifier> {
        self.shipments.iter().map(|s| s.id()).max()
    }

    /// Units carried by each flight.
    pub fn flight_loads(&self) -> FxHashMap<FlightIdentifier, Quantity> {
        let mut loads: FxHashMap<FlightIdentifier, Quantity> = FxHashMap::default();
        for s in &self.shipments {
            for leg in s.route() {
                let slot = loads.entry(*leg).or_insert(0);
                *slot = slot.saturating_add(s.quantity());
            }
        }
        loads
    }

    /// Routed units per order; empty shipments are not counted.
    pub fn assigned_per_order(&self) -> FxHashMap<OrderIdentifier, u64> {
        let mut assigned: FxHashMap<OrderIdentifier, u64> = FxHashMap::default();
        for s in self.shipments.iter().filter(|s| !s.is_empty()) {
            *assigned.entry(s.order()).or_insert(0) += s.quantity() as u64;
        }
        assigned
    }

    #[inline]
    pub fn direct_count(&self) -> usize {
        self.shipments.iter().filter(|s| s.is_direct()).count()
    }

    #[inline]
    pub fn connecting_count(&self) -> usize {
        self.shipments.iter().filter(|s| s.is_connecting()).count()
    }

    #[inline]
    pub fn empty_count(&self) -> usize {
        self.shipments.iter().filter(|s| s.is_empty()).count()
    }

    #[inline]
    pub fn total_quantity(&self) -> u64 {
        self.shipments.iter().map(|s| s.quantity() as u64).sum()
    }

    #[inline]
    pub fn routed_quantity(&self) -> u64 {
        self.shipments
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.quantity() as u64)
            .sum()
    }

    /// Structural check against `problem`.
    ///
    /// Capacity overloads are not structural; they are priced by the cost
    /// function instead.
    pub fn validate(
        &self,
        problem: &Problem,
        min_connection: TimeDelta<i64>,
    ) -> Result<(), SolutionValidationError> {
        let mut seen = FxHashSet::default();
        for s in &self.shipments {
            if !seen.insert(s.id()) {
                return Err(SolutionValidationError::DuplicateShipment(s.id()));
            }
            if s.quantity() == 0 {
                return Err(SolutionValidationError::ZeroQuantity(s.id()));
            }
            let order = problem
                .order(s.order())
                .ok_or(SolutionValidationError::UnknownOrder(s.id(), s.order()))?;
            if s.is_empty() {
                continue;
            }

            let mut at = order.origin();
            let mut ready = None;
            for leg in s.route() {
                let flight = problem
                    .flight(*leg)
                    .ok_or(SolutionValidationError::UnknownFlight(s.id(), *leg))?;
                if flight.origin() != at {
                    return Err(SolutionValidationError::BrokenRoute(s.id()));
                }
                if let Some(arrived) = ready
                    && flight.departure() < arrived + min_connection
                {
                    return Err(SolutionValidationError::ConnectionTooShort(s.id()));
                }
                at = flight.destination();
                ready = Some(flight.arrival());
            }
            if at != order.destination() {
                return Err(SolutionValidationError::BrokenRoute(s.id()));
            }
        }

        for (order, assigned) in self.assigned_per_order() {
            if let Some(o) = problem.order(order)
                && assigned > o.quantity() as u64
            {
                return Err(SolutionValidationError::OverAssigned {
                    order,
                    assigned,
                    requested: o.quantity(),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<Shipment> for Solution {
    fn from_iter<I: IntoIterator<Item = Shipment>>(iter: I) -> Self {
        Solution::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::AirportCode,
        demand::Order,
        network::{Airport, Continent, Flight},
    };
    use freight_alloc_core::prelude::TimePoint;

    fn fid(n: u32) -> FlightIdentifier {
        FlightIdentifier::new(n)
    }

    fn oid(n: u32) -> OrderIdentifier {
        OrderIdentifier::new(n)
    }

    fn sid(n: u64) -> ShipmentIdentifier {
        ShipmentIdentifier::new(n)
    }

    fn hours(h: i64) -> TimePoint<i64> {
        TimePoint::new(h * 60)
    }

    fn problem() -> Problem {
        let airports = vec![
            Airport::new("SKBO", 800, -5, Continent::America).unwrap(),
            Airport::new("SPIM", 800, -5, Continent::America).unwrap(),
            Airport::new("EBCI", 800, 1, Continent::Europe).unwrap(),
        ];
        let flight = |id, from: &str, to: &str, dep, arr| {
            Flight::new(
                fid(id),
                AirportCode::from(from),
                AirportCode::from(to),
                hours(dep),
                hours(arr),
                100,
            )
            .unwrap()
        };
        let flights = vec![
            flight(1, "SKBO", "SPIM", 1, 4),
            flight(2, "SPIM", "EBCI", 6, 18),
            flight(3, "SPIM", "EBCI", 4, 16),
        ];
        let orders = vec![
            Order::new(oid(1), &airports[0], &airports[2], 40, hours(0)).unwrap(),
        ];
        Problem::new(airports, flights, orders)
    }

    #[test]
    fn test_aggregates() {
        let sol = Solution::new(vec![
            Shipment::new(sid(1), oid(1), 10, [fid(1), fid(2)]),
            Shipment::new(sid(2), oid(1), 15, [fid(1), fid(2)]),
            Shipment::new(sid(3), oid(2), 5, [fid(2)]),
            Shipment::unrouted(sid(4), oid(1), 7),
        ]);

        let loads = sol.flight_loads();
        assert_eq!(loads[&fid(1)], 25);
        assert_eq!(loads[&fid(2)], 30);
        assert_eq!(sol.assigned_per_order()[&oid(1)], 25);
        assert_eq!(sol.direct_count(), 1);
        assert_eq!(sol.connecting_count(), 2);
        assert_eq!(sol.empty_count(), 1);
        assert_eq!(sol.total_quantity(), 37);
        assert_eq!(sol.routed_quantity(), 30);
        assert_eq!(sol.max_shipment_id(), Some(sid(4)));
        assert_eq!(sol.shipments_using(fid(1)).count(), 2);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut sol: Solution = (1..=3)
            .map(|i| Shipment::unrouted(sid(i), oid(1), 1))
            .collect();
        assert!(sol.remove(sid(2)).is_some());
        assert!(sol.remove(sid(2)).is_none());
        let ids: Vec<_> = sol.shipments().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![sid(1), sid(3)]);
    }

    #[test]
    fn test_validate_accepts_chained_route() {
        let p = problem();
        let sol = Solution::new(vec![
            Shipment::new(sid(1), oid(1), 30, [fid(1), fid(2)]),
            Shipment::unrouted(sid(2), oid(1), 10),
        ]);
        assert_eq!(sol.validate(&p, TimeDelta::from_hours(1)), Ok(()));
    }

    #[test]
    fn test_validate_rejects_tight_connection_and_broken_chain() {
        let p = problem();
        let tight = Solution::new(vec![Shipment::new(sid(1), oid(1), 5, [fid(1), fid(3)])]);
        assert_eq!(
            tight.validate(&p, TimeDelta::from_hours(1)),
            Err(SolutionValidationError::ConnectionTooShort(sid(1)))
        );

        let broken = Solution::new(vec![Shipment::new(sid(1), oid(1), 5, [fid(2)])]);
        assert_eq!(
            broken.validate(&p, TimeDelta::from_hours(1)),
            Err(SolutionValidationError::BrokenRoute(sid(1)))
        );
    }

    #[test]
    fn test_validate_rejects_over_assignment() {
        let p = problem();
        let sol = Solution::new(vec![
            Shipment::new(sid(1), oid(1), 30, [fid(1), fid(2)]),
            Shipment::new(sid(2), oid(1), 30, [fid(1), fid(2)]),
        ]);
        assert!(matches!(
            sol.validate(&p, TimeDelta::from_hours(1)),
            Err(SolutionValidationError::OverAssigned { assigned: 60, .. })
        ));
    }
}
