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

use crate::{capacity::FlightLedger, config::RoutingRules};
use freight_alloc_core::prelude::{Quantity, TimeDelta, TimePoint};
use freight_alloc_model::prelude::{AirportCode, Flight, Order, Problem, Route};

/// A feasible-by-timing route together with its free capacity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteCandidate {
    legs: Route,
    capacity: Quantity,
    departure: TimePoint<i64>,
    arrival: TimePoint<i64>,
    hub: Option<AirportCode>,
}

impl RouteCandidate {
    #[inline]
    pub fn legs(&self) -> &Route {
        &self.legs
    }

    #[inline]
    pub fn capacity(&self) -> Quantity {
        self.capacity
    }

    #[inline]
    pub fn stops(&self) -> usize {
        self.legs.len().saturating_sub(1)
    }

    #[inline]
    pub fn is_direct(&self) -> bool {
        self.legs.len() == 1
    }

    #[inline]
    pub fn departure(&self) -> TimePoint<i64> {
        self.departure
    }

    #[inline]
    pub fn arrival(&self) -> TimePoint<i64> {
        self.arrival
    }

    #[inline]
    pub fn hub(&self) -> Option<&AirportCode> {
        self.hub.as_ref()
    }
}

/// Enumerates direct and one-stop routes for an order.
///
/// Every leg must depart inside the order's window `[order_time, deadline]`
/// and be present in the ledger, which excludes cancelled flights.
#[derive(Debug, Clone)]
pub struct RouteCandidateGenerator<'p> {
    problem: &'p Problem,
    hubs: Vec<AirportCode>,
    min_connection: TimeDelta<i64>,
}

impl<'p> RouteCandidateGenerator<'p> {
    pub fn new(problem: &'p Problem, rules: &RoutingRules) -> Self {
        Self {
            problem,
            hubs: rules.hub_codes(),
            min_connection: rules.min_connection(),
        }
    }

    #[inline]
    pub fn hubs(&self) -> &[AirportCode] {
        &self.hubs
    }

    #[inline]
    fn usable(&self, flight: &Flight, order: &Order, ledger: &FlightLedger) -> bool {
        ledger.contains(flight.id()) && order.departure_window().contains_closed(flight.departure())
    }

    pub fn direct(&self, order: &Order, ledger: &FlightLedger) -> Vec<RouteCandidate> {
        self.problem
            .departures_from(order.origin())
            .filter(|f| f.destination() == order.destination() && self.usable(f, order, ledger))
            .filter_map(|f| {
                let capacity = ledger.remaining(f.id());
                (capacity > 0).then(|| RouteCandidate {
                    legs: Route::from_slice(&[f.id()]),
                    capacity,
                    departure: f.departure(),
                    arrival: f.arrival(),
                    hub: None,
                })
            })
            .collect()
    }

    pub fn one_stop(&self, order: &Order, ledger: &FlightLedger) -> Vec<RouteCandidate> {
        let mut out = Vec::new();
        for hub in &self.hubs {
            if hub == order.origin() || hub == order.destination() {
                continue;
            }
            if self.problem.airport(hub).is_none() {
                continue;
            }
            for first in self
                .problem
                .departures_from(order.origin())
                .filter(|f| f.destination() == hub && self.usable(f, order, ledger))
            {
                let first_cap = ledger.remaining(first.id());
                if first_cap == 0 {
                    continue;
                }
                let ready = first.arrival() + self.min_connection;
                for second in self.problem.departures_from(hub).filter(|f| {
                    f.destination() == order.destination()
                        && f.departure() >= ready
                        && self.usable(f, order, ledger)
                }) {
                    let capacity = first_cap.min(ledger.remaining(second.id()));
                    if capacity == 0 {
                        continue;
                    }
                    out.push(RouteCandidate {
                        legs: Route::from_slice(&[first.id(), second.id()]),
                        capacity,
                        departure: first.departure(),
                        arrival: second.arrival(),
                        hub: Some(hub.clone()),
                    });
                }
            }
        }
        out
    }

    /// Direct and one-stop routes, fewest stops first, then earliest arrival.
    pub fn candidates(&self, order: &Order, ledger: &FlightLedger) -> Vec<RouteCandidate> {
        let mut all = self.direct(order, ledger);
        all.extend(self.one_stop(order, ledger));
        all.sort_by(|a, b| {
            a.stops()
                .cmp(&b.stops())
                .then_with(|| a.arrival.cmp(&b.arrival))
                .then_with(|| a.departure.cmp(&b.departure))
                .then_with(|| a.legs.cmp(&b.legs))
        });
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freight_alloc_model::prelude::{
        Airport, Continent, FlightIdentifier, FlightStatus, OrderIdentifier,
    };

    fn fid(n: u32) -> FlightIdentifier {
        FlightIdentifier::new(n)
    }

    fn h(hours: i64) -> TimePoint<i64> {
        TimePoint::new(hours * 60)
    }

    fn flight(id: u32, from: &str, to: &str, dep: i64, arr: i64, cap: Quantity) -> Flight {
        Flight::new(
            fid(id),
            AirportCode::from(from),
            AirportCode::from(to),
            h(dep),
            h(arr),
            cap,
        )
        .unwrap()
    }

    fn setup(flights: Vec<Flight>) -> (Problem, Order) {
        let airports = vec![
            Airport::new("SKBO", 800, -5, Continent::America).unwrap(),
            Airport::new("SPIM", 800, -5, Continent::America).unwrap(),
            Airport::new("EBCI", 800, 1, Continent::Europe).unwrap(),
            Airport::new("UBBB", 800, 4, Continent::Asia).unwrap(),
        ];
        let order =
            Order::new(OrderIdentifier::new(1), &airports[0], &airports[2], 40, h(0)).unwrap();
        (Problem::new(airports, flights, vec![order.clone()]), order)
    }

    #[test]
    fn test_direct_respects_window_and_cancellation() {
        let (p, order) = setup(vec![
            flight(1, "SKBO", "EBCI", 2, 14, 100),
            flight(2, "SKBO", "EBCI", 80, 92, 100),
            flight(3, "SKBO", "EBCI", 5, 17, 100).with_status(FlightStatus::Cancelled),
            flight(4, "SKBO", "SPIM", 1, 4, 100),
        ]);
        let ledger = FlightLedger::new(&p);
        let generator = RouteCandidateGenerator::new(&p, &RoutingRules::default());
        let direct = generator.direct(&order, &ledger);
        assert_eq!(direct.len(), 1);
        assert_eq!(direct[0].legs().as_slice(), &[fid(1)]);
        assert_eq!(direct[0].capacity(), 100);
    }

    #[test]
    fn test_one_stop_needs_minimum_connection() {
        let (p, order) = setup(vec![
            flight(1, "SKBO", "SPIM", 1, 4, 120),
            flight(2, "SPIM", "EBCI", 4, 16, 90),
            flight(3, "SPIM", "EBCI", 5, 17, 60),
            flight(4, "SKBO", "UBBB", 1, 20, 100),
        ]);
        let ledger = FlightLedger::new(&p);
        let generator = RouteCandidateGenerator::new(&p, &RoutingRules::default());
        let routes = generator.one_stop(&order, &ledger);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].legs().as_slice(), &[fid(1), fid(3)]);
        assert_eq!(routes[0].capacity(), 60);
        assert_eq!(routes[0].hub(), Some(&AirportCode::from("SPIM")));
    }

    #[test]
    fn test_candidates_sorted_and_zero_capacity_dropped() {
        let (p, order) = setup(vec![
            flight(1, "SKBO", "SPIM", 1, 3, 100),
            flight(2, "SPIM", "EBCI", 4, 10, 100),
            flight(3, "SKBO", "EBCI", 8, 20, 100),
            flight(4, "SKBO", "EBCI", 6, 18, 100),
            flight(5, "SKBO", "EBCI", 7, 19, 100),
        ]);
        let mut ledger = FlightLedger::new(&p);
        ledger.consume(fid(5), 100).unwrap();
        let generator = RouteCandidateGenerator::new(&p, &RoutingRules::default());
        let legs: Vec<Vec<FlightIdentifier>> = generator
            .candidates(&order, &ledger)
            .into_iter()
            .map(|c| c.legs().to_vec())
            .collect();
        assert_eq!(legs, vec![vec![fid(4)], vec![fid(3)], vec![fid(1), fid(2)]]);
    }
}
