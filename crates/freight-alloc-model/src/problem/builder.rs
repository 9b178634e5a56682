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
    common::{AirportCode, FlightIdentifier, OrderIdentifier},
    demand::Order,
    network::{Airport, Flight},
    problem::{
        err::{ProblemError, UnknownAirportError},
        prob::{CommittedLoad, Problem},
    },
};
use fxhash::FxHashSet;

/// Collects reference data and demand, then checks it for consistency.
///
/// In strict mode the first inconsistency aborts the build. Otherwise
/// offending flights and duplicates are dropped and reported through
/// `tracing`, while orders naming unknown airports are kept.
#[derive(Debug, Clone, Default)]
pub struct ProblemBuilder {
    airports: Vec<Airport>,
    flights: Vec<Flight>,
    orders: Vec<Order>,
    baseline: CommittedLoad,
    strict: bool,
}

impl ProblemBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn strict(mut self, yes: bool) -> Self {
        self.strict = yes;
        self
    }

    #[inline]
    pub fn with_airports(mut self, airports: impl IntoIterator<Item = Airport>) -> Self {
        self.airports.extend(airports);
        self
    }

    #[inline]
    pub fn with_flights(mut self, flights: impl IntoIterator<Item = Flight>) -> Self {
        self.flights.extend(flights);
        self
    }

    #[inline]
    pub fn with_orders(mut self, orders: impl IntoIterator<Item = Order>) -> Self {
        self.orders.extend(orders);
        self
    }

    #[inline]
    pub fn with_baseline(mut self, baseline: CommittedLoad) -> Self {
        self.baseline = baseline;
        self
    }

    #[inline]
    pub fn add_airport(&mut self, airport: Airport) -> &mut Self {
        self.airports.push(airport);
        self
    }

    #[inline]
    pub fn add_flight(&mut self, flight: Flight) -> &mut Self {
        self.flights.push(flight);
        self
    }

    #[inline]
    pub fn add_order(&mut self, order: Order) -> &mut Self {
        self.orders.push(order);
        self
    }

    pub fn build(self) -> Result<Problem, ProblemError> {
        let strict = self.strict;
        let (problem, issues) = self.assemble();
        match issues.into_iter().next() {
            Some(first) if strict => Err(first),
            _ => Ok(problem),
        }
    }

    /// Never fails; every issue is logged and resolved by dropping the record.
    pub fn build_lenient(self) -> Problem {
        self.assemble().0
    }

    fn assemble(self) -> (Problem, Vec<ProblemError>) {
        let mut issues = Vec::new();

        let mut seen_airports: FxHashSet<AirportCode> = FxHashSet::default();
        let mut airports = Vec::with_capacity(self.airports.len());
        for a in self.airports {
            if seen_airports.insert(a.code().clone()) {
                airports.push(a);
            } else {
                tracing::warn!(airport = %a.code(), "dropping duplicate airport");
                issues.push(ProblemError::DuplicateAirport(a.code().clone()));
            }
        }

        let mut seen_flights: FxHashSet<FlightIdentifier> = FxHashSet::default();
        let mut flights = Vec::with_capacity(self.flights.len());
        for f in self.flights {
            let unknown = [f.origin(), f.destination()]
                .into_iter()
                .find(|code| !seen_airports.contains(*code))
                .cloned();
            if let Some(code) = unknown {
                tracing::warn!(
                    flight = %f.id(),
                    airport = %code,
                    "dropping flight with unknown airport"
                );
                issues.push(UnknownAirportError::new(code, f.id().to_string()).into());
                continue;
            }
            if !seen_flights.insert(f.id()) {
                tracing::warn!(flight = %f.id(), "dropping duplicate flight");
                issues.push(ProblemError::DuplicateFlight(f.id()));
                continue;
            }
            flights.push(f);
        }

        let mut seen_orders: FxHashSet<OrderIdentifier> = FxHashSet::default();
        let mut orders = Vec::with_capacity(self.orders.len());
        for o in self.orders {
            if !seen_orders.insert(o.id()) {
                tracing::warn!(order = %o.id(), "dropping duplicate order");
                issues.push(ProblemError::DuplicateOrder(o.id()));
                continue;
            }
            let unknown = [o.origin(), o.destination()]
                .into_iter()
                .find(|code| !seen_airports.contains(*code))
                .cloned();
            if let Some(code) = unknown {
                tracing::warn!(
                    order = %o.id(),
                    airport = %code,
                    "order references unknown airport"
                );
                issues.push(UnknownAirportError::new(code, o.id().to_string()).into());
            }
            orders.push(o);
        }

        (
            Problem::from_parts(airports, flights, orders, self.baseline),
            issues,
        )
    }
}
