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
    problem::builder::ProblemBuilder,
};
use freight_alloc_core::prelude::Quantity;
use fxhash::FxHashMap;

/// Capacity already spoken for by shipments that live outside a [`Problem`].
///
/// Replanning a subset of orders must not hand out flight seats or hub
/// storage that the untouched part of the plan still uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommittedLoad {
    flights: FxHashMap<FlightIdentifier, Quantity>,
    airports: FxHashMap<AirportCode, Quantity>,
}

impl CommittedLoad {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_flight(&mut self, id: FlightIdentifier, quantity: Quantity) {
        let slot = self.flights.entry(id).or_insert(0);
        *slot = slot.saturating_add(quantity);
    }

    #[inline]
    pub fn add_airport(&mut self, code: AirportCode, quantity: Quantity) {
        let slot = self.airports.entry(code).or_insert(0);
        *slot = slot.saturating_add(quantity);
    }

    #[inline]
    pub fn flight_load(&self, id: FlightIdentifier) -> Quantity {
        self.flights.get(&id).copied().unwrap_or(0)
    }

    #[inline]
    pub fn airport_load(&self, code: &AirportCode) -> Quantity {
        self.airports.get(code).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty() && self.airports.is_empty()
    }

    #[inline]
    pub fn iter_airports(&self) -> impl Iterator<Item = (&AirportCode, Quantity)> + '_ {
        self.airports.iter().map(|(k, v)| (k, *v))
    }
}

/// Immutable planning input: reference network, demand and committed baseline.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    airports: Vec<Airport>,
    airport_index: FxHashMap<AirportCode, usize>,
    flights: Vec<Flight>,
    flight_index: FxHashMap<FlightIdentifier, usize>,
    departures: FxHashMap<AirportCode, Vec<usize>>,
    orders: Vec<Order>,
    order_index: FxHashMap<OrderIdentifier, usize>,
    baseline: CommittedLoad,
}

impl Problem {
    /// Lenient construction: inconsistent records are dropped with a warning,
    /// orders with unknown endpoints are kept so they surface as unroutable.
    pub fn new(airports: Vec<Airport>, flights: Vec<Flight>, orders: Vec<Order>) -> Self {
        ProblemBuilder::new()
            .with_airports(airports)
            .with_flights(flights)
            .with_orders(orders)
            .build_lenient()
    }

    pub(crate) fn from_parts(
        airports: Vec<Airport>,
        mut flights: Vec<Flight>,
        orders: Vec<Order>,
        baseline: CommittedLoad,
    ) -> Self {
        flights.sort_by(|a, b| {
            a.departure()
                .cmp(&b.departure())
                .then_with(|| a.id().cmp(&b.id()))
        });

        let airport_index = airports
            .iter()
            .enumerate()
            .map(|(i, a)| (a.code().clone(), i))
            .collect();
        let flight_index = flights.iter().enumerate().map(|(i, f)| (f.id(), i)).collect();
        let order_index = orders.iter().enumerate().map(|(i, o)| (o.id(), i)).collect();

        let mut departures: FxHashMap<AirportCode, Vec<usize>> = FxHashMap::default();
        for (i, f) in flights.iter().enumerate() {
            departures.entry(f.origin().clone()).or_default().push(i);
        }

        Self {
            airports,
            airport_index,
            flights,
            flight_index,
            departures,
            orders,
            order_index,
            baseline,
        }
    }

    #[inline]
    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    #[inline]
    pub fn airport(&self, code: &AirportCode) -> Option<&Airport> {
        self.airport_index.get(code).map(|&i| &self.airports[i])
    }

    /// Flights sorted by departure, then id.
    #[inline]
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    #[inline]
    pub fn flight(&self, id: FlightIdentifier) -> Option<&Flight> {
        self.flight_index.get(&id).map(|&i| &self.flights[i])
    }

    /// Flights leaving `origin`, in departure order.
    pub fn departures_from<'a>(
        &'a self,
        origin: &AirportCode,
    ) -> impl Iterator<Item = &'a Flight> + use<'a> {
        self.departures
            .get(origin)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&i| &self.flights[i])
    }

    #[inline]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[inline]
    pub fn order(&self, id: OrderIdentifier) -> Option<&Order> {
        self.order_index.get(&id).map(|&i| &self.orders[i])
    }

    #[inline]
    pub fn baseline(&self) -> &CommittedLoad {
        &self.baseline
    }

    #[inline]
    pub fn total_demand(&self) -> u64 {
        self.orders.iter().map(|o| o.quantity() as u64).sum()
    }

    /// Same network and baseline, restricted to the given orders.
    pub fn restricted_to(&self, keep: &[OrderIdentifier]) -> Problem {
        let orders = keep
            .iter()
            .filter_map(|id| self.order(*id).cloned())
            .collect();
        Problem::from_parts(
            self.airports.clone(),
            self.flights.clone(),
            orders,
            self.baseline.clone(),
        )
    }
}
