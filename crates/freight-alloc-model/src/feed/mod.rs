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
    common::{FlightIdentifier, OrderIdentifier},
    demand::Order,
    network::{Airport, Flight, FlightStatus},
};
use freight_alloc_core::prelude::{Quantity, TimeInterval, TimePoint};
use fxhash::FxHashMap;

/// Time-sliced source of planning input.
///
/// The planner only pulls from a feed; storage and transport are the
/// implementor's business.
pub trait DataFeed {
    fn airports(&self) -> Vec<Airport>;

    /// Flights departing inside `window`.
    fn flights(&self, window: TimeInterval<i64>) -> Vec<Flight>;

    /// Orders placed inside `window`.
    fn orders(&self, window: TimeInterval<i64>) -> Vec<Order>;

    /// Orders with quantity that no plan has claimed yet.
    fn pending_orders(&self) -> Vec<Order>;

    /// Flights cancelled inside `window`.
    fn cancelled_flight_ids(&self, window: TimeInterval<i64>) -> Vec<FlightIdentifier>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryFeed {
    airports: Vec<Airport>,
    flights: Vec<Flight>,
    orders: Vec<Order>,
    assigned: FxHashMap<OrderIdentifier, Quantity>,
    cancellations: Vec<(FlightIdentifier, TimePoint<i64>)>,
}

impl InMemoryFeed {
    pub fn new(airports: Vec<Airport>, flights: Vec<Flight>, orders: Vec<Order>) -> Self {
        Self {
            airports,
            flights,
            orders,
            assigned: FxHashMap::default(),
            cancellations: Vec::new(),
        }
    }

    /// Records `quantity` more units of `order` as planned.
    pub fn mark_assigned(&mut self, order: OrderIdentifier, quantity: Quantity) {
        let slot = self.assigned.entry(order).or_insert(0);
        *slot = slot.saturating_add(quantity);
    }

    #[inline]
    pub fn assigned(&self, order: OrderIdentifier) -> Quantity {
        self.assigned.get(&order).copied().unwrap_or(0)
    }

    /// Marks a flight cancelled at `at`. Returns `false` for unknown or
    /// already cancelled flights.
    pub fn cancel_flight(&mut self, id: FlightIdentifier, at: TimePoint<i64>) -> bool {
        let Some(flight) = self.flights.iter_mut().find(|f| f.id() == id) else {
            return false;
        };
        if flight.is_cancelled() {
            return false;
        }
        flight.set_status(FlightStatus::Cancelled);
        self.cancellations.push((id, at));
        tracing::info!(flight = %id, at = at.value(), "flight cancelled");
        true
    }

    #[inline]
    pub fn flight(&self, id: FlightIdentifier) -> Option<&Flight> {
        self.flights.iter().find(|f| f.id() == id)
    }
}

impl DataFeed for InMemoryFeed {
    fn airports(&self) -> Vec<Airport> {
        self.airports.clone()
    }

    fn flights(&self, window: TimeInterval<i64>) -> Vec<Flight> {
        self.flights
            .iter()
            .filter(|f| window.contains(f.departure()))
            .cloned()
            .collect()
    }

    fn orders(&self, window: TimeInterval<i64>) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|o| window.contains(o.order_time()))
            .cloned()
            .collect()
    }

    fn pending_orders(&self) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|o| self.assigned(o.id()) < o.quantity())
            .cloned()
            .collect()
    }

    fn cancelled_flight_ids(&self, window: TimeInterval<i64>) -> Vec<FlightIdentifier> {
        self.cancellations
            .iter()
            .filter(|(_, at)| window.contains(*at))
            .map(|(id, _)| *id)
            .collect()
    }
}
