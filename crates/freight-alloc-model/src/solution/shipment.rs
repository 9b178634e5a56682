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

use crate::common::{FlightIdentifier, OrderIdentifier, ShipmentIdentifier};
use freight_alloc_core::prelude::Quantity;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Ordered flight legs; at most one connection in practice.
pub type Route = SmallVec<[FlightIdentifier; 2]>;

/// A quantity of one order travelling over a route.
///
/// An empty route marks the part of an order that could not be placed yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shipment {
    id: ShipmentIdentifier,
    order: OrderIdentifier,
    quantity: Quantity,
    route: Route,
}

impl Shipment {
    #[inline]
    pub fn new(
        id: ShipmentIdentifier,
        order: OrderIdentifier,
        quantity: Quantity,
        route: impl IntoIterator<Item = FlightIdentifier>,
    ) -> Self {
        Self {
            id,
            order,
            quantity,
            route: route.into_iter().collect(),
        }
    }

    #[inline]
    pub fn unrouted(id: ShipmentIdentifier, order: OrderIdentifier, quantity: Quantity) -> Self {
        Self::new(id, order, quantity, [])
    }

    #[inline]
    pub fn id(&self) -> ShipmentIdentifier {
        self.id
    }

    #[inline]
    pub fn order(&self) -> OrderIdentifier {
        self.order
    }

    #[inline]
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    #[inline]
    pub fn route(&self) -> &[FlightIdentifier] {
        &self.route
    }

    #[inline]
    pub fn legs(&self) -> usize {
        self.route.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }

    #[inline]
    pub fn is_direct(&self) -> bool {
        self.route.len() == 1
    }

    #[inline]
    pub fn is_connecting(&self) -> bool {
        self.route.len() > 1
    }

    #[inline]
    pub fn uses_flight(&self, flight: FlightIdentifier) -> bool {
        self.route.contains(&flight)
    }

    #[inline]
    pub fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }

    #[inline]
    pub fn set_route(&mut self, route: impl IntoIterator<Item = FlightIdentifier>) {
        self.route = route.into_iter().collect();
    }

    #[inline]
    pub fn same_route(&self, other: &Shipment) -> bool {
        self.route == other.route
    }
}

impl std::fmt::Display for Shipment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} x{} [", self.id, self.order, self.quantity)?;
        for (i, leg) in self.route.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", leg)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(n: u64) -> ShipmentIdentifier {
        ShipmentIdentifier::new(n)
    }

    #[test]
    fn test_route_shape_classification() {
        let oid = OrderIdentifier::new(1);
        let direct = Shipment::new(sid(1), oid, 10, [FlightIdentifier::new(5)]);
        let connecting = Shipment::new(
            sid(2),
            oid,
            10,
            [FlightIdentifier::new(5), FlightIdentifier::new(6)],
        );
        let empty = Shipment::unrouted(sid(3), oid, 10);

        assert!(direct.is_direct() && !direct.is_connecting());
        assert!(connecting.is_connecting() && !connecting.is_direct());
        assert!(empty.is_empty());
        assert!(connecting.uses_flight(FlightIdentifier::new(6)));
        assert!(!direct.same_route(&connecting));
    }

    #[test]
    fn test_display_lists_legs() {
        let s = Shipment::new(
            sid(4),
            OrderIdentifier::new(2),
            3,
            [FlightIdentifier::new(1), FlightIdentifier::new(2)],
        );
        assert_eq!(
            s.to_string(),
            "ShipmentId(4) OrderId(2) x3 [FlightId(1) -> FlightId(2)]"
        );
    }
}
