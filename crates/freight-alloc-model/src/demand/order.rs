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
    common::{AirportCode, OrderIdentifier},
    demand::err::OrderError,
    network::Airport,
};
use freight_alloc_core::prelude::{Quantity, TimeDelta, TimeInterval, TimePoint};
use serde::{Deserialize, Serialize};

/// A customer request to move `quantity` packages between two airports.
///
/// The delivery promise is fixed at construction from the continents of both
/// endpoints and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    id: OrderIdentifier,
    origin: AirportCode,
    destination: AirportCode,
    quantity: Quantity,
    order_time: i64,
    max_delivery_hours: i64,
}

impl Order {
    pub fn new(
        id: OrderIdentifier,
        origin: &Airport,
        destination: &Airport,
        quantity: Quantity,
        order_time: TimePoint<i64>,
    ) -> Result<Self, OrderError> {
        let max_delivery_hours = origin.continent().deadline_hours(destination.continent());
        Self::with_deadline(
            id,
            origin.code().clone(),
            destination.code().clone(),
            quantity,
            order_time,
            max_delivery_hours,
        )
    }

    /// Builds an order whose airports are not at hand. Used by feeds that
    /// already resolved the delivery promise upstream.
    pub fn with_deadline(
        id: OrderIdentifier,
        origin: AirportCode,
        destination: AirportCode,
        quantity: Quantity,
        order_time: TimePoint<i64>,
        max_delivery_hours: i64,
    ) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::ZeroQuantity(id));
        }
        if origin == destination {
            return Err(OrderError::SameEndpoints(id));
        }
        Ok(Self {
            id,
            origin,
            destination,
            quantity,
            order_time: order_time.value(),
            max_delivery_hours,
        })
    }

    #[inline]
    pub fn id(&self) -> OrderIdentifier {
        self.id
    }

    #[inline]
    pub fn origin(&self) -> &AirportCode {
        &self.origin
    }

    #[inline]
    pub fn destination(&self) -> &AirportCode {
        &self.destination
    }

    #[inline]
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    #[inline]
    pub fn order_time(&self) -> TimePoint<i64> {
        TimePoint::new(self.order_time)
    }

    #[inline]
    pub fn max_delivery_hours(&self) -> i64 {
        self.max_delivery_hours
    }

    #[inline]
    pub fn deadline(&self) -> TimePoint<i64> {
        self.order_time()
            .saturating_add(TimeDelta::from_hours(self.max_delivery_hours))
    }

    /// Departures inside `[order_time, deadline]` are eligible for this order.
    #[inline]
    pub fn departure_window(&self) -> TimeInterval<i64> {
        TimeInterval::spanning(self.order_time(), self.deadline())
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}x {}->{} ({}h)",
            self.id,
            self.quantity,
            self.origin.as_str(),
            self.destination.as_str(),
            self.max_delivery_hours
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Continent;

    fn airport(code: &str, continent: Continent) -> Airport {
        Airport::new(code, 500, 0, continent).unwrap()
    }

    #[test]
    fn test_deadline_derived_from_continents() {
        let lim = airport("SPIM", Continent::America);
        let bog = airport("SKBO", Continent::America);
        let bru = airport("EBCI", Continent::Europe);

        let same = Order::new(OrderIdentifier::new(1), &lim, &bog, 10, TimePoint::new(0)).unwrap();
        let inter = Order::new(OrderIdentifier::new(2), &lim, &bru, 10, TimePoint::new(0)).unwrap();

        assert_eq!(same.max_delivery_hours(), 48);
        assert_eq!(inter.max_delivery_hours(), 72);
        assert_eq!(inter.deadline(), TimePoint::new(72 * 60));
        assert!(inter.departure_window().contains_closed(TimePoint::new(72 * 60)));
    }

    #[test]
    fn test_rejects_empty_or_loop_orders() {
        let lim = airport("SPIM", Continent::America);
        let bru = airport("EBCI", Continent::Europe);
        assert!(matches!(
            Order::new(OrderIdentifier::new(1), &lim, &bru, 0, TimePoint::new(0)),
            Err(OrderError::ZeroQuantity(_))
        ));
        assert!(matches!(
            Order::new(OrderIdentifier::new(1), &lim, &lim, 5, TimePoint::new(0)),
            Err(OrderError::SameEndpoints(_))
        ));
    }
}
