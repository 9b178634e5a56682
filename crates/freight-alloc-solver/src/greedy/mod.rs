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
    capacity::{AirportCapacityTracker, FlightLedger},
    config::TabuSearchConfig,
    routing::RouteCandidateGenerator,
    state::sequence::ShipmentSequence,
};
use freight_alloc_model::prelude::{Order, Problem, Shipment, Solution};
use rand::{Rng, seq::SliceRandom};
use std::cmp::Reverse;

/// Constructive opening: earliest orders first, direct routes before
/// one-stop routes, airport storage checked before anything is committed.
///
/// Whatever cannot be placed stays as one empty shipment per order.
#[derive(Debug, Clone)]
pub struct GreedyInitialAllocator<'p> {
    problem: &'p Problem,
    config: &'p TabuSearchConfig,
}

impl<'p> GreedyInitialAllocator<'p> {
    pub fn new(problem: &'p Problem, config: &'p TabuSearchConfig) -> Self {
        Self { problem, config }
    }

    /// Urgency order with near-ties shuffled.
    fn processing_order<R: Rng>(&self, rng: &mut R) -> Vec<&'p Order> {
        let mut orders: Vec<&'p Order> = self.problem.orders().iter().collect();
        orders.sort_by_key(|o| (o.order_time(), Reverse(o.quantity()), o.id()));

        let window = self.config.routing.tie_window();
        let mut start = 0;
        while start < orders.len() {
            let anchor = orders[start].order_time();
            let mut end = start + 1;
            while end < orders.len() && orders[end].order_time() - anchor <= window {
                end += 1;
            }
            orders[start..end].shuffle(rng);
            start = end;
        }
        orders
    }

    #[tracing::instrument(level = "debug", skip_all, fields(orders = self.problem.orders().len()))]
    pub fn allocate<R: Rng>(&self, rng: &mut R, ids: &mut ShipmentSequence) -> Solution {
        let routes = RouteCandidateGenerator::new(self.problem, &self.config.routing);
        let mut ledger = FlightLedger::new(self.problem);
        let mut storage = AirportCapacityTracker::from_problem(self.problem);
        let mut solution = Solution::default();

        for order in self.processing_order(rng) {
            let mut remaining = order.quantity();
            for candidate in routes.candidates(order, &ledger) {
                if remaining == 0 {
                    break;
                }
                // Earlier candidates of this order may share a leg.
                let quantity = remaining.min(ledger.route_capacity(candidate.legs()));
                if quantity == 0 {
                    continue;
                }
                if let Some(hub) = candidate.hub()
                    && storage.reserve(hub, quantity).is_err()
                {
                    continue;
                }
                for leg in candidate.legs() {
                    // Legs come from the ledger, so they are always known.
                    let _ = ledger.consume(*leg, quantity);
                }
                if let Some(hub) = candidate.hub() {
                    storage.commit(hub, quantity);
                }
                solution.push(Shipment::new(
                    ids.next_id(),
                    order.id(),
                    quantity,
                    candidate.legs().iter().copied(),
                ));
                remaining -= quantity;
            }

            if remaining > 0 {
                tracing::debug!(
                    order = %order.id(),
                    remaining,
                    requested = order.quantity(),
                    "order left partially pending"
                );
                solution.push(Shipment::unrouted(ids.next_id(), order.id(), remaining));
            }
        }

        tracing::debug!(
            shipments = solution.len(),
            routed = solution.routed_quantity(),
            pending = solution.total_quantity() - solution.routed_quantity(),
            "greedy allocation finished"
        );
        solution
    }
}
