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

//! Cancellation handling: re-plan only the orders that lost a flight.

use crate::{
    config::TabuSearchConfig,
    engine::{Planner, SearchListener, TerminationReason},
    monitor::StopToken,
    state::sequence::ShipmentSequence,
};
use freight_alloc_core::prelude::{Cost, Quantity, TimePoint};
use freight_alloc_model::prelude::{
    Airport, CommittedLoad, Flight, FlightIdentifier, Order, OrderIdentifier, ProblemBuilder,
    Shipment, ShipmentIdentifier, Solution,
};
use fxhash::{FxHashMap, FxHashSet};

/// Result of one replanification. An empty `affected_orders` means the
/// cancellation touched nothing and `patch` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplanOutcome {
    pub affected_orders: Vec<OrderIdentifier>,
    pub replaced: Vec<ShipmentIdentifier>,
    pub patch: Solution,
    pub disruption_cost: Cost,
    pub reason: Option<TerminationReason>,
}

impl ReplanOutcome {
    fn noop() -> Self {
        Self {
            affected_orders: Vec::new(),
            replaced: Vec::new(),
            patch: Solution::default(),
            disruption_cost: 0.0,
            reason: None,
        }
    }

    #[inline]
    pub fn is_noop(&self) -> bool {
        self.affected_orders.is_empty()
    }

    /// `last` without the replaced shipments, followed by the patch.
    pub fn merge_into(&self, last: &Solution) -> Solution {
        let replaced: FxHashSet<ShipmentIdentifier> = self.replaced.iter().copied().collect();
        let mut shipments: Vec<_> = last
            .shipments()
            .iter()
            .filter(|s| !replaced.contains(&s.id()))
            .cloned()
            .collect();
        shipments.extend(self.patch.shipments().iter().cloned());
        let stats = if self.is_noop() {
            last.stats().clone()
        } else {
            self.patch.stats().clone()
        };
        Solution::new(shipments).with_stats(stats)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CancellationReplanificationHandler {
    planner: Planner,
}

impl CancellationReplanificationHandler {
    pub fn new(config: TabuSearchConfig) -> Self {
        Self {
            planner: Planner::new(config),
        }
    }

    #[inline]
    pub fn config(&self) -> &TabuSearchConfig {
        self.planner.config()
    }

    /// Flights to treat as cancelled: the flight itself plus any listed
    /// flight flying the same schedule under another id.
    fn cancelled_ids(cancelled: &Flight, flights: &[Flight]) -> FxHashSet<FlightIdentifier> {
        std::iter::once(cancelled.id())
            .chain(
                flights
                    .iter()
                    .filter(|f| f.same_schedule(cancelled))
                    .map(|f| f.id()),
            )
            .collect()
    }

    /// Load that the shipments staying in place keep on flights and hubs.
    fn retained_load(
        last: &Solution,
        replaced: &FxHashSet<ShipmentIdentifier>,
        flights: &[Flight],
    ) -> CommittedLoad {
        let by_id: FxHashMap<FlightIdentifier, &Flight> =
            flights.iter().map(|f| (f.id(), f)).collect();
        let mut load = CommittedLoad::new();
        for s in last.shipments().iter().filter(|s| !replaced.contains(&s.id())) {
            for leg in s.route() {
                load.add_flight(*leg, s.quantity());
            }
            let inner = s.route().len().saturating_sub(1);
            for leg in &s.route()[..inner] {
                if let Some(f) = by_id.get(leg) {
                    load.add_airport(f.destination().clone(), s.quantity());
                }
            }
        }
        load
    }

    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(
        level = "info",
        name = "Replan",
        skip_all,
        fields(cancelled = %cancelled.id(), shipments = last.len())
    )]
    pub fn replan(
        &self,
        cancelled: &Flight,
        last: &Solution,
        orders: &[Order],
        flights: &[Flight],
        airports: &[Airport],
        now: TimePoint<i64>,
        listener: &mut dyn SearchListener,
        stop: &StopToken,
    ) -> ReplanOutcome {
        let cancelled_ids = Self::cancelled_ids(cancelled, flights);
        let rides_cancelled =
            |s: &Shipment| s.route().iter().any(|leg| cancelled_ids.contains(leg));

        let mut affected_orders: Vec<OrderIdentifier> = Vec::new();
        for s in last.shipments().iter().filter(|s| rides_cancelled(*s)) {
            if !affected_orders.contains(&s.order()) {
                affected_orders.push(s.order());
            }
        }
        if affected_orders.is_empty() {
            tracing::info!("cancellation touches no shipment");
            return ReplanOutcome::noop();
        }

        // Shipments on the cancelled flight plus the pending remainders of the
        // same orders. Other shipments of those orders keep their seats.
        let affected: FxHashSet<OrderIdentifier> = affected_orders.iter().copied().collect();
        let mut lost: FxHashMap<OrderIdentifier, Quantity> = FxHashMap::default();
        let mut replaced: Vec<ShipmentIdentifier> = Vec::new();
        for s in last.shipments() {
            if rides_cancelled(s) || (s.is_empty() && affected.contains(&s.order())) {
                replaced.push(s.id());
                let slot = lost.entry(s.order()).or_insert(0);
                *slot = slot.saturating_add(s.quantity());
            }
        }
        let replaced_set: FxHashSet<ShipmentIdentifier> = replaced.iter().copied().collect();

        let residual: Vec<Order> = orders
            .iter()
            .filter_map(|o| {
                let quantity = lost.get(&o.id()).copied().filter(|q| *q > 0)?;
                Order::with_deadline(
                    o.id(),
                    o.origin().clone(),
                    o.destination().clone(),
                    quantity,
                    o.order_time(),
                    o.max_delivery_hours(),
                )
                .ok()
            })
            .collect();

        let available = flights.iter().filter(|f| {
            !cancelled_ids.contains(&f.id()) && !f.is_cancelled() && f.departure() >= now
        });
        let problem = ProblemBuilder::new()
            .with_airports(airports.iter().cloned())
            .with_flights(available.cloned())
            .with_orders(residual.iter().cloned())
            .with_baseline(Self::retained_load(last, &replaced_set, flights))
            .build_lenient();

        let mut ids = ShipmentSequence::after(last);
        let mut outcome = self.planner.plan_with_ids(&problem, &mut ids, listener, stop);
        // Orders missing from `orders` cannot be planned; their units stay pending.
        for order in &affected_orders {
            if residual.iter().any(|o| o.id() == *order) {
                continue;
            }
            if let Some(quantity) = lost.get(order).copied().filter(|q| *q > 0) {
                tracing::warn!(order = %order, quantity, "affected order is unknown, kept pending");
                outcome.best.push(Shipment::unrouted(ids.next_id(), *order, quantity));
            }
        }
        let disruption_cost =
            self.config().replanification_penalty * affected_orders.len() as f64;

        tracing::info!(
            affected = affected_orders.len(),
            replaced = replaced.len(),
            patch = outcome.best.len(),
            pending = outcome.best.empty_count(),
            disruption_cost,
            "replanification done"
        );

        ReplanOutcome {
            affected_orders,
            replaced,
            patch: outcome.best,
            disruption_cost,
            reason: Some(outcome.reason),
        }
    }
}
