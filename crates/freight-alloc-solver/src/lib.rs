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

//! Tabu search allocation of cargo orders onto scheduled flights.
//!
//! A greedy opening places every order on the earliest direct or one-stop
//! route with room, then [`engine::TabuSearchEngine`] walks the split,
//! merge, transfer and reroute neighbourhood under a weighted penalty
//! objective. Airport storage is the only hard constraint; everything else
//! is priced. [`replan`] re-runs the pipeline for orders hit by a
//! cancelled flight.

pub mod capacity;
pub mod config;
pub mod engine;
pub mod eval;
pub mod greedy;
pub mod monitor;
pub mod replan;
pub mod routing;
pub mod search;
pub mod state;

use crate::{
    config::TabuSearchConfig,
    engine::{NoopListener, Planner},
    monitor::StopToken,
};
use freight_alloc_model::prelude::{Airport, Flight, Order, Problem, Solution};

/// Plans `orders` over `flights` with the default configuration and a
/// clock-derived seed. Orders or flights naming unknown airports end up
/// unrouted instead of failing.
pub fn optimize(orders: Vec<Order>, flights: Vec<Flight>, airports: Vec<Airport>) -> Solution {
    optimize_with(TabuSearchConfig::default(), orders, flights, airports)
}

pub fn optimize_with(
    config: TabuSearchConfig,
    orders: Vec<Order>,
    flights: Vec<Flight>,
    airports: Vec<Airport>,
) -> Solution {
    let problem = Problem::new(airports, flights, orders);
    Planner::new(config)
        .plan(&problem, &mut NoopListener, &StopToken::new())
        .best
}

pub mod prelude {
    pub use crate::capacity::{
        AirportCapacityTracker, FlightLedger, InsufficientStorageError, UnknownFlightError,
    };
    pub use crate::config::{
        ConfigError, LoadBalanceWeights, NeighborhoodLimits, RoutingRules, TabuSearchConfig,
        TenureBounds,
    };
    pub use crate::engine::{
        ChannelListener, CompositeListener, EngineState, LatestSnapshot, ListenerError,
        NoopListener, Planner, SearchListener, SearchOutcome, Snapshot, TabuSearchEngine,
        TerminationReason,
    };
    pub use crate::eval::{CostBreakdown, CostFunction, SearchProgress};
    pub use crate::greedy::GreedyInitialAllocator;
    pub use crate::monitor::StopToken;
    pub use crate::replan::{CancellationReplanificationHandler, ReplanOutcome};
    pub use crate::routing::{RouteCandidate, RouteCandidateGenerator};
    pub use crate::search::{MoveGenerator, MoveKind, MoveSignature, TabuMemory, TabuMove};
    pub use crate::state::{ShipmentSequence, SolutionMetrics};
    pub use crate::{optimize, optimize_with};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{CostFunction, SearchProgress};
    use freight_alloc_core::prelude::TimePoint;
    use freight_alloc_model::prelude::{Continent, FlightIdentifier, OrderIdentifier};

    fn h(hours: i64) -> TimePoint<i64> {
        TimePoint::new(hours * 60)
    }

    #[test]
    fn test_single_direct_flight_takes_whole_order() {
        let lim = Airport::new("SPIM", 900, -5, Continent::America).unwrap();
        let bru = Airport::new("EBBR", 900, 1, Continent::Europe).unwrap();
        let flight = Flight::new(
            FlightIdentifier::new(1),
            lim.code().clone(),
            bru.code().clone(),
            h(2),
            h(16),
            100,
        )
        .unwrap();
        let order = Order::new(OrderIdentifier::new(1), &lim, &bru, 50, h(0)).unwrap();
        assert_eq!(order.max_delivery_hours(), 72);

        let config = TabuSearchConfig::default()
            .with_seed(1)
            .with_max_iterations(20);
        let airports = vec![lim, bru];
        let problem = Problem::new(airports.clone(), vec![flight.clone()], vec![order.clone()]);
        let solution = optimize_with(config.clone(), vec![order], vec![flight], airports);

        let routed: Vec<_> = solution.shipments().iter().filter(|s| !s.is_empty()).collect();
        assert_eq!(routed.len(), 1);
        assert_eq!(routed[0].quantity(), 50);
        assert_eq!(routed[0].route(), &[FlightIdentifier::new(1)]);
        assert_eq!(solution.empty_count(), 0);

        let cost = CostFunction::new(&problem, &config)
            .breakdown(&solution, SearchProgress::new(0, 20));
        assert_eq!(cost.capacity, 0.0);
        assert_eq!(cost.empty_routes, 0.0);
    }

    #[test]
    fn test_unknown_airports_do_not_fail() {
        let lim = Airport::new("SPIM", 900, -5, Continent::America).unwrap();
        let ghost = Airport::new("ZZZZ", 900, 0, Continent::Asia).unwrap();
        let order = Order::new(OrderIdentifier::new(1), &lim, &ghost, 10, h(0)).unwrap();
        let solution = optimize(vec![order], Vec::new(), vec![lim]);
        assert_eq!(solution.empty_count(), 1);
        assert_eq!(solution.total_quantity(), 10);
    }
}
