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

use crate::{config::TabuSearchConfig, eval::CostFunction};
use freight_alloc_model::prelude::{Problem, Solution};
use serde::{Deserialize, Serialize};

/// Service-level summary of a solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionMetrics {
    pub total_orders: usize,
    pub completed_orders: usize,
    pub assigned_units: u64,
    pub pending_units: u64,
    pub direct_shipments: usize,
    pub connecting_shipments: usize,
    pub empty_shipments: usize,
    /// Mean over routed shipments; zero when nothing is routed.
    pub average_delivery_hours: f64,
    /// Share of routed shipments delivered within their order's promise.
    pub on_time_rate: f64,
}

impl SolutionMetrics {
    pub fn compute(problem: &Problem, solution: &Solution, config: &TabuSearchConfig) -> Self {
        let assigned = solution.assigned_per_order();
        let mut metrics = SolutionMetrics {
            total_orders: problem.orders().len(),
            direct_shipments: solution.direct_count(),
            connecting_shipments: solution.connecting_count(),
            empty_shipments: solution.empty_count(),
            ..Default::default()
        };

        for order in problem.orders() {
            let requested = order.quantity() as u64;
            let mut got = assigned.get(&order.id()).copied().unwrap_or(0);
            if got > requested {
                tracing::warn!(
                    order = %order.id(),
                    assigned = got,
                    requested,
                    "order over-assigned, capping"
                );
                got = requested;
            }
            metrics.assigned_units += got;
            metrics.pending_units += requested - got;
            if got == requested {
                metrics.completed_orders += 1;
            }
        }

        let cost = CostFunction::new(problem, config);
        let mut routed = 0usize;
        let mut on_time = 0usize;
        let mut hours_sum = 0.0;
        for s in solution.shipments().iter().filter(|s| !s.is_empty()) {
            let Some(order) = problem.order(s.order()) else {
                continue;
            };
            let Some(timing) = cost.route_timing(order, s.route()) else {
                continue;
            };
            let hours = cost.delivery_hours(order, timing.arrival);
            routed += 1;
            hours_sum += hours;
            if hours <= order.max_delivery_hours() as f64 {
                on_time += 1;
            }
        }
        if routed > 0 {
            metrics.average_delivery_hours = hours_sum / routed as f64;
            metrics.on_time_rate = on_time as f64 / routed as f64;
        }
        metrics
    }

    /// Fraction of requested units with a route.
    pub fn fill_rate(&self) -> f64 {
        let total = self.assigned_units + self.pending_units;
        if total == 0 {
            return 0.0;
        }
        self.assigned_units as f64 / total as f64
    }
}

impl std::fmt::Display for SolutionMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "orders {}/{} complete, units {} assigned / {} pending, \
             shipments {} direct / {} connecting / {} empty, avg {:.1}h, on-time {:.0}%",
            self.completed_orders,
            self.total_orders,
            self.assigned_units,
            self.pending_units,
            self.direct_shipments,
            self.connecting_shipments,
            self.empty_shipments,
            self.average_delivery_hours,
            self.on_time_rate * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freight_alloc_core::prelude::TimePoint;
    use freight_alloc_model::prelude::{
        Airport, Continent, Flight, FlightIdentifier, Order, OrderIdentifier, Shipment,
        ShipmentIdentifier,
    };

    fn h(hours: i64) -> TimePoint<i64> {
        TimePoint::new(hours * 60)
    }

    fn fid(n: u32) -> FlightIdentifier {
        FlightIdentifier::new(n)
    }

    fn problem() -> Problem {
        let a = Airport::new("SPIM", 900, 0, Continent::America).unwrap();
        let b = Airport::new("SCEL", 900, 0, Continent::America).unwrap();
        let flights = vec![
            Flight::new(fid(1), a.code().clone(), b.code().clone(), h(1), h(9), 100).unwrap(),
            Flight::new(fid(2), a.code().clone(), b.code().clone(), h(60), h(70), 100).unwrap(),
        ];
        let orders = vec![
            Order::new(OrderIdentifier::new(1), &a, &b, 50, h(0)).unwrap(),
            Order::new(OrderIdentifier::new(2), &a, &b, 30, h(0)).unwrap(),
        ];
        Problem::new(vec![a, b], flights, orders)
    }

    fn ship(id: u64, order: u32, qty: u32, flights: &[u32]) -> Shipment {
        Shipment::new(
            ShipmentIdentifier::new(id),
            OrderIdentifier::new(order),
            qty,
            flights.iter().map(|f| fid(*f)),
        )
    }

    #[test]
    fn test_counts_units_and_punctuality() {
        let p = problem();
        let sol = Solution::new(vec![
            ship(1, 1, 50, &[1]),
            ship(2, 2, 20, &[2]),
            ship(3, 2, 10, &[]),
        ]);
        let m = SolutionMetrics::compute(&p, &sol, &TabuSearchConfig::default());
        assert_eq!(m.total_orders, 2);
        assert_eq!(m.completed_orders, 1);
        assert_eq!(m.assigned_units, 70);
        assert_eq!(m.pending_units, 10);
        assert_eq!(m.direct_shipments, 2);
        assert_eq!(m.empty_shipments, 1);
        // 9h + 2h buffer on time, 70h + 2h past the 48h promise.
        assert!((m.average_delivery_hours - 41.5).abs() < 1e-9);
        assert!((m.on_time_rate - 0.5).abs() < 1e-9);
        assert!((m.fill_rate() - 70.0 / 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_over_assignment_is_capped() {
        let p = problem();
        let sol = Solution::new(vec![ship(1, 2, 45, &[1])]);
        let m = SolutionMetrics::compute(&p, &sol, &TabuSearchConfig::default());
        assert_eq!(m.assigned_units, 30);
        assert_eq!(m.pending_units, 50);
        assert_eq!(m.completed_orders, 1);
    }

    #[test]
    fn test_empty_solution() {
        let p = problem();
        let m = SolutionMetrics::compute(&p, &Solution::default(), &TabuSearchConfig::default());
        assert_eq!(m.pending_units, 80);
        assert_eq!(m.on_time_rate, 0.0);
        assert_eq!(m.fill_rate(), 0.0);
        assert!(m.to_string().contains("0/2 complete"));
    }
}
