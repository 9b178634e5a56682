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

use crate::{capacity::AirportCapacityTracker, config::TabuSearchConfig};
use freight_alloc_core::prelude::{Cost, TimeDelta, TimePoint};
use freight_alloc_model::prelude::{FlightIdentifier, Order, Problem, Shipment, Solution};
use serde::{Deserialize, Serialize};

/// Where the search stands; late iterations price violations higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchProgress {
    pub iteration: u64,
    pub max_iterations: u64,
}

impl SearchProgress {
    #[inline]
    pub fn new(iteration: u64, max_iterations: u64) -> Self {
        Self {
            iteration,
            max_iterations,
        }
    }

    /// `1 + iteration / max_iterations`.
    #[inline]
    pub fn scaling(&self) -> f64 {
        1.0 + self.iteration as f64 / self.max_iterations.max(1) as f64
    }
}

/// Per-term view of a cost evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub capacity: Cost,
    pub empty_routes: Cost,
    pub pending_units: Cost,
    pub delivery: Cost,
    pub stopover_validity: Cost,
    pub stopover_count: Cost,
    pub load_balance: Cost,
    pub invalid_sequence: Cost,
    pub airport_overload: Cost,
    pub cancellation: Cost,
}

impl CostBreakdown {
    #[inline]
    pub fn total(&self) -> Cost {
        self.capacity
            + self.empty_routes
            + self.pending_units
            + self.delivery
            + self.stopover_validity
            + self.stopover_count
            + self.load_balance
            + self.invalid_sequence
            + self.airport_overload
            + self.cancellation
    }
}

impl std::fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "total={:.1} capacity={:.1} empty={:.1} pending={:.1} delivery={:.1} \
             stopover={:.1}/{:.1} balance={:.1} sequence={:.1} airport={:.1} cancelled={:.1}",
            self.total(),
            self.capacity,
            self.empty_routes,
            self.pending_units,
            self.delivery,
            self.stopover_validity,
            self.stopover_count,
            self.load_balance,
            self.invalid_sequence,
            self.airport_overload,
            self.cancellation
        )
    }
}

/// Timing facts about a structurally valid route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTiming {
    pub arrival: TimePoint<i64>,
    pub short_connections: usize,
    pub uses_cancelled: bool,
}

/// Weighted penalty sum over a whole solution.
///
/// Pure function of its inputs: no interior state, safe to share across
/// evaluation threads.
#[derive(Debug, Clone, Copy)]
pub struct CostFunction<'p> {
    problem: &'p Problem,
    config: &'p TabuSearchConfig,
}

impl<'p> CostFunction<'p> {
    pub fn new(problem: &'p Problem, config: &'p TabuSearchConfig) -> Self {
        Self { problem, config }
    }

    #[inline]
    pub fn evaluate(&self, solution: &Solution, progress: SearchProgress) -> Cost {
        self.breakdown(solution, progress).total()
    }

    /// Score used to rank neighbours; frequently used signatures look worse.
    #[inline]
    pub fn ranking_score(&self, cost: Cost, frequency: u64) -> Cost {
        cost * (1.0 + self.config.frequency_penalty_rate * frequency as f64)
    }

    /// `None` when the legs do not chain from the order's origin to its
    /// destination, reference unknown flights, or go back in time.
    pub fn route_timing(&self, order: &Order, route: &[FlightIdentifier]) -> Option<RouteTiming> {
        let min_connection = self.config.routing.min_connection();
        let mut at = order.origin();
        let mut arrived: Option<TimePoint<i64>> = None;
        let mut short_connections = 0;
        let mut uses_cancelled = false;

        for leg in route {
            let flight = self.problem.flight(*leg)?;
            if flight.origin() != at {
                return None;
            }
            if let Some(prev) = arrived {
                if flight.departure() < prev {
                    return None;
                }
                if flight.departure() < prev + min_connection {
                    short_connections += 1;
                }
            }
            uses_cancelled |= flight.is_cancelled();
            at = flight.destination();
            arrived = Some(flight.arrival());
        }

        match arrived {
            Some(arrival) if at == order.destination() => Some(RouteTiming {
                arrival,
                short_connections,
                uses_cancelled,
            }),
            _ => None,
        }
    }

    /// Hours from order placement to availability at the destination,
    /// in destination local terms, never negative.
    pub fn delivery_hours(&self, order: &Order, arrival: TimePoint<i64>) -> f64 {
        let buffer = TimeDelta::from_hours(self.config.routing.processing_buffer_hours);
        let gmt = self
            .problem
            .airport(order.destination())
            .map(|a| a.gmt_offset_hours() as f64)
            .unwrap_or(0.0);
        let travel = (arrival - order.order_time() + buffer).as_hours_f64();
        (travel + gmt).max(0.0)
    }

    fn delivery_cost(&self, order: &Order, arrival: TimePoint<i64>, scaling: f64) -> Cost {
        let cfg = self.config;
        let hours = self.delivery_hours(order, arrival);
        let deadline = order.max_delivery_hours() as f64;
        let soft = deadline * cfg.soft_deadline_ratio;

        let mut cost = hours * cfg.delivery_hour_weight;
        if hours > soft {
            cost += (hours - soft) * cfg.delay_hour_penalty * scaling;
        }
        if hours > deadline {
            cost += cfg.delay_base_penalty + (hours - deadline) * cfg.delay_hour_penalty;
        }
        cost
    }

    #[inline]
    fn stopover_count_cost(&self, legs: usize) -> Cost {
        if legs == 0 {
            return 0.0;
        }
        legs as f64 * self.config.stopover_penalty * 1.2f64.powi(legs as i32 - 1)
    }

    fn shipment_terms(&self, shipment: &Shipment, scaling: f64, out: &mut CostBreakdown) {
        let cfg = self.config;
        if shipment.is_empty() {
            out.empty_routes += cfg.empty_route_penalty;
            return;
        }
        let timing = self
            .problem
            .order(shipment.order())
            .and_then(|o| self.route_timing(o, shipment.route()).map(|t| (o, t)));
        let Some((order, timing)) = timing else {
            out.invalid_sequence += cfg.invalid_sequence_penalty;
            return;
        };

        out.delivery += self.delivery_cost(order, timing.arrival, scaling);
        out.stopover_validity +=
            timing.short_connections as f64 * cfg.invalid_stopover_time_penalty;
        out.stopover_count += self.stopover_count_cost(shipment.legs());
        if timing.uses_cancelled {
            out.cancellation += cfg.cancellation_penalty;
        }
    }

    fn flight_terms(&self, solution: &Solution, scaling: f64, out: &mut CostBreakdown) {
        let cfg = self.config;
        let baseline = self.problem.baseline();
        let mut loads: Vec<(FlightIdentifier, u32)> = solution.flight_loads().into_iter().collect();
        loads.sort_unstable_by_key(|(id, _)| *id);

        let mut utilizations = Vec::with_capacity(loads.len());
        for (id, load) in loads {
            let Some(flight) = self.problem.flight(id) else {
                continue;
            };
            let total = load.saturating_add(baseline.flight_load(id));
            let capacity = flight.capacity();
            if total > capacity {
                out.capacity += cfg.capacity_violation_penalty * scaling
                    + (total - capacity) as f64 * cfg.capacity_excess_unit_penalty;
            }
            if load > 0 {
                utilizations.push(total as f64 / capacity as f64);
            }
        }

        if utilizations.is_empty() {
            return;
        }
        let n = utilizations.len() as f64;
        let target = cfg.target_utilization;
        let deviation = utilizations.iter().map(|u| (u - target).abs()).sum::<f64>() / n;
        let shortfall = utilizations.iter().map(|u| (target - u).max(0.0)).sum::<f64>() / n;
        let (min, max) = utilizations
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), u| {
                (lo.min(*u), hi.max(*u))
            });
        let w = cfg.load_balance;
        out.load_balance +=
            deviation * w.deviation + shortfall * w.shortfall + (max - min) * w.spread;
    }

    fn airport_terms(&self, solution: &Solution, out: &mut CostBreakdown) {
        let tracker = AirportCapacityTracker::for_solution(self.problem, solution);
        for (_, excess) in tracker.overloaded() {
            out.airport_overload += self.config.airport_overload_penalty
                + excess as f64 * self.config.capacity_excess_unit_penalty;
        }
    }

    /// Every unit of an order that no routed shipment carries.
    fn pending_terms(&self, solution: &Solution, out: &mut CostBreakdown) {
        let routed = solution.assigned_per_order();
        let missing: u64 = self
            .problem
            .orders()
            .iter()
            .map(|o| {
                let carried = routed.get(&o.id()).copied().unwrap_or(0);
                (o.quantity() as u64).saturating_sub(carried)
            })
            .sum();
        out.pending_units += missing as f64 * self.config.pending_unit_penalty;
    }

    pub fn breakdown(&self, solution: &Solution, progress: SearchProgress) -> CostBreakdown {
        let scaling = progress.scaling();
        let mut out = CostBreakdown::default();
        for s in solution.shipments() {
            self.shipment_terms(s, scaling, &mut out);
        }
        self.pending_terms(solution, &mut out);
        self.flight_terms(solution, scaling, &mut out);
        self.airport_terms(solution, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freight_alloc_core::prelude::Quantity;
    use freight_alloc_model::prelude::{
        Airport, AirportCode, Continent, Flight, FlightStatus, OrderIdentifier, ShipmentIdentifier,
    };

    fn h(hours: i64) -> TimePoint<i64> {
        TimePoint::new(hours * 60)
    }

    fn fid(n: u32) -> FlightIdentifier {
        FlightIdentifier::new(n)
    }

    fn oid(n: u32) -> OrderIdentifier {
        OrderIdentifier::new(n)
    }

    fn sid(n: u64) -> ShipmentIdentifier {
        ShipmentIdentifier::new(n)
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

    fn airports() -> Vec<Airport> {
        vec![
            Airport::new("SPIM", 800, 0, Continent::America).unwrap(),
            Airport::new("EBCI", 800, 0, Continent::Europe).unwrap(),
            Airport::new("SKBO", 800, 0, Continent::America).unwrap(),
        ]
    }

    fn problem(flights: Vec<Flight>, quantities: &[Quantity]) -> Problem {
        let ap = airports();
        let orders = quantities
            .iter()
            .enumerate()
            .map(|(i, q)| Order::new(oid(i as u32 + 1), &ap[0], &ap[1], *q, h(0)).unwrap())
            .collect();
        Problem::new(ap, flights, orders)
    }

    fn direct(id: u64, order: u32, qty: Quantity, flight: u32) -> Shipment {
        Shipment::new(sid(id), oid(order), qty, [fid(flight)])
    }

    #[test]
    fn test_single_order_on_roomy_flight_has_no_violation_terms() {
        let p = problem(vec![flight(1, "SPIM", "EBCI", 2, 14, 100)], &[50]);
        let cfg = TabuSearchConfig::default();
        let sol = Solution::new(vec![direct(1, 1, 50, 1)]);
        let b = CostFunction::new(&p, &cfg).breakdown(&sol, SearchProgress::default());

        assert_eq!(b.capacity, 0.0);
        assert_eq!(b.empty_routes, 0.0);
        assert_eq!(b.invalid_sequence, 0.0);
        assert_eq!(b.airport_overload, 0.0);
        // 14h flight + 2h buffer at offset 0.
        assert!((b.delivery - 16.0 * cfg.delivery_hour_weight).abs() < 1e-9);
        assert!((b.stopover_count - cfg.stopover_penalty).abs() < 1e-9);
        assert!(b.total() > 0.0);
    }

    #[test]
    fn test_overload_is_strictly_costlier() {
        let cfg = TabuSearchConfig::default();
        let sol = Solution::new(vec![direct(1, 1, 50, 1), direct(2, 2, 100, 1)]);
        let tight = problem(vec![flight(1, "SPIM", "EBCI", 2, 14, 100)], &[50, 100]);
        let roomy = problem(vec![flight(1, "SPIM", "EBCI", 2, 14, 200)], &[50, 100]);

        let over = CostFunction::new(&tight, &cfg).breakdown(&sol, SearchProgress::default());
        let fine = CostFunction::new(&roomy, &cfg).breakdown(&sol, SearchProgress::default());
        assert!(over.capacity > 0.0);
        assert_eq!(fine.capacity, 0.0);
        assert!(over.total() > fine.total());
    }

    #[test]
    fn test_capacity_term_scales_with_progress() {
        let cfg = TabuSearchConfig::default();
        let p = problem(vec![flight(1, "SPIM", "EBCI", 2, 14, 100)], &[150]);
        let sol = Solution::new(vec![direct(1, 1, 150, 1)]);
        let f = CostFunction::new(&p, &cfg);
        let early = f.breakdown(&sol, SearchProgress::new(0, 100)).capacity;
        let late = f.breakdown(&sol, SearchProgress::new(100, 100)).capacity;
        assert!((early - (20_000.0 + 50.0 * 100.0)).abs() < 1e-9);
        assert!((late - (40_000.0 + 50.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_shipments_and_broken_routes() {
        let cfg = TabuSearchConfig::default();
        let p = problem(
            vec![
                flight(1, "SPIM", "EBCI", 2, 14, 100),
                flight(2, "SKBO", "EBCI", 2, 14, 100),
            ],
            &[50],
        );
        let sol = Solution::new(vec![
            Shipment::unrouted(sid(1), oid(1), 20),
            direct(2, 1, 30, 2),
        ]);
        let b = CostFunction::new(&p, &cfg).breakdown(&sol, SearchProgress::default());
        assert_eq!(b.empty_routes, cfg.empty_route_penalty);
        // The broken route still counts as carried; only the remainder is pending.
        assert_eq!(b.pending_units, 20.0 * cfg.pending_unit_penalty);
        assert_eq!(b.invalid_sequence, cfg.invalid_sequence_penalty);
        assert_eq!(b.delivery, 0.0);
    }

    #[test]
    fn test_moving_units_to_pending_is_never_free() {
        let cfg = TabuSearchConfig::default();
        let p = problem(vec![flight(1, "SPIM", "EBCI", 2, 14, 100)], &[110]);
        let f = CostFunction::new(&p, &cfg);
        let full = Solution::new(vec![
            direct(1, 1, 100, 1),
            Shipment::unrouted(sid(2), oid(1), 10),
        ]);
        let shed = Solution::new(vec![
            direct(1, 1, 90, 1),
            Shipment::unrouted(sid(2), oid(1), 20),
        ]);

        let a = f.breakdown(&full, SearchProgress::default());
        let b = f.breakdown(&shed, SearchProgress::default());
        assert_eq!(a.pending_units, 10.0 * cfg.pending_unit_penalty);
        assert_eq!(b.pending_units, 20.0 * cfg.pending_unit_penalty);
        // Landing on the utilization target does not pay for ten dropped units.
        assert!(b.load_balance < a.load_balance);
        assert!(b.total() > a.total());

        let missing = Solution::new(vec![direct(1, 1, 100, 1)]);
        let c = f.breakdown(&missing, SearchProgress::default());
        assert_eq!(c.pending_units, a.pending_units);
    }

    #[test]
    fn test_overbooked_units_are_cheaper_pending() {
        let cfg = TabuSearchConfig::default();
        assert!(cfg.pending_unit_penalty < cfg.capacity_excess_unit_penalty);

        let p = problem(vec![flight(1, "SPIM", "EBCI", 2, 14, 100)], &[150]);
        let f = CostFunction::new(&p, &cfg);
        let over = Solution::new(vec![
            direct(1, 1, 140, 1),
            Shipment::unrouted(sid(2), oid(1), 10),
        ]);
        let fits = Solution::new(vec![
            direct(1, 1, 100, 1),
            Shipment::unrouted(sid(2), oid(1), 50),
        ]);
        let progress = SearchProgress::default();
        assert!(f.evaluate(&fits, progress) < f.evaluate(&over, progress));
    }

    #[test]
    fn test_short_connection_and_stopover_growth() {
        let cfg = TabuSearchConfig::default();
        let ap = airports();
        let order = Order::new(oid(1), &ap[2], &ap[1], 10, h(0)).unwrap();
        let p = Problem::new(
            ap,
            vec![
                flight(1, "SKBO", "SPIM", 1, 4, 100),
                flight(2, "SPIM", "EBCI", 4, 16, 100),
            ],
            vec![order],
        );
        let sol = Solution::new(vec![Shipment::new(sid(1), oid(1), 10, [fid(1), fid(2)])]);
        let b = CostFunction::new(&p, &cfg).breakdown(&sol, SearchProgress::default());
        assert_eq!(b.stopover_validity, cfg.invalid_stopover_time_penalty);
        assert!((b.stopover_count - 2.0 * cfg.stopover_penalty * 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_late_delivery_pays_base_and_hourly_penalty() {
        let cfg = TabuSearchConfig::default();
        // Same continent: 48h deadline, soft threshold at 36h.
        let ap = airports();
        let order = Order::new(oid(1), &ap[2], &ap[0], 10, h(0)).unwrap();
        let p = Problem::new(ap, vec![flight(1, "SKBO", "SPIM", 40, 48, 100)], vec![order]);
        let sol = Solution::new(vec![Shipment::new(sid(1), oid(1), 10, [fid(1)])]);
        let b = CostFunction::new(&p, &cfg).breakdown(&sol, SearchProgress::default());

        let hours = 50.0;
        let expected = hours * cfg.delivery_hour_weight
            + (hours - 36.0) * cfg.delay_hour_penalty
            + cfg.delay_base_penalty
            + (hours - 48.0) * cfg.delay_hour_penalty;
        assert!((b.delivery - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cancelled_leg_is_penalized() {
        let cfg = TabuSearchConfig::default();
        let p = problem(
            vec![flight(1, "SPIM", "EBCI", 2, 14, 100).with_status(FlightStatus::Cancelled)],
            &[50],
        );
        let sol = Solution::new(vec![direct(1, 1, 50, 1)]);
        let b = CostFunction::new(&p, &cfg).breakdown(&sol, SearchProgress::default());
        assert_eq!(b.cancellation, cfg.cancellation_penalty);
    }

    #[test]
    fn test_load_balance_targets_utilization() {
        let cfg = TabuSearchConfig::default();
        let p = problem(
            vec![
                flight(1, "SPIM", "EBCI", 2, 14, 100),
                flight(2, "SPIM", "EBCI", 3, 15, 100),
            ],
            &[90, 50],
        );
        let f = CostFunction::new(&p, &cfg);
        let on_target = Solution::new(vec![direct(1, 1, 90, 1)]);
        assert!(f.breakdown(&on_target, SearchProgress::default()).load_balance.abs() < 1e-9);

        let uneven = Solution::new(vec![direct(1, 1, 90, 1), direct(2, 2, 50, 2)]);
        let lb = f.breakdown(&uneven, SearchProgress::default()).load_balance;
        // avg |u - 0.9| = 0.2, avg shortfall = 0.2, spread = 0.4
        assert!((lb - (0.2 * 1000.0 + 0.2 * 500.0 + 0.4 * 500.0)).abs() < 1e-6);
    }

    #[test]
    fn test_airport_overload_is_priced() {
        let cfg = TabuSearchConfig::default();
        let ap = vec![
            Airport::new("SKBO", 800, 0, Continent::America).unwrap(),
            Airport::new("SPIM", 10, 0, Continent::America).unwrap(),
            Airport::new("EBCI", 800, 0, Continent::Europe).unwrap(),
        ];
        let order = Order::new(oid(1), &ap[0], &ap[2], 25, h(0)).unwrap();
        let p = Problem::new(
            ap,
            vec![
                flight(1, "SKBO", "SPIM", 1, 4, 100),
                flight(2, "SPIM", "EBCI", 6, 16, 100),
            ],
            vec![order],
        );
        let sol = Solution::new(vec![Shipment::new(sid(1), oid(1), 25, [fid(1), fid(2)])]);
        let b = CostFunction::new(&p, &cfg).breakdown(&sol, SearchProgress::default());
        assert!(
            (b.airport_overload
                - (cfg.airport_overload_penalty + 15.0 * cfg.capacity_excess_unit_penalty))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn test_ranking_score_penalizes_frequency() {
        let cfg = TabuSearchConfig::default();
        let p = problem(vec![], &[]);
        let f = CostFunction::new(&p, &cfg);
        assert_eq!(f.ranking_score(100.0, 0), 100.0);
        assert!((f.ranking_score(100.0, 5) - 110.0).abs() < 1e-9);
    }
}
