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
    capacity::FlightLedger,
    config::TabuSearchConfig,
    routing::RouteCandidateGenerator,
    search::moves::{MoveSignature, TabuMove},
    state::sequence::ShipmentSequence,
};
use freight_alloc_core::prelude::Quantity;
use freight_alloc_model::prelude::{Problem, Shipment, Solution};
use rand::{Rng, seq::SliceRandom};

/// A generated move paired with its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub mv: TabuMove,
    pub signature: MoveSignature,
}

const SPLIT_FRACTIONS: [f64; 3] = [0.5, 1.0 / 3.0, 0.25];

/// Produces split, merge, transfer and reroute candidates around a solution.
#[derive(Debug, Clone)]
pub struct MoveGenerator<'p> {
    problem: &'p Problem,
    config: &'p TabuSearchConfig,
    routes: RouteCandidateGenerator<'p>,
}

impl<'p> MoveGenerator<'p> {
    pub fn new(problem: &'p Problem, config: &'p TabuSearchConfig) -> Self {
        Self {
            problem,
            config,
            routes: RouteCandidateGenerator::new(problem, &config.routing),
        }
    }

    /// Pending shipments and shipments on bottleneck or overbooked flights.
    fn is_pressured(&self, shipment: &Shipment, ledger: &FlightLedger) -> bool {
        if shipment.is_empty() {
            return true;
        }
        shipment.route().iter().any(|leg| {
            let bottleneck = self
                .problem
                .flight(*leg)
                .is_some_and(|f| f.capacity() <= self.config.bottleneck_capacity);
            bottleneck || ledger.balance(*leg).is_some_and(|b| b < 0)
        })
    }

    fn visiting_order<R: Rng>(
        &self,
        solution: &Solution,
        ledger: &FlightLedger,
        rng: &mut R,
    ) -> Vec<usize> {
        let (mut first, mut rest): (Vec<usize>, Vec<usize>) = (0..solution.len())
            .partition(|&i| self.is_pressured(&solution.shipments()[i], ledger));
        first.shuffle(rng);
        rest.shuffle(rng);
        first.extend(rest);
        first
    }

    fn splits(
        &self,
        shipment: &Shipment,
        rng: &mut impl Rng,
        ids: &mut ShipmentSequence,
        out: &mut Vec<TabuMove>,
    ) {
        let q = shipment.quantity();
        if q <= self.config.neighborhood.min_split_quantity.max(1) {
            return;
        }
        let random = rng.random_range(0.3..=0.7);
        let mut seen: Vec<Quantity> = Vec::with_capacity(4);
        for fraction in SPLIT_FRACTIONS.into_iter().chain(std::iter::once(random)) {
            let part = ((q as f64 * fraction).round() as Quantity).clamp(1, q - 1);
            if seen.contains(&part) {
                continue;
            }
            seen.push(part);
            out.push(TabuMove::Split {
                shipment: shipment.id(),
                quantity: part,
                new_id: ids.next_id(),
            });
        }
    }

    fn merges(&self, shipment: &Shipment, solution: &Solution, out: &mut Vec<TabuMove>) {
        // Each unordered pair once; the lower id survives.
        for other in solution.shipments_of(shipment.order()) {
            if other.id() > shipment.id() && other.same_route(shipment) {
                out.push(TabuMove::Merge {
                    keep: shipment.id(),
                    absorb: other.id(),
                });
            }
        }
    }

    fn transfers(
        &self,
        shipment: &Shipment,
        solution: &Solution,
        rng: &mut impl Rng,
        out: &mut Vec<TabuMove>,
    ) {
        let q = shipment.quantity();
        if q < 2 {
            return;
        }
        for other in solution.shipments_of(shipment.order()) {
            if other.id() == shipment.id() {
                continue;
            }
            let quantity = rng.random_range(1..=(q / 3).max(1));
            if quantity < q {
                out.push(TabuMove::Transfer {
                    from: shipment.id(),
                    to: other.id(),
                    quantity,
                });
            }
        }
    }

    fn reroutes(
        &self,
        shipment: &Shipment,
        ledger: &FlightLedger,
        rng: &mut impl Rng,
        out: &mut Vec<TabuMove>,
    ) {
        let Some(order) = self.problem.order(shipment.order()) else {
            return;
        };
        // Seats this shipment holds are free for its own alternatives.
        let mut own = ledger.clone();
        for leg in shipment.route() {
            // A leg outside the problem holds no seats in the ledger.
            if let Err(e) = own.restore(*leg, shipment.quantity()) {
                tracing::trace!(shipment = %shipment.id(), error = %e, "leg not in ledger");
            }
        }

        let limit = self.config.neighborhood.max_reroute_alternatives;
        let mut taken = 0;
        for alt in self.routes.candidates(order, &own) {
            if taken >= limit {
                break;
            }
            if alt.legs().as_slice() == shipment.route() || alt.capacity() < shipment.quantity() {
                continue;
            }
            let percent = if alt.is_direct() {
                self.config.direct_route_probability
            } else {
                self.config.one_stop_route_probability
            };
            if rng.random_range(0..100) >= percent {
                continue;
            }
            out.push(TabuMove::Reroute {
                shipment: shipment.id(),
                route: alt.legs().clone(),
            });
            taken += 1;
        }
    }

    /// At most `max_candidates` moves, pressured shipments visited first.
    pub fn generate<R: Rng>(
        &self,
        solution: &Solution,
        rng: &mut R,
        ids: &mut ShipmentSequence,
    ) -> Vec<Candidate> {
        let max = self.config.neighborhood.max_candidates;
        let ledger = FlightLedger::for_solution(self.problem, solution);
        let mut moves: Vec<TabuMove> = Vec::new();

        for i in self.visiting_order(solution, &ledger, rng) {
            if moves.len() >= max {
                break;
            }
            let shipment = &solution.shipments()[i];
            self.splits(shipment, rng, ids, &mut moves);
            self.merges(shipment, solution, &mut moves);
            self.transfers(shipment, solution, rng, &mut moves);
            self.reroutes(shipment, &ledger, rng, &mut moves);
        }
        moves.truncate(max);

        moves
            .into_iter()
            .filter_map(|mv| {
                let signature = mv.signature(solution).ok()?;
                Some(Candidate { mv, signature })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::moves::MoveKind;
    use freight_alloc_core::prelude::TimePoint;
    use freight_alloc_model::prelude::{
        Airport, AirportCode, Continent, Flight, FlightIdentifier, Order, OrderIdentifier,
        ShipmentIdentifier,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn h(hours: i64) -> TimePoint<i64> {
        TimePoint::new(hours * 60)
    }

    fn fid(n: u32) -> FlightIdentifier {
        FlightIdentifier::new(n)
    }

    fn sid(n: u64) -> ShipmentIdentifier {
        ShipmentIdentifier::new(n)
    }

    fn problem() -> Problem {
        let ap = vec![
            Airport::new("SPIM", 900, -5, Continent::America).unwrap(),
            Airport::new("EBCI", 900, 1, Continent::Europe).unwrap(),
        ];
        let flights = (1..=3)
            .map(|i| {
                Flight::new(
                    fid(i),
                    AirportCode::from("SPIM"),
                    AirportCode::from("EBCI"),
                    h(i as i64),
                    h(i as i64 + 12),
                    300,
                )
                .unwrap()
            })
            .collect();
        let orders = vec![
            Order::new(OrderIdentifier::new(1), &ap[0], &ap[1], 100, h(0)).unwrap(),
        ];
        Problem::new(ap, flights, orders)
    }

    fn config() -> TabuSearchConfig {
        let mut cfg = TabuSearchConfig::default();
        cfg.direct_route_probability = 100;
        cfg.one_stop_route_probability = 100;
        cfg
    }

    #[test]
    fn test_generates_every_move_kind() {
        let p = problem();
        let cfg = config();
        let oid = OrderIdentifier::new(1);
        let sol = Solution::new(vec![
            Shipment::new(sid(1), oid, 60, [fid(1)]),
            Shipment::new(sid(2), oid, 30, [fid(1)]),
            Shipment::unrouted(sid(3), oid, 10),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut ids = ShipmentSequence::after(&sol);
        let cands = MoveGenerator::new(&p, &cfg).generate(&sol, &mut rng, &mut ids);

        for kind in [
            MoveKind::Split,
            MoveKind::Merge,
            MoveKind::Transfer,
            MoveKind::Reroute,
        ] {
            assert!(cands.iter().any(|c| c.mv.kind() == kind), "missing {}", kind);
        }
        assert!(cands.len() <= cfg.neighborhood.max_candidates);
        for c in &cands {
            let mut copy = sol.clone();
            assert!(c.mv.apply(&mut copy).is_ok(), "{} failed", c.mv);
            assert_eq!(copy.total_quantity(), sol.total_quantity());
        }
    }

    #[test]
    fn test_split_quantities_are_distinct_and_proper() {
        let p = problem();
        let cfg = config();
        let sol = Solution::new(vec![Shipment::new(
            sid(1),
            OrderIdentifier::new(1),
            3,
            [fid(1)],
        )]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut ids = ShipmentSequence::after(&sol);
        let splits: Vec<_> = MoveGenerator::new(&p, &cfg)
            .generate(&sol, &mut rng, &mut ids)
            .into_iter()
            .filter_map(|c| match c.mv {
                TabuMove::Split { quantity, .. } => Some(quantity),
                _ => None,
            })
            .collect();
        assert!(!splits.is_empty());
        assert!(splits.iter().all(|q| (1..3).contains(q)));
        let mut dedup = splits.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), splits.len());
    }

    #[test]
    fn test_reroute_skips_current_and_too_small_routes() {
        let p = problem();
        let cfg = config();
        let sol = Solution::new(vec![Shipment::new(
            sid(1),
            OrderIdentifier::new(1),
            2,
            [fid(2)],
        )]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ids = ShipmentSequence::after(&sol);
        let routes: Vec<_> = MoveGenerator::new(&p, &cfg)
            .generate(&sol, &mut rng, &mut ids)
            .into_iter()
            .filter_map(|c| match c.mv {
                TabuMove::Reroute { route, .. } => Some(route.to_vec()),
                _ => None,
            })
            .collect();
        assert_eq!(routes, vec![vec![fid(1)], vec![fid(3)]]);
    }

    #[test]
    fn test_shipment_on_unknown_flight_can_still_be_rerouted() {
        let p = problem();
        let cfg = config();
        let sol = Solution::new(vec![Shipment::new(
            sid(1),
            OrderIdentifier::new(1),
            2,
            [fid(9)],
        )]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ids = ShipmentSequence::after(&sol);
        let routes: Vec<_> = MoveGenerator::new(&p, &cfg)
            .generate(&sol, &mut rng, &mut ids)
            .into_iter()
            .filter_map(|c| match c.mv {
                TabuMove::Reroute { route, .. } => Some(route.to_vec()),
                _ => None,
            })
            .collect();
        assert_eq!(routes, vec![vec![fid(1)], vec![fid(2)], vec![fid(3)]]);
    }

    #[test]
    fn test_candidate_cap_is_respected() {
        let p = problem();
        let mut cfg = config();
        cfg.neighborhood.max_candidates = 3;
        let oid = OrderIdentifier::new(1);
        let sol = Solution::new(vec![
            Shipment::new(sid(1), oid, 50, [fid(1)]),
            Shipment::new(sid(2), oid, 50, [fid(2)]),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut ids = ShipmentSequence::after(&sol);
        let cands = MoveGenerator::new(&p, &cfg).generate(&sol, &mut rng, &mut ids);
        assert_eq!(cands.len(), 3);
    }
}
