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
    capacity::AirportCapacityTracker,
    config::TabuSearchConfig,
    engine::listener::{SearchListener, Snapshot},
    eval::{CostFunction, SearchProgress},
    monitor::{Heartbeat, StopToken},
    search::{Candidate, MoveGenerator, MoveSignature, TabuMemory, TabuMove},
    state::sequence::ShipmentSequence,
};
use chrono::Utc;
use freight_alloc_core::prelude::{Cost, Quantity};
use freight_alloc_model::prelude::{AirportCode, Problem, SearchStats, Solution};
use fxhash::FxHashMap;
use rand::{Rng, seq::SliceRandom};
use rayon::prelude::*;
use std::{panic::AssertUnwindSafe, time::Duration};

const IMPROVEMENT_EPS: Cost = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    MaxIterations,
    Stagnation,
    NoCandidates,
    StopRequested,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::MaxIterations => write!(f, "MaxIterations"),
            TerminationReason::Stagnation => write!(f, "Stagnation"),
            TerminationReason::NoCandidates => write!(f, "NoCandidates"),
            TerminationReason::StopRequested => write!(f, "StopRequested"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Initializing,
    Running,
    Terminated(TerminationReason),
}

/// Best solution found by one engine run. `best.stats()` carries the run
/// statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub best: Solution,
    pub best_cost: Cost,
    pub iterations: u64,
    pub reason: TerminationReason,
}

#[derive(Debug)]
struct Evaluated {
    solution: Solution,
    cost: Cost,
    score: Cost,
    signature: MoveSignature,
    mv: TabuMove,
}

/// Calls the listener, swallowing both returned errors and panics.
fn notify(listener: &mut dyn SearchListener, snapshot: &Snapshot) {
    match std::panic::catch_unwind(AssertUnwindSafe(|| listener.on_snapshot(snapshot))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(error = %e, snapshot = snapshot.id, "listener failed");
        }
        Err(_) => {
            tracing::warn!(
                listener = listener.name(),
                snapshot = snapshot.id,
                "listener panicked"
            );
        }
    }
}

/// Airport excess above storage, only airports that are over.
fn airport_excess(problem: &Problem, solution: &Solution) -> FxHashMap<AirportCode, Quantity> {
    AirportCapacityTracker::for_solution(problem, solution)
        .overloaded()
        .into_iter()
        .collect()
}

/// Single-trajectory tabu search over shipment allocations.
///
/// Every iteration generates a neighbourhood around the current solution,
/// discards candidates that push any airport further over its storage,
/// and moves to the best admissible neighbour even when it is worse than
/// the current one. A tabu signature is admissible only if it beats the
/// best known cost.
#[derive(Debug)]
pub struct TabuSearchEngine<'p> {
    problem: &'p Problem,
    config: &'p TabuSearchConfig,
    cost: CostFunction<'p>,
    moves: MoveGenerator<'p>,
    memory: TabuMemory,
    state: EngineState,
    snapshots: u64,
}

impl<'p> TabuSearchEngine<'p> {
    pub fn new(problem: &'p Problem, config: &'p TabuSearchConfig) -> Self {
        Self {
            problem,
            config,
            cost: CostFunction::new(problem, config),
            moves: MoveGenerator::new(problem, config),
            memory: TabuMemory::new(config.tenure, config.initial_tenure()),
            state: EngineState::Initializing,
            snapshots: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[inline]
    pub fn memory(&self) -> &TabuMemory {
        &self.memory
    }

    #[inline]
    pub fn cost_function(&self) -> &CostFunction<'p> {
        &self.cost
    }

    fn emit(
        &mut self,
        listener: &mut dyn SearchListener,
        iteration: u64,
        best_cost: Cost,
        best: &Solution,
    ) {
        self.snapshots += 1;
        let snapshot = Snapshot {
            id: self.snapshots,
            iteration,
            best_cost,
            solution: best.clone(),
            timestamp: Utc::now(),
        };
        notify(listener, &snapshot);
    }

    fn evaluate_candidate(
        &self,
        current: &Solution,
        candidate: &Candidate,
        progress: SearchProgress,
        best_now: Cost,
        current_excess: &FxHashMap<AirportCode, Quantity>,
    ) -> Option<Evaluated> {
        let mut next = current.clone();
        candidate.mv.apply(&mut next).ok()?;

        let grows_overload = airport_excess(self.problem, &next)
            .into_iter()
            .any(|(code, excess)| excess > current_excess.get(&code).copied().unwrap_or(0));
        if grows_overload {
            return None;
        }

        let cost = self.cost.evaluate(&next, progress);
        if self.memory.is_tabu(&candidate.signature) && cost >= best_now - IMPROVEMENT_EPS {
            return None;
        }
        let score = self
            .cost
            .ranking_score(cost, self.memory.frequency(&candidate.signature));
        Some(Evaluated {
            solution: next,
            cost,
            score,
            signature: candidate.signature.clone(),
            mv: candidate.mv.clone(),
        })
    }

    /// Lowest ranking score wins; ties go to the earlier candidate.
    fn select(&self, evaluated: Vec<Option<Evaluated>>) -> Option<Evaluated> {
        let mut chosen: Option<Evaluated> = None;
        for ev in evaluated.into_iter().flatten() {
            if chosen.as_ref().is_none_or(|c| ev.score < c.score) {
                chosen = Some(ev);
            }
        }
        chosen
    }

    #[tracing::instrument(
        level = "debug",
        name = "Tabu Search",
        skip_all,
        fields(shipments = initial.len(), max_iterations = self.config.max_iterations)
    )]
    pub fn run<R: Rng>(
        &mut self,
        initial: Solution,
        rng: &mut R,
        ids: &mut ShipmentSequence,
        listener: &mut dyn SearchListener,
        stop: &StopToken,
    ) -> SearchOutcome {
        let max = self.config.max_iterations;
        let reference = SearchProgress::new(0, max);
        let mut heartbeat = Heartbeat::new(Duration::from_millis(self.config.snapshot_interval_ms));
        self.state = EngineState::Running;

        let mut current = initial;
        let mut current_cost = self.cost.evaluate(&current, reference);
        let initial_cost = current_cost;
        let mut best = current.clone();
        let mut best_cost = current_cost;
        let mut best_iteration = 0u64;
        let mut stale = 0u64;
        let mut iteration = 0u64;

        let reason = loop {
            if stop.is_set() || listener.is_stop_requested() {
                break TerminationReason::StopRequested;
            }
            if iteration >= max {
                break TerminationReason::MaxIterations;
            }
            if stale >= self.config.max_iterations_without_improvement {
                break TerminationReason::Stagnation;
            }

            let progress = SearchProgress::new(iteration, max);
            let mut candidates = self.moves.generate(&current, rng, ids);
            if candidates.is_empty() {
                break TerminationReason::NoCandidates;
            }
            candidates.shuffle(rng);

            let best_now = self.cost.evaluate(&best, progress);
            let current_excess = airport_excess(self.problem, &current);
            let evaluated: Vec<Option<Evaluated>> = if self.config.parallel_evaluation {
                let this = &*self;
                candidates
                    .par_iter()
                    .map(|c| {
                        this.evaluate_candidate(&current, c, progress, best_now, &current_excess)
                    })
                    .collect()
            } else {
                candidates
                    .iter()
                    .map(|c| {
                        self.evaluate_candidate(&current, c, progress, best_now, &current_excess)
                    })
                    .collect()
            };
            let admissible = evaluated.iter().filter(|e| e.is_some()).count();
            iteration += 1;

            let Some(chosen) = self.select(evaluated) else {
                tracing::debug!(
                    iteration,
                    candidates = candidates.len(),
                    "no admissible candidate"
                );
                stale += 1;
                self.memory.adapt(false);
                if heartbeat.due() {
                    self.emit(listener, iteration, best_cost, &best);
                }
                continue;
            };

            let delta = chosen.cost - self.cost.evaluate(&current, progress);
            let improved = chosen.cost < best_now - IMPROVEMENT_EPS;
            tracing::debug!(
                iteration,
                candidates = candidates.len(),
                admissible,
                accepted = %chosen.mv,
                cost = chosen.cost,
                delta,
                tenure = self.memory.tenure(),
                "accepted move"
            );
            self.memory.record(chosen.signature, iteration, delta);
            current = chosen.solution;
            current_cost = chosen.cost;

            if improved {
                best = current.clone();
                best_cost = self.cost.evaluate(&best, reference);
                best_iteration = iteration;
                stale = 0;
                tracing::info!(iteration, best_cost, "new best allocation");
                self.emit(listener, iteration, best_cost, &best);
                heartbeat.reset();
            } else {
                stale += 1;
                if heartbeat.due() {
                    self.emit(listener, iteration, best_cost, &best);
                }
            }
            self.memory.adapt(improved);
        };

        self.state = EngineState::Terminated(reason);
        tracing::info!(
            %reason,
            iterations = iteration,
            best_iteration,
            initial_cost,
            best_cost,
            last_cost = current_cost,
            "tabu search finished"
        );

        *best.stats_mut() = SearchStats {
            iterations: iteration,
            best_iteration,
            termination: Some(reason.to_string()),
            elapsed_ms: heartbeat.elapsed().as_millis() as u64,
            initial_cost,
            final_cost: best_cost,
        };

        SearchOutcome {
            best,
            best_cost,
            iterations: iteration,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::listener::NoopListener, greedy::GreedyInitialAllocator};
    use freight_alloc_core::prelude::TimePoint;
    use freight_alloc_model::prelude::{
        Airport, Continent, Flight, FlightIdentifier, Order, OrderIdentifier, ScenarioConfig,
        ScenarioGenerator, Shipment, ShipmentIdentifier,
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
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

    /// Two orders of 75 units and two parallel flights of 100 seats.
    fn crowded_problem() -> Problem {
        let lim = Airport::new("SPIM", 900, -5, Continent::America).unwrap();
        let bru = Airport::new("EBBR", 900, 1, Continent::Europe).unwrap();
        let flights = vec![
            Flight::new(fid(1), lim.code().clone(), bru.code().clone(), h(1), h(13), 100).unwrap(),
            Flight::new(fid(2), lim.code().clone(), bru.code().clone(), h(2), h(14), 100).unwrap(),
        ];
        let orders = vec![
            Order::new(oid(1), &lim, &bru, 75, h(0)).unwrap(),
            Order::new(oid(2), &lim, &bru, 75, h(0)).unwrap(),
        ];
        Problem::new(vec![lim, bru], flights, orders)
    }

    fn all_on_first_flight() -> Solution {
        Solution::new(vec![
            Shipment::new(ShipmentIdentifier::new(1), oid(1), 75, [fid(1)]),
            Shipment::new(ShipmentIdentifier::new(2), oid(2), 75, [fid(1)]),
        ])
    }

    fn config() -> TabuSearchConfig {
        let mut cfg = TabuSearchConfig::default()
            .with_max_iterations(30)
            .with_max_iterations_without_improvement(15)
            .with_seed(7);
        cfg.direct_route_probability = 100;
        cfg.one_stop_route_probability = 100;
        cfg.snapshot_interval_ms = 0;
        cfg
    }

    fn run(
        problem: &Problem,
        cfg: &TabuSearchConfig,
        initial: Solution,
        seed: u64,
    ) -> SearchOutcome {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut ids = ShipmentSequence::after(&initial);
        TabuSearchEngine::new(problem, cfg).run(
            initial,
            &mut rng,
            &mut ids,
            &mut NoopListener,
            &StopToken::new(),
        )
    }

    #[test]
    fn test_engine_relieves_overbooked_flight() {
        let p = crowded_problem();
        let cfg = config();
        let cost = CostFunction::new(&p, &cfg);
        let before = cost.breakdown(&all_on_first_flight(), SearchProgress::new(0, 30));
        assert!(before.capacity > 0.0);

        let out = run(&p, &cfg, all_on_first_flight(), 1);
        let after = cost.breakdown(&out.best, SearchProgress::new(0, 30));
        assert!(after.capacity < before.capacity);
        assert_eq!(after.capacity, 0.0);
        assert!(out.best_cost < before.total());
        assert_eq!(out.best.total_quantity(), 150);
        assert_eq!(out.best.routed_quantity(), 150);
        assert!(out.best.stats().best_iteration >= 1);
        assert_eq!(
            out.best.stats().termination.as_deref(),
            Some(out.reason.to_string().as_str())
        );
    }

    #[test]
    fn test_routed_units_stay_routed_on_a_full_flight() {
        let lim = Airport::new("SPIM", 900, -5, Continent::America).unwrap();
        let bru = Airport::new("EBBR", 900, 1, Continent::Europe).unwrap();
        let flight =
            Flight::new(fid(1), lim.code().clone(), bru.code().clone(), h(1), h(13), 100).unwrap();
        let order = Order::new(oid(1), &lim, &bru, 110, h(0)).unwrap();
        let problem = Problem::new(vec![lim, bru], vec![flight], vec![order]);

        for seed in 1..=5u64 {
            let cfg = TabuSearchConfig::default()
                .with_seed(seed)
                .with_max_iterations(60);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut ids = ShipmentSequence::default();
            let initial = GreedyInitialAllocator::new(&problem, &cfg).allocate(&mut rng, &mut ids);
            assert_eq!(initial.routed_quantity(), 100);

            let out = TabuSearchEngine::new(&problem, &cfg).run(
                initial,
                &mut rng,
                &mut ids,
                &mut NoopListener,
                &StopToken::new(),
            );
            assert_eq!(out.best.routed_quantity(), 100, "seed {seed}");
            assert_eq!(out.best.total_quantity(), 110, "seed {seed}");
        }
    }

    #[test]
    fn test_no_accepted_move_overloads_an_airport() {
        for seed in 1..=4u64 {
            let problem = ScenarioGenerator::new(ScenarioConfig {
                seed,
                orders: 25,
                ..ScenarioConfig::default()
            })
            .generate();
            let cfg = config().with_max_iterations(20);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut ids = ShipmentSequence::default();
            let initial = GreedyInitialAllocator::new(&problem, &cfg).allocate(&mut rng, &mut ids);
            assert!(airport_excess(&problem, &initial).is_empty());

            let out = TabuSearchEngine::new(&problem, &cfg).run(
                initial,
                &mut rng,
                &mut ids,
                &mut NoopListener,
                &StopToken::new(),
            );
            assert!(
                airport_excess(&problem, &out.best).is_empty(),
                "seed {} overloaded an airport",
                seed
            );
            assert!(out.best.validate(&problem, cfg.routing.min_connection()).is_ok());
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let p = crowded_problem();
        let cfg = config();
        let a = run(&p, &cfg, all_on_first_flight(), 99);
        let b = run(&p, &cfg, all_on_first_flight(), 99);
        assert_eq!(a.best.shipments(), b.best.shipments());
        assert_eq!(a.best_cost, b.best_cost);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_parallel_evaluation_matches_sequential() {
        let p = crowded_problem();
        let seq = config();
        let par = config().with_parallel_evaluation(true);
        let a = run(&p, &seq, all_on_first_flight(), 5);
        let b = run(&p, &par, all_on_first_flight(), 5);
        assert_eq!(a.best.shipments(), b.best.shipments());
        assert_eq!(a.best_cost, b.best_cost);
    }

    #[test]
    fn test_stop_token_is_observed_before_first_iteration() {
        let p = crowded_problem();
        let cfg = config();
        let stop = StopToken::new();
        stop.request_stop();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ids = ShipmentSequence::new(10);
        let mut engine = TabuSearchEngine::new(&p, &cfg);
        let out = engine.run(all_on_first_flight(), &mut rng, &mut ids, &mut NoopListener, &stop);
        assert_eq!(out.reason, TerminationReason::StopRequested);
        assert_eq!(out.iterations, 0);
        assert_eq!(out.best.shipments(), all_on_first_flight().shipments());
        assert_eq!(
            engine.state(),
            EngineState::Terminated(TerminationReason::StopRequested)
        );
    }

    #[test]
    fn test_empty_solution_has_no_candidates() {
        let p = crowded_problem();
        let out = run(&p, &config(), Solution::default(), 1);
        assert_eq!(out.reason, TerminationReason::NoCandidates);
        assert_eq!(out.iterations, 0);
    }

    struct Panicking {
        calls: Arc<AtomicUsize>,
    }

    impl SearchListener for Panicking {
        fn name(&self) -> &str {
            "Panicking"
        }

        fn on_snapshot(
            &mut self,
            _snapshot: &Snapshot,
        ) -> Result<(), crate::engine::ListenerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            panic!("listener blew up");
        }
    }

    #[test]
    fn test_listener_panic_does_not_stop_search() {
        let p = crowded_problem();
        let cfg = config();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut listener = Panicking {
            calls: Arc::clone(&calls),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut ids = ShipmentSequence::new(10);
        let out = TabuSearchEngine::new(&p, &cfg).run(
            all_on_first_flight(),
            &mut rng,
            &mut ids,
            &mut listener,
            &StopToken::new(),
        );
        assert!(calls.load(Ordering::SeqCst) >= 1);
        assert_ne!(out.reason, TerminationReason::StopRequested);
        assert!(out.iterations >= 1);
    }

    struct StopAfterFirst {
        seen: bool,
    }

    impl SearchListener for StopAfterFirst {
        fn name(&self) -> &str {
            "StopAfterFirst"
        }

        fn on_snapshot(
            &mut self,
            _snapshot: &Snapshot,
        ) -> Result<(), crate::engine::ListenerError> {
            self.seen = true;
            Ok(())
        }

        fn is_stop_requested(&self) -> bool {
            self.seen
        }
    }

    #[test]
    fn test_listener_can_request_stop() {
        let p = crowded_problem();
        let cfg = config();
        let mut listener = StopAfterFirst { seen: false };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut ids = ShipmentSequence::new(10);
        let out = TabuSearchEngine::new(&p, &cfg).run(
            all_on_first_flight(),
            &mut rng,
            &mut ids,
            &mut listener,
            &StopToken::new(),
        );
        assert_eq!(out.reason, TerminationReason::StopRequested);
        assert!(out.iterations >= 1);
    }
}
