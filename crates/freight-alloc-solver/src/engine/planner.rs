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
    config::TabuSearchConfig,
    engine::{
        listener::SearchListener,
        tabu::{SearchOutcome, TabuSearchEngine},
    },
    greedy::GreedyInitialAllocator,
    monitor::StopToken,
    state::sequence::ShipmentSequence,
};
use freight_alloc_model::prelude::Problem;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Greedy opening followed by tabu search, driven by one seeded RNG.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: TabuSearchConfig,
}

impl Planner {
    #[inline]
    pub fn new(config: TabuSearchConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &TabuSearchConfig {
        &self.config
    }

    /// Configured seed, otherwise derived from the wall clock.
    pub fn seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    pub fn plan(
        &self,
        problem: &Problem,
        listener: &mut dyn SearchListener,
        stop: &StopToken,
    ) -> SearchOutcome {
        let mut ids = ShipmentSequence::default();
        self.plan_with_ids(problem, &mut ids, listener, stop)
    }

    /// Like [`Planner::plan`] but draws shipment ids from `ids`, so the
    /// result can be merged into an existing solution.
    #[tracing::instrument(
        level = "info",
        name = "Plan",
        skip_all,
        fields(
            orders = problem.orders().len(),
            flights = problem.flights().len(),
            airports = problem.airports().len()
        )
    )]
    pub fn plan_with_ids(
        &self,
        problem: &Problem,
        ids: &mut ShipmentSequence,
        listener: &mut dyn SearchListener,
        stop: &StopToken,
    ) -> SearchOutcome {
        let seed = self.seed();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let initial = GreedyInitialAllocator::new(problem, &self.config).allocate(&mut rng, ids);
        tracing::info!(
            seed,
            shipments = initial.len(),
            direct = initial.direct_count(),
            connecting = initial.connecting_count(),
            pending = initial.empty_count(),
            "greedy allocation ready"
        );

        TabuSearchEngine::new(problem, &self.config).run(initial, &mut rng, ids, listener, stop)
    }
}
