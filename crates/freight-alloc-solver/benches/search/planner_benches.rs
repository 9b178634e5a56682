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

use criterion::{Criterion, criterion_group, criterion_main};
use freight_alloc_model::prelude::{ScenarioConfig, ScenarioGenerator};
use freight_alloc_solver::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

fn scenario(orders: usize) -> freight_alloc_model::prelude::Problem {
    ScenarioGenerator::new(ScenarioConfig {
        seed: 42,
        orders,
        ..ScenarioConfig::default()
    })
    .generate()
}

fn bench_greedy(c: &mut Criterion) {
    let problem = scenario(60);
    let config = TabuSearchConfig::default();
    let greedy = GreedyInitialAllocator::new(&problem, &config);

    c.bench_function("GreedyInitialAllocator allocate (60 orders)", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            let mut ids = ShipmentSequence::default();
            black_box(greedy.allocate(&mut rng, &mut ids));
        });
    });
}

fn bench_planner(c: &mut Criterion) {
    let problem = scenario(40);
    let mut group = c.benchmark_group("Planner plan (40 orders, 50 iterations)");
    group.sample_size(10);

    for parallel in [false, true] {
        let planner = Planner::new(
            TabuSearchConfig::default()
                .with_seed(7)
                .with_max_iterations(50)
                .with_parallel_evaluation(parallel),
        );
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| {
                let out = planner.plan(&problem, &mut NoopListener, &StopToken::new());
                black_box(out.best_cost);
            });
        });
    }
    group.finish();
}

fn bench_cost(c: &mut Criterion) {
    let problem = scenario(60);
    let config = TabuSearchConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut ids = ShipmentSequence::default();
    let solution = GreedyInitialAllocator::new(&problem, &config).allocate(&mut rng, &mut ids);
    let cost = CostFunction::new(&problem, &config);

    c.bench_function("CostFunction evaluate (60 orders)", |b| {
        b.iter(|| black_box(cost.evaluate(&solution, SearchProgress::new(10, 100))));
    });
}

criterion_group!(benches, bench_greedy, bench_cost, bench_planner);
criterion_main!(benches);
