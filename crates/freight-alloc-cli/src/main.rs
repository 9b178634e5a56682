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

use chrono::{DateTime, Utc};
use freight_alloc_core::prelude::{Cost, TimeDelta, TimeInterval};
use freight_alloc_model::prelude::*;
use freight_alloc_solver::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

fn load_config(path: &Path) -> Result<TabuSearchConfig, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let config: TabuSearchConfig = serde_json::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

#[derive(Serialize)]
struct CancellationRecord {
    flight: String,
    affected_orders: usize,
    replaced_shipments: usize,
    disruption_cost: Cost,
    metrics: SolutionMetrics,
}

#[derive(Serialize)]
struct RunRecord {
    seed: u64,
    start_ts: DateTime<Utc>,
    end_ts: DateTime<Utc>,
    runtime_ms: u128,
    airports: usize,
    flights: usize,
    orders: usize,
    snapshots_received: usize,
    stats: SearchStats,
    metrics: SolutionMetrics,
    cancellation: Option<CancellationRecord>,
}

/// Flight carrying the most units in `solution`.
fn busiest_flight(solution: &Solution) -> Option<FlightIdentifier> {
    let mut loads: Vec<_> = solution.flight_loads().into_iter().collect();
    loads.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    loads.first().map(|(id, _)| *id)
}

fn main() {
    enable_tracing();

    let mut config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => match load_config(&path) {
            Ok(cfg) => {
                tracing::info!("Loaded configuration from {}", path.display());
                cfg
            }
            Err(e) => {
                tracing::error!("Invalid configuration {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => TabuSearchConfig::default(),
    };
    let seed = config.seed.unwrap_or(42);
    config.seed = Some(seed);

    let scenario = ScenarioGenerator::new(ScenarioConfig {
        seed,
        ..ScenarioConfig::default()
    })
    .generate();
    let window = TimeInterval::spanning(
        ScenarioConfig::default().start,
        ScenarioConfig::default().start + TimeDelta::from_hours(24 * 8),
    );
    let mut feed = InMemoryFeed::new(
        scenario.airports().to_vec(),
        scenario.flights().to_vec(),
        scenario.orders().to_vec(),
    );
    let airports = feed.airports();
    let orders = feed.pending_orders();
    let problem = Problem::new(airports.clone(), feed.flights(window), orders.clone());

    tracing::info!(
        "Planning {} orders over {} flights and {} airports (seed {})",
        problem.orders().len(),
        problem.flights().len(),
        problem.airports().len(),
        seed
    );

    let start_ts = Utc::now();
    let t0 = Instant::now();
    let stop = StopToken::new();
    let latest = LatestSnapshot::new();
    let (channel, snapshots) = ChannelListener::bounded(64);
    let mut listener = CompositeListener::new().with(channel).with(latest.clone());
    let planner = Planner::new(config.clone());

    let (outcome, received) = std::thread::scope(|scope| {
        let consumer = scope.spawn(move || {
            let mut received = 0usize;
            for snapshot in snapshots {
                received += 1;
                tracing::info!(
                    "Snapshot #{} at iteration {}: cost={:.1}, shipments={}",
                    snapshot.id,
                    snapshot.iteration,
                    snapshot.best_cost,
                    snapshot.solution.len()
                );
            }
            received
        });
        let outcome = planner.plan(&problem, &mut listener, &stop);
        drop(listener);
        (outcome, consumer.join().unwrap_or(0))
    });

    let best = outcome.best;
    let metrics = SolutionMetrics::compute(&problem, &best, &config);
    tracing::info!(
        "Finished after {} iterations ({}): cost={:.1}, {}",
        outcome.iterations,
        outcome.reason,
        outcome.best_cost,
        metrics
    );
    if let Some(last) = latest.latest() {
        tracing::debug!("Latest snapshot #{} cost={:.1}", last.id, last.best_cost);
    }

    for (order, assigned) in best.assigned_per_order() {
        feed.mark_assigned(order, assigned.min(u32::MAX as u64) as u32);
    }

    let cancellation = busiest_flight(&best).and_then(|id| {
        let at = feed.flight(id)?.departure() - TimeDelta::from_hours(1);
        if !feed.cancel_flight(id, at) {
            return None;
        }
        let cancelled = feed.flight(id)?.clone();
        tracing::info!("Simulating cancellation of {}", cancelled);

        let handler = CancellationReplanificationHandler::new(config.clone());
        let replan = handler.replan(
            &cancelled,
            &best,
            &orders,
            &feed.flights(window),
            &airports,
            at,
            &mut NoopListener,
            &stop,
        );
        let merged = replan.merge_into(&best);
        let after = SolutionMetrics::compute(&problem, &merged, &config);
        tracing::info!(
            "Replanned {} order(s), disruption cost {:.1}: {}",
            replan.affected_orders.len(),
            replan.disruption_cost,
            after
        );
        Some(CancellationRecord {
            flight: cancelled.id().to_string(),
            affected_orders: replan.affected_orders.len(),
            replaced_shipments: replan.replaced.len(),
            disruption_cost: replan.disruption_cost,
            metrics: after,
        })
    });

    let record = RunRecord {
        seed,
        start_ts,
        end_ts: Utc::now(),
        runtime_ms: t0.elapsed().as_millis(),
        airports: problem.airports().len(),
        flights: problem.flights().len(),
        orders: problem.orders().len(),
        snapshots_received: received,
        stats: best.stats().clone(),
        metrics,
        cancellation,
    };

    let out_path = PathBuf::from("freight_alloc_run.json");
    match File::create(&out_path).and_then(|mut f| {
        let json = serde_json::to_string_pretty(&record).map_err(std::io::Error::other)?;
        f.write_all(json.as_bytes())
    }) {
        Ok(()) => tracing::info!("Wrote run record to {}", out_path.display()),
        Err(e) => tracing::error!("Failed to write {}: {}", out_path.display(), e),
    }
}
