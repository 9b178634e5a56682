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

pub mod err;

pub use err::ConfigError;
use freight_alloc_core::prelude::{Cost, Quantity, TimeDelta};
use freight_alloc_model::prelude::AirportCode;
use serde::{Deserialize, Serialize};

/// Weights of the three load-balance terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalanceWeights {
    pub deviation: Cost,
    pub shortfall: Cost,
    pub spread: Cost,
}

impl Default for LoadBalanceWeights {
    fn default() -> Self {
        Self {
            deviation: 1000.0,
            shortfall: 500.0,
            spread: 500.0,
        }
    }
}

/// Bounds for the adaptive tabu tenure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenureBounds {
    pub floor: usize,
    pub ceiling: usize,
    /// Iterations without improvement before the tenure starts to grow.
    pub diversify_after: u64,
}

impl Default for TenureBounds {
    fn default() -> Self {
        Self {
            floor: 20,
            ceiling: 30,
            diversify_after: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborhoodLimits {
    pub max_candidates: usize,
    pub max_reroute_alternatives: usize,
    /// Shipments at or below this quantity are never split.
    pub min_split_quantity: Quantity,
}

impl Default for NeighborhoodLimits {
    fn default() -> Self {
        Self {
            max_candidates: 50,
            max_reroute_alternatives: 5,
            min_split_quantity: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingRules {
    pub hubs: Vec<String>,
    pub min_connection_minutes: i64,
    pub processing_buffer_hours: i64,
    /// Orders placed within this many hours of each other count as tied.
    pub tie_window_hours: i64,
}

impl Default for RoutingRules {
    fn default() -> Self {
        Self {
            hubs: vec!["SPIM".into(), "EBCI".into(), "UBBB".into()],
            min_connection_minutes: 60,
            processing_buffer_hours: 2,
            tie_window_hours: 3,
        }
    }
}

impl RoutingRules {
    #[inline]
    pub fn hub_codes(&self) -> Vec<AirportCode> {
        self.hubs.iter().map(|h| AirportCode::from(h.trim())).collect()
    }

    #[inline]
    pub fn min_connection(&self) -> TimeDelta<i64> {
        TimeDelta::from_minutes(self.min_connection_minutes)
    }

    #[inline]
    pub fn tie_window(&self) -> TimeDelta<i64> {
        TimeDelta::from_hours(self.tie_window_hours)
    }
}

/// Tunables of the greedy + tabu pipeline. Missing JSON fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabuSearchConfig {
    pub tabu_list_size: usize,
    pub max_iterations: u64,
    pub max_iterations_without_improvement: u64,
    /// Percent chance that a direct alternative enters the reroute sample.
    pub direct_route_probability: u32,
    /// Percent chance that a one-stop alternative enters the reroute sample.
    pub one_stop_route_probability: u32,
    /// Flights at or below this capacity are treated as bottlenecks.
    pub bottleneck_capacity: Quantity,

    pub capacity_violation_penalty: Cost,
    pub empty_route_penalty: Cost,
    pub delay_base_penalty: Cost,
    pub delay_hour_penalty: Cost,
    pub stopover_penalty: Cost,
    pub invalid_stopover_time_penalty: Cost,
    pub cancellation_penalty: Cost,
    pub replanification_penalty: Cost,

    pub capacity_excess_unit_penalty: Cost,
    /// Per unit of an order that no routed shipment carries. Kept below
    /// `capacity_excess_unit_penalty` so overbooked units prefer to wait.
    pub pending_unit_penalty: Cost,
    pub invalid_sequence_penalty: Cost,
    pub airport_overload_penalty: Cost,
    pub delivery_hour_weight: Cost,
    /// Fraction of the deadline after which lateness pressure starts.
    pub soft_deadline_ratio: f64,
    pub target_utilization: f64,
    pub load_balance: LoadBalanceWeights,

    pub tenure: TenureBounds,
    pub neighborhood: NeighborhoodLimits,
    pub routing: RoutingRules,
    pub frequency_penalty_rate: f64,

    pub snapshot_interval_ms: u64,
    pub parallel_evaluation: bool,
    pub seed: Option<u64>,
}

impl Default for TabuSearchConfig {
    fn default() -> Self {
        Self {
            tabu_list_size: 25,
            max_iterations: 200,
            max_iterations_without_improvement: 80,
            direct_route_probability: 70,
            one_stop_route_probability: 80,
            bottleneck_capacity: 200,

            capacity_violation_penalty: 20_000.0,
            empty_route_penalty: 50_000.0,
            delay_base_penalty: 10_000.0,
            delay_hour_penalty: 100.0,
            stopover_penalty: 100.0,
            invalid_stopover_time_penalty: 15_000.0,
            cancellation_penalty: 25_000.0,
            replanification_penalty: 5_000.0,

            capacity_excess_unit_penalty: 100.0,
            pending_unit_penalty: 80.0,
            invalid_sequence_penalty: 30_000.0,
            airport_overload_penalty: 40_000.0,
            delivery_hour_weight: 10.0,
            soft_deadline_ratio: 0.75,
            target_utilization: 0.90,
            load_balance: LoadBalanceWeights::default(),

            tenure: TenureBounds::default(),
            neighborhood: NeighborhoodLimits::default(),
            routing: RoutingRules::default(),
            frequency_penalty_rate: 0.02,

            snapshot_interval_ms: 1_000,
            parallel_evaluation: false,
            seed: None,
        }
    }
}

impl TabuSearchConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn with_max_iterations_without_improvement(mut self, iterations: u64) -> Self {
        self.max_iterations_without_improvement = iterations;
        self
    }

    pub fn with_tabu_list_size(mut self, size: usize) -> Self {
        self.tabu_list_size = size;
        self
    }

    pub fn with_parallel_evaluation(mut self, yes: bool) -> Self {
        self.parallel_evaluation = yes;
        self
    }

    pub fn with_hubs<S: Into<String>>(mut self, hubs: impl IntoIterator<Item = S>) -> Self {
        self.routing.hubs = hubs.into_iter().map(Into::into).collect();
        self
    }

    /// Initial tenure clamped into the adaptive bounds.
    #[inline]
    pub fn initial_tenure(&self) -> usize {
        self.tabu_list_size
            .clamp(self.tenure.floor, self.tenure.ceiling.max(self.tenure.floor))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tabu_list_size == 0 {
            return Err(ConfigError::ZeroTabuListSize);
        }
        if self.max_iterations == 0 || self.max_iterations_without_improvement == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        for (name, value) in [
            ("direct_route_probability", self.direct_route_probability),
            ("one_stop_route_probability", self.one_stop_route_probability),
        ] {
            if value > 100 {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
        for (name, value) in [
            ("capacity_violation_penalty", self.capacity_violation_penalty),
            ("empty_route_penalty", self.empty_route_penalty),
            ("delay_base_penalty", self.delay_base_penalty),
            ("delay_hour_penalty", self.delay_hour_penalty),
            ("stopover_penalty", self.stopover_penalty),
            ("invalid_stopover_time_penalty", self.invalid_stopover_time_penalty),
            ("cancellation_penalty", self.cancellation_penalty),
            ("replanification_penalty", self.replanification_penalty),
            ("capacity_excess_unit_penalty", self.capacity_excess_unit_penalty),
            ("pending_unit_penalty", self.pending_unit_penalty),
            ("invalid_sequence_penalty", self.invalid_sequence_penalty),
            ("airport_overload_penalty", self.airport_overload_penalty),
            ("delivery_hour_weight", self.delivery_hour_weight),
            ("load_balance.deviation", self.load_balance.deviation),
            ("load_balance.shortfall", self.load_balance.shortfall),
            ("load_balance.spread", self.load_balance.spread),
            ("frequency_penalty_rate", self.frequency_penalty_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        for (name, value) in [
            ("soft_deadline_ratio", self.soft_deadline_ratio),
            ("target_utilization", self.target_utilization),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(ConfigError::InvalidFraction { name, value });
            }
        }
        if self.tenure.floor == 0 || self.tenure.floor > self.tenure.ceiling {
            return Err(ConfigError::TenureBounds {
                floor: self.tenure.floor,
                ceiling: self.tenure.ceiling,
            });
        }
        if self.neighborhood.max_candidates == 0 {
            return Err(ConfigError::ZeroCandidates);
        }
        if let Some(bad) = self.routing.hubs.iter().find(|h| {
            let h = h.trim();
            !(3..=4).contains(&h.len()) || !h.chars().all(|c| c.is_ascii_alphanumeric())
        }) {
            return Err(ConfigError::InvalidHub(bad.clone()));
        }
        Ok(())
    }
}
