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
    common::{FlightIdentifier, OrderIdentifier},
    demand::Order,
    network::{Airport, Continent, Flight},
    problem::{builder::ProblemBuilder, prob::Problem},
};
use freight_alloc_core::prelude::{MINUTES_PER_HOUR, Quantity, TimeDelta, TimePoint};
use rand::{Rng, SeedableRng, seq::IndexedRandom};
use rand_chacha::ChaCha8Rng;
use std::ops::RangeInclusive;

const HUBS: [(&str, i32, Continent); 3] = [
    ("SPIM", -5, Continent::America),
    ("EBCI", 1, Continent::Europe),
    ("UBBB", 4, Continent::Asia),
];

const SPOKES: [(&str, i32, Continent); 15] = [
    ("SKBO", -5, Continent::America),
    ("SEQM", -5, Continent::America),
    ("SCEL", -3, Continent::America),
    ("SABE", -3, Continent::America),
    ("SBBR", -3, Continent::America),
    ("LOWW", 2, Continent::Europe),
    ("EDDI", 2, Continent::Europe),
    ("LKPR", 2, Continent::Europe),
    ("LEMD", 2, Continent::Europe),
    ("EHAM", 2, Continent::Europe),
    ("OMDB", 4, Continent::Asia),
    ("OPKC", 5, Continent::Asia),
    ("VIDP", 5, Continent::Asia),
    ("OJAI", 3, Continent::Asia),
    ("OERK", 3, Continent::Asia),
];

/// Shape of a synthetic hub-and-spoke network.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub seed: u64,
    pub start: TimePoint<i64>,
    pub days: u32,
    pub spokes_per_continent: usize,
    pub orders: usize,
    pub order_quantity: RangeInclusive<Quantity>,
    pub storage_capacity: RangeInclusive<Quantity>,
    pub same_continent_capacity: RangeInclusive<Quantity>,
    pub intercontinental_capacity: RangeInclusive<Quantity>,
    pub same_continent_flight_hours: i64,
    pub intercontinental_flight_hours: i64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start: TimePoint::new(0),
            days: 4,
            spokes_per_continent: 3,
            orders: 40,
            order_quantity: 5..=120,
            storage_capacity: 600..=1000,
            same_continent_capacity: 200..=300,
            intercontinental_capacity: 250..=400,
            same_continent_flight_hours: 12,
            intercontinental_flight_hours: 24,
        }
    }
}

/// Deterministic generator of airports, daily flights and orders.
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    config: ScenarioConfig,
    rng: ChaCha8Rng,
    next_flight: u32,
}

impl ScenarioGenerator {
    pub fn new(config: ScenarioConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            next_flight: 1,
        }
    }

    pub fn generate(mut self) -> Problem {
        let airports = self.airports();
        let flights = self.flights(&airports);
        let orders = self.orders(&airports);
        tracing::debug!(
            airports = airports.len(),
            flights = flights.len(),
            orders = orders.len(),
            "generated scenario"
        );
        ProblemBuilder::new()
            .with_airports(airports)
            .with_flights(flights)
            .with_orders(orders)
            .build_lenient()
    }

    fn airports(&mut self) -> Vec<Airport> {
        let per_continent = self.config.spokes_per_continent;
        let storage = self.config.storage_capacity.clone();
        let mut out = Vec::new();
        let spokes = [Continent::America, Continent::Europe, Continent::Asia]
            .into_iter()
            .flat_map(|c| {
                SPOKES
                    .iter()
                    .filter(move |(_, _, sc)| *sc == c)
                    .take(per_continent)
            });
        for (code, gmt, continent) in HUBS.iter().chain(spokes) {
            let capacity = self.rng.random_range(storage.clone());
            if let Ok(a) = Airport::new(code, capacity, *gmt, *continent) {
                out.push(a);
            }
        }
        out
    }

    fn flights(&mut self, airports: &[Airport]) -> Vec<Flight> {
        let mut legs: Vec<(usize, usize)> = Vec::new();
        let hub_count = HUBS.len().min(airports.len());
        for i in 0..hub_count {
            for j in 0..hub_count {
                if i != j {
                    legs.push((i, j));
                }
            }
        }
        for s in hub_count..airports.len() {
            for h in 0..hub_count {
                let same = airports[s].continent() == airports[h].continent();
                // Spokes always reach their own hub, and one foreign hub directly.
                if same || (s + h) % hub_count == 0 {
                    legs.push((s, h));
                    legs.push((h, s));
                }
            }
        }

        let mut out = Vec::new();
        for day in 0..self.config.days as i64 {
            let day_start = self.config.start.value() + day * 24 * MINUTES_PER_HOUR;
            for &(o, d) in &legs {
                if let Some(f) = self.flight(&airports[o], &airports[d], day_start) {
                    out.push(f);
                }
            }
        }
        out
    }

    fn flight(&mut self, from: &Airport, to: &Airport, day_start: i64) -> Option<Flight> {
        let (max_hours, capacity) = if from.continent() == to.continent() {
            (
                self.config.same_continent_flight_hours,
                self.config.same_continent_capacity.clone(),
            )
        } else {
            (
                self.config.intercontinental_flight_hours,
                self.config.intercontinental_capacity.clone(),
            )
        };
        let dep = day_start + self.rng.random_range(0..24) * MINUTES_PER_HOUR;
        let hours = self.rng.random_range((max_hours / 2).max(1)..=max_hours.max(1));
        let departure = TimePoint::new(dep);
        let arrival = departure + TimeDelta::from_hours(hours);
        let id = FlightIdentifier::new(self.next_flight);
        self.next_flight += 1;
        Flight::new(
            id,
            from.code().clone(),
            to.code().clone(),
            departure,
            arrival,
            self.rng.random_range(capacity),
        )
        .ok()
    }

    fn orders(&mut self, airports: &[Airport]) -> Vec<Order> {
        if airports.len() < 2 {
            return Vec::new();
        }
        // Leave the last day free so late orders still find departures.
        let horizon_hours = (self.config.days.saturating_sub(1).max(1) as i64) * 24;
        let quantity = self.config.order_quantity.clone();
        let mut out = Vec::with_capacity(self.config.orders);
        let mut next_id = 1u32;
        while out.len() < self.config.orders {
            let (Some(origin), Some(dest)) =
                (airports.choose(&mut self.rng), airports.choose(&mut self.rng))
            else {
                break;
            };
            if origin.code() == dest.code() {
                continue;
            }
            let at = self.config.start.value()
                + self.rng.random_range(0..horizon_hours) * MINUTES_PER_HOUR;
            let qty = self.rng.random_range(quantity.clone());
            if let Ok(order) = Order::new(
                OrderIdentifier::new(next_id),
                origin,
                dest,
                qty,
                TimePoint::new(at),
            ) {
                out.push(order);
                next_id += 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic_per_seed() {
        let a = ScenarioGenerator::new(ScenarioConfig::default()).generate();
        let b = ScenarioGenerator::new(ScenarioConfig::default()).generate();
        assert_eq!(a.flights(), b.flights());
        assert_eq!(a.orders(), b.orders());

        let c = ScenarioGenerator::new(ScenarioConfig {
            seed: 7,
            ..ScenarioConfig::default()
        })
        .generate();
        assert_ne!(a.orders(), c.orders());
    }

    #[test]
    fn test_capacities_follow_configured_ranges() {
        let cfg = ScenarioConfig::default();
        let p = ScenarioGenerator::new(cfg.clone()).generate();
        assert_eq!(p.airports().len(), 3 + 3 * cfg.spokes_per_continent);
        assert_eq!(p.orders().len(), cfg.orders);
        for a in p.airports() {
            assert!(cfg.storage_capacity.contains(&a.storage_capacity()));
        }
        for f in p.flights() {
            let o = p.airport(f.origin()).unwrap();
            let d = p.airport(f.destination()).unwrap();
            if o.continent() == d.continent() {
                assert!(cfg.same_continent_capacity.contains(&f.capacity()));
            } else {
                assert!(cfg.intercontinental_capacity.contains(&f.capacity()));
            }
        }
    }
}
