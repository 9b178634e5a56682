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

use crate::{config::TenureBounds, search::moves::MoveSignature};
use freight_alloc_core::prelude::{Cost, Ewma, RunningMean};
use fxhash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

const TREND_HALF_LIFE: f64 = 10.0;

/// Long-term record of one move signature.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SignatureStats {
    pub frequency: u64,
    pub last_seen: u64,
    pub quality: RunningMean,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryStats {
    pub tenure: usize,
    pub tabu_len: usize,
    pub distinct_signatures: usize,
    pub no_improvement: u64,
    pub trend: Cost,
}

/// Short-term tabu list with an adaptive tenure and long-term frequency memory.
///
/// The short-term part is a FIFO of signatures mirrored in a set for O(1)
/// membership. Its length never exceeds the current tenure: shrinking the
/// tenure evicts the oldest entries immediately.
#[derive(Debug, Clone)]
pub struct TabuMemory {
    bounds: TenureBounds,
    tenure: usize,
    queue: VecDeque<MoveSignature>,
    set: FxHashSet<MoveSignature>,
    long_term: FxHashMap<MoveSignature, SignatureStats>,
    no_improvement: u64,
    trend: Option<Ewma<f64>>,
}

impl TabuMemory {
    pub fn new(bounds: TenureBounds, tenure: usize) -> Self {
        let tenure = tenure.clamp(bounds.floor.max(1), bounds.ceiling.max(bounds.floor.max(1)));
        Self {
            bounds,
            tenure,
            queue: VecDeque::with_capacity(tenure),
            set: FxHashSet::default(),
            long_term: FxHashMap::default(),
            no_improvement: 0,
            trend: Ewma::with_half_life(TREND_HALF_LIFE).ok(),
        }
    }

    #[inline]
    pub fn tenure(&self) -> usize {
        self.tenure
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn is_tabu(&self, signature: &MoveSignature) -> bool {
        self.set.contains(signature)
    }

    #[inline]
    pub fn frequency(&self, signature: &MoveSignature) -> u64 {
        self.long_term.get(signature).map_or(0, |s| s.frequency)
    }

    #[inline]
    pub fn signature_stats(&self, signature: &MoveSignature) -> Option<&SignatureStats> {
        self.long_term.get(signature)
    }

    #[inline]
    pub fn no_improvement(&self) -> u64 {
        self.no_improvement
    }

    fn make_tabu(&mut self, signature: MoveSignature) {
        if self.set.contains(&signature) {
            return;
        }
        if self.queue.len() >= self.tenure
            && let Some(oldest) = self.queue.pop_front()
        {
            self.set.remove(&oldest);
        }
        self.set.insert(signature.clone());
        self.queue.push_back(signature);
    }

    fn evict_excess(&mut self) {
        while self.queue.len() > self.tenure {
            if let Some(oldest) = self.queue.pop_front() {
                self.set.remove(&oldest);
            }
        }
    }

    /// Records an applied move: marks it tabu and folds `delta` (new cost
    /// minus old cost) into its long-term quality.
    pub fn record(&mut self, signature: MoveSignature, iteration: u64, delta: Cost) {
        let stats = self.long_term.entry(signature.clone()).or_default();
        stats.frequency += 1;
        stats.last_seen = iteration;
        stats.quality.observe(delta);
        if let Some(trend) = self.trend.as_mut() {
            trend.observe(delta);
        }
        self.make_tabu(signature);
    }

    /// Shrinks the tenure after an improvement, widens it once the search
    /// has stalled for longer than `diversify_after` iterations.
    pub fn adapt(&mut self, improved: bool) {
        if improved {
            self.no_improvement = 0;
            self.tenure = self.tenure.saturating_sub(1).max(self.bounds.floor.max(1));
            self.evict_excess();
        } else {
            self.no_improvement += 1;
            if self.no_improvement > self.bounds.diversify_after {
                self.tenure = (self.tenure + 1).min(self.bounds.ceiling.max(self.bounds.floor));
            }
        }
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.set.clear();
    }

    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            tenure: self.tenure,
            tabu_len: self.queue.len(),
            distinct_signatures: self.long_term.len(),
            no_improvement: self.no_improvement,
            trend: self.trend.as_ref().map_or(0.0, |t| t.value_or_zero()),
        }
    }
}
