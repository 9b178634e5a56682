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

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering::Relaxed};
use std::time::{Duration, Instant};

/// Cooperative stop flag shared between a caller and a running search.
///
/// The engine polls it once per iteration boundary, never mid-iteration.
#[derive(Clone, Default, Debug)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
    #[inline]
    pub fn is_set(&self) -> bool {
        self.0.load(Relaxed)
    }
    #[inline]
    pub fn request_stop(&self) {
        self.0.store(true, Relaxed)
    }
}

impl PartialEq for StopToken {
    /// Identity of the shared flag, not its current value.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for StopToken {}

impl fmt::Display for StopToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopToken(set: {})", self.is_set())
    }
}

/// Wall-clock pacing for periodic snapshots.
#[derive(Debug, Clone, Copy)]
pub struct Heartbeat {
    start: Instant,
    last: Instant,
    interval: Duration,
}

impl Heartbeat {
    pub fn new(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            interval,
        }
    }

    /// True once per elapsed interval; a zero interval never fires.
    pub fn due(&mut self) -> bool {
        if self.interval.is_zero() {
            return false;
        }
        let now = Instant::now();
        if now.duration_since(self.last) >= self.interval {
            self.last = now;
            return true;
        }
        false
    }

    /// Restarts the interval, e.g. after an improvement snapshot.
    #[inline]
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_token_identity_and_behavior() {
        let a = StopToken::new();
        let b = a.clone();
        let c = StopToken::new();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_set());

        b.request_stop();
        assert!(a.is_set());
        assert!(!c.is_set());
        assert!(a.to_string().contains("set: true"));
    }

    #[test]
    fn stop_token_crosses_threads() {
        let token = StopToken::new();
        let remote = token.clone();
        std::thread::spawn(move || remote.request_stop())
            .join()
            .unwrap();
        assert!(token.is_set());
    }

    #[test]
    fn heartbeat_fires_after_interval() {
        let mut hb = Heartbeat::new(Duration::from_millis(5));
        assert!(!hb.due());
        std::thread::sleep(Duration::from_millis(10));
        assert!(hb.due());
        assert!(!hb.due());
    }

    #[test]
    fn zero_interval_heartbeat_is_silent() {
        let mut hb = Heartbeat::new(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(2));
        assert!(!hb.due());
    }
}
