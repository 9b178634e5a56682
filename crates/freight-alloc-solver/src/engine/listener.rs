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
use freight_alloc_core::prelude::Cost;
use freight_alloc_model::prelude::Solution;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::{
    Arc,
    mpsc::{Receiver, SyncSender, TrySendError, sync_channel},
};

/// Best-known state pushed to listeners on improvement and on heartbeat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: u64,
    pub iteration: u64,
    pub best_cost: Cost,
    pub solution: Solution,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerError {
    listener: String,
    message: String,
}

impl ListenerError {
    pub fn new(listener: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            listener: listener.into(),
            message: message.into(),
        }
    }

    #[inline]
    pub fn listener(&self) -> &str {
        &self.listener
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener {} failed: {}", self.listener, self.message)
    }
}

impl std::error::Error for ListenerError {}

/// Progress sink consumed by the engine.
///
/// Failures and panics raised from `on_snapshot` are caught by the engine
/// and logged; they never stop the search. `is_stop_requested` is polled
/// once per iteration.
pub trait SearchListener: Send {
    fn name(&self) -> &str;

    fn on_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), ListenerError>;

    fn is_stop_requested(&self) -> bool {
        false
    }
}

impl std::fmt::Debug for dyn SearchListener + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchListener({})", self.name())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl SearchListener for NoopListener {
    fn name(&self) -> &str {
        "NoopListener"
    }

    #[inline]
    fn on_snapshot(&mut self, _snapshot: &Snapshot) -> Result<(), ListenerError> {
        Ok(())
    }
}

/// Forwards snapshots into a bounded channel. A full channel drops the
/// snapshot instead of blocking the search.
#[derive(Debug)]
pub struct ChannelListener {
    sender: SyncSender<Snapshot>,
    dropped: u64,
}

impl ChannelListener {
    pub fn bounded(capacity: usize) -> (Self, Receiver<Snapshot>) {
        let (sender, receiver) = sync_channel(capacity);
        (Self { sender, dropped: 0 }, receiver)
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl SearchListener for ChannelListener {
    fn name(&self) -> &str {
        "ChannelListener"
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), ListenerError> {
        match self.sender.try_send(snapshot.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                tracing::debug!(snapshot = snapshot.id, "snapshot channel full, dropping");
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => {
                Err(ListenerError::new(self.name(), "receiver disconnected"))
            }
        }
    }
}

/// Keeps only the most recent snapshot behind a shared lock.
#[derive(Debug, Clone, Default)]
pub struct LatestSnapshot {
    slot: Arc<Mutex<Option<Snapshot>>>,
}

impl LatestSnapshot {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<Snapshot> {
        self.slot.lock().clone()
    }

    pub fn take(&self) -> Option<Snapshot> {
        self.slot.lock().take()
    }
}

impl SearchListener for LatestSnapshot {
    fn name(&self) -> &str {
        "LatestSnapshot"
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), ListenerError> {
        *self.slot.lock() = Some(snapshot.clone());
        Ok(())
    }
}

/// Fans snapshots out to every child. A failing child does not prevent the
/// others from being notified; the first error is returned.
#[derive(Default)]
pub struct CompositeListener {
    listeners: Vec<Box<dyn SearchListener>>,
}

impl CompositeListener {
    #[inline]
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    #[inline]
    pub fn with<L: SearchListener + 'static>(mut self, listener: L) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    #[inline]
    pub fn push<L: SearchListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for CompositeListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompositeListener[")?;
        for (i, l) in self.listeners.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", l.name())?;
        }
        write!(f, "]")
    }
}

impl SearchListener for CompositeListener {
    fn name(&self) -> &str {
        "CompositeListener"
    }

    fn on_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), ListenerError> {
        let mut first_err = None;
        for l in &mut self.listeners {
            if let Err(e) = l.on_snapshot(snapshot) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn is_stop_requested(&self) -> bool {
        self.listeners.iter().any(|l| l.is_stop_requested())
    }
}
