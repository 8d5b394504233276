//! Per-session highlight state
//!
//! Holds, for every buffer the engine has touched, the matches from the last
//! committed scan and the scopes that currently have a live decoration group,
//! plus the set of buffers that were dropped for having too many matches.
//!
//! The store has its own lock, separate from the coordinator's scan-cycle
//! guard, so readers (cursor resolution) and the unguarded activation path
//! never observe a half-written entry.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexSet;
use parking_lot::{Mutex, MutexGuard};

use crate::host::BufferId;
use crate::scanner::PathMatch;

/// Monotonic number drawn by each scan cycle when it starts
pub type CycleId = u64;

/// What the engine remembers about one buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferHighlights {
    /// Matches from the most recent committed scan, in document order
    pub last_matches: Vec<PathMatch>,
    /// Scopes with a live decoration group, in first-seen order
    pub last_scopes: IndexSet<String>,
    /// Cycle that produced this state (0 = never committed)
    pub committed_cycle: CycleId,
}

/// Session-wide maps, only reachable through [`HighlightStore::lock`]
#[derive(Debug, Default)]
pub struct SessionState {
    buffers: HashMap<BufferId, BufferHighlights>,
    ignored: HashSet<BufferId>,
}

impl SessionState {
    pub fn get(&self, buffer: BufferId) -> Option<&BufferHighlights> {
        self.buffers.get(&buffer)
    }

    /// State for `buffer`, created on first touch
    pub fn entry(&mut self, buffer: BufferId) -> &mut BufferHighlights {
        self.buffers.entry(buffer).or_default()
    }

    pub fn is_ignored(&self, buffer: BufferId) -> bool {
        self.ignored.contains(&buffer)
    }

    /// Returns true if the buffer was not already ignored
    pub fn ignore(&mut self, buffer: BufferId) -> bool {
        self.ignored.insert(buffer)
    }

    /// True when a cycle newer than `cycle` already committed for `buffer`
    pub fn is_superseded(&self, buffer: BufferId, cycle: CycleId) -> bool {
        self.buffers
            .get(&buffer)
            .is_some_and(|state| state.committed_cycle > cycle)
    }

    /// Drop everything known about `buffer`, ignored membership included
    pub fn remove(&mut self, buffer: BufferId) -> bool {
        let had_state = self.buffers.remove(&buffer).is_some();
        let was_ignored = self.ignored.remove(&buffer);
        had_state || was_ignored
    }

    pub fn tracked_buffers(&self) -> usize {
        self.buffers.len()
    }
}

/// Thread-safe owner of the [`SessionState`] plus the cycle counter
#[derive(Debug, Default)]
pub struct HighlightStore {
    state: Mutex<SessionState>,
    next_cycle: AtomicU64,
}

impl HighlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the next cycle number. The first cycle is 1.
    pub fn begin_cycle(&self) -> CycleId {
        self.next_cycle.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock()
    }

    pub fn is_ignored(&self, buffer: BufferId) -> bool {
        self.lock().is_ignored(buffer)
    }

    /// Copy of the state for `buffer`, if any cycle committed
    pub fn snapshot(&self, buffer: BufferId) -> Option<BufferHighlights> {
        self.lock().get(buffer).cloned()
    }

    pub fn last_scopes(&self, buffer: BufferId) -> Vec<String> {
        self.lock()
            .get(buffer)
            .map(|state| state.last_scopes.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn last_matches(&self, buffer: BufferId) -> Vec<PathMatch> {
        self.lock()
            .get(buffer)
            .map(|state| state.last_matches.clone())
            .unwrap_or_default()
    }

    pub fn remove(&self, buffer: BufferId) -> bool {
        self.lock().remove(buffer)
    }
}
