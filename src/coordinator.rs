//! Highlight coordinator
//!
//! Entry point for buffer lifecycle events. Each open/edit/activate event runs
//! one scan cycle:
//!
//! ```text
//! event → (guard) → scan → over ceiling? → ignore buffer
//!                               ↓ no
//!                         commit matches → highlight enabled? → apply scopes
//! ```
//!
//! Open and edit events are serialized by a single process-wide guard. Activation
//! skips the guard; it may race a guarded cycle, which is harmless because the
//! commit step runs under the state store's lock and is ordered by cycle number:
//! a cycle that started earlier than one that already committed is dropped
//! instead of overwriting newer results.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::HighlightSettings;
use crate::highlighter::{self, ApplyReport};
use crate::host::{BufferId, EditorHost, ResourceResolver, Workbench};
use crate::open_path::{self, OpenOutcome};
use crate::scanner;
use crate::state::HighlightStore;

/// Lifecycle events delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferEvent {
    Opened(BufferId),
    Edited(BufferId),
    Activated(BufferId),
    Closed(BufferId),
}

/// How a single event ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Buffer is ignored or unknown to the host; nothing changed
    Skipped,
    /// Too many matches; the buffer is now ignored and nothing was rendered
    Ignored { count: usize },
    /// A newer cycle already committed for this buffer; results dropped
    Stale,
    /// Matches stored, highlighting disabled
    Recorded { matches: usize },
    /// Matches stored and decorations synchronized
    Highlighted { matches: usize, report: ApplyReport },
    /// Buffer closed and its state discarded
    Released,
}

pub struct HighlightCoordinator<H: ?Sized> {
    host: Arc<H>,
    store: HighlightStore,
    settings: RwLock<HighlightSettings>,
    cycle_guard: Mutex<()>,
}

impl<H: EditorHost + ?Sized> HighlightCoordinator<H> {
    pub fn new(host: Arc<H>, settings: HighlightSettings) -> Self {
        Self {
            host,
            store: HighlightStore::new(),
            settings: RwLock::new(settings),
            cycle_guard: Mutex::new(()),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn store(&self) -> &HighlightStore {
        &self.store
    }

    pub fn settings(&self) -> HighlightSettings {
        self.settings.read().clone()
    }

    /// Replace the settings; takes effect on the next event
    pub fn reload_settings(&self, settings: HighlightSettings) {
        tracing::debug!("Reloading highlight settings: {:?}", settings);
        *self.settings.write() = settings;
    }

    /// Route an event to its handler
    pub fn handle(&self, event: BufferEvent) -> CycleOutcome {
        match event {
            BufferEvent::Opened(buffer) => self.on_open(buffer),
            BufferEvent::Edited(buffer) => self.on_edit(buffer),
            BufferEvent::Activated(buffer) => self.on_activate(buffer),
            BufferEvent::Closed(buffer) => {
                self.on_close(buffer);
                CycleOutcome::Released
            }
        }
    }

    pub fn on_open(&self, buffer: BufferId) -> CycleOutcome {
        self.run_guarded(buffer)
    }

    pub fn on_edit(&self, buffer: BufferId) -> CycleOutcome {
        self.run_guarded(buffer)
    }

    /// Display refresh on focus. Runs without the cycle guard.
    pub fn on_activate(&self, buffer: BufferId) -> CycleOutcome {
        self.run_cycle(buffer)
    }

    /// Forget everything about `buffer`, including ignored membership
    pub fn on_close(&self, buffer: BufferId) {
        if self.store.remove(buffer) {
            tracing::debug!("{}: closed, highlight state discarded", buffer);
        }
    }

    /// Path reference under the primary cursor of `buffer`
    pub fn resolve_under_cursor(&self, buffer: BufferId) -> Option<String> {
        let state = self.store.lock();
        highlighter::resolve_under_cursor(&*self.host, buffer, state.get(buffer))
    }

    /// Open the resource named by the reference under the cursor.
    /// Does nothing when the cursor is not on a reference.
    pub fn open_under_cursor<R, W>(
        &self,
        buffer: BufferId,
        resolver: &R,
        workbench: &W,
    ) -> OpenOutcome
    where
        R: ResourceResolver + ?Sized,
        W: Workbench + ?Sized,
    {
        match self.resolve_under_cursor(buffer) {
            Some(text) => open_path::open_path(&text, resolver, workbench),
            None => {
                tracing::debug!("{}: no path reference under cursor", buffer);
                OpenOutcome::NoMatch
            }
        }
    }

    fn run_guarded(&self, buffer: BufferId) -> CycleOutcome {
        let _guard = self.cycle_guard.lock();
        self.run_cycle(buffer)
    }

    fn run_cycle(&self, buffer: BufferId) -> CycleOutcome {
        let settings = self.settings();
        let cycle = self.store.begin_cycle();

        if self.store.is_ignored(buffer) {
            return CycleOutcome::Skipped;
        }

        let Some(text) = self.host.text(buffer) else {
            tracing::debug!("{}: unknown to host, skipping cycle {}", buffer, cycle);
            return CycleOutcome::Skipped;
        };

        let matches = scanner::scan(&text);
        let count = matches.len();

        let mut state = self.store.lock();

        if count > settings.max_url_limit {
            if state.ignore(buffer) {
                tracing::info!(
                    "{}: ignoring buffer with {} path references (limit {})",
                    buffer,
                    count,
                    settings.max_url_limit
                );
            }
            return CycleOutcome::Ignored { count };
        }

        // Another cycle may have ignored the buffer while this one was scanning
        if state.is_ignored(buffer) {
            return CycleOutcome::Skipped;
        }

        if state.is_superseded(buffer, cycle) {
            tracing::debug!(
                "{}: dropping results of cycle {}, a newer cycle already committed",
                buffer,
                cycle
            );
            return CycleOutcome::Stale;
        }

        let entry = state.entry(buffer);
        entry.committed_cycle = cycle;

        let outcome = if settings.highlight_urls {
            let report = highlighter::apply(&*self.host, buffer, &matches, entry);
            CycleOutcome::Highlighted {
                matches: count,
                report,
            }
        } else {
            CycleOutcome::Recorded { matches: count }
        };
        entry.last_matches = matches;

        tracing::debug!("{}: cycle {} committed {} match(es)", buffer, cycle, count);
        outcome
    }
}
