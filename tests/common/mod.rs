//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pathmark::headless::{DecorationOp, HeadlessHost};
use pathmark::host::{ResourceResolver, Workbench};
use pathmark::{BufferId, HighlightCoordinator, HighlightSettings};

pub type Session = (Arc<HeadlessHost>, HighlightCoordinator<HeadlessHost>);

/// Headless host plus a coordinator with default settings
pub fn session() -> Session {
    session_with(HighlightSettings::default())
}

pub fn session_with(settings: HighlightSettings) -> Session {
    let host = Arc::new(HeadlessHost::new());
    let coordinator = HighlightCoordinator::new(Arc::clone(&host), settings);
    (host, coordinator)
}

/// Settings with a custom match ceiling
pub fn with_limit(limit: usize) -> HighlightSettings {
    HighlightSettings {
        max_url_limit: limit,
        ..HighlightSettings::default()
    }
}

/// `count` references separated by spaces
pub fn references(count: usize) -> String {
    (0..count)
        .map(|_| "route::home")
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn set_count(ops: &[DecorationOp]) -> usize {
    ops.iter().filter(|op| !op.is_clear()).count()
}

pub fn cleared_names(ops: &[DecorationOp]) -> Vec<String> {
    ops.iter()
        .filter_map(|op| match op {
            DecorationOp::Clear { name, .. } => Some(name.clone()),
            DecorationOp::Set { .. } => None,
        })
        .collect()
}

/// Put `scope` on the bytes of every occurrence of `needle` in the buffer text
pub fn scope_occurrences(host: &HeadlessHost, buffer: BufferId, text: &str, needle: &str, scope: &str) {
    for (start, _) in text.match_indices(needle) {
        host.set_scope(buffer, start..start + needle.len(), scope);
    }
}

/// Resolver returning a fixed candidate list and remembering the patterns it saw
#[derive(Default)]
pub struct FixedResources {
    pub candidates: Vec<PathBuf>,
    pub patterns: RefCell<Vec<String>>,
}

impl FixedResources {
    pub fn new(candidates: &[&str]) -> Self {
        Self {
            candidates: candidates.iter().map(PathBuf::from).collect(),
            patterns: RefCell::new(Vec::new()),
        }
    }
}

impl ResourceResolver for FixedResources {
    fn find_resources(&self, pattern: &str) -> Vec<PathBuf> {
        self.patterns.borrow_mut().push(pattern.to_string());
        self.candidates.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbenchAction {
    Open(PathBuf),
    Goto(String),
}

/// Workbench that records what it was asked to do
#[derive(Default)]
pub struct RecordingWorkbench {
    pub actions: RefCell<Vec<WorkbenchAction>>,
}

impl Workbench for RecordingWorkbench {
    fn open_file(&self, path: &Path) {
        self.actions
            .borrow_mut()
            .push(WorkbenchAction::Open(path.to_path_buf()));
    }

    fn show_goto_overlay(&self, text: &str) {
        self.actions
            .borrow_mut()
            .push(WorkbenchAction::Goto(text.to_string()));
    }
}
