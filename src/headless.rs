//! In-memory editor host
//!
//! A [`HeadlessHost`] keeps buffers in memory, answers scope queries with a
//! small quoted-string classifier on top of a per-buffer base scope, and
//! records every decoration operation. The CLI runs the engine against it and
//! the integration tests use it as their fake editor.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::host::{BufferId, BufferSurface, DecorationStyle, DecorationSurface};

/// One call made against the decoration surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationOp {
    Set {
        buffer: BufferId,
        name: String,
        ranges: Vec<Range<usize>>,
        scope: String,
        style: DecorationStyle,
    },
    Clear {
        buffer: BufferId,
        name: String,
    },
}

impl DecorationOp {
    pub fn buffer(&self) -> BufferId {
        match self {
            DecorationOp::Set { buffer, .. } | DecorationOp::Clear { buffer, .. } => *buffer,
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, DecorationOp::Clear { .. })
    }
}

/// A visible decoration group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationGroup {
    pub scope: String,
    pub ranges: Vec<Range<usize>>,
}

#[derive(Debug)]
struct HeadlessBuffer {
    text: String,
    base_scope: String,
    selection: Range<usize>,
    scope_overrides: Vec<(Range<usize>, String)>,
    decorations: BTreeMap<String, DecorationGroup>,
}

/// Base scope for a file, picked from its extension
pub fn base_scope_for_path(path: &Path) -> &'static str {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    if name.ends_with(".blade.php") {
        return "text.html.blade";
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some("php") => "source.php",
        Some("js") | Some("mjs") | Some("cjs") => "source.js",
        Some("ts") => "source.ts",
        Some("vue") => "text.html.vue",
        Some("html") | Some("htm") => "text.html.basic",
        Some("json") => "source.json",
        Some("yaml") | Some("yml") => "source.yaml",
        Some("md") => "text.html.markdown",
        _ => "text.plain",
    }
}

/// Which quote character, if any, encloses `offset`
fn enclosing_quote(text: &str, offset: usize) -> Option<u8> {
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for &byte in text.as_bytes().iter().take(offset) {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if byte == b'\\' {
                    escaped = true;
                } else if byte == q {
                    quote = None;
                }
            }
            None => {
                if matches!(byte, b'\'' | b'"' | b'`') {
                    quote = Some(byte);
                }
            }
        }
    }

    quote
}

/// Scope stack at `offset`, e.g. `source.php string.quoted.single.php`
fn classify_scope(text: &str, base_scope: &str, offset: usize) -> String {
    let language = base_scope.rsplit('.').next().unwrap_or(base_scope);
    match enclosing_quote(text, offset) {
        Some(b'\'') => format!("{base_scope} string.quoted.single.{language}"),
        Some(b'"') => format!("{base_scope} string.quoted.double.{language}"),
        Some(_) => format!("{base_scope} string.template.{language}"),
        None => base_scope.to_string(),
    }
}

#[derive(Debug, Default)]
pub struct HeadlessHost {
    buffers: RwLock<HashMap<BufferId, HeadlessBuffer>>,
    operations: Mutex<Vec<DecorationOp>>,
    next_id: AtomicU64,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a buffer with `text` and a base scope such as `source.php`
    pub fn open(&self, text: impl Into<String>, base_scope: impl Into<String>) -> BufferId {
        let id = BufferId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.buffers.write().insert(
            id,
            HeadlessBuffer {
                text: text.into(),
                base_scope: base_scope.into(),
                selection: 0..0,
                scope_overrides: Vec::new(),
                decorations: BTreeMap::new(),
            },
        );
        id
    }

    /// Open a buffer for a file, picking the base scope from its name
    pub fn open_file(&self, path: &Path, text: impl Into<String>) -> BufferId {
        self.open(text, base_scope_for_path(path))
    }

    /// Drop a buffer. Later queries see it as unknown.
    pub fn close(&self, buffer: BufferId) {
        self.buffers.write().remove(&buffer);
    }

    /// Replace the buffer text. The selection is clamped to the new length.
    pub fn set_text(&self, buffer: BufferId, text: impl Into<String>) {
        if let Some(buf) = self.buffers.write().get_mut(&buffer) {
            buf.text = text.into();
            let len = buf.text.len();
            buf.selection = buf.selection.start.min(len)..buf.selection.end.min(len);
        }
    }

    pub fn set_selection(&self, buffer: BufferId, selection: Range<usize>) {
        if let Some(buf) = self.buffers.write().get_mut(&buffer) {
            let len = buf.text.len();
            buf.selection = selection.start.min(len)..selection.end.min(len);
        }
    }

    pub fn set_caret(&self, buffer: BufferId, offset: usize) {
        self.set_selection(buffer, offset..offset);
    }

    /// Force `scope` for offsets in `range`. Later overrides win.
    pub fn set_scope(&self, buffer: BufferId, range: Range<usize>, scope: impl Into<String>) {
        if let Some(buf) = self.buffers.write().get_mut(&buffer) {
            buf.scope_overrides.push((range, scope.into()));
        }
    }

    /// Visible decoration groups, keyed by decoration name
    pub fn decorations(&self, buffer: BufferId) -> BTreeMap<String, DecorationGroup> {
        self.buffers
            .read()
            .get(&buffer)
            .map(|buf| buf.decorations.clone())
            .unwrap_or_default()
    }

    /// Scopes that currently have a visible group
    pub fn visible_scopes(&self, buffer: BufferId) -> Vec<String> {
        let mut scopes: Vec<String> = self
            .decorations(buffer)
            .into_values()
            .map(|group| group.scope)
            .collect();
        scopes.sort();
        scopes
    }

    /// Every decoration call so far, oldest first
    pub fn operations(&self) -> Vec<DecorationOp> {
        self.operations.lock().clone()
    }

    /// Drain the operation log
    pub fn take_operations(&self) -> Vec<DecorationOp> {
        std::mem::take(&mut *self.operations.lock())
    }
}

impl BufferSurface for HeadlessHost {
    fn text(&self, buffer: BufferId) -> Option<String> {
        self.buffers.read().get(&buffer).map(|buf| buf.text.clone())
    }

    fn scope_at(&self, buffer: BufferId, offset: usize) -> String {
        let buffers = self.buffers.read();
        let Some(buf) = buffers.get(&buffer) else {
            return String::new();
        };

        if let Some((_, scope)) = buf
            .scope_overrides
            .iter()
            .rev()
            .find(|(range, _)| range.contains(&offset))
        {
            return scope.clone();
        }

        classify_scope(&buf.text, &buf.base_scope, offset)
    }

    fn selection(&self, buffer: BufferId) -> Range<usize> {
        self.buffers
            .read()
            .get(&buffer)
            .map(|buf| buf.selection.clone())
            .unwrap_or(0..0)
    }

    fn substr(&self, buffer: BufferId, range: Range<usize>) -> String {
        self.buffers
            .read()
            .get(&buffer)
            .and_then(|buf| buf.text.get(range))
            .map(str::to_string)
            .unwrap_or_default()
    }
}

impl DecorationSurface for HeadlessHost {
    fn set_decorations(
        &self,
        buffer: BufferId,
        name: &str,
        ranges: &[Range<usize>],
        scope: &str,
        style: DecorationStyle,
    ) {
        self.operations.lock().push(DecorationOp::Set {
            buffer,
            name: name.to_string(),
            ranges: ranges.to_vec(),
            scope: scope.to_string(),
            style,
        });

        if let Some(buf) = self.buffers.write().get_mut(&buffer) {
            buf.decorations.insert(
                name.to_string(),
                DecorationGroup {
                    scope: scope.to_string(),
                    ranges: ranges.to_vec(),
                },
            );
        }
    }

    fn clear_decorations(&self, buffer: BufferId, name: &str) {
        self.operations.lock().push(DecorationOp::Clear {
            buffer,
            name: name.to_string(),
        });

        if let Some(buf) = self.buffers.write().get_mut(&buffer) {
            buf.decorations.remove(name);
        }
    }
}
