//! Ports to the hosting editor
//!
//! The highlighting core never talks to a concrete editor. Everything it needs
//! (buffer text, scope queries, decoration mutation, resource lookup, opening
//! files) goes through the traits in this module, so a test or a headless
//! session can stand in for the real host.

use std::ops::Range;
use std::path::{Path, PathBuf};

/// Stable identifier for an open buffer, valid for the buffer's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

impl std::fmt::Display for BufferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

/// Underline shape requested for a decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Underline {
    None,
    Solid,
    Stippled,
}

/// How a decoration group is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationStyle {
    pub fill: bool,
    pub outline: bool,
    pub underline: Underline,
}

impl DecorationStyle {
    /// No fill, no outline, dotted underline. The colour comes from the scope.
    pub const STIPPLED_UNDERLINE: Self = Self {
        fill: false,
        outline: false,
        underline: Underline::Stippled,
    };
}

/// Read access to buffer contents and lexical scopes
pub trait BufferSurface {
    /// Full current text, or `None` if the host no longer knows the buffer
    fn text(&self, buffer: BufferId) -> Option<String>;

    /// Scope identifier at a byte offset (e.g. `source.php string.quoted.single.php`)
    fn scope_at(&self, buffer: BufferId, offset: usize) -> String;

    /// Primary selection; an empty range is a caret
    fn selection(&self, buffer: BufferId) -> Range<usize>;

    /// Text covered by `range`
    fn substr(&self, buffer: BufferId, range: Range<usize>) -> String;
}

/// Named decoration groups on a buffer.
///
/// Setting a name that already exists replaces the previous group.
pub trait DecorationSurface {
    fn set_decorations(
        &self,
        buffer: BufferId,
        name: &str,
        ranges: &[Range<usize>],
        scope: &str,
        style: DecorationStyle,
    );

    fn clear_decorations(&self, buffer: BufferId, name: &str);
}

/// Everything the highlight engine needs from the editor
pub trait EditorHost: BufferSurface + DecorationSurface + Send + Sync {}

impl<T> EditorHost for T where T: BufferSurface + DecorationSurface + Send + Sync {}

/// Finds project resources by file-name glob
pub trait ResourceResolver {
    fn find_resources(&self, pattern: &str) -> Vec<PathBuf>;
}

/// Window-level actions triggered by the open-path command
pub trait Workbench {
    fn open_file(&self, path: &Path);

    /// Show the fuzzy "go to file" overlay pre-filled with `text`
    fn show_goto_overlay(&self, text: &str);
}
