//! Path notation scanner
//!
//! Finds every `namespace::dotted.path` reference in a buffer, e.g.
//! `route::users.show` or `view::admin.user-list`. Detection is the regular
//! expression alone; the notation is never parsed further.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Lowercase namespace, `::`, then letters, dots and hyphens
pub const PATH_PATTERN: &str = r"\b([a-z]+)::([a-zA-Z.\-]+)";

const SEPARATOR: &str = "::";

static PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PATH_PATTERN).expect("PATH_PATTERN is a valid regex"));

/// A single path reference found in a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// Byte range into the buffer text (half-open)
    pub range: Range<usize>,
    /// The matched text, e.g. `route::users.show`
    pub text: String,
}

impl PathMatch {
    pub fn new(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    /// The part before `::` (`route` in `route::users.show`)
    pub fn namespace(&self) -> &str {
        self.text
            .split_once(SEPARATOR)
            .map(|(ns, _)| ns)
            .unwrap_or(&self.text)
    }

    /// The part after `::` (`users.show` in `route::users.show`)
    pub fn path(&self) -> &str {
        self.text
            .split_once(SEPARATOR)
            .map(|(_, path)| path)
            .unwrap_or("")
    }

    /// Whether a caret at `offset` sits on this match.
    ///
    /// Both ends are inclusive: a caret placed right after the last
    /// character still counts as being on the reference.
    pub fn contains(&self, offset: usize) -> bool {
        self.range.start <= offset && offset <= self.range.end
    }
}

/// Scan `text` for all non-overlapping path references, in document order
pub fn scan(text: &str) -> Vec<PathMatch> {
    PATH_REGEX
        .find_iter(text)
        .map(|m| PathMatch::new(m.range(), m.as_str()))
        .collect()
}
