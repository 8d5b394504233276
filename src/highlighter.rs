//! Scope-aware decoration of path matches
//!
//! Matches are grouped by the lexical scope at their start offset so the host
//! can colour each group's underline after that scope. One decoration group is
//! issued per scope, named after it, so re-issuing a scope replaces its group
//! instead of stacking a second one. Scopes that were decorated by the previous
//! pass but have no matches now get their group cleared.

use std::ops::Range;

use indexmap::{IndexMap, IndexSet};

use crate::host::{BufferId, BufferSurface, DecorationStyle, EditorHost};
use crate::scanner::PathMatch;
use crate::state::BufferHighlights;

const DECORATION_PREFIX: &str = "pathmark";

/// Decoration group name for a scope
pub fn decoration_name(scope: &str) -> String {
    format!("{DECORATION_PREFIX} {scope}")
}

/// Result of one [`apply`] pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Scopes whose group was (re)issued, in first-seen order
    pub rendered: Vec<String>,
    /// Scopes whose group was cleared
    pub removed: Vec<String>,
}

/// Partition matches by the scope at each match's start offset.
///
/// Group order is the order in which scopes are first seen; within a group
/// the ranges keep document order.
pub fn group_by_scope<H>(
    host: &H,
    buffer: BufferId,
    matches: &[PathMatch],
) -> IndexMap<String, Vec<Range<usize>>>
where
    H: BufferSurface + ?Sized,
{
    let mut groups: IndexMap<String, Vec<Range<usize>>> = IndexMap::new();
    for m in matches {
        let scope = host.scope_at(buffer, m.start());
        groups.entry(scope).or_default().push(m.range.clone());
    }
    groups
}

/// Render `matches` on `buffer` and bring `state.last_scopes` in line with
/// what is now visible.
///
/// Always runs the diff, so an empty `matches` clears every group.
pub fn apply<H>(
    host: &H,
    buffer: BufferId,
    matches: &[PathMatch],
    state: &mut BufferHighlights,
) -> ApplyReport
where
    H: EditorHost + ?Sized,
{
    let groups = group_by_scope(host, buffer, matches);

    for (scope, ranges) in &groups {
        host.set_decorations(
            buffer,
            &decoration_name(scope),
            ranges,
            scope,
            DecorationStyle::STIPPLED_UNDERLINE,
        );
    }

    let new_scopes: IndexSet<String> = groups.into_keys().collect();
    let removed: Vec<String> = state
        .last_scopes
        .difference(&new_scopes)
        .cloned()
        .collect();

    for scope in &removed {
        host.clear_decorations(buffer, &decoration_name(scope));
    }

    tracing::trace!(
        "{}: rendered {} scope group(s), removed {}",
        buffer,
        new_scopes.len(),
        removed.len()
    );

    let rendered = new_scopes.iter().cloned().collect();
    state.last_scopes = new_scopes;

    ApplyReport { rendered, removed }
}

/// Text of the path reference under the cursor.
///
/// A non-empty selection resolves to the selected text. A caret resolves to
/// the first known match containing it. Buffers that were never scanned
/// resolve to nothing.
pub fn resolve_under_cursor<H>(
    host: &H,
    buffer: BufferId,
    state: Option<&BufferHighlights>,
) -> Option<String>
where
    H: BufferSurface + ?Sized,
{
    let state = state?;
    let selection = host.selection(buffer);

    if !selection.is_empty() {
        return Some(host.substr(buffer, selection));
    }

    state
        .last_matches
        .iter()
        .find(|m| m.contains(selection.start))
        .map(|m| host.substr(buffer, m.range.clone()))
}
