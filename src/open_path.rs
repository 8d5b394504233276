//! Open-path command
//!
//! Turns a matched reference into a file-name glob and opens the file it
//! names. `route::users.show` becomes `*routeusersshow`; a single hit is opened
//! directly, anything else falls back to the "go to file" overlay pre-filled
//! with the reference.

use std::path::PathBuf;

use crate::host::{ResourceResolver, Workbench};

/// What the open-path command ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// Cursor was not on a reference
    NoMatch,
    /// Exactly one resource matched and was opened
    Opened(PathBuf),
    /// Zero or several candidates; the overlay was shown with `text`
    Overlay { text: String, candidates: usize },
}

/// The reference with `:`, `.` and `-` removed
pub fn stripped_name(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, ':' | '.' | '-'))
        .collect()
}

/// File-name glob used for resource lookup
pub fn lookup_glob(text: &str) -> String {
    format!("*{}", stripped_name(text))
}

pub fn open_path<R, W>(text: &str, resolver: &R, workbench: &W) -> OpenOutcome
where
    R: ResourceResolver + ?Sized,
    W: Workbench + ?Sized,
{
    let pattern = lookup_glob(text);
    tracing::debug!("Opening path reference {:?} with pattern {:?}", text, pattern);

    let mut resources = resolver.find_resources(&pattern);

    if resources.len() == 1 {
        let path = resources.remove(0);
        tracing::info!("Opening {}", path.display());
        workbench.open_file(&path);
        return OpenOutcome::Opened(path);
    }

    tracing::debug!(
        "{} candidate(s) for {:?}, showing goto overlay",
        resources.len(),
        pattern
    );
    workbench.show_goto_overlay(text);
    OpenOutcome::Overlay {
        text: text.to_string(),
        candidates: resources.len(),
    }
}
