//! Filesystem resource lookup
//!
//! Walks a workspace root (honouring `.gitignore` and friends) and returns the
//! files whose name matches a glob such as `*routeusersshow`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::GlobBuilder;
use ignore::WalkBuilder;

use crate::host::ResourceResolver;

#[derive(Debug, Clone)]
pub struct WorkspaceResources {
    root: PathBuf,
}

impl WorkspaceResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files under the root whose file name matches `pattern`, sorted
    pub fn try_find(&self, pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("Invalid resource pattern {:?}", pattern))?
            .compile_matcher();

        let mut found = Vec::new();
        for entry in WalkBuilder::new(&self.root).build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            if entry
                .path()
                .file_name()
                .is_some_and(|name| matcher.is_match(name))
            {
                found.push(entry.into_path());
            }
        }

        found.sort();
        Ok(found)
    }
}

impl ResourceResolver for WorkspaceResources {
    fn find_resources(&self, pattern: &str) -> Vec<PathBuf> {
        match self.try_find(pattern) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Resource lookup failed: {:#}", e);
                Vec::new()
            }
        }
    }
}
