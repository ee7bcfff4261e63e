//! Workspace context collection.
//!
//! Collection is deliberately best-effort: a path that cannot be read is
//! skipped without surfacing an error, because files routinely disappear or
//! get renamed between enumeration and read. Snippets are produced fresh on
//! every call and never cached.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};

use crate::config::constants::workspace::{DEPENDENCY_DIR, SUPPORTED_EXTENSIONS};

/// A labeled block of file text included in a model prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnippet {
    /// File path, or a synthetic label such as the conversation history.
    pub source: String,
    pub body: String,
}

impl ContextSnippet {
    pub fn new(source: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            body: body.into(),
        }
    }

    /// Render for inclusion in a prompt context block.
    pub fn render(&self) -> String {
        format!("{}:\n{}\n---", self.source, self.body)
    }
}

/// Reads workspace files into [`ContextSnippet`]s.
#[derive(Debug, Clone)]
pub struct ContextCollector {
    root: PathBuf,
}

impl ContextCollector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate every workspace file on the extension allow-list, excluding
    /// the dependency directory. Sorted for deterministic candidate lists.
    pub fn candidate_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkBuilder::new(&self.root)
            .filter_entry(|entry| entry.file_name() != DEPENDENCY_DIR)
            .build()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .map(|entry| entry.into_path())
            .filter(|path| has_supported_extension(path))
            .collect();
        files.sort();
        files
    }

    /// Snippet for every enumerated workspace file, full text. Unbounded by
    /// file count or size; callers accept the scalability limit.
    pub fn collect_all(&self) -> Vec<ContextSnippet> {
        self.collect_for(&self.candidate_files())
    }

    /// Snippets for the given paths, preserving input order. Unreadable
    /// paths are dropped silently.
    pub fn collect_for<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<ContextSnippet> {
        paths
            .iter()
            .filter_map(|path| {
                let path = path.as_ref();
                match std::fs::read_to_string(path) {
                    Ok(body) => Some(ContextSnippet::new(path.display().to_string(), body)),
                    Err(e) => {
                        tracing::debug!("skipping unreadable context file {}: {e}", path.display());
                        None
                    }
                }
            })
            .collect()
    }
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|allowed| *allowed == ext)
        })
}
