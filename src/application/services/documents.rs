//! Document discovery
//!
//! Scans the docs directory for markdown documents and indexes them by id.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Document, DocumentIndex};
use crate::infrastructure::traits::FileSystem;

/// Extensions treated as content documents.
pub const DOC_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Service building the document index.
pub struct DocumentScanner {
    fs: Arc<dyn FileSystem>,
}

impl DocumentScanner {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Index every `.md`/`.mdx` file below `docs_dir`.
    ///
    /// Files and directories whose name starts with `_` are partials and are
    /// skipped.
    #[instrument(level = "debug", skip(self))]
    pub fn scan(&self, docs_dir: &Path) -> ApplicationResult<DocumentIndex> {
        if !self.fs.is_dir(docs_dir) {
            return Err(ApplicationError::DocsDirNotFound(docs_dir.to_path_buf()));
        }

        let mut index = DocumentIndex::new();
        for path in self
            .fs
            .walk_files(docs_dir)
            .with_path_context("scan docs", docs_dir)?
        {
            let Ok(relative) = path.strip_prefix(docs_dir) else {
                continue;
            };
            if !is_document(relative) {
                trace!("skip {}", relative.display());
                continue;
            }

            let content = self
                .fs
                .read_to_string(&path)
                .with_path_context("read document", &path)?;
            let doc = Document::parse(&content, relative)?;
            trace!("indexed {} from {}", doc.id, relative.display());
            index.insert(doc)?;
        }

        debug!("scan: indexed {} documents", index.len());
        Ok(index)
    }
}

fn is_document(relative: &Path) -> bool {
    let has_doc_extension = relative
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOC_EXTENSIONS.contains(&ext));
    let is_partial = relative
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('_'));
    has_doc_extension && !is_partial
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_paths_when_filtering_documents_then_accepts_markdown_only() {
        assert!(is_document(Path::new("intro.md")));
        assert!(is_document(Path::new("guides/setup.mdx")));
        assert!(!is_document(Path::new("img/logo.svg")));
        assert!(!is_document(Path::new("_partials/snippet.md")));
        assert!(!is_document(Path::new("guides/_draft.md")));
    }
}
