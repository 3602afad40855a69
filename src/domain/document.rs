//! Content documents and the index of known document ids

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::domain::entities::DocId;
use crate::domain::error::{DomainError, DomainResult};

/// Metadata of one content document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocId,
    /// Path relative to the docs directory
    pub source: PathBuf,
    pub title: Option<String>,
    pub sidebar_label: Option<String>,
}

/// Front matter keys that affect navigation. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    id: Option<String>,
    title: Option<String>,
    sidebar_label: Option<String>,
}

impl Document {
    /// Parse a markdown document located at `source` (relative to the docs
    /// directory).
    ///
    /// The id is the relative path without extension, using `/` separators.
    /// A front matter `id` replaces the file-name part but keeps the directory.
    pub fn parse(content: &str, source: &Path) -> DomainResult<Self> {
        let front_matter = match split_front_matter(content) {
            Some(yaml) if !yaml.trim().is_empty() => serde_yaml_ng::from_str::<FrontMatter>(yaml)
                .map_err(|e| {
                    DomainError::schema(
                        source.display().to_string(),
                        format!("invalid front matter: {e}"),
                    )
                })?,
            _ => FrontMatter::default(),
        };

        let id = derive_id(source, front_matter.id.as_deref())?;

        Ok(Self {
            id,
            source: source.to_path_buf(),
            title: front_matter.title,
            sidebar_label: front_matter.sidebar_label,
        })
    }

    /// Label shown in navigation when the sidebar does not set one.
    pub fn label(&self) -> &str {
        self.sidebar_label
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

/// Return the YAML between a leading `---` line and the next `---` line.
fn split_front_matter(content: &str) -> Option<&str> {
    let rest = content.trim_start_matches('\u{feff}');
    let rest = rest
        .strip_prefix("---\n")
        .or_else(|| rest.strip_prefix("---\r\n"))?;
    if let Some(body) = rest.strip_prefix("---") {
        // empty front matter block
        return body
            .chars()
            .next()
            .map_or(true, |c| c == '\n' || c == '\r')
            .then_some("");
    }
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}

fn derive_id(source: &Path, override_id: Option<&str>) -> DomainResult<DocId> {
    let mut parts = Vec::new();
    for component in source.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => {
                return Err(DomainError::schema(
                    source.display().to_string(),
                    "document path must be relative to the docs directory",
                ))
            }
        }
    }

    let Some(file_name) = parts.pop() else {
        return Err(DomainError::schema(
            source.display().to_string(),
            "empty document path",
        ));
    };

    let name = match override_id.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        Some(_) => {
            return Err(DomainError::schema(
                source.display().to_string(),
                "front matter id must not be empty",
            ))
        }
        None => Path::new(&file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(file_name),
    };

    parts.push(name);
    Ok(DocId::new(parts.join("/")))
}

/// The set of known documents, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    docs: BTreeMap<DocId, Document>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of bare ids without metadata.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let docs = ids
            .into_iter()
            .map(|id| {
                let id = DocId::new(id);
                let doc = Document {
                    source: PathBuf::from(format!("{id}.md")),
                    id: id.clone(),
                    title: None,
                    sidebar_label: None,
                };
                (id, doc)
            })
            .collect();
        Self { docs }
    }

    /// Add a document; two files resolving to the same id is an error.
    pub fn insert(&mut self, doc: Document) -> DomainResult<()> {
        if let Some(existing) = self.docs.get(&doc.id) {
            return Err(DomainError::schema(
                doc.source.display().to_string(),
                format!(
                    "document id '{}' is already declared by {}",
                    doc.id,
                    existing.source.display()
                ),
            ));
        }
        self.docs.insert(doc.id.clone(), doc);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.docs.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.docs.get(id)
    }

    /// Documents in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.values()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
