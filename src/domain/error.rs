//! Domain-level errors (no external dependencies)

use std::fmt;

use itertools::Itertools;
use thiserror::Error;

/// A single schema violation, located by a dotted/indexed path
/// such as `tutorialSidebar[6].items[2]` or `i18n.default_locale`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub path: String,
    pub message: String,
}

impl SchemaIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A declared page reference that does not resolve to a known document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Sidebar the reference was declared in
    pub sidebar: String,
    /// Position of the reference inside the declaration
    pub path: String,
    /// The unresolved document id
    pub id: String,
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' (at {})", self.id, self.path)
    }
}

/// An internal navbar/footer link whose target route is not a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    /// Where the link was declared, e.g. `theme.footer.links[0].items[1]`
    pub location: String,
    /// The declared `to` target
    pub target: String,
}

impl fmt::Display for BrokenLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' (at {})", self.target, self.location)
    }
}

/// Domain errors represent violations of the navigation model.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("unresolved document references: {}", .0.iter().join(", "))]
    DanglingReferences(Vec<DanglingReference>),

    #[error("broken links: {}", .0.iter().join(", "))]
    BrokenLinks(Vec<BrokenLink>),

    #[error("invalid configuration: {}", .0.iter().join("; "))]
    Schema(Vec<SchemaIssue>),

    #[error("unknown sidebar: {0}")]
    UnknownSidebar(String),
}

impl DomainError {
    /// Shorthand for a schema error with a single issue.
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema(vec![SchemaIssue::new(path, message)])
    }

    /// True for errors caused by references that do not resolve.
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            DomainError::DanglingReferences(_) | DomainError::BrokenLinks(_)
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
