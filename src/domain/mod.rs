//! Domain layer: navigation model and tree construction
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod declaration;
pub mod document;
pub mod entities;
pub mod error;

pub use builder::NavTreeBuilder;
pub use declaration::{parse_sidebars, ItemDecl, SidebarDecl};
pub use document::{Document, DocumentIndex};
pub use entities::*;
pub use error::{BrokenLink, DanglingReference, DomainError, DomainResult, SchemaIssue};

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
///
/// Uses shellexpand crate for robust expansion.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
