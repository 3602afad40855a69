//! Sidebar declaration loading
//!
//! Reads `sidebars.json` or `sidebars.toml` into sidebar declarations.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{parse_sidebars, DomainError, SidebarDecl};
use crate::infrastructure::traits::FileSystem;

/// Declaration file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    Json,
    Toml,
}

impl DeclarationFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Service for reading sidebar declarations.
pub struct SidebarLoader {
    fs: Arc<dyn FileSystem>,
}

impl SidebarLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load every sidebar declared in `path`, in file order.
    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<SidebarDecl>> {
        debug!("load: path={}", path.display());
        let format = DeclarationFormat::from_path(path)
            .ok_or_else(|| ApplicationError::UnsupportedFormat(path.to_path_buf()))?;
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read sidebars", path)?;
        let sidebars = Self::parse(&content, format, &path.display().to_string())?;
        debug!("load: {} sidebars declared", sidebars.len());
        Ok(sidebars)
    }

    /// Parse declaration text. Syntax errors are reported against `origin`.
    pub fn parse(
        content: &str,
        format: DeclarationFormat,
        origin: &str,
    ) -> Result<Vec<SidebarDecl>, DomainError> {
        let value: Value = match format {
            DeclarationFormat::Json => serde_json::from_str(content)
                .map_err(|e| DomainError::schema(origin, format!("invalid JSON: {e}")))?,
            DeclarationFormat::Toml => toml::from_str(content)
                .map_err(|e| DomainError::schema(origin, format!("invalid TOML: {e}")))?,
        };
        parse_sidebars(&value)
    }
}
