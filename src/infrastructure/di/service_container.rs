//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{DocumentScanner, SidebarLoader, SiteService};
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub documents: DocumentScanner,
    pub sidebars: SidebarLoader,
    pub site: SiteService,
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new() -> Self {
        Self::with_deps(Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            documents: DocumentScanner::new(Arc::clone(&fs)),
            sidebars: SidebarLoader::new(Arc::clone(&fs)),
            site: SiteService::new(Arc::clone(&fs)),
            fs,
        }
    }
}
