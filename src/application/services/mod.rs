//! Application services

pub mod documents;
pub mod export;
pub mod sidebars;
pub mod site;

pub use documents::DocumentScanner;
pub use export::{NavArtifact, NavEntry, SidebarArtifact, SiteMeta};
pub use sidebars::SidebarLoader;
pub use site::{BuildReport, BuildWarning, Site, SiteService};
