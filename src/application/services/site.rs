//! Site build: configuration, documents and sidebars into one validated model

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::services::{DocumentScanner, SidebarLoader};
use crate::application::ApplicationResult;
use crate::config::{BrokenLinkPolicy, SiteConfig};
use crate::domain::{
    BrokenLink, DocId, Document, DocumentIndex, DomainError, NavTreeBuilder, SchemaIssue,
    SidebarSet,
};
use crate::infrastructure::traits::FileSystem;

/// A fully resolved site: every sidebar reference points at a known document.
#[derive(Debug, Clone)]
pub struct Site {
    pub root: PathBuf,
    pub config: SiteConfig,
    pub documents: DocumentIndex,
    pub sidebars: SidebarSet,
}

impl Site {
    /// Route a document is served under, e.g. `/docs/guides/best-practices`.
    pub fn doc_route(&self, id: &DocId) -> String {
        let mut route = self.config.base_url.clone();
        let base = self.config.docs.route_base_path.trim_matches('/');
        if !base.is_empty() {
            route.push_str(base);
            route.push('/');
        }
        route.push_str(id.as_str());
        route
    }

    /// "Edit this page" URL, when `docs.edit_url` is configured.
    pub fn edit_url(&self, doc: &Document) -> Option<String> {
        let edit_url = self.config.docs.edit_url.as_deref()?;
        let mut segments = url_segments(&self.config.docs.path);
        segments.extend(url_segments(&doc.source));
        Some(format!(
            "{}/{}",
            edit_url.trim_end_matches('/'),
            segments.join("/")
        ))
    }

    /// Documents no sidebar references, in id order.
    pub fn orphans(&self) -> Vec<&DocId> {
        self.documents
            .iter()
            .map(|doc| &doc.id)
            .filter(|id| !self.sidebars.references(id.as_str()))
            .collect()
    }

    /// Whether an internal `to` target resolves to a document route.
    ///
    /// Targets are site-relative; query and fragment are ignored and a leading
    /// `base_url` is accepted.
    pub fn resolves_link(&self, to: &str) -> bool {
        let target = to.split(['#', '?']).next().unwrap_or_default();
        let target = target.trim_matches('/');
        let base = self.config.base_url.trim_matches('/');
        let target = if base.is_empty() {
            target
        } else {
            target
                .strip_prefix(base)
                .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                .map_or(target, |rest| rest.trim_start_matches('/'))
        };

        let docs_base = self.config.docs.route_base_path.trim_matches('/');
        let doc_id = if docs_base.is_empty() {
            Some(target)
        } else {
            target
                .strip_prefix(docs_base)
                .and_then(|rest| rest.strip_prefix('/'))
        };
        doc_id.is_some_and(|id| self.documents.contains(id))
    }
}

fn url_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Non-fatal findings of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// Internal link without a target document, under the `warn` policy
    BrokenLink(BrokenLink),
    /// Document referenced more than once in the same sidebar
    DuplicateReference { sidebar: String, id: DocId },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::BrokenLink(link) => write!(f, "broken link {link}"),
            BuildWarning::DuplicateReference { sidebar, id } => {
                write!(f, "'{id}' is referenced more than once in sidebar '{sidebar}'")
            }
        }
    }
}

/// A built site and what was noticed along the way.
#[derive(Debug)]
pub struct BuildReport {
    pub site: Site,
    pub warnings: Vec<BuildWarning>,
}

/// Service assembling a [`Site`] from a site directory.
pub struct SiteService {
    documents: DocumentScanner,
    sidebars: SidebarLoader,
}

impl SiteService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            documents: DocumentScanner::new(Arc::clone(&fs)),
            sidebars: SidebarLoader::new(fs),
        }
    }

    /// Load, validate and resolve everything under `site_dir`.
    #[instrument(level = "debug", skip(self))]
    pub fn build(&self, site_dir: &Path) -> ApplicationResult<BuildReport> {
        let config = SiteConfig::load(site_dir)?;
        self.build_with_config(site_dir, config)
    }

    /// Like [`SiteService::build`] with an already loaded configuration.
    pub fn build_with_config(
        &self,
        site_dir: &Path,
        config: SiteConfig,
    ) -> ApplicationResult<BuildReport> {
        config.validate()?;

        let documents = self.documents.scan(&site_dir.join(&config.docs.path))?;
        let decls = self.sidebars.load(&site_dir.join(&config.docs.sidebar_path))?;

        let active = config.docs.default_sidebar.clone().or_else(|| {
            config
                .navbar_sidebar_ids()
                .first()
                .map(|(_, id)| id.to_string())
        });
        debug!("build: active sidebar {:?}", active);

        let sidebars = NavTreeBuilder::new(&documents).construct_all(&decls, active.as_deref())?;
        check_navbar_sidebars(&config, &sidebars)?;

        let site = Site {
            root: site_dir.to_path_buf(),
            config,
            documents,
            sidebars,
        };

        let mut warnings = check_links(&site)?;
        for sidebar in site.sidebars.iter() {
            for id in sidebar.duplicate_doc_ids() {
                warn!("'{}' is referenced more than once in '{}'", id, sidebar.id);
                warnings.push(BuildWarning::DuplicateReference {
                    sidebar: sidebar.id.clone(),
                    id: id.clone(),
                });
            }
        }

        info!(
            "built site '{}': {} documents, {} sidebars, {} warnings",
            site.config.title,
            site.documents.len(),
            site.sidebars.len(),
            warnings.len()
        );
        Ok(BuildReport { site, warnings })
    }
}

fn check_navbar_sidebars(config: &SiteConfig, sidebars: &SidebarSet) -> Result<(), DomainError> {
    let issues: Vec<SchemaIssue> = config
        .navbar_sidebar_ids()
        .into_iter()
        .filter(|(_, id)| sidebars.get(id).is_none())
        .map(|(path, id)| {
            SchemaIssue::new(
                format!("{path}.sidebar_id"),
                format!("sidebar '{id}' is not declared"),
            )
        })
        .collect();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Schema(issues))
    }
}

fn check_links(site: &Site) -> Result<Vec<BuildWarning>, DomainError> {
    let broken: Vec<BrokenLink> = site
        .config
        .internal_links()
        .into_iter()
        .filter(|(_, to)| !site.resolves_link(to))
        .map(|(location, to)| BrokenLink {
            location,
            target: to.to_string(),
        })
        .collect();
    if broken.is_empty() {
        return Ok(vec![]);
    }

    match site.config.on_broken_links {
        BrokenLinkPolicy::Throw => Err(DomainError::BrokenLinks(broken)),
        BrokenLinkPolicy::Warn => Ok(broken
            .into_iter()
            .map(|link| {
                warn!("broken link {}", link);
                BuildWarning::BrokenLink(link)
            })
            .collect()),
        BrokenLinkPolicy::Ignore => {
            debug!("ignoring {} broken links", broken.len());
            Ok(vec![])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemDecl, SidebarDecl};

    fn site(base_url: &str, route_base_path: &str) -> Site {
        let mut config = SiteConfig {
            title: "Docs".into(),
            url: "https://docs.example.com".into(),
            base_url: base_url.into(),
            ..SiteConfig::default()
        };
        config.docs.route_base_path = route_base_path.into();
        let documents = DocumentIndex::from_ids(["intro", "guides/a", "guides/b"]);
        let decls = vec![SidebarDecl::new(
            "docs",
            vec![ItemDecl::doc("intro"), ItemDecl::doc("guides/a")],
        )];
        let sidebars = NavTreeBuilder::new(&documents)
            .construct_all(&decls, None)
            .unwrap();
        Site {
            root: PathBuf::from("."),
            config,
            documents,
            sidebars,
        }
    }

    #[test]
    fn given_base_and_route_when_routing_doc_then_joins_segments() {
        assert_eq!(site("/", "docs").doc_route(&"guides/a".into()), "/docs/guides/a");
        assert_eq!(site("/sub/", "/docs/").doc_route(&"intro".into()), "/sub/docs/intro");
        assert_eq!(site("/", "").doc_route(&"intro".into()), "/intro");
    }

    #[test]
    fn given_internal_targets_when_resolving_then_matches_doc_routes() {
        let s = site("/sub/", "docs");
        assert!(s.resolves_link("/docs/intro"));
        assert!(s.resolves_link("/sub/docs/guides/a/"));
        assert!(s.resolves_link("docs/intro#setup"));
        assert!(!s.resolves_link("/docs/missing"));
        assert!(!s.resolves_link("/docs"));
        assert!(!s.resolves_link("/intro"));
    }

    #[test]
    fn given_unreferenced_document_when_listing_orphans_then_returns_it() {
        let s = site("/", "docs");
        let orphans: Vec<&str> = s.orphans().into_iter().map(DocId::as_str).collect();
        assert_eq!(orphans, vec!["guides/b"]);
    }

    #[test]
    fn given_edit_url_when_building_link_then_appends_docs_path_and_source() {
        let mut s = site("/", "docs");
        s.config.docs.edit_url = Some("https://github.com/org/repo/tree/main/".into());
        let doc = s.documents.get("guides/a").unwrap().clone();

        assert_eq!(
            s.edit_url(&doc).as_deref(),
            Some("https://github.com/org/repo/tree/main/docs/guides/a.md")
        );
    }

    #[test]
    fn given_navbar_pointing_to_unknown_sidebar_when_checking_then_fails() {
        let mut s = site("/", "docs");
        s.config.theme.navbar.items = vec![crate::config::NavbarItem {
            kind: crate::config::NavbarItemKind::DocSidebar,
            label: "Docs".into(),
            sidebar_id: Some("apiSidebar".into()),
            ..Default::default()
        }];

        let Err(DomainError::Schema(issues)) = check_navbar_sidebars(&s.config, &s.sidebars)
        else {
            panic!("expected schema error");
        };
        assert_eq!(issues[0].path, "theme.navbar.items[0].sidebar_id");
    }
}
