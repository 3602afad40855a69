//! Navigation artifact handed to the rendering layer
//!
//! The artifact is a self-contained JSON document: site metadata plus every
//! sidebar with labels and routes already resolved.

use chrono::Datelike;
use serde::Serialize;

use crate::application::services::Site;
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::{ColorMode, FooterColumn, NavbarConfig};
use crate::domain::{Sidebar, SidebarItem};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SiteMeta {
    pub title: String,
    pub tagline: String,
    pub url: String,
    pub base_url: String,
    pub favicon: String,
    pub default_locale: String,
    pub locales: Vec<String>,
    pub color_mode: ColorMode,
    pub navbar: NavbarConfig,
    pub footer_links: Vec<FooterColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

/// One rendered navigation entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavEntry {
    Doc {
        id: String,
        label: String,
        href: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        edit_url: Option<String>,
    },
    Category {
        label: String,
        collapsed: bool,
        collapsible: bool,
        items: Vec<NavEntry>,
    },
    Link {
        label: String,
        href: String,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SidebarArtifact {
    pub id: String,
    pub items: Vec<NavEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NavArtifact {
    pub site: SiteMeta,
    pub default_sidebar: String,
    pub sidebars: Vec<SidebarArtifact>,
}

impl NavArtifact {
    /// Artifact stamped with the current year.
    pub fn new(site: &Site) -> Self {
        Self::for_year(site, chrono::Local::now().year())
    }

    pub fn for_year(site: &Site, year: i32) -> Self {
        let config = &site.config;
        let meta = SiteMeta {
            title: config.title.clone(),
            tagline: config.tagline.clone(),
            url: config.url.clone(),
            base_url: config.base_url.clone(),
            favicon: config.favicon.clone(),
            default_locale: config.i18n.default_locale.clone(),
            locales: config.i18n.locales.clone(),
            color_mode: config.theme.color_mode.default_mode,
            navbar: config.theme.navbar.clone(),
            footer_links: config.theme.footer.links.clone(),
            copyright: config.theme.footer.rendered_copyright(year),
        };

        Self {
            site: meta,
            default_sidebar: site.sidebars.active().id.clone(),
            sidebars: site
                .sidebars
                .iter()
                .map(|sidebar| sidebar_artifact(site, sidebar))
                .collect(),
        }
    }

    pub fn to_json(&self) -> ApplicationResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize navigation artifact".into(),
            source: Box::new(e),
        })
    }
}

fn sidebar_artifact(site: &Site, sidebar: &Sidebar) -> SidebarArtifact {
    SidebarArtifact {
        id: sidebar.id.clone(),
        items: entries(site, &sidebar.items),
    }
}

fn entries(site: &Site, items: &[SidebarItem]) -> Vec<NavEntry> {
    items
        .iter()
        .map(|item| match item {
            SidebarItem::Doc(doc) => {
                let document = site.documents.get(doc.id.as_str());
                let label = doc
                    .label
                    .clone()
                    .or_else(|| document.map(|d| d.label().to_string()))
                    .unwrap_or_else(|| doc.id.to_string());
                NavEntry::Doc {
                    id: doc.id.to_string(),
                    label,
                    href: site.doc_route(&doc.id),
                    edit_url: document.and_then(|d| site.edit_url(d)),
                }
            }
            SidebarItem::Category(category) => NavEntry::Category {
                label: category.label.clone(),
                collapsed: category.collapsed,
                collapsible: category.collapsible,
                items: entries(site, &category.items),
            },
            SidebarItem::Link(link) => NavEntry::Link {
                label: link.label.clone(),
                href: link.href.clone(),
            },
        })
        .collect()
}
