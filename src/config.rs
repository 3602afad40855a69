//! Site configuration with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Site config: `<site_dir>/site.toml`
//! 3. Environment variables: `SITENAV_*` prefix (`__` separates nested keys)

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, DomainError, SchemaIssue};

/// File name of the site configuration inside the site directory.
pub const CONFIG_FILE_NAME: &str = "site.toml";

/// What to do with a declared internal link that resolves to no document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokenLinkPolicy {
    #[default]
    Throw,
    Warn,
    Ignore,
}

impl FromStr for BrokenLinkPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "throw" => Ok(Self::Throw),
            "warn" => Ok(Self::Warn),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!(
                "invalid broken link policy '{other}' (expected throw, warn or ignore)"
            )),
        }
    }
}

impl fmt::Display for BrokenLinkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Throw => "throw",
            Self::Warn => "warn",
            Self::Ignore => "ignore",
        })
    }
}

/// Light or dark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!(
                "invalid color mode '{other}' (expected light or dark)"
            )),
        }
    }
}

/// Internationalization settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct I18nConfig {
    pub default_locale: String,
    pub locales: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".into(),
            locales: vec!["en".into()],
        }
    }
}

/// Where the docs live and how they are routed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DocsConfig {
    /// Docs directory, relative to the site directory
    pub path: PathBuf,
    /// Sidebar declaration file (`.json` or `.toml`), relative to the site directory
    pub sidebar_path: PathBuf,
    /// URL segment under which docs are served
    pub route_base_path: String,
    /// Base URL for "edit this page" links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
    /// Sidebar rendered by default when several are declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_sidebar: Option<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("docs"),
            sidebar_path: PathBuf::from("sidebars.json"),
            route_base_path: "docs".into(),
            edit_url: None,
            default_sidebar: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColorModeConfig {
    pub default_mode: ColorMode,
    pub disable_switch: bool,
    pub respect_prefers_color_scheme: bool,
}

impl Default for ColorModeConfig {
    fn default() -> Self {
        Self {
            default_mode: ColorMode::Light,
            disable_switch: false,
            respect_prefers_color_scheme: false,
        }
    }
}

/// Code highlighting themes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PrismConfig {
    pub theme: String,
    pub dark_theme: String,
    pub additional_languages: Vec<String>,
}

impl Default for PrismConfig {
    fn default() -> Self {
        Self {
            theme: "github".into(),
            dark_theme: "dracula".into(),
            additional_languages: vec![],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Logo {
    pub alt: String,
    pub src: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavbarItemKind {
    /// Entry opening a sidebar
    DocSidebar,
    #[default]
    Link,
}

/// Navbar entry: either a sidebar opener or a plain link.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NavbarItem {
    #[serde(rename = "type")]
    pub kind: NavbarItemKind,
    pub label: String,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NavbarConfig {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<Logo>,
    pub items: Vec<NavbarItem>,
}

/// Footer link: exactly one of `to` (internal route) or `href` (external URL).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FooterLink {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FooterColumn {
    pub title: String,
    pub items: Vec<FooterLink>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FooterConfig {
    pub style: ColorMode,
    pub links: Vec<FooterColumn>,
    /// `{year}` is replaced with the build year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl FooterConfig {
    pub fn rendered_copyright(&self, year: i32) -> Option<String> {
        self.copyright
            .as_ref()
            .map(|c| c.replace("{year}", &year.to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub color_mode: ColorModeConfig,
    pub prism: PrismConfig,
    pub navbar: NavbarConfig,
    pub footer: FooterConfig,
}

/// Complete site configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: String,
    pub favicon: String,
    /// Production URL, e.g. `https://docs.example.com`
    pub url: String,
    /// Path under which the site is served; starts and ends with `/`
    pub base_url: String,
    pub organization_name: String,
    pub project_name: String,
    pub on_broken_links: BrokenLinkPolicy,
    pub on_broken_markdown_links: BrokenLinkPolicy,
    pub i18n: I18nConfig,
    pub docs: DocsConfig,
    pub theme: ThemeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            tagline: String::new(),
            favicon: "img/favicon.ico".into(),
            url: String::new(),
            base_url: "/".into(),
            organization_name: String::new(),
            project_name: String::new(),
            on_broken_links: BrokenLinkPolicy::Throw,
            on_broken_markdown_links: BrokenLinkPolicy::Warn,
            i18n: I18nConfig::default(),
            docs: DocsConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

/// Get the path to the config file of a site directory.
pub fn config_path(site_dir: &Path) -> PathBuf {
    site_dir.join(CONFIG_FILE_NAME)
}

impl SiteConfig {
    /// Load configuration with layered precedence.
    ///
    /// A missing `site.toml` is not an error here; validation reports the
    /// required fields that are still unset.
    pub fn load(site_dir: &Path) -> Result<Self, ApplicationError> {
        Self::load_with_env(site_dir, Self::environment())
    }

    /// Like [`SiteConfig::load`] with an explicit environment source.
    pub fn load_with_env(site_dir: &Path, env: Environment) -> Result<Self, ApplicationError> {
        let path = config_path(site_dir);
        let mut current = if path.exists() {
            debug!("load: reading {}", path.display());
            Self::from_file(&path)?
        } else {
            debug!("load: no config at {}, using defaults", path.display());
            Self::default()
        };

        current = current.apply_env_overrides(env)?;
        current.expand_paths();
        Ok(current)
    }

    /// Parse a TOML config file; unset fields take compiled defaults.
    pub fn from_file(path: &Path) -> Result<Self, ApplicationError> {
        let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
            message: format!("read {}: {}", path.display(), e),
        })?;
        toml::from_str(&content).map_err(|e| ApplicationError::Config {
            message: format!("parse {}: {}", path.display(), e),
        })
    }

    /// `SITENAV_*` environment source, e.g. `SITENAV_TITLE`,
    /// `SITENAV_DOCS__PATH`, `SITENAV_I18N__LOCALES=en,de`.
    pub fn environment() -> Environment {
        Environment::with_prefix("SITENAV")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("i18n.locales")
    }

    /// Apply environment variables as explicit overrides (replace, not merge).
    fn apply_env_overrides(mut self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        let string = |key: &str| config.get_string(key).ok();

        if let Some(val) = string("title") {
            self.title = val;
        }
        if let Some(val) = string("tagline") {
            self.tagline = val;
        }
        if let Some(val) = string("url") {
            self.url = val;
        }
        if let Some(val) = string("base_url") {
            self.base_url = val;
        }
        if let Some(val) = string("organization_name") {
            self.organization_name = val;
        }
        if let Some(val) = string("project_name") {
            self.project_name = val;
        }
        if let Some(val) = string("on_broken_links") {
            self.on_broken_links = val.parse().map_err(env_err)?;
        }
        if let Some(val) = string("on_broken_markdown_links") {
            self.on_broken_markdown_links = val.parse().map_err(env_err)?;
        }
        if let Some(val) = string("i18n.default_locale") {
            self.i18n.default_locale = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("i18n.locales") {
            self.i18n.locales = val;
        }
        if let Some(val) = string("docs.path") {
            self.docs.path = PathBuf::from(val);
        }
        if let Some(val) = string("docs.sidebar_path") {
            self.docs.sidebar_path = PathBuf::from(val);
        }
        if let Some(val) = string("docs.route_base_path") {
            self.docs.route_base_path = val;
        }
        if let Some(val) = string("docs.edit_url") {
            self.docs.edit_url = Some(val);
        }
        if let Some(val) = string("docs.default_sidebar") {
            self.docs.default_sidebar = Some(val);
        }
        if let Some(val) = string("theme.color_mode.default_mode") {
            self.theme.color_mode.default_mode = val.parse().map_err(env_err)?;
        }

        Ok(self)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.docs.path = PathBuf::from(expand_env_vars(&self.docs.path.to_string_lossy()));
        self.docs.sidebar_path =
            PathBuf::from(expand_env_vars(&self.docs.sidebar_path.to_string_lossy()));
    }

    /// Check every field; all violations are reported together.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut issues = Vec::new();

        if self.title.trim().is_empty() {
            issues.push(SchemaIssue::new("title", "is required"));
        }

        if self.url.trim().is_empty() {
            issues.push(SchemaIssue::new("url", "is required"));
        } else {
            match Url::parse(&self.url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {
                    if url.path() != "/" {
                        issues.push(SchemaIssue::new(
                            "url",
                            "must not contain a path; put it in base_url",
                        ));
                    }
                }
                Ok(url) => issues.push(SchemaIssue::new(
                    "url",
                    format!("unsupported scheme '{}'", url.scheme()),
                )),
                Err(e) => issues.push(SchemaIssue::new("url", format!("invalid URL: {e}"))),
            }
        }

        if !self.base_url.starts_with('/') || !self.base_url.ends_with('/') {
            issues.push(SchemaIssue::new(
                "base_url",
                format!("'{}' must start and end with '/'", self.base_url),
            ));
        }

        self.validate_i18n(&mut issues);
        self.validate_docs(&mut issues);
        self.validate_navbar(&mut issues);
        self.validate_footer(&mut issues);

        if issues.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Schema(issues))
        }
    }

    fn validate_i18n(&self, issues: &mut Vec<SchemaIssue>) {
        let i18n = &self.i18n;
        if i18n.locales.is_empty() {
            issues.push(SchemaIssue::new("i18n.locales", "must list at least one locale"));
        }
        if !i18n.locales.contains(&i18n.default_locale) {
            issues.push(SchemaIssue::new(
                "i18n.default_locale",
                format!("'{}' is not listed in i18n.locales", i18n.default_locale),
            ));
        }
        match locale_regex() {
            Ok(tag) => {
                for (i, locale) in i18n.locales.iter().enumerate() {
                    if !tag.is_match(locale) {
                        issues.push(SchemaIssue::new(
                            format!("i18n.locales[{i}]"),
                            format!("'{locale}' is not a valid locale tag"),
                        ));
                    }
                }
            }
            Err(e) => issues.push(SchemaIssue::new("i18n.locales", e.to_string())),
        }
        for dup in i18n.locales.iter().duplicates() {
            issues.push(SchemaIssue::new(
                "i18n.locales",
                format!("'{dup}' is listed more than once"),
            ));
        }
    }

    fn validate_docs(&self, issues: &mut Vec<SchemaIssue>) {
        let route = self.docs.route_base_path.trim_matches('/');
        if route.split('/').any(|segment| segment == "..") {
            issues.push(SchemaIssue::new(
                "docs.route_base_path",
                "must not contain '..'",
            ));
        }
        if let Some(edit_url) = &self.docs.edit_url {
            check_absolute_url("docs.edit_url", edit_url, issues);
        }
        if let Some(id) = &self.docs.default_sidebar {
            if id.trim().is_empty() {
                issues.push(SchemaIssue::new("docs.default_sidebar", "must not be empty"));
            }
        }
    }

    fn validate_navbar(&self, issues: &mut Vec<SchemaIssue>) {
        for (i, item) in self.theme.navbar.items.iter().enumerate() {
            let path = format!("theme.navbar.items[{i}]");
            match item.kind {
                NavbarItemKind::DocSidebar => {
                    if item.sidebar_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
                        issues.push(SchemaIssue::new(
                            path,
                            "doc_sidebar item requires 'sidebar_id'",
                        ));
                    }
                }
                NavbarItemKind::Link => {
                    check_link_target(&path, item.to.as_deref(), item.href.as_deref(), issues);
                }
            }
        }
    }

    fn validate_footer(&self, issues: &mut Vec<SchemaIssue>) {
        for (c, column) in self.theme.footer.links.iter().enumerate() {
            for (i, link) in column.items.iter().enumerate() {
                let path = format!("theme.footer.links[{c}].items[{i}]");
                if link.label.trim().is_empty() {
                    issues.push(SchemaIssue::new(&path, "label is required"));
                }
                check_link_target(&path, link.to.as_deref(), link.href.as_deref(), issues);
            }
        }
    }

    /// Internal `to` links declared in navbar and footer, with their location.
    pub fn internal_links(&self) -> Vec<(String, &str)> {
        let navbar = self
            .theme
            .navbar
            .items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                item.to
                    .as_deref()
                    .map(|to| (format!("theme.navbar.items[{i}]"), to))
            });
        let footer = self
            .theme
            .footer
            .links
            .iter()
            .enumerate()
            .flat_map(|(c, column)| {
                column.items.iter().enumerate().filter_map(move |(i, link)| {
                    link.to
                        .as_deref()
                        .map(|to| (format!("theme.footer.links[{c}].items[{i}]"), to))
                })
            });
        navbar.chain(footer).collect()
    }

    /// Sidebar ids opened by navbar `doc_sidebar` items, with their location.
    pub fn navbar_sidebar_ids(&self) -> Vec<(String, &str)> {
        self.theme
            .navbar
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.kind == NavbarItemKind::DocSidebar)
            .filter_map(|(i, item)| {
                item.sidebar_id
                    .as_deref()
                    .map(|id| (format!("theme.navbar.items[{i}]"), id))
            })
            .collect()
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# sitenav site configuration
#
# Precedence (lowest to highest):
#   Compiled defaults
#   This file:  <site_dir>/site.toml
#   Env:        SITENAV_* environment variables (SITENAV_DOCS__PATH=..., SITENAV_I18N__LOCALES=en,de)

title = "My Project Docs"
tagline = "Documentation for My Project"
favicon = "img/favicon.ico"

# Production URL (no path) and the path the site is served under
url = "https://docs.example.com"
base_url = "/"

organization_name = "my-org"
project_name = "my-project"

# throw | warn | ignore
on_broken_links = "throw"
on_broken_markdown_links = "warn"

[i18n]
default_locale = "en"
locales = ["en"]

[docs]
path = "docs"
sidebar_path = "sidebars.json"
route_base_path = "docs"
# edit_url = "https://github.com/my-org/my-project/tree/main/"
# default_sidebar = "tutorialSidebar"

[theme.color_mode]
default_mode = "light"
disable_switch = false
respect_prefers_color_scheme = true

[theme.prism]
theme = "github"
dark_theme = "dracula"
additional_languages = ["bash", "json"]

[theme.navbar]
title = "My Project"

[[theme.navbar.items]]
type = "doc_sidebar"
sidebar_id = "tutorialSidebar"
label = "Documentation"
position = "left"

[[theme.navbar.items]]
type = "link"
label = "GitHub"
href = "https://github.com/my-org/my-project"
position = "right"

[theme.footer]
style = "dark"
copyright = "Copyright © {year} My Project."

[[theme.footer.links]]
title = "Documentation"

[[theme.footer.links.items]]
label = "Introduction"
to = "/docs/intro"
"#
        .to_string()
    }
}

fn check_link_target(
    path: &str,
    to: Option<&str>,
    href: Option<&str>,
    issues: &mut Vec<SchemaIssue>,
) {
    match (to, href) {
        (Some(_), Some(_)) => issues.push(SchemaIssue::new(
            path,
            "set either 'to' or 'href', not both",
        )),
        (None, None) => issues.push(SchemaIssue::new(path, "requires 'to' or 'href'")),
        (Some(to), None) if to.trim().is_empty() => {
            issues.push(SchemaIssue::new(format!("{path}.to"), "must not be empty"))
        }
        (Some(_), None) => {}
        (None, Some(href)) => check_absolute_url(&format!("{path}.href"), href, issues),
    }
}

fn check_absolute_url(path: &str, value: &str, issues: &mut Vec<SchemaIssue>) {
    if let Err(e) = Url::parse(value) {
        issues.push(SchemaIssue::new(
            path,
            format!("'{value}' is not an absolute URL: {e}"),
        ));
    }
}

fn locale_regex() -> Result<Regex, regex::Error> {
    Regex::new(r"^[a-zA-Z]{2,3}(-[a-zA-Z0-9]{2,8})*$")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

fn env_err(message: String) -> ApplicationError {
    ApplicationError::Config {
        message: format!("environment override: {message}"),
    }
}
