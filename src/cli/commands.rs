//! Command execution

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::{NavArtifact, Site};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{config_path, SiteConfig};
use crate::domain::{DomainError, Sidebar, SidebarItem};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Dispatch the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let container = ServiceContainer::new();
    let site_dir = cli.site_dir();

    match &cli.command {
        Commands::Check => cmd_check(&container, &site_dir),
        Commands::Tree { sidebar } => cmd_tree(&container, &site_dir, sidebar.as_deref()),
        Commands::Flatten { sidebar } => cmd_flatten(&container, &site_dir, sidebar.as_deref()),
        Commands::Export { output } => cmd_export(&container, &site_dir, output.as_deref()),
        Commands::Orphans => cmd_orphans(&container, &site_dir),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cmd_config_show(&site_dir),
            ConfigCommands::Init { force } => cmd_config_init(&container, &site_dir, *force),
            ConfigCommands::Path => cmd_config_path(&site_dir),
        },
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Build the site and report warnings on stderr.
fn build_site(container: &ServiceContainer, site_dir: &Path) -> CliResult<Site> {
    let report = container.site.build(site_dir)?;
    for warning in &report.warnings {
        output::warning(warning);
    }
    Ok(report.site)
}

fn select_sidebar<'a>(site: &'a Site, id: Option<&str>) -> CliResult<&'a Sidebar> {
    match id {
        Some(id) => site.sidebars.get(id).ok_or_else(|| {
            CliError::from(ApplicationError::from(DomainError::UnknownSidebar(
                id.to_string(),
            )))
        }),
        None => Ok(site.sidebars.active()),
    }
}

#[instrument(skip(container))]
fn cmd_check(container: &ServiceContainer, site_dir: &Path) -> CliResult<()> {
    let site = build_site(container, site_dir)?;

    output::success(&format!(
        "{}: {} documents, {} sidebars",
        site.config.title,
        site.documents.len(),
        site.sidebars.len()
    ));
    for sidebar in site.sidebars.iter() {
        let stats = sidebar.stats();
        let marker = if sidebar.id == site.sidebars.active().id {
            " (default)"
        } else {
            ""
        };
        output::detail(&format!(
            "{}{}: {} docs, {} categories, {} links, depth {}",
            sidebar.id, marker, stats.docs, stats.categories, stats.links, stats.depth
        ));
    }

    let orphans = site.orphans();
    if !orphans.is_empty() {
        output::detail(&format!(
            "{} documents are not in any sidebar (see `sitenav orphans`)",
            orphans.len()
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, site_dir: &Path, sidebar: Option<&str>) -> CliResult<()> {
    let site = build_site(container, site_dir)?;
    let sidebar = select_sidebar(&site, sidebar)?;

    let mut tree = Tree::new(sidebar.id.clone());
    for item in &sidebar.items {
        tree.push(tree_node(&site, item));
    }
    output::info(&tree);
    Ok(())
}

fn tree_node(site: &Site, item: &SidebarItem) -> Tree<String> {
    match item {
        SidebarItem::Doc(doc) => {
            let label = doc
                .label
                .as_deref()
                .or_else(|| site.documents.get(doc.id.as_str()).map(|d| d.label()))
                .unwrap_or(doc.id.as_str());
            Tree::new(format!("{label} [{}]", doc.id))
        }
        SidebarItem::Category(category) => {
            let suffix = if category.collapsed { " (collapsed)" } else { "" };
            let mut node = Tree::new(format!("{}{suffix}", item.display_label()));
            for child in &category.items {
                node.push(tree_node(site, child));
            }
            node
        }
        SidebarItem::Link(link) => Tree::new(format!("{} -> {}", item.display_label(), link.href)),
    }
}

#[instrument(skip(container))]
fn cmd_flatten(
    container: &ServiceContainer,
    site_dir: &Path,
    sidebar: Option<&str>,
) -> CliResult<()> {
    let site = build_site(container, site_dir)?;
    let sidebar = select_sidebar(&site, sidebar)?;
    for id in sidebar.doc_ids() {
        output::info(id);
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_export(
    container: &ServiceContainer,
    site_dir: &Path,
    output_path: Option<&Path>,
) -> CliResult<()> {
    let site = build_site(container, site_dir)?;
    let json = NavArtifact::new(&site).to_json()?;

    match output_path {
        Some(path) => {
            container
                .fs
                .ensure_parent(path)
                .and_then(|_| container.fs.write(path, &json))
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Wrote", &path.display());
        }
        None => output::info(&json),
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_orphans(container: &ServiceContainer, site_dir: &Path) -> CliResult<()> {
    let site = build_site(container, site_dir)?;
    let orphans = site.orphans();
    debug!("{} orphans", orphans.len());
    for id in orphans {
        output::info(id);
    }
    Ok(())
}

fn cmd_config_show(site_dir: &Path) -> CliResult<()> {
    let config = SiteConfig::load(site_dir)?;
    output::header(&format!("# {}", config_path(site_dir).display()));
    output::info(&config.to_toml()?);
    Ok(())
}

fn cmd_config_init(container: &ServiceContainer, site_dir: &Path, force: bool) -> CliResult<()> {
    let path = config_path(site_dir);
    if container.fs.exists(&path) && !force {
        return Err(CliError::Usage(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    container
        .fs
        .ensure_parent(&path)
        .and_then(|_| container.fs.write(&path, &SiteConfig::template()))
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::action("Created", &path.display());
    Ok(())
}

fn cmd_config_path(site_dir: &Path) -> CliResult<()> {
    let path = config_path(site_dir);
    let state = if path.exists() { "" } else { " (not found)" };
    output::info(&format!("{}{state}", path.display()));
    Ok(())
}
