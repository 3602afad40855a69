//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Navigation trees for static documentation sites: validate, inspect and export sidebars
#[derive(Parser, Debug)]
#[command(name = "sitenav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Site directory containing site.toml (default: cwd)
    #[arg(short = 'C', long, global = true, env = "SITENAV_SITE_DIR", value_hint = ValueHint::DirPath)]
    pub site_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn site_dir(&self) -> PathBuf {
        self.site_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration, sidebars and links
    Check,

    /// Show a sidebar as a tree
    Tree {
        /// Sidebar id (default: the active sidebar)
        #[arg(short, long)]
        sidebar: Option<String>,
    },

    /// List document ids of a sidebar in navigation order
    Flatten {
        /// Sidebar id (default: the active sidebar)
        #[arg(short, long)]
        sidebar: Option<String>,
    },

    /// Write the navigation artifact as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// List documents no sidebar references
    Orphans,

    /// Manage site configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective config (defaults, site.toml, env)
    Show,

    /// Create config template
    Init {
        /// Overwrite an existing site.toml
        #[arg(short, long)]
        force: bool,
    },

    /// Show config path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn given_cli_definition_when_asserting_then_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_global_flags_after_subcommand_when_parsing_then_accepted() {
        let cli = Cli::try_parse_from(["sitenav", "tree", "-s", "api", "-dd", "-C", "site"]).unwrap();

        assert_eq!(cli.debug, 2);
        assert_eq!(cli.site_dir(), PathBuf::from("site"));
        assert!(matches!(cli.command, Commands::Tree { sidebar: Some(ref s) } if s == "api"));
    }

    #[test]
    fn given_missing_subcommand_when_parsing_then_fails() {
        assert!(Cli::try_parse_from(["sitenav"]).is_err());
    }
}
