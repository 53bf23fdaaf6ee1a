//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Parse, query and re-format Valve KeyValues files; launch configured tools
#[derive(Parser, Debug)]
#[command(name = "kvtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: $XDG_CONFIG_HOME/kvtree/kvtree.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a document as a tree
    Tree {
        /// KeyValues file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Re-serialize a document in canonical form
    Fmt {
        /// KeyValues file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Rewrite the file in place instead of printing
        #[arg(short, long)]
        write: bool,
    },

    /// Print a branch or the values of one key
    Get {
        /// KeyValues file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Branch names from the root, each must be unique at its level
        path: Vec<String>,
        /// Print values of this key instead of the branch
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Manage and launch configured toolsets
    Tools {
        #[command(subcommand)]
        command: ToolsCommands,
    },

    /// Manage settings
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
pub enum ToolsCommands {
    /// List toolsets installed for this platform
    List {
        /// Also show toolsets that were not found
        #[arg(short, long)]
        all: bool,
    },

    /// Start a toolset by name
    Launch {
        /// Toolset name as listed
        name: String,
        /// Wait for the tool to exit
        #[arg(short, long)]
        wait: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file location
    Path,
    /// Print a config template
    Template,
}
