//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;

/// Cross-tree node linking: declare relations between nodes of named trees and query what they share
#[derive(Parser, Debug)]
#[command(name = "treelink")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Link manifest (overrides settings)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show nodes linked to all given nodes
    Query {
        /// Nodes as <tree>:<path>, e.g. form:address.street
        #[arg(required = true)]
        nodes: Vec<String>,

        /// Output format (overrides settings)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Show the direct links of one node
    Links {
        /// Node as <tree>:<path>
        node: String,

        /// Output format (overrides settings)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// List declared trees
    Trees,

    /// Validate the manifest and print link statistics
    Check,

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

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print effective settings
    Show,
    /// Print config file locations
    Path,
}
