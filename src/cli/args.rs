//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Rebuild trees from depth-first outlines, roll them up and search them
#[derive(Parser, Debug)]
#[command(name = "lcrs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .lcrs.toml (default: cwd)
    #[arg(
        short = 'C',
        long,
        global = true,
        env = "LCRS_CONFIG_DIR",
        value_hint = ValueHint::DirPath
    )]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the outline as a tree with leaf counts
    Tree {
        /// Outline file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List leaf records
    Leaves {
        /// Outline file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Sum amounts bottom-up and show the tree
    Rollup {
        /// Outline file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Locate a record and show its path and subtree
    Find {
        /// Outline file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Record id
        id: String,
        /// Search right links before left links
        #[arg(long)]
        right_first: bool,
    },

    /// Change one leaf amount and recompute its ancestors
    Update {
        /// Outline file (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Leaf record id
        id: String,
        /// New amount
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Search right links before left links
        #[arg(long)]
        right_first: bool,
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
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show global config file location
    Path,
    /// Print a commented config template
    Template,
}
