//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::outline::{
    ancestry, build_outline, find_record, leaf_names, load_outline, render_outline,
    render_subtree, rollup_amounts, update_amount,
};
use crate::application::OutlineTree;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see --help".to_string()));
    };

    match command {
        Commands::Completion { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "lcrs", &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => config(command, &load_settings(cli)?),
        Commands::Tree { file } => tree(file, &load_settings(cli)?),
        Commands::Leaves { file } => leaves(file),
        Commands::Rollup { file } => rollup(file, &load_settings(cli)?),
        Commands::Find {
            file,
            id,
            right_first,
        } => {
            let settings = load_settings(cli)?;
            find(file, id, *right_first || settings.right_first, &settings)
        }
        Commands::Update {
            file,
            id,
            amount,
            right_first,
        } => {
            let settings = load_settings(cli)?;
            update(file, id, *amount, *right_first || settings.right_first, &settings)
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let local_dir = cli
        .config_dir
        .clone()
        .or_else(|| std::env::current_dir().ok());
    Ok(Settings::load(local_dir.as_deref())?)
}

fn load_tree(file: &Path) -> CliResult<OutlineTree> {
    let records = load_outline(file)?;
    let tree = build_outline(records)?;
    debug!(nodes = tree.len(), depth = tree.depth(), "outline built");
    Ok(tree)
}

#[instrument(skip(settings))]
fn tree(file: &Path, settings: &Settings) -> CliResult<()> {
    let tree = load_tree(file)?;
    output::info(&render_outline(&tree, settings));
    Ok(())
}

#[instrument]
fn leaves(file: &Path) -> CliResult<()> {
    let tree = load_tree(file)?;
    for name in leaf_names(&tree) {
        output::info(&name);
    }
    Ok(())
}

#[instrument(skip(settings))]
fn rollup(file: &Path, settings: &Settings) -> CliResult<()> {
    let mut tree = load_tree(file)?;
    rollup_amounts(&mut tree)?;
    output::info(&render_outline(&tree, settings));
    Ok(())
}

#[instrument(skip(settings))]
fn find(file: &Path, id: &str, right_first: bool, settings: &Settings) -> CliResult<()> {
    let mut tree = load_tree(file)?;
    rollup_amounts(&mut tree)?;

    let idx = find_record(&tree, id, right_first)?;
    output::action("found", &ancestry(&tree, idx).iter().join(" > "));
    output::info(&render_subtree(&tree, idx, settings));
    Ok(())
}

#[instrument(skip(settings))]
fn update(
    file: &Path,
    id: &str,
    amount: f64,
    right_first: bool,
    settings: &Settings,
) -> CliResult<()> {
    let mut tree = load_tree(file)?;
    rollup_amounts(&mut tree)?;

    let idx = update_amount(&mut tree, id, amount, right_first)?;
    output::action("updated", &ancestry(&tree, idx).iter().join(" > "));
    output::info(&render_outline(&tree, settings));
    Ok(())
}

#[instrument(skip(settings))]
fn config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("Effective settings");
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                if !path.exists() {
                    output::warning(&format!("{} does not exist", path.display()));
                }
                output::detail(&path.display());
            }
            None => output::error("no home directory, global config disabled"),
        },
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
