//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{column_span, place, populate};
use crate::cli::args::{Cli, Commands, TreeOps};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{OrderedTree, TreeNodeConvert};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show { ops, max_depth }) => show(ops, *max_depth),
        Some(Commands::Layout { ops }) => layout(cli, ops),
        Some(Commands::Check { ops }) => check(ops),
        Some(Commands::Random {
            count,
            min,
            max,
            seed,
            show,
        }) => random(cli, *count, *min, *max, *seed, *show),
        Some(Commands::Config) => show_config(cli),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "bstree", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Inserts then removes in the given order.
#[instrument(level = "debug")]
pub fn build_tree(ops: &TreeOps) -> CliResult<OrderedTree> {
    let mut tree = OrderedTree::new();
    for &value in &ops.insert {
        if !tree.insert(value)? {
            debug!(value, "skipping duplicate");
        }
    }
    for &value in &ops.remove {
        tree.remove(value)?;
    }
    Ok(tree)
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    Ok(Settings::load(cli.config.as_deref())?)
}

#[instrument(level = "debug")]
fn show(ops: &TreeOps, max_depth: usize) -> CliResult<()> {
    let tree = build_tree(ops)?;
    output::info(&tree.to_tree_string_with_depth(max_depth));
    Ok(())
}

#[instrument(level = "debug", skip(cli))]
fn layout(cli: &Cli, ops: &TreeOps) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let tree = build_tree(ops)?;

    output::header(&format!(
        "{} nodes, {} columns, {} levels",
        tree.len(),
        column_span(&tree),
        tree.depth()
    ));
    for p in place(&tree, &settings.layout) {
        output::info(&format!(
            "{:>8}  col={:<4} depth={:<4} x={:<8} y={}",
            p.value, p.column, p.depth, p.x, p.y
        ));
    }
    Ok(())
}

#[instrument(level = "debug")]
fn check(ops: &TreeOps) -> CliResult<()> {
    let tree = build_tree(ops)?;
    tree.validate()?;
    output::success(&format!(
        "{} nodes consistent: [{}]",
        tree.len(),
        tree.values().iter().join(", ")
    ));
    Ok(())
}

#[instrument(level = "debug", skip(cli))]
fn random(
    cli: &Cli,
    count: Option<usize>,
    min: Option<i64>,
    max: Option<i64>,
    seed: Option<u64>,
    show: bool,
) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let mut options = settings.populate;
    options.count = count.unwrap_or(options.count);
    options.min = min.unwrap_or(options.min);
    options.max = max.unwrap_or(options.max);
    options.seed = seed.or(options.seed);

    let mut tree = OrderedTree::new();
    let report = populate(&mut tree, &options)?;

    output::action("inserted", &report.inserted);
    output::action("duplicates", &report.duplicates);
    output::action("depth", &tree.depth());
    if let Some(root) = tree.root() {
        output::action("root", &root);
    }
    if show {
        output::info(&tree.to_tree_string());
    }
    Ok(())
}

fn show_config(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    output::info(&settings.to_toml()?);
    Ok(())
}
