//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::domain::display::MAX_RENDER_DEPTH;

/// Ordered binary search tree with right-descendant counts for sibling layout
#[derive(Parser, Debug)]
#[command(name = "bstree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level, repeat for more (-d INFO, -dd DEBUG, -ddd TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Extra config file, layered over the global one
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Values to build a tree from: inserts first, then removes, each in order.
#[derive(Args, Debug, Clone, Default)]
pub struct TreeOps {
    /// Values to insert (comma separated, negatives allowed)
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    pub insert: Vec<i64>,

    /// Values to remove after inserting
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    pub remove: Vec<i64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tree with right-descendant counts
    Show {
        #[command(flatten)]
        ops: TreeOps,
        /// Levels to print before eliding deeper subtrees
        #[arg(long, default_value_t = MAX_RENDER_DEPTH)]
        max_depth: usize,
    },

    /// Print grid cell and coordinates of every node
    Layout {
        #[command(flatten)]
        ops: TreeOps,
    },

    /// Verify ordering, links and counts
    Check {
        #[command(flatten)]
        ops: TreeOps,
    },

    /// Fill a tree with random values and print statistics
    Random {
        /// Number of values to draw
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Inclusive lower bound
        #[arg(long, allow_negative_numbers = true)]
        min: Option<i64>,
        /// Exclusive upper bound
        #[arg(long, allow_negative_numbers = true)]
        max: Option<i64>,
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Also print the tree
        #[arg(long)]
        show: bool,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
