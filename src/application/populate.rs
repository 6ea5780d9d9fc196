//! Random seeding of a tree

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::PopulateConfig;
use crate::domain::OrderedTree;

/// Outcome of a populate run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PopulateReport {
    pub inserted: usize,
    /// Draws that hit a value already in the tree
    pub duplicates: usize,
}

/// Draws `options.count` values from `options.min..options.max` and inserts them.
#[instrument(level = "debug", skip(tree))]
pub fn populate(tree: &mut OrderedTree, options: &PopulateConfig) -> ApplicationResult<PopulateReport> {
    if options.min >= options.max {
        return Err(ApplicationError::InvalidRange {
            min: options.min,
            max: options.max,
        });
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut report = PopulateReport::default();
    for _ in 0..options.count {
        let value = rng.gen_range(options.min..options.max);
        if tree.insert(value)? {
            report.inserted += 1;
        } else {
            report.duplicates += 1;
        }
    }

    info!(
        inserted = report.inserted,
        duplicates = report.duplicates,
        "populated tree"
    );
    Ok(report)
}
