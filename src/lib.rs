//! Ordered binary search tree over unique integer keys.
//!
//! Each node keeps a count of the nodes below it that hang off right-child
//! slots. The count is maintained on insert and remove, so a renderer can
//! space right siblings apart without walking subtrees.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{NodeRef, OrderedTree, TreeError, TreeResult};
