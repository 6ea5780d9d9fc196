//! Domain layer: the ordered tree and its read-only node handles
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod display;
pub mod error;
pub mod iter;
pub mod node;
pub mod tree;

pub use display::TreeNodeConvert;
pub use error::{TreeError, TreeResult};
pub use node::NodeRef;
pub use tree::OrderedTree;
