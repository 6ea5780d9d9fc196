//! Application layer: consumers of the tree contract
//!
//! This layer builds on the domain tree and stays free of terminal I/O.

pub mod error;
pub mod layout;
pub mod populate;

pub use error::{ApplicationError, ApplicationResult};
pub use layout::{column_span, place, Placement};
pub use populate::{populate, PopulateReport};
