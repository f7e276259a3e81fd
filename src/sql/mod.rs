//! The data track: ephemeral SQL sandbox, dialect shims, and the row-set
//! comparator.

pub mod compare;
pub mod compat;
pub mod sandbox;

pub use compare::rowsets_equal;
pub use sandbox::{run_query, QueryRun, RowSet};
