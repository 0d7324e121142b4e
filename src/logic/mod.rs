//! Logic Module - Analytics over suppressed data
//!
//! Pure computation; only `dataset::loader` touches the filesystem.
//!
//! ## Layout
//! - `dataset/` - Cells, data handles, CSV import/export
//! - `query/` - Point and range queries and their random generation
//! - `engine/` - Anonymization engine seam and the reference suppressor

// Building blocks
pub mod dataset;
pub mod risk;
pub mod utility;
pub mod powerset;
pub mod query;
pub mod likelihood;
pub mod estimator;
pub mod stats;

// Experiments
pub mod engine;
pub mod evaluation;
pub mod frontier;
