//! Query Module - Conjunctive count queries
//!
//! - `types.rs` - Predicates and queries
//! - `generator.rs` - Random point and range queries over a reference dataset

pub mod types;
pub mod generator;

#[cfg(test)]
mod tests;

pub use types::{Predicate, Query};
pub use generator::{PointMode, QueryGenerator};
