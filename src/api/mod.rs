//! API Module
//!
//! Command handlers behind the CLI. Each handler loads its datasets through
//! `BenchConfig`, runs one experiment from `logic`, and returns a
//! serializable report; printing is left to the caller.

pub mod commands;

pub use commands::*;
