use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SUPPRESSION_MARKER;

/// A single cell of a dataset.
///
/// Suppression is a sentinel of its own, so an ordinary value spelled `*`
/// never counts as suppressed. The marker string only exists at the file
/// boundary (see `Cell::parse` / `Cell::render`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Cell {
    Value(String),
    Suppressed,
}

impl Cell {
    pub fn value(value: impl Into<String>) -> Self {
        Cell::Value(value.into())
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, Cell::Suppressed)
    }

    /// The underlying value, `None` if suppressed
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Value(v) => Some(v),
            Cell::Suppressed => None,
        }
    }

    /// Parse raw text. With `marker = None` every string is data.
    pub fn parse(raw: &str, marker: Option<&str>) -> Self {
        match marker {
            Some(m) if raw == m => Cell::Suppressed,
            _ => Cell::Value(raw.to_string()),
        }
    }

    pub fn render<'a>(&'a self, marker: &'a str) -> &'a str {
        match self {
            Cell::Value(v) => v,
            Cell::Suppressed => marker,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Value(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Value(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render(DEFAULT_SUPPRESSION_MARKER))
    }
}
