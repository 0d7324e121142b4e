use std::collections::{HashMap, HashSet};

use crate::error::{BenchError, BenchResult};
use super::cell::Cell;

// ============================================================================
// FREQUENCY DISTRIBUTION
// ============================================================================

/// Empirical distribution of one column, in first-occurrence order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyDistribution {
    pub values: Vec<Cell>,
    pub frequency: Vec<f64>,
}

impl FrequencyDistribution {
    pub fn iter(&self) -> impl Iterator<Item = (&Cell, f64)> {
        self.values.iter().zip(self.frequency.iter().copied())
    }

    pub fn get(&self, value: &Cell) -> Option<f64> {
        self.iter().find(|(v, _)| *v == value).map(|(_, f)| f)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// DATA HANDLE
// ============================================================================

/// Read access to a materialized dataset.
///
/// `value` and `row` index like slices and panic when out of range.
pub trait DataHandle {
    fn num_rows(&self) -> usize;

    fn num_columns(&self) -> usize;

    fn attribute_name(&self, column: usize) -> Option<&str>;

    /// Column index of `name`, or `UnknownAttribute`
    fn column_index(&self, name: &str) -> BenchResult<usize>;

    fn row(&self, row: usize) -> &[Cell];

    fn value(&self, row: usize, column: usize) -> &Cell {
        &self.row(row)[column]
    }

    /// Distinct values of a column, in first-occurrence order
    fn distinct_values(&self, column: usize) -> &[Cell];

    fn frequency_distribution(&self, column: usize) -> FrequencyDistribution;

    fn rows(&self) -> Box<dyn Iterator<Item = &[Cell]> + '_> {
        Box::new((0..self.num_rows()).map(move |r| self.row(r)))
    }

    fn attribute_names(&self) -> Vec<&str> {
        (0..self.num_columns())
            .filter_map(|c| self.attribute_name(c))
            .collect()
    }
}

// ============================================================================
// IN-MEMORY DATASET
// ============================================================================

#[derive(Debug, Clone)]
struct ColumnIndex {
    distinct: Vec<Cell>,
    counts: HashMap<Cell, usize>,
}

impl ColumnIndex {
    fn build(rows: &[Vec<Cell>], column: usize) -> Self {
        let mut distinct = Vec::new();
        let mut counts: HashMap<Cell, usize> = HashMap::new();
        for row in rows {
            let cell = &row[column];
            match counts.get_mut(cell) {
                Some(count) => *count += 1,
                None => {
                    distinct.push(cell.clone());
                    counts.insert(cell.clone(), 1);
                }
            }
        }
        Self { distinct, counts }
    }
}

/// Immutable in-memory dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    lookup: HashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
    index: Vec<ColumnIndex>,
}

impl Dataset {
    /// Build a dataset; names must be unique and every row must have one
    /// cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> BenchResult<Self> {
        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(BenchError::invalid(format!("duplicate column name '{}'", name)));
            }
        }

        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(BenchError::invalid(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                columns.len()
            )));
        }

        let lookup = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        let index = (0..columns.len())
            .map(|c| ColumnIndex::build(&rows, c))
            .collect();

        Ok(Self { columns, lookup, rows, index })
    }

    /// Build from raw strings, turning `marker` into `Cell::Suppressed`
    pub fn from_raw<C: AsRef<str>, V: AsRef<str>>(
        columns: &[C],
        rows: &[Vec<V>],
        marker: Option<&str>,
    ) -> BenchResult<Self> {
        let columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|v| Cell::parse(v.as_ref(), marker)).collect())
            .collect();
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }

    /// Occurrences of `value` in `column`
    pub fn count(&self, column: usize, value: &Cell) -> usize {
        self.index
            .get(column)
            .and_then(|ix| ix.counts.get(value).copied())
            .unwrap_or(0)
    }

    /// True if both datasets have the same column names in the same order
    pub fn same_schema(&self, other: &impl DataHandle) -> bool {
        self.num_columns() == other.num_columns()
            && (0..self.num_columns()).all(|c| self.attribute_name(c) == other.attribute_name(c))
    }
}

impl DataHandle for Dataset {
    fn num_rows(&self) -> usize {
        self.rows.len()
    }

    fn num_columns(&self) -> usize {
        self.columns.len()
    }

    fn attribute_name(&self, column: usize) -> Option<&str> {
        self.columns.get(column).map(|s| s.as_str())
    }

    fn column_index(&self, name: &str) -> BenchResult<usize> {
        self.lookup
            .get(name)
            .copied()
            .ok_or_else(|| BenchError::UnknownAttribute(name.to_string()))
    }

    fn row(&self, row: usize) -> &[Cell] {
        &self.rows[row]
    }

    fn distinct_values(&self, column: usize) -> &[Cell] {
        &self.index[column].distinct
    }

    fn frequency_distribution(&self, column: usize) -> FrequencyDistribution {
        let ix = &self.index[column];
        let total = self.rows.len() as f64;
        let frequency = ix
            .distinct
            .iter()
            .map(|v| ix.counts[v] as f64 / total)
            .collect();
        FrequencyDistribution {
            values: ix.distinct.clone(),
            frequency,
        }
    }
}
