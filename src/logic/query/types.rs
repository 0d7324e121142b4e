use std::collections::{btree_map, BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};
use crate::logic::dataset::Cell;

/// Non-empty set of target values for one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    targets: BTreeSet<Cell>,
}

impl Predicate {
    pub fn new<I: IntoIterator<Item = Cell>>(targets: I) -> BenchResult<Self> {
        let targets: BTreeSet<Cell> = targets.into_iter().collect();
        if targets.is_empty() {
            return Err(BenchError::empty("predicate without target values"));
        }
        Ok(Self { targets })
    }

    pub fn single(target: Cell) -> Self {
        Self {
            targets: BTreeSet::from([target]),
        }
    }

    pub fn matches(&self, cell: &Cell) -> bool {
        self.targets.contains(cell)
    }

    pub fn targets(&self) -> impl Iterator<Item = &Cell> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }
}

/// Column index -> predicate, combined conjunctively
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    predicates: BTreeMap<usize, Predicate>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate, replacing any previous one on the same column
    pub fn with(mut self, column: usize, predicate: Predicate) -> Self {
        self.insert(column, predicate);
        self
    }

    pub fn insert(&mut self, column: usize, predicate: Predicate) {
        self.predicates.insert(column, predicate);
    }

    pub fn get(&self, column: usize) -> Option<&Predicate> {
        self.predicates.get(&column)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, usize, Predicate> {
        self.predicates.iter()
    }

    pub fn columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.predicates.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = (&'a usize, &'a Predicate);
    type IntoIter = btree_map::Iter<'a, usize, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
