//! Aggregate Count Estimation
//!
//! Exact counting on untransformed data, and a suppression-aware estimate
//! on anonymized data:
//!
//! - a cell in the target set satisfies its predicate outright
//! - a suppressed cell satisfies it with the likelihood that the hidden
//!   value was a target (summed posterior frequency of the targets)
//! - any other cell excludes the row
//!
//! Per-row likelihoods multiply across predicates and are squashed through
//! a shifted sigmoid, so low-confidence partial matches count for little.

use crate::constants::SIGMOID_STEEPNESS;
use crate::logic::dataset::DataHandle;
use crate::logic::likelihood::LikelihoodTable;
use crate::logic::query::Query;

/// Weight of a surviving row with joint likelihood `likelihood`:
/// `(sigmoid(5 * L) - 0.5) * 2`, 0 at L = 0 and ~0.9866 at L = 1
pub fn match_weight(likelihood: f64) -> f64 {
    let sigmoid = 1.0 / (1.0 + (-likelihood * SIGMOID_STEEPNESS).exp());
    (sigmoid - 0.5) * 2.0
}

/// Number of rows matching every predicate exactly
pub fn exact_count(query: &Query, handle: &impl DataHandle) -> f64 {
    handle
        .rows()
        .filter(|row| query.iter().all(|(&column, predicate)| predicate.matches(&row[column])))
        .count() as f64
}

/// Suppression-aware estimate of the number of matching rows
pub fn estimate_count(query: &Query, handle: &impl DataHandle, likelihoods: &LikelihoodTable) -> f64 {
    let prepared: Vec<f64> = query
        .iter()
        .map(|(&column, predicate)| likelihoods.aggregate(column, predicate))
        .collect();

    let mut count = 0.0;
    'rows: for row in handle.rows() {
        let mut likelihood = 1.0;
        for ((column, predicate), aggregate) in query.iter().zip(&prepared) {
            let cell = &row[*column];
            if predicate.matches(cell) {
                continue;
            }
            if cell.is_suppressed() {
                likelihood *= aggregate;
            } else {
                continue 'rows;
            }
        }
        count += match_weight(likelihood);
    }
    count
}

/// Exact count without a likelihood table, estimate with one
pub fn count(query: &Query, handle: &impl DataHandle, likelihoods: Option<&LikelihoodTable>) -> f64 {
    match likelihoods {
        Some(table) => estimate_count(query, handle, table),
        None => exact_count(query, handle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::{Cell, Dataset};
    use crate::logic::query::Predicate;

    fn input() -> Dataset {
        Dataset::from_raw(
            &["age", "sex"],
            &[vec!["30", "m"], vec!["40", "f"], vec!["50", "f"]],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_match_weight_shape() {
        assert_eq!(match_weight(0.0), 0.0);
        assert!((match_weight(1.0) - 0.9866142981514305).abs() < 1e-12);
        assert!(match_weight(0.2) < match_weight(0.5));
    }

    #[test]
    fn test_exact_count_single_match() {
        let query = Query::new().with(0, Predicate::single(Cell::value("40")));
        assert_eq!(exact_count(&query, &input()), 1.0);
        assert_eq!(count(&query, &input(), None), 1.0);
    }

    #[test]
    fn test_exact_count_conjunction() {
        let query = Query::new()
            .with(0, Predicate::new([Cell::value("40"), Cell::value("50")]).unwrap())
            .with(1, Predicate::single(Cell::value("f")));
        assert_eq!(exact_count(&query, &input()), 2.0);

        let none = Query::new().with(1, Predicate::single(Cell::value("x")));
        assert_eq!(exact_count(&none, &input()), 0.0);
    }

    #[test]
    fn test_exact_mode_ignores_suppression() {
        let output = Dataset::from_raw(&["age"], &[vec!["*"], vec!["40"]], Some("*")).unwrap();
        let query = Query::new().with(0, Predicate::single(Cell::value("40")));
        assert_eq!(exact_count(&query, &output), 1.0);
    }

    #[test]
    fn test_estimate_suppressed_cell_contribution() {
        // Column 0: "*" 0.4, "a" 0.3, "b" 0.2, "c" 0.1
        let output = Dataset::from_raw(
            &["x", "y"],
            &[
                vec!["*", "k"],
                vec!["*", "z"],
                vec!["*", "z"],
                vec!["*", "z"],
                vec!["a", "z"],
                vec!["a", "z"],
                vec!["a", "z"],
                vec!["b", "z"],
                vec!["b", "z"],
                vec!["c", "z"],
            ],
            Some("*"),
        )
        .unwrap();
        let table = LikelihoodTable::from_handle(&output);
        let query = Query::new()
            .with(0, Predicate::new([Cell::value("a"), Cell::value("b")]).unwrap())
            .with(1, Predicate::single(Cell::value("k")));

        // Only row 0 survives: suppressed x (L = 0.5), exact y
        let expected = match_weight(0.5);
        assert!((expected - 0.8482836399575131).abs() < 1e-12);
        assert!((estimate_count(&query, &output, &table) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_exact_rows_weigh_less_than_one() {
        let output = input();
        let table = LikelihoodTable::from_handle(&output);
        let query = Query::new().with(0, Predicate::single(Cell::value("30")));
        let estimate = estimate_count(&query, &output, &table);
        assert!((estimate - match_weight(1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_multiplies_across_suppressed_columns() {
        let output = Dataset::from_raw(
            &["a", "b"],
            &[vec!["*", "*"], vec!["1", "2"], vec!["3", "4"], vec!["1", "4"]],
            Some("*"),
        )
        .unwrap();
        let table = LikelihoodTable::from_handle(&output);
        let query = Query::new()
            .with(0, Predicate::single(Cell::value("1")))
            .with(1, Predicate::single(Cell::value("4")));

        // Row 0: 0.5 * 0.5; row 3 matches exactly; rows 1, 2 excluded
        let expected = match_weight(0.25) + match_weight(1.0);
        assert!((estimate_count(&query, &output, &table) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_unseen_target_gives_zero_weight() {
        let output = Dataset::from_raw(&["a"], &[vec!["*"], vec!["1"]], Some("*")).unwrap();
        let table = LikelihoodTable::from_handle(&output);
        let query = Query::new().with(0, Predicate::single(Cell::value("9")));
        assert_eq!(estimate_count(&query, &output, &table), 0.0);
    }
}
