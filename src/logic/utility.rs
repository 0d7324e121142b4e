//! Utility metrics of suppressed datasets
//!
//! Only two-level hierarchies (value -> suppressed) are modeled, so
//! granularity reduces to "kept or not" per cell.

use crate::error::{BenchError, BenchResult};
use crate::logic::dataset::{Cell, DataHandle, Dataset};

/// Fraction of suppressed cells.
///
/// Consumes the rows in a single pass. Fails with `EmptyInput` when the
/// rows contain no cells at all.
pub fn suppressed_cell_fraction<I, R>(rows: I) -> BenchResult<f64>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[Cell]>,
{
    let mut suppressed = 0u64;
    let mut total = 0u64;

    for row in rows {
        for cell in row.as_ref() {
            total += 1;
            if cell.is_suppressed() {
                suppressed += 1;
            }
        }
    }

    if total == 0 {
        return Err(BenchError::empty("no cells to measure"));
    }
    Ok(suppressed as f64 / total as f64)
}

/// Information loss (`1 - granularity`) over the given columns
pub fn information_loss(handle: &impl DataHandle, columns: &[usize]) -> BenchResult<f64> {
    if columns.is_empty() || handle.num_rows() == 0 {
        return Err(BenchError::empty("information loss needs rows and columns"));
    }
    let suppressed: usize = handle
        .rows()
        .map(|row| columns.iter().filter(|&&c| row[c].is_suppressed()).count())
        .sum();
    Ok(suppressed as f64 / (handle.num_rows() * columns.len()) as f64)
}

/// Non-uniform entropy of a row-aligned output, normalized per column and
/// averaged.
///
/// A suppressed cell whose original value is `x` loses `-log2(count(x) / n)`
/// bits; kept cells lose nothing. Each column is divided by its loss under
/// full suppression, so 0 means untouched and 1 means fully suppressed.
pub fn non_uniform_entropy(
    input: &Dataset,
    output: &impl DataHandle,
    columns: &[usize],
) -> BenchResult<f64> {
    if input.num_rows() != output.num_rows() || !input.same_schema(output) {
        return Err(BenchError::invalid("input and output are not row-aligned"));
    }
    if columns.is_empty() || input.num_rows() == 0 {
        return Err(BenchError::empty("entropy needs rows and columns"));
    }
    if let Some(&c) = columns.iter().find(|&&c| c >= input.num_columns()) {
        return Err(BenchError::invalid(format!("column {} out of range", c)));
    }

    let n = input.num_rows() as f64;
    let mut sum = 0.0;
    for &column in columns {
        let mut loss = 0.0;
        let mut max_loss = 0.0;
        for row in 0..input.num_rows() {
            let original = input.value(row, column);
            let bits = -(input.count(column, original) as f64 / n).log2();
            max_loss += bits;
            if output.value(row, column).is_suppressed() {
                loss += bits;
            }
        }
        if max_loss > 0.0 {
            sum += loss / max_loss;
        }
    }
    Ok(sum / columns.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(raw: &[&[&str]]) -> Vec<Vec<Cell>> {
        raw.iter()
            .map(|r| r.iter().map(|v| Cell::parse(v, Some("*"))).collect())
            .collect()
    }

    #[test]
    fn test_suppressed_fraction() {
        let data = rows(&[&["1", "*"], &["*", "*"]]);
        assert_eq!(suppressed_cell_fraction(&data).unwrap(), 0.75);
    }

    #[test]
    fn test_suppressed_fraction_streams_iterator() {
        let lazy = (0..4).map(|i| {
            if i % 2 == 0 {
                vec![Cell::Suppressed, Cell::value("x")]
            } else {
                vec![Cell::value("y"), Cell::value("z")]
            }
        });
        assert_eq!(suppressed_cell_fraction(lazy).unwrap(), 0.25);
    }

    #[test]
    fn test_empty_input_fails() {
        let empty: Vec<Vec<Cell>> = Vec::new();
        assert!(matches!(suppressed_cell_fraction(&empty), Err(BenchError::EmptyInput(_))));

        let zero_width: Vec<Vec<Cell>> = vec![vec![], vec![]];
        assert!(matches!(suppressed_cell_fraction(&zero_width), Err(BenchError::EmptyInput(_))));
    }

    #[test]
    fn test_information_loss_per_columns() {
        let data = Dataset::from_raw(
            &["a", "b", "c"],
            &[vec!["1", "*", "x"], vec!["*", "*", "y"]],
            Some("*"),
        )
        .unwrap();
        assert_eq!(information_loss(&data, &[0]).unwrap(), 0.5);
        assert_eq!(information_loss(&data, &[1]).unwrap(), 1.0);
        assert_eq!(information_loss(&data, &[0, 2]).unwrap(), 0.25);
        assert!(information_loss(&data, &[]).is_err());
    }

    #[test]
    fn test_non_uniform_entropy_bounds() {
        let input = Dataset::from_raw(
            &["a", "b"],
            &[vec!["1", "x"], vec!["1", "y"], vec!["2", "x"], vec!["3", "x"]],
            None,
        )
        .unwrap();

        let untouched = input.clone();
        assert_eq!(non_uniform_entropy(&input, &untouched, &[0, 1]).unwrap(), 0.0);

        let all = Dataset::from_raw(
            &["a", "b"],
            &[vec!["*", "*"], vec!["*", "*"], vec!["*", "*"], vec!["*", "*"]],
            Some("*"),
        )
        .unwrap();
        assert!((non_uniform_entropy(&input, &all, &[0, 1]).unwrap() - 1.0).abs() < 1e-12);

        // Suppressing the rare value "3" (2 bits of 1+1+2+2 = 6) in column a only
        let partial = Dataset::from_raw(
            &["a", "b"],
            &[vec!["1", "x"], vec!["1", "y"], vec!["2", "x"], vec!["*", "x"]],
            Some("*"),
        )
        .unwrap();
        let nue = non_uniform_entropy(&input, &partial, &[0]).unwrap();
        assert!((nue - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_uniform_entropy_rejects_misaligned() {
        let input = Dataset::from_raw(&["a"], &[vec!["1"], vec!["2"]], None).unwrap();
        let output = Dataset::from_raw(&["a"], &[vec!["1"]], None).unwrap();
        assert!(matches!(
            non_uniform_entropy(&input, &output, &[0]),
            Err(BenchError::InvalidArgument(_))
        ));
    }
}
