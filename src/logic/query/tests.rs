use super::*;
use crate::error::BenchError;
use crate::logic::dataset::{Cell, DataHandle, Dataset};
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn dataset() -> Dataset {
    Dataset::from_raw(
        &["age", "sex", "zip"],
        &[
            vec!["30", "m", "1000"],
            vec!["40", "f", "1000"],
            vec!["50", "f", "2000"],
            vec!["30", "f", "3000"],
            vec!["60", "m", "4000"],
        ],
        None,
    )
    .unwrap()
}

fn empty() -> Dataset {
    let rows: Vec<Vec<&str>> = Vec::new();
    Dataset::from_raw(&["age"], &rows, None).unwrap()
}

// ============================================================================
// POINT QUERIES
// ============================================================================

#[test]
fn test_draw_targets_exist_in_reference() {
    let data = dataset();
    let mut generator = QueryGenerator::new(&data, StdRng::seed_from_u64(11));

    for _ in 0..50 {
        let query = generator.point_query(&["age", "zip"], PointMode::Draw).unwrap();
        assert_eq!(query.len(), 2);
        for (&column, predicate) in &query {
            assert_eq!(predicate.len(), 1);
            let target = predicate.targets().next().unwrap();
            assert!(data.distinct_values(column).contains(target));
        }
    }
}

#[test]
fn test_draw_eventually_covers_every_value() {
    let data = dataset();
    let mut generator = QueryGenerator::new(&data, StdRng::seed_from_u64(5));
    let mut seen = std::collections::HashSet::new();

    for _ in 0..200 {
        let query = generator.point_query(&["age"], PointMode::Draw).unwrap();
        seen.extend(query.get(0).unwrap().targets().cloned());
    }
    assert_eq!(seen.len(), data.distinct_values(0).len());
}

#[test]
fn test_record_targets_come_from_one_row() {
    let data = dataset();
    let mut generator = QueryGenerator::new(&data, StdRng::seed_from_u64(3));

    for _ in 0..50 {
        let query = generator
            .point_query(&["age", "sex", "zip"], PointMode::Record)
            .unwrap();
        let found = data
            .rows()
            .any(|row| query.iter().all(|(&column, predicate)| predicate.matches(&row[column])));
        assert!(found, "no record matches {:?}", query);
    }
}

#[test]
fn test_record_selection_never_runs_past_last_row() {
    let data = dataset();

    // u just below 1 rounds up to the row count
    let mut generator = QueryGenerator::new(&data, StepRng::new(u64::MAX, 0));
    let query = generator.point_query(&["age", "zip"], PointMode::Record).unwrap();
    assert_eq!(query.get(0), Some(&Predicate::single(Cell::value("60"))));
    assert_eq!(query.get(2), Some(&Predicate::single(Cell::value("4000"))));

    let mut generator = QueryGenerator::new(&data, StepRng::new(0, 0));
    let query = generator.point_query(&["age"], PointMode::Record).unwrap();
    assert_eq!(query.get(0), Some(&Predicate::single(Cell::value("30"))));
}

#[test]
fn test_point_mode_parsing() {
    assert_eq!("draw".parse::<PointMode>().unwrap(), PointMode::Draw);
    assert_eq!("RECORD".parse::<PointMode>().unwrap(), PointMode::Record);
    assert!("row".parse::<PointMode>().is_err());
    assert_eq!(PointMode::default().to_string(), "draw");
}

// ============================================================================
// RANGE QUERIES
// ============================================================================

#[test]
fn test_range_is_contiguous_span() {
    let data = dataset();
    let mut generator = QueryGenerator::new(&data, StdRng::seed_from_u64(17));

    for _ in 0..100 {
        let query = generator.range_query(&["age", "sex", "zip"]).unwrap();
        assert_eq!(query.len(), 3);
        for (&column, predicate) in &query {
            let values = data.distinct_values(column);
            let positions: Vec<usize> = predicate
                .targets()
                .map(|t| values.iter().position(|v| v == t).unwrap())
                .collect();
            let lower = *positions.iter().min().unwrap();
            let upper = *positions.iter().max().unwrap();
            assert_eq!(upper - lower + 1, predicate.len());
        }
    }
}

#[test]
fn test_range_bounds_at_extremes() {
    let data = dataset();

    let mut generator = QueryGenerator::new(&data, StepRng::new(0, 0));
    let query = generator.range_query(&["age"]).unwrap();
    assert_eq!(query.get(0), Some(&Predicate::single(Cell::value("30"))));

    // Both bounds land on the last distinct value
    let mut generator = QueryGenerator::new(&data, StepRng::new(u64::MAX, 0));
    let query = generator.range_query(&["age"]).unwrap();
    assert_eq!(query.get(0), Some(&Predicate::single(Cell::value("60"))));
}

#[test]
fn test_range_over_single_value_column() {
    let data = Dataset::from_raw(&["a"], &[vec!["x"], vec!["x"]], None).unwrap();
    let mut generator = QueryGenerator::new(&data, StdRng::seed_from_u64(1));
    for _ in 0..10 {
        let query = generator.range_query(&["a"]).unwrap();
        assert_eq!(query.get(0), Some(&Predicate::single(Cell::value("x"))));
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_unknown_attribute() {
    let data = dataset();
    let mut generator = QueryGenerator::new(&data, StdRng::seed_from_u64(0));

    let result = generator.point_query(&["height"], PointMode::Draw);
    assert!(matches!(result, Err(BenchError::UnknownAttribute(_))));
    let result = generator.range_query(&["age", "height"]);
    assert!(matches!(result, Err(BenchError::UnknownAttribute(_))));
}

#[test]
fn test_empty_reference() {
    let data = empty();
    let mut generator = QueryGenerator::new(&data, StdRng::seed_from_u64(0));

    for mode in [PointMode::Draw, PointMode::Record] {
        let result = generator.point_query(&["age"], mode);
        assert!(matches!(result, Err(BenchError::EmptyInput(_))));
    }
    let result = generator.range_query(&["age"]);
    assert!(matches!(result, Err(BenchError::EmptyInput(_))));
}

#[test]
fn test_predicate_rejects_empty_targets() {
    let result = Predicate::new(Vec::<Cell>::new());
    assert!(matches!(result, Err(BenchError::EmptyInput(_))));
}

#[test]
fn test_query_replaces_predicate_on_same_column() {
    let query = Query::new()
        .with(1, Predicate::single(Cell::value("a")))
        .with(1, Predicate::single(Cell::value("b")));
    assert_eq!(query.len(), 1);
    assert!(query.get(1).unwrap().matches(&Cell::value("b")));
    assert_eq!(query.columns().collect::<Vec<_>>(), vec![1]);
}
