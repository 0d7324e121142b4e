use super::*;
use crate::error::BenchError;
use tempfile::tempdir;

fn sample() -> Dataset {
    Dataset::from_raw(
        &["age", "sex"],
        &[
            vec!["34", "male"],
            vec!["*", "female"],
            vec!["34", "*"],
            vec!["51", "female"],
        ],
        Some("*"),
    )
    .unwrap()
}

#[test]
fn test_marker_is_a_sentinel() {
    assert_eq!(Cell::parse("*", Some("*")), Cell::Suppressed);
    assert_eq!(Cell::parse("*", None), Cell::value("*"));
    assert!(!Cell::value("*").is_suppressed());
    assert_eq!(Cell::Suppressed.render("?"), "?");
}

#[test]
fn test_distinct_values_first_occurrence_order() {
    let data = sample();
    assert_eq!(
        data.distinct_values(0),
        &[Cell::value("34"), Cell::Suppressed, Cell::value("51")]
    );
    assert_eq!(data.count(0, &Cell::value("34")), 2);
}

#[test]
fn test_frequency_distribution_sums_to_one() {
    let data = sample();
    for column in 0..data.num_columns() {
        let dist = data.frequency_distribution(column);
        let total: f64 = dist.frequency.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
    let dist = data.frequency_distribution(1);
    assert_eq!(dist.get(&Cell::value("female")), Some(0.5));
    assert_eq!(dist.get(&Cell::Suppressed), Some(0.25));
}

#[test]
fn test_column_lookup() {
    let data = sample();
    assert_eq!(data.column_index("sex").unwrap(), 1);
    match data.column_index("zip") {
        Err(BenchError::UnknownAttribute(name)) => assert_eq!(name, "zip"),
        other => panic!("Expected UnknownAttribute, got {:?}", other),
    }
}

#[test]
fn test_reject_duplicate_columns() {
    let result = Dataset::from_raw(&["a", "a"], &[vec!["1", "2"]], None);
    assert!(matches!(result, Err(BenchError::InvalidArgument(_))));
}

#[test]
fn test_reject_ragged_rows() {
    let result = Dataset::from_raw(&["a", "b"], &[vec!["1", "2"], vec!["3"]], None);
    assert!(matches!(result, Err(BenchError::InvalidArgument(_))));
}

#[test]
fn test_csv_write_and_load_cycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("output.csv");

    let data = sample();
    let file = std::fs::File::create(&path).unwrap();
    write_csv(&data, file, b';', Some("*")).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("age;sex\n"));

    let loaded = load_csv(&path, &CsvOptions::output(b';', "*")).unwrap();
    assert_eq!(loaded.num_rows(), 4);
    assert_eq!(loaded.value(1, 0), &Cell::Suppressed);
    assert_eq!(loaded.value(3, 1), &Cell::value("female"));

    // Input files keep the literal marker as data
    let raw = load_csv(&path, &CsvOptions::default()).unwrap();
    assert_eq!(raw.value(1, 0), &Cell::value("*"));
}

#[test]
fn test_read_csv_from_memory() {
    let text = "a;b\nx;1\ny;2\n";
    let data = read_csv(text.as_bytes(), &CsvOptions::default()).unwrap();
    assert_eq!(data.attribute_names(), vec!["a", "b"]);
    assert_eq!(data.value(1, 1), &Cell::value("2"));
}
