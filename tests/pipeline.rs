use std::sync::Arc;

use arrow::array::{ArrayRef, AsArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Float64Type, Schema};
use arrow::record_batch::RecordBatch;
use tempfile::tempdir;

use taxi_percentile::{
    filter_by_percentile, load, write_parquet, Error, Percentile, TripTable,
    DEFAULT_DISTANCE_COLUMN,
};

fn trips(distances: &[f64]) -> TripTable {
    let n = distances.len();
    let schema = Arc::new(Schema::new(vec![
        Field::new("VendorID", DataType::Int64, false),
        Field::new("trip_distance", DataType::Float64, false),
        Field::new("payment_type", DataType::Utf8, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from((0..n as i64).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(distances.to_vec())),
        Arc::new(StringArray::from(vec!["Credit card"; n])),
    ];
    TripTable::new(RecordBatch::try_new(schema, columns).unwrap())
}

fn distances(table: &TripTable) -> Vec<f64> {
    table
        .column(DEFAULT_DISTANCE_COLUMN)
        .unwrap()
        .as_primitive::<Float64Type>()
        .values()
        .to_vec()
}

#[test]
fn load_filter_write_reload() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("yellow.parquet");
    let output = dir.path().join("over.parquet");
    write_parquet(&trips(&[10.0, 1.0, 4.0, 2.0, 5.0, 3.0]), &input).unwrap();

    let loaded = load(input.to_str().unwrap()).unwrap();
    assert_eq!(loaded.num_rows(), 6);

    let (over, threshold) =
        filter_by_percentile(&loaded, Percentile::new(0.9).unwrap(), DEFAULT_DISTANCE_COLUMN)
            .unwrap();
    assert_eq!(threshold, Some(7.5));
    assert_eq!(distances(&over), vec![10.0]);

    write_parquet(&over, &output).unwrap();
    let reread = load(output.to_str().unwrap()).unwrap();
    assert_eq!(reread, over);
    assert_eq!(reread.column_names(), loaded.column_names());
}

#[test]
fn larger_table_respects_threshold_bounds() {
    let input: Vec<f64> = (0..500).map(|i| ((i * 37) % 101) as f64 / 4.0).collect();
    let table = trips(&input);
    let min = input.iter().copied().fold(f64::INFINITY, f64::min);
    let max = input.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (over, threshold) =
        filter_by_percentile(&table, Percentile::new(0.75).unwrap(), DEFAULT_DISTANCE_COLUMN)
            .unwrap();
    let v = threshold.unwrap();
    assert!(min <= v && v <= max);

    let got = distances(&over);
    assert!(!got.is_empty());
    assert!(got.iter().all(|d| *d > v));
    assert!(got.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(got.len(), input.iter().filter(|d| **d > v).count());
}

#[test]
fn empty_file_round_trips_to_empty_result() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty.parquet");
    write_parquet(&trips(&[]), &input).unwrap();

    let loaded = load(input.to_str().unwrap()).unwrap();
    let (over, threshold) =
        filter_by_percentile(&loaded, Percentile::DEFAULT, DEFAULT_DISTANCE_COLUMN).unwrap();
    assert!(over.is_empty());
    assert_eq!(threshold, None);
    assert_eq!(over.schema(), loaded.schema());
}

#[test]
fn wrong_column_name_is_schema_error() {
    let table = trips(&[1.0, 2.0, 3.0]);
    let err =
        filter_by_percentile(&table, Percentile::DEFAULT, "distance").unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}
