use std::fmt;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{DataType, Float64Type, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};

/// Column holding the trip length in miles, per the NYC Yellow Taxi data dictionary.
pub const DEFAULT_DISTANCE_COLUMN: &str = "trip_distance";

// ---------------------------------------------------------------------------
// Percentile – a quantile level strictly inside (0, 1)
// ---------------------------------------------------------------------------

/// A validated quantile level. Can only hold values strictly between 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentile(f64);

impl Percentile {
    pub const DEFAULT: Percentile = Percentile(0.9);

    /// Validate `value`; 0, 1, anything outside and NaN are rejected.
    pub fn new(value: f64) -> Result<Self> {
        if value > 0.0 && value < 1.0 {
            Ok(Percentile(value))
        } else {
            Err(Error::InvalidParameter {
                name: "percentile",
                value,
            })
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Percentile {
    fn default() -> Self {
        Percentile::DEFAULT
    }
}

impl fmt::Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TripTable – the in-memory trip records
// ---------------------------------------------------------------------------

/// An immutable, in-memory table of trip records.
///
/// All record batches read from a file are concatenated into one batch, so
/// row indices are global. Operations that select rows build a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct TripTable {
    batch: RecordBatch,
}

impl TripTable {
    pub fn new(batch: RecordBatch) -> Self {
        TripTable { batch }
    }

    /// Concatenate `batches` (possibly none) into a single table with `schema`.
    pub fn from_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self> {
        let batch = concat_batches(&schema, batches)?;
        Ok(TripTable { batch })
    }

    /// A zero-row table with the same schema as `self`.
    pub fn empty_like(&self) -> Self {
        TripTable {
            batch: RecordBatch::new_empty(self.schema()),
        }
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Number of trips.
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Read `column` as `f64` values, widening integer and `f32` columns.
    /// A `Null`-typed column (what an empty frame with no inferred dtype
    /// is written as) reads as all-null `f64`.
    ///
    /// Fails with [`Error::Schema`] when the column is absent or not numeric.
    pub fn distances(&self, column: &str) -> Result<Float64Array> {
        let array = self.column(column).ok_or_else(|| Error::Schema {
            column: column.to_string(),
            reason: "not found".to_string(),
        })?;

        match array.data_type() {
            DataType::Float64 => Ok(array.as_primitive::<Float64Type>().clone()),
            dt if dt.is_integer() || dt.is_floating() || *dt == DataType::Null => {
                let widened = cast(array, &DataType::Float64)?;
                Ok(widened.as_primitive::<Float64Type>().clone())
            }
            other => Err(Error::Schema {
                column: column.to_string(),
                reason: format!("has non-numeric type {other}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Float32Array, Int64Array, NullArray, StringArray};
    use arrow::datatypes::{Field, Schema};

    use super::*;

    fn table(field: Field, array: ArrayRef) -> TripTable {
        let schema = Arc::new(Schema::new(vec![field]));
        TripTable::new(RecordBatch::try_new(schema, vec![array]).unwrap())
    }

    #[test]
    fn percentile_bounds_are_exclusive() {
        for bad in [0.0, 1.0, 1.5, -0.2, f64::NAN] {
            let err = Percentile::new(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { name: "percentile", .. }));
        }
        assert_eq!(Percentile::new(0.5).unwrap().value(), 0.5);
        assert_eq!(Percentile::default().value(), 0.9);
        assert_eq!(Percentile::DEFAULT.to_string(), "0.90");
        assert_eq!(
            Percentile::new(1.5).unwrap_err().to_string(),
            "percentile must be between 0 and 1, got 1.5"
        );
    }

    #[test]
    fn integer_and_f32_distances_are_widened() {
        let ints = table(
            Field::new("trip_distance", DataType::Int64, false),
            Arc::new(Int64Array::from(vec![3, 1, 2])),
        );
        let d = ints.distances("trip_distance").unwrap();
        assert_eq!(d.values().to_vec(), vec![3.0, 1.0, 2.0]);

        let floats = table(
            Field::new("trip_distance", DataType::Float32, true),
            Arc::new(Float32Array::from(vec![Some(0.5), None])),
        );
        let d = floats.distances("trip_distance").unwrap();
        assert_eq!(d.value(0), 0.5);
        assert!(d.is_null(1));
    }

    #[test]
    fn null_typed_distance_reads_as_all_null() {
        let empty = table(
            Field::new("trip_distance", DataType::Null, true),
            Arc::new(NullArray::new(0)),
        );
        assert_eq!(empty.distances("trip_distance").unwrap().len(), 0);

        let nulls = table(
            Field::new("trip_distance", DataType::Null, true),
            Arc::new(NullArray::new(2)),
        );
        let d = nulls.distances("trip_distance").unwrap();
        assert_eq!(d.len(), 2);
        assert_eq!(d.null_count(), 2);
    }

    #[test]
    fn non_numeric_distance_is_schema_error() {
        let t = table(
            Field::new("trip_distance", DataType::Utf8, false),
            Arc::new(StringArray::from(vec!["far"])),
        );
        let err = t.distances("trip_distance").unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
    }

    #[test]
    fn from_no_batches_keeps_schema() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "trip_distance",
            DataType::Float64,
            true,
        )]));
        let t = TripTable::from_batches(schema.clone(), &[]).unwrap();
        assert!(t.is_empty());
        assert_eq!(t.schema(), schema);
        assert_eq!(t.column_names(), vec!["trip_distance".to_string()]);
    }
}
