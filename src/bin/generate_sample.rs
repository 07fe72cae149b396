use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;

use taxi_percentile::{write_parquet, TripTable};

/// Write a synthetic NYC Yellow Taxi trip file for trying out `taxi-percentile`.
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Destination parquet file
    #[arg(default_value = "sample_trips.parquet")]
    output: PathBuf,

    /// Number of trips
    #[arg(long, default_value_t = 10_000)]
    rows: usize,

    /// PRNG seed; the same seed always yields the same file
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// SplitMix64: one `u64` of state, good enough for reproducible fixtures.
struct TripRng(u64);

impl TripRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }

    /// Standard normal draw (Box-Muller, cosine branch only).
    fn standard_normal(&mut self) -> f64 {
        let radius = (-2.0 * (1.0 - self.unit()).ln()).sqrt();
        radius * (std::f64::consts::TAU * self.unit()).cos()
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = TripRng(args.seed);

    let payment_types = ["Credit card", "Cash", "No charge", "Dispute"];

    let mut vendor = Vec::with_capacity(args.rows);
    let mut passengers = Vec::with_capacity(args.rows);
    let mut distance = Vec::with_capacity(args.rows);
    let mut fare = Vec::with_capacity(args.rows);
    let mut payment = Vec::with_capacity(args.rows);

    for _ in 0..args.rows {
        // Log-normal trip lengths (median ~1.8 mi), with the odd zero-mile
        // trip the published data is known for.
        let miles = if rng.below(50) == 0 {
            0.0
        } else {
            round2((0.6 + 0.8 * rng.standard_normal()).exp())
        };

        vendor.push(1 + rng.below(2) as i32);
        passengers.push(1 + rng.below(6) as i64);
        distance.push(miles);
        fare.push(round2(3.0 + 2.5 * miles + rng.standard_normal().abs()));
        payment.push(*rng.pick(&payment_types));
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("VendorID", DataType::Int32, false),
        Field::new("passenger_count", DataType::Int64, false),
        Field::new("trip_distance", DataType::Float64, false),
        Field::new("fare_amount", DataType::Float64, false),
        Field::new("payment_type", DataType::Utf8, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(vendor)),
        Arc::new(Int64Array::from(passengers)),
        Arc::new(Float64Array::from(distance)),
        Arc::new(Float64Array::from(fare)),
        Arc::new(StringArray::from(payment)),
    ];
    let batch = RecordBatch::try_new(schema, columns).context("building trip batch")?;

    write_parquet(&TripTable::new(batch), &args.output)?;

    println!("Wrote {} trips to {}", args.rows, args.output.display());
    Ok(())
}
