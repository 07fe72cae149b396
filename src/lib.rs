//! Distance-percentile filtering over NYC Yellow Taxi trip records.
//!
//! ```no_run
//! use taxi_percentile::{filter_by_percentile, load, Percentile, DEFAULT_DISTANCE_COLUMN};
//!
//! let trips = load("yellow_tripdata_2025-01.parquet")?;
//! let (over, threshold) =
//!     filter_by_percentile(&trips, Percentile::new(0.9)?, DEFAULT_DISTANCE_COLUMN)?;
//! println!("{} trips above {threshold:?} miles", over.num_rows());
//! # Ok::<(), taxi_percentile::Error>(())
//! ```

pub mod data;
pub mod error;

pub use data::filter::{filter_by_percentile, linear_quantile};
pub use data::loader::{is_url, load, load_with, LoadOptions};
pub use data::model::{Percentile, TripTable, DEFAULT_DISTANCE_COLUMN};
pub use data::writer::write_parquet;
pub use error::{Error, Result};
