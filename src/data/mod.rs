/// Data layer: trip table, loading, percentile filtering and write-back.
///
/// Architecture:
/// ```text
///  local .parquet / http(s) URL
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch (temp file) + decode → TripTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  quantile threshold → rows strictly above, sorted
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  atomic .parquet write of the filtered trips
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;
