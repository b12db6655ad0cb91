/// Data layer: core types, loading, filtering, and counting.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ImageDataset (breed column only)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  reference-list membership → matching indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  tally    │  per-breed counts, zero-filled, ordered
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod reference;
pub mod tally;
