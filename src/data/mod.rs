/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Catalog (difficulty + color derived)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Catalog  │  Vec<VideoRecord>, category index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply Criteria → ordered QueryHits
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
