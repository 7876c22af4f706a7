/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  house_prices_1000_extended.csv (.json / .parquet)
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  memoized handle → loader (parse file → HouseDataset)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection predicates → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  monthly / by type / by bedroom / yearly growth / summary
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod source;
