/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///   remote / local .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → Dataset (cached for the process)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec membership → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  converted = usd × rate      ◄── rates::RateProvider
///   └───────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  metrics, grouped means, histogram → UI / export
///   └───────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
