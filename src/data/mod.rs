/// Data layer: core types, loading/reshaping, and selection.
///
/// Architecture:
/// ```text
///  .csv / .tsv  (wide: one column per concentration)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → Vec<SourceRow> → reshape
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ MicDataset  │  Vec<ObservationRow> (long: 19 per source row)
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  antibiotic → species → Selection
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
