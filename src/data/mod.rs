/// Data layer: record types, CSV loading, and derived chart views.
///
/// Architecture:
/// ```text
///  ont_results.csv   splitter_results.csv
///        │                  │
///        ▼                  ▼
///   ┌────────────────────────────┐
///   │  loader                    │  header check → typed rows
///   └────────────────────────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ NetworkDataset │  Vec<OntRecord>, Vec<SplitterRecord>
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  views    │  filter / bin / partition / sort → ChartViews
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod views;
