/// Data layer: input parsing, join/filter, summary and export.
///
/// Architecture:
/// ```text
///  table.csv      allergen.txt      immunogen.txt
///      │               │                  │
///      ▼               ▼                  ▼
///  ┌────────┐     ┌──────────────────────────┐
///  │ loader │     │          report           │  header/body line extraction
///  └────────┘     └──────────────────────────┘
///      │               │                  │
///      ▼               ▼                  ▼
///  Vec<TabularRecord>  AllergenMap     ImmunogenMap
///      └───────────────┼──────────────────┘
///                      ▼
///                ┌──────────┐
///                │  filter   │  join by peptide, classification + threshold
///                └──────────┘
///                      │
///          ┌───────────┴───────────┐
///          ▼                       ▼
///    ┌──────────┐            ┌──────────┐
///    │ summary   │            │  export   │  quoted CSV
///    └──────────┘            └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod report;
pub mod summary;
