//! Peptide candidate screening.
//!
//! Cross-references a peptide binding prediction table with allergenicity
//! and immunogenicity reports, keeps the non-allergenic immunogens at a
//! chosen probability and exports them as CSV.
//!
//! ```ignore
//! let mut session = Session::default();
//! session.load_tabular(&table_text);
//! session.load_allergen_report(&allergen_text);
//! session.load_immunogen_report(&immunogen_text);
//! session.analyze(90);
//! let csv = session.export_csv()?;
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod state;

pub use config::AnalysisConfig;
pub use data::export::{export_csv, export_file_name, CSV_MIME_TYPE};
pub use data::filter::join_and_filter;
pub use data::loader::parse_tabular;
pub use data::model::{
    AllergenMap, EnrichedResult, ImmunogenCall, ImmunogenMap, MergePolicy, PeptideId, TabularRecord,
};
pub use data::report::{parse_allergen_report, parse_immunogen_report};
pub use data::summary::{summarize, Summary};
pub use error::ExportError;
pub use state::Session;
