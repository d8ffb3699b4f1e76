use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use log::{info, warn};

use crate::config::AnalysisConfig;
use crate::data::export::{export_csv, write_export};
use crate::data::filter::join_and_filter_with_marker;
use crate::data::loader::{load_allergen_file, load_immunogen_file, load_tabular_file, parse_tabular};
use crate::data::model::{AllergenMap, EnrichedResult, ImmunogenMap, TabularRecord};
use crate::data::report::{parse_allergen_report, parse_immunogen_report};
use crate::data::summary::{summarize, Summary};
use crate::error::ExportError;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything one analysis session holds, independent of presentation.
///
/// Each input lives in its own slot, so loading one never touches the others.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub config: AnalysisConfig,

    /// Prediction table rows (empty until loaded).
    pub records: Vec<TabularRecord>,

    /// Allergenicity classifications by peptide.
    pub allergens: AllergenMap,

    /// Immunogenicity calls by peptide.
    pub immunogens: ImmunogenMap,

    /// Rows that passed the last analysis run.
    pub results: Vec<EnrichedResult>,

    /// Threshold of the last analysis run.
    pub threshold: Option<u32>,
}

impl Session {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Parse and store the prediction table. Returns the record count.
    pub fn load_tabular(&mut self, text: &str) -> usize {
        self.records = parse_tabular(text);
        info!("loaded {} table record(s)", self.records.len());
        self.records.len()
    }

    /// Parse and store the allergenicity report. Returns the peptide count.
    pub fn load_allergen_report(&mut self, text: &str) -> usize {
        self.allergens = parse_allergen_report(text);
        info!("loaded allergen classes for {} peptide(s)", self.allergens.len());
        self.allergens.len()
    }

    /// Parse and store the immunogenicity report. Returns the peptide count.
    pub fn load_immunogen_report(&mut self, text: &str) -> usize {
        self.immunogens = parse_immunogen_report(text);
        info!("loaded immunogen calls for {} peptide(s)", self.immunogens.len());
        self.immunogens.len()
    }

    pub fn load_tabular_file(&mut self, path: &Path) -> Result<usize> {
        self.records = load_tabular_file(path)?;
        info!("loaded {} table record(s) from {}", self.records.len(), path.display());
        Ok(self.records.len())
    }

    pub fn load_allergen_file(&mut self, path: &Path) -> Result<usize> {
        self.allergens = load_allergen_file(path)?;
        info!("loaded {} allergen peptide(s) from {}", self.allergens.len(), path.display());
        Ok(self.allergens.len())
    }

    pub fn load_immunogen_file(&mut self, path: &Path) -> Result<usize> {
        self.immunogens = load_immunogen_file(path)?;
        info!("loaded {} immunogen peptide(s) from {}", self.immunogens.len(), path.display());
        Ok(self.immunogens.len())
    }

    /// Whether all three inputs hold data, i.e. an analysis can produce results.
    pub fn is_ready(&self) -> bool {
        !self.records.is_empty() && !self.allergens.is_empty() && !self.immunogens.is_empty()
    }

    /// Rebuild `results` for `threshold` and return them.
    pub fn analyze(&mut self, threshold: u32) -> &[EnrichedResult] {
        if !self.is_ready() {
            warn!("analysis started with incomplete inputs; results will be empty");
        }
        if self.config.analysis_delay_ms > 0 {
            thread::sleep(Duration::from_millis(self.config.analysis_delay_ms));
        }
        self.results = join_and_filter_with_marker(
            &self.records,
            &self.allergens,
            &self.immunogens,
            threshold,
            self.config.id_marker,
        );
        self.threshold = Some(threshold);
        info!(
            "analysis at {threshold}%: {} of {} record(s) kept",
            self.results.len(),
            self.records.len()
        );
        &self.results
    }

    /// Run [`Session::analyze`] at the configured default threshold.
    pub fn analyze_default(&mut self) -> &[EnrichedResult] {
        self.analyze(self.config.default_threshold)
    }

    /// Counts for the current records and results.
    pub fn summary(&self) -> Summary {
        Summary {
            threshold: self.threshold,
            ..summarize(self.records.len(), self.results.len())
        }
    }

    /// Current results as CSV text.
    pub fn export_csv(&self) -> Result<String, ExportError> {
        export_csv(&self.results)
    }

    /// Write the current results into `dir`, named for `date` (today if `None`).
    pub fn export_to_dir(&self, dir: &Path, date: Option<NaiveDate>) -> Result<PathBuf, ExportError> {
        let date = date.unwrap_or_else(|| Local::now().date_naive());
        write_export(&self.results, dir, &self.config.product_name, date)
    }

    /// Drop all inputs and results. The config is kept.
    pub fn clear(&mut self) {
        *self = Self::new(self.config.clone());
    }
}
