use thiserror::Error;

/// Failures surfaced to the user when exporting results.
#[derive(Error, Debug)]
pub enum ExportError {
    /// There are no results to write; the caller should tell the user and carry on.
    #[error("No data to export!")]
    NothingToExport,
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
