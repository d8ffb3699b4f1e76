use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::info;

use super::model::EnrichedResult;
use crate::error::ExportError;

/// MIME type of the exported file.
pub const CSV_MIME_TYPE: &str = "text/csv";

// ---------------------------------------------------------------------------
// CSV serialisation
// ---------------------------------------------------------------------------

/// Serialize results as CSV text.
///
/// The header row lists the columns of the first result, unquoted. Every
/// data value is double-quoted with embedded quotes doubled. Each line,
/// the last included, ends with `\n`.
pub fn export_csv(results: &[EnrichedResult]) -> Result<String, ExportError> {
    let first = results.first().ok_or(ExportError::NothingToExport)?;
    let headers: Vec<String> = first.to_record().columns().map(str::to_string).collect();

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for result in results {
        let record = result.to_record();
        writer.write_record(headers.iter().map(|h| record.get(h).unwrap_or_default()))?;
    }
    let rows = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;

    let mut out = headers.join(",");
    out.push('\n');
    out.push_str(&String::from_utf8_lossy(&rows));
    Ok(out)
}

/// File name for an export made on `date`: `<product>_analysis_<YYYY-MM-DD>.csv`.
pub fn export_file_name(product: &str, date: NaiveDate) -> String {
    format!("{product}_analysis_{}.csv", date.format("%Y-%m-%d"))
}

/// Write the CSV export into `dir` and return the written path.
pub fn write_export(
    results: &[EnrichedResult],
    dir: &Path,
    product: &str,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let content = export_csv(results)?;
    let path = dir.join(export_file_name(product, date));
    std::fs::write(&path, content.as_bytes())?;
    info!("exported {} result(s) to {}", results.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{PeptideId, TabularRecord};

    fn result(record: TabularRecord) -> EnrichedResult {
        EnrichedResult {
            peptide: PeptideId::new("peptide_2"),
            record,
            allergen_classification: "NON-ALLERGEN".into(),
            immunogen_classification: "Probable IMMUNOGEN".into(),
            immunogen_probability: 90,
        }
    }

    #[test]
    fn test_export_layout() {
        let record: TabularRecord = [("name", ">peptide_2"), ("rank", "0.3")].into_iter().collect();
        let text = export_csv(&[result(record)]).unwrap();

        assert_eq!(
            text,
            "name,rank,allergenClassification,immunogenClassification,immunogenProbability\n\
\">peptide_2\",\"0.3\",\"NON-ALLERGEN\",\"Probable IMMUNOGEN\",\"90%\"\n"
        );
    }

    #[test]
    fn test_export_escapes_quotes_and_commas() {
        let original = "HLA \"A\", variant";
        let record: TabularRecord = [("name", ">peptide_2"), ("allele", original)]
            .into_iter()
            .collect();
        let text = export_csv(&[result(record)]).unwrap();

        let data_line = text.lines().nth(1).unwrap();
        assert!(data_line.contains("\"HLA \"\"A\"\", variant\""));

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        let row = reader.records().next().unwrap().unwrap();
        let allele_idx = headers.iter().position(|h| h == "allele").unwrap();
        assert_eq!(&row[allele_idx], original);
    }

    #[test]
    fn test_export_empty_is_recoverable_error() {
        let err = export_csv(&[]).unwrap_err();
        assert!(matches!(err, ExportError::NothingToExport));
        assert_eq!(err.to_string(), "No data to export!");
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name("vacciology", date), "vacciology_analysis_2024-03-07.csv");
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let record: TabularRecord = [("name", ">peptide_2")].into_iter().collect();

        let path = write_export(&[result(record)], dir.path(), "vacciology", date).unwrap();
        assert_eq!(path.file_name().unwrap(), "vacciology_analysis_2024-03-07.csv");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("name,allergenClassification"));

        assert!(matches!(
            write_export(&[], dir.path(), "vacciology", date),
            Err(ExportError::NothingToExport)
        ));
    }
}
