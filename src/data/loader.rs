use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Terminator, Trim};
use log::{debug, warn};

use super::model::{AllergenMap, ImmunogenMap, TabularRecord};
use super::report::{parse_allergen_report, parse_immunogen_report};

// ---------------------------------------------------------------------------
// File entry-points
// ---------------------------------------------------------------------------

/// Read a prediction table from disk and parse it with [`parse_tabular`].
pub fn load_tabular_file(path: &Path) -> Result<Vec<TabularRecord>> {
    let text = read_text(path)?;
    Ok(parse_tabular(&text))
}

/// Read an allergenicity report from disk.
pub fn load_allergen_file(path: &Path) -> Result<AllergenMap> {
    let text = read_text(path)?;
    Ok(parse_allergen_report(&text))
}

/// Read an immunogenicity report from disk.
pub fn load_immunogen_file(path: &Path) -> Result<ImmunogenMap> {
    let text = read_text(path)?;
    Ok(parse_immunogen_report(&text))
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

// ---------------------------------------------------------------------------
// Prediction table parser
// ---------------------------------------------------------------------------

/// Parse comma-separated text into records.
///
/// Layout: the first line names the columns, every further non-blank line
/// is one record. There is no quoting: a `"` is an ordinary character and
/// every comma separates fields. Names and values are trimmed. Short rows
/// are padded with empty strings, extra trailing fields are dropped.
/// Only `\n` ends a row; a `\r` is kept unless trimming removes it.
pub fn parse_tabular(text: &str) -> Vec<TabularRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .trim(Trim::All)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(|h| h.to_string()).collect(),
        Err(e) => {
            warn!("unreadable table header: {e}");
            return Vec::new();
        }
    };
    if headers.is_empty() {
        return Vec::new();
    }

    let mut records: Vec<TabularRecord> = Vec::new();
    let mut row = StringRecord::new();
    loop {
        match reader.read_record(&mut row) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                warn!("skipping unreadable table row: {e}");
                continue;
            }
        }
        // Whitespace-only lines survive the reader as one empty field.
        if row.len() == 1 && row[0].is_empty() {
            continue;
        }
        if row.len() > headers.len() {
            debug!(
                "table line {}: dropping {} extra field(s)",
                row.position().map_or(0, |p| p.line()),
                row.len() - headers.len()
            );
        }
        records.push(
            headers
                .iter()
                .enumerate()
                .map(|(i, col)| (col.as_str(), row.get(i).unwrap_or_default()))
                .collect(),
        );
    }

    debug!("parsed {} table record(s) over {} column(s)", records.len(), headers.len());
    records
}
