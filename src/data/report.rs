use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use super::model::{AllergenMap, ImmunogenCall, ImmunogenMap, MergePolicy, PeptideId, ReportMap};

static BLOCK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Results for protein \((peptide_\d+)\):").expect("block header pattern is valid")
});

static PROBABILITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"probability of (\d+)%").expect("probability pattern is valid")
});

const ALLERGEN_MARKER: &str = "Classification based on the most similar protein:";
const IMMUNOGEN_LABELS: [&str; 2] = ["Probable IMMUNOGEN", "Probable NON-IMMUNOGEN"];
const PROBABILITY_SEPARATOR: &str = " with a probability of";

// ---------------------------------------------------------------------------
// Line extraction strategy
// ---------------------------------------------------------------------------

/// How a report is read line by line.
///
/// A report is a run of blocks, each opened by a header line naming a
/// peptide. [`parse_report`] tracks the current block and asks the
/// extractor for a value on every line.
pub trait LineExtractor {
    type Value;

    /// Peptide named by a block header line.
    fn header(&self, line: &str) -> Option<PeptideId> {
        BLOCK_HEADER
            .captures(line)
            .map(|caps| PeptideId::new(&caps[1]))
    }

    /// Value carried by a body line.
    fn extract(&self, line: &str) -> Option<Self::Value>;
}

/// Allergenicity report: `Classification based on the most similar protein: <label>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllergenExtractor;

impl LineExtractor for AllergenExtractor {
    type Value = String;

    fn extract(&self, line: &str) -> Option<String> {
        if !line.contains(ALLERGEN_MARKER) {
            return None;
        }
        line.split_once(':').map(|(_, rest)| rest.trim().to_string())
    }
}

/// Immunogenicity report: `<label> with a probability of <n>%`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmunogenExtractor;

impl LineExtractor for ImmunogenExtractor {
    type Value = ImmunogenCall;

    fn extract(&self, line: &str) -> Option<ImmunogenCall> {
        if !IMMUNOGEN_LABELS.iter().any(|label| line.contains(label)) {
            return None;
        }
        let classification = line
            .split(PROBABILITY_SEPARATOR)
            .next()
            .unwrap_or(line)
            .trim()
            .to_string();
        let probability = PROBABILITY
            .captures(line)
            .and_then(|caps| caps[1].parse::<u32>().ok());
        Some(ImmunogenCall {
            classification,
            probability,
        })
    }
}

// ---------------------------------------------------------------------------
// Block walker
// ---------------------------------------------------------------------------

/// Walk `text` block by block, storing each extracted value under the
/// peptide of the enclosing block.
///
/// Values seen before the first header have no peptide and are dropped.
/// Repeated peptides are resolved by `policy`.
pub fn parse_report<E: LineExtractor>(
    text: &str,
    extractor: &E,
    policy: MergePolicy,
) -> ReportMap<E::Value> {
    let mut map = ReportMap::with_policy(policy);
    let mut current: Option<PeptideId> = None;
    let mut orphans = 0usize;
    let mut repeats = 0usize;

    for line in text.lines().map(str::trim) {
        if let Some(id) = extractor.header(line) {
            current = Some(id);
        }
        let Some(value) = extractor.extract(line) else {
            continue;
        };
        match &current {
            Some(id) => {
                if map.record(id.clone(), value) {
                    repeats += 1;
                }
            }
            None => orphans += 1,
        }
    }

    if orphans > 0 {
        debug!("dropped {orphans} report line(s) outside any peptide block");
    }
    if repeats > 0 {
        debug!("{repeats} repeated peptide block(s) resolved as {policy:?}");
    }
    debug!("parsed report with {} peptide(s)", map.len());
    map
}

/// Parse an allergenicity report into peptide → classification.
pub fn parse_allergen_report(text: &str) -> AllergenMap {
    parse_report(text, &AllergenExtractor, MergePolicy::LastWriteWins)
}

/// Parse an immunogenicity report into peptide → classification and probability.
pub fn parse_immunogen_report(text: &str) -> ImmunogenMap {
    parse_report(text, &ImmunogenExtractor, MergePolicy::LastWriteWins)
}
