use std::borrow::Borrow;
use std::collections::hash_map::{Entry, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Column of the prediction table that carries the peptide label.
pub const NAME_COLUMN: &str = "name";

/// Prefix marking a peptide label in the `name` column, e.g. `>peptide_1`.
pub const DEFAULT_ID_MARKER: char = '>';

/// Field names appended to a record by enrichment.
pub const ALLERGEN_FIELD: &str = "allergenClassification";
pub const IMMUNOGEN_FIELD: &str = "immunogenClassification";
pub const PROBABILITY_FIELD: &str = "immunogenProbability";

/// Columns of the results table, in display order.
pub const DISPLAY_COLUMNS: [&str; 13] = [
    "name",
    "allele",
    "start",
    "end",
    "length",
    "core_peptide",
    "peptide",
    "ic50",
    "rank",
    "adjusted_rank",
    ALLERGEN_FIELD,
    IMMUNOGEN_FIELD,
    PROBABILITY_FIELD,
];

const NON_ALLERGEN: &str = "NON-ALLERGEN";
const IMMUNOGEN: &str = "IMMUNOGEN";
const NON_IMMUNOGEN: &str = "NON-IMMUNOGEN";

// ---------------------------------------------------------------------------
// TabularRecord – one row of the prediction table
// ---------------------------------------------------------------------------

/// A single row of the prediction table: column name → value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularRecord {
    fields: Vec<(String, String)>,
}

impl TabularRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `column`, if the record has it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    /// Set `column` to `value`.
    ///
    /// An existing column keeps its position and takes the new value;
    /// a new column is appended.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    /// The `name` field (peptide label, possibly marker-prefixed).
    pub fn name(&self) -> Option<&str> {
        self.get(NAME_COLUMN)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TabularRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = TabularRecord::new();
        for (column, value) in iter {
            record.set(column, value);
        }
        record
    }
}

// ---------------------------------------------------------------------------
// PeptideId – join key across the three inputs
// ---------------------------------------------------------------------------

/// Canonical peptide identifier, e.g. `peptide_12`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeptideId(String);

impl PeptideId {
    pub fn new(id: impl Into<String>) -> Self {
        PeptideId(id.into())
    }

    /// Derive the id from a table `name` value by removing one leading `marker`.
    pub fn from_name(name: &str, marker: char) -> Self {
        PeptideId(name.strip_prefix(marker).unwrap_or(name).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PeptideId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeptideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Classifications
// ---------------------------------------------------------------------------

/// Whether an allergen label denotes the negative (non-allergen) class.
pub fn is_non_allergen(classification: &str) -> bool {
    classification.contains(NON_ALLERGEN)
}

/// Immunogenicity call for one peptide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmunogenCall {
    /// Label such as `Probable IMMUNOGEN`.
    pub classification: String,
    /// Probability in percent; `None` when the report line carried none.
    pub probability: Option<u32>,
}

impl ImmunogenCall {
    /// Positive class: mentions `IMMUNOGEN` but not `NON-IMMUNOGEN`.
    pub fn is_immunogen(&self) -> bool {
        self.classification.contains(IMMUNOGEN) && !self.classification.contains(NON_IMMUNOGEN)
    }
}

// ---------------------------------------------------------------------------
// ReportMap – per-peptide extraction results
// ---------------------------------------------------------------------------

/// How a [`ReportMap`] resolves a second entry for the same peptide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// A later block replaces the earlier entry wholesale (no field merge).
    #[default]
    LastWriteWins,
    /// The first entry for a peptide is kept; later ones are discarded.
    FirstWriteWins,
}

/// Peptide id → extracted value, built under an explicit [`MergePolicy`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMap<V> {
    entries: HashMap<PeptideId, V>,
    policy: MergePolicy,
}

/// Allergen report: peptide → classification label.
pub type AllergenMap = ReportMap<String>;

/// Immunogen report: peptide → classification and probability.
pub type ImmunogenMap = ReportMap<ImmunogenCall>;

impl<V> Default for ReportMap<V> {
    fn default() -> Self {
        Self::with_policy(MergePolicy::default())
    }
}

impl<V> ReportMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MergePolicy) -> Self {
        ReportMap {
            entries: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Record `value` for `id` according to the map's policy.
    /// Returns `true` when an existing entry was replaced.
    pub fn record(&mut self, id: PeptideId, value: V) -> bool {
        match (self.entries.entry(id), self.policy) {
            (Entry::Vacant(slot), _) => {
                slot.insert(value);
                false
            }
            (Entry::Occupied(mut slot), MergePolicy::LastWriteWins) => {
                slot.insert(value);
                true
            }
            (Entry::Occupied(_), MergePolicy::FirstWriteWins) => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&V> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PeptideId, &V)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// EnrichedResult – a table row that passed the filter
// ---------------------------------------------------------------------------

/// A prediction row together with its classifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedResult {
    pub peptide: PeptideId,
    pub record: TabularRecord,
    pub allergen_classification: String,
    pub immunogen_classification: String,
    pub immunogen_probability: u32,
}

impl EnrichedResult {
    /// Probability as shown to the user, e.g. `90%`.
    pub fn probability_label(&self) -> String {
        format!("{}%", self.immunogen_probability)
    }

    /// The source row with the three enrichment fields applied.
    pub fn to_record(&self) -> TabularRecord {
        let mut record = self.record.clone();
        record.set(ALLERGEN_FIELD, self.allergen_classification.as_str());
        record.set(IMMUNOGEN_FIELD, self.immunogen_classification.as_str());
        record.set(PROBABILITY_FIELD, self.probability_label());
        record
    }

    /// Cells for [`DISPLAY_COLUMNS`]; missing columns render empty.
    pub fn display_cells(&self) -> Vec<String> {
        let record = self.to_record();
        DISPLAY_COLUMNS
            .iter()
            .map(|col| record.get(col).unwrap_or_default().to_string())
            .collect()
    }
}
