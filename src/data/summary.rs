use std::collections::BTreeMap;

use serde::Serialize;

use super::model::EnrichedResult;

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

/// Aggregate counts for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub filtered: usize,
    /// Percentage of records kept, rounded to one decimal; 0 when there were none.
    pub success_rate: f64,
    /// Threshold the run was filtered at, when known.
    pub threshold: Option<u32>,
}

impl Summary {
    /// Success rate as shown to the user, e.g. `12.5%`.
    pub fn success_rate_label(&self) -> String {
        format!("{:.1}%", self.success_rate)
    }
}

/// Summarize a run from its input and output sizes.
pub fn summarize(total: usize, filtered: usize) -> Summary {
    let success_rate = if total == 0 {
        0.0
    } else {
        (filtered as f64 / total as f64 * 1000.0).round() / 10.0
    };
    Summary {
        total,
        filtered,
        success_rate,
        threshold: None,
    }
}

// ---------------------------------------------------------------------------
// Result distributions
// ---------------------------------------------------------------------------

/// Number of results per immunogen classification label.
pub fn classification_distribution(results: &[EnrichedResult]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for r in results {
        *counts.entry(r.immunogen_classification.clone()).or_default() += 1;
    }
    counts
}

/// Number of results per probability, keyed by its display label.
pub fn probability_distribution(results: &[EnrichedResult]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for r in results {
        *counts.entry(r.probability_label()).or_default() += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{PeptideId, TabularRecord};

    fn result(label: &str, probability: u32) -> EnrichedResult {
        EnrichedResult {
            peptide: PeptideId::new("peptide_1"),
            record: TabularRecord::new(),
            allergen_classification: "NON-ALLERGEN".into(),
            immunogen_classification: label.into(),
            immunogen_probability: probability,
        }
    }

    #[test]
    fn test_summarize_zero_total() {
        let summary = summarize(0, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert!(!summary.success_rate.is_nan());
        assert_eq!(summary.success_rate_label(), "0.0%");
    }

    #[test]
    fn test_summarize_rounds_to_one_decimal() {
        let summary = summarize(3, 1);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.filtered, 1);
        assert_eq!(summary.success_rate, 33.3);

        assert_eq!(summarize(3, 2).success_rate, 66.7);
        assert_eq!(summarize(8, 8).success_rate_label(), "100.0%");
    }

    #[test]
    fn test_distributions() {
        let results = vec![
            result("Probable IMMUNOGEN", 90),
            result("Probable IMMUNOGEN", 90),
            result("Likely IMMUNOGEN", 100),
        ];

        let by_class = classification_distribution(&results);
        assert_eq!(by_class.get("Probable IMMUNOGEN"), Some(&2));
        assert_eq!(by_class.get("Likely IMMUNOGEN"), Some(&1));

        let by_probability = probability_distribution(&results);
        let keys: Vec<&str> = by_probability.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["100%", "90%"]);
        assert!(classification_distribution(&[]).is_empty());
    }
}
