use log::debug;

use super::model::{
    is_non_allergen, AllergenMap, EnrichedResult, ImmunogenMap, PeptideId, TabularRecord,
    DEFAULT_ID_MARKER,
};

// ---------------------------------------------------------------------------
// Join / filter predicate
// ---------------------------------------------------------------------------

/// Join the prediction table with both reports and keep the candidates.
///
/// Uses the default `>` name marker; see [`join_and_filter_with_marker`].
pub fn join_and_filter(
    records: &[TabularRecord],
    allergens: &AllergenMap,
    immunogens: &ImmunogenMap,
    threshold: u32,
) -> Vec<EnrichedResult> {
    join_and_filter_with_marker(records, allergens, immunogens, threshold, DEFAULT_ID_MARKER)
}

/// Return the enriched rows whose peptide passes every check, in table order.
///
/// A row passes when its peptide (the `name` value with one leading
/// `marker` removed):
/// * has an entry in both `allergens` and `immunogens`,
/// * is classified `NON-ALLERGEN`,
/// * is a positive `IMMUNOGEN` call (not `NON-IMMUNOGEN`),
/// * has an immunogen probability equal to `threshold`.
///
/// Several rows for the same peptide (one per allele) are tested
/// independently against the same classifications.
pub fn join_and_filter_with_marker(
    records: &[TabularRecord],
    allergens: &AllergenMap,
    immunogens: &ImmunogenMap,
    threshold: u32,
    marker: char,
) -> Vec<EnrichedResult> {
    let results: Vec<EnrichedResult> = records
        .iter()
        .filter_map(|record| {
            let peptide = PeptideId::from_name(record.name().unwrap_or_default(), marker);
            let allergen = allergens.get(peptide.as_str())?;
            let immunogen = immunogens.get(peptide.as_str())?;

            if !is_non_allergen(allergen) || !immunogen.is_immunogen() {
                return None;
            }
            let probability = immunogen.probability.filter(|p| *p == threshold)?;

            Some(EnrichedResult {
                peptide,
                record: record.clone(),
                allergen_classification: allergen.clone(),
                immunogen_classification: immunogen.classification.clone(),
                immunogen_probability: probability,
            })
        })
        .collect();

    debug!(
        "{} of {} record(s) pass at threshold {threshold}%",
        results.len(),
        records.len()
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ImmunogenCall;

    fn record(name: &str, allele: &str) -> TabularRecord {
        [("name", name), ("allele", allele)].into_iter().collect()
    }

    fn fixture() -> (Vec<TabularRecord>, AllergenMap, ImmunogenMap) {
        let records = vec![
            record(">peptide_1", "HLA-A*01:01"),
            record(">peptide_2", "HLA-A*02:01"),
        ];

        let mut allergens = AllergenMap::new();
        allergens.record(PeptideId::new("peptide_1"), "ALLERGEN".into());
        allergens.record(PeptideId::new("peptide_2"), "NON-ALLERGEN".into());

        let mut immunogens = ImmunogenMap::new();
        immunogens.record(
            PeptideId::new("peptide_1"),
            ImmunogenCall {
                classification: "Probable IMMUNOGEN".into(),
                probability: Some(80),
            },
        );
        immunogens.record(
            PeptideId::new("peptide_2"),
            ImmunogenCall {
                classification: "Probable IMMUNOGEN".into(),
                probability: Some(90),
            },
        );
        (records, allergens, immunogens)
    }

    #[test]
    fn test_filter_keeps_non_allergen_immunogen_at_threshold() {
        let (records, allergens, immunogens) = fixture();
        let results = join_and_filter(&records, &allergens, &immunogens, 90);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].peptide.as_str(), "peptide_2");
        assert_eq!(results[0].allergen_classification, "NON-ALLERGEN");
        assert_eq!(results[0].immunogen_classification, "Probable IMMUNOGEN");
        assert_eq!(results[0].probability_label(), "90%");
    }

    #[test]
    fn test_threshold_is_exact() {
        let (records, allergens, immunogens) = fixture();
        assert!(join_and_filter(&records, &allergens, &immunogens, 80).is_empty());
        assert!(join_and_filter(&records, &allergens, &immunogens, 89).is_empty());
        assert!(join_and_filter(&records, &allergens, &immunogens, 100).is_empty());
    }

    #[test]
    fn test_peptide_missing_from_a_report_is_excluded() {
        let (mut records, allergens, mut immunogens) = fixture();
        records.push(record(">peptide_3", "HLA-B*07:02"));
        immunogens.record(
            PeptideId::new("peptide_3"),
            ImmunogenCall {
                classification: "Probable IMMUNOGEN".into(),
                probability: Some(90),
            },
        );

        let results = join_and_filter(&records, &allergens, &immunogens, 90);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].peptide.as_str(), "peptide_2");
    }

    #[test]
    fn test_non_immunogen_and_absent_probability_are_excluded() {
        let (records, allergens, mut immunogens) = fixture();
        immunogens.record(
            PeptideId::new("peptide_2"),
            ImmunogenCall {
                classification: "Probable NON-IMMUNOGEN".into(),
                probability: Some(90),
            },
        );
        assert!(join_and_filter(&records, &allergens, &immunogens, 90).is_empty());

        immunogens.record(
            PeptideId::new("peptide_2"),
            ImmunogenCall {
                classification: "Probable IMMUNOGEN".into(),
                probability: None,
            },
        );
        assert!(join_and_filter(&records, &allergens, &immunogens, 90).is_empty());
    }

    #[test]
    fn test_repeated_peptide_rows_keep_table_order() {
        let (mut records, allergens, immunogens) = fixture();
        records.insert(0, record(">peptide_2", "HLA-B*44:02"));

        let results = join_and_filter(&records, &allergens, &immunogens, 90);
        let alleles: Vec<&str> = results
            .iter()
            .map(|r| r.record.get("allele").unwrap())
            .collect();
        assert_eq!(alleles, vec!["HLA-B*44:02", "HLA-A*02:01"]);
    }

    #[test]
    fn test_unmarked_names_and_custom_marker() {
        let (_, allergens, immunogens) = fixture();
        let plain = vec![record("peptide_2", "HLA-A*02:01")];
        assert_eq!(join_and_filter(&plain, &allergens, &immunogens, 90).len(), 1);

        let hashed = vec![record("#peptide_2", "HLA-A*02:01")];
        assert!(join_and_filter(&hashed, &allergens, &immunogens, 90).is_empty());
        assert_eq!(
            join_and_filter_with_marker(&hashed, &allergens, &immunogens, 90, '#').len(),
            1
        );
    }

    #[test]
    fn test_empty_inputs_yield_nothing() {
        let (records, allergens, immunogens) = fixture();
        assert!(join_and_filter(&[], &allergens, &immunogens, 90).is_empty());
        assert!(join_and_filter(&records, &AllergenMap::new(), &immunogens, 90).is_empty());
        assert!(join_and_filter(&records, &allergens, &ImmunogenMap::new(), 90).is_empty());
    }
}
