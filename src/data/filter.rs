use std::collections::BTreeMap;

use super::model::ImageDataset;
use super::reference::ReferenceBreedList;

// ---------------------------------------------------------------------------
// Filter predicate: keep rows whose breed is on the reference list
// ---------------------------------------------------------------------------

/// Return indices of records whose trimmed breed is on the reference list.
///
/// A record passes when:
/// * Its breed cell is null → fails
/// * Its breed matches a reference name exactly (case-sensitive) → passes
/// * Anything else → fails
pub fn filtered_indices(dataset: &ImageDataset, reference: &ReferenceBreedList) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| rec.breed().is_some_and(|b| reference.contains(b)))
        .map(|(i, _)| i)
        .collect()
}

/// How the rows of a dataset split against a reference list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub matched: usize,
    /// Source row numbers of null breed cells.
    pub null_rows: Vec<usize>,
    /// Labels not on the reference list, with the source rows carrying them.
    pub unmatched: BTreeMap<String, Vec<usize>>,
}

impl FilterSummary {
    pub fn unmatched_rows(&self) -> usize {
        self.unmatched.values().map(Vec::len).sum()
    }
}

pub fn summarize(dataset: &ImageDataset, reference: &ReferenceBreedList) -> FilterSummary {
    let mut summary = FilterSummary::default();
    for rec in &dataset.records {
        match rec.breed() {
            None => summary.null_rows.push(rec.row),
            Some(b) if reference.contains(b) => summary.matched += 1,
            Some(b) => summary.unmatched.entry(b.to_string()).or_default().push(rec.row),
        }
    }
    summary
}
