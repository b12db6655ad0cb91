use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::filter::filtered_indices;
use super::model::ImageDataset;
use super::reference::ReferenceBreedList;

/// Row order of a finished report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BreedOrder {
    /// Same order as the reference list.
    #[default]
    Reference,
    /// Sorted by breed name (byte order).
    Alphabetical,
}

/// One output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreedCount {
    pub breed: String,
    pub count: usize,
}

/// Count matching records per reference breed.
///
/// Every reference name yields exactly one row, zero when the dataset has no
/// record for it; labels off the list never show up.
pub fn tally(
    dataset: &ImageDataset,
    reference: &ReferenceBreedList,
    order: BreedOrder,
) -> Vec<BreedCount> {
    let mut counts: HashMap<&str, usize> = HashMap::with_capacity(reference.len());
    for i in filtered_indices(dataset, reference) {
        if let Some(breed) = dataset.records[i].breed() {
            *counts.entry(breed).or_default() += 1;
        }
    }

    let mut rows: Vec<BreedCount> = reference
        .iter()
        .map(|breed| BreedCount {
            breed: breed.to_string(),
            count: counts.get(breed).copied().unwrap_or(0),
        })
        .collect();

    if order == BreedOrder::Alphabetical {
        rows.sort_by(|a, b| a.breed.cmp(&b.breed));
    }
    rows
}
