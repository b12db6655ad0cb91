use std::collections::HashSet;

use crate::error::{ReportError, Result};

/// The curated, ordered set of canonical breed names a report covers.
///
/// Guaranteed non-empty, free of duplicates, and free of blank names or names
/// with surrounding whitespace (those could never match a trimmed label).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceBreedList {
    names: Vec<String>,
    index: HashSet<String>,
}

impl ReferenceBreedList {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ReportError::InvalidConfiguration(
                "reference breed list is empty".into(),
            ));
        }

        let mut index = HashSet::with_capacity(names.len());
        for name in &names {
            if name.trim().is_empty() {
                return Err(ReportError::InvalidConfiguration(
                    "reference breed list contains a blank name".into(),
                ));
            }
            if name.trim() != name {
                return Err(ReportError::InvalidConfiguration(format!(
                    "reference breed {name:?} has surrounding whitespace"
                )));
            }
            if !index.insert(name.clone()) {
                return Err(ReportError::InvalidConfiguration(format!(
                    "reference breed {name:?} is listed more than once"
                )));
            }
        }

        Ok(Self { names, index })
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, breed: &str) -> bool {
        self.index.contains(breed)
    }

    /// Names in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
