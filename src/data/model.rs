use std::fmt;

// ---------------------------------------------------------------------------
// ImageRecord – one row of the metadata table
// ---------------------------------------------------------------------------

/// A single image row. Only the breed cell is kept; every other column of the
/// source table is dropped at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Zero-based data row number in the source file (header excluded).
    pub row: usize,
    /// Breed label with surrounding whitespace removed.
    /// `None` when the source cell is null (JSON `null`, Parquet null).
    pub breed: Option<String>,
}

impl ImageRecord {
    /// Build a record from a raw cell, trimming the label.
    pub fn new(row: usize, raw_breed: Option<&str>) -> Self {
        Self {
            row,
            breed: raw_breed.map(|b| b.trim().to_string()),
        }
    }

    pub fn breed(&self) -> Option<&str> {
        self.breed.as_deref()
    }
}

// ---------------------------------------------------------------------------
// ImageDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The parsed metadata table.
#[derive(Debug, Clone, Default)]
pub struct ImageDataset {
    /// All rows, in file order.
    pub records: Vec<ImageRecord>,
    /// Column names found in the source, in source order.
    pub column_names: Vec<String>,
}

impl ImageDataset {
    pub fn new(records: Vec<ImageRecord>, column_names: Vec<String>) -> Self {
        Self {
            records,
            column_names,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Display for ImageDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows, columns [{}]",
            self.records.len(),
            self.column_names.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_trims_breed() {
        let rec = ImageRecord::new(0, Some("  Gir \t"));
        assert_eq!(rec.breed(), Some("Gir"));
    }

    #[test]
    fn null_breed_stays_null() {
        let rec = ImageRecord::new(4, None);
        assert_eq!(rec.breed(), None);
        assert_eq!(rec.row, 4);
    }
}
