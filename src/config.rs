use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::reference::ReferenceBreedList;
use crate::data::tally::BreedOrder;
use crate::error::{ReportError, Result};

pub const DEFAULT_INPUT: &str = "bovine_breeds_metadata.csv";
pub const DEFAULT_BREED_COLUMN: &str = "breed";

const FINAL_BREEDS: [&str; 16] = [
    "Ayrshire",
    "Banni",
    "Bargur",
    "Deoni",
    "Gir",
    "Guernsey",
    "Hallikar",
    "Holstein_Friesian",
    "Jersey",
    "Ongole",
    "Rathi",
    "Sahiwal",
    "Tharparkar",
    "Toda",
    "Umblachery",
    "Brown_Swiss",
];

const RESULTS_BREEDS: [&str; 16] = [
    "Ayrshire",
    "Banni",
    "Bargur",
    "Brown",
    "Deoni",
    "Gir",
    "Guernsey",
    "Hallikar",
    "Holstein",
    "Jersey",
    "Ongole",
    "Rathi",
    "Sahiwal",
    "Tharparkar",
    "Toda",
    "Umblachery",
];

/// Named default bundles. The two known breed lists disagree on two names and
/// on row order, so the choice between them is always explicit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Holstein_Friesian / Brown_Swiss, list order, `Breed,Image_Count`.
    #[default]
    Final,
    /// Holstein / Brown, alphabetical, `breed,count`, with a total line.
    Results,
}

impl Preset {
    pub fn config(self) -> ReportConfig {
        match self {
            Preset::Final => ReportConfig {
                input_path: DEFAULT_INPUT.into(),
                output_path: "final_class_distribution.csv".into(),
                reference_breeds: FINAL_BREEDS.iter().map(|b| b.to_string()).collect(),
                breed_column: DEFAULT_BREED_COLUMN.into(),
                order: BreedOrder::Reference,
                headers: ReportHeaders::default(),
                show_total: false,
            },
            Preset::Results => ReportConfig {
                input_path: DEFAULT_INPUT.into(),
                output_path: "class_distribution_final_16.csv".into(),
                reference_breeds: RESULTS_BREEDS.iter().map(|b| b.to_string()).collect(),
                breed_column: DEFAULT_BREED_COLUMN.into(),
                order: BreedOrder::Alphabetical,
                headers: ReportHeaders {
                    breed: "breed".into(),
                    count: "count".into(),
                },
                show_total: true,
            },
        }
    }
}

/// Column names of the written report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportHeaders {
    pub breed: String,
    pub count: String,
}

impl Default for ReportHeaders {
    fn default() -> Self {
        Self {
            breed: "Breed".into(),
            count: "Image_Count".into(),
        }
    }
}

/// Everything one report run needs. Missing fields in a config file fall back
/// to [`Preset::Final`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub reference_breeds: Vec<String>,
    pub breed_column: String,
    pub order: BreedOrder,
    pub headers: ReportHeaders,
    pub show_total: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Preset::Final.config()
    }
}

impl ReportConfig {
    /// Read a JSON config file. Fields it leaves out keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReportError::InvalidConfiguration(format!(
                "cannot read config {}: {e}",
                path.display()
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ReportError::InvalidConfiguration(format!("{}: {e}", path.display()))
        })
    }

    /// Check the whole config and build the reference list it describes.
    pub fn validate(&self) -> Result<ReferenceBreedList> {
        let reference = ReferenceBreedList::new(self.reference_breeds.iter().cloned())?;

        if self.breed_column.is_empty() {
            return Err(ReportError::InvalidConfiguration(
                "breed column name is empty".into(),
            ));
        }
        if self.headers.breed.is_empty() || self.headers.count.is_empty() {
            return Err(ReportError::InvalidConfiguration(
                "report header names must not be empty".into(),
            ));
        }
        if self.headers.breed == self.headers.count {
            return Err(ReportError::InvalidConfiguration(format!(
                "report headers are both {:?}",
                self.headers.breed
            )));
        }
        if self.input_path == self.output_path
            || same_file(&self.input_path, &self.output_path)
        {
            return Err(ReportError::InvalidConfiguration(format!(
                "output path {} would overwrite the input",
                self.output_path.display()
            )));
        }

        Ok(reference)
    }
}

/// Whether `output` names the existing file `input`, however it is spelled.
/// The output file itself may not exist yet, so only its directory is resolved.
fn same_file(input: &Path, output: &Path) -> bool {
    let Ok(input) = std::fs::canonicalize(input) else {
        return false;
    };
    let Some(name) = output.file_name() else {
        return false;
    };
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::canonicalize(parent).is_ok_and(|dir| dir.join(name) == input)
}
