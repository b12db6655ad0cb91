use std::path::PathBuf;

use clap::Parser;

use crate::config::{Preset, ReportConfig};
use crate::data::tally::BreedOrder;
use crate::error::Result;

#[derive(Debug, Parser)]
#[command(name = "breed-tally")]
#[command(about = "Count images per cattle breed against a reference breed list", long_about = None)]
pub struct Cli {
    /// Input metadata table (.csv, .tsv, .json, .parquet)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Built-in defaults to start from
    #[arg(long, value_enum, default_value_t = Preset::Final)]
    pub preset: Preset,

    /// JSON config file; replaces the preset, flags still override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reference breeds, comma separated (replaces the configured list)
    #[arg(short, long, value_delimiter = ',')]
    pub breeds: Option<Vec<String>>,

    /// Name of the breed column in the input
    #[arg(long)]
    pub column: Option<String>,

    /// Row order of the report
    #[arg(long, value_enum)]
    pub order: Option<BreedOrder>,

    /// Print the total image count after the table
    #[arg(long, conflicts_with = "no_total")]
    pub total: bool,

    /// Never print the total image count
    #[arg(long)]
    pub no_total: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the effective config: preset or config file, then flags.
    pub fn resolve_config(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::load(path)?,
            None => self.preset.config(),
        };

        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(breeds) = &self.breeds {
            config.reference_breeds = breeds.clone();
        }
        if let Some(column) = &self.column {
            config.breed_column = column.clone();
        }
        if let Some(order) = self.order {
            config.order = order;
        }
        if self.total {
            config.show_total = true;
        } else if self.no_total {
            config.show_total = false;
        }

        Ok(config)
    }
}
