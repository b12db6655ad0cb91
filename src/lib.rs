pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod report;

pub use config::{Preset, ReportConfig, ReportHeaders};
pub use error::{ReportError, Result};
pub use report::{BreedReport, generate_report};
