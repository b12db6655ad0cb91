use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::config::{ReportConfig, ReportHeaders};
use crate::data::filter::{FilterSummary, summarize};
use crate::data::loader::load_file;
use crate::data::model::ImageDataset;
use crate::data::reference::ReferenceBreedList;
use crate::data::tally::{BreedCount, tally};
use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// BreedReport – the finished table
// ---------------------------------------------------------------------------

/// Per-breed image counts, one row per reference breed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreedReport {
    pub rows: Vec<BreedCount>,
    pub headers: ReportHeaders,
    /// How the input rows split against the reference list.
    pub summary: FilterSummary,
}

impl BreedReport {
    pub fn build(
        dataset: &ImageDataset,
        reference: &ReferenceBreedList,
        config: &ReportConfig,
    ) -> Self {
        Self {
            rows: tally(dataset, reference, config.order),
            headers: config.headers.clone(),
            summary: summarize(dataset, reference),
        }
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// The report as CSV: header row, then one `breed,count` line per row.
    pub fn to_csv(&self) -> io::Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record([&self.headers.breed, &self.headers.count])
            .map_err(io::Error::other)?;
        for row in &self.rows {
            wtr.write_record([row.breed.as_str(), row.count.to_string().as_str()])
                .map_err(io::Error::other)?;
        }
        wtr.into_inner()
            .map_err(|e| io::Error::other(e.to_string()))
    }

    /// Write the CSV to `path`. The file appears complete or not at all.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let write_err = |source| ReportError::OutputWriteFailure {
            path: path.to_path_buf(),
            source,
        };
        let data = self.to_csv().map_err(write_err)?;
        atomic_write(path, &data).map_err(write_err)?;
        log::info!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Aligned text table for the console.
    pub fn render_table(&self) -> anyhow::Result<String> {
        let schema = Arc::new(Schema::new(vec![
            Field::new(&self.headers.breed, DataType::Utf8, false),
            Field::new(&self.headers.count, DataType::UInt64, false),
        ]));
        let breeds = StringArray::from_iter_values(self.rows.iter().map(|r| r.breed.as_str()));
        let counts = UInt64Array::from_iter_values(self.rows.iter().map(|r| r.count as u64));
        let batch = RecordBatch::try_new(schema, vec![Arc::new(breeds), Arc::new(counts)])?;
        Ok(pretty_format_batches(&[batch])?.to_string())
    }

    /// Echo a rendered table (and, when asked, the total) to `out`.
    fn echo(&self, table: &str, out: &mut impl Write, show_total: bool) -> Result<()> {
        writeln!(out, "{table}").map_err(stdout_err)?;
        if show_total {
            writeln!(out, "\nTotal images: {}", self.total()).map_err(stdout_err)?;
        }
        Ok(())
    }
}

fn stdout_err(source: io::Error) -> ReportError {
    ReportError::OutputWriteFailure {
        path: PathBuf::from("<stdout>"),
        source,
    }
}

/// Write `data` to `path` via a sibling temp file and rename.
fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("output path has no file name"))?;

    let tmp = parent.join(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let result = (|| {
        let mut w = BufWriter::new(File::create(&tmp)?);
        w.write_all(data)?;
        w.flush()?;
        let _ = w.get_ref().sync_all();
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Run one report: validate `config`, load and count the input, write the CSV,
/// then echo the table to `out`.
///
/// A run that fails at any step leaves no output file behind.
pub fn generate_report(config: &ReportConfig, out: &mut impl Write) -> Result<BreedReport> {
    let reference = config.validate()?;
    let dataset = load_file(&config.input_path, &config.breed_column)?;
    let report = BreedReport::build(&dataset, &reference, config);

    let summary = &report.summary;
    log::debug!(
        "{} of {} rows matched; {} null, {} off-list",
        summary.matched,
        dataset.len(),
        summary.null_rows.len(),
        summary.unmatched_rows()
    );
    if let Some(first) = summary.null_rows.first() {
        log::debug!(
            "Skipped {} rows with no breed, first at row {first}",
            summary.null_rows.len()
        );
    }
    for (label, rows) in &summary.unmatched {
        log::debug!(
            "Skipped {} rows labelled {label:?}, first at row {}",
            rows.len(),
            rows[0]
        );
    }

    let table = report
        .render_table()
        .map_err(|e| stdout_err(io::Error::other(e.to_string())))?;
    report.write_csv(&config.output_path)?;
    if let Err(err) = report.echo(&table, out, config.show_total) {
        let _ = fs::remove_file(&config.output_path);
        return Err(err);
    }
    Ok(report)
}
