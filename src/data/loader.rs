use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, bail};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{ImageDataset, ImageRecord};
use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an image metadata table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row followed by data rows
/// * `.json`         – `[{ "breed": "...", ...other columns }, ...]`
/// * `.parquet`      – any schema; `column` is cast to text
///
/// Only `column` is retained from each row. A file that lacks it fails with
/// [`ReportError::MissingColumn`]; one that is absent or cannot be opened for
/// reading fails with [`ReportError::InputNotFound`].
pub fn load_file(path: &Path, column: &str) -> Result<ImageDataset> {
    if !path.is_file() || std::fs::File::open(path).is_err() {
        return Err(ReportError::InputNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path, column, b',')?,
        "tsv" => load_csv(path, column, b'\t')?,
        "json" => load_json(path, column)?,
        "parquet" | "pq" => load_parquet(path, column)?,
        other => return Err(ReportError::UnsupportedFormat(other.to_string())),
    };

    log::info!("Loaded {} from {}", dataset, path.display());
    Ok(dataset)
}

fn missing_column(path: &Path, column: &str) -> ReportError {
    ReportError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Rows shorter than the header are accepted; their missing cells read as null.
fn load_csv(path: &Path, column: &str, delimiter: u8) -> Result<ImageDataset> {
    let read_err = |e| ReportError::input_read(path, e);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")
        .map_err(read_err)?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")
        .map_err(read_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let idx = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| missing_column(path, column))?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result
            .with_context(|| format!("CSV row {row_no}"))
            .map_err(read_err)?;
        records.push(ImageRecord::new(row_no, record.get(idx)));
    }

    Ok(ImageDataset::new(records, headers))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "image": "gir_001.jpg", "breed": "Gir" },
///   { "image": "toda_014.jpg", "breed": " Toda" },
///   ...
/// ]
/// ```
///
/// Non-string scalars are kept in their JSON text form; `null` is a null cell.
fn load_json(path: &Path, column: &str) -> Result<ImageDataset> {
    let (records, column_names) =
        parse_json_records(path, column).map_err(|e| ReportError::input_read(path, e))?;

    if !column_names.iter().any(|c| c == column) {
        return Err(missing_column(path, column));
    }
    Ok(ImageDataset::new(records, column_names))
}

fn parse_json_records(
    path: &Path,
    column: &str,
) -> anyhow::Result<(Vec<ImageRecord>, Vec<String>)> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: BTreeSet<String> = BTreeSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        columns.extend(obj.keys().cloned());

        let cell = obj.get(column).and_then(json_cell_text);
        records.push(ImageRecord::new(i, cell.as_deref()));
    }

    Ok((records, columns.into_iter().collect()))
}

fn json_cell_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. The breed column may be of any type Arrow can cast to
/// UTF-8; nulls stay null. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, column: &str) -> Result<ImageDataset> {
    let read_err = |e| ReportError::input_read(path, e);

    let file = std::fs::File::open(path)
        .context("opening parquet file")
        .map_err(read_err)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")
        .map_err(read_err)?;

    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    if !column_names.iter().any(|c| c == column) {
        return Err(missing_column(path, column));
    }

    let reader = builder
        .build()
        .context("building parquet reader")
        .map_err(read_err)?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result
            .context("reading parquet record batch")
            .map_err(read_err)?;
        let idx = batch
            .schema()
            .index_of(column)
            .map_err(|_| missing_column(path, column))?;
        append_text_column(batch.column(idx).as_ref(), records.len(), &mut records)
            .with_context(|| format!("column '{column}'"))
            .map_err(read_err)?;
    }

    Ok(ImageDataset::new(records, column_names))
}

/// Cast an Arrow column to UTF-8 and push one record per row, numbering rows
/// from `first_row`.
fn append_text_column(
    col: &dyn Array,
    first_row: usize,
    out: &mut Vec<ImageRecord>,
) -> anyhow::Result<()> {
    let text = match col.data_type() {
        DataType::Utf8 => None,
        DataType::Null => {
            out.extend((0..col.len()).map(|i| ImageRecord::new(first_row + i, None)));
            return Ok(());
        }
        other => Some(
            cast(col, &DataType::Utf8)
                .with_context(|| format!("cannot read {other:?} values as text"))?,
        ),
    };
    let strings = match &text {
        Some(casted) => casted.as_string::<i32>(),
        None => col.as_string::<i32>(),
    };
    if strings.len() != col.len() {
        bail!("cast produced {} values for {} rows", strings.len(), col.len());
    }

    for i in 0..strings.len() {
        let cell = (!strings.is_null(i)).then(|| strings.value(i));
        out.push(ImageRecord::new(first_row + i, cell));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::tempdir;

    fn breeds(ds: &ImageDataset) -> Vec<Option<&str>> {
        ds.records.iter().map(ImageRecord::breed).collect()
    }

    #[test]
    fn csv_keeps_only_breed_column_trimmed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        fs::write(&path, "image,breed,source\na.jpg, Gir ,kaggle\nb.jpg,Toda,field\n").unwrap();

        let ds = load_file(&path, "breed").unwrap();
        assert_eq!(ds.column_names, ["image", "breed", "source"]);
        assert_eq!(breeds(&ds), [Some("Gir"), Some("Toda")]);
    }

    #[test]
    fn csv_short_row_reads_as_null() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        fs::write(&path, "image,breed\na.jpg,Gir\nb.jpg\n").unwrap();

        let ds = load_file(&path, "breed").unwrap();
        assert_eq!(breeds(&ds), [Some("Gir"), None]);
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.tsv");
        fs::write(&path, "image\tbreed\na.jpg\tSahiwal\n").unwrap();

        let ds = load_file(&path, "breed").unwrap();
        assert_eq!(breeds(&ds), [Some("Sahiwal")]);
    }

    #[test]
    fn header_only_csv_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        fs::write(&path, "image,breed\n").unwrap();

        let ds = load_file(&path, "breed").unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn missing_file_is_input_not_found() {
        let err = load_file(Path::new("/nonexistent/breeds_12345.csv"), "breed").unwrap_err();
        assert!(matches!(err, ReportError::InputNotFound(_)));
    }

    #[test]
    fn directory_is_input_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        fs::create_dir(&path).unwrap();

        let err = load_file(&path, "breed").unwrap_err();
        assert!(matches!(err, ReportError::InputNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_input_not_found() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        fs::write(&path, "breed\nGir\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still open the file; nothing to check then.
        if fs::File::open(&path).is_ok() {
            return;
        }
        let err = load_file(&path, "breed").unwrap_err();
        assert!(matches!(err, ReportError::InputNotFound(_)));
    }

    #[test]
    fn csv_without_breed_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        fs::write(&path, "image,label\na.jpg,Gir\n").unwrap();

        let err = load_file(&path, "breed").unwrap_err();
        assert!(matches!(err, ReportError::MissingColumn { ref column, .. } if column == "breed"));
    }

    #[test]
    fn column_match_is_case_sensitive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        fs::write(&path, "image,Breed\na.jpg,Gir\n").unwrap();

        assert!(matches!(
            load_file(&path, "breed"),
            Err(ReportError::MissingColumn { .. })
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.xlsx");
        fs::write(&path, "not a table").unwrap();

        let err = load_file(&path, "breed").unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedFormat(ref ext) if ext == "xlsx"));
    }

    #[test]
    fn json_records_with_nulls_and_numbers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.json");
        fs::write(
            &path,
            r#"[{"image":"a.jpg","breed":" Gir"},{"image":"b.jpg","breed":null},{"image":"c.jpg","breed":7},{"image":"d.jpg"}]"#,
        )
        .unwrap();

        let ds = load_file(&path, "breed").unwrap();
        assert_eq!(breeds(&ds), [Some("Gir"), None, Some("7"), None]);
        assert_eq!(ds.column_names, ["breed", "image"]);
    }

    #[test]
    fn json_without_breed_key_anywhere() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.json");
        fs::write(&path, r#"[{"image":"a.jpg"}]"#).unwrap();

        assert!(matches!(
            load_file(&path, "breed"),
            Err(ReportError::MissingColumn { .. })
        ));
    }

    #[test]
    fn malformed_json_is_input_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.json");
        fs::write(&path, r#"{"breed": "Gir"}"#).unwrap();

        let err = load_file(&path, "breed").unwrap_err();
        assert!(matches!(err, ReportError::InputRead { .. }));
        assert!(err.to_string().contains("top-level JSON array"));
    }

    fn write_parquet(path: &Path, batch: RecordBatch) {
        let file = fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn parquet_string_column_with_null() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("image", DataType::Utf8, false),
            Field::new("breed", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["a.jpg", "b.jpg", "c.jpg"])),
                Arc::new(StringArray::from(vec![Some("Ongole "), None, Some("Rathi")])),
            ],
        )
        .unwrap();
        write_parquet(&path, batch);

        let ds = load_file(&path, "breed").unwrap();
        assert_eq!(breeds(&ds), [Some("Ongole"), None, Some("Rathi")]);
        assert_eq!(ds.records[2].row, 2);
    }

    #[test]
    fn parquet_numeric_column_is_cast_to_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.pq");
        let schema = Arc::new(Schema::new(vec![Field::new("code", DataType::Int64, false)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![3, 14]))]).unwrap();
        write_parquet(&path, batch);

        let ds = load_file(&path, "code").unwrap();
        assert_eq!(breeds(&ds), [Some("3"), Some("14")]);
    }

    #[test]
    fn parquet_without_breed_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.parquet");
        let schema = Arc::new(Schema::new(vec![Field::new("image", DataType::Utf8, false)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(vec!["a.jpg"]))]).unwrap();
        write_parquet(&path, batch);

        assert!(matches!(
            load_file(&path, "breed"),
            Err(ReportError::MissingColumn { .. })
        ));
    }
}
