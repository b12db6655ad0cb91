use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic cattle-breed image metadata table.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Destination (.csv or .parquet)
    #[arg(default_value = "bovine_breeds_metadata.csv")]
    output: PathBuf,

    /// Number of image rows
    #[arg(short, long, default_value_t = 600)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Breeds drawn for the sample, with relative weights. Includes both spellings
/// of the Holstein and Brown Swiss labels plus breeds on neither list.
const BREEDS: [(&str, u32); 22] = [
    ("Ayrshire", 4),
    ("Banni", 3),
    ("Bargur", 2),
    ("Brown_Swiss", 3),
    ("Brown", 1),
    ("Deoni", 3),
    ("Gir", 6),
    ("Guernsey", 3),
    ("Hallikar", 2),
    ("Holstein_Friesian", 6),
    ("Holstein", 2),
    ("Jersey", 5),
    ("Ongole", 3),
    ("Rathi", 2),
    ("Sahiwal", 5),
    ("Tharparkar", 3),
    ("Toda", 1),
    ("Umblachery", 1),
    ("Kankrej", 2),
    ("Red_Sindhi", 2),
    ("Murrah", 2),
    ("Unknown", 1),
];

const SOURCES: [&str; 3] = ["field_survey", "kaggle", "dairy_farm"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn weighted<'a>(&mut self, choices: &[(&'a str, u32)]) -> &'a str {
        let total: u64 = choices.iter().map(|&(_, w)| u64::from(w)).sum();
        let mut pick = self.below(total);
        for &(name, w) in choices {
            if pick < u64::from(w) {
                return name;
            }
            pick -= u64::from(w);
        }
        choices[choices.len() - 1].0
    }
}

struct SampleRow {
    image: String,
    breed: String,
    source: &'static str,
    width: u32,
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Vec<SampleRow> {
    (0..rows)
        .map(|i| {
            let name = rng.weighted(&BREEDS);
            // Roughly one label in eight carries stray whitespace.
            let breed = match rng.below(16) {
                0 => format!(" {name}"),
                1 => format!("{name} "),
                _ => name.to_string(),
            };
            SampleRow {
                image: format!("{}_{i:05}.jpg", name.to_ascii_lowercase()),
                breed,
                source: SOURCES[rng.below(SOURCES.len() as u64) as usize],
                width: 480 + 32 * rng.below(20) as u32,
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).context("creating CSV")?;
    wtr.write_record(["image", "breed", "source", "width"])?;
    for row in rows {
        wtr.write_record([
            row.image.as_str(),
            row.breed.as_str(),
            row.source,
            row.width.to_string().as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("image", DataType::Utf8, false),
        Field::new("breed", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("width", DataType::UInt32, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.image.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.breed.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.source))),
            Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.width))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let rows = generate(args.rows, &mut rng);

    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&args.output, &rows)?,
        "parquet" | "pq" => write_parquet(&args.output, &rows)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!("Wrote {} image rows to {}", rows.len(), args.output.display());
    Ok(())
}
