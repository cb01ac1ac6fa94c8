use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Catalog, Difficulty, VideoRecord};
use crate::color::{Rgb, DEFAULT_GRAY};

/// Columns a source file must carry (after header normalization) for the
/// load to proceed at all.
pub const REQUIRED_COLUMNS: [&str; 5] = ["title", "thumbnail_url", "url", "channel", "duration"];

/// A failed catalog load. Terminal for the attempt: the caller gets no
/// partial catalog and should stop rather than treat the failure as an
/// empty result set.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing required columns: {0:?}")]
    MissingColumns(Vec<String>),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("reading catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing catalog file: {0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a video catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat scalar columns, one row per video
/// * `.json`    – records-oriented array: `[{ "title": ..., ... }, ...]`
/// * `.csv`     – header row with column names
///
/// Header names are normalized (trimmed, lower-cased, spaces to
/// underscores) before the required-column check, so `"Thumbnail URL"`
/// satisfies `thumbnail_url`.
pub fn load_file(path: &Path) -> Result<Catalog, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let catalog = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }?;

    info!(
        "loaded {} records ({} categories) from {}",
        catalog.len(),
        catalog.categories.len(),
        path.display()
    );
    Ok(catalog)
}

/// Normalize a source column name: trim, lowercase, spaces to underscores.
fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

// ---------------------------------------------------------------------------
// Row assembly (shared by all formats)
// ---------------------------------------------------------------------------

/// A parsed source cell, before derivation.
#[derive(Debug, Clone)]
enum Cell {
    Text(String),
    Number(f64),
    /// A ready-made 3-component color (JSON `[r, g, b]` arrays).
    Color(Rgb),
    Null,
}

impl Cell {
    fn as_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Color(rgb) => rgb.to_hex(),
            Cell::Null => String::new(),
        }
    }
}

type Row = BTreeMap<String, Cell>;

/// Validate the column set and turn raw rows into a [`Catalog`], deriving
/// `difficulty` and `dominant_rgb` per row.
fn build_catalog(columns: &BTreeSet<String>, rows: Vec<Row>) -> Result<Catalog, LoadError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !columns.contains(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let has_rgb_column = columns.contains("dominant_rgb");

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(row_no, row)| {
            let text = |col: &str| row.get(col).map(Cell::as_text).unwrap_or_default();

            let title = text("title");
            let transcript = text("transcript");
            let duration = coerce_duration(row.get("duration"), row_no);
            let difficulty = Difficulty::classify(&format!("{title} {transcript}"));
            let dominant_rgb = derive_rgb(&row, has_rgb_column);

            VideoRecord {
                thumbnail_url: text("thumbnail_url"),
                url: text("url"),
                channel: text("channel"),
                category: text("category"),
                title,
                transcript,
                duration,
                difficulty,
                dominant_rgb,
            }
        })
        .collect();

    Ok(Catalog::from_records(records))
}

/// Coerce a duration cell to non-negative minutes; anything unparseable
/// becomes 0 (the row is kept, not dropped).
fn coerce_duration(cell: Option<&Cell>, row_no: usize) -> f64 {
    let value = match cell {
        Some(Cell::Number(n)) => Some(*n),
        Some(Cell::Text(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        Some(v) => {
            debug!("row {row_no}: clamping duration {v} to 0");
            0.0
        }
        None => {
            debug!("row {row_no}: unparseable duration, defaulting to 0");
            0.0
        }
    }
}

/// Derive the dominant color for a row. A `dominant_rgb` column is used
/// as-is when present; otherwise `dominant_color_hex` is parsed, with
/// gray covering an absent column or any parse failure.
fn derive_rgb(row: &Row, has_rgb_column: bool) -> Rgb {
    let cell = if has_rgb_column {
        row.get("dominant_rgb")
    } else {
        row.get("dominant_color_hex")
    };
    match cell {
        Some(Cell::Color(rgb)) => *rgb,
        Some(Cell::Text(s)) => Rgb::parse_str(s),
        _ => DEFAULT_GRAY,
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "title": "Easy Granny Square",
///     "thumbnail_url": "https://...",
///     "url": "https://...",
///     "channel": "Stitch Lab",
///     "duration": 12.5,
///     "dominant_color_hex": "#ffb7c5"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Catalog, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| LoadError::Parse(format!("invalid JSON: {e}")))?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Parse("expected top-level JSON array".to_string()))?;

    let mut columns = BTreeSet::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Parse(format!("row {i} is not a JSON object")))?;

        let mut row = Row::new();
        for (key, val) in obj {
            let col = normalize_column(key);
            columns.insert(col.clone());
            row.insert(col, json_to_cell(val));
        }
        rows.push(row);
    }

    build_catalog(&columns, rows)
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
        JsonValue::Array(items) => json_array_to_color(items),
        JsonValue::Bool(b) => Cell::Text(b.to_string()),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

/// A 3-element array of numbers in 0..=255 is a ready-made color; anything
/// else is unusable and parses to null (which derives to gray downstream).
fn json_array_to_color(items: &[JsonValue]) -> Cell {
    if items.len() != 3 {
        return Cell::Null;
    }
    let mut channels = [0u8; 3];
    for (slot, item) in channels.iter_mut().zip(items) {
        match item.as_u64() {
            Some(v) if v <= 255 => *slot = v as u8,
            _ => return Cell::Null,
        }
    }
    Cell::Color(Rgb(channels[0], channels[1], channels[2]))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one video per record. All
/// cells arrive as text; numeric and color coercion happen downstream.
fn load_csv(path: &Path) -> Result<Catalog, LoadError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| LoadError::Parse(format!("opening CSV: {e}")))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Parse(format!("reading CSV headers: {e}")))?
        .iter()
        .map(normalize_column)
        .collect();
    let columns: BTreeSet<String> = headers.iter().cloned().collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| LoadError::Parse(format!("CSV row {row_no}: {e}")))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| {
                let cell = if value.is_empty() {
                    Cell::Null
                } else {
                    Cell::Text(value.to_string())
                };
                (col.clone(), cell)
            })
            .collect();
        rows.push(row);
    }

    build_catalog(&columns, rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet catalog with flat scalar columns (strings, ints, floats,
/// bools). Works with files written by both **Pandas** (`df.to_parquet()`)
/// and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Catalog, LoadError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| LoadError::Parse(format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| LoadError::Parse(format!("building parquet reader: {e}")))?;

    let mut columns = BTreeSet::new();
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch =
            batch_result.map_err(|e| LoadError::Parse(format!("reading record batch: {e}")))?;
        let schema = batch.schema();

        let fields: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| (i, normalize_column(f.name())))
            .collect();
        for (_, name) in &fields {
            columns.insert(name.clone());
        }

        for row_no in 0..batch.num_rows() {
            let row: Row = fields
                .iter()
                .map(|(col_idx, name)| {
                    (name.clone(), extract_cell(batch.column(*col_idx), row_no))
                })
                .collect();
            rows.push(row);
        }
    }

    build_catalog(&columns, rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                Cell::Text(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                Cell::Text(s.value(row).to_string())
            }
        }
        DataType::Int32 => match col.as_any().downcast_ref::<Int32Array>() {
            Some(arr) => Cell::Number(arr.value(row) as f64),
            None => Cell::Null,
        },
        DataType::Int64 => match col.as_any().downcast_ref::<Int64Array>() {
            Some(arr) => Cell::Number(arr.value(row) as f64),
            None => Cell::Null,
        },
        DataType::Float32 => match col.as_any().downcast_ref::<Float32Array>() {
            Some(arr) => Cell::Number(arr.value(row) as f64),
            None => Cell::Null,
        },
        DataType::Float64 => match col.as_any().downcast_ref::<Float64Array>() {
            Some(arr) => Cell::Number(arr.value(row)),
            None => Cell::Null,
        },
        DataType::Boolean => match col.as_any().downcast_ref::<BooleanArray>() {
            Some(arr) => Cell::Text(arr.value(row).to_string()),
            None => Cell::Null,
        },
        _ => Cell::Null,
    }
}
