use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Dataset, Restaurant};

/// Columns every source table must provide. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 6] =
    ["name", "address", "city", "province", "latitude", "longitude"];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be loaded. Any of these aborts the whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a top-level JSON array of record objects")]
    NotJsonRecords,
    #[error("unreadable Parquet file: {0}")]
    Parquet(#[from] ParquetError),
    #[error("unreadable Parquet record batch: {0}")]
    Arrow(#[from] ArrowError),
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: DataType },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a restaurant dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least the required columns
/// * `.json`    – `[{ "name": ..., "latitude": 37.7, ... }, ...]`
/// * `.parquet` – the required columns as Utf8 / numeric columns
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (restaurants, dropped) = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    let dataset = Dataset::from_restaurants(restaurants, dropped);
    log::info!(
        "Loaded {} restaurants in {} provinces from {} ({} incomplete rows dropped)",
        dataset.len(),
        dataset.provinces.len(),
        path.display(),
        dataset.dropped_rows
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Row cleaning
// ---------------------------------------------------------------------------

/// Uppercase, then strip every character that is neither a word character
/// nor whitespace. `"Joe's Café!"` → `"JOES CAFÉ"`.
///
/// Unicode `\w` includes combining marks, so a decomposed accent
/// (`"Cafe\u{301}"`) survives normalization along with its base letter.
pub fn normalize_name(raw: &str) -> String {
    static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    let re = PUNCTUATION
        .get_or_init(|| Regex::new(r"[^\w\s]").expect("valid punctuation pattern"));
    re.replace_all(&raw.to_uppercase(), "").into_owned()
}

/// One source row before validation. `None` marks a missing cell.
#[derive(Debug, Default)]
struct RawRow {
    name: Option<String>,
    address: Option<String>,
    city: Option<String>,
    province: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl RawRow {
    /// A complete restaurant, or `None` when any field is missing.
    fn complete(self) -> Option<Restaurant> {
        fn text(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        fn coord(v: Option<f64>) -> Option<f64> {
            v.filter(|c| c.is_finite())
        }
        Some(Restaurant {
            name: normalize_name(&text(self.name)?),
            address: text(self.address)?,
            city: text(self.city)?,
            province: text(self.province)?,
            latitude: coord(self.latitude)?,
            longitude: coord(self.longitude)?,
        })
    }
}

/// Keep complete rows, counting the rest.
fn keep_complete(rows: impl IntoIterator<Item = RawRow>) -> (Vec<Restaurant>, usize) {
    let mut dropped = 0;
    let kept = rows
        .into_iter()
        .filter_map(|raw| {
            let r = raw.complete();
            if r.is_none() {
                dropped += 1;
            }
            r
        })
        .collect();
    (kept, dropped)
}

fn parse_coord(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Cells as they appear in the CSV; empty cells deserialize to `None`.
#[derive(Debug, Deserialize)]
struct CsvRow {
    name: Option<String>,
    address: Option<String>,
    city: Option<String>,
    province: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
}

/// Short rows are accepted: their missing trailing cells read as empty, so
/// the row is dropped as incomplete instead of failing the load.
fn load_csv(path: &Path) -> Result<(Vec<Restaurant>, usize), LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(open(path)?);
    let headers = reader.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(LoadError::MissingColumn(col.to_string()));
        }
    }

    let mut rows = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        rows.push(RawRow {
            name: row.name,
            address: row.address,
            city: row.city,
            province: row.province,
            latitude: row.latitude.as_deref().and_then(parse_coord),
            longitude: row.longitude.as_deref().and_then(parse_coord),
        });
    }
    Ok(keep_complete(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "name": "McDonald's", "address": "800 N Canal Blvd", "city": "Thibodaux",
///     "province": "LA", "latitude": 29.814697, "longitude": -90.814742 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<(Vec<Restaurant>, usize), LoadError> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;
    let records = root.as_array().ok_or(LoadError::NotJsonRecords)?;

    let objects = records
        .iter()
        .map(|rec| rec.as_object().ok_or(LoadError::NotJsonRecords))
        .collect::<Result<Vec<_>, _>>()?;

    if !objects.is_empty() {
        for col in REQUIRED_COLUMNS {
            if !objects.iter().any(|obj| obj.contains_key(col)) {
                return Err(LoadError::MissingColumn(col.to_string()));
            }
        }
    }

    let rows = objects.into_iter().map(|obj| RawRow {
        name: obj.get("name").and_then(json_text),
        address: obj.get("address").and_then(json_text),
        city: obj.get("city").and_then(json_text),
        province: obj.get("province").and_then(json_text),
        latitude: obj.get("latitude").and_then(json_coord),
        longitude: obj.get("longitude").and_then(json_coord),
    });
    Ok(keep_complete(rows))
}

fn json_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_coord(val: &JsonValue) -> Option<f64> {
    match val {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => parse_coord(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the required columns.
///
/// Text columns may be Utf8, LargeUtf8, Utf8View or a dictionary of those
/// (Pandas categoricals). Coordinates may be Float64, Float32, Int32/Int64
/// or numeric text. Any other column type fails the load. Works with files
/// written by both **Pandas** (`df.to_parquet()`) and **Polars**
/// (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<(Vec<Restaurant>, usize), LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    for col in REQUIRED_COLUMNS {
        let field = builder
            .schema()
            .field_with_name(col)
            .map_err(|_| LoadError::MissingColumn(col.to_string()))?;
        let supported = match col {
            "latitude" | "longitude" => is_coord_type(field.data_type()),
            _ => is_text_type(field.data_type()),
        };
        if !supported {
            return Err(LoadError::UnsupportedColumnType {
                column: col.to_string(),
                data_type: field.data_type().clone(),
            });
        }
    }
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let name = column(&batch, "name")?;
        let address = column(&batch, "address")?;
        let city = column(&batch, "city")?;
        let province = column(&batch, "province")?;
        let lat = column(&batch, "latitude")?;
        let lon = column(&batch, "longitude")?;

        for row in 0..batch.num_rows() {
            rows.push(RawRow {
                name: arrow_text(&name, row),
                address: arrow_text(&address, row),
                city: arrow_text(&city, row),
                province: arrow_text(&province, row),
                latitude: arrow_coord(&lat, row),
                longitude: arrow_coord(&lon, row),
            });
        }
    }
    Ok(keep_complete(rows))
}

// -- Arrow helpers --

fn is_text_type(data_type: &DataType) -> bool {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => true,
        DataType::Dictionary(_, values) => is_text_type(values),
        _ => false,
    }
}

fn is_coord_type(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32
    ) || is_text_type(data_type)
}

/// Fetch a column, casting dictionary and view-encoded text to plain Utf8.
fn column(batch: &RecordBatch, name: &str) -> Result<ArrayRef, LoadError> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
    match col.data_type() {
        DataType::Utf8View | DataType::Dictionary(_, _) => Ok(cast(col, &DataType::Utf8)?),
        _ => Ok(col.clone()),
    }
}

/// Read a text cell; nulls and non-text columns read as missing.
fn arrow_text(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col.as_string_opt::<i32>().map(|s| s.value(row).to_string()),
        DataType::LargeUtf8 => col.as_string_opt::<i64>().map(|s| s.value(row).to_string()),
        _ => None,
    }
}

/// Read a coordinate cell as `f64`.
fn arrow_coord(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col.as_primitive_opt::<Float64Type>().map(|a| a.value(row)),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col.as_primitive_opt::<Int64Type>().map(|a| a.value(row) as f64),
        DataType::Int32 => col.as_primitive_opt::<Int32Type>().map(|a| a.value(row) as f64),
        DataType::Utf8 | DataType::LargeUtf8 => {
            arrow_text(col, row).as_deref().and_then(parse_coord)
        }
        _ => None,
    }
}
