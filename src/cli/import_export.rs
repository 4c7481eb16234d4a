use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, info};

use crate::error::{FileOrgError, Result};
use crate::sim::Report;
use crate::types::{Key, Record};

/// Header names of the product/outlet dataset, in file order.
pub const DATASET_COLUMNS: [&str; 11] = [
    "ProductID",
    "Weight",
    "FatContent",
    "ProductVisibility",
    "ProductType",
    "MRP",
    "OutletID",
    "EstablishmentYear",
    "OutletSize",
    "LocationType",
    "OutletType",
];

/// Configuration for loading records from a CSV dataset.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Path to the CSV file.
    pub path: PathBuf,
    /// Column holding the organizing key.
    pub id_column: String,
}

impl DatasetConfig {
    /// Dataset at `path` keyed by the `ProductID` column.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            id_column: DATASET_COLUMNS[0].to_string(),
        }
    }

    /// Overrides the key column.
    pub fn id_column(mut self, name: impl Into<String>) -> Self {
        self.id_column = name.into();
        self
    }
}

struct Columns {
    id: usize,
    weight: usize,
    fat_content: usize,
    visibility: usize,
    product_type: usize,
    mrp: usize,
    outlet_id: usize,
    establishment_year: usize,
    outlet_size: usize,
    location_type: usize,
    outlet_type: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord, id_column: &str) -> Result<Self> {
        Ok(Self {
            id: find_column(headers, id_column)?,
            weight: find_column(headers, "Weight")?,
            fat_content: find_column(headers, "FatContent")?,
            visibility: find_column(headers, "ProductVisibility")?,
            product_type: find_column(headers, "ProductType")?,
            mrp: find_column(headers, "MRP")?,
            outlet_id: find_column(headers, "OutletID")?,
            establishment_year: find_column(headers, "EstablishmentYear")?,
            outlet_size: find_column(headers, "OutletSize")?,
            location_type: find_column(headers, "LocationType")?,
            outlet_type: find_column(headers, "OutletType")?,
        })
    }
}

/// Reads every row of the dataset into [`Record`]s, preserving file order.
///
/// The key column is typed as a whole: when every id parses as an integer the keys
/// are [`Key::Int`], otherwise all of them are [`Key::Text`].
pub fn load_records(cfg: &DatasetConfig) -> Result<Vec<Record>> {
    let mut reader = ReaderBuilder::new().from_path(&cfg.path)?;
    let headers = reader.headers()?.clone();
    let cols = Columns::resolve(&headers, &cfg.id_column)?;

    let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
    let numeric_ids = rows.iter().all(|row| {
        row.get(cols.id)
            .is_some_and(|raw| raw.trim().parse::<i64>().is_ok())
    });
    debug!(rows = rows.len(), numeric_ids, "dataset.rows.read");

    let mut records = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        records.push(build_record(row, idx + 1, &cols, &cfg.id_column, numeric_ids)?);
    }
    info!(
        path = %cfg.path.display(),
        records = records.len(),
        "dataset.loaded"
    );
    Ok(records)
}

fn build_record(
    row: &StringRecord,
    line: usize,
    cols: &Columns,
    id_column: &str,
    numeric_ids: bool,
) -> Result<Record> {
    let raw_id = get_required(row, line, cols.id, id_column)?;
    let key = if numeric_ids {
        raw_id
            .parse::<i64>()
            .map(Key::Int)
            .map_err(|err| FileOrgError::dataset(line, id_column, err.to_string()))?
    } else {
        Key::Text(raw_id.to_string())
    };
    let mrp = parse_number(get_required(row, line, cols.mrp, "MRP")?, line, "MRP")?;
    let product_type = get_required(row, line, cols.product_type, "ProductType")?;
    let weight = match get_optional(row, cols.weight) {
        Some(raw) => Some(parse_number(raw, line, "Weight")?),
        None => None,
    };
    let visibility = parse_number(
        get_required(row, line, cols.visibility, "ProductVisibility")?,
        line,
        "ProductVisibility",
    )?;
    let year_raw = get_required(row, line, cols.establishment_year, "EstablishmentYear")?;
    let year = year_raw
        .parse::<i32>()
        .map_err(|err| FileOrgError::dataset(line, "EstablishmentYear", err.to_string()))?;

    Ok(Record::new(key, product_type, mrp)
        .with_weight(weight)
        .with_fat_content(get_optional(row, cols.fat_content).unwrap_or_default())
        .with_visibility(visibility)
        .with_outlet_id(get_optional(row, cols.outlet_id).unwrap_or_default())
        .with_establishment_year(year)
        .with_outlet_size(get_optional(row, cols.outlet_size).map(str::to_string))
        .with_location_type(get_optional(row, cols.location_type).unwrap_or_default())
        .with_outlet_type(get_optional(row, cols.outlet_type).unwrap_or_default()))
}

/// Writes records in the dataset layout, one row each, in slice order.
pub fn write_records(path: &Path, records: &[Record]) -> Result<u64> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(DATASET_COLUMNS)?;
    for record in records {
        writer.write_record([
            record.key().to_string(),
            record.weight().map(|w| w.to_string()).unwrap_or_default(),
            record.fat_content().to_string(),
            record.visibility().to_string(),
            record.product_type().to_string(),
            record.mrp().to_string(),
            record.outlet_id().to_string(),
            record.establishment_year().to_string(),
            record.outlet_size().unwrap_or_default().to_string(),
            record.location_type().to_string(),
            record.outlet_type().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(records.len() as u64)
}

/// Writes the result table as CSV: organization, blocks accessed, total blocks used.
pub fn export_report(report: &Report, path: &Path) -> Result<u64> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    let rows = report.rows();
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "report.exported");
    Ok(rows.len() as u64)
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| FileOrgError::dataset(0, name, "column not found in header"))
}

fn get_required<'a>(
    record: &'a StringRecord,
    line: usize,
    idx: usize,
    name: &str,
) -> Result<&'a str> {
    get_optional(record, idx).ok_or_else(|| FileOrgError::dataset(line, name, "missing value"))
}

fn get_optional(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_number(raw: &str, line: usize, name: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|err| FileOrgError::dataset(line, name, format!("'{raw}': {err}")))
}
