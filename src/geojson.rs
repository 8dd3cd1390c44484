//! Table to GeoJSON point conversion
//!
//! Every row becomes a `Point` feature located at `[lon, lat]`. All other
//! columns are copied into the feature properties in table order, with one
//! value type inferred per column.

use crate::errors::{Result, TerraGridError};
use crate::table::{Table, LAT_COLUMN, LON_COLUMN};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[lon, lat]`
    pub coordinates: [f64; 2],
}

impl Geometry {
    pub fn point(lon: f64, lat: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [lon, lat],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    /// Pretty-printed with two-space indentation
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

/// Value type shared by every cell of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every cell is an integer and none is empty
    Integer,
    /// Every non-empty cell is a number; empty cells are null
    Float,
    /// Cells are kept verbatim; empty cells are null
    Text,
}

impl ColumnKind {
    /// Infer one type for a whole column, the way a data-frame reader does.
    ///
    /// A column of integers with any empty cell is widened to float, since the
    /// gap can only be represented as a missing float.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a str>) -> Self {
        let mut kind = ColumnKind::Integer;
        for cell in cells {
            if cell.is_empty() {
                kind = ColumnKind::Float;
            } else if cell.parse::<i64>().is_ok() {
                continue;
            } else if cell.parse::<f64>().is_ok() {
                kind = ColumnKind::Float;
            } else {
                return ColumnKind::Text;
            }
        }
        kind
    }

    /// Convert one cell of a column of this kind
    pub fn to_json(self, cell: &str) -> Value {
        if cell.is_empty() {
            return Value::Null;
        }
        match self {
            ColumnKind::Integer => cell
                .parse::<i64>()
                .map_or_else(|_| Value::String(cell.to_string()), |i| Value::Number(i.into())),
            ColumnKind::Float => cell
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map_or(Value::Null, Value::Number),
            ColumnKind::Text => Value::String(cell.to_string()),
        }
    }
}

fn coordinate(table: &Table, row: usize, column: usize) -> Result<f64> {
    let cell = table.rows[row].get(column).map(String::as_str).unwrap_or("");
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| TerraGridError::InvalidValue {
            column: table.columns[column].clone(),
            row,
            value: cell.to_string(),
        })
}

/// Convert each table row into a point feature
///
/// # Errors
///
/// Fails with [`TerraGridError::MissingColumn`] if `lat` or `lon` is absent,
/// with [`TerraGridError::LengthMismatch`] if a row does not have one cell per
/// column, and with [`TerraGridError::InvalidValue`] if a coordinate cell is
/// not a number. No partial collection is returned.
pub fn table_to_features(table: &Table) -> Result<FeatureCollection> {
    let lat_idx = table.require_column(LAT_COLUMN)?;
    let lon_idx = table.require_column(LON_COLUMN)?;

    for (row, cells) in table.rows.iter().enumerate() {
        if cells.len() != table.columns.len() {
            return Err(TerraGridError::LengthMismatch {
                context: format!("row {}", row),
                expected: table.columns.len(),
                actual: cells.len(),
            });
        }
    }

    let kinds: Vec<ColumnKind> = (0..table.columns.len())
        .map(|column| ColumnKind::infer(table.rows.iter().map(|cells| cells[column].as_str())))
        .collect();

    let features = (0..table.rows.len())
        .map(|row| {
            let lat = coordinate(table, row, lat_idx)?;
            let lon = coordinate(table, row, lon_idx)?;

            let properties = table
                .columns
                .iter()
                .zip(&table.rows[row])
                .zip(&kinds)
                .enumerate()
                .filter(|(idx, _)| *idx != lat_idx && *idx != lon_idx)
                .map(|(_, ((name, cell), kind))| (name.clone(), kind.to_json(cell)))
                .collect();

            Ok(Feature {
                kind: "Feature".to_string(),
                geometry: Geometry::point(lon, lat),
                properties,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection::new(features))
}

/// Read `csv_path`, convert it and write the collection to `geojson_path`
pub fn csv_to_geojson(csv_path: &Path, geojson_path: &Path) -> Result<FeatureCollection> {
    let table = Table::read_csv(csv_path)?;
    let collection = table_to_features(&table)?;
    collection.write(geojson_path)?;
    println!("✅ GeoJSON file created: {}", geojson_path.display());
    Ok(collection)
}
