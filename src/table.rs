//! Tabular results and CSV I/O
//!
//! [`ResultTable`] holds the sampled values for one variable with a fixed
//! column layout: `label, lat, lon, close_lat, close_lon` followed by one
//! column per month in chronological order. [`Table`] is the untyped
//! header-plus-rows form that is written to and read back from CSV.

use crate::errors::{Result, TerraGridError};
use crate::sampler::{Point, SampledSeries};
use std::path::Path;

pub const LABEL_COLUMN: &str = "label";
pub const LAT_COLUMN: &str = "lat";
pub const LON_COLUMN: &str = "lon";
pub const CLOSE_LAT_COLUMN: &str = "close_lat";
pub const CLOSE_LON_COLUMN: &str = "close_lon";

/// Columns preceding the month columns, in output order
pub const FIXED_COLUMNS: [&str; 5] = [
    LABEL_COLUMN,
    LAT_COLUMN,
    LON_COLUMN,
    CLOSE_LAT_COLUMN,
    CLOSE_LON_COLUMN,
];

/// Format a float for CSV: NaN is an empty cell, integral values keep a ".0"
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// A header row plus string cells
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, which must have one cell per column
    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(TerraGridError::LengthMismatch {
                context: format!("row {}", self.rows.len()),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Position of `name` in the header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like [`Table::column_index`], but a missing column is an error
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| TerraGridError::MissingColumn {
                column: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Read a CSV file whose first record is the header
    pub fn read_csv(path: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
        Self::from_csv_reader(reader)
    }

    /// Parse CSV text whose first record is the header
    pub fn from_csv_str(text: &str) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let columns = reader.headers()?.iter().map(str::to_string).collect();
        let mut table = Table::new(columns);
        for record in reader.records() {
            let record = record?;
            table.rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(table)
    }

    /// Write the header and all rows to `path`, replacing any existing file
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// One sampled point
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub label: String,
    pub lat: f64,
    pub lon: f64,
    pub close_lat: f64,
    pub close_lon: f64,
    pub values: Vec<f64>,
}

/// Sampled values for one variable, one row per point
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    month_labels: Vec<String>,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Pair points with their series under the given month labels
    ///
    /// # Errors
    ///
    /// Returns [`TerraGridError::LengthMismatch`] if the number of series differs
    /// from the number of points, or if any series length differs from the
    /// number of month labels.
    pub fn assemble(
        points: &[Point],
        series: &[SampledSeries],
        month_labels: &[String],
    ) -> Result<Self> {
        if points.len() != series.len() {
            return Err(TerraGridError::LengthMismatch {
                context: "sampled series per point".to_string(),
                expected: points.len(),
                actual: series.len(),
            });
        }

        let rows = points
            .iter()
            .zip(series)
            .map(|(point, sampled)| {
                if sampled.values.len() != month_labels.len() {
                    return Err(TerraGridError::LengthMismatch {
                        context: format!("month columns for '{}'", point.label),
                        expected: month_labels.len(),
                        actual: sampled.values.len(),
                    });
                }
                Ok(ResultRow {
                    label: point.label.clone(),
                    lat: point.lat,
                    lon: point.lon,
                    close_lat: sampled.grid_lat,
                    close_lon: sampled.grid_lon,
                    values: sampled.values.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            month_labels: month_labels.to_vec(),
            rows,
        })
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Column names in output order
    pub fn columns(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.month_labels.iter().cloned())
            .collect()
    }

    /// Render every cell as text
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(self.columns());
        for row in &self.rows {
            let mut cells = vec![
                row.label.clone(),
                format_float(row.lat),
                format_float(row.lon),
                format_float(row.close_lat),
                format_float(row.close_lon),
            ];
            cells.extend(row.values.iter().map(|&v| format_float(v)));
            table.rows.push(cells);
        }
        table
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        self.to_table().write_csv(path)
    }
}
