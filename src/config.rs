//! Run configuration
//!
//! [`Config::default`] describes the standard download job: all of 2023, the
//! fourteen TerraClimate variables, Karnataka 4 km grid tiles as input.

use crate::dates::MonthRange;
use crate::errors::{Result, TerraGridError};
use crate::netcdf_io::TERRACLIMATE_BASE_URL;
use crate::sampler::ValueDecoding;
use std::path::PathBuf;

/// Variables downloaded by default, in processing order
pub const DEFAULT_VARIABLES: [&str; 14] = [
    "tmax", "aet", "tmin", "vap", "vpd", "ws", "def", "swe", "q", "soil", "PDSI", "pet", "ppt",
    "srad",
];

pub const DEFAULT_POINTS_PATH: &str = "./data/ka-grid-4km.geojson";
pub const DEFAULT_OUTPUT_ROOT: &str = "./data/weather-data";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// OPeNDAP root (or local directory) holding the aggregated files
    pub base_url: String,
    pub year_start: i32,
    pub year_end: i32,
    pub month_start: u32,
    pub month_end: u32,
    pub variables: Vec<String>,
    /// Grid GeoJSON with `grid-id`, `left`, `right`, `top`, `bottom`
    pub points_path: PathBuf,
    /// Outputs go to `<output_root>/<year_start>/`
    pub output_root: PathBuf,
    pub decoding: ValueDecoding,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: TERRACLIMATE_BASE_URL.to_string(),
            year_start: 2023,
            year_end: 2023,
            month_start: 1,
            month_end: 12,
            variables: DEFAULT_VARIABLES.iter().map(|v| v.to_string()).collect(),
            points_path: PathBuf::from(DEFAULT_POINTS_PATH),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            decoding: ValueDecoding::Raw,
            show_progress: true,
        }
    }
}

impl Config {
    /// Validated month span of the run
    pub fn month_range(&self) -> Result<MonthRange> {
        MonthRange::new(self.year_start, self.year_end, self.month_start, self.month_end)
    }

    /// Check the date bounds and variable list
    pub fn validate(&self) -> Result<()> {
        self.month_range()?;
        if self.variables.is_empty() {
            return Err(TerraGridError::Generic(
                "At least one variable must be requested".to_string(),
            ));
        }
        if let Some(blank) = self.variables.iter().find(|v| v.trim().is_empty()) {
            return Err(TerraGridError::Generic(format!(
                "Invalid variable name '{}'",
                blank
            )));
        }
        Ok(())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_root.join(self.year_start.to_string())
    }

    pub fn csv_path(&self, variable: &str) -> PathBuf {
        self.output_dir().join(format!("data_{}.csv", variable))
    }

    pub fn geojson_path(&self, variable: &str) -> PathBuf {
        self.output_dir().join(format!("data_{}.geojson", variable))
    }
}
