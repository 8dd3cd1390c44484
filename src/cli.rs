//! Defines command-line interface options using `clap` for the terragrid binary.
//!
//! Every flag is optional; with none given the run matches [`Config::default`].

use crate::config::{Config, DEFAULT_OUTPUT_ROOT, DEFAULT_POINTS_PATH};
use crate::netcdf_io::TERRACLIMATE_BASE_URL;
use crate::sampler::ValueDecoding;
use clap::Parser;
use std::path::PathBuf;

/// Sample TerraClimate monthly grids at point locations
#[derive(Parser, Debug)]
#[command(
    name = "terragrid",
    version,
    about = "Download TerraClimate monthly variables for grid points as CSV and GeoJSON"
)]
pub struct Args {
    /// Grid GeoJSON with grid-id, left, right, top and bottom properties
    #[arg(short, long, default_value = DEFAULT_POINTS_PATH)]
    pub points: PathBuf,

    /// Root directory for outputs; files go to <output-root>/<year-start>/
    #[arg(short, long, default_value = DEFAULT_OUTPUT_ROOT)]
    pub output_root: PathBuf,

    /// OPeNDAP root or local directory holding agg_terraclimate_<var>_1958_CurrentYear_GLOBE.nc
    #[arg(long, default_value = TERRACLIMATE_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value_t = 2023)]
    pub year_start: i32,

    #[arg(long, default_value_t = 2023)]
    pub year_end: i32,

    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month_start: u32,

    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month_end: u32,

    /// Comma-separated variable names. Defaults to all fourteen TerraClimate variables.
    #[arg(long, value_delimiter = ',')]
    pub variables: Option<Vec<String>>,

    /// Apply scale_factor and add_offset to the stored values
    #[arg(long, default_value_t = false)]
    pub decode_packed: bool,

    /// Hide the per-point progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    pub fn into_config(self) -> Config {
        let defaults = Config::default();
        Config {
            base_url: self.base_url,
            year_start: self.year_start,
            year_end: self.year_end,
            month_start: self.month_start,
            month_end: self.month_end,
            variables: self.variables.unwrap_or(defaults.variables),
            points_path: self.points,
            output_root: self.output_root,
            decoding: if self.decode_packed {
                ValueDecoding::Unpacked
            } else {
                ValueDecoding::Raw
            },
            show_progress: !self.no_progress,
        }
    }
}
