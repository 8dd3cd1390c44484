//! End-to-end download job
//!
//! Loads the points, builds the month labels once, then for every variable in
//! turn: samples the grid, writes the CSV table and converts that CSV into a
//! GeoJSON point collection. The first error aborts the whole run.

use crate::config::Config;
use crate::data_source::GridSource;
use crate::errors::Result;
use crate::geojson::csv_to_geojson;
use crate::points::load_grid_points;
use crate::sampler::{Point, PointSampler};
use crate::table::ResultTable;
use log::info;
use std::fs;
use std::path::PathBuf;

/// Files written for one variable
#[derive(Debug, Clone, PartialEq)]
pub struct VariableOutput {
    pub variable: String,
    pub csv_path: PathBuf,
    pub geojson_path: PathBuf,
    pub rows: usize,
}

pub struct Pipeline<S: GridSource> {
    config: Config,
    sampler: PointSampler<S>,
}

impl<S: GridSource> Pipeline<S> {
    pub fn new(config: Config, source: S) -> Self {
        let sampler = PointSampler::new(source)
            .with_decoding(config.decoding)
            .with_progress(config.show_progress);
        Self { config, sampler }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load points from the configured grid file and process every variable
    pub fn run(&self) -> Result<Vec<VariableOutput>> {
        self.config.validate()?;
        let points = load_grid_points(&self.config.points_path)?;
        self.run_with_points(&points)
    }

    /// Process every configured variable for the given points
    pub fn run_with_points(&self, points: &[Point]) -> Result<Vec<VariableOutput>> {
        let months = self.config.month_range()?;
        let labels = months.labels();

        let output_dir = self.config.output_dir();
        fs::create_dir_all(&output_dir)?;
        info!(
            "Writing {} variables for {} points to {}",
            self.config.variables.len(),
            points.len(),
            output_dir.display()
        );

        let mut outputs = Vec::with_capacity(self.config.variables.len());
        for variable in &self.config.variables {
            println!("Processing : {}", variable);

            let sampled = self.sampler.sample(points, variable, &months)?;
            let table = ResultTable::assemble(points, &sampled.series, &labels)?;

            let csv_path = self.config.csv_path(variable);
            let geojson_path = self.config.geojson_path(variable);
            table.write_csv(&csv_path)?;
            info!("Wrote {} rows to {}", table.rows().len(), csv_path.display());

            csv_to_geojson(&csv_path, &geojson_path)?;

            outputs.push(VariableOutput {
                variable: variable.clone(),
                csv_path,
                geojson_path,
                rows: table.rows().len(),
            });
        }

        Ok(outputs)
    }
}
