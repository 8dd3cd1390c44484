//! Nearest-neighbour sampling of gridded variables at point locations
//!
//! One call to [`PointSampler::sample`] opens one fresh dataset handle for the
//! requested variable, locates the time-index range for the month span once,
//! and then reads one time series per point from the nearest grid cell.

use crate::data_source::{GridDataset, GridSource, Packing};
use crate::dates::MonthRange;
use crate::errors::{Result, TerraGridError};
use crate::nearest::{require_nearest_index, TimeIndexRange};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

/// A labeled location to sample
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub label: String,
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(label: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            label: label.into(),
            lat,
            lon,
        }
    }
}

/// Values read for one point
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSeries {
    /// Latitude of the matched grid cell centre
    pub grid_lat: f64,
    /// Longitude of the matched grid cell centre
    pub grid_lon: f64,
    pub lat_index: usize,
    pub lon_index: usize,
    /// One value per time step; masked cells are NaN
    pub values: Vec<f64>,
}

/// How stored values are turned into output values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueDecoding {
    /// Stored values, only masking fill/missing cells
    #[default]
    Raw,
    /// Stored values with `scale_factor` and `add_offset` applied
    Unpacked,
}

/// Output of a sampling call
#[derive(Debug, Clone)]
pub struct SampleResult {
    pub variable: String,
    pub time_range: TimeIndexRange,
    /// Packing attributes read from the variable, whether applied or not
    pub packing: Packing,
    /// One entry per input point, in input order
    pub series: Vec<SampledSeries>,
}

/// Samples variables from a [`GridSource`] at point locations
pub struct PointSampler<S: GridSource> {
    source: S,
    decoding: ValueDecoding,
    show_progress: bool,
}

impl<S: GridSource> PointSampler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            decoding: ValueDecoding::Raw,
            show_progress: true,
        }
    }

    pub fn with_decoding(mut self, decoding: ValueDecoding) -> Self {
        self.decoding = decoding;
        self
    }

    /// Enable or disable the per-point progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Sample `variable` at every point over `months`
    ///
    /// # Errors
    ///
    /// Any failure opening or reading the dataset is returned as-is. An axis with
    /// no finite values gives [`TerraGridError::EmptyAxis`], and a time axis whose
    /// nearest end index precedes the start gives [`TerraGridError::InvalidTimeRange`].
    pub fn sample(&self, points: &[Point], variable: &str, months: &MonthRange) -> Result<SampleResult> {
        let dataset = self.source.open(variable)?;
        let packing = dataset.packing()?;
        debug!(
            "{}: scale_factor={}, add_offset={}",
            variable, packing.scale_factor, packing.add_offset
        );

        let time = dataset.time_axis()?;
        let time_range = TimeIndexRange::locate(
            time.view(),
            months.start_offset_days()? as f64,
            months.end_offset_days()? as f64,
        )?;
        info!(
            "{}: time indices {}..={} ({} steps)",
            variable,
            time_range.start,
            time_range.end,
            time_range.len()
        );

        let lat = dataset.lat_axis()?;
        let lon = dataset.lon_axis()?;

        let progress = self.progress_bar(points.len());
        let mut series = Vec::with_capacity(points.len());
        for point in points {
            let lat_index = require_nearest_index(lat.view(), point.lat, "lat")?;
            let lon_index = require_nearest_index(lon.view(), point.lon, "lon")?;

            let raw = dataset.read_series(time_range.as_range(), lat_index, lon_index)?;
            if raw.len() != time_range.len() {
                return Err(TerraGridError::LengthMismatch {
                    context: format!("series for point '{}'", point.label),
                    expected: time_range.len(),
                    actual: raw.len(),
                });
            }

            let values = raw
                .iter()
                .map(|&v| match self.decoding {
                    ValueDecoding::Raw => packing.mask(v),
                    ValueDecoding::Unpacked => packing.unpack(v),
                })
                .collect();

            series.push(SampledSeries {
                grid_lat: lat[lat_index],
                grid_lon: lon[lon_index],
                lat_index,
                lon_index,
                values,
            });
            progress.inc(1);
        }
        progress.finish_and_clear();

        Ok(SampleResult {
            variable: variable.to_string(),
            time_range,
            packing,
            series,
        })
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}<{eta_precise}]") {
            bar.set_style(style);
        }
        bar
    }
}
