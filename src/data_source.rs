//! Data source abstraction for gridded (time, lat, lon) variables
//!
//! The sampler only needs a narrow capability: open a variable by name, read its
//! three coordinate axes, and read the time series under one grid cell. The
//! NetCDF/OPeNDAP backend lives in [`crate::netcdf_io`]; [`InMemorySource`]
//! serves the same interface from arrays held in memory.

use crate::errors::{Result, TerraGridError};
use ndarray::{s, Array1, Array3};
use std::collections::HashMap;
use std::ops::Range;

/// Packing attributes of a variable (CF `scale_factor`, `add_offset`, fill values)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packing {
    pub scale_factor: f64,
    pub add_offset: f64,
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            add_offset: 0.0,
            fill_value: None,
            missing_value: None,
        }
    }
}

impl Packing {
    /// True if the raw value marks a masked cell
    pub fn is_masked(&self, raw: f64) -> bool {
        !raw.is_finite() || Some(raw) == self.fill_value || Some(raw) == self.missing_value
    }

    /// Replace masked cells with NaN, leaving the rest as stored
    pub fn mask(&self, raw: f64) -> f64 {
        if self.is_masked(raw) {
            f64::NAN
        } else {
            raw
        }
    }

    /// Mask, then apply `value * scale_factor + add_offset`
    pub fn unpack(&self, raw: f64) -> f64 {
        if self.is_masked(raw) {
            f64::NAN
        } else {
            raw * self.scale_factor + self.add_offset
        }
    }
}

/// An opened gridded variable laid out as (time, lat, lon)
pub trait GridDataset {
    /// Name of the variable this handle was opened for
    fn variable(&self) -> &str;

    /// Time coordinate, in days since 1900-01-01
    fn time_axis(&self) -> Result<Array1<f64>>;

    fn lat_axis(&self) -> Result<Array1<f64>>;

    fn lon_axis(&self) -> Result<Array1<f64>>;

    /// Packing attributes of the variable
    fn packing(&self) -> Result<Packing>;

    /// Raw stored values for `time` at one grid cell
    fn read_series(&self, time: Range<usize>, lat_index: usize, lon_index: usize)
        -> Result<Array1<f64>>;
}

/// Something that can open gridded variables by name
pub trait GridSource {
    type Dataset: GridDataset;

    /// Open a fresh handle for `variable`
    fn open(&self, variable: &str) -> Result<Self::Dataset>;
}

/// A single variable held in memory
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    pub name: String,
    pub time: Array1<f64>,
    pub lat: Array1<f64>,
    pub lon: Array1<f64>,
    /// Values indexed as `[time, lat, lon]`
    pub values: Array3<f64>,
    pub packing: Packing,
}

impl InMemoryDataset {
    /// Build a dataset, checking the value array matches the axes
    pub fn new(
        name: &str,
        time: Array1<f64>,
        lat: Array1<f64>,
        lon: Array1<f64>,
        values: Array3<f64>,
    ) -> Result<Self> {
        let expected = [time.len(), lat.len(), lon.len()];
        if values.shape() != expected {
            return Err(TerraGridError::UnexpectedShape {
                var: name.to_string(),
                message: format!("values {:?} do not match axes {:?}", values.shape(), expected),
            });
        }
        Ok(Self {
            name: name.to_string(),
            time,
            lat,
            lon,
            values,
            packing: Packing::default(),
        })
    }

    pub fn with_packing(mut self, packing: Packing) -> Self {
        self.packing = packing;
        self
    }
}

impl GridDataset for InMemoryDataset {
    fn variable(&self) -> &str {
        &self.name
    }

    fn time_axis(&self) -> Result<Array1<f64>> {
        Ok(self.time.clone())
    }

    fn lat_axis(&self) -> Result<Array1<f64>> {
        Ok(self.lat.clone())
    }

    fn lon_axis(&self) -> Result<Array1<f64>> {
        Ok(self.lon.clone())
    }

    fn packing(&self) -> Result<Packing> {
        Ok(self.packing)
    }

    fn read_series(
        &self,
        time: Range<usize>,
        lat_index: usize,
        lon_index: usize,
    ) -> Result<Array1<f64>> {
        let shape = self.values.shape();
        if time.end > shape[0] || lat_index >= shape[1] || lon_index >= shape[2] {
            return Err(TerraGridError::UnexpectedShape {
                var: self.name.clone(),
                message: format!(
                    "index (time {:?}, lat {}, lon {}) outside {:?}",
                    time, lat_index, lon_index, shape
                ),
            });
        }
        Ok(self.values.slice(s![time, lat_index, lon_index]).to_owned())
    }
}

/// Serves [`InMemoryDataset`]s by variable name
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    datasets: HashMap<String, InMemoryDataset>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dataset: InMemoryDataset) {
        self.datasets.insert(dataset.name.clone(), dataset);
    }

    pub fn with_dataset(mut self, dataset: InMemoryDataset) -> Self {
        self.insert(dataset);
        self
    }
}

impl GridSource for InMemorySource {
    type Dataset = InMemoryDataset;

    fn open(&self, variable: &str) -> Result<InMemoryDataset> {
        self.datasets
            .get(variable)
            .cloned()
            .ok_or_else(|| TerraGridError::VariableNotFound {
                var: variable.to_string(),
            })
    }
}
