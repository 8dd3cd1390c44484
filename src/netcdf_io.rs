//! NetCDF / OPeNDAP access to TerraClimate aggregations
//!
//! Each variable is published as its own aggregated file. The same URL template
//! works against the THREDDS OPeNDAP endpoint and against a local directory
//! holding files with the same names.

use crate::data_source::{GridDataset, GridSource, Packing};
use crate::errors::{Result, TerraGridError};
use log::{debug, info};
use ndarray::Array1;
use netcdf::{AttributeValue, File, Variable};
use std::ops::Range;

/// Default TerraClimate OPeNDAP root
pub const TERRACLIMATE_BASE_URL: &str = "http://thredds.northwestknowledge.net:8080/thredds/dodsC";

/// Builds the aggregated dataset location for a variable
pub fn terraclimate_url(base_url: &str, variable: &str) -> String {
    format!(
        "{}/agg_terraclimate_{}_1958_CurrentYear_GLOBE.nc",
        base_url.trim_end_matches('/'),
        variable
    )
}

/// Opens TerraClimate variables through the netCDF library
#[derive(Debug, Clone)]
pub struct NetCDFSource {
    base_url: String,
}

impl NetCDFSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Source pointing at the public TerraClimate THREDDS server
    pub fn terraclimate() -> Self {
        Self::new(TERRACLIMATE_BASE_URL)
    }

    pub fn url_for(&self, variable: &str) -> String {
        terraclimate_url(&self.base_url, variable)
    }
}

impl GridSource for NetCDFSource {
    type Dataset = NetCDFDataset;

    fn open(&self, variable: &str) -> Result<NetCDFDataset> {
        NetCDFDataset::open(&self.url_for(variable), variable)
    }
}

/// An open dataset handle scoped to one variable
pub struct NetCDFDataset {
    file: File,
    variable: String,
}

impl NetCDFDataset {
    /// Open `location` (path or OPeNDAP URL) and check `variable` is (time, lat, lon)
    pub fn open(location: &str, variable: &str) -> Result<Self> {
        info!("Opening {}", location);
        let file = netcdf::open(location)?;
        let dataset = Self {
            file,
            variable: variable.to_string(),
        };
        dataset.check_layout()?;
        Ok(dataset)
    }

    fn var(&self, name: &str) -> Result<Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| TerraGridError::VariableNotFound {
                var: name.to_string(),
            })
    }

    fn check_layout(&self) -> Result<()> {
        let var = self.var(&self.variable)?;
        let dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        debug!("{} dimensions: [{}]", self.variable, dims.join(", "));

        if dims != ["time", "lat", "lon"] {
            return Err(TerraGridError::UnexpectedShape {
                var: self.variable.clone(),
                message: format!("expected dimensions [time, lat, lon], found [{}]", dims.join(", ")),
            });
        }
        Ok(())
    }

    fn read_axis(&self, name: &str) -> Result<Array1<f64>> {
        let values: Vec<f64> = self.var(name)?.get_values::<f64, _>(..)?;
        debug!("Read {} values from axis '{}'", values.len(), name);
        Ok(Array1::from(values))
    }
}

/// Numeric value of a scalar (or first element of a vector) attribute
fn attribute_as_f64(var: &Variable<'_>, name: &str) -> Result<Option<f64>> {
    let attr = match var.attribute(name) {
        Some(attr) => attr,
        None => return Ok(None),
    };

    let value = match attr.value()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Uint(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Ushort(v) => Some(f64::from(v)),
        AttributeValue::Schar(v) => Some(f64::from(v)),
        AttributeValue::Uchar(v) => Some(f64::from(v)),
        AttributeValue::Doubles(vs) => vs.first().copied(),
        AttributeValue::Floats(vs) => vs.first().map(|&v| f64::from(v)),
        AttributeValue::Ints(vs) => vs.first().map(|&v| f64::from(v)),
        AttributeValue::Shorts(vs) => vs.first().map(|&v| f64::from(v)),
        _ => {
            debug!("Skipped non-numeric attribute '{}'", name);
            None
        }
    };
    Ok(value)
}

impl GridDataset for NetCDFDataset {
    fn variable(&self) -> &str {
        &self.variable
    }

    fn time_axis(&self) -> Result<Array1<f64>> {
        self.read_axis("time")
    }

    fn lat_axis(&self) -> Result<Array1<f64>> {
        self.read_axis("lat")
    }

    fn lon_axis(&self) -> Result<Array1<f64>> {
        self.read_axis("lon")
    }

    fn packing(&self) -> Result<Packing> {
        let var = self.var(&self.variable)?;
        let defaults = Packing::default();
        Ok(Packing {
            scale_factor: attribute_as_f64(&var, "scale_factor")?.unwrap_or(defaults.scale_factor),
            add_offset: attribute_as_f64(&var, "add_offset")?.unwrap_or(defaults.add_offset),
            fill_value: attribute_as_f64(&var, "_FillValue")?,
            missing_value: attribute_as_f64(&var, "missing_value")?,
        })
    }

    fn read_series(
        &self,
        time: Range<usize>,
        lat_index: usize,
        lon_index: usize,
    ) -> Result<Array1<f64>> {
        let var = self.var(&self.variable)?;
        let values: Vec<f64> = var.get_values::<f64, _>((
            time,
            lat_index..lat_index + 1,
            lon_index..lon_index + 1,
        ))?;
        Ok(Array1::from(values))
    }
}
