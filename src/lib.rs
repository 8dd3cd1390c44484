//! terra_grid: TerraClimate point sampling
//!
//! Downloads monthly TerraClimate variables (temperature, precipitation, soil
//! moisture, ...) for a list of point locations. Each point is matched to its
//! nearest grid cell, the cell's time series is read for the requested months,
//! and the results are written as a CSV table and a GeoJSON point collection
//! per variable.
//!
//! ## Module Organization
//!
//! - [`dates`]: month ranges, "MM-YYYY" labels and time-axis offsets
//! - [`nearest`]: nearest-index search on coordinate axes
//! - [`data_source`]: the gridded-variable capability traits and an in-memory source
//! - [`netcdf_io`]: NetCDF / OPeNDAP backend for TerraClimate aggregations
//! - [`sampler`]: nearest-neighbour sampling of a variable at many points
//! - [`points`]: loading points from a grid GeoJSON file
//! - [`table`]: result tables and CSV I/O
//! - [`geojson`]: table to GeoJSON point conversion
//! - [`config`]: run configuration
//! - [`pipeline`]: the end-to-end job
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use terra_grid::prelude::*;
//!
//! let config = Config {
//!     month_start: 5,
//!     month_end: 6,
//!     variables: vec!["ppt".to_string()],
//!     ..Config::default()
//! };
//! let pipeline = Pipeline::new(config, NetCDFSource::terraclimate());
//! let points = vec![Point::new("bengaluru", 12.97, 77.59)];
//! let outputs = pipeline.run_with_points(&points).unwrap();
//! println!("{:?}", outputs[0].csv_path);
//! ```

pub mod cli;
pub mod config;
pub mod data_source;
pub mod dates;
pub mod errors;
pub mod geojson;
pub mod nearest;
pub mod netcdf_io;
pub mod pipeline;
pub mod points;
pub mod sampler;
pub mod table;

pub use errors::{Result, TerraGridError};

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::config::Config;
    pub use crate::data_source::{GridDataset, GridSource, InMemoryDataset, InMemorySource, Packing};
    pub use crate::dates::{month_year_labels, MonthRange};
    pub use crate::errors::{Result, TerraGridError};
    pub use crate::geojson::{csv_to_geojson, table_to_features, FeatureCollection};
    pub use crate::netcdf_io::NetCDFSource;
    pub use crate::pipeline::{Pipeline, VariableOutput};
    pub use crate::sampler::{Point, PointSampler, SampledSeries, ValueDecoding};
    pub use crate::table::{ResultTable, Table};
}
