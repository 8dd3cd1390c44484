//! Centralized error handling for terra_grid
//!
//! Every fallible operation in the crate returns [`Result`]. Nothing is retried
//! or recovered locally: remote, file and table errors all surface to the caller.

use std::fmt;

/// Main error type for terra_grid operations
#[derive(Debug)]
pub enum TerraGridError {
    /// NetCDF / OPeNDAP access errors
    NetCDFError(netcdf::Error),

    /// I/O operation errors
    IoError(std::io::Error),

    /// CSV reading or writing errors
    CsvError(csv::Error),

    /// JSON (GeoJSON) parsing or serialization errors
    JsonError(serde_json::Error),

    /// Variable not found in the dataset
    VariableNotFound { var: String },

    /// Variable does not have the expected (time, lat, lon) layout
    UnexpectedShape { var: String, message: String },

    /// A coordinate axis has no usable values
    EmptyAxis { axis: String },

    /// A requested coordinate is NaN or infinite
    InvalidCoordinate { axis: String, value: f64 },

    /// Year/month bounds are out of range or out of order
    InvalidDateRange { message: String },

    /// The nearest time indices do not form a forward range
    InvalidTimeRange { start: usize, end: usize },

    /// A required table column is absent
    MissingColumn { column: String },

    /// A required property is absent on an input feature
    MissingProperty { index: usize, field: String },

    /// A cell or property could not be interpreted
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    /// Two sequences that must line up have different lengths
    LengthMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Generic error
    Generic(String),
}

impl fmt::Display for TerraGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerraGridError::NetCDFError(e) => write!(f, "NetCDF error: {}", e),
            TerraGridError::IoError(e) => write!(f, "I/O error: {}", e),
            TerraGridError::CsvError(e) => write!(f, "CSV error: {}", e),
            TerraGridError::JsonError(e) => write!(f, "JSON error: {}", e),
            TerraGridError::VariableNotFound { var } => {
                write!(f, "Variable '{}' not found in dataset", var)
            }
            TerraGridError::UnexpectedShape { var, message } => {
                write!(f, "Variable '{}' has an unexpected shape: {}", var, message)
            }
            TerraGridError::EmptyAxis { axis } => {
                write!(f, "Axis '{}' has no usable values", axis)
            }
            TerraGridError::InvalidCoordinate { axis, value } => {
                write!(f, "Invalid {} coordinate: {}", axis, value)
            }
            TerraGridError::InvalidDateRange { message } => {
                write!(f, "Invalid date range: {}", message)
            }
            TerraGridError::InvalidTimeRange { start, end } => write!(
                f,
                "Invalid time index range: start index {} is after end index {}",
                start, end
            ),
            TerraGridError::MissingColumn { column } => {
                write!(f, "Missing required column '{}'", column)
            }
            TerraGridError::MissingProperty { index, field } => {
                write!(f, "Feature {} is missing property '{}'", index, field)
            }
            TerraGridError::InvalidValue { column, row, value } => write!(
                f,
                "Invalid value '{}' in column '{}' at row {}",
                value, column, row
            ),
            TerraGridError::LengthMismatch {
                context,
                expected,
                actual,
            } => write!(
                f,
                "Length mismatch in {}: expected {}, got {}",
                context, expected, actual
            ),
            TerraGridError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for TerraGridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TerraGridError::NetCDFError(e) => Some(e),
            TerraGridError::IoError(e) => Some(e),
            TerraGridError::CsvError(e) => Some(e),
            TerraGridError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<netcdf::Error> for TerraGridError {
    fn from(error: netcdf::Error) -> Self {
        TerraGridError::NetCDFError(error)
    }
}

impl From<std::io::Error> for TerraGridError {
    fn from(error: std::io::Error) -> Self {
        TerraGridError::IoError(error)
    }
}

impl From<csv::Error> for TerraGridError {
    fn from(error: csv::Error) -> Self {
        TerraGridError::CsvError(error)
    }
}

impl From<serde_json::Error> for TerraGridError {
    fn from(error: serde_json::Error) -> Self {
        TerraGridError::JsonError(error)
    }
}

impl From<String> for TerraGridError {
    fn from(error: String) -> Self {
        TerraGridError::Generic(error)
    }
}

impl From<&str> for TerraGridError {
    fn from(error: &str) -> Self {
        TerraGridError::Generic(error.to_string())
    }
}

/// Result type alias for terra_grid operations
pub type Result<T> = std::result::Result<T, TerraGridError>;
