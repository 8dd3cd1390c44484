//! Loading sample points from a grid GeoJSON file
//!
//! Each input feature describes one grid tile through `grid-id`, `left`,
//! `right`, `top` and `bottom` properties. The tile centre becomes the point.

use crate::errors::{Result, TerraGridError};
use crate::sampler::Point;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const LABEL_FIELD: &str = "grid-id";

#[derive(Debug, Deserialize)]
struct InputCollection {
    features: Vec<InputFeature>,
}

#[derive(Debug, Deserialize)]
struct InputFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

/// Centre of a bounding box as (lat, lon)
pub fn bbox_center(left: f64, right: f64, top: f64, bottom: f64) -> (f64, f64) {
    ((top + bottom) / 2.0, (left + right) / 2.0)
}

/// Read the grid tiles in `path` and return their centre points, in file order
pub fn load_grid_points(path: &Path) -> Result<Vec<Point>> {
    let reader = BufReader::new(File::open(path)?);
    let collection: InputCollection = serde_json::from_reader(reader)?;
    let points = points_from_features(&collection.features)?;
    log::info!("Loaded {} points from {}", points.len(), path.display());
    Ok(points)
}

/// Parse grid tiles from an in-memory GeoJSON string
pub fn parse_grid_points(geojson: &str) -> Result<Vec<Point>> {
    let collection: InputCollection = serde_json::from_str(geojson)?;
    points_from_features(&collection.features)
}

fn points_from_features(features: &[InputFeature]) -> Result<Vec<Point>> {
    let empty = Map::new();
    features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            let props = feature.properties.as_ref().unwrap_or(&empty);
            let label = label_value(props, index)?;
            let left = numeric_property(props, "left", index)?;
            let right = numeric_property(props, "right", index)?;
            let top = numeric_property(props, "top", index)?;
            let bottom = numeric_property(props, "bottom", index)?;
            let (lat, lon) = bbox_center(left, right, top, bottom);
            Ok(Point::new(label, lat, lon))
        })
        .collect()
}

fn property<'a>(props: &'a Map<String, Value>, field: &str, index: usize) -> Result<&'a Value> {
    match props.get(field) {
        Some(Value::Null) | None => Err(TerraGridError::MissingProperty {
            index,
            field: field.to_string(),
        }),
        Some(value) => Ok(value),
    }
}

fn label_value(props: &Map<String, Value>, index: usize) -> Result<String> {
    match property(props, LABEL_FIELD, index)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(TerraGridError::InvalidValue {
            column: LABEL_FIELD.to_string(),
            row: index,
            value: other.to_string(),
        }),
    }
}

fn numeric_property(props: &Map<String, Value>, field: &str, index: usize) -> Result<f64> {
    let value = property(props, field, index)?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite());
    parsed.ok_or_else(|| TerraGridError::InvalidValue {
        column: field.to_string(),
        row: index,
        value: value.to_string(),
    })
}
