//! Pipeline and error-handling tests against the in-memory grid source
//!
//! These tests exercise the full orchestration without any NetCDF files.

use ndarray::{arr1, Array1, Array3};
use serde_json::Value;
use tempfile::tempdir;
use terra_grid::dates::days_since_epoch;
use terra_grid::prelude::*;

fn offsets_2023() -> Array1<f64> {
    (1..=12)
        .map(|m| days_since_epoch(2023, m).unwrap() as f64)
        .collect()
}

fn dataset(name: &str, base: f64) -> InMemoryDataset {
    let time = offsets_2023();
    let values = Array3::from_shape_fn((time.len(), 2, 2), |(t, y, x)| {
        base + (t * 100 + y * 10 + x) as f64
    });
    InMemoryDataset::new(name, time, arr1(&[20.0, 10.0]), arr1(&[70.0, 80.0]), values).unwrap()
}

fn config(output_root: &std::path::Path, variables: &[&str]) -> Config {
    Config {
        month_start: 3,
        month_end: 4,
        variables: variables.iter().map(|v| v.to_string()).collect(),
        output_root: output_root.to_path_buf(),
        show_progress: false,
        ..Config::default()
    }
}

#[test]
fn test_error_display() {
    let err = TerraGridError::VariableNotFound {
        var: "ppt".to_string(),
    };
    assert!(format!("{}", err).contains("Variable 'ppt' not found"));

    let err = TerraGridError::MissingColumn {
        column: "lat".to_string(),
    };
    assert_eq!(format!("{}", err), "Missing required column 'lat'");

    let err = TerraGridError::LengthMismatch {
        context: "row 0".to_string(),
        expected: 7,
        actual: 6,
    };
    assert!(format!("{}", err).contains("expected 7, got 6"));

    let generic: TerraGridError = "boom".into();
    assert_eq!(format!("{}", generic), "boom");
}

#[test]
fn test_two_points_two_months_table_layout() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp dir");
    let source = InMemorySource::new().with_dataset(dataset("soil", 0.0));
    let pipeline = Pipeline::new(config(dir.path(), &["soil"]), source);

    let points = vec![Point::new("p1", 19.0, 71.0), Point::new("p2", 11.0, 79.0)];
    let outputs = pipeline.run_with_points(&points)?;
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].rows, 2);

    let table = Table::read_csv(&outputs[0].csv_path)?;
    assert_eq!(
        table.columns,
        vec!["label", "lat", "lon", "close_lat", "close_lon", "03-2023", "04-2023"]
    );
    assert_eq!(table.rows[0], vec!["p1", "19.0", "71.0", "20.0", "70.0", "200.0", "300.0"]);
    assert_eq!(table.rows[1], vec!["p2", "11.0", "79.0", "10.0", "80.0", "211.0", "311.0"]);

    let collection: FeatureCollection =
        serde_json::from_str(&std::fs::read_to_string(&outputs[0].geojson_path)?)?;
    assert_eq!(collection.features.len(), 2);
    assert_eq!(collection.features[1].geometry.coordinates, [79.0, 11.0]);
    assert_eq!(
        collection.features[1].properties["close_lat"],
        Value::from(10.0)
    );
    Ok(())
}

#[test]
fn test_each_variable_gets_its_own_files() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp dir");
    let source = InMemorySource::new()
        .with_dataset(dataset("tmin", 0.0))
        .with_dataset(dataset("tmax", 1000.0));
    let pipeline = Pipeline::new(config(dir.path(), &["tmax", "tmin"]), source);

    let outputs = pipeline.run_with_points(&[Point::new("p", 10.0, 80.0)])?;
    let names: Vec<&str> = outputs.iter().map(|o| o.variable.as_str()).collect();
    assert_eq!(names, ["tmax", "tmin"]);

    for output in &outputs {
        assert!(output.csv_path.exists());
        assert!(output.geojson_path.exists());
    }
    let tmax = Table::read_csv(&outputs[0].csv_path)?;
    assert_eq!(tmax.rows[0][5], "1211.0");
    Ok(())
}

#[test]
fn test_failing_variable_aborts_run() {
    let dir = tempdir().expect("Failed to create temp dir");
    let source = InMemorySource::new().with_dataset(dataset("aet", 0.0));
    let pipeline = Pipeline::new(config(dir.path(), &["aet", "def", "pet"]), source);

    let result = pipeline.run_with_points(&[Point::new("p", 10.0, 80.0)]);
    match result {
        Err(TerraGridError::VariableNotFound { var }) => assert_eq!(var, "def"),
        other => panic!("Expected VariableNotFound, got {:?}", other),
    }

    // The variable before the failure was written, nothing after it
    let out = dir.path().join("2023");
    assert!(out.join("data_aet.csv").exists());
    assert!(!out.join("data_pet.csv").exists());
}

#[test]
fn test_time_axis_shorter_than_range_is_a_length_mismatch() {
    let dir = tempdir().expect("Failed to create temp dir");
    let source = InMemorySource::new().with_dataset(dataset("q", 0.0));
    let mut cfg = config(dir.path(), &["q"]);
    // Runs past the end of the 2023 axis: the end index clamps to December
    cfg.year_end = 2024;
    cfg.month_end = 2;
    let pipeline = Pipeline::new(cfg, source);

    let result = pipeline.run_with_points(&[Point::new("p", 10.0, 80.0)]);
    assert!(matches!(
        result,
        Err(TerraGridError::LengthMismatch {
            expected: 12,
            actual: 10,
            ..
        })
    ));
}

#[test]
fn test_run_reads_points_from_grid_file() -> Result<()> {
    let dir = tempdir().expect("Failed to create temp dir");
    let points_path = dir.path().join("grid.geojson");
    std::fs::write(
        &points_path,
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": null,
             "properties": {"grid-id": 42, "left": 79.0, "right": 81.0, "top": 11.0, "bottom": 9.0}}
        ]}"#,
    )?;

    let mut cfg = config(dir.path(), &["ws"]);
    cfg.points_path = points_path;
    let source = InMemorySource::new().with_dataset(dataset("ws", 0.0));
    let outputs = Pipeline::new(cfg, source).run()?;

    let table = Table::read_csv(&outputs[0].csv_path)?;
    assert_eq!(table.rows[0][..3], ["42", "10.0", "80.0"]);
    Ok(())
}
