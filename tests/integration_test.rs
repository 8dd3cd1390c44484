use ndarray::{Array1, Array3};
use netcdf::create;
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;
use terra_grid::prelude::*;

/// Monthly time offsets (days since 1900-01-01) for Jan 2022 .. Dec 2023
fn monthly_offsets() -> Vec<f64> {
    (0..24)
        .map(|m| {
            terra_grid::dates::days_since_epoch(2022 + m / 12, (m % 12 + 1) as u32).unwrap() as f64
        })
        .collect()
}

/// Write a small TerraClimate-shaped file for `variable` into `dir`
fn write_terraclimate_file(dir: &Path, variable: &str) {
    let path = dir.join(format!(
        "agg_terraclimate_{}_1958_CurrentYear_GLOBE.nc",
        variable
    ));
    let time = monthly_offsets();
    let lat: Vec<f64> = vec![14.0, 13.0, 12.0, 11.0];
    let lon: Vec<f64> = vec![76.0, 77.0, 78.0];

    let mut file = create(&path).expect("Failed to create NetCDF file");
    file.add_dimension("time", time.len()).expect("Failed to add time");
    file.add_dimension("lat", lat.len()).expect("Failed to add lat");
    file.add_dimension("lon", lon.len()).expect("Failed to add lon");

    {
        let mut var = file.add_variable::<f64>("time", &["time"]).unwrap();
        var.put_attribute("units", "days since 1900-01-01").unwrap();
        var.put(Array1::from(time.clone()).view(), ..).unwrap();
    }
    {
        let mut var = file.add_variable::<f64>("lat", &["lat"]).unwrap();
        var.put(Array1::from(lat.clone()).view(), ..).unwrap();
    }
    {
        let mut var = file.add_variable::<f64>("lon", &["lon"]).unwrap();
        var.put(Array1::from(lon.clone()).view(), ..).unwrap();
    }
    {
        let mut var = file
            .add_variable::<f32>(variable, &["time", "lat", "lon"])
            .unwrap();
        var.put_attribute("scale_factor", 0.1f32).unwrap();
        var.put_attribute("add_offset", 0.0f32).unwrap();
        var.put_attribute("missing_value", -9999.0f32).unwrap();

        // value = time index * 100 + lat index * 10 + lon index, except one masked cell
        let data = Array3::from_shape_fn((time.len(), lat.len(), lon.len()), |(t, y, x)| {
            if (t, y, x) == (13, 3, 2) {
                -9999.0f32
            } else {
                (t * 100 + y * 10 + x) as f32
            }
        });
        var.put(data.view(), ..).unwrap();
    }
}

fn write_grid_geojson(path: &Path) {
    let geojson = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": null,
             "properties": {"grid-id": "g1", "left": 76.9, "right": 77.1, "top": 13.1, "bottom": 12.9}},
            {"type": "Feature", "geometry": null,
             "properties": {"grid-id": "g2", "left": 77.8, "right": 78.4, "top": 11.2, "bottom": 10.6}}
        ]
    }"#;
    std::fs::write(path, geojson).unwrap();
}

#[test]
fn test_netcdf_source_reads_axes_and_series() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_terraclimate_file(dir.path(), "ppt");

    let source = NetCDFSource::new(dir.path().to_string_lossy());
    let dataset = source.open("ppt").expect("Failed to open dataset");

    assert_eq!(dataset.time_axis().unwrap().len(), 24);
    assert_eq!(dataset.lat_axis().unwrap().len(), 4);
    assert_eq!(dataset.lon_axis().unwrap().to_vec(), vec![76.0, 77.0, 78.0]);

    let packing = dataset.packing().unwrap();
    assert!((packing.scale_factor - 0.1).abs() < 1e-6);
    assert_eq!(packing.add_offset, 0.0);
    assert_eq!(packing.missing_value, Some(-9999.0));

    let series = dataset.read_series(12..15, 1, 1).unwrap();
    assert_eq!(series.to_vec(), vec![1211.0, 1311.0, 1411.0]);
}

#[test]
fn test_netcdf_source_missing_file_propagates() {
    let dir = tempdir().expect("Failed to create temp dir");
    let source = NetCDFSource::new(dir.path().to_string_lossy());
    assert!(matches!(
        source.open("tmax"),
        Err(TerraGridError::NetCDFError(_))
    ));
}

#[test]
fn test_sampler_against_netcdf_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_terraclimate_file(dir.path(), "ppt");

    let sampler = PointSampler::new(NetCDFSource::new(dir.path().to_string_lossy()))
        .with_progress(false);
    let months = MonthRange::new(2023, 2023, 1, 12).unwrap();
    let points = vec![Point::new("a", 13.0, 77.0), Point::new("b", 10.9, 78.1)];

    let result = sampler.sample(&points, "ppt", &months).unwrap();
    assert_eq!(result.series.len(), 2);
    assert_eq!(result.series[0].values.len(), months.labels().len());

    // Exact cell centre maps onto itself
    assert_eq!((result.series[0].lat_index, result.series[0].lon_index), (1, 1));
    assert_eq!(result.series[0].values[0], 1211.0);

    // Raw values are returned; the missing cell is NaN
    let b = &result.series[1];
    assert_eq!((b.grid_lat, b.grid_lon), (11.0, 78.0));
    assert_eq!(b.values[0], 1232.0);
    assert!(b.values[1].is_nan());
}

#[test]
fn test_pipeline_end_to_end_with_netcdf_files() {
    let dir = tempdir().expect("Failed to create temp dir");
    let data_dir = dir.path().join("tc");
    std::fs::create_dir_all(&data_dir).unwrap();
    write_terraclimate_file(&data_dir, "ppt");
    write_terraclimate_file(&data_dir, "tmax");

    let points_path = dir.path().join("grid.geojson");
    write_grid_geojson(&points_path);

    let config = Config {
        base_url: data_dir.to_string_lossy().into_owned(),
        year_start: 2023,
        year_end: 2023,
        month_start: 1,
        month_end: 2,
        variables: vec!["ppt".to_string(), "tmax".to_string()],
        points_path,
        output_root: dir.path().join("out"),
        decoding: ValueDecoding::Raw,
        show_progress: false,
    };
    let outputs = Pipeline::new(config, NetCDFSource::new(data_dir.to_string_lossy()))
        .run()
        .expect("Pipeline failed");

    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].variable, "ppt");
    assert_eq!(
        outputs[1].csv_path,
        dir.path().join("out").join("2023").join("data_tmax.csv")
    );

    let table = Table::read_csv(&outputs[0].csv_path).unwrap();
    assert_eq!(
        table.columns,
        vec!["label", "lat", "lon", "close_lat", "close_lon", "01-2023", "02-2023"]
    );
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0][0], "g1");
    assert_eq!(table.rows[0][3..], ["13.0", "77.0", "1211.0", "1311.0"]);
    // g2 centre (10.9, 78.1) snaps to (11, 78); Feb 2023 is the masked cell
    assert_eq!(table.rows[1][3..], ["11.0", "78.0", "1232.0", ""]);

    let geojson: Value =
        serde_json::from_str(&std::fs::read_to_string(&outputs[0].geojson_path).unwrap()).unwrap();
    assert_eq!(geojson["type"], "FeatureCollection");
    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["geometry"]["type"], "Point");
    assert_eq!(features[1]["properties"]["label"], "g2");
    assert_eq!(features[1]["properties"]["02-2023"], Value::Null);
    assert!(features[0]["properties"].get("lat").is_none());
    assert!(features[0]["properties"].get("lon").is_none());
}

/// Write a packed i16 variable that marks gaps only through `_FillValue`
fn write_fill_value_file(dir: &Path, variable: &str) {
    let path = dir.join(format!(
        "agg_terraclimate_{}_1958_CurrentYear_GLOBE.nc",
        variable
    ));
    let time = monthly_offsets();
    let lat: Vec<f64> = vec![14.0, 13.0, 12.0, 11.0];
    let lon: Vec<f64> = vec![76.0, 77.0, 78.0];

    let mut file = create(&path).expect("Failed to create NetCDF file");
    file.add_dimension("time", time.len()).unwrap();
    file.add_dimension("lat", lat.len()).unwrap();
    file.add_dimension("lon", lon.len()).unwrap();

    for (name, values) in [("time", &time), ("lat", &lat), ("lon", &lon)] {
        let mut var = file.add_variable::<f64>(name, &[name]).unwrap();
        var.put(Array1::from(values.clone()).view(), ..).unwrap();
    }

    let mut var = file
        .add_variable::<i16>(variable, &["time", "lat", "lon"])
        .unwrap();
    var.put_attribute("scale_factor", 0.1f32).unwrap();
    var.put_attribute("add_offset", 0.0f32).unwrap();
    var.put_attribute("_FillValue", -32768i16).unwrap();

    // Jan 2023 at (13, 77) is left unset
    let data = Array3::from_shape_fn((time.len(), lat.len(), lon.len()), |(t, y, x)| {
        if (t, y, x) == (12, 1, 1) {
            -32768i16
        } else {
            (t * 100 + y * 10 + x) as i16
        }
    });
    var.put(data.view(), ..).unwrap();
}

#[test]
fn test_fill_value_attribute_masks_cells() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_fill_value_file(dir.path(), "ppt");

    let source = NetCDFSource::new(dir.path().to_string_lossy());
    let packing = source.open("ppt").unwrap().packing().unwrap();
    assert_eq!(packing.fill_value, Some(-32768.0));
    assert_eq!(packing.missing_value, None);

    let months = MonthRange::new(2023, 2023, 1, 2).unwrap();
    let points = vec![Point::new("a", 13.0, 77.0)];

    let raw = PointSampler::new(source.clone())
        .with_progress(false)
        .sample(&points, "ppt", &months)
        .unwrap();
    assert!(raw.series[0].values[0].is_nan());
    assert_eq!(raw.series[0].values[1], 1311.0);

    let unpacked = PointSampler::new(source)
        .with_decoding(ValueDecoding::Unpacked)
        .with_progress(false)
        .sample(&points, "ppt", &months)
        .unwrap();
    assert!(unpacked.series[0].values[0].is_nan());
    assert!((unpacked.series[0].values[1] - 131.1).abs() < 1e-4);
}

#[test]
#[ignore = "requires network access to the TerraClimate THREDDS server"]
fn test_remote_terraclimate_dataset_opens() {
    let dataset = NetCDFSource::terraclimate()
        .open("ppt")
        .expect("Failed to open remote dataset over OPeNDAP");
    assert!(!dataset.time_axis().unwrap().is_empty());
    assert!(!dataset.lat_axis().unwrap().is_empty());
    assert!(!dataset.lon_axis().unwrap().is_empty());
}
