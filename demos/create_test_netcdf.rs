//! Creates a small TerraClimate-shaped NetCDF file and a matching grid GeoJSON
//! so terragrid can be run offline.
//!
//! ```text
//! cargo run --example create_test_netcdf
//! cargo run -- --base-url demo_data --points demo_data/grid.geojson --variables ppt
//! ```

use ndarray::{Array1, Array3};
use netcdf::create;
use std::path::Path;
use terra_grid::dates::days_since_epoch;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = Path::new("demo_data");
    std::fs::create_dir_all(out_dir)?;
    let output_path = out_dir.join("agg_terraclimate_ppt_1958_CurrentYear_GLOBE.nc");

    println!("🔨 Creating test NetCDF file: {}", output_path.display());

    if output_path.exists() {
        std::fs::remove_file(&output_path)?
    }

    let mut file = create(&output_path)?;
    file.add_attribute("title", "TerraClimate demo subset")?;

    // Monthly steps for 2022-2023, 1/24 degree cells over part of Karnataka
    let time: Vec<f64> = (0..24)
        .map(|m| days_since_epoch(2022 + m / 12, (m % 12 + 1) as u32).map(|d| d as f64))
        .collect::<Result<_, _>>()?;
    let lat: Vec<f64> = (0..48).map(|i| 15.0 - (i as f64 + 0.5) / 24.0).collect();
    let lon: Vec<f64> = (0..48).map(|i| 75.0 + (i as f64 + 0.5) / 24.0).collect();

    file.add_dimension("time", time.len())?;
    file.add_dimension("lat", lat.len())?;
    file.add_dimension("lon", lon.len())?;

    {
        let mut time_var = file.add_variable::<f64>("time", &["time"])?;
        time_var.put_attribute("units", "days since 1900-01-01 00:00:00")?;
        time_var.put(Array1::from(time.clone()).view(), ..)?;
    }
    {
        let mut lat_var = file.add_variable::<f64>("lat", &["lat"])?;
        lat_var.put_attribute("units", "degrees_north")?;
        lat_var.put(Array1::from(lat.clone()).view(), ..)?;
    }
    {
        let mut lon_var = file.add_variable::<f64>("lon", &["lon"])?;
        lon_var.put_attribute("units", "degrees_east")?;
        lon_var.put(Array1::from(lon.clone()).view(), ..)?;
    }
    {
        let mut ppt = file.add_variable::<i16>("ppt", &["time", "lat", "lon"])?;
        ppt.put_attribute("units", "mm")?;
        ppt.put_attribute("scale_factor", 0.1f64)?;
        ppt.put_attribute("add_offset", 0.0f64)?;
        ppt.put_attribute("_FillValue", -32768i16)?;

        // Monsoon peak in July, wetter towards the west coast
        let data = Array3::from_shape_fn((time.len(), lat.len(), lon.len()), |(t, _y, x)| {
            let month = (t % 12) as f64;
            let season = (-(month - 6.0).powi(2) / 4.0).exp();
            let coast = 1.0 - x as f64 / lon.len() as f64;
            (season * coast * 6000.0) as i16
        });
        ppt.put(data.view(), ..)?;
    }

    let grid_path = out_dir.join("grid.geojson");
    std::fs::write(
        &grid_path,
        r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "geometry": null,
     "properties": {"grid-id": "demo-1", "left": 75.50, "right": 75.54, "top": 14.50, "bottom": 14.46}},
    {"type": "Feature", "geometry": null,
     "properties": {"grid-id": "demo-2", "left": 76.20, "right": 76.24, "top": 13.10, "bottom": 13.06}}
  ]
}
"#,
    )?;

    println!("✅ Successfully created demo inputs:");
    println!("   📏 Dimensions: time(24), lat(48), lon(48)");
    println!("   📈 Variable: ppt (packed i16, scale_factor 0.1)");
    println!("   📍 Grid: {}", grid_path.display());
    println!("\n🧪 Run terragrid against them with:");
    println!("   cargo run -- --base-url demo_data --points demo_data/grid.geojson --variables ppt");

    Ok(())
}
