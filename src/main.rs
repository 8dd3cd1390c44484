//! Entry point for the terragrid application.
//! Parses the CLI into a run configuration and drives the download job.

use clap::Parser;
use terra_grid::cli::Args;
use terra_grid::netcdf_io::NetCDFSource;
use terra_grid::pipeline::Pipeline;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = args.into_config();
    config.validate()?;

    println!(
        "🌍 TerraClimate {:02}-{} .. {:02}-{} | {} variables",
        config.month_start,
        config.year_start,
        config.month_end,
        config.year_end,
        config.variables.len()
    );

    let source = NetCDFSource::new(config.base_url.clone());
    let pipeline = Pipeline::new(config, source);
    let outputs = pipeline.run()?;

    println!(
        "✅ Finished {} variables, output in {}",
        outputs.len(),
        pipeline.config().output_dir().display()
    );

    Ok(())
}
