use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use generator::track::{build_synthetic_track, SyntheticTrackConfig};
use log::{info, warn};
use std::path::PathBuf;
use swathcore::AreaOfInterest;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Maximum sustained wind swath from a b-deck storm track")]
struct Args {
    /// b-deck file to process
    #[arg(long, default_value = "data/external/bal152017.dat")]
    input_file: PathBuf,
    /// Workflow config in YAML; Puerto Rico defaults are used when the file is absent
    #[arg(long, default_value = "config/config.yaml")]
    config_file: PathBuf,
    /// Output directory for the default config
    #[arg(long, default_value = "data")]
    output_dir: PathBuf,
    /// Use a generated straight-line track instead of the input file
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Spread track points over all cores
    #[arg(long, default_value_t = false)]
    parallel: bool,
    /// Override the configured grid resolution, degrees
    #[arg(long)]
    grid_resolution: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = if args.config_file.exists() {
        WorkflowConfig::load(&args.config_file)?
    } else {
        warn!(
            "Config {} not found, using Puerto Rico defaults",
            args.config_file.display()
        );
        let area = AreaOfInterest::new(17.0, 19.0, -68.0, -65.0)?;
        WorkflowConfig::from_args(area, 0.1, &args.output_dir)
    };
    if let Some(resolution) = args.grid_resolution {
        config.grid_resolution = resolution;
    }
    config.parallel |= args.parallel;

    let runner = Runner::new(config);
    let track = if args.synthetic {
        info!("Generating synthetic track with seed {}", args.seed);
        build_synthetic_track(&SyntheticTrackConfig {
            seed: args.seed,
            ..Default::default()
        })?
    } else {
        runner
            .load_track(&args.input_file)
            .with_context(|| format!("loading track {}", args.input_file.display()))?
    };

    let result = runner.execute(&track)?;
    let summary = &result.summary;
    match &summary.peak {
        Some(peak) => println!(
            "Swath complete -> {} points folded, {} skipped, peak {:.1} m/s at ({:.2}, {:.2})",
            summary.folded,
            summary.skipped.len(),
            peak.speed_ms,
            peak.latitude,
            peak.longitude
        ),
        None => println!(
            "Swath complete -> {} points folded, {} skipped, no finite cells",
            summary.folded,
            summary.skipped.len()
        ),
    }
    println!(
        "Outputs: {} and {}",
        summary.ncfile.display(),
        summary.plot.display()
    );

    Ok(())
}
