use crate::workflow::config::WorkflowConfig;
use crate::workflow::intermediate::write_intermediate;
use anyhow::Context;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use swathcore::bdeck::{convert_records, load_bdeck_file};
use swathcore::output::{render_swath, write_png, write_swath_netcdf};
use swathcore::processing::SwathPeak;
use swathcore::telemetry::{LogManager, MetricsRecorder};
use swathcore::{SwathAggregator, TrackObservation};

#[derive(Debug, Clone, Serialize)]
pub struct SkippedSummary {
    pub index: usize,
    pub time: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeakSummary {
    pub speed_ms: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<SwathPeak> for PeakSummary {
    fn from(peak: SwathPeak) -> Self {
        Self {
            speed_ms: peak.speed,
            latitude: peak.latitude,
            longitude: peak.longitude,
        }
    }
}

/// Machine-readable record of one run.
#[derive(Debug, Clone, Serialize)]
pub struct SwathSummary {
    pub track_points: usize,
    pub folded: usize,
    pub skipped: Vec<SkippedSummary>,
    pub peak: Option<PeakSummary>,
    pub grid_shape: (usize, usize),
    pub grid_resolution: f64,
    pub ncfile: PathBuf,
    pub plot: PathBuf,
}

pub struct WorkflowResult {
    pub summary: SwathSummary,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Reads and converts a b-deck file, leaving the SI table in the
    /// intermediate directory.
    pub fn load_track(&self, input: &Path) -> anyhow::Result<Vec<TrackObservation>> {
        let records = load_bdeck_file(input, self.config.bdeck.skip_rows)
            .with_context(|| format!("reading b-deck file {}", input.display()))?;
        let observations = convert_records(&records)
            .with_context(|| format!("converting b-deck file {}", input.display()))?;
        write_intermediate(
            &self.config.files.path_bdeck_intermediate,
            input,
            &observations,
        )
        .context("writing intermediate track table")?;
        Ok(observations)
    }

    pub fn execute(&self, observations: &[TrackObservation]) -> anyhow::Result<WorkflowResult> {
        let files = &self.config.files;
        let points = TrackObservation::points(observations);
        let times = TrackObservation::times(observations);

        let metrics = MetricsRecorder::new();
        let observer = (LogManager::new(), &metrics);
        let output = SwathAggregator::new(self.config.grid_resolution)
            .parallel(self.config.parallel)
            .generate(&points, &self.config.area, &observer)
            .context("generating wind swath")?;

        write_swath_netcdf(&files.output_ncfile, &output, &times)
            .with_context(|| format!("writing swath to {}", files.output_ncfile.display()))?;

        let mut options = self.config.render_options();
        if self.config.plotting.show_track {
            options.track = points.iter().map(|point| point.center()).collect();
        }
        let image = render_swath(&output, &options).context("rendering swath map")?;
        write_png(&files.output_plot_swath_wind_speed, &image).with_context(|| {
            format!(
                "writing swath map to {}",
                files.output_plot_swath_wind_speed.display()
            )
        })?;

        let (folded, _) = metrics.snapshot();
        let summary = SwathSummary {
            track_points: observations.len(),
            folded,
            skipped: output
                .skipped
                .iter()
                .map(|skip| SkippedSummary {
                    index: skip.index,
                    time: observations[skip.index]
                        .time
                        .format("%Y-%m-%d %H:%M")
                        .to_string(),
                    reason: skip.error.to_string(),
                })
                .collect(),
            peak: output.peak().map(PeakSummary::from),
            grid_shape: output.grid.shape(),
            grid_resolution: self.config.grid_resolution,
            ncfile: files.output_ncfile.clone(),
            plot: files.output_plot_swath_wind_speed.clone(),
        };

        if let Some(path) = &files.output_summary {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let json = serde_json::to_string_pretty(&summary).context("serializing summary")?;
            fs::write(path, json)
                .with_context(|| format!("writing summary to {}", path.display()))?;
            info!("Run summary written to {}", path.display());
        }

        Ok(WorkflowResult { summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::track::{build_synthetic_track, SyntheticTrackConfig};
    use std::io::Write;
    use swathcore::AreaOfInterest;
    use tempfile::tempdir;

    fn config(dir: &Path) -> WorkflowConfig {
        let area = AreaOfInterest::new(16.0, 20.0, -68.0, -63.0).unwrap();
        let mut cfg = WorkflowConfig::from_args(area, 0.25, dir);
        cfg.plotting.pixels_per_degree = 20.0;
        cfg
    }

    #[test]
    fn runner_executes_workflow() {
        let dir = tempdir().unwrap();
        let cfg = config(dir.path());
        let runner = Runner::new(cfg.clone());
        let track = build_synthetic_track(&SyntheticTrackConfig::default()).unwrap();

        let result = runner.execute(&track).unwrap();
        assert_eq!(result.summary.track_points, track.len());
        assert_eq!(result.summary.folded, track.len());
        assert!(result.summary.skipped.is_empty());
        assert_eq!(result.summary.grid_shape, (17, 21));

        let peak = result.summary.peak.clone().unwrap();
        let strongest = track
            .iter()
            .map(|obs| obs.point.v_max)
            .fold(f64::MIN, f64::max);
        assert!(peak.speed_ms > 0.0 && peak.speed_ms <= strongest);

        let files = &cfg.files;
        assert!(files.output_ncfile.exists());
        assert!(files.output_plot_swath_wind_speed.exists());
        let summary = fs::read_to_string(files.output_summary.as_ref().unwrap()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(json["folded"], track.len());
    }

    #[test]
    fn runner_reports_skipped_points() {
        let dir = tempdir().unwrap();
        let runner = Runner::new(config(dir.path()));
        let mut track = build_synthetic_track(&SyntheticTrackConfig::default()).unwrap();
        track[3].point.r_max = 0.0;

        let result = runner.execute(&track).unwrap();
        assert_eq!(result.summary.folded, track.len() - 1);
        assert_eq!(result.summary.skipped.len(), 1);
        assert_eq!(result.summary.skipped[0].index, 3);
        assert!(result.summary.skipped[0].reason.contains("invalid parameter"));
    }

    #[test]
    fn runner_loads_bdeck_and_writes_intermediate() {
        let dir = tempdir().unwrap();
        let cfg = config(dir.path());
        let runner = Runner::new(cfg.clone());
        let input = dir.path().join("bal152017.dat");
        let mut file = fs::File::create(&input).unwrap();
        writeln!(file, "AL, 15, 2017091900,   , BEST,   0, 150N,  600W,  35, 1004, TS").unwrap();
        writeln!(file, "AL, 15, 2017091906,   , BEST,   0, 152N,  605W,  45, 1000, TS").unwrap();
        writeln!(
            file,
            "AL, 15, 2017092006,   , BEST,   0, 181N,  656W, 135,  917, HU,  34, NEQ,  120,  100,   80,  110, 1010,  200,  10"
        )
        .unwrap();
        drop(file);

        let track = runner.load_track(&input).unwrap();
        assert_eq!(track.len(), 1);
        assert_eq!(track[0].point.latitude, 18.1);
        assert!((track[0].point.r_max - 18_520.0).abs() < 1e-6);
        assert!(cfg
            .files
            .path_bdeck_intermediate
            .join("bal152017.dat")
            .exists());
    }
}
