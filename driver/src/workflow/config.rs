use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use swathcore::bdeck::DEFAULT_SKIP_ROWS;
use swathcore::output::RenderOptions;
use swathcore::AreaOfInterest;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileConfig {
    /// Directory receiving the converted track table.
    pub path_bdeck_intermediate: PathBuf,
    pub output_ncfile: PathBuf,
    pub output_plot_swath_wind_speed: PathBuf,
    #[serde(default)]
    pub output_summary: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BdeckConfig {
    pub skip_rows: usize,
}

impl Default for BdeckConfig {
    fn default() -> Self {
        Self {
            skip_rows: DEFAULT_SKIP_ROWS,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// `[lon_min, lon_max, lat_min, lat_max]`; the swath area when absent.
    pub extent: Option<[f64; 4]>,
    pub pixels_per_degree: f64,
    pub show_track: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            extent: None,
            pixels_per_degree: 200.0,
            show_track: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub files: FileConfig,
    #[serde(default)]
    pub bdeck: BdeckConfig,
    pub area: AreaOfInterest,
    pub grid_resolution: f64,
    #[serde(default)]
    pub plotting: PlotConfig,
    #[serde(default)]
    pub parallel: bool,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .area
            .validate()
            .with_context(|| format!("validating area in {}", path_ref.display()))?;
        Ok(config)
    }

    /// Puerto Rico defaults with outputs under `output_dir`.
    pub fn from_args(area: AreaOfInterest, grid_resolution: f64, output_dir: &Path) -> Self {
        Self {
            files: FileConfig {
                path_bdeck_intermediate: output_dir.join("interim"),
                output_ncfile: output_dir.join("processed").join("swath.nc"),
                output_plot_swath_wind_speed: output_dir.join("figures").join("swath.png"),
                output_summary: Some(output_dir.join("swath_summary.json")),
            },
            bdeck: BdeckConfig::default(),
            area,
            grid_resolution,
            plotting: PlotConfig::default(),
            parallel: false,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        let mut options = RenderOptions::new(self.plotting.extent.unwrap_or(self.area.extent()));
        options.pixels_per_degree = self.plotting.pixels_per_degree;
        options
    }
}
