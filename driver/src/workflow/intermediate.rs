use anyhow::Context;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use swathcore::TrackObservation;

const HEADER: [&str; 12] = [
    "YYYYMMDDHH",
    "LATN/S",
    "LONE/W",
    "VMAX",
    "RMW",
    "RAD",
    "RAD1",
    "RAD2",
    "RAD3",
    "RAD4",
    "X",
    "Y",
];

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes the SI-converted track next to other interim data, named after the
/// source deck. An existing file is left untouched.
///
/// Returns the table path and whether it was written by this call.
pub fn write_intermediate(
    dir: &Path,
    source: &Path,
    observations: &[TrackObservation],
) -> anyhow::Result<(PathBuf, bool)> {
    let file_name = source
        .file_name()
        .with_context(|| format!("deriving table name from {}", source.display()))?;
    let path = dir.join(file_name);
    if path.exists() {
        info!("Intermediate file {} already exists, not rewriting", path.display());
        return Ok((path, false));
    }

    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating intermediate table {}", path.display()))?;
    writer.write_record(HEADER)?;
    for obs in observations {
        let [rad1, rad2, rad3, rad4] = obs.quadrant_radii_m;
        writer.write_record([
            obs.time.format("%Y-%m-%d %H:%M:%S").to_string(),
            obs.point.latitude.to_string(),
            obs.point.longitude.to_string(),
            obs.point.v_max.to_string(),
            obs.point.r_max.to_string(),
            optional(obs.rad_threshold_ms),
            optional(rad1),
            optional(rad2),
            optional(rad3),
            optional(rad4),
            obs.utm_x.to_string(),
            obs.utm_y.to_string(),
        ])?;
    }
    writer.flush()?;
    info!("Intermediate file created in {}", path.display());
    Ok((path, true))
}
