//! Rasterises a swath over a geographic extent with a jet color scale.

use log::debug;
use rayon::prelude::*;

use super::{OutputError, OutputResult};
use crate::processing::{Grid, SwathOutput};

const MAX_PIXELS: usize = 64 * 1024 * 1024;
const DEFAULT_LEVELS: usize = 50;
const COLORBAR_GAP_PX: usize = 8;
const COLORBAR_WIDTH_PX: usize = 16;
const TRACK_MARKER_RADIUS_PX: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
    pub const TRACK: Color = Color::new(220, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Matplotlib-style `jet` colormap for `t` in `[0, 1]`.
pub fn jet(t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let channel = |center: f64| {
        let value = (1.5 - (4.0 * t - center).abs()).clamp(0.0, 1.0);
        (value * 255.0).round() as u8
    };
    Color::new(channel(3.0), channel(2.0), channel(1.0), 255)
}

/// Filled-contour style quantisation: `levels` evenly spaced boundaries from 0
/// to the rounded maximum, values above the top level saturate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    max: f64,
    levels: usize,
}

impl ColorScale {
    pub fn new(max: f64, levels: usize) -> Self {
        let max = max.round();
        Self {
            max: if max > 0.0 { max } else { 1.0 },
            levels: levels.max(2),
        }
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn color(&self, value: f64) -> Color {
        if value.is_nan() {
            return Color::TRANSPARENT;
        }
        let bands = (self.levels - 1) as f64;
        let band = (value / self.max * bands).floor().clamp(0.0, bands - 1.0);
        jet(band / (bands - 1.0).max(1.0))
    }
}

/// How to draw a swath map.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// `[lon_min, lon_max, lat_min, lat_max]` in degrees.
    pub extent: [f64; 4],
    pub pixels_per_degree: f64,
    pub levels: usize,
    /// Storm centers drawn as markers, `(latitude, longitude)`.
    pub track: Vec<(f64, f64)>,
    pub colorbar: bool,
}

impl RenderOptions {
    pub fn new(extent: [f64; 4]) -> Self {
        Self {
            extent,
            pixels_per_degree: 200.0,
            levels: DEFAULT_LEVELS,
            track: Vec::new(),
            colorbar: true,
        }
    }
}

/// RGBA raster, 4 bytes per pixel, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl RenderedImage {
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        let offset = (y * self.width + x) * 4;
        Color::new(
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
            self.pixels[offset + 3],
        )
    }

    fn put(&mut self, x: usize, y: usize, color: Color) {
        let offset = (y * self.width + x) * 4;
        self.pixels[offset..offset + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }
}

/// Fractional index of `value` along a regular axis, `None` outside it.
fn axis_position(axis: &[f64], step: f64, value: f64) -> Option<f64> {
    let first = *axis.first()?;
    let position = (value - first) / step;
    let last = (axis.len() - 1) as f64;
    if position >= 0.0 && position <= last {
        Some(position)
    } else {
        None
    }
}

/// Bilinear sample of the swath at a geographic point; NaN corners yield NaN.
fn sample(grid: &Grid, swath: &ndarray::Array2<f64>, latitude: f64, longitude: f64) -> Option<f64> {
    let step = grid.resolution();
    let fi = axis_position(grid.latitudes(), step, latitude)?;
    let fj = axis_position(grid.longitudes(), step, longitude)?;
    let (n_lat, n_lon) = grid.shape();

    let i0 = fi.floor() as usize;
    let j0 = fj.floor() as usize;
    let i1 = (i0 + 1).min(n_lat - 1);
    let j1 = (j0 + 1).min(n_lon - 1);
    let di = fi - i0 as f64;
    let dj = fj - j0 as f64;

    let top = swath[[i0, j0]] * (1.0 - dj) + swath[[i0, j1]] * dj;
    let bottom = swath[[i1, j0]] * (1.0 - dj) + swath[[i1, j1]] * dj;
    Some(top * (1.0 - di) + bottom * di)
}

fn validate(options: &RenderOptions) -> OutputResult<(usize, usize)> {
    let [lon_min, lon_max, lat_min, lat_max] = options.extent;
    if !(lon_min < lon_max && lat_min < lat_max) {
        return Err(OutputError::InvalidShape(format!(
            "degenerate extent {:?}",
            options.extent
        )));
    }
    if !(options.pixels_per_degree > 0.0 && options.pixels_per_degree.is_finite()) {
        return Err(OutputError::InvalidShape(format!(
            "pixels per degree must be positive, got {}",
            options.pixels_per_degree
        )));
    }
    let width = ((lon_max - lon_min) * options.pixels_per_degree).ceil() as usize;
    let height = ((lat_max - lat_min) * options.pixels_per_degree).ceil() as usize;
    if width == 0 || height == 0 || width.saturating_mul(height) > MAX_PIXELS {
        return Err(OutputError::InvalidShape(format!(
            "{}x{} map is out of range",
            width, height
        )));
    }
    Ok((width, height))
}

/// Draws the swath map, optionally followed by a vertical color bar on the right.
///
/// Pixels outside the grid or over NaN cells stay transparent.
pub fn render_swath(output: &SwathOutput, options: &RenderOptions) -> OutputResult<RenderedImage> {
    let (map_width, height) = validate(options)?;
    let [lon_min, _, _, lat_max] = options.extent;
    let ppd = options.pixels_per_degree;

    let peak = output.peak().map(|peak| peak.speed).unwrap_or(0.0);
    let scale = ColorScale::new(peak, options.levels);
    let width = if options.colorbar {
        map_width + COLORBAR_GAP_PX + COLORBAR_WIDTH_PX
    } else {
        map_width
    };
    debug!(
        "rendering {}x{} swath map, scale 0..{}",
        width,
        height,
        scale.max()
    );

    let mut pixels = vec![0u8; width * height * 4];
    pixels
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let latitude = lat_max - (y as f64 + 0.5) / ppd;
            for x in 0..map_width {
                let longitude = lon_min + (x as f64 + 0.5) / ppd;
                let color = sample(&output.grid, &output.swath, latitude, longitude)
                    .map(|value| scale.color(value))
                    .unwrap_or(Color::TRANSPARENT);
                row[x * 4..x * 4 + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
            }
            if options.colorbar {
                let fraction = 1.0 - (y as f64 + 0.5) / height as f64;
                let color = scale.color(fraction * scale.max());
                for x in map_width + COLORBAR_GAP_PX..width {
                    row[x * 4..x * 4 + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
                }
            }
        });

    let mut image = RenderedImage {
        width,
        height,
        pixels,
    };
    for &(latitude, longitude) in &options.track {
        draw_marker(&mut image, map_width, options, latitude, longitude);
    }
    Ok(image)
}

fn draw_marker(
    image: &mut RenderedImage,
    map_width: usize,
    options: &RenderOptions,
    latitude: f64,
    longitude: f64,
) {
    let [lon_min, _, _, lat_max] = options.extent;
    let cx = ((longitude - lon_min) * options.pixels_per_degree).floor();
    let cy = ((lat_max - latitude) * options.pixels_per_degree).floor();
    if !(cx.is_finite() && cy.is_finite()) {
        return;
    }
    let (cx, cy) = (cx as i64, cy as i64);
    let r = TRACK_MARKER_RADIUS_PX;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x >= 0 && y >= 0 && (x as usize) < map_width && (y as usize) < image.height {
                image.put(x as usize, y as usize, Color::TRACK);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::generate_swath;
    use crate::track::{AreaOfInterest, TrackPoint};

    fn area() -> AreaOfInterest {
        AreaOfInterest::new(17.0, 19.0, -68.0, -65.0).unwrap()
    }

    fn swath() -> SwathOutput {
        let track = [
            TrackPoint::new(17.5, -65.5, 60.0, 25_000.0),
            TrackPoint::new(18.2, -66.8, 55.0, 30_000.0),
        ];
        generate_swath(&track, &area(), 0.1).unwrap()
    }

    #[test]
    fn jet_endpoints() {
        assert_eq!(jet(0.0), Color::new(0, 0, 128, 255));
        assert_eq!(jet(1.0), Color::new(128, 0, 0, 255));
        assert_eq!(jet(0.5), Color::new(128, 255, 128, 255));
    }

    #[test]
    fn scale_saturates_and_hides_nan() {
        let scale = ColorScale::new(49.6, 50);
        assert_eq!(scale.max(), 50.0);
        assert_eq!(scale.color(0.0), jet(0.0));
        assert_eq!(scale.color(500.0), jet(1.0));
        assert_eq!(scale.color(f64::NAN), Color::TRANSPARENT);
        assert_eq!(ColorScale::new(0.0, 50).max(), 1.0);
    }

    #[test]
    fn image_size_follows_extent_and_colorbar() {
        let mut options = RenderOptions::new(area().extent());
        options.pixels_per_degree = 20.0;
        let image = render_swath(&swath(), &options).unwrap();
        assert_eq!(image.height, 40);
        assert_eq!(image.width, 60 + COLORBAR_GAP_PX + COLORBAR_WIDTH_PX);
        assert_eq!(image.pixels.len(), image.width * image.height * 4);

        options.colorbar = false;
        assert_eq!(render_swath(&swath(), &options).unwrap().width, 60);
    }

    #[test]
    fn outside_grid_is_transparent() {
        let mut options = RenderOptions::new([-70.0, -65.0, 17.0, 19.0]);
        options.pixels_per_degree = 10.0;
        options.colorbar = false;
        let image = render_swath(&swath(), &options).unwrap();
        assert_eq!(image.pixel(0, 10), Color::TRANSPARENT);
        assert_eq!(image.pixel(45, 10).a, 255);
    }

    #[test]
    fn nan_cells_render_transparent() {
        let mut output = swath();
        output.swath.fill(f64::NAN);
        let mut options = RenderOptions::new(area().extent());
        options.pixels_per_degree = 10.0;
        options.colorbar = false;
        let image = render_swath(&output, &options).unwrap();
        assert!(image.pixels.chunks_exact(4).all(|px| px[3] == 0));
    }

    #[test]
    fn track_markers_are_drawn() {
        let mut options = RenderOptions::new(area().extent());
        options.pixels_per_degree = 20.0;
        options.track = vec![(18.0, -66.5)];
        let image = render_swath(&swath(), &options).unwrap();
        assert_eq!(image.pixel(30, 20), Color::TRACK);
    }

    #[test]
    fn degenerate_extent_is_rejected() {
        let options = RenderOptions::new([-65.0, -68.0, 17.0, 19.0]);
        assert!(matches!(
            render_swath(&swath(), &options),
            Err(OutputError::InvalidShape(_))
        ));
    }
}
