//! PNG encoding for rendered swath maps.
//!
//! Two encodings are available:
//! - **Indexed (color type 3)** when the image has at most 256 distinct
//!   colors, which is the usual case for a quantized wind scale.
//! - **RGBA (color type 6)** otherwise.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use log::info;

use super::render::RenderedImage;
use super::{OutputError, OutputResult};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];
const MAX_PALETTE_SIZE: usize = 256;

type Rgba = (u8, u8, u8, u8);

fn check_len(pixels: &[u8], width: usize, height: usize) -> OutputResult<()> {
    if pixels.len() != width * height * 4 {
        return Err(OutputError::InvalidShape(format!(
            "{} bytes for a {}x{} RGBA image",
            pixels.len(),
            width,
            height
        )));
    }
    Ok(())
}

/// Picks indexed encoding when the palette fits, RGBA otherwise.
pub fn encode_png_auto(pixels: &[u8], width: usize, height: usize) -> OutputResult<Vec<u8>> {
    check_len(pixels, width, height)?;
    match extract_palette(pixels) {
        Some((palette, indices)) => encode_png_indexed(width, height, &palette, &indices),
        None => encode_png(pixels, width, height),
    }
}

fn extract_palette(pixels: &[u8]) -> Option<(Vec<Rgba>, Vec<u8>)> {
    let mut color_to_index: HashMap<Rgba, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<Rgba> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for chunk in pixels.chunks_exact(4) {
        let color = (chunk[0], chunk[1], chunk[2], chunk[3]);
        let index = match color_to_index.get(&color) {
            Some(&index) => index,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let index = palette.len() as u8;
                palette.push(color);
                color_to_index.insert(color, index);
                index
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

fn encode_png_indexed(
    width: usize,
    height: usize,
    palette: &[Rgba],
    indices: &[u8],
) -> OutputResult<Vec<u8>> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3)?);

    let plte: Vec<u8> = palette.iter().flat_map(|&(r, g, b, _)| [r, g, b]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|&(_, _, _, a)| a < 255) {
        let trns: Vec<u8> = palette.iter().map(|&(_, _, _, a)| a).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_chunk(&mut png, b"IDAT", &deflate_scanlines(indices, width, height, 1)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encodes RGBA pixel data (4 bytes per pixel, row-major, top row first).
pub fn encode_png(pixels: &[u8], width: usize, height: usize) -> OutputResult<Vec<u8>> {
    check_len(pixels, width, height)?;
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6)?);
    write_chunk(&mut png, b"IDAT", &deflate_scanlines(pixels, width, height, 4)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn ihdr(width: usize, height: usize, color_type: u8) -> OutputResult<Vec<u8>> {
    let to_u32 = |value: usize| {
        u32::try_from(value)
            .map_err(|_| OutputError::InvalidShape(format!("dimension {} too large", value)))
    };
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&to_u32(width)?.to_be_bytes());
    data.extend_from_slice(&to_u32(height)?.to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    Ok(data)
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefixes each scanline with filter type 0 and zlib-compresses the result.
fn deflate_scanlines(
    data: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> OutputResult<Vec<u8>> {
    let stride = width * bytes_per_pixel;
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for row in data.chunks_exact(stride.max(1)).take(height) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(&uncompressed)
        .map_err(|e| OutputError::Encode(format!("IDAT compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| OutputError::Encode(format!("IDAT compression failed: {}", e)))
}

pub fn write_png<P: AsRef<Path>>(path: P, image: &RenderedImage) -> OutputResult<()> {
    let path = path.as_ref();
    let bytes = encode_png_auto(&image.pixels, image.width, image.height)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    info!("Swath map saved to {}", path.display());
    Ok(())
}
