//! Conversion of packed `0xRRGGBB` pixels into raw PNG scanlines.
//!
//! Each row of `width` pixels becomes one filter selector byte followed by
//! three samples per pixel. The sample values depend on the [`ColorMode`].

use crate::ColorMode;
use crate::constants::BYTES_PER_PIXEL;

#[inline]
fn unpack(pixel: u32) -> (u32, u32, u32) {
    ((pixel >> 16) & 0xFF, (pixel >> 8) & 0xFF, pixel & 0xFF)
}

/// Luminance with integer weights 76/150/29 (sum 255) over 256.
#[inline]
pub fn luminance(r: u32, g: u32, b: u32) -> u8 {
    ((76 * r + 150 * g + 29 * b) >> 8) as u8
}

/// Sepia tone. The blue channel is truncated rather than clamped.
#[inline]
pub fn sepia(r: u32, g: u32, b: u32) -> [u8; 3] {
    [
        ((100 * r + 196 * g + 48 * b) >> 8).min(255) as u8,
        ((89 * r + 175 * g + 43 * b) >> 8).min(255) as u8,
        ((69 * r + 136 * g + 33 * b) >> 8) as u8,
    ]
}

#[inline]
fn transform_pixel(pixel: u32, color_mode: ColorMode) -> [u8; 3] {
    match color_mode {
        ColorMode::Direct => [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8],
        ColorMode::Grayscale => {
            let (r, g, b) = unpack(pixel);
            let y = luminance(r, g, b);
            [y, y, y]
        }
        ColorMode::Sepia => {
            let (r, g, b) = unpack(pixel);
            sepia(r, g, b)
        }
    }
}

/// Size in bytes of `rows` raw scanlines of `width` pixels.
pub fn raw_size(width: usize, rows: usize) -> usize {
    (BYTES_PER_PIXEL * width + 1) * rows
}

/// Builds raw scanlines for `pixels`, `width` pixels per row.
///
/// The row count is `pixels.len() / width`; a trailing partial row is
/// dropped. A zero `width` yields no rows.
pub fn transform(pixels: &[u32], width: usize, color_mode: ColorMode, filter_byte: u8) -> Vec<u8> {
    if width == 0 {
        return Vec::new();
    }

    let rows = pixels.len() / width;
    let mut raw = Vec::with_capacity(raw_size(width, rows));

    for row in pixels.chunks_exact(width) {
        raw.push(filter_byte);
        for &pixel in row {
            raw.extend_from_slice(&transform_pixel(pixel, color_mode));
        }
    }

    raw
}
