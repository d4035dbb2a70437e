// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Image to colored ASCII art.
//!
//! Icons are composited over white, scaled to the requested width (height follows the image
//! aspect ratio corrected for monospace cells) and mapped to a density ramp.

use std::collections::HashMap;
use std::fmt;

use image::imageops::{self, FilterType};
use image::{Rgb as ImageRgb, RgbImage};

use crate::terminal::{Rgb, RichSpan};

pub const MIN_ASCII_WIDTH: u16 = 10;
pub const MAX_ASCII_WIDTH: u16 = 100;
/// Tall images are squeezed to this many rows.
pub const MAX_ASCII_ROWS: u16 = 100;

/// Width/height ratio of a terminal cell.
const CHAR_ASPECT: f32 = 0.55;
const RAMP: &[u8] = b" .:-=+*#%@";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiArt {
    rows: Vec<Vec<(char, Rgb)>>,
}

impl AsciiArt {
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn plain_rows(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.iter().map(|(ch, _)| *ch).collect()).collect()
    }

    /// One span per run of equally colored cells.
    pub fn span_rows(&self) -> Vec<Vec<RichSpan>> {
        self.rows
            .iter()
            .map(|row| {
                let mut spans: Vec<RichSpan> = Vec::new();
                for &(ch, color) in row {
                    match spans.last_mut() {
                        Some(last) if last.color == Some(color) => last.text.push(ch),
                        _ => spans.push(RichSpan::colored(ch.to_string(), color)),
                    }
                }
                spans
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsciiError {
    Decode(String),
    Empty,
}

impl fmt::Display for AsciiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(message) => write!(f, "cannot decode image: {message}"),
            Self::Empty => f.write_str("image has no pixels"),
        }
    }
}

impl std::error::Error for AsciiError {}

pub fn clamp_width(width: i64) -> u16 {
    width.clamp(i64::from(MIN_ASCII_WIDTH), i64::from(MAX_ASCII_WIDTH)) as u16
}

pub fn image_to_ascii(bytes: &[u8], width: u16) -> Result<AsciiArt, AsciiError> {
    let flattened = decode_on_white(bytes)?;
    let (src_w, src_h) = flattened.dimensions();
    let width = u32::from(clamp_width(i64::from(width)));
    let height = ((width as f32) * (src_h as f32 / src_w as f32) * CHAR_ASPECT)
        .round()
        .clamp(1.0, f32::from(MAX_ASCII_ROWS)) as u32;
    let scaled = imageops::resize(&flattened, width, height, FilterType::Triangle);

    let rows = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let ImageRgb([r, g, b]) = *scaled.get_pixel(x, y);
                    let color = Rgb::new(r, g, b);
                    (density_char(color), color)
                })
                .collect()
        })
        .collect();
    Ok(AsciiArt { rows })
}

/// Most frequent opaque color, ignoring near-white and near-black; white when too dark to read.
pub fn dominant_color(bytes: &[u8]) -> Result<Rgb, AsciiError> {
    let image = image::load_from_memory(bytes).map_err(|err| AsciiError::Decode(err.to_string()))?;
    let rgba = image.to_rgba8();

    let mut counts: HashMap<Rgb, usize> = HashMap::new();
    let mut best = (Rgb::WHITE, 0usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        if a < 200 {
            continue;
        }
        if (r > 250 && g > 250 && b > 250) || (r < 5 && g < 5 && b < 5) {
            continue;
        }
        let color = Rgb::new(r, g, b);
        let count = counts.entry(color).or_insert(0);
        *count += 1;
        if *count > best.1 {
            best = (color, *count);
        }
    }

    let color = best.0;
    Ok(if color.brightness() < 70 { Rgb::WHITE } else { color })
}

fn decode_on_white(bytes: &[u8]) -> Result<RgbImage, AsciiError> {
    let image = image::load_from_memory(bytes).map_err(|err| AsciiError::Decode(err.to_string()))?;
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(AsciiError::Empty);
    }
    Ok(RgbImage::from_fn(w, h, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        ImageRgb([blend(r), blend(g), blend(b)])
    }))
}

fn density_char(color: Rgb) -> char {
    let darkness = 255 - color.brightness().min(255);
    let idx = (darkness as usize * (RAMP.len() - 1) + 127) / 255;
    RAMP[idx] as char
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::disc_icon_png;

    #[test]
    fn width_is_clamped_to_supported_range() {
        assert_eq!(clamp_width(5), 10);
        assert_eq!(clamp_width(500), 100);
        assert_eq!(clamp_width(42), 42);
    }

    #[test]
    fn square_icon_keeps_requested_width() {
        let png = disc_icon_png([200, 30, 30]).expect("png");
        let art = image_to_ascii(&png, 20).expect("ascii");
        assert_eq!(art.width(), 20);
        assert_eq!(art.height(), 11);
        let rows = art.plain_rows();
        assert!(rows[0].starts_with(' '), "transparent corner renders as white space");
        assert!(rows[art.height() / 2].contains(|ch: char| ch != ' '));
    }

    #[test]
    fn spans_merge_equal_colors() {
        let png = disc_icon_png([0, 0, 255]).expect("png");
        let art = image_to_ascii(&png, 10).expect("ascii");
        for row in art.span_rows() {
            let cells = row.iter().map(|span| span.text.chars().count()).sum::<usize>();
            assert_eq!(cells, 10);
            for pair in row.windows(2) {
                assert_ne!(pair[0].color, pair[1].color);
            }
        }
    }

    #[test]
    fn dominant_color_skips_transparency() {
        let png = disc_icon_png([40, 160, 90]).expect("png");
        assert_eq!(dominant_color(&png).expect("color"), Rgb::new(40, 160, 90));
    }

    #[test]
    fn dark_dominant_color_falls_back_to_white() {
        let png = disc_icon_png([20, 20, 30]).expect("png");
        assert_eq!(dominant_color(&png).expect("color"), Rgb::WHITE);
    }

    #[test]
    fn very_tall_image_is_capped_in_rows() {
        let strip = image::RgbaImage::from_pixel(1, 4000, image::Rgba([10, 10, 10, 255]));
        let mut png = Vec::new();
        strip
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("png");
        let art = image_to_ascii(&png, MAX_ASCII_WIDTH).expect("ascii");
        assert_eq!(art.width(), usize::from(MAX_ASCII_WIDTH));
        assert_eq!(art.height(), usize::from(MAX_ASCII_ROWS));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(image_to_ascii(b"nope", 20), Err(AsciiError::Decode(_))));
    }
}
