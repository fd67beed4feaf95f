// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::ImageError;
use image::{ImageFormat, Rgba};
use std::io::Cursor;

/// Channel value at or above which a pixel counts as white.
pub const WHITE_THRESHOLD: u8 = 240;

/// Decode a PNG, make every near-white pixel fully transparent, and
/// re-encode it as RGBA PNG.
pub fn make_white_transparent(png: &[u8]) -> Result<Vec<u8>, ImageError> {
    let mut img = image::load_from_memory_with_format(png, ImageFormat::Png)?.to_rgba8();
    for pixel in img.pixels_mut() {
        let Rgba([r, g, b, _]) = *pixel;
        if r >= WHITE_THRESHOLD && g >= WHITE_THRESHOLD && b >= WHITE_THRESHOLD {
            *pixel = Rgba([255, 255, 255, 0]);
        }
    }
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
