use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::assets::paths::read_bytes;
use crate::config::validate::MAX_SURFACE_EDGE;
use crate::foundation::error::{BrandframeError, BrandframeResult};

/// Decoded raster image in premultiplied RGBA8 form.
///
/// Cloning is cheap; pixel storage is shared.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Build from straight-alpha RGBA8 pixels.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> BrandframeResult<Self> {
        if width == 0 || height == 0 {
            return Err(BrandframeError::asset("image must have non-zero dimensions"));
        }
        if width > MAX_SURFACE_EDGE || height > MAX_SURFACE_EDGE {
            return Err(BrandframeError::asset(format!(
                "image {width}x{height} exceeds the {MAX_SURFACE_EDGE}px raster limit"
            )));
        }
        if rgba.len() != width as usize * height as usize * 4 {
            return Err(BrandframeError::asset("image byte length mismatch"));
        }
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba),
        })
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> BrandframeResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PreparedImage::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn decode_image_file(path: &Path) -> BrandframeResult<PreparedImage> {
    let bytes = read_bytes(path)?;
    decode_image(&bytes).map_err(|e| {
        BrandframeError::asset(format!("decode image '{}': {e}", path.display()))
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
