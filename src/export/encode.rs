use std::io::Cursor;
use std::str::FromStr;

use anyhow::Context as _;

use crate::foundation::error::{BrandframeError, BrandframeResult};
use crate::render::surface::RenderedSurface;

/// Image container written for each exported format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportImageFormat {
    /// Lossless PNG with alpha.
    #[default]
    Png,
    /// Baseline JPEG; alpha is dropped.
    Jpeg {
        /// Encoder quality, 1..=100.
        quality: u8,
    },
}

impl ExportImageFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}

impl FromStr for ExportImageFormat {
    type Err = BrandframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg { quality: 90 }),
            other => Err(BrandframeError::validation(format!(
                "unknown export image format '{other}' (expected png or jpeg)"
            ))),
        }
    }
}

/// Encode one surface into an in-memory image file.
pub fn encode_surface(
    surface: &RenderedSurface,
    format: ExportImageFormat,
) -> BrandframeResult<Vec<u8>> {
    let rgba = surface.to_rgba_image()?;
    let mut out = Vec::new();
    match format {
        ExportImageFormat::Png => {
            rgba.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
                .context("encode png")?;
        }
        ExportImageFormat::Jpeg { quality } => {
            let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();
            let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut out,
                quality.clamp(1, 100),
            );
            enc.encode_image(&rgb).context("encode jpeg")?;
        }
    }
    Ok(out)
}
