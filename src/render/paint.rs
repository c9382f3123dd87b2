use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::Size;
use crate::foundation::error::{BrandframeError, BrandframeResult};

/// Decoded image wrapped as a rasterizer paint, built once and reused by every render pass.
#[derive(Clone)]
pub struct ImagePaint {
    width: u32,
    height: u32,
    pub(crate) paint: vello_cpu::Image,
}

impl std::fmt::Debug for ImagePaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePaint")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl ImagePaint {
    /// Wrap a premultiplied image as a paint.
    pub fn from_prepared(img: &PreparedImage) -> BrandframeResult<Self> {
        let pixmap = image_premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
        Ok(Self {
            width: img.width,
            height: img.height,
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size in pixels.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> BrandframeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BrandframeError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BrandframeError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(BrandframeError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}
