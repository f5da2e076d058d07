// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/raster/export.rs
//
// Render a crop region of an image into a JPEG blob.

use std::fmt;

use anyhow::Context;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView};

use crate::constant::EXPORT_MIME;
use crate::domain::crop::CropRegion;

/// Encoded crop, ready for an upload channel.
#[derive(Clone, PartialEq, Eq)]
pub struct CroppedBlob {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CroppedBlob {
    pub fn mime(&self) -> &'static str {
        EXPORT_MIME
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for CroppedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CroppedBlob({}x{}, {} bytes)",
            self.width,
            self.height,
            self.bytes.len()
        )
    }
}

/// Draw exactly `region` of `image` onto a fresh buffer of the region's
/// size and encode it as JPEG.
pub fn render_jpeg(
    image: &DynamicImage,
    region: CropRegion,
    quality: u8,
) -> anyhow::Result<CroppedBlob> {
    let (img_width, img_height) = image.dimensions();
    let region = region.clamp_to(img_width, img_height).with_context(|| {
        format!("Crop region {region:?} is outside image bounds ({img_width}, {img_height})")
    })?;

    let (x, y, width, height) = region.as_tuple();
    // JPEG has no alpha channel.
    let pixels = image.crop_imm(x, y, width, height).to_rgb8();

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(&pixels)
        .context("Failed to encode JPEG")?;

    Ok(CroppedBlob {
        bytes,
        width,
        height,
    })
}
