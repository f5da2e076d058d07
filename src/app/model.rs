// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/model.rs
//
// Widget state: the active image and its crop session, owned together.

use std::fmt;

use image::DynamicImage;

use crate::app::container::ImageElement;
use crate::constant::JPEG_QUALITY;
use crate::domain::crop::{CropOptions, CropRegion, CropSession};

/// Per-widget tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetOptions {
    pub crop: CropOptions,
    pub jpeg_quality: u8,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            crop: CropOptions::default(),
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

/// Decoded image shown in the container.
pub struct ActiveImage {
    pub element: ImageElement,
    pub image: DynamicImage,
}

/// One image plus the crop session running over it. Neither exists
/// without the other.
pub struct Session {
    image: ActiveImage,
    crop: Box<dyn CropSession>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("element", &self.image.element)
            .field("region", &self.crop.value())
            .finish()
    }
}

impl Session {
    pub fn new(image: ActiveImage, crop: Box<dyn CropSession>) -> Self {
        Self { image, crop }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image.image
    }

    pub fn element(&self) -> &ImageElement {
        &self.image.element
    }

    pub fn region(&self) -> CropRegion {
        self.crop.value()
    }

    pub fn crop_mut(&mut self) -> &mut dyn CropSession {
        self.crop.as_mut()
    }

    /// Destroy the crop session and release the image. Returns the element
    /// so the caller can take it out of the container.
    pub fn destroy(mut self) -> ImageElement {
        self.crop.destroy();
        self.image.element
    }
}
