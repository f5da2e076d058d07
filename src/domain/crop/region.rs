// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/crop/region.rs
//
// Crop region and crop constraints.

use crate::constant::{CROP_ASPECT_RATIO, MIN_CROP_SIZE};

/// Crop region in source-image pixel coordinates.
///
/// Pure domain model - represents a rectangular region to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.x, self.y, self.width, self.height)
    }

    /// Check if region has valid dimensions.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Clamp the region into an image of the given size.
    ///
    /// Returns `None` when nothing of the region lies inside the image.
    pub fn clamp_to(&self, img_width: u32, img_height: u32) -> Option<Self> {
        if self.x >= img_width || self.y >= img_height {
            return None;
        }
        let width = self.width.min(img_width - self.x);
        let height = self.height.min(img_height - self.y);
        let clamped = Self::new(self.x, self.y, width, height);
        clamped.is_valid().then_some(clamped)
    }
}

/// Constraints a crop session enforces on every rectangle it reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropOptions {
    /// Locked width / height ratio.
    pub aspect_ratio: f32,
    /// Minimum (width, height) in source pixels.
    pub min_size: (u32, u32),
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: CROP_ASPECT_RATIO,
            min_size: (MIN_CROP_SIZE, MIN_CROP_SIZE),
        }
    }
}

impl CropOptions {
    pub fn with_min_size(mut self, width: u32, height: u32) -> Self {
        self.min_size = (width, height);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0
    }

    /// Minimum (width, height) that satisfies both the minimum size and the
    /// aspect ratio, shrunk to fit when the image is smaller than that.
    pub fn effective_min(&self, img_width: f32, img_height: f32) -> (f32, f32) {
        let ratio = self.aspect_ratio;
        let (min_w, min_h) = (self.min_size.0 as f32, self.min_size.1 as f32);
        let (max_w, _) = largest_fit(img_width, img_height, ratio);
        let width = min_w.max(min_h * ratio).min(max_w);
        (width, width / ratio)
    }

    /// Starting rectangle: the largest one of the locked ratio, centered.
    pub fn initial_region(&self, img_width: f32, img_height: f32) -> (f32, f32, f32, f32) {
        let (w, h) = largest_fit(img_width, img_height, self.aspect_ratio);
        ((img_width - w) / 2.0, (img_height - h) / 2.0, w, h)
    }
}

/// Largest (width, height) of the given ratio that fits in the image.
pub fn largest_fit(img_width: f32, img_height: f32, ratio: f32) -> (f32, f32) {
    let width = img_width.min(img_height * ratio);
    (width, width / ratio)
}
