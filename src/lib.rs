// SPDX-License-Identifier: GPL-3.0-or-later
// src/lib.rs
//
// Headless crop-and-upload widget.

pub mod app;
pub mod config;
pub mod constant;
pub mod domain;

pub use app::{Collaborators, CropUploadWidget, WidgetEvent, WidgetOptions};
pub use config::{AppConfig, WidgetConfig};
pub use domain::crop::{CropOptions, CropRegion};
pub use domain::raster::{CroppedBlob, SelectedFile};
