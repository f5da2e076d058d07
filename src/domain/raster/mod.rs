// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/raster/mod.rs
//
// Raster module: decoding selected files and exporting crops.

mod decode;
mod export;

pub use decode::{SelectedFile, decode};
pub use export::{CroppedBlob, render_jpeg};
