// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/crop/mod.rs
//
// Crop module: region model, selection state and the crop library seam.

mod library;
mod region;
mod selection;

pub use library::{CropLibrary, CropSession, GestureCropper};
pub use region::{CropOptions, CropRegion, largest_fit};
pub use selection::{CropSelection, DragHandle};
