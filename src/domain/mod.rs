// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/mod.rs
//
// Domain layer: pure crop and image logic, no widget or I/O concerns.

pub mod crop;
pub mod raster;
