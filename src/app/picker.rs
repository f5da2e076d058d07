// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/picker.rs
//
// File picker seam opened by the clickable area.

use std::collections::VecDeque;
use std::path::PathBuf;

use crate::domain::raster::SelectedFile;

/// Opens a picker and returns the chosen file, or `None` if the user
/// cancelled.
pub trait FilePicker: Send {
    fn pick(&mut self) -> Option<SelectedFile>;
}

/// Picker that never yields a file.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFilePicker;

impl FilePicker for NoFilePicker {
    fn pick(&mut self) -> Option<SelectedFile> {
        log::debug!("No file picker available");
        None
    }
}

/// Picker that answers with queued paths, one per click.
#[derive(Debug, Default, Clone)]
pub struct PathPicker {
    queue: VecDeque<PathBuf>,
}

impl PathPicker {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            queue: paths.into_iter().collect(),
        }
    }
}

impl FilePicker for PathPicker {
    fn pick(&mut self) -> Option<SelectedFile> {
        let path = self.queue.pop_front()?;
        match SelectedFile::open(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                log::error!("{e:#}");
                None
            }
        }
    }
}
