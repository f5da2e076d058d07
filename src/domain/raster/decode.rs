// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/raster/decode.rs
//
// Selected files and decoding them into images.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use anyhow::Context;
use image::{DynamicImage, GenericImageView, ImageReader};

/// A file handed to the widget by the picker, a drop, or a remote fetch.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Ok(Self { name, bytes })
    }
}

/// Decode a selected file. The format is sniffed from the content, not the
/// name. EXIF orientation is applied when the `exif` feature is on.
pub fn decode(file: &SelectedFile) -> anyhow::Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(&file.bytes))
        .with_guessed_format()
        .with_context(|| format!("Failed to read {}", file.name))?;
    let format = reader.format();
    let image = reader
        .decode()
        .with_context(|| format!("Failed to decode {}", file.name))?;

    #[cfg(feature = "exif")]
    let image = orient(image, &file.bytes);

    let (width, height) = image.dimensions();
    log::debug!("Decoded {} ({format:?}, {width}x{height})", file.name);
    Ok(image)
}

/// Apply the EXIF orientation tag, if the file carries one.
#[cfg(feature = "exif")]
fn orient(mut image: DynamicImage, bytes: &[u8]) -> DynamicImage {
    use image::metadata::Orientation;

    let Some(tag) = exif_orientation(bytes) else {
        return image;
    };
    match u8::try_from(tag).ok().and_then(Orientation::from_exif) {
        Some(orientation) => image.apply_orientation(orientation),
        None => log::warn!("Ignoring unknown EXIF orientation {tag}"),
    }
    image
}

#[cfg(feature = "exif")]
fn exif_orientation(bytes: &[u8]) -> Option<u32> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?
        .value
        .get_uint(0)
}
