// SPDX-License-Identifier: GPL-3.0-or-later
// src/constant.rs
//
// Widget constants that should not be changed by the user.

/// Locked crop aspect ratio (width / height). 1.0 = square.
pub const CROP_ASPECT_RATIO: f32 = 1.0;

/// Minimum crop edge length in source pixels.
pub const MIN_CROP_SIZE: u32 = 100;

/// JPEG quality for exported blobs (1..=100, 90 = 0.9).
pub const JPEG_QUALITY: u8 = 90;

/// MIME type of every exported blob.
pub const EXPORT_MIME: &str = "image/jpeg";

/// Side length of the square hit area around a resize handle, in source pixels.
pub const HANDLE_HIT_SIZE: f32 = 28.0;

/// Container attribute holding the upload slot name.
pub const ATTR_UPLOAD_NAME: &str = "data-upload-name";

/// Container attribute holding the server-side deletion reference.
pub const ATTR_UPLOAD_REF: &str = "data-upload-ref";

/// Container attribute holding the URL of a previously uploaded image.
pub const ATTR_UPLOADED_IMAGE: &str = "data-uploaded-image";

/// Class of the sub-element that opens the file picker.
pub const CLICKABLE_AREA_CLASS: &str = "croppr-clickable-area";

/// Class of the sub-element that deletes the current image.
pub const DELETE_BUTTON_CLASS: &str = "croppr-delete-button";

/// Host event pushed when the user deletes the image.
pub const DELETE_EVENT: &str = "delete_image";

/// Host broadcast that asks a slot to drop its session.
pub const DESTROY_EVENT: &str = "croppr:destroy";

/// Config directory name.
pub const CONFIG_DIR: &str = "cropdrop";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// File extension used by the directory upload channel.
pub const EXPORT_EXT: &str = "jpg";

/// Capacity of the slot broadcast channel.
pub const SLOT_BUS_CAPACITY: usize = 16;
