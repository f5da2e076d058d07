// SPDX-License-Identifier: GPL-3.0-or-later
// src/config.rs
//
// Persisted application configuration and per-container widget configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::constant::{
    ATTR_UPLOAD_NAME, ATTR_UPLOAD_REF, ATTR_UPLOADED_IMAGE, CONFIG_DIR, CONFIG_FILE, JPEG_QUALITY,
    MIN_CROP_SIZE,
};

/// Global configuration for the command line front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory the directory upload channel writes blobs into.
    pub output_dir: Option<PathBuf>,
    /// HTTP endpoint blobs are PUT to. Takes priority over `output_dir`.
    pub upload_endpoint: Option<String>,
    /// JPEG quality for exported blobs (1..=100).
    pub jpeg_quality: u8,
    /// Minimum crop edge length in source pixels.
    pub min_crop_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: dirs::picture_dir()
                .or_else(dirs::home_dir)
                .map(|dir| dir.join(CONFIG_DIR)),
            upload_endpoint: None,
            jpeg_quality: JPEG_QUALITY,
            min_crop_size: MIN_CROP_SIZE,
        }
    }
}

impl AppConfig {
    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load config from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write config to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("Failed to write config {}", path.display()))
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            bail!("jpeg_quality must be within 1..=100, got {}", self.jpeg_quality);
        }
        if self.min_crop_size == 0 {
            bail!("min_crop_size must be positive");
        }
        Ok(())
    }
}

/// Upload slot identity and optional pre-existing image, read from the
/// container's data attributes. Immutable once the widget is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Stable slot name blobs are uploaded under.
    pub upload_name: String,
    /// Opaque reference the host uses to delete persisted state.
    pub upload_ref: String,
    /// URL of an image uploaded in an earlier visit.
    pub uploaded_image: Option<String>,
}

impl WidgetConfig {
    pub fn new(upload_name: impl Into<String>, upload_ref: impl Into<String>) -> Self {
        Self {
            upload_name: upload_name.into(),
            upload_ref: upload_ref.into(),
            uploaded_image: None,
        }
    }

    pub fn with_uploaded_image(mut self, url: impl Into<String>) -> Self {
        self.uploaded_image = Some(url.into());
        self
    }

    /// Parse the container dataset.
    ///
    /// `data-upload-name` is required and must be non-empty. A missing
    /// `data-upload-ref` becomes an empty reference; an empty
    /// `data-uploaded-image` is treated as absent.
    pub fn from_dataset(dataset: &BTreeMap<String, String>) -> anyhow::Result<Self> {
        let upload_name = dataset
            .get(ATTR_UPLOAD_NAME)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Container is missing `{ATTR_UPLOAD_NAME}`"))?
            .to_string();

        let upload_ref = dataset.get(ATTR_UPLOAD_REF).cloned().unwrap_or_default();

        let uploaded_image = dataset
            .get(ATTR_UPLOADED_IMAGE)
            .filter(|s| !s.trim().is_empty())
            .cloned();

        Ok(Self {
            upload_name,
            upload_ref,
            uploaded_image,
        })
    }
}
