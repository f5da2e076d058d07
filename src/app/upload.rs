// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/upload.rs
//
// Upload channels: where exported blobs go.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use reqwest::header::CONTENT_TYPE;
use tokio_util::task::TaskTracker;

use crate::constant::EXPORT_EXT;
use crate::domain::raster::CroppedBlob;

/// Accepts named blobs. Fire-and-forget: implementations own delivery,
/// retries and error reporting; the widget never waits on them.
pub trait UploadChannel: Send + Sync {
    fn upload(&self, name: &str, blob: CroppedBlob);
}

/// PUTs each blob to `{endpoint}/{name}` on the current tokio runtime.
#[derive(Debug, Clone)]
pub struct HttpUploadChannel {
    client: reqwest::Client,
    endpoint: String,
    in_flight: TaskTracker,
}

impl HttpUploadChannel {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            in_flight: TaskTracker::new(),
        }
    }

    /// Wait until every upload spawned so far has finished.
    pub async fn wait_idle(&self) {
        self.in_flight.close();
        self.in_flight.wait().await;
        self.in_flight.reopen();
    }

    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), name)
    }
}

impl UploadChannel for HttpUploadChannel {
    fn upload(&self, name: &str, blob: CroppedBlob) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::error!("No tokio runtime, dropping upload for {name}");
            return;
        };

        let url = self.url_for(name);
        let request = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, blob.mime())
            .body(blob.bytes);

        self.in_flight.spawn_on(
            async move {
                match request.send().await.and_then(|r| r.error_for_status()) {
                    Ok(response) => log::debug!("Uploaded to {url}: {}", response.status()),
                    Err(e) => log::error!("Upload to {url} failed: {e}"),
                }
            },
            &runtime,
        );
    }
}

/// Writes each blob to `{dir}/{name}.jpg`, replacing the slot's previous one.
#[derive(Debug, Clone)]
pub struct DirUploadChannel {
    dir: PathBuf,
}

impl DirUploadChannel {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        let stem: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{stem}.{EXPORT_EXT}"))
    }

    fn write(&self, path: &Path, blob: &CroppedBlob) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        fs::write(path, &blob.bytes).with_context(|| format!("Failed to write {}", path.display()))
    }
}

impl UploadChannel for DirUploadChannel {
    fn upload(&self, name: &str, blob: CroppedBlob) {
        let path = self.path_for(name);
        match self.write(&path, &blob) {
            Ok(()) => log::info!("Wrote {blob:?} to {}", path.display()),
            Err(e) => log::error!("{e:#}"),
        }
    }
}
