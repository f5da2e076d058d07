// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/fetch.rs
//
// Fetching a previously uploaded image.

use anyhow::Context;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use crate::domain::raster::SelectedFile;

/// Loads the bytes behind a remote image URL.
pub trait RemoteImageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> BoxFuture<'static, anyhow::Result<SelectedFile>>;
}

/// reqwest-backed fetcher. Non-2xx responses are errors.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl RemoteImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'static, anyhow::Result<SelectedFile>> {
        let client = self.client.clone();
        let url = url.to_string();

        async move {
            let response = client
                .get(&url)
                .send()
                .await
                .with_context(|| format!("Failed to fetch {url}"))?
                .error_for_status()
                .with_context(|| format!("Failed to fetch {url}"))?;
            let bytes = response
                .bytes()
                .await
                .with_context(|| format!("Failed to read body of {url}"))?;

            log::debug!("Fetched {} bytes from {url}", bytes.len());
            Ok(SelectedFile::new(file_name_of(&url), bytes.to_vec()))
        }
        .boxed()
    }
}

/// Last path segment of a URL, without query or fragment.
fn file_name_of(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(url)
        .to_string()
}
