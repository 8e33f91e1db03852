// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Asset storage uploads.
//!
//! Exported geometry files are pushed to an HTTP object store; the returned
//! URL is what scene records carry in `asset_url`. The existence probe
//! distinguishes a clean not-found from a transport failure, so callers can
//! treat "missing" and "unreachable" differently.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Stores exported asset files and answers existence checks.
pub trait AssetStorage {
    /// Upload a local file under `object_path`, returning its retrieval URL.
    fn upload(&self, local_path: &Path, object_path: &str) -> Result<String>;

    /// Whether `object_path` already exists in the store.
    fn exists(&self, object_path: &str) -> Result<bool>;
}

/// Plain HTTP object store: PUT to upload, HEAD to probe.
pub struct HttpStorage {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl HttpStorage {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::blocking::Client::new(),
        }
    }

    fn object_url(&self, object_path: &str) -> String {
        format!("{}/{}", self.base_url, object_path.trim_start_matches('/'))
    }
}

impl AssetStorage for HttpStorage {
    fn upload(&self, local_path: &Path, object_path: &str) -> Result<String> {
        let bytes = fs::read(local_path).map_err(|source| Error::File {
            path: local_path.to_path_buf(),
            source,
        })?;

        let url = self.object_url(object_path);
        let resp = self.http.put(&url).body(bytes).send()?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        tracing::info!(object = %object_path, url = %url, "uploaded asset");
        Ok(url)
    }

    fn exists(&self, object_path: &str) -> Result<bool> {
        let resp = self.http.head(self.object_url(object_path)).send()?;
        let status = resp.status();
        if status.is_success() {
            Ok(true)
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(Error::Api {
                status,
                body: String::new(),
            })
        }
    }
}
