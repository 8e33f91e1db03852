// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for document operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or saving persisted documents
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document {path}: {source}")]
    Document {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
