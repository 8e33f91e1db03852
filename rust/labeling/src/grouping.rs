// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Asset grouping collaborator.
//!
//! Objects left over after the wall pass are sent to a vision model together
//! with the scene imagery; the model proposes named groups and marks which
//! ones are cloneable. The answer is untrusted input: code fences are
//! stripped, records validated individually, and any transport or parse
//! failure yields an empty group list so the run continues with nothing to
//! place.

use std::path::Path;

use roomscale_core::{validate_asset_groups, AssetGroup};
use serde_json::Value;

use crate::chat::{strip_code_fences, ChatClient};
use crate::error::{Error, Result};
use crate::images::{data_url_chunks, list_images};

/// Proposes asset groups for leftover objects.
pub trait AssetGrouper {
    /// Never fails: degraded runs return an empty list.
    fn group_assets(&self, image_dir: &Path, leftover_manifest: &Value) -> Vec<AssetGroup>;
}

/// Chat-completions vision grouper.
pub struct GroupingClient {
    chat: ChatClient,
}

impl GroupingClient {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            chat: ChatClient::new(endpoint, api_key, model),
        }
    }

    fn request_groups(&self, image_dir: &Path, leftover_manifest: &Value) -> Result<Vec<AssetGroup>> {
        let images = list_images(image_dir)?;
        let chunks = data_url_chunks(&images)?;

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": "You group the loose furnishings of a room into logical clusters. \
                        Answer with a JSON array of \
                        {\"id\": number, \"group_name\": string, \"assets\": [keys], \"Cloneable\": bool}.",
        })];
        for chunk in &chunks {
            let content: Vec<Value> = chunk
                .iter()
                .map(|url| {
                    serde_json::json!({
                        "type": "image_url",
                        "image_url": { "url": url },
                    })
                })
                .collect();
            messages.push(serde_json::json!({ "role": "user", "content": content }));
        }
        messages.push(serde_json::json!({
            "role": "user",
            "content": format!(
                "These objects are not yet placed in the rescaled room:\n{leftover_manifest}\n\
                 Group them. Mark a group Cloneable when duplicating it would \
                 naturally fill a larger room (desk clusters, shelving runs)."
            ),
        }));

        let content = self.chat.complete(messages)?;
        let payload: Value = serde_json::from_str(strip_code_fences(&content))
            .map_err(|e| Error::Malformed(format!("grouping payload: {e}")))?;

        let (groups, rejected) = validate_asset_groups(payload);
        if rejected > 0 {
            tracing::warn!(rejected, "dropped malformed asset group records");
        }
        Ok(groups)
    }
}

impl AssetGrouper for GroupingClient {
    fn group_assets(&self, image_dir: &Path, leftover_manifest: &Value) -> Vec<AssetGroup> {
        match self.request_groups(image_dir, leftover_manifest) {
            Ok(groups) => {
                tracing::info!(groups = groups.len(), "asset grouping complete");
                groups
            }
            Err(err) => {
                tracing::warn!(error = %err, "asset grouping failed, continuing with no groups");
                Vec::new()
            }
        }
    }
}
