// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vision labeling of scene objects.
//!
//! Every object in a freshly imported scene needs semantics before the
//! rescaling passes can run: walls a `wall_type`, floors a
//! `floor_description`, everything else a name and type. Which field an
//! object gets is decided by its key, not by the model — the model only
//! fills in the value. A failed or partial response degrades to `"unknown"`
//! labels; labeling never aborts a run.

use std::collections::BTreeMap;
use std::path::Path;

use roomscale_core::{keys, Scene};
use serde::Deserialize;

use crate::chat::{strip_code_fences, ChatClient};
use crate::error::Result;
use crate::images::{data_url_chunks, list_images};

/// Statistics from one labeling run
#[derive(Debug, Clone, Default)]
pub struct LabelStats {
    pub labeled: usize,
    /// Objects that fell back to `"unknown"` labels
    pub degraded: usize,
}

/// Labels a scene in place from rendered imagery.
pub trait SceneLabeler {
    fn label_scene(&self, scene: &mut Scene, room_name: &str, image_dir: &Path) -> LabelStats;
}

/// True when at least one object is missing the label its key category
/// requires: `floor_description` for floors, `wall_type` for walls, name and
/// type for everything else. Drives the opt-in labeling step ahead of a
/// rescale run.
pub fn needs_labels(scene: &Scene, room_name: &str) -> bool {
    scene.objects.iter().any(|(key, record)| {
        if keys::is_floor_key(key, room_name) {
            record.floor_description.is_none()
        } else if keys::is_wall_key(key, room_name) {
            record.wall_type.is_none()
        } else {
            record.object_name.is_none() || record.object_type.is_none()
        }
    })
}

/// One object's labels as returned by the model. All fields optional: the
/// key heuristic decides which one is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawLabel {
    object_name: Option<String>,
    object_type: Option<String>,
    wall_type: Option<String>,
    floor_description: Option<String>,
}

/// Chat-completions vision labeler.
pub struct LabelingClient {
    chat: ChatClient,
}

impl LabelingClient {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            chat: ChatClient::new(endpoint, api_key, model),
        }
    }

    fn request_labels(
        &self,
        scene: &Scene,
        room_name: &str,
        image_dir: &Path,
    ) -> Result<BTreeMap<String, RawLabel>> {
        let images = list_images(image_dir)?;
        let chunks = data_url_chunks(&images)?;

        let mut walls = Vec::new();
        let mut floors = Vec::new();
        let mut others = Vec::new();
        for key in scene.objects.keys() {
            if keys::is_floor_key(key, room_name) {
                floors.push(key.as_str());
            } else if keys::is_wall_key(key, room_name) {
                walls.push(key.as_str());
            } else {
                others.push(key.as_str());
            }
        }

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": "You label objects of a furnished room from rendered views. \
                        Answer with a single JSON object mapping each asset key to its labels.",
        })];
        for chunk in &chunks {
            let content: Vec<serde_json::Value> = chunk
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
                "For each wall key give {{\"wall_type\": ...}}: {walls:?}. \
                 For each floor key give {{\"floor_description\": ...}}: {floors:?}. \
                 For each remaining key give {{\"object_name\": ..., \"object_type\": ...}}: {others:?}."
            ),
        }));

        let content = self.chat.complete(messages)?;
        let labels: BTreeMap<String, RawLabel> =
            serde_json::from_str(strip_code_fences(&content))
                .map_err(|e| crate::error::Error::Malformed(format!("label payload: {e}")))?;
        Ok(labels)
    }
}

impl SceneLabeler for LabelingClient {
    fn label_scene(&self, scene: &mut Scene, room_name: &str, image_dir: &Path) -> LabelStats {
        let labels = match self.request_labels(scene, room_name, image_dir) {
            Ok(labels) => labels,
            Err(err) => {
                tracing::warn!(error = %err, "labeling request failed, all objects get unknown labels");
                BTreeMap::new()
            }
        };
        apply_labels(scene, room_name, &labels)
    }
}

/// Write labels onto the scene, falling back to `"unknown"` per object, and
/// pin every record's identifier to its key.
fn apply_labels(
    scene: &mut Scene,
    room_name: &str,
    labels: &BTreeMap<String, RawLabel>,
) -> LabelStats {
    let mut stats = LabelStats::default();
    let fallback = RawLabel::default();

    for (key, record) in scene.objects.iter_mut() {
        let raw = labels.get(key).unwrap_or(&fallback);
        let mut degraded = false;
        let mut take = |value: &Option<String>, default: &str| match value {
            Some(v) if !v.trim().is_empty() => v.clone(),
            _ => {
                degraded = true;
                default.to_string()
            }
        };

        if keys::is_floor_key(key, room_name) {
            record.floor_description = Some(take(&raw.floor_description, "unknown"));
        } else if keys::is_wall_key(key, room_name) {
            record.wall_type = Some(take(&raw.wall_type, "unknown"));
        } else {
            record.object_name = Some(take(&raw.object_name, "unknown"));
            record.object_type = Some(take(&raw.object_type, "object"));
        }
        record.identifier = Some(key.clone());

        stats.labeled += 1;
        if degraded {
            tracing::warn!(key = %key, "no usable label returned, using unknown");
            stats.degraded += 1;
        }
    }
    stats
}
