// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene document: the mapping of object key to placed-object record.
//!
//! Two scenes exist during a rescaling run: the original scene (read-only
//! source of geometry) and the new scene (incrementally populated by each
//! pass). Records are never mutated in place across passes; each pass clones
//! a source record, transforms the clone and inserts it under a derived key.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::keys;

fn default_local_scale() -> f64 {
    1.0
}

/// One placement of an object. The design always uses placement index 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Placement {
    /// World position `[x, y, z]`. Documents in the wild sometimes carry
    /// fewer than three components; the accessors pad with zero.
    pub position: Vec<f64>,
    /// Euler rotation `[rx, ry, rz]`, carried through and never recomputed.
    #[serde(default)]
    pub rotation: Vec<f64>,
    /// Uniform multiplier applied on top of `dimensions`.
    #[serde(default = "default_local_scale")]
    pub scale: f64,
}

impl Placement {
    pub fn new(position: [f64; 3]) -> Self {
        Self {
            position: position.to_vec(),
            rotation: vec![0.0, 0.0, 0.0],
            scale: 1.0,
        }
    }

    pub fn x(&self) -> f64 {
        self.position.first().copied().unwrap_or(0.0)
    }

    pub fn y(&self) -> f64 {
        self.position.get(1).copied().unwrap_or(0.0)
    }

    pub fn z(&self) -> f64 {
        self.position.get(2).copied().unwrap_or(0.0)
    }

    pub fn set_position(&mut self, x: f64, y: f64, z: f64) {
        self.position = vec![x, y, z];
    }
}

/// A placed item: axis-aligned dimensions plus placements and labels.
///
/// The classification tags (`wall_type`, `floor_description`, `object_type`,
/// `object_name`) are assigned by the labeling service and read-only to the
/// engine, except `identifier` which is always set to the final key on insert.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ObjectRecord {
    /// Pre-rotation `[width, length, height]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placements: Vec<Placement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wall_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    /// Retrieval URL attached after the exported geometry is uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_url: Option<String>,
    /// Fields this tool does not interpret; carried through unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ObjectRecord {
    pub fn first_placement(&self) -> Option<&Placement> {
        self.placements.first()
    }

    pub fn width(&self) -> f64 {
        self.dimensions.first().copied().unwrap_or(0.0)
    }

    pub fn length(&self) -> f64 {
        self.dimensions.get(1).copied().unwrap_or(0.0)
    }

    pub fn height(&self) -> f64 {
        self.dimensions.get(2).copied().unwrap_or(0.0)
    }

    pub fn is_wall(&self) -> bool {
        self.wall_type.is_some()
    }

    pub fn is_floor(&self) -> bool {
        self.floor_description.is_some()
    }

    pub fn is_wall_part(&self) -> bool {
        self.object_type.as_deref() == Some("wall_part")
    }

    /// True when the record has enough data for bounding-box math:
    /// at least two dimension components and at least one placement.
    pub fn is_usable(&self) -> bool {
        self.dimensions.len() >= 2 && !self.placements.is_empty()
    }

    /// XY bounding box `[x, x+w] × [y, y+l]` from the first placement.
    /// Rotation is deliberately ignored; all box math in the engine is
    /// axis-aligned. Returns `None` for unusable records.
    pub fn bbox_xy(&self) -> Option<BBox2> {
        if !self.is_usable() {
            return None;
        }
        let p = &self.placements[0];
        Some(BBox2 {
            min_x: p.x(),
            min_y: p.y(),
            max_x: p.x() + self.width(),
            max_y: p.y() + self.length(),
        })
    }
}

/// Axis-aligned rectangle in the XY plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox2 {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BBox2 {
    /// An inverted box that expands to any real box it is merged with
    pub fn empty() -> Self {
        Self {
            min_x: f64::MAX,
            min_y: f64::MAX,
            max_x: f64::MIN,
            max_y: f64::MIN,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn expand(&mut self, other: &BBox2) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn length(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            0.5 * (self.min_x + self.max_x),
            0.5 * (self.min_y + self.max_y),
        )
    }

    /// Distance from a point to this rectangle, zero when inside
    pub fn distance_to_point(&self, px: f64, py: f64) -> f64 {
        let cx = px.clamp(self.min_x, self.max_x);
        let cy = py.clamp(self.min_y, self.max_y);
        let dx = cx - px;
        let dy = cy - py;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A scene document: `{ "objects": { key: record, ... } }`
///
/// Keys are kept in a sorted map so that "first matching object" lookups
/// (floor anchor resolution) are reproducible across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub objects: BTreeMap<String, ObjectRecord>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a scene document. A document without the top-level `objects`
    /// field is a structural failure and rejected outright.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| Error::Document {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|source| Error::Write {
            path: path.display().to_string(),
            source,
        })
    }

    /// Insert a record under the first available name in
    /// `base, base_1, base_2, …` and return the key actually used.
    /// The record's `identifier` is set to the final key.
    pub fn insert_unique(&mut self, base: &str, mut record: ObjectRecord) -> String {
        let mut key = base.to_string();
        let mut counter = 1;
        while self.objects.contains_key(&key) {
            key = format!("{}_{}", base, counter);
            counter += 1;
        }
        record.identifier = Some(key.clone());
        self.objects.insert(key.clone(), record);
        key
    }

    /// Union bounding box of every usable object's XY footprint.
    /// Returns `None` when no object contributes a box.
    pub fn union_bbox(&self) -> Option<BBox2> {
        let mut bbox = BBox2::empty();
        for record in self.objects.values() {
            if let Some(b) = record.bbox_xy() {
                bbox.expand(&b);
            }
        }
        if bbox.is_empty() {
            None
        } else {
            Some(bbox)
        }
    }

    /// Sum of floor widths and lengths. Floors are objects whose key,
    /// stripped of the room-name prefix, contains "room".
    pub fn total_floor_dimensions(&self, room_name: &str) -> (f64, f64) {
        let mut total_x = 0.0;
        let mut total_y = 0.0;
        for (key, record) in &self.objects {
            if !keys::is_floor_key(key, room_name) {
                continue;
            }
            if record.dimensions.len() >= 2 {
                total_x += record.width();
                total_y += record.length();
            }
        }
        (total_x, total_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(dims: &[f64], pos: [f64; 3]) -> ObjectRecord {
        ObjectRecord {
            dimensions: dims.to_vec(),
            placements: vec![Placement::new(pos)],
            ..Default::default()
        }
    }

    #[test]
    fn insert_unique_suffixes_colliding_keys() {
        let mut scene = Scene::new();
        let k1 = scene.insert_unique("Wall1_scaled", ObjectRecord::default());
        let k2 = scene.insert_unique("Wall1_scaled", ObjectRecord::default());
        let k3 = scene.insert_unique("Wall1_scaled", ObjectRecord::default());

        assert_eq!(k1, "Wall1_scaled");
        assert_eq!(k2, "Wall1_scaled_1");
        assert_eq!(k3, "Wall1_scaled_2");
        assert!(scene.objects.contains_key("Wall1_scaled"));
        assert!(scene.objects.contains_key("Wall1_scaled_1"));
        assert_eq!(
            scene.objects["Wall1_scaled_1"].identifier.as_deref(),
            Some("Wall1_scaled_1")
        );
    }

    #[test]
    fn union_bbox_skips_unusable_records() {
        let mut scene = Scene::new();
        scene
            .objects
            .insert("a".into(), record(&[2.0, 2.0, 1.0], [0.0, 0.0, 0.0]));
        // One dimension component only: must not contribute
        scene
            .objects
            .insert("bad".into(), record(&[99.0], [50.0, 50.0, 0.0]));
        // No placements: must not contribute
        scene.objects.insert(
            "empty".into(),
            ObjectRecord {
                dimensions: vec![4.0, 4.0, 1.0],
                ..Default::default()
            },
        );
        scene
            .objects
            .insert("b".into(), record(&[2.0, 2.0, 1.0], [4.0, 4.0, 0.0]));

        let bbox = scene.union_bbox().unwrap();
        assert_relative_eq!(bbox.min_x, 0.0);
        assert_relative_eq!(bbox.max_x, 6.0);
        let (cx, cy) = bbox.center();
        assert_relative_eq!(cx, 3.0);
        assert_relative_eq!(cy, 3.0);
    }

    #[test]
    fn union_bbox_of_empty_scene_is_none() {
        assert!(Scene::new().union_bbox().is_none());
    }

    #[test]
    fn total_floor_dimensions_sums_rooms_only() {
        let mut scene = Scene::new();
        scene.objects.insert(
            "dining-Room1".into(),
            record(&[3.0, 2.0, 0.1], [0.0, 0.0, 0.0]),
        );
        scene.objects.insert(
            "dining-Room2".into(),
            record(&[5.0, 4.0, 0.1], [3.0, 0.0, 0.0]),
        );
        scene
            .objects
            .insert("dining-Chair".into(), record(&[1.0, 1.0, 1.0], [1.0, 1.0, 0.0]));

        let (x, y) = scene.total_floor_dimensions("dining");
        assert_relative_eq!(x, 8.0);
        assert_relative_eq!(y, 6.0);
    }

    #[test]
    fn scene_without_objects_field_fails_to_parse() {
        assert!(Scene::from_json("{}").is_err());
    }

    #[test]
    fn distance_to_point_is_zero_inside_the_box() {
        let bbox = BBox2 {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 2.0,
            max_y: 2.0,
        };
        assert_relative_eq!(bbox.distance_to_point(1.0, 1.0), 0.0);
        assert_relative_eq!(bbox.distance_to_point(5.0, 2.0), 3.0);
        assert_relative_eq!(bbox.distance_to_point(3.0, 3.0), (2.0f64).sqrt());
    }

    #[test]
    fn unknown_fields_round_trip() {
        let text = r#"{
            "objects": {
                "a": {
                    "dimensions": [1.0, 2.0, 3.0],
                    "placements": [{"position": [0.0, 0.0, 0.0]}],
                    "source_mesh": "a.glb"
                }
            }
        }"#;
        let scene = Scene::from_json(text).unwrap();
        let record = &scene.objects["a"];
        assert_eq!(
            record.extra.get("source_mesh").and_then(|v| v.as_str()),
            Some("a.glb")
        );
        assert_relative_eq!(record.placements[0].scale, 1.0);

        let out = serde_json::to_string(&scene).unwrap();
        assert!(out.contains("source_mesh"));
    }
}
