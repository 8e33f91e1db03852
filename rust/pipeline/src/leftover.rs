// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Leftover manifest.
//!
//! After the floor and wall passes, everything still missing from the new
//! scene is a candidate for grouping and placement. An original object is
//! leftover when it is neither a wall nor a floor and the new scene carries
//! no trace of it: no exact key and no derived key starting with
//! `<key>_scaled`.

use roomscale_core::Scene;
use serde::{Deserialize, Serialize};

/// One unplaced object, as handed to the grouping collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeftoverObject {
    pub key: String,
    pub object_type: String,
    pub object_name: String,
    /// XY position in the original scene
    pub position: [f64; 2],
}

fn has_scaled_descendant(new_scene: &Scene, key: &str) -> bool {
    let prefix = format!("{key}_scaled");
    new_scene
        .objects
        .range(prefix.clone()..)
        .next()
        .is_some_and(|(candidate, _)| candidate.starts_with(&prefix))
}

/// Collect the original-scene objects the transform passes left behind.
pub fn leftover_objects(original: &Scene, new_scene: &Scene) -> Vec<LeftoverObject> {
    let mut leftovers = Vec::new();
    for (key, record) in &original.objects {
        if record.is_wall() || record.is_floor() {
            continue;
        }
        if new_scene.objects.contains_key(key) || has_scaled_descendant(new_scene, key) {
            continue;
        }
        let Some(placement) = record.first_placement() else {
            tracing::warn!(key = %key, "leftover candidate has no placement, dropped from manifest");
            continue;
        };
        leftovers.push(LeftoverObject {
            key: key.clone(),
            object_type: record
                .object_type
                .clone()
                .unwrap_or_else(|| "object".to_string()),
            object_name: record
                .object_name
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            position: [placement.x(), placement.y()],
        });
    }
    leftovers
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomscale_core::{ObjectRecord, Placement};

    fn record(pos: [f64; 3]) -> ObjectRecord {
        ObjectRecord {
            dimensions: vec![1.0, 1.0, 1.0],
            placements: vec![Placement::new(pos)],
            ..Default::default()
        }
    }

    #[test]
    fn walls_floors_and_transferred_objects_are_not_leftover() {
        let mut original = Scene::new();
        let mut wall = record([0.0, 0.0, 0.0]);
        wall.wall_type = Some("solid_wall".into());
        original.objects.insert("a-Wall1".into(), wall);
        let mut floor = record([0.0, 0.0, 0.0]);
        floor.floor_description = Some("tile".into());
        original.objects.insert("a-Room1".into(), floor);
        original.objects.insert("a-Sofa".into(), record([1.0, 2.0, 0.0]));
        original.objects.insert("a-Desk".into(), record([3.0, 3.0, 0.0]));
        original.objects.insert("a-Lamp".into(), record([4.0, 1.0, 0.0]));

        let mut new_scene = Scene::new();
        // The desk made it over under a suffixed derived key
        new_scene
            .objects
            .insert("a-Desk_scaled_1".into(), record([3.0, 3.0, 0.0]));
        // The lamp is present under its exact key
        new_scene.objects.insert("a-Lamp".into(), record([4.0, 1.0, 0.0]));

        let leftovers = leftover_objects(&original, &new_scene);
        assert_eq!(leftovers.len(), 1);
        assert_eq!(leftovers[0].key, "a-Sofa");
        assert_eq!(leftovers[0].object_type, "object");
        assert_eq!(leftovers[0].object_name, "unknown");
        assert_eq!(leftovers[0].position, [1.0, 2.0]);
    }

    #[test]
    fn a_similarly_prefixed_key_is_not_a_descendant() {
        let mut original = Scene::new();
        original.objects.insert("a-Sofa".into(), record([1.0, 2.0, 0.0]));

        let mut new_scene = Scene::new();
        // "a-Sofabed..." shares a prefix but not the "_scaled" marker
        new_scene
            .objects
            .insert("a-Sofabed_scaled".into(), record([0.0, 0.0, 0.0]));

        let leftovers = leftover_objects(&original, &new_scene);
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn labeled_objects_carry_their_labels() {
        let mut original = Scene::new();
        let mut chair = record([2.0, 2.0, 0.0]);
        chair.object_type = Some("seating".into());
        chair.object_name = Some("desk chair".into());
        original.objects.insert("a-Chair".into(), chair);

        let leftovers = leftover_objects(&original, &Scene::new());
        assert_eq!(leftovers[0].object_type, "seating");
        assert_eq!(leftovers[0].object_name, "desk chair");
    }
}
