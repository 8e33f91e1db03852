// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor anchor resolution.
//!
//! After the floor pass, every later pass fixes its vertical placement
//! relative to one scaled floor in the new scene. The anchor is resolved
//! once per pass and threaded through as a value; when no scaled floor can
//! be found, objects keep their original Z.
//!
//! A single arbitrary floor anchors the whole scene; with the sorted object
//! map this is the lexicographically first matching key.

use roomscale_core::{keys, Scene};

/// Z reference resolved from one scaled floor in the new scene
#[derive(Debug, Clone, PartialEq)]
pub struct FloorAnchor {
    /// Key of the scaled floor the anchor was resolved from
    pub floor_key: String,
    /// The scaled floor's Z in the new scene
    pub new_z: f64,
    /// The originating floor's Z in the original scene
    pub old_z: f64,
}

impl FloorAnchor {
    /// Map an original-scene Z onto the rescaled scene:
    /// `floor_new_z + (z − floor_old_z) × factor`.
    pub fn rescale_z(&self, z: f64, factor: f64) -> f64 {
        self.new_z + (z - self.old_z) * factor
    }
}

/// The scaled floor's new footprint, plus the Z anchor when the originating
/// floor record can still be found in the original scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledFloor {
    pub width: f64,
    pub length: f64,
    pub anchor: Option<FloorAnchor>,
}

/// Resolve the first scaled floor in the new scene whose originating record
/// still exists in the original scene.
pub fn find_floor_anchor(new_scene: &Scene, original: &Scene) -> Option<FloorAnchor> {
    for (key, record) in &new_scene.objects {
        if !keys::is_scaled_floor_key(key) {
            continue;
        }
        let Some(placement) = record.first_placement() else {
            continue;
        };
        let base = keys::scaled_base_key(key);
        let Some(old_placement) = original
            .objects
            .get(base)
            .and_then(|old| old.first_placement())
        else {
            continue;
        };
        return Some(FloorAnchor {
            floor_key: key.to_string(),
            new_z: placement.z(),
            old_z: old_placement.z(),
        });
    }
    None
}

/// Resolve the first scaled floor that carries dimensions, for reading the
/// rescaled footprint. Unlike [`find_floor_anchor`] this settles on the
/// first dimensioned floor even when its originating record is gone — the
/// footprint is still valid, only Z anchoring is lost.
pub fn find_scaled_floor(new_scene: &Scene, original: &Scene) -> Option<ScaledFloor> {
    for (key, record) in &new_scene.objects {
        if !keys::is_scaled_floor_key(key) {
            continue;
        }
        if record.dimensions.len() < 2 {
            continue;
        }
        let anchor = record.first_placement().and_then(|placement| {
            let base = keys::scaled_base_key(key);
            original
                .objects
                .get(base)
                .and_then(|old| old.first_placement())
                .map(|old_placement| FloorAnchor {
                    floor_key: key.to_string(),
                    new_z: placement.z(),
                    old_z: old_placement.z(),
                })
        });
        return Some(ScaledFloor {
            width: record.width(),
            length: record.length(),
            anchor,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use roomscale_core::{ObjectRecord, Placement};

    fn floor(pos_z: f64, dims: &[f64]) -> ObjectRecord {
        ObjectRecord {
            dimensions: dims.to_vec(),
            placements: vec![Placement::new([0.0, 0.0, pos_z])],
            ..Default::default()
        }
    }

    #[test]
    fn anchor_resolves_new_and_old_z() {
        let mut original = Scene::new();
        original.objects.insert("d-Room1".into(), floor(0.5, &[4.0, 4.0, 0.2]));

        let mut new_scene = Scene::new();
        new_scene
            .objects
            .insert("d-Room1_scaled".into(), floor(0.1, &[8.0, 8.0, 0.4]));

        let anchor = find_floor_anchor(&new_scene, &original).unwrap();
        assert_eq!(anchor.floor_key, "d-Room1_scaled");
        assert_relative_eq!(anchor.new_z, 0.1);
        assert_relative_eq!(anchor.old_z, 0.5);

        // A wall at old Z=2 on a floor at old Z=0, factor 2 → new Z=4
        let anchor = FloorAnchor {
            floor_key: "f".into(),
            new_z: 0.0,
            old_z: 0.0,
        };
        assert_relative_eq!(anchor.rescale_z(2.0, 2.0), 4.0);
    }

    #[test]
    fn anchor_skips_floors_without_an_originating_record() {
        let original = Scene::new();
        let mut new_scene = Scene::new();
        new_scene
            .objects
            .insert("d-Room1_scaled".into(), floor(0.0, &[8.0, 8.0, 0.4]));

        assert!(find_floor_anchor(&new_scene, &original).is_none());

        // The footprint lookup still succeeds, just without a Z anchor
        let scaled = find_scaled_floor(&new_scene, &original).unwrap();
        assert_relative_eq!(scaled.width, 8.0);
        assert!(scaled.anchor.is_none());
    }

    #[test]
    fn non_floor_scaled_keys_are_ignored() {
        let mut original = Scene::new();
        original.objects.insert("d-Wall1".into(), floor(0.0, &[4.0, 0.2, 2.5]));
        let mut new_scene = Scene::new();
        new_scene
            .objects
            .insert("d-Wall1_scaled".into(), floor(0.0, &[8.0, 0.4, 5.0]));

        assert!(find_floor_anchor(&new_scene, &original).is_none());
        assert!(find_scaled_floor(&new_scene, &original).is_none());
    }
}
