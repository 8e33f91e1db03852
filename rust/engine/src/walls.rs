// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall rescaling pass.
//!
//! Each wall group is scaled about the global pivot and re-anchored in Z
//! against the already-scaled floor. Wall parts chain off their wall's new
//! Z rather than the floor, so doors and windows stay seated in their wall:
//! the anchor runs floor → wall → part.

use roomscale_core::{ObjectRecord, Scene, WallGroup};
use serde::Serialize;

use crate::anchor::find_floor_anchor;
use crate::helpers::{set_dimensions, set_placement};
use crate::pivot::{compute_pivot, Pivot};

/// Statistics from the wall pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct WallStats {
    pub walls_scaled: usize,
    pub parts_scaled: usize,
    /// Group members absent from the original scene or without usable geometry
    pub skipped_missing: usize,
}

/// A group member scaled in XY, pending its final Z
struct ScaledMember<'a> {
    key: &'a str,
    record: &'a ObjectRecord,
    old_z: f64,
    new_x: f64,
    new_y: f64,
    scaled_w: f64,
    scaled_l: f64,
    scaled_h: f64,
}

fn scale_in_xy<'a>(
    original: &'a Scene,
    key: &'a str,
    pivot: &Pivot,
    factor: f64,
    stats: &mut WallStats,
) -> Option<ScaledMember<'a>> {
    let Some(record) = original.objects.get(key) else {
        tracing::warn!(key = %key, "wall group member not in the original scene, skipped");
        stats.skipped_missing += 1;
        return None;
    };
    if !record.is_usable() {
        tracing::warn!(key = %key, "wall group member has no usable geometry, skipped");
        stats.skipped_missing += 1;
        return None;
    }
    let placement = &record.placements[0];
    let (new_x, new_y) = pivot.scale_xy(placement.x(), placement.y(), factor);
    Some(ScaledMember {
        key,
        record,
        old_z: placement.z(),
        new_x,
        new_y,
        scaled_w: record.width() * factor,
        scaled_l: record.length() * factor,
        scaled_h: record.height() * factor,
    })
}

fn insert_scaled(new_scene: &mut Scene, member: &ScaledMember, final_z: f64, factor: f64) -> String {
    let mut scaled = member.record.clone();
    set_dimensions(&mut scaled, member.scaled_w, member.scaled_l, member.scaled_h);
    let local_scale = member
        .record
        .first_placement()
        .map(|p| p.scale)
        .unwrap_or(1.0);
    set_placement(
        &mut scaled,
        member.new_x,
        member.new_y,
        final_z,
        local_scale * factor,
    );
    new_scene.insert_unique(&format!("{}_scaled", member.key), scaled)
}

/// Scale each wall group into the new scene.
///
/// The pivot is recomputed from the original scene (the same formula as the
/// floor pass, so the passes agree on it). When a scaled floor exists in the
/// new scene, the wall's Z becomes
/// `floor_new_z + (wall_z − floor_old_z) × factor`; otherwise walls keep
/// their original Z. Parts then place at
/// `wall_new_z + (part_z − wall_z) × factor`.
pub fn rescale_walls(
    original: &Scene,
    wall_groups: &[WallGroup],
    new_scene: &mut Scene,
    scale_factor: f64,
) -> WallStats {
    let mut stats = WallStats::default();

    let Some(pivot) = compute_pivot(original) else {
        tracing::warn!("no usable objects in the original scene, wall pass skipped");
        return stats;
    };

    let anchor = find_floor_anchor(new_scene, original);
    if anchor.is_none() {
        tracing::warn!("no scaled floor in the new scene, walls keep their original Z");
    }

    for group in wall_groups {
        let Some(wall) = scale_in_xy(original, &group.wall_asset, &pivot, scale_factor, &mut stats)
        else {
            // Without the representative wall there is nothing to chain
            // the parts to; the whole group is dropped.
            continue;
        };

        let wall_old_z = wall.old_z;
        let wall_new_z = match &anchor {
            Some(anchor) => anchor.rescale_z(wall_old_z, scale_factor),
            None => wall_old_z,
        };

        let new_key = insert_scaled(new_scene, &wall, wall_new_z, scale_factor);
        tracing::debug!(from = %group.wall_asset, to = %new_key, "scaled wall");
        stats.walls_scaled += 1;

        for asset_key in &group.assets {
            let Some(part) = scale_in_xy(original, asset_key, &pivot, scale_factor, &mut stats)
            else {
                continue;
            };
            // Chain off the wall, not the floor
            let part_z = wall_new_z + (part.old_z - wall_old_z) * scale_factor;
            let new_key = insert_scaled(new_scene, &part, part_z, scale_factor);
            tracing::debug!(from = %asset_key, to = %new_key, "scaled wall part");
            stats.parts_scaled += 1;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use roomscale_core::Placement;

    fn record(dims: &[f64], pos: [f64; 3]) -> ObjectRecord {
        ObjectRecord {
            dimensions: dims.to_vec(),
            placements: vec![Placement::new(pos)],
            ..Default::default()
        }
    }

    fn group(wall: &str, assets: &[&str]) -> WallGroup {
        WallGroup {
            wall_asset: wall.into(),
            wall_type: "solid_wall".into(),
            assets: assets.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Original scene with a floor at Z=0 and its scaled twin at Z=0 in the
    /// new scene, so anchoring math is easy to follow.
    fn anchored_scenes() -> (Scene, Scene) {
        let mut original = Scene::new();
        original
            .objects
            .insert("d-Room".into(), record(&[4.0, 4.0, 0.2], [0.0, 0.0, 0.0]));
        let mut new_scene = Scene::new();
        new_scene
            .objects
            .insert("d-Room_scaled".into(), record(&[8.0, 8.0, 0.4], [0.0, 0.0, 0.0]));
        (original, new_scene)
    }

    #[test]
    fn wall_z_anchors_to_the_scaled_floor() {
        let (mut original, mut new_scene) = anchored_scenes();
        original
            .objects
            .insert("d-Wall1".into(), record(&[4.0, 0.2, 2.5], [0.0, 0.0, 2.0]));

        let stats = rescale_walls(&original, &[group("d-Wall1", &[])], &mut new_scene, 2.0);
        assert_eq!(stats.walls_scaled, 1);

        let wall = &new_scene.objects["d-Wall1_scaled"];
        // floor_new_z + (wall_z − floor_old_z) × factor = 0 + (2−0)×2
        assert_relative_eq!(wall.first_placement().unwrap().z(), 4.0);
        assert_relative_eq!(wall.width(), 8.0);
        assert_relative_eq!(wall.height(), 5.0);
    }

    #[test]
    fn part_z_chains_from_the_wall_not_the_floor() {
        let (mut original, mut new_scene) = anchored_scenes();
        original
            .objects
            .insert("d-Wall1".into(), record(&[4.0, 0.2, 2.5], [0.0, 0.0, 2.0]));
        original
            .objects
            .insert("d-Window".into(), record(&[1.0, 0.1, 1.0], [1.0, 0.0, 2.5]));

        let stats = rescale_walls(
            &original,
            &[group("d-Wall1", &["d-Window"])],
            &mut new_scene,
            2.0,
        );
        assert_eq!(stats.parts_scaled, 1);

        // wall_new_z + (part_z − wall_z) × factor = 4 + (2.5−2)×2
        let part = &new_scene.objects["d-Window_scaled"];
        assert_relative_eq!(part.first_placement().unwrap().z(), 5.0);
    }

    #[test]
    fn without_a_scaled_floor_walls_keep_their_z() {
        let mut original = Scene::new();
        original
            .objects
            .insert("d-Wall1".into(), record(&[4.0, 0.2, 2.5], [0.0, 0.0, 1.7]));

        let mut new_scene = Scene::new();
        rescale_walls(&original, &[group("d-Wall1", &[])], &mut new_scene, 2.0);

        let wall = &new_scene.objects["d-Wall1_scaled"];
        assert_relative_eq!(wall.first_placement().unwrap().z(), 1.7);
    }

    #[test]
    fn missing_members_are_skipped_without_aborting() {
        let (mut original, mut new_scene) = anchored_scenes();
        original
            .objects
            .insert("d-Wall2".into(), record(&[4.0, 0.2, 2.5], [0.0, 4.0, 0.0]));

        let groups = [
            group("d-WallGone", &[]),
            group("d-Wall2", &["d-PartGone"]),
        ];
        let stats = rescale_walls(&original, &groups, &mut new_scene, 2.0);

        assert_eq!(stats.walls_scaled, 1);
        assert_eq!(stats.parts_scaled, 0);
        assert_eq!(stats.skipped_missing, 2);
        assert!(new_scene.objects.contains_key("d-Wall2_scaled"));
    }

    #[test]
    fn local_scale_multiplies_with_the_factor() {
        let (mut original, mut new_scene) = anchored_scenes();
        let mut wall = record(&[4.0, 0.2, 2.5], [0.0, 0.0, 0.0]);
        wall.placements[0].scale = 0.5;
        original.objects.insert("d-Wall1".into(), wall);

        rescale_walls(&original, &[group("d-Wall1", &[])], &mut new_scene, 2.0);
        let scaled = &new_scene.objects["d-Wall1_scaled"];
        assert_relative_eq!(scaled.first_placement().unwrap().scale, 1.0);
    }
}
