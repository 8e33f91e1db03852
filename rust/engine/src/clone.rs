// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cloneable asset tiling pass.
//!
//! Cloneable groups (desk clusters, shelving runs) fill the grown room by
//! repetition instead of stretching: the whole group is stamped out on a
//! grid of rigid translations, one gap width apart, so every copy keeps the
//! original internal arrangement.

use roomscale_core::{AssetGroup, BBox2, Scene};
use serde::Serialize;

use crate::anchor::find_scaled_floor;
use crate::helpers::set_placement;

/// Gap between adjacent tiles, in scene units
pub const TILE_GAP: f64 = 1.0;

/// Groups whose footprint is below this are not tileable
const DEGENERATE_EXTENT: f64 = 1e-6;

/// Footprint assumed when no scaled floor exists in the new scene
const FALLBACK_FLOOR: (f64, f64) = (10.0, 10.0);

/// Statistics from the tiling pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct CloneStats {
    pub groups_tiled: usize,
    pub groups_skipped_degenerate: usize,
    pub clones_inserted: usize,
}

fn clone_count(factor: f64) -> usize {
    (factor.floor() as usize).max(1)
}

/// Tile every cloneable group across the rescaled footprint.
///
/// The grid is `max(1, ⌊factor⌋)` tiles per axis; tile `(0, 0)` sits at the
/// group's original position and the spacing is the group's bounding box
/// plus [`TILE_GAP`]. Copies keep their dimensions and local scale — the
/// group as a whole is never stretched. Z chains off the scaled floor anchor
/// at the group's own scale of 1.0, which reduces to a plain offset by the
/// floor's Z displacement.
pub fn place_cloneable_assets(
    original: &Scene,
    asset_groups: &[AssetGroup],
    new_scene: &mut Scene,
    factor_x: f64,
    factor_y: f64,
) -> CloneStats {
    let mut stats = CloneStats::default();

    let scaled_floor = find_scaled_floor(new_scene, original);
    let (floor_w, floor_l) = match &scaled_floor {
        Some(floor) => (floor.width, floor.length),
        None => {
            tracing::warn!(
                width = FALLBACK_FLOOR.0,
                length = FALLBACK_FLOOR.1,
                "no scaled floor in the new scene, assuming a default footprint"
            );
            FALLBACK_FLOOR
        }
    };
    let anchor = scaled_floor.and_then(|floor| floor.anchor);

    let clones_x = clone_count(factor_x);
    let clones_y = clone_count(factor_y);

    for group in asset_groups.iter().filter(|g| g.cloneable) {
        // Union footprint over the members that still resolve
        let mut bbox = BBox2::empty();
        let mut members = Vec::new();
        for key in &group.assets {
            let Some(record) = original.objects.get(key) else {
                tracing::warn!(group = %group.group_name, key = %key, "group member not in the original scene, skipped");
                continue;
            };
            if !record.is_usable() {
                tracing::warn!(group = %group.group_name, key = %key, "group member has no usable geometry, skipped");
                continue;
            }
            if let Some(b) = record.bbox_xy() {
                bbox.expand(&b);
            }
            members.push((key, record));
        }

        if bbox.is_empty() || bbox.width() < DEGENERATE_EXTENT || bbox.length() < DEGENERATE_EXTENT
        {
            tracing::warn!(group = %group.group_name, "degenerate group footprint, not tiled");
            stats.groups_skipped_degenerate += 1;
            continue;
        }

        let spacing_x = bbox.width() + TILE_GAP;
        let spacing_y = bbox.length() + TILE_GAP;
        tracing::debug!(
            group = %group.group_name,
            tiles_x = clones_x,
            tiles_y = clones_y,
            floor_w = %floor_w,
            floor_l = %floor_l,
            "tiling group"
        );

        for ix in 0..clones_x {
            for iy in 0..clones_y {
                let offset_x = ix as f64 * spacing_x;
                let offset_y = iy as f64 * spacing_y;
                for (key, record) in &members {
                    let placement = &record.placements[0];
                    let new_z = match &anchor {
                        Some(anchor) => anchor.rescale_z(placement.z(), 1.0),
                        None => placement.z(),
                    };

                    let mut clone = (*record).clone();
                    let local_scale = placement.scale;
                    set_placement(
                        &mut clone,
                        placement.x() + offset_x,
                        placement.y() + offset_y,
                        new_z,
                        local_scale,
                    );

                    let new_key =
                        new_scene.insert_unique(&format!("{}_clone_{}_{}", key, ix, iy), clone);
                    tracing::debug!(from = %key, to = %new_key, "inserted clone");
                    stats.clones_inserted += 1;
                }
            }
        }
        stats.groups_tiled += 1;
    }

    stats
}
