// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Individual asset placement pass.
//!
//! Freestanding furniture keeps its physical size: only positions move, so a
//! sofa in a doubled room stays a sofa. Members of cloneable groups are
//! handled by the tiling pass instead and skipped here.

use roomscale_core::{AssetGroup, Scene};
use serde::Serialize;

use crate::anchor::find_floor_anchor;
use crate::helpers::set_placement;
use crate::pivot::compute_pivot;

/// Statistics from the individual placement pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlaceStats {
    pub assets_placed: usize,
    pub skipped_missing: usize,
}

/// Reposition every member of the non-cloneable groups into the new scene.
///
/// XY scales about the global pivot, Z chains off the scaled floor anchor,
/// dimensions are copied through untouched and the placement's local scale is
/// reset to 1.0. Records land under `{key}_placed` derived keys.
pub fn place_individual_assets(
    original: &Scene,
    asset_groups: &[AssetGroup],
    new_scene: &mut Scene,
    scale_factor: f64,
) -> PlaceStats {
    let mut stats = PlaceStats::default();

    let Some(pivot) = compute_pivot(original) else {
        tracing::warn!("no usable objects in the original scene, placement pass skipped");
        return stats;
    };

    let anchor = find_floor_anchor(new_scene, original);
    if anchor.is_none() {
        tracing::warn!("no scaled floor in the new scene, assets keep their original Z");
    }

    for group in asset_groups.iter().filter(|g| !g.cloneable) {
        for key in &group.assets {
            let Some(record) = original.objects.get(key) else {
                tracing::warn!(group = %group.group_name, key = %key, "asset not in the original scene, skipped");
                stats.skipped_missing += 1;
                continue;
            };
            let Some(placement) = record.first_placement() else {
                tracing::warn!(group = %group.group_name, key = %key, "asset has no placement, skipped");
                stats.skipped_missing += 1;
                continue;
            };

            let (new_x, new_y) = pivot.scale_xy(placement.x(), placement.y(), scale_factor);
            let new_z = match &anchor {
                Some(anchor) => anchor.rescale_z(placement.z(), scale_factor),
                None => placement.z(),
            };

            let mut placed = record.clone();
            set_placement(&mut placed, new_x, new_y, new_z, 1.0);

            let new_key = new_scene.insert_unique(&format!("{}_placed", key), placed);
            tracing::debug!(from = %key, to = %new_key, "placed asset");
            stats.assets_placed += 1;
        }
    }

    stats
}
