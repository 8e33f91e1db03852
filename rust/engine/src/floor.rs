// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor rescaling pass.
//!
//! Floors are scaled first: every later pass anchors its vertical placement
//! to a floor this pass inserts into the new scene.

use roomscale_core::{keys, Scene};
use serde::Serialize;

use crate::helpers::{set_dimensions, set_placement};
use crate::pivot::compute_pivot;

/// Statistics from the floor pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct FloorStats {
    pub floors_scaled: usize,
    /// The uniform factor applied, derived from the target width
    pub scale_factor: f64,
}

/// Scale every floor of the original scene into the new scene.
///
/// The factor is `new_x / Σ(floor widths)`; floors scale uniformly by the
/// X-derived factor only (the target length is accepted for symmetry but not
/// independently used — a deliberate simplification). Positions scale about
/// the global pivot; Z is compensated by the thickness growth so floor tops
/// stay at a consistent reference.
pub fn rescale_floors(
    original: &Scene,
    room_name: &str,
    new_x: f64,
    _new_y: f64,
    new_scene: &mut Scene,
) -> FloorStats {
    let mut stats = FloorStats {
        scale_factor: 1.0,
        ..Default::default()
    };

    let Some(pivot) = compute_pivot(original) else {
        tracing::warn!("no usable objects in the original scene, nothing to rescale");
        return stats;
    };

    // Floors, in key order, with the width sum driving the scale factor
    let mut floors = Vec::new();
    let mut width_sum = 0.0;
    for (key, record) in &original.objects {
        if !keys::is_floor_key(key, room_name) {
            continue;
        }
        if !record.is_usable() {
            tracing::warn!(key = %key, "floor record has no usable geometry, skipped");
            continue;
        }
        width_sum += record.width();
        floors.push((key, record));
    }

    if width_sum > 0.0 {
        stats.scale_factor = new_x / width_sum;
    }
    let factor = stats.scale_factor;

    for (key, record) in floors {
        let placement = &record.placements[0];
        let (w, l, h) = (record.width(), record.length(), record.height());
        let (sw, sl, sh) = (w * factor, l * factor, h * factor);

        let (new_x, new_y) = pivot.scale_xy(placement.x(), placement.y(), factor);
        // Compensate the thickness growth so the floor top stays put
        let new_z = placement.z() - (sh - h);

        let mut scaled = record.clone();
        set_dimensions(&mut scaled, sw, sl, sh);
        set_placement(&mut scaled, new_x, new_y, new_z, factor);

        let new_key = new_scene.insert_unique(&format!("{}_scaled", key), scaled);
        tracing::debug!(from = %key, to = %new_key, "scaled floor");
        stats.floors_scaled += 1;
    }

    stats
}
