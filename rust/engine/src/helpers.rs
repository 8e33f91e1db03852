// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared record-editing helpers for the transform passes.

use roomscale_core::{ObjectRecord, Placement};

/// Overwrite the first three dimension components, preserving any extras
pub(crate) fn set_dimensions(record: &mut ObjectRecord, w: f64, l: f64, h: f64) {
    if record.dimensions.len() >= 3 {
        record.dimensions[0] = w;
        record.dimensions[1] = l;
        record.dimensions[2] = h;
    } else {
        record.dimensions = vec![w, l, h];
    }
}

/// Overwrite the first placement's position and local scale, keeping its
/// rotation. Creates the placement when the source record had none.
pub(crate) fn set_placement(record: &mut ObjectRecord, x: f64, y: f64, z: f64, scale: f64) {
    match record.placements.first_mut() {
        Some(placement) => {
            placement.set_position(x, y, z);
            placement.scale = scale;
        }
        None => {
            let mut placement = Placement::new([x, y, z]);
            placement.scale = scale;
            record.placements.push(placement);
        }
    }
}
