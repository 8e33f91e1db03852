// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Global scaling pivot.
//!
//! Every pass scales XY positions about the same pivot: the center of the
//! union bounding box of the *original* scene. The pivot is computed by one
//! shared function so the floor, wall and asset passes cannot disagree on it.

use roomscale_core::Scene;

/// The global XY scaling origin of a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub x: f64,
    pub y: f64,
}

impl Pivot {
    /// Scale a point about this pivot:
    /// `pivot + (point − pivot) × factor`.
    pub fn scale_xy(&self, x: f64, y: f64, factor: f64) -> (f64, f64) {
        (
            self.x + (x - self.x) * factor,
            self.y + (y - self.y) * factor,
        )
    }
}

/// Center of the union bounding box of every usable object.
///
/// Objects with fewer than two dimension components or without placements
/// are skipped. Returns `None` when nothing contributes — callers must treat
/// that as "no geometry to transform" rather than working with NaN.
pub fn compute_pivot(scene: &Scene) -> Option<Pivot> {
    scene.union_bbox().map(|bbox| {
        let (x, y) = bbox.center();
        Pivot { x, y }
    })
}
