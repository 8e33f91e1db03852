// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall grouping pass.
//!
//! Walls come out of the labeling service as individual objects, but windows,
//! trim and panels ("wall parts") belong to a wall and must move with it.
//! This pass clusters wall objects by proximity and attaches nearby wall
//! parts to each cluster.
//!
//! The clustering is a greedy single pass: each wall joins the first existing
//! group containing a member within [`WALL_GROUP_THRESHOLD`], otherwise it
//! starts a new group. This is not a transitive closure — two walls both
//! close to a third can end up separated depending on insertion order. Kept
//! as-is to match the established behavior; see DESIGN.md.

use roomscale_core::{BBox2, Scene, WallGroup};

/// Maximum XY distance between wall positions to share a group
pub const WALL_GROUP_THRESHOLD: f64 = 0.1;

/// Maximum distance from a wall part to a group's bounding box to attach it
pub const WALL_PART_THRESHOLD: f64 = 0.3;

struct WallItem<'a> {
    key: &'a str,
    wall_type: &'a str,
    x: f64,
    y: f64,
}

fn positions_close(a: &WallItem, b: &WallItem, threshold: f64) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy <= threshold * threshold
}

/// Cluster wall objects by proximity and attach nearby wall parts.
///
/// Walls are objects carrying a `wall_type` but no `floor_description`.
/// Each finalized group is reported through its first member (`wall_asset`,
/// `wall_type`) plus the keys of every wall part within
/// [`WALL_PART_THRESHOLD`] of the group's union bounding box.
pub fn group_walls(scene: &Scene) -> Vec<WallGroup> {
    // 1) Wall objects with a usable position
    let mut wall_items = Vec::new();
    for (key, record) in &scene.objects {
        let Some(wall_type) = record.wall_type.as_deref() else {
            continue;
        };
        if record.is_floor() {
            continue;
        }
        let Some(placement) = record.first_placement() else {
            continue;
        };
        wall_items.push(WallItem {
            key,
            wall_type,
            x: placement.x(),
            y: placement.y(),
        });
    }

    // 2) Greedy proximity clustering, first matching group wins
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for (idx, item) in wall_items.iter().enumerate() {
        let joined = clusters.iter_mut().find(|cluster| {
            cluster
                .iter()
                .any(|&member| positions_close(item, &wall_items[member], WALL_GROUP_THRESHOLD))
        });
        match joined {
            Some(cluster) => cluster.push(idx),
            None => clusters.push(vec![idx]),
        }
    }

    // 3) Per cluster: union bbox, then attach wall parts near it
    let mut groups = Vec::with_capacity(clusters.len());
    for cluster in clusters {
        let mut bbox = BBox2::empty();
        for &member in &cluster {
            let record = &scene.objects[wall_items[member].key];
            if let Some(b) = record.bbox_xy() {
                bbox.expand(&b);
            }
        }

        let mut assets = Vec::new();
        if !bbox.is_empty() {
            for (key, record) in &scene.objects {
                if record.is_wall() || record.is_floor() || !record.is_wall_part() {
                    continue;
                }
                let Some(placement) = record.first_placement() else {
                    continue;
                };
                if placement.position.len() < 2 {
                    continue;
                }
                if bbox.distance_to_point(placement.x(), placement.y()) <= WALL_PART_THRESHOLD {
                    assets.push(key.to_string());
                }
            }
        }

        let first = &wall_items[cluster[0]];
        groups.push(WallGroup {
            wall_asset: first.key.to_string(),
            wall_type: first.wall_type.to_string(),
            assets,
        });
    }

    groups
}
