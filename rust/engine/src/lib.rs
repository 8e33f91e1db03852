// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene rescaling engine.
//!
//! Transforms a furnished scene onto a new footprint in four ordered passes,
//! each appending derived records to a fresh scene while the original stays
//! untouched:
//!
//! 1. **Floors** ([`rescale_floors`]) — establishes the scale factor from the
//!    target width and inserts `_scaled` floors every later pass anchors to.
//! 2. **Walls** ([`group_walls`] + [`rescale_walls`]) — clusters walls with
//!    their windows and trim, scales them about the pivot and re-seats them
//!    on the scaled floor.
//! 3. **Individual assets** ([`place_individual_assets`]) — repositions
//!    freestanding furniture without resizing it.
//! 4. **Cloneable assets** ([`place_cloneable_assets`]) — fills the grown
//!    footprint by tiling repeatable groups instead of stretching them.
//!
//! All passes share one XY pivot (the original scene's union bounding-box
//! center) and one Z anchor (the first scaled floor), so the transforms
//! compose without drift. Missing or degenerate inputs are logged and
//! skipped; the passes never fail a whole scene over one bad record.

pub mod anchor;
pub mod assets;
pub mod clone;
pub mod floor;
pub mod grouping;
mod helpers;
pub mod pivot;
pub mod walls;

pub use anchor::{find_floor_anchor, find_scaled_floor, FloorAnchor, ScaledFloor};
pub use assets::{place_individual_assets, PlaceStats};
pub use clone::{place_cloneable_assets, CloneStats, TILE_GAP};
pub use floor::{rescale_floors, FloorStats};
pub use grouping::{group_walls, WALL_GROUP_THRESHOLD, WALL_PART_THRESHOLD};
pub use pivot::{compute_pivot, Pivot};
pub use walls::{rescale_walls, WallStats};
