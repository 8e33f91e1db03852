// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene documents and data model for room layout rescaling
//!
//! This crate defines the persisted documents the rescaling pipeline works
//! on: the scene document (object key → placed-object record), the wall
//! group list and the asset group list. It also carries the key helpers and
//! the unique-key insertion primitive every transform pass relies on.
//!
//! # Usage
//!
//! ```rust,ignore
//! use roomscale_core::{Scene, ObjectRecord, Placement};
//!
//! let scene = Scene::load(Path::new("scene.json"))?;
//! let (total_x, total_y) = scene.total_floor_dimensions("dining_room");
//! ```

pub mod error;
pub mod groups;
pub mod keys;
pub mod scene;

pub use error::{Error, Result};
pub use groups::{
    load_asset_groups, load_wall_list, save_asset_groups, save_wall_list,
    validate_asset_groups, AssetGroup, WallGroup,
};
pub use scene::{BBox2, ObjectRecord, Placement, Scene};
