// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orchestration of the rescaling passes over persisted scene documents.

pub mod error;
pub mod leftover;
pub mod run;

pub use error::{Error, Result};
pub use leftover::{leftover_objects, LeftoverObject};
pub use run::{
    run_rescale, GroupSource, RunSummary, ASSET_GROUPS_FILE, LEFTOVERS_FILE, RESCALED_SCENE_FILE,
    WALL_GROUPS_FILE,
};
