// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! External collaborators for the rescaling pipeline.
//!
//! Three concerns live here, all behind traits so the pipeline runs without
//! a network in tests:
//!
//! - [`SceneLabeler`] — vision labeling of scene objects from rendered views.
//! - [`AssetGrouper`] — grouping of leftover objects into placeable clusters.
//! - [`AssetStorage`] — uploads of exported geometry, returning retrieval URLs.
//!
//! The labeling and grouping clients degrade on failure (unknown labels,
//! empty group list) instead of failing the run; only storage reports hard
//! errors to its caller.

mod chat;
pub mod error;
pub mod grouping;
pub mod images;
pub mod labeler;
pub mod storage;

pub use error::{Error, Result};
pub use grouping::{AssetGrouper, GroupingClient};
pub use images::{image_data_url, list_images, MAX_IMAGES_PER_MESSAGE};
pub use labeler::{needs_labels, LabelStats, LabelingClient, SceneLabeler};
pub use storage::{AssetStorage, HttpStorage};
