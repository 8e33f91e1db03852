// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sequential rescaling run.
//!
//! The passes execute strictly in order and communicate only through the
//! persisted new-scene document: each pass loads the file the previous pass
//! saved, appends its records, and saves again. Re-running a pass therefore
//! appends suffixed keys rather than overwriting — runs are not idempotent.

use std::fs;
use std::path::{Path, PathBuf};

use roomscale_core::{save_asset_groups, save_wall_list, AssetGroup, Scene};
use roomscale_engine::{
    group_walls, place_cloneable_assets, place_individual_assets, rescale_floors, rescale_walls,
    CloneStats, FloorStats, PlaceStats, WallStats,
};
use roomscale_labeling::AssetGrouper;

use crate::error::{Error, Result};
use crate::leftover::leftover_objects;

pub const RESCALED_SCENE_FILE: &str = "scene_rescaled.json";
pub const WALL_GROUPS_FILE: &str = "wall_groups.json";
pub const LEFTOVERS_FILE: &str = "leftover_objects.json";
pub const ASSET_GROUPS_FILE: &str = "asset_groups.json";

/// Where the asset groups for the placement passes come from.
pub enum GroupSource<'a> {
    /// A caller-provided list, for offline runs.
    Provided(Vec<AssetGroup>),
    /// The grouping collaborator, fed scene imagery and the leftover manifest.
    Collaborator {
        grouper: &'a dyn AssetGrouper,
        image_dir: &'a Path,
    },
}

/// Aggregate outcome of a full run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub scale_factor: f64,
    pub floors: FloorStats,
    pub walls: WallStats,
    pub placed: PlaceStats,
    pub clones: CloneStats,
    pub leftovers: usize,
    /// Path of the final rescaled scene document
    pub rescaled_scene: PathBuf,
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Run the four transform passes over one scene document.
///
/// A scene or manifest that cannot be loaded or saved aborts the run;
/// everything below that granularity is logged and skipped by the passes
/// themselves.
pub fn run_rescale(
    scene_path: &Path,
    output_dir: &Path,
    room_name: &str,
    new_x: f64,
    new_y: f64,
    groups: GroupSource<'_>,
) -> Result<RunSummary> {
    let original = Scene::load(scene_path)?;
    fs::create_dir_all(output_dir).map_err(|source| Error::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let scene_out = output_dir.join(RESCALED_SCENE_FILE);

    tracing::info!(
        scene = %scene_path.display(),
        objects = original.objects.len(),
        room = room_name,
        new_x,
        new_y,
        "starting rescale run"
    );

    // Pass 1: floors establish the scale factor and the Z anchor. An
    // existing output document is appended to, not replaced, so re-runs
    // suffix their keys.
    let mut new_scene = if scene_out.is_file() {
        Scene::load(&scene_out)?
    } else {
        Scene::new()
    };
    let floors = rescale_floors(&original, room_name, new_x, new_y, &mut new_scene);
    let factor = floors.scale_factor;
    new_scene.save(&scene_out)?;
    tracing::info!(floors = floors.floors_scaled, factor, "floor pass done");

    // Wall grouping is derived from the original scene only.
    let wall_groups = group_walls(&original);
    save_wall_list(&output_dir.join(WALL_GROUPS_FILE), &wall_groups)?;
    tracing::info!(groups = wall_groups.len(), "wall grouping done");

    // Pass 2: walls, reloaded from the persisted document.
    let mut new_scene = Scene::load(&scene_out)?;
    let walls = rescale_walls(&original, &wall_groups, &mut new_scene, factor);
    new_scene.save(&scene_out)?;
    tracing::info!(
        walls = walls.walls_scaled,
        parts = walls.parts_scaled,
        skipped = walls.skipped_missing,
        "wall pass done"
    );

    // Leftover manifest drives grouping.
    let new_scene = Scene::load(&scene_out)?;
    let leftovers = leftover_objects(&original, &new_scene);
    write_json(&output_dir.join(LEFTOVERS_FILE), &leftovers)?;
    tracing::info!(leftovers = leftovers.len(), "leftover manifest written");

    let asset_groups = match groups {
        GroupSource::Provided(groups) => groups,
        GroupSource::Collaborator { grouper, image_dir } => {
            let manifest = serde_json::to_value(&leftovers)?;
            grouper.group_assets(image_dir, &manifest)
        }
    };
    save_asset_groups(&output_dir.join(ASSET_GROUPS_FILE), &asset_groups)?;

    // Pass 3: individual assets.
    let mut new_scene = Scene::load(&scene_out)?;
    let placed = place_individual_assets(&original, &asset_groups, &mut new_scene, factor);
    new_scene.save(&scene_out)?;
    tracing::info!(
        placed = placed.assets_placed,
        skipped = placed.skipped_missing,
        "placement pass done"
    );

    // Pass 4: cloneable groups tile with the same factor on both axes.
    let mut new_scene = Scene::load(&scene_out)?;
    let clones = place_cloneable_assets(&original, &asset_groups, &mut new_scene, factor, factor);
    new_scene.save(&scene_out)?;
    tracing::info!(
        groups = clones.groups_tiled,
        clones = clones.clones_inserted,
        "cloning pass done"
    );

    Ok(RunSummary {
        scale_factor: factor,
        floors,
        walls,
        placed,
        clones,
        leftovers: leftovers.len(),
        rescaled_scene: scene_out,
    })
}
