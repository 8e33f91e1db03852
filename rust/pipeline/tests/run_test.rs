// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Full offline run over a persisted scene document, with asset groups
//! provided up front instead of a grouping collaborator.

use std::fs;
use std::path::PathBuf;

use approx::assert_relative_eq;
use roomscale_core::{AssetGroup, ObjectRecord, Placement, Scene};
use roomscale_pipeline::{
    run_rescale, GroupSource, ASSET_GROUPS_FILE, LEFTOVERS_FILE, RESCALED_SCENE_FILE,
    WALL_GROUPS_FILE,
};

fn record(dims: &[f64], pos: [f64; 3]) -> ObjectRecord {
    ObjectRecord {
        dimensions: dims.to_vec(),
        placements: vec![Placement::new(pos)],
        ..Default::default()
    }
}

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("roomscale-pipeline-tests").join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_office_scene(path: &std::path::Path) {
    let mut scene = Scene::new();
    scene
        .objects
        .insert("office-Room1".into(), record(&[4.0, 4.0, 0.2], [0.0, 0.0, 0.0]));

    let mut wall = record(&[4.0, 0.2, 2.5], [0.0, 0.0, 0.2]);
    wall.wall_type = Some("solid_wall".into());
    scene.objects.insert("office-Wall1".into(), wall);

    scene
        .objects
        .insert("office-Sofa".into(), record(&[2.0, 1.0, 0.8], [1.0, 3.0, 0.2]));
    scene
        .objects
        .insert("office-Desk".into(), record(&[1.5, 0.8, 0.7], [0.5, 1.0, 0.2]));

    scene.save(path).unwrap();
}

#[test]
fn offline_run_produces_all_documents() {
    let dir = test_dir("offline-run");
    let scene_path = dir.join("scene.json");
    write_office_scene(&scene_path);
    let output_dir = dir.join("out");

    let groups = vec![
        AssetGroup {
            id: 1,
            group_name: "seating".into(),
            assets: vec!["office-Sofa".into()],
            cloneable: false,
        },
        AssetGroup {
            id: 2,
            group_name: "workstations".into(),
            assets: vec!["office-Desk".into()],
            cloneable: true,
        },
    ];

    let summary = run_rescale(
        &scene_path,
        &output_dir,
        "office",
        8.0,
        8.0,
        GroupSource::Provided(groups),
    )
    .unwrap();

    assert_relative_eq!(summary.scale_factor, 2.0);
    assert_eq!(summary.floors.floors_scaled, 1);
    assert_eq!(summary.walls.walls_scaled, 1);
    assert_eq!(summary.placed.assets_placed, 1);
    // Factor 2 on both axes → 2×2 desks
    assert_eq!(summary.clones.clones_inserted, 4);
    // Sofa and desk were still unplaced when the manifest was written
    assert_eq!(summary.leftovers, 2);

    for file in [
        RESCALED_SCENE_FILE,
        WALL_GROUPS_FILE,
        LEFTOVERS_FILE,
        ASSET_GROUPS_FILE,
    ] {
        assert!(output_dir.join(file).is_file(), "missing {file}");
    }

    // The final document holds every derived record.
    let rescaled = Scene::load(&summary.rescaled_scene).unwrap();
    assert!(rescaled.objects.contains_key("office-Room1_scaled"));
    assert!(rescaled.objects.contains_key("office-Wall1_scaled"));
    assert!(rescaled.objects.contains_key("office-Sofa_placed"));
    assert!(rescaled.objects.contains_key("office-Desk_clone_1_1"));
    // Nothing from the original scene leaks through unchanged.
    assert!(!rescaled.objects.contains_key("office-Room1"));
}

#[test]
fn a_missing_scene_document_is_fatal() {
    let dir = test_dir("missing-scene");
    let result = run_rescale(
        &dir.join("nope.json"),
        &dir.join("out"),
        "office",
        8.0,
        8.0,
        GroupSource::Provided(Vec::new()),
    );
    assert!(result.is_err());
}

#[test]
fn rerunning_appends_suffixed_records() {
    let dir = test_dir("rerun");
    let scene_path = dir.join("scene.json");
    write_office_scene(&scene_path);
    let output_dir = dir.join("out");

    for _ in 0..2 {
        run_rescale(
            &scene_path,
            &output_dir,
            "office",
            8.0,
            8.0,
            GroupSource::Provided(Vec::new()),
        )
        .unwrap();
    }

    let rescaled = Scene::load(&output_dir.join(RESCALED_SCENE_FILE)).unwrap();
    assert!(rescaled.objects.contains_key("office-Room1_scaled"));
    assert!(rescaled.objects.contains_key("office-Room1_scaled_1"));
}
