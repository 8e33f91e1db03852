// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI driver: rescale a furnished scene onto a new footprint.
//!
//! Usage:
//!   roomscale <scene.json> --room-name <name> --new-x <m> --new-y <m> [options]

mod config;

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use roomscale_core::{load_asset_groups, Scene};
use roomscale_labeling::{needs_labels, GroupingClient, LabelingClient, SceneLabeler};
use roomscale_pipeline::{run_rescale, GroupSource};

use crate::config::Config;

const LABELED_SCENE_FILE: &str = "scene_labeled.json";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let scene_path = PathBuf::from(&args[1]);

    // Parse options
    let mut room_name: Option<String> = None;
    let mut new_x: Option<f64> = None;
    let mut new_y: Option<f64> = None;
    let mut output_dir = PathBuf::from("rescaled");
    let mut asset_groups_path: Option<PathBuf> = None;
    let mut image_dir: Option<PathBuf> = None;
    let mut offline = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--room-name" => {
                i += 1;
                room_name = Some(args.get(i).context("--room-name needs a value")?.clone());
            }
            "--new-x" => {
                i += 1;
                let raw = args.get(i).context("--new-x needs a value")?;
                new_x = Some(raw.parse().context("invalid --new-x value")?);
            }
            "--new-y" => {
                i += 1;
                let raw = args.get(i).context("--new-y needs a value")?;
                new_y = Some(raw.parse().context("invalid --new-y value")?);
            }
            "--output-dir" => {
                i += 1;
                output_dir = PathBuf::from(args.get(i).context("--output-dir needs a value")?);
            }
            "--asset-groups" => {
                i += 1;
                asset_groups_path =
                    Some(PathBuf::from(args.get(i).context("--asset-groups needs a value")?));
            }
            "--image-dir" => {
                i += 1;
                image_dir = Some(PathBuf::from(args.get(i).context("--image-dir needs a value")?));
            }
            "--offline" => {
                offline = true;
            }
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let room_name = room_name.context("--room-name is required")?;
    let new_x = new_x.context("--new-x is required")?;
    let new_y = new_y.context("--new-y is required")?;

    let config = Config::from_env();

    println!("=== Scene Rescaler ===");
    println!();

    // Step 1: current footprint, before anything is transformed.
    println!("[1/4] Loading scene: {}", scene_path.display());
    let mut scene = Scene::load(&scene_path)
        .with_context(|| format!("cannot load scene '{}'", scene_path.display()))?;
    let (total_w, total_l) = scene.total_floor_dimensions(&room_name);
    println!("  Objects: {}", scene.objects.len());
    println!("  Total floor dimensions: {:.2}m x {:.2}m", total_w, total_l);
    println!("  Target footprint: {:.2}m x {:.2}m", new_x, new_y);

    // Step 2: label the scene when imagery is available and labels are
    // missing. The labeled document is persisted next to the other outputs
    // and becomes the run's input.
    println!("[2/4] Labeling...");
    let run_scene_path = match image_dir.as_deref() {
        Some(dir) if !offline && needs_labels(&scene, &room_name) => {
            println!("  Labeling service: {} ({})", config.labeling_endpoint, config.model);
            let labeler =
                LabelingClient::new(&config.labeling_endpoint, &config.api_key, &config.model);
            let stats = labeler.label_scene(&mut scene, &room_name, dir);
            println!(
                "  Labeled {} objects ({} fell back to unknown)",
                stats.labeled, stats.degraded
            );
            fs::create_dir_all(&output_dir)
                .with_context(|| format!("cannot create '{}'", output_dir.display()))?;
            let labeled_path = output_dir.join(LABELED_SCENE_FILE);
            scene
                .save(&labeled_path)
                .with_context(|| format!("cannot save '{}'", labeled_path.display()))?;
            println!("  Labeled scene: {}", labeled_path.display());
            labeled_path
        }
        _ => {
            if needs_labels(&scene, &room_name) {
                println!("  Skipped: scene has unlabeled objects but no --image-dir (or --offline)");
            } else {
                println!("  Skipped: scene is already labeled");
            }
            scene_path.clone()
        }
    };

    // Step 3: where the asset groups come from.
    println!("[3/4] Resolving asset groups...");
    let provided_groups = match &asset_groups_path {
        Some(path) => {
            let (groups, rejected) = load_asset_groups(path)
                .with_context(|| format!("cannot load asset groups '{}'", path.display()))?;
            if rejected > 0 {
                eprintln!("  Warning: dropped {} malformed group records", rejected);
            }
            println!("  Using {} groups from {}", groups.len(), path.display());
            Some(groups)
        }
        None if offline => {
            println!("  Offline mode: no asset groups, placement passes will be empty");
            Some(Vec::new())
        }
        None => None,
    };

    let grouper;
    let group_source = match provided_groups {
        Some(groups) => GroupSource::Provided(groups),
        None => {
            let dir = image_dir
                .as_deref()
                .context("--image-dir is required when the grouping service is used")?;
            println!("  Grouping service: {} ({})", config.labeling_endpoint, config.model);
            grouper = GroupingClient::new(&config.labeling_endpoint, &config.api_key, &config.model);
            GroupSource::Collaborator {
                grouper: &grouper,
                image_dir: dir,
            }
        }
    };

    // Step 4: the four transform passes.
    println!("[4/4] Rescaling...");
    let summary = run_rescale(&run_scene_path, &output_dir, &room_name, new_x, new_y, group_source)
        .context("rescale run failed")?;

    println!();
    println!("Scale factor: {:.3}", summary.scale_factor);
    println!(
        "Floors: {}  Walls: {} (+{} parts)  Placed: {}  Clones: {}",
        summary.floors.floors_scaled,
        summary.walls.walls_scaled,
        summary.walls.parts_scaled,
        summary.placed.assets_placed,
        summary.clones.clones_inserted,
    );
    if summary.walls.skipped_missing + summary.placed.skipped_missing > 0 {
        println!(
            "Skipped {} objects with missing references",
            summary.walls.skipped_missing + summary.placed.skipped_missing
        );
    }
    println!("Rescaled scene: {}", summary.rescaled_scene.display());

    Ok(())
}

fn print_usage() {
    println!(
        r#"Scene Rescaler
==============

Rescales a furnished room scene onto a new footprint: floors stretch,
walls follow with their windows and trim, furniture is repositioned and
cloneable groups are tiled to fill the added space.

USAGE:
  roomscale <scene.json> --room-name <name> --new-x <m> --new-y <m> [OPTIONS]

ARGUMENTS:
  <scene.json>            Scene document to rescale

OPTIONS:
  --room-name <name>      Key prefix of the room's objects (required)
  --new-x <meters>        Target footprint width (required)
  --new-y <meters>        Target footprint length (required)
  --output-dir <path>     Output directory (default: rescaled)
  --asset-groups <path>   Use a pre-built asset group list
  --image-dir <path>      Rendered scene views for the labeling and
                          grouping services; unlabeled scenes are labeled
                          before rescaling when this is set
  --offline               No network: skip the labeling and grouping services
  -h, --help              Show this help message

ENVIRONMENT:
  ROOMSCALE_LABELING_ENDPOINT  Chat-completions base URL
  ROOMSCALE_API_KEY            API key for the vision endpoint
  ROOMSCALE_MODEL              Vision model name (default: gpt-4o)
"#
    );
}
