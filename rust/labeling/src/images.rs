// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene imagery handling.
//!
//! The labeling and grouping clients consume pre-rendered views of the scene
//! from a directory and ship them inline as base64 data URLs. Vision
//! endpoints cap how many images one message may carry, so listings are
//! chunked before building messages.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};

/// Vision endpoints reject messages with more images than this
pub const MAX_IMAGES_PER_MESSAGE: usize = 9;

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        _ => "image/jpeg",
    }
}

fn is_image(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ["png", "jpg", "jpeg"].iter().any(|i| ext.eq_ignore_ascii_case(i))
    )
}

/// List the image files of a directory in sorted order.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::File {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::File {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_image(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Encode one image file as a `data:` URL for inline transport.
pub fn image_data_url(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(format!(
        "data:{};base64,{}",
        mime_for(path),
        STANDARD.encode(bytes)
    ))
}

/// Encode a listing into data-URL chunks of at most
/// [`MAX_IMAGES_PER_MESSAGE`] images each.
pub fn data_url_chunks(images: &[PathBuf]) -> Result<Vec<Vec<String>>> {
    images
        .chunks(MAX_IMAGES_PER_MESSAGE)
        .map(|chunk| chunk.iter().map(|path| image_data_url(path)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_the_extension() {
        assert_eq!(mime_for(Path::new("view.png")), "image/png");
        assert_eq!(mime_for(Path::new("view.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("view.jpg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("view.jpeg")), "image/jpeg");
        // Unknown extensions fall back to JPEG rather than failing
        assert_eq!(mime_for(Path::new("view")), "image/jpeg");
    }

    #[test]
    fn only_image_extensions_are_listed() {
        assert!(is_image(Path::new("a.png")));
        assert!(is_image(Path::new("a.JPG")));
        assert!(!is_image(Path::new("a.json")));
        assert!(!is_image(Path::new("a")));
    }

    #[test]
    fn data_url_embeds_the_file() {
        let dir = std::env::temp_dir().join("roomscale-images-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pixel.png");
        fs::write(&path, [0x89, 0x50, 0x4e, 0x47]).unwrap();

        let url = image_data_url(&path).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(url.ends_with(&STANDARD.encode([0x89, 0x50, 0x4e, 0x47])));
    }

    #[test]
    fn listings_chunk_at_the_message_cap() {
        let images: Vec<PathBuf> = (0..20).map(|i| PathBuf::from(format!("{i}.png"))).collect();
        let chunks: Vec<&[PathBuf]> = images.chunks(MAX_IMAGES_PER_MESSAGE).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 9);
        assert_eq!(chunks[2].len(), 2);
    }

    #[test]
    fn missing_directory_reports_the_path() {
        let err = list_images(Path::new("/nonexistent/roomscale")).unwrap_err();
        match err {
            Error::File { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/roomscale"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
