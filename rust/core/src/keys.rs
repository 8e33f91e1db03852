// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object-key helpers.
//!
//! Scene exporters namespace every object key with the room name
//! (`"dining_room-Wall3"`). Classification by key must strip that prefix
//! first, otherwise a room named "wall" would classify every object as a
//! wall.

/// Strip the `"<room_name>-"` prefix from an object key, if present
pub fn strip_room_prefix<'a>(key: &'a str, room_name: &str) -> &'a str {
    let prefix_len = room_name.len() + 1;
    if key.len() > prefix_len
        && key.starts_with(room_name)
        && key.as_bytes()[room_name.len()] == b'-'
    {
        &key[prefix_len..]
    } else {
        key
    }
}

/// Floors carry "room" in their stripped key (case-insensitive)
pub fn is_floor_key(key: &str, room_name: &str) -> bool {
    strip_room_prefix(key, room_name)
        .to_lowercase()
        .contains("room")
}

/// Walls carry "wall" in their stripped key (case-insensitive)
pub fn is_wall_key(key: &str, room_name: &str) -> bool {
    strip_room_prefix(key, room_name)
        .to_lowercase()
        .contains("wall")
}

/// True for keys the floor pass produced: `_scaled` plus "floor" or "room".
/// This is how later passes locate a scaled-floor anchor in the new scene.
pub fn is_scaled_floor_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    lower.contains("_scaled") && (lower.contains("floor") || lower.contains("room"))
}

/// Base key of a `_scaled`-derived key (`"A_scaled_2"` → `"A"`)
pub fn scaled_base_key(key: &str) -> &str {
    match key.find("_scaled") {
        Some(idx) => &key[..idx],
        None => key,
    }
}
