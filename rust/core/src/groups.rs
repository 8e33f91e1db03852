// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall-group and asset-group list documents.
//!
//! Asset group lists come from the grouping service and are untrusted:
//! individual malformed records are dropped on load, only a document that is
//! not a JSON array at the top level is a hard failure.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One wall group: a representative "true wall" plus the wall parts
/// (windows, trim, panels) spatially attached to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WallGroup {
    pub wall_asset: String,
    pub wall_type: String,
    #[serde(default)]
    pub assets: Vec<String>,
}

/// A furniture group proposed by the grouping service. Cloneable groups are
/// tiled to fill added floor space; the rest are placed once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetGroup {
    pub id: i64,
    pub group_name: String,
    pub assets: Vec<String>,
    #[serde(rename = "Cloneable")]
    pub cloneable: bool,
}

pub fn load_wall_list(path: &Path) -> Result<Vec<WallGroup>> {
    let text = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| Error::Document {
        path: path.display().to_string(),
        source,
    })
}

pub fn save_wall_list(path: &Path, groups: &[WallGroup]) -> Result<()> {
    let text = serde_json::to_string_pretty(groups)?;
    fs::write(path, text).map_err(|source| Error::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Validate an already-parsed asset group list. Records missing a required
/// key or carrying a wrong type are rejected individually; the second return
/// value counts rejections.
pub fn validate_asset_groups(value: serde_json::Value) -> (Vec<AssetGroup>, usize) {
    let records = match value {
        serde_json::Value::Array(records) => records,
        _ => return (Vec::new(), 1),
    };
    let mut groups = Vec::with_capacity(records.len());
    let mut rejected = 0;
    for record in records {
        match serde_json::from_value::<AssetGroup>(record) {
            Ok(group) => groups.push(group),
            Err(_) => rejected += 1,
        }
    }
    (groups, rejected)
}

/// Load an asset group list, dropping malformed records. A document that is
/// not a JSON array at all is a structural failure.
pub fn load_asset_groups(path: &Path) -> Result<(Vec<AssetGroup>, usize)> {
    let text = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.display().to_string(),
        source,
    })?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|source| Error::Document {
            path: path.display().to_string(),
            source,
        })?;
    if !value.is_array() {
        return Err(Error::Document {
            path: path.display().to_string(),
            source: serde::de::Error::custom("asset group list must be a JSON array"),
        });
    }
    Ok(validate_asset_groups(value))
}

pub fn save_asset_groups(path: &Path, groups: &[AssetGroup]) -> Result<()> {
    let text = serde_json::to_string_pretty(groups)?;
    fs::write(path, text).map_err(|source| Error::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_groups_survive_validation() {
        let value = json!([
            { "id": 1, "group_name": "Dining Set", "assets": ["t", "c1"], "Cloneable": true },
            { "id": 2, "group_name": "Lounge", "assets": [], "Cloneable": false }
        ]);
        let (groups, rejected) = validate_asset_groups(value);
        assert_eq!(groups.len(), 2);
        assert_eq!(rejected, 0);
        assert!(groups[0].cloneable);
        assert_eq!(groups[1].group_name, "Lounge");
    }

    #[test]
    fn malformed_records_are_dropped_without_aborting() {
        let value = json!([
            { "id": 1, "group_name": "Dining Set", "assets": ["t"], "Cloneable": true },
            { "id": 2, "group_name": "No cloneable flag", "assets": [] },
            { "id": 3, "group_name": "Wrong type", "assets": "t", "Cloneable": true },
            { "id": "4", "group_name": "Wrong id type", "assets": [], "Cloneable": false },
            "not even an object"
        ]);
        let (groups, rejected) = validate_asset_groups(value);
        assert_eq!(groups.len(), 1);
        assert_eq!(rejected, 4);
        assert_eq!(groups[0].id, 1);
    }

    #[test]
    fn cloneable_uses_the_capitalized_wire_key() {
        let group = AssetGroup {
            id: 7,
            group_name: "Dining Set".into(),
            assets: vec!["a".into()],
            cloneable: true,
        };
        let text = serde_json::to_string(&group).unwrap();
        assert!(text.contains("\"Cloneable\":true"));
    }
}
