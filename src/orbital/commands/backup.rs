//! Whole-library backup and restore.
//!
//! A backup is a single JSON document:
//!
//! ```json
//! { "version": "1.0", "timestamp": 1710400000000,
//!   "data": { "spaces": [...], "collections": [...], "links": [...] } }
//! ```
//!
//! Restoring replaces all three sequences wholesale. The document is fully
//! validated before anything is touched: a rejected import leaves the library
//! exactly as it was.

use crate::error::{OrbitalError, Result};
use crate::library::Library;
use crate::model::{default_spaces, now_millis, Collection, Link, Space};
use crate::store::StorageBackend;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::info;

pub const BACKUP_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backup {
    pub version: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub data: BackupData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupData {
    pub spaces: Vec<Space>,
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub spaces: usize,
    pub collections: usize,
    pub links: usize,
    /// The backup carried no spaces and the defaults were seeded instead.
    pub reseeded: bool,
}

pub fn export_backup<B: StorageBackend>(library: &Library<B>) -> Backup {
    Backup {
        version: BACKUP_VERSION.to_string(),
        timestamp: now_millis(),
        data: BackupData {
            spaces: library.spaces().to_vec(),
            collections: library.collections().to_vec(),
            links: library.links().to_vec(),
        },
    }
}

impl Backup {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(OrbitalError::Serialization)
    }
}

/// `orbital_backup_YYYY-MM-DD.json`
pub fn backup_filename(date: NaiveDate) -> String {
    format!("orbital_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Validate `json` as a backup and replace the library contents with it.
pub fn import_backup<B: StorageBackend>(
    library: &mut Library<B>,
    json: &str,
) -> Result<ImportSummary> {
    let data = parse(json)?;
    validate(&data)?;

    let BackupData {
        mut spaces,
        collections,
        links,
    } = data;
    let reseeded = spaces.is_empty();
    if reseeded {
        spaces = default_spaces();
    }

    let summary = ImportSummary {
        spaces: spaces.len(),
        collections: collections.len(),
        links: links.len(),
        reseeded,
    };
    library.set_all(spaces, collections, links);
    info!(
        spaces = summary.spaces,
        collections = summary.collections,
        links = summary.links,
        "backup imported"
    );
    Ok(summary)
}

fn parse(json: &str) -> Result<BackupData> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| OrbitalError::InvalidBackupFormat(format!("not valid JSON: {}", e)))?;
    let data = value
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| OrbitalError::InvalidBackupFormat("missing `data` object".into()))?;
    if data.get("spaces").map_or(true, Value::is_null) {
        return Err(OrbitalError::InvalidBackupFormat(
            "missing `data.spaces`".into(),
        ));
    }
    BackupData::deserialize(data).map_err(|e| OrbitalError::InvalidBackupFormat(e.to_string()))
}

fn validate(data: &BackupData) -> Result<()> {
    let space_ids = unique_ids("space", data.spaces.iter().map(|s| s.id.as_str()))?;
    let collection_ids = unique_ids("collection", data.collections.iter().map(|c| c.id.as_str()))?;
    unique_ids("link", data.links.iter().map(|l| l.id.as_str()))?;

    if let Some(c) = data
        .collections
        .iter()
        .find(|c| !space_ids.contains(c.space_id.as_str()))
    {
        return Err(OrbitalError::InvalidBackupFormat(format!(
            "collection {} references unknown space {}",
            c.id, c.space_id
        )));
    }
    if let Some(l) = data
        .links
        .iter()
        .find(|l| !collection_ids.contains(l.collection_id.as_str()))
    {
        return Err(OrbitalError::InvalidBackupFormat(format!(
            "link {} references unknown collection {}",
            l.id, l.collection_id
        )));
    }
    Ok(())
}

fn unique_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<HashSet<&'a str>> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(OrbitalError::InvalidBackupFormat(format!(
                "duplicate {} id {}",
                kind, id
            )));
        }
    }
    Ok(seen)
}
