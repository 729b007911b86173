//! Core data types: [`Space`], [`Collection`], [`Link`] and the externally
//! sourced [`OpenTab`].
//!
//! The serialized shape uses camelCase keys and millisecond timestamps so that
//! stored sequences and backups stay readable by the browser extension that
//! shares the same storage keys.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Icon used for spaces created without an explicit icon.
pub const DEFAULT_SPACE_ICON: &str = "Folder";

/// Name used for spaces created with a blank name.
pub const DEFAULT_SPACE_NAME: &str = "New Space";

/// Icon names offered when creating or editing a space.
pub const AVAILABLE_ICONS: &[&str] = &[
    "Folder", "Home", "User", "Users", "Code", "Terminal", "Database", "Server", "Chip", "Star",
    "Heart", "Briefcase", "Calendar", "Clock", "Cloud", "Zap", "Globe", "Book", "Academic",
    "Image", "Video", "Music", "Pen", "Palette", "Chat", "Mail", "Link", "Gift", "Cart", "Shield",
    "Settings",
];

const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons?domain=";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_default: bool,
}

impl Space {
    pub fn new(name: &str, icon: &str) -> Self {
        let name = name.trim();
        let icon = icon.trim();
        Self {
            id: new_id("space"),
            name: if name.is_empty() {
                DEFAULT_SPACE_NAME.to_string()
            } else {
                name.to_string()
            },
            icon: if icon.is_empty() {
                DEFAULT_SPACE_ICON.to_string()
            } else {
                icon.to_string()
            },
            is_default: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub space_id: String,
    pub name: String,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Collection {
    pub fn new(space_id: &str, name: String) -> Self {
        Self {
            id: new_id("col"),
            space_id: space_id.to_string(),
            name,
            is_starred: false,
            created_at: now_millis(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub collection_id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub favicon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Builds a link from user input: the url is normalized and the favicon
    /// derived from its host.
    pub fn new(collection_id: &str, title: &str, url: &str, comment: Option<String>) -> Self {
        let url = normalize_url(url);
        Self {
            id: new_id("link"),
            collection_id: collection_id.to_string(),
            title: title.to_string(),
            favicon: favicon_for(&url),
            url,
            comment: comment.filter(|c| !c.is_empty()),
            created_at: now_millis(),
        }
    }

    /// Builds a link from an open tab, keeping the tab's url and favicon as-is.
    pub fn from_tab(collection_id: &str, tab: &OpenTab) -> Self {
        Self {
            id: new_id("link"),
            collection_id: collection_id.to_string(),
            title: tab.title.clone(),
            url: tab.url.clone(),
            favicon: tab.favicon.clone(),
            comment: None,
            created_at: now_millis(),
        }
    }
}

/// A browser tab that is currently open. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTab {
    pub id: String,
    pub window_id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub favicon: String,
}

/// Partial update of a link. `None` leaves the field untouched; an empty
/// comment clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkUpdate {
    pub title: Option<String>,
    pub url: Option<String>,
    pub comment: Option<String>,
}

impl LinkUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.comment.is_none()
    }
}

/// Partial update of a space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpaceUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
}

/// Generates a fresh id of the form `<prefix>-<uuid>`.
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Current time truncated to the millisecond precision used on disk, so that a
/// freshly created entity compares equal to itself after a save/load cycle.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Prefixes `https://` when the input carries no scheme.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Favicon reference for a url, derived from its host only.
pub fn favicon_for(url: &str) -> String {
    let domain = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string());
    format!("{}{}", FAVICON_SERVICE, domain)
}

/// Spaces seeded on first run.
pub fn default_spaces() -> Vec<Space> {
    let seed = |id: &str, name: &str, icon: &str, is_default: bool| Space {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        is_default,
    };
    vec![
        seed("space-home", "Working Space", "Home", true),
        seed("space-personal", "Personal", "User", false),
        seed("space-research", "Research & Dev", "Code", false),
        seed("space-peng", "Peng Link", "Link", false),
    ]
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_prefixes_missing_scheme() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("  example.com/a "), "https://example.com/a");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("chrome://settings"), "chrome://settings");
    }

    #[test]
    fn favicon_uses_domain_only() {
        assert_eq!(
            favicon_for("https://example.com/some/page?q=1"),
            "https://www.google.com/s2/favicons?domain=example.com"
        );
    }

    #[test]
    fn new_link_normalizes_url_and_derives_favicon() {
        let link = Link::new("col-1", "Example", "example.com", None);
        assert_eq!(link.url, "https://example.com");
        assert_eq!(
            link.favicon,
            "https://www.google.com/s2/favicons?domain=example.com"
        );
        assert!(link.id.starts_with("link-"));
    }

    #[test]
    fn blank_space_fields_get_defaults() {
        let space = Space::new("  ", "");
        assert_eq!(space.name, DEFAULT_SPACE_NAME);
        assert_eq!(space.icon, DEFAULT_SPACE_ICON);
        assert!(!space.is_default);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(new_id("col"), new_id("col"));
    }

    #[test]
    fn collection_serializes_with_millisecond_timestamp() {
        let col = Collection::new("space-home", "Reading".into());
        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json["spaceId"], "space-home");
        assert_eq!(json["isStarred"], false);
        assert_eq!(json["timestamp"], col.created_at.timestamp_millis());

        let back: Collection = serde_json::from_value(json).unwrap();
        assert_eq!(back, col);
    }

    #[test]
    fn link_without_comment_omits_field() {
        let link = Link::new("col-1", "A", "a.com", Some(String::new()));
        assert_eq!(link.comment, None);
        let json = serde_json::to_value(&link).unwrap();
        assert!(json.get("comment").is_none());
    }

    #[test]
    fn reads_extension_space_shape() {
        let raw = r#"{"id":"space-home","name":"Working Space","isDefault":true,"icon":"M3 12"}"#;
        let space: Space = serde_json::from_str(raw).unwrap();
        assert!(space.is_default);
        assert_eq!(space.icon, "M3 12");
    }
}
