//! Open-tab enumeration.
//!
//! Open tabs come from outside the library (a browser, a fixture file) and are
//! never persisted. A [`TabSource`] is read once into a [`TabPool`]; saving a
//! tab into a collection takes it out of the pool.

use crate::error::{OrbitalError, Result};
use crate::model::OpenTab;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub trait TabSource {
    fn open_tabs(&self) -> Result<Vec<OpenTab>>;
}

/// A fixed set of tabs across two windows, used when no real source is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockTabSource;

impl TabSource for MockTabSource {
    fn open_tabs(&self) -> Result<Vec<OpenTab>> {
        let tab = |id: &str, window_id: i64, title: &str, url: &str, favicon: &str| OpenTab {
            id: id.to_string(),
            window_id,
            title: title.to_string(),
            url: url.to_string(),
            favicon: favicon.to_string(),
        };
        Ok(vec![
            tab(
                "tab-1",
                1,
                "Orbital Tab Manager",
                "https://orbital.app",
                "https://react.dev/favicon.ico",
            ),
            tab(
                "tab-2",
                1,
                "toby - Google Search",
                "https://google.com/search?q=toby",
                "https://google.com/favicon.ico",
            ),
            tab(
                "tab-3",
                1,
                "Toby - The Best Tab Manager",
                "https://gettoby.com",
                "https://gettoby.com/favicon.ico",
            ),
            tab(
                "tab-4",
                2,
                "剑来 第二季 - 腾讯视频",
                "https://v.qq.com/x/cover/...",
                "https://v.qq.com/favicon.ico",
            ),
            tab(
                "tab-5",
                2,
                "剑来 第二季_腾讯视频",
                "https://v.qq.com/x/page/...",
                "https://v.qq.com/favicon.ico",
            ),
        ])
    }
}

/// Reads a JSON array of `{id, windowId, title, url, favicon}` objects.
#[derive(Debug, Clone)]
pub struct JsonTabSource {
    path: PathBuf,
}

impl JsonTabSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TabSource for JsonTabSource {
    fn open_tabs(&self) -> Result<Vec<OpenTab>> {
        let raw = fs::read_to_string(&self.path).map_err(OrbitalError::Io)?;
        let tabs: Vec<OpenTab> = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), count = tabs.len(), "open tabs read");
        Ok(tabs)
    }
}

/// Snapshot of the open tabs, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabPool {
    tabs: Vec<OpenTab>,
}

impl TabPool {
    pub fn new(tabs: Vec<OpenTab>) -> Self {
        Self { tabs }
    }

    pub fn from_source<S: TabSource + ?Sized>(source: &S) -> Result<Self> {
        source.open_tabs().map(Self::new)
    }

    pub fn tabs(&self) -> &[OpenTab] {
        &self.tabs
    }

    pub fn get(&self, id: &str) -> Option<&OpenTab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// Remove a tab from the pool, returning it.
    pub fn take(&mut self, id: &str) -> Option<OpenTab> {
        let index = self.tabs.iter().position(|t| t.id == id)?;
        Some(self.tabs.remove(index))
    }

    /// Remove every tab of a window, returning them in pool order.
    pub fn take_window(&mut self, window_id: i64) -> Vec<OpenTab> {
        let (taken, kept) = std::mem::take(&mut self.tabs)
            .into_iter()
            .partition(|t| t.window_id == window_id);
        self.tabs = kept;
        taken
    }

    /// Tabs grouped by window, windows in ascending id order.
    pub fn by_window(&self) -> BTreeMap<i64, Vec<&OpenTab>> {
        let mut windows: BTreeMap<i64, Vec<&OpenTab>> = BTreeMap::new();
        for tab in &self.tabs {
            windows.entry(tab.window_id).or_default().push(tab);
        }
        windows
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn mock_pool() -> TabPool {
        TabPool::from_source(&MockTabSource).unwrap()
    }

    #[test]
    fn mock_source_spans_two_windows() {
        let pool = mock_pool();
        assert_eq!(pool.len(), 5);
        let windows = pool.by_window();
        assert_eq!(windows.keys().copied().collect::<Vec<_>>(), [1, 2]);
        assert_eq!(windows[&1].len(), 3);
        assert_eq!(windows[&2][0].id, "tab-4");
    }

    #[test]
    fn take_removes_once() {
        let mut pool = mock_pool();
        assert_eq!(pool.take("tab-2").unwrap().title, "toby - Google Search");
        assert!(pool.take("tab-2").is_none());
        assert!(pool.get("tab-2").is_none());
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn take_window_keeps_other_windows() {
        let mut pool = mock_pool();
        let taken = pool.take_window(2);
        assert_eq!(
            taken.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            ["tab-4", "tab-5"]
        );
        assert_eq!(pool.len(), 3);
        assert!(pool.take_window(2).is_empty());
    }

    #[test]
    fn json_source_reads_camel_case() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tabs.json");
        fs::write(
            &path,
            r#"[{"id":"t1","windowId":7,"title":"Docs","url":"https://docs.rs"}]"#,
        )
        .unwrap();

        let pool = TabPool::from_source(&JsonTabSource::new(&path)).unwrap();
        let tab = pool.get("t1").unwrap();
        assert_eq!(tab.window_id, 7);
        assert_eq!(tab.favicon, "");
    }

    #[test]
    fn json_source_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let source = JsonTabSource::new(dir.path().join("absent.json"));
        assert!(matches!(source.open_tabs(), Err(OrbitalError::Io(_))));
    }
}
