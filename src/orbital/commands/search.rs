//! Search across collections, saved links and open tabs.
//!
//! Search is a pure function of the query, the library and the open-tab pool,
//! so results can never go stale: callers simply search again after a
//! mutation. Matching is a case-insensitive substring test on:
//!
//! - collections: name
//! - links: title or url
//! - open tabs: title or url
//!
//! Results are grouped by kind, collections first, then links, then open
//! tabs, each group in sequence order. A blank query is not "no results": it
//! yields [`SearchOutcome::Prompt`] so a front end can show its empty state.

use crate::error::{EntityKind, OrbitalError, Result};
use crate::library::Library;
use crate::model::OpenTab;
use crate::store::StorageBackend;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitKind {
    Collection,
    Link,
    OpenTab,
}

impl fmt::Display for HitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HitKind::Collection => "collection",
            HitKind::Link => "link",
            HitKind::OpenTab => "open tab",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub kind: HitKind,
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub favicon: Option<String>,
    /// Owning collection of a link hit; the collection itself for a collection hit.
    pub collection_id: Option<String>,
    pub url: Option<String>,
}

/// Narrows a result list by kind. `Tabs` means saved links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchFilter {
    #[default]
    All,
    Tabs,
    Collections,
    OpenTabs,
}

impl SearchFilter {
    pub const ALL: [SearchFilter; 4] = [
        SearchFilter::All,
        SearchFilter::Tabs,
        SearchFilter::Collections,
        SearchFilter::OpenTabs,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SearchFilter::All => "ALL",
            SearchFilter::Tabs => "TABS",
            SearchFilter::Collections => "COLLECTIONS",
            SearchFilter::OpenTabs => "OPEN TABS",
        }
    }

    pub fn admits(&self, kind: HitKind) -> bool {
        match self {
            SearchFilter::All => true,
            SearchFilter::Tabs => kind == HitKind::Link,
            SearchFilter::Collections => kind == HitKind::Collection,
            SearchFilter::OpenTabs => kind == HitKind::OpenTab,
        }
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SearchFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ").to_uppercase();
        match wanted.as_str() {
            "ALL" => Ok(SearchFilter::All),
            "TABS" | "LINKS" => Ok(SearchFilter::Tabs),
            "COLLECTIONS" => Ok(SearchFilter::Collections),
            "OPEN TABS" | "OPENTABS" => Ok(SearchFilter::OpenTabs),
            _ => Err(format!(
                "unknown filter '{}' (expected ALL, TABS, COLLECTIONS or OPEN TABS)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was blank.
    Prompt,
    Results(Vec<SearchHit>),
}

impl SearchOutcome {
    /// All hits, or none for a blank query.
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            SearchOutcome::Prompt => &[],
            SearchOutcome::Results(hits) => hits,
        }
    }

    /// Applies a filter, keeping the prompt state as is.
    pub fn filter(self, filter: SearchFilter) -> SearchOutcome {
        match self {
            SearchOutcome::Prompt => SearchOutcome::Prompt,
            SearchOutcome::Results(hits) => SearchOutcome::Results(
                hits.into_iter().filter(|h| filter.admits(h.kind)).collect(),
            ),
        }
    }

    pub fn is_prompt(&self) -> bool {
        matches!(self, SearchOutcome::Prompt)
    }
}

pub fn search<B: StorageBackend>(
    library: &Library<B>,
    open_tabs: &[OpenTab],
    query: &str,
) -> SearchOutcome {
    if query.trim().is_empty() {
        return SearchOutcome::Prompt;
    }
    let needle = query.to_lowercase();
    let matches = |text: &str| text.to_lowercase().contains(&needle);

    let collections = library
        .collections()
        .iter()
        .filter(|c| matches(&c.name))
        .map(|c| SearchHit {
            kind: HitKind::Collection,
            id: c.id.clone(),
            title: c.name.clone(),
            subtitle: format!(
                "Collection with {} tabs",
                library.collection_link_count(&c.id)
            ),
            favicon: None,
            collection_id: Some(c.id.clone()),
            url: None,
        });

    let links = library
        .links()
        .iter()
        .filter(|l| matches(&l.title) || matches(&l.url))
        .map(|l| SearchHit {
            kind: HitKind::Link,
            id: l.id.clone(),
            title: l.title.clone(),
            subtitle: l.url.clone(),
            favicon: Some(l.favicon.clone()),
            collection_id: Some(l.collection_id.clone()),
            url: Some(l.url.clone()),
        });

    let tabs = open_tabs
        .iter()
        .filter(|t| matches(&t.title) || matches(&t.url))
        .map(|t| SearchHit {
            kind: HitKind::OpenTab,
            id: t.id.clone(),
            title: t.title.clone(),
            subtitle: t.url.clone(),
            favicon: Some(t.favicon.clone()),
            collection_id: None,
            url: Some(t.url.clone()),
        });

    SearchOutcome::Results(collections.chain(links).chain(tabs).collect())
}

/// What a front end should do once a hit is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Switch to `space_id`, expand `collection_id` and highlight `target_id`.
    Focus {
        space_id: String,
        collection_id: String,
        target_id: String,
    },
    /// Bring the open tab forward. Nothing in the library changes.
    Reveal { tab_id: String },
}

/// Resolves a hit against the current state. A hit whose collection or space
/// has since disappeared is a dangling reference.
pub fn resolve_selection<B: StorageBackend>(
    library: &Library<B>,
    hit: &SearchHit,
) -> Result<Selection> {
    let collection_id = match hit.kind {
        HitKind::OpenTab => {
            return Ok(Selection::Reveal {
                tab_id: hit.id.clone(),
            })
        }
        HitKind::Collection => hit.id.clone(),
        HitKind::Link => library
            .link(&hit.id)
            .map(|l| l.collection_id.clone())
            .ok_or_else(|| OrbitalError::dangling(EntityKind::Link, &hit.id))?,
    };
    let collection = library
        .collection(&collection_id)
        .ok_or_else(|| OrbitalError::dangling(EntityKind::Collection, &collection_id))?;
    let space = library
        .space(&collection.space_id)
        .ok_or_else(|| OrbitalError::dangling(EntityKind::Space, &collection.space_id))?;

    Ok(Selection::Focus {
        space_id: space.id.clone(),
        collection_id: collection.id.clone(),
        target_id: hit.id.clone(),
    })
}

/// Keyboard selection over a result list. Moving past either end wraps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultCursor {
    index: usize,
    len: usize,
}

impl ResultCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    /// Call whenever the result list changes.
    pub fn reset(&mut self, len: usize) {
        self.index = 0;
        self.len = len;
    }

    pub fn index(&self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }

    pub fn next(&mut self) -> Option<usize> {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.index()
    }

    pub fn prev(&mut self) -> Option<usize> {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
        self.index()
    }
}
