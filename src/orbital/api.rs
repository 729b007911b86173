//! # API Facade
//!
//! [`OrbitalApi`] is the single entry point for every orbital operation,
//! whatever the front end. It owns the [`Library`], the [`Session`] view state,
//! the [`DragEngine`] and the open-tab [`TabPool`], and keeps them consistent
//! with one another:
//!
//! - creating a space activates it, deleting the active space activates the
//!   first remaining one;
//! - new collections start expanded, deleted ones are forgotten by the session;
//! - selecting a search hit switches space, expands and highlights;
//! - importing a backup resets the session onto the first space.
//!
//! Business rules stay in `commands/*.rs`. The facade does no I/O of its own
//! beyond what the storage backend does, and never prints.
//!
//! `OrbitalApi<B: StorageBackend>` is generic over the backend:
//! - Production: `OrbitalApi<FsBackend>`
//! - Testing: `OrbitalApi<MemBackend>`

use crate::commands::backup::{self, Backup, ImportSummary};
use crate::commands::collections::{self, CollectionRemoval};
use crate::commands::export::{self, CsvExport};
use crate::commands::search::{self, SearchFilter, SearchHit, SearchOutcome, Selection};
use crate::commands::spaces::{self, SpaceRemoval};
use crate::commands::{links, reorder, tabs};
use crate::config::OrbitalConfig;
use crate::drag::{DragEngine, DragKind, DragState, DropTarget};
use crate::error::{EntityKind, OrbitalError, Result};
use crate::library::Library;
use crate::model::{Collection, Link, LinkUpdate, OpenTab, Space, SpaceUpdate};
use crate::session::{Highlight, Session};
use crate::store::StorageBackend;
use crate::tabs::TabPool;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub struct OrbitalApi<B: StorageBackend> {
    library: Library<B>,
    session: Session,
    drag: DragEngine,
    pool: TabPool,
}

impl<B: StorageBackend> OrbitalApi<B> {
    /// Load the library from `backend`, seeding it on first run. The first
    /// space starts active.
    pub fn open(backend: B, pool: TabPool, config: &OrbitalConfig) -> Result<Self> {
        let library = Library::load(backend)?;
        let session = Session::new(first_space_id(&library)).with_highlight_ms(config.highlight_ms);
        Ok(Self {
            library,
            session,
            drag: DragEngine::new(),
            pool,
        })
    }

    pub fn library(&self) -> &Library<B> {
        &self.library
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn pool(&self) -> &TabPool {
        &self.pool
    }

    // --- Spaces ---

    pub fn spaces(&self) -> &[Space] {
        self.library.spaces()
    }

    pub fn active_space(&self) -> Option<&Space> {
        self.library.space(self.session.active_space_id())
    }

    pub fn set_active_space(&mut self, id: &str) -> Result<()> {
        if self.library.space(id).is_none() {
            return Err(OrbitalError::dangling(EntityKind::Space, id));
        }
        self.session.set_active_space(id);
        Ok(())
    }

    /// Create a space and make it active.
    pub fn create_space(&mut self, name: &str, icon: &str) -> Space {
        let space = spaces::create(&mut self.library, name, icon);
        self.session.set_active_space(space.id.as_str());
        space
    }

    pub fn update_space(&mut self, id: &str, update: SpaceUpdate) -> Option<Space> {
        spaces::update(&mut self.library, id, update)
    }

    pub fn delete_space(&mut self, id: &str) -> Result<SpaceRemoval> {
        let removal = spaces::delete(&mut self.library, id)?;
        for collection in &removal.collections {
            self.session.forget(&collection.id);
        }
        if self.session.active_space_id() == id {
            self.session.set_active_space(first_space_id(&self.library));
        }
        Ok(removal)
    }

    // --- Collections ---

    /// Collections of the active space, in display order.
    pub fn active_collections(&self) -> Vec<&Collection> {
        self.library
            .collections_in_space(self.session.active_space_id())
            .collect()
    }

    /// Create a collection in `space_id`. It starts expanded.
    pub fn create_collection(&mut self, space_id: &str, name: Option<&str>) -> Result<Collection> {
        let collection = collections::create(&mut self.library, space_id, name)?;
        self.session.set_expanded(&collection.id, true);
        Ok(collection)
    }

    pub fn delete_collection(&mut self, id: &str) -> Result<CollectionRemoval> {
        let removal = collections::delete(&mut self.library, id)?;
        self.session.forget(id);
        Ok(removal)
    }

    pub fn rename_collection(&mut self, id: &str, name: &str) -> Option<Collection> {
        collections::rename(&mut self.library, id, name)
    }

    pub fn toggle_star(&mut self, id: &str) -> Option<Collection> {
        collections::toggle_star(&mut self.library, id)
    }

    /// Flip a collection open or closed. `None` for an unknown id.
    pub fn toggle_collection_expanded(&mut self, id: &str) -> Option<bool> {
        self.library.collection(id)?;
        Some(self.session.toggle_expanded(id))
    }

    /// Expand or collapse every collection of the active space.
    pub fn set_space_expanded(&mut self, expanded: bool) {
        let ids: Vec<String> = self
            .library
            .collections_in_space(self.session.active_space_id())
            .map(|c| c.id.clone())
            .collect();
        for id in ids {
            self.session.set_expanded(&id, expanded);
        }
    }

    // --- Links ---

    pub fn create_link(
        &mut self,
        collection_id: &str,
        title: &str,
        url: &str,
        comment: Option<String>,
    ) -> Result<Link> {
        links::create(&mut self.library, collection_id, title, url, comment)
    }

    pub fn update_link(&mut self, id: &str, update: LinkUpdate) -> Option<Link> {
        links::update(&mut self.library, id, update)
    }

    pub fn remove_link(&mut self, id: &str) -> Option<Link> {
        links::remove(&mut self.library, id)
    }

    // --- Ordering ---

    pub fn reorder_collections(&mut self, dragged_id: &str, target_id: &str) -> bool {
        reorder::reorder_collections(&mut self.library, dragged_id, target_id)
    }

    pub fn reorder_links(&mut self, dragged_id: &str, target_id: &str) -> bool {
        reorder::reorder_links(&mut self.library, dragged_id, target_id)
    }

    pub fn reparent_link(&mut self, link_id: &str, collection_id: &str) -> bool {
        reorder::reparent_link(&mut self.library, link_id, collection_id)
    }

    // --- Drag and drop ---

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn drag_start(&mut self, kind: DragKind, id: &str) {
        self.drag.start(kind, id);
    }

    pub fn drag_hover(&mut self, target: &DropTarget) -> bool {
        self.drag.hover_enter(&mut self.library, target)
    }

    pub fn drag_drop(&mut self) -> Result<Option<Link>> {
        self.drag.drop(&mut self.library, &mut self.pool)
    }

    pub fn drag_end(&mut self) {
        self.drag.end();
    }

    // --- Open tabs ---

    pub fn open_tabs(&self) -> &[OpenTab] {
        self.pool.tabs()
    }

    pub fn tabs_by_window(&self) -> BTreeMap<i64, Vec<&OpenTab>> {
        self.pool.by_window()
    }

    pub fn add_tab_to_collection(&mut self, tab_id: &str, collection_id: &str) -> Result<Link> {
        tabs::add_tab_to_collection(&mut self.library, &mut self.pool, tab_id, collection_id)
    }

    /// Save a whole window into a new collection of the active space.
    pub fn save_window_as_session(
        &mut self,
        window_id: i64,
    ) -> Result<Option<(Collection, Vec<Link>)>> {
        let saved = tabs::save_window_as_session(
            &mut self.library,
            &mut self.pool,
            self.session.active_space_id(),
            window_id,
        )?;
        if let Some((collection, _)) = &saved {
            self.session.set_expanded(&collection.id, true);
        }
        Ok(saved)
    }

    /// Save a tab into the first collection of the active space.
    pub fn quick_add_tab(&mut self, tab_id: &str) -> Result<Link> {
        let (link, created) = tabs::quick_add_tab(
            &mut self.library,
            &mut self.pool,
            self.session.active_space_id(),
            tab_id,
        )?;
        if created {
            self.session.set_expanded(&link.collection_id, true);
        }
        Ok(link)
    }

    // --- Search ---

    pub fn search(&self, query: &str, filter: SearchFilter) -> SearchOutcome {
        search::search(&self.library, self.pool.tabs(), query).filter(filter)
    }

    /// Act on a chosen hit: switch to its space, expand its collection and
    /// highlight it from `now` on.
    pub fn select(&mut self, hit: &SearchHit, now: DateTime<Utc>) -> Result<Selection> {
        let selection = search::resolve_selection(&self.library, hit)?;
        if let Selection::Focus {
            space_id,
            collection_id,
            target_id,
        } = &selection
        {
            self.session.set_active_space(space_id.as_str());
            self.session.set_expanded(collection_id, true);
            self.session.highlight(target_id.as_str(), now);
        }
        Ok(selection)
    }

    pub fn highlighted(&self, now: DateTime<Utc>) -> Option<&Highlight> {
        self.session.highlighted(now)
    }

    // --- Import / export ---

    pub fn export_collection_csv(&self, id: &str) -> Result<CsvExport> {
        export::collection_csv(&self.library, id)
    }

    pub fn export_backup(&self) -> Backup {
        backup::export_backup(&self.library)
    }

    pub fn import_backup(&mut self, json: &str) -> Result<ImportSummary> {
        let summary = backup::import_backup(&mut self.library, json)?;
        self.drag.end();
        self.session.reset(first_space_id(&self.library));
        Ok(summary)
    }

    // --- Selectors ---

    /// Find a space by id, or by a case-insensitive name that matches exactly one.
    pub fn resolve_space(&self, selector: &str) -> Result<&Space> {
        resolve(
            self.library.spaces(),
            selector,
            EntityKind::Space,
            |s| &s.id,
            |s| &s.name,
        )
    }

    pub fn resolve_collection(&self, selector: &str) -> Result<&Collection> {
        resolve(
            self.library.collections(),
            selector,
            EntityKind::Collection,
            |c| &c.id,
            |c| &c.name,
        )
    }

    pub fn resolve_link(&self, selector: &str) -> Result<&Link> {
        resolve(
            self.library.links(),
            selector,
            EntityKind::Link,
            |l| &l.id,
            |l| &l.title,
        )
    }
}

fn first_space_id<B: StorageBackend>(library: &Library<B>) -> String {
    library
        .spaces()
        .first()
        .map(|s| s.id.clone())
        .unwrap_or_default()
}

fn resolve<'a, T>(
    items: &'a [T],
    selector: &str,
    kind: EntityKind,
    id: impl Fn(&T) -> &String,
    name: impl Fn(&T) -> &String,
) -> Result<&'a T> {
    if let Some(found) = items.iter().find(|item| id(item) == selector) {
        return Ok(found);
    }
    let wanted = selector.trim().to_lowercase();
    let mut matches = items
        .iter()
        .filter(|item| name(item).to_lowercase() == wanted);
    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(found),
        (None, _) => Err(OrbitalError::dangling(kind, selector)),
        (Some(_), Some(_)) => Err(OrbitalError::InvariantViolation(format!(
            "'{}' matches more than one {}; use its id",
            selector, kind
        ))),
    }
}
