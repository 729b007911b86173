//! Drag and drop.
//!
//! [`DragEngine`] turns the pointer events of a drag into library mutations.
//! Reordering is live: every `hover_enter` over a compatible target mutates
//! the library immediately, so the sequence already reflects the final layout
//! when the pointer is released. Only an open-tab drag does its work on drop.
//!
//! | dragging   | over a collection      | over a link            |
//! |------------|------------------------|------------------------|
//! | collection | `reorder_collections`  | -                      |
//! | link       | `reparent_link`        | `reorder_links`        |
//! | open tab   | -                      | -                      |
//!
//! Whatever is dragged, the engine remembers which collection is under the
//! pointer (a link target counts as its owning collection). An open tab is
//! dropped into that collection.
//!
//! Callers report the innermost target only: entering a link row is one
//! `Link` event, never an extra `Collection` event for the row's parent.

use crate::commands::{reorder, tabs};
use crate::error::Result;
use crate::library::Library;
use crate::model::Link;
use crate::store::StorageBackend;
use crate::tabs::TabPool;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Collection,
    Link,
    OpenTab,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    DraggingCollection(String),
    DraggingLink(String),
    DraggingOpenTab(String),
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Collection(String),
    Link(String),
}

#[derive(Debug, Default)]
pub struct DragEngine {
    state: DragState,
    hovered_collection: Option<String>,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn hovered_collection(&self) -> Option<&str> {
        self.hovered_collection.as_deref()
    }

    /// Begin a drag. A drag already in progress is abandoned.
    pub fn start(&mut self, kind: DragKind, id: impl Into<String>) {
        let id = id.into();
        if !self.state.is_idle() {
            debug!(previous = ?self.state, "drag restarted");
        }
        self.state = match kind {
            DragKind::Collection => DragState::DraggingCollection(id),
            DragKind::Link => DragState::DraggingLink(id),
            DragKind::OpenTab => DragState::DraggingOpenTab(id),
        };
        self.hovered_collection = None;
    }

    /// The pointer entered `target`. Returns whether the library changed.
    pub fn hover_enter<B: StorageBackend>(
        &mut self,
        library: &mut Library<B>,
        target: &DropTarget,
    ) -> bool {
        if self.state.is_idle() {
            return false;
        }
        let owner = match target {
            DropTarget::Collection(id) => library.collection(id).map(|c| c.id.clone()),
            DropTarget::Link(id) => library.link(id).map(|l| l.collection_id.clone()),
        };
        if owner.is_some() {
            self.hovered_collection = owner;
        }

        match (&self.state, target) {
            (DragState::DraggingCollection(dragged), DropTarget::Collection(over)) => {
                reorder::reorder_collections(library, dragged, over)
            }
            (DragState::DraggingLink(dragged), DropTarget::Link(over)) => {
                reorder::reorder_links(library, dragged, over)
            }
            (DragState::DraggingLink(dragged), DropTarget::Collection(over)) => {
                reorder::reparent_link(library, dragged, over)
            }
            _ => false,
        }
    }

    /// Release the pointer. An open tab is saved into the hovered collection;
    /// every other drag already did its work while hovering. The engine is
    /// idle afterwards, whatever the outcome.
    pub fn drop<B: StorageBackend>(
        &mut self,
        library: &mut Library<B>,
        pool: &mut TabPool,
    ) -> Result<Option<Link>> {
        let outcome = match (&self.state, &self.hovered_collection) {
            (DragState::DraggingOpenTab(tab_id), Some(collection_id)) => {
                tabs::add_tab_to_collection(library, pool, tab_id, collection_id).map(Some)
            }
            _ => Ok(None),
        };
        self.end();
        outcome
    }

    /// Abandon the drag.
    pub fn end(&mut self) {
        self.state = DragState::Idle;
        self.hovered_collection = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{collections, links};
    use crate::store::memory::MemBackend;
    use crate::tabs::MockTabSource;

    fn library() -> Library<MemBackend> {
        Library::load(MemBackend::new()).unwrap()
    }

    #[test]
    fn start_replaces_previous_drag() {
        let mut engine = DragEngine::new();
        engine.start(DragKind::Link, "link-1");
        engine.start(DragKind::Collection, "col-1");
        assert_eq!(
            engine.state(),
            &DragState::DraggingCollection("col-1".into())
        );
    }

    #[test]
    fn hovering_collection_over_collection_reorders_live() {
        let mut lib = library();
        let b = collections::create(&mut lib, "space-home", Some("b")).unwrap();
        let a = collections::create(&mut lib, "space-home", Some("a")).unwrap();
        let mut engine = DragEngine::new();

        engine.start(DragKind::Collection, &a.id);
        assert!(engine.hover_enter(&mut lib, &DropTarget::Collection(b.id.clone())));
        assert_eq!(lib.collections()[0].id, b.id);
        assert_eq!(engine.hovered_collection(), Some(b.id.as_str()));

        // entering the dragged collection itself does nothing
        assert!(!engine.hover_enter(&mut lib, &DropTarget::Collection(a.id.clone())));
        engine.end();
        assert!(engine.state().is_idle());
        assert_eq!(engine.hovered_collection(), None);
    }

    #[test]
    fn link_over_link_of_other_collection_reparents_once() {
        let mut lib = library();
        let c1 = collections::create(&mut lib, "space-home", Some("C1")).unwrap();
        let c2 = collections::create(&mut lib, "space-home", Some("C2")).unwrap();
        let l1 = links::create(&mut lib, &c1.id, "one", "one.com", None).unwrap();
        let l2 = links::create(&mut lib, &c2.id, "two", "two.com", None).unwrap();
        let mut engine = DragEngine::new();

        engine.start(DragKind::Link, &l1.id);
        let writes = lib.backend().write_count();
        assert!(engine.hover_enter(&mut lib, &DropTarget::Link(l2.id.clone())));
        assert_eq!(lib.backend().write_count(), writes + 1);
        assert_eq!(engine.hovered_collection(), Some(c2.id.as_str()));

        assert_eq!(lib.link(&l1.id).unwrap().collection_id, c2.id);
        assert_eq!(lib.collection_link_count(&c1.id), 0);
        assert_eq!(lib.links().len(), 2);
    }

    #[test]
    fn link_over_collection_header_reparents() {
        let mut lib = library();
        let c1 = collections::create(&mut lib, "space-home", Some("C1")).unwrap();
        let c2 = collections::create(&mut lib, "space-home", Some("C2")).unwrap();
        let l1 = links::create(&mut lib, &c1.id, "one", "one.com", None).unwrap();
        let mut engine = DragEngine::new();

        engine.start(DragKind::Link, &l1.id);
        assert!(engine.hover_enter(&mut lib, &DropTarget::Collection(c2.id.clone())));
        assert_eq!(lib.link(&l1.id).unwrap().collection_id, c2.id);
        // already there
        assert!(!engine.hover_enter(&mut lib, &DropTarget::Collection(c2.id.clone())));
    }

    #[test]
    fn idle_hover_is_ignored() {
        let mut lib = library();
        let c1 = collections::create(&mut lib, "space-home", Some("C1")).unwrap();
        let mut engine = DragEngine::new();
        assert!(!engine.hover_enter(&mut lib, &DropTarget::Collection(c1.id.clone())));
        assert_eq!(engine.hovered_collection(), None);
    }

    #[test]
    fn open_tab_drop_consumes_tab() {
        let mut lib = library();
        let mut pool = TabPool::from_source(&MockTabSource).unwrap();
        let col = collections::create(&mut lib, "space-home", Some("Inbox")).unwrap();
        let mut engine = DragEngine::new();

        engine.start(DragKind::OpenTab, "tab-1");
        assert!(!engine.hover_enter(&mut lib, &DropTarget::Collection(col.id.clone())));
        let link = engine.drop(&mut lib, &mut pool).unwrap().unwrap();

        assert_eq!(link.collection_id, col.id);
        assert_eq!(link.title, "Orbital Tab Manager");
        assert!(pool.get("tab-1").is_none());
        assert!(engine.state().is_idle());
    }

    #[test]
    fn drop_without_target_does_nothing() {
        let mut lib = library();
        let mut pool = TabPool::from_source(&MockTabSource).unwrap();
        let mut engine = DragEngine::new();

        engine.start(DragKind::OpenTab, "tab-1");
        assert_eq!(engine.drop(&mut lib, &mut pool).unwrap(), None);
        assert_eq!(pool.len(), 5);
        assert!(engine.state().is_idle());
    }
}
