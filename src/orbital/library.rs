//! # Domain Store
//!
//! [`Library`] owns the canonical, ordered sequences of spaces, collections and
//! links. Order is carried by the `Vec`s themselves: there is no `order` field.
//! Collections of every space share one global sequence (display groups them by
//! `space_id`), and links of every collection share another.
//!
//! The library only exposes reads and whole-sequence replacement. The business
//! rules live in [`crate::commands`], which compute a new sequence and hand it
//! back through `set_*`. Every replacement is written through to the
//! [`StorageBackend`] before returning; write failures are logged and
//! swallowed.

use crate::error::{OrbitalError, Result};
use crate::model::{default_spaces, Collection, Link, Space};
use crate::store::{StorageBackend, StoreKey};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

pub struct Library<B: StorageBackend> {
    backend: B,
    spaces: Vec<Space>,
    collections: Vec<Collection>,
    links: Vec<Link>,
}

impl<B: StorageBackend> Library<B> {
    /// Load all three sequences from the backend.
    ///
    /// An empty space sequence means first run: the default spaces are seeded
    /// and written through.
    pub fn load(backend: B) -> Result<Self> {
        let spaces: Vec<Space> = read_sequence(&backend, StoreKey::Spaces)?;
        let collections = read_sequence(&backend, StoreKey::Collections)?;
        let links = read_sequence(&backend, StoreKey::Links)?;

        let mut library = Self {
            backend,
            spaces,
            collections,
            links,
        };
        if library.spaces.is_empty() {
            info!("no spaces stored, seeding defaults");
            library.set_spaces(default_spaces());
        }
        debug!(
            spaces = library.spaces.len(),
            collections = library.collections.len(),
            links = library.links.len(),
            "library loaded"
        );
        Ok(library)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    // --- Reads ---

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn space(&self, id: &str) -> Option<&Space> {
        self.spaces.iter().find(|s| s.id == id)
    }

    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == id)
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    /// Collections of a space, in global sequence order.
    pub fn collections_in_space<'a>(
        &'a self,
        space_id: &'a str,
    ) -> impl Iterator<Item = &'a Collection> + 'a {
        self.collections
            .iter()
            .filter(move |c| c.space_id == space_id)
    }

    /// Links of a collection, in global sequence order.
    pub fn links_in_collection<'a>(
        &'a self,
        collection_id: &'a str,
    ) -> impl Iterator<Item = &'a Link> + 'a {
        self.links
            .iter()
            .filter(move |l| l.collection_id == collection_id)
    }

    /// Links owned by any collection of a space.
    pub fn links_in_space(&self, space_id: &str) -> Vec<&Link> {
        self.links
            .iter()
            .filter(|l| {
                self.collection(&l.collection_id)
                    .is_some_and(|c| c.space_id == space_id)
            })
            .collect()
    }

    pub fn collection_link_count(&self, collection_id: &str) -> usize {
        self.links_in_collection(collection_id).count()
    }

    // --- Whole-sequence replacement (write-through) ---

    pub(crate) fn set_spaces(&mut self, spaces: Vec<Space>) {
        self.spaces = spaces;
        self.write_through(StoreKey::Spaces);
    }

    pub(crate) fn set_collections(&mut self, collections: Vec<Collection>) {
        self.collections = collections;
        self.write_through(StoreKey::Collections);
    }

    pub(crate) fn set_links(&mut self, links: Vec<Link>) {
        self.links = links;
        self.write_through(StoreKey::Links);
    }

    /// Replace all three sequences in memory first, then write each through.
    pub(crate) fn set_all(
        &mut self,
        spaces: Vec<Space>,
        collections: Vec<Collection>,
        links: Vec<Link>,
    ) {
        self.spaces = spaces;
        self.collections = collections;
        self.links = links;
        for key in StoreKey::ALL {
            self.write_through(key);
        }
    }

    fn write_through(&self, key: StoreKey) {
        let encoded = match key {
            StoreKey::Spaces => encode(&self.spaces),
            StoreKey::Collections => encode(&self.collections),
            StoreKey::Links => encode(&self.links),
        };
        let outcome = encoded.and_then(|bytes| self.backend.set(key, &bytes));
        if let Err(err) = outcome {
            warn!(%key, error = %err, "write-through failed, keeping in-memory state");
        }
    }
}

fn read_sequence<B: StorageBackend, T: DeserializeOwned>(
    backend: &B,
    key: StoreKey,
) -> Result<Vec<T>> {
    match backend.get(key)? {
        Some(bytes) => serde_json::from_slice(&bytes).map_err(OrbitalError::Serialization),
        None => Ok(Vec::new()),
    }
}

fn encode<T: Serialize>(items: &[T]) -> Result<Vec<u8>> {
    serde_json::to_vec(items).map_err(OrbitalError::Serialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemBackend;

    #[test]
    fn first_load_seeds_default_spaces_and_writes_them() {
        let library = Library::load(MemBackend::new()).unwrap();
        assert_eq!(library.spaces().len(), 4);
        assert_eq!(library.spaces()[0].id, "space-home");
        assert!(library.spaces()[0].is_default);

        let stored: Vec<Space> = library.backend().decode(StoreKey::Spaces).unwrap();
        assert_eq!(stored, library.spaces());
    }

    #[test]
    fn stored_spaces_are_not_reseeded() {
        let backend = MemBackend::new().with_value(
            StoreKey::Spaces,
            r#"[{"id":"s1","name":"Only","icon":"Folder"}]"#,
        );
        let library = Library::load(backend).unwrap();
        assert_eq!(library.spaces().len(), 1);
        assert_eq!(library.backend().write_count(), 0);
    }

    #[test]
    fn corrupt_sequence_fails_to_load() {
        let backend = MemBackend::new().with_value(StoreKey::Links, "not json");
        assert!(matches!(
            Library::load(backend),
            Err(OrbitalError::Serialization(_))
        ));
    }

    #[test]
    fn failed_write_keeps_in_memory_state() {
        let mut library = Library::load(MemBackend::new()).unwrap();
        library.backend().set_simulate_write_error(true);

        let mut spaces = library.spaces().to_vec();
        spaces.push(Space::new("Later", ""));
        library.set_spaces(spaces);

        assert_eq!(library.spaces().len(), 5);
        let stored: Vec<Space> = library.backend().decode(StoreKey::Spaces).unwrap();
        assert_eq!(stored.len(), 4);
    }

    #[test]
    fn grouping_views_filter_by_owner() {
        let mut library = Library::load(MemBackend::new()).unwrap();
        let a = Collection::new("space-home", "A".into());
        let b = Collection::new("space-personal", "B".into());
        let l1 = Link::new(&a.id, "one", "one.com", None);
        let l2 = Link::new(&b.id, "two", "two.com", None);
        library.set_collections(vec![a.clone(), b.clone()]);
        library.set_links(vec![l1.clone(), l2]);

        let home: Vec<_> = library.collections_in_space("space-home").collect();
        assert_eq!(home, vec![&a]);
        assert_eq!(library.links_in_space("space-home"), vec![&l1]);
        assert_eq!(library.collection_link_count(&b.id), 1);
    }
}
