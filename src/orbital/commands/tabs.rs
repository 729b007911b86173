//! Turning open tabs into saved links.
//!
//! Each operation takes tabs out of the pool only once the destination is
//! known to exist, so a failed call leaves both the pool and the library as
//! they were.

use super::{collections, links};
use crate::error::{EntityKind, OrbitalError, Result};
use crate::library::Library;
use crate::model::{Collection, Link};
use crate::store::StorageBackend;
use crate::tabs::TabPool;

/// Save one open tab into an existing collection.
pub fn add_tab_to_collection<B: StorageBackend>(
    library: &mut Library<B>,
    pool: &mut TabPool,
    tab_id: &str,
    collection_id: &str,
) -> Result<Link> {
    if library.collection(collection_id).is_none() {
        return Err(OrbitalError::dangling(EntityKind::Collection, collection_id));
    }
    let tab = pool
        .take(tab_id)
        .ok_or_else(|| OrbitalError::dangling(EntityKind::OpenTab, tab_id))?;
    let link = Link::from_tab(collection_id, &tab);
    links::push(library, link.clone());
    Ok(link)
}

/// Save every tab of a window into a fresh, default-named collection of
/// `space_id`. Returns `None` when the window has no tabs.
pub fn save_window_as_session<B: StorageBackend>(
    library: &mut Library<B>,
    pool: &mut TabPool,
    space_id: &str,
    window_id: i64,
) -> Result<Option<(Collection, Vec<Link>)>> {
    if library.space(space_id).is_none() {
        return Err(OrbitalError::dangling(EntityKind::Space, space_id));
    }
    if !pool.tabs().iter().any(|t| t.window_id == window_id) {
        return Ok(None);
    }

    let collection = collections::create(library, space_id, None)?;
    let saved: Vec<Link> = pool
        .take_window(window_id)
        .iter()
        .map(|tab| Link::from_tab(&collection.id, tab))
        .collect();

    let mut all = library.links().to_vec();
    all.extend(saved.iter().cloned());
    library.set_links(all);
    Ok(Some((collection, saved)))
}

/// Save a tab into the first collection of `space_id`, creating a
/// default-named collection when the space has none. The returned flag tells
/// whether a collection was created.
pub fn quick_add_tab<B: StorageBackend>(
    library: &mut Library<B>,
    pool: &mut TabPool,
    space_id: &str,
    tab_id: &str,
) -> Result<(Link, bool)> {
    if pool.get(tab_id).is_none() {
        return Err(OrbitalError::dangling(EntityKind::OpenTab, tab_id));
    }
    let existing = library
        .collections_in_space(space_id)
        .next()
        .map(|c| c.id.clone());
    let (collection_id, created) = match existing {
        Some(id) => (id, false),
        None => (collections::create(library, space_id, None)?.id, true),
    };
    let link = add_tab_to_collection(library, pool, tab_id, &collection_id)?;
    Ok((link, created))
}
