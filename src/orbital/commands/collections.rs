use crate::error::{EntityKind, OrbitalError, Result};
use crate::library::Library;
use crate::model::{Collection, Link};
use crate::store::StorageBackend;
use chrono::{DateTime, Local, TimeZone};

/// A deleted collection and the links that went with it.
#[derive(Debug, Clone)]
pub struct CollectionRemoval {
    pub collection: Collection,
    pub links: Vec<Link>,
}

/// Create a collection in `space_id`, at the head of the global sequence.
///
/// A missing or blank name becomes a timestamp such as `25.03.14.09:05`.
pub fn create<B: StorageBackend>(
    library: &mut Library<B>,
    space_id: &str,
    name: Option<&str>,
) -> Result<Collection> {
    if library.space(space_id).is_none() {
        return Err(OrbitalError::dangling(EntityKind::Space, space_id));
    }
    let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => default_name(&Local::now()),
    };

    let collection = Collection::new(space_id, name);
    let mut collections = Vec::with_capacity(library.collections().len() + 1);
    collections.push(collection.clone());
    collections.extend_from_slice(library.collections());
    library.set_collections(collections);
    Ok(collection)
}

/// `YY.MM.DD.HH:MM` in the given time zone.
pub fn default_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%y.%m.%d.%H:%M").to_string()
}

/// Delete a collection and its links.
pub fn delete<B: StorageBackend>(library: &mut Library<B>, id: &str) -> Result<CollectionRemoval> {
    let collection = library
        .collection(id)
        .cloned()
        .ok_or_else(|| OrbitalError::dangling(EntityKind::Collection, id))?;

    let collections: Vec<Collection> = library
        .collections()
        .iter()
        .filter(|c| c.id != id)
        .cloned()
        .collect();
    let (removed, kept): (Vec<Link>, Vec<Link>) = library
        .links()
        .iter()
        .cloned()
        .partition(|l| l.collection_id == id);

    library.set_collections(collections);
    library.set_links(kept);
    Ok(CollectionRemoval {
        collection,
        links: removed,
    })
}

/// Rename a collection. Blank names are ignored.
pub fn rename<B: StorageBackend>(
    library: &mut Library<B>,
    id: &str,
    name: &str,
) -> Option<Collection> {
    let name = name.trim();
    if name.is_empty() {
        return library.collection(id).cloned();
    }
    modify(library, id, |c| c.name = name.to_string())
}

/// Flip the starred flag.
pub fn toggle_star<B: StorageBackend>(library: &mut Library<B>, id: &str) -> Option<Collection> {
    modify(library, id, |c| c.is_starred = !c.is_starred)
}

fn modify<B: StorageBackend>(
    library: &mut Library<B>,
    id: &str,
    change: impl FnOnce(&mut Collection),
) -> Option<Collection> {
    let mut collections = library.collections().to_vec();
    let collection = collections.iter_mut().find(|c| c.id == id)?;
    change(collection);
    let updated = collection.clone();
    library.set_collections(collections);
    Some(updated)
}
