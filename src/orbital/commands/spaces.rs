use crate::error::{EntityKind, OrbitalError, Result};
use crate::library::Library;
use crate::model::{Collection, Link, Space, SpaceUpdate};
use crate::store::StorageBackend;
use std::collections::HashSet;
use tracing::info;

/// Everything a space deletion removed.
#[derive(Debug, Clone)]
pub struct SpaceRemoval {
    pub space: Space,
    pub collections: Vec<Collection>,
    pub links: Vec<Link>,
}

/// Append a new space. Never fails.
pub fn create<B: StorageBackend>(library: &mut Library<B>, name: &str, icon: &str) -> Space {
    let space = Space::new(name, icon);
    let mut spaces = library.spaces().to_vec();
    spaces.push(space.clone());
    library.set_spaces(spaces);
    space
}

/// Rename a space and/or change its icon. Blank values are ignored.
/// Returns the updated space, or `None` when the id is unknown.
pub fn update<B: StorageBackend>(
    library: &mut Library<B>,
    id: &str,
    update: SpaceUpdate,
) -> Option<Space> {
    let mut spaces = library.spaces().to_vec();
    let space = spaces.iter_mut().find(|s| s.id == id)?;

    if let Some(name) = update.name.as_deref().map(str::trim) {
        if !name.is_empty() {
            space.name = name.to_string();
        }
    }
    if let Some(icon) = update.icon.as_deref().map(str::trim) {
        if !icon.is_empty() {
            space.icon = icon.to_string();
        }
    }
    let updated = space.clone();
    library.set_spaces(spaces);
    Some(updated)
}

/// Delete a space together with its collections and their links.
///
/// Refuses to delete the last remaining space.
pub fn delete<B: StorageBackend>(library: &mut Library<B>, id: &str) -> Result<SpaceRemoval> {
    let space = library
        .space(id)
        .cloned()
        .ok_or_else(|| OrbitalError::dangling(EntityKind::Space, id))?;
    if library.spaces().len() <= 1 {
        return Err(OrbitalError::InvariantViolation(
            "You must have at least one space.".to_string(),
        ));
    }

    let cascade = cascade(library.spaces(), library.collections(), library.links(), id);
    info!(
        space = id,
        collections = cascade.removed_collections.len(),
        links = cascade.removed_links.len(),
        "space deleted"
    );
    library.set_all(cascade.spaces, cascade.collections, cascade.links);
    Ok(SpaceRemoval {
        space,
        collections: cascade.removed_collections,
        links: cascade.removed_links,
    })
}

struct Cascade {
    spaces: Vec<Space>,
    collections: Vec<Collection>,
    links: Vec<Link>,
    removed_collections: Vec<Collection>,
    removed_links: Vec<Link>,
}

/// Split all three sequences into what survives and what goes, in one pass
/// each, before anything is replaced.
fn cascade(spaces: &[Space], collections: &[Collection], links: &[Link], id: &str) -> Cascade {
    let kept_spaces: Vec<Space> = spaces.iter().filter(|s| s.id != id).cloned().collect();
    let (removed_cols, kept_cols): (Vec<Collection>, Vec<Collection>) =
        collections.iter().cloned().partition(|c| c.space_id == id);

    let doomed: HashSet<&str> = removed_cols.iter().map(|c| c.id.as_str()).collect();
    let (removed_links, kept_links): (Vec<Link>, Vec<Link>) = links
        .iter()
        .cloned()
        .partition(|l| doomed.contains(l.collection_id.as_str()));

    Cascade {
        spaces: kept_spaces,
        collections: kept_cols,
        links: kept_links,
        removed_collections: removed_cols,
        removed_links,
    }
}
